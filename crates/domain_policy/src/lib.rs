//! Policy Administration Domain
//!
//! This crate holds the record types of the policy administration system and
//! the business rules that apply to them, independent of any database.
//!
//! # Records
//!
//! - **Policy**: an insurance product with its coverage terms
//! - **Nominee**: a beneficiary designated on a customer's policy
//! - **PolicyMap**: the enrollment linking a customer to a policy
//! - **Certificate**: the printable summary of an enrollment
//!
//! # Example
//!
//! ```rust
//! use domain_policy::Policy;
//! use rust_decimal_macros::dec;
//!
//! let policy = Policy::builder()
//!     .policy_type("Term")
//!     .policy_name("Term Life 20")
//!     .number_nominees(2)
//!     .tenure(20.0)
//!     .sum_assured(dec!(100000), dec!(500000))
//!     .pre_reqs("Medical examination")
//!     .build()
//!     .unwrap();
//!
//! assert!(!policy.is_saved());
//! ```

pub mod policy;
pub mod nominee;
pub mod policy_map;
pub mod certificate;
pub mod error;

pub use policy::{Policy, PolicyBuilder, UNSAVED_POLICY_ID};
pub use nominee::{Nominee, NewNominee};
pub use policy_map::{PolicyMap, NewPolicyMap, Enrollment, assemble_customer_policies};
pub use certificate::{Certificate, certificate_end_date};
pub use error::PolicyError;
