//! Repository implementations for policy administration records
//!
//! Repositories encapsulate SQL queries and map between database rows and the
//! record types of `domain_policy`. Columns are mapped by name through
//! `sqlx::FromRow`, never by position.
//!
//! # Architecture
//!
//! Each repository follows these principles:
//! - One pooled connection per operation, released on every exit path
//! - Parameter binding for every caller-supplied value
//! - Absent records reported as `Option`, `false` or an empty `Vec`

pub mod policy;
pub mod nominee;
pub mod policy_map;

pub use policy::PolicyRepository;
pub use nominee::NomineeRepository;
pub use policy_map::PolicyMapRepository;
