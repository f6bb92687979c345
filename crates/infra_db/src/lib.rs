//! Infrastructure Database Layer
//!
//! This crate provides data access for the policy administration system on
//! PostgreSQL using SQLx.
//!
//! # Architecture
//!
//! The crate follows the repository pattern. Repositories hide SQL behind
//! typed methods and return the record types of `domain_policy`:
//!
//! - [`PolicyRepository`]: policy CRUD and customer-scoped views
//! - [`NomineeRepository`]: nominees and their enrollment links
//! - [`PolicyMapRepository`]: customer enrollments
//! - [`CertificateService`]: certificate lookup and publication
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::{create_pool, run_migrations, DatabaseConfig, PolicyRepository};
//!
//! let pool = create_pool(DatabaseConfig::from_env()?).await?;
//! run_migrations(&pool).await?;
//! let repo = PolicyRepository::new(pool);
//! let policies = repo.get_all_policies().await?;
//! ```

pub mod pool;
pub mod error;
pub mod repositories;
pub mod certificate;

pub use pool::{
    DatabasePool, DatabaseConfig, DatabaseSettings, create_pool, create_pool_from_url,
    run_migrations, MIGRATOR,
};
pub use error::DatabaseError;
pub use repositories::{PolicyRepository, NomineeRepository, PolicyMapRepository};
pub use certificate::CertificateService;
