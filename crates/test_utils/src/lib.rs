//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! policy administration test suite.
//!
//! # Modules
//!
//! - `fixtures`: Pre-built test data for policies, nominees, and dates
//! - `builders`: Builder patterns for test enrollments
//! - `database`: Database test helpers and container management

pub mod fixtures;
pub mod builders;
pub mod database;

pub use fixtures::*;
pub use builders::*;
pub use database::*;
