//! Core Kernel - Foundational types shared by the policy administration crates
//!
//! This crate provides the building blocks used by the domain and data layers:
//! - Strongly typed integer identifiers for every stored record
//! - The keyed session store consumed by the certificate workflow
//! - The kernel error type

pub mod identifiers;
pub mod session;
pub mod error;

pub use identifiers::{PolicyId, CustomerId, NomineeId, PolicyMapId};
pub use session::{SessionStore, MemorySessionStore};
pub use error::CoreError;
