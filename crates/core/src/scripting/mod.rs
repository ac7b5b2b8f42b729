//! Interpreter subprocess management.
//!
//! Provides the executor trait and the Python implementation. All process
//! handling is pure (no HTTP types) and lives in the `core` crate for
//! isolation and testability.

pub mod executor;
pub mod python;
pub mod subprocess;
