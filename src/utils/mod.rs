//! Utility modules for the set-based graph core.

pub mod errors;

pub use errors::{SbgError, SbgResult};
