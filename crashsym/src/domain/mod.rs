//! Domain model for crashsym
//!
//! Structured error types for the parts of the crate that run outside the
//! crash path. Crash-path statuses are [`SymbolError`] from `crashsym-common`.

pub mod errors;

pub use crashsym_common::SymbolError;
pub use errors::ImageError;
