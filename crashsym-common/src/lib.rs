//! # Crash-Path Primitives
//!
//! Types shared by every stage of local symbolication that may run inside a
//! crash signal or exception handler. Nothing in this crate allocates, locks,
//! or calls back into the runtime: all storage is borrowed from the caller.
//!
//! ## Key Types
//!
//! - [`SymbolError`] - Status enumeration shared by providers and the resolver
//! - [`MethodKind`] - Class vs instance method, and its descriptor prefix
//! - [`StringHandle`] - Borrowed name data exposed by method metadata providers
//! - [`MethodDescriptor`] - Bounded `{+|-}[Class method]` synthesizer

#![cfg_attr(not(test), no_std)]

pub mod descriptor;

pub use descriptor::MethodDescriptor;

use thiserror::Error;

// ============================================================================
// Constants
// ============================================================================

/// Virtual address inside the crashed task's address space.
///
/// No range validation happens at this layer; providers reject addresses they
/// do not cover.
pub type Address = u64;

/// Size of the stack buffer a method descriptor is synthesized into.
///
/// The final byte is never written so the buffer always stays NUL-terminated
/// for C consumers, leaving 127 usable bytes.
pub const DESCRIPTOR_CAPACITY: usize = 128;

/// Text substituted for a class or method name whose handle could not be read.
pub const ERROR_PLACEHOLDER: &[u8] = b"ERROR";

// ============================================================================
// Status
// ============================================================================

/// Error status reported by symbol providers and the resolver.
///
/// Success is `Ok(())`. The resolver treats every variant as "no match" and
/// does not distinguish between them when choosing a provider.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolError {
    #[error("unknown error")]
    Unknown,

    #[error("out of memory")]
    NoMemory,

    #[error("operation not supported")]
    Unsupported,

    #[error("invalid argument")]
    InvalidArgument,

    #[error("internal error")]
    Internal,

    #[error("access denied")]
    Access,

    #[error("no matching symbol")]
    NotFound,

    #[error("invalid or unreadable data")]
    InvalidData,
}

// ============================================================================
// Method Metadata
// ============================================================================

/// Whether an object-runtime method belongs to the class or its instances.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodKind {
    Class,
    Instance,
}

impl MethodKind {
    #[must_use]
    pub fn from_is_class_method(is_class_method: bool) -> Self {
        if is_class_method {
            MethodKind::Class
        } else {
            MethodKind::Instance
        }
    }

    /// Leading byte of the method descriptor: `+` for class methods, `-` for
    /// instance methods.
    #[must_use]
    pub fn prefix(self) -> u8 {
        match self {
            MethodKind::Class => b'+',
            MethodKind::Instance => b'-',
        }
    }
}

/// Name data owned by a method metadata provider.
///
/// The bytes are not NUL-terminated and are only valid for the duration of the
/// provider callback that handed out the handle.
pub trait StringHandle {
    /// Number of bytes in the string.
    ///
    /// # Errors
    /// Returns an error if the string's length cannot be read.
    fn length(&self) -> Result<usize, SymbolError>;

    /// Borrow the string's bytes.
    ///
    /// # Errors
    /// Returns an error if the string's data cannot be read.
    fn bytes(&self) -> Result<&[u8], SymbolError>;
}

/// String handle over bytes that are always readable.
#[derive(Debug, Clone, Copy)]
pub struct BorrowedString<'a>(pub &'a [u8]);

impl StringHandle for BorrowedString<'_> {
    fn length(&self) -> Result<usize, SymbolError> {
        Ok(self.0.len())
    }

    fn bytes(&self) -> Result<&[u8], SymbolError> {
        Ok(self.0)
    }
}
