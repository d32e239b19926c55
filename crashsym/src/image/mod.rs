//! # Image Preparation
//!
//! Concrete symbol providers. Building them reads files and allocates, so it
//! happens before any crash, typically when an image is registered. The
//! resulting [`LoadedImage`] answers both provider lookups from prebuilt,
//! address-sorted indexes without allocating.
//!
//! - **`native`**: [`SymbolTable`] indexed from an ELF or Mach-O symbol table
//!   with the `object` crate
//! - **`methods`**: [`MethodTable`] loaded from a JSON method manifest
//! - **`loaded`**: [`LoadedImage`], which combines both with a load slide and
//!   implements [`NativeSymbols`](crate::symbolication::NativeSymbols) and
//!   [`MethodMetadata`](crate::symbolication::MethodMetadata)

pub mod loaded;
pub mod methods;
pub mod native;

pub use loaded::{LoadedImage, MemoryRange};
pub use methods::{MethodRecord, MethodTable, TableString};
pub use native::SymbolTable;
