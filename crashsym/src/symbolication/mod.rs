//! # Crash-Time Symbol Resolution
//!
//! Turns a program counter captured in a crash into a symbol name while the
//! crashed thread is frozen and the process may be in any state. Every path in
//! this module is bounded, synchronous, allocation-free and lock-free.
//!
//! ## Resolution Flow
//!
//! ```text
//! find_symbol(image, cache, pc, found)
//!    │
//!    ├─ probe native symbol table      → Ok(symbol address) | Err
//!    ├─ probe object-runtime methods   → Ok(method IMP)     | Err
//!    │
//!    ├─ both Err                        → Err(native error), found not called
//!    ├─ method Err, or native > method  → native table reports the name
//!    └─ otherwise                       → synthesize "-[Class method]" into a
//!                                         128-byte stack buffer and report it;
//!                                         on any failure, native table instead
//! ```
//!
//! A higher match address is treated as the tighter match: both providers
//! return the closest entry at or below the pc, so the larger of the two is
//! the one that actually contains it.
//!
//! ## Module Structure
//!
//! - **`cache`**: [`SymbolCache`], the caller-owned per-task state, and the
//!   object-runtime [`MethodCache`] it wraps
//! - **`probes`**: Address-only callbacks used to compare providers cheaply
//! - **`source`**: Provider traits and the [`SymbolSource`] adapters the
//!   resolver is written against
//! - **`resolver`**: Tie-break policy and the resolution state machine
//!
//! ## Example
//!
//! ```rust,ignore
//! let mut cache = SymbolCache::init()?;
//!
//! // Inside the crash handler: no allocation past this point
//! find_symbol(&image, &mut cache, pc, &mut |address, name| {
//!     write_frame(pc, address, name);
//! })?;
//! ```

pub mod cache;
pub mod probes;
pub mod resolver;
pub mod source;

pub use cache::{MethodCache, SymbolCache};
pub use resolver::{find_symbol, resolve_best, select_source, Selection};
pub use source::{
    FoundMethod, FoundSymbol, MethodMetadata, MethodSource, NativeSource, NativeSymbols,
    SymbolSource,
};
