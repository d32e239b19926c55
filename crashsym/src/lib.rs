//! # crashsym - Crash-Safe Local Symbolication
//!
//! crashsym turns an instruction address captured during a crash into a
//! human-readable symbol name. The lookup itself is written to run inside a
//! signal or exception handler: it does not allocate, lock, or call into
//! runtime services that are unsafe to reenter.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                  Before the crash (may allocate)              │
//! │                                                               │
//! │   object file ──▶ SymbolTable ─┐                              │
//! │                                ├──▶ LoadedImage               │
//! │   methods.json ─▶ MethodTable ─┘                              │
//! │                                     SymbolCache::init()       │
//! └──────────────────────────────┬────────────────────────────────┘
//!                                │ borrowed
//!                                ▼
//! ┌───────────────────────────────────────────────────────────────┐
//! │                In the crash handler (no allocation)           │
//! │                                                               │
//! │   pc ──▶ find_symbol ──▶ probe native ─┐                      │
//! │                    └───▶ probe methods ┴─▶ select_source      │
//! │                                              │                │
//! │              native name ◀───────────────────┤                │
//! │             "-[Class method]" (128 B stack) ◀┘                │
//! │                                │                              │
//! │                                ▼                              │
//! │                     found(address, name)                      │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Structure
//!
//! - [`symbolication`]: The crash-time engine
//!   - `cache`: Caller-owned [`SymbolCache`](symbolication::SymbolCache)
//!   - `probes`: Address-only provider callbacks
//!   - `source`: Provider traits and adapters
//!   - `resolver`: Tie-break policy and fallback
//!
//! - [`image`]: Concrete providers prepared ahead of time
//!   - `native`: Symbol tables read with the `object` crate
//!   - `methods`: Object-runtime method tables from JSON manifests
//!   - `loaded`: Images with a load slide, implementing both providers
//!
//! - [`frame`]: Owned, serializable results for reporting
//!
//! - [`cli`]: Command-line argument parsing
//!
//! - [`domain`]: Error types
//!
//! The allocation-free building blocks (status codes, string handles, the
//! bounded descriptor writer) live in the `crashsym-common` crate, which is
//! `#![no_std]`.
//!
//! ## Typical Usage
//!
//! ```bash
//! # Resolve two return addresses from a crash log
//! crashsym --binary ./MyApp --methods methods.json 0x100003f10 0x100004a2c
//!
//! # Same image loaded with a slide, JSON output
//! crashsym -b ./MyApp --slide 0x8000 --json 0x10000bf10
//! ```

pub mod cli;
pub mod domain;
pub mod frame;
pub mod image;
pub mod symbolication;
