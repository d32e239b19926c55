//! Dual-source symbol resolution
//!
//! Both providers are probed for the address of their best match first. The
//! winner is the one whose match sits closer to the pc (the higher address),
//! and only the winner is asked to build a name. An object-runtime winner that
//! fails to produce a clean descriptor falls back to the native table.

use log::debug;

use crashsym_common::{Address, SymbolError};

use super::cache::SymbolCache;
use super::source::{
    FoundSymbol, MethodMetadata, MethodSource, NativeSource, NativeSymbols, SymbolSource,
};

/// Outcome of comparing the two probe results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Resolve through the native symbol table.
    Native,
    /// Resolve through object-runtime method metadata, falling back to native.
    Method,
    /// Neither provider matched. Carries the native provider's error.
    Neither(SymbolError),
}

/// Choose a provider from the two probe results.
///
/// Native wins if the method probe failed or the native match is strictly
/// higher. The method probe wins ties. When both fail the native error is
/// reported and the method error is dropped.
#[must_use]
pub fn select_source(
    native: Result<Address, SymbolError>,
    method: Result<Address, SymbolError>,
) -> Selection {
    match (native, method) {
        (Err(native_err), Err(method_err)) => {
            debug!("Native lookup error: {native_err}, method lookup error: {method_err}");
            Selection::Neither(native_err)
        }
        (_, Err(_)) => Selection::Native,
        (Ok(native_addr), Ok(method_addr)) if native_addr > method_addr => Selection::Native,
        _ => Selection::Method,
    }
}

/// Resolve `pc` against two providers and report the best match once.
///
/// `found` is invoked exactly once on success and never on failure.
///
/// # Errors
/// Returns the native provider's error if neither provider matches, or if the
/// final native resolution fails.
pub fn resolve_best<N, M>(
    native: &mut N,
    methods: &mut M,
    pc: Address,
    found: FoundSymbol<'_>,
) -> Result<(), SymbolError>
where
    N: SymbolSource + ?Sized,
    M: SymbolSource + ?Sized,
{
    let native_probe = native.probe_address(pc);
    let method_probe = methods.probe_address(pc);

    match select_source(native_probe, method_probe) {
        Selection::Neither(err) => {
            debug!("Could not find symbol for pc {pc:#x}");
            Err(err)
        }
        Selection::Native => native.resolve(pc, found),
        Selection::Method => match methods.resolve(pc, &mut *found) {
            Ok(()) => Ok(()),
            Err(err) => {
                debug!("Method resolution for pc {pc:#x} failed ({err}), using symbol table");
                native.resolve(pc, found)
            }
        },
    }
}

/// Find the best-guess symbol for `pc` in `image`.
///
/// Performs no allocation and takes no locks; safe to call while handling a
/// crash provided `cache` is not in use elsewhere.
///
/// Provider failures are reported through `log::debug!`. A logger that handles
/// debug records may allocate and lock, so binaries that call this from a
/// crash handler should build `log` with `release_max_level_info` (or a lower
/// level) to compile those calls out.
///
/// # Errors
/// Returns an error, without invoking `found`, if no symbol could be resolved.
pub fn find_symbol<I>(
    image: &I,
    cache: &mut SymbolCache,
    pc: Address,
    found: FoundSymbol<'_>,
) -> Result<(), SymbolError>
where
    I: NativeSymbols + MethodMetadata + ?Sized,
{
    let mut native = NativeSource::new(image);
    let mut methods = MethodSource::new(image, cache.method_cache_mut());
    resolve_best(&mut native, &mut methods, pc, found)
}
