//! Symbol providers
//!
//! Two provider families are consulted for every address:
//!
//! - [`NativeSymbols`]: the image's own symbol table. Names are already
//!   strings and are passed straight through.
//! - [`MethodMetadata`]: object-runtime class/method metadata. Matches are
//!   reported as a class name, a method name and an entry-point address, and
//!   must be synthesized into a descriptor before they can be reported.
//!
//! The resolver does not talk to either family directly. Each is wrapped in a
//! [`SymbolSource`], which splits a lookup into a cheap address-only probe and
//! the full resolution that reports a name.

use log::debug;

use crashsym_common::{
    Address, MethodDescriptor, MethodKind, StringHandle, SymbolError, DESCRIPTOR_CAPACITY,
};

use super::cache::MethodCache;
use super::probes::{save_method_address, save_symbol_address};

/// Callback receiving a resolved address and its name.
///
/// The name is borrowed and only valid for the duration of the call.
pub type FoundSymbol<'a> = &'a mut dyn FnMut(Address, &[u8]);

/// Callback receiving an object-runtime method match.
pub type FoundMethod<'a> =
    &'a mut dyn FnMut(MethodKind, &dyn StringHandle, &dyn StringHandle, Address);

/// Native symbol table lookups for one image.
pub trait NativeSymbols {
    /// Find the symbol that best matches `pc`.
    ///
    /// Invokes `found` at most once. May be called repeatedly for the same
    /// address with the same outcome.
    ///
    /// # Errors
    /// Returns an error if no symbol matches or the table cannot be read.
    fn find_symbol(&self, pc: Address, found: FoundSymbol<'_>) -> Result<(), SymbolError>;
}

/// Object-runtime method metadata lookups for one image.
pub trait MethodMetadata {
    /// Find the method that best matches `pc`.
    ///
    /// Invokes `found` at most once. The string handles are only valid during
    /// that call.
    ///
    /// # Errors
    /// Returns an error if no method matches or the metadata cannot be read.
    fn find_method(
        &self,
        cache: &mut MethodCache,
        pc: Address,
        found: FoundMethod<'_>,
    ) -> Result<(), SymbolError>;
}

/// A provider as seen by the resolver.
pub trait SymbolSource {
    /// Address of the best match for `pc`, without building its name.
    ///
    /// # Errors
    /// Returns the provider's error if it has no match.
    fn probe_address(&mut self, pc: Address) -> Result<Address, SymbolError>;

    /// Resolve `pc` and report the match through `found`.
    ///
    /// `found` is invoked exactly once on success and never on failure.
    ///
    /// # Errors
    /// Returns an error if the match cannot be reported.
    fn resolve(&mut self, pc: Address, found: FoundSymbol<'_>) -> Result<(), SymbolError>;
}

/// [`SymbolSource`] backed by an image's native symbol table.
pub struct NativeSource<'a, I: ?Sized> {
    image: &'a I,
}

impl<'a, I: NativeSymbols + ?Sized> NativeSource<'a, I> {
    #[must_use]
    pub fn new(image: &'a I) -> Self {
        Self { image }
    }
}

impl<I: NativeSymbols + ?Sized> SymbolSource for NativeSource<'_, I> {
    fn probe_address(&mut self, pc: Address) -> Result<Address, SymbolError> {
        let mut address = 0;
        self.image.find_symbol(pc, &mut save_symbol_address(&mut address))?;
        Ok(address)
    }

    fn resolve(&mut self, pc: Address, found: FoundSymbol<'_>) -> Result<(), SymbolError> {
        self.image.find_symbol(pc, found)
    }
}

/// [`SymbolSource`] backed by an image's object-runtime method metadata.
///
/// Names are synthesized as `{+|-}[Class method]` into a stack buffer of
/// [`DESCRIPTOR_CAPACITY`] bytes.
pub struct MethodSource<'a, I: ?Sized> {
    image: &'a I,
    cache: &'a mut MethodCache,
}

impl<'a, I: MethodMetadata + ?Sized> MethodSource<'a, I> {
    #[must_use]
    pub fn new(image: &'a I, cache: &'a mut MethodCache) -> Self {
        Self { image, cache }
    }
}

impl<I: MethodMetadata + ?Sized> SymbolSource for MethodSource<'_, I> {
    fn probe_address(&mut self, pc: Address) -> Result<Address, SymbolError> {
        let mut address = 0;
        self.image.find_method(&mut *self.cache, pc, &mut save_method_address(&mut address))?;
        Ok(address)
    }

    /// Fails without reporting anything unless the provider succeeded, the
    /// method has a non-zero entry point, and both names were readable.
    fn resolve(&mut self, pc: Address, found: FoundSymbol<'_>) -> Result<(), SymbolError> {
        let mut storage = [0u8; DESCRIPTOR_CAPACITY];
        let mut descriptor = MethodDescriptor::new(&mut storage[..DESCRIPTOR_CAPACITY - 1]);

        self.image.find_method(&mut *self.cache, pc, &mut |kind, class_name, method_name, imp| {
            descriptor.record(kind, class_name, method_name, imp);
        })?;

        if descriptor.imp() == 0 {
            debug!("Method match for pc {pc:#x} has no entry point");
            return Err(SymbolError::NotFound);
        }
        if descriptor.did_error() {
            debug!("Method match for pc {pc:#x} has unreadable names");
            return Err(SymbolError::InvalidData);
        }

        found(descriptor.imp(), descriptor.as_bytes());
        Ok(())
    }
}
