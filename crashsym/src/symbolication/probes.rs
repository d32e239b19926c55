//! Address-capturing probes
//!
//! Callbacks that let the resolver ask a provider only *where* its best match
//! is, deferring any name work until a winner has been chosen.

use crashsym_common::{Address, MethodKind, StringHandle};

/// Native symbol probe: store the matched address, ignore the name.
pub fn save_symbol_address(slot: &mut Address) -> impl FnMut(Address, &[u8]) + '_ {
    move |address: Address, _name: &[u8]| *slot = address
}

/// Method metadata probe: store the method's entry-point address, ignore the
/// names.
pub fn save_method_address(
    slot: &mut Address,
) -> impl FnMut(MethodKind, &dyn StringHandle, &dyn StringHandle, Address) + '_ {
    move |_kind: MethodKind,
          _class_name: &dyn StringHandle,
          _method_name: &dyn StringHandle,
          imp: Address| *slot = imp
}
