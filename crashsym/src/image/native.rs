//! Native symbol tables
//!
//! Built ahead of time from an object file's symbol table. Lookups borrow the
//! prebuilt index and never allocate.

use log::{debug, info};
use object::{Object, ObjectSymbol, SymbolKind};

use crashsym_common::Address;

#[derive(Debug, Clone, Copy)]
struct NativeSymbol {
    address: Address,
    name_start: usize,
    name_len: usize,
}

/// Address-sorted symbol table with names stored in a single byte pool.
#[derive(Debug, Default)]
pub struct SymbolTable {
    symbols: Vec<NativeSymbol>,
    names: Vec<u8>,
}

impl SymbolTable {
    /// Index the defined text and data symbols of a parsed object file.
    ///
    /// Falls back to the dynamic symbol table when the static one is empty
    /// (stripped binaries).
    #[must_use]
    pub fn from_object(file: &object::File<'_>) -> Self {
        let mut table = Self::default();
        for symbol in file.symbols() {
            table.push_object_symbol(&symbol);
        }

        if table.symbols.is_empty() {
            debug!("No static symbols, falling back to the dynamic symbol table");
            for symbol in file.dynamic_symbols() {
                table.push_object_symbol(&symbol);
            }
        }

        let table = table.finish();
        info!("Indexed {} native symbols", table.len());
        table
    }

    /// Build a table from `(address, name)` pairs.
    #[must_use]
    pub fn from_symbols<N, I>(symbols: I) -> Self
    where
        N: AsRef<[u8]>,
        I: IntoIterator<Item = (Address, N)>,
    {
        let mut table = Self::default();
        for (address, name) in symbols {
            table.push(address, name.as_ref());
        }
        table.finish()
    }

    fn push_object_symbol<'data>(&mut self, symbol: &impl ObjectSymbol<'data>) {
        if !symbol.is_definition() || !matches!(symbol.kind(), SymbolKind::Text | SymbolKind::Data)
        {
            return;
        }
        if let Ok(name) = symbol.name_bytes() {
            self.push(symbol.address(), name);
        }
    }

    fn push(&mut self, address: Address, name: &[u8]) {
        if name.is_empty() {
            return;
        }
        self.symbols.push(NativeSymbol {
            address,
            name_start: self.names.len(),
            name_len: name.len(),
        });
        self.names.extend_from_slice(name);
    }

    /// Sort by address, keeping the first symbol seen at each address.
    fn finish(mut self) -> Self {
        self.symbols.sort_by_key(|symbol| symbol.address);
        self.symbols.dedup_by_key(|symbol| symbol.address);
        self.symbols.shrink_to_fit();
        self.names.shrink_to_fit();
        self
    }

    /// The symbol with the highest address at or below `pc`.
    #[must_use]
    pub fn lookup(&self, pc: Address) -> Option<(Address, &[u8])> {
        let index = self.symbols.partition_point(|symbol| symbol.address <= pc).checked_sub(1)?;
        let symbol = self.symbols.get(index)?;
        let name = self.names.get(symbol.name_start..symbol.name_start + symbol.name_len)?;
        Some((symbol.address, name))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}
