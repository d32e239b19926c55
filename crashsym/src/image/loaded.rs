//! Images prepared for crash-time lookups

use log::{info, warn};
use object::{Object, ObjectSection, SectionKind};
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use crashsym_common::{Address, SymbolError};

use super::methods::MethodTable;
use super::native::SymbolTable;
use crate::domain::ImageError;
use crate::symbolication::{FoundMethod, FoundSymbol, MethodCache, MethodMetadata, NativeSymbols};

static NEXT_IMAGE_ID: AtomicU64 = AtomicU64::new(1);

/// Address range of an image's executable sections, in unslid addresses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryRange {
    pub start: u64,
    pub end: u64,
}

impl MemoryRange {
    /// Check if an address falls within this memory range
    #[must_use]
    pub fn contains(&self, addr: u64) -> bool {
        addr >= self.start && addr < self.end
    }
}

/// A binary image with its native symbol table and, optionally, its
/// object-runtime method table.
///
/// Everything is indexed up front so that both provider lookups run without
/// allocating. Addresses passed in and reported back are runtime addresses:
/// the image's load slide is removed before searching and added to matches.
#[derive(Debug)]
pub struct LoadedImage {
    id: u64,
    name: String,
    symbols: SymbolTable,
    methods: Option<MethodTable>,
    slide: Address,
    text_range: Option<MemoryRange>,
}

impl LoadedImage {
    /// Load and index an ELF or Mach-O file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ImageError> {
        let path = path.as_ref();
        let data =
            fs::read(path).map_err(|source| ImageError::Io { path: path.to_path_buf(), source })?;
        Self::parse(path.display().to_string(), &data)
    }

    /// Index an object file already in memory.
    ///
    /// # Errors
    /// Returns an error if the data is not a supported object file.
    pub fn parse(name: impl Into<String>, data: &[u8]) -> Result<Self, ImageError> {
        let name = name.into();
        let file = object::File::parse(data)?;

        let symbols = SymbolTable::from_object(&file);
        if symbols.is_empty() {
            warn!("{name} has no symbols; only method metadata can resolve addresses");
        }

        let text_range = text_range(&file);
        if let Some(range) = text_range {
            info!("{name} text range: 0x{:x} - 0x{:x}", range.start, range.end);
        }

        Ok(Self { text_range, ..Self::from_parts(name, symbols) })
    }

    /// Assemble an image from a prebuilt symbol table, with no text range.
    #[must_use]
    pub fn from_parts(name: impl Into<String>, symbols: SymbolTable) -> Self {
        Self {
            id: NEXT_IMAGE_ID.fetch_add(1, Ordering::Relaxed),
            name: name.into(),
            symbols,
            methods: None,
            slide: 0,
            text_range: None,
        }
    }

    #[must_use]
    pub fn with_methods(mut self, methods: MethodTable) -> Self {
        info!("{}: {} object-runtime methods", self.name, methods.len());
        self.methods = Some(methods);
        self
    }

    /// Set the difference between the image's runtime and link-time addresses.
    #[must_use]
    pub fn with_slide(mut self, slide: Address) -> Self {
        self.slide = slide;
        self
    }

    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn slide(&self) -> Address {
        self.slide
    }

    #[must_use]
    pub fn text_range(&self) -> Option<MemoryRange> {
        self.text_range
    }

    #[must_use]
    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    /// Translate a runtime pc into a link-time address inside this image.
    fn unslide(&self, pc: Address) -> Result<Address, SymbolError> {
        let pc = pc.checked_sub(self.slide).ok_or(SymbolError::NotFound)?;
        match self.text_range {
            Some(range) if !range.contains(pc) => Err(SymbolError::NotFound),
            _ => Ok(pc),
        }
    }

    fn reslide(&self, address: Address) -> Result<Address, SymbolError> {
        address.checked_add(self.slide).ok_or(SymbolError::InvalidData)
    }
}

impl NativeSymbols for LoadedImage {
    fn find_symbol(&self, pc: Address, found: FoundSymbol<'_>) -> Result<(), SymbolError> {
        let pc = self.unslide(pc)?;
        let (address, name) = self.symbols.lookup(pc).ok_or(SymbolError::NotFound)?;
        found(self.reslide(address)?, name);
        Ok(())
    }
}

impl MethodMetadata for LoadedImage {
    fn find_method(
        &self,
        cache: &mut MethodCache,
        pc: Address,
        found: FoundMethod<'_>,
    ) -> Result<(), SymbolError> {
        let methods = self.methods.as_ref().ok_or(SymbolError::NotFound)?;
        let pc = self.unslide(pc)?;

        let index = match cache.lookup(self.id, pc) {
            Some(index) => index,
            None => {
                let index = methods.lookup(pc).ok_or(SymbolError::NotFound)?;
                cache.insert(self.id, pc, index);
                index
            }
        };

        let method = methods.get(index).ok_or(SymbolError::Internal)?;
        found(
            method.kind,
            &method.class_handle(),
            &method.selector_handle(),
            self.reslide(method.imp)?,
        );
        Ok(())
    }
}

/// Span of all executable sections, if the image has any.
fn text_range(file: &object::File<'_>) -> Option<MemoryRange> {
    file.sections()
        .filter(|section| section.kind() == SectionKind::Text && section.size() > 0)
        .map(|section| MemoryRange {
            start: section.address(),
            end: section.address().saturating_add(section.size()),
        })
        .reduce(|a, b| MemoryRange { start: a.start.min(b.start), end: a.end.max(b.end) })
}
