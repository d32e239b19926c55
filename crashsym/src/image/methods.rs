//! Object-runtime method tables
//!
//! Method metadata is loaded from a JSON manifest listing each method's class,
//! selector and entry point:
//!
//! ```json
//! { "methods": [
//!     { "class": "Foo", "selector": "bar:", "imp": 8192, "class_method": false }
//! ] }
//! ```
//!
//! A `null` class or selector stands for a name the metadata could not supply;
//! its [`TableString`] handle fails both queries.

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crashsym_common::{Address, MethodKind, StringHandle, SymbolError};

use crate::domain::ImageError;

#[derive(Debug, Deserialize)]
struct Manifest {
    methods: Vec<ManifestEntry>,
}

#[derive(Debug, Deserialize)]
struct ManifestEntry {
    class: Option<String>,
    selector: Option<String>,
    imp: Address,
    #[serde(default)]
    class_method: bool,
}

/// One method known to the object runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodRecord {
    pub imp: Address,
    pub kind: MethodKind,
    pub class_name: Option<String>,
    pub selector: Option<String>,
}

impl MethodRecord {
    #[must_use]
    pub fn new(kind: MethodKind, class_name: &str, selector: &str, imp: Address) -> Self {
        Self {
            imp,
            kind,
            class_name: Some(class_name.to_string()),
            selector: Some(selector.to_string()),
        }
    }

    /// Handle over the class name, valid while the record is borrowed.
    #[must_use]
    pub fn class_handle(&self) -> TableString<'_> {
        TableString(self.class_name.as_deref())
    }

    /// Handle over the selector, valid while the record is borrowed.
    #[must_use]
    pub fn selector_handle(&self) -> TableString<'_> {
        TableString(self.selector.as_deref())
    }
}

/// Methods sorted by entry point.
#[derive(Debug, Default)]
pub struct MethodTable {
    methods: Vec<MethodRecord>,
}

impl MethodTable {
    /// Build a table, keeping the first method seen at each entry point.
    #[must_use]
    pub fn from_records(mut methods: Vec<MethodRecord>) -> Self {
        methods.sort_by_key(|method| method.imp);
        methods.dedup_by_key(|method| method.imp);
        Self { methods }
    }

    /// Parse a JSON method manifest.
    ///
    /// # Errors
    /// Returns an error if the manifest is not valid JSON or is missing fields.
    pub fn from_json(json: &str) -> Result<Self, ImageError> {
        let manifest: Manifest = serde_json::from_str(json)?;
        let records = manifest
            .methods
            .into_iter()
            .map(|entry| MethodRecord {
                imp: entry.imp,
                kind: MethodKind::from_is_class_method(entry.class_method),
                class_name: entry.class,
                selector: entry.selector,
            })
            .collect();
        Ok(Self::from_records(records))
    }

    /// Read and parse a JSON method manifest.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ImageError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .map_err(|source| ImageError::Io { path: path.to_path_buf(), source })?;
        Self::from_json(&json)
    }

    /// Index of the method with the highest entry point at or below `pc`.
    #[must_use]
    pub fn lookup(&self, pc: Address) -> Option<usize> {
        self.methods.partition_point(|method| method.imp <= pc).checked_sub(1)
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&MethodRecord> {
        self.methods.get(index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.methods.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

/// String handle over a method table name. `None` fails both queries.
#[derive(Debug, Clone, Copy)]
pub struct TableString<'a>(Option<&'a str>);

impl StringHandle for TableString<'_> {
    fn length(&self) -> Result<usize, SymbolError> {
        self.0.map(str::len).ok_or(SymbolError::InvalidData)
    }

    fn bytes(&self) -> Result<&[u8], SymbolError> {
        self.0.map(str::as_bytes).ok_or(SymbolError::InvalidData)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = r#"{
        "methods": [
            { "class": "Foo", "selector": "bar:", "imp": 8192 },
            { "class": "Foo", "selector": "new", "imp": 4096, "class_method": true },
            { "class": null, "selector": "orphan", "imp": 12288 }
        ]
    }"#;

    #[test]
    fn test_from_json_sorts_by_imp() {
        let table = MethodTable::from_json(MANIFEST).unwrap();
        assert_eq!(table.len(), 3);

        let first = table.get(0).unwrap();
        assert_eq!(first.imp, 0x1000);
        assert_eq!(first.kind, MethodKind::Class);
        assert_eq!(first.selector.as_deref(), Some("new"));

        assert_eq!(table.get(1).unwrap().kind, MethodKind::Instance);
    }

    #[test]
    fn test_lookup_finds_preceding_method() {
        let table = MethodTable::from_json(MANIFEST).unwrap();
        assert_eq!(table.lookup(0xfff), None);
        assert_eq!(table.lookup(0x1000), Some(0));
        assert_eq!(table.lookup(0x2010), Some(1));
        assert_eq!(table.lookup(0x9999_0000), Some(2));
    }

    #[test]
    fn test_missing_name_handle_fails() {
        let table = MethodTable::from_json(MANIFEST).unwrap();
        let orphan = table.get(2).unwrap();

        assert_eq!(orphan.class_handle().length(), Err(SymbolError::InvalidData));
        assert_eq!(orphan.class_handle().bytes(), Err(SymbolError::InvalidData));
        assert_eq!(orphan.selector_handle().length(), Ok(6));
        assert_eq!(orphan.selector_handle().bytes(), Ok(&b"orphan"[..]));
    }

    #[test]
    fn test_invalid_manifest() {
        assert!(matches!(MethodTable::from_json("{\"methods\": 3}"), Err(ImageError::Manifest(_))));
    }

    #[test]
    fn test_duplicate_imp_keeps_first() {
        let table = MethodTable::from_records(vec![
            MethodRecord::new(MethodKind::Instance, "A", "one", 0x10),
            MethodRecord::new(MethodKind::Instance, "B", "two", 0x10),
        ]);
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(0).unwrap().class_name.as_deref(), Some("A"));
    }
}
