//! Bounded method descriptor synthesis
//!
//! Builds `+[Class method]` / `-[Class method]` directly into a caller-owned
//! byte buffer. Output that does not fit is dropped, leaving a valid prefix.

use log::debug;

use crate::{Address, MethodKind, StringHandle, ERROR_PLACEHOLDER};

/// Append-only cursor over a fixed buffer. Writes past the end are dropped.
struct Cursor<'b> {
    buf: &'b mut [u8],
    pos: usize,
}

impl Cursor<'_> {
    fn push(&mut self, byte: u8) -> bool {
        let Some(slot) = self.buf.get_mut(self.pos) else {
            return false;
        };
        *slot = byte;
        self.pos += 1;
        true
    }

    fn push_all(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            if !self.push(byte) {
                break;
            }
        }
    }
}

/// Method descriptor synthesized by a method metadata callback.
///
/// Records the method's entry-point address separately from the text. The text
/// is informational: a failed name lookup is substituted with
/// [`ERROR_PLACEHOLDER`] and reported through [`did_error`](Self::did_error)
/// rather than aborting the synthesis.
pub struct MethodDescriptor<'a> {
    buf: &'a mut [u8],
    len: usize,
    imp: Address,
    did_error: bool,
}

impl<'a> MethodDescriptor<'a> {
    /// Synthesize into `buf`. Its length is the maximum number of bytes written.
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, len: 0, imp: 0, did_error: false }
    }

    /// Record one method match, overwriting any previous text.
    ///
    /// The error flag is sticky across calls.
    pub fn record(
        &mut self,
        kind: MethodKind,
        class_name: &dyn StringHandle,
        method_name: &dyn StringHandle,
        imp: Address,
    ) {
        self.imp = imp;

        let class_name = self.read_name(class_name, "class name");
        let method_name = self.read_name(method_name, "method name");

        let mut cursor = Cursor { buf: &mut *self.buf, pos: 0 };
        cursor.push(kind.prefix());
        cursor.push(b'[');
        cursor.push_all(class_name);
        cursor.push(b' ');
        cursor.push_all(method_name);
        cursor.push(b']');
        self.len = cursor.pos;
    }

    /// Query both halves of a handle, falling back to the placeholder if either
    /// query fails.
    fn read_name<'h>(&mut self, handle: &'h dyn StringHandle, what: &str) -> &'h [u8] {
        let length = handle.length();
        let bytes = handle.bytes();

        match (length, bytes) {
            (Ok(length), Ok(bytes)) => &bytes[..length.min(bytes.len())],
            (length, bytes) => {
                if let Err(err) = length {
                    debug!("{what} length lookup failed: {err}");
                }
                if let Err(err) = bytes {
                    debug!("{what} data lookup failed: {err}");
                }
                self.did_error = true;
                ERROR_PLACEHOLDER
            }
        }
    }

    /// The synthesized (possibly truncated) descriptor text.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    /// Entry-point address of the recorded method, or 0 if nothing was recorded.
    #[must_use]
    pub fn imp(&self) -> Address {
        self.imp
    }

    /// Whether any class or method name lookup failed.
    #[must_use]
    pub fn did_error(&self) -> bool {
        self.did_error
    }
}
