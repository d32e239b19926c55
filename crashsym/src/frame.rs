// String formatting intentionally uses format! for clarity
#![allow(clippy::format_push_string)]

use serde::Serialize;

use crashsym_common::Address;

use crate::symbolication::{find_symbol, MethodMetadata, NativeSymbols, SymbolCache};

/// A program counter and the symbol it resolved to, if any.
///
/// Owns its strings, so it is built after the crash-time lookup returns and is
/// meant for reporting rather than for use inside a crash handler.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedFrame {
    pub pc: Address,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<ResolvedSymbol>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Symbol matched for a frame
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedSymbol {
    pub address: Address,
    pub name: String,
    /// Distance from the symbol's start to the pc
    pub offset: u64,
}

impl ResolvedFrame {
    /// Resolve `pc` in `image` and capture the result.
    pub fn resolve<I>(image: &I, cache: &mut SymbolCache, pc: Address) -> Self
    where
        I: NativeSymbols + MethodMetadata + ?Sized,
    {
        let mut symbol = None;
        let result = find_symbol(image, cache, pc, &mut |address, name| {
            symbol = Some(ResolvedSymbol {
                address,
                name: String::from_utf8_lossy(name).into_owned(),
                offset: pc.wrapping_sub(address),
            });
        });

        Self { pc, symbol, error: result.err().map(|err| err.to_string()) }
    }

    /// Format the frame for display
    #[must_use]
    pub fn format(&self, frame_num: usize) -> String {
        let mut output = format!("#{frame_num:<2} 0x{:016x} ", self.pc);

        match (&self.symbol, &self.error) {
            (Some(symbol), _) => {
                output.push_str(&format!("{} + {}", symbol.name, symbol.offset));
            }
            (None, Some(error)) => output.push_str(&format!("<unknown> ({error})")),
            (None, None) => output.push_str("<unknown>"),
        }

        output
    }
}
