//! CLI argument definitions

use clap::Parser;
use std::path::PathBuf;

use crashsym_common::Address;

#[derive(Parser)]
#[command(
    name = "crashsym",
    about = "Resolve crash addresses to symbol names",
    after_help = "\
EXAMPLES:
    crashsym -b ./MyApp 0x100003f10                     Native symbols only
    crashsym -b ./MyApp -m methods.json 0x100003f10     Include object-runtime methods
    crashsym -b ./MyApp --slide 0x4000 0x100007f10      Image loaded with a slide"
)]
pub struct Args {
    /// Binary image to search (ELF or Mach-O)
    #[arg(short, long, value_name = "PATH")]
    pub binary: PathBuf,

    /// JSON manifest of the image's object-runtime methods
    #[arg(short, long, value_name = "JSON")]
    pub methods: Option<PathBuf>,

    /// Load slide of the image (runtime address minus link-time address)
    #[arg(short, long, value_name = "HEX", default_value = "0", value_parser = parse_address)]
    pub slide: Address,

    /// Print resolved frames as JSON
    #[arg(long)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long)]
    pub quiet: bool,

    /// Addresses to resolve, in hex
    #[arg(value_name = "ADDRESS", required = true, value_parser = parse_address)]
    pub addresses: Vec<Address>,
}

/// Parse a hex address, with or without a `0x` prefix.
///
/// # Errors
/// Returns a message naming the input if it is not valid hex.
pub fn parse_address(input: &str) -> Result<Address, String> {
    let digits = input.strip_prefix("0x").or_else(|| input.strip_prefix("0X")).unwrap_or(input);
    Address::from_str_radix(digits, 16).map_err(|err| format!("invalid address '{input}': {err}"))
}
