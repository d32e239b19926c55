//! # crashsym - Main Entry Point
//!
//! Loads one image (and optionally its method manifest), resolves each
//! address given on the command line, and prints one frame per address.

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use std::io::{self, Write};

use crashsym::cli::Args;
use crashsym::frame::ResolvedFrame;
use crashsym::image::{LoadedImage, MethodTable};
use crashsym::symbolication::SymbolCache;

// Exit codes
const EXIT_SUCCESS: i32 = 0;
const EXIT_ERROR: i32 = 1;
const EXIT_NOPERM: i32 = 77;

fn main() {
    env_logger::init();
    std::process::exit(match run() {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            let code = exit_code_for(&e);
            eprintln!("error: {e:#}");
            code
        }
    });
}

fn exit_code_for(err: &anyhow::Error) -> i32 {
    let permission_denied = err.chain().any(|cause| {
        cause
            .downcast_ref::<io::Error>()
            .is_some_and(|io_err| io_err.kind() == io::ErrorKind::PermissionDenied)
    });
    if permission_denied {
        EXIT_NOPERM
    } else {
        EXIT_ERROR
    }
}

fn load_image(args: &Args) -> Result<LoadedImage> {
    let mut image = LoadedImage::from_path(&args.binary)
        .with_context(|| format!("Failed to load image {}", args.binary.display()))?;

    if let Some(ref path) = args.methods {
        let methods = MethodTable::from_path(path)
            .with_context(|| format!("Failed to load method manifest {}", path.display()))?;
        image = image.with_methods(methods);
    }

    Ok(image.with_slide(args.slide))
}

fn run() -> Result<()> {
    let args = Args::parse();

    if !args.quiet {
        eprintln!("crashsym v{}", env!("CARGO_PKG_VERSION"));
    }

    let image = load_image(&args)?;
    info!(
        "Loaded {} ({} symbols, slide 0x{:x})",
        image.name(),
        image.symbols().len(),
        image.slide()
    );

    let mut cache = SymbolCache::init().context("Failed to initialize symbol cache")?;
    let frames: Vec<ResolvedFrame> =
        args.addresses.iter().map(|&pc| ResolvedFrame::resolve(&image, &mut cache, pc)).collect();
    cache.free();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if args.json {
        serde_json::to_writer_pretty(&mut out, &frames).context("Failed to write JSON")?;
        writeln!(out)?;
    } else {
        for (i, frame) in frames.iter().enumerate() {
            writeln!(out, "{}", frame.format(i))?;
        }
    }

    if !args.quiet {
        let resolved = frames.iter().filter(|frame| frame.symbol.is_some()).count();
        eprintln!("Resolved {resolved}/{} addresses", frames.len());
    }

    Ok(())
}
