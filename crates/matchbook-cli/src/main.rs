//! Command-line driver for the matching engine.
//!
//! Reads a line-oriented command stream (file or stdin), pumps each
//! command through the engine, and writes one report line per event to
//! stdout or a file. Logging goes to stderr so reports stay clean.

mod config;
mod pump;

use std::fs;
use std::io::{self, BufWriter, Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use matchbook_core::Engine;

use crate::config::Config;
use crate::pump::pump;

#[derive(Parser)]
#[command(name = "matchbook")]
#[command(about = "Equity limit-order matching engine driven by a line command stream")]
struct Cli {
    /// Command file to interpret; `-` or absent reads stdin.
    input: Option<PathBuf>,

    /// Write reports here instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Enable debug logging regardless of RUST_LOG.
    #[arg(long)]
    debug: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let config = Config::from_env()?;
    let input = read_input(cli.input.as_deref())?;
    let mut engine = Engine::with_book_capacity(config.book_capacity);

    match cli.output {
        Some(path) => {
            let file = fs::File::create(&path)
                .with_context(|| format!("creating {}", path.display()))?;
            let mut out = BufWriter::new(file);
            pump(&mut engine, &input, &mut out)?;
            out.flush()?;
        }
        None => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            pump(&mut engine, &input, &mut out)?;
        }
    }
    Ok(())
}

fn read_input(path: Option<&std::path::Path>) -> Result<String> {
    match path {
        Some(p) if p.as_os_str() != "-" => {
            fs::read_to_string(p).with_context(|| format!("reading {}", p.display()))
        }
        _ => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("reading stdin")?;
            Ok(buf)
        }
    }
}
