//! The command pump: reads a command stream line by line, executes
//! each command, and renders the resulting events.

use std::io::Write;

use anyhow::{Context, Result};
use tracing::{debug, warn};

use matchbook_core::Engine;
use matchbook_protocol::{format_event, parse_command};

/// Interpret `input`, writing one report line per event to `out`.
///
/// An optional leading all-numeric line bounds how many commands are
/// interpreted. Blank lines and `#` comments are skipped. A malformed
/// command renders its reject line and stops the stream; capacity
/// exhaustion aborts with an error.
pub fn pump(engine: &mut Engine, input: &str, out: &mut dyn Write) -> Result<()> {
    let mut remaining: Option<u64> = None;
    let mut seen_command = false;

    for raw in input.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if !seen_command && line.bytes().all(|b| b.is_ascii_digit()) {
            remaining = line.parse().ok();
            debug!(count = ?remaining, "bounded command stream");
            seen_command = true;
            continue;
        }
        seen_command = true;

        if remaining == Some(0) {
            break;
        }
        if let Some(n) = remaining.as_mut() {
            *n -= 1;
        }

        match parse_command(line) {
            Ok(command) => {
                let events = engine
                    .execute(command)
                    .context("engine capacity exhausted")?;
                for event in &events {
                    writeln!(out, "{}", format_event(event))?;
                }
            }
            Err(error) => {
                writeln!(out, "{}", format_event(&error.rejection()))?;
                if error.halts_stream() {
                    warn!(%error, line, "halting on malformed command");
                    break;
                }
            }
        }
    }
    Ok(())
}
