//! Text rendering of a completed profile run.

use crate::session::Session;
use std::io::{self, Write};

/// Writes the per-contract summary followed by the per-line listings.
///
/// Contracts appear in discovery order. Line listings are emitted only for
/// non-skipped sources whose text was loaded; each line is prefixed by its
/// accumulated gas and a `+` marker when it contains an outgoing call. The
/// legend trails the report iff at least one marker was printed.
pub fn render<W: Write>(session: &Session, out: &mut W) -> io::Result<()> {
    for (_, contract) in session.contracts() {
        writeln!(out)?;
        writeln!(
            out,
            "contract: {} @ 0x{}",
            contract.display_name(),
            contract.address
        )?;
        if let Some(file_name) = &contract.file_name {
            writeln!(out, "  defined in: {file_name}")?;
        }
        let referenced: Vec<&str> = contract
            .sources_by_id
            .values()
            .map(|&id| session.source(id).file_name.as_str())
            .collect();
        if !referenced.is_empty() {
            writeln!(out, "  sources: {}", referenced.join(", "))?;
        }
        writeln!(out, "  synthetic instruction gas: {}", contract.synth_gas)?;
        writeln!(out, "  total gas in contract: {}", contract.total_gas)?;
    }

    let mut any_calls = false;
    for (_, source) in session.sources() {
        if source.skip {
            continue;
        }
        let Some(text) = &source.text else { continue };

        writeln!(out)?;
        writeln!(out, "{}:", source.file_name)?;
        for (line_no, line) in text.split('\n').enumerate() {
            let gas = source.line_gas.get(&line_no).copied().unwrap_or(0);
            let marker = if source.lines_with_calls.contains(&line_no) {
                any_calls = true;
                '+'
            } else {
                ' '
            };
            writeln!(out, "{gas:>9} {marker} {line}")?;
        }
    }

    if any_calls {
        writeln!(out)?;
        writeln!(out, "lines marked '+' fold in the gas of their outgoing calls")?;
    }

    Ok(())
}
