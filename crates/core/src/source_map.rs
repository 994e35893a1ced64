//! Decoder for the compiler's compressed source-map format.
//!
//! The raw text is `s:l:f:j;s:l:f:j;…` with one segment per instruction.
//! Absent or empty fields inherit the value of the same field from the
//! previous entry, so the decoder is an explicit fold that carries the last
//! fully-populated entry forward.

use crate::result::{Error, Result};

/// One decoded source-map entry, fully populated by the decode fold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceMapEntry {
    /// Byte offset of the mapped range in the source file.
    pub offset: i64,
    /// Length of the mapped range.
    pub length: i64,
    /// Numeric source id; `-1` marks compiler-generated instructions.
    pub file: i64,
    /// Jump tag (`i`/`o`/`-`), carried opaquely.
    pub jump: char,
}

impl SourceMapEntry {
    /// Returns true if the instruction has no source of its own.
    pub fn is_synthetic(&self) -> bool {
        self.file < 0
    }
}

const SEED: SourceMapEntry = SourceMapEntry {
    offset: 0,
    length: 0,
    file: -1,
    jump: '-',
};

/// Decodes raw source-map text into one entry per instruction.
///
/// The entry count equals the number of `;`-separated segments, which the
/// compiler emits one-to-one with the instruction stream.
pub fn decode_source_map(raw: &str) -> Result<Vec<SourceMapEntry>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(Vec::new());
    }

    let mut entries = Vec::new();
    let mut prev = SEED;

    for (segment_idx, segment) in raw.split(';').enumerate() {
        let mut entry = prev;
        for (field_idx, field) in segment.split(':').take(4).enumerate() {
            if field.is_empty() {
                continue;
            }
            match field_idx {
                0 => entry.offset = parse_field(field, segment_idx, segment)?,
                1 => entry.length = parse_field(field, segment_idx, segment)?,
                2 => entry.file = parse_field(field, segment_idx, segment)?,
                _ => {
                    entry.jump = field.chars().next().ok_or_else(|| Error::SourceMapMalformed {
                        segment: segment_idx,
                        msg: "empty jump tag".to_string(),
                        raw: segment.to_string(),
                    })?;
                }
            }
        }
        entries.push(entry);
        prev = entry;
    }

    Ok(entries)
}

fn parse_field(field: &str, segment_idx: usize, segment: &str) -> Result<i64> {
    field.parse::<i64>().map_err(|_| Error::SourceMapMalformed {
        segment: segment_idx,
        msg: format!("invalid integer field `{field}`"),
        raw: segment.to_string(),
    })
}
