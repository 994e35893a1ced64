//! Source listings and their per-line gas accounting.

use std::collections::{BTreeMap, BTreeSet};

/// Arena handle for a registered source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SourceId(pub usize);

/// One source file referenced by the profiled contracts.
///
/// Created on demand the first time an instruction references the file.
/// `text` stays `None` for skipped and unreadable sources; attribution then
/// proceeds without per-line output.
#[derive(Debug, Default)]
pub struct Source {
    /// Path as it appears in the compiler bundle.
    pub file_name: String,
    /// True if a configured skip substring matched the file name.
    pub skip: bool,
    /// Full file contents, if the listing could be read.
    pub text: Option<String>,
    /// Byte offset of the start of each line; offset 0 for line 0.
    pub line_offsets: Option<Vec<usize>>,
    /// Accumulated gas per 0-based line index.
    pub line_gas: BTreeMap<usize, i64>,
    /// Lines containing at least one outgoing call.
    pub lines_with_calls: BTreeSet<usize>,
}

impl Source {
    /// Maps a source byte offset to its 0-based line index.
    ///
    /// Picks the largest line-start offset that is `<=` the given offset.
    /// Returns `None` when no text was loaded.
    pub fn line_of_offset(&self, offset: usize) -> Option<usize> {
        let offsets = self.line_offsets.as_ref()?;
        match offsets.binary_search(&offset) {
            Ok(line) => Some(line),
            Err(0) => Some(0),
            Err(insert_at) => Some(insert_at - 1),
        }
    }

    /// Adds gas to a line's counter.
    pub fn add_gas(&mut self, line: usize, amount: i64) {
        *self.line_gas.entry(line).or_insert(0) += amount;
    }

    /// Flags a line as containing an outgoing call.
    pub fn mark_call(&mut self, line: usize) {
        self.lines_with_calls.insert(line);
    }

    /// Total gas attributed to this source's lines.
    pub fn total_line_gas(&self) -> i64 {
        self.line_gas.values().sum()
    }
}

/// Computes the line-start offset table for a source text.
///
/// Lines are split on LF only; each line start is the byte after the
/// previous newline.
pub fn compute_line_offsets(text: &str) -> Vec<usize> {
    let mut offsets = vec![0];
    for (idx, byte) in text.bytes().enumerate() {
        if byte == b'\n' {
            offsets.push(idx + 1);
        }
    }
    offsets
}
