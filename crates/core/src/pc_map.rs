//! Mapping from program counters to instruction indices.
//!
//! Source maps are indexed by instruction, traces by program counter. The
//! bridge is a single left-to-right walk over the bytecode that numbers each
//! opcode start and steps over PUSH immediates.

use crate::result::{Error, Result};
use std::collections::HashMap;

const PUSH1: u8 = 0x60;
const PUSH32: u8 = 0x7f;

/// Maps each opcode-start program counter to its 0-based instruction index.
///
/// Program counters inside PUSH immediates have no entry; a valid trace
/// never reports them.
#[derive(Debug, Clone, Default)]
pub struct PcIndexMap {
    inner: HashMap<usize, usize>,
}

impl PcIndexMap {
    /// Walks `code` and builds the table.
    ///
    /// Fails with [`Error::BytecodeTruncated`] when a PUSH's immediates
    /// extend past the end of the bytecode.
    pub fn new(code: &[u8]) -> Result<Self> {
        let mut inner = HashMap::with_capacity(code.len());

        let mut pc = 0usize;
        let mut idx = 0usize;
        while pc < code.len() {
            inner.insert(pc, idx);
            idx += 1;

            let byte = code[pc];
            if (PUSH1..=PUSH32).contains(&byte) {
                // Skip the push bytes.
                let push_size = (byte - PUSH1 + 1) as usize;
                let available = code.len() - pc - 1;
                if push_size > available {
                    return Err(Error::BytecodeTruncated {
                        pc,
                        needed: push_size,
                        available,
                    });
                }
                pc += push_size;
            }

            pc += 1;
        }

        inner.shrink_to_fit();
        Ok(Self { inner })
    }

    /// Returns the instruction index for the given program counter.
    pub fn get(&self, pc: usize) -> Option<usize> {
        self.inner.get(&pc).copied()
    }

    /// Returns the number of instructions in the map.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns `true` if the map is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Iterates over `(pc, instruction index)` pairs in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.inner.iter().map(|(&pc, &idx)| (pc, idx))
    }
}
