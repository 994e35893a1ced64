//! Contracts observed during trace replay.

use crate::pc_map::PcIndexMap;
use crate::source::SourceId;
use crate::source_map::SourceMapEntry;
use std::collections::BTreeMap;

/// Arena handle for a contract discovered during replay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContractId(pub usize);

/// A contract touched by the transaction.
///
/// A contract starts as a skeleton holding only its address; bundle metadata
/// and the decoded maps are attached once its deployed bytecode is fetched
/// and matched. Frames executing a contract with no maps are charged to
/// `synth_gas`.
#[derive(Debug, Default)]
pub struct Contract {
    /// Canonical 40-hex address.
    pub address: String,
    /// Deployed bytecode, hex without `0x`; `None` for non-contract accounts.
    pub code: Option<String>,
    /// Constructor bytecode from the bundle, hex without `0x`.
    pub construction_code: Option<String>,
    /// Contract name from the bundle.
    pub name: Option<String>,
    /// Defining file name from the bundle.
    pub file_name: Option<String>,
    /// Sources referenced by this contract's instructions, keyed by the
    /// compiler's numeric source id; discovered incrementally.
    pub sources_by_id: BTreeMap<u32, SourceId>,
    /// Decoded source map of the deployed bytecode.
    pub source_map: Option<Vec<SourceMapEntry>>,
    /// Decoded source map of the constructor bytecode.
    pub constructor_source_map: Option<Vec<SourceMapEntry>>,
    /// PC → instruction index table of the deployed bytecode.
    pub pc_to_idx: Option<PcIndexMap>,
    /// PC → instruction index table of the constructor bytecode.
    pub construction_pc_to_idx: Option<PcIndexMap>,
    /// Gas consumed in this contract's frames, nested subtrees included.
    pub total_gas: i64,
    /// Gas of instructions that could not be attributed to a source line.
    pub synth_gas: i64,
}

impl Contract {
    /// Resolves a trace step's PC to its source-map entry.
    ///
    /// Selects the constructor tables when the executing frame is a
    /// construction call. Returns `None` when the contract has no maps or
    /// the PC does not start an instruction.
    pub fn instruction_entry(&self, pc: usize, construction: bool) -> Option<SourceMapEntry> {
        let (pc_map, entries) = if construction {
            (
                self.construction_pc_to_idx.as_ref()?,
                self.constructor_source_map.as_ref()?,
            )
        } else {
            (self.pc_to_idx.as_ref()?, self.source_map.as_ref()?)
        };
        entries.get(pc_map.get(pc)?).copied()
    }

    /// Display name for reports.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("<unknown>")
    }
}
