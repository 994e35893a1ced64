//! Typed view of the compiler output bundle.
//!
//! Only the fields the profiler consumes are modeled; everything else in the
//! solc standard-JSON output is ignored during deserialization.

use crate::result::{Error, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Compiler output bundle: source index plus per-contract artifacts.
#[derive(Debug, Default, Deserialize)]
pub struct CompilerOutput {
    /// `sources[fileName].id` is the canonical numeric source id.
    #[serde(default)]
    pub sources: HashMap<String, SourceIndexEntry>,
    /// Artifacts keyed by defining file name, then by contract name.
    #[serde(default)]
    pub contracts: HashMap<String, HashMap<String, ContractArtifact>>,
}

/// Entry of the bundle's source index.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct SourceIndexEntry {
    pub id: u32,
}

/// Compiled artifact of a single contract.
#[derive(Debug, Default, Deserialize)]
pub struct ContractArtifact {
    #[serde(default)]
    pub evm: EvmArtifact,
}

/// The `evm` section of a contract artifact.
#[derive(Debug, Default, Deserialize)]
pub struct EvmArtifact {
    /// Constructor bytecode and its source map.
    #[serde(default)]
    pub bytecode: BytecodeArtifact,
    /// Deployed bytecode and its source map.
    #[serde(rename = "deployedBytecode", default)]
    pub deployed_bytecode: BytecodeArtifact,
}

/// One bytecode object with its raw source map.
#[derive(Debug, Default, Deserialize)]
pub struct BytecodeArtifact {
    /// Hex string without `0x` prefix.
    #[serde(default)]
    pub object: String,
    #[serde(rename = "sourceMap", default)]
    pub source_map: String,
}

impl CompilerOutput {
    /// Loads and parses a bundle from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| Error::FileRead {
            path: path.display().to_string(),
            source: e,
        })?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Resolves a numeric source id to its file name via the source index.
    pub fn file_name_of_source_id(&self, id: u32) -> Option<&str> {
        self.sources
            .iter()
            .find(|(_, entry)| entry.id == id)
            .map(|(file_name, _)| file_name.as_str())
    }

    /// Finds the contract whose deployed bytecode exactly equals `code_hex`.
    ///
    /// Exact string equality is the only reliable identity: bytecode can
    /// differ between contracts with identical source due to linker
    /// references, so nothing weaker is attempted.
    pub fn find_by_deployed_code(
        &self,
        code_hex: &str,
    ) -> Option<(&str, &str, &ContractArtifact)> {
        for (file_name, by_name) in &self.contracts {
            for (name, artifact) in by_name {
                if artifact.evm.deployed_bytecode.object == code_hex {
                    return Some((file_name.as_str(), name.as_str(), artifact));
                }
            }
        }
        None
    }

    /// Finds a contract artifact by its bundle name.
    pub fn find_by_name(&self, contract_name: &str) -> Option<(&str, &ContractArtifact)> {
        for (file_name, by_name) in &self.contracts {
            if let Some(artifact) = by_name.get(contract_name) {
                return Some((file_name.as_str(), artifact));
            }
        }
        None
    }
}
