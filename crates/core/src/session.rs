//! Per-run session state: the three registries and their caches.
//!
//! Sources are reachable by file name always, and additionally by numeric
//! source id once that id has been observed in a source map. Contracts are
//! reachable by address. All caches live for a single profile run and are
//! released as a unit.

use crate::bundle::CompilerOutput;
use crate::contract::{Contract, ContractId};
use crate::pc_map::PcIndexMap;
use crate::result::{Error, Result};
use crate::source::{Source, SourceId, compute_line_offsets};
use crate::source_map::decode_source_map;
use crate::{normalize_address, normalize_hex_string};
use async_trait::async_trait;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Chain collaborator the engine suspends on during replay.
#[async_trait]
pub trait ChainSource: Send + Sync {
    /// Deployed bytecode at `address`, hex with or without `0x` prefix;
    /// empty for non-contract accounts.
    async fn code_at(&self, address: &str) -> Result<String>;
}

/// Per-run configuration for source resolution and filtering.
#[derive(Debug, Clone, Default)]
pub struct SessionConfig {
    /// Directory against which bundle source paths are resolved.
    pub src_root: PathBuf,
    /// Sources whose file name contains any of these substrings are known
    /// but not reported line by line.
    pub skip: Vec<String>,
}

/// Owned state of one profile run.
pub struct Session {
    /// The compiler output bundle the run profiles against.
    pub bundle: CompilerOutput,
    config: SessionConfig,
    sources: Vec<Source>,
    contracts: Vec<Contract>,
    source_by_file: HashMap<String, SourceId>,
    source_by_src_id: HashMap<u32, SourceId>,
    contract_by_addr: HashMap<String, ContractId>,
}

impl Session {
    pub fn new(bundle: CompilerOutput, config: SessionConfig) -> Self {
        Self {
            bundle,
            config,
            sources: Vec::new(),
            contracts: Vec::new(),
            source_by_file: HashMap::new(),
            source_by_src_id: HashMap::new(),
            contract_by_addr: HashMap::new(),
        }
    }

    pub fn source(&self, id: SourceId) -> &Source {
        &self.sources[id.0]
    }

    pub fn source_mut(&mut self, id: SourceId) -> &mut Source {
        &mut self.sources[id.0]
    }

    pub fn contract(&self, id: ContractId) -> &Contract {
        &self.contracts[id.0]
    }

    pub fn contract_mut(&mut self, id: ContractId) -> &mut Contract {
        &mut self.contracts[id.0]
    }

    /// Sources in registration order.
    pub fn sources(&self) -> impl Iterator<Item = (SourceId, &Source)> {
        self.sources
            .iter()
            .enumerate()
            .map(|(idx, source)| (SourceId(idx), source))
    }

    /// Contracts in discovery order; the entry contract comes first.
    pub fn contracts(&self) -> impl Iterator<Item = (ContractId, &Contract)> {
        self.contracts
            .iter()
            .enumerate()
            .map(|(idx, contract)| (ContractId(idx), contract))
    }

    /// Looks up or registers a source by its bundle file name.
    ///
    /// On first creation the skip filters are applied and, for non-skipped
    /// sources, the listing is read and its line-offset table built. A
    /// failed read is not fatal: the source exists with no text and
    /// accounting proceeds without per-line output.
    pub fn source_by_file_name(&mut self, file_name: &str) -> SourceId {
        if let Some(&id) = self.source_by_file.get(file_name) {
            return id;
        }

        let skip = self
            .config
            .skip
            .iter()
            .any(|pattern| file_name.contains(pattern.as_str()));

        let mut source = Source {
            file_name: file_name.to_string(),
            skip,
            ..Default::default()
        };

        if !skip {
            match read_listing(&self.config.src_root, file_name) {
                Ok(text) => {
                    source.line_offsets = Some(compute_line_offsets(&text));
                    source.text = Some(text);
                }
                Err(err) => {
                    tracing::warn!("could not read source '{file_name}': {err}");
                }
            }
        }

        let id = SourceId(self.sources.len());
        self.sources.push(source);
        self.source_by_file.insert(file_name.to_string(), id);
        id
    }

    /// Looks up or registers a source by its compiler-assigned numeric id.
    ///
    /// Resolves the id to a file name via the bundle's source index, then
    /// delegates to the by-file-name path; both paths share one store.
    /// Returns `None` for ids the bundle does not know.
    pub fn source_by_compiler_id(&mut self, src_id: u32) -> Option<SourceId> {
        if let Some(&id) = self.source_by_src_id.get(&src_id) {
            return Some(id);
        }
        let file_name = self.bundle.file_name_of_source_id(src_id)?.to_string();
        let id = self.source_by_file_name(&file_name);
        self.source_by_src_id.insert(src_id, id);
        Some(id)
    }

    /// Looks up or discovers the contract at `address`.
    ///
    /// The skeleton is cached before any I/O so a self-call resolving the
    /// same address cannot recurse. Empty code and a bundle miss both leave
    /// a partial contract behind a warning; a malformed bytecode or source
    /// map is fatal for this contract only.
    pub async fn contract_at(
        &mut self,
        chain: &dyn ChainSource,
        address: &str,
    ) -> Result<ContractId> {
        let address = normalize_address(address);
        if let Some(&id) = self.contract_by_addr.get(&address) {
            return Ok(id);
        }

        let id = ContractId(self.contracts.len());
        self.contracts.push(Contract {
            address: address.clone(),
            ..Default::default()
        });
        self.contract_by_addr.insert(address.clone(), id);

        let code = normalize_hex_string(&chain.code_at(&address).await?)?;
        if code.is_empty() {
            tracing::warn!("no code at address 0x{address}");
            return Ok(id);
        }

        let matched = self
            .bundle
            .find_by_deployed_code(&code)
            .map(|(file_name, name, artifact)| MatchedArtifact {
                file_name: file_name.to_string(),
                name: name.to_string(),
                construction_code: artifact.evm.bytecode.object.clone(),
                source_map: artifact.evm.deployed_bytecode.source_map.clone(),
                constructor_source_map: artifact.evm.bytecode.source_map.clone(),
            });

        let contract = &mut self.contracts[id.0];
        contract.code = Some(code.clone());

        let Some(matched) = matched else {
            tracing::warn!("no contract in bundle matches code at 0x{address}");
            return Ok(id);
        };
        tracing::debug!(
            "matched 0x{address} to {} ({})",
            matched.name,
            matched.file_name
        );

        if let Err(err) = attach_artifact(contract, &code, matched) {
            tracing::warn!("contract at 0x{address} unusable: {err}");
            contract.pc_to_idx = None;
            contract.source_map = None;
            contract.construction_pc_to_idx = None;
            contract.constructor_source_map = None;
        }

        Ok(id)
    }
}

struct MatchedArtifact {
    file_name: String,
    name: String,
    construction_code: String,
    source_map: String,
    constructor_source_map: String,
}

fn attach_artifact(contract: &mut Contract, code: &str, matched: MatchedArtifact) -> Result<()> {
    contract.name = Some(matched.name);
    contract.file_name = Some(matched.file_name);

    contract.pc_to_idx = Some(PcIndexMap::new(&hex::decode(code)?)?);
    contract.source_map = Some(decode_source_map(&matched.source_map)?);

    if !matched.construction_code.is_empty() {
        let construction_bytes = hex::decode(&matched.construction_code)?;
        contract.construction_pc_to_idx = Some(PcIndexMap::new(&construction_bytes)?);
        contract.constructor_source_map = Some(decode_source_map(&matched.constructor_source_map)?);
        contract.construction_code = Some(matched.construction_code);
    }

    Ok(())
}

/// Reads a source listing, first against the configured source root, then as
/// the path given in the bundle.
fn read_listing(src_root: &Path, file_name: &str) -> Result<String> {
    let rooted = src_root.join(file_name);
    match fs::read_to_string(&rooted) {
        Ok(text) => Ok(text),
        Err(_) => fs::read_to_string(file_name).map_err(|e| Error::FileRead {
            path: rooted.display().to_string(),
            source: e,
        }),
    }
}
