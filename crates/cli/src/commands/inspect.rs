//! This module dumps the decoded view the profiler has of a bundle
//! contract: one row per instruction with its program counter, instruction
//! index, and source-map entry.

use async_trait::async_trait;
use clap::Args;
use gasline_core::bundle::CompilerOutput;
use gasline_core::normalize_hex_string;
use gasline_core::pc_map::PcIndexMap;
use gasline_core::source_map::decode_source_map;
use owo_colors::OwoColorize;
use std::error::Error;
use std::path::PathBuf;

/// Arguments for the `inspect` subcommand.
#[derive(Args)]
pub struct InspectArgs {
    /// Path to the compiler output JSON bundle.
    pub compiler_output: PathBuf,

    /// Contract name as it appears in the bundle.
    pub contract: String,

    /// Inspect the constructor bytecode instead of the deployed bytecode.
    #[arg(long)]
    pub constructor: bool,
}

/// Executes the `inspect` subcommand.
#[async_trait]
impl super::Command for InspectArgs {
    async fn execute(self) -> Result<(), Box<dyn Error>> {
        let bundle = CompilerOutput::load(&self.compiler_output)?;
        let (file_name, artifact) = bundle
            .find_by_name(&self.contract)
            .ok_or_else(|| format!("contract '{}' not found in bundle", self.contract))?;

        let bytecode = if self.constructor {
            &artifact.evm.bytecode
        } else {
            &artifact.evm.deployed_bytecode
        };

        let code = hex::decode(normalize_hex_string(&bytecode.object)?)?;
        let pc_map = PcIndexMap::new(&code)?;
        let entries = decode_source_map(&bytecode.source_map)?;

        println!(
            "{} {} ({}, {} bytes, {} instructions)",
            self.contract.bold(),
            if self.constructor {
                "constructor"
            } else {
                "deployed"
            },
            file_name,
            code.len(),
            pc_map.len()
        );

        let mut rows: Vec<(usize, usize)> = pc_map.iter().collect();
        rows.sort_unstable();
        for (pc, idx) in rows {
            match entries.get(idx) {
                Some(entry) => println!(
                    "{pc:>6}  {idx:>6}  {}:{}:{}:{}",
                    entry.offset, entry.length, entry.file, entry.jump
                ),
                None => println!("{pc:>6}  {idx:>6}  <no source-map entry>"),
            }
        }
        Ok(())
    }
}
