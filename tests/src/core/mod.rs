//! Shared fixtures for the core suites: an in-memory chain, trace-step and
//! bundle builders, and scratch source listings on disk.

mod pc_map;
mod session;
mod source_map;
mod trace;

use async_trait::async_trait;
use gasline_core::bundle::CompilerOutput;
use gasline_core::trace::StructLog;
use gasline_core::{ChainSource, Result, normalize_address};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

pub const ADDR_A: &str = "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";
pub const ADDR_B: &str = "bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb";

/// In-memory chain collaborator: address → deployed code hex.
#[derive(Default)]
pub struct MockChain {
    code: HashMap<String, String>,
}

impl MockChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_code(mut self, address: &str, code_hex: &str) -> Self {
        self.code
            .insert(normalize_address(address), code_hex.to_string());
        self
    }
}

#[async_trait]
impl ChainSource for MockChain {
    async fn code_at(&self, address: &str) -> Result<String> {
        Ok(self
            .code
            .get(&normalize_address(address))
            .cloned()
            .unwrap_or_else(|| "0x".to_string()))
    }
}

/// Builds one struct-logger step.
pub fn step(pc: usize, op: &str, gas: i64, gas_cost: i64, depth: i64, stack: &[&str]) -> StructLog {
    StructLog {
        pc,
        op: op.to_string(),
        gas,
        gas_cost,
        depth,
        stack: stack.iter().map(|word| word.to_string()).collect(),
    }
}

/// Parses a bundle from inline JSON.
pub fn bundle(value: serde_json::Value) -> CompilerOutput {
    serde_json::from_value(value).expect("bundle fixture")
}

/// Writes source listings into a per-test scratch directory and returns it.
pub fn scratch_sources(tag: &str, files: &[(&str, &str)]) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("gasline_tests_{tag}"));
    fs::create_dir_all(&dir).expect("scratch dir");
    for (name, text) in files {
        fs::write(dir.join(name), text).expect("write listing");
    }
    dir
}
