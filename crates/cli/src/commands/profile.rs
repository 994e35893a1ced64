//! This module drives a full profile run: it loads the compiler bundle,
//! pulls the transaction, receipt and struct-logger trace from the node,
//! replays the trace through the attribution engine, and renders the
//! per-line gas report.

use async_trait::async_trait;
use clap::Args;
use gasline_core::bundle::CompilerOutput;
use gasline_core::profile::{TxContext, profile_trace};
use gasline_core::report::render;
use gasline_core::{Session, SessionConfig};
use gasline_rpc::EthClient;
use owo_colors::OwoColorize;
use std::error::Error;
use std::io;
use std::path::PathBuf;

/// Arguments for the `profile` subcommand.
#[derive(Args)]
pub struct ProfileArgs {
    /// Path to the compiler output JSON bundle.
    pub compiler_output: PathBuf,

    /// Hash of the transaction to profile (0x...).
    pub tx_hash: String,

    /// Skip sources whose file name contains this substring (repeatable).
    #[arg(long = "skip")]
    pub skip: Vec<String>,

    /// Directory against which bundle source paths are resolved.
    #[arg(long = "src-root", default_value = ".")]
    pub src_root: PathBuf,

    /// JSON-RPC endpoint of the node that executed the transaction.
    #[arg(long = "rpc-endpoint", default_value = "http://localhost:8545")]
    pub rpc_endpoint: String,
}

/// Executes the `profile` subcommand.
#[async_trait]
impl super::Command for ProfileArgs {
    async fn execute(self) -> Result<(), Box<dyn Error>> {
        let bundle = CompilerOutput::load(&self.compiler_output)?;
        let client = EthClient::new(&self.rpc_endpoint)?;

        let tx = client.get_transaction(&self.tx_hash).await?;
        let receipt = client.get_transaction_receipt(&self.tx_hash).await?;
        let ctx = TxContext {
            to: tx.to,
            created: receipt.contract_address.clone(),
        };

        let mut session = Session::new(
            bundle,
            SessionConfig {
                src_root: self.src_root,
                skip: self.skip,
            },
        );

        let (entry_addr, _) = ctx.entry()?;
        let entry = session.contract_at(&client, entry_addr).await?;
        if session.contract(entry).code.is_none() {
            println!("{}", "target is not a contract".yellow());
            return Ok(());
        }

        let trace = client.trace_transaction(&self.tx_hash).await?;
        profile_trace(&mut session, &client, &ctx, &trace.struct_logs).await?;

        if let Some(gas_used) = receipt.gas_used() {
            tracing::debug!("receipt gas used: {gas_used}");
        }

        let stdout = io::stdout();
        render(&session, &mut stdout.lock())?;
        Ok(())
    }
}
