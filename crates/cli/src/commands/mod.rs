use async_trait::async_trait;
use clap::Subcommand;
use std::error::Error;

pub mod inspect;
pub mod profile;

/// CLI subcommands for Gasline.
#[derive(Subcommand)]
pub enum Cmd {
    /// Profile a transaction's gas usage per source line.
    Profile(profile::ProfileArgs),
    /// Dump a bundle contract's instruction and source-map table.
    Inspect(inspect::InspectArgs),
}

/// Trait for executing CLI subcommands.
#[async_trait]
pub trait Command {
    /// Executes the subcommand.
    ///
    /// # Returns
    /// A `Result` indicating success or an error if execution fails.
    async fn execute(self) -> Result<(), Box<dyn Error>>;
}

#[async_trait]
impl Command for Cmd {
    async fn execute(self) -> Result<(), Box<dyn Error>> {
        match self {
            Cmd::Profile(args) => args.execute().await,
            Cmd::Inspect(args) => args.execute().await,
        }
    }
}
