use clap::Parser;
use gasline_cli::commands::{Cmd, Command};
use tracing_subscriber::EnvFilter;

/// Gasline CLI
///
/// Gasline profiles a single EVM transaction and attributes its gas
/// consumption to the source lines of the contracts it executed, folding
/// cross-contract call costs into the calling line.
#[derive(Parser)]
#[command(name = "gasline")]
#[command(about = "Gasline: per-line gas profiler for EVM transactions")]
struct Cli {
    #[command(subcommand)]
    command: Cmd,
}

/// Runs the Gasline CLI with the provided arguments.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .without_time()
        .init();

    let cli = Cli::parse();
    cli.command.execute().await
}
