//! Integration tests for the kitchen game contracts. These assume that a devnet
//! is already running locally and that every migration has been run against it.

#![deny(missing_docs)]

mod test_args;
mod test_inventory;
mod tests;
mod util;

use std::path::PathBuf;

use clap::Parser;
use colored::Colorize;
use eyre::{bail, Result};
use kitchen_scripts::constants::{
    DEFAULT_ARTIFACTS_DIR, DEFAULT_DEPLOYMENTS_PATH, DEFAULT_DEVNET_PKEY, DEFAULT_DEVNET_RPC_URL,
};
use test_args::TestArgs;
use test_inventory::IntegrationTest;
use tracing::Level;

/// The CLI arguments for the integration tests
#[derive(Debug, Clone, Parser)]
struct CliArgs {
    /// The path to the deployments file
    #[clap(long, default_value = DEFAULT_DEPLOYMENTS_PATH)]
    deployments: PathBuf,
    /// The directory of compiled contract artifacts, used by upgrade tests
    #[clap(long, default_value = DEFAULT_ARTIFACTS_DIR)]
    artifacts: PathBuf,
    /// The private key to use for testing
    #[clap(short = 'p', long, env = "PKEY", default_value = DEFAULT_DEVNET_PKEY)]
    pkey: String,
    /// The RPC url to run the tests against
    #[clap(short = 'r', long, env = "RPC_URL", default_value = DEFAULT_DEVNET_RPC_URL)]
    rpc_url: String,

    // --- Test Harness Args --- //
    /// Only run tests whose name contains this string
    #[arg(short, long)]
    test: Option<String>,
    /// Show the scripts' logs
    #[arg(short, long)]
    verbose: bool,
}

// --------------
// | Entrypoint |
// --------------

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();
    let max_level = if cli_args.verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt().pretty().with_max_level(max_level).init();

    let args = TestArgs::new(&cli_args).await?;
    println!("running against block {}", args.block_number().await?);

    let mut ran = 0;
    let mut failed = Vec::new();
    for test in inventory::iter::<IntegrationTest> {
        if let Some(filter) = cli_args.test.as_deref() {
            if !test.name.contains(filter) {
                continue;
            }
        }

        ran += 1;
        match (test.test_fn)(args.clone()).await {
            Ok(()) => println!("{} {}", "PASSED".green().bold(), test.name),
            Err(e) => {
                println!("{} {}: {e:#}", "FAILED".red().bold(), test.name);
                failed.push(test.name);
            }
        }
    }

    if ran == 0 {
        bail!("no tests matched");
    }
    if !failed.is_empty() {
        bail!("{} of {ran} tests failed: {}", failed.len(), failed.join(", "));
    }

    println!("{}", format!("all {ran} tests passed").green().bold());
    Ok(())
}
