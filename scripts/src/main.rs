use clap::Parser;
use kitchen_scripts::{cli::Cli, errors::ScriptError};
use tracing::Level;

#[tokio::main]
async fn main() -> Result<(), ScriptError> {
    let Cli { global, command } = Cli::parse();

    let max_level = if global.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt().pretty().with_max_level(max_level).init();

    command.run(&global).await
}
