use anyhow::Result;
use clap::Parser;

use path_monitor::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.run().await
}
