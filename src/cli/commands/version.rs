use anyhow::Result;
use clap::Args;

#[derive(Args)]
pub struct VersionArgs {
    /// Show detailed version information
    #[arg(short = 'd', long = "detailed")]
    pub detailed: bool,
}

pub async fn execute(args: VersionArgs) -> Result<()> {
    println!("{} {}", crate::PKG_NAME, crate::VERSION);

    if args.detailed {
        println!("Rust Edition: 2024");
        println!("Max monitors: {}", crate::instance::MAX_INSTANCES);
        println!("Repository: {}", env!("CARGO_PKG_REPOSITORY"));
        println!("License: {}", env!("CARGO_PKG_LICENSE"));
        println!("Description: {}", crate::PKG_DESCRIPTION);
    }
    Ok(())
}
