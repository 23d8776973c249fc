use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::cli::Output;
use crate::config::MonitorConfig;
use crate::settings::FileSettings;

pub mod config;
pub mod list;
pub mod open;
pub mod settings;
pub mod version;
pub mod watch;

#[derive(Parser)]
#[command(
    name = "path-monitor",
    version = env!("CARGO_PKG_VERSION"),
    about = "Watch directories and list their files through filtered menus",
    long_about = "path-monitor keeps up to five directory monitors, each listing the \
                  entries of one watched directory through its own exclude filter, \
                  and refreshes them when the directories change."
)]
pub struct Cli {
    /// Increase verbosity (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Use custom configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Use this settings file instead of the configured one
    #[arg(long, global = true, value_name = "FILE")]
    pub settings: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the menu of a directory, or of every configured monitor
    List(list::ListArgs),
    /// Watch the configured directories and reprint menus on change
    Watch(watch::WatchArgs),
    /// Open a file with the desktop's default application
    Open(open::OpenArgs),
    /// Inspect and edit the persisted monitor settings
    Settings(settings::SettingsArgs),
    /// Configuration management
    Config(config::ConfigArgs),
    /// Show version information
    Version(version::VersionArgs),
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        setup_logging(self.verbose, self.quiet);

        let output = Output::new(self.verbose > 0, self.quiet);
        let mut config = MonitorConfig::load_with_custom_config(self.config.as_deref())?;
        if let Some(settings) = &self.settings {
            config.settings.file = settings.display().to_string();
            config.settings.fallback = config.settings.file.clone();
        }

        match self.command {
            Some(Commands::List(args)) => list::execute(args, &config, &output).await,
            Some(Commands::Watch(args)) => watch::execute(args, &config, &output).await,
            Some(Commands::Open(args)) => open::execute(args, &config, &output).await,
            Some(Commands::Settings(args)) => settings::execute(args, &config, &output).await,
            Some(Commands::Config(args)) => config::execute(args, &config).await,
            Some(Commands::Version(args)) => version::execute(args).await,
            None => {
                output.info("Run 'path-monitor --help' for usage information");
                Ok(())
            }
        }
    }
}

/// Open the persisted settings store.
///
/// Uses the primary file, or an existing fallback file when the primary does
/// not exist yet. When neither exists the primary is created on first write.
pub(crate) fn open_settings(config: &MonitorConfig) -> Result<FileSettings> {
    let primary = config.settings.primary_path();
    let fallback = config.settings.fallback_path();

    if !primary.is_file() && !fallback.is_file() {
        tracing::debug!("No settings yet, will create {}", primary.display());
        return Ok(FileSettings::open(primary)?);
    }
    Ok(FileSettings::discover(&primary, &fallback)?)
}

fn setup_logging(verbose: u8, quiet: bool) {
    if quiet {
        return;
    }

    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let directives = match verbose {
            0 => "warn",
            1 => "info,notify=warn",
            2 => "debug,notify=warn",
            _ => "trace",
        };
        tracing_subscriber::EnvFilter::new(directives)
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
