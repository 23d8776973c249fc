use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;

use crate::cli::Output;
use crate::config::MonitorConfig;
use crate::error::MonitorError;
use crate::instance::PathMonitorInstance;
use crate::launcher::{DefaultLauncher, Launcher};
use crate::lister::{DirectoryLister, FsEnumerator, MenuEntry};

#[derive(Args)]
pub struct OpenArgs {
    /// File to open, or an entry name when --monitor is given
    pub target: String,

    /// Resolve TARGET among the menu entries of this monitor
    #[arg(short, long, value_name = "INDEX")]
    pub monitor: Option<usize>,
}

pub async fn execute(args: OpenArgs, config: &MonitorConfig, output: &Output) -> Result<()> {
    let entry = match args.monitor {
        Some(index) => find_in_monitor(config, index, &args.target)?,
        None => {
            let path = PathBuf::from(&args.target);
            if !path.exists() {
                return Err(MonitorError::PathNotFound(path).into());
            }
            MenuEntry {
                display_name: args.target.clone(),
                path,
            }
        }
    };

    DefaultLauncher
        .open_with_default_handler(&entry.path)
        .with_context(|| format!("Failed to open {}", entry.path.display()))?;
    output.success(&format!("Opened {}", entry.display_name));
    Ok(())
}

fn find_in_monitor(config: &MonitorConfig, index: usize, name: &str) -> Result<MenuEntry> {
    let store = Arc::new(super::open_settings(config)?);
    let mut monitor = PathMonitorInstance::child(index, store)?;
    if monitor.watched_path().is_none() {
        anyhow::bail!("Monitor {} has no path set", index);
    }
    if !config.filter.exclude.is_empty() {
        monitor.configure_excludes(&config.filter.exclude, config.filter.full_regex)?;
    }

    let lister = DirectoryLister::new(FsEnumerator).with_max_entries(config.listing.max_entries);
    monitor
        .menu_entries(&lister)
        .into_iter()
        .find(|entry| entry.display_name == name)
        .with_context(|| format!("'{}' is not in the menu of monitor {}", name, index))
}
