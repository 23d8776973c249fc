use anyhow::{Context, Result};
use clap::{Args, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;

use crate::cli::Output;
use crate::config::MonitorConfig;
use crate::error::MonitorError;
use crate::instance::{MAX_INSTANCES, PathMonitorInstance, instance_count};
use crate::settings::{PATH_KEY, SettingsStore, decode_field, field_count};

#[derive(Args)]
pub struct SettingsArgs {
    #[command(subcommand)]
    pub command: SettingsCommand,
}

#[derive(Subcommand)]
pub enum SettingsCommand {
    /// Show every monitor's path and visibility toggles
    Show,
    /// Print the raw value of a settings key
    Get { key: String },
    /// Set the watched directory of one monitor
    Set {
        /// Directory to watch
        path: PathBuf,

        /// Monitor index
        #[arg(short, long, default_value_t = 0)]
        monitor: usize,
    },
    /// Add a monitor for a directory in the first free slot
    AddPath { path: PathBuf },
    /// Flip one visibility toggle of a monitor
    Toggle {
        toggle: Toggle,

        /// Monitor index
        #[arg(short, long, default_value_t = 0)]
        monitor: usize,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum Toggle {
    Hidden,
    Directories,
    Symlinks,
    DocTemp,
}

pub async fn execute(args: SettingsArgs, config: &MonitorConfig, output: &Output) -> Result<()> {
    let settings = super::open_settings(config)?;
    let settings_path = settings.path().to_path_buf();
    let store: Arc<dyn SettingsStore> = Arc::new(settings);

    match args.command {
        SettingsCommand::Show => {
            output.header("Path monitors");
            output.key_value("Settings file:", &settings_path.display().to_string(), false);

            let raw = store.get_string(PATH_KEY)?;
            let count = instance_count(&raw).unwrap_or_else(|e| {
                output.warning(&e.to_string());
                MAX_INSTANCES
            });
            for index in 0..count {
                let monitor = PathMonitorInstance::child(index, store.clone())?;
                output.category(&format!("Monitor {}", index));
                let path = monitor
                    .watched_path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "(not set)".to_string());
                output.table_row("Path", &path);

                let policy = monitor.policy();
                output.table_row("Hidden files", on_off(policy.show_hidden_files()));
                output.table_row("Directories", on_off(policy.show_directories()));
                output.table_row("Symlinks", on_off(policy.show_symlinks()));
                output.table_row("Backup files (~)", on_off(policy.show_doc_temp_files()));
            }
        }
        SettingsCommand::Get { key } => {
            println!("{}", store.get_string(&key)?);
        }
        SettingsCommand::Set { path, monitor } => {
            let mut instance = PathMonitorInstance::child(monitor, store)?;
            instance.set_watched_path(absolute(path))?;
            if let Some(path) = instance.watched_path() {
                output.success(&format!("Monitor {} now watches {}", monitor, path.display()));
            }
        }
        SettingsCommand::AddPath { path } => {
            let raw = store.get_string(PATH_KEY)?;
            let index = first_free_slot(&raw);
            if index >= MAX_INSTANCES {
                return Err(MonitorError::MaxInstancesExceeded {
                    requested: index + 1,
                    max: MAX_INSTANCES,
                }
                .into());
            }

            let mut instance = PathMonitorInstance::child(index, store)?;
            instance
                .set_watched_path(absolute(path))
                .with_context(|| format!("Could not add monitor {}", index))?;
            output.success(&format!("Added monitor {}", index));
        }
        SettingsCommand::Toggle { toggle, monitor } => {
            let mut instance = PathMonitorInstance::child(monitor, store)?;
            match toggle {
                Toggle::Hidden => instance.toggle_hidden_files()?,
                Toggle::Directories => instance.toggle_directories()?,
                Toggle::Symlinks => instance.toggle_symlinks()?,
                Toggle::DocTemp => instance.toggle_doc_temp_files()?,
            }
            output.success(&format!(
                "Monitor {} exclude flags are now {}",
                monitor,
                instance.policy().flags().encode()
            ));
        }
    }

    Ok(())
}

/// Index of the first monitor without a path, or one past the last
fn first_free_slot(raw: &str) -> usize {
    let count = field_count(raw);
    (0..count)
        .find(|&i| decode_field(raw, i).is_none_or(str::is_empty))
        .unwrap_or(count)
}

fn absolute(path: PathBuf) -> PathBuf {
    std::fs::canonicalize(&path).unwrap_or(path)
}

fn on_off(value: bool) -> &'static str {
    if value { "shown" } else { "hidden" }
}
