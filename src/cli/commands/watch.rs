use anyhow::{Context, Result};
use clap::Args;
use std::sync::Arc;

use crate::cli::Output;
use crate::config::MonitorConfig;
use crate::instance::{PathMonitorInstance, SpawnSchedule};
use crate::lister::{DirectoryLister, FsEnumerator};
use crate::settings::{MemorySettings, SettingsStore};
use crate::watch::{ChangeQueue, DirectoryWatcher};

#[derive(Args, Default)]
pub struct WatchArgs {
    /// Comma separated exclude patterns (overrides the configured ones)
    #[arg(short, long)]
    pub exclude: Option<String>,

    /// Treat exclude patterns as regular expressions
    #[arg(long)]
    pub regex: bool,

    /// Start sibling monitors without the startup delay
    #[arg(long)]
    pub no_delay: bool,
}

pub async fn execute(args: WatchArgs, config: &MonitorConfig, output: &Output) -> Result<()> {
    let store: Arc<dyn SettingsStore> = match super::open_settings(config) {
        Ok(store) => {
            output.verbose(&format!("Using settings file {}", store.path().display()));
            Arc::new(store)
        }
        Err(e) => {
            output.error(&format!("{}; changes will not be saved", e));
            Arc::new(MemorySettings::new())
        }
    };

    let schedule = if args.no_delay {
        SpawnSchedule::immediate()
    } else {
        config.spawn
    };
    let mut master = PathMonitorInstance::master(store);
    master.spawn_children(schedule).await;

    let exclude = args.exclude.clone().unwrap_or_else(|| config.filter.exclude.clone());
    let full_regex = args.regex || config.filter.full_regex;
    let indices: Vec<usize> = master.members().map(|m| m.index()).collect();
    if !exclude.is_empty() {
        for &index in &indices {
            if let Some(member) = master.member_mut(index) {
                member
                    .configure_excludes(&exclude, full_regex)
                    .with_context(|| format!("Invalid exclude patterns '{}'", exclude))?;
            }
        }
    }

    let lister = DirectoryLister::new(FsEnumerator).with_max_entries(config.listing.max_entries);
    let mut queue = ChangeQueue::new();
    let mut watchers = Vec::new();

    for member in master.members() {
        let Some(path) = member.watched_path() else {
            output.verbose(&format!("Monitor {} has no path set", member.index()));
            continue;
        };
        match DirectoryWatcher::subscribe(path, queue.notifier(member.index())) {
            Ok(watcher) => watchers.push(watcher),
            Err(e) => output.warning(&format!("Cannot watch {}: {}", path.display(), e)),
        }
        print_menu(member, &lister, output);
    }

    if watchers.is_empty() {
        output.warning(
            "No monitor has a watched path. Add one with 'path-monitor settings add-path <DIR>'",
        );
        master.remove();
        return Ok(());
    }

    output.info(&format!("Watching {} directories, press Ctrl-C to stop", watchers.len()));

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::debug!("Interrupted, stopping monitors");
                break;
            }
            changed = queue.next() => {
                let Some(index) = changed else { break };
                if let Some(member) = master.members().find(|m| m.index() == index) {
                    print_menu(member, &lister, output);
                }
            }
        }
    }

    drop(watchers);
    master.remove();
    output.success("Stopped watching");
    Ok(())
}

fn print_menu(member: &PathMonitorInstance, lister: &DirectoryLister, output: &Output) {
    let title = match member.watched_path() {
        Some(path) => format!("Monitor {}: {}", member.index(), path.display()),
        None => format!("Monitor {}", member.index()),
    };
    output.menu(&title, &member.menu_entries(lister));
}
