use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

use crate::cli::Output;
use crate::config::MonitorConfig;
use crate::filter::{ExcludeFlags, ExcludePolicy};
use crate::instance::{PathMonitorInstance, SpawnSchedule};
use crate::lister::{DirectoryLister, FsEnumerator, MenuEntry};
use crate::settings::{MemorySettings, SettingsStore};

#[derive(Args, Default)]
pub struct ListArgs {
    /// Directory to list; lists every configured monitor when omitted
    pub path: Option<PathBuf>,

    /// Comma separated exclude patterns (overrides the configured ones)
    #[arg(short, long)]
    pub exclude: Option<String>,

    /// Treat exclude patterns as regular expressions
    #[arg(long)]
    pub regex: bool,

    /// Include hidden files
    #[arg(long)]
    pub show_hidden: bool,

    /// Leave out directories
    #[arg(long)]
    pub hide_directories: bool,

    /// Leave out symbolic links
    #[arg(long)]
    pub hide_symlinks: bool,

    /// Include editor backup files ending in '~'
    #[arg(long)]
    pub show_doc_temp: bool,

    /// Maximum entries per menu
    #[arg(short = 'n', long)]
    pub max_entries: Option<usize>,

    /// Output format: text, json
    #[arg(short, long, default_value = "text")]
    pub format: String,
}

#[derive(Debug, Serialize)]
struct MonitorMenu {
    index: usize,
    path: Option<PathBuf>,
    entries: Vec<MenuEntry>,
}

pub async fn execute(args: ListArgs, config: &MonitorConfig, output: &Output) -> Result<()> {
    let json = match args.format.to_lowercase().as_str() {
        "text" => false,
        "json" => true,
        _ => return Err(anyhow::anyhow!("Unsupported format: {}. Use text or json", args.format)),
    };

    let lister = DirectoryLister::new(FsEnumerator)
        .with_max_entries(args.max_entries.unwrap_or(config.listing.max_entries));
    let exclude = args.exclude.clone().unwrap_or_else(|| config.filter.exclude.clone());
    let full_regex = args.regex || config.filter.full_regex;

    let menus = match &args.path {
        Some(path) => {
            let policy = directory_policy(&args, config, &exclude, full_regex)?;
            vec![MonitorMenu {
                index: 0,
                path: Some(path.clone()),
                entries: lister.list_entries(path, &policy),
            }]
        }
        None => monitor_menus(config, &lister, &exclude, full_regex, output).await?,
    };

    if json {
        let value = if args.path.is_some() {
            serde_json::to_value(&menus[0].entries)?
        } else {
            serde_json::to_value(&menus)?
        };
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    for menu in &menus {
        let title = match (&args.path, &menu.path) {
            (Some(path), _) => path.display().to_string(),
            (None, Some(path)) => format!("Monitor {}: {}", menu.index, path.display()),
            (None, None) => format!("Monitor {}: no path set", menu.index),
        };
        output.menu(&title, &menu.entries);
    }
    Ok(())
}

fn directory_policy(
    args: &ListArgs,
    config: &MonitorConfig,
    exclude: &str,
    full_regex: bool,
) -> Result<ExcludePolicy> {
    let mut flags = config.filter.flags();
    if args.show_hidden {
        flags.insert(ExcludeFlags::SHOW_HIDDEN);
    }
    if args.hide_directories {
        flags.remove(ExcludeFlags::SHOW_DIRECTORIES);
    }
    if args.hide_symlinks {
        flags.remove(ExcludeFlags::SHOW_SYMLINKS);
    }
    if args.show_doc_temp {
        flags.insert(ExcludeFlags::SHOW_DOC_TEMP);
    }

    let mut policy = ExcludePolicy::from_flags(flags);
    policy
        .configure(exclude, full_regex)
        .with_context(|| format!("Invalid exclude patterns '{}'", exclude))?;
    Ok(policy)
}

async fn monitor_menus(
    config: &MonitorConfig,
    lister: &DirectoryLister,
    exclude: &str,
    full_regex: bool,
    output: &Output,
) -> Result<Vec<MonitorMenu>> {
    let store: Arc<dyn SettingsStore> = match super::open_settings(config) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            output.error(&format!("{}; showing an empty monitor", e));
            Arc::new(MemorySettings::new())
        }
    };

    let mut master = PathMonitorInstance::master(store);
    master.spawn_children(SpawnSchedule::immediate()).await;

    let indices: Vec<usize> = master.members().map(|m| m.index()).collect();
    let mut menus = Vec::with_capacity(indices.len());
    for index in indices {
        let Some(member) = master.member_mut(index) else {
            continue;
        };
        if !exclude.is_empty() {
            member
                .configure_excludes(exclude, full_regex)
                .with_context(|| format!("Invalid exclude patterns '{}'", exclude))?;
        }
        menus.push(MonitorMenu {
            index,
            path: member.watched_path().map(|p| p.to_path_buf()),
            entries: member.menu_entries(lister),
        });
    }

    master.remove();
    menus.sort_by_key(|menu| menu.index);
    Ok(menus)
}
