//! # path-monitor - filtered directory menus that follow the filesystem
//!
//! path-monitor keeps a small family of directory monitors. Each monitor
//! watches one directory, lists its entries through its own exclude filter,
//! and hands `(name, path)` pairs to a menu renderer or launcher.
//!
//! ## Features
//!
//! - **Exclude filters**: simple `*` globs or full regular expressions, plus
//!   toggles for hidden files, directories, symlinks and `~` backup files
//! - **Multi-instance**: up to five monitors share one settings store, each
//!   owning one slot of every comma-joined setting
//! - **Live refresh**: change notification through `notify`, coalesced so a
//!   burst of events triggers one refresh
//!
//! ## Quick Start
//!
//! ```bash
//! # Add a monitor for your notes
//! path-monitor settings add-path ~/notes
//!
//! # Print its menu once, or keep it up to date
//! path-monitor list
//! path-monitor watch
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod filter;
pub mod instance;
pub mod launcher;
pub mod lister;
pub mod settings;
pub mod shared;
pub mod watch;

pub use cli::{Cli, Output};
pub use config::MonitorConfig;
pub use error::{MonitorError, Result};
pub use filter::{ExcludeFlags, ExcludePolicy, FilterPolicy};
pub use instance::{MAX_INSTANCES, PathMonitorInstance};
pub use lister::{DirectoryLister, MenuEntry};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
pub const PKG_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
