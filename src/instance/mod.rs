//! Path monitor instances
//!
//! A monitor family is one master instance plus the children it spawns. The
//! master's index is the number of stored watched paths minus one; it creates
//! one child per remaining index, counting down to 0. Each instance owns its
//! watched path and exclude policy and reads/writes only its own slot of the
//! shared settings.
//!
//! ```text
//! Uninitialized ──▶ MasterPending ──▶ MasterActive ──┐
//!       │          (index 0 skips pending)           ├──▶ Removed
//!       └────────▶ ChildActive ─────────────────────┘
//! ```

pub mod spawn;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::{MonitorError, Result};
use crate::filter::{ExcludeFlags, ExcludePolicy};
use crate::lister::{DirectoryEnumerator, DirectoryLister, MenuEntry};
use crate::settings::{EXCLUDE_FLAGS_KEY, InstanceField, PATH_KEY, SettingsStore, field_count};
use crate::shared::PATTERN_DELIMITER;

pub use spawn::SpawnSchedule;

/// Maximum number of instances in one family
pub const MAX_INSTANCES: usize = 5;

/// Lifecycle state of an instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstanceState {
    Uninitialized,
    /// Master waiting for its children to be created
    MasterPending,
    MasterActive,
    ChildActive,
    Removed,
}

/// Number of instances described by a stored path value
pub fn instance_count(raw_paths: &str) -> Result<usize> {
    let requested = field_count(raw_paths);
    if requested > MAX_INSTANCES {
        return Err(MonitorError::MaxInstancesExceeded {
            requested,
            max: MAX_INSTANCES,
        });
    }
    Ok(requested)
}

/// One logical path monitor
pub struct PathMonitorInstance {
    index: usize,
    state: InstanceState,
    watched_path: Option<PathBuf>,
    policy: ExcludePolicy,
    store: Arc<dyn SettingsStore>,
    path_field: InstanceField,
    flags_field: InstanceField,
    children: Vec<PathMonitorInstance>,
}

impl std::fmt::Debug for PathMonitorInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PathMonitorInstance")
            .field("index", &self.index)
            .field("state", &self.state)
            .field("watched_path", &self.watched_path)
            .field("flags", &self.policy.flags())
            .field("children", &self.children)
            .finish()
    }
}

impl PathMonitorInstance {
    /// Create the master instance of a family.
    ///
    /// Indices at or beyond [`MAX_INSTANCES`] are rejected and logged; the
    /// master then takes the highest allowed index.
    pub fn master(store: Arc<dyn SettingsStore>) -> Self {
        let count = match store.get_string(PATH_KEY) {
            Ok(raw) => match instance_count(&raw) {
                Ok(count) => count,
                Err(e) => {
                    tracing::error!("{}; ignoring the extra paths", e);
                    MAX_INSTANCES
                }
            },
            Err(e) => {
                tracing::error!("Cannot read watched paths, starting a single monitor: {}", e);
                1
            }
        };

        let mut master = Self::load(count - 1, store);
        master.state = if master.index > 0 {
            InstanceState::MasterPending
        } else {
            InstanceState::MasterActive
        };
        tracing::debug!("Set to master instance, index={}", master.index);
        master
    }

    /// Create a child instance with a fixed index
    pub fn child(index: usize, store: Arc<dyn SettingsStore>) -> Result<Self> {
        if index >= MAX_INSTANCES {
            return Err(MonitorError::MaxInstancesExceeded {
                requested: index + 1,
                max: MAX_INSTANCES,
            });
        }

        let mut child = Self::load(index, store);
        child.state = InstanceState::ChildActive;
        Ok(child)
    }

    fn load(index: usize, store: Arc<dyn SettingsStore>) -> Self {
        let path_field = InstanceField::new(store.clone(), PATH_KEY, index);
        let flags_field = InstanceField::new(store.clone(), EXCLUDE_FLAGS_KEY, index);

        let watched_path = match path_field.get() {
            Ok(path) => path.filter(|p| !p.is_empty()).map(PathBuf::from),
            Err(e) => {
                tracing::error!("Instance {} starts without a path: {}", index, e);
                None
            }
        };

        let flags = match flags_field.get() {
            Ok(field) => ExcludeFlags::decode(field.as_deref()),
            Err(e) => {
                tracing::error!("Instance {} uses default exclude flags: {}", index, e);
                ExcludeFlags::default()
            }
        };

        Self {
            index,
            state: InstanceState::Uninitialized,
            watched_path,
            policy: ExcludePolicy::from_flags(flags),
            store,
            path_field,
            flags_field,
            children: Vec::new(),
        }
    }

    /// Create the master's siblings, one delayed task per index.
    ///
    /// Does nothing unless the master is still pending.
    pub async fn spawn_children(&mut self, schedule: SpawnSchedule) {
        if self.state != InstanceState::MasterPending {
            return;
        }

        tracing::debug!("Spawning {} sibling monitors", self.index);
        let handles: Vec<_> = (0..self.index)
            .map(|n| {
                let child_index = self.index - 1 - n;
                let delay = schedule.delay_for(n);
                let store = self.store.clone();
                tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    PathMonitorInstance::child(child_index, store)
                })
            })
            .collect();

        for handle in handles {
            match handle.await {
                Ok(Ok(child)) => {
                    tracing::debug!("Spawned monitor instance {}", child.index);
                    self.children.push(child);
                }
                Ok(Err(e)) => tracing::error!("Rejected monitor instance: {}", e),
                Err(e) => tracing::error!("Monitor spawn task failed: {}", e),
            }
        }

        self.state = InstanceState::MasterActive;
    }

    /// Detach the whole family. Children are removed with their master.
    pub fn remove(&mut self) {
        for child in &mut self.children {
            tracing::debug!("Removing child monitor {}", child.index);
            child.remove();
        }
        self.state = InstanceState::Removed;
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn state(&self) -> InstanceState {
        self.state
    }

    pub fn watched_path(&self) -> Option<&Path> {
        self.watched_path.as_deref()
    }

    pub fn policy(&self) -> &ExcludePolicy {
        &self.policy
    }

    pub fn children(&self) -> &[PathMonitorInstance] {
        &self.children
    }

    /// This instance followed by its children, highest index first
    pub fn members(&self) -> impl Iterator<Item = &PathMonitorInstance> {
        std::iter::once(self).chain(self.children.iter())
    }

    /// Find a family member by index
    pub fn member_mut(&mut self, index: usize) -> Option<&mut PathMonitorInstance> {
        if self.index == index {
            return Some(self);
        }
        self.children.iter_mut().find(|c| c.index == index)
    }

    /// Watch a new directory and remember it.
    ///
    /// The path must exist. When persisting fails the new path is still used
    /// for this session and the settings error is returned.
    pub fn set_watched_path(&mut self, path: impl Into<PathBuf>) -> Result<()> {
        let path = path.into();
        if !path.exists() {
            tracing::error!("Path not found, or inaccessible: {}", path.display());
            return Err(MonitorError::PathNotFound(path));
        }

        let value = path.to_string_lossy().into_owned();
        if value.contains(PATTERN_DELIMITER) {
            return Err(MonitorError::InvalidFieldValue(value));
        }

        tracing::debug!("Setting and monitoring new path={}", path.display());
        self.watched_path = Some(path);

        self.path_field.set(&value).inspect_err(|e| {
            tracing::error!("Instance {} path will not survive a restart: {}", self.index, e);
        })
    }

    /// Replace the exclude patterns; a rejected pattern keeps the old ones
    pub fn configure_excludes(&mut self, pattern: &str, full_regex: bool) -> Result<()> {
        self.policy.configure(pattern, full_regex)
    }

    pub fn toggle_hidden_files(&mut self) -> Result<()> {
        self.policy.toggle_hidden_files();
        self.save_flags()
    }

    pub fn toggle_directories(&mut self) -> Result<()> {
        self.policy.toggle_directories();
        self.save_flags()
    }

    pub fn toggle_symlinks(&mut self) -> Result<()> {
        self.policy.toggle_symlinks();
        self.save_flags()
    }

    pub fn toggle_doc_temp_files(&mut self) -> Result<()> {
        self.policy.toggle_doc_temp_files();
        self.save_flags()
    }

    fn save_flags(&self) -> Result<()> {
        self.flags_field.set(&self.policy.flags().encode()).inspect_err(|e| {
            tracing::error!("Instance {} exclude flags not saved: {}", self.index, e);
        })
    }

    /// Current menu for this instance; empty when no path is set
    pub fn menu_entries<E: DirectoryEnumerator>(
        &self,
        lister: &DirectoryLister<E>,
    ) -> Vec<MenuEntry> {
        match &self.watched_path {
            Some(path) => lister.list_entries(path, &self.policy),
            None => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lister::FsEnumerator;
    use crate::settings::MemorySettings;
    use std::fs;
    use tempfile::TempDir;

    fn store_with(paths: &str, flags: &str) -> Arc<dyn SettingsStore> {
        Arc::new(MemorySettings::with_values([(PATH_KEY, paths), (EXCLUDE_FLAGS_KEY, flags)]))
    }

    /// Store whose backing file can be neither read nor written
    struct FailingStore;

    impl SettingsStore for FailingStore {
        fn get_string(&self, key: &str) -> Result<String> {
            Err(MonitorError::SettingsUnavailable(format!("cannot read {}", key)))
        }

        fn set_string(&self, key: &str, _value: &str) -> Result<()> {
            Err(MonitorError::SettingsUnavailable(format!("cannot write {}", key)))
        }
    }

    #[test]
    fn test_instance_count() {
        assert_eq!(instance_count("").unwrap(), 1);
        assert_eq!(instance_count("/a,/b,/c").unwrap(), 3);
        assert!(matches!(
            instance_count("1,2,3,4,5,6"),
            Err(MonitorError::MaxInstancesExceeded { requested: 6, max: 5 })
        ));
    }

    #[test]
    fn test_single_master_is_active_immediately() {
        let master = PathMonitorInstance::master(store_with("", ""));
        assert_eq!(master.index(), 0);
        assert_eq!(master.state(), InstanceState::MasterActive);
        assert!(master.watched_path().is_none());
    }

    #[test]
    fn test_master_reads_its_own_slot() {
        let master = PathMonitorInstance::master(store_with("/a,/b,/c", "6,6,15"));
        assert_eq!(master.index(), 2);
        assert_eq!(master.state(), InstanceState::MasterPending);
        assert_eq!(master.watched_path(), Some(Path::new("/c")));
        assert!(master.policy().show_hidden_files());
        assert!(master.policy().show_doc_temp_files());
    }

    #[test]
    fn test_master_without_readable_settings_starts_alone() {
        let master = PathMonitorInstance::master(Arc::new(FailingStore));
        assert_eq!(master.index(), 0);
        assert_eq!(master.state(), InstanceState::MasterActive);
        assert!(master.watched_path().is_none());
        assert_eq!(master.policy().flags(), ExcludeFlags::default());
    }

    #[test]
    fn test_set_watched_path_keeps_path_when_not_saved() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let mut master = PathMonitorInstance::master(Arc::new(FailingStore));

        let err = master.set_watched_path(temp_dir.path()).unwrap_err();
        assert!(matches!(err, MonitorError::SettingsUnavailable(_)));
        assert_eq!(master.watched_path(), Some(temp_dir.path()));
        Ok(())
    }

    #[test]
    fn test_master_clamps_excess_instances() {
        let master = PathMonitorInstance::master(store_with("/1,/2,/3,/4,/5,/6,/7", ""));
        assert_eq!(master.index(), MAX_INSTANCES - 1);
        assert_eq!(master.watched_path(), Some(Path::new("/5")));
    }

    #[test]
    fn test_child_beyond_limit_is_rejected() {
        assert!(matches!(
            PathMonitorInstance::child(5, store_with("", "")),
            Err(MonitorError::MaxInstancesExceeded { .. })
        ));
    }

    #[test]
    fn test_short_flags_field_uses_defaults() {
        let child = PathMonitorInstance::child(1, store_with("/a,/b", "1")).unwrap();
        assert_eq!(child.state(), InstanceState::ChildActive);
        assert_eq!(child.policy().flags(), ExcludeFlags::default());
    }

    #[tokio::test]
    async fn test_spawn_children_counts_down() {
        let mut master = PathMonitorInstance::master(store_with("/a,/b,/c", ""));
        master.spawn_children(SpawnSchedule::immediate()).await;

        assert_eq!(master.state(), InstanceState::MasterActive);
        let indices: Vec<usize> = master.members().map(|m| m.index()).collect();
        assert_eq!(indices, vec![2, 1, 0]);
        assert!(master.children().iter().all(|c| c.state() == InstanceState::ChildActive));
        assert_eq!(master.children()[1].watched_path(), Some(Path::new("/a")));

        // a second call is a no-op
        master.spawn_children(SpawnSchedule::immediate()).await;
        assert_eq!(master.children().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_spawn_children_waits_for_schedule() {
        let mut master = PathMonitorInstance::master(store_with("/a,/b", ""));
        let started = tokio::time::Instant::now();
        master.spawn_children(SpawnSchedule::default()).await;

        assert!(started.elapsed() >= std::time::Duration::from_millis(520));
        assert_eq!(master.children().len(), 1);
    }

    #[tokio::test]
    async fn test_remove_propagates() {
        let mut master = PathMonitorInstance::master(store_with("/a,/b", ""));
        master.spawn_children(SpawnSchedule::immediate()).await;
        master.remove();

        assert!(master.members().all(|m| m.state() == InstanceState::Removed));
    }

    #[test]
    fn test_set_watched_path_persists_own_slot() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let store = store_with("/a,/b,/c", "");
        let mut child = PathMonitorInstance::child(1, store.clone())?;

        child.set_watched_path(temp_dir.path())?;
        assert_eq!(child.watched_path(), Some(temp_dir.path()));
        assert_eq!(
            store.get_string(PATH_KEY)?,
            format!("/a,{},/c", temp_dir.path().display())
        );
        Ok(())
    }

    #[test]
    fn test_set_watched_path_rejects_missing_directory() {
        let store = store_with("/a", "");
        let mut master = PathMonitorInstance::master(store.clone());

        let err = master.set_watched_path("/does/not/exist").unwrap_err();
        assert!(matches!(err, MonitorError::PathNotFound(_)));
        assert_eq!(master.watched_path(), Some(Path::new("/a")));
        assert_eq!(store.get_string(PATH_KEY).unwrap(), "/a");
    }

    #[test]
    fn test_toggles_persist_flags() -> Result<()> {
        let store = store_with("/a,/b", "6,6");
        let mut master = PathMonitorInstance::master(store.clone());

        master.toggle_hidden_files()?;
        master.toggle_doc_temp_files()?;
        assert_eq!(store.get_string(EXCLUDE_FLAGS_KEY)?, "6,15");

        master.toggle_directories()?;
        master.toggle_symlinks()?;
        assert_eq!(store.get_string(EXCLUDE_FLAGS_KEY)?, "6,9");
        Ok(())
    }

    #[test]
    fn test_menu_entries_end_to_end() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let base = temp_dir.path();
        fs::write(base.join("a.txt"), "")?;
        fs::write(base.join(".hidden"), "")?;
        fs::write(base.join("backup~"), "")?;
        fs::create_dir(base.join("sub"))?;

        let store = store_with(&base.display().to_string(), "");
        let mut master = PathMonitorInstance::master(store);
        let lister = DirectoryLister::new(FsEnumerator);

        let names = |master: &PathMonitorInstance| -> Vec<String> {
            let mut names: Vec<String> =
                master.menu_entries(&lister).into_iter().map(|e| e.display_name).collect();
            names.sort();
            names
        };
        assert_eq!(names(&master), vec!["a.txt", "sub"]);

        master.configure_excludes("*.TXT", false)?;
        assert_eq!(names(&master), vec!["sub"]);
        Ok(())
    }

    #[test]
    fn test_menu_entries_without_path() {
        let master = PathMonitorInstance::master(store_with("", ""));
        assert!(master.menu_entries(&DirectoryLister::new(FsEnumerator)).is_empty());
    }
}
