//! Change notification for watched directories
//!
//! [`DirectoryWatcher`] wraps a non-recursive `notify` watcher and invokes a
//! callback with no payload whenever something inside the directory changes.
//! [`ChangeQueue`] turns those callbacks into a stream of instance indices for
//! a single refresh loop, coalescing bursts so an instance is queued at most
//! once while a refresh for it is outstanding.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::error::Result;

/// Active subscription to one directory; dropping it unsubscribes
pub struct DirectoryWatcher {
    watcher: RecommendedWatcher,
    path: PathBuf,
}

impl DirectoryWatcher {
    /// Call `on_change` for every create, delete or modify inside `path`
    pub fn subscribe<F>(path: &Path, on_change: F) -> Result<Self>
    where
        F: Fn() + Send + 'static,
    {
        let watched = path.to_path_buf();
        let handler = move |res: notify::Result<notify::Event>| match res {
            Ok(event) => {
                if matches!(event.kind, EventKind::Access(_)) {
                    return;
                }
                tracing::trace!("Change in {}: {:?}", watched.display(), event.kind);
                on_change();
            }
            Err(e) => tracing::error!("Watch error on {}: {}", watched.display(), e),
        };
        let mut watcher = notify::recommended_watcher(handler)?;

        watcher.watch(path, RecursiveMode::NonRecursive)?;
        tracing::debug!("Started watching: {}", path.display());

        Ok(Self {
            watcher,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for DirectoryWatcher {
    fn drop(&mut self) {
        if let Err(e) = self.watcher.unwatch(&self.path) {
            tracing::debug!("Unwatch of {} failed: {}", self.path.display(), e);
        }
    }
}

/// Coalescing queue of instances that need a refresh
pub struct ChangeQueue {
    tx: mpsc::UnboundedSender<usize>,
    rx: mpsc::UnboundedReceiver<usize>,
    pending: Arc<Mutex<HashSet<usize>>>,
}

impl Default for ChangeQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangeQueue {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            tx,
            rx,
            pending: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    /// Callback that marks `index` as changed
    pub fn notifier(&self, index: usize) -> impl Fn() + Send + Sync + 'static {
        let tx = self.tx.clone();
        let pending = self.pending.clone();
        move || {
            let newly_pending = pending
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .insert(index);
            if newly_pending && tx.send(index).is_err() {
                tracing::debug!("Change queue closed, dropping event for instance {}", index);
            }
        }
    }

    /// Wait for the next instance that changed.
    ///
    /// Changes reported for that instance after this returns queue it again.
    pub async fn next(&mut self) -> Option<usize> {
        let index = self.rx.recv().await?;
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&index);
        Some(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::time::Duration;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_bursts_are_coalesced() {
        let mut queue = ChangeQueue::new();
        let first = queue.notifier(0);
        let second = queue.notifier(3);

        first();
        first();
        second();
        first();

        assert_eq!(queue.next().await, Some(0));
        assert_eq!(queue.next().await, Some(3));
        assert!(tokio::time::timeout(Duration::from_millis(50), queue.next()).await.is_err());
    }

    #[tokio::test]
    async fn test_change_after_dequeue_requeues() {
        let mut queue = ChangeQueue::new();
        let notify = queue.notifier(1);

        notify();
        assert_eq!(queue.next().await, Some(1));
        notify();
        assert_eq!(queue.next().await, Some(1));
    }

    #[tokio::test]
    async fn test_watcher_reports_new_file() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let mut queue = ChangeQueue::new();
        let watcher = DirectoryWatcher::subscribe(temp_dir.path(), queue.notifier(0))?;
        assert_eq!(watcher.path(), temp_dir.path());

        fs::write(temp_dir.path().join("new.txt"), "hello")?;

        let changed = tokio::time::timeout(Duration::from_secs(5), queue.next()).await?;
        assert_eq!(changed, Some(0));
        Ok(())
    }

    #[test]
    fn test_subscribe_missing_directory_fails() {
        assert!(DirectoryWatcher::subscribe(Path::new("/does/not/exist"), || {}).is_err());
    }
}
