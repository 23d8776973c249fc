//! Opening listed files with the desktop's default handler

use std::path::Path;

use crate::error::Result;
use crate::lister::MenuEntry;

/// Opens a file with whatever the desktop associates with it
pub trait Launcher {
    fn open_with_default_handler(&self, path: &Path) -> Result<()>;
}

/// Launcher backed by the platform opener (`xdg-open`, `open`, `start`)
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultLauncher;

impl Launcher for DefaultLauncher {
    fn open_with_default_handler(&self, path: &Path) -> Result<()> {
        tracing::debug!("Opening {}", path.display());
        open::that_detached(path)?;
        Ok(())
    }
}

impl MenuEntry {
    /// Open this entry; failures are logged, not returned
    pub fn activate(&self, launcher: &dyn Launcher) {
        if let Err(e) = launcher.open_with_default_handler(&self.path) {
            tracing::error!("Could not open {}: {}", self.path.display(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::io;
    use std::path::PathBuf;

    #[derive(Default)]
    struct RecordingLauncher {
        opened: RefCell<Vec<PathBuf>>,
        fail: bool,
    }

    impl Launcher for RecordingLauncher {
        fn open_with_default_handler(&self, path: &Path) -> Result<()> {
            self.opened.borrow_mut().push(path.to_path_buf());
            if self.fail {
                return Err(io::Error::new(io::ErrorKind::NotFound, "no handler").into());
            }
            Ok(())
        }
    }

    fn entry() -> MenuEntry {
        MenuEntry {
            display_name: "notes.md".to_string(),
            path: PathBuf::from("/home/me/notes/notes.md"),
        }
    }

    #[test]
    fn test_activate_opens_full_path() {
        let launcher = RecordingLauncher::default();
        entry().activate(&launcher);
        assert_eq!(*launcher.opened.borrow(), vec![PathBuf::from("/home/me/notes/notes.md")]);
    }

    #[test]
    fn test_activate_swallows_failures() {
        let launcher = RecordingLauncher {
            fail: true,
            ..Default::default()
        };
        entry().activate(&launcher);
        assert_eq!(launcher.opened.borrow().len(), 1);
    }
}
