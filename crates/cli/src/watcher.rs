//! Project watcher
//!
//! Reports files the user moves while an interactive migration is open.
//! Events are queued on a channel and drained by the wizard loop between
//! commands.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};

use anyhow::{Context, Result};
use notify::event::{ModifyKind, RenameMode};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{debug, warn};

/// A file that appeared at `to` and is gone from `from`. Platforms that
/// report the two halves separately give the same path on both sides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMove {
    pub from: PathBuf,
    pub to: PathBuf,
}

pub struct ProjectWatcher {
    // dropping the watcher stops the notifications
    _watcher: RecommendedWatcher,
    events: Receiver<FileMove>,
}

impl ProjectWatcher {
    pub fn start(root: &Path) -> Result<Self> {
        let (tx, rx) = mpsc::channel();
        let base = root.to_path_buf();

        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| match res {
            Ok(event) => {
                if let Some(moved) = file_move(&base, &event) {
                    let _ = tx.send(moved);
                }
            }
            Err(e) => warn!(?e, "project watcher event error"),
        })
        .context("Failed to create project watcher")?;
        watcher
            .watch(root, RecursiveMode::Recursive)
            .with_context(|| format!("Failed to watch {}", root.display()))?;
        debug!("Watching {}", root.display());

        Ok(Self {
            _watcher: watcher,
            events: rx,
        })
    }

    /// Moves reported since the last call
    pub fn drain(&self) -> Vec<FileMove> {
        self.events.try_iter().collect()
    }
}

fn file_move(root: &Path, event: &Event) -> Option<FileMove> {
    let relative = |p: &PathBuf| p.strip_prefix(root).unwrap_or(p).to_path_buf();
    let paths: Vec<PathBuf> = event.paths.iter().map(relative).collect();

    match (&event.kind, paths.as_slice()) {
        (EventKind::Modify(ModifyKind::Name(RenameMode::Both)), [from, to, ..]) => Some(FileMove {
            from: from.clone(),
            to: to.clone(),
        }),
        (EventKind::Modify(ModifyKind::Name(_)) | EventKind::Create(_) | EventKind::Remove(_), [path, ..]) => {
            Some(FileMove {
                from: path.clone(),
                to: path.clone(),
            })
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{CreateKind, DataChange};

    #[test]
    fn test_rename_event_becomes_file_move() {
        let root = Path::new("/project");
        let event = Event::new(EventKind::Modify(ModifyKind::Name(RenameMode::Both)))
            .add_path(root.join("cypress/integration/a.spec.js"))
            .add_path(root.join("cypress/e2e/a.cy.js"));

        assert_eq!(
            file_move(root, &event),
            Some(FileMove {
                from: PathBuf::from("cypress/integration/a.spec.js"),
                to: PathBuf::from("cypress/e2e/a.cy.js"),
            })
        );
    }

    #[test]
    fn test_content_changes_are_ignored() {
        let root = Path::new("/project");
        let modified = Event::new(EventKind::Modify(ModifyKind::Data(DataChange::Content)))
            .add_path(root.join("cypress/e2e/a.cy.js"));
        assert_eq!(file_move(root, &modified), None);

        let created = Event::new(EventKind::Create(CreateKind::File))
            .add_path(root.join("cypress/e2e/b.cy.js"));
        assert!(file_move(root, &created).is_some());
    }
}
