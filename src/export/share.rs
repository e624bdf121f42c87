//! Hand-off of finished artifacts to the platform: a configured share
//! command (e.g. `xdg-open`, `open`) when available, otherwise the file is
//! simply left where it was saved and its path reported.

use crate::ui::messages::warning;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareOutcome {
    Shared(PathBuf),
    Saved(PathBuf),
}

impl ShareOutcome {
    pub fn path(&self) -> &Path {
        match self {
            ShareOutcome::Shared(p) | ShareOutcome::Saved(p) => p,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Sharer {
    command: Option<String>,
}

impl Sharer {
    pub fn new(command: Option<String>) -> Self {
        Self {
            command: command.filter(|c| !c.trim().is_empty()),
        }
    }

    pub fn is_available(&self) -> bool {
        self.command.is_some()
    }

    /// Never fails: a share command that cannot run degrades to "saved".
    pub fn share(&self, path: &Path, mime: &str, title: &str) -> ShareOutcome {
        let Some(command) = &self.command else {
            return ShareOutcome::Saved(path.to_path_buf());
        };

        let mut parts = command.split_whitespace();
        let Some(program) = parts.next() else {
            return ShareOutcome::Saved(path.to_path_buf());
        };

        info!(%program, %mime, %title, file = %path.display(), "sharing artifact");
        match Command::new(program).args(parts).arg(path).status() {
            Ok(s) if s.success() => ShareOutcome::Shared(path.to_path_buf()),
            Ok(s) => {
                warning(format!("Share command '{program}' exited with {s}"));
                ShareOutcome::Saved(path.to_path_buf())
            }
            Err(e) => {
                warning(format!("Share command '{program}' not available: {e}"));
                ShareOutcome::Saved(path.to_path_buf())
            }
        }
    }
}
