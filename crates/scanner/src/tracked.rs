use crate::error::Result;
use git2::Repository;
use std::path::{Path, PathBuf};

/// Source of version-control tracked paths.
pub trait TrackedFiles {
    /// Tracked paths relative to `root`, or `Ok(None)` when `root` is not
    /// under version control.
    fn list_tracked(&self, root: &Path) -> Result<Option<Vec<PathBuf>>>;
}

/// Reads tracked paths from the git index at `root`.
#[derive(Debug, Clone, Copy, Default)]
pub struct GitIndex;

impl TrackedFiles for GitIndex {
    fn list_tracked(&self, root: &Path) -> Result<Option<Vec<PathBuf>>> {
        let repo = match Repository::open(root) {
            Ok(repo) => repo,
            Err(e) => {
                log::debug!("No git repository at {}: {e}", root.display());
                return Ok(None);
            }
        };

        let index = repo.index()?;
        let mut paths: Vec<PathBuf> = index
            .iter()
            .map(|entry| PathBuf::from(String::from_utf8_lossy(&entry.path).into_owned()))
            .collect();
        // Conflicted entries appear once per stage.
        paths.dedup();

        Ok(Some(paths))
    }
}

/// A fixed, caller-supplied list of tracked paths.
#[derive(Debug, Clone, Default)]
pub struct TrackedList(pub Vec<PathBuf>);

impl TrackedFiles for TrackedList {
    fn list_tracked(&self, _root: &Path) -> Result<Option<Vec<PathBuf>>> {
        Ok(Some(self.0.clone()))
    }
}
