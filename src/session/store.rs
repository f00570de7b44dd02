//! Persistent storage for the session token.
//!
//! The token is the only thing the client persists; everything else is
//! re-fetched per command. One token per file, under the configured data
//! directory.

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Read the stored token, if any. An unreadable or empty file counts as
    /// absent.
    pub fn load(&self) -> Option<String> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => {
                let token = raw.trim().to_string();
                if token.is_empty() {
                    None
                } else {
                    Some(token)
                }
            }
            Err(_) => None,
        }
    }

    pub fn save(&self, token: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(&self.path, token)
            .with_context(|| format!("Failed to write {}", self.path.display()))
    }

    /// Remove the stored token. A missing file is fine.
    pub fn clear(&self) {
        match fs::remove_file(&self.path) {
            Ok(()) => debug!("cleared stored session token"),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => debug!(error = %err, "failed to remove session token"),
        }
    }

    #[cfg(test)]
    pub(crate) fn exists(&self) -> bool {
        self.path.exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_load_clear_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path().join("session.token"));

        assert_eq!(store.load(), None);

        store.save("abc.def.ghi").unwrap();
        assert_eq!(store.load().as_deref(), Some("abc.def.ghi"));

        store.clear();
        assert_eq!(store.load(), None);
        // Clearing twice is a no-op.
        store.clear();
    }

    #[test]
    fn whitespace_only_file_counts_as_absent() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path().join("session.token"));
        store.save("  \n").unwrap();
        assert_eq!(store.load(), None);
    }
}
