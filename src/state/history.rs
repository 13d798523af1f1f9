// Persisted history store.
// Durable document mapping repository names to their last-observed stats,
// plus the ordered list of tracked usernames.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{GhStatsError, Result};
use crate::github::RepoSnapshot;

/// The durable document: tracked usernames and last-known snapshots.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct History {
    /// Usernames in the order the operator first queried them.
    pub usernames: Vec<String>,
    /// Repository name to its most recently observed snapshot.
    pub repos_data: BTreeMap<String, RepoSnapshot>,
}

/// History document bound to its backing file.
///
/// Loaded once at startup, mutated in memory, and rewritten wholesale.
/// A single process instance owns the file; there is no locking.
#[derive(Debug)]
pub struct HistoryStore {
    path: PathBuf,
    history: History,
}

impl HistoryStore {
    /// Load the history document, initializing empty state when the file is
    /// missing or empty. An unparsable document is fatal.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        let history = match fs::read_to_string(&path) {
            Ok(contents) if contents.trim().is_empty() => History::default(),
            Ok(contents) => {
                serde_json::from_str(&contents).map_err(|source| GhStatsError::HistoryCorrupt {
                    path: path.clone(),
                    source,
                })?
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => History::default(),
            Err(err) => return Err(err.into()),
        };

        Ok(Self { path, history })
    }

    /// Rewrite the whole document, truncate-then-write via a temp file.
    pub fn save(&self) -> Result<()> {
        let persist_err = |source: std::io::Error| GhStatsError::Persist {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(persist_err)?;
        }

        let json = serde_json::to_string_pretty(&self.history)
            .map_err(|e| persist_err(std::io::Error::other(e)))?;

        let temp_path = self.path.with_extension("tmp");
        let write = || -> std::io::Result<()> {
            let mut file = fs::File::create(&temp_path)?;
            file.write_all(json.as_bytes())?;
            file.sync_all()?;
            fs::rename(&temp_path, &self.path)
        };
        write().map_err(persist_err)
    }

    pub fn usernames(&self) -> &[String] {
        &self.history.usernames
    }

    /// Add a username, preserving order and skipping duplicates.
    pub fn add_username(&mut self, username: &str) {
        if !self.history.usernames.iter().any(|u| u == username) {
            self.history.usernames.push(username.to_string());
        }
    }

    /// Replace the stored snapshot for a repository with a fresh one.
    pub fn upsert(&mut self, snapshot: RepoSnapshot) {
        self.history.repos_data.insert(snapshot.name.clone(), snapshot);
    }

    /// Remove a username and every snapshot owned by it, then persist.
    ///
    /// This is the only mid-run persistence point.
    pub fn remove_user(&mut self, username: &str) -> Result<()> {
        self.history.usernames.retain(|u| u != username);
        self.history
            .repos_data
            .retain(|_, snapshot| snapshot.owner.login != username);
        self.save()
    }

    /// The in-memory document.
    pub fn history(&self) -> &History {
        &self.history
    }
}
