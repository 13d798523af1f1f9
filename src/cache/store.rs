// Cache store for reading and writing cached repository lists.
// Handles JSON serialization, TTL checking, and filesystem operations.

use std::fs;
use std::io::Write;
use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::error::{GhStatsError, Result};

/// Freshness window for cached repository lists: 10 minutes.
pub const DEFAULT_TTL: Duration = Duration::from_secs(10 * 60);

/// Wrapper for cached data with its write timestamp.
///
/// Freshness is judged from the embedded `cached_at`, not the file's
/// modification time, so touching or copying a cache file does not refresh
/// it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedData<T> {
    /// The cached data.
    pub data: T,
    /// When the data was cached.
    pub cached_at: DateTime<Utc>,
}

impl<T> CachedData<T> {
    /// Create a new cached data entry stamped now.
    pub fn new(data: T) -> Self {
        Self {
            data,
            cached_at: Utc::now(),
        }
    }

    /// Check if this cached data has expired based on TTL.
    pub fn is_expired(&self, ttl: Duration) -> bool {
        let elapsed = Utc::now()
            .signed_duration_since(self.cached_at)
            .to_std()
            .unwrap_or(Duration::MAX);

        elapsed >= ttl
    }

    /// Check if this cached data is still valid (not expired).
    pub fn is_valid(&self, ttl: Duration) -> bool {
        !self.is_expired(ttl)
    }
}

/// Read cached JSON data from a file.
pub fn read_cached<T: DeserializeOwned>(path: &Path) -> Result<Option<CachedData<T>>> {
    if !path.exists() {
        return Ok(None);
    }

    let contents = fs::read_to_string(path)?;
    let cached: CachedData<T> = serde_json::from_str(&contents).map_err(GhStatsError::Decode)?;
    Ok(Some(cached))
}

/// Read cached JSON data, returning None if expired.
pub fn read_if_valid<T: DeserializeOwned>(path: &Path, ttl: Duration) -> Result<Option<T>> {
    match read_cached::<T>(path)? {
        Some(cached) if cached.is_valid(ttl) => Ok(Some(cached.data)),
        _ => Ok(None),
    }
}

/// Write data to cache as JSON, replacing any prior entry.
pub fn write_cached<T: Serialize>(path: &Path, data: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let cached = CachedData::new(data);
    let json = serde_json::to_string_pretty(&cached).map_err(std::io::Error::other)?;

    // Write atomically via temp file
    let temp_path = path.with_extension("tmp");
    let mut file = fs::File::create(&temp_path)?;
    file.write_all(json.as_bytes())?;
    file.sync_all()?;
    fs::rename(&temp_path, path)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    struct TestData {
        name: String,
        value: i32,
    }

    #[test]
    fn test_write_and_read_cached() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("test.json");

        let data = TestData {
            name: "test".to_string(),
            value: 42,
        };

        write_cached(&path, &data).unwrap();

        let cached: Option<CachedData<TestData>> = read_cached(&path).unwrap();
        assert!(cached.is_some());
        assert_eq!(cached.unwrap().data, data);
    }

    #[test]
    fn test_fresh_entry_is_valid() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("test.json");

        write_cached(&path, &TestData {
            name: "test".to_string(),
            value: 1,
        })
        .unwrap();

        let read: Option<TestData> = read_if_valid(&path, DEFAULT_TTL).unwrap();
        assert!(read.is_some());
    }

    #[test]
    fn test_stale_entry_reads_as_absent() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("test.json");

        let mut cached = CachedData::new(TestData {
            name: "test".to_string(),
            value: 1,
        });
        cached.cached_at = Utc::now() - chrono::Duration::seconds(11 * 60);
        fs::write(&path, serde_json::to_string(&cached).unwrap()).unwrap();

        let read: Option<TestData> = read_if_valid(&path, DEFAULT_TTL).unwrap();
        assert!(read.is_none());
    }

    #[test]
    fn test_ttl_boundary_is_stale() {
        let mut data = CachedData::new("test");
        data.cached_at = Utc::now() - chrono::Duration::seconds(600);

        // An entry exactly as old as the window is no longer fresh.
        assert!(data.is_expired(DEFAULT_TTL));
    }

    #[test]
    fn test_write_replaces_prior_entry() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("test.json");

        write_cached(&path, &TestData {
            name: "old".to_string(),
            value: 1,
        })
        .unwrap();
        write_cached(&path, &TestData {
            name: "new".to_string(),
            value: 2,
        })
        .unwrap();

        let read: Option<TestData> = read_if_valid(&path, DEFAULT_TTL).unwrap();
        assert_eq!(read.unwrap().name, "new");
    }

    #[test]
    fn test_read_nonexistent() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nonexistent.json");

        let cached: Option<CachedData<TestData>> = read_cached(&path).unwrap();
        assert!(cached.is_none());
    }
}
