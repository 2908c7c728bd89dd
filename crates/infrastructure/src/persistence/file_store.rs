//! File-backed persistence tier.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use nimbus_application::{KeyValueStore, StorageError};
use tracing::warn;

/// File-backed `KeyValueStore`: one record per key under a base directory.
///
/// The durable tier for a desktop host. Keys map to file names with
/// characters outside `[A-Za-z0-9._-]` replaced by `_`, so the fixed
/// storage key `nimbus.auth.credentials` lands at
/// `<base>/nimbus.auth.credentials`. Read failures are treated as absence;
/// the engine self-heals corrupt records at a higher level.
#[derive(Debug, Clone)]
pub struct FileStore {
    base_dir: PathBuf,
}

impl FileStore {
    /// Creates a store rooted at `base_dir`. The directory is created
    /// lazily on the first write.
    #[must_use]
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.base_dir.join(name)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.entry_path(key)).ok()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.base_dir).map_err(|e| StorageError {
            message: format!("creating {}: {e}", self.base_dir.display()),
        })?;
        let path = self.entry_path(key);
        fs::write(&path, value).map_err(|e| StorageError {
            message: format!("writing {}: {e}", path.display()),
        })
    }

    fn remove(&self, key: &str) {
        let path = self.entry_path(key);
        if let Err(error) = fs::remove_file(&path)
            && error.kind() != ErrorKind::NotFound
        {
            warn!(path = %path.display(), %error, "failed to remove stored record");
        }
    }
}

impl AsRef<Path> for FileStore {
    fn as_ref(&self) -> &Path {
        &self.base_dir
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());

        assert!(store.get("nimbus.auth.credentials").is_none());
        store.set("nimbus.auth.credentials", r#"{"accessToken":"a"}"#).unwrap();
        assert_eq!(
            store.get("nimbus.auth.credentials").as_deref(),
            Some(r#"{"accessToken":"a"}"#)
        );

        store.remove("nimbus.auth.credentials");
        store.remove("nimbus.auth.credentials"); // idempotent
        assert!(store.get("nimbus.auth.credentials").is_none());
    }

    #[test]
    fn test_keys_are_sanitized_into_file_names() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());

        store.set("weird/key name", "v").unwrap();
        assert_eq!(store.get("weird/key name").as_deref(), Some("v"));
        assert!(dir.path().join("weird_key_name").exists());
    }

    #[test]
    fn test_values_survive_a_new_store_over_the_same_dir() {
        let dir = tempfile::tempdir().unwrap();
        FileStore::new(dir.path()).set("k", "persisted").unwrap();

        let reopened = FileStore::new(dir.path());
        assert_eq!(reopened.get("k").as_deref(), Some("persisted"));
    }
}
