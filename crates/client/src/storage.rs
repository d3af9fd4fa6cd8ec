//! Session persistence: three string keys, kept between runs.

use std::collections::BTreeMap;
use std::sync::Mutex;

use crate::error::ClientResult;

pub const ACCESS_TOKEN_KEY: &str = "access_token";
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";
pub const USER_KEY: &str = "user";

/// Key-value store for the session (the browser's `localStorage` contract).
pub trait SessionStorage: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> ClientResult<()>;
    fn remove(&self, key: &str) -> ClientResult<()>;
}

/// Process-local storage; nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) -> ClientResult<()> {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> ClientResult<()> {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(key);
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStorage;

#[cfg(not(target_arch = "wasm32"))]
mod file {
    use std::collections::BTreeMap;
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;

    use super::SessionStorage;
    use crate::error::{ClientError, ClientResult};

    /// JSON object on disk, rewritten on every change.
    #[derive(Debug)]
    pub struct FileStorage {
        path: PathBuf,
        entries: Mutex<BTreeMap<String, String>>,
    }

    impl FileStorage {
        /// `<data dir>/gstbill/session.json`.
        pub fn default_path() -> Option<PathBuf> {
            dirs::data_dir().map(|dir| dir.join("gstbill").join("session.json"))
        }

        /// Open (or start) the session file at `path`.
        ///
        /// A missing file is an empty session. A corrupt one is discarded with
        /// a warning rather than locking the user out.
        pub fn open(path: impl Into<PathBuf>) -> ClientResult<Self> {
            let path = path.into();
            let entries = match std::fs::read_to_string(&path) {
                Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|err| {
                    tracing::warn!(path = %path.display(), %err, "discarding unreadable session file");
                    BTreeMap::new()
                }),
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
                Err(err) => return Err(err.into()),
            };
            Ok(Self {
                path,
                entries: Mutex::new(entries),
            })
        }

        pub fn path(&self) -> &Path {
            &self.path
        }

        fn persist(&self, entries: &BTreeMap<String, String>) -> ClientResult<()> {
            if let Some(parent) = self.path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let raw = serde_json::to_string_pretty(entries)
                .map_err(|e| ClientError::Storage(e.to_string()))?;
            write_private(&self.path, raw.as_bytes())?;
            Ok(())
        }
    }

    /// Tokens live in this file, so on unix it is readable by the owner only.
    #[cfg(unix)]
    fn write_private(path: &Path, contents: &[u8]) -> std::io::Result<()> {
        use std::fs::{OpenOptions, Permissions};
        use std::io::Write;
        use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(0o600)
            .open(path)?;
        // `mode` only applies on creation; tighten files left by older runs.
        file.set_permissions(Permissions::from_mode(0o600))?;
        file.write_all(contents)
    }

    #[cfg(not(unix))]
    fn write_private(path: &Path, contents: &[u8]) -> std::io::Result<()> {
        std::fs::write(path, contents)
    }

    impl SessionStorage for FileStorage {
        fn get(&self, key: &str) -> Option<String> {
            self.entries
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .get(key)
                .cloned()
        }

        fn set(&self, key: &str, value: &str) -> ClientResult<()> {
            let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
            entries.insert(key.to_string(), value.to_string());
            self.persist(&entries)
        }

        fn remove(&self, key: &str) -> ClientResult<()> {
            let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
            if entries.remove(key).is_some() {
                self.persist(&entries)?;
            }
            Ok(())
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use browser::BrowserStorage;

#[cfg(target_arch = "wasm32")]
mod browser {
    use super::SessionStorage;
    use crate::error::{ClientError, ClientResult};

    /// `window.localStorage`, looked up on every call.
    #[derive(Debug, Default, Clone, Copy)]
    pub struct BrowserStorage;

    fn local_storage() -> ClientResult<web_sys::Storage> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok().flatten())
            .ok_or_else(|| ClientError::Storage("localStorage is unavailable".into()))
    }

    impl SessionStorage for BrowserStorage {
        fn get(&self, key: &str) -> Option<String> {
            local_storage().ok()?.get_item(key).ok().flatten()
        }

        fn set(&self, key: &str, value: &str) -> ClientResult<()> {
            local_storage()?
                .set_item(key, value)
                .map_err(|e| ClientError::Storage(format!("{e:?}")))
        }

        fn remove(&self, key: &str) -> ClientResult<()> {
            local_storage()?
                .remove_item(key)
                .map_err(|e| ClientError::Storage(format!("{e:?}")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_storage_round_trip() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get(ACCESS_TOKEN_KEY), None);
        storage.set(ACCESS_TOKEN_KEY, "abc").unwrap();
        assert_eq!(storage.get(ACCESS_TOKEN_KEY).as_deref(), Some("abc"));
        storage.remove(ACCESS_TOKEN_KEY).unwrap();
        storage.remove(ACCESS_TOKEN_KEY).unwrap();
        assert_eq!(storage.get(ACCESS_TOKEN_KEY), None);
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn file_storage_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");

        let storage = FileStorage::open(&path).unwrap();
        storage.set(ACCESS_TOKEN_KEY, "a1").unwrap();
        storage.set(REFRESH_TOKEN_KEY, "r1").unwrap();
        storage.remove(REFRESH_TOKEN_KEY).unwrap();
        drop(storage);

        let reopened = FileStorage::open(&path).unwrap();
        assert_eq!(reopened.get(ACCESS_TOKEN_KEY).as_deref(), Some("a1"));
        assert_eq!(reopened.get(REFRESH_TOKEN_KEY), None);
        assert_eq!(reopened.path(), path.as_path());
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn corrupt_session_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{not json").unwrap();

        let storage = FileStorage::open(&path).unwrap();
        assert_eq!(storage.get(USER_KEY), None);
        storage.set(USER_KEY, "{}").unwrap();
        assert_eq!(FileStorage::open(&path).unwrap().get(USER_KEY).as_deref(), Some("{}"));
    }

    #[cfg(unix)]
    #[test]
    fn session_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let mode = |p: &std::path::Path| std::fs::metadata(p).unwrap().permissions().mode() & 0o777;

        let storage = FileStorage::open(&path).unwrap();
        storage.set(ACCESS_TOKEN_KEY, "a1").unwrap();
        assert_eq!(mode(&path), 0o600);

        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).unwrap();
        storage.set(REFRESH_TOKEN_KEY, "r1").unwrap();
        assert_eq!(mode(&path), 0o600);
    }
}
