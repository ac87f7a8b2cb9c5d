use jobboard_common::User;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::error::{BoardError, Result};

/// Storage key holding the serialized current user
pub const USER_KEY: &str = "user";
/// Storage key holding the literal `"true"` while a session is active
pub const AUTH_FLAG_KEY: &str = "isAuthenticated";

/// Minimal persistent string key-value capability
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// In-process store, lost when dropped
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| BoardError::Storage("memory store lock poisoned".to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| BoardError::Storage("memory store lock poisoned".to_string()))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| BoardError::Storage("memory store lock poisoned".to_string()))?;
        entries.remove(key);
        Ok(())
    }
}

/// Directory-backed store: one file per key. Survives process restarts.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        if key.is_empty() || key.contains(['/', '\\']) || key.starts_with('.') {
            return Err(BoardError::Storage(format!("invalid storage key: {:?}", key)));
        }
        Ok(self.dir.join(key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(BoardError::Storage(format!(
                "failed to read {}: {}",
                path.display(),
                e
            ))),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        std::fs::create_dir_all(&self.dir).map_err(|e| {
            BoardError::Storage(format!("failed to create {}: {}", self.dir.display(), e))
        })?;
        std::fs::write(&path, value)
            .map_err(|e| BoardError::Storage(format!("failed to write {}: {}", path.display(), e)))
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(BoardError::Storage(format!(
                "failed to remove {}: {}",
                path.display(),
                e
            ))),
        }
    }
}

/// Persistence of the authenticated identity, injected into the auth container.
///
/// Implementations must never fail the caller: storage problems are logged
/// and the operation degrades to a no-op.
pub trait SessionRepository: Send + Sync {
    /// Stored user plus whether the authenticated flag is exactly `"true"`
    fn load(&self) -> Option<(User, bool)>;
    fn save(&self, user: &User);
    fn clear(&self);
}

/// Session mirrored into a [`KeyValueStore`], or nowhere at all when detached
#[derive(Clone, Default)]
pub struct LocalSession {
    storage: Option<Arc<dyn KeyValueStore>>,
}

impl LocalSession {
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self {
            storage: Some(storage),
        }
    }

    /// No persistent storage available (tests, headless runs): every
    /// operation is a no-op.
    pub fn detached() -> Self {
        Self { storage: None }
    }

    pub fn is_detached(&self) -> bool {
        self.storage.is_none()
    }
}

impl SessionRepository for LocalSession {
    fn load(&self) -> Option<(User, bool)> {
        let storage = self.storage.as_ref()?;

        let raw = match storage.get(USER_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!("Failed to read stored session: {}", e);
                return None;
            }
        };
        let user: User = match serde_json::from_str(&raw) {
            Ok(user) => user,
            Err(e) => {
                tracing::warn!("Ignoring malformed stored user: {}", e);
                return None;
            }
        };

        let flag = match storage.get(AUTH_FLAG_KEY) {
            Ok(flag) => flag,
            Err(e) => {
                tracing::warn!("Failed to read stored auth flag: {}", e);
                None
            }
        };
        Some((user, flag.as_deref() == Some("true")))
    }

    fn save(&self, user: &User) {
        let Some(storage) = self.storage.as_ref() else {
            return;
        };
        let raw = match serde_json::to_string(user) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!("Failed to serialize session user: {}", e);
                return;
            }
        };
        if let Err(e) = storage
            .set(USER_KEY, &raw)
            .and_then(|_| storage.set(AUTH_FLAG_KEY, "true"))
        {
            tracing::warn!("Failed to persist session: {}", e);
        }
    }

    fn clear(&self) {
        let Some(storage) = self.storage.as_ref() else {
            return;
        };
        for key in [USER_KEY, AUTH_FLAG_KEY] {
            if let Err(e) = storage.remove(key) {
                tracing::warn!("Failed to clear session key {}: {}", key, e);
            }
        }
    }
}
