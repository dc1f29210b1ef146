//! Signed-in session and where it is kept between launches.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, warn};

use crate::errors::{LendingError, Result};
use crate::types::{CityId, EmployeeId, Role};

/// credentials and identity attached to every authenticated request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub role: Role,
    pub user_id: EmployeeId,
    #[serde(default)]
    pub profile: Option<UserProfile>,
}

/// cached copy of the signed-in user's profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    #[serde(default)]
    pub mobile: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub city_id: Option<CityId>,
}

impl Session {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn display_name(&self) -> &str {
        self.profile
            .as_ref()
            .map(|p| p.name.as_str())
            .unwrap_or("User")
    }

    pub(crate) fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

/// typed load/save contract for the persisted session
pub trait SessionStore: Send + Sync {
    fn load(&self) -> Result<Option<Session>>;
    fn save(&self, session: &Session) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

/// session kept as a JSON file
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<Session>> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(LendingError::io(self.path.display().to_string(), e)),
        };
        match serde_json::from_str(&raw) {
            Ok(session) => Ok(Some(session)),
            Err(e) => {
                // unreadable session means signing in again, not a hard failure
                warn!(path = %self.path.display(), error = %e, "discarding corrupt session file");
                Ok(None)
            }
        }
    }

    fn save(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| LendingError::io(parent.display().to_string(), e))?;
            }
        }
        let json = serde_json::to_string_pretty(session)?;
        std::fs::write(&self.path, json)
            .map_err(|e| LendingError::io(self.path.display().to_string(), e))?;
        debug!(user_id = session.user_id, "session saved");
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(LendingError::io(self.path.display().to_string(), e)),
        }
    }
}

/// session held only for the life of the process
#[derive(Default)]
pub struct MemorySessionStore {
    inner: Mutex<Option<Session>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<Session>> {
        Ok(self.inner.lock().map(|s| s.clone()).unwrap_or_else(|p| p.into_inner().clone()))
    }

    fn save(&self, session: &Session) -> Result<()> {
        match self.inner.lock() {
            Ok(mut guard) => *guard = Some(session.clone()),
            Err(poisoned) => *poisoned.into_inner() = Some(session.clone()),
        }
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match self.inner.lock() {
            Ok(mut guard) => *guard = None,
            Err(poisoned) => *poisoned.into_inner() = None,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session {
            token: "tok-123".to_string(),
            role: Role::Employee,
            user_id: 12,
            profile: Some(UserProfile {
                name: "Kavitha".to_string(),
                mobile: Some("9000011111".to_string()),
                email: None,
                city_id: Some(2),
            }),
        }
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().join("nested").join("session.json"));

        assert_eq!(store.load().unwrap(), None);
        store.save(&session()).unwrap();
        assert_eq!(store.load().unwrap(), Some(session()));

        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
        store.clear().unwrap();
    }

    #[test]
    fn test_corrupt_file_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{not json").unwrap();
        assert_eq!(FileSessionStore::new(path).load().unwrap(), None);
    }

    #[test]
    fn test_memory_store() {
        let store = MemorySessionStore::new();
        store.save(&session()).unwrap();
        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.display_name(), "Kavitha");
        assert!(!loaded.is_admin());
        assert_eq!(loaded.bearer(), "Bearer tok-123");
        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
    }
}
