//! Persisted login session
//!
//! The logged-in user record and login timestamp survive restarts until an
//! explicit logout removes them, mirroring how the web portal kept its
//! `user` record in browser storage.

use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::api::User;

/// The persisted identity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub user: User,
    /// When the user signed in
    pub login_time: DateTime<Utc>,
}

impl Session {
    pub fn new(user: User) -> Self {
        Self {
            user,
            login_time: Utc::now(),
        }
    }
}

/// Reads and writes the session file
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Creates a store under the platform data directory
    ///
    /// Returns `None` if no data directory can be determined (e.g. no home
    /// directory); the caller falls back to signing in every run.
    pub fn new() -> Option<Self> {
        let project_dirs = ProjectDirs::from("", "", "leavedesk")?;
        Some(Self {
            path: project_dirs.data_dir().join("session.json"),
        })
    }

    /// Creates a store at a custom path, for tests
    #[allow(dead_code)]
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Loads the persisted session
    ///
    /// A missing or unparseable file reads as "not signed in".
    pub fn load(&self) -> Option<Session> {
        let content = fs::read_to_string(&self.path).ok()?;
        serde_json::from_str(&content).ok()
    }

    /// Persists the session, creating parent directories as needed
    pub fn save(&self, session: &Session) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(session)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        fs::write(&self.path, json)
    }

    /// Removes the session file (logout)
    pub fn clear(&self) -> std::io::Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Role;
    use tempfile::TempDir;

    fn test_user() -> User {
        User {
            employee_id: "E042".to_string(),
            full_name: "Arada Chaiyasit".to_string(),
            role: Role::Employee,
            department: Some("Finance".to_string()),
        }
    }

    fn create_test_store() -> (SessionStore, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store = SessionStore::with_path(temp_dir.path().join("session.json"));
        (store, temp_dir)
    }

    #[test]
    fn test_load_returns_none_without_file() {
        let (store, _temp_dir) = create_test_store();
        assert!(store.load().is_none());
    }

    #[test]
    fn test_session_survives_roundtrip() {
        let (store, _temp_dir) = create_test_store();
        let session = Session::new(test_user());

        store.save(&session).expect("Save should succeed");
        let loaded = store.load().expect("Should load saved session");

        assert_eq!(loaded.user.employee_id, "E042");
        assert_eq!(loaded.user.role, Role::Employee);
        assert_eq!(loaded.login_time, session.login_time);
    }

    #[test]
    fn test_clear_removes_session() {
        let (store, _temp_dir) = create_test_store();
        store
            .save(&Session::new(test_user()))
            .expect("Save should succeed");

        store.clear().expect("Clear should succeed");
        assert!(store.load().is_none());

        // Clearing again is harmless.
        store.clear().expect("Second clear should succeed");
    }

    #[test]
    fn test_corrupt_file_reads_as_signed_out() {
        let (store, temp_dir) = create_test_store();
        fs::write(temp_dir.path().join("session.json"), "{not json").unwrap();
        assert!(store.load().is_none());
    }

    #[test]
    fn test_save_creates_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("deep").join("nested").join("session.json");
        let store = SessionStore::with_path(nested.clone());

        store
            .save(&Session::new(test_user()))
            .expect("Save should create directories");
        assert!(nested.exists());
    }
}
