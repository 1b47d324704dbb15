// 🔐 Session - explicit login context for the admin shell
//
// The current user lives in a `Session` value handed to whoever needs it.
// Persistence goes through an injected `SessionStore`, so the same code runs
// against a file, or memory in tests.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use tracing::{info, warn};

use crate::entities::{Credential, Role};

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Unknown user, wrong password and inactive account all look the same
    #[error("invalid username or password")]
    InvalidCredentials,

    #[error("session storage failed: {0}")]
    Storage(String),
}

// ============================================================================
// STORAGE
// ============================================================================

/// Key-less string slot: read, write, clear.
pub trait SessionStore {
    fn read(&self) -> Result<Option<String>, AuthError>;
    fn write(&self, value: &str) -> Result<(), AuthError>;
    fn clear(&self) -> Result<(), AuthError>;
}

/// In-memory slot, shareable between clones
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slot: Arc<RwLock<Option<String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(value: impl Into<String>) -> Self {
        MemoryStore {
            slot: Arc::new(RwLock::new(Some(value.into()))),
        }
    }
}

impl SessionStore for MemoryStore {
    fn read(&self) -> Result<Option<String>, AuthError> {
        let slot = self.slot.read().map_err(|e| AuthError::Storage(e.to_string()))?;
        Ok(slot.clone())
    }

    fn write(&self, value: &str) -> Result<(), AuthError> {
        let mut slot = self.slot.write().map_err(|e| AuthError::Storage(e.to_string()))?;
        *slot = Some(value.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), AuthError> {
        let mut slot = self.slot.write().map_err(|e| AuthError::Storage(e.to_string()))?;
        *slot = None;
        Ok(())
    }
}

/// One JSON file on disk; a missing file is an empty slot
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileStore { path: path.into() }
    }
}

impl SessionStore for FileStore {
    fn read(&self) -> Result<Option<String>, AuthError> {
        match std::fs::read_to_string(&self.path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AuthError::Storage(e.to_string())),
        }
    }

    fn write(&self, value: &str) -> Result<(), AuthError> {
        std::fs::write(&self.path, value).map_err(|e| AuthError::Storage(e.to_string()))
    }

    fn clear(&self) -> Result<(), AuthError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AuthError::Storage(e.to_string())),
        }
    }
}

// ============================================================================
// SESSION USER
// ============================================================================

/// What is kept about the logged-in user (never the hash)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: String,
    pub username: String,
    pub nome: String,
    pub role: Role,
    pub session_id: String,
    pub logged_in_at: DateTime<Utc>,
}

impl SessionUser {
    fn from_credential(credential: &Credential) -> Self {
        SessionUser {
            id: credential.id.clone(),
            username: credential.username.clone(),
            nome: credential.nome.clone(),
            role: credential.role.clone(),
            session_id: uuid::Uuid::new_v4().to_string(),
            logged_in_at: Utc::now(),
        }
    }
}

// ============================================================================
// SESSION
// ============================================================================

pub struct Session<S: SessionStore> {
    store: S,
    user: Option<SessionUser>,
}

impl<S: SessionStore> Session<S> {
    /// Empty session; call `restore` to pick up a stored user.
    pub fn new(store: S) -> Self {
        Session { store, user: None }
    }

    /// Read the stored user. A corrupt value is cleared and ignored.
    pub fn restore(store: S) -> Result<Self, AuthError> {
        let mut session = Session::new(store);
        if let Some(text) = session.store.read()? {
            match serde_json::from_str::<SessionUser>(&text) {
                Ok(user) => session.user = Some(user),
                Err(e) => {
                    warn!(error = %e, "discarding corrupt stored session");
                    session.store.clear()?;
                }
            }
        }
        Ok(session)
    }

    pub fn login(
        &mut self,
        credentials: &[Credential],
        username: &str,
        password: &str,
    ) -> Result<&SessionUser, AuthError> {
        let credential = credentials
            .iter()
            .find(|c| c.accepts(username, password))
            .ok_or(AuthError::InvalidCredentials)?;

        let user = SessionUser::from_credential(credential);
        let text = serde_json::to_string(&user).map_err(|e| AuthError::Storage(e.to_string()))?;
        self.store.write(&text)?;

        info!(username = %user.username, role = %user.role, "login");
        Ok(&*self.user.insert(user))
    }

    pub fn logout(&mut self) -> Result<(), AuthError> {
        if let Some(user) = self.user.take() {
            info!(username = %user.username, "logout");
        }
        self.store.clear()
    }

    pub fn user(&self) -> Option<&SessionUser> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// Admin has every role; anyone else only their own
    pub fn has_permission(&self, role: &str) -> bool {
        self.user.as_ref().map_or(false, |u| u.role.grants(role))
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials() -> Vec<Credential> {
        vec![
            Credential {
                id: "1".to_string(),
                username: "admin".to_string(),
                password_hash: Credential::hash_password("password"),
                nome: "Administrador".to_string(),
                role: Role::Admin,
                ativo: true,
            },
            Credential {
                id: "2".to_string(),
                username: "editor".to_string(),
                password_hash: Credential::hash_password("segredo"),
                nome: "Editora".to_string(),
                role: Role::Other("editor".to_string()),
                ativo: true,
            },
            Credential {
                id: "3".to_string(),
                username: "antigo".to_string(),
                password_hash: Credential::hash_password("password"),
                nome: "Ex-membro".to_string(),
                role: Role::Admin,
                ativo: false,
            },
        ]
    }

    #[test]
    fn test_login_persists_user_without_hash() {
        let store = MemoryStore::new();
        let mut session = Session::new(store.clone());

        let user = session.login(&credentials(), "admin", "password").unwrap();
        assert_eq!(user.nome, "Administrador");
        assert!(session.is_authenticated());

        let stored = store.read().unwrap().unwrap();
        assert!(stored.contains("\"username\":\"admin\""));
        assert!(!stored.contains(&Credential::hash_password("password")));
    }

    #[test]
    fn test_login_failures_are_indistinguishable() {
        let mut session = Session::new(MemoryStore::new());
        let creds = credentials();

        for (username, password) in [("admin", "wrong"), ("ghost", "password"), ("antigo", "password")] {
            let err = session.login(&creds, username, password).unwrap_err();
            assert!(matches!(err, AuthError::InvalidCredentials));
            assert_eq!(err.to_string(), "invalid username or password");
        }
        assert!(!session.is_authenticated());
        assert!(session.store().read().unwrap().is_none());
    }

    #[test]
    fn test_restore_and_logout() {
        let store = MemoryStore::new();
        {
            let mut session = Session::new(store.clone());
            session.login(&credentials(), "editor", "segredo").unwrap();
        }

        let mut restored = Session::restore(store.clone()).unwrap();
        assert_eq!(restored.user().map(|u| u.username.as_str()), Some("editor"));
        assert!(restored.has_permission("editor"));
        assert!(!restored.has_permission("admin"));

        restored.logout().unwrap();
        assert!(!restored.is_authenticated());
        assert!(store.read().unwrap().is_none());
    }

    #[test]
    fn test_restore_clears_corrupt_value() {
        let store = MemoryStore::with_value("{not json");
        let session = Session::restore(store.clone()).unwrap();
        assert!(!session.is_authenticated());
        assert!(store.read().unwrap().is_none());
    }

    #[test]
    fn test_admin_has_every_permission() {
        let mut session = Session::new(MemoryStore::new());
        assert!(!session.has_permission("admin"));
        session.login(&credentials(), "admin", "password").unwrap();
        assert!(session.has_permission("admin"));
        assert!(session.has_permission("editor"));
    }

    #[test]
    fn test_file_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("session.json"));
        assert!(store.read().unwrap().is_none());

        store.write("{}").unwrap();
        assert_eq!(store.read().unwrap().as_deref(), Some("{}"));

        store.clear().unwrap();
        store.clear().unwrap();
        assert!(store.read().unwrap().is_none());
    }
}
