//! Session state: the bearer credential and identity of the current user.
//!
//! The [`Session`] is the single owner of the credential. It is passed to
//! every flow that needs it; only the auth flows write to it (through
//! `establish`) and [`Session::logout`] destroys it. Durable storage is read
//! once, in [`Session::restore`], and written on every login and logout.
//!
//! Storage holds exactly two keys, [`keys::TOKEN`] and [`keys::USER`], which
//! are always written and cleared together.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use candy_market_core::User;
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Map, Value};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::error::{clear_sentry_user, set_sentry_user};

/// Keys used in durable session storage.
pub mod keys {
    /// Key for the bearer token.
    pub const TOKEN: &str = "token";

    /// Key for the identity record.
    pub const USER: &str = "user";
}

/// Errors reading or writing durable session storage.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("could not access session file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("stored session is unreadable: {0}")]
    Corrupt(String),
}

/// A persisted token and identity.
#[derive(Clone)]
pub struct StoredSession {
    pub token: SecretString,
    pub user: User,
}

impl std::fmt::Debug for StoredSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoredSession")
            .field("token", &"[REDACTED]")
            .field("user", &self.user)
            .finish()
    }
}

/// Durable key-value storage for the session.
pub trait SessionStorage: Send + Sync {
    /// Read the stored session, `None` if there is none.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if storage exists but cannot be read or parsed.
    fn load(&self) -> Result<Option<StoredSession>, SessionError>;

    /// Persist both keys.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if storage cannot be written.
    fn save(&self, session: &StoredSession) -> Result<(), SessionError>;

    /// Remove both keys.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if storage cannot be written.
    fn clear(&self) -> Result<(), SessionError>;
}

// =============================================================================
// File storage
// =============================================================================

/// Session storage in a small JSON file.
///
/// Writes go through a uniquely named temporary file in the same directory
/// that is then persisted over the target, so a crash never leaves half a
/// session on disk. The file is readable by its owner only.
#[derive(Debug, Clone)]
pub struct FileSessionStorage {
    path: PathBuf,
}

impl FileSessionStorage {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> SessionError {
        SessionError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl SessionStorage for FileSessionStorage {
    fn load(&self) -> Result<Option<StoredSession>, SessionError> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_error(e)),
        };

        let map: Map<String, Value> =
            serde_json::from_str(&text).map_err(|e| SessionError::Corrupt(e.to_string()))?;
        decode(map)
    }

    fn save(&self, session: &StoredSession) -> Result<(), SessionError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir).map_err(|e| self.io_error(e))?;

        let text = serde_json::to_string_pretty(&encode(session)?)
            .map_err(|e| SessionError::Corrupt(e.to_string()))?;

        // Created owner-only (0600 on Unix); removed on drop if never persisted
        let mut tmp = NamedTempFile::new_in(dir).map_err(|e| self.io_error(e))?;
        tmp.write_all(text.as_bytes())
            .and_then(|()| tmp.as_file().sync_all())
            .map_err(|e| self.io_error(e))?;
        tmp.persist(&self.path)
            .map(drop)
            .map_err(|e| self.io_error(e.error))
    }

    fn clear(&self) -> Result<(), SessionError> {
        match std::fs::remove_file(&self.path) {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(self.io_error(e)),
            _ => Ok(()),
        }
    }
}

/// In-process session storage, lost on exit.
#[derive(Debug, Default)]
pub struct MemorySessionStorage {
    entries: Mutex<Map<String, Value>>,
}

impl MemorySessionStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, Map<String, Value>> {
        self.entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl SessionStorage for MemorySessionStorage {
    fn load(&self) -> Result<Option<StoredSession>, SessionError> {
        decode(self.entries().clone())
    }

    fn save(&self, session: &StoredSession) -> Result<(), SessionError> {
        *self.entries() = encode(session)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        self.entries().clear();
        Ok(())
    }
}

fn encode(session: &StoredSession) -> Result<Map<String, Value>, SessionError> {
    let user = serde_json::to_value(&session.user).map_err(|e| SessionError::Corrupt(e.to_string()))?;
    let mut map = Map::new();
    map.insert(
        keys::TOKEN.to_owned(),
        Value::String(session.token.expose_secret().to_owned()),
    );
    map.insert(keys::USER.to_owned(), user);
    Ok(map)
}

/// Both keys or nothing: a half-written session counts as no session.
fn decode(mut map: Map<String, Value>) -> Result<Option<StoredSession>, SessionError> {
    let (Some(token), Some(user)) = (map.remove(keys::TOKEN), map.remove(keys::USER)) else {
        return Ok(None);
    };

    let Value::String(token) = token else {
        return Err(SessionError::Corrupt("token is not a string".to_owned()));
    };
    if token.is_empty() {
        return Ok(None);
    }

    let user: User =
        serde_json::from_value(user).map_err(|e| SessionError::Corrupt(e.to_string()))?;
    Ok(Some(StoredSession {
        token: SecretString::from(token),
        user,
    }))
}

// =============================================================================
// Session
// =============================================================================

/// The current credential and identity.
pub struct Session {
    storage: Box<dyn SessionStorage>,
    current: Option<StoredSession>,
}

impl Session {
    /// Restore the session from storage.
    ///
    /// Unreadable storage is logged and treated as no session.
    pub fn restore(storage: impl SessionStorage + 'static) -> Self {
        let current = match storage.load() {
            Ok(current) => current,
            Err(e) => {
                warn!(error = %e, "Ignoring unreadable stored session");
                None
            }
        };

        if let Some(stored) = &current {
            info!(email = %stored.user.email, role = %stored.user.role, "Session restored");
            set_sentry_user(&stored.user);
        } else {
            debug!("No stored session");
        }

        Self {
            storage: Box::new(storage),
            current,
        }
    }

    /// An empty session backed by in-memory storage.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::restore(MemorySessionStorage::new())
    }

    /// The bearer token, if logged in.
    #[must_use]
    pub fn token(&self) -> Option<&SecretString> {
        self.current.as_ref().map(|s| &s.token)
    }

    /// The identity record, if logged in.
    #[must_use]
    pub fn user(&self) -> Option<&User> {
        self.current.as_ref().map(|s| &s.user)
    }

    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.current.is_some()
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.user().is_some_and(User::is_admin)
    }

    /// Install a new credential and identity, persisting both.
    ///
    /// A storage failure is logged; the in-memory session is still set.
    pub(crate) fn establish(&mut self, token: SecretString, user: User) {
        let stored = StoredSession { token, user };
        if let Err(e) = self.storage.save(&stored) {
            warn!(error = %e, "Could not persist session");
        }
        info!(email = %stored.user.email, role = %stored.user.role, "Session established");
        set_sentry_user(&stored.user);
        self.current = Some(stored);
    }

    /// Replace the identity record, keeping the token.
    pub(crate) fn refresh_user(&mut self, user: User) {
        if let Some(stored) = &mut self.current {
            stored.user = user;
            if let Err(e) = self.storage.save(stored) {
                warn!(error = %e, "Could not persist session");
            }
        }
    }

    /// Destroy the session: memory and storage, token and identity together.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if storage could not be cleared. The in-memory
    /// session is cleared regardless.
    pub fn logout(&mut self) -> Result<(), SessionError> {
        if let Some(stored) = self.current.take() {
            info!(email = %stored.user.email, "Logged out");
        }
        clear_sentry_user();
        self.storage.clear()
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("current", &self.current)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use candy_market_core::{Email, Role, UserId};

    fn user(role: Role) -> User {
        User {
            id: Some(UserId::new(7)),
            email: Email::parse("ana@example.com").unwrap(),
            role,
            is_active: true,
            created_at: None,
        }
    }

    fn stored(role: Role) -> StoredSession {
        StoredSession {
            token: SecretString::from("tok-123"),
            user: user(role),
        }
    }

    #[test]
    fn test_file_storage_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileSessionStorage::new(dir.path().join("nested/session.json"));

        assert!(storage.load().unwrap().is_none());
        storage.save(&stored(Role::Admin)).unwrap();

        let loaded = storage.load().unwrap().unwrap();
        assert_eq!(loaded.token.expose_secret(), "tok-123");
        assert_eq!(loaded.user, user(Role::Admin));

        let raw: Value =
            serde_json::from_str(&std::fs::read_to_string(storage.path()).unwrap()).unwrap();
        assert_eq!(raw[keys::TOKEN], "tok-123");
        assert_eq!(raw[keys::USER]["role"], "ADMIN");
    }

    #[cfg(unix)]
    #[test]
    fn test_saved_session_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let storage = FileSessionStorage::new(dir.path().join("session.json"));
        storage.save(&stored(Role::User)).unwrap();

        let mode = std::fs::metadata(storage.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o077, 0, "session file mode is {mode:o}");
    }

    #[test]
    fn test_save_leaves_only_the_session_file() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileSessionStorage::new(dir.path().join("session.json"));
        storage.save(&stored(Role::User)).unwrap();
        storage.save(&stored(Role::Admin)).unwrap();

        let names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(names, ["session.json"]);
        assert_eq!(storage.load().unwrap().unwrap().user.role, Role::Admin);
    }

    #[test]
    fn test_half_written_session_is_no_session() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, r#"{"token":"tok-123"}"#).unwrap();

        assert!(FileSessionStorage::new(path).load().unwrap().is_none());
    }

    #[test]
    fn test_corrupt_file_restores_empty_session() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "not json").unwrap();

        let storage = FileSessionStorage::new(&path);
        assert!(matches!(storage.load(), Err(SessionError::Corrupt(_))));

        let session = Session::restore(storage);
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_restore_reads_storage() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileSessionStorage::new(dir.path().join("session.json"));
        storage.save(&stored(Role::Admin)).unwrap();

        let session = Session::restore(storage);
        assert!(session.is_authenticated());
        assert!(session.is_admin());
        assert_eq!(session.token().unwrap().expose_secret(), "tok-123");
    }

    #[test]
    fn test_logout_clears_memory_and_storage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let mut session = Session::restore(FileSessionStorage::new(&path));

        session.establish(SecretString::from("tok-123"), user(Role::User));
        assert!(path.exists());
        assert!(!session.is_admin());

        session.logout().unwrap();
        assert!(!session.is_authenticated());
        assert!(session.token().is_none());
        assert!(session.user().is_none());
        assert!(!path.exists());

        // Logging out twice is harmless
        session.logout().unwrap();
    }

    #[test]
    fn test_debug_redacts_token() {
        let mut session = Session::in_memory();
        session.establish(SecretString::from("tok-123"), user(Role::User));
        let output = format!("{session:?}");
        assert!(!output.contains("tok-123"));
        assert!(output.contains("[REDACTED]"));
    }
}
