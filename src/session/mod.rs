//! Client-side session state, persisted across invocations.
//!
//! The store is the single source of truth for what this client
//! believes about its authentication state. It keeps one JSON document
//! on disk whose field names mirror the storage keys used by the
//! backend's web front-end (`accessToken`, `refreshToken`, `usuario`),
//! so a session is either fully present or absent; there is no window
//! where one credential exists without the other.

use anyhow::{anyhow, Context, Result};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, warn};

use crate::api::types::Usuario;

/// In-memory authentication state: both credentials plus the cached
/// profile. The profile carries no authority; it is a client-local copy
/// of server-issued data.
#[derive(Debug, Clone)]
pub struct Session {
    pub access_token: SecretString,
    pub refresh_token: SecretString,
    pub usuario: Option<Usuario>,
}

/// On-disk document. Tokens are stored in the clear, as the browser
/// front-end this client replaces did with its local storage.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredSession {
    access_token: String,
    refresh_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    usuario: Option<Usuario>,
}

impl From<StoredSession> for Session {
    fn from(stored: StoredSession) -> Self {
        Self {
            access_token: SecretString::from(stored.access_token),
            refresh_token: SecretString::from(stored.refresh_token),
            usuario: stored.usuario,
        }
    }
}

impl From<&Session> for StoredSession {
    fn from(session: &Session) -> Self {
        Self {
            access_token: session.access_token.expose_secret().to_string(),
            refresh_token: session.refresh_token.expose_secret().to_string(),
            usuario: session.usuario.clone(),
        }
    }
}

pub struct SessionStore {
    path: PathBuf,
    current: RwLock<Option<Session>>,
}

impl SessionStore {
    /// Open the store and hydrate the persisted session, if any.
    /// Malformed or credential-less contents are treated as no session
    /// and the file is removed so the next start is clean.
    #[must_use]
    pub fn open(path: PathBuf) -> Self {
        let current = hydrate(&path);
        Self {
            path,
            current: RwLock::new(current),
        }
    }

    /// Resolve the default session file path:
    /// `{data_dir}/acceso/session.json`.
    ///
    /// # Errors
    /// Returns an error if no OS data directory can be resolved or the
    /// directory cannot be created.
    pub fn default_path() -> Result<PathBuf> {
        let base = dirs::data_dir()
            .or_else(|| {
                dirs::home_dir().map(|mut h| {
                    h.push(".local");
                    h.push("share");
                    h
                })
            })
            .context("failed to resolve OS data directory - tried data_dir() and home_dir()/.local/share")?;

        let mut dir = base;
        dir.push("acceso");

        fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create session directory at {}", dir.display()))?;

        dir.push("session.json");

        Ok(dir)
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current session, if one is active.
    #[must_use]
    pub fn session(&self) -> Option<Session> {
        self.read_lock().clone()
    }

    #[must_use]
    pub fn access_token(&self) -> Option<SecretString> {
        self.read_lock().as_ref().map(|s| s.access_token.clone())
    }

    #[must_use]
    pub fn refresh_token(&self) -> Option<SecretString> {
        self.read_lock().as_ref().map(|s| s.refresh_token.clone())
    }

    /// Persist a full session: both credentials and the profile are
    /// written together in a single document.
    ///
    /// # Errors
    /// Returns an error if the session file cannot be written.
    pub fn commit(&self, session: Session) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("failed to create session directory at {}", dir.display()))?;
        }

        let raw = serde_json::to_vec_pretty(&StoredSession::from(&session))?;
        fs::write(&self.path, raw)
            .with_context(|| format!("failed to write session file {}", self.path.display()))?;

        *self.write_lock() = Some(session);

        Ok(())
    }

    /// Replace the access credential after a renewal, keeping the
    /// refresh credential and profile.
    ///
    /// # Errors
    /// Returns an error if no session is active or the file write fails.
    pub fn replace_access_token(&self, access_token: SecretString) -> Result<()> {
        let mut session = self
            .session()
            .ok_or_else(|| anyhow!("no active session to renew"))?;
        session.access_token = access_token;
        self.commit(session)
    }

    /// Replace the cached profile, keeping both credentials.
    ///
    /// # Errors
    /// Returns an error if no session is active or the file write fails.
    pub fn replace_usuario(&self, usuario: Usuario) -> Result<()> {
        let mut session = self
            .session()
            .ok_or_else(|| anyhow!("no active session to update"))?;
        session.usuario = Some(usuario);
        self.commit(session)
    }

    /// Destroy the session. Idempotent: clearing an absent session is
    /// not an error.
    ///
    /// # Errors
    /// Returns an error if the session file exists but cannot be removed.
    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => debug!("removed session file {}", self.path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("failed to remove session file {}", self.path.display()));
            }
        }

        *self.write_lock() = None;

        Ok(())
    }

    fn read_lock(&self) -> RwLockReadGuard<'_, Option<Session>> {
        self.current.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_lock(&self) -> RwLockWriteGuard<'_, Option<Session>> {
        self.current.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn hydrate(path: &Path) -> Option<Session> {
    let raw = match fs::read(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
        Err(e) => {
            warn!("failed to read session file {}: {e}", path.display());
            return None;
        }
    };

    match serde_json::from_slice::<StoredSession>(&raw) {
        Ok(stored) if !stored.access_token.is_empty() && !stored.refresh_token.is_empty() => {
            debug!("hydrated session from {}", path.display());
            Some(stored.into())
        }
        Ok(_) => {
            // A profile or lone credential without the full pair is an
            // unauthenticated leftover.
            warn!("incomplete session in {}, clearing", path.display());
            let _ = fs::remove_file(path);
            None
        }
        Err(e) => {
            warn!("malformed session in {}: {e}, clearing", path.display());
            let _ = fs::remove_file(path);
            None
        }
    }
}
