//! On-disk session: the signed-in user, the token issued by the backend and
//! how the user signed in. The file is replaced atomically and is readable by
//! the owner only.

use crate::portal::error::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::{
    env, fmt, fs,
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
};
use tracing::debug;

const SESSION_DIR: &str = "dsog-portal";
const SESSION_FILE: &str = "session.json";

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AuthMethod {
    #[default]
    Email,
    Google,
}

impl AuthMethod {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Google => "google",
        }
    }
}

impl fmt::Display for AuthMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Serialize, Deserialize, PartialEq)]
pub struct Session {
    pub user: Value,
    pub token: String,
    pub auth_method: AuthMethod,
}

impl Session {
    /// Email of the signed-in user, when the backend provided one.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.user.get("email").and_then(Value::as_str)
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("user", &self.user)
            .field("token", &"[REDACTED]")
            .field("auth_method", &self.auth_method)
            .finish()
    }
}

/// Tolerant view of the session file; incomplete sessions load as `None`.
#[derive(Deserialize)]
struct StoredSession {
    #[serde(default)]
    user: Option<Value>,
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    auth_method: Option<AuthMethod>,
}

impl StoredSession {
    fn into_session(self) -> Option<Session> {
        let user = self.user.filter(|user| !user.is_null())?;
        let token = self.token.filter(|token| !token.is_empty())?;
        Some(Session {
            user,
            token,
            auth_method: self.auth_method.unwrap_or_default(),
        })
    }
}

#[derive(Clone, Debug)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the stored session.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or is not JSON.
    pub fn load(&self) -> Result<Option<Session>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };

        let stored: StoredSession = serde_json::from_slice(&bytes)?;
        Ok(stored.into_session())
    }

    /// Persists `session`, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be written.
    pub fn save(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_vec_pretty(session)?;
        let tmp = self.path.with_extension("json.tmp");

        let mut file = open_private(&tmp)?;
        file.write_all(&json)?;
        file.sync_all()?;
        drop(file);

        fs::rename(&tmp, &self.path)?;
        debug!(path = %self.path.display(), "session saved");

        Ok(())
    }

    /// Removes the stored session. Clearing an absent session is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be removed.
    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!(path = %self.path.display(), "session cleared");
                Ok(())
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(unix)]
fn open_private(path: &Path) -> std::io::Result<fs::File> {
    use std::os::unix::fs::OpenOptionsExt;

    fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)
}

#[cfg(not(unix))]
fn open_private(path: &Path) -> std::io::Result<fs::File> {
    fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
}

/// `$XDG_STATE_HOME/dsog-portal/session.json`, falling back to
/// `$HOME/.local/state/dsog-portal/session.json`.
#[must_use]
pub fn default_path() -> Option<PathBuf> {
    let state_home = env::var_os("XDG_STATE_HOME")
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .or_else(|| {
            env::var_os("HOME")
                .filter(|value| !value.is_empty())
                .map(|home| PathBuf::from(home).join(".local").join("state"))
        })?;

    Some(state_home.join(SESSION_DIR).join(SESSION_FILE))
}
