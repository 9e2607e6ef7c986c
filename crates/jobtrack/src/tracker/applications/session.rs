use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use tracing::debug;

/// File-backed store for the tracker session cookie.
///
/// The API authenticates with a session cookie issued at login. Browsers
/// carry it implicitly; here it is persisted as a single `name=value`
/// line so the cookie survives between invocations.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the stored cookie pair, or `None` when no session exists.
    pub fn load(&self) -> Result<Option<String>, SessionError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => {
                let cookie = contents.trim();
                if cookie.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(cookie.to_string()))
                }
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(SessionError::Read {
                path: self.path.clone(),
                source,
            }),
        }
    }

    pub fn save(&self, cookie: &str) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|source| SessionError::Write {
                    path: self.path.clone(),
                    source,
                })?;
            }
        }
        fs::write(&self.path, format!("{cookie}\n")).map_err(|source| SessionError::Write {
            path: self.path.clone(),
            source,
        })?;
        debug!(path = %self.path.display(), "session cookie stored");
        Ok(())
    }

    /// Discards the stored session. Missing files are fine.
    pub fn clear(&self) -> Result<(), SessionError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(SessionError::Write {
                path: self.path.clone(),
                source,
            }),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("failed to read session file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write session file {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("login response carried no session cookie")]
    MissingSessionCookie,
}
