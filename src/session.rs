//! Stable run-grouping identifier.
//!
//! The identifier is created once per working context and persisted to a
//! one-line plaintext marker. Repeated invocations reuse it until the
//! marker is cleared.

use std::path::PathBuf;

use chrono::Utc;
use tracing::{debug, info};

use crate::error::SessionError;

const SESSION_TIMESTAMP_FORMAT: &str = "%Y%m%dT%H%M%SZ";

pub(crate) struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub(crate) fn new<TPath>(path: TPath) -> Self
    where
        TPath: Into<PathBuf>,
    {
        Self { path: path.into() }
    }

    /// Return the persisted identifier, generating and persisting a fresh
    /// one when no usable marker exists.
    ///
    /// # Errors
    ///
    /// Returns an error when the marker cannot be read or written.
    pub(crate) fn load_or_create(&self) -> Result<String, SessionError> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => {
                let existing = contents.trim();
                if !existing.is_empty() {
                    debug!("Reusing session {}", existing);
                    return Ok(existing.to_owned());
                }
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => {
                return Err(SessionError::ReadMarker {
                    path: self.path.clone(),
                    source: err,
                });
            }
        }

        let session = generate_session_id();
        std::fs::write(&self.path, format!("{}\n", session)).map_err(|err| {
            SessionError::WriteMarker {
                path: self.path.clone(),
                source: err,
            }
        })?;
        info!("Started session {}", session);
        Ok(session)
    }

    /// Remove the marker; a missing marker is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error when an existing marker cannot be removed.
    pub(crate) fn clear(&self) -> Result<(), SessionError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(SessionError::RemoveMarker {
                path: self.path.clone(),
                source: err,
            }),
        }
    }
}

fn generate_session_id() -> String {
    let suffix: u32 = rand::random();
    format!(
        "{}-{:08x}",
        Utc::now().format(SESSION_TIMESTAMP_FORMAT),
        suffix
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AppError, AppResult};

    fn store_in(dir: &tempfile::TempDir) -> SessionStore {
        SessionStore::new(dir.path().join(".hammer-session"))
    }

    #[test]
    fn repeated_loads_return_the_same_identifier() -> AppResult<()> {
        let dir = tempfile::tempdir()?;
        let store = store_in(&dir);
        let first = store.load_or_create()?;
        let second = store.load_or_create()?;
        if first != second {
            return Err(AppError::session(format!("{} != {}", first, second)));
        }
        Ok(())
    }

    #[test]
    fn clearing_the_marker_yields_a_fresh_identifier() -> AppResult<()> {
        let dir = tempfile::tempdir()?;
        let store = store_in(&dir);
        let first = store.load_or_create()?;
        store.clear()?;
        let second = store.load_or_create()?;
        if first == second {
            return Err(AppError::session("Expected a fresh identifier"));
        }
        Ok(())
    }

    #[test]
    fn clear_tolerates_a_missing_marker() -> AppResult<()> {
        let dir = tempfile::tempdir()?;
        store_in(&dir).clear()?;
        Ok(())
    }

    #[test]
    fn marker_contents_are_trimmed_on_read() -> AppResult<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join(".hammer-session");
        std::fs::write(&path, "  20240101T000000Z-deadbeef  \n")?;
        let session = SessionStore::new(path).load_or_create()?;
        if session != "20240101T000000Z-deadbeef" {
            return Err(AppError::session(format!("Unexpected session: {}", session)));
        }
        Ok(())
    }

    #[test]
    fn generated_identifier_has_timestamp_and_hex_suffix() -> AppResult<()> {
        let dir = tempfile::tempdir()?;
        let session = store_in(&dir).load_or_create()?;
        let (timestamp, suffix) = session
            .rsplit_once('-')
            .ok_or_else(|| AppError::session(format!("Missing separator: {}", session)))?;
        if timestamp.len() != 16 || !timestamp.ends_with('Z') {
            return Err(AppError::session(format!(
                "Unexpected timestamp: {}",
                timestamp
            )));
        }
        if suffix.len() != 8 || !suffix.chars().all(|ch| ch.is_ascii_hexdigit()) {
            return Err(AppError::session(format!("Unexpected suffix: {}", suffix)));
        }
        Ok(())
    }
}
