use crate::common::AppResult;
use crate::model::Session;
use std::fs;
use std::path::PathBuf;

/// File-backed persistence for the current session: one serialized JSON
/// record at a fixed path, the local-storage slot of the original client.
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn save(&self, session: &Session) -> AppResult<()> {
        let content = serde_json::to_string_pretty(session)?;
        fs::write(&self.path, content)?;
        Ok(())
    }

    /// Returns the persisted session, or `None` when there is none. A record
    /// that no longer parses is treated as absent and removed.
    pub fn load(&self) -> Option<Session> {
        let content = fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str(&content) {
            Ok(session) => Some(session),
            Err(e) => {
                log::warn!("discarding unreadable session record: {}", e);
                self.clear();
                None
            }
        }
    }

    pub fn clear(&self) {
        if let Err(e) = fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                log::warn!("failed to remove session record: {}", e);
            }
        }
    }
}
