//! Session identity and lifecycle

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::retrieval::Collection;

/// Opaque session identifier (UUID v4)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a client-supplied identifier; anything that is not one of ours
    /// is an unknown session
    pub fn parse(value: &str) -> Result<Self> {
        Uuid::parse_str(value.trim())
            .map(Self)
            .map_err(|_| Error::SessionNotFound(value.to_string()))
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Results of processing, available once the session is queryable
#[derive(Debug, Clone)]
pub struct ReadySession {
    pub collection: Arc<Collection>,
    /// Combined text length in characters
    pub text_length: usize,
    pub image_count: usize,
    pub chunk_count: usize,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone)]
enum SessionState {
    Processing,
    Ready(ReadySession),
}

/// One uploaded document and everything built from it
#[derive(Debug)]
pub struct Session {
    id: SessionId,
    filename: String,
    temp_dir: PathBuf,
    created_at: DateTime<Utc>,
    state: RwLock<SessionState>,
}

impl Session {
    pub fn new(id: SessionId, filename: impl Into<String>, temp_dir: PathBuf) -> Self {
        Self {
            id,
            filename: filename.into(),
            temp_dir,
            created_at: Utc::now(),
            state: RwLock::new(SessionState::Processing),
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Directory holding the upload and extracted images
    pub fn temp_dir(&self) -> &Path {
        &self.temp_dir
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Record processing results; the session becomes queryable
    pub fn mark_ready(&self, ready: ReadySession) {
        *self.state.write() = SessionState::Ready(ready);
    }

    /// "processing" or "active"
    pub fn status(&self) -> &'static str {
        match &*self.state.read() {
            SessionState::Processing => "processing",
            SessionState::Ready(_) => "active",
        }
    }

    /// Processing results, if the session is ready
    pub fn ready(&self) -> Option<ReadySession> {
        match &*self.state.read() {
            SessionState::Processing => None,
            SessionState::Ready(ready) => Some(ready.clone()),
        }
    }

    /// The session's collection; fails while the document is still processing
    pub fn collection(&self) -> Result<Arc<Collection>> {
        match &*self.state.read() {
            SessionState::Processing => Err(Error::SessionNotReady(self.id.to_string())),
            SessionState::Ready(ready) => Ok(Arc::clone(&ready.collection)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_id_parse() {
        let id = SessionId::new();
        assert_eq!(SessionId::parse(&id.to_string()).unwrap(), id);
        assert!(matches!(SessionId::parse("not-a-uuid"), Err(Error::SessionNotFound(_))));
    }

    #[test]
    fn test_lifecycle() {
        let session = Session::new(SessionId::new(), "report.pdf", PathBuf::from("/tmp/x"));
        assert_eq!(session.status(), "processing");
        assert!(matches!(session.collection(), Err(Error::SessionNotReady(_))));
        assert!(session.ready().is_none());

        session.mark_ready(ReadySession {
            collection: Arc::new(Collection::new("session-x", "all-minilm", 384)),
            text_length: 42,
            image_count: 1,
            chunk_count: 0,
            warnings: vec![],
        });

        assert_eq!(session.status(), "active");
        assert_eq!(session.collection().unwrap().name(), "session-x");
        assert_eq!(session.ready().unwrap().text_length, 42);
    }
}
