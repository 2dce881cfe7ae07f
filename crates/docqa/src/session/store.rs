//! Session registry

use async_trait::async_trait;
use dashmap::DashMap;
use std::path::PathBuf;
use std::sync::Arc;

use crate::error::{Error, Result};

use super::model::{Session, SessionId};

/// Trait for session registries
///
/// Implementations:
/// - `InMemorySessionStore`: process-local map, sessions are lost on restart
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Register a new session with its own temp directory
    async fn create(&self, filename: &str) -> Result<Arc<Session>>;

    /// Look up a session
    async fn get(&self, id: &SessionId) -> Result<Arc<Session>>;

    /// Remove a session and its temp directory
    async fn delete(&self, id: &SessionId) -> Result<()>;

    /// Number of live sessions
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// In-memory session registry with per-session directories under `temp_root`
pub struct InMemorySessionStore {
    sessions: DashMap<SessionId, Arc<Session>>,
    temp_root: PathBuf,
}

impl InMemorySessionStore {
    pub fn new(temp_root: impl Into<PathBuf>) -> Self {
        Self {
            sessions: DashMap::new(),
            temp_root: temp_root.into(),
        }
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn create(&self, filename: &str) -> Result<Arc<Session>> {
        let id = SessionId::new();
        let temp_dir = self.temp_root.join(id.to_string());
        tokio::fs::create_dir_all(&temp_dir).await?;

        let session = Arc::new(Session::new(id, filename, temp_dir));
        self.sessions.insert(id, Arc::clone(&session));

        tracing::info!("Created session {} for {}", id, filename);
        Ok(session)
    }

    async fn get(&self, id: &SessionId) -> Result<Arc<Session>> {
        self.sessions
            .get(id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| Error::SessionNotFound(id.to_string()))
    }

    async fn delete(&self, id: &SessionId) -> Result<()> {
        let (_, session) = self
            .sessions
            .remove(id)
            .ok_or_else(|| Error::SessionNotFound(id.to_string()))?;

        match tokio::fs::remove_dir_all(session.temp_dir()).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(
                "Could not remove {} for session {}: {}",
                session.temp_dir().display(),
                id,
                e
            ),
        }

        tracing::info!("Deleted session {}", id);
        Ok(())
    }

    fn len(&self) -> usize {
        self.sessions.len()
    }
}
