//! In-memory `SessionStore` backend.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::StorageError;

use super::traits::SessionStore;

/// In-memory session storage.
///
/// The default backend: check-in sessions are tab-scoped and deliberately
/// not durable, so a map behind a lock is the whole implementation.
#[derive(Default)]
pub struct MemoryStore {
    sessions: RwLock<HashMap<String, HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live sessions (for tests and diagnostics).
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn load(&self, session_id: &str) -> Result<HashMap<String, String>, StorageError> {
        let sessions = self.sessions.read().await;
        Ok(sessions.get(session_id).cloned().unwrap_or_default())
    }

    async fn replace(
        &self,
        session_id: &str,
        values: HashMap<String, String>,
    ) -> Result<(), StorageError> {
        let mut sessions = self.sessions.write().await;
        if values.is_empty() {
            sessions.remove(session_id);
        } else {
            sessions.insert(session_id.to_string(), values);
        }
        Ok(())
    }

    async fn clear(&self, session_id: &str) -> Result<(), StorageError> {
        let mut sessions = self.sessions.write().await;
        sessions.remove(session_id);
        Ok(())
    }
}
