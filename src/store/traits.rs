//! Backend-agnostic `SessionStore` trait.
//!
//! The flow treats storage as a serialization boundary only: a session is
//! loaded as a whole at the start of an operation and written back as a
//! whole afterwards. Whole-session granularity also makes the completion
//! clear a single atomic batch — partial clears are a bug class this
//! interface rules out.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::StorageError;

/// Storage for per-session string key-value state.
///
/// Sessions live for the duration of one check-in (the browser-tab analog);
/// they are never persisted across service restarts by design.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Load every key-value pair for a session. Unknown sessions load empty.
    async fn load(&self, session_id: &str) -> Result<HashMap<String, String>, StorageError>;

    /// Replace the entire key set for a session with `values`.
    async fn replace(
        &self,
        session_id: &str,
        values: HashMap<String, String>,
    ) -> Result<(), StorageError>;

    /// Remove every key for a session in one batch.
    async fn clear(&self, session_id: &str) -> Result<(), StorageError>;
}
