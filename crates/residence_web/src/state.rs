//! Shared application state: the explicitly constructed store handle.

use crate::error::{WebError, WebResult};
use rusqlite::Connection;
use std::sync::{Arc, Mutex};

/// Cloneable handle passed to every handler.
///
/// Holds the single store connection. Store work runs on the blocking pool
/// so request tasks only suspend while waiting for it.
#[derive(Clone)]
pub struct AppState {
    store: Arc<Mutex<Connection>>,
}

impl AppState {
    /// Wraps a migrated connection.
    pub fn new(conn: Connection) -> Self {
        Self {
            store: Arc::new(Mutex::new(conn)),
        }
    }

    /// Runs `op` against the store connection off the async runtime.
    pub async fn with_store<T, F>(&self, op: F) -> WebResult<T>
    where
        F: FnOnce(&Connection) -> WebResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || {
            let conn = store.lock().map_err(|_| WebError::StorePoisoned)?;
            op(&conn)
        })
        .await
        .map_err(WebError::Join)?
    }
}
