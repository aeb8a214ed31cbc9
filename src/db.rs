//! MongoDB connection lifecycle.
//!
//! A [`Connection`] owns at most one live [`Handle`]. It is constructed once
//! at startup, connected before the server accepts requests, shared by every
//! handler through the store, and closed after the server drains.
//!
//! ```text
//! disconnected ──connect()──▶ connected ──close()──▶ disconnected
//!      ▲   │                    │   ▲
//!      └───┘ close() no-op      └───┘ connect() returns existing handle
//! ```

use std::sync::Arc;

use bson::doc;
use mongodb::{Client, Database};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Database used when the connection string does not name one.
pub const FALLBACK_DATABASE: &str = "test";

#[derive(Debug, Error)]
pub enum DbError {
    /// A handler ran before `connect` succeeded, or after `close`.
    #[error("database not connected")]
    NotConnected,

    #[error("failed to connect to MongoDB: {0}")]
    Connect(#[source] mongodb::error::Error),

    #[error("MongoDB operation failed: {0}")]
    Store(#[from] mongodb::error::Error),

    /// An insert succeeded but the read-back by its new id found nothing.
    #[error("inserted document {0} could not be read back")]
    MissingAfterInsert(String),
}

/// The live reference to the selected database on an established connection.
///
/// Cheap to clone; clones point at the same underlying client.
#[derive(Clone, Debug)]
pub struct Handle {
    inner: Arc<HandleInner>,
}

#[derive(Debug)]
struct HandleInner {
    client: Client,
    database: Database,
}

impl Handle {
    pub fn database(&self) -> &Database {
        &self.inner.database
    }

    /// True when both handles came from the same `connect` call.
    pub fn same_connection(&self, other: &Handle) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

/// Owner of the single shared database handle.
#[derive(Debug, Default)]
pub struct Connection {
    state: RwLock<Option<Handle>>,
}

impl Connection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Connects to `uri` unless already connected, in which case the
    /// existing handle is returned unchanged.
    ///
    /// The database is the one named in the URI, or [`FALLBACK_DATABASE`].
    /// Reachability is verified with a `ping` so an unreachable server fails
    /// here rather than on the first request. Failures are not retried.
    pub async fn connect(&self, uri: &str) -> Result<Handle, DbError> {
        // Held across the handshake so concurrent callers cannot both connect.
        let mut state = self.state.write().await;
        if let Some(handle) = state.as_ref() {
            debug!("connect called while connected, reusing handle");
            return Ok(handle.clone());
        }

        let client = Client::with_uri_str(uri).await.map_err(DbError::Connect)?;
        let database = client
            .default_database()
            .unwrap_or_else(|| client.database(FALLBACK_DATABASE));

        database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(DbError::Connect)?;

        info!(database = %database.name(), "connected to MongoDB");

        let handle = Handle { inner: Arc::new(HandleInner { client, database }) };
        *state = Some(handle.clone());
        Ok(handle)
    }

    /// Shuts the client down and forgets the handle. A no-op when not
    /// connected, so calling it twice is safe.
    pub async fn close(&self) {
        let Some(handle) = self.state.write().await.take() else {
            return;
        };
        handle.inner.client.clone().shutdown().await;
        info!("MongoDB connection closed");
    }

    /// Returns the active handle, or [`DbError::NotConnected`].
    pub async fn current(&self) -> Result<Handle, DbError> {
        self.state.read().await.clone().ok_or(DbError::NotConnected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn current_before_connect_is_not_connected() {
        let conn = Connection::new();
        assert!(matches!(conn.current().await, Err(DbError::NotConnected)));
    }

    #[tokio::test]
    async fn close_without_connect_is_noop() {
        let conn = Connection::new();
        conn.close().await;
        conn.close().await;
        assert!(matches!(conn.current().await, Err(DbError::NotConnected)));
    }

    #[tokio::test]
    async fn unreachable_server_fails_and_stays_disconnected() {
        let conn = Connection::new();
        let err = conn
            .connect("mongodb://127.0.0.1:1/items?serverSelectionTimeoutMS=200")
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Connect(_)));
        assert!(matches!(conn.current().await, Err(DbError::NotConnected)));
    }

    #[tokio::test]
    async fn malformed_uri_is_a_connect_error() {
        let conn = Connection::new();
        let err = conn.connect("not-a-mongodb-uri").await.unwrap_err();
        assert!(matches!(err, DbError::Connect(_)));
    }

    // Run with: MONGODB_URI=mongodb://... cargo test -- --ignored

    #[tokio::test]
    #[ignore = "requires database"]
    async fn connect_is_idempotent_and_close_resets() {
        let uri = std::env::var("MONGODB_URI").expect("MONGODB_URI required");
        let conn = Connection::new();

        let first = conn.connect(&uri).await.expect("connect failed");
        let second = conn.connect(&uri).await.expect("second connect failed");
        assert!(first.same_connection(&second));
        assert!(conn.current().await.unwrap().same_connection(&first));

        conn.close().await;
        conn.close().await;
        assert!(matches!(conn.current().await, Err(DbError::NotConnected)));

        let fresh = conn.connect(&uri).await.expect("reconnect failed");
        assert!(!fresh.same_connection(&first));
        conn.close().await;
    }
}
