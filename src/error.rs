//! Unified error type.

use thiserror::Error;

use crate::db::DbError;

/// The error type returned by the service's fallible infrastructure.
///
/// Request-level failures (400, 404, ...) are [`ApiError`](crate::ApiError)s
/// rendered as responses. This type surfaces what stops the process from
/// serving at all: bad configuration, binding a port, reaching the store.
#[derive(Debug, Error)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Db(#[from] DbError),

    #[error("config: {0}")]
    Config(String),
}
