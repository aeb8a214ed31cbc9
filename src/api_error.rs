//! Request-level errors and their HTTP mapping.
//!
//! Every handler returns `Result<_, ApiError>`; this is the one place an
//! error kind becomes a status code. Internal causes are logged and never
//! sent to the client.

use thiserror::Error;

use crate::db::DbError;
use crate::response::{IntoResponse, Response};
use crate::status::Status;

pub const NAME_REQUIRED: &str = "Name is required";
pub const INVALID_ID: &str = "Invalid ID format";
pub const INVALID_BODY: &str = "Invalid JSON body";
pub const ITEM_NOT_FOUND: &str = "Item not found";
pub const INTERNAL: &str = "Internal server error";

#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed or missing client input (400).
    #[error("{0}")]
    Validation(&'static str),

    /// Well-formed request for an item that does not exist (404).
    #[error("Item not found")]
    NotFound,

    /// Store failure or startup-ordering bug (500, logged).
    #[error(transparent)]
    Internal(#[from] DbError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::Validation(message) => (Status::BadRequest, *message),
            Self::NotFound => (Status::NotFound, ITEM_NOT_FOUND),
            Self::Internal(e) => {
                tracing::error!("request failed: {e}");
                (Status::InternalServerError, INTERNAL)
            }
        };

        Response::error(status, message)
    }
}
