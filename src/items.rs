//! `/items` resource handlers.
//!
//! Each handler validates at most one thing (the body or the `{id}` path
//! segment), makes one store call, and maps the outcome to a response.
//! Validation failures return before the store is touched.

use bson::oid::ObjectId;
use chrono::Utc;
use serde_json::json;
use tracing::{debug, info};

use crate::api_error::{ApiError, INVALID_BODY, INVALID_ID, NAME_REQUIRED};
use crate::item::{CreateItemRequest, ItemChanges, ItemResponse, NewItem, UpdateItemRequest};
use crate::request::Request;
use crate::response::Json;
use crate::state::AppState;
use crate::status::Status;

/// Parses the `{id}` path segment as an ObjectId (24 hex characters).
fn item_id(req: &Request) -> Result<ObjectId, ApiError> {
    req.param("id")
        .and_then(|id| ObjectId::parse_str(id).ok())
        .ok_or(ApiError::Validation(INVALID_ID))
}

/// POST /items
pub async fn create(req: Request, state: AppState) -> Result<(Status, Json<ItemResponse>), ApiError> {
    let body: CreateItemRequest = req.json().map_err(|_| ApiError::Validation(INVALID_BODY))?;
    let name = body
        .name
        .filter(|name| !name.is_empty())
        .ok_or(ApiError::Validation(NAME_REQUIRED))?;

    let item = state
        .items()
        .insert(NewItem {
            name,
            description: body.description.unwrap_or_default(),
            created_at: Utc::now(),
        })
        .await?;

    info!(id = %item.id, "item created");
    Ok((Status::Created, Json(item.into())))
}

/// GET /items
pub async fn list(_req: Request, state: AppState) -> Result<Json<Vec<ItemResponse>>, ApiError> {
    let items = state.items().list().await?;
    debug!(count = items.len(), "items listed");
    Ok(Json(items.into_iter().map(ItemResponse::from).collect()))
}

/// GET /items/{id}
pub async fn get(req: Request, state: AppState) -> Result<Json<ItemResponse>, ApiError> {
    let id = item_id(&req)?;
    let item = state.items().find(id).await?.ok_or(ApiError::NotFound)?;
    Ok(Json(item.into()))
}

/// PUT /items/{id}
///
/// Omitted fields keep their stored value; provided ones are written as
/// given. `updatedAt` is always stamped.
pub async fn update(req: Request, state: AppState) -> Result<Json<ItemResponse>, ApiError> {
    let id = item_id(&req)?;
    let body: UpdateItemRequest = req.json().map_err(|_| ApiError::Validation(INVALID_BODY))?;

    let item = state
        .items()
        .update(id, ItemChanges {
            name: body.name,
            description: body.description,
            updated_at: Utc::now(),
        })
        .await?
        .ok_or(ApiError::NotFound)?;

    info!(%id, "item updated");
    Ok(Json(item.into()))
}

/// DELETE /items/{id}
pub async fn delete(req: Request, state: AppState) -> Result<Json<serde_json::Value>, ApiError> {
    let id = item_id(&req)?;
    if !state.items().delete(id).await? {
        return Err(ApiError::NotFound);
    }

    info!(%id, "item deleted");
    Ok(Json(json!({ "message": "Item deleted successfully" })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::method::Method;

    fn with_id(id: &str) -> Request {
        let mut req = Request::new(Method::Get, format!("/items/{id}"), "");
        req.params.insert("id".to_owned(), id.to_owned());
        req
    }

    #[test]
    fn accepts_24_hex_ids() {
        let id = item_id(&with_id("507f1f77bcf86cd799439011")).unwrap();
        assert_eq!(id.to_hex(), "507f1f77bcf86cd799439011");
    }

    #[test]
    fn rejects_malformed_ids() {
        for bad in ["invalid-id", "507f1f77bcf86cd79943901", "507f1f77bcf86cd79943901z", ""] {
            assert!(matches!(item_id(&with_id(bad)), Err(ApiError::Validation(INVALID_ID))), "{bad}");
        }
    }
}
