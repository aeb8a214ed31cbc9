//! The item document and its request/response shapes.

use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// An item as stored in the collection.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Item {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "createdAt")]
    pub created_at: bson::DateTime,
    #[serde(rename = "updatedAt", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<bson::DateTime>,
}

/// Fields for a new item. The store assigns `id`.
#[derive(Clone, Debug, PartialEq)]
pub struct NewItem {
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// Fields an update writes. `None` leaves the stored value untouched.
#[derive(Clone, Debug, PartialEq)]
pub struct ItemChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// `POST /items` body. A `name` that is not a string (`0`, `false`, ...)
/// reads as absent, so it fails the same "Name is required" check.
#[derive(Debug, Default, Deserialize)]
pub struct CreateItemRequest {
    #[serde(default, deserialize_with = "string_or_absent")]
    pub name: Option<String>,
    pub description: Option<String>,
}

fn string_or_absent<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

/// `PUT /items/{id}` body. Omitted and `null` fields are both `None`.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateItemRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// An item as returned over HTTP.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemResponse {
    pub id: String,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<Item> for ItemResponse {
    fn from(item: Item) -> Self {
        Self {
            id: item.id.to_hex(),
            name: item.name,
            description: item.description,
            created_at: item.created_at.to_chrono(),
            updated_at: item.updated_at.map(bson::DateTime::to_chrono),
        }
    }
}
