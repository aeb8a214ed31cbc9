//! In-memory `ItemStore` so the router can be exercised without MongoDB.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use bson::oid::ObjectId;

use items_api::db::DbError;
use items_api::item::{Item, ItemChanges, NewItem};
use items_api::store::ItemStore;
use items_api::{AppState, Method, Request, Response, Router};

/// Keeps insertion order, like a collection scanned in natural order.
#[derive(Default)]
pub struct MemoryItemStore {
    items: Mutex<Vec<Item>>,
    /// Store calls made, so tests can assert validation short-circuits.
    pub calls: AtomicUsize,
    /// When set, every operation fails as if the database were gone.
    disconnected: bool,
}

impl MemoryItemStore {
    /// A store whose every operation fails with `NotConnected`.
    pub fn disconnected() -> Self {
        Self { disconnected: true, ..Self::default() }
    }

    fn call(&self) -> Result<(), DbError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.disconnected {
            return Err(DbError::NotConnected);
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.items.lock().unwrap().len()
    }
}

#[async_trait]
impl ItemStore for MemoryItemStore {
    async fn insert(&self, item: NewItem) -> Result<Item, DbError> {
        self.call()?;
        let item = Item {
            id: ObjectId::new(),
            name: item.name,
            description: item.description,
            created_at: bson::DateTime::from_chrono(item.created_at),
            updated_at: None,
        };
        self.items.lock().unwrap().push(item.clone());
        Ok(item)
    }

    async fn list(&self) -> Result<Vec<Item>, DbError> {
        self.call()?;
        Ok(self.items.lock().unwrap().clone())
    }

    async fn find(&self, id: ObjectId) -> Result<Option<Item>, DbError> {
        self.call()?;
        Ok(self.items.lock().unwrap().iter().find(|item| item.id == id).cloned())
    }

    async fn update(&self, id: ObjectId, changes: ItemChanges) -> Result<Option<Item>, DbError> {
        self.call()?;
        let mut items = self.items.lock().unwrap();
        let Some(item) = items.iter_mut().find(|item| item.id == id) else {
            return Ok(None);
        };
        if let Some(name) = changes.name {
            item.name = name;
        }
        if let Some(description) = changes.description {
            item.description = description;
        }
        item.updated_at = Some(bson::DateTime::from_chrono(changes.updated_at));
        Ok(Some(item.clone()))
    }

    async fn delete(&self, id: ObjectId) -> Result<bool, DbError> {
        self.call()?;
        let mut items = self.items.lock().unwrap();
        let before = items.len();
        items.retain(|item| item.id != id);
        Ok(items.len() < before)
    }

    async fn ping(&self) -> Result<(), DbError> {
        self.call()
    }
}

pub fn app_with(store: std::sync::Arc<MemoryItemStore>) -> Router<AppState> {
    items_api::app(AppState::new(store))
}

pub async fn send(app: &Router<AppState>, method: Method, path: &str, body: &str) -> Response {
    app.respond(Request::new(method, path, body.as_bytes().to_vec())).await
}

pub fn json(res: &Response) -> serde_json::Value {
    serde_json::from_slice(res.body()).expect("response body is not JSON")
}
