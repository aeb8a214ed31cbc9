//! Item persistence.
//!
//! [`ItemStore`] is the seam between the HTTP handlers and the database.
//! [`MongoItemStore`] is the production implementation; each call fetches
//! the current handle from the shared [`Connection`] and issues exactly one
//! driver operation (create issues two: insert, then read-back).

use std::sync::Arc;

use async_trait::async_trait;
use bson::oid::ObjectId;
use bson::{doc, Document};
use futures::TryStreamExt;
use mongodb::options::ReturnDocument;
use mongodb::Collection;

use crate::db::{Connection, DbError};
use crate::item::{Item, ItemChanges, NewItem};

/// Collection used when none is configured.
pub const DEFAULT_COLLECTION: &str = "items";

#[async_trait]
pub trait ItemStore: Send + Sync {
    /// Inserts `item` and returns the stored document, including its new id.
    async fn insert(&self, item: NewItem) -> Result<Item, DbError>;

    /// Every item, in the store's natural order.
    async fn list(&self) -> Result<Vec<Item>, DbError>;

    async fn find(&self, id: ObjectId) -> Result<Option<Item>, DbError>;

    /// Applies `changes` atomically and returns the document after the update,
    /// or `None` when nothing matched `id`.
    async fn update(&self, id: ObjectId, changes: ItemChanges) -> Result<Option<Item>, DbError>;

    /// Returns whether a document was deleted.
    async fn delete(&self, id: ObjectId) -> Result<bool, DbError>;

    /// Round-trips to the backing store. Used by the readiness probe.
    async fn ping(&self) -> Result<(), DbError>;
}

pub struct MongoItemStore {
    connection: Arc<Connection>,
    collection: String,
}

impl MongoItemStore {
    pub fn new(connection: Arc<Connection>, collection: impl Into<String>) -> Self {
        Self { connection, collection: collection.into() }
    }

    async fn items(&self) -> Result<Collection<Item>, DbError> {
        let handle = self.connection.current().await?;
        Ok(handle.database().collection(&self.collection))
    }
}

#[async_trait]
impl ItemStore for MongoItemStore {
    async fn insert(&self, item: NewItem) -> Result<Item, DbError> {
        let items = self.items().await?;
        let inserted = items
            .clone_with_type::<Document>()
            .insert_one(doc! {
                "name": item.name,
                "description": item.description,
                "createdAt": bson::DateTime::from_chrono(item.created_at),
            })
            .await?;

        let id = inserted.inserted_id;
        items
            .find_one(doc! { "_id": id.clone() })
            .await?
            .ok_or_else(|| DbError::MissingAfterInsert(id.to_string()))
    }

    async fn list(&self) -> Result<Vec<Item>, DbError> {
        let cursor = self.items().await?.find(doc! {}).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn find(&self, id: ObjectId) -> Result<Option<Item>, DbError> {
        Ok(self.items().await?.find_one(doc! { "_id": id }).await?)
    }

    async fn update(&self, id: ObjectId, changes: ItemChanges) -> Result<Option<Item>, DbError> {
        let mut set = doc! { "updatedAt": bson::DateTime::from_chrono(changes.updated_at) };
        if let Some(name) = changes.name {
            set.insert("name", name);
        }
        if let Some(description) = changes.description {
            set.insert("description", description);
        }

        Ok(self
            .items()
            .await?
            .find_one_and_update(doc! { "_id": id }, doc! { "$set": set })
            .return_document(ReturnDocument::After)
            .await?)
    }

    async fn delete(&self, id: ObjectId) -> Result<bool, DbError> {
        let result = self.items().await?.delete_one(doc! { "_id": id }).await?;
        Ok(result.deleted_count > 0)
    }

    async fn ping(&self) -> Result<(), DbError> {
        let handle = self.connection.current().await?;
        handle.database().run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    #[tokio::test]
    async fn operations_fail_when_not_connected() {
        let store = MongoItemStore::new(Arc::new(Connection::new()), DEFAULT_COLLECTION);
        assert!(matches!(store.list().await, Err(DbError::NotConnected)));
        assert!(matches!(store.find(ObjectId::new()).await, Err(DbError::NotConnected)));
        assert!(matches!(store.ping().await, Err(DbError::NotConnected)));
    }

    // Run with: MONGODB_URI=mongodb://... cargo test -- --ignored

    #[tokio::test]
    #[ignore = "requires database"]
    async fn mongo_round_trip() {
        let uri = std::env::var("MONGODB_URI").expect("MONGODB_URI required");
        let connection = Arc::new(Connection::new());
        connection.connect(&uri).await.expect("connect failed");
        let store = MongoItemStore::new(Arc::clone(&connection), "items_store_test");

        let created = store
            .insert(NewItem { name: "X".into(), description: "Y".into(), created_at: Utc::now() })
            .await
            .expect("insert failed");
        let found = store.find(created.id).await.unwrap().expect("item missing");
        assert_eq!(found, created);

        let updated = store
            .update(created.id, ItemChanges { name: Some("Z".into()), description: None, updated_at: Utc::now() })
            .await
            .unwrap()
            .expect("item missing");
        assert_eq!(updated.name, "Z");
        assert_eq!(updated.description, "Y");
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at.is_some());

        assert!(store.delete(created.id).await.unwrap());
        assert!(!store.delete(created.id).await.unwrap());
        assert!(store.find(created.id).await.unwrap().is_none());

        connection.close().await;
    }
}
