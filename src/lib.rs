//! # items-api
//!
//! A minimal JSON CRUD service over a single MongoDB collection.
//!
//! ## Layout
//!
//! - A small HTTP layer: typed [`Method`]/[`Status`], a radix-tree
//!   [`Router`] carrying shared state, sealed [`Handler`]s, and a hyper
//!   [`Server`] with graceful shutdown.
//! - [`db::Connection`]: the one shared MongoDB handle (lazy connect,
//!   idempotent close, `NotConnected` until connected).
//! - [`store::ItemStore`]: the persistence seam the handlers talk to.
//! - [`items`]: the five `/items` handlers. [`ApiError`] maps their
//!   failures to status codes in one place.
//!
//! ## Routes
//!
//! | Method | Path | Success |
//! |---|---|---|
//! | GET | `/` | 200 service description |
//! | GET | `/healthz` | 200 |
//! | GET | `/readyz` | 200, or 503 when the store is unreachable |
//! | POST | `/items` | 201 created item |
//! | GET | `/items` | 200 array of items |
//! | GET | `/items/{id}` | 200 item |
//! | PUT | `/items/{id}` | 200 updated item |
//! | DELETE | `/items/{id}` | 200 `{"message": ...}` |
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use items_api::db::Connection;
//! use items_api::store::MongoItemStore;
//! use items_api::{AppState, Server, app};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), items_api::Error> {
//!     let connection = Arc::new(Connection::new());
//!     connection.connect("mongodb://localhost:27017/items").await?;
//!
//!     let store = MongoItemStore::new(Arc::clone(&connection), "items");
//!     let router = app(AppState::new(Arc::new(store)));
//!
//!     Server::bind("0.0.0.0:3000".parse().unwrap()).serve(router).await?;
//!     connection.close().await;
//!     Ok(())
//! }
//! ```

mod api_error;
mod handler;
mod method;
mod request;
mod response;
mod router;
mod server;
mod state;
mod status;

pub mod config;
pub mod db;
pub mod error;
pub mod health;
pub mod item;
pub mod items;
pub mod store;

pub use api_error::ApiError;
pub use error::Error;
pub use handler::Handler;
pub use method::Method;
pub use request::Request;
pub use response::{IntoResponse, Json, Response};
pub use router::Router;
pub use server::Server;
pub use state::AppState;
pub use status::Status;

/// Every route the service answers, wired to `state`.
pub fn app(state: AppState) -> Router<AppState> {
    Router::with_state(state)
        .get("/", health::index)
        .get("/healthz", health::liveness)
        .get("/readyz", health::readiness)
        .post("/items", items::create)
        .get("/items", items::list)
        .get("/items/{id}", items::get)
        .put("/items/{id}", items::update)
        .delete("/items/{id}", items::delete)
}
