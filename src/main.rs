//! items-api server binary.
//!
//! Run with:
//!   RUST_LOG=info MONGODB_URI=mongodb://localhost:27017/items cargo run
//!
//! Try:
//!   curl -X POST http://localhost:3000/items \
//!        -H 'content-type: application/json' \
//!        -d '{"name":"lamp","description":"desk lamp"}'
//!   curl http://localhost:3000/items
//!   curl -X DELETE http://localhost:3000/items/507f1f77bcf86cd799439011

use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use tracing::info;
use tracing_subscriber::EnvFilter;

use items_api::config::Config;
use items_api::db::Connection;
use items_api::store::MongoItemStore;
use items_api::{AppState, Server, app};

fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .compact()
        .try_init()
        .map_err(|err| anyhow!(err))
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing()?;

    let config = Config::from_env()?;

    // Fail fast: no requests are accepted until the store answers.
    let connection = Arc::new(Connection::new());
    connection
        .connect(&config.mongodb_uri)
        .await
        .context("initial MongoDB connection failed")?;

    let store = MongoItemStore::new(Arc::clone(&connection), config.collection.clone());
    let router = app(AppState::new(Arc::new(store)));

    let served = Server::bind(config.addr).serve(router).await;

    connection.close().await;
    info!("shutdown complete");
    served.context("server error")
}
