//! Service description and Kubernetes probes.
//!
//! | Probe | Path | Question |
//! |---|---|---|
//! | **Liveness** | `/healthz` | Is the process alive? Failure → restart. |
//! | **Readiness** | `/readyz` | Can the store be reached? Failure → pulled from load-balancer. |

use serde_json::{Value, json};

use crate::request::Request;
use crate::response::Json;
use crate::state::AppState;
use crate::status::Status;

/// GET /
pub async fn index(_req: Request, _state: AppState) -> Json<Value> {
    Json(json!({
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "description": env!("CARGO_PKG_DESCRIPTION"),
        "endpoints": {
            "POST /items": "Create an item",
            "GET /items": "List all items",
            "GET /items/{id}": "Get an item by id",
            "PUT /items/{id}": "Update an item",
            "DELETE /items/{id}": "Delete an item",
        },
    }))
}

/// Liveness. No dependencies: if the process answers HTTP, it is alive.
pub async fn liveness(_req: Request, _state: AppState) -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Readiness. Pings the store through the shared connection.
pub async fn readiness(_req: Request, state: AppState) -> (Status, Json<Value>) {
    match state.items().ping().await {
        Ok(()) => (Status::Ok, Json(json!({ "status": "ready" }))),
        Err(e) => {
            tracing::warn!("readiness check failed: {e}");
            (Status::ServiceUnavailable, Json(json!({ "error": "Database unavailable" })))
        }
    }
}
