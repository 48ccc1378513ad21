use axum::{Json, extract::State};
use serde_json::{Value, json};
use tracing::info;

use crate::error::SkycastError;
use crate::router::AppState;

/// GET /api/health
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// POST /api/init-db -> drops and recreates the users table.
pub async fn init_db(State(state): State<AppState>) -> Result<Json<Value>, SkycastError> {
    state.users.storage().reset_schema().await?;
    info!("database reinitialized");
    Ok(Json(json!({ "message": "Database initialized successfully" })))
}
