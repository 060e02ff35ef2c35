use axum::extract::State;
use axum::Json;

use crate::error::Result;
use crate::model::MessageResponse;
use crate::state::AppState;

/// `GET /health-check`: probes the storage backend.
pub async fn health_handler(State(state): State<AppState>) -> Result<Json<MessageResponse>> {
    state.catalog().ping().await?;

    Ok(Json(MessageResponse {
        message: "OK".to_owned(),
    }))
}
