use axum::extract::State;
use axum::Json;

use crate::model::UrlResponse;
use crate::state::AppState;

/// `GET /shortidendpoint`: the public base URL of the shortener.
pub async fn short_endpoint_handler(State(state): State<AppState>) -> Json<UrlResponse> {
    Json(UrlResponse {
        url: state.short_endpoint_url().to_owned(),
    })
}

/// `GET /webhook`: the configured webhook URL.
pub async fn webhook_handler(State(state): State<AppState>) -> Json<UrlResponse> {
    Json(UrlResponse {
        url: state.webhook_url().to_owned(),
    })
}
