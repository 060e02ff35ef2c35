use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handlers::{
    create_handler, delete_listing_handler, delete_perfume_handler, health_handler,
    list_handler, short_endpoint_handler, webhook_handler,
};
use crate::state::AppState;

pub struct App {}

impl App {
    pub fn router(state: AppState) -> Router {
        Router::new()
            .route("/", get(list_handler))
            .route("/shortidendpoint", get(short_endpoint_handler))
            .route("/webhook", get(webhook_handler))
            .route("/health-check", get(health_handler))
            .route("/create", post(create_handler))
            .route("/delete-listing", post(delete_listing_handler))
            .route("/delete-perfume", post(delete_perfume_handler))
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }
}
