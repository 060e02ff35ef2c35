use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use crate::error::{ApiError, Result};
use crate::model::{
    CatalogRowResponse, CreateRequest, DeleteListingRequest, DeletePerfumeRequest,
    MessageResponse,
};
use crate::state::AppState;

/// Rejects absent or blank required fields with a 400 before anything
/// else runs.
fn require(field: Option<String>, name: &str) -> Result<String> {
    match field {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ApiError::Validation(format!(
            "missing required field '{name}'"
        ))),
    }
}

/// Shared-secret check; runs after field validation and before any
/// lookup or side effect.
fn authorize(state: &AppState, auth_key: &str) -> Result<()> {
    if state.key_matches(auth_key) {
        Ok(())
    } else {
        Err(ApiError::Unauthorized)
    }
}

/// `GET /`: the full catalogue, unauthenticated.
pub async fn list_handler(State(state): State<AppState>) -> Result<Json<Vec<CatalogRowResponse>>> {
    let entries = state.catalog().list_all().await?;

    Ok(Json(entries.into_iter().map(Into::into).collect()))
}

/// `POST /create`: attach a listing, creating the perfume if needed.
pub async fn create_handler(
    State(state): State<AppState>,
    Json(request): Json<CreateRequest>,
) -> Result<(StatusCode, Json<MessageResponse>)> {
    let title = require(request.title, "title")?;
    let link = require(request.link, "link")?;
    let auth_key = require(request.auth_key, "authKey")?;
    authorize(&state, &auth_key)?;

    state.catalog().create_record(&title, &link).await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: format!("created listing for '{title}' at {link}"),
        }),
    ))
}

/// `POST /delete-listing`: remove one listing and its short-link.
pub async fn delete_listing_handler(
    State(state): State<AppState>,
    Json(request): Json<DeleteListingRequest>,
) -> Result<Json<MessageResponse>> {
    let link = require(request.link, "link")?;
    let auth_key = require(request.auth_key, "authKey")?;
    authorize(&state, &auth_key)?;

    state.catalog().delete_listing(&link).await?;

    Ok(Json(MessageResponse {
        message: format!("deleted listing for {link}"),
    }))
}

/// `POST /delete-perfume`: remove a perfume and cascade over its
/// listings.
pub async fn delete_perfume_handler(
    State(state): State<AppState>,
    Json(request): Json<DeletePerfumeRequest>,
) -> Result<Json<MessageResponse>> {
    let title = require(request.title, "title")?;
    let auth_key = require(request.auth_key, "authKey")?;
    authorize(&state, &auth_key)?;

    let deleted = state.catalog().delete_perfume(&title).await?;

    Ok(Json(MessageResponse {
        message: format!(
            "deleted perfume '{title}' and {} listing(s)",
            deleted.listings_removed
        ),
    }))
}
