use flacon_core::catalog::CatalogEntry;
use serde::{Deserialize, Serialize};

/// Body of `POST /create`. Fields are optional at the wire level so
/// missing ones produce a 400 from validation rather than a decode
/// rejection.
#[derive(Debug, Deserialize)]
pub struct CreateRequest {
    pub title: Option<String>,
    pub link: Option<String>,
    #[serde(rename = "authKey")]
    pub auth_key: Option<String>,
}

/// Body of `POST /delete-listing`.
#[derive(Debug, Deserialize)]
pub struct DeleteListingRequest {
    pub link: Option<String>,
    #[serde(rename = "authKey")]
    pub auth_key: Option<String>,
}

/// Body of `POST /delete-perfume`.
#[derive(Debug, Deserialize)]
pub struct DeletePerfumeRequest {
    pub title: Option<String>,
    #[serde(rename = "authKey")]
    pub auth_key: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct UrlResponse {
    pub url: String,
}

/// One row of `GET /`.
#[derive(Debug, Serialize)]
pub struct CatalogRowResponse {
    pub title: String,
    pub link: String,
    pub shortid: String,
    pub site: Option<String>,
}

impl From<CatalogEntry> for CatalogRowResponse {
    fn from(entry: CatalogEntry) -> Self {
        Self {
            title: entry.title,
            link: entry.link,
            shortid: entry.short_id,
            site: entry.site,
        }
    }
}
