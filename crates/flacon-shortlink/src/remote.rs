use std::time::Duration;

use async_trait::async_trait;
use flacon_core::error::ShortLinkError;
use flacon_core::shortlink::ShortLinks;
use serde::{Deserialize, Serialize};
use tracing::debug;
use typed_builder::TypedBuilder;

type Result<T> = std::result::Result<T, ShortLinkError>;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Connection settings for the remote shortener service.
#[derive(Debug, Clone, TypedBuilder)]
pub struct RemoteShortLinksConfig {
    /// Base URL of the shortener, without a trailing slash.
    #[builder(setter(into))]
    pub base_url: String,
    /// Pre-shared API key sent with every request.
    #[builder(setter(into))]
    pub api_key: String,
    /// Per-request timeout. Outbound calls sit on the request path of
    /// `/create`, so they must not hang unbounded.
    #[builder(default = DEFAULT_TIMEOUT)]
    pub timeout: Duration,
}

/// HTTP client for the external URL-shortener service.
///
/// `POST {base}/api/create` with `{apiKey, url}` answers
/// `{shortUrl: [{shortid, ...}]}`; the first element's `shortid` is the
/// token kept on the listing. `POST {base}/api/delete` with
/// `{apiKey, shortid}` removes it again.
#[derive(Debug, Clone)]
pub struct RemoteShortLinks {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateRequest<'a> {
    api_key: &'a str,
    url: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DeleteRequest<'a> {
    api_key: &'a str,
    shortid: &'a str,
}

#[derive(Deserialize)]
struct CreateResponse {
    #[serde(rename = "shortUrl")]
    short_url: Vec<CreatedShortLink>,
}

#[derive(Deserialize)]
struct CreatedShortLink {
    shortid: String,
}

impl RemoteShortLinks {
    /// Builds a client from the given connection settings.
    pub fn new(config: RemoteShortLinksConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ShortLinkError::Http(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            api_key: config.api_key,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post_json<T: Serialize>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<reqwest::Response> {
        let response = self
            .client
            .post(self.endpoint(path))
            .json(body)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ShortLinkError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response)
    }
}

fn map_reqwest_error(err: reqwest::Error) -> ShortLinkError {
    if err.is_timeout() {
        ShortLinkError::Timeout(err.to_string())
    } else {
        ShortLinkError::Http(err.to_string())
    }
}

#[async_trait]
impl ShortLinks for RemoteShortLinks {
    async fn create(&self, url: &str) -> Result<String> {
        let request = CreateRequest {
            api_key: &self.api_key,
            url,
        };

        let response = self.post_json("/api/create", &request).await?;
        let parsed: CreateResponse = response
            .json()
            .await
            .map_err(|e| ShortLinkError::MalformedResponse(e.to_string()))?;

        let created = parsed.short_url.into_iter().next().ok_or_else(|| {
            ShortLinkError::MalformedResponse("shortUrl array is empty".to_owned())
        })?;

        debug!(shortid = %created.shortid, "created remote short link");
        Ok(created.shortid)
    }

    async fn delete(&self, short_id: &str) -> Result<()> {
        let request = DeleteRequest {
            api_key: &self.api_key,
            shortid: short_id,
        };

        self.post_json("/api/delete", &request).await?;
        debug!(shortid = %short_id, "deleted remote short link");
        Ok(())
    }
}
