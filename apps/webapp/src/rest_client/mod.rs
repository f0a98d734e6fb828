//! REST client: the single point of entry for all backend calls in the web app.
//!
//! ARCHITECTURAL RULE: entity services build requests through this module only.
//! It never retries and never interprets failures beyond turning a non-2xx
//! status into `ClientError::Status`.
use reqwest::header::{HeaderMap, CONTENT_TYPE};
use reqwest::{Client, Method, RequestBuilder, Url};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, warn};

use crate::errors::ClientError;

pub mod options;

pub use options::RequestOptions;

pub const TOTAL_COUNT_HEADER: &str = "x-total-count";
pub const MERGE_PATCH_JSON: &str = "application/merge-patch+json";
const ALERT_HEADER_SUFFIX: &str = "-alert";

/// Response envelope: status, decoded body and the headers the front end reads.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityResponse<T> {
    pub status: u16,
    /// `None` when the server answered with an empty or `null` body.
    pub body: Option<T>,
    /// Total number of matching entities, from `X-Total-Count`.
    pub total_count: Option<u64>,
    /// Entity alert message set by the server (`X-<app>-alert`).
    pub alert: Option<String>,
}

impl<T> EntityResponse<T> {
    pub fn ok(body: Option<T>) -> Self {
        Self {
            status: 200,
            body,
            total_count: None,
            alert: None,
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Error body returned by the backend for rejected requests.
#[derive(Debug, Deserialize)]
struct ProblemDetail {
    title: Option<String>,
    detail: Option<String>,
    message: Option<String>,
}

impl ProblemDetail {
    fn into_message(self) -> Option<String> {
        self.detail.or(self.title).or(self.message)
    }
}

/// Stateless HTTP client bound to one server endpoint. Cheap to clone.
#[derive(Clone)]
pub struct RestClient {
    client: Client,
    base_url: String,
}

impl RestClient {
    pub fn new(base_url: impl Into<String>, timeout: std::time::Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .expect("Failed to build HTTP client"),
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Resolves a resource path such as `api/jobs` against the server endpoint.
    pub fn endpoint_for(&self, path: &str) -> Result<Url, ClientError> {
        let joined = format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Url::parse(&joined).map_err(|e| ClientError::InvalidEndpoint(format!("{joined}: {e}")))
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> Result<EntityResponse<T>, ClientError> {
        let url = self.endpoint_for(path)?;
        debug!("GET {url} params={query:?}");
        let request = self.client.get(url).query(query);
        self.execute(request).await
    }

    /// Sends `body` as JSON with the given method. `content_type` overrides
    /// the default `application/json`.
    pub async fn send<B, T>(
        &self,
        method: Method,
        path: &str,
        body: &B,
        content_type: Option<&str>,
    ) -> Result<EntityResponse<T>, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint_for(path)?;
        debug!("{method} {url}");
        let payload = serde_json::to_vec(body)?;
        let request = self
            .client
            .request(method, url)
            .header(CONTENT_TYPE, content_type.unwrap_or("application/json"))
            .body(payload);
        self.execute(request).await
    }

    /// Issues a DELETE; the response body, if any, is ignored.
    pub async fn delete(&self, path: &str) -> Result<EntityResponse<()>, ClientError> {
        let url = self.endpoint_for(path)?;
        debug!("DELETE {url}");
        let (status, headers, _) = self.round_trip(self.client.delete(url)).await?;
        Ok(EntityResponse {
            status,
            body: None,
            total_count: total_count(&headers),
            alert: alert(&headers),
        })
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<EntityResponse<T>, ClientError> {
        let (status, headers, text) = self.round_trip(request).await?;
        Ok(EntityResponse {
            status,
            body: decode_body(&text)?,
            total_count: total_count(&headers),
            alert: alert(&headers),
        })
    }

    async fn round_trip(
        &self,
        request: RequestBuilder,
    ) -> Result<(u16, HeaderMap, String), ClientError> {
        let response = request.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let text = response.text().await?;

        if !status.is_success() {
            warn!("REST API returned {}: {}", status, text);
            let message = serde_json::from_str::<ProblemDetail>(&text)
                .ok()
                .and_then(ProblemDetail::into_message)
                .unwrap_or(text);
            return Err(ClientError::Status {
                status: status.as_u16(),
                message,
            });
        }

        Ok((status.as_u16(), headers, text))
    }
}

/// Empty and `null` bodies both decode to `None`.
fn decode_body<T: DeserializeOwned>(text: &str) -> Result<Option<T>, ClientError> {
    let text = text.trim();
    if text.is_empty() || text == "null" {
        return Ok(None);
    }
    Ok(Some(serde_json::from_str(text)?))
}

fn total_count(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(TOTAL_COUNT_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
}

fn alert(headers: &HeaderMap) -> Option<String> {
    headers
        .iter()
        .find(|(name, _)| name.as_str().ends_with(ALERT_HEADER_SUFFIX))
        .and_then(|(_, value)| value.to_str().ok())
        .map(str::to_string)
}
