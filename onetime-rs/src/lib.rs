//! # onetime-rs
//!
//! A Rust client library for the onetime link service.
//!
//! A onetime link reveals its target URL exactly once. The first visit (or the first
//! [`OnetimeApi::consume`] call) returns the target and destroys the link; every later
//! attempt is answered as invalid.
//!
//! ## Example
//!
//! ```rust,no_run
//! # async fn example() -> Result<(), onetime_rs::OnetimeApiError> {
//! use onetime_rs::OnetimeApi;
//!
//! let api = OnetimeApi::new().with_url("http://localhost:8080");
//!
//! let created = api.create_link("example.com/secret/page").await?;
//! println!("Share this once: {}", created.shareable_url);
//!
//! // the first consume reveals the target, the second one does not
//! assert!(api.consume(&created.id).await?.is_some());
//! assert!(api.consume(&created.id).await?.is_none());
//! # Ok(())
//! # }
//! ```
//!

pub use reqwest::Url;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Name of the query parameter that carries the link id in a shareable URL.
pub const ID_PARAM: &str = "id";

/// Request payload for creating a one-time link.
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateLinkRequest {
    /// The target URL to reveal once. A missing scheme defaults to `https://`.
    pub url: String,
}

/// Response after creating a one-time link.
#[derive(Debug, Serialize, Deserialize)]
pub struct CreatedLinkResponse {
    /// The store-generated identifier of the link.
    pub id: String,
    /// The URL to hand out; opening it consumes the link.
    pub shareable_url: String,
    /// The validated target URL the link reveals.
    pub target_url: String,
}

impl CreatedLinkResponse {
    /// Creates a new `CreatedLinkResponse`, composing the shareable URL from `base`.
    ///
    /// # Arguments
    ///
    /// * `id` - The identifier of the stored link
    /// * `base` - The public base URL of the service (e.g., `https://once.example`)
    /// * `target_url` - The target URL the link reveals
    pub fn new(id: String, base: &Url, target_url: String) -> Self {
        let shareable_url = shareable_url(base, &id).to_string();
        Self {
            id,
            shareable_url,
            target_url,
        }
    }
}

/// Request payload for consuming a one-time link.
#[derive(Debug, Serialize, Deserialize)]
pub struct ConsumeLinkRequest {
    /// The identifier taken from the shareable URL.
    pub id: String,
}

/// Response of a successful consumption.
#[derive(Debug, Serialize, Deserialize)]
pub struct ConsumedLinkResponse {
    /// The target URL. It will never be returned again for this link.
    pub target_url: String,
}

/// Error body returned by the service for every non-success response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Machine readable error kind (`invalid_url`, `not_ready`, `invalid`, ...).
    pub error: String,
}

/// Builds the shareable URL for `id`: `base` with its `id` query parameter set.
///
/// Any `id` parameter already present on `base` is replaced, other parameters are kept.
pub fn shareable_url(base: &Url, id: &str) -> Url {
    let mut url = base.clone();
    let kept: Vec<(String, String)> = base
        .query_pairs()
        .filter(|(key, _)| key != ID_PARAM)
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    url.set_query(None);
    url.query_pairs_mut()
        .extend_pairs(kept)
        .append_pair(ID_PARAM, id);

    url
}

/// A client for interacting with the onetime API.
///
/// # Example
///
/// ```rust,no_run
/// # async fn example() -> Result<(), onetime_rs::OnetimeApiError> {
/// use onetime_rs::OnetimeApi;
///
/// let api = OnetimeApi::new().with_url("https://once.example");
/// let created = api.create_link("https://example.com").await?;
/// println!("{}", created.shareable_url);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct OnetimeApi {
    url: String,
    client: reqwest::Client,
}

/// Errors that can occur when interacting with the onetime API.
#[derive(Debug, Error)]
pub enum OnetimeApiError {
    /// An error occurred during API configuration (e.g., invalid URL parsing).
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
    /// An error occurred while sending the HTTP request or receiving the response.
    #[error("Request error: {0}")]
    RequestError(String),
    /// The service answered with an error status.
    #[error("Service error ({status}): {kind}")]
    ServiceError {
        /// HTTP status code of the response.
        status: u16,
        /// Error kind reported by the service.
        kind: String,
    },
    /// An error occurred while deserializing the API response.
    #[error("Deserialization error: {0}")]
    DeserializationError(String),
}

impl Default for OnetimeApi {
    fn default() -> Self {
        Self::new()
    }
}

impl OnetimeApi {
    /// Creates a new client pointing at `http://localhost:8080`.
    pub fn new() -> Self {
        Self {
            url: String::from("http://localhost:8080"),
            client: reqwest::Client::new(),
        }
    }

    /// Sets a custom API endpoint URL.
    pub fn with_url(mut self, url: &str) -> Self {
        self.url = url.trim_end_matches('/').into();
        self
    }

    fn endpoint(&self, path: &str) -> Result<Url, OnetimeApiError> {
        Url::parse(&format!("{}{}", self.url, path))
            .map_err(|e| OnetimeApiError::ConfigurationError(e.to_string()))
    }

    /// Creates a one-time link for `target`.
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - The API endpoint URL is invalid (`ConfigurationError`)
    /// - The HTTP request fails (`RequestError`)
    /// - The service rejects the target or is not ready (`ServiceError`)
    /// - The response cannot be deserialized (`DeserializationError`)
    pub async fn create_link(&self, target: &str) -> Result<CreatedLinkResponse, OnetimeApiError> {
        let resp = self
            .client
            .post(self.endpoint("/link/create")?)
            .json(&CreateLinkRequest {
                url: target.to_string(),
            })
            .send()
            .await
            .map_err(|e| OnetimeApiError::RequestError(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(service_error(resp).await);
        }

        resp.json::<CreatedLinkResponse>()
            .await
            .map_err(|e| OnetimeApiError::DeserializationError(e.to_string()))
    }

    /// Consumes the link `id`.
    ///
    /// Returns `Ok(Some(target_url))` for the one successful consumption and `Ok(None)` when
    /// the link is invalid: already consumed or never created. The two cases are
    /// indistinguishable.
    pub async fn consume(&self, id: &str) -> Result<Option<String>, OnetimeApiError> {
        let resp = self
            .client
            .post(self.endpoint("/link/consume")?)
            .json(&ConsumeLinkRequest { id: id.to_string() })
            .send()
            .await
            .map_err(|e| OnetimeApiError::RequestError(e.to_string()))?;

        match resp.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => {
                let consumed = resp
                    .json::<ConsumedLinkResponse>()
                    .await
                    .map_err(|e| OnetimeApiError::DeserializationError(e.to_string()))?;
                Ok(Some(consumed.target_url))
            }
            _ => Err(service_error(resp).await),
        }
    }
}

async fn service_error(resp: reqwest::Response) -> OnetimeApiError {
    let status = resp.status().as_u16();
    let kind = resp
        .json::<ErrorResponse>()
        .await
        .map(|e| e.error)
        .unwrap_or_else(|_| String::from("unknown"));

    OnetimeApiError::ServiceError { status, kind }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shareable_url_sets_id() {
        let base = Url::parse("http://localhost:8080").unwrap();
        let url = shareable_url(&base, "abc");
        assert_eq!(url.as_str(), "http://localhost:8080/?id=abc");
    }

    #[test]
    fn test_shareable_url_replaces_existing_id() {
        let base = Url::parse("https://once.example/reveal?lang=en&id=old").unwrap();
        let url = shareable_url(&base, "new");
        assert_eq!(url.as_str(), "https://once.example/reveal?lang=en&id=new");
    }

    #[test]
    fn test_created_response_composes_url() {
        let base = Url::parse("https://once.example").unwrap();
        let res = CreatedLinkResponse::new(
            "xyz".to_string(),
            &base,
            "https://example.com".to_string(),
        );
        assert_eq!(res.shareable_url, "https://once.example/?id=xyz");
        assert_eq!(res.target_url, "https://example.com");
    }
}
