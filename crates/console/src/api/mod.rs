//! REST clients for the three backend services.
//!
//! # Architecture
//!
//! Each service gets a thin typed client ([`ProductsApi`], [`CustomersApi`],
//! [`OrdersApi`]) built on a shared [`RestClient`] that normalizes every
//! response into one of three outcomes:
//!
//! - `Transport` - the request never produced a response
//! - `Service` - a non-success status, with the human-readable `detail` the
//!   services put in their error bodies (falling back to the HTTP status)
//! - `Decode` - a success response whose body did not match the expected shape
//!
//! Bodies are read as text first and decoded second so that a malformed
//! payload can be traced with its raw content. A `204` response is handled on
//! a dedicated path that never touches the body.

mod customers;
mod orders;
mod products;

pub use customers::CustomersApi;
pub use orders::{OrderFilter, OrdersApi};
pub use products::ProductsApi;

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

/// Request timeout shared by all service clients.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// How much of an unexpected body to include in trace output.
const TRACE_BODY_LIMIT: usize = 500;

/// Health probe response shape shared by all three services.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct Health {
    pub status: String,
    pub service: String,
}

/// Errors produced by the service clients.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request never completed (connection refused, DNS, timeout).
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("{detail}")]
    Service {
        /// HTTP status of the response.
        status: StatusCode,
        /// Message extracted from the error body, or a status-derived fallback.
        detail: String,
    },

    /// A success response carried a body that did not decode.
    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Build the one `reqwest::Client` shared by every service client.
///
/// # Panics
///
/// Panics if the HTTP client cannot be created. This should never happen
/// under normal circumstances as we use standard TLS configuration.
#[must_use]
pub fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .expect("Failed to create HTTP client")
}

/// Cloneable handle on one service: its base URL plus the shared HTTP client.
#[derive(Clone)]
pub struct RestClient {
    inner: Arc<RestClientInner>,
}

struct RestClientInner {
    http: reqwest::Client,
    base: Url,
}

impl RestClient {
    /// Create a client for the service rooted at `base`.
    #[must_use]
    pub fn new(http: reqwest::Client, base: Url) -> Self {
        Self {
            inner: Arc::new(RestClientInner { http, base }),
        }
    }

    /// The service base URL.
    #[must_use]
    pub fn base(&self) -> &Url {
        &self.inner.base
    }

    fn endpoint(&self, path: &str) -> Url {
        let mut url = self.inner.base.clone();
        url.set_path(path);
        url
    }

    pub(crate) async fn get_json<T>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        let response = self
            .inner
            .http
            .get(self.endpoint(path))
            .query(query)
            .send()
            .await?;
        decode(response).await
    }

    pub(crate) async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let response = self
            .inner
            .http
            .post(self.endpoint(path))
            .json(body)
            .send()
            .await?;
        decode(response).await
    }

    pub(crate) async fn put_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let response = self
            .inner
            .http
            .put(self.endpoint(path))
            .json(body)
            .send()
            .await?;
        decode(response).await
    }

    pub(crate) async fn patch_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let response = self
            .inner
            .http
            .patch(self.endpoint(path))
            .json(body)
            .send()
            .await?;
        decode(response).await
    }

    pub(crate) async fn post_multipart<T>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        let response = self
            .inner
            .http
            .post(self.endpoint(path))
            .multipart(form)
            .send()
            .await?;
        decode(response).await
    }

    /// Issue a DELETE and require the `204 No Content` the services answer
    /// successful deletions with. Any other status is a failure.
    pub(crate) async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let response = self
            .inner
            .http
            .delete(self.endpoint(path))
            .send()
            .await?;
        expect_no_content(response).await
    }
}

async fn decode<T>(response: Response) -> Result<T, ApiError>
where
    T: DeserializeOwned,
{
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        tracing::debug!(
            %status,
            body = %truncate(&body),
            "service returned non-success status"
        );
        return Err(ApiError::Service {
            status,
            detail: extract_detail(status, &body),
        });
    }

    match serde_json::from_str(&body) {
        Ok(value) => Ok(value),
        Err(e) => {
            tracing::error!(
                error = %e,
                body = %truncate(&body),
                "failed to decode service response"
            );
            Err(ApiError::Decode(e))
        }
    }
}

/// A `204` carries no body; it must not be parsed.
async fn expect_no_content(response: Response) -> Result<(), ApiError> {
    let status = response.status();
    if status == StatusCode::NO_CONTENT {
        return Ok(());
    }
    let body = response.text().await.unwrap_or_default();
    Err(ApiError::Service {
        status,
        detail: extract_detail(status, &body),
    })
}

/// Pull a human-readable message out of an error payload.
///
/// The services answer errors with `{"detail": ...}` where `detail` is either
/// a string or a structured validation report. A missing field or an
/// unparseable body falls back to a status-derived message.
fn extract_detail(status: StatusCode, body: &str) -> String {
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(value) => match value.get("detail") {
            Some(serde_json::Value::String(detail)) => detail.clone(),
            Some(detail) => detail.to_string(),
            None => status_fallback(status),
        },
        Err(_) => status_fallback(status),
    }
}

fn status_fallback(status: StatusCode) -> String {
    format!("HTTP {status}")
}

fn truncate(body: &str) -> String {
    body.chars().take(TRACE_BODY_LIMIT).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_detail_is_used_verbatim() {
        let detail = extract_detail(
            StatusCode::NOT_FOUND,
            r#"{"detail": "Product not found"}"#,
        );
        assert_eq!(detail, "Product not found");
    }

    #[test]
    fn structured_detail_is_stringified() {
        let detail = extract_detail(
            StatusCode::UNPROCESSABLE_ENTITY,
            r#"{"detail": [{"loc": ["body", "price"], "msg": "value is not a valid float"}]}"#,
        );
        assert!(detail.contains("price"));
        assert!(detail.contains("not a valid float"));
    }

    #[test]
    fn missing_detail_falls_back_to_status() {
        let detail = extract_detail(StatusCode::BAD_GATEWAY, r#"{"error": "nope"}"#);
        assert_eq!(detail, "HTTP 502 Bad Gateway");
    }

    #[test]
    fn non_json_body_falls_back_to_status() {
        let detail = extract_detail(StatusCode::INTERNAL_SERVER_ERROR, "<html>oops</html>");
        assert_eq!(detail, "HTTP 500 Internal Server Error");
    }

    #[test]
    fn clients_are_cheap_handles() {
        fn assert_clone<T: Clone>() {}
        assert_clone::<RestClient>();
    }
}
