//! REST client with per-attempt deadlines, retries and token injection.
//!
//! # Responsibilities
//! - Attach the stored bearer token to every request
//! - Bound each attempt with a deadline
//! - Retry transient failures with exponential backoff
//! - Map responses onto [`ApiError`]; a 401 clears the stored token

use std::time::Duration;

use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::api::credentials::Credentials;
use crate::api::error::{ApiError, ApiResult};
use crate::config::ApiConfig;
use crate::observability::metrics;
use crate::resilience::backoff::calculate_backoff;
use crate::resilience::retries::is_retryable;
use crate::resilience::timeouts::with_deadline;

/// Client for the content API.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    timeout: Duration,
    max_attempts: u32,
    retry_base_delay_ms: u64,
    retry_max_delay_ms: u64,
    credentials: Credentials,
}

impl ApiClient {
    /// Build a client from configuration.
    pub fn new(config: &ApiConfig, credentials: Credentials) -> ApiResult<Self> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", config.base_url, e)))?;
        let http = reqwest::Client::builder().build()?;

        Ok(Self {
            http,
            base_url,
            timeout: Duration::from_secs(config.timeout_secs),
            max_attempts: config.max_attempts.max(1),
            retry_base_delay_ms: config.retry_base_delay_ms,
            retry_max_delay_ms: config.retry_max_delay_ms,
            credentials,
        })
    }

    /// Override the per-attempt deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let value = self.request_json(Method::GET, path, None).await?;
        decode(value)
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = encode(body)?;
        let value = self.request_json(Method::POST, path, Some(&body)).await?;
        decode(value)
    }

    pub async fn put<T, B>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = encode(body)?;
        let value = self.request_json(Method::PUT, path, Some(&body)).await?;
        decode(value)
    }

    pub async fn delete(&self, path: &str) -> ApiResult<Value> {
        self.request_json(Method::DELETE, path, None).await
    }

    /// Issue a JSON request, retrying transient failures.
    ///
    /// Returns `Value::Null` for 204 and empty bodies.
    pub async fn request_json(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> ApiResult<Value> {
        let url = self.url(path)?;
        let mut attempt = 1;

        loop {
            let result = with_deadline(self.timeout, self.send_once(&method, &url, body)).await;
            match result {
                Ok(value) => {
                    metrics::record_api_request(method.as_str(), "success");
                    return Ok(value);
                }
                Err(e) if attempt < self.max_attempts && is_retryable(&method, &e) => {
                    let delay =
                        calculate_backoff(attempt, self.retry_base_delay_ms, self.retry_max_delay_ms);
                    tracing::warn!(
                        method = %method,
                        path,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Request failed, retrying"
                    );
                    metrics::record_api_retry();
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    metrics::record_api_request(method.as_str(), e.kind());
                    tracing::debug!(method = %method, path, attempt, error = %e, "Request failed");
                    return Err(e);
                }
            }
        }
    }

    /// Single form-encoded POST without retries. A 401 is reported as a
    /// client error and leaves the stored token alone.
    pub(crate) async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> ApiResult<Value> {
        let url = self.url(path)?;
        let result = with_deadline(self.timeout, async {
            let response = self.http.post(url.clone()).form(form).send().await?;
            self.read_response(response, false).await
        })
        .await;
        metrics::record_api_request(
            Method::POST.as_str(),
            result.as_ref().map(|_| "success").unwrap_or_else(ApiError::kind),
        );
        result
    }

    async fn send_once(&self, method: &Method, url: &Url, body: Option<&Value>) -> ApiResult<Value> {
        let mut request = self.http.request(method.clone(), url.clone());
        if let Some(token) = self.credentials.token() {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await?;
        self.read_response(response, true).await
    }

    async fn read_response(&self, response: reqwest::Response, session: bool) -> ApiResult<Value> {
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED && session {
            tracing::warn!(url = %response.url(), "Credential rejected, clearing stored token");
            self.credentials.clear();
            return Err(ApiError::AuthExpired);
        }

        let bytes = response.bytes().await?;
        if status.is_server_error() {
            return Err(ApiError::Server {
                status: status.as_u16(),
            });
        }
        if status.is_client_error() {
            return Err(ApiError::Client {
                status: status.as_u16(),
                detail: error_detail(&bytes)
                    .unwrap_or_else(|| format!("Request failed: {}", status.as_u16())),
            });
        }
        if status == StatusCode::NO_CONTENT || bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()))
    }

    fn url(&self, path: &str) -> ApiResult<Url> {
        let joined = format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Url::parse(&joined).map_err(|e| ApiError::InvalidUrl(format!("{}: {}", joined, e)))
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .field("timeout", &self.timeout)
            .field("max_attempts", &self.max_attempts)
            .finish()
    }
}

/// `detail` field of an error body, stringified when it is not a string.
fn error_detail(bytes: &[u8]) -> Option<String> {
    let body: Value = serde_json::from_slice(bytes).ok()?;
    match body.get("detail")? {
        Value::String(s) => Some(s.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

fn encode<B: Serialize + ?Sized>(body: &B) -> ApiResult<Value> {
    serde_json::to_value(body).map_err(|e| ApiError::Decode(e.to_string()))
}

fn decode<T: DeserializeOwned>(value: Value) -> ApiResult<T> {
    serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use std::sync::Arc;

    fn client(base_url: &str) -> ApiClient {
        let config = ApiConfig {
            base_url: base_url.to_string(),
            ..ApiConfig::default()
        };
        let creds = Credentials::new(Arc::new(MemoryStore::new()), "adminToken");
        ApiClient::new(&config, creds).unwrap()
    }

    #[test]
    fn test_url_join_keeps_base_path() {
        let api = client("http://localhost:8000/backend/");
        assert_eq!(
            api.url("/api/stats").unwrap().as_str(),
            "http://localhost:8000/backend/api/stats"
        );
        let api = client("http://localhost:8000");
        assert_eq!(api.url("api/hero").unwrap().as_str(), "http://localhost:8000/api/hero");
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let config = ApiConfig {
            base_url: "not a url".into(),
            ..ApiConfig::default()
        };
        let creds = Credentials::new(Arc::new(MemoryStore::new()), "adminToken");
        assert!(matches!(
            ApiClient::new(&config, creds),
            Err(ApiError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_error_detail_extraction() {
        assert_eq!(
            error_detail(br#"{"detail":"Section title not found"}"#).as_deref(),
            Some("Section title not found")
        );
        assert_eq!(
            error_detail(br#"{"detail":[{"loc":["body","title"]}]}"#).as_deref(),
            Some(r#"[{"loc":["body","title"]}]"#)
        );
        assert_eq!(error_detail(b"<html>"), None);
        assert_eq!(error_detail(br#"{"message":"x"}"#), None);
    }
}
