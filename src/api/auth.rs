//! Admin login/logout and backend health.

use serde::Deserialize;
use serde_json::Value;

use crate::api::client::ApiClient;
use crate::api::error::{ApiError, ApiResult};

const LOGIN_PATH: &str = "/api/auth/login";

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

impl ApiClient {
    /// Exchange credentials for a bearer token and store it.
    ///
    /// Never retried; wrong credentials surface as `Client { status: 401 }`.
    pub async fn login(&self, username: &str, password: &str) -> ApiResult<()> {
        let value = self
            .post_form(LOGIN_PATH, &[("username", username), ("password", password)])
            .await?;
        let token: TokenResponse =
            serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))?;

        self.credentials()
            .set(&token.access_token)
            .map_err(|e| ApiError::Storage(e.to_string()))?;
        tracing::info!(username, "Logged in");
        Ok(())
    }

    /// Drop the stored token.
    pub fn logout(&self) {
        self.credentials().clear();
        tracing::info!("Logged out");
    }

    pub fn is_authenticated(&self) -> bool {
        self.credentials().token().is_some()
    }

    /// Backend liveness probe (`GET /`).
    pub async fn health(&self) -> ApiResult<Value> {
        self.get("/").await
    }
}
