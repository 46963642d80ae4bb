//! Account API client — fetch/save the current account, password reset.
//!
//! ERROR HANDLING
//! ==============
//! Every failure mode surfaces as an [`AccountError`], but the identity
//! cache deliberately collapses all of them to "anonymous": callers that
//! need to distinguish transport errors from auth failures must call the
//! client directly.

use async_trait::async_trait;
use serde_json::json;

use crate::config::ServerConfig;
use crate::net::types::Identity;

// =============================================================================
// ERROR TYPE
// =============================================================================

/// Errors produced by account API operations.
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    /// The HTTP request could not be sent or the connection failed.
    #[error("request failed: {0}")]
    Request(String),

    /// The server answered with a non-success status.
    #[error("server returned status {status}")]
    Status { status: u16 },

    /// The response body could not be deserialized.
    #[error("response parse failed: {0}")]
    Parse(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    ClientBuild(String),
}

// =============================================================================
// API TRAIT
// =============================================================================

/// Account endpoints of the dashboard backend.
///
/// State modules depend on this trait rather than on reqwest so tests can
/// swap in a mock.
#[async_trait]
pub trait AccountApi: Send + Sync {
    /// Fetch the currently authenticated account (`GET /api/account`).
    ///
    /// # Errors
    ///
    /// Returns an [`AccountError`] on transport failure, a non-2xx status,
    /// or an undecodable body.
    async fn fetch_account(&self) -> Result<Identity, AccountError>;

    /// Persist account settings (`POST /api/account`).
    ///
    /// # Errors
    ///
    /// Returns an [`AccountError`] on transport failure or a non-2xx status.
    async fn save_account(&self, account: &Identity) -> Result<(), AccountError>;

    /// Start a password reset for the given mail address
    /// (`POST /api/account/reset-password/init`).
    ///
    /// # Errors
    ///
    /// Returns an [`AccountError`] on transport failure or a non-2xx status.
    async fn request_password_reset(&self, mail: &str) -> Result<(), AccountError>;

    /// Complete a password reset using the key from the reset mail
    /// (`POST /api/account/reset-password/finish`).
    ///
    /// # Errors
    ///
    /// Returns an [`AccountError`] on transport failure or a non-2xx status.
    async fn finish_password_reset(&self, key: &str, new_password: &str) -> Result<(), AccountError>;
}

// =============================================================================
// HTTP IMPLEMENTATION
// =============================================================================

/// reqwest-backed [`AccountApi`] implementation.
pub struct HttpAccountApi {
    http: reqwest::Client,
    config: ServerConfig,
}

impl HttpAccountApi {
    /// Build a client against the given server.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::ClientBuild`] if the reqwest client cannot
    /// be constructed.
    pub fn new(config: ServerConfig) -> Result<Self, AccountError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| AccountError::ClientBuild(e.to_string()))?;
        Ok(Self { http, config })
    }

    async fn send_checked(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response, AccountError> {
        let resp = request
            .send()
            .await
            .map_err(|e| AccountError::Request(e.to_string()))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(AccountError::Status { status: status.as_u16() });
        }
        Ok(resp)
    }
}

#[async_trait]
impl AccountApi for HttpAccountApi {
    async fn fetch_account(&self) -> Result<Identity, AccountError> {
        let resp = self
            .send_checked(self.http.get(self.config.endpoint("api/account")))
            .await?;
        resp.json::<Identity>()
            .await
            .map_err(|e| AccountError::Parse(e.to_string()))
    }

    async fn save_account(&self, account: &Identity) -> Result<(), AccountError> {
        self.send_checked(self.http.post(self.config.endpoint("api/account")).json(account))
            .await?;
        Ok(())
    }

    async fn request_password_reset(&self, mail: &str) -> Result<(), AccountError> {
        // The backend takes the bare mail address as the request body.
        self.send_checked(
            self.http
                .post(self.config.endpoint("api/account/reset-password/init"))
                .json(&mail),
        )
        .await?;
        Ok(())
    }

    async fn finish_password_reset(&self, key: &str, new_password: &str) -> Result<(), AccountError> {
        self.send_checked(
            self.http
                .post(self.config.endpoint("api/account/reset-password/finish"))
                .json(&json!({ "key": key, "newPassword": new_password })),
        )
        .await?;
        Ok(())
    }
}
