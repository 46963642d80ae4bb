//! Server URL configuration.
//!
//! DESIGN
//! ======
//! The backend base URL is the only configuration this crate needs. It is
//! read from `SERVER_API_URL` at startup and normalized once, so endpoint
//! paths can be joined with a plain format.

/// Backend server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    api_url: String,
}

impl ServerConfig {
    /// Create a config from an explicit base URL. A trailing slash is
    /// stripped so [`ServerConfig::endpoint`] joins cleanly.
    #[must_use]
    pub fn new(api_url: impl Into<String>) -> Self {
        let mut api_url = api_url.into();
        while api_url.ends_with('/') {
            api_url.pop();
        }
        Self { api_url }
    }

    /// Load from the `SERVER_API_URL` environment variable.
    /// Returns `None` if it is not set (callers decide the fallback).
    #[must_use]
    pub fn from_env() -> Option<Self> {
        std::env::var("SERVER_API_URL").ok().map(Self::new)
    }

    /// The normalized base URL, without a trailing slash.
    #[must_use]
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Join an endpoint path onto the base URL.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        format!("{}/{path}", self.api_url)
    }
}
