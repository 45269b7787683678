use std::time::Duration;

/// Client configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development. In
/// production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL of the Ederaxy backend, without a trailing slash.
    pub base_url: String,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
}

impl ApiConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                 |
    /// |------------------------|-------------------------|
    /// | `EDERAXY_API_URL`      | `http://localhost:4000` |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                    |
    pub fn from_env() -> Self {
        let base_url = std::env::var("EDERAXY_API_URL")
            .unwrap_or_else(|_| "http://localhost:4000".into())
            .trim_end_matches('/')
            .to_string();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        Self {
            base_url,
            request_timeout_secs,
        }
    }

    /// Build a [`reqwest::Client`] honoring the configured timeout.
    pub fn build_http_client(&self) -> reqwest::Client {
        reqwest::Client::builder()
            .timeout(Duration::from_secs(self.request_timeout_secs))
            .build()
            .expect("reqwest client construction only fails on TLS backend misconfiguration")
    }
}
