//! Client configuration

/// Configuration for connecting to the remote data service
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Data service base URL (e.g., "http://localhost:3000")
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout: u64,

    /// Retry attempts for the second step of two-step mutations
    pub retry_attempts: u32,
}

impl ClientConfig {
    /// Create a new configuration for the given base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: 30,
            retry_attempts: 2,
        }
    }

    /// Read the configuration from the environment.
    ///
    /// `GYM_API_URL` overrides the base URL, `GYM_API_TIMEOUT_SECS` the
    /// request timeout.
    pub fn from_env() -> Self {
        let mut config = match std::env::var("GYM_API_URL") {
            Ok(url) if !url.is_empty() => Self::new(url),
            _ => Self::default(),
        };
        if let Some(timeout) = std::env::var("GYM_API_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            config.timeout = timeout;
        }
        config
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Set the retry attempts for two-step mutations
    pub fn with_retries(mut self, attempts: u32) -> Self {
        self.retry_attempts = attempts;
        self
    }

    /// Create a member service from this configuration
    pub fn build_service(&self) -> super::MemberService {
        super::MemberService::new(self)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new("http://localhost:3000")
    }
}
