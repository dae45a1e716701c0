//! Client configuration.

use std::time::Duration;

use url::Url;

use crate::error::{Error, Result};
use crate::helpers::get_api_token;

/// Production API endpoint.
pub const BASE_URL: &str = "https://api.runscope.com";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Options used when creating a [`crate::Client`].
#[derive(Clone)]
pub struct ClientOptions {
    /// Bearer token sent with every request.
    pub token: String,
    /// API root; empty means [`BASE_URL`].
    pub base_url: String,
    pub timeout: Duration,
    pub user_agent: String,
}

impl std::fmt::Debug for ClientOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientOptions")
            .field("token", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            token: String::new(),
            base_url: BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: format!("runscope-cli/{}", crate::VERSION),
        }
    }
}

impl ClientOptions {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            ..Self::default()
        }
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Build options from the environment.
    ///
    /// - token: see [`get_api_token`]
    /// - everything else: see [`ClientOptions::env_overrides`]
    pub fn from_env() -> Result<Self> {
        let (token, _source) = get_api_token().map_err(Error::Config)?;
        Self::new(token).env_overrides()
    }

    /// Apply settings from the environment on top of these options.
    ///
    /// - `RUNSCOPE_BASE_URL`: API root (default [`BASE_URL`])
    /// - `RUNSCOPE_TIMEOUT_SECS`: request timeout in seconds (default 15)
    pub fn env_overrides(self) -> Result<Self> {
        self.overrides_from(non_empty_var)
    }

    fn overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(base) = lookup("RUNSCOPE_BASE_URL") {
            self.base_url = base;
        }
        if let Some(secs) = lookup("RUNSCOPE_TIMEOUT_SECS") {
            let secs: u64 = secs
                .parse()
                .map_err(|e| Error::Config(format!("invalid RUNSCOPE_TIMEOUT_SECS: {}", e)))?;
            self.timeout = Duration::from_secs(secs);
        }
        Ok(self)
    }

    /// Validated API root without a trailing slash.
    pub(crate) fn resolved_base_url(&self) -> Result<String> {
        let raw = self.base_url.trim();
        let raw = if raw.is_empty() { BASE_URL } else { raw };
        let parsed =
            Url::parse(raw).map_err(|e| Error::Config(format!("invalid base URL {raw:?}: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(Error::Config(format!(
                "base URL must use http or https, got {:?}",
                parsed.scheme()
            )));
        }
        Ok(raw.trim_end_matches('/').to_string())
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
