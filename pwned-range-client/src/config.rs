use std::time::Duration;

use reqwest::Url;
use serde::Deserialize;

use crate::error::Error;

/// Public Pwned Passwords range endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.pwnedpasswords.com/";

pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// A hash seen at least once counts as pwned.
pub const DEFAULT_MINIMUM_FREQUENCY: u64 = 1;

pub const DEFAULT_USER_AGENT: &str = concat!("pwned-range-client/", env!("CARGO_PKG_VERSION"));

/// Settings for [`PwnedPasswordsClient`](crate::PwnedPasswordsClient).
///
/// Every field has a default, so a config file only needs the values it changes:
///
/// ```
/// let config: pwned_range_client::ClientConfig =
///     serde_json::from_str(r#"{ "minimum_frequency": 100 }"#).unwrap();
/// assert_eq!(config.minimum_frequency, 100);
/// assert_eq!(config.base_url, pwned_range_client::DEFAULT_BASE_URL);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClientConfig {
    /// Base address; requests go to `{base_url}range/{prefix}`.
    pub base_url: String,
    /// Per-request timeout covering connect, headers and body.
    pub timeout_ms: u64,
    /// Minimum breach count for a password to be reported as pwned.
    pub minimum_frequency: u64,
    pub user_agent: String,
    /// Sends `Add-Padding: true` so the response size does not reveal the bucket.
    pub add_padding: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            minimum_frequency: DEFAULT_MINIMUM_FREQUENCY,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            add_padding: false,
        }
    }
}

impl ClientConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn with_minimum_frequency(mut self, minimum_frequency: u64) -> Self {
        self.minimum_frequency = minimum_frequency;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_padding(mut self, add_padding: bool) -> Self {
        self.add_padding = add_padding;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Checks the settings and parses the base URL.
    ///
    /// A missing trailing slash is added so that `range/{prefix}` resolves
    /// beneath the base path instead of replacing its last segment.
    pub fn validate(&self) -> Result<Url, Error> {
        if self.minimum_frequency == 0 {
            return Err(Error::InvalidMinimumFrequency);
        }
        if self.timeout_ms == 0 {
            return Err(Error::InvalidTimeout);
        }

        let mut url = Url::parse(&self.base_url).map_err(|e| Error::InvalidBaseUrl {
            url: self.base_url.clone(),
            reason: e.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::UnsupportedScheme { url: self.base_url.clone() });
        }
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }

        Ok(url)
    }
}
