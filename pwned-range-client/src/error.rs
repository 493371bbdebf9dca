/// Errors building a client from its configuration.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("base URL '{url}' must use http or https")]
    UnsupportedScheme { url: String },

    #[error("minimum frequency must be at least 1")]
    InvalidMinimumFrequency,

    #[error("timeout must be greater than zero")]
    InvalidTimeout,

    #[error("invalid user agent: {reason}")]
    InvalidUserAgent { reason: String },

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
}

/// Why a single range lookup produced no answer.
///
/// The fail-open checks map every variant to "not pwned"; it is only
/// surfaced by [`PwnedPasswordsClient::frequency`](crate::PwnedPasswordsClient::frequency).
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    /// Connection, DNS, TLS or timeout failure before a response arrived.
    #[error("HTTP request failed for prefix {prefix}: {source}")]
    Transport {
        prefix: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP {status} for prefix {prefix}")]
    UnexpectedStatus { prefix: String, status: u16 },

    /// The response started but its body could not be read to the end.
    #[error("failed reading response body for prefix {prefix}: {source}")]
    Body {
        prefix: String,
        #[source]
        source: std::io::Error,
    },

    #[error("lookup for prefix {prefix} was cancelled")]
    Cancelled { prefix: String },
}
