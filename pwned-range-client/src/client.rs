use std::io;
use std::pin::pin;
use std::sync::Arc;

use futures_util::TryStreamExt;
use reqwest::Url;
use reqwest::header::{HeaderValue, USER_AGENT};
use tokio_util::io::StreamReader;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

use crate::config::ClientConfig;
use crate::error::{Error, LookupError};
use crate::hash::PasswordHash;
use crate::range::find_frequency;

/// Header asking the range API to pad responses with zero-count decoys.
pub const ADD_PADDING_HEADER: &str = "Add-Padding";

/// Checks passwords against a k-anonymity range API.
///
/// Only the first 5 hex characters of the password's SHA1 ever leave the
/// process. Clones share one connection pool, and any number of checks may
/// run concurrently on the same client.
///
/// The `is_pwned` checks fail open: if the API cannot be reached or answers
/// with an error, the failure is logged and the password is reported as
/// not pwned, so an outage never blocks a password change.
#[derive(Clone)]
pub struct PwnedPasswordsClient {
    http: reqwest::Client,
    base_url: Url,
    user_agent: HeaderValue,
    config: Arc<ClientConfig>,
}

impl PwnedPasswordsClient {
    /// Creates a client with its own rustls-backed HTTP connection pool.
    pub fn new(config: ClientConfig) -> Result<Self, Error> {
        let http = reqwest::Client::builder().build().map_err(Error::HttpClient)?;
        Self::with_http_client(http, config)
    }

    /// Creates a client on top of an existing HTTP client, e.g. one shared
    /// with the rest of an application.
    ///
    /// The configured timeout and user agent are applied per request, so
    /// they take effect regardless of how `http` was built.
    pub fn with_http_client(http: reqwest::Client, config: ClientConfig) -> Result<Self, Error> {
        let base_url = config.validate()?;
        let user_agent = HeaderValue::from_str(&config.user_agent)
            .map_err(|e| Error::InvalidUserAgent { reason: e.to_string() })?;

        Ok(Self { http, base_url, user_agent, config: Arc::new(config) })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The URL queried for a given 5-character hash prefix.
    pub fn range_url(&self, prefix: &str) -> Url {
        let mut url = self.base_url.clone();
        // http(s) URLs always have a path, so this cannot fail.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("range").push(prefix);
        }
        url
    }

    /// Returns `true` if the password has been seen in breaches at least
    /// `minimum_frequency` times.
    ///
    /// Never fails: transport errors, timeouts and unexpected statuses are
    /// logged and reported as `false`.
    pub async fn is_pwned(&self, password: &str) -> bool {
        self.is_pwned_with_cancel(password, &CancellationToken::new()).await
    }

    /// Like [`is_pwned`](Self::is_pwned), but aborts the in-flight request
    /// when `cancel` fires. A cancelled check reports `false`.
    pub async fn is_pwned_with_cancel(&self, password: &str, cancel: &CancellationToken) -> bool {
        let hash = PasswordHash::of(password);
        let prefix = hash.prefix();

        match self.frequency_of(&hash, cancel).await {
            Ok(frequency) => {
                let pwned = frequency >= self.config.minimum_frequency;
                if pwned {
                    debug!(prefix, frequency, "Pwned Passwords API indicates the password has been pwned");
                } else {
                    debug!(prefix, frequency, "Pwned Passwords API indicates the password has not been pwned");
                }
                pwned
            }
            Err(LookupError::UnexpectedStatus { status, .. }) => {
                warn!(prefix, status, "Unexpected response from Pwned Passwords API");
                false
            }
            Err(LookupError::Cancelled { .. }) => {
                debug!(prefix, "Pwned Passwords lookup cancelled, assuming password is not pwned");
                false
            }
            Err(err @ (LookupError::Transport { .. } | LookupError::Body { .. })) => {
                error!(
                    prefix,
                    error = ?err,
                    "Error calling Pwned Passwords API, assuming password is not pwned"
                );
                false
            }
        }
    }

    /// Looks up how many times the password appears in the corpus.
    ///
    /// Unlike the `is_pwned` checks this does not fail open; `Ok(0)` means
    /// the API answered and the hash was not in its response.
    pub async fn frequency(&self, password: &str, cancel: &CancellationToken) -> Result<u64, LookupError> {
        self.frequency_of(&PasswordHash::of(password), cancel).await
    }

    #[tracing::instrument(level = "debug", skip_all, fields(prefix = hash.prefix()))]
    async fn frequency_of(&self, hash: &PasswordHash, cancel: &CancellationToken) -> Result<u64, LookupError> {
        let (prefix, suffix) = hash.split();

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(LookupError::Cancelled { prefix: prefix.to_string() }),
            result = self.query_range(prefix, suffix) => result,
        }
    }

    async fn query_range(&self, prefix: &str, suffix: &str) -> Result<u64, LookupError> {
        let mut request = self
            .http
            .get(self.range_url(prefix))
            .timeout(self.config.timeout())
            .header(USER_AGENT, self.user_agent.clone());
        if self.config.add_padding {
            request = request.header(ADD_PADDING_HEADER, "true");
        }

        let response = request
            .send()
            .await
            .map_err(|source| LookupError::Transport { prefix: prefix.to_string(), source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::UnexpectedStatus {
                prefix: prefix.to_string(),
                status: status.as_u16(),
            });
        }

        let body = pin!(StreamReader::new(response.bytes_stream().map_err(io::Error::other)));
        find_frequency(body, suffix)
            .await
            .map_err(|source| LookupError::Body { prefix: prefix.to_string(), source })
    }
}
