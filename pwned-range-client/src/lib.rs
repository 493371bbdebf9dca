//! Checks passwords against the Pwned Passwords breach corpus using the
//! k-anonymity range API.
//!
//! The password is hashed with SHA1 and only the first 5 hex characters of
//! the hash are sent to the server. The server answers with every known hash
//! suffix sharing that prefix, together with how often each was seen, and
//! the match is done locally. The server never learns the password or its
//! full hash.
//!
//! # Failure policy
//!
//! [`PwnedPasswordsClient::is_pwned`] fails open. Connection errors,
//! timeouts, cancellation and non-success responses are logged through
//! `tracing` and reported as "not pwned". A breach check is advisory, and an
//! unreachable API must not stop users from changing their password. Use
//! [`PwnedPasswordsClient::frequency`] to see failures instead.
//!
//! # Usage
//!
//! ```no_run
//! use pwned_range_client::{ClientConfig, PwnedPasswordsClient};
//!
//! # async fn run() -> Result<(), pwned_range_client::Error> {
//! let client = PwnedPasswordsClient::new(ClientConfig::default())?;
//! if client.is_pwned("Password1!").await {
//!     println!("choose another password");
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod hash;
pub mod range;
pub mod validator;

pub use client::PwnedPasswordsClient;
pub use config::{ClientConfig, DEFAULT_BASE_URL};
pub use error::{Error, LookupError};
pub use hash::PasswordHash;
pub use range::{RangeEntry, find_frequency};
pub use tokio_util::sync::CancellationToken;
pub use validator::{PwnedPasswordValidator, PwnedPasswordValidatorOptions, ValidationError};
