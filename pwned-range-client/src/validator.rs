//! Adapter for plugging the breach check into a password policy.

use crate::client::PwnedPasswordsClient;

/// Error code reported for breached passwords.
pub const PWNED_PASSWORD_CODE: &str = "PwnedPassword";

pub const DEFAULT_ERROR_MESSAGE: &str = "The password you chose has appeared in a data breach.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PwnedPasswordValidatorOptions {
    /// Message shown to the user when a breached password is rejected.
    pub error_message: String,
}

impl Default for PwnedPasswordValidatorOptions {
    fn default() -> Self {
        Self { error_message: DEFAULT_ERROR_MESSAGE.to_string() }
    }
}

/// A rejected password.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{code}: {description}")]
pub struct ValidationError {
    pub code: &'static str,
    pub description: String,
}

/// Rejects passwords that appear in the breach corpus.
///
/// Inherits the client's fail-open policy: when the API is unavailable every
/// password passes this validator.
#[derive(Clone)]
pub struct PwnedPasswordValidator {
    client: PwnedPasswordsClient,
    options: PwnedPasswordValidatorOptions,
}

impl PwnedPasswordValidator {
    pub fn new(client: PwnedPasswordsClient, options: PwnedPasswordValidatorOptions) -> Self {
        Self { client, options }
    }

    pub async fn validate(&self, password: &str) -> Result<(), ValidationError> {
        if self.client.is_pwned(password).await {
            return Err(ValidationError {
                code: PWNED_PASSWORD_CODE,
                description: self.options.error_message.clone(),
            });
        }
        Ok(())
    }
}
