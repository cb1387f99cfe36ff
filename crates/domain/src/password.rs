//! Password change submitted on the password step.

use serde::Serialize;

use crate::error::ValidationError;

/// Minimum accepted length for a new hub password.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// A validated request to replace the hub password.
#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordChange {
    pub current_password: String,
    pub new_password: String,
}

impl PasswordChange {
    /// Validate the new password and its confirmation.
    ///
    /// Checks run in order: presence, confirmation match, minimum length.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::PasswordMissing`] when `new_password` is empty
    /// - [`ValidationError::PasswordMismatch`] when `repeat` differs
    /// - [`ValidationError::PasswordTooShort`] below [`MIN_PASSWORD_LENGTH`] characters
    pub fn new(
        current_password: impl Into<String>,
        new_password: &str,
        repeat: &str,
    ) -> Result<Self, ValidationError> {
        if new_password.is_empty() {
            return Err(ValidationError::PasswordMissing);
        }
        if new_password != repeat {
            return Err(ValidationError::PasswordMismatch);
        }
        if new_password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(ValidationError::PasswordTooShort {
                min: MIN_PASSWORD_LENGTH,
            });
        }
        Ok(Self {
            current_password: current_password.into(),
            new_password: new_password.to_string(),
        })
    }
}

impl std::fmt::Debug for PasswordChange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordChange").finish_non_exhaustive()
    }
}
