//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into [`SetupError`]
//! via `#[from]` (or an explicit `From` impl) at the port boundary.

use std::error::Error as StdError;

/// Top-level error for wizard operations.
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    /// A form failed client-side validation; nothing was sent to the hub.
    #[error("validation error")]
    Validation(#[from] ValidationError),

    /// The hub answered `401`; the session credentials are no longer valid.
    #[error("not authorized by the hub")]
    Unauthorized,

    /// The hub refused the request (`4xx`) with a message meant for the user.
    #[error("rejected by the hub: {message}")]
    Rejected { message: String },

    /// The hub or geocoder could not be reached or answered unexpectedly.
    #[error("upstream service unavailable")]
    Unavailable(#[source] Box<dyn StdError + Send + Sync>),
}

impl SetupError {
    /// Whether the error should send the browser back to the first step.
    #[must_use]
    pub fn requires_restart(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }
}

/// A single form field failing its invariant.
///
/// The display string is what the user sees next to the field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("A nickname for your hub is required.")]
    NicknameRequired,
    #[error("Unable to find a location for that address. Please enter the latitude and longitude manually.")]
    AddressLookupFailure,
    #[error("Latitude must be a number between -90 and 90.")]
    InvalidLatitude,
    #[error("Longitude must be a number between -180 and 180.")]
    InvalidLongitude,
    #[error("Server hostname required.")]
    ServerHostnameRequired,
    #[error("No password has been set for the given username.")]
    ServerPasswordRequired,
    #[error("Sender address required.")]
    SenderRequired,
    #[error("A password is required.")]
    PasswordMissing,
    #[error("Passwords must match.")]
    PasswordMismatch,
    #[error("Passwords must be at least {min} characters long.")]
    PasswordTooShort { min: usize },
    #[error("Only JPEG and PNG images are accepted.")]
    UnsupportedImageType,
    #[error("The selected image is empty.")]
    EmptyImage,
}

impl ValidationError {
    /// Name of the form field the error belongs to.
    #[must_use]
    pub fn field(&self) -> &'static str {
        match self {
            Self::NicknameRequired => "name",
            Self::AddressLookupFailure => "address",
            Self::InvalidLatitude => "latitude",
            Self::InvalidLongitude => "longitude",
            Self::ServerHostnameRequired => "emailServer",
            Self::ServerPasswordRequired => "serverPassword",
            Self::SenderRequired => "emailSender",
            Self::PasswordMissing | Self::PasswordTooShort { .. } => "password",
            Self::PasswordMismatch => "repeat",
            Self::UnsupportedImageType | Self::EmptyImage => "image",
        }
    }
}
