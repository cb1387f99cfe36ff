//! Hub client error types.

use hubsetup_domain::error::SetupError;

/// Errors specific to the outbound HTTP adapter.
#[derive(Debug, thiserror::Error)]
pub enum HubClientError {
    /// The reqwest client could not be built.
    #[error("failed to build HTTP client")]
    Build(#[source] reqwest::Error),

    /// A request URL could not be built from the configured base URL.
    #[error("invalid request URL")]
    Url(#[from] url::ParseError),

    /// The upstream did not answer within the configured timeout.
    #[error("request timed out")]
    Timeout(#[source] reqwest::Error),

    /// The request could not be sent or its body could not be read.
    #[error("transport error")]
    Transport(#[source] reqwest::Error),

    /// The hub no longer accepts the credentials.
    #[error("unauthorized")]
    Unauthorized,

    /// The hub refused the request with a message meant for the user.
    #[error("rejected: {message}")]
    Rejected {
        /// First message of the hub's error body.
        message: String,
    },

    /// Any other unexpected status.
    #[error("unexpected status {status}: {preview}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Whitespace-compacted start of the response body.
        preview: String,
    },

    /// The response body did not have the expected shape.
    #[error("failed to decode response body")]
    Decode(#[source] serde_json::Error),
}

impl HubClientError {
    /// Convert into the matching [`SetupError`] for propagation across port
    /// boundaries.
    #[must_use]
    pub fn into_domain(self) -> SetupError {
        match self {
            Self::Unauthorized => SetupError::Unauthorized,
            Self::Rejected { message } => SetupError::Rejected { message },
            other => SetupError::Unavailable(Box::new(other)),
        }
    }
}

impl From<HubClientError> for SetupError {
    fn from(err: HubClientError) -> Self {
        err.into_domain()
    }
}
