//! Outbound e-mail configuration entered on the email step.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::hub::HubConfiguration;

/// Hostname that identifies the Gmail preset.
pub const GMAIL_SMTP_HOST: &str = "smtp.gmail.com";

/// Which kind of outbound server the user picked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServerType {
    /// No e-mail; the step is skipped without saving.
    #[default]
    None,
    Gmail,
    Other,
}

impl ServerType {
    /// Infer the server type from a stored server hostname.
    #[must_use]
    pub fn infer(server: Option<&str>) -> Self {
        match server.map(str::trim) {
            None | Some("") => Self::None,
            Some(GMAIL_SMTP_HOST) => Self::Gmail,
            Some(_) => Self::Other,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Gmail => "gmail",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for ServerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a form value names no server type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown server type: {0}")]
pub struct UnknownServerType(pub String);

impl FromStr for ServerType {
    type Err = UnknownServerType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" | "" => Ok(Self::None),
            "gmail" => Ok(Self::Gmail),
            "other" => Ok(Self::Other),
            other => Err(UnknownServerType(other.to_string())),
        }
    }
}

/// SMTP settings the hub uses to send mail.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmailConfiguration {
    pub server: String,
    pub secure: bool,
    pub username: Option<String>,
    pub password: Option<String>,
    pub sender: String,
}

impl EmailConfiguration {
    /// Settings pre-filled when the Gmail server type is chosen.
    #[must_use]
    pub fn gmail_preset() -> Self {
        Self {
            server: GMAIL_SMTP_HOST.to_string(),
            secure: true,
            ..Self::default()
        }
    }

    /// Read the e-mail settings out of a hub configuration.
    ///
    /// The stored password is never read back.
    #[must_use]
    pub fn from_configuration(config: &HubConfiguration) -> Self {
        Self {
            server: config.email_server.clone().unwrap_or_default(),
            secure: config.email_secure.unwrap_or(false),
            username: config.email_username.clone().filter(|u| !u.is_empty()),
            password: None,
            sender: config.email_sender.clone().unwrap_or_default(),
        }
    }

    /// Apply the choice of server type to entered settings.
    ///
    /// Choosing Gmail forces its hostname and TLS; other types keep what was
    /// entered.
    #[must_use]
    pub fn with_server_type(self, server_type: ServerType) -> Self {
        match server_type {
            ServerType::Gmail => Self {
                server: GMAIL_SMTP_HOST.to_string(),
                secure: true,
                ..self
            },
            ServerType::None | ServerType::Other => self,
        }
    }

    /// The server type implied by the configured hostname.
    #[must_use]
    pub fn server_type(&self) -> ServerType {
        ServerType::infer(Some(&self.server))
    }

    /// Check domain invariants, reporting the first failure.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::ServerHostnameRequired`] when no server is set
    /// - [`ValidationError::ServerPasswordRequired`] when a username has no password
    /// - [`ValidationError::SenderRequired`] when no sender address is set
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.server.trim().is_empty() {
            return Err(ValidationError::ServerHostnameRequired);
        }
        let has_username = self.username.as_deref().is_some_and(|u| !u.is_empty());
        let has_password = self.password.as_deref().is_some_and(|p| !p.is_empty());
        if has_username && !has_password {
            return Err(ValidationError::ServerPasswordRequired);
        }
        if self.sender.trim().is_empty() {
            return Err(ValidationError::SenderRequired);
        }
        Ok(())
    }

    /// The partial configuration update carrying these settings.
    ///
    /// The password is only sent when one was entered, so an existing
    /// password on the hub is kept otherwise.
    #[must_use]
    pub fn into_configuration(self) -> HubConfiguration {
        HubConfiguration {
            email_server: Some(self.server.trim().to_string()),
            email_secure: Some(self.secure),
            email_username: Some(self.username.unwrap_or_default()),
            email_password: self.password.filter(|p| !p.is_empty()),
            email_sender: Some(self.sender.trim().to_string()),
            ..HubConfiguration::default()
        }
    }
}
