//! Hub resources as the wizard sees them: configuration values, the hub
//! photo, and the credentials used to talk to the hub API.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Accepted image types for the hub photo.
pub const ACCEPTED_IMAGE_TYPES: [&str; 2] = ["image/jpeg", "image/png"];

/// The hub configuration property bag.
///
/// Every value is optional: reads may return a partially configured hub, and
/// writes are partial updates that the hub merges into its current
/// configuration. `None` values are left out of the serialized form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HubConfiguration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_server: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_secure: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_sender: Option<String>,
}

/// How the hub acknowledged a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ack {
    /// The hub applied the change (`2xx` other than `202`).
    Completed,
    /// The hub accepted the change and is still applying it (`202`).
    Accepted,
}

/// Credentials attached to every hub API call.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// Access token obtained from the hub's token endpoint.
    Bearer { token: String },
    /// Username and password sent with every request.
    Basic { username: String, password: String },
}

impl Credentials {
    /// Replace the password carried by basic credentials.
    ///
    /// Bearer tokens stay valid across a password change and are returned
    /// unchanged.
    #[must_use]
    pub fn with_password(self, new_password: &str) -> Self {
        match self {
            Self::Basic { username, .. } => Self::Basic {
                username,
                password: new_password.to_string(),
            },
            bearer @ Self::Bearer { .. } => bearer,
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bearer { .. } => f.debug_struct("Bearer").finish_non_exhaustive(),
            Self::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .finish_non_exhaustive(),
        }
    }
}

/// A photo of the hub, uploaded from the start step.
#[derive(Debug, Clone)]
pub struct HubImage {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl HubImage {
    /// Build an image after checking it is a non-empty JPEG or PNG.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyImage`] for an empty upload and
    /// [`ValidationError::UnsupportedImageType`] for any other content type.
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Result<Self, ValidationError> {
        let content_type = content_type.into();
        if bytes.is_empty() {
            return Err(ValidationError::EmptyImage);
        }
        if !ACCEPTED_IMAGE_TYPES.contains(&content_type.as_str()) {
            return Err(ValidationError::UnsupportedImageType);
        }
        Ok(Self {
            file_name: file_name.into(),
            content_type,
            bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_skip_unset_values_when_serializing() {
        let config = HubConfiguration {
            name: Some("Home".to_string()),
            ..HubConfiguration::default()
        };
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json, serde_json::json!({"name": "Home"}));
    }

    #[test]
    fn should_read_camel_case_values_and_ignore_unknown_keys() {
        let json = r#"{
            "name": "Home",
            "emailServer": "smtp.gmail.com",
            "emailSecure": true,
            "logLevel": "INFO"
        }"#;
        let config: HubConfiguration = serde_json::from_str(json).unwrap();
        assert_eq!(config.name.as_deref(), Some("Home"));
        assert_eq!(config.email_server.as_deref(), Some("smtp.gmail.com"));
        assert_eq!(config.email_secure, Some(true));
        assert!(config.address.is_none());
    }

    #[test]
    fn should_replace_basic_password_but_keep_bearer_token() {
        let basic = Credentials::Basic {
            username: "local".to_string(),
            password: "local".to_string(),
        };
        assert_eq!(
            basic.with_password("s3cretpass"),
            Credentials::Basic {
                username: "local".to_string(),
                password: "s3cretpass".to_string(),
            }
        );

        let bearer = Credentials::Bearer {
            token: "abc".to_string(),
        };
        assert_eq!(bearer.clone().with_password("s3cretpass"), bearer);
    }

    #[test]
    fn should_not_leak_secrets_in_debug_output() {
        let creds = Credentials::Basic {
            username: "local".to_string(),
            password: "hunter22".to_string(),
        };
        let debug = format!("{creds:?}");
        assert!(debug.contains("local"));
        assert!(!debug.contains("hunter22"));
    }

    #[test]
    fn should_accept_png_image() {
        let image = HubImage::new("hub.png", "image/png", vec![1, 2, 3]).unwrap();
        assert_eq!(image.file_name, "hub.png");
    }

    #[test]
    fn should_reject_empty_or_unsupported_images() {
        assert_eq!(
            HubImage::new("hub.png", "image/png", vec![]).unwrap_err(),
            ValidationError::EmptyImage
        );
        assert_eq!(
            HubImage::new("hub.gif", "image/gif", vec![1]).unwrap_err(),
            ValidationError::UnsupportedImageType
        );
    }
}
