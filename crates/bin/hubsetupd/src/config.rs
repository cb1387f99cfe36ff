//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `hubsetup.toml` in the working directory. Every field has a
//! sensible default so the file is optional. Environment variables take
//! precedence over file values.

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;
use url::Url;

use hubsetup_adapter_http_axum::state::WizardSettings;
use hubsetup_adapter_hub_http::{AuthMode, GeocoderConfig, HubClientConfig};

/// Longest accepted idle time of a wizard session: 30 days.
const MAX_SESSION_TTL_SECS: u64 = 30 * 24 * 60 * 60;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Hub API settings.
    pub hub: HubConfig,
    /// Address lookup settings.
    pub geocoder: GeocoderSection,
    /// Wizard behaviour.
    pub wizard: WizardConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// TCP port.
    pub port: u16,
}

/// The hub being set up.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct HubConfig {
    /// Root URL of the hub REST API.
    pub base_url: String,
    /// Hub identifier in API paths.
    pub hub_id: String,
    pub auth: AuthMode,
    /// User the wizard signs in as.
    pub username: String,
    /// Factory password, replaced on the password step.
    pub password: String,
    /// OAuth client id for the password grant.
    pub client_id: String,
    pub timeout_secs: u64,
}

/// Nominatim-style geocoder.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GeocoderSection {
    pub base_url: String,
    pub user_agent: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct WizardConfig {
    /// Where the browser goes once the wizard is finished.
    pub console_url: String,
    /// Idle time after which a wizard session is forgotten.
    pub session_ttl_secs: u64,
    /// How often expired sessions are pruned.
    pub prune_interval_secs: u64,
    /// Serve `/setup/assets` from this directory instead of the built-in
    /// stylesheet.
    pub assets_dir: Option<PathBuf>,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

impl Config {
    /// Load configuration from `hubsetup.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting configuration is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("hubsetup.toml")?;
        config.apply_overrides(|name| std::env::var(name).ok());
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(val) = var("HUBSETUP_HOST") {
            self.server.host = val;
        }
        if let Some(val) = var("HUBSETUP_PORT")
            && let Ok(port) = val.parse()
        {
            self.server.port = port;
        }
        if let Some(val) = var("HUBSETUP_BIND")
            && let Some((host, port)) = val.rsplit_once(':')
        {
            self.server.host = host.to_string();
            if let Ok(port) = port.parse() {
                self.server.port = port;
            }
        }
        if let Some(val) = var("HUBSETUP_HUB_URL") {
            self.hub.base_url = val;
        }
        if let Some(val) = var("HUBSETUP_GEOCODER_URL") {
            self.geocoder.base_url = val;
        }
        if let Some(val) = var("HUBSETUP_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("port must be non-zero".to_string()));
        }
        parse_url("hub.base_url", &self.hub.base_url)?;
        parse_url("geocoder.base_url", &self.geocoder.base_url)?;
        if self.wizard.session_ttl_secs == 0 || self.wizard.session_ttl_secs > MAX_SESSION_TTL_SECS
        {
            return Err(ConfigError::Validation(format!(
                "session_ttl_secs must be between 1 and {MAX_SESSION_TTL_SECS}"
            )));
        }
        if self.wizard.prune_interval_secs == 0 {
            return Err(ConfigError::Validation(
                "prune_interval_secs must be non-zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Return the `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Settings for the hub client.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Url`] when the hub URL does not parse.
    pub fn hub_client(&self) -> Result<HubClientConfig, ConfigError> {
        Ok(HubClientConfig {
            base_url: parse_url("hub.base_url", &self.hub.base_url)?,
            hub_id: self.hub.hub_id.clone(),
            auth: self.hub.auth,
            client_id: self.hub.client_id.clone(),
            timeout: Duration::from_secs(self.hub.timeout_secs),
        })
    }

    /// Settings for the geocoder client.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Url`] when the geocoder URL does not parse.
    pub fn geocoder(&self) -> Result<GeocoderConfig, ConfigError> {
        Ok(GeocoderConfig {
            base_url: parse_url("geocoder.base_url", &self.geocoder.base_url)?,
            user_agent: self.geocoder.user_agent.clone(),
            timeout: Duration::from_secs(self.geocoder.timeout_secs),
        })
    }

    #[must_use]
    pub fn wizard_settings(&self) -> WizardSettings {
        WizardSettings {
            hub_username: self.hub.username.clone(),
            initial_password: self.hub.password.clone(),
            console_url: self.wizard.console_url.clone(),
            assets_dir: self.wizard.assets_dir.clone(),
        }
    }

    #[must_use]
    pub fn session_ttl(&self) -> chrono::Duration {
        let secs = self.wizard.session_ttl_secs.min(MAX_SESSION_TTL_SECS);
        chrono::Duration::seconds(i64::try_from(secs).unwrap_or(i64::MAX))
    }

    #[must_use]
    pub fn prune_interval(&self) -> Duration {
        Duration::from_secs(self.wizard.prune_interval_secs)
    }
}

fn parse_url(field: &'static str, value: &str) -> Result<Url, ConfigError> {
    Url::parse(value).map_err(|source| ConfigError::Url { field, source })
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8182/".to_string(),
            hub_id: "local".to_string(),
            auth: AuthMode::default(),
            username: "local".to_string(),
            password: "local".to_string(),
            client_id: "hubsetup".to_string(),
            timeout_secs: 10,
        }
    }
}

impl Default for GeocoderSection {
    fn default() -> Self {
        Self {
            base_url: "https://nominatim.openstreetmap.org/".to_string(),
            user_agent: concat!("hubsetupd/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_secs: 10,
        }
    }
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            console_url: "/console/index.html".to_string(),
            session_ttl_secs: 60 * 60,
            prune_interval_secs: 60,
            assets_dir: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "hubsetupd=info,hubsetup=info,tower_http=debug".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// A URL setting does not parse.
    #[error("invalid url in {field}")]
    Url {
        field: &'static str,
        #[source]
        source: url::ParseError,
    },
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
