//! Connection settings for the hub and geocoder clients.

use std::time::Duration;

use serde::Deserialize;
use url::Url;

/// How the wizard authenticates against the hub.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthMode {
    /// OpenID discovery, then a password grant for a bearer token.
    #[default]
    Bearer,
    /// HTTP basic authentication on every request.
    Basic,
}

/// Settings for [`crate::HubHttpClient`].
#[derive(Debug, Clone)]
pub struct HubClientConfig {
    /// Root URL of the hub, e.g. `http://localhost:8182/`.
    pub base_url: Url,
    /// Hub identifier used in every API path.
    pub hub_id: String,
    pub auth: AuthMode,
    /// OAuth client id sent with the password grant.
    pub client_id: String,
    pub timeout: Duration,
}

/// Settings for [`crate::NominatimGeocoder`].
#[derive(Debug, Clone)]
pub struct GeocoderConfig {
    /// Root URL of the search service; `search` is resolved against it.
    pub base_url: Url,
    /// Identifying User-Agent, required by public Nominatim instances.
    pub user_agent: String,
    pub timeout: Duration,
}

/// Make `url` usable as a base for relative joins.
pub(crate) fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}
