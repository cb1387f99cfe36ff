//! Wire shapes of the hub API and the geocoder.
//!
//! Responses are decoded into these DTOs first, then mapped into domain types
//! in one pass.

use serde::{Deserialize, Serialize};

use hubsetup_domain::hub::HubConfiguration;
use hubsetup_domain::plugin::Plugin;
use hubsetup_domain::registration::Location;

#[derive(Debug, Deserialize)]
pub(crate) struct OpenIdConfigurationDto {
    pub(crate) token_endpoint: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TokenDto {
    pub(crate) access_token: String,
}

/// `GET …/configuration` body. Unknown keys such as `cclass` are ignored.
#[derive(Debug, Deserialize)]
pub(crate) struct ConfigurationDto {
    #[serde(default)]
    pub(crate) values: HubConfiguration,
}

#[derive(Debug, Serialize)]
pub(crate) struct ClassRefDto {
    #[serde(rename = "@id")]
    pub(crate) id: String,
}

/// `PUT …/configuration` body.
#[derive(Debug, Serialize)]
pub(crate) struct ConfigurationUpdateDto<'a> {
    pub(crate) cclass: ClassRefDto,
    pub(crate) values: &'a HubConfiguration,
}

/// `POST …/configuration/sendTestEmail` body.
#[derive(Debug, Serialize)]
pub(crate) struct ValuesDto<'a> {
    pub(crate) values: &'a HubConfiguration,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PluginListDto {
    #[serde(default)]
    pub(crate) number_of_items: usize,
    #[serde(default)]
    pub(crate) item_list_element: Vec<PluginElementDto>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PluginElementDto {
    pub(crate) item: PluginDto,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PluginDto {
    #[serde(rename = "@id")]
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) description: Option<String>,
    pub(crate) version: Option<String>,
    #[serde(default)]
    pub(crate) links: PluginLinksDto,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct PluginLinksDto {
    pub(crate) install: Option<String>,
}

impl PluginListDto {
    pub(crate) fn into_domain(self) -> Vec<Plugin> {
        if self.number_of_items != self.item_list_element.len() {
            tracing::debug!(
                announced = self.number_of_items,
                received = self.item_list_element.len(),
                "plugin list count mismatch"
            );
        }
        self.item_list_element
            .into_iter()
            .map(|element| element.item.into_domain())
            .collect()
    }
}

impl PluginDto {
    fn into_domain(self) -> Plugin {
        Plugin {
            id: self.id,
            name: self.name,
            description: self.description.filter(|d| !d.is_empty()),
            version: self.version,
            install_link: self.links.install,
        }
    }
}

/// Hub error body: `{"errors": [{"message": "..."}]}`.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBodyDto {
    #[serde(default)]
    errors: Vec<ErrorDto>,
}

#[derive(Debug, Deserialize)]
struct ErrorDto {
    message: Option<String>,
}

impl ErrorBodyDto {
    /// The first error message, if the body carries one.
    pub(crate) fn first_message(body: &[u8]) -> Option<String> {
        let decoded: Self = serde_json::from_slice(body).ok()?;
        decoded
            .errors
            .into_iter()
            .next()
            .and_then(|error| error.message)
            .filter(|message| !message.trim().is_empty())
    }
}

/// One Nominatim search result; coordinates come as decimal strings.
#[derive(Debug, Deserialize)]
pub(crate) struct PlaceDto {
    #[serde(default)]
    lat: String,
    #[serde(default)]
    lon: String,
}

impl PlaceDto {
    /// The place's location, or `None` when the coordinates are unusable.
    pub(crate) fn into_domain(self) -> Option<Location> {
        let latitude = self.lat.trim().parse().ok()?;
        let longitude = self.lon.trim().parse().ok()?;
        Location::new(latitude, longitude).ok()
    }
}
