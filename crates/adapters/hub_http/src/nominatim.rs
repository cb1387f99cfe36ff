//! Nominatim-style geocoder: `GET {base}/search?format=json&q={address}`.

use reqwest::Client;
use reqwest::header::{ACCEPT, USER_AGENT};
use url::Url;

use hubsetup_app::ports::Geocoder;
use hubsetup_domain::error::SetupError;
use hubsetup_domain::registration::Location;

use crate::client::{acknowledge, decode, send};
use crate::config::{GeocoderConfig, with_trailing_slash};
use crate::dto::PlaceDto;
use crate::error::HubClientError;

/// [`Geocoder`] backed by an OpenStreetMap Nominatim search endpoint.
pub struct NominatimGeocoder {
    client: Client,
    search_url: Url,
    user_agent: String,
}

impl NominatimGeocoder {
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed or the
    /// search URL cannot be derived from the base URL.
    pub fn new(config: GeocoderConfig) -> Result<Self, HubClientError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(HubClientError::Build)?;
        let search_url = with_trailing_slash(config.base_url).join("search")?;
        Ok(Self {
            client,
            search_url,
            user_agent: config.user_agent,
        })
    }

    async fn search(&self, address: &str) -> Result<Vec<Option<Location>>, HubClientError> {
        let request = self
            .client
            .get(self.search_url.clone())
            .query(&[("format", "json"), ("q", address)])
            .header(USER_AGENT, self.user_agent.as_str())
            .header(ACCEPT, "application/json");
        let (status, body) = send(request).await?;
        acknowledge(status, &body)?;
        let places: Vec<PlaceDto> = decode(&body)?;
        let locations: Vec<Option<Location>> =
            places.into_iter().map(PlaceDto::into_domain).collect();
        let unusable = locations.iter().filter(|l| l.is_none()).count();
        if unusable > 0 {
            tracing::debug!(unusable, "places without usable coordinates");
        }
        Ok(locations)
    }
}

impl Geocoder for NominatimGeocoder {
    #[tracing::instrument(skip(self))]
    async fn lookup(&self, address: &str) -> Result<Vec<Option<Location>>, SetupError> {
        Ok(self.search(address).await?)
    }
}
