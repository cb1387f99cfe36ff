//! Hub registration — the name, address and coordinates entered on the
//! start step.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::hub::HubConfiguration;

/// A point on the globe in WGS84 degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    /// Build a location after range-checking both coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidLatitude`] or
    /// [`ValidationError::InvalidLongitude`] for non-finite or out-of-range values.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, ValidationError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(ValidationError::InvalidLatitude);
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(ValidationError::InvalidLongitude);
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Parse coordinates typed into the manual latitude/longitude fields.
    ///
    /// Both fields blank means "no coordinates". A single blank field is
    /// reported against that field.
    ///
    /// # Errors
    ///
    /// Returns the validation error of the first field that is blank (while
    /// the other is not), unparseable, or out of range.
    pub fn parse(latitude: &str, longitude: &str) -> Result<Option<Self>, ValidationError> {
        let (latitude, longitude) = (latitude.trim(), longitude.trim());
        if latitude.is_empty() && longitude.is_empty() {
            return Ok(None);
        }
        let lat = latitude
            .parse::<f64>()
            .map_err(|_| ValidationError::InvalidLatitude)?;
        let lon = longitude
            .parse::<f64>()
            .map_err(|_| ValidationError::InvalidLongitude)?;
        Self::new(lat, lon).map(Some)
    }

    /// Pick the geocoding result to use: only an unambiguous single match
    /// with coordinates is trusted.
    ///
    /// `candidates` holds one entry per place found, `None` for a place
    /// without usable coordinates.
    #[must_use]
    pub fn single_match(candidates: &[Option<Location>]) -> Option<Location> {
        match candidates {
            [Some(only)] => Some(*only),
            _ => None,
        }
    }
}

/// Validated registration data ready to be written to the hub.
#[derive(Debug, Clone, PartialEq)]
pub struct HubRegistration {
    pub name: String,
    pub address: Option<String>,
    pub location: Option<Location>,
}

impl HubRegistration {
    /// Create a builder for constructing a [`HubRegistration`].
    #[must_use]
    pub fn builder() -> HubRegistrationBuilder {
        HubRegistrationBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NicknameRequired`] when `name` is blank.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::NicknameRequired);
        }
        Ok(())
    }

    /// The partial configuration update carrying this registration.
    ///
    /// Coordinates are only sent when both are known.
    #[must_use]
    pub fn into_configuration(self) -> HubConfiguration {
        HubConfiguration {
            name: Some(self.name),
            address: Some(self.address.unwrap_or_default()),
            latitude: self.location.map(|loc| loc.latitude),
            longitude: self.location.map(|loc| loc.longitude),
            ..HubConfiguration::default()
        }
    }
}

/// Step-by-step builder for [`HubRegistration`].
#[derive(Debug, Default)]
pub struct HubRegistrationBuilder {
    name: Option<String>,
    address: Option<String>,
    location: Option<Location>,
}

impl HubRegistrationBuilder {
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the postal address; blank addresses are dropped.
    #[must_use]
    pub fn address(mut self, address: impl Into<String>) -> Self {
        let address = address.into();
        let trimmed = address.trim();
        self.address = (!trimmed.is_empty()).then(|| trimmed.to_string());
        self
    }

    #[must_use]
    pub fn location(mut self, location: Option<Location>) -> Self {
        self.location = location;
        self
    }

    /// Consume the builder, validate, and return a [`HubRegistration`].
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NicknameRequired`] if `name` is missing or blank.
    pub fn build(self) -> Result<HubRegistration, ValidationError> {
        let registration = HubRegistration {
            name: self.name.unwrap_or_default().trim().to_string(),
            address: self.address,
            location: self.location,
        };
        registration.validate()?;
        Ok(registration)
    }
}
