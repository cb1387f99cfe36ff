//! Registration service — the start step: hub name, address, coordinates and
//! photo.

use std::sync::Arc;

use hubsetup_domain::error::{SetupError, ValidationError};
use hubsetup_domain::hub::{HubConfiguration, HubImage};
use hubsetup_domain::registration::{HubRegistration, Location};
use hubsetup_domain::session::{Notice, WizardSession};
use hubsetup_domain::step::Step;
use hubsetup_domain::wizard::{self, StepOutcome};

use super::credentials_or_restart;
use crate::ports::{Geocoder, HubApi};

const SAVE_FAILED: &str = "Unable to save the hub registration. Please try again.";
const LOOKUP_FAILED: &str = "Address lookup failed. Please try again.";
const IMAGE_UPLOADED: &str = "Hub image uploaded.";
const IMAGE_FAILED: &str = "Unable to upload the hub image.";

/// Start step form values, kept as typed so they can be shown again.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationInput {
    pub name: String,
    pub address: String,
    pub latitude: String,
    pub longitude: String,
}

impl RegistrationInput {
    /// Pre-fill the form from the hub configuration.
    #[must_use]
    pub fn from_configuration(config: &HubConfiguration) -> Self {
        Self {
            name: config.name.clone().unwrap_or_default(),
            address: config.address.clone().unwrap_or_default(),
            latitude: config.latitude.map(|v| v.to_string()).unwrap_or_default(),
            longitude: config.longitude.map(|v| v.to_string()).unwrap_or_default(),
        }
    }
}

pub struct RegistrationService<H, G> {
    hub: Arc<H>,
    geocoder: Arc<G>,
}

impl<H: HubApi, G: Geocoder> RegistrationService<H, G> {
    pub fn new(hub: Arc<H>, geocoder: Arc<G>) -> Self {
        Self { hub, geocoder }
    }

    /// Load the current registration and remember its address.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::Unauthorized`] when the session is not signed in
    /// or the hub refuses the credentials, or the transport error.
    #[tracing::instrument(skip(self, session), fields(session_id = %session.id))]
    pub async fn load(&self, session: &mut WizardSession) -> Result<RegistrationInput, SetupError> {
        let credentials = session
            .credentials
            .as_ref()
            .ok_or(SetupError::Unauthorized)?;
        let config = self.hub.get_configuration(credentials).await?;
        session.known_address = config
            .address
            .as_deref()
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .map(String::from);
        Ok(RegistrationInput::from_configuration(&config))
    }

    /// Handle "next" on the start step.
    ///
    /// An edited, non-blank address is geocoded first. Coordinates found by
    /// the lookup are written back into `input`; a failed lookup clears them.
    #[tracing::instrument(skip(self, session, input), fields(session_id = %session.id))]
    pub async fn submit(
        &self,
        session: &mut WizardSession,
        input: &mut RegistrationInput,
    ) -> StepOutcome {
        let credentials = match credentials_or_restart(session) {
            Ok(credentials) => credentials,
            Err(outcome) => return outcome,
        };
        if input.name.trim().is_empty() {
            return StepOutcome::Invalid(ValidationError::NicknameRequired.into());
        }

        let address = input.address.trim().to_string();
        let location = if !address.is_empty() && session.address_changed(&address) {
            match self.geocode(session, input, &address).await {
                Ok(location) => Some(location),
                Err(outcome) => return outcome,
            }
        } else {
            match Location::parse(&input.latitude, &input.longitude) {
                Ok(location) => location,
                Err(err) => return StepOutcome::Invalid(err.into()),
            }
        };

        let registration = match HubRegistration::builder()
            .name(input.name.as_str())
            .address(address)
            .location(location)
            .build()
        {
            Ok(registration) => registration,
            Err(err) => return StepOutcome::Invalid(err.into()),
        };
        let saved_address = registration.address.clone();
        let result = self
            .hub
            .update_configuration(&credentials, registration.into_configuration())
            .await;
        if result.is_ok() {
            session.known_address = saved_address;
        }
        wizard::settle(session, Step::Start, result, SAVE_FAILED)
    }

    /// Resolve an edited address, or decide where the browser goes instead.
    async fn geocode(
        &self,
        session: &mut WizardSession,
        input: &mut RegistrationInput,
        address: &str,
    ) -> Result<Location, StepOutcome> {
        let places = match self.geocoder.lookup(address).await {
            Ok(places) => places,
            Err(err) => {
                tracing::warn!(%err, "address lookup failed");
                // the address stays edited, so the next "next" looks it up again
                input.latitude.clear();
                input.longitude.clear();
                session.notify(Notice::error(LOOKUP_FAILED));
                return Err(StepOutcome::Stay);
            }
        };
        if let Some(location) = Location::single_match(&places) {
            input.latitude = location.latitude.to_string();
            input.longitude = location.longitude.to_string();
            session.show_coordinates = false;
            return Ok(location);
        }
        tracing::info!(
            places = places.len(),
            "address not resolved, asking for coordinates"
        );
        input.latitude.clear();
        input.longitude.clear();
        session.known_address = Some(address.to_string());
        session.show_coordinates = true;
        Err(StepOutcome::Invalid(ValidationError::AddressLookupFailure.into()))
    }

    /// Upload a new hub photo. Always stays on the start step.
    #[tracing::instrument(skip(self, session, bytes), fields(session_id = %session.id, size = bytes.len()))]
    pub async fn upload_image(
        &self,
        session: &mut WizardSession,
        file_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> StepOutcome {
        let credentials = match credentials_or_restart(session) {
            Ok(credentials) => credentials,
            Err(outcome) => return outcome,
        };
        let image = match HubImage::new(file_name, content_type, bytes) {
            Ok(image) => image,
            Err(err) => {
                session.notify(Notice::error(err.to_string()));
                return StepOutcome::Stay;
            }
        };
        match self.hub.upload_image(&credentials, image).await {
            Ok(_) => {
                session.notify(Notice::success(IMAGE_UPLOADED));
                StepOutcome::Stay
            }
            Err(SetupError::Unauthorized) => {
                session.restart();
                StepOutcome::Restart
            }
            Err(err) => {
                tracing::warn!(%err, "hub image upload failed");
                session.notify(Notice::error(IMAGE_FAILED));
                StepOutcome::Stay
            }
        }
    }
}
