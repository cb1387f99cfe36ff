//! E-mail service — outbound mail settings of the hub.

use std::sync::Arc;

use hubsetup_domain::email::{EmailConfiguration, ServerType};
use hubsetup_domain::error::SetupError;
use hubsetup_domain::session::{Notice, WizardSession};
use hubsetup_domain::step::Step;
use hubsetup_domain::wizard::{self, StepOutcome};

use super::credentials_or_restart;
use crate::ports::HubApi;

const SAVE_FAILED: &str = "Unable to save the e-mail settings. Please try again.";
const TEST_SUCCEEDED: &str = "Test message sent successfully.";
const TEST_FAILED: &str = "Test message failed. Please check the e-mail settings.";

pub struct EmailService<H> {
    hub: Arc<H>,
}

impl<H: HubApi> EmailService<H> {
    pub fn new(hub: Arc<H>) -> Self {
        Self { hub }
    }

    /// Current settings and the server type they imply.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::Unauthorized`] when the session is not signed in
    /// or the hub refuses the credentials, or the transport error.
    #[tracing::instrument(skip(self, session), fields(session_id = %session.id))]
    pub async fn load(
        &self,
        session: &WizardSession,
    ) -> Result<(ServerType, EmailConfiguration), SetupError> {
        let credentials = session
            .credentials
            .as_ref()
            .ok_or(SetupError::Unauthorized)?;
        let config = self.hub.get_configuration(credentials).await?;
        let email = EmailConfiguration::from_configuration(&config);
        Ok((email.server_type(), email))
    }

    /// Handle "next" on the email step. No e-mail skips the step unsaved.
    #[tracing::instrument(skip(self, session, email), fields(session_id = %session.id))]
    pub async fn submit(
        &self,
        session: &mut WizardSession,
        server_type: ServerType,
        email: EmailConfiguration,
    ) -> StepOutcome {
        if server_type == ServerType::None {
            return wizard::advance(session, Step::Email);
        }
        let email = email.with_server_type(server_type);
        if let Err(err) = email.validate() {
            return StepOutcome::Invalid(err.into());
        }
        let credentials = match credentials_or_restart(session) {
            Ok(credentials) => credentials,
            Err(outcome) => return outcome,
        };
        let result = self
            .hub
            .update_configuration(&credentials, email.into_configuration())
            .await;
        wizard::settle(session, Step::Email, result, SAVE_FAILED)
    }

    /// Ask the hub to send a test message with the entered settings.
    #[tracing::instrument(skip(self, session, email), fields(session_id = %session.id))]
    pub async fn send_test(
        &self,
        session: &mut WizardSession,
        server_type: ServerType,
        email: EmailConfiguration,
    ) -> StepOutcome {
        let email = email.with_server_type(server_type);
        if let Err(err) = email.validate() {
            return StepOutcome::Invalid(err.into());
        }
        let credentials = match credentials_or_restart(session) {
            Ok(credentials) => credentials,
            Err(outcome) => return outcome,
        };
        match self.hub.send_test_email(&credentials, email).await {
            Ok(_) => session.notify(Notice::success(TEST_SUCCEEDED)),
            Err(SetupError::Unauthorized) => {
                session.restart();
                return StepOutcome::Restart;
            }
            Err(err) => {
                tracing::warn!(%err, "test message failed");
                session.notify(Notice::error(TEST_FAILED));
            }
        }
        StepOutcome::Stay
    }
}
