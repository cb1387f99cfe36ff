//! Password service — replace the default hub password.

use std::sync::Arc;

use hubsetup_domain::error::SetupError;
use hubsetup_domain::password::PasswordChange;
use hubsetup_domain::session::{Notice, WizardSession};
use hubsetup_domain::step::Step;
use hubsetup_domain::wizard::{self, FieldErrors, StepOutcome};

use super::credentials_or_restart;
use crate::ports::HubApi;

const CHANGE_FAILED: &str = "Unable to change the hub password. Please try again.";

pub struct PasswordService<H> {
    hub: Arc<H>,
}

impl<H: HubApi> PasswordService<H> {
    pub fn new(hub: Arc<H>) -> Self {
        Self { hub }
    }

    /// Handle "next" on the password step.
    ///
    /// On success the session remembers the new password (it is shown on the
    /// complete step) and basic credentials are updated to carry it. A
    /// message from the hub rejecting the password is shown on the password
    /// field.
    #[tracing::instrument(skip_all, fields(session_id = %session.id))]
    pub async fn submit(
        &self,
        session: &mut WizardSession,
        password: &str,
        repeat: &str,
    ) -> StepOutcome {
        let change = match PasswordChange::new(session.hub_password.as_str(), password, repeat) {
            Ok(change) => change,
            Err(err) => return StepOutcome::Invalid(err.into()),
        };
        let credentials = match credentials_or_restart(session) {
            Ok(credentials) => credentials,
            Err(outcome) => return outcome,
        };

        match self.hub.change_password(&credentials, change).await {
            Ok(ack) => {
                tracing::info!(?ack, "hub password changed");
                session.hub_password = password.to_string();
                session.credentials = Some(credentials.with_password(password));
                wizard::advance(session, Step::Password)
            }
            Err(SetupError::Rejected { message }) => {
                let mut errors = FieldErrors::new();
                errors.insert("password", message);
                StepOutcome::Invalid(errors)
            }
            Err(SetupError::Unauthorized) => {
                session.restart();
                StepOutcome::Restart
            }
            Err(err) => {
                tracing::warn!(%err, "password change failed");
                session.notify(Notice::error(CHANGE_FAILED));
                StepOutcome::Stay
            }
        }
    }
}
