//! Application services — use-case implementations, one per wizard step.
//!
//! Each service struct accepts port trait implementations via generic parameters
//! (constructor injection), keeping this layer decoupled from concrete adapters.
//! Ports are shared between services through `Arc`.

pub mod email_service;
pub mod password_service;
pub mod plugin_service;
pub mod registration_service;
pub mod sign_in_service;

#[cfg(test)]
mod test_support;

use hubsetup_domain::hub::Credentials;
use hubsetup_domain::session::WizardSession;
use hubsetup_domain::wizard::StepOutcome;

/// Credentials of a signed-in session, or the restart outcome when there are none.
fn credentials_or_restart(session: &mut WizardSession) -> Result<Credentials, StepOutcome> {
    match session.credentials.clone() {
        Some(credentials) => Ok(credentials),
        None => {
            session.restart();
            Err(StepOutcome::Restart)
        }
    }
}
