//! Sign-in service — obtain hub credentials for a wizard session.

use std::sync::Arc;

use hubsetup_domain::error::SetupError;
use hubsetup_domain::session::WizardSession;

use crate::ports::HubApi;

/// Signs the wizard in to the hub as the setup user.
pub struct SignInService<H> {
    hub: Arc<H>,
    username: String,
}

impl<H: HubApi> SignInService<H> {
    /// Create a service signing in as `username`.
    pub fn new(hub: Arc<H>, username: impl Into<String>) -> Self {
        Self {
            hub,
            username: username.into(),
        }
    }

    /// Sign in with the session's known hub password unless already signed in.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::Unauthorized`] when the hub refuses the password
    /// (typically because it was already changed), or the transport error.
    #[tracing::instrument(skip(self, session), fields(session_id = %session.id))]
    pub async fn ensure_signed_in(&self, session: &mut WizardSession) -> Result<(), SetupError> {
        if session.is_signed_in() {
            return Ok(());
        }
        let credentials = self
            .hub
            .sign_in(&self.username, &session.hub_password)
            .await
            .inspect_err(|err| tracing::warn!(%err, "hub sign-in failed"))?;
        session.credentials = Some(credentials);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::{Reply, StubHub, session};

    #[tokio::test]
    async fn should_store_credentials_after_sign_in() {
        let hub = Arc::new(StubHub::default());
        let svc = SignInService::new(Arc::clone(&hub), "local");
        let mut s = session();
        s.credentials = None;

        svc.ensure_signed_in(&mut s).await.unwrap();

        assert!(s.is_signed_in());
        assert_eq!(hub.calls(), vec!["sign_in:local:local"]);
    }

    #[tokio::test]
    async fn should_not_sign_in_twice() {
        let hub = Arc::new(StubHub::default());
        let svc = SignInService::new(Arc::clone(&hub), "local");
        let mut s = session();

        svc.ensure_signed_in(&mut s).await.unwrap();

        assert!(hub.calls().is_empty());
    }

    #[tokio::test]
    async fn should_report_rejected_password() {
        let hub = Arc::new(StubHub::default().with_reply("sign_in", Reply::Unauthorized));
        let svc = SignInService::new(hub, "local");
        let mut s = session();
        s.credentials = None;

        let result = svc.ensure_signed_in(&mut s).await;

        assert!(matches!(result, Err(SetupError::Unauthorized)));
        assert!(!s.is_signed_in());
    }
}
