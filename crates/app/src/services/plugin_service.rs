//! Plugin service — list remote plugins and install the selected ones.

use std::sync::Arc;

use hubsetup_domain::error::SetupError;
use hubsetup_domain::plugin::{Plugin, PluginSelection};
use hubsetup_domain::session::{Notice, WizardSession};
use hubsetup_domain::step::Step;
use hubsetup_domain::wizard::{self, StepOutcome};

use super::credentials_or_restart;
use crate::ports::HubApi;

const LIST_FAILED: &str = "Unable to list the available plugins.";

pub struct PluginService<H> {
    hub: Arc<H>,
}

impl<H: HubApi> PluginService<H> {
    pub fn new(hub: Arc<H>) -> Self {
        Self { hub }
    }

    /// Plugins available from the hub's remote repository.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::Unauthorized`] when the session is not signed in
    /// or the hub refuses the credentials, or the transport error.
    #[tracing::instrument(skip(self, session), fields(session_id = %session.id))]
    pub async fn list(&self, session: &WizardSession) -> Result<Vec<Plugin>, SetupError> {
        let credentials = session
            .credentials
            .as_ref()
            .ok_or(SetupError::Unauthorized)?;
        self.hub.list_plugins(credentials).await
    }

    /// Handle "next" on the plugins step.
    ///
    /// Selected plugins are installed one after another, in listing order.
    /// Nothing selected advances without calling the hub.
    #[tracing::instrument(
        skip(self, session, selection),
        fields(session_id = %session.id, selected = selection.len())
    )]
    pub async fn install(
        &self,
        session: &mut WizardSession,
        selection: &PluginSelection,
    ) -> StepOutcome {
        if selection.is_empty() {
            return wizard::advance(session, Step::Plugins);
        }
        let credentials = match credentials_or_restart(session) {
            Ok(credentials) => credentials,
            Err(outcome) => return outcome,
        };
        let available = match self.hub.list_plugins(&credentials).await {
            Ok(available) => available,
            Err(err) => return wizard::settle(session, Step::Plugins, Err(err), LIST_FAILED),
        };

        let mut failed = Vec::new();
        for plugin in selection.pick(&available) {
            if !plugin.is_installable() {
                tracing::warn!(plugin = %plugin.id, "plugin has no install link");
                failed.push(plugin.name.as_str());
                continue;
            }
            match self.hub.install_plugin(&credentials, plugin).await {
                Ok(ack) => tracing::info!(plugin = %plugin.id, ?ack, "plugin installed"),
                Err(SetupError::Unauthorized) => {
                    session.restart();
                    return StepOutcome::Restart;
                }
                Err(err) => {
                    tracing::warn!(plugin = %plugin.id, %err, "plugin install failed");
                    failed.push(plugin.name.as_str());
                }
            }
        }

        if failed.is_empty() {
            wizard::advance(session, Step::Plugins)
        } else {
            session.notify(Notice::error(format!(
                "Unable to install: {}.",
                failed.join(", ")
            )));
            StepOutcome::Stay
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::{Reply, StubHub, plugin, session};

    fn fixture(hub: StubHub) -> (PluginService<StubHub>, Arc<StubHub>) {
        let hub = Arc::new(hub.with_plugins(vec![plugin("a"), plugin("b"), plugin("broken")]));
        (PluginService::new(Arc::clone(&hub)), hub)
    }

    #[tokio::test]
    async fn should_list_remote_plugins() {
        let (svc, _) = fixture(StubHub::default());
        let plugins = svc.list(&session()).await.unwrap();
        assert_eq!(plugins.len(), 3);
    }

    #[tokio::test]
    async fn should_advance_without_calls_when_nothing_selected() {
        let (svc, hub) = fixture(StubHub::default());
        let mut s = session();

        let outcome = svc.install(&mut s, &PluginSelection::new()).await;

        assert_eq!(outcome, StepOutcome::Navigate(Step::Email));
        assert!(hub.calls().is_empty());
    }

    #[tokio::test]
    async fn should_install_selected_plugins_in_order() {
        let (svc, hub) = fixture(StubHub::default());
        let mut s = session();
        let selection: PluginSelection = ["b", "a"].into_iter().collect();

        let outcome = svc.install(&mut s, &selection).await;

        assert_eq!(outcome, StepOutcome::Navigate(Step::Email));
        assert_eq!(
            hub.calls(),
            vec!["list_plugins", "install_plugin:a", "install_plugin:b"]
        );
    }

    #[tokio::test]
    async fn should_stay_and_name_failed_plugins() {
        let (svc, hub) =
            fixture(StubHub::default().with_reply("install_broken", Reply::Unavailable));
        let mut s = session();
        let selection: PluginSelection = ["broken", "a"].into_iter().collect();

        let outcome = svc.install(&mut s, &selection).await;

        assert_eq!(outcome, StepOutcome::Stay);
        assert_eq!(hub.calls().len(), 3);
        assert_eq!(s.take_notices()[0].text, "Unable to install: Plugin broken.");
        assert_eq!(s.furthest, Step::Start);
    }

    #[tokio::test]
    async fn should_restart_when_install_is_unauthorized() {
        let (svc, _) =
            fixture(StubHub::default().with_reply("install_plugin", Reply::Unauthorized));
        let mut s = session();
        let selection: PluginSelection = ["a"].into_iter().collect();

        let outcome = svc.install(&mut s, &selection).await;

        assert_eq!(outcome, StepOutcome::Restart);
        assert!(!s.is_signed_in());
    }
}
