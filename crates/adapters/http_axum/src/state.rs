//! Shared application state for axum handlers.

use std::path::PathBuf;
use std::sync::Arc;

use hubsetup_app::navigator::Navigator;
use hubsetup_app::ports::{Geocoder, HubApi, SessionStore};
use hubsetup_app::services::email_service::EmailService;
use hubsetup_app::services::password_service::PasswordService;
use hubsetup_app::services::plugin_service::PluginService;
use hubsetup_app::services::registration_service::RegistrationService;
use hubsetup_app::services::sign_in_service::SignInService;

/// Wizard-wide settings that are not owned by a service.
#[derive(Debug, Clone)]
pub struct WizardSettings {
    /// Hub user the wizard signs in as.
    pub hub_username: String,
    /// Hub password before the password step changes it.
    pub initial_password: String,
    /// Where "next" on the complete step sends the browser.
    pub console_url: String,
    /// Directory served under `/setup/assets`; the built-in stylesheet is
    /// served when unset.
    pub assets_dir: Option<PathBuf>,
}

impl Default for WizardSettings {
    fn default() -> Self {
        Self {
            hub_username: "local".to_string(),
            initial_password: "local".to_string(),
            console_url: "/console/index.html".to_string(),
            assets_dir: None,
        }
    }
}

/// Application state shared across all axum handlers.
///
/// Generic over the hub client, geocoder, and session store to avoid dynamic
/// dispatch. `Clone` is implemented manually so the underlying types
/// themselves do not need to be `Clone` — only the `Arc` wrappers are cloned.
pub struct AppState<H, G, S> {
    pub navigator: Arc<Navigator>,
    pub sessions: Arc<S>,
    pub sign_in: Arc<SignInService<H>>,
    pub registration: Arc<RegistrationService<H, G>>,
    pub plugins: Arc<PluginService<H>>,
    pub email: Arc<EmailService<H>>,
    pub password: Arc<PasswordService<H>>,
    pub settings: Arc<WizardSettings>,
}

impl<H, G, S> Clone for AppState<H, G, S> {
    fn clone(&self) -> Self {
        Self {
            navigator: Arc::clone(&self.navigator),
            sessions: Arc::clone(&self.sessions),
            sign_in: Arc::clone(&self.sign_in),
            registration: Arc::clone(&self.registration),
            plugins: Arc::clone(&self.plugins),
            email: Arc::clone(&self.email),
            password: Arc::clone(&self.password),
            settings: Arc::clone(&self.settings),
        }
    }
}

impl<H, G, S> AppState<H, G, S>
where
    H: HubApi + Send + Sync + 'static,
    G: Geocoder + Send + Sync + 'static,
    S: SessionStore + Send + Sync + 'static,
{
    /// Wire every step service around one shared hub client.
    pub fn new(hub: H, geocoder: G, sessions: Arc<S>, settings: WizardSettings) -> Self {
        let hub = Arc::new(hub);
        Self {
            navigator: Arc::new(Navigator::new(settings.console_url.as_str())),
            sessions,
            sign_in: Arc::new(SignInService::new(
                Arc::clone(&hub),
                settings.hub_username.as_str(),
            )),
            registration: Arc::new(RegistrationService::new(
                Arc::clone(&hub),
                Arc::new(geocoder),
            )),
            plugins: Arc::new(PluginService::new(Arc::clone(&hub))),
            email: Arc::new(EmailService::new(Arc::clone(&hub))),
            password: Arc::new(PasswordService::new(hub)),
            settings: Arc::new(settings),
        }
    }
}
