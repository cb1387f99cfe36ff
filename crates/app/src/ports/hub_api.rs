//! Hub API port — the external hub REST API the wizard drives.

use std::future::Future;

use hubsetup_domain::email::EmailConfiguration;
use hubsetup_domain::error::SetupError;
use hubsetup_domain::hub::{Ack, Credentials, HubConfiguration, HubImage};
use hubsetup_domain::password::PasswordChange;
use hubsetup_domain::plugin::Plugin;

/// Client for the hub being configured.
///
/// Implementations map a `401` to [`SetupError::Unauthorized`], a `202` to
/// [`Ack::Accepted`], and a `4xx` carrying an error message to
/// [`SetupError::Rejected`].
pub trait HubApi {
    /// Obtain credentials for the given hub user.
    fn sign_in(
        &self,
        username: &str,
        password: &str,
    ) -> impl Future<Output = Result<Credentials, SetupError>> + Send;

    /// Read the current hub configuration.
    fn get_configuration(
        &self,
        credentials: &Credentials,
    ) -> impl Future<Output = Result<HubConfiguration, SetupError>> + Send;

    /// Apply a partial configuration update.
    fn update_configuration(
        &self,
        credentials: &Credentials,
        update: HubConfiguration,
    ) -> impl Future<Output = Result<Ack, SetupError>> + Send;

    /// Replace the hub photo.
    fn upload_image(
        &self,
        credentials: &Credentials,
        image: HubImage,
    ) -> impl Future<Output = Result<Ack, SetupError>> + Send;

    /// List plugins available for installation.
    fn list_plugins(
        &self,
        credentials: &Credentials,
    ) -> impl Future<Output = Result<Vec<Plugin>, SetupError>> + Send;

    /// Request installation of a plugin.
    fn install_plugin(
        &self,
        credentials: &Credentials,
        plugin: &Plugin,
    ) -> impl Future<Output = Result<Ack, SetupError>> + Send;

    /// Ask the hub to send a test message with the given settings.
    fn send_test_email(
        &self,
        credentials: &Credentials,
        config: EmailConfiguration,
    ) -> impl Future<Output = Result<Ack, SetupError>> + Send;

    /// Replace the hub user's password.
    fn change_password(
        &self,
        credentials: &Credentials,
        change: PasswordChange,
    ) -> impl Future<Output = Result<Ack, SetupError>> + Send;
}
