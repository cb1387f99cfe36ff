//! Reqwest-backed hub API client.
//!
//! This adapter owns transport details only: URL building, authentication
//! headers, timeout and status mapping, and JSON decoding into domain types.

use reqwest::header::ACCEPT;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

use hubsetup_app::ports::HubApi;
use hubsetup_domain::email::EmailConfiguration;
use hubsetup_domain::error::SetupError;
use hubsetup_domain::hub::{Ack, Credentials, HubConfiguration, HubImage};
use hubsetup_domain::password::PasswordChange;
use hubsetup_domain::plugin::Plugin;

use crate::config::{AuthMode, HubClientConfig, with_trailing_slash};
use crate::dto::{
    ClassRefDto, ConfigurationDto, ConfigurationUpdateDto, ErrorBodyDto, OpenIdConfigurationDto,
    PluginListDto, TokenDto, ValuesDto,
};
use crate::error::HubClientError;

const JSON: &str = "application/json";

/// [`HubApi`] implementation talking to one hub over HTTP.
pub struct HubHttpClient {
    client: Client,
    base_url: Url,
    hub_id: String,
    auth: AuthMode,
    client_id: String,
}

impl HubHttpClient {
    /// Build a client with the configured request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`HubClientError::Build`] when the reqwest client cannot be
    /// constructed.
    pub fn new(config: HubClientConfig) -> Result<Self, HubClientError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(HubClientError::Build)?;
        Ok(Self {
            client,
            base_url: with_trailing_slash(config.base_url),
            hub_id: config.hub_id,
            auth: config.auth,
            client_id: config.client_id,
        })
    }

    fn hub_url(&self, path: &str) -> Result<Url, HubClientError> {
        Ok(self
            .base_url
            .join(&format!("api/v1/hubs/{}/{path}", self.hub_id))?)
    }

    fn authorized(builder: RequestBuilder, credentials: &Credentials) -> RequestBuilder {
        let builder = builder.header(ACCEPT, JSON);
        match credentials {
            Credentials::Bearer { token } => builder.bearer_auth(token),
            Credentials::Basic { username, password } => {
                builder.basic_auth(username, Some(password))
            }
        }
    }

    async fn fetch_token(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Credentials, HubClientError> {
        let discovery = self.base_url.join(".well-known/openid-configuration")?;
        let (status, body) = send(self.client.get(discovery).header(ACCEPT, JSON)).await?;
        acknowledge(status, &body)?;
        let openid: OpenIdConfigurationDto = decode(&body)?;

        let token_url = self.base_url.join(&openid.token_endpoint)?;
        let form = [
            ("username", username),
            ("password", password),
            ("grant_type", "password"),
            ("client_id", self.client_id.as_str()),
            ("scope", "openid"),
        ];
        let (status, body) = send(
            self.client
                .post(token_url)
                .header(ACCEPT, JSON)
                .form(&form),
        )
        .await?;
        // A refused password grant is a 400 `invalid_grant` per OAuth.
        if matches!(status, StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED) {
            return Err(HubClientError::Unauthorized);
        }
        acknowledge(status, &body)?;
        let token: TokenDto = decode(&body)?;
        Ok(Credentials::Bearer {
            token: token.access_token,
        })
    }

    async fn read<T: DeserializeOwned>(
        &self,
        url: Url,
        credentials: &Credentials,
    ) -> Result<T, HubClientError> {
        let (status, body) = send(Self::authorized(self.client.get(url), credentials)).await?;
        acknowledge(status, &body)?;
        decode(&body)
    }

    async fn write(&self, request: RequestBuilder) -> Result<Ack, HubClientError> {
        let (status, body) = send(request).await?;
        acknowledge(status, &body)
    }

    async fn put_configuration(
        &self,
        credentials: &Credentials,
        values: &HubConfiguration,
    ) -> Result<Ack, HubClientError> {
        let url = self.hub_url("configuration")?;
        let update = ConfigurationUpdateDto {
            cclass: ClassRefDto {
                id: format!("/api/v1/hubs/{}/configurationClass", self.hub_id),
            },
            values,
        };
        let request = Self::authorized(self.client.put(url), credentials).json(&update);
        self.write(request).await
    }

    async fn put_image(
        &self,
        credentials: &Credentials,
        image: HubImage,
    ) -> Result<Ack, HubClientError> {
        let url = self.hub_url("image")?;
        let part = Part::bytes(image.bytes)
            .file_name(image.file_name)
            .mime_str(&image.content_type)
            .map_err(HubClientError::Transport)?;
        let form = Form::new().part("file", part);
        let request = Self::authorized(self.client.put(url), credentials).multipart(form);
        self.write(request).await
    }

    async fn post_install(
        &self,
        credentials: &Credentials,
        plugin: &Plugin,
    ) -> Result<Ack, HubClientError> {
        let link = plugin
            .install_link
            .as_deref()
            .ok_or_else(|| HubClientError::Status {
                status: StatusCode::NOT_FOUND.as_u16(),
                preview: format!("plugin {} has no install link", plugin.id),
            })?;
        let url = self.base_url.join(link)?;
        self.write(Self::authorized(self.client.post(url), credentials))
            .await
    }

    async fn post_test_email(
        &self,
        credentials: &Credentials,
        email: EmailConfiguration,
    ) -> Result<Ack, HubClientError> {
        let url = self.hub_url("configuration/sendTestEmail")?;
        let values = email.into_configuration();
        let body = ValuesDto { values: &values };
        let request = Self::authorized(self.client.post(url), credentials).json(&body);
        self.write(request).await
    }

    async fn post_password(
        &self,
        credentials: &Credentials,
        change: &PasswordChange,
    ) -> Result<Ack, HubClientError> {
        let url = self.hub_url("password")?;
        self.write(Self::authorized(self.client.post(url), credentials).json(change))
            .await
    }
}

impl HubApi for HubHttpClient {
    #[tracing::instrument(skip(self, password))]
    async fn sign_in(&self, username: &str, password: &str) -> Result<Credentials, SetupError> {
        match self.auth {
            AuthMode::Basic => Ok(Credentials::Basic {
                username: username.to_string(),
                password: password.to_string(),
            }),
            AuthMode::Bearer => Ok(self.fetch_token(username, password).await?),
        }
    }

    #[tracing::instrument(skip_all)]
    async fn get_configuration(
        &self,
        credentials: &Credentials,
    ) -> Result<HubConfiguration, SetupError> {
        let url = self.hub_url("configuration")?;
        let config: ConfigurationDto = self.read(url, credentials).await?;
        Ok(config.values)
    }

    #[tracing::instrument(skip_all)]
    async fn update_configuration(
        &self,
        credentials: &Credentials,
        update: HubConfiguration,
    ) -> Result<Ack, SetupError> {
        Ok(self.put_configuration(credentials, &update).await?)
    }

    #[tracing::instrument(skip_all, fields(file_name = %image.file_name))]
    async fn upload_image(
        &self,
        credentials: &Credentials,
        image: HubImage,
    ) -> Result<Ack, SetupError> {
        Ok(self.put_image(credentials, image).await?)
    }

    #[tracing::instrument(skip_all)]
    async fn list_plugins(&self, credentials: &Credentials) -> Result<Vec<Plugin>, SetupError> {
        let mut url = self.hub_url("plugins/remote")?;
        url.query_pairs_mut().append_pair("expand", "item");
        let list: PluginListDto = self.read(url, credentials).await?;
        Ok(list.into_domain())
    }

    #[tracing::instrument(skip_all, fields(plugin = %plugin.id))]
    async fn install_plugin(
        &self,
        credentials: &Credentials,
        plugin: &Plugin,
    ) -> Result<Ack, SetupError> {
        Ok(self.post_install(credentials, plugin).await?)
    }

    #[tracing::instrument(skip_all, fields(server = %email.server))]
    async fn send_test_email(
        &self,
        credentials: &Credentials,
        email: EmailConfiguration,
    ) -> Result<Ack, SetupError> {
        Ok(self.post_test_email(credentials, email).await?)
    }

    #[tracing::instrument(skip_all)]
    async fn change_password(
        &self,
        credentials: &Credentials,
        change: PasswordChange,
    ) -> Result<Ack, SetupError> {
        Ok(self.post_password(credentials, &change).await?)
    }
}

/// Send a request and read the whole body.
pub(crate) async fn send(request: RequestBuilder) -> Result<(StatusCode, Vec<u8>), HubClientError> {
    let response = request.send().await.map_err(map_transport_error)?;
    let status = response.status();
    if !status.is_success() {
        tracing::warn!(
            status = status.as_u16(),
            url = %response.url(),
            "upstream answered with an error status"
        );
    }
    let body = response.bytes().await.map_err(map_transport_error)?;
    Ok((status, body.to_vec()))
}

pub(crate) fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, HubClientError> {
    serde_json::from_slice(body).map_err(HubClientError::Decode)
}

/// `202` is an accepted-but-pending write; any other `2xx` is complete.
pub(crate) fn acknowledge(status: StatusCode, body: &[u8]) -> Result<Ack, HubClientError> {
    if status == StatusCode::ACCEPTED {
        Ok(Ack::Accepted)
    } else if status.is_success() {
        Ok(Ack::Completed)
    } else {
        Err(map_status_error(status, body))
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> HubClientError {
    if status == StatusCode::UNAUTHORIZED {
        return HubClientError::Unauthorized;
    }
    if status.is_client_error()
        && let Some(message) = ErrorBodyDto::first_message(body)
    {
        return HubClientError::Rejected { message };
    }
    HubClientError::Status {
        status: status.as_u16(),
        preview: body_preview(body),
    }
}

fn map_transport_error(error: reqwest::Error) -> HubClientError {
    if error.is_timeout() {
        HubClientError::Timeout(error)
    } else {
        HubClientError::Transport(error)
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
