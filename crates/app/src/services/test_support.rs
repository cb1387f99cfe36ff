//! In-memory port stubs shared by the service tests.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::Utc;
use hubsetup_domain::email::EmailConfiguration;
use hubsetup_domain::error::SetupError;
use hubsetup_domain::hub::{Ack, Credentials, HubConfiguration, HubImage};
use hubsetup_domain::id::SessionId;
use hubsetup_domain::password::PasswordChange;
use hubsetup_domain::plugin::Plugin;
use hubsetup_domain::registration::Location;
use hubsetup_domain::session::WizardSession;

use crate::ports::{Geocoder, HubApi};

/// Canned answer for one hub operation.
#[derive(Debug, Clone, Copy)]
pub enum Reply {
    Completed,
    Accepted,
    Unauthorized,
    Rejected(&'static str),
    Unavailable,
}

impl Reply {
    fn into_result(self) -> Result<Ack, SetupError> {
        match self {
            Self::Completed => Ok(Ack::Completed),
            Self::Accepted => Ok(Ack::Accepted),
            Self::Unauthorized => Err(SetupError::Unauthorized),
            Self::Rejected(message) => Err(SetupError::Rejected {
                message: message.to_string(),
            }),
            Self::Unavailable => Err(SetupError::Unavailable("connection refused".into())),
        }
    }
}

#[derive(Default)]
pub struct StubHub {
    pub configuration: HubConfiguration,
    pub plugins: Vec<Plugin>,
    replies: HashMap<&'static str, Reply>,
    calls: Mutex<Vec<String>>,
    pub updates: Mutex<Vec<HubConfiguration>>,
}

impl StubHub {
    pub fn with_reply(mut self, operation: &'static str, reply: Reply) -> Self {
        self.replies.insert(operation, reply);
        self
    }

    pub fn with_configuration(mut self, configuration: HubConfiguration) -> Self {
        self.configuration = configuration;
        self
    }

    pub fn with_plugins(mut self, plugins: Vec<Plugin>) -> Self {
        self.plugins = plugins;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn updates(&self) -> Vec<HubConfiguration> {
        self.updates.lock().unwrap().clone()
    }

    fn answer(&self, call: String, operation: &'static str) -> Result<Ack, SetupError> {
        self.calls.lock().unwrap().push(call);
        self.replies
            .get(operation)
            .copied()
            .unwrap_or(Reply::Completed)
            .into_result()
    }
}

impl HubApi for StubHub {
    async fn sign_in(&self, username: &str, password: &str) -> Result<Credentials, SetupError> {
        self.answer(format!("sign_in:{username}:{password}"), "sign_in")?;
        Ok(Credentials::Bearer {
            token: "token".to_string(),
        })
    }

    async fn get_configuration(
        &self,
        _credentials: &Credentials,
    ) -> Result<HubConfiguration, SetupError> {
        self.answer("get_configuration".to_string(), "get_configuration")?;
        Ok(self.configuration.clone())
    }

    async fn update_configuration(
        &self,
        _credentials: &Credentials,
        update: HubConfiguration,
    ) -> Result<Ack, SetupError> {
        self.updates.lock().unwrap().push(update);
        self.answer("update_configuration".to_string(), "update_configuration")
    }

    async fn upload_image(
        &self,
        _credentials: &Credentials,
        image: HubImage,
    ) -> Result<Ack, SetupError> {
        self.answer(format!("upload_image:{}", image.file_name), "upload_image")
    }

    async fn list_plugins(&self, _credentials: &Credentials) -> Result<Vec<Plugin>, SetupError> {
        self.answer("list_plugins".to_string(), "list_plugins")?;
        Ok(self.plugins.clone())
    }

    async fn install_plugin(
        &self,
        _credentials: &Credentials,
        plugin: &Plugin,
    ) -> Result<Ack, SetupError> {
        let operation = if plugin.id == "broken" {
            "install_broken"
        } else {
            "install_plugin"
        };
        self.answer(format!("install_plugin:{}", plugin.id), operation)
    }

    async fn send_test_email(
        &self,
        _credentials: &Credentials,
        email: EmailConfiguration,
    ) -> Result<Ack, SetupError> {
        self.answer(format!("send_test_email:{}", email.server), "send_test_email")
    }

    async fn change_password(
        &self,
        _credentials: &Credentials,
        change: PasswordChange,
    ) -> Result<Ack, SetupError> {
        self.answer(
            format!("change_password:{}", change.current_password),
            "change_password",
        )
    }
}

#[derive(Default)]
pub struct StubGeocoder {
    pub places: Vec<Option<Location>>,
    pub fail: bool,
    lookups: Mutex<Vec<String>>,
}

impl StubGeocoder {
    pub fn matching(matches: Vec<Location>) -> Self {
        Self::with_places(matches.into_iter().map(Some).collect())
    }

    /// Places as the geocoder reports them, including unusable ones.
    pub fn with_places(places: Vec<Option<Location>>) -> Self {
        Self {
            places,
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn lookups(&self) -> Vec<String> {
        self.lookups.lock().unwrap().clone()
    }
}

impl Geocoder for StubGeocoder {
    async fn lookup(&self, address: &str) -> Result<Vec<Option<Location>>, SetupError> {
        self.lookups.lock().unwrap().push(address.to_string());
        if self.fail {
            return Err(SetupError::Unavailable("geocoder down".into()));
        }
        Ok(self.places.clone())
    }
}

pub fn plugin(id: &str) -> Plugin {
    Plugin {
        id: id.to_string(),
        name: format!("Plugin {id}"),
        description: None,
        version: Some("1.0.0".to_string()),
        install_link: Some(format!("/api/v1/plugins/{id}/install")),
    }
}

/// A signed-in session.
pub fn session() -> WizardSession {
    let mut session = WizardSession::new(SessionId::new(), "local", Utc::now());
    session.credentials = Some(Credentials::Bearer {
        token: "token".to_string(),
    });
    session
}
