//! Email step: outbound SMTP settings and the test message.

use askama::Template;
use axum::response::{Html, IntoResponse, Response};

use hubsetup_app::navigator::Navigator;
use hubsetup_app::ports::{Geocoder, HubApi, SessionStore};
use hubsetup_domain::email::{EmailConfiguration, ServerType};
use hubsetup_domain::session::WizardSession;
use hubsetup_domain::step::Step;
use hubsetup_domain::wizard::FieldErrors;

use super::{Chrome, Reply, follow, load_failed};
use crate::form::{Action, FormFields};
use crate::state::AppState;

#[derive(Template)]
#[template(path = "email.html")]
pub(crate) struct EmailPage {
    chrome: Chrome,
    server_type: &'static str,
    server: String,
    secure: bool,
    username: String,
    sender: String,
    errors: FieldErrors,
}

impl EmailPage {
    /// The password is never rendered back.
    fn new(
        navigator: &Navigator,
        session: &mut WizardSession,
        server_type: ServerType,
        email: EmailConfiguration,
        errors: FieldErrors,
    ) -> Self {
        let email = email.with_server_type(server_type);
        Self {
            chrome: Chrome::new(navigator, session, Step::Email),
            server_type: server_type.as_str(),
            server: email.server,
            secure: email.secure,
            username: email.username.unwrap_or_default(),
            sender: email.sender,
            errors,
        }
    }
}

impl IntoResponse for EmailPage {
    fn into_response(self) -> Response {
        Html(self.to_string()).into_response()
    }
}

fn read(fields: &FormFields) -> (ServerType, EmailConfiguration) {
    let email = EmailConfiguration {
        server: fields.get("emailServer").trim().to_string(),
        secure: fields.checked("emailSecure"),
        username: fields.optional("emailUsername"),
        password: fields.optional("serverPassword"),
        sender: fields.get("emailSender").trim().to_string(),
    };
    let server_type = match fields.optional("serverType") {
        Some(value) => value.parse().unwrap_or_else(|err| {
            tracing::debug!(%err, "falling back to the server type of the hostname");
            email.server_type()
        }),
        None => email.server_type(),
    };
    (server_type, email)
}

pub(super) async fn show<H, G, S>(
    state: &AppState<H, G, S>,
    session: &mut WizardSession,
) -> Response
where
    H: HubApi + Send + Sync + 'static,
    G: Geocoder + Send + Sync + 'static,
    S: SessionStore + Send + Sync + 'static,
{
    match state.email.load(session).await {
        Ok((server_type, email)) => EmailPage::new(
            &state.navigator,
            session,
            server_type,
            email,
            FieldErrors::new(),
        )
        .into_response(),
        Err(err) => load_failed(session, err),
    }
}

/// "Next" saves the settings, "test" only sends a test message.
pub(super) async fn submit<H, G, S>(
    state: &AppState<H, G, S>,
    session: &mut WizardSession,
    fields: &FormFields,
) -> Reply
where
    H: HubApi + Send + Sync + 'static,
    G: Geocoder + Send + Sync + 'static,
    S: SessionStore + Send + Sync + 'static,
{
    let (server_type, email) = read(fields);
    let outcome = if fields.action() == Action::Test {
        state.email.send_test(session, server_type, email.clone()).await
    } else {
        state.email.submit(session, server_type, email.clone()).await
    };
    follow(session, outcome).unwrap_or_else(|errors| {
        Reply::Keep(
            EmailPage::new(&state.navigator, session, server_type, email, errors).into_response(),
        )
    })
}
