//! Password step: replace the hub's factory password.

use askama::Template;
use axum::response::{Html, IntoResponse, Response};

use hubsetup_app::navigator::Navigator;
use hubsetup_app::ports::{Geocoder, HubApi, SessionStore};
use hubsetup_domain::session::WizardSession;
use hubsetup_domain::step::Step;
use hubsetup_domain::wizard::FieldErrors;

use super::{Chrome, Reply, follow};
use crate::form::FormFields;
use crate::state::AppState;

#[derive(Template)]
#[template(path = "password.html")]
pub(crate) struct PasswordPage {
    chrome: Chrome,
    errors: FieldErrors,
}

impl PasswordPage {
    fn new(navigator: &Navigator, session: &mut WizardSession, errors: FieldErrors) -> Self {
        Self {
            chrome: Chrome::new(navigator, session, Step::Password),
            errors,
        }
    }
}

impl IntoResponse for PasswordPage {
    fn into_response(self) -> Response {
        Html(self.to_string()).into_response()
    }
}

pub(super) fn show<H, G, S>(state: &AppState<H, G, S>, session: &mut WizardSession) -> Response {
    PasswordPage::new(&state.navigator, session, FieldErrors::new()).into_response()
}

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
    let outcome = state
        .password
        .submit(session, fields.get("password"), fields.get("repeat"))
        .await;
    follow(session, outcome).unwrap_or_else(|errors| {
        Reply::Keep(PasswordPage::new(&state.navigator, session, errors).into_response())
    })
}
