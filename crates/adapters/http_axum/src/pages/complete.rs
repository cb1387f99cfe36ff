//! Complete step: show the new hub password, then hand over to the console.

use askama::Template;
use axum::response::{Html, IntoResponse, Response};

use hubsetup_domain::session::WizardSession;
use hubsetup_domain::step::Step;

use super::{Chrome, Reply, follow, to_step};
use crate::state::AppState;

#[derive(Template)]
#[template(path = "complete.html")]
pub(crate) struct CompletePage {
    chrome: Chrome,
    username: String,
    password: String,
}

impl IntoResponse for CompletePage {
    fn into_response(self) -> Response {
        Html(self.to_string()).into_response()
    }
}

pub(super) fn show<H, G, S>(state: &AppState<H, G, S>, session: &mut WizardSession) -> Response {
    CompletePage {
        username: state.settings.hub_username.clone(),
        password: session.hub_password.clone(),
        chrome: Chrome::new(&state.navigator, session, Step::Complete),
    }
    .into_response()
}

pub(super) fn submit<H, G, S>(state: &AppState<H, G, S>, session: &mut WizardSession) -> Reply {
    follow(session, state.navigator.finish())
        .unwrap_or_else(|_| Reply::Keep(to_step(Step::Complete)))
}
