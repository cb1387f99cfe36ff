//! Server-side rendered wizard steps (no JavaScript).
//!
//! - `GET  /setup`               — continue on the session's active step
//! - `GET  /setup/{step}`        — render a step once the navigator accepts it
//! - `POST /setup/{step}`        — footer action (`next`, `back`, `test`)
//! - `POST /setup/start/image`   — hub photo upload
//!
//! Every action answers with a redirect (PRG) unless the step stays put, in
//! which case the step is rendered again with the posted input, its inline
//! field errors and any queued notices.

mod complete;
mod email;
mod password;
mod plugins;
mod start;

use axum::extract::{Form, Path, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::CookieJar;

use hubsetup_app::navigator::{Entry, Navigator};
use hubsetup_app::ports::{Geocoder, HubApi, SessionStore};
use hubsetup_domain::error::SetupError;
use hubsetup_domain::session::{Notice, WizardSession};
use hubsetup_domain::step::Step;
use hubsetup_domain::wizard::{self, FieldErrors, StepIndicator, StepOutcome};

use crate::error::PageError;
use crate::form::{Action, FormFields};
use crate::state::AppState;

pub use start::upload_image;

const SIGNED_OUT: &str = "Your hub session has expired. Please start again.";

/// Layout shared by every step page: step indicator, notices and footer.
pub(crate) struct Chrome {
    pub(crate) title: &'static str,
    pub(crate) slug: &'static str,
    pub(crate) indicators: Vec<StepIndicator>,
    pub(crate) notices: Vec<Notice>,
    pub(crate) shows_back: bool,
    pub(crate) next_label: &'static str,
}

impl Chrome {
    /// Drains the session's notices, so build it right before rendering.
    pub(crate) fn new(navigator: &Navigator, session: &mut WizardSession, step: Step) -> Self {
        Self {
            title: step.title(),
            slug: step.slug(),
            indicators: navigator.indicators(session),
            notices: session.take_notices(),
            shows_back: step.shows_back(),
            next_label: if step.is_terminal() {
                "Go to the console"
            } else {
                "Next"
            },
        }
    }
}

/// What to do with the visit once a step handled its action.
pub(crate) enum Reply {
    /// Send the response and keep the session.
    Keep(Response),
    /// Leave the wizard for the URL and forget the session.
    Finish(String),
}

pub(crate) fn step_path(step: Step) -> String {
    format!("/setup/{}", step.slug())
}

pub(crate) fn to_step(step: Step) -> Response {
    Redirect::to(&step_path(step)).into_response()
}

/// Turn a step outcome into a reply.
///
/// `Err` carries the field errors to render the step again with; it is empty
/// when the step merely stays.
pub(crate) fn follow(
    session: &mut WizardSession,
    outcome: StepOutcome,
) -> Result<Reply, FieldErrors> {
    match outcome {
        StepOutcome::Navigate(step) => Ok(Reply::Keep(to_step(step))),
        StepOutcome::Invalid(errors) => Err(errors),
        StepOutcome::Stay => Err(FieldErrors::new()),
        StepOutcome::Restart => {
            session.notify(Notice::info(SIGNED_OUT));
            Ok(Reply::Keep(to_step(Step::Start)))
        }
        StepOutcome::Leave(url) => Ok(Reply::Finish(url)),
    }
}

/// A step's resource could not be loaded. A `401` restarts the wizard.
pub(crate) fn load_failed(session: &mut WizardSession, err: SetupError) -> Response {
    if err.requires_restart() {
        session.restart();
        session.notify(Notice::info(SIGNED_OUT));
        to_step(Step::Start)
    } else {
        PageError::Upstream(err).into_response()
    }
}

/// `GET /setup` — continue on the active step.
pub async fn resume<H, G, S>(
    State(state): State<AppState<H, G, S>>,
    jar: CookieJar,
) -> Response
where
    H: HubApi + Send + Sync + 'static,
    G: Geocoder + Send + Sync + 'static,
    S: SessionStore + Send + Sync + 'static,
{
    match state.open(jar).await {
        Ok(visit) => {
            let step = visit.session.active;
            state.close(visit, to_step(step)).await
        }
        Err(err) => err.into_response(),
    }
}

/// `GET /setup/{step}` — render a step.
pub async fn show<H, G, S>(
    State(state): State<AppState<H, G, S>>,
    Path(slug): Path<String>,
    jar: CookieJar,
) -> Response
where
    H: HubApi + Send + Sync + 'static,
    G: Geocoder + Send + Sync + 'static,
    S: SessionStore + Send + Sync + 'static,
{
    let Some(step) = state.navigator.resolve(&slug) else {
        return PageError::NotFound.into_response();
    };
    let mut visit = match state.open(jar).await {
        Ok(visit) => visit,
        Err(err) => return err.into_response(),
    };
    let response = match state.navigator.enter(&mut visit.session, step) {
        Entry::Redirect(target) => to_step(target),
        Entry::Show(step) => render(&state, &mut visit.session, step)
            .await
            .unwrap_or_else(IntoResponse::into_response),
    };
    state.close(visit, response).await
}

async fn render<H, G, S>(
    state: &AppState<H, G, S>,
    session: &mut WizardSession,
    step: Step,
) -> Result<Response, PageError>
where
    H: HubApi + Send + Sync + 'static,
    G: Geocoder + Send + Sync + 'static,
    S: SessionStore + Send + Sync + 'static,
{
    match step {
        Step::Start => start::show(state, session).await,
        Step::Plugins => Ok(plugins::show(state, session).await),
        Step::Email => Ok(email::show(state, session).await),
        Step::Password => Ok(password::show(state, session)),
        Step::Complete => Ok(complete::show(state, session)),
    }
}

/// `POST /setup/{step}` — run the footer action of a step.
pub async fn submit<H, G, S>(
    State(state): State<AppState<H, G, S>>,
    Path(slug): Path<String>,
    jar: CookieJar,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Response
where
    H: HubApi + Send + Sync + 'static,
    G: Geocoder + Send + Sync + 'static,
    S: SessionStore + Send + Sync + 'static,
{
    let Some(step) = state.navigator.resolve(&slug) else {
        return PageError::NotFound.into_response();
    };
    let mut visit = match state.open(jar).await {
        Ok(visit) => visit,
        Err(err) => return err.into_response(),
    };
    let fields = FormFields::from(pairs);
    let reply = match state.navigator.enter(&mut visit.session, step) {
        Entry::Redirect(target) => Reply::Keep(to_step(target)),
        Entry::Show(step) if fields.action() == Action::Back => {
            follow(&mut visit.session, wizard::retreat(step))
                .unwrap_or_else(|_| Reply::Keep(to_step(step)))
        }
        Entry::Show(step) => dispatch(&state, &mut visit.session, step, &fields).await,
    };
    match reply {
        Reply::Keep(response) => state.close(visit, response).await,
        Reply::Finish(url) => state.discard(visit, Redirect::to(&url)).await,
    }
}

async fn dispatch<H, G, S>(
    state: &AppState<H, G, S>,
    session: &mut WizardSession,
    step: Step,
    fields: &FormFields,
) -> Reply
where
    H: HubApi + Send + Sync + 'static,
    G: Geocoder + Send + Sync + 'static,
    S: SessionStore + Send + Sync + 'static,
{
    match step {
        Step::Start => start::submit(state, session, fields).await,
        Step::Plugins => plugins::submit(state, session, fields).await,
        Step::Email => email::submit(state, session, fields).await,
        Step::Password => password::submit(state, session, fields).await,
        Step::Complete => complete::submit(state, session),
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum::http::header::LOCATION;
    use chrono::Utc;
    use hubsetup_domain::id::SessionId;

    use super::*;

    fn location(response: &Response) -> &str {
        response
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
    }

    fn session() -> WizardSession {
        WizardSession::new(SessionId::new(), "local", Utc::now())
    }

    #[test]
    fn should_redirect_when_navigating() {
        let mut session = session();
        let Ok(Reply::Keep(response)) = follow(&mut session, StepOutcome::Navigate(Step::Email))
        else {
            panic!("expected a redirect");
        };
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/setup/email");
    }

    #[test]
    fn should_render_again_when_staying() {
        let mut session = session();
        let Err(errors) = follow(&mut session, StepOutcome::Stay) else {
            panic!("expected the step to render again");
        };
        assert!(errors.is_empty());
    }

    #[test]
    fn should_notify_when_restarting() {
        let mut session = session();
        let Ok(Reply::Keep(response)) = follow(&mut session, StepOutcome::Restart) else {
            panic!("expected a redirect");
        };
        assert_eq!(location(&response), "/setup/start");
        assert_eq!(session.take_notices(), vec![Notice::info(SIGNED_OUT)]);
    }

    #[test]
    fn should_finish_when_leaving() {
        let mut session = session();
        let outcome = StepOutcome::Leave("/console/index.html".to_string());
        assert!(matches!(
            follow(&mut session, outcome),
            Ok(Reply::Finish(url)) if url == "/console/index.html"
        ));
    }

    #[test]
    fn should_restart_when_load_is_unauthorized() {
        let mut session = session();
        session.furthest = Step::Email;
        session.active = Step::Email;

        let response = load_failed(&mut session, SetupError::Unauthorized);

        assert_eq!(location(&response), "/setup/start");
        assert_eq!(session.active, Step::Start);
    }
}
