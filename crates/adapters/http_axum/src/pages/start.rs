//! Start step: hub name, address, coordinates and photo.

use askama::Template;
use axum::extract::multipart::{Multipart, MultipartError};
use axum::extract::State;
use axum::response::{Html, IntoResponse, Response};
use axum_extra::extract::CookieJar;

use hubsetup_app::navigator::Navigator;
use hubsetup_app::ports::{Geocoder, HubApi, SessionStore};
use hubsetup_app::services::registration_service::RegistrationInput;
use hubsetup_domain::session::{Notice, WizardSession};
use hubsetup_domain::step::Step;
use hubsetup_domain::wizard::FieldErrors;

use super::{Chrome, Reply, follow, to_step};
use crate::error::PageError;
use crate::form::FormFields;
use crate::state::AppState;

const UPLOAD_FAILED: &str = "The photo could not be read. Please try again.";

#[derive(Template)]
#[template(path = "start.html")]
pub(crate) struct StartPage {
    chrome: Chrome,
    input: RegistrationInput,
    errors: FieldErrors,
    show_coordinates: bool,
}

impl StartPage {
    fn new(
        navigator: &Navigator,
        session: &mut WizardSession,
        input: RegistrationInput,
        errors: FieldErrors,
    ) -> Self {
        let show_coordinates =
            session.show_coordinates || errors.has("latitude") || errors.has("longitude");
        Self {
            chrome: Chrome::new(navigator, session, Step::Start),
            input,
            errors,
            show_coordinates,
        }
    }
}

impl IntoResponse for StartPage {
    fn into_response(self) -> Response {
        Html(self.to_string()).into_response()
    }
}

/// Sign in on first display, then pre-fill the form from the hub.
///
/// Any sign-in failure, or a `401` while loading, means the wizard cannot
/// sign in with its password, so it cannot go on.
pub(super) async fn show<H, G, S>(
    state: &AppState<H, G, S>,
    session: &mut WizardSession,
) -> Result<Response, PageError>
where
    H: HubApi + Send + Sync + 'static,
    G: Geocoder + Send + Sync + 'static,
    S: SessionStore + Send + Sync + 'static,
{
    if state.sign_in.ensure_signed_in(session).await.is_err() {
        return Err(PageError::WizardPassword);
    }
    let input = match state.registration.load(session).await {
        Ok(input) => input,
        Err(err) => {
            if err.requires_restart() {
                session.restart();
            }
            return Err(err.into());
        }
    };
    Ok(StartPage::new(&state.navigator, session, input, FieldErrors::new()).into_response())
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
    let mut input = RegistrationInput {
        name: fields.get("name").to_string(),
        address: fields.get("address").to_string(),
        latitude: fields.get("latitude").to_string(),
        longitude: fields.get("longitude").to_string(),
    };
    let outcome = state.registration.submit(session, &mut input).await;
    follow(session, outcome).unwrap_or_else(|errors| {
        Reply::Keep(StartPage::new(&state.navigator, session, input, errors).into_response())
    })
}

async fn read_photo(
    multipart: &mut Multipart,
) -> Result<Option<(String, String, Vec<u8>)>, MultipartError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().unwrap_or_default().to_string();
        let bytes = field.bytes().await?;
        return Ok(Some((file_name, content_type, bytes.to_vec())));
    }
    Ok(None)
}

/// `POST /setup/start/image` — upload the hub photo, then back to start.
pub async fn upload_image<H, G, S>(
    State(state): State<AppState<H, G, S>>,
    jar: CookieJar,
    mut multipart: Multipart,
) -> Response
where
    H: HubApi + Send + Sync + 'static,
    G: Geocoder + Send + Sync + 'static,
    S: SessionStore + Send + Sync + 'static,
{
    let mut visit = match state.open(jar).await {
        Ok(visit) => visit,
        Err(err) => return err.into_response(),
    };
    let session = &mut visit.session;
    let response = match read_photo(&mut multipart).await {
        Ok(photo) => {
            let (file_name, content_type, bytes) = photo.unwrap_or_default();
            let outcome = state
                .registration
                .upload_image(session, &file_name, &content_type, bytes)
                .await;
            match follow(session, outcome) {
                Ok(Reply::Keep(response)) => response,
                _ => to_step(Step::Start),
            }
        }
        Err(err) => {
            tracing::warn!(error = %err, "unreadable photo upload");
            session.notify(Notice::error(UPLOAD_FAILED));
            to_step(Step::Start)
        }
    };
    state.close(visit, response).await
}
