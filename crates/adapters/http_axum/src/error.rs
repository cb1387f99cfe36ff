//! Error pages.

use askama::Template;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};

use hubsetup_domain::error::SetupError;

/// Failures that end a request on an error page instead of a wizard step.
#[derive(Debug)]
pub enum PageError {
    /// The hub refused the wizard's own credentials: the hub password was
    /// already changed by an earlier run.
    WizardPassword,
    /// The hub or geocoder failed while loading a step.
    Upstream(SetupError),
    /// No step has that name.
    NotFound,
    /// The session store failed.
    Session(SetupError),
}

impl From<SetupError> for PageError {
    fn from(err: SetupError) -> Self {
        if err.requires_restart() {
            Self::WizardPassword
        } else {
            Self::Upstream(err)
        }
    }
}

#[derive(Template)]
#[template(path = "error.html")]
struct ErrorTemplate {
    title: &'static str,
    message: &'static str,
    retry: bool,
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let (status, page) = match &self {
            Self::WizardPassword => {
                tracing::warn!("hub refused the wizard credentials");
                (
                    StatusCode::UNAUTHORIZED,
                    ErrorTemplate {
                        title: "Setup already completed",
                        message: "The wizard could not sign in to the hub. \
                                  The hub password has probably been changed already; \
                                  use the hub console instead.",
                        retry: false,
                    },
                )
            }
            Self::Upstream(err) => {
                tracing::error!(error = %err, "hub request failed");
                (
                    StatusCode::BAD_GATEWAY,
                    ErrorTemplate {
                        title: "Hub unavailable",
                        message: "The hub could not be reached. Please try again in a moment.",
                        retry: true,
                    },
                )
            }
            Self::NotFound => (
                StatusCode::NOT_FOUND,
                ErrorTemplate {
                    title: "Page not found",
                    message: "There is no such setup step.",
                    retry: true,
                },
            ),
            Self::Session(err) => {
                tracing::error!(error = %err, "session store failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorTemplate {
                        title: "Internal error",
                        message: "Something went wrong. Please try again.",
                        retry: true,
                    },
                )
            }
        };
        match page.render() {
            Ok(body) => (status, Html(body)).into_response(),
            Err(err) => {
                tracing::error!(error = %err, "failed to render error page");
                status.into_response()
            }
        }
    }
}
