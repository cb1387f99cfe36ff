//! Cookie-referenced wizard sessions.
//!
//! The browser only holds an opaque session id; the [`WizardSession`] itself
//! lives in the [`SessionStore`]. A handler opens a [`Visit`], works on its
//! session, then closes it, which saves the session and sets the cookie for
//! new visitors.

use axum::response::{IntoResponse, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::Utc;

use hubsetup_app::ports::SessionStore;
use hubsetup_domain::id::SessionId;
use hubsetup_domain::session::WizardSession;

use crate::error::PageError;
use crate::state::AppState;

/// Name of the cookie carrying the session id.
pub const SESSION_COOKIE: &str = "hubsetup_session";

/// The session id sent by the browser, if any.
#[must_use]
pub fn session_id(jar: &CookieJar) -> Option<SessionId> {
    jar.get(SESSION_COOKIE)
        .and_then(|cookie| cookie.value().trim().parse().ok())
}

fn session_cookie(id: SessionId) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, id.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

/// One request's hold on a wizard session.
pub struct Visit {
    pub session: WizardSession,
    jar: CookieJar,
    fresh: bool,
}

impl<H, G, S> AppState<H, G, S>
where
    S: SessionStore + Send + Sync + 'static,
{
    /// Load the browser's session, or start a new one.
    ///
    /// Unknown or expired ids are never reused; the browser gets a new id.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::Session`] when the store fails.
    pub async fn open(&self, jar: CookieJar) -> Result<Visit, PageError> {
        let now = Utc::now();
        if let Some(id) = session_id(&jar) {
            let stored = self.sessions.load(id).await.map_err(PageError::Session)?;
            if let Some(mut session) = stored {
                session.touch(now);
                return Ok(Visit {
                    session,
                    jar,
                    fresh: false,
                });
            }
        }
        let session = WizardSession::new(
            SessionId::new(),
            self.settings.initial_password.as_str(),
            now,
        );
        tracing::debug!(session_id = %session.id, "wizard session started");
        Ok(Visit {
            session,
            jar,
            fresh: true,
        })
    }

    /// Save the session and attach the cookie to `response` when needed.
    pub async fn close(&self, visit: Visit, response: impl IntoResponse) -> Response {
        let Visit {
            session,
            jar,
            fresh,
        } = visit;
        let id = session.id;
        if let Err(err) = self.sessions.save(session).await {
            return PageError::Session(err).into_response();
        }
        if fresh {
            (jar.add(session_cookie(id)), response).into_response()
        } else {
            (jar, response).into_response()
        }
    }

    /// Forget the session and expire the cookie.
    pub async fn discard(&self, visit: Visit, response: impl IntoResponse) -> Response {
        let id = visit.session.id;
        if let Err(err) = self.sessions.remove(id).await {
            tracing::warn!(session_id = %id, %err, "failed to remove finished session");
        }
        tracing::info!(session_id = %id, "wizard finished");
        let jar = visit.jar.remove(Cookie::build(SESSION_COOKIE).path("/"));
        (jar, response).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::http::header::{COOKIE, SET_COOKIE};
    use axum::http::{HeaderMap, HeaderValue};

    use super::*;

    fn jar(cookie: &str) -> CookieJar {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_str(cookie).unwrap());
        CookieJar::from_headers(&headers)
    }

    #[test]
    fn should_find_session_among_other_cookies() {
        let id = SessionId::new();
        let found = session_id(&jar(&format!("theme=dark; {SESSION_COOKIE}={id}; lang=en")));
        assert_eq!(found, Some(id));
    }

    #[test]
    fn should_ignore_malformed_session_id() {
        assert_eq!(session_id(&jar(&format!("{SESSION_COOKIE}=nope"))), None);
        assert_eq!(session_id(&CookieJar::new()), None);
    }

    #[test]
    fn should_issue_http_only_lax_cookie() {
        let id = SessionId::new();
        let response = (CookieJar::new().add(session_cookie(id)), "ok").into_response();

        let value = response.headers().get(SET_COOKIE).unwrap().to_str().unwrap();
        assert!(value.starts_with(&format!("{SESSION_COOKIE}={id}")));
        assert!(value.contains("HttpOnly"));
        assert!(value.contains("SameSite=Lax"));
        assert!(value.contains("Path=/"));
    }

    #[test]
    fn should_expire_cookie_on_removal() {
        let id = SessionId::new();
        let removed = jar(&format!("{SESSION_COOKIE}={id}"))
            .remove(Cookie::build(SESSION_COOKIE).path("/"));
        let response = (removed, "bye").into_response();

        let value = response.headers().get(SET_COOKIE).unwrap().to_str().unwrap();
        assert!(value.starts_with(&format!("{SESSION_COOKIE}=;")));
        assert!(value.contains("Max-Age=0"));
    }
}
