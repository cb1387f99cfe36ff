//! Axum router assembly.

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Redirect};
use axum::routing::{get, post};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use hubsetup_app::ports::{Geocoder, HubApi, SessionStore};

use crate::pages;
use crate::state::AppState;

const STYLESHEET: &str = include_str!("../assets/wizard.css");

/// Largest accepted hub photo upload.
const MAX_PHOTO_BYTES: usize = 10 * 1024 * 1024;

/// Build the top-level axum [`Router`].
///
/// Serves the wizard under `/setup` and its stylesheet under
/// `/setup/assets`, from the configured directory when there is one.
/// Includes a [`TraceLayer`] that logs each HTTP request/response at the
/// `DEBUG` level using the `tracing` ecosystem.
pub fn build<H, G, S>(state: AppState<H, G, S>) -> Router
where
    H: HubApi + Send + Sync + 'static,
    G: Geocoder + Send + Sync + 'static,
    S: SessionStore + Send + Sync + 'static,
{
    let assets: Router<AppState<H, G, S>> = match &state.settings.assets_dir {
        Some(dir) => Router::new().nest_service("/setup/assets", ServeDir::new(dir)),
        None => Router::new().route("/setup/assets/wizard.css", get(stylesheet)),
    };

    Router::new()
        .route("/health", get(health_check))
        .route("/", get(|| async { Redirect::to("/setup") }))
        .route("/setup", get(pages::resume::<H, G, S>))
        .route(
            "/setup/start/image",
            post(pages::upload_image::<H, G, S>).layer(DefaultBodyLimit::max(MAX_PHOTO_BYTES)),
        )
        .route(
            "/setup/{step}",
            get(pages::show::<H, G, S>).post(pages::submit::<H, G, S>),
        )
        .merge(assets)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}

async fn stylesheet() -> impl IntoResponse {
    ([(CONTENT_TYPE, "text/css; charset=utf-8")], STYLESHEET)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::body::Body;
    use axum::http::header::{COOKIE, LOCATION, SET_COOKIE};
    use axum::http::{Request, Response, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use hubsetup_app::session_store::InMemorySessionStore;
    use hubsetup_domain::email::EmailConfiguration;
    use hubsetup_domain::error::SetupError;
    use hubsetup_domain::hub::{Ack, Credentials, HubConfiguration, HubImage};
    use hubsetup_domain::password::PasswordChange;
    use hubsetup_domain::plugin::Plugin;
    use hubsetup_domain::registration::Location;

    use super::*;
    use crate::state::WizardSettings;

    #[derive(Default, Clone)]
    struct StubHub {
        calls: Arc<Mutex<Vec<String>>>,
    }

    impl StubHub {
        fn record(&self, call: impl Into<String>) {
            self.calls.lock().unwrap().push(call.into());
        }
    }

    impl HubApi for StubHub {
        async fn sign_in(&self, username: &str, password: &str) -> Result<Credentials, SetupError> {
            self.record(format!("sign_in:{password}"));
            match password {
                "local" => Ok(Credentials::Bearer {
                    token: format!("token-for-{username}"),
                }),
                "offline" => Err(SetupError::Unavailable("connection refused".into())),
                _ => Err(SetupError::Unauthorized),
            }
        }

        async fn get_configuration(
            &self,
            _credentials: &Credentials,
        ) -> Result<HubConfiguration, SetupError> {
            self.record("get_configuration");
            Ok(HubConfiguration {
                name: Some("Living room".to_string()),
                ..HubConfiguration::default()
            })
        }

        async fn update_configuration(
            &self,
            _credentials: &Credentials,
            update: HubConfiguration,
        ) -> Result<Ack, SetupError> {
            self.record(format!(
                "update_configuration:{}",
                update.name.unwrap_or_default()
            ));
            Ok(Ack::Accepted)
        }

        async fn upload_image(
            &self,
            _credentials: &Credentials,
            image: HubImage,
        ) -> Result<Ack, SetupError> {
            self.record(format!("upload_image:{}", image.file_name));
            Ok(Ack::Completed)
        }

        async fn list_plugins(
            &self,
            _credentials: &Credentials,
        ) -> Result<Vec<Plugin>, SetupError> {
            Ok(vec![Plugin {
                id: "zwave".to_string(),
                name: "Z-Wave".to_string(),
                description: Some("Z-Wave devices".to_string()),
                version: Some("1.0.0".to_string()),
                install_link: Some("/install/zwave".to_string()),
            }])
        }

        async fn install_plugin(
            &self,
            _credentials: &Credentials,
            plugin: &Plugin,
        ) -> Result<Ack, SetupError> {
            self.record(format!("install_plugin:{}", plugin.id));
            Ok(Ack::Accepted)
        }

        async fn send_test_email(
            &self,
            _credentials: &Credentials,
            _config: EmailConfiguration,
        ) -> Result<Ack, SetupError> {
            Ok(Ack::Completed)
        }

        async fn change_password(
            &self,
            _credentials: &Credentials,
            _change: PasswordChange,
        ) -> Result<Ack, SetupError> {
            self.record("change_password");
            Ok(Ack::Completed)
        }
    }

    struct StubGeocoder;

    impl Geocoder for StubGeocoder {
        async fn lookup(&self, _address: &str) -> Result<Vec<Option<Location>>, SetupError> {
            Ok(vec![Location::new(45.5, -73.5).ok()])
        }
    }

    type TestState = AppState<StubHub, StubGeocoder, InMemorySessionStore>;

    fn test_state(settings: WizardSettings) -> (TestState, StubHub) {
        let hub = StubHub::default();
        let state = AppState::new(
            hub.clone(),
            StubGeocoder,
            Arc::new(InMemorySessionStore::new()),
            settings,
        );
        (state, hub)
    }

    fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(COOKIE, cookie);
        }
        builder.body(Body::empty()).unwrap()
    }

    fn post(uri: &str, cookie: &str, form: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(COOKIE, cookie)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form.to_string()))
            .unwrap()
    }

    fn session_cookie(response: &Response<Body>) -> String {
        let value = response.headers().get(SET_COOKIE).unwrap().to_str().unwrap();
        value.split(';').next().unwrap().to_string()
    }

    fn location(response: &Response<Body>) -> &str {
        response.headers().get(LOCATION).unwrap().to_str().unwrap()
    }

    async fn body_text(response: Response<Body>) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn should_return_ok_when_health_check_called() {
        let (state, _) = test_state(WizardSettings::default());
        let app = build(state);

        let response = app.oneshot(get("/health", None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "OK");
    }

    #[tokio::test]
    async fn should_send_new_visitor_to_start_with_cookie() {
        let (state, _) = test_state(WizardSettings::default());
        let app = build(state);

        let response = app.oneshot(get("/setup", None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/setup/start");
        assert!(session_cookie(&response).starts_with("hubsetup_session="));
    }

    #[tokio::test]
    async fn should_sign_in_and_prefill_start_step() {
        let (state, hub) = test_state(WizardSettings::default());
        let app = build(state);

        let response = app.oneshot(get("/setup/start", None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("value=\"Living room\""));
        assert_eq!(
            hub.calls.lock().unwrap().clone(),
            vec!["sign_in:local", "get_configuration"]
        );
    }

    #[tokio::test]
    async fn should_show_wizard_password_page_when_sign_in_refused() {
        let (state, _) = test_state(WizardSettings {
            initial_password: "changed".to_string(),
            ..WizardSettings::default()
        });
        let app = build(state);

        let response = app.oneshot(get("/setup/start", None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(body_text(response).await.contains("Setup already completed"));
    }

    #[tokio::test]
    async fn should_show_wizard_password_page_when_hub_unreachable_at_sign_in() {
        let (state, hub) = test_state(WizardSettings {
            initial_password: "offline".to_string(),
            ..WizardSettings::default()
        });
        let app = build(state);

        let response = app.oneshot(get("/setup/start", None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(body_text(response).await.contains("Setup already completed"));
        assert_eq!(hub.calls.lock().unwrap().clone(), vec!["sign_in:offline"]);
    }

    #[tokio::test]
    async fn should_expire_cookie_when_leaving_the_wizard() {
        let (state, _) = test_state(WizardSettings::default());
        let app = build(state);
        let response = app
            .clone()
            .oneshot(get("/setup/start", None))
            .await
            .unwrap();
        let cookie = session_cookie(&response);

        let steps = [
            ("/setup/start", "name=Cabin&address="),
            ("/setup/plugins", ""),
            ("/setup/email", "serverType=none"),
            ("/setup/password", "password=hunter2hunter2&repeat=hunter2hunter2"),
        ];
        for (uri, form) in steps {
            let response = app.clone().oneshot(post(uri, &cookie, form)).await.unwrap();
            assert_eq!(response.status(), StatusCode::SEE_OTHER, "{uri}");
        }
        let response = app
            .oneshot(post("/setup/complete", &cookie, "action=next"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let expired = response.headers().get(SET_COOKIE).unwrap().to_str().unwrap();
        assert!(expired.starts_with("hubsetup_session=;"));
        assert!(expired.contains("Max-Age=0"));
    }

    #[tokio::test]
    async fn should_redirect_to_start_when_not_signed_in() {
        let (state, _) = test_state(WizardSettings::default());
        let app = build(state);

        let response = app.oneshot(get("/setup/email", None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/setup/start");
    }

    #[tokio::test]
    async fn should_return_not_found_for_unknown_step() {
        let (state, _) = test_state(WizardSettings::default());
        let app = build(state);

        let response = app.oneshot(get("/setup/finale", None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn should_serve_builtin_stylesheet() {
        let (state, _) = test_state(WizardSettings::default());
        let app = build(state);

        let response = app
            .oneshot(get("/setup/assets/wizard.css", None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(CONTENT_TYPE).unwrap(),
            "text/css; charset=utf-8"
        );
    }

    #[tokio::test]
    async fn should_save_start_step_and_advance() {
        let (state, hub) = test_state(WizardSettings::default());
        let app = build(state);

        let response = app
            .clone()
            .oneshot(get("/setup/start", None))
            .await
            .unwrap();
        let cookie = session_cookie(&response);

        let response = app
            .clone()
            .oneshot(post("/setup/start", &cookie, "name=Cabin&address=&latitude=&longitude="))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/setup/plugins");
        assert!(
            hub.calls
                .lock()
                .unwrap()
                .contains(&"update_configuration:Cabin".to_string())
        );

        let response = app
            .oneshot(get("/setup/plugins", Some(&cookie)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("Z-Wave"));
    }

    #[tokio::test]
    async fn should_show_inline_error_when_name_missing() {
        let (state, _) = test_state(WizardSettings::default());
        let app = build(state);
        let response = app
            .clone()
            .oneshot(get("/setup/start", None))
            .await
            .unwrap();
        let cookie = session_cookie(&response);

        let response = app
            .oneshot(post("/setup/start", &cookie, "name=++&address="))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(
            body_text(response)
                .await
                .contains("A nickname for your hub is required.")
        );
    }

    #[tokio::test]
    async fn should_not_skip_ahead_of_furthest_step() {
        let (state, _) = test_state(WizardSettings::default());
        let app = build(state);
        let response = app
            .clone()
            .oneshot(get("/setup/start", None))
            .await
            .unwrap();
        let cookie = session_cookie(&response);

        let response = app
            .oneshot(get("/setup/password", Some(&cookie)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/setup/start");
    }
}
