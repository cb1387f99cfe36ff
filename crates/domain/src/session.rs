//! Per-browser wizard session state.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::hub::Credentials;
use crate::id::SessionId;
use crate::step::Step;

/// Severity of a [`Notice`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

impl NoticeLevel {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

/// A transient message shown once on the next rendered page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    #[must_use]
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            text: text.into(),
        }
    }

    #[must_use]
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            text: text.into(),
        }
    }

    #[must_use]
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            text: text.into(),
        }
    }
}

/// Everything the wizard remembers about one browser between requests.
#[derive(Debug, Clone)]
pub struct WizardSession {
    pub id: SessionId,
    /// Credentials for hub calls; `None` until signed in or after a `401`.
    pub credentials: Option<Credentials>,
    /// The hub password as far as the wizard knows it.
    pub hub_password: String,
    /// Step currently shown.
    pub active: Step,
    /// Furthest step reached by a successful "next".
    pub furthest: Step,
    /// Address as last loaded from (or geocoded for) the hub.
    pub known_address: Option<String>,
    /// Whether the manual latitude/longitude fields are revealed.
    pub show_coordinates: bool,
    pub last_seen: DateTime<Utc>,
    notices: Vec<Notice>,
}

impl WizardSession {
    /// Create a fresh session positioned on the first step.
    #[must_use]
    pub fn new(id: SessionId, hub_password: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id,
            credentials: None,
            hub_password: hub_password.into(),
            active: Step::Start,
            furthest: Step::Start,
            known_address: None,
            show_coordinates: false,
            last_seen: now,
            notices: Vec::new(),
        }
    }

    #[must_use]
    pub fn is_signed_in(&self) -> bool {
        self.credentials.is_some()
    }

    /// Record activity.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.last_seen = now;
    }

    /// Whether the session has been idle for longer than `ttl`.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now - self.last_seen > ttl
    }

    /// Extend the furthest reached step; never moves backwards.
    pub fn reach(&mut self, step: Step) {
        self.furthest = self.furthest.max(step);
    }

    /// Forget the credentials and go back to the first step.
    pub fn restart(&mut self) {
        self.credentials = None;
        self.active = Step::Start;
    }

    /// Whether `address` differs from the one the hub last knew about.
    #[must_use]
    pub fn address_changed(&self, address: &str) -> bool {
        let address = address.trim();
        self.known_address.as_deref().map_or(!address.is_empty(), |known| known != address)
    }

    /// Queue a notice for the next rendered page.
    pub fn notify(&mut self, notice: Notice) {
        self.notices.push(notice);
    }

    /// Drain queued notices.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> WizardSession {
        WizardSession::new(SessionId::new(), "local", Utc::now())
    }

    #[test]
    fn should_start_on_first_step_without_credentials() {
        let s = session();
        assert_eq!(s.active, Step::Start);
        assert_eq!(s.furthest, Step::Start);
        assert!(!s.is_signed_in());
        assert_eq!(s.hub_password, "local");
    }

    #[test]
    fn should_never_move_furthest_backwards() {
        let mut s = session();
        s.reach(Step::Email);
        s.reach(Step::Plugins);
        assert_eq!(s.furthest, Step::Email);
    }

    #[test]
    fn should_drop_credentials_on_restart() {
        let mut s = session();
        s.credentials = Some(Credentials::Bearer {
            token: "t".to_string(),
        });
        s.active = Step::Email;
        s.reach(Step::Email);

        s.restart();

        assert!(!s.is_signed_in());
        assert_eq!(s.active, Step::Start);
        assert_eq!(s.furthest, Step::Email);
    }

    #[test]
    fn should_drain_notices_once() {
        let mut s = session();
        s.notify(Notice::error("boom"));
        s.notify(Notice::success("ok"));

        let notices = s.take_notices();
        assert_eq!(notices.len(), 2);
        assert_eq!(notices[0].level, NoticeLevel::Error);
        assert!(s.take_notices().is_empty());
    }

    #[test]
    fn should_detect_address_changes() {
        let mut s = session();
        assert!(!s.address_changed(""));
        assert!(s.address_changed("1 Main St"));

        s.known_address = Some("1 Main St".to_string());
        assert!(!s.address_changed(" 1 Main St "));
        assert!(s.address_changed("2 Main St"));
    }

    #[test]
    fn should_expire_after_idle_ttl() {
        let start = Utc::now();
        let s = WizardSession::new(SessionId::new(), "local", start);
        let ttl = Duration::minutes(30);
        assert!(!s.is_expired(start + Duration::minutes(29), ttl));
        assert!(s.is_expired(start + Duration::minutes(31), ttl));
    }
}
