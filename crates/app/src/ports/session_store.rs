//! Session store port — wizard state kept between requests.

use std::future::Future;

use chrono::{DateTime, Duration, Utc};
use hubsetup_domain::error::SetupError;
use hubsetup_domain::id::SessionId;
use hubsetup_domain::session::WizardSession;

/// Storage for [`WizardSession`]s keyed by [`SessionId`].
pub trait SessionStore {
    /// Get a session by id.
    fn load(
        &self,
        id: SessionId,
    ) -> impl Future<Output = Result<Option<WizardSession>, SetupError>> + Send;

    /// Insert or replace a session.
    fn save(&self, session: WizardSession) -> impl Future<Output = Result<(), SetupError>> + Send;

    /// Forget a session.
    fn remove(&self, id: SessionId) -> impl Future<Output = Result<(), SetupError>> + Send;

    /// Drop every session idle for longer than `ttl`, returning how many went.
    fn prune(
        &self,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> impl Future<Output = Result<usize, SetupError>> + Send;
}
