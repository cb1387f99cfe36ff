//! In-process session store backed by a mutex-guarded map.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Duration, Utc};
use hubsetup_domain::error::SetupError;
use hubsetup_domain::id::SessionId;
use hubsetup_domain::session::WizardSession;

use crate::ports::SessionStore;

/// Sessions held in memory; they do not survive a restart.
#[derive(Default)]
pub struct InMemorySessionStore {
    sessions: Mutex<HashMap<SessionId, WizardSession>>,
}

impl InMemorySessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live sessions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<SessionId, WizardSession>> {
        // a panic while holding the lock cannot leave a session half-written
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SessionStore for InMemorySessionStore {
    fn load(
        &self,
        id: SessionId,
    ) -> impl Future<Output = Result<Option<WizardSession>, SetupError>> + Send {
        let result = self.lock().get(&id).cloned();
        async { Ok(result) }
    }

    fn save(&self, session: WizardSession) -> impl Future<Output = Result<(), SetupError>> + Send {
        self.lock().insert(session.id, session);
        async { Ok(()) }
    }

    fn remove(&self, id: SessionId) -> impl Future<Output = Result<(), SetupError>> + Send {
        self.lock().remove(&id);
        async { Ok(()) }
    }

    fn prune(
        &self,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> impl Future<Output = Result<usize, SetupError>> + Send {
        let mut sessions = self.lock();
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_expired(now, ttl));
        let pruned = before - sessions.len();
        drop(sessions);
        if pruned > 0 {
            tracing::debug!(pruned, "pruned idle wizard sessions");
        }
        async move { Ok(pruned) }
    }
}
