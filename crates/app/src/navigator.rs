//! Wizard router — resolves step slugs and wraps every step display in
//! before/after hooks.
//!
//! *Before* hooks may refuse a step and send the browser elsewhere (missing
//! credentials, skipping ahead). *After* hooks run once a step is shown:
//! they make it the session's active step, which in turn drives the
//! highlighted entry of the step indicator.

use hubsetup_domain::session::WizardSession;
use hubsetup_domain::step::Step;
use hubsetup_domain::wizard::{self, StepIndicator, StepOutcome};

/// Decision of a before hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    Proceed,
    Redirect(Step),
}

/// Result of asking the navigator to show a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entry {
    /// Render the step.
    Show(Step),
    /// Send the browser to another step instead.
    Redirect(Step),
}

/// Aspect-style hook run around every step display.
pub trait NavigationHook: Send + Sync {
    /// Runs before `target` is shown; may redirect elsewhere.
    fn before(&self, _session: &WizardSession, _target: Step) -> Guard {
        Guard::Proceed
    }

    /// Runs after `step` was accepted for display.
    fn after(&self, _session: &mut WizardSession, _step: Step) {}
}

/// Steps past the first one need hub credentials.
pub struct RequireCredentials;

impl NavigationHook for RequireCredentials {
    fn before(&self, session: &WizardSession, target: Step) -> Guard {
        if target.is_initial() || session.is_signed_in() {
            Guard::Proceed
        } else {
            Guard::Redirect(Step::Start)
        }
    }
}

/// A step can only be shown once reached through "next".
pub struct RequireReached;

impl NavigationHook for RequireReached {
    fn before(&self, session: &WizardSession, target: Step) -> Guard {
        if target <= session.furthest {
            Guard::Proceed
        } else {
            Guard::Redirect(session.furthest)
        }
    }
}

/// Swap the active step.
pub struct ActivateStep;

impl NavigationHook for ActivateStep {
    fn after(&self, session: &mut WizardSession, step: Step) {
        if session.active != step {
            tracing::debug!(
                session_id = %session.id,
                from = %session.active,
                to = %step,
                "wizard step changed"
            );
        }
        session.active = step;
    }
}

/// Routes the browser between wizard steps.
pub struct Navigator {
    hooks: Vec<Box<dyn NavigationHook>>,
    exit_url: String,
}

impl Navigator {
    /// Create a navigator with the standard hooks.
    ///
    /// `exit_url` is where the browser goes once the wizard is finished.
    #[must_use]
    pub fn new(exit_url: impl Into<String>) -> Self {
        Self {
            hooks: vec![
                Box::new(RequireCredentials),
                Box::new(RequireReached),
                Box::new(ActivateStep),
            ],
            exit_url: exit_url.into(),
        }
    }

    /// Append a hook; hooks run in insertion order.
    #[cfg(test)]
    #[must_use]
    fn with_hook(mut self, hook: impl NavigationHook + 'static) -> Self {
        self.hooks.push(Box::new(hook));
        self
    }

    /// Resolve a URL path segment to a step.
    #[must_use]
    pub fn resolve(&self, slug: &str) -> Option<Step> {
        slug.parse().ok()
    }

    /// Where the browser goes after the last step.
    #[must_use]
    pub fn exit_url(&self) -> &str {
        &self.exit_url
    }

    /// Run the hooks for showing `target`.
    ///
    /// The first before hook that redirects wins and no after hook runs.
    pub fn enter(&self, session: &mut WizardSession, target: Step) -> Entry {
        for hook in &self.hooks {
            if let Guard::Redirect(step) = hook.before(session, target) {
                return Entry::Redirect(step);
            }
        }
        for hook in &self.hooks {
            hook.after(session, target);
        }
        Entry::Show(target)
    }

    /// "Next" on the last step: leave the wizard.
    #[must_use]
    pub fn finish(&self) -> StepOutcome {
        StepOutcome::Leave(self.exit_url.clone())
    }

    /// Step indicator for the session's current position.
    #[must_use]
    pub fn indicators(&self, session: &WizardSession) -> Vec<StepIndicator> {
        wizard::indicators(session.active, session.furthest)
    }
}
