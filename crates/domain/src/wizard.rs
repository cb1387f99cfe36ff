//! Wizard transitions: what a step submission leads to, and the step
//! indicator derived from the session position.

use std::collections::BTreeMap;

use crate::error::{SetupError, ValidationError};
use crate::hub::Ack;
use crate::session::{Notice, WizardSession};
use crate::step::Step;

/// Inline error messages keyed by form field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    /// The message for `field`, if that field is in error.
    #[must_use]
    pub fn message(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    #[must_use]
    pub fn has(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<ValidationError> for FieldErrors {
    fn from(err: ValidationError) -> Self {
        let mut errors = Self::new();
        errors.insert(err.field(), err.to_string());
        errors
    }
}

/// Where a step action leaves the browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// Show the given step (forward after success, or back).
    Navigate(Step),
    /// Stay on the step and show inline errors next to the fields.
    Invalid(FieldErrors),
    /// Stay on the step; any notice has been queued on the session.
    Stay,
    /// The hub rejected the credentials; go back to the first step.
    Restart,
    /// Leave the wizard for the given URL.
    Leave(String),
}

/// Turn the result of a step's hub write into an outcome.
///
/// Both a completed and an accepted-but-pending write advance to the next
/// step. A `401` restarts the wizard. Any other failure queues `failure` as
/// an error notice and stays.
pub fn settle(
    session: &mut WizardSession,
    step: Step,
    result: Result<Ack, SetupError>,
    failure: &str,
) -> StepOutcome {
    match result {
        Ok(_) => advance(session, step),
        Err(SetupError::Unauthorized) => {
            session.restart();
            StepOutcome::Restart
        }
        Err(SetupError::Validation(err)) => StepOutcome::Invalid(err.into()),
        Err(SetupError::Rejected { .. } | SetupError::Unavailable(_)) => {
            session.notify(Notice::error(failure));
            StepOutcome::Stay
        }
    }
}

/// Mark `step` as done and move to the one after it.
pub fn advance(session: &mut WizardSession, step: Step) -> StepOutcome {
    match step.next() {
        Some(next) => {
            session.reach(next);
            StepOutcome::Navigate(next)
        }
        None => StepOutcome::Stay,
    }
}

/// Move back one step, staying put on the first step.
#[must_use]
pub fn retreat(step: Step) -> StepOutcome {
    step.previous()
        .map_or(StepOutcome::Stay, StepOutcome::Navigate)
}

/// One entry of the step indicator bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepIndicator {
    pub step: Step,
    pub title: &'static str,
    pub slug: &'static str,
    /// The step currently shown.
    pub active: bool,
    /// A step already reached, so it can be linked to.
    pub reachable: bool,
}

/// Build the indicator bar highlighting `active`.
#[must_use]
pub fn indicators(active: Step, furthest: Step) -> Vec<StepIndicator> {
    Step::ALL
        .into_iter()
        .map(|step| StepIndicator {
            step,
            title: step.title(),
            slug: step.slug(),
            active: step == active,
            reachable: step <= furthest,
        })
        .collect()
}
