//! Wizard steps and the linear order between them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One screen of the setup wizard.
///
/// Variants are declared in wizard order; `Ord` follows that order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Start,
    Plugins,
    Email,
    Password,
    Complete,
}

impl Step {
    /// Every step, in wizard order.
    pub const ALL: [Step; 5] = [
        Step::Start,
        Step::Plugins,
        Step::Email,
        Step::Password,
        Step::Complete,
    ];

    /// The step a successful "next" leads to, `None` for the terminal step.
    #[must_use]
    pub fn next(self) -> Option<Step> {
        match self {
            Self::Start => Some(Self::Plugins),
            Self::Plugins => Some(Self::Email),
            Self::Email => Some(Self::Password),
            Self::Password => Some(Self::Complete),
            Self::Complete => None,
        }
    }

    /// The step "back" leads to, `None` for the initial step.
    #[must_use]
    pub fn previous(self) -> Option<Step> {
        match self {
            Self::Start => None,
            Self::Plugins => Some(Self::Start),
            Self::Email => Some(Self::Plugins),
            Self::Password => Some(Self::Email),
            Self::Complete => Some(Self::Password),
        }
    }

    /// URL path segment for the step.
    #[must_use]
    pub fn slug(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Plugins => "plugins",
            Self::Email => "email",
            Self::Password => "password",
            Self::Complete => "complete",
        }
    }

    /// Human readable title shown in the step indicator.
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::Start => "Get Started",
            Self::Plugins => "Plugins",
            Self::Email => "E-mail",
            Self::Password => "Password",
            Self::Complete => "Complete",
        }
    }

    #[must_use]
    pub fn is_initial(self) -> bool {
        self == Self::Start
    }

    #[must_use]
    pub fn is_terminal(self) -> bool {
        self == Self::Complete
    }

    /// Whether the footer offers a "back" button on this step.
    #[must_use]
    pub fn shows_back(self) -> bool {
        self.previous().is_some()
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// Returned when a path segment names no step.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown wizard step: {0}")]
pub struct UnknownStep(pub String);

impl FromStr for Step {
    type Err = UnknownStep;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|step| step.slug() == s)
            .ok_or_else(|| UnknownStep(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_walk_forward_through_every_step() {
        let mut walked = vec![Step::Start];
        let mut current = Step::Start;
        while let Some(next) = current.next() {
            walked.push(next);
            current = next;
        }
        assert_eq!(walked, Step::ALL.to_vec());
    }

    #[test]
    fn should_mirror_next_with_previous() {
        for step in Step::ALL {
            if let Some(next) = step.next() {
                assert_eq!(next.previous(), Some(step));
            }
        }
    }

    #[test]
    fn should_have_no_previous_for_start_and_no_next_for_complete() {
        assert_eq!(Step::Start.previous(), None);
        assert_eq!(Step::Complete.next(), None);
        assert!(Step::Start.is_initial());
        assert!(Step::Complete.is_terminal());
    }

    #[test]
    fn should_parse_slugs() {
        assert_eq!("email".parse::<Step>().unwrap(), Step::Email);
        assert_eq!(
            "setup".parse::<Step>(),
            Err(UnknownStep("setup".to_string()))
        );
    }

    #[test]
    fn should_order_steps_by_position() {
        assert!(Step::Start < Step::Plugins);
        assert!(Step::Password < Step::Complete);
        assert_eq!(Step::Email as usize, 2);
    }

    #[test]
    fn should_hide_back_on_first_step_only() {
        assert!(!Step::Start.shows_back());
        assert!(Step::Plugins.shows_back());
        assert!(Step::Complete.shows_back());
    }
}
