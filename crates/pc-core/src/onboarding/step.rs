//! Step definition table.
//!
//! The onboarding flow is a fixed linear order of named steps plus the
//! terminal `Complete` state, which is not itself part of the table.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A named stage in the onboarding sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OnboardingStep {
    /// Organization and contact details.
    Welcome,
    /// Pricing track selection (checkout or email verification).
    Plan,
    /// Accounting system authorization.
    Fortnox,
    /// Additional provider integrations.
    Integrations,
    /// Reminder and notification toggles.
    Notifications,
    /// Terminal state; no outgoing transitions.
    Complete,
}

/// Ordered step table. `Complete` is deliberately absent.
pub const STEP_TABLE: [OnboardingStep; 5] = [
    OnboardingStep::Welcome,
    OnboardingStep::Plan,
    OnboardingStep::Fortnox,
    OnboardingStep::Integrations,
    OnboardingStep::Notifications,
];

/// External systems a step can hand the browser over to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectorKind {
    Checkout,
    Authorization,
    Provisioning,
}

impl fmt::Display for ConnectorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Checkout => "checkout",
            Self::Authorization => "authorization",
            Self::Provisioning => "provisioning",
        })
    }
}

impl OnboardingStep {
    pub fn first() -> Self {
        STEP_TABLE[0]
    }

    pub fn total() -> usize {
        STEP_TABLE.len()
    }

    /// Position in the step table, `None` for `Complete`.
    pub fn position(self) -> Option<usize> {
        STEP_TABLE.iter().position(|step| *step == self)
    }

    /// Position used for ordering comparisons; `Complete` sorts after every
    /// table entry.
    pub fn ordinal(self) -> usize {
        self.position().unwrap_or(STEP_TABLE.len())
    }

    pub fn is_terminal(self) -> bool {
        self == Self::Complete
    }

    /// The entry after `self`, or `Complete` after the last entry.
    pub fn next(self) -> Self {
        match self.position() {
            Some(index) => STEP_TABLE
                .get(index + 1)
                .copied()
                .unwrap_or(Self::Complete),
            None => Self::Complete,
        }
    }

    /// The entry before `self`. `None` on the first entry and on `Complete`.
    pub fn previous(self) -> Option<Self> {
        match self.position() {
            Some(0) | None => None,
            Some(index) => Some(STEP_TABLE[index - 1]),
        }
    }

    /// Steps the user may decline without completing.
    pub fn is_optional(self) -> bool {
        matches!(
            self,
            Self::Fortnox | Self::Integrations | Self::Notifications
        )
    }

    /// Connector whose return this step waits for.
    pub fn connector(self) -> Option<ConnectorKind> {
        match self {
            Self::Plan => Some(ConnectorKind::Checkout),
            Self::Fortnox => Some(ConnectorKind::Authorization),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Welcome => "welcome",
            Self::Plan => "plan",
            Self::Fortnox => "fortnox",
            Self::Integrations => "integrations",
            Self::Notifications => "notifications",
            Self::Complete => "complete",
        }
    }

    /// Integer percentage of the table passed when standing on `self`.
    pub fn completion_percent(self) -> u8 {
        ((self.ordinal() * 100) / Self::total()) as u8
    }
}

impl fmt::Display for OnboardingStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown onboarding step: {0}")]
pub struct UnknownStep(pub String);

impl FromStr for OnboardingStep {
    type Err = UnknownStep;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "welcome" => Ok(Self::Welcome),
            "plan" => Ok(Self::Plan),
            "fortnox" => Ok(Self::Fortnox),
            "integrations" => Ok(Self::Integrations),
            "notifications" => Ok(Self::Notifications),
            "complete" => Ok(Self::Complete),
            other => Err(UnknownStep(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_walks_the_table_and_ends_in_complete() {
        let mut step = OnboardingStep::first();
        let mut visited = vec![step];
        while !step.is_terminal() {
            step = step.next();
            visited.push(step);
        }
        assert_eq!(
            visited,
            vec![
                OnboardingStep::Welcome,
                OnboardingStep::Plan,
                OnboardingStep::Fortnox,
                OnboardingStep::Integrations,
                OnboardingStep::Notifications,
                OnboardingStep::Complete,
            ]
        );
        assert_eq!(OnboardingStep::Complete.next(), OnboardingStep::Complete);
    }

    #[test]
    fn previous_stops_at_first_step_and_terminal() {
        assert_eq!(OnboardingStep::Welcome.previous(), None);
        assert_eq!(OnboardingStep::Complete.previous(), None);
        assert_eq!(
            OnboardingStep::Fortnox.previous(),
            Some(OnboardingStep::Plan)
        );
    }

    #[test]
    fn complete_is_not_in_table_but_orders_last() {
        assert_eq!(OnboardingStep::Complete.position(), None);
        assert_eq!(OnboardingStep::Complete.ordinal(), STEP_TABLE.len());
        assert_eq!(OnboardingStep::Complete.completion_percent(), 100);
        assert_eq!(OnboardingStep::Welcome.completion_percent(), 0);
        assert_eq!(OnboardingStep::Fortnox.completion_percent(), 40);
    }

    #[test]
    fn parses_lowercase_names() {
        assert_eq!("Fortnox".parse::<OnboardingStep>(), Ok(OnboardingStep::Fortnox));
        assert!("billing".parse::<OnboardingStep>().is_err());
    }

    #[test]
    fn serializes_as_lowercase_identifier() {
        let json = serde_json::to_string(&OnboardingStep::Notifications).unwrap();
        assert_eq!(json, "\"notifications\"");
    }
}
