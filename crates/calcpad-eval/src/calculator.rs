//! Trigger-gated evaluation state.
//!
//! A [`Calculator`] owns the current [`ResultSequence`] and decides, per notification, whether
//! to recompute it. Each pass reads the sequence it is about to replace, so `ans(n)` always
//! refers to the previous completed pass.

use crate::results::{ResultSequence, evaluate_lines};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::trace;

/// Something that happened to the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Any edit.
    TextChanged,
    /// The Enter key.
    Enter,
    /// An explicit "calculate" command.
    Calculate,
}

/// Which triggers recompute results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TriggerPolicy {
    /// Enter and explicit calculate only.
    #[default]
    #[serde(alias = "enter")]
    OnEnter,
    /// Every edit, plus Enter and explicit calculate.
    #[serde(alias = "change")]
    OnEveryChange,
}

impl TriggerPolicy {
    pub fn accepts(self, trigger: Trigger) -> bool {
        match trigger {
            Trigger::Calculate | Trigger::Enter => true,
            Trigger::TextChanged => self == TriggerPolicy::OnEveryChange,
        }
    }
}

/// Error for unrecognized [`TriggerPolicy`] names.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown trigger policy '{0}' (expected 'enter' or 'change')")]
pub struct ParsePolicyError(pub String);

impl FromStr for TriggerPolicy {
    type Err = ParsePolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "enter" | "on-enter" => Ok(TriggerPolicy::OnEnter),
            "change" | "on-every-change" => Ok(TriggerPolicy::OnEveryChange),
            _ => Err(ParsePolicyError(s.to_string())),
        }
    }
}

impl fmt::Display for TriggerPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TriggerPolicy::OnEnter => "enter",
            TriggerPolicy::OnEveryChange => "change",
        })
    }
}

/// Owns the result sequence and recomputes it when a trigger is accepted.
#[derive(Debug, Clone, Default)]
pub struct Calculator {
    policy: TriggerPolicy,
    results: ResultSequence,
    passes: u64,
}

impl Calculator {
    pub fn new(policy: TriggerPolicy) -> Self {
        Self {
            policy,
            results: ResultSequence::default(),
            passes: 0,
        }
    }

    pub fn policy(&self) -> TriggerPolicy {
        self.policy
    }

    pub fn set_policy(&mut self, policy: TriggerPolicy) {
        self.policy = policy;
    }

    /// Results of the last completed pass (empty before the first one).
    pub fn results(&self) -> &ResultSequence {
        &self.results
    }

    /// Number of completed passes.
    pub fn pass_count(&self) -> u64 {
        self.passes
    }

    /// Handle a notification. Returns whether the results were recomputed.
    pub fn notify<S: AsRef<str>>(&mut self, trigger: Trigger, lines: &[S]) -> bool {
        if !self.policy.accepts(trigger) {
            trace!(?trigger, policy = %self.policy, "trigger ignored");
            return false;
        }
        self.calculate(lines);
        true
    }

    /// Recompute unconditionally.
    pub fn calculate<S: AsRef<str>>(&mut self, lines: &[S]) -> &ResultSequence {
        self.results = evaluate_lines(lines, &self.results);
        self.passes += 1;
        &self.results
    }

    /// Forget all results, so `ans(n)` is `NaN` on the next pass.
    pub fn reset(&mut self) {
        self.results = ResultSequence::default();
        self.passes = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_acceptance() {
        assert!(TriggerPolicy::OnEnter.accepts(Trigger::Enter));
        assert!(TriggerPolicy::OnEnter.accepts(Trigger::Calculate));
        assert!(!TriggerPolicy::OnEnter.accepts(Trigger::TextChanged));
        assert!(TriggerPolicy::OnEveryChange.accepts(Trigger::TextChanged));
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!("Enter".parse(), Ok(TriggerPolicy::OnEnter));
        assert_eq!("on-every-change".parse(), Ok(TriggerPolicy::OnEveryChange));
        assert_eq!(
            "always".parse::<TriggerPolicy>(),
            Err(ParsePolicyError("always".to_string()))
        );
        assert_eq!(TriggerPolicy::OnEveryChange.to_string(), "change");
    }

    #[test]
    fn test_reset_forgets_answers() {
        let mut calculator = Calculator::default();
        calculator.calculate(&["5"]);
        calculator.reset();
        calculator.calculate(&["ans(0)"]);
        assert!(calculator.results().get(0).unwrap().is_nan());
        assert_eq!(calculator.pass_count(), 1);
    }
}
