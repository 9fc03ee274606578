//! Robbins-Monro step-size coercion
//!
//! After each accept/reject decision the host reports the log acceptance
//! probability back to the operator, which converts it into a signed step
//! via a decay schedule and nudges its scale factor toward the target
//! acceptance rate. The schedule is a seam: hosts with their own tuning
//! policy implement [`DeltaSchedule`]; [`CoercionSchedule`] is the shipped
//! default.

use std::fmt;

use crate::operators::OperatorError;

/// Per-iteration tuning-step schedule.
///
/// The contract: steps are larger early and shrink with the iteration
/// count, and the expected step is zero when proposals are accepted at the
/// target rate.
pub trait DeltaSchedule: fmt::Debug {
    /// Convert the log acceptance probability of the latest decision into
    /// a signed tuning step, advancing the schedule's internal clock.
    fn delta(&mut self, log_alpha: f64) -> f64;

    /// Acceptance rate the schedule steers toward.
    fn target_acceptance(&self) -> f64;
}

/// Default Robbins-Monro schedule:
/// `delta = (exp(min(log_alpha, 0)) - target) / count`.
#[derive(Debug, Clone, PartialEq)]
pub struct CoercionSchedule {
    target: f64,
    count: u64,
}

/// Canonical random-walk target acceptance probability.
pub const DEFAULT_TARGET_ACCEPTANCE: f64 = 0.234;

impl CoercionSchedule {
    /// Schedule steering toward the given target acceptance probability.
    pub fn new(target: f64) -> Result<Self, OperatorError> {
        if !(target > 0.0 && target < 1.0) {
            return Err(OperatorError::InvalidTargetAcceptance(target));
        }
        Ok(Self { target, count: 0 })
    }

    /// Iterations observed so far.
    pub fn count(&self) -> u64 {
        self.count
    }
}

impl Default for CoercionSchedule {
    fn default() -> Self {
        Self {
            target: DEFAULT_TARGET_ACCEPTANCE,
            count: 0,
        }
    }
}

impl DeltaSchedule for CoercionSchedule {
    fn delta(&mut self, log_alpha: f64) -> f64 {
        self.count += 1;
        (log_alpha.min(0.0).exp() - self.target) / self.count as f64
    }

    fn target_acceptance(&self) -> f64 {
        self.target
    }
}
