//! MCMC proposal operators
//!
//! [`IntervalPartition`] slices a time-ordered tree into coalescent
//! intervals and records which nodes move with each interval;
//! [`TauScaleOperator`] uses that partition (or a whole-subtree scan) to
//! propose multiplicative height perturbations with the matching log
//! Hastings ratio, and coerces its step size toward a target acceptance
//! rate via [`CoercionSchedule`].

mod coercion;
mod intervals;
mod tau_scale;

pub use coercion::{CoercionSchedule, DeltaSchedule};
pub use intervals::IntervalPartition;
pub use tau_scale::{ScaleMode, TauScaleConfig, TauScaleOperator};

use thiserror::Error;

/// Errors raised while constructing an operator.
///
/// Infeasible proposals are not errors: [`TauScaleOperator::propose`]
/// signals them by returning `f64::NEG_INFINITY`, which the host treats as
/// an automatic rejection.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OperatorError {
    /// Too few coalescent events to form a scalable interval
    #[error("interval scaling requires at least 2 internal nodes, tree has {0}")]
    TreeTooSmall(usize),

    /// Initial scale factor outside (0, ∞)
    #[error("scale factor must be positive and finite, got {0}")]
    InvalidScaleFactor(f64),

    /// Scale-factor bounds must satisfy 0 < lower <= upper < 1
    #[error("invalid scale-factor bounds [{lower}, {upper}]")]
    InvalidScaleBounds {
        /// Configured lower bound
        lower: f64,
        /// Configured upper bound
        upper: f64,
    },

    /// Target acceptance probability outside (0, 1)
    #[error("target acceptance probability must lie in (0, 1), got {0}")]
    InvalidTargetAcceptance(f64),
}
