//! Interval-scaling tree-height proposal
//!
//! Each call draws a multiplicative factor `s = f + u·(1/f − f)` with
//! `u ~ U[0,1)` and either rescales one coalescent interval (shifting every
//! node mapped to it by the same offset) or multiplies every height at or
//! above a randomly chosen internal node. The returned value is the log
//! Hastings ratio; `NEG_INFINITY` marks an infeasible proposal the host
//! rejects outright.
//!
//! The operator mutates node heights in place. On rejection the host
//! restores the previous heights; see [`TimeTree::snapshot_heights`].

use rand::Rng;
use tracing::{debug, trace};

use crate::operators::{
    CoercionSchedule, DeltaSchedule, IntervalPartition, OperatorError,
};
use crate::tree::TimeTree;

/// Which flavor of height scaling the operator performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScaleMode {
    /// Pick one coalescent interval and rescale its duration (default)
    #[default]
    OneInterval,

    /// Pick an internal node and multiply every height at or above it
    SubtreeAbove,
}

/// Configuration surface of [`TauScaleOperator`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TauScaleConfig {
    /// Initial tunable scale factor; values nearer 0 give bolder proposals
    pub scale_factor: f64,

    /// Proposal flavor
    pub mode: ScaleMode,

    /// Enable the coercion hook ([`TauScaleOperator::optimize`])
    pub optimise: bool,

    /// Lower clamp for the tuned scale factor
    pub lower: f64,

    /// Upper clamp for the tuned scale factor
    pub upper: f64,
}

impl Default for TauScaleConfig {
    fn default() -> Self {
        Self {
            scale_factor: 1.0,
            mode: ScaleMode::OneInterval,
            optimise: true,
            lower: 1e-8,
            upper: 1.0 - 1e-8,
        }
    }
}

/// Mode-specific state: the partition exists only for interval scaling.
#[derive(Debug, Clone)]
enum ModeState {
    OneInterval(IntervalPartition),
    SubtreeAbove,
}

/// Scales one intercoalescent interval, or every node height above a node
/// chosen at random.
///
/// Single-threaded by contract: `propose` and `optimize` are called
/// strictly in alternation by the host loop, never concurrently.
#[derive(Debug)]
pub struct TauScaleOperator {
    state: ModeState,
    scale_factor: f64,
    lower: f64,
    upper: f64,
    optimise: bool,
    schedule: Box<dyn DeltaSchedule>,
    accepted: u64,
    rejected: u64,
}

impl TauScaleOperator {
    /// Build the operator for a tree, with the default coercion schedule.
    ///
    /// In [`ScaleMode::OneInterval`] this derives the interval partition
    /// from the tree's current heights; the partition stays valid across
    /// height-only proposals and must be rebuilt (by constructing a new
    /// operator) if the host changes the topology.
    pub fn new(config: TauScaleConfig, tree: &TimeTree) -> Result<Self, OperatorError> {
        Self::with_schedule(config, tree, Box::new(CoercionSchedule::default()))
    }

    /// Build the operator with a host-supplied tuning schedule.
    pub fn with_schedule(
        config: TauScaleConfig,
        tree: &TimeTree,
        schedule: Box<dyn DeltaSchedule>,
    ) -> Result<Self, OperatorError> {
        if !(config.scale_factor.is_finite() && config.scale_factor > 0.0) {
            return Err(OperatorError::InvalidScaleFactor(config.scale_factor));
        }
        if !(config.lower > 0.0 && config.lower <= config.upper && config.upper < 1.0) {
            return Err(OperatorError::InvalidScaleBounds {
                lower: config.lower,
                upper: config.upper,
            });
        }

        let state = match config.mode {
            ScaleMode::OneInterval => ModeState::OneInterval(IntervalPartition::build(tree)?),
            ScaleMode::SubtreeAbove => {
                if tree.internal_count() == 0 {
                    return Err(OperatorError::TreeTooSmall(0));
                }
                ModeState::SubtreeAbove
            }
        };

        Ok(Self {
            state,
            scale_factor: config.scale_factor,
            lower: config.lower,
            upper: config.upper,
            optimise: config.optimise,
            schedule,
            accepted: 0,
            rejected: 0,
        })
    }

    /// Draw a scale factor `s = f + u·(1/f − f)`.
    ///
    /// For `f < 1` the draw is log-symmetric around 1, covering both
    /// expansions and contractions with proposal-density ratio `1/s`.
    fn draw_scaler<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let f = self.scale_factor;
        f + rng.gen::<f64>() * (1.0 / f - f)
    }

    /// Propose a new set of node heights, mutating the tree in place.
    ///
    /// Returns the log Hastings ratio; `f64::NEG_INFINITY` signals an
    /// infeasible proposal (automatic rejection, heights untouched).
    pub fn propose<R: Rng + ?Sized>(&mut self, tree: &mut TimeTree, rng: &mut R) -> f64 {
        let scale = self.draw_scaler(rng);

        match &self.state {
            ModeState::OneInterval(partition) => {
                let index = rng.gen_range(0..partition.interval_count());
                let old_duration = partition.duration(index, tree);
                let shift = scale * old_duration - old_duration;

                for &node in partition.node_set(index) {
                    let height = tree.height(node);
                    tree.set_height(node, height + shift);
                }
                trace!(index, scale, shift, "scaled interval");

                // One multiplicative dimension: Jacobian gives -ln s
                -scale.ln()
            }
            ModeState::SubtreeAbove => {
                let node = tree.leaf_count() + rng.gen_range(0..tree.internal_count());
                let node_height = tree.height(node);
                let new_height = node_height * scale;

                // Pushing the chosen node below its children is infeasible
                let floor = tree.max_child_height(node).unwrap_or(0.0);
                if new_height < floor {
                    trace!(node, scale, floor, "infeasible subtree scale");
                    return f64::NEG_INFINITY;
                }

                let mut moved = 0_u64;
                for id in tree.internal_ids() {
                    let height = tree.height(id);
                    if height >= node_height {
                        tree.set_height(id, height * scale);
                        moved += 1;
                    }
                }
                trace!(node, scale, moved, "scaled subtree above node");

                // Exponent counts the heights actually rescaled
                scale.ln() * (moved as f64 - 2.0)
            }
        }
    }

    /// Coerce the scale factor toward the target acceptance rate.
    ///
    /// `log_alpha` is the log acceptance probability of the most recent
    /// decision, reported post hoc by the host. The logistic transform
    /// keeps the factor inside `(0, 1)` before the configured clamp.
    pub fn optimize(&mut self, log_alpha: f64) {
        if !self.optimise {
            return;
        }
        let mut delta = self.schedule.delta(log_alpha);
        delta += (1.0 / self.scale_factor - 1.0).ln();
        self.set_scale_factor(1.0 / (delta.exp() + 1.0));
        debug!(log_alpha, scale_factor = self.scale_factor, "coerced scale factor");
    }

    /// Record an accepted proposal.
    pub fn accepted(&mut self) {
        self.accepted += 1;
    }

    /// Record a rejected proposal.
    pub fn rejected(&mut self) {
        self.rejected += 1;
    }

    /// Cumulative (accepted, rejected) counts.
    pub fn decision_counts(&self) -> (u64, u64) {
        (self.accepted, self.rejected)
    }

    /// Current tunable scale factor.
    pub fn scale_factor(&self) -> f64 {
        self.scale_factor
    }

    /// Set the scale factor, clamped to the configured bounds.
    pub fn set_scale_factor(&mut self, value: f64) {
        self.scale_factor = value.clamp(self.lower, self.upper);
    }

    /// Number of scalable intervals, when in interval mode.
    pub fn interval_count(&self) -> Option<usize> {
        match &self.state {
            ModeState::OneInterval(partition) => Some(partition.interval_count()),
            ModeState::SubtreeAbove => None,
        }
    }

    /// The interval partition backing interval mode.
    pub fn partition(&self) -> Option<&IntervalPartition> {
        match &self.state {
            ModeState::OneInterval(partition) => Some(partition),
            ModeState::SubtreeAbove => None,
        }
    }

    /// Advisory tuning hint from the cumulative accept/reject record.
    ///
    /// Emits a suggestion only when the observed acceptance rate leaves
    /// the [0.10, 0.40] window; never mutates state, never fails.
    pub fn performance_suggestion(&self) -> Option<String> {
        let total = self.accepted + self.rejected;
        if total == 0 {
            return None;
        }
        let rate = self.accepted as f64 / total as f64;
        let ratio = (rate / self.schedule.target_acceptance()).clamp(0.5, 2.0);
        let suggested = self.scale_factor.powf(ratio);

        if rate < 0.10 || rate > 0.40 {
            Some(format!(
                "Try setting the scale factor to about {:.3}",
                suggested
            ))
        } else {
            None
        }
    }
}
