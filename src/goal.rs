use crate::error::ConfigurationError;
use crate::space::StateSpace;
use crate::state::State;
use crate::util::real::{to_f64, Real};
use rand::RngCore;
use std::sync::Arc;

/// The acceptance region of a planning problem.
///
/// Implementations are supplied by the caller. The planner calls `is_satisfied`
/// on every new tree node, so it must be a cheap, side-effect free predicate.
pub trait Goal<F: Real> {
    /// Checks whether a state is acceptable as the end of a path.
    fn is_satisfied(&self, state: &State<F>) -> bool;

    /// How far a state is from the acceptance region.
    ///
    /// Zero for every state that satisfies the goal. The planner only uses it
    /// to report progress, so an estimate is fine as long as it shrinks as
    /// states get closer.
    fn distance_goal(&self, state: &State<F>) -> F;

    /// Draws a target state from (or near) the acceptance region.
    ///
    /// The sample does not have to satisfy the goal; the planner steers
    /// towards it and validity-checks the result like any other sample.
    fn sample_goal(&self, rng: &mut dyn RngCore) -> State<F>;
}

/// A goal satisfied by any state within `threshold` of a single target state.
#[derive(Clone, Debug)]
pub struct GoalState<F> {
    space: Arc<StateSpace<F>>,
    target: State<F>,
    threshold: F,
}

impl<F: Real> GoalState<F> {
    /// Constructs a goal around `target`.
    ///
    /// Fails if `target` does not belong to `space` or `threshold` is negative or not finite.
    pub fn new(
        space: Arc<StateSpace<F>>,
        target: State<F>,
        threshold: F,
    ) -> Result<Self, ConfigurationError> {
        space.check_state(&target)?;
        if !threshold.is_finite() || threshold < F::zero() {
            return Err(ConfigurationError::InvalidGoalThreshold(to_f64(threshold)));
        }
        Ok(Self {
            space,
            target,
            threshold,
        })
    }

    pub fn target(&self) -> &State<F> {
        &self.target
    }

    pub fn threshold(&self) -> F {
        self.threshold
    }
}

impl<F: Real> Goal<F> for GoalState<F> {
    fn is_satisfied(&self, state: &State<F>) -> bool {
        self.space
            .distance(state, &self.target)
            .map_or(false, |d| d <= self.threshold)
    }

    /// Distance to the edge of the ball around the target, or infinity for a
    /// state of the wrong shape.
    fn distance_goal(&self, state: &State<F>) -> F {
        self.space
            .distance(state, &self.target)
            .map_or(F::infinity(), |d| (d - self.threshold).max(F::zero()))
    }

    fn sample_goal(&self, _rng: &mut dyn RngCore) -> State<F> {
        self.target.clone()
    }
}
