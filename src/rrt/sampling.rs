use crate::error::ConfigurationError;
use crate::goal::Goal;
use crate::space::StateSpace;
use crate::state::State;
use crate::util::real::{to_f64, Real};
use rand::{Rng, RngCore};

/// Where a steering target came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SampleSource {
    Goal,
    Space,
}

/// Draws steering targets uniformly over the space, or from the goal with probability `goal_bias`.
#[derive(Clone, Copy, Debug)]
pub struct GoalBiasedSampler<F> {
    goal_bias: F,
}

impl<F: Real> GoalBiasedSampler<F> {
    /// Constructs a sampler.
    ///
    /// Returns an error if `goal_bias` is not in [0, 1].
    pub fn new(goal_bias: F) -> Result<Self, ConfigurationError> {
        if !(goal_bias >= F::zero() && goal_bias <= F::one()) {
            return Err(ConfigurationError::InvalidGoalBias(to_f64(goal_bias)));
        }
        Ok(Self { goal_bias })
    }

    pub fn goal_bias(&self) -> F {
        self.goal_bias
    }

    /// Draws one steering target.
    ///
    /// One uniform number in `[0, 1)` is always consumed first, so the stream
    /// of random numbers does not depend on the outcome of the coin flip.
    pub fn sample(
        &self,
        space: &StateSpace<F>,
        goal: &dyn Goal<F>,
        rng: &mut dyn RngCore,
    ) -> (State<F>, SampleSource) {
        let coin: F = rng.gen_range(F::zero()..F::one());
        if coin < self.goal_bias {
            (goal.sample_goal(rng), SampleSource::Goal)
        } else {
            (space.sample_uniform(rng), SampleSource::Space)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::goal::GoalState;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::sync::Arc;

    fn setup() -> (Arc<StateSpace<f64>>, GoalState<f64>) {
        let space = Arc::new(StateSpace::real_vector(vec![(0.0, 10.0), (0.0, 10.0)]).unwrap());
        let goal = GoalState::new(space.clone(), State::real_vector(vec![9.0, 5.0]), 0.5).unwrap();
        (space, goal)
    }

    #[test]
    fn rejects_out_of_range_bias() {
        assert!(GoalBiasedSampler::new(-0.1).is_err());
        assert!(GoalBiasedSampler::new(1.5).is_err());
        assert!(GoalBiasedSampler::new(f64::NAN).is_err());
        assert!(GoalBiasedSampler::new(0.0).is_ok());
        assert!(GoalBiasedSampler::new(1.0).is_ok());
    }

    #[test]
    fn extreme_biases() {
        let (space, goal) = setup();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let always = GoalBiasedSampler::new(1.0).unwrap();
        let never = GoalBiasedSampler::new(0.0).unwrap();
        for _ in 0..200 {
            let (target, source) = always.sample(&space, &goal, &mut rng);
            assert_eq!(source, SampleSource::Goal);
            assert_eq!(&target, goal.target());
            assert_eq!(never.sample(&space, &goal, &mut rng).1, SampleSource::Space);
        }
    }

    #[test]
    fn bias_sets_the_goal_fraction() {
        let (space, goal) = setup();
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let sampler = GoalBiasedSampler::new(0.25).unwrap();
        let goal_draws = (0..4000)
            .filter(|_| sampler.sample(&space, &goal, &mut rng).1 == SampleSource::Goal)
            .count();
        assert!((800..1200).contains(&goal_draws), "{goal_draws}");
    }
}
