//! State spaces: the metric and topology of configurations.
//!
//! [`StateSpace`] is a closed set of variants. Every operation checks that its
//! operands have the shape the space declares and reports a
//! [`ConfigurationError`] otherwise.

pub mod compound;
pub mod real_vector;
pub mod so2;
pub mod so3;

pub use compound::CompoundStateSpace;
pub use real_vector::RealVectorStateSpace;
pub use so2::SO2StateSpace;
pub use so3::SO3StateSpace;

use crate::error::ConfigurationError;
use crate::state::{SO3State, State};
use crate::util::Real;
use rand::RngCore;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "F: Real + Deserialize<'de>"))]
pub enum StateSpace<F> {
    RealVector(RealVectorStateSpace<F>),
    SO2(SO2StateSpace<F>),
    SO3(SO3StateSpace<F>),
    Compound(CompoundStateSpace<F>),
}

impl<F: Real> StateSpace<F> {
    pub fn real_vector(bounds: Vec<(F, F)>) -> Result<Self, ConfigurationError> {
        RealVectorStateSpace::new(bounds).map(StateSpace::RealVector)
    }

    pub fn so2() -> Self {
        StateSpace::SO2(SO2StateSpace::new())
    }

    /// The arc running counterclockwise from `min` to `max`.
    pub fn so2_bounded(min: F, max: F) -> Result<Self, ConfigurationError> {
        SO2StateSpace::bounded(min, max).map(StateSpace::SO2)
    }

    pub fn so3() -> Self {
        StateSpace::SO3(SO3StateSpace::new())
    }

    /// Rotations within `max_angle` of `center` under the quaternion metric.
    pub fn so3_bounded(center: SO3State<F>, max_angle: F) -> Result<Self, ConfigurationError> {
        SO3StateSpace::bounded(center, max_angle).map(StateSpace::SO3)
    }

    pub fn compound(
        components: Vec<StateSpace<F>>,
        weights: Vec<F>,
    ) -> Result<Self, ConfigurationError> {
        CompoundStateSpace::new(components, weights).map(StateSpace::Compound)
    }

    /// Planar poses: R² position (weight 1) followed by SO(2) heading.
    pub fn se2(
        x_bounds: (F, F),
        y_bounds: (F, F),
        rotation_weight: F,
    ) -> Result<Self, ConfigurationError> {
        Self::compound(
            vec![Self::real_vector(vec![x_bounds, y_bounds])?, Self::so2()],
            vec![F::one(), rotation_weight],
        )
    }

    /// Spatial poses: R³ position (weight 1) followed by an SO(3) orientation.
    pub fn se3(
        x_bounds: (F, F),
        y_bounds: (F, F),
        z_bounds: (F, F),
        rotation_weight: F,
    ) -> Result<Self, ConfigurationError> {
        Self::compound(
            vec![
                Self::real_vector(vec![x_bounds, y_bounds, z_bounds])?,
                Self::so3(),
            ],
            vec![F::one(), rotation_weight],
        )
    }

    /// The name of the variant, used in shape mismatch errors.
    pub fn kind(&self) -> &'static str {
        match self {
            StateSpace::RealVector(_) => "RealVector",
            StateSpace::SO2(_) => "SO2",
            StateSpace::SO3(_) => "SO3",
            StateSpace::Compound(_) => "Compound",
        }
    }

    /// Checks that `state` has this space's shape.
    pub fn check_state(&self, state: &State<F>) -> Result<(), ConfigurationError> {
        match (self, state) {
            (StateSpace::RealVector(space), State::RealVector(s)) => space.check_state(s),
            (StateSpace::SO2(_), State::SO2(_)) => Ok(()),
            (StateSpace::SO3(_), State::SO3(_)) => Ok(()),
            (StateSpace::Compound(space), State::Compound(s)) => space.check_state(s),
            _ => Err(self.variant_mismatch(state)),
        }
    }

    /// Distance under this space's metric. Symmetric and non-negative.
    pub fn distance(&self, a: &State<F>, b: &State<F>) -> Result<F, ConfigurationError> {
        match (self, a, b) {
            (StateSpace::RealVector(space), State::RealVector(a), State::RealVector(b)) => {
                space.distance(a, b)
            }
            (StateSpace::SO2(space), State::SO2(a), State::SO2(b)) => Ok(space.distance(a, b)),
            (StateSpace::SO3(space), State::SO3(a), State::SO3(b)) => Ok(space.distance(a, b)),
            (StateSpace::Compound(space), State::Compound(a), State::Compound(b)) => {
                space.distance(a, b)
            }
            _ => Err(self.operand_mismatch(a, b)),
        }
    }

    /// The state a fraction `t` of the way from `a` to `b`.
    ///
    /// `t` is clamped to `[0, 1]`, and the endpoints are returned exactly.
    pub fn interpolate(&self, a: &State<F>, b: &State<F>, t: F) -> Result<State<F>, ConfigurationError> {
        self.check_state(a)?;
        self.check_state(b)?;
        if !(t > F::zero()) {
            return Ok(a.clone());
        }
        if t >= F::one() {
            return Ok(b.clone());
        }
        match (self, a, b) {
            (StateSpace::RealVector(space), State::RealVector(a), State::RealVector(b)) => {
                space.interpolate(a, b, t).map(State::RealVector)
            }
            (StateSpace::SO2(space), State::SO2(a), State::SO2(b)) => {
                Ok(State::SO2(space.interpolate(a, b, t)))
            }
            (StateSpace::SO3(space), State::SO3(a), State::SO3(b)) => {
                Ok(State::SO3(space.interpolate(a, b, t)))
            }
            (StateSpace::Compound(space), State::Compound(a), State::Compound(b)) => {
                space.interpolate(a, b, t).map(State::Compound)
            }
            _ => Err(self.operand_mismatch(a, b)),
        }
    }

    /// Draws a state uniformly over the space's support.
    pub fn sample_uniform(&self, rng: &mut dyn RngCore) -> State<F> {
        match self {
            StateSpace::RealVector(space) => State::RealVector(space.sample_uniform(rng)),
            StateSpace::SO2(space) => State::SO2(space.sample_uniform(rng)),
            StateSpace::SO3(space) => State::SO3(space.sample_uniform(rng)),
            StateSpace::Compound(space) => State::Compound(space.sample_uniform(rng)),
        }
    }

    /// Whether `state` has this space's shape and lies within its bounds.
    pub fn satisfies_bounds(&self, state: &State<F>) -> bool {
        match (self, state) {
            (StateSpace::RealVector(space), State::RealVector(s)) => space.satisfies_bounds(s),
            (StateSpace::SO2(space), State::SO2(s)) => space.satisfies_bounds(s),
            (StateSpace::SO3(space), State::SO3(s)) => space.satisfies_bounds(s),
            (StateSpace::Compound(space), State::Compound(s)) => space.satisfies_bounds(s),
            _ => false,
        }
    }

    /// Moves `state` to the nearest point within bounds.
    pub fn enforce_bounds(&self, state: &mut State<F>) -> Result<(), ConfigurationError> {
        let found = state.kind();
        match (self, state) {
            (StateSpace::RealVector(space), State::RealVector(s)) => space.enforce_bounds(s),
            (StateSpace::SO2(space), State::SO2(s)) => {
                space.enforce_bounds(s);
                Ok(())
            }
            (StateSpace::SO3(space), State::SO3(s)) => {
                space.enforce_bounds(s);
                Ok(())
            }
            (StateSpace::Compound(space), State::Compound(s)) => space.enforce_bounds(s),
            _ => Err(ConfigurationError::VariantMismatch {
                expected: self.kind(),
                found,
            }),
        }
    }

    /// Upper bound on the distance between any two states of the space.
    pub fn maximum_extent(&self) -> F {
        match self {
            StateSpace::RealVector(space) => space.maximum_extent(),
            StateSpace::SO2(space) => space.maximum_extent(),
            StateSpace::SO3(space) => space.maximum_extent(),
            StateSpace::Compound(space) => space.maximum_extent(),
        }
    }

    fn variant_mismatch(&self, state: &State<F>) -> ConfigurationError {
        ConfigurationError::VariantMismatch {
            expected: self.kind(),
            found: state.kind(),
        }
    }

    fn operand_mismatch(&self, a: &State<F>, b: &State<F>) -> ConfigurationError {
        match self.check_state(a) {
            Err(err) => err,
            Ok(()) => self.variant_mismatch(b),
        }
    }
}
