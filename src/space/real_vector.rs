use crate::error::ConfigurationError;
use crate::state::RealVectorState;
use crate::util::real::{to_f64, Real};
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

/// A bounded `d`-dimensional Euclidean space.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Bounds<F>", bound(deserialize = "F: Real + Deserialize<'de>"))]
pub struct RealVectorStateSpace<F> {
    bounds: Vec<(F, F)>,
}

#[derive(Deserialize)]
struct Bounds<F> {
    bounds: Vec<(F, F)>,
}

impl<F: Real> TryFrom<Bounds<F>> for RealVectorStateSpace<F> {
    type Error = ConfigurationError;

    fn try_from(raw: Bounds<F>) -> Result<Self, Self::Error> {
        Self::new(raw.bounds)
    }
}

impl<F: Real> RealVectorStateSpace<F> {
    /// Constructs a space with one `(min, max)` pair per dimension.
    ///
    /// Every pair must be finite with `min < max`, and `max - min` must not overflow.
    pub fn new(bounds: Vec<(F, F)>) -> Result<Self, ConfigurationError> {
        if bounds.is_empty() {
            return Err(ConfigurationError::ZeroDimension);
        }
        for (dimension, &(min, max)) in bounds.iter().enumerate() {
            if !min.is_finite() || !max.is_finite() || min >= max || !(max - min).is_finite() {
                return Err(ConfigurationError::InvalidBounds {
                    dimension,
                    min: to_f64(min),
                    max: to_f64(max),
                });
            }
        }
        Ok(Self { bounds })
    }

    pub fn dimension(&self) -> usize {
        self.bounds.len()
    }

    pub fn bounds(&self) -> &[(F, F)] {
        &self.bounds
    }

    pub fn check_state(&self, state: &RealVectorState<F>) -> Result<(), ConfigurationError> {
        if state.dimension() != self.dimension() {
            return Err(ConfigurationError::DimensionMismatch {
                expected: self.dimension(),
                found: state.dimension(),
            });
        }
        Ok(())
    }

    pub fn distance(
        &self,
        a: &RealVectorState<F>,
        b: &RealVectorState<F>,
    ) -> Result<F, ConfigurationError> {
        self.check_state(a)?;
        self.check_state(b)?;
        Ok(a.euclidean_distance(b))
    }

    /// Linear blend `a + t (b - a)`. `t` is expected in `[0, 1]`.
    pub fn interpolate(
        &self,
        a: &RealVectorState<F>,
        b: &RealVectorState<F>,
        t: F,
    ) -> Result<RealVectorState<F>, ConfigurationError> {
        self.check_state(a)?;
        self.check_state(b)?;
        let values = a
            .values()
            .iter()
            .zip(b.values())
            .map(|(&from, &to)| from + (to - from) * t)
            .collect();
        Ok(RealVectorState::new(values))
    }

    /// Draws each coordinate independently and uniformly within its bounds.
    pub fn sample_uniform(&self, rng: &mut dyn RngCore) -> RealVectorState<F> {
        let values = self
            .bounds
            .iter()
            .map(|&(min, max)| rng.gen_range(min..max))
            .collect();
        RealVectorState::new(values)
    }

    pub fn satisfies_bounds(&self, state: &RealVectorState<F>) -> bool {
        state.dimension() == self.dimension()
            && state
                .values()
                .iter()
                .zip(&self.bounds)
                .all(|(&x, &(min, max))| x >= min && x <= max)
    }

    /// Clamps every coordinate into its bounds.
    pub fn enforce_bounds(&self, state: &mut RealVectorState<F>) -> Result<(), ConfigurationError> {
        self.check_state(state)?;
        for (i, &(min, max)) in self.bounds.iter().enumerate() {
            state[i] = state[i].max(min).min(max);
        }
        Ok(())
    }

    /// Length of the diagonal of the bounding box.
    pub fn maximum_extent(&self) -> F {
        self.bounds
            .iter()
            .fold(F::zero(), |acc, &(min, max)| acc + (max - min) * (max - min))
            .sqrt()
    }
}
