use crate::error::ConfigurationError;
use crate::space::StateSpace;
use crate::state::{CompoundState, State};
use crate::util::real::{to_f64, Real};
use rand::RngCore;
use serde::{Deserialize, Serialize};

/// A product of component spaces with a weighted Euclidean combination of their metrics.
///
/// Components and weights are fixed once constructed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Components<F>", bound(deserialize = "F: Real + Deserialize<'de>"))]
pub struct CompoundStateSpace<F> {
    components: Vec<StateSpace<F>>,
    weights: Vec<F>,
}

#[derive(Deserialize)]
#[serde(bound(deserialize = "F: Real + Deserialize<'de>"))]
struct Components<F> {
    components: Vec<StateSpace<F>>,
    weights: Vec<F>,
}

impl<F: Real> TryFrom<Components<F>> for CompoundStateSpace<F> {
    type Error = ConfigurationError;

    fn try_from(raw: Components<F>) -> Result<Self, Self::Error> {
        Self::new(raw.components, raw.weights)
    }
}

impl<F: Real> CompoundStateSpace<F> {
    /// Constructs a compound space.
    ///
    /// Parameters:
    /// - `components`: The component spaces, in state order.
    /// - `weights`: One finite, non-negative weight per component.
    pub fn new(components: Vec<StateSpace<F>>, weights: Vec<F>) -> Result<Self, ConfigurationError> {
        if components.is_empty() {
            return Err(ConfigurationError::EmptyCompound);
        }
        if components.len() != weights.len() {
            return Err(ConfigurationError::WeightCountMismatch {
                spaces: components.len(),
                weights: weights.len(),
            });
        }
        if let Some((index, &weight)) = weights
            .iter()
            .enumerate()
            .find(|(_, w)| !w.is_finite() || **w < F::zero())
        {
            return Err(ConfigurationError::InvalidWeight {
                index,
                weight: to_f64(weight),
            });
        }
        Ok(Self {
            components,
            weights,
        })
    }

    pub fn components(&self) -> &[StateSpace<F>] {
        &self.components
    }

    pub fn weights(&self) -> &[F] {
        &self.weights
    }

    pub fn check_state(&self, state: &CompoundState<F>) -> Result<(), ConfigurationError> {
        if state.len() != self.components.len() {
            return Err(ConfigurationError::ComponentCountMismatch {
                expected: self.components.len(),
                found: state.len(),
            });
        }
        self.components
            .iter()
            .zip(state.components())
            .try_for_each(|(space, component)| space.check_state(component))
    }

    /// `sqrt(Σ w_i · d_i(a_i, b_i)²)`
    pub fn distance(
        &self,
        a: &CompoundState<F>,
        b: &CompoundState<F>,
    ) -> Result<F, ConfigurationError> {
        self.check_state(a)?;
        self.check_state(b)?;
        let mut sum = F::zero();
        for (i, space) in self.components.iter().enumerate() {
            let d = space.distance(&a.components()[i], &b.components()[i])?;
            sum = sum + self.weights[i] * d * d;
        }
        Ok(sum.sqrt())
    }

    pub fn interpolate(
        &self,
        a: &CompoundState<F>,
        b: &CompoundState<F>,
        t: F,
    ) -> Result<CompoundState<F>, ConfigurationError> {
        self.check_state(a)?;
        self.check_state(b)?;
        let components = self
            .components
            .iter()
            .zip(a.components().iter().zip(b.components()))
            .map(|(space, (from, to))| space.interpolate(from, to, t))
            .collect::<Result<Vec<State<F>>, _>>()?;
        Ok(CompoundState::new(components))
    }

    pub fn sample_uniform(&self, rng: &mut dyn RngCore) -> CompoundState<F> {
        CompoundState::new(
            self.components
                .iter()
                .map(|space| space.sample_uniform(&mut *rng))
                .collect(),
        )
    }

    pub fn satisfies_bounds(&self, state: &CompoundState<F>) -> bool {
        state.len() == self.components.len()
            && self
                .components
                .iter()
                .zip(state.components())
                .all(|(space, component)| space.satisfies_bounds(component))
    }

    pub fn enforce_bounds(&self, state: &mut CompoundState<F>) -> Result<(), ConfigurationError> {
        self.check_state(state)?;
        for (space, component) in self.components.iter().zip(state.components_mut()) {
            space.enforce_bounds(component)?;
        }
        Ok(())
    }

    pub fn maximum_extent(&self) -> F {
        self.components
            .iter()
            .zip(&self.weights)
            .fold(F::zero(), |acc, (space, &w)| {
                let extent = space.maximum_extent();
                acc + w * extent * extent
            })
            .sqrt()
    }
}
