use crate::error::ConfigurationError;
use crate::space::StateSpace;
use crate::state::State;
use crate::util::real::{to_f64, Real};
use num_traits::ToPrimitive;

/// Checks if a state is valid (i.e., not in collision).
///
/// Implemented by the host application. Closures `Fn(&State<F>) -> bool` implement it directly.
pub trait ValidityChecker<F: Real> {
    /// Checks if a state is valid (i.e., does not collide with obstacles).
    ///
    /// Parameters:
    /// - `state`: The state to check.
    ///
    /// Returns:
    /// Whether the state is valid.
    fn is_state_valid(&self, state: &State<F>) -> bool;
}

impl<F: Real, T> ValidityChecker<F> for T
where
    T: Fn(&State<F>) -> bool,
{
    fn is_state_valid(&self, state: &State<F>) -> bool {
        self(state)
    }
}

/// A simple validity checker that always returns true (i.e., all states are valid).
#[derive(Clone, Copy, Debug, Default)]
pub struct AlwaysValid;

impl AlwaysValid {
    /// Constructs a new AlwaysValid.
    pub fn new() -> Self {
        Self
    }
}

impl<F: Real> ValidityChecker<F> for AlwaysValid {
    fn is_state_valid(&self, _state: &State<F>) -> bool {
        true
    }
}

/// A validity checker that takes the union of multiple validity checkers.
/// If any of the checkers return false, the state is considered invalid.
pub struct UnionValidityChecker<F: Real> {
    checkers: Vec<Box<dyn ValidityChecker<F>>>,
}

impl<F: Real> UnionValidityChecker<F> {
    /// Constructs a new UnionValidityChecker with an empty list of checkers.
    pub fn new() -> Self {
        Self {
            checkers: Vec::new(),
        }
    }

    /// Adds a new validity checker to the union.
    ///
    /// Parameters:
    /// - `checker`: The validity checker to add.
    pub fn add_checker(&mut self, checker: Box<dyn ValidityChecker<F>>) {
        self.checkers.push(checker);
    }
}

impl<F: Real> Default for UnionValidityChecker<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Real> ValidityChecker<F> for UnionValidityChecker<F> {
    fn is_state_valid(&self, state: &State<F>) -> bool {
        self.checkers
            .iter()
            .all(|checker| checker.is_state_valid(state))
    }
}

/// Checks the states strictly between `from` and `to`, spaced at most `resolution` apart.
///
/// The endpoints are not checked. Returns false at the first invalid state, and
/// `ConfigurationError::InvalidResolution` unless `resolution` is finite and positive.
pub fn check_motion<F: Real>(
    space: &StateSpace<F>,
    checker: &dyn ValidityChecker<F>,
    from: &State<F>,
    to: &State<F>,
    resolution: F,
) -> Result<bool, ConfigurationError> {
    if !resolution.is_finite() || resolution <= F::zero() {
        return Err(ConfigurationError::InvalidResolution(to_f64(resolution)));
    }
    let distance = space.distance(from, to)?;
    let steps = (distance / resolution).ceil().to_usize().unwrap_or(usize::MAX);
    if steps <= 1 {
        return Ok(true);
    }
    let steps_f = F::from(steps).unwrap_or_else(F::max_value);
    for i in 1..steps {
        let t = F::from(i).unwrap_or_else(F::zero) / steps_f;
        if !checker.is_state_valid(&space.interpolate(from, to, t)?) {
            return Ok(false);
        }
    }
    Ok(true)
}
