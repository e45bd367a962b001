use crate::error::ConfigurationError;
use crate::space::StateSpace;
use crate::state::State;
use crate::util::Real;
use std::sync::Arc;

/// A nearest neighbor data structure over the states of a tree.
/// Stores states and a usize index along with them.
pub trait NearestNeighbors<F: Real> {
    /// Constructs a new, empty nearest neighbor data structure measuring distance in `space`.
    fn new(space: Arc<StateSpace<F>>) -> Self;

    /// Adds a state to the data structure.
    ///
    /// Parameters:
    /// - `state`: The state to add.
    /// - `item`: The index of the state.
    fn add(&mut self, state: State<F>, item: usize);

    /// Gets the nearest neighbor to the given state.
    ///
    /// On exact distance ties the earliest added item wins. States at a NaN
    /// distance are never returned.
    ///
    /// Returns:
    /// The item/index of the nearest neighbor, if any.
    fn nearest_one(&self, state: &State<F>) -> Result<Option<usize>, ConfigurationError>;

    /// Number of stored states.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A nearest neighbor data structure that uses a linear search to find the nearest neighbors.
pub struct LinearNearestNeighbors<F> {
    space: Arc<StateSpace<F>>,
    states: Vec<(State<F>, usize)>,
}

impl<F: Real> NearestNeighbors<F> for LinearNearestNeighbors<F> {
    fn new(space: Arc<StateSpace<F>>) -> Self {
        Self {
            space,
            states: Vec::new(),
        }
    }

    fn add(&mut self, state: State<F>, item: usize) {
        self.states.push((state, item));
    }

    fn nearest_one(&self, state: &State<F>) -> Result<Option<usize>, ConfigurationError> {
        let mut nearest: Option<(F, usize)> = None;
        for (candidate, item) in &self.states {
            let distance = self.space.distance(state, candidate)?;
            if distance.is_nan() {
                continue;
            }
            // strict comparison keeps the earliest entry on ties
            match nearest {
                Some((best, _)) if !(distance < best) => {}
                _ => nearest = Some((distance, *item)),
            }
        }
        Ok(nearest.map(|(_, item)| item))
    }

    fn len(&self) -> usize {
        self.states.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line() -> Arc<StateSpace<f64>> {
        Arc::new(StateSpace::real_vector(vec![(-10.0, 10.0)]).unwrap())
    }

    #[test]
    fn empty_index_has_no_nearest() {
        let nn = LinearNearestNeighbors::new(line());
        assert!(nn.is_empty());
        assert_eq!(nn.nearest_one(&State::real_vector(vec![0.0])), Ok(None));
    }

    #[test]
    fn finds_the_closest_state() {
        let mut nn = LinearNearestNeighbors::new(line());
        for (i, x) in [5.0, -3.0, 1.5, 8.0].into_iter().enumerate() {
            nn.add(State::real_vector(vec![x]), i);
        }
        assert_eq!(nn.len(), 4);
        assert_eq!(nn.nearest_one(&State::real_vector(vec![1.0])), Ok(Some(2)));
        assert_eq!(nn.nearest_one(&State::real_vector(vec![9.9])), Ok(Some(3)));
    }

    #[test]
    fn ties_prefer_the_earliest_insert() {
        let mut nn = LinearNearestNeighbors::new(line());
        nn.add(State::real_vector(vec![1.0]), 0);
        nn.add(State::real_vector(vec![-1.0]), 1);
        nn.add(State::real_vector(vec![1.0]), 2);
        assert_eq!(nn.nearest_one(&State::real_vector(vec![0.0])), Ok(Some(0)));
    }

    #[test]
    fn nan_distances_are_skipped() {
        let mut nn = LinearNearestNeighbors::new(line());
        nn.add(State::real_vector(vec![f64::NAN]), 0);
        nn.add(State::real_vector(vec![4.0]), 1);
        nn.add(State::real_vector(vec![2.0]), 2);
        assert_eq!(nn.nearest_one(&State::real_vector(vec![0.0])), Ok(Some(2)));
        assert_eq!(nn.nearest_one(&State::real_vector(vec![f64::NAN])), Ok(None));
    }

    #[test]
    fn shape_mismatch_propagates() {
        let mut nn = LinearNearestNeighbors::new(line());
        nn.add(State::real_vector(vec![1.0]), 0);
        assert!(nn.nearest_one(&State::real_vector(vec![1.0, 2.0])).is_err());
    }
}
