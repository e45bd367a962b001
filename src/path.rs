use crate::error::ConfigurationError;
use crate::space::StateSpace;
use crate::state::State;
use crate::util::Real;
use json::JsonValue;
use serde::{Deserialize, Serialize};

/// An ordered sequence of states from the start to a goal-satisfying state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "F: Real + Deserialize<'de>"))]
pub struct Path<F> {
    states: Vec<State<F>>,
}

impl<F: Real> Path<F> {
    pub(crate) fn new(states: Vec<State<F>>) -> Self {
        Self { states }
    }

    pub fn states(&self) -> &[State<F>] {
        &self.states
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn first(&self) -> Option<&State<F>> {
        self.states.first()
    }

    pub fn last(&self) -> Option<&State<F>> {
        self.states.last()
    }

    pub fn into_states(self) -> Vec<State<F>> {
        self.states
    }

    /// Sum of the distances between consecutive states.
    pub fn length(&self, space: &StateSpace<F>) -> Result<F, ConfigurationError> {
        self.states.windows(2).try_fold(F::zero(), |acc, pair| {
            Ok(acc + space.distance(&pair[0], &pair[1])?)
        })
    }

    /// Serializes the path as `{"states": [...]}`.
    pub fn to_json(&self) -> JsonValue {
        let states = JsonValue::Array(self.states.iter().map(State::to_json).collect());
        json::object! { states: states }
    }
}
