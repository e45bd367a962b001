use crate::error::ConfigurationError;
use crate::goal::Goal;
use crate::space::StateSpace;
use crate::state::State;
use crate::util::Real;
use std::fmt;
use std::sync::Arc;

/// A planning problem: where to plan, where to start and where to go.
///
/// Immutable once constructed.
#[derive(Clone)]
pub struct ProblemDefinition<F: Real> {
    space: Arc<StateSpace<F>>,
    start: State<F>,
    goal: Arc<dyn Goal<F>>,
}

impl<F: Real> ProblemDefinition<F> {
    /// Constructs a problem, checking that `start` belongs to `space`.
    pub fn new(
        space: Arc<StateSpace<F>>,
        start: State<F>,
        goal: Arc<dyn Goal<F>>,
    ) -> Result<Self, ConfigurationError> {
        space.check_state(&start)?;
        Ok(Self { space, start, goal })
    }

    pub fn space(&self) -> &Arc<StateSpace<F>> {
        &self.space
    }

    pub fn start(&self) -> &State<F> {
        &self.start
    }

    pub fn goal(&self) -> &Arc<dyn Goal<F>> {
        &self.goal
    }
}

impl<F: Real> fmt::Debug for ProblemDefinition<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProblemDefinition")
            .field("space", &self.space)
            .field("start", &self.start)
            .finish_non_exhaustive()
    }
}
