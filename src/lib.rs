//! Sampling-based motion planning with Rapidly-exploring Random Trees.
//!
//! A planning problem combines a [`StateSpace`] (Euclidean, rotational or a
//! weighted compound of both), a start [`State`] and a [`Goal`]. The [`RRT`]
//! planner grows a tree from the start through states accepted by a caller
//! supplied [`ValidityChecker`] until a node satisfies the goal.
//!
//! ```
//! use rrt_motion::{GoalState, ProblemDefinition, RRTConfig, State, StateSpace, RRT};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let space = Arc::new(StateSpace::real_vector(vec![(0.0, 10.0), (0.0, 10.0)]).unwrap());
//! let goal = GoalState::new(space.clone(), State::real_vector(vec![9.0, 5.0]), 0.5).unwrap();
//! let start = State::real_vector(vec![1.0, 5.0]);
//! let problem = Arc::new(ProblemDefinition::new(space, start, Arc::new(goal)).unwrap());
//!
//! let mut rrt: RRT<f64> = RRT::new(RRTConfig::default().with_seed(7)).unwrap();
//! rrt.setup(problem, Box::new(|_: &State<f64>| true)).unwrap();
//! let path = rrt.solve(Duration::from_secs(5)).unwrap();
//! assert_eq!(path.first(), Some(&State::real_vector(vec![1.0, 5.0])));
//! ```

pub mod config;
pub mod error;
pub mod goal;
pub mod path;
pub mod problem;
pub mod rrt;
pub mod space;
pub mod state;
pub mod util;

pub use config::RRTConfig;
pub use error::{ConfigFileError, ConfigurationError, PlanningError};
pub use goal::{Goal, GoalState};
pub use path::Path;
pub use problem::ProblemDefinition;
pub use rrt::{
    AlwaysValid, MaxIterationsTermination, MaxTimeTermination, PlannerStatus, TerminationCondition,
    UnionValidityChecker, ValidityChecker, RRT,
};
pub use space::{CompoundStateSpace, RealVectorStateSpace, SO2StateSpace, SO3StateSpace, StateSpace};
pub use state::{CompoundState, RealVectorState, SO2State, SO3State, State};
pub use util::Real;
