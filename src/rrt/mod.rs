pub mod neighbors;
pub mod rrt;
pub mod sampling;
pub mod termination;
pub mod tree;
pub mod validity_checker;

pub use neighbors::{LinearNearestNeighbors, NearestNeighbors};
pub use rrt::{PlannerStatus, RRT};
pub use sampling::{GoalBiasedSampler, SampleSource};
pub use termination::{MaxIterationsTermination, MaxTimeTermination, TerminationCondition};
pub use tree::{Node, Tree};
pub use validity_checker::{check_motion, AlwaysValid, UnionValidityChecker, ValidityChecker};
