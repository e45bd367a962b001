use crate::config::RRTConfig;
use crate::error::{ConfigurationError, PlanningError};
use crate::path::Path;
use crate::problem::ProblemDefinition;
use crate::rrt::neighbors::{LinearNearestNeighbors, NearestNeighbors};
use crate::rrt::sampling::GoalBiasedSampler;
use crate::rrt::termination::{MaxTimeTermination, TerminationCondition};
use crate::rrt::tree::Tree;
use crate::rrt::validity_checker::{check_motion, ValidityChecker};
use crate::space::StateSpace;
use crate::state::State;
use crate::util::Real;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, trace, warn};

/// Lifecycle of an [`RRT`] planner.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlannerStatus {
    /// No problem has been set up yet, or the last setup was rejected.
    Unconfigured,
    /// A problem is set up and no search has run since.
    Ready,
    /// A search is in progress.
    Running,
    /// The last search reached the goal.
    Solved,
    /// The last search ran out of time.
    Timeout,
    /// The last search was stopped by a termination condition other than time.
    Exhausted,
}

/// A Rapidly-exploring Random Tree (RRT) planner.
/// Template Parameters:
/// - `F`: The floating-point type.
/// - `NN`: The nearest neighbors data structure.
pub struct RRT<F: Real, NN: NearestNeighbors<F> = LinearNearestNeighbors<F>> {
    config: RRTConfig<F>,
    /// The planner's only source of randomness, seeded once at construction.
    rng: ChaCha8Rng,
    sampler: GoalBiasedSampler<F>,
    problem: Option<Arc<ProblemDefinition<F>>>,
    validity_checker: Option<Box<dyn ValidityChecker<F>>>,
    /// The tree grown by the last search.
    tree: Option<Tree<F, NN>>,
    /// Index of the solution node (None if no solution has been found).
    solution: Option<usize>,
    status: PlannerStatus,
    iterations: u64,
    /// Smallest `Goal::distance_goal` over the nodes of the last search.
    closest_goal_distance: Option<F>,
}

impl<F: Real, NN: NearestNeighbors<F>> RRT<F, NN> {
    /// Constructs a new RRT planner.
    ///
    /// Parameters:
    /// - `config`: Steering range, goal bias, seed and motion checking options.
    ///
    /// Returns an error if any option is out of range. Without a seed the
    /// generator is seeded from OS entropy.
    pub fn new(config: RRTConfig<F>) -> Result<Self, ConfigurationError> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Ok(Self {
            sampler: GoalBiasedSampler::new(config.goal_bias)?,
            config,
            rng,
            problem: None,
            validity_checker: None,
            tree: None,
            solution: None,
            status: PlannerStatus::Unconfigured,
            iterations: 0,
            closest_goal_distance: None,
        })
    }

    /// Binds the planner to a problem and a validity checker.
    ///
    /// Parameters:
    /// - `problem`: The space, start state and goal.
    /// - `validity_checker`: Decides whether a state may be added to the tree.
    ///
    /// Any previous tree and solution are discarded. Returns
    /// `ConfigurationError::InvalidStartState` if the checker rejects the start,
    /// in which case the planner is left unconfigured.
    pub fn setup(
        &mut self,
        problem: Arc<ProblemDefinition<F>>,
        validity_checker: Box<dyn ValidityChecker<F>>,
    ) -> Result<(), ConfigurationError> {
        self.problem = None;
        self.validity_checker = None;
        self.tree = None;
        self.solution = None;
        self.iterations = 0;
        self.closest_goal_distance = None;
        self.status = PlannerStatus::Unconfigured;

        if !validity_checker.is_state_valid(problem.start()) {
            warn!("start state rejected by the validity checker");
            return Err(ConfigurationError::InvalidStartState);
        }

        debug!(
            space = problem.space().kind(),
            max_distance = %self.config.max_distance,
            goal_bias = %self.config.goal_bias,
            "planner set up"
        );
        self.problem = Some(problem);
        self.validity_checker = Some(validity_checker);
        self.status = PlannerStatus::Ready;
        Ok(())
    }

    /// Searches for a path until one is found or `timeout` has elapsed.
    ///
    /// Every call grows a fresh tree. The generator is not reseeded, so repeated
    /// calls explore differently.
    pub fn solve(&mut self, timeout: Duration) -> Result<Path<F>, PlanningError> {
        if timeout.is_zero() {
            return Err(ConfigurationError::InvalidTimeout.into());
        }
        let mut termination = MaxTimeTermination::new(timeout);
        match self.search(&mut termination)? {
            Some(path) => Ok(path),
            None => {
                warn!(
                    iterations = self.iterations,
                    nodes = self.tree_len(),
                    closest = ?self.closest_goal_distance,
                    ?timeout,
                    "no solution found before the timeout"
                );
                self.status = PlannerStatus::Timeout;
                Err(PlanningError::Timeout(timeout))
            }
        }
    }

    /// Searches for a path until one is found or `termination` is met.
    ///
    /// Parameters:
    /// - `termination`: The termination condition. It is reset before the search.
    pub fn solve_until<T: TerminationCondition>(
        &mut self,
        termination: &mut T,
    ) -> Result<Path<F>, PlanningError> {
        match self.search(termination)? {
            Some(path) => Ok(path),
            None => {
                warn!(
                    iterations = self.iterations,
                    nodes = self.tree_len(),
                    closest = ?self.closest_goal_distance,
                    "termination condition met without a solution"
                );
                self.status = PlannerStatus::Exhausted;
                Err(PlanningError::NoSolutionFound {
                    iterations: self.iterations,
                })
            }
        }
    }

    pub fn status(&self) -> PlannerStatus {
        self.status
    }

    pub fn config(&self) -> &RRTConfig<F> {
        &self.config
    }

    /// Returns the tree grown by the last search.
    pub fn tree(&self) -> Option<&Tree<F, NN>> {
        self.tree.as_ref()
    }

    /// Number of iterations of the last search.
    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    /// How close the last search got to the goal region, as measured by
    /// `Goal::distance_goal`. Zero once a node lies inside it.
    pub fn closest_goal_distance(&self) -> Option<F> {
        self.closest_goal_distance
    }

    /// Returns true if the last search found a solution.
    pub fn solved(&self) -> bool {
        self.solution.is_some()
    }

    /// Returns the path from the start to the goal, if the last search found one.
    pub fn get_path(&self) -> Option<Path<F>> {
        self.tree.as_ref()?.extract_path(self.solution?)
    }

    fn tree_len(&self) -> usize {
        self.tree.as_ref().map_or(0, Tree::len)
    }

    /// Runs one search on a fresh tree. `Ok(None)` means `termination` ended it.
    fn search<T: TerminationCondition>(
        &mut self,
        termination: &mut T,
    ) -> Result<Option<Path<F>>, PlanningError> {
        let problem = self.problem.clone().ok_or(PlanningError::Uninitialised)?;
        termination.reset();
        self.status = PlannerStatus::Running;
        self.solution = None;
        self.iterations = 0;
        self.closest_goal_distance = Some(problem.goal().distance_goal(problem.start()));

        let mut tree = Tree::new(problem.space().clone(), problem.start().clone());
        debug!(space = problem.space().kind(), "starting RRT search");

        let outcome = if problem.goal().is_satisfied(problem.start()) {
            debug!("start state already satisfies the goal");
            Ok(Some(0))
        } else {
            self.grow(&problem, &mut tree, termination)
        };

        let result = match outcome {
            Ok(Some(index)) => {
                info!(
                    iterations = self.iterations,
                    nodes = tree.len(),
                    "solution found"
                );
                self.solution = Some(index);
                self.status = PlannerStatus::Solved;
                Ok(tree.extract_path(index))
            }
            Ok(None) => Ok(None),
            Err(error) => {
                self.status = PlannerStatus::Ready;
                Err(error.into())
            }
        };
        self.tree = Some(tree);
        result
    }

    /// Expands `tree` until a node satisfies the goal or `termination` is met.
    ///
    /// Each iteration of the RRT algorithm consists of the following steps:
    /// 1. Draw a target, from the goal with probability `goal_bias`, otherwise uniformly.
    /// 2. Find the nearest node in the tree to the target.
    /// 3. Steer from the nearest node towards the target.
    /// 4. Discard the new state if it (or, when enabled, the motion to it) is invalid.
    /// 5. Add the new state as a child of the nearest node and stop if it satisfies the goal.
    fn grow<T: TerminationCondition>(
        &mut self,
        problem: &ProblemDefinition<F>,
        tree: &mut Tree<F, NN>,
        termination: &mut T,
    ) -> Result<Option<usize>, ConfigurationError> {
        let Some(checker) = self.validity_checker.as_deref() else {
            return Ok(None);
        };
        let space = problem.space().as_ref();
        let goal = problem.goal().as_ref();
        let resolution = self
            .config
            .motion_check_fraction
            .map(|fraction| fraction * space.maximum_extent())
            .filter(|resolution| resolution.is_finite() && *resolution > F::zero());

        loop {
            self.iterations += 1;
            let (target, source) = self.sampler.sample(space, goal, &mut self.rng);

            let nearest = tree.nearest(&target)?;
            let from = tree.nodes()[nearest].state();
            let candidate = steer(space, from, target, self.config.max_distance)?;

            let valid = checker.is_state_valid(&candidate)
                && match resolution {
                    Some(resolution) => check_motion(space, checker, from, &candidate, resolution)?,
                    None => true,
                };
            if valid {
                let reached = goal.is_satisfied(&candidate);
                let gap = goal.distance_goal(&candidate);
                if self.closest_goal_distance.map_or(true, |best| gap < best) {
                    self.closest_goal_distance = Some(gap);
                }
                match tree.add_node(candidate, nearest) {
                    Some(index) if reached => return Ok(Some(index)),
                    Some(_) => {}
                    None => debug!(nearest, "nearest neighbor index is not a tree node"),
                }
            } else {
                trace!(?source, "candidate rejected by the validity checker");
            }

            if termination.evaluate() {
                return Ok(None);
            }
        }
    }
}

/// Moves from `from` towards `to` by at most `max_distance`.
fn steer<F: Real>(
    space: &StateSpace<F>,
    from: &State<F>,
    to: State<F>,
    max_distance: F,
) -> Result<State<F>, ConfigurationError> {
    let distance = space.distance(from, &to)?;
    if distance <= max_distance {
        Ok(to)
    } else {
        space.interpolate(from, &to, max_distance / distance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::goal::GoalState;
    use crate::rrt::termination::MaxIterationsTermination;
    use crate::rrt::validity_checker::AlwaysValid;

    fn plane() -> Arc<StateSpace<f64>> {
        Arc::new(StateSpace::real_vector(vec![(0.0, 10.0), (0.0, 10.0)]).unwrap())
    }

    fn problem(start: [f64; 2], goal: [f64; 2], threshold: f64) -> Arc<ProblemDefinition<f64>> {
        let space = plane();
        let goal = GoalState::new(space.clone(), State::real_vector(goal.to_vec()), threshold).unwrap();
        Arc::new(ProblemDefinition::new(space, State::real_vector(start.to_vec()), Arc::new(goal)).unwrap())
    }

    fn planner(seed: u64) -> RRT<f64> {
        RRT::new(RRTConfig::default().with_seed(seed).with_goal_bias(0.1)).unwrap()
    }

    #[test]
    fn new_validates_the_config() {
        assert!(matches!(
            RRT::<f64>::new(RRTConfig::default().with_max_distance(0.0)),
            Err(ConfigurationError::InvalidMaxDistance(_))
        ));
        let rrt = planner(0);
        assert_eq!(rrt.status(), PlannerStatus::Unconfigured);
        assert!(rrt.tree().is_none());
    }

    #[test]
    fn solve_requires_setup() {
        let mut rrt = planner(0);
        assert_eq!(rrt.solve(Duration::from_secs(1)), Err(PlanningError::Uninitialised));
        assert_eq!(
            rrt.solve_until(&mut MaxIterationsTermination::new(10)),
            Err(PlanningError::Uninitialised)
        );
    }

    #[test]
    fn zero_timeout_is_a_configuration_error() {
        let mut rrt = planner(0);
        rrt.setup(problem([1.0, 1.0], [9.0, 9.0], 0.5), Box::new(AlwaysValid))
            .unwrap();
        assert_eq!(
            rrt.solve(Duration::ZERO),
            Err(PlanningError::Configuration(ConfigurationError::InvalidTimeout))
        );
        assert_eq!(rrt.status(), PlannerStatus::Ready);
    }

    #[test]
    fn rejected_start_leaves_the_planner_unconfigured() {
        let mut rrt = planner(0);
        let result = rrt.setup(
            problem([1.0, 1.0], [9.0, 9.0], 0.5),
            Box::new(|_: &State<f64>| false),
        );
        assert_eq!(result, Err(ConfigurationError::InvalidStartState));
        assert_eq!(rrt.status(), PlannerStatus::Unconfigured);
        assert_eq!(rrt.solve(Duration::from_secs(1)), Err(PlanningError::Uninitialised));
    }

    #[test]
    fn start_inside_the_goal() {
        let mut rrt = planner(0);
        rrt.setup(problem([5.0, 5.0], [5.2, 5.0], 0.5), Box::new(AlwaysValid))
            .unwrap();
        let path = rrt.solve(Duration::from_secs(1)).unwrap();
        assert_eq!(path.states(), &[State::real_vector(vec![5.0, 5.0])]);
        assert_eq!(rrt.status(), PlannerStatus::Solved);
        assert_eq!(rrt.tree().unwrap().len(), 1);
    }

    #[test]
    fn steps_never_exceed_max_distance() {
        let mut rrt = planner(3);
        rrt.setup(problem([1.0, 1.0], [9.0, 9.0], 0.5), Box::new(AlwaysValid))
            .unwrap();
        let path = rrt.solve(Duration::from_secs(5)).unwrap();
        assert_eq!(rrt.status(), PlannerStatus::Solved);
        assert_eq!(path.first(), Some(&State::real_vector(vec![1.0, 1.0])));

        let space = plane();
        let end = path.last().unwrap();
        assert!(space.distance(end, &State::real_vector(vec![9.0, 9.0])).unwrap() <= 0.5);
        for pair in path.states().windows(2) {
            assert!(space.distance(&pair[0], &pair[1]).unwrap() <= 0.5 + 1e-9);
        }
        for node in rrt.tree().unwrap().nodes().iter().skip(1) {
            let parent = &rrt.tree().unwrap().nodes()[node.parent().unwrap()];
            assert!(space.distance(parent.state(), node.state()).unwrap() <= 0.5 + 1e-9);
        }
        assert_eq!(rrt.get_path(), Some(path.clone()));
        assert_eq!(rrt.get_path(), Some(path));
    }

    #[test]
    fn iteration_budget_exhausts() {
        let mut rrt = planner(1);
        // the goal region is walled off
        rrt.setup(
            problem([1.0, 1.0], [9.0, 9.0], 0.5),
            Box::new(|state: &State<f64>| state.as_real_vector().map_or(false, |s| s[0] < 5.0)),
        )
        .unwrap();
        let result = rrt.solve_until(&mut MaxIterationsTermination::new(200));
        assert_eq!(result, Err(PlanningError::NoSolutionFound { iterations: 200 }));
        assert_eq!(rrt.status(), PlannerStatus::Exhausted);
        assert_eq!(rrt.iterations(), 200);
        assert!(rrt.get_path().is_none());
        assert!(rrt.tree().unwrap().nodes().iter().all(|n| n.state().as_real_vector().unwrap()[0] < 5.0));

        // the best node is stuck left of the wall, at least 4 - 0.5 from the goal disc
        let closest = rrt.closest_goal_distance().unwrap();
        let start_gap = 128.0_f64.sqrt() - 0.5;
        assert!(closest >= 3.5 - 1e-9 && closest < start_gap, "{closest}");
    }

    #[test]
    fn closest_goal_distance_tracks_progress() {
        let mut rrt = planner(2);
        assert_eq!(rrt.closest_goal_distance(), None);
        rrt.setup(problem([1.0, 1.0], [9.0, 1.0], 0.5), Box::new(AlwaysValid))
            .unwrap();
        let _ = rrt.solve_until(&mut MaxIterationsTermination::new(1));
        let early = rrt.closest_goal_distance().unwrap();
        assert!(early <= 7.5);

        rrt.solve(Duration::from_secs(5)).unwrap();
        assert_eq!(rrt.closest_goal_distance(), Some(0.0));
    }

    #[test]
    fn setup_discards_the_previous_search() {
        let mut rrt = planner(5);
        rrt.setup(problem([1.0, 1.0], [3.0, 1.0], 0.5), Box::new(AlwaysValid))
            .unwrap();
        rrt.solve(Duration::from_secs(5)).unwrap();
        assert!(rrt.solved());

        rrt.setup(problem([1.0, 1.0], [9.0, 1.0], 0.5), Box::new(AlwaysValid))
            .unwrap();
        assert_eq!(rrt.status(), PlannerStatus::Ready);
        assert!(!rrt.solved());
        assert!(rrt.tree().is_none());
    }
}
