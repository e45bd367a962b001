use std::time::{Duration, Instant};

/// Decides when a planner should stop searching.
///
/// `evaluate` is called once per planner iteration and returns true once the
/// search should end.
pub trait TerminationCondition {
    fn evaluate(&mut self) -> bool;

    /// Resets the condition before a new search.
    fn reset(&mut self);
}

/// Terminates once a wall-clock budget has elapsed.
#[derive(Clone, Debug)]
pub struct MaxTimeTermination {
    max_time: Duration,
    start: Instant,
}

impl MaxTimeTermination {
    /// The budget starts counting immediately.
    pub fn new(max_time: Duration) -> Self {
        Self {
            max_time,
            start: Instant::now(),
        }
    }

    pub fn max_time(&self) -> Duration {
        self.max_time
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl TerminationCondition for MaxTimeTermination {
    fn evaluate(&mut self) -> bool {
        self.start.elapsed() > self.max_time
    }

    fn reset(&mut self) {
        self.start = Instant::now();
    }
}

/// Terminates after a fixed number of evaluations.
#[derive(Clone, Debug)]
pub struct MaxIterationsTermination {
    max_iterations: u64,
    iterations: u64,
}

impl MaxIterationsTermination {
    pub fn new(max_iterations: u64) -> Self {
        Self {
            max_iterations,
            iterations: 0,
        }
    }
}

impl TerminationCondition for MaxIterationsTermination {
    fn evaluate(&mut self) -> bool {
        self.iterations += 1;
        self.iterations >= self.max_iterations
    }

    fn reset(&mut self) {
        self.iterations = 0;
    }
}
