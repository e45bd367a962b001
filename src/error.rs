use std::time::Duration;

/// Fatal problems with how a space, problem or planner was put together.
///
/// These are surfaced synchronously and never retried.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("dimension mismatch: expected {expected}, got {found}")]
    DimensionMismatch { expected: usize, found: usize },
    #[error("component count mismatch: expected {expected}, got {found}")]
    ComponentCountMismatch { expected: usize, found: usize },
    #[error("state variant mismatch: space is {expected}, state is {found}")]
    VariantMismatch {
        expected: &'static str,
        found: &'static str,
    },
    #[error("a real vector space needs at least one dimension")]
    ZeroDimension,
    #[error("invalid bounds [{min}, {max}] for dimension {dimension}")]
    InvalidBounds { dimension: usize, min: f64, max: f64 },
    #[error("invalid SO2 bounds [{min}, {max}]: need min < max and an arc of at most 2π")]
    InvalidSO2Bounds { min: f64, max: f64 },
    #[error("quaternion has no finite, non-zero norm")]
    InvalidQuaternion,
    #[error("SO3 bound angle must be finite and positive, got {0}")]
    InvalidSO3Bound(f64),
    #[error("a compound space needs at least one component")]
    EmptyCompound,
    #[error("{spaces} component spaces but {weights} weights")]
    WeightCountMismatch { spaces: usize, weights: usize },
    #[error("weight {weight} of component {index} must be finite and non-negative")]
    InvalidWeight { index: usize, weight: f64 },
    #[error("max_distance must be finite and positive, got {0}")]
    InvalidMaxDistance(f64),
    #[error("goal_bias must lie in [0, 1], got {0}")]
    InvalidGoalBias(f64),
    #[error("motion_check_fraction must lie in [1e-4, 1], got {0}")]
    InvalidMotionCheckFraction(f64),
    #[error("motion check resolution must be finite and positive, got {0}")]
    InvalidResolution(f64),
    #[error("goal threshold must be finite and non-negative, got {0}")]
    InvalidGoalThreshold(f64),
    #[error("timeout must be positive")]
    InvalidTimeout,
    #[error("start state is rejected by the validity checker")]
    InvalidStartState,
}

/// Why a call to `solve` did not produce a path.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PlanningError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error("planner has not been set up")]
    Uninitialised,
    #[error("no solution found within {0:?}")]
    Timeout(Duration),
    #[error("no solution found after {iterations} iterations")]
    NoSolutionFound { iterations: u64 },
}

impl PlanningError {
    /// Returns true for failures the caller may retry with a larger budget or another seed.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            PlanningError::Timeout(_) | PlanningError::NoSolutionFound { .. }
        )
    }
}

/// Errors from reading or writing planner configuration files.
#[derive(Debug, thiserror::Error)]
pub enum ConfigFileError {
    #[error("failed to access config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed config JSON: {0}")]
    Parse(#[from] json::Error),
    #[error("field `{0}` has the wrong type or an unrepresentable value")]
    InvalidField(&'static str),
    #[error(transparent)]
    Invalid(#[from] ConfigurationError),
}
