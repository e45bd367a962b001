use num_traits::{Float, FloatConst};
use rand::distributions::uniform::SampleUniform;
use std::fmt::{Debug, Display};

/// The scalar type states and spaces are generic over (`f32` or `f64`).
pub trait Real: Float + FloatConst + SampleUniform + Debug + Display + 'static {}

impl<T> Real for T where T: Float + FloatConst + SampleUniform + Debug + Display + 'static {}

/// Converts a scalar to `f64` for error reporting and JSON output.
pub(crate) fn to_f64<F: Real>(value: F) -> f64 {
    value.to_f64().unwrap_or(f64::NAN)
}
