use crate::error::ConfigurationError;
use crate::util::Real;
use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// A point in a real vector space.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RealVectorState<F> {
    values: Vec<F>,
}

impl<F: Real> RealVectorState<F> {
    pub fn new(values: Vec<F>) -> Self {
        Self { values }
    }

    pub fn values(&self) -> &[F] {
        &self.values
    }

    pub fn dimension(&self) -> usize {
        self.values.len()
    }

    /// Squared Euclidean distance. Extra coordinates of the longer operand are ignored.
    pub fn euclidean_distance_squared(&self, other: &Self) -> F {
        self.values
            .iter()
            .zip(other.values.iter())
            .fold(F::zero(), |acc, (&a, &b)| acc + (a - b) * (a - b))
    }

    pub fn euclidean_distance(&self, other: &Self) -> F {
        self.euclidean_distance_squared(other).sqrt()
    }
}

impl<F> Index<usize> for RealVectorState<F> {
    type Output = F;

    fn index(&self, index: usize) -> &F {
        &self.values[index]
    }
}

impl<F> IndexMut<usize> for RealVectorState<F> {
    fn index_mut(&mut self, index: usize) -> &mut F {
        &mut self.values[index]
    }
}

/// An angle on the circle, kept in `[0, 2π)`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "Angle<F>", bound(deserialize = "F: Real + Deserialize<'de>"))]
pub struct SO2State<F> {
    value: F,
}

#[derive(Deserialize)]
struct Angle<F> {
    value: F,
}

impl<F: Real> From<Angle<F>> for SO2State<F> {
    fn from(angle: Angle<F>) -> Self {
        Self::new(angle.value)
    }
}

impl<F: Real> SO2State<F> {
    /// Creates an angle, wrapping `value` into `[0, 2π)`.
    pub fn new(value: F) -> Self {
        Self {
            value: normalize_angle(value),
        }
    }

    pub fn value(&self) -> F {
        self.value
    }
}

/// Wraps an angle into `[0, 2π)`.
pub(crate) fn normalize_angle<F: Real>(value: F) -> F {
    let two_pi = F::TAU();
    let mut wrapped = value % two_pi;
    if wrapped < F::zero() {
        wrapped = wrapped + two_pi;
    }
    // -ε + 2π can round up to exactly 2π
    if wrapped >= two_pi {
        wrapped = F::zero();
    }
    wrapped
}

/// A 3D rotation stored as a unit quaternion `(x, y, z, w)`.
///
/// `q` and `-q` describe the same rotation; the metric of
/// [`SO3StateSpace`](crate::space::SO3StateSpace) treats them as equal.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Quaternion<F>", bound(deserialize = "F: Real + Deserialize<'de>"))]
pub struct SO3State<F> {
    x: F,
    y: F,
    z: F,
    w: F,
}

#[derive(Deserialize)]
struct Quaternion<F> {
    x: F,
    y: F,
    z: F,
    w: F,
}

impl<F: Real> TryFrom<Quaternion<F>> for SO3State<F> {
    type Error = ConfigurationError;

    fn try_from(q: Quaternion<F>) -> Result<Self, Self::Error> {
        Self::new(q.x, q.y, q.z, q.w)
    }
}

impl<F: Real> SO3State<F> {
    /// Creates a rotation from quaternion components, scaling them to unit length.
    ///
    /// Returns `ConfigurationError::InvalidQuaternion` if the norm is zero or not finite.
    pub fn new(x: F, y: F, z: F, w: F) -> Result<Self, ConfigurationError> {
        let norm = (x * x + y * y + z * z + w * w).sqrt();
        if !norm.is_finite() || norm <= F::zero() {
            return Err(ConfigurationError::InvalidQuaternion);
        }
        Ok(Self {
            x: x / norm,
            y: y / norm,
            z: z / norm,
            w: w / norm,
        })
    }

    pub fn identity() -> Self {
        Self {
            x: F::zero(),
            y: F::zero(),
            z: F::zero(),
            w: F::one(),
        }
    }

    /// Rotation by `angle` radians about `axis`. The axis need not be normalised.
    pub fn from_axis_angle(axis: [F; 3], angle: F) -> Result<Self, ConfigurationError> {
        let norm = (axis[0] * axis[0] + axis[1] * axis[1] + axis[2] * axis[2]).sqrt();
        if !norm.is_finite() || norm <= F::zero() {
            return Err(ConfigurationError::InvalidQuaternion);
        }
        let half = angle / (F::one() + F::one());
        let s = half.sin() / norm;
        Self::new(axis[0] * s, axis[1] * s, axis[2] * s, half.cos())
    }

    pub fn x(&self) -> F {
        self.x
    }

    pub fn y(&self) -> F {
        self.y
    }

    pub fn z(&self) -> F {
        self.z
    }

    pub fn w(&self) -> F {
        self.w
    }

    /// The components in `[x, y, z, w]` order.
    pub fn to_array(&self) -> [F; 4] {
        [self.x, self.y, self.z, self.w]
    }

    pub fn dot(&self, other: &Self) -> F {
        self.x * other.x + self.y * other.y + self.z * other.z + self.w * other.w
    }

    pub(crate) fn negated(&self) -> Self {
        Self {
            x: -self.x,
            y: -self.y,
            z: -self.z,
            w: -self.w,
        }
    }

    /// `a * self + b * other`, renormalised. `None` if the blend collapses to zero.
    pub(crate) fn blend(&self, a: F, other: &Self, b: F) -> Option<Self> {
        Self::new(
            a * self.x + b * other.x,
            a * self.y + b * other.y,
            a * self.z + b * other.z,
            a * self.w + b * other.w,
        )
        .ok()
    }
}

/// One sub-state per component of a compound space, in the same order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "F: Real + Deserialize<'de>"))]
pub struct CompoundState<F> {
    components: Vec<State<F>>,
}

impl<F: Real> CompoundState<F> {
    pub fn new(components: Vec<State<F>>) -> Self {
        Self { components }
    }

    pub fn components(&self) -> &[State<F>] {
        &self.components
    }

    pub(crate) fn components_mut(&mut self) -> &mut [State<F>] {
        &mut self.components
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

/// A configuration of the planned system.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "F: Real + Deserialize<'de>"))]
pub enum State<F> {
    RealVector(RealVectorState<F>),
    SO2(SO2State<F>),
    SO3(SO3State<F>),
    Compound(CompoundState<F>),
}

impl<F: Real> State<F> {
    pub fn real_vector(values: Vec<F>) -> Self {
        State::RealVector(RealVectorState::new(values))
    }

    pub fn so2(value: F) -> Self {
        State::SO2(SO2State::new(value))
    }

    pub fn so3(rotation: SO3State<F>) -> Self {
        State::SO3(rotation)
    }

    pub fn compound(components: Vec<State<F>>) -> Self {
        State::Compound(CompoundState::new(components))
    }

    /// A planar pose matching [`StateSpace::se2`](crate::space::StateSpace::se2).
    pub fn se2(x: F, y: F, yaw: F) -> Self {
        State::compound(vec![State::real_vector(vec![x, y]), State::so2(yaw)])
    }

    /// A spatial pose matching [`StateSpace::se3`](crate::space::StateSpace::se3).
    pub fn se3(x: F, y: F, z: F, rotation: SO3State<F>) -> Self {
        State::compound(vec![State::real_vector(vec![x, y, z]), State::SO3(rotation)])
    }

    pub fn as_real_vector(&self) -> Option<&RealVectorState<F>> {
        match self {
            State::RealVector(state) => Some(state),
            _ => None,
        }
    }

    pub fn as_so2(&self) -> Option<&SO2State<F>> {
        match self {
            State::SO2(state) => Some(state),
            _ => None,
        }
    }

    pub fn as_so3(&self) -> Option<&SO3State<F>> {
        match self {
            State::SO3(state) => Some(state),
            _ => None,
        }
    }

    pub fn as_compound(&self) -> Option<&CompoundState<F>> {
        match self {
            State::Compound(state) => Some(state),
            _ => None,
        }
    }

    /// The name of the variant, used in shape mismatch errors.
    pub fn kind(&self) -> &'static str {
        match self {
            State::RealVector(_) => "RealVector",
            State::SO2(_) => "SO2",
            State::SO3(_) => "SO3",
            State::Compound(_) => "Compound",
        }
    }

    /// Serializes the state as nested JSON arrays of numbers.
    pub fn to_json(&self) -> json::JsonValue {
        match self {
            State::RealVector(state) => state
                .values()
                .iter()
                .map(|&v| crate::util::real::to_f64(v))
                .collect::<Vec<f64>>()
                .into(),
            State::SO2(state) => crate::util::real::to_f64(state.value()).into(),
            State::SO3(q) => q
                .to_array()
                .iter()
                .map(|&v| crate::util::real::to_f64(v))
                .collect::<Vec<f64>>()
                .into(),
            State::Compound(state) => json::JsonValue::Array(
                state.components().iter().map(State::to_json).collect(),
            ),
        }
    }
}
