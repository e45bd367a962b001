use crate::error::ConfigurationError;
use crate::state::SO3State;
use crate::util::real::{to_f64, Real};
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

/// The group of 3D rotations, optionally restricted to a cap around a center rotation.
///
/// The distance between two rotations is the angle between their quaternions
/// on the unit sphere, `acos(|q1 · q2|)`, which lies in `[0, π/2]`. It is
/// evaluated as `2 atan2(|q1 - q2|, |q1 + q2|)` after flipping `q2` into the
/// hemisphere of `q1`, which stays accurate for nearby rotations.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SO3Bounds<F>", bound(deserialize = "F: Real + Deserialize<'de>"))]
pub struct SO3StateSpace<F> {
    /// Center of the cap and the largest distance from it.
    bounds: Option<(SO3State<F>, F)>,
}

#[derive(Deserialize)]
#[serde(bound(deserialize = "F: Real + Deserialize<'de>"))]
struct SO3Bounds<F> {
    bounds: Option<(SO3State<F>, F)>,
}

impl<F: Real> TryFrom<SO3Bounds<F>> for SO3StateSpace<F> {
    type Error = ConfigurationError;

    fn try_from(raw: SO3Bounds<F>) -> Result<Self, Self::Error> {
        match raw.bounds {
            Some((center, max_angle)) => Self::bounded(center, max_angle),
            None => Ok(Self::new()),
        }
    }
}

impl<F: Real> Default for SO3StateSpace<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Real> SO3StateSpace<F> {
    pub fn new() -> Self {
        Self { bounds: None }
    }

    /// Rotations within `max_angle` of `center`.
    pub fn bounded(center: SO3State<F>, max_angle: F) -> Result<Self, ConfigurationError> {
        if !max_angle.is_finite() || max_angle <= F::zero() {
            return Err(ConfigurationError::InvalidSO3Bound(to_f64(max_angle)));
        }
        Ok(Self {
            bounds: Some((center, max_angle)),
        })
    }

    pub fn bounds(&self) -> Option<(SO3State<F>, F)> {
        self.bounds
    }

    pub fn distance(&self, a: &SO3State<F>, b: &SO3State<F>) -> F {
        let sign = if a.dot(b) < F::zero() { -F::one() } else { F::one() };
        let (mut diff, mut sum) = (F::zero(), F::zero());
        for (p, q) in a.to_array().into_iter().zip(b.to_array()) {
            let q = sign * q;
            diff = diff + (p - q) * (p - q);
            sum = sum + (p + q) * (p + q);
        }
        (F::one() + F::one()) * diff.sqrt().atan2(sum.sqrt())
    }

    /// Spherical linear interpolation along the shorter of the two arcs.
    pub fn interpolate(&self, a: &SO3State<F>, b: &SO3State<F>, t: F) -> SO3State<F> {
        let to = if a.dot(b) < F::zero() { b.negated() } else { *b };
        let theta = self.distance(a, &to);
        let sin_theta = theta.sin();
        let blended = if sin_theta <= F::epsilon() {
            // nearly parallel: a normalised linear blend is accurate enough
            a.blend(F::one() - t, &to, t)
        } else {
            let wa = ((F::one() - t) * theta).sin() / sin_theta;
            let wb = (t * theta).sin() / sin_theta;
            a.blend(wa, &to, wb)
        };
        blended.unwrap_or(*a)
    }

    /// Uniform over all rotations (Shoemake's method). A bounded space pulls
    /// samples outside the cap back towards its center.
    pub fn sample_uniform(&self, rng: &mut dyn RngCore) -> SO3State<F> {
        let q = uniform_rotation(rng);
        let Some((center, max_angle)) = self.bounds else {
            return q;
        };
        let d = self.distance(&center, &q);
        if d <= max_angle {
            return q;
        }
        let u: F = rng.gen_range(F::zero()..F::one());
        self.interpolate(&center, &q, max_angle * u.cbrt() / d)
    }

    pub fn satisfies_bounds(&self, state: &SO3State<F>) -> bool {
        match self.bounds {
            Some((center, max_angle)) => {
                self.distance(&center, state) <= max_angle + F::epsilon().sqrt()
            }
            None => true,
        }
    }

    /// Rotates a state outside the cap back onto its boundary.
    pub fn enforce_bounds(&self, state: &mut SO3State<F>) {
        let Some((center, max_angle)) = self.bounds else {
            return;
        };
        let d = self.distance(&center, state);
        if d > max_angle {
            *state = self.interpolate(&center, state, max_angle / d);
        }
    }

    pub fn maximum_extent(&self) -> F {
        match self.bounds {
            Some((_, max_angle)) => (max_angle + max_angle).min(F::FRAC_PI_2()),
            None => F::FRAC_PI_2(),
        }
    }
}

fn uniform_rotation<F: Real>(rng: &mut dyn RngCore) -> SO3State<F> {
    let u1: F = rng.gen_range(F::zero()..F::one());
    let u2: F = rng.gen_range(F::zero()..F::TAU());
    let u3: F = rng.gen_range(F::zero()..F::TAU());
    let a = (F::one() - u1).sqrt();
    let b = u1.sqrt();
    SO3State::new(a * u2.sin(), a * u2.cos(), b * u3.sin(), b * u3.cos())
        .unwrap_or_else(|_| SO3State::identity())
}
