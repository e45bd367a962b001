use crate::error::ConfigurationError;
use crate::state::{normalize_angle, SO2State};
use crate::util::real::{to_f64, Real};
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

/// The circle of planar rotations, optionally restricted to an arc.
///
/// A bounded space accepts the angles reached by turning counterclockwise from
/// `min` to `max`. Distance and interpolation always use the shorter way round
/// the full circle, so interpolating across an arc wider than π can leave it.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SO2Bounds<F>", bound(deserialize = "F: Real + Deserialize<'de>"))]
pub struct SO2StateSpace<F> {
    bounds: Option<(F, F)>,
}

#[derive(Deserialize)]
struct SO2Bounds<F> {
    bounds: Option<(F, F)>,
}

impl<F: Real> TryFrom<SO2Bounds<F>> for SO2StateSpace<F> {
    type Error = ConfigurationError;

    fn try_from(raw: SO2Bounds<F>) -> Result<Self, Self::Error> {
        match raw.bounds {
            Some((min, max)) => Self::bounded(min, max),
            None => Ok(Self::new()),
        }
    }
}

impl<F: Real> Default for SO2StateSpace<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Real> SO2StateSpace<F> {
    /// The full circle.
    pub fn new() -> Self {
        Self { bounds: None }
    }

    /// The arc from `min` counterclockwise to `max`.
    ///
    /// Both ends must be finite, with `min < max` and `max - min <= 2π`.
    pub fn bounded(min: F, max: F) -> Result<Self, ConfigurationError> {
        if !min.is_finite() || !max.is_finite() || min >= max || max - min > F::TAU() {
            return Err(ConfigurationError::InvalidSO2Bounds {
                min: to_f64(min),
                max: to_f64(max),
            });
        }
        Ok(Self {
            bounds: Some((min, max)),
        })
    }

    pub fn bounds(&self) -> Option<(F, F)> {
        self.bounds
    }

    /// Shortest signed rotation taking `a` to `b`, in `(-π, π]`.
    pub fn signed_difference(&self, a: &SO2State<F>, b: &SO2State<F>) -> F {
        let mut diff = b.value() - a.value();
        if diff > F::PI() {
            diff = diff - F::TAU();
        } else if diff <= -F::PI() {
            diff = diff + F::TAU();
        }
        diff
    }

    /// Shortest angular difference, always in `[0, π]`.
    pub fn distance(&self, a: &SO2State<F>, b: &SO2State<F>) -> F {
        self.signed_difference(a, b).abs()
    }

    /// Rotates from `a` towards `b` along the shorter arc.
    pub fn interpolate(&self, a: &SO2State<F>, b: &SO2State<F>, t: F) -> SO2State<F> {
        SO2State::new(a.value() + self.signed_difference(a, b) * t)
    }

    pub fn sample_uniform(&self, rng: &mut dyn RngCore) -> SO2State<F> {
        match self.bounds {
            Some((min, max)) => SO2State::new(min + rng.gen_range(F::zero()..max - min)),
            None => SO2State::new(rng.gen_range(F::zero()..F::TAU())),
        }
    }

    pub fn satisfies_bounds(&self, state: &SO2State<F>) -> bool {
        match self.bounds {
            Some((min, max)) => normalize_angle(state.value() - min) <= max - min,
            None => true,
        }
    }

    /// Moves an angle outside the arc to the nearer end of it.
    pub fn enforce_bounds(&self, state: &mut SO2State<F>) {
        let Some((min, max)) = self.bounds else {
            return;
        };
        let offset = normalize_angle(state.value() - min);
        let width = max - min;
        if offset <= width {
            return;
        }
        // past `max` going counterclockwise, or short of `min`
        *state = if offset - width <= F::TAU() - offset {
            SO2State::new(max)
        } else {
            SO2State::new(min)
        };
    }

    pub fn maximum_extent(&self) -> F {
        match self.bounds {
            Some((min, max)) => (max - min).min(F::PI()),
            None => F::PI(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::f64::consts::PI;

    #[test]
    fn distance_wraps_around() {
        let space = SO2StateSpace::<f64>::new();
        let a = SO2State::new(0.0);
        let b = SO2State::new(2.0 * PI - 0.1);
        assert!((space.distance(&a, &b) - 0.1).abs() < 1e-9);
        assert!((space.distance(&b, &a) - 0.1).abs() < 1e-9);
        let opposite = SO2State::new(PI);
        assert!((space.distance(&a, &opposite) - PI).abs() < 1e-12);
    }

    #[test]
    fn interpolation_takes_the_short_arc() {
        let space = SO2StateSpace::<f64>::new();
        let a = SO2State::new(0.1);
        let b = SO2State::new(2.0 * PI - 0.1);
        // halfway across the 0 seam, not through π
        let mid = space.interpolate(&a, &b, 0.5);
        assert!(space.distance(&mid, &SO2State::new(0.0)) < 1e-9);

        let quarter = space.interpolate(&a, &b, 0.25);
        assert!((quarter.value() - 0.05).abs() < 1e-9);
    }

    #[test]
    fn signed_difference_picks_direction() {
        let space = SO2StateSpace::<f64>::new();
        let a = SO2State::new(0.5);
        let b = SO2State::new(1.0);
        assert!((space.signed_difference(&a, &b) - 0.5).abs() < 1e-12);
        assert!((space.signed_difference(&b, &a) + 0.5).abs() < 1e-12);
    }

    #[test]
    fn samples_cover_the_circle() {
        let space = SO2StateSpace::<f64>::new();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut quadrants = [0usize; 4];
        for _ in 0..4000 {
            let sample: SO2State<f64> = space.sample_uniform(&mut rng);
            assert!(space.satisfies_bounds(&sample));
            quadrants[((sample.value() / (PI / 2.0)) as usize).min(3)] += 1;
        }
        assert!(quadrants.iter().all(|&count| count > 800), "{quadrants:?}");
    }

    #[test]
    fn bounded_arc_rejects_bad_bounds() {
        assert!(SO2StateSpace::bounded(1.0, 1.0).is_err());
        assert!(SO2StateSpace::bounded(0.0, 7.0).is_err());
        assert!(SO2StateSpace::bounded(f64::NAN, 1.0).is_err());
        assert!(SO2StateSpace::bounded(-PI, PI).is_ok());
    }

    #[test]
    fn bounded_arc_wraps_through_zero() {
        // from -0.5 through 0 to 0.5
        let space = SO2StateSpace::bounded(-0.5, 0.5).unwrap();
        assert!(space.satisfies_bounds(&SO2State::new(0.0)));
        assert!(space.satisfies_bounds(&SO2State::new(2.0 * PI - 0.4)));
        assert!(space.satisfies_bounds(&SO2State::new(0.5)));
        assert!(!space.satisfies_bounds(&SO2State::new(PI)));
        assert_eq!(space.maximum_extent(), 1.0);

        let mut rng = ChaCha8Rng::seed_from_u64(4);
        for _ in 0..1000 {
            let sample = space.sample_uniform(&mut rng);
            assert!(space.satisfies_bounds(&sample), "{sample:?}");
        }
    }

    #[test]
    fn enforce_bounds_picks_the_nearer_end() {
        let space = SO2StateSpace::bounded(0.0, 1.0).unwrap();
        let mut past_max = SO2State::new(1.5);
        space.enforce_bounds(&mut past_max);
        assert_eq!(past_max.value(), 1.0);

        let mut short_of_min = SO2State::new(-0.5);
        space.enforce_bounds(&mut short_of_min);
        assert_eq!(short_of_min.value(), 0.0);

        let mut inside = SO2State::new(0.25);
        space.enforce_bounds(&mut inside);
        assert_eq!(inside.value(), 0.25);
    }

    #[test]
    fn deserialization_validates_bounds() {
        let space: SO2StateSpace<f64> = serde_json::from_str(r#"{"bounds":[0.0,1.0]}"#).unwrap();
        assert_eq!(space.bounds(), Some((0.0, 1.0)));
        let full: SO2StateSpace<f64> = serde_json::from_str(r#"{"bounds":null}"#).unwrap();
        assert_eq!(full.bounds(), None);
        assert!(serde_json::from_str::<SO2StateSpace<f64>>(r#"{"bounds":[1.0,0.0]}"#).is_err());
    }
}
