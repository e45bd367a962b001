//! Planner configuration.
//!
//! [`RRTConfig`] derives serde for embedding in host configuration, and can be
//! read from and written to JSON files directly.

use crate::error::{ConfigFileError, ConfigurationError};
use crate::util::real::{to_f64, Real};
use json::JsonValue;
use serde::{Deserialize, Serialize};
use std::path::Path as FsPath;

/// Smallest accepted `motion_check_fraction`. Bounds an edge check to about
/// `max_distance / (fraction * extent)` validity queries.
pub const MIN_MOTION_CHECK_FRACTION: f64 = 1e-4;

/// Named options of the RRT planner. The time budget is passed to `solve`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawConfig<F>", bound(deserialize = "F: Real + Deserialize<'de>"))]
pub struct RRTConfig<F> {
    /// The steering range (maximum distance to steer towards the sample state).
    pub max_distance: F,
    /// Probability of steering towards a goal sample instead of a uniform one.
    pub goal_bias: F,
    /// Seed of the planner's random generator. `None` seeds from OS entropy.
    pub seed: Option<u64>,
    /// When set, edges are validated at a resolution of this fraction of the
    /// space's maximum extent, not just at the new state.
    pub motion_check_fraction: Option<F>,
}

#[derive(Deserialize)]
struct RawConfig<F> {
    max_distance: F,
    goal_bias: F,
    seed: Option<u64>,
    motion_check_fraction: Option<F>,
}

impl<F: Real> TryFrom<RawConfig<F>> for RRTConfig<F> {
    type Error = ConfigurationError;

    fn try_from(raw: RawConfig<F>) -> Result<Self, Self::Error> {
        let config = Self {
            max_distance: raw.max_distance,
            goal_bias: raw.goal_bias,
            seed: raw.seed,
            motion_check_fraction: raw.motion_check_fraction,
        };
        config.validate()?;
        Ok(config)
    }
}

impl<F: Real> Default for RRTConfig<F> {
    fn default() -> Self {
        Self {
            max_distance: F::from(0.5).unwrap_or_else(F::one),
            goal_bias: F::from(0.05).unwrap_or_else(F::zero),
            seed: None,
            motion_check_fraction: None,
        }
    }
}

impl<F: Real> RRTConfig<F> {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_max_distance(mut self, max_distance: F) -> Self {
        self.max_distance = max_distance;
        self
    }

    pub fn with_goal_bias(mut self, goal_bias: F) -> Self {
        self.goal_bias = goal_bias;
        self
    }

    pub fn with_motion_check_fraction(mut self, fraction: F) -> Self {
        self.motion_check_fraction = Some(fraction);
        self
    }

    /// Checks every option against its allowed range.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if !self.max_distance.is_finite() || self.max_distance <= F::zero() {
            return Err(ConfigurationError::InvalidMaxDistance(to_f64(self.max_distance)));
        }
        if !(self.goal_bias >= F::zero() && self.goal_bias <= F::one()) {
            return Err(ConfigurationError::InvalidGoalBias(to_f64(self.goal_bias)));
        }
        if let Some(fraction) = self.motion_check_fraction {
            let min = F::from(MIN_MOTION_CHECK_FRACTION).unwrap_or_else(F::epsilon);
            if !(fraction >= min && fraction <= F::one()) {
                return Err(ConfigurationError::InvalidMotionCheckFraction(to_f64(fraction)));
            }
        }
        Ok(())
    }

    /// Parses and validates a JSON object such as
    /// `{"max_distance": 0.5, "goal_bias": 0.05, "seed": 42}`.
    ///
    /// Missing optional fields take their default values.
    pub fn from_json_str(source: &str) -> Result<Self, ConfigFileError> {
        let value = json::parse(source)?;
        if !value.is_object() {
            return Err(ConfigFileError::InvalidField("<root>"));
        }
        let defaults = Self::default();
        let config = Self {
            max_distance: real_field(&value, "max_distance")?.unwrap_or(defaults.max_distance),
            goal_bias: real_field(&value, "goal_bias")?.unwrap_or(defaults.goal_bias),
            seed: match &value["seed"] {
                JsonValue::Null => None,
                seed => Some(seed.as_u64().ok_or(ConfigFileError::InvalidField("seed"))?),
            },
            motion_check_fraction: real_field(&value, "motion_check_fraction")?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> JsonValue {
        let mut value = json::object! {
            max_distance: to_f64(self.max_distance),
            goal_bias: to_f64(self.goal_bias),
        };
        if let Some(seed) = self.seed {
            value["seed"] = seed.into();
        }
        if let Some(fraction) = self.motion_check_fraction {
            value["motion_check_fraction"] = to_f64(fraction).into();
        }
        value
    }

    pub fn from_file(path: impl AsRef<FsPath>) -> Result<Self, ConfigFileError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_json_str(&source)
    }

    pub fn to_file(&self, path: impl AsRef<FsPath>) -> Result<(), ConfigFileError> {
        std::fs::write(path, json::stringify_pretty(self.to_json(), 4))?;
        Ok(())
    }
}

fn real_field<F: Real>(value: &JsonValue, field: &'static str) -> Result<Option<F>, ConfigFileError> {
    match &value[field] {
        JsonValue::Null => Ok(None),
        number => number
            .as_f64()
            .and_then(F::from)
            .map(Some)
            .ok_or(ConfigFileError::InvalidField(field)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = RRTConfig::<f64>::default();
        assert_eq!(config.max_distance, 0.5);
        assert_eq!(config.goal_bias, 0.05);
        assert_eq!(config.seed, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validation_ranges() {
        let base = RRTConfig::<f64>::default();
        assert_eq!(
            base.with_max_distance(0.0).validate(),
            Err(ConfigurationError::InvalidMaxDistance(0.0))
        );
        assert_eq!(
            base.with_max_distance(-1.0).validate(),
            Err(ConfigurationError::InvalidMaxDistance(-1.0))
        );
        assert_eq!(
            base.with_goal_bias(1.1).validate(),
            Err(ConfigurationError::InvalidGoalBias(1.1))
        );
        assert!(base.with_goal_bias(1.0).validate().is_ok());
        assert!(base.with_motion_check_fraction(0.0).validate().is_err());
        assert!(base.with_motion_check_fraction(0.01).validate().is_ok());
        assert!(base.with_motion_check_fraction(MIN_MOTION_CHECK_FRACTION).validate().is_ok());
        assert_eq!(
            base.with_motion_check_fraction(1e-12).validate(),
            Err(ConfigurationError::InvalidMotionCheckFraction(1e-12))
        );
        assert!(base.with_motion_check_fraction(f64::NAN).validate().is_err());
    }

    #[test]
    fn serde_deserialization_is_validated() {
        let config: RRTConfig<f64> = serde_json::from_str(
            r#"{"max_distance": 1.0, "goal_bias": 0.25, "seed": 4, "motion_check_fraction": null}"#,
        )
        .unwrap();
        assert_eq!(config, RRTConfig::default().with_max_distance(1.0).with_goal_bias(0.25).with_seed(4));

        for bad in [
            r#"{"max_distance": -1.0, "goal_bias": 0.2}"#,
            r#"{"max_distance": 1.0, "goal_bias": 3.0}"#,
            r#"{"max_distance": 1.0, "goal_bias": 0.2, "motion_check_fraction": 1e-12}"#,
        ] {
            assert!(serde_json::from_str::<RRTConfig<f64>>(bad).is_err(), "{bad}");
        }
    }

    #[test]
    fn parses_json() {
        let config = RRTConfig::<f64>::from_json_str(
            r#"{"max_distance": 0.25, "goal_bias": 0.1, "seed": 123, "motion_check_fraction": 0.01}"#,
        )
        .unwrap();
        assert_close(
            &config,
            &RRTConfig::default()
                .with_max_distance(0.25)
                .with_goal_bias(0.1)
                .with_seed(123)
                .with_motion_check_fraction(0.01),
        );

        let sparse = RRTConfig::<f64>::from_json_str(r#"{"seed": 7}"#).unwrap();
        assert_eq!(sparse, RRTConfig::default().with_seed(7));
    }

    #[test]
    fn rejects_bad_json() {
        assert!(matches!(
            RRTConfig::<f64>::from_json_str("{not json"),
            Err(ConfigFileError::Parse(_))
        ));
        assert!(matches!(
            RRTConfig::<f64>::from_json_str(r#"{"seed": -4}"#),
            Err(ConfigFileError::InvalidField("seed"))
        ));
        assert!(matches!(
            RRTConfig::<f64>::from_json_str(r#"{"goal_bias": "high"}"#),
            Err(ConfigFileError::InvalidField("goal_bias"))
        ));
        assert!(matches!(
            RRTConfig::<f64>::from_json_str(r#"{"goal_bias": 2.0}"#),
            Err(ConfigFileError::Invalid(ConfigurationError::InvalidGoalBias(_)))
        ));
        assert!(matches!(
            RRTConfig::<f64>::from_json_str("[1, 2]"),
            Err(ConfigFileError::InvalidField("<root>"))
        ));
    }

    #[test]
    fn json_round_trip() {
        let config = RRTConfig::<f64>::default().with_seed(99).with_max_distance(1.5);
        let parsed = RRTConfig::<f64>::from_json_str(&config.to_json().dump()).unwrap();
        assert_close(&parsed, &config);
    }

    fn assert_close(a: &RRTConfig<f64>, b: &RRTConfig<f64>) {
        assert!((a.max_distance - b.max_distance).abs() < 1e-12, "{a:?} != {b:?}");
        assert!((a.goal_bias - b.goal_bias).abs() < 1e-12, "{a:?} != {b:?}");
        assert_eq!(a.seed, b.seed);
        match (a.motion_check_fraction, b.motion_check_fraction) {
            (Some(x), Some(y)) => assert!((x - y).abs() < 1e-12, "{a:?} != {b:?}"),
            (x, y) => assert_eq!(x, y),
        }
    }
}
