//! Showcase configuration.
//!
//! Every value is fixed at startup. Defaults come from the constants below and
//! can be overridden by a JSON document.

use nalgebra::Point3;
use serde::{Deserialize, Serialize};

/// Duration of every camera transition in milliseconds
const TRANSITION_DURATION_MS: f32 = 1200.0;
/// Eye distance from the target at zoom 1.0
const BASE_DISTANCE: f32 = 30.0;
/// Eye height above the target at zoom 1.0
const BASE_ELEVATION: f32 = 20.0;
/// Horizontal angle of the eye around the target in degrees
const AZIMUTH_DEGREES: f32 = 45.0;

const OVERVIEW_POSITION: [f32; 3] = [45.0, 40.0, 45.0];
const OVERVIEW_TARGET: [f32; 3] = [0.0, 0.0, 0.0];

const MOUSE_SENSITIVITY: f32 = 0.5;
const ZOOM_SENSITIVITY: f32 = 1.0;
const MIN_DISTANCE: f32 = 5.0;
const MAX_DISTANCE: f32 = 120.0;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("transition duration must be positive, got {0} ms")]
    InvalidDuration(f32),
    #[error("{name} must be a positive finite number, got {value}")]
    NonPositive { name: &'static str, value: f32 },
    #[error("orbit distance range is empty: min {min} >= max {max}")]
    EmptyDistanceRange { min: f32, max: f32 },
    #[error("overview pose has identical position and target")]
    DegenerateOverview,
    #[error("azimuth must be a finite angle, got {0} degrees")]
    InvalidAzimuth(f32),
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// The fixed pose the camera returns to at the overview level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OverviewPose {
    pub position: [f32; 3],
    pub target: [f32; 3],
}

impl OverviewPose {
    pub fn position(&self) -> Point3<f32> {
        Point3::from(self.position)
    }

    pub fn target(&self) -> Point3<f32> {
        Point3::from(self.target)
    }
}

/// Geometry and timing for animated camera transitions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub transition_duration_ms: f32,
    pub base_distance: f32,
    pub base_elevation: f32,
    pub azimuth_degrees: f32,
    pub overview: OverviewPose,
}

impl CameraConfig {
    /// Transition duration converted to seconds, the unit `update` consumes.
    pub fn duration_secs(&self) -> f32 {
        self.transition_duration_ms / 1000.0
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            transition_duration_ms: TRANSITION_DURATION_MS,
            base_distance: BASE_DISTANCE,
            base_elevation: BASE_ELEVATION,
            azimuth_degrees: AZIMUTH_DEGREES,
            overview: OverviewPose {
                position: OVERVIEW_POSITION,
                target: OVERVIEW_TARGET,
            },
        }
    }
}

/// Free orbit/pan behaviour while no transition is running.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbitConfig {
    pub mouse_sensitivity: f32,
    pub zoom_sensitivity: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl Default for OrbitConfig {
    fn default() -> Self {
        Self {
            mouse_sensitivity: MOUSE_SENSITIVITY,
            zoom_sensitivity: ZOOM_SENSITIVITY,
            min_distance: MIN_DISTANCE,
            max_distance: MAX_DISTANCE,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShowcaseConfig {
    pub camera: CameraConfig,
    pub orbit: OrbitConfig,
}

impl ShowcaseConfig {
    /// Parses a JSON document, filling omitted fields with defaults, and
    /// validates the result.
    pub fn from_json(source: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let camera = &self.camera;
        if !(camera.transition_duration_ms.is_finite() && camera.transition_duration_ms > 0.0) {
            return Err(ConfigError::InvalidDuration(camera.transition_duration_ms));
        }
        positive("base_distance", camera.base_distance)?;
        positive("base_elevation", camera.base_elevation)?;
        if !camera.azimuth_degrees.is_finite() {
            return Err(ConfigError::InvalidAzimuth(camera.azimuth_degrees));
        }
        if camera.overview.position == camera.overview.target {
            return Err(ConfigError::DegenerateOverview);
        }

        let orbit = &self.orbit;
        positive("mouse_sensitivity", orbit.mouse_sensitivity)?;
        positive("zoom_sensitivity", orbit.zoom_sensitivity)?;
        positive("min_distance", orbit.min_distance)?;
        positive("max_distance", orbit.max_distance)?;
        if orbit.min_distance >= orbit.max_distance {
            return Err(ConfigError::EmptyDistanceRange {
                min: orbit.min_distance,
                max: orbit.max_distance,
            });
        }
        Ok(())
    }
}

fn positive(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = ShowcaseConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.camera.duration_secs(), 1.2);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config =
            ShowcaseConfig::from_json(r#"{ "camera": { "transition_duration_ms": 600.0 } }"#)
                .unwrap();
        assert_eq!(config.camera.transition_duration_ms, 600.0);
        assert_eq!(config.camera.base_distance, BASE_DISTANCE);
        assert_eq!(config.orbit, OrbitConfig::default());
    }

    #[test]
    fn test_rejects_zero_duration() {
        let mut config = ShowcaseConfig::default();
        config.camera.transition_duration_ms = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidDuration(d)) if d == 0.0
        ));
    }

    #[test]
    fn test_rejects_inverted_distance_range() {
        let mut config = ShowcaseConfig::default();
        config.orbit.min_distance = 50.0;
        config.orbit.max_distance = 10.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::EmptyDistanceRange { .. })
        ));
    }

    #[test]
    fn test_rejects_non_finite_azimuth() {
        let mut config = ShowcaseConfig::default();
        config.camera.azimuth_degrees = f32::INFINITY;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidAzimuth(a)) if a.is_infinite()
        ));
    }

    #[test]
    fn test_negative_azimuth_is_allowed() {
        let mut config = ShowcaseConfig::default();
        config.camera.azimuth_degrees = -135.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(
            ShowcaseConfig::from_json("{ camera: }"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_parse_error_keeps_source() {
        use std::error::Error;

        let err = ShowcaseConfig::from_json("[1, 2").unwrap_err();
        let source = err.source().expect("parse errors carry their cause");
        assert!(source.is::<serde_json::Error>());
    }
}
