//! Free orbit controls and the input surface the camera controller toggles.

use iced::mouse::Button;
use nalgebra::{Point3, Vector3};

use crate::camera::Camera;
use crate::config::OrbitConfig;

/// Pitch limit in degrees, keeps the eye off the poles
const MAX_PITCH: f32 = 89.0;

/// User-driven camera input that must be suspended while a transition owns
/// the camera.
pub trait InputSurface {
    fn set_enabled(&mut self, enabled: bool);
    fn is_enabled(&self) -> bool;
    /// Moves the point the controls orbit around.
    fn set_target(&mut self, target: Point3<f32>);
    /// Re-derives internal orbit parameters after the camera was moved
    /// externally.
    fn sync_from_pose(&mut self, _eye: &Point3<f32>, _target: &Point3<f32>) {}
}

/// Orbit/zoom controls around a movable target.
///
/// Right-drag rotates, scrolling changes the distance. All input is dropped
/// while the controls are disabled.
#[derive(Debug, Clone)]
pub struct OrbitControls {
    /// Point the camera orbits around
    pub target: Point3<f32>,
    /// Eye distance from the target
    pub distance: f32,
    /// Horizontal angle in degrees
    pub yaw: f32,
    /// Vertical angle in degrees, kept within +/-89
    pub pitch: f32,
    /// Whether input is currently accepted
    enabled: bool,
    /// Whether the right mouse button is held
    is_dragging: bool,
    /// Sensitivities and distance limits
    config: OrbitConfig,
}

impl OrbitControls {
    /// Creates enabled controls orbiting the origin.
    pub fn new(config: OrbitConfig) -> Self {
        Self {
            target: Point3::origin(),
            distance: config.max_distance.min(50.0).max(config.min_distance),
            yaw: 45.0,
            pitch: 30.0,
            enabled: true,
            is_dragging: false,
            config,
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.is_dragging
    }

    /// Begins a drag on right press. Returns `false` when disabled.
    pub fn process_mouse_press(&mut self, button: Button) -> bool {
        if button == Button::Right && self.enabled {
            self.is_dragging = true;
            return true;
        }
        false
    }

    /// Ends a drag on right release.
    pub fn process_mouse_release(&mut self, button: Button) -> bool {
        if button == Button::Right && self.is_dragging {
            self.is_dragging = false;
            return true;
        }
        false
    }

    /// Rotates around the target. Returns `false` when the motion was ignored.
    pub fn process_mouse_motion(&mut self, delta_x: f32, delta_y: f32) -> bool {
        if !self.enabled || !self.is_dragging {
            return false;
        }
        self.yaw -= delta_x * self.config.mouse_sensitivity;
        self.pitch += delta_y * self.config.mouse_sensitivity;
        self.pitch = self.pitch.clamp(-MAX_PITCH, MAX_PITCH);
        true
    }

    /// Zooms by changing the distance within the configured range.
    pub fn process_scroll(&mut self, delta: f32) -> bool {
        if !self.enabled {
            return false;
        }
        self.distance -= delta * self.config.zoom_sensitivity;
        self.distance = self
            .distance
            .clamp(self.config.min_distance, self.config.max_distance);
        true
    }

    /// Writes the orbit pose into the camera.
    pub fn update_camera(&self, camera: &mut Camera) {
        let yaw_rad = self.yaw.to_radians();
        let pitch_rad = self.pitch.to_radians();

        let offset = Vector3::new(
            self.distance * pitch_rad.cos() * yaw_rad.sin(),
            self.distance * pitch_rad.sin(),
            self.distance * pitch_rad.cos() * yaw_rad.cos(),
        );

        camera.eye = self.target + offset;
        camera.target = self.target;
    }
}

impl InputSurface for OrbitControls {
    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.is_dragging = false;
        }
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn set_target(&mut self, target: Point3<f32>) {
        self.target = target;
    }

    fn sync_from_pose(&mut self, eye: &Point3<f32>, target: &Point3<f32>) {
        let offset = eye - target;
        let distance = offset.norm();
        self.target = *target;
        if distance <= f32::EPSILON {
            return;
        }
        // Transitions may end closer or farther than free orbit allows, keep
        // the exact distance so the first drag does not jump.
        self.distance = distance;
        self.pitch = (offset.y / distance)
            .clamp(-1.0, 1.0)
            .asin()
            .to_degrees()
            .clamp(-MAX_PITCH, MAX_PITCH);
        self.yaw = offset.x.atan2(offset.z).to_degrees();
    }
}
