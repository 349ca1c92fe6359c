//! Camera model and the transition controller that animates it.
//!
//! The controller owns the live camera while a transition is running and
//! hands it back to the orbit controls once the transition completes.

use log::{debug, trace, warn};
use nalgebra::{Matrix4, Point3, Vector3};

use crate::config::CameraConfig;
use crate::input::InputSurface;
use crate::math::{ease_in_out_cubic, lerp_point, orbit_offset};

#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub eye: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
}

impl Camera {
    pub fn from_pose(pose: &CameraPose) -> Self {
        Self {
            eye: pose.position,
            target: pose.target,
            up: Vector3::y(),
        }
    }

    pub fn pose(&self) -> CameraPose {
        CameraPose {
            position: self.eye,
            target: self.target,
        }
    }

    pub fn build_view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.eye, &self.target, &self.up)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub aspect: f32,
    /// Vertical field of view in radians
    pub fovy: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Projection {
    pub fn build_projection_matrix(&self) -> Matrix4<f32> {
        Matrix4::new_perspective(self.aspect, self.fovy, self.znear, self.zfar)
    }
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            aspect: 800.0 / 600.0,
            fovy: 45.0_f32.to_radians(),
            znear: 0.1,
            zfar: 500.0,
        }
    }
}

/// Eye position and look-at target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
}

impl CameraPose {
    pub fn lerp(&self, other: &CameraPose, t: f32) -> CameraPose {
        CameraPose {
            position: lerp_point(&self.position, &other.position, t),
            target: lerp_point(&self.target, &other.target, t),
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum CameraError {
    #[error("zoom level must be a positive finite number, got {0}")]
    InvalidZoom(f32),
    #[error("camera target contains a non-finite coordinate")]
    NonFiniteTarget,
}

/// Callback fired once when a transition reaches its end pose.
pub type CompletionCallback = Box<dyn FnOnce()>;

/// A single in-flight animation between two poses.
pub struct TransitionRequest {
    pub start: CameraPose,
    pub end: CameraPose,
    pub duration_secs: f32,
    progress: f32,
    on_complete: Option<CompletionCallback>,
}

impl TransitionRequest {
    pub fn progress(&self) -> f32 {
        self.progress
    }
}

impl std::fmt::Debug for TransitionRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransitionRequest")
            .field("start", &self.start)
            .field("end", &self.end)
            .field("duration_secs", &self.duration_secs)
            .field("progress", &self.progress)
            .field("has_callback", &self.on_complete.is_some())
            .finish()
    }
}

/// Animates the camera between poses and gates user input around each
/// animation.
///
/// At most one transition is in flight. Starting a new one force-completes
/// the current one first, so its callback fires with its own end pose.
pub struct CameraTransitionController<S: InputSurface> {
    camera: Camera,
    controls: S,
    config: CameraConfig,
    transition: Option<TransitionRequest>,
    /// Progress of the most recent transition, kept after completion
    last_progress: f32,
}

impl<S: InputSurface> CameraTransitionController<S> {
    /// Creates a controller resting at the configured overview pose.
    pub fn new(config: CameraConfig, mut controls: S) -> Self {
        let pose = CameraPose {
            position: config.overview.position(),
            target: config.overview.target(),
        };
        controls.set_enabled(true);
        controls.sync_from_pose(&pose.position, &pose.target);

        Self {
            camera: Camera::from_pose(&pose),
            controls,
            config,
            transition: None,
            last_progress: 1.0,
        }
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn controls(&self) -> &S {
        &self.controls
    }

    pub fn controls_mut(&mut self) -> &mut S {
        &mut self.controls
    }

    /// Splits the borrow so orbit controls can write into the camera.
    pub fn controls_and_camera_mut(&mut self) -> (&mut S, &mut Camera) {
        (&mut self.controls, &mut self.camera)
    }

    pub fn is_in_motion(&self) -> bool {
        self.transition.is_some()
    }

    /// Progress of the current transition, or of the last one when idle.
    pub fn progress(&self) -> f32 {
        self.transition
            .as_ref()
            .map_or(self.last_progress, TransitionRequest::progress)
    }

    pub fn transition(&self) -> Option<&TransitionRequest> {
        self.transition.as_ref()
    }

    /// End pose for a target viewed at the given zoom.
    pub fn pose_for(&self, target: Point3<f32>, zoom: f32) -> Result<CameraPose, CameraError> {
        if !(zoom.is_finite() && zoom > 0.0) {
            return Err(CameraError::InvalidZoom(zoom));
        }
        if !target.coords.iter().all(|c| c.is_finite()) {
            return Err(CameraError::NonFiniteTarget);
        }
        let offset = orbit_offset(
            self.config.base_distance,
            self.config.base_elevation,
            self.config.azimuth_degrees,
            zoom,
        );
        Ok(CameraPose {
            position: target + offset,
            target,
        })
    }

    /// Starts animating toward `target` framed at `zoom`.
    pub fn animate_to(
        &mut self,
        target: Point3<f32>,
        zoom: f32,
        on_complete: Option<CompletionCallback>,
    ) -> Result<(), CameraError> {
        let end = self.pose_for(target, zoom)?;
        self.start_transition(end, on_complete);
        Ok(())
    }

    /// Starts animating back to the configured overview pose.
    pub fn animate_to_overview(&mut self, on_complete: Option<CompletionCallback>) {
        let end = CameraPose {
            position: self.config.overview.position(),
            target: self.config.overview.target(),
        };
        self.start_transition(end, on_complete);
    }

    fn start_transition(&mut self, end: CameraPose, on_complete: Option<CompletionCallback>) {
        if self.transition.is_some() {
            debug!("superseding in-flight camera transition");
            self.complete_animation();
        }

        let start = self.camera.pose();
        debug!(
            "camera transition {:?} -> {:?} over {:.2}s",
            start.position,
            end.position,
            self.config.duration_secs()
        );

        self.controls.set_enabled(false);
        self.last_progress = 0.0;
        self.transition = Some(TransitionRequest {
            start,
            end,
            duration_secs: self.config.duration_secs(),
            progress: 0.0,
            on_complete,
        });
    }

    /// Advances the in-flight transition by `delta_time` seconds.
    ///
    /// A negative step counts as zero. A non-finite step, or a duration that
    /// is not a positive finite number, finishes the transition at once so
    /// input is never left disabled.
    pub fn update(&mut self, delta_time: f32) {
        let Some(transition) = self.transition.as_mut() else {
            return;
        };

        let duration = transition.duration_secs;
        if !delta_time.is_finite() || !(duration.is_finite() && duration > 0.0) {
            warn!(
                "finishing camera transition early (step {}, duration {}s)",
                delta_time, duration
            );
            self.complete_animation();
            return;
        }

        transition.progress += delta_time.max(0.0) / duration;
        if transition.progress >= 1.0 {
            self.complete_animation();
            return;
        }

        let t = ease_in_out_cubic(transition.progress);
        let pose = transition.start.lerp(&transition.end, t);
        trace!("camera progress {:.3} eased {:.3}", transition.progress, t);

        self.camera.eye = pose.position;
        self.camera.target = pose.target;
        self.controls.set_target(pose.target);
    }

    /// Snaps the in-flight transition to its end pose and fires its callback.
    ///
    /// Input is re-enabled before the callback runs. Does nothing when idle.
    pub fn complete_animation(&mut self) {
        let Some(mut transition) = self.transition.take() else {
            return;
        };
        transition.progress = 1.0;
        self.last_progress = 1.0;

        self.camera.eye = transition.end.position;
        self.camera.target = transition.end.target;
        self.controls.set_target(transition.end.target);
        self.controls
            .sync_from_pose(&transition.end.position, &transition.end.target);
        self.controls.set_enabled(true);

        if let Some(callback) = transition.on_complete.take() {
            callback();
        }
    }

    /// Ends the in-flight transition immediately. The camera lands on the
    /// transition's end pose and its callback still fires.
    pub fn cancel(&mut self) {
        self.complete_animation();
    }

    /// Places the camera without animating.
    ///
    /// An in-flight transition is completed first so its callback is not lost.
    pub fn set_immediate(&mut self, target: Point3<f32>, zoom: f32) -> Result<(), CameraError> {
        let pose = self.pose_for(target, zoom)?;
        self.complete_animation();

        self.camera.eye = pose.position;
        self.camera.target = pose.target;
        self.controls.set_target(pose.target);
        self.controls.sync_from_pose(&pose.position, &pose.target);
        Ok(())
    }
}
