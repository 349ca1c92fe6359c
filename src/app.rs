//! Application glue for the warehouse showcase.
//!
//! Owns the navigation state, the camera transition controller and the scene
//! presenter, and wires them together: navigation callbacks start camera
//! transitions, and finished transitions hand marker interaction back to the
//! presenter.

use std::sync::mpsc::{Receiver, Sender, channel};

use iced::mouse::Button;
use iced::{Point, Size};
use log::{debug, info, warn};

use crate::camera::{CameraTransitionController, Projection};
use crate::catalog::{SectionData, SubAreaData, WarehouseCatalog};
use crate::config::ShowcaseConfig;
use crate::input::OrbitControls;
use crate::navigation::{NavigationLevel, NavigationState, Selection};
use crate::presenter::{MarkerKind, ScenePresenter, WarehousePresenter};
use crate::ray_casting::calculate_mouse_ray;

pub type WarehouseNavigation = NavigationState<SectionData, SubAreaData>;

/// Notifications routed from navigation and camera callbacks back into the
/// showcase.
#[derive(Debug, Clone, PartialEq)]
pub enum ShowcaseEvent {
    LevelChanged {
        level: NavigationLevel,
        section: Option<Selection<SectionData>>,
        sub_area: Option<Selection<SubAreaData>>,
    },
    SectionEntered(String),
    SubAreaSelected(String),
    TransitionFinished(NavigationLevel),
}

/// The showcase session.
///
/// Every navigation request is processed to completion, including starting
/// the camera transition, before the call returns. `update` then moves the
/// camera once per frame.
pub struct Showcase<P = WarehousePresenter> {
    navigation: WarehouseNavigation,
    camera: CameraTransitionController<OrbitControls>,
    presenter: P,
    catalog: WarehouseCatalog,
    projection: Projection,
    sender: Sender<ShowcaseEvent>,
    events: Receiver<ShowcaseEvent>,
}

impl<P: ScenePresenter<SectionData, SubAreaData>> Showcase<P> {
    /// Wires navigation callbacks into the event queue and places the camera
    /// at the overview.
    pub fn new(config: ShowcaseConfig, catalog: WarehouseCatalog, presenter: P) -> Self {
        let (sender, events) = channel();

        let mut navigation = WarehouseNavigation::new();
        let level_sender = sender.clone();
        navigation.set_on_level_change(Box::new(move |level, section, sub_area| {
            let _ = level_sender.send(ShowcaseEvent::LevelChanged {
                level,
                section: section.cloned(),
                sub_area: sub_area.cloned(),
            });
        }));
        let section_sender = sender.clone();
        navigation.set_on_section_change(Box::new(move |section| {
            let _ = section_sender.send(ShowcaseEvent::SectionEntered(section.id.clone()));
        }));
        let sub_area_sender = sender.clone();
        navigation.set_on_sub_area_select(Box::new(move |sub_area| {
            let _ = sub_area_sender.send(ShowcaseEvent::SubAreaSelected(sub_area.id.clone()));
        }));

        let camera =
            CameraTransitionController::new(config.camera, OrbitControls::new(config.orbit));

        let mut showcase = Self {
            navigation,
            camera,
            presenter,
            catalog,
            projection: Projection::default(),
            sender,
            events,
        };
        showcase
            .presenter
            .refresh_markers(NavigationLevel::Overview, None, None);
        showcase
    }

    pub fn navigation(&self) -> &WarehouseNavigation {
        &self.navigation
    }

    pub fn camera(&self) -> &CameraTransitionController<OrbitControls> {
        &self.camera
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn catalog(&self) -> &WarehouseCatalog {
        &self.catalog
    }

    /// Projection used for picking
    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    /// Whether a camera transition is running
    pub fn is_in_motion(&self) -> bool {
        self.camera.is_in_motion()
    }

    /// Handles viewport resize by updating the projection aspect ratio.
    pub fn resize(&mut self, size: Size) {
        if size.width > 0.0 && size.height > 0.0 {
            self.projection.aspect = size.width / size.height;
        }
    }

    /// Enters a section by id. Unknown ids are ignored.
    pub fn select_section(&mut self, id: &str) -> bool {
        let Some(data) = self.catalog.section(id).cloned() else {
            warn!("unknown section '{}'", id);
            return false;
        };
        self.navigation.navigate_to_section(id, data);
        self.process_events();
        true
    }

    /// Opens a sub-area of the current section by id.
    pub fn open_sub_area(&mut self, id: &str) -> bool {
        let Some(section) = self.navigation.current_section() else {
            warn!("cannot open '{}' without a section", id);
            return false;
        };
        let Some(data) = self.catalog.sub_area(&section.id, id).cloned() else {
            warn!("'{}' is not part of section '{}'", id, section.id);
            return false;
        };
        let opened = self.navigation.open_detail(id, data);
        self.process_events();
        opened
    }

    /// Leaves the detail view for its section. Returns false when no detail
    /// is open.
    pub fn close_detail(&mut self) -> bool {
        let closed = self.navigation.close_detail();
        self.process_events();
        closed
    }

    /// Steps back one level. Returns false at the overview.
    pub fn go_back(&mut self) -> bool {
        let moved = self.navigation.go_back();
        self.process_events();
        moved
    }

    /// Returns to the overview from anywhere.
    ///
    /// A running transition is cancelled first, so the camera starts the trip
    /// home from the pose it was heading to.
    pub fn reset(&mut self) {
        self.camera.cancel();
        self.navigation.reset_to_overview();
        self.process_events();
    }

    /// Keyboard escape: closes the detail view, or leaves the section.
    pub fn escape(&mut self) -> bool {
        match self.navigation.current_level() {
            NavigationLevel::Detail => self.close_detail(),
            NavigationLevel::Section => self.go_back(),
            NavigationLevel::Overview => false,
        }
    }

    /// Advances the camera. Call once per rendered frame.
    pub fn update(&mut self, delta_time: f32) {
        self.camera.update(delta_time);
        self.process_events();
    }

    /// Starts an orbit drag. Ignored while the camera is moving.
    pub fn orbit_press(&mut self, button: Button) -> bool {
        self.camera.controls_mut().process_mouse_press(button)
    }

    /// Ends an orbit drag.
    pub fn orbit_release(&mut self, button: Button) -> bool {
        self.camera.controls_mut().process_mouse_release(button)
    }

    /// Rotates the camera around its target by a cursor delta in pixels.
    pub fn orbit_drag(&mut self, delta_x: f32, delta_y: f32) -> bool {
        let (controls, camera) = self.camera.controls_and_camera_mut();
        if !controls.process_mouse_motion(delta_x, delta_y) {
            return false;
        }
        controls.update_camera(camera);
        true
    }

    /// Moves the camera toward or away from its target.
    pub fn orbit_scroll(&mut self, delta: f32) -> bool {
        let (controls, camera) = self.camera.controls_and_camera_mut();
        if !controls.process_scroll(delta) {
            return false;
        }
        controls.update_camera(camera);
        true
    }

    fn process_events(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            match event {
                ShowcaseEvent::LevelChanged {
                    level,
                    section,
                    sub_area,
                } => self.on_level_changed(level, section.as_ref(), sub_area.as_ref()),
                ShowcaseEvent::SectionEntered(id) => info!("entered section '{}'", id),
                ShowcaseEvent::SubAreaSelected(id) => info!("selected sub-area '{}'", id),
                ShowcaseEvent::TransitionFinished(level) => self.on_transition_finished(level),
            }
        }
    }

    fn on_level_changed(
        &mut self,
        level: NavigationLevel,
        section: Option<&Selection<SectionData>>,
        sub_area: Option<&Selection<SubAreaData>>,
    ) {
        debug!("level changed to {}", level);
        self.presenter.set_markers_interactive(false);

        let focus = match (level, section, sub_area) {
            (NavigationLevel::Overview, _, _) => {
                let callback = self.finished_callback(level);
                self.camera.animate_to_overview(Some(callback));
                return;
            }
            (NavigationLevel::Section, Some(section), _) => {
                self.presenter.section_focus(&section.id, &section.data)
            }
            (NavigationLevel::Detail, _, Some(sub_area)) => {
                self.presenter.sub_area_focus(&sub_area.id, &sub_area.data)
            }
            _ => None,
        };

        let Some(focus) = focus else {
            warn!("no camera framing for {}, keeping current view", level);
            self.refresh_markers();
            return;
        };
        let callback = self.finished_callback(level);
        if let Err(err) = self.camera.animate_to(focus.target, focus.zoom, Some(callback)) {
            warn!("cannot frame {}: {}", level, err);
            self.refresh_markers();
        }
    }

    fn on_transition_finished(&mut self, level: NavigationLevel) {
        // A superseded transition reports in while its replacement is moving
        if self.camera.is_in_motion() || level != self.navigation.current_level() {
            debug!("ignoring stale transition completion for {}", level);
            return;
        }
        self.refresh_markers();
    }

    fn refresh_markers(&mut self) {
        self.presenter.refresh_markers(
            self.navigation.current_level(),
            self.navigation.current_section(),
            self.navigation.current_sub_area(),
        );
    }

    fn finished_callback(&self, level: NavigationLevel) -> Box<dyn FnOnce()> {
        let sender = self.sender.clone();
        Box::new(move || {
            let _ = sender.send(ShowcaseEvent::TransitionFinished(level));
        })
    }
}

impl Showcase<WarehousePresenter> {
    /// Showcase over the bundled catalog with the default presenter.
    pub fn with_catalog(config: ShowcaseConfig, catalog: WarehouseCatalog) -> Self {
        let presenter = WarehousePresenter::new(catalog.clone());
        Self::new(config, catalog, presenter)
    }

    /// Handles a click inside the viewport. Clicks are ignored while the
    /// camera is moving.
    pub fn click_at(&mut self, position: Point, viewport: Size) -> bool {
        if self.is_in_motion() {
            return false;
        }
        let Some(ray) =
            calculate_mouse_ray(position, viewport, self.camera.camera(), &self.projection)
        else {
            return false;
        };
        let Some(marker) = self.presenter.pick(&ray) else {
            return false;
        };

        let id = marker.id.clone();
        match marker.kind.clone() {
            MarkerKind::Section => self.select_section(&id),
            MarkerKind::SubArea { section_id } => {
                let in_section = self.navigation.is_at_section()
                    && self.navigation.current_section().map(|s| s.id.as_str())
                        == Some(section_id.as_str());
                in_section && self.open_sub_area(&id)
            }
        }
    }

    /// Updates marker hover state. Returns `true` when it changed.
    pub fn hover_at(&mut self, position: Option<Point>, viewport: Size) -> bool {
        if self.is_in_motion() {
            return self.presenter.hover(None);
        }
        let ray = position.and_then(|p| {
            calculate_mouse_ray(p, viewport, self.camera.camera(), &self.projection)
        });
        self.presenter.hover(ray.as_ref())
    }
}

impl<P: std::fmt::Debug> std::fmt::Debug for Showcase<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Showcase")
            .field("navigation", &self.navigation)
            .field("presenter", &self.presenter)
            .field("projection", &self.projection)
            .finish_non_exhaustive()
    }
}
