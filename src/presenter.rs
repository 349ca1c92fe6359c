//! Scene presenter: the bridge between navigation and what is on screen.
//!
//! The presenter knows where things are. Given a navigation target it
//! supplies camera framing, and once the camera settles it decides which
//! markers can be seen and clicked.

use log::debug;
use nalgebra::Point3;

use crate::catalog::{Placement, SectionData, SubAreaData, WarehouseCatalog};
use crate::navigation::{NavigationLevel, Selection};
use crate::ray_casting::{AABB, Ray, ray_aabb_intersection};

/// Where the camera should look and how close it should be.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraFocus {
    pub target: Point3<f32>,
    pub zoom: f32,
}

/// Collaborator that frames navigation targets and manages markers.
pub trait ScenePresenter<S, A> {
    fn section_focus(&self, id: &str, data: &S) -> Option<CameraFocus>;
    fn sub_area_focus(&self, id: &str, data: &A) -> Option<CameraFocus>;
    /// Blocks or restores marker interaction, used around camera transitions.
    fn set_markers_interactive(&mut self, interactive: bool);
    /// Rebuilds marker visibility and interactivity for a settled level.
    fn refresh_markers(
        &mut self,
        level: NavigationLevel,
        section: Option<&Selection<S>>,
        sub_area: Option<&Selection<A>>,
    );
}

#[derive(Debug, Clone, PartialEq)]
pub enum MarkerKind {
    Section,
    SubArea { section_id: String },
}

/// A clickable hotspot floating over a section or sub-area.
#[derive(Debug, Clone)]
pub struct Marker {
    pub id: String,
    pub label: String,
    pub kind: MarkerKind,
    pub anchor: Point3<f32>,
    pub bounds: AABB,
    pub color: [f32; 3],
    pub visible: bool,
    pub interactive: bool,
}

impl Marker {
    fn from_placement(
        placement: &dyn Placement,
        label: &str,
        kind: MarkerKind,
        color: [f32; 3],
    ) -> Self {
        let center = placement.focus_point();
        let half = placement.half_extents();
        Self {
            id: placement.id().to_string(),
            label: label.to_string(),
            kind,
            anchor: Point3::new(center.x, center.y + half.y, center.z),
            bounds: AABB::from_center_half_extents(center, half),
            color,
            visible: false,
            interactive: false,
        }
    }
}

/// Presenter over the warehouse catalog.
#[derive(Debug)]
pub struct WarehousePresenter {
    catalog: WarehouseCatalog,
    markers: Vec<Marker>,
    hovered: Option<String>,
}

impl WarehousePresenter {
    pub fn new(catalog: WarehouseCatalog) -> Self {
        let mut markers = Vec::new();
        for section in &catalog.sections {
            markers.push(Marker::from_placement(
                section,
                &section.name,
                MarkerKind::Section,
                section.color,
            ));
            // Sub-areas use a lighter tint of their section color
            let tint = section.color.map(|c| c + (1.0 - c) * 0.45);
            for sub_area in &section.sub_areas {
                markers.push(Marker::from_placement(
                    sub_area,
                    &sub_area.name,
                    MarkerKind::SubArea {
                        section_id: section.id.clone(),
                    },
                    tint,
                ));
            }
        }

        let mut presenter = Self {
            catalog,
            markers,
            hovered: None,
        };
        presenter.refresh_markers(NavigationLevel::Overview, None, None);
        presenter
    }

    pub fn catalog(&self) -> &WarehouseCatalog {
        &self.catalog
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn marker(&self, id: &str) -> Option<&Marker> {
        self.markers.iter().find(|m| m.id == id)
    }

    pub fn hovered(&self) -> Option<&Marker> {
        let id = self.hovered.as_deref()?;
        self.marker(id)
    }

    /// Nearest visible, interactive marker hit by the ray.
    pub fn pick(&self, ray: &Ray) -> Option<&Marker> {
        self.markers
            .iter()
            .filter(|m| m.visible && m.interactive)
            .filter_map(|m| ray_aabb_intersection(ray, &m.bounds).map(|d| (d, m)))
            .min_by(|(a, _), (b, _)| a.total_cmp(b))
            .map(|(_, m)| m)
    }

    /// Updates the hovered marker. Returns `true` when it changed.
    pub fn hover(&mut self, ray: Option<&Ray>) -> bool {
        let next = ray.and_then(|r| self.pick(r)).map(|m| m.id.clone());
        if next == self.hovered {
            return false;
        }
        self.hovered = next;
        true
    }
}

impl ScenePresenter<SectionData, SubAreaData> for WarehousePresenter {
    fn section_focus(&self, _id: &str, data: &SectionData) -> Option<CameraFocus> {
        Some(CameraFocus {
            target: data.focus_point(),
            zoom: data.zoom,
        })
    }

    fn sub_area_focus(&self, _id: &str, data: &SubAreaData) -> Option<CameraFocus> {
        Some(CameraFocus {
            target: data.focus_point(),
            zoom: data.zoom,
        })
    }

    fn set_markers_interactive(&mut self, interactive: bool) {
        if !interactive {
            self.hovered = None;
            for marker in &mut self.markers {
                marker.interactive = false;
            }
        }
        // Restoring interactivity needs the level, see refresh_markers
    }

    fn refresh_markers(
        &mut self,
        level: NavigationLevel,
        section: Option<&Selection<SectionData>>,
        _sub_area: Option<&Selection<SubAreaData>>,
    ) {
        let section_id = section.map(|s| s.id.as_str());
        for marker in &mut self.markers {
            let (visible, interactive) = match (&marker.kind, level) {
                (MarkerKind::Section, NavigationLevel::Overview) => (true, true),
                // Other sections stay reachable from a section
                (MarkerKind::Section, NavigationLevel::Section) => {
                    (true, Some(marker.id.as_str()) != section_id)
                }
                (MarkerKind::Section, NavigationLevel::Detail) => (true, false),
                (MarkerKind::SubArea { .. }, NavigationLevel::Overview) => (false, false),
                (MarkerKind::SubArea { section_id: parent }, NavigationLevel::Section) => {
                    let own = Some(parent.as_str()) == section_id;
                    (own, own)
                }
                (MarkerKind::SubArea { section_id: parent }, NavigationLevel::Detail) => {
                    (Some(parent.as_str()) == section_id, false)
                }
            };
            marker.visible = visible;
            marker.interactive = interactive;
        }

        if self.hovered().is_some_and(|m| !m.interactive) {
            self.hovered = None;
        }
        debug!(
            "markers refreshed for {}: {} interactive",
            level,
            self.markers.iter().filter(|m| m.interactive).count()
        );
    }
}
