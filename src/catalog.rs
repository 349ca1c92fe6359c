//! Warehouse content: sections and the sub-areas inside them.
//!
//! The catalog mirrors the JSON document exactly and is validated once on
//! load.

use std::collections::HashSet;

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

/// Catalog bundled with the binary
const EMBEDDED_CATALOG: &str = include_str!("../assets/warehouse.json");

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("duplicate id '{0}' in catalog")]
    DuplicateId(String),
    #[error("'{id}' has invalid zoom {zoom}")]
    InvalidZoom { id: String, zoom: f32 },
    #[error("'{0}' has a non-positive extent")]
    InvalidExtent(String),
    #[error("catalog contains no sections")]
    Empty,
}

/// A leaf showcase item inside a section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubAreaData {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Ground-level center in world space
    pub position: [f32; 3],
    /// Full width, height and depth
    pub extent: [f32; 3],
    pub zoom: f32,
}

/// A top-level grouping of showcase items with its own camera framing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionData {
    pub id: String,
    pub name: String,
    pub description: String,
    pub position: [f32; 3],
    pub extent: [f32; 3],
    pub zoom: f32,
    pub color: [f32; 3],
    #[serde(default)]
    pub sub_areas: Vec<SubAreaData>,
}

/// Shared geometry of sections and sub-areas.
pub trait Placement {
    fn id(&self) -> &str;
    fn position(&self) -> [f32; 3];
    fn extent(&self) -> [f32; 3];
    fn zoom(&self) -> f32;

    /// Point the camera looks at: the middle of the volume.
    fn focus_point(&self) -> Point3<f32> {
        let [x, y, z] = self.position();
        Point3::new(x, y + self.extent()[1] * 0.5, z)
    }

    fn half_extents(&self) -> Vector3<f32> {
        Vector3::from(self.extent()) * 0.5
    }
}

impl Placement for SectionData {
    fn id(&self) -> &str {
        &self.id
    }
    fn position(&self) -> [f32; 3] {
        self.position
    }
    fn extent(&self) -> [f32; 3] {
        self.extent
    }
    fn zoom(&self) -> f32 {
        self.zoom
    }
}

impl Placement for SubAreaData {
    fn id(&self) -> &str {
        &self.id
    }
    fn position(&self) -> [f32; 3] {
        self.position
    }
    fn extent(&self) -> [f32; 3] {
        self.extent
    }
    fn zoom(&self) -> f32 {
        self.zoom
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WarehouseCatalog {
    pub name: String,
    pub sections: Vec<SectionData>,
}

impl WarehouseCatalog {
    /// The catalog shipped with the application.
    pub fn embedded() -> Result<Self, CatalogError> {
        Self::from_json(EMBEDDED_CATALOG)
    }

    pub fn from_json(source: &str) -> Result<Self, CatalogError> {
        let catalog: Self = serde_json::from_str(source)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Ids are unique across sections and sub-areas so a marker id alone
    /// identifies its entity.
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.sections.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut seen = HashSet::new();
        let entries = self.sections.iter().flat_map(|section| {
            std::iter::once(section as &dyn Placement)
                .chain(section.sub_areas.iter().map(|a| a as &dyn Placement))
        });
        for entry in entries {
            if !seen.insert(entry.id().to_string()) {
                return Err(CatalogError::DuplicateId(entry.id().to_string()));
            }
            let zoom = entry.zoom();
            if !(zoom.is_finite() && zoom > 0.0) {
                return Err(CatalogError::InvalidZoom {
                    id: entry.id().to_string(),
                    zoom,
                });
            }
            if entry.extent().iter().any(|e| !(e.is_finite() && *e > 0.0)) {
                return Err(CatalogError::InvalidExtent(entry.id().to_string()));
            }
        }
        Ok(())
    }

    pub fn section(&self, id: &str) -> Option<&SectionData> {
        self.sections.iter().find(|s| s.id == id)
    }

    pub fn sub_area(&self, section_id: &str, id: &str) -> Option<&SubAreaData> {
        self.section(section_id)?
            .sub_areas
            .iter()
            .find(|a| a.id == id)
    }
}
