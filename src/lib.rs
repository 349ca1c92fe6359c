//! Interactive warehouse showcase.
//!
//! A three-level drill-down (overview, section, detail) over a virtual
//! warehouse. Navigation changes drive animated camera transitions; the
//! camera hands control back to free orbiting once it settles.

pub mod app;
pub mod camera;
pub mod catalog;
pub mod config;
pub mod input;
pub mod math;
pub mod navigation;
pub mod presenter;
pub mod ray_casting;

pub use app::{Showcase, ShowcaseEvent};
pub use camera::{Camera, CameraError, CameraPose, CameraTransitionController, Projection};
pub use catalog::{CatalogError, SectionData, SubAreaData, WarehouseCatalog};
pub use config::{CameraConfig, ConfigError, OrbitConfig, ShowcaseConfig};
pub use navigation::{NavigationLevel, NavigationState, Selection};
pub use presenter::{CameraFocus, ScenePresenter, WarehousePresenter};
