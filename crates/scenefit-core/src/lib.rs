//! # scenefit-core
//!
//! Shared library for SceneFit: the geometry-reconciliation engine, scene
//! item classification, display/scale resolution, placement math, and the
//! obs-websocket v5 wire types.
//!
//! This crate has zero dependencies on OS APIs, sockets, or UI; everything
//! here is deterministic and unit-testable.  The application crate
//! (`scenefit-cli`) supplies the OBS connection, the OS window automation,
//! and the settings store, and drives this crate's logic through a strictly
//! sequential pipeline:
//!
//! ```text
//! scene items ──▶ scene::classify ──▶ geometry::reconcile
//!                                          │
//!                display::resolve_display ─┤
//!                display::RealScale        │
//!                                          ▼
//!                              placement::placement_target
//! ```

pub mod domain;
pub mod protocol;

// Re-export the most-used types at the crate root so callers can write
// `scenefit_core::reconcile` instead of the full module path.
pub use domain::display::{resolve_display, DisplayError, DisplayFrame, RealScale};
pub use domain::geometry::{
    reconcile, GeometryError, Padding, Rect, TrimmedEdges, VisibleRegion,
};
pub use domain::placement::{placement_target, PhysicalRect, WindowGeometry};
pub use domain::scene::{classify, SceneError, SceneItem, SceneItemTransform, ScenePartition};
pub use protocol::auth::authentication_string;
