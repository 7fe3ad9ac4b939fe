//! Window placement math: from the reconciled canvas region to a physical
//! target rectangle for the frontmost window.

use crate::domain::display::RealScale;
use crate::domain::geometry::VisibleRegion;
use crate::domain::scene::SceneItemTransform;

/// The frontmost window's current position and size in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowGeometry {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// A target rectangle for the window, in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicalRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Computes where the window should be moved and how large it should become.
///
/// The reconciled region, expressed relative to the screen source's canvas
/// origin, is divided by the real per-axis scale to obtain physical-pixel
/// offsets, which are then anchored at the window's current origin.  The
/// extents are clamped so they never exceed the window's current size; an
/// off-screen window origin feeding the division cannot balloon the result.
pub fn placement_target(
    window: &WindowGeometry,
    region: &VisibleRegion,
    screen: &SceneItemTransform,
    scale: &RealScale,
) -> PhysicalRect {
    let rel_left = region.canvas.left - screen.position_x;
    let rel_top = region.canvas.top - screen.position_y;

    PhysicalRect {
        x: rel_left / scale.x + window.x,
        y: rel_top / scale.y + window.y,
        width: (region.canvas.width() / scale.x).min(window.width),
        height: (region.canvas.height() / scale.y).min(window.height),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
