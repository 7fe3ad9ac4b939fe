//! Physical display resolution and the canvas-to-display scale correction.
//!
//! The screen source's reported dimensions can diverge from the physical
//! display the window actually sits on: Retina scaling, capture cards, and
//! downscaled capture resolutions all produce a canvas that is not 1:1 with
//! the monitor's pixel grid.  [`RealScale`] folds the source's canvas scale
//! and native dimensions together with the matched display's true pixel
//! extent into a single per-axis conversion factor.

use thiserror::Error;

use crate::domain::scene::SceneItemTransform;

/// Errors produced while resolving the target display.
#[derive(Debug, Error, PartialEq)]
pub enum DisplayError {
    /// The window's position is not inside any enumerated display frame.
    /// Fatal for the invocation: without a display there is no pixel grid to
    /// place the window on.
    #[error("window position ({x}, {y}) is not on any connected display")]
    DisplayNotFound { x: f64, y: f64 },
}

/// A physical monitor's origin and extent in device pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayFrame {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl DisplayFrame {
    /// Returns `true` if the point lies inside this frame.
    ///
    /// Half-open on the far edges, so adjacent displays never both claim a
    /// point on their shared boundary.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }
}

/// Finds the display whose frame contains the given window position.
///
/// # Errors
///
/// Returns [`DisplayError::DisplayNotFound`] when the point is outside every
/// enumerated frame (window dragged off all known displays, or enumeration
/// returned nothing).
pub fn resolve_display(
    x: f64,
    y: f64,
    displays: &[DisplayFrame],
) -> Result<&DisplayFrame, DisplayError> {
    displays
        .iter()
        .find(|frame| frame.contains(x, y))
        .ok_or(DisplayError::DisplayNotFound { x, y })
}

/// Per-axis conversion factor from canvas units to physical display pixels.
///
/// `canvas_distance = physical_distance * real_scale`, therefore placement
/// divides canvas distances by this factor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RealScale {
    pub x: f64,
    pub y: f64,
}

impl RealScale {
    /// Derives the factor from the screen source's transform and the matched
    /// display: `canvas_scale * source_dimension / display_pixel_extent` per
    /// axis.
    ///
    /// When the capture resolution matches the display exactly this reduces
    /// to the plain canvas scale; on a 2x Retina display capturing at native
    /// resolution the factor doubles relative to that.
    pub fn derive(screen: &SceneItemTransform, display: &DisplayFrame) -> Self {
        Self {
            x: screen.scale_x * screen.source_width / display.width,
            y: screen.scale_y * screen.source_height / display.height,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
