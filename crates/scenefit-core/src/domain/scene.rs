//! Scene item model and screen/camera classification.
//!
//! A scene item is one capture source placed on the OBS canvas.  The resize
//! pipeline cares about exactly two roles:
//!
//! - the single **screen** source whose visible region the window is fitted
//!   into, and
//! - zero or more **camera** sources that may occlude it.
//!
//! An item's role is decided by its input-kind tag or, as an override for
//! unusual capture setups (capture cards, NDI feeds), by a reserved marker
//! substring in the source name.  Disabled items never participate.

use thiserror::Error;

use crate::domain::geometry::Rect;

/// Input kind reported by OBS for the macOS display-capture source.
pub const SCREEN_INPUT_KIND: &str = "screen_capture";
/// Input kind reported by OBS for the macOS AV capture (camera) source.
pub const CAMERA_INPUT_KIND: &str = "av_capture_input_v2";
/// Name marker that forces an item to be treated as the screen source.
pub const SCREEN_NAME_MARKER: &str = "#screen#";
/// Name marker that forces an item to be treated as a camera source.
pub const CAMERA_NAME_MARKER: &str = "#cam#";

/// Errors produced while classifying scene items.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SceneError {
    /// No enabled item matched the screen classification; the pipeline has
    /// nothing to fit the window into and must abort before touching the OS.
    #[error("no enabled screen-capture source found in the current scene")]
    NoScreenSource,
}

/// Placement of a capture source on the canvas.
///
/// `width`/`height` are the canvas-space extent after scaling;
/// `source_width`/`source_height` are the native pixel dimensions of the
/// underlying capture before the canvas scale is applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneItemTransform {
    pub position_x: f64,
    pub position_y: f64,
    pub width: f64,
    pub height: f64,
    pub scale_x: f64,
    pub scale_y: f64,
    pub source_width: f64,
    pub source_height: f64,
}

impl SceneItemTransform {
    /// The item's footprint on the canvas.
    pub fn canvas_rect(&self) -> Rect {
        Rect::from_origin_size(self.position_x, self.position_y, self.width, self.height)
    }
}

/// One capture source placed in the current scene.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneItem {
    /// Source name as shown in the OBS sources list.
    pub name: String,
    /// Input kind tag; absent for groups and other non-input items.
    pub kind: Option<String>,
    /// Disabled items are excluded from all computation.
    pub enabled: bool,
    pub transform: SceneItemTransform,
}

impl SceneItem {
    /// Returns `true` if this item plays the screen role.
    pub fn is_screen(&self) -> bool {
        self.enabled
            && (self.kind.as_deref() == Some(SCREEN_INPUT_KIND)
                || self.name.contains(SCREEN_NAME_MARKER))
    }

    /// Returns `true` if this item plays a camera role.
    pub fn is_camera(&self) -> bool {
        self.enabled
            && (self.kind.as_deref() == Some(CAMERA_INPUT_KIND)
                || self.name.contains(CAMERA_NAME_MARKER))
    }
}

/// The classified scene: one screen source plus the occluding cameras,
/// both in original scene order.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenePartition {
    pub screen: SceneItem,
    pub cameras: Vec<SceneItem>,
}

/// Splits the scene's items into the screen source and the camera list.
///
/// When several items match the screen rule, the first one in input order
/// wins; this is a documented tie-break, not an error.  An item claimed as
/// the screen is never also counted as a camera.
///
/// # Errors
///
/// Returns [`SceneError::NoScreenSource`] when no enabled item matches the
/// screen classification.
pub fn classify(items: Vec<SceneItem>) -> Result<ScenePartition, SceneError> {
    let mut screen: Option<SceneItem> = None;
    let mut cameras = Vec::new();

    for item in items {
        if screen.is_none() && item.is_screen() {
            screen = Some(item);
        } else if item.is_camera() {
            cameras.push(item);
        }
    }

    match screen {
        Some(screen) => Ok(ScenePartition { screen, cameras }),
        None => Err(SceneError::NoScreenSource),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
