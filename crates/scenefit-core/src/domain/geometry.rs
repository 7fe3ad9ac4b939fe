//! Rectangle reconciliation for the scene's screen source.
//!
//! The engine answers one question: given where the screen-capture source and
//! the camera sources sit on the OBS canvas, which part of the screen source
//! is actually visible to viewers?
//!
//! The answer is computed in two coordinate spaces:
//!
//! - **Canvas space**: the compositor's own coordinate system, in which every
//!   scene item transform is expressed.  Trimming and padding happen here.
//! - **Source-local space**: coordinates relative to the screen source's
//!   native pixel dimensions, obtained by removing the source's canvas origin
//!   and per-axis scale.  The final window placement is derived from this.
//!
//! Rectangles are never implicitly reinterpreted across spaces; the only
//! bridge is [`Rect::to_source_local`], which rounds toward positive infinity
//! so a sub-pixel boundary can never leak into the occluded region.
//!
//! # Trimming semantics
//!
//! Cameras are processed in scene order, each one gated and trimmed against
//! the *current* rectangle rather than the original screen rectangle.  When
//! two cameras overlap each other the result therefore depends on their
//! order.  This cascading, first-applied-wins shrinkage is the documented
//! behavior of the tool and is preserved as-is.
//!
//! Trimming only ever moves the left or right edge.  Vertical overlap is a
//! gate that decides whether a camera occludes the screen at all; the top and
//! bottom edges are never moved.

use thiserror::Error;
use tracing::debug;

use crate::domain::scene::SceneItemTransform;

/// Errors produced by the reconciliation engine.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GeometryError {
    /// Trimming and padding left the visible region with a non-positive
    /// width or height.  Placing a window into a collapsed region would be
    /// meaningless, so the whole operation aborts.
    #[error("visible region collapsed to a non-positive extent after trimming and padding")]
    RegionCollapsed,
}

// ── Rect ──────────────────────────────────────────────────────────────────────

/// An axis-aligned box described by its four edges.
///
/// The coordinate space (canvas, source-local, or physical) is a property of
/// where the value came from, not of the type; every function documents the
/// space it expects and returns.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Rect {
    /// Builds a rect from an origin and an extent.
    pub fn from_origin_size(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            left: x,
            top: y,
            right: x + width,
            bottom: y + height,
        }
    }

    /// Horizontal extent.  Negative when the rect is inverted.
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    /// Vertical extent.  Negative when the rect is inverted.
    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    /// Returns `true` if the two rects share any horizontal range.
    ///
    /// Exact edge contact counts as overlap: a camera whose right edge sits
    /// exactly on the screen's left edge is still treated as occluding.
    pub fn overlaps_horizontally(&self, other: &Rect) -> bool {
        !(other.right < self.left || other.left > self.right)
    }

    /// Returns `true` if the two rects share any vertical range.
    ///
    /// Same edge-contact rule as [`Rect::overlaps_horizontally`].
    pub fn overlaps_vertically(&self, other: &Rect) -> bool {
        !(other.bottom < self.top || other.top > self.bottom)
    }

    /// Maps a canvas-space rect into the screen source's local pixel space.
    ///
    /// Each edge has the source's canvas origin removed and is divided by the
    /// per-axis scale factor, then rounded toward positive infinity.  The
    /// ceiling bias means an edge can land at most one source pixel inside
    /// the exact position, never outside it into an occluded area.
    pub fn to_source_local(&self, screen: &SceneItemTransform) -> Rect {
        Rect {
            left: ((self.left - screen.position_x) / screen.scale_x).ceil(),
            top: ((self.top - screen.position_y) / screen.scale_y).ceil(),
            right: ((self.right - screen.position_x) / screen.scale_x).ceil(),
            bottom: ((self.bottom - screen.position_y) / screen.scale_y).ceil(),
        }
    }
}

// ── Padding ───────────────────────────────────────────────────────────────────

/// User-configured padding, in canvas-space pixels per axis.
///
/// Padding is only ever applied to an edge that was moved by trimming; an
/// edge that still coincides with the original screen rectangle may sit on
/// the canvas boundary, and padding must not push the window past it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Padding {
    pub x: f64,
    pub y: f64,
}

/// Records which edges were moved away from the original screen rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TrimmedEdges {
    pub left: bool,
    pub top: bool,
    pub right: bool,
    pub bottom: bool,
}

impl TrimmedEdges {
    /// Returns `true` if any edge was moved.
    pub fn any(&self) -> bool {
        self.left || self.top || self.right || self.bottom
    }
}

/// The reconciled visible region of the screen source.
#[derive(Debug, Clone, PartialEq)]
pub struct VisibleRegion {
    /// Trimmed and padded rectangle in canvas space (absolute coordinates).
    pub canvas: Rect,
    /// The same rectangle mapped into the screen source's local pixel space.
    pub local: Rect,
    /// Which edges differ from the original, untrimmed screen rectangle.
    pub moved: TrimmedEdges,
}

// ── Reconciliation ────────────────────────────────────────────────────────────

/// Computes the visible region of the screen source.
///
/// Starting from the screen's full canvas rectangle, each camera rectangle
/// (in input order) that overlaps the current rectangle on both axes trims
/// the nearer vertical edge: with `mx = max(cam.left, r.left)` and
/// `mn = min(cam.right, r.right)` delimiting the horizontal intersection,
/// a camera closer to the left edge advances `r.left` to `mn`, otherwise
/// `r.right` retreats to `mx`.  The distance comparison is strict, so on a
/// tie the right edge retreats and the left portion of the screen survives.
///
/// Padding is then applied to exactly the edges that moved.  When no camera
/// overlapped, the screen rectangle is returned unchanged and no padding is
/// applied at all: an unobstructed share fills the whole mapped region.
///
/// All arithmetic is plain floating point over the upstream geometry; the
/// only validation performed is the collapse check below.
///
/// # Errors
///
/// Returns [`GeometryError::RegionCollapsed`] when the trimmed, padded
/// rectangle no longer has a positive width and height.
pub fn reconcile(
    screen: &SceneItemTransform,
    cameras: &[Rect],
    padding: Padding,
) -> Result<VisibleRegion, GeometryError> {
    let original = screen.canvas_rect();
    let mut rect = original;

    for cam in cameras {
        // Gate on the current rectangle, not the original: a camera that only
        // overlapped an already-trimmed part no longer counts.
        if !rect.overlaps_horizontally(cam) || !rect.overlaps_vertically(cam) {
            continue;
        }

        let mx = cam.left.max(rect.left);
        let mn = cam.right.min(rect.right);
        if mx - rect.left < rect.right - mn {
            // Camera sits closer to the left edge: advance the left edge past
            // the occluded intersection.
            rect.left = mn;
        } else {
            // Closer to the right edge (or a tie): retreat the right edge to
            // the start of the intersection.
            rect.right = mx;
        }
        debug!(
            left = rect.left,
            right = rect.right,
            "trimmed screen rect against camera at [{}, {}]",
            cam.left,
            cam.right
        );
    }

    let moved = TrimmedEdges {
        left: rect.left != original.left,
        top: rect.top != original.top,
        right: rect.right != original.right,
        bottom: rect.bottom != original.bottom,
    };

    if moved.left {
        rect.left += padding.x;
    }
    if moved.right {
        rect.right -= padding.x;
    }
    if moved.top {
        rect.top += padding.y;
    }
    if moved.bottom {
        rect.bottom -= padding.y;
    }

    if rect.width() <= 0.0 || rect.height() <= 0.0 {
        return Err(GeometryError::RegionCollapsed);
    }

    let local = rect.to_source_local(screen);
    Ok(VisibleRegion {
        canvas: rect,
        local,
        moved,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
