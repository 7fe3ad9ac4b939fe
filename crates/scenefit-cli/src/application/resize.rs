//! The `resize` command pipeline: scene query, classification, rectangle
//! reconciliation, display resolution, and window placement.
//!
//! The stages run strictly in sequence and every validation happens before
//! the single state-changing call at the end; an abort on any stage leaves
//! both OBS and the OS untouched.
//!
//! # Failure policy
//!
//! | Failure                        | User notification | Propagated?       |
//! |--------------------------------|-------------------|-------------------|
//! | scene query failed             | yes               | yes               |
//! | no screen source               | yes               | yes               |
//! | region collapsed               | yes               | yes               |
//! | window on no known display     | yes               | yes               |
//! | automation permission denied   | yes (remediation) | yes               |
//! | automation unsupported here    | yes               | yes               |
//! | other automation failure       | no (log only)     | no, run ends `Ok` |
//!
//! The last row mirrors the original tool, which logged unexpected
//! scripting errors and ended quietly rather than alarming the user over a
//! transient window-manager hiccup.

use thiserror::Error;
use tracing::{debug, warn};

use scenefit_core::{
    classify, placement_target, reconcile, resolve_display, DisplayError, GeometryError, Padding,
    PhysicalRect, RealScale, Rect, SceneError,
};

use crate::infrastructure::automation::{AutomationError, WindowAutomation};
use crate::infrastructure::notify::Notifier;
use crate::infrastructure::obs::{ObsError, SceneSource};

/// Hint shown when the OS refuses window control.
const PERMISSION_HINT: &str =
    "Please grant scenefit accessibility permission in System Settings to move windows";

/// Errors that abort the resize pipeline.
#[derive(Debug, Error)]
pub enum ResizeError {
    /// Querying the scene over the established connection failed.
    #[error("failed to query the OBS scene")]
    SceneQuery(#[source] ObsError),

    /// No enabled screen-capture source in the current scene.
    #[error("no screen share found in the current scene")]
    NoScreenSource,

    /// Trimming and padding collapsed the visible region.
    #[error("visible screen region collapsed after trimming and padding")]
    RegionCollapsed,

    /// The frontmost window is not on any enumerated display.
    #[error("the frontmost window is not on any connected display")]
    DisplayNotFound,

    /// The OS denied window-control automation.
    #[error("window automation permission denied")]
    PermissionDenied,

    /// No automation adapter exists for this platform.
    #[error("window automation is not supported on this platform")]
    AutomationUnsupported,
}

/// How a completed run ended.
#[derive(Debug, Clone, PartialEq)]
pub enum ResizeOutcome {
    /// The window was moved and resized to the given physical rect.
    Applied(PhysicalRect),
    /// An unclassified automation failure was logged and swallowed; no
    /// window command took effect.
    Skipped,
}

/// Orchestrates one resize invocation over the three service seams.
pub struct ResizeUseCase<'a> {
    scene: &'a mut dyn SceneSource,
    automation: &'a dyn WindowAutomation,
    notifier: &'a dyn Notifier,
    padding: Padding,
}

impl<'a> ResizeUseCase<'a> {
    pub fn new(
        scene: &'a mut dyn SceneSource,
        automation: &'a dyn WindowAutomation,
        notifier: &'a dyn Notifier,
        padding: Padding,
    ) -> Self {
        Self {
            scene,
            automation,
            notifier,
            padding,
        }
    }

    /// Runs the pipeline to completion or to its first fatal error.
    ///
    /// # Errors
    ///
    /// See the failure-policy table in the module documentation; every
    /// returned error has already been surfaced through the notifier.
    pub async fn run(&mut self) -> Result<ResizeOutcome, ResizeError> {
        // Stage 1: scene geometry from OBS.
        let items = match self.scene.current_scene_items().await {
            Ok(items) => items,
            Err(error) => {
                self.notifier.failure("Failed to query the OBS scene");
                return Err(ResizeError::SceneQuery(error));
            }
        };
        debug!("scene has {} items", items.len());

        // Stage 2: classification.
        let partition = match classify(items) {
            Ok(partition) => partition,
            Err(SceneError::NoScreenSource) => {
                self.notifier.failure("No screen share found");
                return Err(ResizeError::NoScreenSource);
            }
        };
        let cameras: Vec<Rect> = partition
            .cameras
            .iter()
            .map(|camera| camera.transform.canvas_rect())
            .collect();
        debug!(
            "screen source '{}', {} cameras, padding ({}, {})",
            partition.screen.name,
            cameras.len(),
            self.padding.x,
            self.padding.y
        );

        // Stage 3: rectangle reconciliation.
        let region = match reconcile(&partition.screen.transform, &cameras, self.padding) {
            Ok(region) => region,
            Err(GeometryError::RegionCollapsed) => {
                self.notifier
                    .failure("The visible screen region collapsed; check camera layout and padding");
                return Err(ResizeError::RegionCollapsed);
            }
        };
        debug!("visible region: {:?}", region.canvas);

        // Stage 4: the frontmost window and its display.
        let window = match self.automation.frontmost_window().await {
            Ok(window) => window,
            Err(error) => return self.automation_abort(error),
        };
        let displays = match self.automation.display_frames().await {
            Ok(displays) => displays,
            Err(error) => return self.automation_abort(error),
        };
        let display = match resolve_display(window.geometry.x, window.geometry.y, &displays) {
            Ok(display) => display,
            Err(DisplayError::DisplayNotFound { .. }) => {
                self.notifier
                    .failure("The frontmost window is not on any connected display");
                return Err(ResizeError::DisplayNotFound);
            }
        };

        // Stage 5: placement.
        let scale = RealScale::derive(&partition.screen.transform, display);
        let target = placement_target(&window.geometry, &region, &partition.screen.transform, &scale);
        debug!(
            "placing '{}' at ({}, {}) size {}x{} (real scale {}x{})",
            window.app_name, target.x, target.y, target.width, target.height, scale.x, scale.y
        );

        match self
            .automation
            .apply_placement(&window.app_name, &target)
            .await
        {
            Ok(()) => {
                self.notifier
                    .success("Window fitted to the visible screen region");
                Ok(ResizeOutcome::Applied(target))
            }
            Err(error) => self.automation_abort(error),
        }
    }

    /// Applies the automation failure policy: permission and platform
    /// problems are surfaced and propagated, anything else is logged and
    /// swallowed.
    fn automation_abort(&self, error: AutomationError) -> Result<ResizeOutcome, ResizeError> {
        match error {
            AutomationError::PermissionDenied => {
                self.notifier.failure(PERMISSION_HINT);
                Err(ResizeError::PermissionDenied)
            }
            AutomationError::Unsupported => {
                self.notifier
                    .failure("Window automation is not supported on this platform");
                Err(ResizeError::AutomationUnsupported)
            }
            AutomationError::Command(message) => {
                warn!("window automation failed: {message}");
                Ok(ResizeOutcome::Skipped)
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
