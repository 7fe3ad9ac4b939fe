//! OS window automation: frontmost-window query, display enumeration, and
//! the final move/resize command.
//!
//! The pipeline consumes the [`WindowAutomation`] trait; the platform
//! adapter behind it is selected at compile time:
//!
//! | Module  | OS    | Mechanism                                          |
//! |---------|-------|----------------------------------------------------|
//! | `macos` | macOS | System Events via `osascript` + Core Graphics      |
//!
//! Other platforms currently have no adapter and report
//! [`AutomationError::Unsupported`].  A recording [`MockAutomation`] is
//! always compiled (not cfg-gated) so the pipeline tests run on any
//! platform without a display or accessibility permission.
//!
//! # Permission failures
//!
//! macOS gates synthetic window manipulation behind the accessibility
//! ("assistive access") permission.  The adapter maps that denial to the
//! structured [`AutomationError::PermissionDenied`]; no other layer ever
//! inspects OS error text.

use std::sync::Mutex;

use async_trait::async_trait;
use thiserror::Error;

use scenefit_core::{DisplayFrame, PhysicalRect, WindowGeometry};

/// Errors produced by window automation.
#[derive(Debug, Error)]
pub enum AutomationError {
    /// The OS refused window control because the automation permission has
    /// not been granted.  Surfaced to the user with a remediation hint and
    /// re-raised; never retried automatically.
    #[error("window automation was denied: accessibility permission not granted")]
    PermissionDenied,

    /// Any other automation failure (script error, window vanished mid-run,
    /// unparseable output).  Logged and swallowed by the pipeline.
    #[error("window automation command failed: {0}")]
    Command(String),

    /// No automation adapter exists for this platform.
    #[error("window automation is not supported on this platform")]
    Unsupported,
}

/// The frontmost application window.
#[derive(Debug, Clone, PartialEq)]
pub struct FrontmostWindow {
    /// Application process name, used to scope the move/resize command.
    pub app_name: String,
    /// Current position and size in physical pixels.
    pub geometry: WindowGeometry,
}

/// Platform-agnostic window automation seam.
#[async_trait]
pub trait WindowAutomation: Send + Sync {
    /// Returns the frontmost application window and its geometry.
    async fn frontmost_window(&self) -> Result<FrontmostWindow, AutomationError>;

    /// Enumerates the connected displays' physical frames.
    async fn display_frames(&self) -> Result<Vec<DisplayFrame>, AutomationError>;

    /// Moves and resizes the named application's front window.
    async fn apply_placement(
        &self,
        app_name: &str,
        target: &PhysicalRect,
    ) -> Result<(), AutomationError>;
}

// ── macOS implementation ──────────────────────────────────────────────────────

#[cfg(target_os = "macos")]
pub mod macos;

#[cfg(target_os = "macos")]
pub use macos::MacosAutomation as NativeAutomation;

/// Returns the native automation adapter for this platform.
///
/// # Errors
///
/// Returns [`AutomationError::Unsupported`] on platforms without an adapter.
pub fn native_automation() -> Result<Box<dyn WindowAutomation>, AutomationError> {
    #[cfg(target_os = "macos")]
    {
        Ok(Box::new(NativeAutomation::new()))
    }

    #[cfg(not(target_os = "macos"))]
    {
        Err(AutomationError::Unsupported)
    }
}

// ── Mock implementation (always compiled for tests) ───────────────────────────

/// A window automation stub with a configurable window and display list.
///
/// Every applied placement is recorded so tests can assert both what was
/// issued and, on abort paths, that nothing was issued at all.
pub struct MockAutomation {
    window: Result<FrontmostWindow, AutomationError>,
    displays: Result<Vec<DisplayFrame>, AutomationError>,
    apply_error: Mutex<Option<AutomationError>>,
    applied: Mutex<Vec<(String, PhysicalRect)>>,
}

impl MockAutomation {
    /// A 1000x600 window at the origin of a single matching display.
    pub fn single_display() -> Self {
        Self {
            window: Ok(FrontmostWindow {
                app_name: "TestApp".to_string(),
                geometry: WindowGeometry {
                    x: 0.0,
                    y: 0.0,
                    width: 1000.0,
                    height: 600.0,
                },
            }),
            displays: Ok(vec![DisplayFrame {
                x: 0.0,
                y: 0.0,
                width: 1000.0,
                height: 600.0,
            }]),
            apply_error: Mutex::new(None),
            applied: Mutex::new(Vec::new()),
        }
    }

    /// Replaces the frontmost window served by the mock.
    pub fn with_window(mut self, window: FrontmostWindow) -> Self {
        self.window = Ok(window);
        self
    }

    /// Replaces the display list served by the mock.
    pub fn with_displays(mut self, displays: Vec<DisplayFrame>) -> Self {
        self.displays = Ok(displays);
        self
    }

    /// Makes the frontmost-window query fail.
    pub fn with_window_error(mut self, error: AutomationError) -> Self {
        self.window = Err(error);
        self
    }

    /// Makes the next `apply_placement` fail.
    pub fn with_apply_error(self, error: AutomationError) -> Self {
        *self.apply_error.lock().unwrap() = Some(error);
        self
    }

    /// The placements applied so far, in order.
    pub fn applied(&self) -> Vec<(String, PhysicalRect)> {
        self.applied.lock().unwrap().clone()
    }
}

/// Clones an error value for the mock's stored `Result`s.
///
/// `AutomationError` wraps no non-cloneable sources, so this is a plain
/// structural copy.
fn clone_error(error: &AutomationError) -> AutomationError {
    match error {
        AutomationError::PermissionDenied => AutomationError::PermissionDenied,
        AutomationError::Command(msg) => AutomationError::Command(msg.clone()),
        AutomationError::Unsupported => AutomationError::Unsupported,
    }
}

#[async_trait]
impl WindowAutomation for MockAutomation {
    async fn frontmost_window(&self) -> Result<FrontmostWindow, AutomationError> {
        match &self.window {
            Ok(window) => Ok(window.clone()),
            Err(e) => Err(clone_error(e)),
        }
    }

    async fn display_frames(&self) -> Result<Vec<DisplayFrame>, AutomationError> {
        match &self.displays {
            Ok(displays) => Ok(displays.clone()),
            Err(e) => Err(clone_error(e)),
        }
    }

    async fn apply_placement(
        &self,
        app_name: &str,
        target: &PhysicalRect,
    ) -> Result<(), AutomationError> {
        if let Some(error) = self.apply_error.lock().unwrap().take() {
            return Err(error);
        }
        self.applied
            .lock()
            .unwrap()
            .push((app_name.to_string(), *target));
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
