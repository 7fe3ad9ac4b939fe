//! macOS window automation via System Events and Core Graphics.
//!
//! Window queries and the move/resize command run as AppleScript through
//! `osascript`, scoped to the frontmost application's process name.  Display
//! frames come from Core Graphics (`CGDisplay::active_displays` +
//! `CGDisplayBounds`), which reports the same top-left-origin global
//! coordinate space that System Events uses for window positions.
//!
//! # Accessibility permission
//!
//! System Events refuses window control until the calling process is granted
//! assistive access in System Settings > Privacy & Security > Accessibility.
//! The refusal is only distinguishable by its message text; the marker
//! ("assistive access") has been stable across recent macOS releases but is
//! a known compatibility risk, so the match lives here and nowhere else.

use async_trait::async_trait;
use tracing::debug;

use scenefit_core::{DisplayFrame, PhysicalRect, WindowGeometry};

use super::{AutomationError, FrontmostWindow, WindowAutomation};

/// Substring that identifies a permission refusal in osascript stderr.
const ASSISTIVE_ACCESS_MARKER: &str = "assistive access";

/// AppleScript that resolves the frontmost process and prints its name and
/// front window geometry as one `|`-separated line.
const FRONTMOST_WINDOW_SCRIPT: &str = r#"
tell application "System Events"
    set frontProc to first application process whose frontmost is true
    set procName to name of frontProc
    set winPos to position of window 1 of frontProc
    set winSize to size of window 1 of frontProc
    return procName & "|" & (item 1 of winPos) & "|" & (item 2 of winPos) & "|" & (item 1 of winSize) & "|" & (item 2 of winSize)
end tell
"#;

/// macOS implementation of [`WindowAutomation`].
pub struct MacosAutomation;

impl MacosAutomation {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MacosAutomation {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WindowAutomation for MacosAutomation {
    async fn frontmost_window(&self) -> Result<FrontmostWindow, AutomationError> {
        let output = run_osascript(FRONTMOST_WINDOW_SCRIPT).await?;
        parse_frontmost_output(output.trim())
    }

    async fn display_frames(&self) -> Result<Vec<DisplayFrame>, AutomationError> {
        enumerate_displays()
    }

    async fn apply_placement(
        &self,
        app_name: &str,
        target: &PhysicalRect,
    ) -> Result<(), AutomationError> {
        let script = placement_script(app_name, target);
        debug!(
            "placing {app_name} window at ({}, {}) size {}x{}",
            target.x, target.y, target.width, target.height
        );
        run_osascript(&script).await?;
        Ok(())
    }
}

/// Builds the System Events move/resize script for the given target.
///
/// System Events expects integer coordinates; the fractional physical-pixel
/// values are rounded to the nearest whole pixel here, at the last possible
/// moment.
fn placement_script(app_name: &str, target: &PhysicalRect) -> String {
    let x = target.x.round() as i64;
    let y = target.y.round() as i64;
    let width = target.width.round() as i64;
    let height = target.height.round() as i64;
    let app = escape_applescript_string(app_name);
    format!(
        r#"
tell application "System Events" to tell process "{app}"
    set position of window 1 to {{{x}, {y}}}
    set size of window 1 to {{{width}, {height}}}
end tell
"#
    )
}

/// Escapes a value for inclusion in a double-quoted AppleScript literal.
fn escape_applescript_string(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Parses `name|x|y|width|height` as returned by the frontmost-window script.
fn parse_frontmost_output(line: &str) -> Result<FrontmostWindow, AutomationError> {
    let fields: Vec<&str> = line.split('|').collect();
    if fields.len() != 5 {
        return Err(AutomationError::Command(format!(
            "unexpected frontmost-window output: {line:?}"
        )));
    }
    let parse = |s: &str| -> Result<f64, AutomationError> {
        s.trim()
            .parse::<f64>()
            .map_err(|_| AutomationError::Command(format!("non-numeric window field: {s:?}")))
    };
    Ok(FrontmostWindow {
        app_name: fields[0].to_string(),
        geometry: WindowGeometry {
            x: parse(fields[1])?,
            y: parse(fields[2])?,
            width: parse(fields[3])?,
            height: parse(fields[4])?,
        },
    })
}

/// Runs an AppleScript via `osascript -e`, returning stdout.
///
/// # Errors
///
/// A refusal carrying the assistive-access marker becomes
/// [`AutomationError::PermissionDenied`]; every other failure becomes
/// [`AutomationError::Command`] with the stderr text.
async fn run_osascript(script: &str) -> Result<String, AutomationError> {
    let output = tokio::process::Command::new("osascript")
        .arg("-e")
        .arg(script)
        .output()
        .await
        .map_err(|e| AutomationError::Command(format!("failed to spawn osascript: {e}")))?;

    if output.status.success() {
        return Ok(String::from_utf8_lossy(&output.stdout).into_owned());
    }

    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
    if stderr
        .to_lowercase()
        .contains(ASSISTIVE_ACCESS_MARKER)
    {
        return Err(AutomationError::PermissionDenied);
    }
    Err(AutomationError::Command(stderr))
}

/// Enumerates display frames via Core Graphics.
fn enumerate_displays() -> Result<Vec<DisplayFrame>, AutomationError> {
    use core_graphics::display::{CGDisplay, CGDisplayBounds};

    let active = CGDisplay::active_displays()
        .map_err(|code| AutomationError::Command(format!("CGGetActiveDisplayList failed: {code}")))?;
    if active.is_empty() {
        return Err(AutomationError::Command(
            "CGGetActiveDisplayList returned zero displays".to_string(),
        ));
    }

    Ok(active
        .iter()
        .map(|&display_id| {
            let bounds = CGDisplayBounds(display_id);
            DisplayFrame {
                x: bounds.origin.x,
                y: bounds.origin.y,
                width: bounds.size.width,
                height: bounds.size.height,
            }
        })
        .collect())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
