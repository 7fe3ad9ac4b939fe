//! The `configure` command: persist the padding preferences.

use std::path::Path;

use tracing::info;

use crate::infrastructure::notify::Notifier;
use crate::infrastructure::storage::{PaddingSettings, Settings, SettingsError};

/// Stores the padding settings at `settings_path`.
///
/// Padding is expressed in canvas-space pixels and only takes effect on
/// edges that trimming actually moved.
///
/// # Errors
///
/// Returns the underlying [`SettingsError`] when the file cannot be read or
/// written.
pub fn run(
    settings_path: &Path,
    padding: PaddingSettings,
    notifier: &dyn Notifier,
) -> Result<(), SettingsError> {
    let mut settings = Settings::load_from(settings_path)?;
    settings.padding = padding;
    settings.save_to(settings_path)?;
    info!(
        "padding set to ({}, {}) in {}",
        padding.x,
        padding.y,
        settings_path.display()
    );
    notifier.success("Configuration saved");
    Ok(())
}
