//! The `setup` command: persist connection settings, then test them.

use std::path::Path;

use thiserror::Error;
use tracing::info;

use crate::application::connect::connect_with_notification;
use crate::infrastructure::notify::Notifier;
use crate::infrastructure::obs::ObsError;
use crate::infrastructure::storage::{ConnectionSettings, Settings, SettingsError};

/// Errors produced by the setup command.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Connection(#[from] ObsError),
}

/// Stores the connection settings at `settings_path`, then performs a test
/// connection and reports the outcome.
///
/// The settings are persisted before the test so a typo'd password can be
/// corrected by simply re-running `setup`; a failed test does not roll the
/// file back.
///
/// # Errors
///
/// Returns [`SetupError::Settings`] when the file cannot be written and
/// [`SetupError::Connection`] when the test connection fails (after the
/// failure notification).
pub async fn run(
    settings_path: &Path,
    connection: ConnectionSettings,
    notifier: &dyn Notifier,
) -> Result<(), SetupError> {
    let mut settings = Settings::load_from(settings_path)?;
    settings.connection = connection;
    settings.save_to(settings_path)?;
    info!("connection settings saved to {}", settings_path.display());

    let connection = connect_with_notification(&settings.connection, notifier).await?;
    connection.close().await;
    Ok(())
}
