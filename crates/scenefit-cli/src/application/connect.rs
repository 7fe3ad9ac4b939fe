//! Connection establishment with user-visible outcome reporting.
//!
//! Both `setup` (as a connection test) and `resize` (as pipeline stage one)
//! go through this helper so the success/failure notifications are worded
//! identically everywhere.

use crate::infrastructure::notify::Notifier;
use crate::infrastructure::obs::{ObsConnection, ObsError};
use crate::infrastructure::storage::ConnectionSettings;

/// Connects to OBS and reports the outcome through the notifier.
///
/// A single attempt; on failure the caller aborts the whole operation.
///
/// # Errors
///
/// Propagates the [`ObsError`] after the failure notification has been
/// emitted.
pub async fn connect_with_notification(
    settings: &ConnectionSettings,
    notifier: &dyn Notifier,
) -> Result<ObsConnection, ObsError> {
    match ObsConnection::connect(settings).await {
        Ok(connection) => {
            notifier.success("Successfully connected to OBS Studio");
            Ok(connection)
        }
        Err(error) => {
            notifier.failure(&format!("Failed to connect to OBS Studio: {error}"));
            Err(error)
        }
    }
}
