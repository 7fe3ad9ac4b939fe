//! SceneFit entry point.
//!
//! Repositions and resizes the frontmost window so it fits the part of the
//! OBS scene's screen source that is not covered by camera overlays.
//!
//! # Usage
//!
//! ```text
//! scenefit setup [--host <HOST>] [--port <PORT>] [--password <PW>]
//! scenefit configure [--padding-x <PX>] [--padding-y <PX>]
//! scenefit resize
//! ```
//!
//! `setup` stores the obs-websocket coordinates and test-connects;
//! `configure` stores the padding; `resize` runs the pipeline:
//!
//! ```text
//! connect ─▶ scene items ─▶ classify ─▶ reconcile ─▶ resolve display ─▶ place
//! ```
//!
//! # Environment variable overrides
//!
//! | Variable                | Flag          | Default     |
//! |-------------------------|---------------|-------------|
//! | `SCENEFIT_OBS_HOST`     | `--host`      | `localhost` |
//! | `SCENEFIT_OBS_PORT`     | `--port`      | `4455`      |
//! | `SCENEFIT_OBS_PASSWORD` | `--password`  | empty       |
//!
//! Log output goes through `tracing`; set `RUST_LOG=debug` to watch the
//! rectangle math step by step.

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use scenefit_cli::application::connect::connect_with_notification;
use scenefit_cli::application::resize::{ResizeOutcome, ResizeUseCase};
use scenefit_cli::application::{configure, setup};
use scenefit_cli::infrastructure::automation::native_automation;
use scenefit_cli::infrastructure::notify::{ConsoleNotifier, Notifier};
use scenefit_cli::infrastructure::storage::{
    settings_file_path, ConnectionSettings, PaddingSettings, Settings,
};
use scenefit_core::Padding;

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Fit the frontmost window to the visible screen region of an OBS scene.
#[derive(Debug, Parser)]
#[command(
    name = "scenefit",
    about = "Fit the frontmost window to the visible screen region of an OBS scene",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Store the obs-websocket connection settings and test the connection.
    ///
    /// In OBS Studio (28 or later) open Tools > WebSocket Server Settings,
    /// enable the server, and copy the port and password from Show Connect
    /// Info into these flags.
    Setup {
        /// Hostname or IP of the machine running OBS.
        #[arg(long, default_value = "localhost", env = "SCENEFIT_OBS_HOST")]
        host: String,

        /// obs-websocket server port.
        #[arg(long, default_value_t = 4455, env = "SCENEFIT_OBS_PORT")]
        port: u16,

        /// obs-websocket password (empty if authentication is disabled).
        #[arg(long, default_value = "", env = "SCENEFIT_OBS_PASSWORD")]
        password: String,
    },

    /// Store the padding kept between the window and trimmed edges.
    ///
    /// Padding is measured in OBS canvas pixels and only applies to edges
    /// that a camera actually pushed inward.
    Configure {
        /// Horizontal padding on either trimmed side (canvas pixels).
        #[arg(long, default_value_t = 0.0)]
        padding_x: f64,

        /// Vertical padding on either trimmed side (canvas pixels, WIP).
        #[arg(long, default_value_t = 0.0)]
        padding_y: f64,
    },

    /// Fit the frontmost window into the current scene's visible region.
    Resize,
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let notifier = ConsoleNotifier;
    let settings_path = settings_file_path().context("cannot resolve the settings location")?;
    debug!("settings file: {}", settings_path.display());

    match cli.command {
        Command::Setup {
            host,
            port,
            password,
        } => {
            setup::run(
                &settings_path,
                ConnectionSettings {
                    host,
                    port,
                    password,
                },
                &notifier,
            )
            .await?;
        }

        Command::Configure {
            padding_x,
            padding_y,
        } => {
            configure::run(
                &settings_path,
                PaddingSettings {
                    x: padding_x,
                    y: padding_y,
                },
                &notifier,
            )?;
        }

        Command::Resize => {
            let settings =
                Settings::load_from(&settings_path).context("failed to load settings")?;

            // Stage 1: a fresh connection for this invocation.  A failure has
            // already been reported to the user; just abort.
            let mut connection =
                connect_with_notification(&settings.connection, &notifier).await?;

            let automation = match native_automation() {
                Ok(automation) => automation,
                Err(error) => {
                    notifier.failure("Window automation is not supported on this platform");
                    connection.close().await;
                    return Err(error.into());
                }
            };

            let result = {
                let mut use_case = ResizeUseCase::new(
                    &mut connection,
                    automation.as_ref(),
                    &notifier,
                    Padding {
                        x: settings.padding.x,
                        y: settings.padding.y,
                    },
                );
                use_case.run().await
            };
            connection.close().await;

            match result? {
                ResizeOutcome::Applied(target) => {
                    debug!(
                        "window placed at ({}, {}) size {}x{}",
                        target.x, target.y, target.width, target.height
                    );
                }
                ResizeOutcome::Skipped => {
                    debug!("window placement skipped after an automation failure");
                }
            }
        }
    }

    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
