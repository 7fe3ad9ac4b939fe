//! # scenefit-cli
//!
//! The SceneFit application: three commands (`setup`, `configure`, `resize`)
//! over a shared library.
//!
//! - **`application/`** – the use cases: what each command does, expressed
//!   against service seams so the pipeline is fully testable without OBS or
//!   an OS display.
//! - **`infrastructure/`** – the adapters behind those seams: the
//!   obs-websocket connection, OS window automation, the TOML settings
//!   store, and terminal notifications.
//!
//! The domain logic itself (classification, reconciliation, display and
//! placement math, wire types) lives in `scenefit-core`.

pub mod application;
pub mod infrastructure;
