//! Use cases behind the three user-facing commands.

pub mod configure;
pub mod connect;
pub mod resize;
pub mod setup;
