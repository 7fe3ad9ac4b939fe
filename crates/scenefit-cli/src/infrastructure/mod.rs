//! OS- and network-facing adapters: the OBS WebSocket connection, window
//! automation, settings persistence, and user notification.

pub mod automation;
pub mod notify;
pub mod obs;
pub mod storage;
