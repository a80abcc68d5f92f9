//! Domain layer for gamescreen-client.
//!
//! Only plain configuration lives here; the protocol state machine itself is
//! in `gamescreen-core`.

pub mod config;

pub use config::{ClientConfig, ConfigError};
