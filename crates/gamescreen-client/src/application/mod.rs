//! Application layer for gamescreen-client.
//!
//! Owns the event loop that connects the protocol controller from
//! `gamescreen-core` to the sockets, timers and HTTP requests provided by the
//! infrastructure layer.

pub mod runtime;

pub use runtime::{ClientRuntime, ClientStatus, RuntimeHandle, RuntimeStopped};
