//! Domain types for the display and input paths.
//!
//! Nothing in here performs I/O or depends on an async runtime.  The host
//! application owns sockets, timers and HTTP; these types only decide what
//! should happen next.

pub mod buttons;
pub mod canvas;
pub mod connection;
pub mod frame;
pub mod input;
pub mod queue;
