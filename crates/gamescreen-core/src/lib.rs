//! # gamescreen-core
//!
//! The I/O-free heart of the GameScreen remote display client.
//!
//! The client renders a continuously updated 160x144 bitmap pulled from a
//! remote peer over a websocket and forwards joypad button presses back to
//! the peer as HTTP requests.  Everything in this crate is deterministic and
//! synchronous: the host feeds [`ControllerEvent`]s into a
//! [`ScreenController`] and carries out the [`Command`]s it returns.
//!
//! - **`domain`** – Frames, the canvas and its 4x nearest-neighbour renderer,
//!   the key-to-button table, key edge filtering, the outbound request queue
//!   and the connection state tracker.
//!
//! - **`protocol`** – What goes over the wire: ports, the websocket URL, the
//!   acknowledgement byte and the `event?<polarity>=<bitmask>` request path.
//!
//! - **`controller`** – The single event handler that ties the domain pieces
//!   together and enforces the ordering guarantees.

pub mod controller;
pub mod domain;
pub mod protocol;

pub use controller::{
    Command, ControllerConfig, ControllerEvent, ControllerStats, RequestOutcome, ScreenController,
};
pub use domain::buttons::Button;
pub use domain::canvas::{Canvas, FrameRenderer};
pub use domain::connection::{ConnectionState, RECONNECT_DELAY};
pub use domain::frame::{Frame, FrameFormatError};
pub use domain::input::{OutboundEvent, Polarity};
