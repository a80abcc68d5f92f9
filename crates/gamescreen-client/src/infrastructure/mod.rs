//! Infrastructure layer: everything that touches the network, the terminal
//! or the file system.

pub mod input_endpoint;
pub mod key_source;
pub mod snapshot;
pub mod socket;

pub use input_endpoint::{HttpInputEndpoint, InputEndpoint, RequestError};
pub use socket::{FrameStream, SocketReport, TransportError};
