//! Wire-level constants and formats shared with the remote peer.

pub mod endpoint;

pub use endpoint::{
    event_path, host_without_port, parse_event_path, ws_url, EventPathError, ACK_BYTE,
    DEFAULT_HTTP_PORT, DEFAULT_WS_PORT,
};
