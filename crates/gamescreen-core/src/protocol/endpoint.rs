//! Addresses and request formats understood by the peer.
//!
//! # Frame stream
//!
//! `ws://<host>:1148/` carries binary frames from the peer.  After consuming
//! each frame the client sends one acknowledgement message containing the
//! single byte `r`; the peer does not send the next frame before that.
//!
//! # Input endpoint
//!
//! Each button transition is one `GET /event?<polarity>=<bitmask>` on the
//! peer's HTTP port, both numbers in decimal (the peer parses them with
//! `stoi`).  The peer answers `204 No Content`.
//!
//! ```text
//! KeyA pressed   -> GET /event?1=16
//! KeyA released  -> GET /event?0=16
//! ```

use thiserror::Error;

use crate::domain::buttons::Button;
use crate::domain::input::{OutboundEvent, Polarity};

/// Port of the peer's websocket frame stream.
pub const DEFAULT_WS_PORT: u16 = 1148;

/// Port of the peer's HTTP server (page and input endpoint).
pub const DEFAULT_HTTP_PORT: u16 = 8282;

/// Payload of the "ready for next frame" acknowledgement.
pub const ACK_BYTE: u8 = b'r';

/// Errors from [`parse_event_path`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EventPathError {
    #[error("not an event request: {0}")]
    NotEvent(String),
    #[error("malformed event query: {0}")]
    MalformedQuery(String),
    #[error("unknown polarity {0}")]
    UnknownPolarity(String),
    #[error("unknown button bitmask {0}")]
    UnknownButton(String),
}

/// Strips an optional `:port` suffix, the way a page derives the peer host
/// from its own origin.  Bracketed IPv6 literals keep their brackets.
pub fn host_without_port(host: &str) -> &str {
    if let Some(rest) = host.strip_prefix('[') {
        return match rest.find(']') {
            Some(end) => &host[..end + 2],
            None => host,
        };
    }
    match host.split_once(':') {
        Some((name, _)) => name,
        None => host,
    }
}

/// The frame stream URL for `host`.
pub fn ws_url(host: &str, port: u16) -> String {
    format!("ws://{}:{port}/", host_without_port(host))
}

/// Relative request path for `event`, without a leading slash.
pub fn event_path(event: &OutboundEvent) -> String {
    format!("event?{}={}", event.polarity.code(), event.bitmask())
}

/// Parses a request target such as `/event?1=16` or `event?0=128`.
///
/// # Errors
///
/// Returns [`EventPathError`] when the target is not an event request or
/// either number is outside the peer's vocabulary.
pub fn parse_event_path(target: &str) -> Result<OutboundEvent, EventPathError> {
    let target = target.trim_start_matches('/');
    let query = target
        .strip_prefix("event?")
        .ok_or_else(|| EventPathError::NotEvent(target.to_string()))?;
    let (polarity, bitmask) = query
        .split_once('=')
        .ok_or_else(|| EventPathError::MalformedQuery(query.to_string()))?;

    let polarity = polarity
        .parse::<u8>()
        .ok()
        .and_then(Polarity::from_code)
        .ok_or_else(|| EventPathError::UnknownPolarity(polarity.to_string()))?;
    let button = bitmask
        .parse::<u8>()
        .ok()
        .and_then(Button::from_bitmask)
        .ok_or_else(|| EventPathError::UnknownButton(bitmask.to_string()))?;

    Ok(OutboundEvent::new(polarity, button))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_path_key_a() {
        assert_eq!(event_path(&OutboundEvent::down(Button::A)), "event?1=16");
        assert_eq!(event_path(&OutboundEvent::up(Button::A)), "event?0=16");
    }

    #[test]
    fn test_event_path_uses_decimal() {
        assert_eq!(event_path(&OutboundEvent::down(Button::Start)), "event?1=128");
        assert_eq!(event_path(&OutboundEvent::up(Button::Right)), "event?0=1");
    }

    #[test]
    fn test_parse_event_path_accepts_leading_slash() {
        assert_eq!(
            parse_event_path("/event?1=16"),
            Ok(OutboundEvent::down(Button::A))
        );
    }

    #[test]
    fn test_parse_event_path_inverts_event_path_for_every_button() {
        for button in Button::ALL {
            for event in [OutboundEvent::down(button), OutboundEvent::up(button)] {
                assert_eq!(parse_event_path(&event_path(&event)), Ok(event));
            }
        }
    }

    #[test]
    fn test_parse_event_path_rejects_garbage() {
        assert!(matches!(
            parse_event_path("/index.html"),
            Err(EventPathError::NotEvent(_))
        ));
        assert!(matches!(
            parse_event_path("/event?116"),
            Err(EventPathError::MalformedQuery(_))
        ));
        assert!(matches!(
            parse_event_path("/event?2=16"),
            Err(EventPathError::UnknownPolarity(_))
        ));
        assert!(matches!(
            parse_event_path("/event?1=3"),
            Err(EventPathError::UnknownButton(_))
        ));
        assert!(matches!(
            parse_event_path("/event?1=0x10"),
            Err(EventPathError::UnknownButton(_))
        ));
    }

    #[test]
    fn test_host_without_port() {
        assert_eq!(host_without_port("example.com:8282"), "example.com");
        assert_eq!(host_without_port("10.0.0.5"), "10.0.0.5");
        assert_eq!(host_without_port("[::1]:8282"), "[::1]");
        assert_eq!(host_without_port("[::1]"), "[::1]");
    }

    #[test]
    fn test_ws_url_uses_fixed_port() {
        assert_eq!(ws_url("192.168.1.4:8282", DEFAULT_WS_PORT), "ws://192.168.1.4:1148/");
    }

    #[test]
    fn test_ack_byte_is_r() {
        assert_eq!(ACK_BYTE, 0x72);
    }
}
