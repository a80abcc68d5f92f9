//! Connection state tracking and the reconnect policy.
//!
//! The transport to the peer is retried forever with a fixed delay.  The
//! tracker does not own the socket; it only records which state the socket
//! is in and decides when a reconnect timer should be armed.
//!
//! ```text
//!            begin_connect            opened
//!  Closed ─────────────────> Connecting ─────> Open
//!    ^                           │               │
//!    └──────── lost ─────────────┴───────────────┘
//!        (arms one reconnect timer per failure)
//! ```

use std::time::Duration;

/// Fixed delay between a transport failure and the next connect attempt.
pub const RECONNECT_DELAY: Duration = Duration::from_millis(250);

/// Lifecycle of the single logical session with the peer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionState {
    Connecting,
    Open,
    Closed,
}

impl std::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ConnectionState::Connecting => "connecting",
            ConnectionState::Open => "open",
            ConnectionState::Closed => "closed",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone)]
pub struct ConnectionTracker {
    state: ConnectionState,
    reconnect_pending: bool,
    attempts: u64,
    delay: Duration,
}

impl ConnectionTracker {
    /// A closed tracker with the given reconnect delay.
    pub fn new(delay: Duration) -> Self {
        Self {
            state: ConnectionState::Closed,
            reconnect_pending: false,
            attempts: 0,
            delay,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// `true` only while the transport is open.  Outbound sends must check
    /// this and drop their payload otherwise.
    pub fn is_ready(&self) -> bool {
        self.state == ConnectionState::Open
    }

    /// Total connect attempts so far, including the first.
    pub fn attempts(&self) -> u64 {
        self.attempts
    }

    /// Records that a connect attempt has started.
    pub fn begin_connect(&mut self) {
        self.state = ConnectionState::Connecting;
        self.reconnect_pending = false;
        self.attempts += 1;
    }

    /// Records that the transport is open.
    pub fn opened(&mut self) {
        self.state = ConnectionState::Open;
        self.reconnect_pending = false;
    }

    /// Records a close or error.
    ///
    /// Returns the delay for a new reconnect timer, or `None` when one is
    /// already armed for this failure (an error is usually followed by a
    /// close for the same socket).
    pub fn lost(&mut self) -> Option<Duration> {
        self.state = ConnectionState::Closed;
        if self.reconnect_pending {
            return None;
        }
        self.reconnect_pending = true;
        Some(self.delay)
    }

    /// Records that a reconnect timer fired.  Returns `true` when a new
    /// connect attempt should start; a timer that fires after the session
    /// came back some other way is stale and ignored.
    pub fn timer_fired(&mut self) -> bool {
        let due = self.reconnect_pending && self.state == ConnectionState::Closed;
        self.reconnect_pending = false;
        due
    }
}

impl Default for ConnectionTracker {
    fn default() -> Self {
        Self::new(RECONNECT_DELAY)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
