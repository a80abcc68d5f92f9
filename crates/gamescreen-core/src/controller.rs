//! The screen controller: one event handler for the whole client.
//!
//! Every input to the client, whether a socket callback, a key signal, a
//! finished HTTP request or a timer, arrives as a [`ControllerEvent`] and is
//! processed by [`ScreenController::handle`].  The handler mutates state and
//! returns the [`Command`]s the host must carry out.  It never blocks and
//! never performs I/O itself, so the whole protocol can be driven step by
//! step in tests.
//!
//! # Guarantees
//!
//! - At most one [`Command::SendInput`] is outstanding at any time: a new one
//!   is only issued by the event that submitted to an idle queue, or by the
//!   `RequestCompleted` of the previous one.
//! - Input events reach the peer in the order they were accepted.
//! - Key signals received while the transport is not open are dropped.
//! - Every frame message is acknowledged, including malformed ones, so the
//!   pull-based stream never stalls.
//!
//! # Lifecycle
//!
//! ```text
//! ScreenController::new() ── init() ──> running ── dispose() ──> disposed
//! ```
//!
//! Events delivered before `init` or after `dispose` are ignored.

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::domain::buttons::ButtonMap;
use crate::domain::canvas::{Canvas, FrameRenderer};
use crate::domain::connection::{ConnectionState, ConnectionTracker, RECONNECT_DELAY};
use crate::domain::frame::{Frame, FrameFormatError};
use crate::domain::input::{KeyEdgeState, OutboundEvent, Polarity};
use crate::domain::queue::{OutboundQueue, Submission, DEFAULT_QUEUE_CAPACITY};
use crate::protocol::event_path;

/// How an input request finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestOutcome {
    /// The peer answered `204 No Content`.
    Acknowledged,
    /// The peer answered with some other status.
    UnexpectedStatus(u16),
    /// The request never got an answer.
    Failed(String),
}

/// Everything that can happen to the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerEvent {
    /// A binary message arrived on the frame stream.
    FrameReceived(Vec<u8>),
    SocketOpened,
    SocketClosed,
    SocketErrored(String),
    /// A physical key went down; carries the key identifier (`KeyA`, `Space`, ...).
    KeyDown(String),
    KeyUp(String),
    /// The in-flight input request finished.
    RequestCompleted(RequestOutcome),
    /// A reconnect timer armed by [`Command::ScheduleReconnect`] expired.
    ReconnectTimerFired,
}

/// Work the host must perform on behalf of the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Open a new frame stream connection.
    Connect,
    /// Send the one-byte "ready for next frame" acknowledgement.
    SendFrameAck,
    /// Issue the input request for this event and report back with
    /// [`ControllerEvent::RequestCompleted`].
    SendInput(OutboundEvent),
    /// Arm a one-shot timer that delivers [`ControllerEvent::ReconnectTimerFired`].
    ScheduleReconnect(Duration),
}

/// Tunables for [`ScreenController`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerConfig {
    pub reconnect_delay: Duration,
    pub queue_capacity: usize,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            reconnect_delay: RECONNECT_DELAY,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

/// Running counters, for logs and status output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControllerStats {
    pub frames_rendered: u64,
    pub frames_rejected: u64,
    /// Input requests issued.
    pub requests_sent: u64,
    /// Input requests that finished with anything other than `204`.
    pub requests_failed: u64,
    pub events_dropped_disconnected: u64,
    pub events_dropped_overflow: u64,
    pub connect_attempts: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    Created,
    Running,
    Disposed,
}

pub struct ScreenController {
    lifecycle: Lifecycle,
    connection: ConnectionTracker,
    keys: KeyEdgeState,
    queue: OutboundQueue,
    renderer: FrameRenderer,
    surface: Canvas,
    stats: ControllerStats,
}

impl ScreenController {
    pub fn new(config: ControllerConfig) -> Self {
        Self {
            lifecycle: Lifecycle::Created,
            connection: ConnectionTracker::new(config.reconnect_delay),
            keys: KeyEdgeState::new(),
            queue: OutboundQueue::with_capacity(config.queue_capacity),
            renderer: FrameRenderer::new(),
            surface: Canvas::default(),
            stats: ControllerStats::default(),
        }
    }

    /// Starts the controller.  Returns the initial [`Command::Connect`];
    /// subsequent calls return nothing.
    pub fn init(&mut self) -> Vec<Command> {
        if self.lifecycle != Lifecycle::Created {
            return Vec::new();
        }
        self.lifecycle = Lifecycle::Running;
        vec![self.start_connect()]
    }

    /// Stops the controller.  Waiting input events are discarded and every
    /// later event is ignored.
    pub fn dispose(&mut self) {
        if self.lifecycle == Lifecycle::Disposed {
            return;
        }
        self.lifecycle = Lifecycle::Disposed;
        self.queue.clear();
        info!("screen controller disposed");
    }

    pub fn is_running(&self) -> bool {
        self.lifecycle == Lifecycle::Running
    }

    /// The visible display surface.
    pub fn surface(&self) -> &Canvas {
        &self.surface
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.connection.state()
    }

    pub fn is_ready(&self) -> bool {
        self.connection.is_ready()
    }

    /// Whether an input request is outstanding.
    pub fn request_in_flight(&self) -> bool {
        self.queue.is_busy()
    }

    /// Input events waiting behind the outstanding request.
    pub fn queued_events(&self) -> usize {
        self.queue.len()
    }

    pub fn stats(&self) -> ControllerStats {
        self.stats
    }

    /// Processes one event.
    pub fn handle(&mut self, event: ControllerEvent) -> Vec<Command> {
        if !self.is_running() {
            debug!("ignoring {event:?}: controller not running");
            return Vec::new();
        }

        match event {
            ControllerEvent::FrameReceived(bytes) => self.on_frame(bytes),
            ControllerEvent::SocketOpened => self.on_open(),
            ControllerEvent::SocketClosed => self.on_lost("closed"),
            ControllerEvent::SocketErrored(reason) => {
                warn!("frame stream error: {reason}");
                self.on_lost("errored")
            }
            ControllerEvent::KeyDown(code) => self.on_key(&code, Polarity::Down),
            ControllerEvent::KeyUp(code) => self.on_key(&code, Polarity::Up),
            ControllerEvent::RequestCompleted(outcome) => self.on_request_completed(outcome),
            ControllerEvent::ReconnectTimerFired => self.on_reconnect_timer(),
        }
    }

    /// Validates and paints one frame.  On error the surface is untouched.
    pub fn render_frame(&mut self, bytes: Vec<u8>) -> Result<(), FrameFormatError> {
        let frame = Frame::from_bytes(bytes)?;
        self.renderer.render(&frame, &mut self.surface);
        Ok(())
    }

    // ── Handlers ─────────────────────────────────────────────────────────────

    fn on_frame(&mut self, bytes: Vec<u8>) -> Vec<Command> {
        match self.render_frame(bytes) {
            Ok(()) => {
                self.stats.frames_rendered += 1;
                debug!("rendered frame {}", self.stats.frames_rendered);
            }
            Err(e) => {
                self.stats.frames_rejected += 1;
                warn!("dropping frame: {e}");
            }
        }

        if self.connection.is_ready() {
            vec![Command::SendFrameAck]
        } else {
            Vec::new()
        }
    }

    fn on_open(&mut self) -> Vec<Command> {
        self.connection.opened();
        info!(
            "connection established (attempt {})",
            self.connection.attempts()
        );
        Vec::new()
    }

    fn on_lost(&mut self, how: &str) -> Vec<Command> {
        match self.connection.lost() {
            Some(delay) => {
                info!("connection {how}; reconnecting in {delay:?}");
                vec![Command::ScheduleReconnect(delay)]
            }
            None => {
                debug!("connection {how}; reconnect already scheduled");
                Vec::new()
            }
        }
    }

    fn on_reconnect_timer(&mut self) -> Vec<Command> {
        if self.connection.timer_fired() {
            vec![self.start_connect()]
        } else {
            debug!(
                "stale reconnect timer ignored (state {})",
                self.connection.state()
            );
            Vec::new()
        }
    }

    fn on_key(&mut self, code: &str, signal: Polarity) -> Vec<Command> {
        let Some(button) = ButtonMap::lookup(code) else {
            return Vec::new();
        };
        let Some(event) = self.keys.apply(button, signal) else {
            return Vec::new();
        };

        if !self.connection.is_ready() {
            self.stats.events_dropped_disconnected += 1;
            debug!("dropping {event:?}: not connected");
            return Vec::new();
        }

        match self.queue.submit(event) {
            Submission::SendNow(event) => vec![self.dispatch(event)],
            Submission::Queued => {
                debug!("queued {event:?} ({} waiting)", self.queue.len());
                Vec::new()
            }
            Submission::QueuedEvicting(evicted) => {
                self.stats.events_dropped_overflow += 1;
                warn!(
                    "input queue full ({}); dropped oldest {evicted:?}",
                    self.queue.capacity()
                );
                Vec::new()
            }
        }
    }

    fn on_request_completed(&mut self, outcome: RequestOutcome) -> Vec<Command> {
        match outcome {
            RequestOutcome::Acknowledged => {}
            RequestOutcome::UnexpectedStatus(status) => {
                self.stats.requests_failed += 1;
                warn!("input request answered with status {status}");
            }
            RequestOutcome::Failed(reason) => {
                self.stats.requests_failed += 1;
                warn!("input request failed: {reason}");
            }
        }

        match self.queue.complete() {
            Some(next) => vec![self.dispatch(next)],
            None => Vec::new(),
        }
    }

    fn dispatch(&mut self, event: OutboundEvent) -> Command {
        self.stats.requests_sent += 1;
        debug!("sending {}", event_path(&event));
        Command::SendInput(event)
    }

    fn start_connect(&mut self) -> Command {
        self.connection.begin_connect();
        self.stats.connect_attempts = self.connection.attempts();
        Command::Connect
    }
}

impl Default for ScreenController {
    fn default() -> Self {
        Self::new(ControllerConfig::default())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
