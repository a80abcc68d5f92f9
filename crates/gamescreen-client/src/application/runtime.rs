//! The client event loop.
//!
//! [`ClientRuntime`] owns the [`ScreenController`] and is the only place that
//! touches it.  Socket tasks, HTTP request tasks, reconnect timers and the key
//! source all talk to the loop through channels; the loop feeds what they
//! report into the controller one event at a time and carries out the
//! commands it returns.
//!
//! ```text
//!   FrameStream task ──SocketReport──┐
//!   request tasks ──RequestCompleted─┤
//!   reconnect timer ──TimerFired─────┼──> ClientRuntime ──> ScreenController
//!   RuntimeHandle ──Key / Shutdown───┘          │
//!                                               └──> Command: Connect,
//!                                                    SendFrameAck, SendInput,
//!                                                    ScheduleReconnect
//! ```
//!
//! Reports carry the session id of the socket that produced them.  Once a
//! socket has been replaced, anything it still says is dropped.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use gamescreen_core::{
    Command, ConnectionState, ControllerEvent, ControllerStats, OutboundEvent, ScreenController,
};

use crate::domain::ClientConfig;
use crate::infrastructure::input_endpoint::{request_outcome, InputEndpoint};
use crate::infrastructure::key_source::KeyInput;
use crate::infrastructure::snapshot::SnapshotWriter;
use crate::infrastructure::socket::{FrameStream, SocketReport};

/// Returned by [`RuntimeHandle`] once the loop has exited.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("client runtime has stopped")]
pub struct RuntimeStopped;

/// Point-in-time view of the client, published after every event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientStatus {
    pub connection: ConnectionState,
    pub request_in_flight: bool,
    pub queued_events: usize,
    pub stats: ControllerStats,
}

impl ClientStatus {
    fn of(controller: &ScreenController) -> Self {
        Self {
            connection: controller.connection_state(),
            request_in_flight: controller.request_in_flight(),
            queued_events: controller.queued_events(),
            stats: controller.stats(),
        }
    }
}

#[derive(Debug)]
enum LoopMessage {
    Event(ControllerEvent),
    Shutdown,
}

/// Cloneable sender into a running [`ClientRuntime`].
#[derive(Debug, Clone)]
pub struct RuntimeHandle {
    tx: mpsc::UnboundedSender<LoopMessage>,
}

impl RuntimeHandle {
    /// Forwards a key transition.  [`KeyInput::Quit`] stops the loop.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeStopped`] if the loop has already exited.
    pub fn key(&self, input: KeyInput) -> Result<(), RuntimeStopped> {
        match input {
            KeyInput::Down(code) => self.send(LoopMessage::Event(ControllerEvent::KeyDown(code))),
            KeyInput::Up(code) => self.send(LoopMessage::Event(ControllerEvent::KeyUp(code))),
            KeyInput::Quit => self.shutdown(),
        }
    }

    /// Asks the loop to stop.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeStopped`] if the loop has already exited.
    pub fn shutdown(&self) -> Result<(), RuntimeStopped> {
        self.send(LoopMessage::Shutdown)
    }

    fn send(&self, message: LoopMessage) -> Result<(), RuntimeStopped> {
        self.tx.send(message).map_err(|_| RuntimeStopped)
    }
}

/// The single-threaded heart of the client.
pub struct ClientRuntime {
    state: LoopState,
    messages: mpsc::UnboundedReceiver<LoopMessage>,
    reports: mpsc::UnboundedReceiver<SocketReport>,
}

/// Everything the loop mutates while handling one event.
struct LoopState {
    controller: ScreenController,
    ws_url: String,
    endpoint: Arc<dyn InputEndpoint>,
    snapshot: Option<SnapshotWriter>,
    stream: Option<FrameStream>,
    messages_tx: mpsc::UnboundedSender<LoopMessage>,
    reports_tx: mpsc::UnboundedSender<SocketReport>,
    status_tx: watch::Sender<ClientStatus>,
}

impl ClientRuntime {
    pub fn new(config: &ClientConfig, endpoint: Arc<dyn InputEndpoint>) -> Self {
        let controller = ScreenController::new(config.controller_config());
        let (messages_tx, messages) = mpsc::unbounded_channel();
        let (reports_tx, reports) = mpsc::unbounded_channel();
        let (status_tx, _) = watch::channel(ClientStatus::of(&controller));

        Self {
            state: LoopState {
                controller,
                ws_url: config.ws_url(),
                endpoint,
                snapshot: config.snapshot_path().map(SnapshotWriter::new),
                stream: None,
                messages_tx,
                reports_tx,
                status_tx,
            },
            messages,
            reports,
        }
    }

    pub fn handle(&self) -> RuntimeHandle {
        RuntimeHandle {
            tx: self.state.messages_tx.clone(),
        }
    }

    /// Subscribes to status updates.
    pub fn status(&self) -> watch::Receiver<ClientStatus> {
        self.state.status_tx.subscribe()
    }

    /// Runs until [`RuntimeHandle::shutdown`] (or a `Quit` key) is received,
    /// then disposes the controller and hands it back for inspection.
    pub async fn run(self) -> ScreenController {
        let Self {
            mut state,
            mut messages,
            mut reports,
        } = self;

        let commands = state.controller.init();
        state.execute(commands);
        state.publish();

        loop {
            tokio::select! {
                Some(report) = reports.recv() => state.on_socket_report(report),
                message = messages.recv() => match message {
                    Some(LoopMessage::Event(event)) => state.dispatch(event),
                    Some(LoopMessage::Shutdown) | None => break,
                },
            }
            state.publish();
        }

        state.shutdown();
        state.controller
    }
}

impl LoopState {
    fn dispatch(&mut self, event: ControllerEvent) {
        let painted_before = self.controller.stats().frames_rendered;
        let commands = self.controller.handle(event);

        if self.controller.stats().frames_rendered != painted_before {
            if let Some(snapshot) = &self.snapshot {
                snapshot.write(self.controller.surface());
            }
        }

        self.execute(commands);
    }

    fn on_socket_report(&mut self, report: SocketReport) {
        let current = self.stream.as_ref().map(FrameStream::session);
        if current != Some(report.session) {
            debug!(session = %report.session, "dropping report from stale socket: {:?}", report.event);
            return;
        }

        let closed = report.event == ControllerEvent::SocketClosed;
        self.dispatch(report.event);
        if closed {
            if let Some(stream) = self.stream.take() {
                stream.close();
            }
        }
    }

    fn execute(&mut self, commands: Vec<Command>) {
        for command in commands {
            match command {
                Command::Connect => self.connect(),
                Command::SendFrameAck => self.send_ack(),
                Command::SendInput(event) => self.send_input(event),
                Command::ScheduleReconnect(delay) => {
                    let tx = self.messages_tx.clone();
                    tokio::spawn(async move {
                        tokio::time::sleep(delay).await;
                        let _ = tx.send(LoopMessage::Event(ControllerEvent::ReconnectTimerFired));
                    });
                }
            }
        }
    }

    fn connect(&mut self) {
        if let Some(old) = self.stream.take() {
            old.close();
        }
        let stream = FrameStream::spawn(self.ws_url.clone(), self.reports_tx.clone());
        info!(session = %stream.session(), "opening frame stream");
        self.stream = Some(stream);
    }

    fn send_ack(&self) {
        match &self.stream {
            Some(stream) => {
                if let Err(e) = stream.send_ack() {
                    // The socket task reports its own exit; nothing else to do.
                    debug!("frame ack not sent: {e}");
                }
            }
            None => warn!("frame ack requested with no open stream"),
        }
    }

    fn send_input(&self, event: OutboundEvent) {
        let endpoint = Arc::clone(&self.endpoint);
        let tx = self.messages_tx.clone();
        tokio::spawn(async move {
            let outcome = request_outcome(endpoint.send(event).await);
            let _ = tx.send(LoopMessage::Event(ControllerEvent::RequestCompleted(outcome)));
        });
    }

    fn publish(&self) {
        self.status_tx.send_replace(ClientStatus::of(&self.controller));
    }

    fn shutdown(&mut self) {
        self.controller.dispose();
        if let Some(stream) = self.stream.take() {
            stream.close();
        }
        self.publish();
        let stats = self.controller.stats();
        info!(
            frames = stats.frames_rendered,
            requests = stats.requests_sent,
            "client runtime stopped"
        );
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
