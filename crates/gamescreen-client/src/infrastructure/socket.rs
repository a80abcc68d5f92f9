//! Websocket transport for the frame stream.
//!
//! Each connect attempt runs in its own Tokio task and owns its socket
//! exclusively.  The task reports everything that happens to the socket as
//! [`ControllerEvent`]s tagged with the attempt's session id, so the event
//! loop can ignore reports from a socket it has already replaced.
//!
//! ```text
//!  connect_async ──ok──> SocketOpened
//!       │                    │
//!      err                binary message ──> FrameReceived(bytes)
//!       │                    │
//!       v                 error / close / EOF
//!  SocketErrored + SocketClosed <──┘
//! ```
//!
//! Outbound traffic (the acknowledgement byte) goes through an unbounded
//! channel into the same task, which writes it to the socket.

use futures_util::{SinkExt, StreamExt};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::{self, Message as WsMessage};
use tokio_tungstenite::connect_async;
use tracing::{debug, info, warn};
use uuid::Uuid;

use gamescreen_core::controller::ControllerEvent;
use gamescreen_core::protocol::ACK_BYTE;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("failed to connect to {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: tungstenite::Error,
    },
    #[error("frame stream I/O failed: {0}")]
    Io(#[source] tungstenite::Error),
    /// The session task has already finished; nothing can be sent.
    #[error("frame stream session {0} is closed")]
    Closed(Uuid),
}

/// A report from a socket task to the event loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocketReport {
    pub session: Uuid,
    pub event: ControllerEvent,
}

/// Handle to one running socket session.
#[derive(Debug)]
pub struct FrameStream {
    session: Uuid,
    outbound: mpsc::UnboundedSender<WsMessage>,
    task: JoinHandle<()>,
}

impl FrameStream {
    /// Starts connecting to `url` in a new task.  Reports go to `reports`.
    pub fn spawn(url: String, reports: mpsc::UnboundedSender<SocketReport>) -> Self {
        let session = Uuid::new_v4();
        let (outbound, outbound_rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(run_session(url, session, reports, outbound_rx));
        Self {
            session,
            outbound,
            task,
        }
    }

    pub fn session(&self) -> Uuid {
        self.session
    }

    /// Queues the "ready for next frame" acknowledgement.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Closed`] if the session task has exited.
    pub fn send_ack(&self) -> Result<(), TransportError> {
        self.outbound
            .send(ack_message())
            .map_err(|_| TransportError::Closed(self.session))
    }

    /// Stops the session task.  No further reports are produced.
    pub fn close(self) {
        debug!(session = %self.session, "closing frame stream");
        self.task.abort();
    }
}

/// The acknowledgement message: a single `r`.
pub fn ack_message() -> WsMessage {
    WsMessage::Text(char::from(ACK_BYTE).to_string())
}

async fn run_session(
    url: String,
    session: Uuid,
    reports: mpsc::UnboundedSender<SocketReport>,
    mut outbound: mpsc::UnboundedReceiver<WsMessage>,
) {
    let report = |event: ControllerEvent| {
        // The loop may already have shut down; nothing left to tell.
        let _ = reports.send(SocketReport { session, event });
    };
    let fail = |e: TransportError| {
        warn!(%session, "{e}");
        report(ControllerEvent::SocketErrored(e.to_string()));
        report(ControllerEvent::SocketClosed);
    };

    info!(%session, "connecting to {url}");
    let ws = match connect_async(url.as_str()).await {
        Ok((ws, _response)) => ws,
        Err(source) => {
            fail(TransportError::Connect { url, source });
            return;
        }
    };

    report(ControllerEvent::SocketOpened);
    let (mut sink, mut stream) = ws.split();

    loop {
        tokio::select! {
            inbound = stream.next() => match inbound {
                Some(Ok(WsMessage::Binary(bytes))) => {
                    report(ControllerEvent::FrameReceived(bytes));
                }
                Some(Ok(WsMessage::Close(frame))) => {
                    debug!(%session, "peer closed the stream: {frame:?}");
                    report(ControllerEvent::SocketClosed);
                    break;
                }
                Some(Ok(other)) => {
                    debug!(%session, "ignoring non-binary message ({} bytes)", other.len());
                }
                Some(Err(e)) => {
                    fail(TransportError::Io(e));
                    break;
                }
                None => {
                    debug!(%session, "frame stream ended");
                    report(ControllerEvent::SocketClosed);
                    break;
                }
            },
            message = outbound.recv() => match message {
                Some(message) => {
                    if let Err(e) = sink.send(message).await {
                        fail(TransportError::Io(e));
                        break;
                    }
                }
                None => {
                    let _ = sink.close().await;
                    break;
                }
            },
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ack_message_is_single_r() {
        match ack_message() {
            WsMessage::Text(text) => assert_eq!(text, "r"),
            other => panic!("unexpected ack message {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_refused_connect_reports_error_then_close() {
        // Arrange
        let (tx, mut rx) = mpsc::unbounded_channel();

        // Act: nothing listens on port 1
        let stream = FrameStream::spawn("ws://127.0.0.1:1/".to_string(), tx);
        let first = rx.recv().await.expect("error report");
        let second = rx.recv().await.expect("close report");

        // Assert
        assert_eq!(first.session, stream.session());
        assert!(matches!(first.event, ControllerEvent::SocketErrored(_)));
        assert_eq!(second.event, ControllerEvent::SocketClosed);
    }

    #[tokio::test]
    async fn test_send_ack_after_task_exit_is_closed_error() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let stream = FrameStream::spawn("ws://127.0.0.1:1/".to_string(), tx);
        rx.recv().await;
        rx.recv().await;
        // Give the finished task a moment to drop its receiver.
        tokio::task::yield_now().await;
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;

        let result = stream.send_ack();

        assert!(matches!(result, Err(TransportError::Closed(_))));
    }
}
