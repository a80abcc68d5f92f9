//! The outbound request queue and its busy flag.
//!
//! At most one input request may be in flight.  [`OutboundQueue::submit`]
//! either hands the event straight back for immediate transmission (when
//! idle) or parks it behind the in-flight request.  [`OutboundQueue::complete`]
//! is called when the in-flight request finishes, successfully or not, and
//! yields the next event to transmit.
//!
//! The queue holds at most `capacity` waiting events.  When a new event
//! arrives at a full queue the oldest waiting event is evicted; the in-flight
//! request is never affected.

use std::collections::VecDeque;

use crate::domain::input::OutboundEvent;

/// Default number of events that may wait behind the in-flight request.
pub const DEFAULT_QUEUE_CAPACITY: usize = 64;

/// What the caller must do after [`OutboundQueue::submit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    /// The queue was idle; transmit this event now.
    SendNow(OutboundEvent),
    /// A request is in flight; the event is waiting.
    Queued,
    /// Like `Queued`, but the queue was full and the oldest waiting event
    /// was discarded to make room.
    QueuedEvicting(OutboundEvent),
}

#[derive(Debug, Clone)]
pub struct OutboundQueue {
    waiting: VecDeque<OutboundEvent>,
    busy: bool,
    capacity: usize,
}

impl OutboundQueue {
    /// Creates an idle queue.  A capacity of zero is raised to one.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            waiting: VecDeque::with_capacity(capacity),
            busy: false,
            capacity,
        }
    }

    /// Whether a request is currently in flight.
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Number of events waiting behind the in-flight request.
    pub fn len(&self) -> usize {
        self.waiting.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waiting.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Accepts an event for transmission.
    pub fn submit(&mut self, event: OutboundEvent) -> Submission {
        if !self.busy {
            self.busy = true;
            return Submission::SendNow(event);
        }

        let evicted = if self.waiting.len() >= self.capacity {
            self.waiting.pop_front()
        } else {
            None
        };
        self.waiting.push_back(event);

        match evicted {
            Some(old) => Submission::QueuedEvicting(old),
            None => Submission::Queued,
        }
    }

    /// Marks the in-flight request as finished.
    ///
    /// Returns the next event to transmit, keeping the queue busy, or `None`
    /// after clearing the busy flag when nothing is waiting.  Calling this
    /// while idle is a no-op that returns `None`.
    pub fn complete(&mut self) -> Option<OutboundEvent> {
        if !self.busy {
            return None;
        }
        match self.waiting.pop_front() {
            Some(next) => Some(next),
            None => {
                self.busy = false;
                None
            }
        }
    }

    /// Drops all waiting events and clears the busy flag.
    pub fn clear(&mut self) {
        self.waiting.clear();
        self.busy = false;
    }
}

impl Default for OutboundQueue {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_QUEUE_CAPACITY)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
