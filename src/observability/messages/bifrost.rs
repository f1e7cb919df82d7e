// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for the observer bridge.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use std::time::Duration;
use tracing::Span;

/// The bounded queue was full and a frame was discarded.
///
/// # Log Level
/// `warn!` - Data loss under backpressure
///
/// # Example
/// ```
/// use floe_iris::observability::messages::bifrost::QueueOverflow;
///
/// let msg = QueueOverflow {
///     policy: "drop_oldest",
///     capacity: 256,
///     dropped_total: 1,
/// };
///
/// tracing::warn!("{}", msg);
/// ```
pub struct QueueOverflow<'a> {
    pub policy: &'a str,
    pub capacity: usize,
    pub dropped_total: u64,
}

impl Display for QueueOverflow<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Bifrost queue full at {} frames; {} applied ({} dropped so far)",
            self.capacity, self.policy, self.dropped_total
        )
    }
}

impl StructuredLog for QueueOverflow<'_> {
    fn log(&self) {
        tracing::warn!(
            policy = self.policy,
            capacity = self.capacity,
            dropped_total = self.dropped_total,
            "{}", self
        );
    }
}

/// An observer manager was attached to the bridge.
pub struct ObserverAttached {
    pub active: bool,
}

impl Display for ObserverAttached {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Observer manager attached (active={})", self.active)
    }
}

impl StructuredLog for ObserverAttached {
    fn log(&self) {
        tracing::info!(active = self.active, "{}", self);
    }
}

/// The drain task started polling the queue.
///
/// # Log Level
/// `info!` - Task lifecycle
pub struct DrainStarted {
    pub poll_interval: Duration,
}

impl Display for DrainStarted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Bifrost drain started, polling every {:?}", self.poll_interval)
    }
}

impl StructuredLog for DrainStarted {
    fn log(&self) {
        tracing::info!(
            poll_interval_ms = self.poll_interval.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "bifrost_drain",
            span_name = name,
            poll_interval_ms = self.poll_interval.as_millis() as u64,
        )
    }
}

/// The drain task stopped after cancellation.
pub struct DrainStopped {
    pub delivered: u64,
    pub pending: usize,
}

impl Display for DrainStopped {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Bifrost drain stopped: {} frames delivered, {} still queued",
            self.delivered, self.pending
        )
    }
}

impl StructuredLog for DrainStopped {
    fn log(&self) {
        tracing::info!(delivered = self.delivered, pending = self.pending, "{}", self);
    }
}

/// A structured payload could not be serialized and was not sent.
pub struct PayloadSerializationFailed<'a> {
    pub destination: &'a str,
    pub error: &'a serde_json::Error,
}

impl Display for PayloadSerializationFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Payload for '{}' could not be serialized: {}",
            self.destination, self.error
        )
    }
}

impl StructuredLog for PayloadSerializationFailed<'_> {
    fn log(&self) {
        tracing::error!(
            destination = self.destination,
            error = %self.error,
            "{}", self
        );
    }
}
