// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for the framed byte-stream protocols.
//!
//! This module contains message types for logging events related to:
//! * Chunked inbound sessions (header, completion, rejection, reset)
//! * Outbound block transfers (negotiation, retries, completion, abort)

use crate::errors::ProtocolError;
use crate::node::Pid;
use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// A chunked header opened a receive session.
///
/// # Log Level
/// `debug!` - Protocol detail
pub struct ChunkedHeaderReceived<'a> {
    pub adr: u8,
    pub pid: Pid,
    pub expected: usize,
    pub message_type: &'a str,
}

impl Display for ChunkedHeaderReceived<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Chunked session opened for {}:{}, expecting {} {} bytes",
            self.adr, self.pid, self.expected, self.message_type
        )
    }
}

impl StructuredLog for ChunkedHeaderReceived<'_> {
    fn log(&self) {
        tracing::debug!(
            adr = self.adr,
            pid = self.pid,
            expected = self.expected,
            message_type = self.message_type,
            "{}", self
        );
    }
}

/// A chunked message was fully received and decoded.
///
/// # Log Level
/// `info!` - Operational event
pub struct ChunkedMessageCompleted<'a> {
    pub pid: Pid,
    pub len: usize,
    pub message_type: &'a str,
}

impl Display for ChunkedMessageCompleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Chunked message for {} complete: {} {} bytes",
            self.pid, self.len, self.message_type
        )
    }
}

impl StructuredLog for ChunkedMessageCompleted<'_> {
    fn log(&self) {
        tracing::info!(
            pid = self.pid,
            len = self.len,
            message_type = self.message_type,
            "{}", self
        );
    }
}

/// A frame was rejected and the session reset.
///
/// # Log Level
/// `warn!` - Peer sent something unusable
pub struct ChunkedFrameRejected<'a> {
    pub error: &'a ProtocolError,
}

impl Display for ChunkedFrameRejected<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Chunked frame rejected, session reset: {}", self.error)
    }
}

impl StructuredLog for ChunkedFrameRejected<'_> {
    fn log(&self) {
        tracing::warn!(error = %self.error, "{}", self);
    }
}

/// The outbound transfer moved to a new state.
///
/// # Log Level
/// `debug!` - Protocol detail
pub struct TransferStateChanged<'a> {
    pub from: &'a str,
    pub to: &'a str,
}

impl Display for TransferStateChanged<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Transfer state {} -> {}", self.from, self.to)
    }
}

impl StructuredLog for TransferStateChanged<'_> {
    fn log(&self) {
        tracing::debug!(from = self.from, to = self.to, "{}", self);
    }
}

/// The receiver picked a transfer mode.
///
/// # Log Level
/// `info!` - Operational event
///
/// # Example
/// ```
/// use floe_iris::observability::messages::protocol::TransferNegotiated;
///
/// let msg = TransferNegotiated {
///     mode: "crc16",
///     block_size: 1024,
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct TransferNegotiated<'a> {
    pub mode: &'a str,
    pub block_size: usize,
}

impl Display for TransferNegotiated<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Transfer negotiated: {} trailer, {}-byte blocks",
            self.mode, self.block_size
        )
    }
}

impl StructuredLog for TransferNegotiated<'_> {
    fn log(&self) {
        tracing::info!(mode = self.mode, block_size = self.block_size, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "transfer",
            span_name = name,
            mode = self.mode,
            block_size = self.block_size,
        )
    }
}

/// A block (or the end marker) is being sent again.
///
/// # Log Level
/// `warn!` - Degraded link
pub struct BlockRetransmitted<'a> {
    pub block: u8,
    pub attempt: u32,
    pub reason: &'a str,
}

impl Display for BlockRetransmitted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Retransmitting block {} (attempt {}): {}",
            self.block, self.attempt, self.reason
        )
    }
}

impl StructuredLog for BlockRetransmitted<'_> {
    fn log(&self) {
        tracing::warn!(
            block = self.block,
            attempt = self.attempt,
            reason = self.reason,
            "{}", self
        );
    }
}

pub struct TransferCompleted<'a> {
    pub mode: &'a str,
    pub blocks: usize,
    pub retransmissions: u32,
}

impl Display for TransferCompleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Transfer complete: {} blocks in {} mode, {} retransmissions",
            self.blocks, self.mode, self.retransmissions
        )
    }
}

impl StructuredLog for TransferCompleted<'_> {
    fn log(&self) {
        tracing::info!(
            mode = self.mode,
            blocks = self.blocks,
            retransmissions = self.retransmissions,
            "{}", self
        );
    }
}

/// The transfer ended without completing.
///
/// # Log Level
/// `error!` - Failure reported to the caller
pub struct TransferFailed<'a> {
    pub block: u8,
    pub reason: &'a str,
}

impl Display for TransferFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Transfer failed at block {}: {}", self.block, self.reason)
    }
}

impl StructuredLog for TransferFailed<'_> {
    fn log(&self) {
        tracing::error!(block = self.block, reason = self.reason, "{}", self);
    }
}
