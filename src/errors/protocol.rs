// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors for the framed byte-stream protocols.
//!
//! `ProtocolError` covers problems that are recovered locally (the session is
//! reset or the frame is retransmitted). `TransferError` is what a caller of
//! an outbound transfer finally sees once local recovery has given up.

use crate::errors::CodecError;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProtocolError {
    /// A header frame with the wrong length.
    #[error("malformed header: expected {expected} bytes, got {actual}")]
    MalformedHeader { expected: usize, actual: usize },

    /// A header carrying a message-type tag outside 0..=2.
    #[error("unknown message type tag {0}")]
    UnknownMessageType(u8),

    /// More payload arrived than the header announced.
    #[error("length overrun: expected {expected} bytes, received {received}")]
    LengthOverrun { expected: usize, received: usize },

    /// The reassembled payload does not decode as its declared type.
    #[error("payload decode failed: {0}")]
    Decode(#[from] CodecError),

    /// A reply byte that is none of ACK, NAK or CAN.
    #[error("unexpected control byte 0x{0:02x}")]
    UnexpectedControl(u8),
}

#[derive(Error, Debug)]
pub enum TransferError {
    /// The receiver sent CAN.
    #[error("transfer canceled by receiver")]
    Aborted,

    /// A block (or the end marker) was not acknowledged within the retry limit.
    #[error("block {block} not acknowledged after {attempts} attempts")]
    RetriesExhausted { block: u8, attempts: u32 },

    /// The receiver never sent a handshake byte.
    #[error("no handshake from receiver within {0:?}")]
    HandshakeTimeout(Duration),

    #[error("stream I/O error: {0}")]
    Io(#[from] std::io::Error),
}
