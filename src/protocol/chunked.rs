// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Chunked inbound message reassembly.
//!
//! A sender that needs to deliver more than one bus frame's worth of data
//! first sends a 6-byte header, then the payload in chunks. The receiver
//! acknowledges every frame with a single `0x06` sent back to the return
//! route named in the header (stop-and-wait).
//!
//! ```text
//! header: [adr: u8][pid: u16 LE][len: u16 LE][type: u8]
//!
//!  IDLE ──header──▶ RECEIVING ──chunk (total < len)──▶ RECEIVING
//!   ▲                   │
//!   └──── total == len ─┘  decode by type: 0 bytes, 1 utf8, 2 json
//! ```
//!
//! Any rejected frame resets the session, so the next frame is read as a
//! header again.

use crate::errors::ProtocolError;
use crate::node::{decode, Pid, Value, WireType};
use crate::observability::messages::protocol::{
    ChunkedFrameRejected, ChunkedHeaderReceived, ChunkedMessageCompleted,
};
use crate::observability::messages::StructuredLog;

pub const ACK: u8 = 0x06;
pub const HEADER_LEN: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    Bytes,
    Utf8,
    Json,
}

impl MessageType {
    pub fn from_tag(tag: u8) -> Result<Self, ProtocolError> {
        match tag {
            0 => Ok(MessageType::Bytes),
            1 => Ok(MessageType::Utf8),
            2 => Ok(MessageType::Json),
            other => Err(ProtocolError::UnknownMessageType(other)),
        }
    }

    pub fn tag(self) -> u8 {
        match self {
            MessageType::Bytes => 0,
            MessageType::Utf8 => 1,
            MessageType::Json => 2,
        }
    }

    pub fn wire_type(self) -> WireType {
        match self {
            MessageType::Bytes => WireType::Bytes,
            MessageType::Utf8 => WireType::Utf8,
            MessageType::Json => WireType::Json,
        }
    }
}

/// Where acknowledgements and replies for a session go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    pub adr: u8,
    pub pid: Pid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub route: Route,
    pub len: u16,
    pub message_type: MessageType,
}

impl Header {
    pub fn parse(frame: &[u8]) -> Result<Self, ProtocolError> {
        if frame.len() != HEADER_LEN {
            return Err(ProtocolError::MalformedHeader {
                expected: HEADER_LEN,
                actual: frame.len(),
            });
        }
        Ok(Self {
            route: Route {
                adr: frame[0],
                pid: u16::from_le_bytes([frame[1], frame[2]]),
            },
            len: u16::from_le_bytes([frame[3], frame[4]]),
            message_type: MessageType::from_tag(frame[5])?,
        })
    }

    pub fn to_bytes(&self) -> [u8; HEADER_LEN] {
        let pid = self.route.pid.to_le_bytes();
        let len = self.len.to_le_bytes();
        [
            self.route.adr,
            pid[0],
            pid[1],
            len[0],
            len[1],
            self.message_type.tag(),
        ]
    }
}

/// A fully reassembled and decoded message.
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkedMessage {
    pub route: Route,
    pub message_type: MessageType,
    pub value: Value,
}

/// Result of feeding one accepted frame. Both variants must be acknowledged.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// Header or intermediate chunk accepted; acknowledge to this route.
    Ack(Route),
    /// The last chunk arrived and the message decoded.
    Complete(ChunkedMessage),
}

impl Step {
    pub fn route(&self) -> Route {
        match self {
            Step::Ack(route) => *route,
            Step::Complete(message) => message.route,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiverState {
    Idle,
    Receiving,
}

struct Session {
    header: Header,
    buffer: Vec<u8>,
}

#[derive(Default)]
pub struct ChunkedReceiver {
    session: Option<Session>,
}

impl ChunkedReceiver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ReceiverState {
        match self.session {
            Some(_) => ReceiverState::Receiving,
            None => ReceiverState::Idle,
        }
    }

    pub fn route(&self) -> Option<Route> {
        self.session.as_ref().map(|s| s.header.route)
    }

    pub fn received(&self) -> usize {
        self.session.as_ref().map(|s| s.buffer.len()).unwrap_or(0)
    }

    /// Drop any session in progress. Always safe to call.
    pub fn reset(&mut self) -> bool {
        self.session.take().is_some()
    }

    /// Feed one frame. On error the session is reset and the frame must not
    /// be acknowledged.
    pub fn feed(&mut self, frame: &[u8]) -> Result<Step, ProtocolError> {
        let result = self.advance(frame);
        if let Err(error) = &result {
            self.reset();
            ChunkedFrameRejected { error }.log();
        }
        result
    }

    fn advance(&mut self, frame: &[u8]) -> Result<Step, ProtocolError> {
        let Some(mut session) = self.session.take() else {
            let header = Header::parse(frame)?;
            ChunkedHeaderReceived {
                adr: header.route.adr,
                pid: header.route.pid,
                expected: header.len as usize,
                message_type: header.message_type.wire_type().name(),
            }
            .log();
            let session = Session {
                header,
                buffer: Vec::with_capacity(header.len as usize),
            };
            if header.len == 0 {
                return finish(session);
            }
            self.session = Some(session);
            return Ok(Step::Ack(header.route));
        };

        let expected = session.header.len as usize;
        let received = session.buffer.len() + frame.len();
        if received > expected {
            return Err(ProtocolError::LengthOverrun { expected, received });
        }
        session.buffer.extend_from_slice(frame);
        if received == expected {
            return finish(session);
        }
        let route = session.header.route;
        self.session = Some(session);
        Ok(Step::Ack(route))
    }
}

fn finish(session: Session) -> Result<Step, ProtocolError> {
    let message_type = session.header.message_type;
    let value = decode(&session.buffer, message_type.wire_type())?;
    ChunkedMessageCompleted {
        pid: session.header.route.pid,
        len: session.buffer.len(),
        message_type: message_type.wire_type().name(),
    }
    .log();
    Ok(Step::Complete(ChunkedMessage {
        route: session.header.route,
        message_type,
        value,
    }))
}
