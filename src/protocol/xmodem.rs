// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Outbound block transfer (XMODEM family).
//!
//! The receiver opens the session with one byte that picks the mode:
//!
//! | byte        | trailer  | block size |
//! |-------------|----------|------------|
//! | `NAK` 0x15  | checksum | 128        |
//! | `C`   0x43  | CRC16    | 128        |
//! | `STX` 0x02  | CRC16    | 1024       |
//!
//! Each block goes out as
//! `[SOH|STX][n][255 - n][payload padded with 0x1A][sum | crc_hi crc_lo]`
//! and waits for one reply byte: ACK moves on, NAK (or silence until the
//! reply timeout) sends the same bytes again, CAN aborts. After the last
//! block, EOT is repeated until acknowledged.
//!
//! ```text
//! AWAIT_HANDSHAKE ──mode──▶ SENDING ──last block ACK──▶ END ──EOT ACK──▶ DONE
//!                              │                         │
//!                              └──── CAN / retries ──────┴──▶ CANCELED
//! ```

use crate::config::TransferConfig;
use crate::errors::{ProtocolError, TransferError};
use crate::observability::messages::protocol::{
    BlockRetransmitted, TransferCompleted, TransferFailed, TransferNegotiated,
    TransferStateChanged,
};
use crate::observability::messages::StructuredLog;
use crate::protocol::crc16::{checksum, crc16_ccitt};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::time::timeout;
use tracing::Instrument;

pub const SOH: u8 = 0x01;
pub const STX: u8 = 0x02;
pub const EOT: u8 = 0x04;
pub const ACK: u8 = 0x06;
pub const NAK: u8 = 0x15;
pub const CAN: u8 = 0x18;
pub const CRC_REQUEST: u8 = 0x43;
pub const PAD: u8 = 0x1A;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trailer {
    Checksum,
    Crc16,
}

/// Negotiated trailer and block size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mode {
    pub trailer: Trailer,
    pub block_size: usize,
}

impl Mode {
    pub const CHECKSUM_128: Mode = Mode {
        trailer: Trailer::Checksum,
        block_size: 128,
    };
    pub const CRC_128: Mode = Mode {
        trailer: Trailer::Crc16,
        block_size: 128,
    };
    pub const CRC_1K: Mode = Mode {
        trailer: Trailer::Crc16,
        block_size: 1024,
    };

    /// Mode requested by a receiver's handshake byte; `None` for anything else.
    pub fn from_handshake(byte: u8) -> Option<Mode> {
        match byte {
            NAK => Some(Mode::CHECKSUM_128),
            CRC_REQUEST => Some(Mode::CRC_128),
            STX => Some(Mode::CRC_1K),
            _ => None,
        }
    }

    pub fn start_marker(self) -> u8 {
        if self.block_size == 128 {
            SOH
        } else {
            STX
        }
    }

    pub fn name(self) -> &'static str {
        match self.trailer {
            Trailer::Checksum => "checksum",
            Trailer::Crc16 => "crc16",
        }
    }

    /// Full packet length: marker, number, complement, payload, trailer.
    pub fn packet_len(self) -> usize {
        let trailer = match self.trailer {
            Trailer::Checksum => 1,
            Trailer::Crc16 => 2,
        };
        3 + self.block_size + trailer
    }
}

/// Build one packet. `payload` longer than the block size is truncated.
pub fn build_block(mode: Mode, number: u8, payload: &[u8]) -> Vec<u8> {
    let mut data = payload[..payload.len().min(mode.block_size)].to_vec();
    data.resize(mode.block_size, PAD);

    let mut packet = Vec::with_capacity(mode.packet_len());
    packet.push(mode.start_marker());
    packet.push(number);
    packet.push(255 - number);
    packet.extend_from_slice(&data);
    match mode.trailer {
        Trailer::Checksum => packet.push(checksum(&data)),
        Trailer::Crc16 => packet.extend_from_slice(&crc16_ccitt(&data).to_be_bytes()),
    }
    packet
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferState {
    AwaitHandshake,
    Sending,
    End,
    Done,
    Canceled,
}

impl TransferState {
    pub fn name(self) -> &'static str {
        match self {
            TransferState::AwaitHandshake => "AWAIT_HANDSHAKE",
            TransferState::Sending => "SENDING",
            TransferState::End => "END",
            TransferState::Done => "DONE",
            TransferState::Canceled => "CANCELED",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferReport {
    pub mode: Mode,
    pub blocks: usize,
    pub retransmissions: u32,
}

/// Stop-and-wait sender over any async byte stream.
pub struct BlockSender<S> {
    stream: S,
    config: TransferConfig,
    state: TransferState,
    retransmissions: u32,
}

impl<S> BlockSender<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, config: TransferConfig) -> Self {
        Self {
            stream,
            config,
            state: TransferState::AwaitHandshake,
            retransmissions: 0,
        }
    }

    pub fn state(&self) -> TransferState {
        self.state
    }

    pub fn into_inner(self) -> S {
        self.stream
    }

    /// Run one complete transfer of `data`.
    pub async fn send(&mut self, data: &[u8]) -> Result<TransferReport, TransferError> {
        self.state = TransferState::AwaitHandshake;
        self.retransmissions = 0;

        let result = self.run(data).await;
        if let Err(error) = &result {
            self.transition(TransferState::Canceled);
            TransferFailed {
                block: match error {
                    TransferError::RetriesExhausted { block, .. } => *block,
                    _ => 0,
                },
                reason: &error.to_string(),
            }
            .log();
        }
        result
    }

    async fn run(&mut self, data: &[u8]) -> Result<TransferReport, TransferError> {
        let mode = self.handshake().await?;
        let negotiated = TransferNegotiated {
            mode: mode.name(),
            block_size: mode.block_size,
        };
        negotiated.log();
        let span = negotiated.span("send");
        self.transition(TransferState::Sending);

        async {
            let mut number: u8 = 1;
            let mut blocks = 0;
            for chunk in data.chunks(mode.block_size) {
                let packet = build_block(mode, number, chunk);
                self.exchange(&packet, number).await?;
                number = number.wrapping_add(1);
                blocks += 1;
            }

            self.transition(TransferState::End);
            self.exchange(&[EOT], number).await?;
            self.transition(TransferState::Done);

            let report = TransferReport {
                mode,
                blocks,
                retransmissions: self.retransmissions,
            };
            TransferCompleted {
                mode: mode.name(),
                blocks,
                retransmissions: report.retransmissions,
            }
            .log();
            Ok::<TransferReport, TransferError>(report)
        }
        .instrument(span)
        .await
    }

    async fn handshake(&mut self) -> Result<Mode, TransferError> {
        let wait = self.config.get_handshake_timeout();
        match timeout(wait, read_mode(&mut self.stream)).await {
            Ok(mode) => Ok(mode?),
            Err(_) => Err(TransferError::HandshakeTimeout(wait)),
        }
    }

    /// Send `packet` until it is acknowledged, the peer cancels, or the
    /// retry budget runs out.
    async fn exchange(&mut self, packet: &[u8], block: u8) -> Result<(), TransferError> {
        let max_retries = self.config.get_max_retries();
        let reply_timeout = self.config.get_reply_timeout();
        let mut attempts: u32 = 0;
        loop {
            self.stream.write_all(packet).await?;
            self.stream.flush().await?;
            attempts += 1;

            let reason = match timeout(reply_timeout, self.stream.read_u8()).await {
                Ok(Ok(ACK)) => return Ok(()),
                Ok(Ok(CAN)) => return Err(TransferError::Aborted),
                Ok(Ok(NAK)) => "NAK".to_string(),
                Ok(Ok(other)) => ProtocolError::UnexpectedControl(other).to_string(),
                Ok(Err(error)) => return Err(error.into()),
                Err(_) => "reply timeout".to_string(),
            };

            if attempts > max_retries {
                return Err(TransferError::RetriesExhausted { block, attempts });
            }
            self.retransmissions += 1;
            BlockRetransmitted {
                block,
                attempt: attempts + 1,
                reason: &reason,
            }
            .log();
        }
    }

    fn transition(&mut self, to: TransferState) {
        if self.state != to {
            TransferStateChanged {
                from: self.state.name(),
                to: to.name(),
            }
            .log();
            self.state = to;
        }
    }
}

/// Wait for a mode byte; other bytes are line noise and skipped.
async fn read_mode<S: AsyncRead + Unpin>(stream: &mut S) -> std::io::Result<Mode> {
    loop {
        if let Some(mode) = Mode::from_handshake(stream.read_u8().await?) {
            return Ok(mode);
        }
    }
}
