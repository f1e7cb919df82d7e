// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Framed byte-stream protocols used by the bus layer.
//!
//! * [`chunked`] reassembles long inbound messages sent as a header frame
//!   followed by payload chunks, acknowledging every frame.
//! * [`xmodem`] streams outbound data as fixed-size blocks with a checksum
//!   or CRC16 trailer, stop-and-wait, with bounded retries.
//! * [`crc16`] holds the trailer algorithms.

pub mod chunked;
pub mod crc16;
pub mod xmodem;

pub use chunked::{ChunkedMessage, ChunkedReceiver, Header, MessageType, ReceiverState, Route, Step};
pub use crc16::{checksum, crc16_ccitt};
pub use xmodem::{build_block, BlockSender, Mode, Trailer, TransferReport, TransferState};
