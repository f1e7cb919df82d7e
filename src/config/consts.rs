// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

/// Default number of frames the Bifrost queue holds before its overflow policy applies
pub const DEFAULT_QUEUE_CAPACITY: usize = 256;
/// Default drain poll interval in milliseconds
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 10;
/// Default wait for a one-byte reply during a block transfer, in milliseconds
pub const DEFAULT_REPLY_TIMEOUT_MS: u64 = 1_000;
/// Default retransmissions allowed per block before a transfer fails
pub const DEFAULT_MAX_RETRIES: u32 = 10;
/// Default wait for the receiver's handshake byte, in milliseconds
pub const DEFAULT_HANDSHAKE_TIMEOUT_MS: u64 = 60_000;
/// Default capacity of the channel-backed bus
pub const DEFAULT_BUS_CHANNEL_CAPACITY: usize = 64;
/// Pid the order receiver registers under unless configured otherwise
pub const ORDER_RECEIVER_PID: u16 = 65_500;
/// Bifrost destination for terminal output
pub const TERM_DESTINATION: &str = "term";
