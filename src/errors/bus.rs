// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use thiserror::Error;

/// Errors raised when handing a frame to the bus transport.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BusError {
    /// The transport's outbound buffer is full; the frame was not queued.
    #[error("bus transport is full, frame for pid {pid} dropped")]
    Full { pid: u16 },

    /// The consuming link task has gone away.
    #[error("bus transport is closed")]
    Closed,
}
