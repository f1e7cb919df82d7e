// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::errors::{BusError, CodecError, ConfigError, ProtocolError};
use crate::node::WireType;
use thiserror::Error;

/// Failure of a single state push into a node or subscriber callback.
///
/// The dispatcher reports these per subscriber and keeps notifying the rest.
#[derive(Error, Debug)]
pub enum NodeError {
    #[error("node {pid} expects a {expected} value, got {found}")]
    UnexpectedValue {
        pid: u16,
        expected: WireType,
        found: WireType,
    },

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Bus(#[from] BusError),

    /// Free-form failure reported by a callback subscriber.
    #[error("subscriber callback failed: {0}")]
    Callback(String),

    /// A subscriber panicked while being notified.
    #[error("subscriber panicked: {0}")]
    Panicked(String),
}
