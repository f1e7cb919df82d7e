// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors for the wire codec that maps node state to bytes.

use crate::node::WireType;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodecError {
    /// The value's natural type does not match the declared wire tag.
    #[error("cannot encode {found} value as '{expected}'")]
    TypeMismatch { expected: WireType, found: WireType },

    /// A fixed-width tag received the wrong number of bytes.
    #[error("'{tag}' expects {expected} bytes, got {actual}")]
    Length {
        tag: WireType,
        expected: usize,
        actual: usize,
    },

    /// An integer literal outside the range of the declared tag.
    #[error("{value} does not fit in '{tag}'")]
    OutOfRange { tag: WireType, value: i64 },

    #[error("invalid utf8 payload: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("invalid json payload: {0}")]
    Json(#[from] serde_json::Error),
}
