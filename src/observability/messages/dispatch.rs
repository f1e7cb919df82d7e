// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for announcement side effects.

use crate::errors::{BusError, CodecError, NodeError};
use crate::node::{Pid, WireType};
use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};

/// A subscriber returned an error; the remaining subscribers still ran.
///
/// # Log Level
/// `error!` - Failure requiring attention
///
/// # Example
/// ```
/// use floe_iris::errors::NodeError;
/// use floe_iris::observability::messages::dispatch::SubscriberFailed;
///
/// let error = NodeError::Callback("stalled".into());
/// let msg = SubscriberFailed {
///     origin: 3,
///     index: 1,
///     target: "callback",
///     error: &error,
/// };
///
/// tracing::error!("{}", msg);
/// ```
pub struct SubscriberFailed<'a> {
    pub origin: Pid,
    pub index: usize,
    pub target: &'a str,
    pub error: &'a NodeError,
}

impl Display for SubscriberFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Subscriber #{} ({}) of node {} failed: {}",
            self.index, self.target, self.origin, self.error
        )
    }
}

impl StructuredLog for SubscriberFailed<'_> {
    fn log(&self) {
        tracing::error!(
            origin = self.origin,
            index = self.index,
            target = self.target,
            error = %self.error,
            "{}", self
        );
    }
}

/// The bus transport refused a frame.
///
/// # Log Level
/// `warn!` - Degraded behavior
pub struct BusSendFailed<'a> {
    pub pid: Pid,
    pub error: &'a BusError,
}

impl Display for BusSendFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Bus send for node {} failed: {}", self.pid, self.error)
    }
}

impl StructuredLog for BusSendFailed<'_> {
    fn log(&self) {
        tracing::warn!(pid = self.pid, error = %self.error, "{}", self);
    }
}

/// The node's state does not fit its declared wire type.
///
/// # Log Level
/// `error!` - Node misconfiguration
pub struct EncodeFailed<'a> {
    pub pid: Pid,
    pub wire_type: WireType,
    pub error: &'a CodecError,
}

impl Display for EncodeFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Node {} state cannot be encoded as {}: {}",
            self.pid, self.wire_type, self.error
        )
    }
}

impl StructuredLog for EncodeFailed<'_> {
    fn log(&self) {
        tracing::error!(
            pid = self.pid,
            wire_type = %self.wire_type,
            error = %self.error,
            "{}", self
        );
    }
}

/// A frame handed to a bus that has no physical link.
///
/// # Log Level
/// `info!` - Operational trace of bus traffic
pub struct FrameLogged<'a> {
    pub adr: Option<u8>,
    pub pid: Pid,
    pub cmd: u8,
    pub payload: &'a [u8],
}

impl Display for FrameLogged<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self.adr {
            Some(adr) => write!(
                f,
                "Bus frame to {}:{} cmd={} payload={:02x?}",
                adr, self.pid, self.cmd, self.payload
            ),
            None => write!(
                f,
                "Bus frame to {} cmd={} payload={:02x?}",
                self.pid, self.cmd, self.payload
            ),
        }
    }
}

impl StructuredLog for FrameLogged<'_> {
    fn log(&self) {
        tracing::info!(
            adr = self.adr,
            pid = self.pid,
            cmd = self.cmd,
            len = self.payload.len(),
            "{}", self
        );
    }
}
