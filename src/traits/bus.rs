// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::errors::BusError;
use crate::node::Pid;

/// One encoded value on its way to the bus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusFrame {
    /// Bus address of the destination device; `None` for the default route.
    pub adr: Option<u8>,
    pub pid: Pid,
    pub cmd: u8,
    pub payload: Vec<u8>,
}

/// Consumer of encoded frames. Implementations own the physical link.
///
/// `send` is called from inside announcements and must never block.
pub trait BusTransport: Send + Sync {
    fn send(&self, frame: BusFrame) -> Result<(), BusError>;
}
