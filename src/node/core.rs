// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! State shared by every node kind: identity, current value, capability flags
//! and the ordered subscriber list.

use crate::node::subscribers::{Subscriber, Subscribers};
use crate::node::WireType;
use crate::node::Value;
use crate::utils::lock;
use std::sync::Mutex;

/// Process-wide node identifier.
pub type Pid = u16;

/// Capability flags that gate what an announcement does.
///
/// Held as plain booleans; [`Flags::to_byte`] packs them only for the wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Flags {
    pub active: bool,
    pub send_to_bus: bool,
    pub debug_serial: bool,
    pub has_subscribers: bool,
}

impl Flags {
    pub const ACTIVE: u8 = 1;
    pub const SEND_TO_BUS: u8 = 2;
    pub const DEBUG_SERIAL: u8 = 8;
    pub const HAS_SUBSCRIBERS: u8 = 16;

    pub fn to_byte(self) -> u8 {
        let mut byte = 0;
        if self.active {
            byte |= Self::ACTIVE;
        }
        if self.send_to_bus {
            byte |= Self::SEND_TO_BUS;
        }
        if self.debug_serial {
            byte |= Self::DEBUG_SERIAL;
        }
        if self.has_subscribers {
            byte |= Self::HAS_SUBSCRIBERS;
        }
        byte
    }

    /// Unknown bits are ignored.
    pub fn from_byte(byte: u8) -> Self {
        Self {
            active: byte & Self::ACTIVE != 0,
            send_to_bus: byte & Self::SEND_TO_BUS != 0,
            debug_serial: byte & Self::DEBUG_SERIAL != 0,
            has_subscribers: byte & Self::HAS_SUBSCRIBERS != 0,
        }
    }
}

/// Construction-time description of a node's identity.
#[derive(Debug, Clone)]
pub struct NodeSpec {
    pub pid: Pid,
    pub wire_type: WireType,
    pub name: Option<String>,
    pub active: bool,
    pub debug: bool,
    pub bcast: bool,
    pub state: Option<Value>,
}

impl NodeSpec {
    pub fn new(pid: Pid, wire_type: WireType) -> Self {
        Self {
            pid,
            wire_type,
            name: None,
            active: false,
            debug: false,
            bcast: false,
            state: None,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn active(mut self) -> Self {
        self.active = true;
        self
    }

    pub fn debug(mut self) -> Self {
        self.debug = true;
        self
    }

    pub fn bcast(mut self) -> Self {
        self.bcast = true;
        self
    }

    pub fn with_state(mut self, state: impl Into<Value>) -> Self {
        self.state = Some(state.into());
        self
    }
}

pub struct NodeCore {
    pid: Pid,
    wire_type: WireType,
    name: Option<String>,
    state: Mutex<Option<Value>>,
    flags: Mutex<Flags>,
    subscribers: Subscribers,
}

impl NodeCore {
    pub fn new(spec: NodeSpec) -> Self {
        let flags = Flags {
            active: spec.active,
            send_to_bus: spec.bcast,
            debug_serial: spec.debug,
            has_subscribers: false,
        };
        Self {
            pid: spec.pid,
            wire_type: spec.wire_type,
            // "no_name" is the placeholder the graph tooling emits for anonymous nodes
            name: spec.name.filter(|n| n != "no_name"),
            state: Mutex::new(spec.state),
            flags: Mutex::new(flags),
            subscribers: Subscribers::default(),
        }
    }

    pub fn pid(&self) -> Pid {
        self.pid
    }

    pub fn wire_type(&self) -> WireType {
        self.wire_type
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn state(&self) -> Option<Value> {
        lock(&self.state).clone()
    }

    pub fn set_state(&self, state: Value) {
        *lock(&self.state) = Some(state);
    }

    /// Current flags. HasSubscribers is read from the subscriber list itself,
    /// so it is true exactly while the list is non-empty.
    pub fn flags(&self) -> Flags {
        let mut flags = *lock(&self.flags);
        flags.has_subscribers = !self.subscribers.is_empty();
        flags
    }

    pub fn set_active(&self, active: bool) {
        lock(&self.flags).active = active;
    }

    pub fn set_send_to_bus(&self, enabled: bool) {
        lock(&self.flags).send_to_bus = enabled;
    }

    pub fn set_debug_serial(&self, enabled: bool) {
        lock(&self.flags).debug_serial = enabled;
    }

    pub fn subscribers(&self) -> &Subscribers {
        &self.subscribers
    }

    /// Append `target` to the fan-out list, which raises HasSubscribers.
    pub fn subscribe(&self, target: Subscriber) {
        self.subscribers.push(target);
    }

    /// Remove `target` by identity. HasSubscribers clears with the last one.
    pub fn unsubscribe(&self, target: &Subscriber) -> bool {
        self.subscribers.remove(target)
    }
}

impl std::fmt::Debug for NodeCore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeCore")
            .field("pid", &self.pid)
            .field("wire_type", &self.wire_type)
            .field("name", &self.name)
            .field("flags", &self.flags())
            .field("subscriber_count", &self.subscribers.len())
            .finish()
    }
}
