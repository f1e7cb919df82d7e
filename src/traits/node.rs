// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::engine::{dispatch, Announce, Iris};
use crate::errors::{ConfigError, NodeError};
use crate::node::{InputSlot, NodeCore, Pid, Value, WireType};

/// Minimal contract every hardware-bound component satisfies.
///
/// The registry, resolver and dispatcher only ever see this surface; they do
/// not know the concrete node kinds.
pub trait Node: Send + Sync {
    /// Shared identity, state, flags and subscribers.
    fn core(&self) -> &NodeCore;

    /// Short kind name used in diagnostics and GUI descriptions.
    fn kind(&self) -> &'static str;

    fn pid(&self) -> Pid {
        self.core().pid()
    }

    fn wire_type(&self) -> WireType {
        self.core().wire_type()
    }

    /// Accept a pushed state value.
    ///
    /// The default stores the value and announces it.
    fn push(&self, iris: &Iris, state: Value) -> Result<(), NodeError> {
        self.core().set_state(state);
        dispatch::announce(iris, self.core(), Announce::default());
        Ok(())
    }

    /// Inputs the resolver should wire. Declared explicitly per kind.
    fn inputs(&self) -> Vec<&InputSlot> {
        Vec::new()
    }

    /// Post-construction hook, run once after every input is resolved.
    fn on_wired(&self, _iris: &Iris) -> Result<(), ConfigError> {
        Ok(())
    }

    /// Optional description for the remote UI.
    fn gui(&self) -> Option<serde_json::Value> {
        None
    }
}
