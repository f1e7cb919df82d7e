// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Wireable node inputs.
//!
//! A node that reads another node's value declares an [`InputSlot`] per input.
//! At construction each slot holds one of:
//!
//! * a [`Constant`] when the configuration gave a literal,
//! * a forward reference (a bare pid) to a node that may not exist yet,
//! * a node handle, when the caller already has one.
//!
//! After every node is registered, the resolver walks each node's declared
//! slots and swaps forward references for registry lookups. Consumers read and
//! subscribe through the slot and never care which of the three it holds.

use crate::engine::{Iris, Registry};
use crate::errors::{ConfigError, NodeError};
use crate::node::subscribers::{Subscriber, Subscribers};
use crate::node::{Pid, Value};
use crate::traits::Node;
use crate::utils::lock;
use serde::Deserialize;
use std::sync::{Arc, Mutex, RwLock};

/// Stored literal standing in for a node input.
///
/// Supports the same push-and-notify contract as a node, without flags: a
/// `set` always notifies subscribers.
pub struct Constant {
    state: Mutex<Value>,
    subscribers: Subscribers,
}

impl Constant {
    pub fn new(state: Value) -> Self {
        Self {
            state: Mutex::new(state),
            subscribers: Subscribers::default(),
        }
    }

    pub fn state(&self) -> Value {
        lock(&self.state).clone()
    }

    /// Store a new value and push it to every subscriber.
    pub fn set(&self, iris: &Iris, state: Value) -> usize {
        *lock(&self.state) = state.clone();
        // pid 0 marks an anonymous origin in diagnostics
        self.subscribers.notify(iris, 0, &state)
    }

    pub fn subscribe(&self, target: Subscriber) {
        self.subscribers.push(target);
    }

    pub fn unsubscribe(&self, target: &Subscriber) -> bool {
        self.subscribers.remove(target)
    }
}

#[derive(Clone)]
pub enum Input {
    Constant(Arc<Constant>),
    Forward(Pid),
    Node(Arc<dyn Node>),
}

/// How an input is written in node configuration: `{ ref: 12 }` or a literal.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum InputSpec {
    Reference {
        #[serde(rename = "ref")]
        pid: Pid,
    },
    Literal(Value),
}

pub struct InputSlot {
    field: &'static str,
    input: RwLock<Input>,
}

impl InputSlot {
    pub fn new(field: &'static str, input: Input) -> Self {
        Self {
            field,
            input: RwLock::new(input),
        }
    }

    pub fn constant(field: &'static str, value: impl Into<Value>) -> Self {
        Self::new(field, Input::Constant(Arc::new(Constant::new(value.into()))))
    }

    pub fn forward(field: &'static str, pid: Pid) -> Self {
        Self::new(field, Input::Forward(pid))
    }

    pub fn node(field: &'static str, node: Arc<dyn Node>) -> Self {
        Self::new(field, Input::Node(node))
    }

    pub fn from_spec(field: &'static str, spec: InputSpec) -> Self {
        match spec {
            InputSpec::Reference { pid } => Self::forward(field, pid),
            InputSpec::Literal(value) => Self::constant(field, value),
        }
    }

    pub fn field(&self) -> &'static str {
        self.field
    }

    pub fn get(&self) -> Input {
        self.input
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    /// The pid this slot still waits on, if it is an unresolved forward reference.
    pub fn pending(&self) -> Option<Pid> {
        match self.get() {
            Input::Forward(pid) => Some(pid),
            _ => None,
        }
    }

    /// Replace a forward reference with the registered node.
    ///
    /// Returns `Ok(true)` when the slot changed. Slots that already hold a
    /// constant or a node are left untouched and return `Ok(false)`, so running
    /// the resolver twice is harmless.
    pub fn resolve(&self, owner: Pid, registry: &Registry) -> Result<bool, ConfigError> {
        let mut input = self
            .input
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let pid = match &*input {
            Input::Forward(pid) => *pid,
            _ => return Ok(false),
        };
        let node = registry
            .get(pid)
            .ok_or(ConfigError::UnresolvedReference {
                owner,
                field: self.field,
                missing: pid,
            })?;
        *input = Input::Node(node);
        Ok(true)
    }

    /// The wired node, if this slot holds one.
    pub fn target(&self) -> Option<Arc<dyn Node>> {
        match self.get() {
            Input::Node(node) => Some(node),
            _ => None,
        }
    }

    /// Read the current value through the slot.
    pub fn state(&self) -> Result<Option<Value>, ConfigError> {
        match self.get() {
            Input::Constant(constant) => Ok(Some(constant.state())),
            Input::Node(node) => Ok(node.core().state()),
            Input::Forward(pid) => Err(ConfigError::NotWired {
                field: self.field,
                pid,
            }),
        }
    }

    /// Subscribe `target` to whatever this slot points at.
    pub fn subscribe(&self, target: Subscriber) -> Result<(), NodeError> {
        match self.get() {
            Input::Constant(constant) => constant.subscribe(target),
            Input::Node(node) => node.core().subscribe(target),
            Input::Forward(pid) => {
                return Err(ConfigError::NotWired {
                    field: self.field,
                    pid,
                }
                .into())
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_spec_parses_reference_and_literal() {
        let specs: Vec<InputSpec> = serde_yaml::from_str("[{ref: 12}, 3.5, hello]").unwrap();
        assert_eq!(specs[0], InputSpec::Reference { pid: 12 });
        assert_eq!(specs[1], InputSpec::Literal(Value::F64(3.5)));
        assert_eq!(specs[2], InputSpec::Literal(Value::Text("hello".into())));
    }

    #[test]
    fn test_unresolved_slot_refuses_reads() {
        let slot = InputSlot::forward("speed", 40);
        assert_eq!(slot.pending(), Some(40));
        match slot.state() {
            Err(ConfigError::NotWired { field, pid }) => {
                assert_eq!(field, "speed");
                assert_eq!(pid, 40);
            }
            other => panic!("Expected NotWired, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_constant_slot_reads_literal_and_ignores_resolution() {
        let registry = Registry::default();
        let slot = InputSlot::constant("offset", 7i64);
        assert!(!slot.resolve(1, &registry).unwrap());
        assert_eq!(slot.state().unwrap(), Some(Value::I64(7)));
    }

    #[test]
    fn test_resolving_missing_pid_names_owner_and_field() {
        let registry = Registry::default();
        let slot = InputSlot::forward("i2c", 99);
        match slot.resolve(5, &registry) {
            Err(ConfigError::UnresolvedReference {
                owner,
                field,
                missing,
            }) => {
                assert_eq!((owner, field, missing), (5, "i2c", 99));
            }
            other => panic!("Expected UnresolvedReference, got {:?}", other),
        }
        // slot is untouched on failure
        assert_eq!(slot.pending(), Some(99));
    }
}
