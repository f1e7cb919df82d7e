// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::engine::Iris;
use crate::node::{NodeCore, NodeSpec};
use crate::traits::Node;
use serde_json::json;
use std::sync::Arc;

/// Plain value node: stores what it is pushed and announces it.
pub struct Parameter {
    core: NodeCore,
}

impl Parameter {
    /// Construct and register.
    pub fn new(iris: &Iris, spec: NodeSpec) -> Arc<Self> {
        iris.register(Arc::new(Self::detached(spec)))
    }

    /// Construct without registering.
    pub fn detached(spec: NodeSpec) -> Self {
        Self {
            core: NodeCore::new(spec),
        }
    }
}

impl Node for Parameter {
    fn core(&self) -> &NodeCore {
        &self.core
    }

    fn kind(&self) -> &'static str {
        "Parameter"
    }

    /// Named parameters are shown in the remote UI.
    fn gui(&self) -> Option<serde_json::Value> {
        let name = self.core.name()?;
        Some(json!({
            "name": name,
            "pid": self.core.pid(),
            "state": self.core.state(),
            "type": self.core.wire_type().name(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{Value, WireType};
    use crate::stub::{test_iris, TestHarness};

    #[test]
    fn test_new_registers_under_pid_and_name() {
        let TestHarness { iris, .. } = test_iris();
        let node = Parameter::new(&iris, NodeSpec::new(9, WireType::Bool).named("vacuum"));

        let by_pid = iris.get(9).unwrap();
        let by_name = iris.registry().by_name("vacuum").unwrap();
        assert_eq!(by_pid.kind(), "Parameter");
        assert!(std::ptr::addr_eq(Arc::as_ptr(&by_name), Arc::as_ptr(&node)));
    }

    #[test]
    fn test_push_stores_state() {
        let TestHarness { iris, .. } = test_iris();
        let node = Parameter::new(&iris, NodeSpec::new(9, WireType::Bool));

        node.push(&iris, Value::Bool(true)).unwrap();

        assert_eq!(node.core().state(), Some(Value::Bool(true)));
        assert_eq!(node.gui(), None);
    }

    #[test]
    fn test_gui_description_of_named_parameter() {
        let node = Parameter::detached(
            NodeSpec::new(3, WireType::Utf8)
                .named("label")
                .with_state("tray A"),
        );

        assert_eq!(
            node.gui(),
            Some(json!({"name": "label", "pid": 3, "state": "tray A", "type": "utf8"}))
        );
    }
}
