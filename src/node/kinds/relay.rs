// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::engine::Iris;
use crate::errors::ConfigError;
use crate::node::{InputSlot, NodeCore, NodeSpec, Subscriber};
use crate::traits::Node;
use std::sync::Arc;

/// Mirrors the value of its `source` input.
///
/// Subscribes to the source while the graph is wired and adopts the source's
/// current value at that point without announcing it.
pub struct Relay {
    core: NodeCore,
    source: InputSlot,
}

impl Relay {
    pub fn new(iris: &Iris, spec: NodeSpec, source: InputSlot) -> Arc<Self> {
        iris.register(Arc::new(Self {
            core: NodeCore::new(spec),
            source,
        }))
    }

    pub fn source(&self) -> &InputSlot {
        &self.source
    }
}

impl Node for Relay {
    fn core(&self) -> &NodeCore {
        &self.core
    }

    fn kind(&self) -> &'static str {
        "Relay"
    }

    fn inputs(&self) -> Vec<&InputSlot> {
        vec![&self.source]
    }

    fn on_wired(&self, iris: &Iris) -> Result<(), ConfigError> {
        let pid = self.core.pid();
        let me = iris.get(pid).ok_or_else(|| ConfigError::HookFailed {
            pid,
            reason: "relay is not registered".to_string(),
        })?;
        self.source
            .subscribe(Subscriber::node(me))
            .map_err(|error| ConfigError::HookFailed {
                pid,
                reason: error.to_string(),
            })?;
        if let Some(state) = self.source.state()? {
            self.core.set_state(state);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::kinds::Parameter;
    use crate::node::{Value, WireType};
    use crate::stub::{test_iris, TestHarness};

    #[test]
    fn test_relay_follows_wired_source() {
        let TestHarness { iris, bus, .. } = test_iris();
        let source = Parameter::new(&iris, NodeSpec::new(1, WireType::I64).active().with_state(10i64));
        let relay = Relay::new(
            &iris,
            NodeSpec::new(2, WireType::I64).active().bcast(),
            InputSlot::forward("source", 1),
        );
        iris.wire().unwrap();
        assert_eq!(relay.core().state(), Some(Value::I64(10)));
        assert!(source.core().flags().has_subscribers);

        source.push(&iris, Value::I64(11)).unwrap();

        assert_eq!(relay.core().state(), Some(Value::I64(11)));
        let frames = bus.frames();
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].pid, 2);
        assert_eq!(frames[0].payload, 11i64.to_le_bytes().to_vec());
    }

    #[test]
    fn test_relay_over_constant_follows_set() {
        let TestHarness { iris, .. } = test_iris();
        let relay = Relay::new(
            &iris,
            NodeSpec::new(2, WireType::Utf8).active(),
            InputSlot::constant("source", "idle"),
        );
        iris.wire().unwrap();
        assert_eq!(relay.core().state(), Some(Value::Text("idle".into())));

        let crate::node::Input::Constant(constant) = relay.source().get() else {
            panic!("Expected a constant input");
        };
        assert_eq!(constant.set(&iris, Value::Text("busy".into())), 0);

        assert_eq!(relay.core().state(), Some(Value::Text("busy".into())));
    }
}
