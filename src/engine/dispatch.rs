// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Reactive dispatch: what happens when a node announces a new value.
//!
//! [`announce`] is the only place value-change side effects originate. Each
//! effect is gated by one capability flag, and all of them by Active:
//!
//! ```text
//! announce(node)
//!   ├─ !Active          → nothing
//!   ├─ SendToBus        → bus.send(dest, encode(state, wire_type), cmd)
//!   ├─ DebugSerial      → bifrost.post("DEBUG: pid: …, state: …")
//!   └─ HasSubscribers   → each subscriber, in order, synchronously
//! ```
//!
//! Fan-out is depth-first: a subscriber that re-announces runs its own
//! subscribers before the next sibling is notified. Nothing here detects
//! cycles; a cyclic subscription graph recurses until the stack overflows,
//! so graphs must be wired acyclic.

use crate::engine::Iris;
use crate::node::{encode, NodeCore, Pid};
use crate::observability::messages::dispatch::{BusSendFailed, EncodeFailed};
use crate::observability::messages::StructuredLog;
use crate::traits::BusFrame;

/// Route of a bus frame: optional device address plus target pid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Destination {
    pub adr: Option<u8>,
    pub pid: Pid,
}

/// Per-call overrides for an announcement. Defaults route to the node's own
/// pid with command 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Announce {
    pub destination: Option<Destination>,
    pub cmd: Option<u8>,
}

impl Announce {
    pub fn to(destination: Destination) -> Self {
        Self {
            destination: Some(destination),
            cmd: None,
        }
    }

    pub fn with_cmd(mut self, cmd: u8) -> Self {
        self.cmd = Some(cmd);
        self
    }
}

/// What an announcement actually did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Dispatched {
    pub bus_sent: bool,
    pub debug_posted: bool,
    pub notified: usize,
    pub failures: usize,
}

pub fn announce(iris: &Iris, node: &NodeCore, overrides: Announce) -> Dispatched {
    let mut dispatched = Dispatched::default();
    let flags = node.flags();
    if !flags.active {
        return dispatched;
    }

    let pid = node.pid();
    let state = node.state();

    if flags.send_to_bus {
        if let Some(state) = &state {
            match encode(state, node.wire_type()) {
                Ok(payload) => {
                    let destination = overrides.destination.unwrap_or(Destination { adr: None, pid });
                    let frame = BusFrame {
                        adr: destination.adr,
                        pid: destination.pid,
                        cmd: overrides.cmd.unwrap_or(0),
                        payload,
                    };
                    match iris.bus().send(frame) {
                        Ok(()) => dispatched.bus_sent = true,
                        Err(error) => BusSendFailed { pid, error: &error }.log(),
                    }
                }
                Err(error) => EncodeFailed {
                    pid,
                    wire_type: node.wire_type(),
                    error: &error,
                }
                .log(),
            }
        }
    }

    if flags.debug_serial {
        let shown = state
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_else(|| "None".to_string());
        iris.bifrost().post(format!("DEBUG: pid: {}, state: {}", pid, shown));
        dispatched.debug_posted = true;
    }

    if flags.has_subscribers {
        if let Some(state) = &state {
            dispatched.notified = node.subscribers().len();
            dispatched.failures = node.subscribers().notify(iris, pid, state);
        }
    }

    dispatched
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::NodeError;
    use crate::node::kinds::Parameter;
    use crate::node::{NodeSpec, Subscriber, Value, WireType};
    use crate::stub::{test_iris, TestHarness};
    use crate::traits::Node;
    use std::sync::{Arc, Mutex};

    fn recorder(log: &Arc<Mutex<Vec<String>>>, label: &'static str) -> Subscriber {
        let log = log.clone();
        Subscriber::callback(move |_iris, state: &Value| {
            log.lock().unwrap().push(format!("{}:{}", label, state));
            Ok(())
        })
    }

    #[test]
    fn test_inactive_node_has_no_effects() {
        let TestHarness { iris, bus, sink, .. } = test_iris();
        let node = Parameter::new(&iris, NodeSpec::new(1, WireType::I64).bcast().debug().with_state(5i64));
        let calls = Arc::new(Mutex::new(Vec::new()));
        node.core().subscribe(recorder(&calls, "s1"));

        let dispatched = announce(&iris, node.core(), Announce::default());

        assert_eq!(dispatched, Dispatched::default());
        assert!(bus.frames().is_empty());
        assert!(sink.lines().is_empty());
        assert!(iris.bifrost().is_empty());
        assert!(calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_send_to_bus_encodes_with_wire_type() {
        let TestHarness { iris, bus, .. } = test_iris();
        let node = Parameter::new(&iris, NodeSpec::new(12, WireType::U16).active().bcast());

        node.push(&iris, Value::U16(0x0102)).unwrap();

        assert_eq!(
            bus.frames(),
            vec![BusFrame {
                adr: None,
                pid: 12,
                cmd: 0,
                payload: vec![0x02, 0x01],
            }]
        );
    }

    #[test]
    fn test_overrides_change_destination_and_command() {
        let TestHarness { iris, bus, .. } = test_iris();
        let node = Parameter::new(&iris, NodeSpec::new(12, WireType::Bool).active().bcast().with_state(true));

        let overrides = Announce::to(Destination { adr: Some(3), pid: 700 }).with_cmd(9);
        let dispatched = announce(&iris, node.core(), overrides);

        assert!(dispatched.bus_sent);
        let frame = &bus.frames()[0];
        assert_eq!((frame.adr, frame.pid, frame.cmd), (Some(3), 700, 9));
        assert_eq!(frame.payload, vec![0x01]);
    }

    #[test]
    fn test_encode_failure_skips_bus_but_keeps_other_effects() {
        let TestHarness { iris, bus, sink, .. } = test_iris();
        let node = Parameter::new(&iris, NodeSpec::new(2, WireType::U8).active().bcast().debug());

        node.push(&iris, Value::Text("not a byte".into())).unwrap();

        assert!(bus.frames().is_empty());
        assert_eq!(sink.lines(), vec!["DEBUG: pid: 2, state: not a byte".to_string()]);
    }

    #[test]
    fn test_debug_line_goes_to_local_log_when_disconnected() {
        let TestHarness { iris, sink, .. } = test_iris();
        let node = Parameter::new(&iris, NodeSpec::new(44, WireType::I64).active().debug());

        node.push(&iris, Value::I64(-3)).unwrap();

        assert_eq!(sink.lines(), vec!["DEBUG: pid: 44, state: -3".to_string()]);
        assert!(iris.bifrost().is_empty());
    }

    #[test]
    fn test_subscribers_run_in_registration_order_with_current_state() {
        let TestHarness { iris, .. } = test_iris();
        let node = Parameter::new(&iris, NodeSpec::new(1, WireType::I64).active());
        let calls = Arc::new(Mutex::new(Vec::new()));
        for label in ["s1", "s2", "s3"] {
            node.core().subscribe(recorder(&calls, label));
        }

        node.push(&iris, Value::I64(42)).unwrap();

        assert_eq!(*calls.lock().unwrap(), vec!["s1:42", "s2:42", "s3:42"]);
    }

    #[test]
    fn test_failing_subscriber_does_not_stop_the_rest() {
        let TestHarness { iris, .. } = test_iris();
        let node = Parameter::new(&iris, NodeSpec::new(1, WireType::I64).active().with_state(1i64));
        let calls = Arc::new(Mutex::new(Vec::new()));
        node.core().subscribe(recorder(&calls, "before"));
        node.core().subscribe(Subscriber::callback(|_iris, _state: &Value| {
            Err(NodeError::Callback("motor driver offline".into()))
        }));
        node.core().subscribe(recorder(&calls, "after"));

        let dispatched = announce(&iris, node.core(), Announce::default());

        assert_eq!(dispatched.notified, 3);
        assert_eq!(dispatched.failures, 1);
        assert_eq!(*calls.lock().unwrap(), vec!["before:1", "after:1"]);
    }

    #[test]
    fn test_panicking_subscriber_is_isolated() {
        let TestHarness { iris, .. } = test_iris();
        let node = Parameter::new(&iris, NodeSpec::new(1, WireType::I64).active().with_state(5i64));
        let calls = Arc::new(Mutex::new(Vec::new()));
        node.core().subscribe(recorder(&calls, "before"));
        node.core().subscribe(Subscriber::callback(|_iris, _state: &Value| {
            panic!("encoder lost sync");
        }));
        node.core().subscribe(recorder(&calls, "after"));

        let dispatched = announce(&iris, node.core(), Announce::default());

        assert_eq!(dispatched.notified, 3);
        assert_eq!(dispatched.failures, 1);
        assert_eq!(*calls.lock().unwrap(), vec!["before:5", "after:5"]);
    }

    #[test]
    fn test_has_subscribers_tracks_emptiness() {
        let TestHarness { iris, .. } = test_iris();
        let node = Parameter::new(&iris, NodeSpec::new(1, WireType::I64).active());
        let calls = Arc::new(Mutex::new(Vec::new()));
        let s1 = recorder(&calls, "s1");
        let s2 = recorder(&calls, "s2");

        node.core().subscribe(s1.clone());
        assert!(node.core().flags().has_subscribers);
        assert!(node.core().unsubscribe(&s1));
        assert!(!node.core().flags().has_subscribers);

        node.core().subscribe(s2.clone());
        assert!(node.core().flags().has_subscribers);
        assert!(node.core().unsubscribe(&s2));
        assert!(!node.core().flags().has_subscribers);

        // removing something that is not subscribed leaves the flag alone
        node.core().subscribe(s1.clone());
        assert!(!node.core().unsubscribe(&s2));
        assert!(node.core().flags().has_subscribers);
    }

    #[test]
    fn test_fan_out_is_depth_first() {
        let TestHarness { iris, .. } = test_iris();
        let root = Parameter::new(&iris, NodeSpec::new(1, WireType::I64).active());
        let child = Parameter::new(&iris, NodeSpec::new(2, WireType::I64).active());
        let calls = Arc::new(Mutex::new(Vec::new()));

        child.core().subscribe(recorder(&calls, "grandchild"));
        root.core().subscribe(Subscriber::node(child.clone()));
        root.core().subscribe(recorder(&calls, "sibling"));

        root.push(&iris, Value::I64(7)).unwrap();

        assert_eq!(*calls.lock().unwrap(), vec!["grandchild:7", "sibling:7"]);
        assert_eq!(child.core().state(), Some(Value::I64(7)));
    }
}
