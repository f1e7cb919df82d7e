// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::Arc;
use std::time::Duration;

use crate::config::consts::ORDER_RECEIVER_PID;
use crate::config::RuntimeConfig;
use crate::errors::ConfigError;
use crate::node::kinds::{NodeFactory, OrderReceiver, Parameter};
use crate::node::{NodeSpec, Value, WireType};
use crate::protocol::{Header, MessageType, Route};
use crate::stub::{test_iris, RecordingObservers, TestHarness};
use crate::traits::Node;
use tokio_util::sync::CancellationToken;

/// Graph-level tests: configuration through wiring, dispatch and Bifrost.
#[cfg(test)]
mod tests {
    use super::*;

    const GRAPH: &str = r#"
nodes:
  - kind: Relay
    pid: 21
    name: feed_display
    wire_type: int64
    active: true
    bcast: true
    inputs:
      source: { ref: 20 }
  - kind: Parameter
    pid: 20
    name: feed_rate
    wire_type: int64
    active: true
    state: 100
"#;

    #[test]
    fn test_config_graph_wires_and_propagates() {
        let TestHarness { iris, bus, .. } = test_iris();
        let config: RuntimeConfig = serde_yaml::from_str(GRAPH).unwrap();

        NodeFactory::build_all(&iris, &config.nodes).unwrap();
        let summary = iris.wire().unwrap();
        assert_eq!((summary.nodes, summary.resolved), (2, 1));

        let feed_rate = iris.registry().by_name("feed_rate").unwrap();
        let display = iris.get(21).unwrap();
        // the relay adopted the parameter's value while wiring, silently
        assert_eq!(display.core().state(), Some(Value::I64(100)));
        assert!(bus.frames().is_empty());

        feed_rate.push(&iris, Value::I64(120)).unwrap();

        let frames = bus.frames();
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].pid, 21);
        assert_eq!(frames[0].adr, None);
        assert_eq!(frames[0].payload, 120i64.to_le_bytes().to_vec());

        // pid 20: active | has_subscribers, pid 21: active | send_to_bus
        let mut expected = b"myblobs".to_vec();
        expected.extend_from_slice(&[20, 0, 1 | 16, 21, 0, 1 | 2]);
        assert_eq!(iris.flag_map(), expected);
    }

    #[test]
    fn test_failed_wiring_can_be_retried_after_registering_the_target() {
        let TestHarness { iris, .. } = test_iris();
        let config: RuntimeConfig = serde_yaml::from_str(GRAPH).unwrap();
        // build only the relay; its source does not exist yet
        NodeFactory::build(&iris, &config.nodes[0]).unwrap();

        let error = iris.wire().unwrap_err();
        assert_eq!(error.errors.len(), 1);
        assert!(matches!(
            error.errors[0],
            ConfigError::UnresolvedReference {
                owner: 21,
                field: "source",
                missing: 20
            }
        ));
        assert!(!iris.is_wired());

        Parameter::new(&iris, NodeSpec::new(20, WireType::I64).active().with_state(7i64));
        let summary = iris.wire().unwrap();

        assert!(!summary.repeated);
        assert_eq!(iris.get(21).unwrap().core().state(), Some(Value::I64(7)));
    }

    #[tokio::test]
    async fn test_order_reaches_observers_through_relay_debug_line() {
        let TestHarness {
            iris, bus, bifrost, ..
        } = test_iris();
        let observers = Arc::new(RecordingObservers::new(true));
        bifrost.attach(observers.clone());

        let receiver = OrderReceiver::with_default_pid(&iris);
        let config: RuntimeConfig = serde_yaml::from_str(&format!(
            "nodes:\n  - kind: Relay\n    pid: 30\n    wire_type: utf8\n    active: true\n    debug: true\n    inputs:\n      source: {{ ref: {} }}\n",
            ORDER_RECEIVER_PID
        ))
        .unwrap();
        NodeFactory::build_all(&iris, &config.nodes).unwrap();
        iris.wire().unwrap();

        let header = Header {
            route: Route { adr: 4, pid: 77 },
            len: 10,
            message_type: MessageType::Utf8,
        };
        receiver
            .push(&iris, Value::Bytes(header.to_bytes().to_vec()))
            .unwrap();
        receiver
            .push(&iris, Value::Bytes(b"pick wafer".to_vec()))
            .unwrap();

        // one acknowledgement per frame, header included
        let acks = bus.frames();
        assert_eq!(acks.len(), 2);
        assert!(acks
            .iter()
            .all(|f| f.adr == Some(4) && f.pid == 77 && f.payload == vec![0x06]));
        assert_eq!(
            iris.get(30).unwrap().core().state(),
            Some(Value::Text("pick wafer".into()))
        );
        assert_eq!(bifrost.len(), 1);

        let token = CancellationToken::new();
        let drain = {
            let bifrost = bifrost.clone();
            let token = token.clone();
            tokio::spawn(async move { bifrost.drain(Duration::from_millis(1), token).await })
        };
        tokio::time::timeout(Duration::from_secs(2), async {
            while observers.frames().is_empty() {
                tokio::time::sleep(Duration::from_millis(1)).await;
            }
        })
        .await
        .unwrap();
        token.cancel();

        assert_eq!(drain.await.unwrap(), 1);
        assert_eq!(
            observers.frames(),
            vec!["term,DEBUG: pid: 30, state: pick wafer".to_string()]
        );
    }

    #[test]
    fn test_gui_descriptions_cover_named_parameters() {
        let TestHarness { iris, .. } = test_iris();
        let config: RuntimeConfig = serde_yaml::from_str(GRAPH).unwrap();
        NodeFactory::build_all(&iris, &config.nodes).unwrap();
        iris.wire().unwrap();

        let descriptions = iris.gui_descriptions();

        assert_eq!(descriptions.len(), 1);
        assert_eq!(descriptions[0]["name"], "feed_rate");
        assert_eq!(descriptions[0]["pid"], 20);
    }
}
