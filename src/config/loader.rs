// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::consts::{
    DEFAULT_BUS_CHANNEL_CAPACITY, DEFAULT_HANDSHAKE_TIMEOUT_MS, DEFAULT_MAX_RETRIES,
    DEFAULT_POLL_INTERVAL_MS, DEFAULT_QUEUE_CAPACITY, DEFAULT_REPLY_TIMEOUT_MS,
};
use crate::errors::ConfigError;
use crate::node::{InputSpec, Pid, Value, WireType};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Main configuration structure for the runtime.
///
/// Every section is optional; missing values fall back to the defaults in
/// [`crate::config::consts`].
///
/// # Example
/// ```yaml
/// bifrost:
///   queue_capacity: 512
///   overflow_policy: drop_oldest
///   poll_interval_ms: 10
/// transfer:
///   reply_timeout_ms: 1000
///   max_retries: 10
/// bus:
///   channel_capacity: 64
/// nodes:
///   - kind: Parameter
///     pid: 10
///     name: feed_rate
///     wire_type: int64
///     active: true
///     state: 10
///   - kind: Relay
///     pid: 11
///     wire_type: int64
///     inputs:
///       source: { ref: 10 }
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct RuntimeConfig {
    #[serde(default)]
    pub bifrost: BifrostConfig,
    #[serde(default)]
    pub transfer: TransferConfig,
    #[serde(default)]
    pub bus: BusConfig,
    #[serde(default)]
    pub nodes: Vec<NodeConfig>,
}

/// What the Bifrost queue does when a frame arrives and it is full.
#[derive(Debug, Default, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "snake_case")]
pub enum OverflowPolicy {
    /// Discard the oldest queued frame to make room.
    #[default]
    DropOldest,
    /// Discard the incoming frame.
    DropNewest,
}

impl OverflowPolicy {
    pub fn name(self) -> &'static str {
        match self {
            OverflowPolicy::DropOldest => "drop_oldest",
            OverflowPolicy::DropNewest => "drop_newest",
        }
    }
}

#[derive(Debug, Default, Deserialize, Clone)]
pub struct BifrostConfig {
    pub queue_capacity: Option<usize>,
    #[serde(default)]
    pub overflow_policy: OverflowPolicy,
    pub poll_interval_ms: Option<u64>,
}

impl BifrostConfig {
    /// Queue capacity, never less than one frame.
    pub fn get_queue_capacity(&self) -> usize {
        self.queue_capacity.unwrap_or(DEFAULT_QUEUE_CAPACITY).max(1)
    }

    pub fn get_poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.unwrap_or(DEFAULT_POLL_INTERVAL_MS).max(1))
    }
}

/// Timeouts and retry limits for stop-and-wait block transfers.
#[derive(Debug, Default, Deserialize, Clone)]
pub struct TransferConfig {
    pub reply_timeout_ms: Option<u64>,
    pub max_retries: Option<u32>,
    pub handshake_timeout_ms: Option<u64>,
}

impl TransferConfig {
    pub fn get_reply_timeout(&self) -> Duration {
        Duration::from_millis(self.reply_timeout_ms.unwrap_or(DEFAULT_REPLY_TIMEOUT_MS))
    }

    /// Retransmissions allowed per block; the first send is not counted.
    pub fn get_max_retries(&self) -> u32 {
        self.max_retries.unwrap_or(DEFAULT_MAX_RETRIES)
    }

    pub fn get_handshake_timeout(&self) -> Duration {
        Duration::from_millis(
            self.handshake_timeout_ms
                .unwrap_or(DEFAULT_HANDSHAKE_TIMEOUT_MS),
        )
    }
}

#[derive(Debug, Default, Deserialize, Clone)]
pub struct BusConfig {
    pub channel_capacity: Option<usize>,
}

impl BusConfig {
    pub fn get_channel_capacity(&self) -> usize {
        self.channel_capacity
            .unwrap_or(DEFAULT_BUS_CHANNEL_CAPACITY)
            .max(1)
    }
}

/// Declarative description of one node.
///
/// Inputs map a field name to either a literal or `{ ref: <pid> }`; which
/// fields a kind reads is up to the kind.
#[derive(Debug, Deserialize, Clone)]
pub struct NodeConfig {
    pub kind: String,
    pub pid: Pid,
    pub name: Option<String>,
    #[serde(alias = "type")]
    pub wire_type: WireType,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub debug: bool,
    #[serde(default)]
    pub bcast: bool,
    pub state: Option<Value>,
    #[serde(default)]
    pub inputs: BTreeMap<String, InputSpec>,
}

/// Load a config from a YAML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<RuntimeConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let cfg: RuntimeConfig = serde_yaml::from_str(&content)?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parse_empty_config_uses_defaults() {
        let cfg: RuntimeConfig = serde_yaml::from_str("{}").unwrap();

        assert_eq!(cfg.bifrost.get_queue_capacity(), 256);
        assert_eq!(cfg.bifrost.overflow_policy, OverflowPolicy::DropOldest);
        assert_eq!(cfg.bifrost.get_poll_interval(), Duration::from_millis(10));
        assert_eq!(cfg.transfer.get_reply_timeout(), Duration::from_secs(1));
        assert_eq!(cfg.transfer.get_max_retries(), 10);
        assert_eq!(cfg.transfer.get_handshake_timeout(), Duration::from_secs(60));
        assert_eq!(cfg.bus.get_channel_capacity(), 64);
        assert!(cfg.nodes.is_empty());
    }

    #[test]
    fn parse_sections_and_nodes() {
        let yaml = r#"
bifrost:
  queue_capacity: 0
  overflow_policy: drop_newest
transfer:
  max_retries: 3
nodes:
  - kind: Parameter
    pid: 10
    name: feed_rate
    wire_type: unint16
    active: true
    state: 10
  - kind: Relay
    pid: 11
    type: int64
    inputs:
      source: { ref: 10 }
      gain: 2
"#;

        let cfg: RuntimeConfig = serde_yaml::from_str(yaml).unwrap();

        // zero capacity is clamped to one frame
        assert_eq!(cfg.bifrost.get_queue_capacity(), 1);
        assert_eq!(cfg.bifrost.overflow_policy, OverflowPolicy::DropNewest);
        assert_eq!(cfg.transfer.get_max_retries(), 3);
        assert_eq!(cfg.nodes.len(), 2);

        let parameter = &cfg.nodes[0];
        assert_eq!(parameter.wire_type, WireType::U16);
        assert_eq!(parameter.state, Some(Value::I64(10)));
        assert!(parameter.active && !parameter.bcast);

        let relay = &cfg.nodes[1];
        assert_eq!(relay.wire_type, WireType::I64);
        assert_eq!(relay.inputs["source"], InputSpec::Reference { pid: 10 });
        assert_eq!(relay.inputs["gain"], InputSpec::Literal(Value::I64(2)));
    }

    #[test]
    fn test_load_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "bus:\n  channel_capacity: 8").unwrap();

        let cfg = load_config(file.path()).unwrap();

        assert_eq!(cfg.bus.get_channel_capacity(), 8);
    }

    #[test]
    fn test_load_config_errors_table_driven() {
        struct TestCase {
            name: &'static str,
            content: Option<&'static str>,
            expect_parse_error: bool,
        }

        let test_cases = vec![
            TestCase {
                name: "missing file",
                content: None,
                expect_parse_error: false,
            },
            TestCase {
                name: "unknown overflow policy",
                content: Some("bifrost:\n  overflow_policy: block\n"),
                expect_parse_error: true,
            },
            TestCase {
                name: "unknown wire type",
                content: Some("nodes:\n  - kind: Parameter\n    pid: 1\n    wire_type: quaternion\n"),
                expect_parse_error: true,
            },
        ];

        for test_case in test_cases {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("floe.yaml");
            if let Some(content) = test_case.content {
                std::fs::write(&path, content).unwrap();
            }

            match load_config(&path) {
                Err(ConfigError::Parse(_)) => assert!(
                    test_case.expect_parse_error,
                    "Test case '{}': unexpected parse error",
                    test_case.name
                ),
                Err(ConfigError::Io(_)) => assert!(
                    !test_case.expect_parse_error,
                    "Test case '{}': unexpected io error",
                    test_case.name
                ),
                other => panic!("Test case '{}': expected an error, got {:?}", test_case.name, other),
            }
        }
    }
}
