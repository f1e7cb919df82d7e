// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::NodeConfig;
use crate::engine::Iris;
use crate::errors::ConfigError;
use crate::node::kinds::{OrderReceiver, Parameter, Relay};
use crate::node::{InputSlot, NodeSpec, WireType};
use crate::observability::messages::registry::NodeConfigured;
use crate::observability::messages::StructuredLog;
use crate::traits::Node;
use std::sync::Arc;

/// Builds and registers nodes from their declarative configuration.
pub struct NodeFactory;

impl NodeFactory {
    /// Construct one node and register it with `iris`.
    ///
    /// Inputs are kept as forward references; call [`Iris::wire`] once every
    /// node is built.
    pub fn build(iris: &Iris, config: &NodeConfig) -> Result<Arc<dyn Node>, ConfigError> {
        let spec = Self::spec(config)?;
        let node: Arc<dyn Node> = match config.kind.as_str() {
            "Parameter" => {
                Self::allow_inputs(config, &[])?;
                Parameter::new(iris, spec)
            }
            "Relay" => {
                Self::allow_inputs(config, &["source"])?;
                let source = config.inputs.get("source").cloned().ok_or_else(|| {
                    ConfigError::InvalidNode {
                        pid: config.pid,
                        reason: "Relay requires a 'source' input".to_string(),
                    }
                })?;
                Relay::new(iris, spec, InputSlot::from_spec("source", source))
            }
            "OrderReceiver" => {
                Self::allow_inputs(config, &[])?;
                if config.wire_type != WireType::Bytes {
                    return Err(ConfigError::InvalidNode {
                        pid: config.pid,
                        reason: format!("OrderReceiver carries bytes, not '{}'", config.wire_type),
                    });
                }
                if config.bcast {
                    return Err(ConfigError::InvalidNode {
                        pid: config.pid,
                        reason: "OrderReceiver does not broadcast decoded orders".to_string(),
                    });
                }
                OrderReceiver::new(iris, spec)
            }
            other => return Err(ConfigError::UnknownKind(other.to_string())),
        };

        NodeConfigured {
            pid: node.pid(),
            kind: node.kind(),
            inputs: node.inputs().len(),
        }
        .log();
        Ok(node)
    }

    /// Build every configured node, stopping at the first invalid one.
    pub fn build_all(iris: &Iris, configs: &[NodeConfig]) -> Result<Vec<Arc<dyn Node>>, ConfigError> {
        configs.iter().map(|config| Self::build(iris, config)).collect()
    }

    fn spec(config: &NodeConfig) -> Result<NodeSpec, ConfigError> {
        let state = config
            .state
            .clone()
            .map(|state| state.coerce(config.wire_type))
            .transpose()
            .map_err(|error| ConfigError::InvalidNode {
                pid: config.pid,
                reason: error.to_string(),
            })?;
        Ok(NodeSpec {
            pid: config.pid,
            wire_type: config.wire_type,
            name: config.name.clone(),
            active: config.active,
            debug: config.debug,
            bcast: config.bcast,
            state,
        })
    }

    fn allow_inputs(config: &NodeConfig, known: &[&str]) -> Result<(), ConfigError> {
        match config.inputs.keys().find(|field| !known.contains(&field.as_str())) {
            Some(field) => Err(ConfigError::InvalidNode {
                pid: config.pid,
                reason: format!("{} has no input '{}'", config.kind, field),
            }),
            None => Ok(()),
        }
    }
}
