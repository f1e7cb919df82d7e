// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for node registration and graph wiring.

use crate::node::Pid;
use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// A node was added to the registry.
///
/// # Log Level
/// `debug!` - Construction detail
pub struct NodeRegistered<'a> {
    pub pid: Pid,
    pub kind: &'a str,
    pub name: Option<&'a str>,
}

impl Display for NodeRegistered<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self.name {
            Some(name) => write!(f, "Registered {} node {} as '{}'", self.kind, self.pid, name),
            None => write!(f, "Registered {} node {}", self.kind, self.pid),
        }
    }
}

impl StructuredLog for NodeRegistered<'_> {
    fn log(&self) {
        tracing::debug!(
            pid = self.pid,
            kind = self.kind,
            name = self.name,
            "{}", self
        );
    }
}

/// A pid was registered a second time and the earlier node was replaced.
///
/// # Log Level
/// `error!` - Configuration error; wiring will refuse this graph
///
/// # Example
/// ```
/// use floe_iris::observability::messages::registry::DuplicatePidRegistered;
///
/// let msg = DuplicatePidRegistered { pid: 12 };
/// assert_eq!(msg.to_string(), "Pid 12 registered twice; the earlier node was replaced");
/// ```
pub struct DuplicatePidRegistered {
    pub pid: Pid,
}

impl Display for DuplicatePidRegistered {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Pid {} registered twice; the earlier node was replaced", self.pid)
    }
}

impl StructuredLog for DuplicatePidRegistered {
    fn log(&self) {
        tracing::error!(pid = self.pid, "{}", self);
    }
}

/// Wiring pass finished and every forward reference is resolved.
///
/// # Log Level
/// `info!` - Startup milestone
pub struct WiringCompleted {
    pub nodes: usize,
    pub resolved: usize,
}

impl Display for WiringCompleted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Graph wired: {} nodes, {} forward references resolved",
            self.nodes, self.resolved
        )
    }
}

impl StructuredLog for WiringCompleted {
    fn log(&self) {
        tracing::info!(nodes = self.nodes, resolved = self.resolved, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "wiring",
            span_name = name,
            nodes = self.nodes,
            resolved = self.resolved,
        )
    }
}

/// Wiring pass refused the graph.
///
/// # Log Level
/// `error!` - Startup halts
pub struct WiringRejected {
    pub error_count: usize,
}

impl Display for WiringRejected {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Graph wiring rejected with {} error(s)", self.error_count)
    }
}

impl StructuredLog for WiringRejected {
    fn log(&self) {
        tracing::error!(error_count = self.error_count, "{}", self);
    }
}

/// Wiring was requested again on an already wired graph.
pub struct WiringRepeated;

impl Display for WiringRepeated {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Graph already wired; ignoring repeated wiring request")
    }
}

impl StructuredLog for WiringRepeated {
    fn log(&self) {
        tracing::warn!("{}", self);
    }
}

/// A node was built from declarative configuration.
///
/// # Log Level
/// `debug!` - Construction detail
pub struct NodeConfigured<'a> {
    pub pid: Pid,
    pub kind: &'a str,
    pub inputs: usize,
}

impl Display for NodeConfigured<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Built {} node {} from configuration with {} input(s)",
            self.kind, self.pid, self.inputs
        )
    }
}

impl StructuredLog for NodeConfigured<'_> {
    fn log(&self) {
        tracing::debug!(
            pid = self.pid,
            kind = self.kind,
            inputs = self.inputs,
            "{}", self
        );
    }
}
