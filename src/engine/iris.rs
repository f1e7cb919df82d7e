// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The explicit runtime context handed to every node.
//!
//! `Iris` owns the node registry, the bus transport and the Bifrost bridge.
//! Nodes register into it while they are constructed, and [`Iris::wire`]
//! runs the second construction phase once every node exists.
//!
//! # Two-phase construction
//!
//! ```text
//! phase 1: construct            phase 2: wire (exactly once)
//! ┌──────────────┐              ┌─────────────────────────────────────┐
//! │ A(pid 10)    │──register──▶ │ check: duplicates, missing pids     │
//! │ B(src=➝10)   │──register──▶ │ resolve: ➝10 becomes &A             │
//! └──────────────┘              │ hooks: B.on_wired() subscribes to A │
//!                               └─────────────────────────────────────┘
//! ```
//!
//! The check runs over the whole graph before any slot is touched, so a
//! missing or duplicate pid leaves no partially wired nodes behind. A hook
//! that refuses after resolution marks the context failed for good.

use crate::bifrost::Bifrost;
use crate::engine::Registry;
use crate::errors::{ConfigError, WiringError};
use crate::node::Pid;
use crate::observability::messages::registry::{WiringCompleted, WiringRejected, WiringRepeated};
use crate::observability::messages::StructuredLog;
use crate::traits::{BusTransport, Node};
use crate::utils::lock;
use std::sync::{Arc, Mutex};

/// Outcome of a successful wiring pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WiringSummary {
    pub nodes: usize,
    pub resolved: usize,
    /// True when the graph had already been wired and nothing was done.
    pub repeated: bool,
}

pub struct Iris {
    registry: Registry,
    bus: Arc<dyn BusTransport>,
    bifrost: Arc<Bifrost>,
    wiring: Mutex<Wiring>,
}

/// Progress of the one-time wiring pass.
enum Wiring {
    Pending,
    InProgress,
    Wired,
    /// Resolution or a hook failed after the graph was touched; kept so
    /// every later attempt reports the same causes.
    Failed(Vec<(Pid, String)>),
}

impl Iris {
    pub fn new(bus: Arc<dyn BusTransport>, bifrost: Arc<Bifrost>) -> Self {
        Self {
            registry: Registry::default(),
            bus,
            bifrost,
            wiring: Mutex::new(Wiring::Pending),
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn bus(&self) -> &dyn BusTransport {
        self.bus.as_ref()
    }

    pub fn bifrost(&self) -> &Arc<Bifrost> {
        &self.bifrost
    }

    /// Register a freshly constructed node and hand it back.
    pub fn register<N: Node + 'static>(&self, node: Arc<N>) -> Arc<N> {
        self.registry.register(node.pid(), node.clone());
        node
    }

    pub fn get(&self, pid: Pid) -> Option<Arc<dyn Node>> {
        self.registry.get(pid)
    }

    /// True once a wiring pass has completed with every hook accepted.
    pub fn is_wired(&self) -> bool {
        matches!(*lock(&self.wiring), Wiring::Wired)
    }

    /// Resolve every forward reference and run each node's wiring hook.
    ///
    /// A graph that fails the up-front check is left untouched and may be
    /// wired again once fixed. Once resolution has begun the outcome is
    /// final: a successful pass makes later calls return a summary with
    /// `repeated` set, and a failed one makes them return the same error.
    pub fn wire(&self) -> Result<WiringSummary, WiringError> {
        {
            let mut wiring = lock(&self.wiring);
            match &*wiring {
                Wiring::Pending => {}
                Wiring::Failed(causes) => {
                    let error = replay(causes);
                    drop(wiring);
                    WiringRejected {
                        error_count: error.errors.len(),
                    }
                    .log();
                    return Err(error);
                }
                Wiring::InProgress | Wiring::Wired => {
                    drop(wiring);
                    WiringRepeated.log();
                    return Ok(WiringSummary {
                        nodes: self.registry.len(),
                        resolved: 0,
                        repeated: true,
                    });
                }
            }
            *wiring = Wiring::InProgress;
        }

        let nodes = self.registry.nodes();
        let errors = self.check(&nodes);
        if !errors.is_empty() {
            *lock(&self.wiring) = Wiring::Pending;
            WiringRejected {
                error_count: errors.len(),
            }
            .log();
            return Err(WiringError { errors });
        }

        let mut resolved = 0;
        let mut failures: Vec<(Pid, String)> = Vec::new();
        for node in &nodes {
            for slot in node.inputs() {
                match slot.resolve(node.pid(), &self.registry) {
                    Ok(true) => resolved += 1,
                    Ok(false) => {}
                    Err(error) => failures.push((node.pid(), error.to_string())),
                }
            }
        }
        if failures.is_empty() {
            for node in &nodes {
                if let Err(error) = node.on_wired(self) {
                    failures.push((node.pid(), hook_reason(error)));
                }
            }
        }

        if !failures.is_empty() {
            let error = replay(&failures);
            *lock(&self.wiring) = Wiring::Failed(failures);
            WiringRejected {
                error_count: error.errors.len(),
            }
            .log();
            return Err(error);
        }
        *lock(&self.wiring) = Wiring::Wired;

        let summary = WiringSummary {
            nodes: nodes.len(),
            resolved,
            repeated: false,
        };
        WiringCompleted {
            nodes: summary.nodes,
            resolved: summary.resolved,
        }
        .log();
        Ok(summary)
    }

    fn check(&self, nodes: &[Arc<dyn Node>]) -> Vec<ConfigError> {
        let mut errors: Vec<ConfigError> = self
            .registry
            .duplicates()
            .into_iter()
            .map(|pid| ConfigError::DuplicatePid { pid })
            .collect();

        for node in nodes {
            for slot in node.inputs() {
                if let Some(missing) = slot.pending() {
                    if !self.registry.contains(missing) {
                        errors.push(ConfigError::UnresolvedReference {
                            owner: node.pid(),
                            field: slot.field(),
                            missing,
                        });
                    }
                }
            }
        }
        errors
    }

    /// Diagnostic blob of every node's packed flags.
    ///
    /// Layout: `b"myblobs"`, then per node (ascending pid) the pid as u16 LE
    /// followed by the flag byte.
    pub fn flag_map(&self) -> Vec<u8> {
        let nodes = self.registry.nodes();
        let mut blob = Vec::with_capacity(7 + nodes.len() * 3);
        blob.extend_from_slice(b"myblobs");
        for node in nodes {
            blob.extend_from_slice(&node.pid().to_le_bytes());
            blob.push(node.core().flags().to_byte());
        }
        blob
    }

    /// UI descriptions of every node that provides one, ascending pid.
    pub fn gui_descriptions(&self) -> Vec<serde_json::Value> {
        self.registry
            .nodes()
            .iter()
            .filter_map(|node| node.gui())
            .collect()
    }
}

fn hook_reason(error: ConfigError) -> String {
    match error {
        ConfigError::HookFailed { reason, .. } => reason,
        other => other.to_string(),
    }
}

fn replay(causes: &[(Pid, String)]) -> WiringError {
    WiringError {
        errors: causes
            .iter()
            .map(|(pid, reason)| ConfigError::HookFailed {
                pid: *pid,
                reason: reason.clone(),
            })
            .collect(),
    }
}

impl std::fmt::Debug for Iris {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Iris")
            .field("registry", &self.registry)
            .field("wired", &self.is_wired())
            .finish()
    }
}
