// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::node::Pid;
use crate::observability::messages::registry::{DuplicatePidRegistered, NodeRegistered};
use crate::observability::messages::StructuredLog;
use crate::traits::Node;
use crate::utils::lock;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Lookup table from pid (and optional name) to node.
///
/// Entries are added while nodes are constructed and never removed. A second
/// registration under the same pid overwrites the first and is remembered, so
/// the wiring pass can refuse to start with an ambiguous graph.
#[derive(Default)]
pub struct Registry {
    nodes: RwLock<HashMap<Pid, Arc<dyn Node>>>,
    names: RwLock<HashMap<String, Pid>>,
    duplicates: Mutex<Vec<Pid>>,
}

impl Registry {
    /// Insert `node` under `pid`, returning the node it replaced.
    pub fn register(&self, pid: Pid, node: Arc<dyn Node>) -> Option<Arc<dyn Node>> {
        if let Some(name) = node.core().name() {
            write(&self.names).insert(name.to_string(), pid);
        }
        NodeRegistered {
            pid,
            kind: node.kind(),
            name: node.core().name(),
        }
        .log();

        let previous = write(&self.nodes).insert(pid, node);
        if previous.is_some() {
            DuplicatePidRegistered { pid }.log();
            lock(&self.duplicates).push(pid);
        }
        previous
    }

    pub fn get(&self, pid: Pid) -> Option<Arc<dyn Node>> {
        read(&self.nodes).get(&pid).cloned()
    }

    pub fn by_name(&self, name: &str) -> Option<Arc<dyn Node>> {
        let pid = *read(&self.names).get(name)?;
        self.get(pid)
    }

    pub fn contains(&self, pid: Pid) -> bool {
        read(&self.nodes).contains_key(&pid)
    }

    pub fn len(&self) -> usize {
        read(&self.nodes).len()
    }

    pub fn is_empty(&self) -> bool {
        read(&self.nodes).is_empty()
    }

    /// All registered nodes in ascending pid order.
    pub fn nodes(&self) -> Vec<Arc<dyn Node>> {
        let nodes = read(&self.nodes);
        let mut pids: Vec<Pid> = nodes.keys().copied().collect();
        pids.sort_unstable();
        pids.into_iter().filter_map(|pid| nodes.get(&pid).cloned()).collect()
    }

    /// Pids that were registered more than once.
    pub fn duplicates(&self) -> Vec<Pid> {
        lock(&self.duplicates).clone()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut pids: Vec<Pid> = read(&self.nodes).keys().copied().collect();
        pids.sort_unstable();
        f.debug_struct("Registry")
            .field("node_count", &pids.len())
            .field("pids", &pids)
            .finish()
    }
}

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(std::sync::PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(std::sync::PoisonError::into_inner)
}
