// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::engine::Iris;
use crate::errors::NodeError;
use crate::node::{Pid, Value};
use crate::observability::messages::dispatch::SubscriberFailed;
use crate::observability::messages::StructuredLog;
use crate::traits::Node;
use crate::utils::lock;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex};

pub type Callback = Arc<dyn Fn(&Iris, &Value) -> Result<(), NodeError> + Send + Sync>;

/// A downstream receiver of announced state.
#[derive(Clone)]
pub enum Subscriber {
    /// Another node; receives the state through [`Node::push`].
    Node(Arc<dyn Node>),
    Callback(Callback),
}

impl Subscriber {
    pub fn node(node: Arc<dyn Node>) -> Self {
        Subscriber::Node(node)
    }

    pub fn callback<F>(f: F) -> Self
    where
        F: Fn(&Iris, &Value) -> Result<(), NodeError> + Send + Sync + 'static,
    {
        Subscriber::Callback(Arc::new(f))
    }

    /// Identity comparison: the same allocation, not an equal value.
    pub fn same_target(&self, other: &Subscriber) -> bool {
        match (self, other) {
            (Subscriber::Node(a), Subscriber::Node(b)) => {
                std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
            }
            (Subscriber::Callback(a), Subscriber::Callback(b)) => {
                std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
            }
            _ => false,
        }
    }

    pub fn deliver(&self, iris: &Iris, state: &Value) -> Result<(), NodeError> {
        match self {
            Subscriber::Node(node) => node.push(iris, state.clone()),
            Subscriber::Callback(f) => f(iris, state),
        }
    }

    fn describe(&self) -> String {
        match self {
            Subscriber::Node(node) => format!("node {}", node.pid()),
            Subscriber::Callback(_) => "callback".to_string(),
        }
    }
}

impl std::fmt::Debug for Subscriber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.describe())
    }
}

/// Ordered, possibly empty subscriber collection.
#[derive(Default)]
pub struct Subscribers {
    targets: Mutex<Vec<Subscriber>>,
}

impl Subscribers {
    pub fn push(&self, target: Subscriber) {
        lock(&self.targets).push(target);
    }

    pub fn remove(&self, target: &Subscriber) -> bool {
        let mut targets = lock(&self.targets);
        match targets.iter().position(|t| t.same_target(target)) {
            Some(index) => {
                targets.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        lock(&self.targets).len()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.targets).is_empty()
    }

    /// Deliver `state` to every subscriber in registration order.
    ///
    /// The list is snapshotted first and the lock released, so subscribers may
    /// subscribe, unsubscribe or re-announce while being notified. Errors and
    /// panics are logged and counted; the remaining subscribers still run.
    pub fn notify(&self, iris: &Iris, origin: Pid, state: &Value) -> usize {
        let targets: Vec<Subscriber> = lock(&self.targets).clone();
        let mut failures = 0;
        for (index, target) in targets.iter().enumerate() {
            let delivered = panic::catch_unwind(AssertUnwindSafe(|| target.deliver(iris, state)))
                .unwrap_or_else(|payload| Err(NodeError::Panicked(panic_message(payload.as_ref()))));
            if let Err(error) = delivered {
                failures += 1;
                SubscriberFailed {
                    origin,
                    index,
                    target: &target.describe(),
                    error: &error,
                }
                .log();
            }
        }
        failures
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
