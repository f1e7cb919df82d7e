// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Bus endpoint for orders larger than a single frame.
//!
//! Frames pushed to this node are fed to a [`ChunkedReceiver`]. Every accepted
//! frame is acknowledged on the bus to the route named in the header; once the
//! message completes it becomes the node's state and is announced.

use crate::config::consts::ORDER_RECEIVER_PID;
use crate::engine::{dispatch, Announce, Iris};
use crate::errors::NodeError;
use crate::node::{NodeCore, NodeSpec, Value, WireType};
use crate::protocol::chunked::ACK;
use crate::protocol::{ChunkedReceiver, ReceiverState, Route, Step};
use crate::traits::{BusFrame, Node};
use crate::utils::lock;
use std::sync::{Arc, Mutex};

pub struct OrderReceiver {
    core: NodeCore,
    receiver: Mutex<ChunkedReceiver>,
}

impl OrderReceiver {
    /// Completed orders are Text or Json and never go out on the bus, so the
    /// factory refuses `bcast` for this kind.
    pub fn new(iris: &Iris, spec: NodeSpec) -> Arc<Self> {
        iris.register(Arc::new(Self {
            core: NodeCore::new(spec),
            receiver: Mutex::new(ChunkedReceiver::new()),
        }))
    }

    /// Active receiver on the well-known order pid.
    pub fn with_default_pid(iris: &Iris) -> Arc<Self> {
        Self::new(
            iris,
            NodeSpec::new(ORDER_RECEIVER_PID, WireType::Bytes)
                .named("order_receiver")
                .active(),
        )
    }

    pub fn receiving(&self) -> bool {
        lock(&self.receiver).state() == ReceiverState::Receiving
    }

    /// Abandon a partial message. Returns false when nothing was in progress.
    pub fn reset(&self) -> bool {
        lock(&self.receiver).reset()
    }

    fn acknowledge(&self, iris: &Iris, route: Route) -> Result<(), NodeError> {
        iris.bus().send(BusFrame {
            adr: Some(route.adr),
            pid: route.pid,
            cmd: 0,
            payload: vec![ACK],
        })?;
        Ok(())
    }
}

impl Node for OrderReceiver {
    fn core(&self) -> &NodeCore {
        &self.core
    }

    fn kind(&self) -> &'static str {
        "OrderReceiver"
    }

    fn push(&self, iris: &Iris, state: Value) -> Result<(), NodeError> {
        let Value::Bytes(frame) = state else {
            return Err(NodeError::UnexpectedValue {
                pid: self.core.pid(),
                expected: WireType::Bytes,
                found: state.wire_type(),
            });
        };

        let step = lock(&self.receiver).feed(&frame)?;
        self.acknowledge(iris, step.route())?;
        if let Step::Complete(message) = step {
            self.core.set_state(message.value);
            dispatch::announce(iris, &self.core, Announce::default());
        }
        Ok(())
    }
}
