// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Recording stand-ins for the bus, the log sink and the observer manager.

use crate::bifrost::Bifrost;
use crate::config::BifrostConfig;
use crate::engine::Iris;
use crate::errors::BusError;
use crate::traits::{BusFrame, BusTransport, LogSink, ObserverManager};
use crate::utils::lock;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Bus that keeps every frame it is handed.
#[derive(Default)]
pub struct RecordingBus {
    frames: Mutex<Vec<BusFrame>>,
}

impl RecordingBus {
    pub fn frames(&self) -> Vec<BusFrame> {
        lock(&self.frames).clone()
    }
}

impl BusTransport for RecordingBus {
    fn send(&self, frame: BusFrame) -> Result<(), BusError> {
        lock(&self.frames).push(frame);
        Ok(())
    }
}

#[derive(Default)]
pub struct MemorySink {
    lines: Mutex<Vec<String>>,
}

impl MemorySink {
    pub fn lines(&self) -> Vec<String> {
        lock(&self.lines).clone()
    }
}

impl LogSink for MemorySink {
    fn write_line(&self, line: &str) {
        lock(&self.lines).push(line.to_string());
    }
}

/// Observer manager whose activity is switched by the test.
pub struct RecordingObservers {
    active: AtomicBool,
    frames: Mutex<Vec<String>>,
}

impl RecordingObservers {
    pub fn new(active: bool) -> Self {
        Self {
            active: AtomicBool::new(active),
            frames: Mutex::new(Vec::new()),
        }
    }

    pub fn set_active(&self, active: bool) {
        self.active.store(active, Ordering::SeqCst);
    }

    pub fn frames(&self) -> Vec<String> {
        lock(&self.frames).clone()
    }
}

#[async_trait]
impl ObserverManager for RecordingObservers {
    fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    async fn broadcast(&self, frame: &str) {
        lock(&self.frames).push(frame.to_string());
    }
}

pub struct TestHarness {
    pub iris: Iris,
    pub bus: Arc<RecordingBus>,
    pub sink: Arc<MemorySink>,
    pub bifrost: Arc<Bifrost>,
}

/// Fresh context over a recording bus and a Bifrost with no observer attached.
pub fn test_iris() -> TestHarness {
    let bus = Arc::new(RecordingBus::default());
    let sink = Arc::new(MemorySink::default());
    let bifrost = Arc::new(Bifrost::new(&BifrostConfig::default(), sink.clone()));
    let iris = Iris::new(bus.clone(), bifrost.clone());
    TestHarness {
        iris,
        bus,
        sink,
        bifrost,
    }
}
