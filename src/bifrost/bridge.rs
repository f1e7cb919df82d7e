// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::consts::TERM_DESTINATION;
use crate::config::{BifrostConfig, OverflowPolicy};
use crate::observability::messages::bifrost::{
    DrainStarted, DrainStopped, ObserverAttached, PayloadSerializationFailed, QueueOverflow,
};
use crate::observability::messages::StructuredLog;
use crate::traits::{LogSink, ObserverManager};
use crate::utils::lock;
use serde::Serialize;
use std::collections::VecDeque;
use std::fmt::Display;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

/// Message body handed to [`Bifrost::send`].
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Text(String),
    /// Serialized as compact JSON when framed.
    Json(serde_json::Value),
}

impl Payload {
    fn render(&self) -> String {
        match self {
            Payload::Text(text) => text.clone(),
            Payload::Json(value) => value.to_string(),
        }
    }
}

impl From<&str> for Payload {
    fn from(text: &str) -> Self {
        Payload::Text(text.to_string())
    }
}

impl From<String> for Payload {
    fn from(text: String) -> Self {
        Payload::Text(text)
    }
}

impl From<serde_json::Value> for Payload {
    fn from(value: serde_json::Value) -> Self {
        Payload::Json(value)
    }
}

/// Where a sent message ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Appended to the queue for the drain task.
    Queued,
    /// Refused because the queue was full under `drop_newest`.
    Dropped,
    /// No active observer; written to the local log sink.
    Logged,
}

pub struct Bifrost {
    queue: Mutex<VecDeque<String>>,
    capacity: usize,
    policy: OverflowPolicy,
    dropped: AtomicU64,
    observers: RwLock<Option<Arc<dyn ObserverManager>>>,
    sink: Arc<dyn LogSink>,
}

impl Bifrost {
    pub fn new(config: &BifrostConfig, sink: Arc<dyn LogSink>) -> Self {
        let capacity = config.get_queue_capacity();
        Self {
            queue: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
            policy: config.overflow_policy,
            dropped: AtomicU64::new(0),
            observers: RwLock::new(None),
            sink,
        }
    }

    /// Attach the observer manager. Replaces any earlier one.
    pub fn attach(&self, observers: Arc<dyn ObserverManager>) {
        ObserverAttached {
            active: observers.is_active(),
        }
        .log();
        *self
            .observers
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = Some(observers);
    }

    fn observers(&self) -> Option<Arc<dyn ObserverManager>> {
        self.observers
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    /// True while an attached observer manager reports an active channel.
    pub fn is_connected(&self) -> bool {
        self.observers()
            .map(|observers| observers.is_active())
            .unwrap_or(false)
    }

    /// Queue `"<destination>,<payload>"` when connected, otherwise write the
    /// payload to the local log.
    pub fn send(&self, destination: impl Display, payload: impl Into<Payload>) -> Delivery {
        let payload = payload.into().render();
        if !self.is_connected() {
            self.sink.write_line(&payload);
            return Delivery::Logged;
        }
        self.enqueue(format!("{},{}", destination, payload))
    }

    /// Serialize `payload` as JSON and send it.
    pub fn send_json<T: Serialize>(
        &self,
        destination: impl Display,
        payload: &T,
    ) -> Result<Delivery, serde_json::Error> {
        let destination = destination.to_string();
        match serde_json::to_value(payload) {
            Ok(value) => Ok(self.send(destination, value)),
            Err(error) => {
                PayloadSerializationFailed {
                    destination: &destination,
                    error: &error,
                }
                .log();
                Err(error)
            }
        }
    }

    /// Send to the remote terminal.
    pub fn post(&self, message: impl Into<Payload>) -> Delivery {
        self.send(TERM_DESTINATION, message)
    }

    /// Redirected-stdout entry point. Empty writes and bare newlines are
    /// swallowed.
    pub fn write(&self, message: &str) -> Option<Delivery> {
        if message.is_empty() || message == "\n" {
            return None;
        }
        Some(self.post(format!("print: {}", message)))
    }

    fn enqueue(&self, frame: String) -> Delivery {
        let mut queue = lock(&self.queue);
        if queue.len() < self.capacity {
            queue.push_back(frame);
            return Delivery::Queued;
        }

        let dropped_total = self.dropped.fetch_add(1, Ordering::Relaxed) + 1;
        let delivery = match self.policy {
            OverflowPolicy::DropOldest => {
                queue.pop_front();
                queue.push_back(frame);
                Delivery::Queued
            }
            OverflowPolicy::DropNewest => Delivery::Dropped,
        };
        drop(queue);
        QueueOverflow {
            policy: self.policy.name(),
            capacity: self.capacity,
            dropped_total,
        }
        .log();
        delivery
    }

    pub fn pop(&self) -> Option<String> {
        lock(&self.queue).pop_front()
    }

    pub fn len(&self) -> usize {
        lock(&self.queue).len()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.queue).is_empty()
    }

    /// Frames discarded by the overflow policy so far.
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Broadcast queued frames, one per tick, until `token` is cancelled.
    ///
    /// Frames stay queued while no observer is active. Returns the number of
    /// frames delivered.
    pub async fn drain(&self, poll_interval: Duration, token: CancellationToken) -> u64 {
        let started = DrainStarted { poll_interval };
        started.log();

        async {
            let mut ticker = tokio::time::interval(poll_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut delivered = 0;
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {
                        let Some(observers) = self.observers().filter(|o| o.is_active()) else {
                            continue;
                        };
                        if let Some(frame) = self.pop() {
                            observers.broadcast(&frame).await;
                            delivered += 1;
                        }
                    }
                }
            }
            DrainStopped {
                delivered,
                pending: self.len(),
            }
            .log();
            delivered
        }
        .instrument(started.span("drain"))
        .await
    }
}

impl std::fmt::Debug for Bifrost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bifrost")
            .field("queued", &self.len())
            .field("capacity", &self.capacity)
            .field("policy", &self.policy)
            .field("dropped", &self.dropped())
            .field("connected", &self.is_connected())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stub::{MemorySink, RecordingObservers};
    use serde_json::json;

    fn bridge(capacity: usize, policy: OverflowPolicy) -> (Bifrost, Arc<MemorySink>) {
        let sink = Arc::new(MemorySink::default());
        let config = BifrostConfig {
            queue_capacity: Some(capacity),
            overflow_policy: policy,
            poll_interval_ms: Some(1),
        };
        (Bifrost::new(&config, sink.clone()), sink)
    }

    #[test]
    fn test_disconnected_send_goes_to_local_log() {
        let (bifrost, sink) = bridge(4, OverflowPolicy::DropOldest);

        assert_eq!(bifrost.send(7, "x"), Delivery::Logged);

        assert_eq!(sink.lines(), vec!["x".to_string()]);
        assert!(bifrost.is_empty());
    }

    #[test]
    fn test_connected_send_enqueues_frame() {
        let (bifrost, sink) = bridge(4, OverflowPolicy::DropOldest);
        bifrost.attach(Arc::new(RecordingObservers::new(true)));

        assert_eq!(bifrost.send(7, "x"), Delivery::Queued);

        assert_eq!(bifrost.len(), 1);
        assert_eq!(bifrost.pop().as_deref(), Some("7,x"));
        assert!(sink.lines().is_empty());
    }

    #[test]
    fn test_inactive_observer_counts_as_disconnected() {
        let (bifrost, sink) = bridge(4, OverflowPolicy::DropOldest);
        let observers = Arc::new(RecordingObservers::new(false));
        bifrost.attach(observers.clone());

        assert!(!bifrost.is_connected());
        bifrost.post("booting");
        observers.set_active(true);
        bifrost.post("ready");

        assert_eq!(sink.lines(), vec!["booting".to_string()]);
        assert_eq!(bifrost.pop().as_deref(), Some("term,ready"));
    }

    #[test]
    fn test_helpers_frame_messages() {
        let (bifrost, _sink) = bridge(8, OverflowPolicy::DropOldest);
        bifrost.attach(Arc::new(RecordingObservers::new(true)));

        assert_eq!(bifrost.write(""), None);
        assert_eq!(bifrost.write("\n"), None);
        assert_eq!(bifrost.write("hello"), Some(Delivery::Queued));
        bifrost.send_json(12, &json!({"x": 1})).unwrap();
        bifrost.post("plain");

        let frames: Vec<String> = std::iter::from_fn(|| bifrost.pop()).collect();
        assert_eq!(frames, vec!["term,print: hello", r#"12,{"x":1}"#, "term,plain"]);
    }

    #[test]
    fn test_overflow_policies_table_driven() {
        struct TestCase {
            name: &'static str,
            policy: OverflowPolicy,
            expected_last: Delivery,
            expected_frames: Vec<&'static str>,
        }

        let test_cases = vec![
            TestCase {
                name: "drop oldest keeps the newest frames",
                policy: OverflowPolicy::DropOldest,
                expected_last: Delivery::Queued,
                expected_frames: vec!["1,b", "1,c"],
            },
            TestCase {
                name: "drop newest keeps the oldest frames",
                policy: OverflowPolicy::DropNewest,
                expected_last: Delivery::Dropped,
                expected_frames: vec!["1,a", "1,b"],
            },
        ];

        for test_case in test_cases {
            let (bifrost, _sink) = bridge(2, test_case.policy);
            bifrost.attach(Arc::new(RecordingObservers::new(true)));

            bifrost.send(1, "a");
            bifrost.send(1, "b");
            let last = bifrost.send(1, "c");

            assert_eq!(last, test_case.expected_last, "Test case '{}'", test_case.name);
            assert_eq!(bifrost.dropped(), 1, "Test case '{}'", test_case.name);
            let frames: Vec<String> = std::iter::from_fn(|| bifrost.pop()).collect();
            assert_eq!(frames, test_case.expected_frames, "Test case '{}'", test_case.name);
        }
    }

    #[tokio::test]
    async fn test_drain_broadcasts_in_fifo_order() {
        let (bifrost, _sink) = bridge(16, OverflowPolicy::DropOldest);
        let bifrost = Arc::new(bifrost);
        let observers = Arc::new(RecordingObservers::new(true));
        bifrost.attach(observers.clone());
        for i in 0..3 {
            bifrost.send(i, format!("m{}", i));
        }

        let token = CancellationToken::new();
        let task = {
            let bifrost = bifrost.clone();
            let token = token.clone();
            tokio::spawn(async move { bifrost.drain(Duration::from_millis(1), token).await })
        };

        tokio::time::timeout(Duration::from_secs(2), async {
            while observers.frames().len() < 3 {
                tokio::time::sleep(Duration::from_millis(1)).await;
            }
        })
        .await
        .unwrap();
        token.cancel();

        assert_eq!(task.await.unwrap(), 3);
        assert_eq!(observers.frames(), vec!["0,m0", "1,m1", "2,m2"]);
        assert!(bifrost.is_empty());
    }
}
