// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::traits::ObserverManager;
use async_trait::async_trait;
use tokio::sync::broadcast;

/// Fan-out to any number of in-process receivers (e.g. one per websocket).
///
/// Active while at least one receiver is subscribed. Receivers that lag
/// behind lose the oldest frames, as `tokio::sync::broadcast` does.
pub struct BroadcastObservers {
    sender: broadcast::Sender<String>,
}

impl BroadcastObservers {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Open a new observer channel.
    pub fn subscribe(&self) -> broadcast::Receiver<String> {
        self.sender.subscribe()
    }

    pub fn channel_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

#[async_trait]
impl ObserverManager for BroadcastObservers {
    fn is_active(&self) -> bool {
        self.sender.receiver_count() > 0
    }

    async fn broadcast(&self, frame: &str) {
        // no receivers left is not an error; the next frame goes to the log
        let _ = self.sender.send(frame.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_active_only_with_receivers() {
        let observers = BroadcastObservers::new(8);
        assert!(!observers.is_active());

        let mut rx = observers.subscribe();
        assert!(observers.is_active());
        observers.broadcast("7,x").await;
        assert_eq!(rx.recv().await.unwrap(), "7,x");

        drop(rx);
        assert!(!observers.is_active());
        assert_eq!(observers.channel_count(), 0);
    }
}
