// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;

/// The set of remote observer channels (e.g. browser websockets) behind Bifrost.
#[async_trait]
pub trait ObserverManager: Send + Sync {
    /// True while at least one channel is connected.
    fn is_active(&self) -> bool;

    /// Deliver one frame to every connected channel.
    async fn broadcast(&self, frame: &str);
}

/// Line-oriented text sink used when no observer is connected.
pub trait LogSink: Send + Sync {
    fn write_line(&self, line: &str);
}
