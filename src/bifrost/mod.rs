// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Bifrost: the bridge from the node runtime to remote observers.
//!
//! While an observer channel is active, messages are queued as
//! `"<dest>,<payload>"` frames and a drain task broadcasts them in FIFO order,
//! one per poll tick. With no active observer they go straight to the local
//! log sink and nothing is retained.

mod bridge;
mod observers;
mod sink;

pub use bridge::{Bifrost, Delivery, Payload};
pub use observers::BroadcastObservers;
pub use sink::TracingSink;
