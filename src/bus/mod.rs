// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Bus transports that receive encoded frames from the dispatcher.

mod channel;
mod logging;

pub use channel::{forward, ChannelBus};
pub use logging::TracingBus;
