// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod bifrost;       // observer bridge
pub mod bus;           // bus transports
pub mod config;        // runtime + node configuration
pub mod engine;        // registry, wiring, dispatch, tasks
pub mod errors;        // error handling
pub mod node;          // node core, inputs, kinds
pub mod observability;
pub mod protocol;      // chunked receiver, block sender
pub mod traits;        // unified abstractions
pub mod utils;

#[cfg(test)]
pub mod stub;
