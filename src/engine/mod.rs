// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Runtime engine: the `Iris` context, its registry and wiring pass, the
//! reactive dispatcher and the task group that drives long-running work.

pub mod dispatch;
pub mod iris;
pub mod registry;
pub mod tasks;
#[cfg(test)]
pub mod integration_tests;

pub use dispatch::{announce, Announce, Destination, Dispatched};
pub use iris::{Iris, WiringSummary};
pub use registry::Registry;
pub use tasks::TaskGroup;
