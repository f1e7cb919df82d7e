// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Nodes: the wireable units of state the graph is built from.

mod core;
mod input;
pub mod kinds;
mod subscribers;
mod value;

pub use self::core::{Flags, NodeCore, NodeSpec, Pid};
pub use input::{Constant, Input, InputSlot, InputSpec};
pub use subscribers::{Callback, Subscriber, Subscribers};
pub use value::{decode, encode, Value, WireType};
