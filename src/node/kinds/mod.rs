// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Concrete node kinds shipped with the runtime and the factory that builds
//! them from configuration.

mod factory;
mod order_receiver;
mod parameter;
mod relay;

pub use factory::NodeFactory;
pub use order_receiver::OrderReceiver;
pub use parameter::Parameter;
pub use relay::Relay;
