// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod bus;
mod codec;
mod config;
mod node;
mod protocol;

pub use bus::BusError;
pub use codec::CodecError;
pub use config::{ConfigError, WiringError};
pub use node::NodeError;
pub use protocol::{ProtocolError, TransferError};
