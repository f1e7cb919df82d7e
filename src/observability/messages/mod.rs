// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! # Organization
//!
//! * `registry` - node registration and wiring
//! * `dispatch` - reactive dispatch side effects
//! * `bifrost` - observer bridge
//! * `protocol` - framed byte-stream protocols
//! * `runtime` - task group lifecycle
//!
//! # Usage Pattern
//!
//! ```rust
//! use floe_iris::observability::messages::registry::WiringCompleted;
//!
//! let msg = WiringCompleted {
//!     nodes: 12,
//!     resolved: 4,
//! };
//!
//! tracing::info!("{}", msg);
//! ```

use tracing::Span;

pub mod bifrost;
pub mod dispatch;
pub mod protocol;
pub mod registry;
pub mod runtime;

/// Emit a message as a structured tracing event.
///
/// Implementors pick the level; callers only decide that the event happened.
pub trait StructuredLog {
    fn log(&self);

    /// A span carrying the message's fields, for wrapping long-running work.
    fn span(&self, name: &str) -> Span {
        tracing::info_span!("floe", span_name = name)
    }
}
