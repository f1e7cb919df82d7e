// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability module for structured logging and tracing.
//!
//! Diagnostic and operational events are declared once, as message structs in
//! [`messages`], instead of as format strings scattered through the runtime.
//! Each message implements `Display` for the human-readable line and
//! [`messages::StructuredLog`] to emit itself at a fixed level with
//! structured fields.
//!
//! # Architecture
//!
//! Messages are organized by subsystem:
//! * `messages::registry` - node registration and graph wiring
//! * `messages::dispatch` - announcements, bus sends and subscriber failures
//! * `messages::bifrost` - observer bridge queue and drain task
//! * `messages::protocol` - chunked receiver and block transfer sessions
//! * `messages::runtime` - task lifecycle
//!
//! # Usage
//!
//! ```rust
//! use floe_iris::observability::messages::registry::DuplicatePidRegistered;
//! use floe_iris::observability::messages::StructuredLog;
//!
//! DuplicatePidRegistered { pid: 12 }.log();
//! ```
//!
//! Subscriber installation is left to the binary; the library only emits.

pub mod messages;
