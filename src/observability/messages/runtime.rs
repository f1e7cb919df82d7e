// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for task lifecycle.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};

pub struct TaskSpawned<'a> {
    pub name: &'a str,
}

impl Display for TaskSpawned<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Task '{}' spawned", self.name)
    }
}

impl StructuredLog for TaskSpawned<'_> {
    fn log(&self) {
        tracing::debug!(task = self.name, "{}", self);
    }
}

/// A task was replaced by a new one spawned under the same name.
pub struct TaskReplaced<'a> {
    pub name: &'a str,
}

impl Display for TaskReplaced<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Task '{}' replaced; the previous instance was cancelled", self.name)
    }
}

impl StructuredLog for TaskReplaced<'_> {
    fn log(&self) {
        tracing::warn!(task = self.name, "{}", self);
    }
}

pub struct TaskCancelled<'a> {
    pub name: &'a str,
}

impl Display for TaskCancelled<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Task '{}' cancelled by its owner", self.name)
    }
}

impl StructuredLog for TaskCancelled<'_> {
    fn log(&self) {
        tracing::info!(task = self.name, "{}", self);
    }
}

/// A task ended with a panic or was aborted during shutdown.
pub struct TaskFailed<'a> {
    pub name: &'a str,
    pub error: &'a tokio::task::JoinError,
}

impl Display for TaskFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Task '{}' did not finish cleanly: {}", self.name, self.error)
    }
}

impl StructuredLog for TaskFailed<'_> {
    fn log(&self) {
        tracing::error!(task = self.name, error = %self.error, "{}", self);
    }
}

pub struct ShutdownCompleted {
    pub tasks: usize,
}

impl Display for ShutdownCompleted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Shutdown complete: {} task(s) stopped", self.tasks)
    }
}

impl StructuredLog for ShutdownCompleted {
    fn log(&self) {
        tracing::info!(tasks = self.tasks, "{}", self);
    }
}
