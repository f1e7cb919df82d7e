// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::observability::messages::runtime::{
    ShutdownCompleted, TaskCancelled, TaskFailed, TaskReplaced, TaskSpawned,
};
use crate::observability::messages::StructuredLog;
use std::collections::HashMap;
use std::future::Future;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

struct Task {
    token: CancellationToken,
    handle: JoinHandle<()>,
}

/// Named long-running tasks with cooperative cancellation.
///
/// Every task gets a child of the group's token. Cancelling one task by name
/// hands its join handle back to the caller, who owns whatever the task held;
/// shutting the group down cancels and awaits everything still registered.
pub struct TaskGroup {
    root: CancellationToken,
    tasks: HashMap<String, Task>,
}

impl Default for TaskGroup {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskGroup {
    pub fn new() -> Self {
        Self {
            root: CancellationToken::new(),
            tasks: HashMap::new(),
        }
    }

    /// Spawn `task` under `name`, passing it the token it must watch.
    ///
    /// A task already registered under the same name is cancelled first.
    pub fn spawn<F, Fut>(&mut self, name: impl Into<String>, task: F)
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let name = name.into();
        let token = self.root.child_token();
        let handle = tokio::spawn(task(token.clone()));
        if let Some(previous) = self.tasks.insert(name.clone(), Task { token, handle }) {
            previous.token.cancel();
            TaskReplaced { name: &name }.log();
        }
        TaskSpawned { name: &name }.log();
    }

    /// Cancel one task and return its handle so the owner can await it.
    pub fn cancel(&mut self, name: &str) -> Option<JoinHandle<()>> {
        let task = self.tasks.remove(name)?;
        task.token.cancel();
        TaskCancelled { name }.log();
        Some(task.handle)
    }

    pub fn is_running(&self, name: &str) -> bool {
        self.tasks
            .get(name)
            .map(|task| !task.handle.is_finished())
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Cancel every task and wait for each to return.
    pub async fn shutdown(self) -> usize {
        self.root.cancel();
        let count = self.tasks.len();
        for (name, task) in self.tasks {
            if let Err(error) = task.handle.await {
                TaskFailed {
                    name: &name,
                    error: &error,
                }
                .log();
            }
        }
        ShutdownCompleted { tasks: count }.log();
        count
    }
}
