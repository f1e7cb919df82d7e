// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::traits::LogSink;

/// Writes disconnected-mode lines as `info` events under target `bifrost`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn write_line(&self, line: &str) {
        tracing::info!(target: "bifrost", "{}", line);
    }
}
