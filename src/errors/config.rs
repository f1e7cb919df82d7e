// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;
use thiserror::Error;

/// Errors found while constructing or wiring the node graph.
///
/// All of these are fatal at startup: the runtime phase never begins with a
/// partially wired graph.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Two nodes were registered under the same pid; the later one won.
    #[error("duplicate pid {pid}: registered more than once")]
    DuplicatePid { pid: u16 },

    /// A forward reference names a pid that no node registered.
    #[error("node {owner} input '{field}' references pid {missing} which does not exist")]
    UnresolvedReference {
        owner: u16,
        field: &'static str,
        missing: u16,
    },

    /// A forward reference was read before the wiring pass replaced it.
    #[error("input '{field}' still points at pid {pid}: graph has not been wired")]
    NotWired { field: &'static str, pid: u16 },

    /// A node's post-construction hook refused the wiring.
    #[error("wiring hook of node {pid} failed: {reason}")]
    HookFailed { pid: u16, reason: String },

    #[error("unknown node kind '{0}'")]
    UnknownKind(String),

    #[error("node {pid} config is invalid: {reason}")]
    InvalidNode { pid: u16, reason: String },

    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Every configuration error found by one wiring pass.
///
/// The resolver checks the whole graph before mutating any input, so callers
/// get the complete list instead of the first problem.
#[derive(Debug)]
pub struct WiringError {
    pub errors: Vec<ConfigError>,
}

impl fmt::Display for WiringError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "graph wiring failed with {} error(s)", self.errors.len())?;
        for error in &self.errors {
            write!(f, "\n  - {}", error)?;
        }
        Ok(())
    }
}

impl std::error::Error for WiringError {}

impl From<ConfigError> for WiringError {
    fn from(error: ConfigError) -> Self {
        Self {
            errors: vec![error],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wiring_error_lists_every_cause() {
        let err = WiringError {
            errors: vec![
                ConfigError::DuplicatePid { pid: 4 },
                ConfigError::UnresolvedReference {
                    owner: 9,
                    field: "source",
                    missing: 12,
                },
            ],
        };

        let text = err.to_string();
        assert!(text.starts_with("graph wiring failed with 2 error(s)"));
        assert!(text.contains("duplicate pid 4"));
        assert!(text.contains("node 9 input 'source' references pid 12 which does not exist"));
    }
}
