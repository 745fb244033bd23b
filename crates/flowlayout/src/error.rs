//! Error types for Flowlayout operations.
//!
//! This module provides the main error type [`LayoutError`]. Only invalid
//! input is fatal: dangling edges and coincident entities are handled inside
//! the simulation, and non-convergence is reported through
//! [`LayoutOutput::timed_out`](crate::LayoutOutput::timed_out).

use thiserror::Error;

/// The main error type for Flowlayout operations.
///
/// Both variants are raised before the first iteration runs, so a failed
/// call never leaves a partially simulated layout behind.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error("Invalid configuration `{field}`: {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    #[error("Invalid node `{id}`: {reason}")]
    InvalidNode { id: String, reason: String },
}

impl LayoutError {
    /// Create a new `InvalidConfig` error for the given field.
    pub fn invalid_config(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }

    /// Create a new `InvalidNode` error for the given node id.
    pub fn invalid_node(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidNode {
            id: id.into(),
            reason: reason.into(),
        }
    }
}
