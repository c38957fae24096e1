// Copyright 2025 the Georama Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error type of the graph engine.

use georama_surface::SurfaceError;

use crate::types::NodeId;

/// Failure of a graph query.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// A transform was requested on or through a node docked under more than
    /// one parent.
    #[error("node {node} has more than one parent; its position is ambiguous")]
    SharedNode {
        /// The shared node met on the way to the root.
        node: NodeId,
    },
    /// A cached-only lookup found no value.
    #[error("absolute position of node {node} has not been computed")]
    NotComputed {
        /// Node whose cache was cold.
        node: NodeId,
    },
    /// A logical index past the end of a sequence.
    #[error("index {index} out of range for {count} entries")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Number of entries available.
        count: usize,
    },
    /// A traversal depth bookkeeping invariant was broken.
    #[error("depth limit misuse: {reason}")]
    DepthLimitMisuse {
        /// What went wrong.
        reason: &'static str,
    },
    /// A surface shape could not be built.
    #[error(transparent)]
    Surface(#[from] SurfaceError),
}

/// Result alias used across the crate.
pub type Result<T, E = GraphError> = core::result::Result<T, E>;
