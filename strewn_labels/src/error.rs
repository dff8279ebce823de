// Copyright 2025 the Strewn Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors surfaced to callers.
//!
//! Only precondition violations propagate. Geometry and sampling problems are recovered where
//! they happen (see [`crate::Sampler::degenerate_placements`]).

use strewn_view_tree::NodeId;

/// Error type for engine and attachment operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The node is stale or was never part of the tree.
    #[error("target node {0:?} is not alive in the tree")]
    InvalidTarget(NodeId),
    /// An indexed target names a child slot the container does not have.
    #[error("container {container:?} has {len} child slots, index {index} is out of range")]
    SlotOutOfRange {
        /// The indexed container.
        container: NodeId,
        /// Requested slot.
        index: usize,
        /// Number of slots the container actually has.
        len: usize,
    },
    /// The node has zero-area bounds; commit the tree (run a layout pass) and retry.
    #[error("bounds of {0:?} are empty; commit the tree before reading its geometry")]
    NotReady(NodeId),
}

/// Result alias for this crate.
pub type Result<T> = core::result::Result<T, Error>;
