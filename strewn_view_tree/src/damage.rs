// Copyright 2025 the Strewn Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Damage summary types returned from commit.

use alloc::vec::Vec;

use kurbo::Rect;

use crate::types::{NodeId, Transition};

/// A transition queued with [`crate::Tree::run_transition`] and handed to the host on commit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransitionRequest {
    /// Node to animate.
    pub node: NodeId,
    /// What to play.
    pub transition: Transition,
}

/// A batched set of changes derived from [`crate::Tree::commit`].
#[derive(Clone, Debug, Default)]
pub struct Damage {
    /// World-space rectangles that should be repainted.
    pub dirty_rects: Vec<Rect>,
    /// Transitions requested since the previous commit, in request order.
    ///
    /// Requests for nodes removed before the commit are dropped.
    pub transitions: Vec<TransitionRequest>,
}

impl Damage {
    /// Returns the union of all damage rects.
    pub fn union_rect(&self) -> Option<Rect> {
        let mut it = self.dirty_rects.iter().copied();
        let first = it.next()?;
        Some(it.fold(first, |acc, r| acc.union(r)))
    }
}
