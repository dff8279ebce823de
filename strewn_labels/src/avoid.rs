// Copyright 2025 the Strewn Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Obstacle registration and region clipping.
//!
//! Avoidance is vertical-only: an obstacle overlaps a region when its top edge lies above the
//! region's bottom edge, and then pulls that bottom edge up above the obstacle's top. Horizontal
//! extents are not compared, so an obstacle beside or above a region still clips it. Top, left
//! and right edges never move.

use smallvec::SmallVec;

use crate::geometry::{IntRect, clip_below};

/// Ordered, grow-only set of rectangles labels must not cover, in pixels.
#[derive(Clone, Debug, Default)]
pub struct Obstacles {
    rects: SmallVec<[IntRect; 4]>,
}

impl Obstacles {
    /// An empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an obstacle. Obstacles are never removed during a session.
    pub fn register(&mut self, rect: IntRect) {
        self.rects.push(rect);
    }

    /// Registered obstacles in registration order.
    pub fn as_slice(&self) -> &[IntRect] {
        &self.rects
    }

    /// Number of registered obstacles.
    pub fn len(&self) -> usize {
        self.rects.len()
    }

    /// Whether nothing has been registered.
    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }
}

/// Shrink a copy of `region` so that its bottom edge stays above every obstacle.
///
/// Obstacles are applied in order; each one whose top lies above the partially clipped region's
/// bottom moves that bottom to `inset` above the obstacle's top. The result may be empty.
#[must_use]
pub fn clip(region: IntRect, obstacles: &[IntRect], inset: i32) -> IntRect {
    obstacles
        .iter()
        .fold(region, |current, obstacle| clip_below(current, obstacle, inset))
}
