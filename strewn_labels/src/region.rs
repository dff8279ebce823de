// Copyright 2025 the Strewn Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Partitioning of the container into four candidate regions around a focal rectangle.

use crate::geometry::IntRect;

/// One of the four candidate placement areas around the focal rectangle.
///
/// The declaration order is the round-robin order used by
/// [`SelectionPolicy::RoundRobin`](crate::SelectionPolicy::RoundRobin).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Region {
    /// Strip left of the focal rectangle, full container height.
    Left,
    /// Band below the focal rectangle, full container width.
    Below,
    /// Strip right of the focal rectangle, full container height.
    Right,
    /// Band above the focal rectangle, full container width.
    Above,
}

impl Region {
    /// All regions in round-robin order.
    pub const ALL: [Self; 4] = [Self::Left, Self::Below, Self::Right, Self::Above];

    /// Position of this region in [`Region::ALL`].
    pub const fn index(self) -> usize {
        match self {
            Self::Left => 0,
            Self::Below => 1,
            Self::Right => 2,
            Self::Above => 3,
        }
    }
}

/// Insets applied to every region edge, in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Margins {
    /// Inset of left and right edges.
    pub horizontal: i32,
    /// Inset of top and bottom edges.
    pub vertical: i32,
}

impl Margins {
    /// The same inset on both axes.
    pub const fn uniform(margin: i32) -> Self {
        Self {
            horizontal: margin,
            vertical: margin,
        }
    }

    /// Separate horizontal and vertical insets.
    pub const fn new(horizontal: i32, vertical: i32) -> Self {
        Self {
            horizontal,
            vertical,
        }
    }
}

/// The four region templates computed by [`partition`].
///
/// Templates are never modified after partitioning; obstacle clipping works on copies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Regions {
    rects: [IntRect; 4],
}

impl Regions {
    /// The template for `region`.
    pub fn get(&self, region: Region) -> IntRect {
        self.rects[region.index()]
    }

    /// All templates in round-robin order.
    pub fn iter(&self) -> impl Iterator<Item = (Region, IntRect)> + '_ {
        Region::ALL.iter().map(|&r| (r, self.get(r)))
    }
}

/// Split `container` into the four areas around `focal`, insetting every edge by `margins`.
///
/// Edges that face the container boundary and edges that face the focal rectangle are both
/// inset. When the insets leave no room (for example the focal rectangle touches the container
/// top, so there is nothing above it), the region collapses to zero height or width at its
/// start edge instead of inverting.
pub fn partition(container: IntRect, focal: IntRect, margins: Margins) -> Regions {
    let h = margins.horizontal;
    let v = margins.vertical;
    let c = container;
    let f = focal;

    let left = IntRect::new(c.left + h, c.top + v, f.left - h, c.bottom - v);
    let below = IntRect::new(c.left + h, f.bottom + v, c.right - h, c.bottom - v);
    let right = IntRect::new(f.right + h, c.top + v, c.right - h, c.bottom - v);
    let above = IntRect::new(c.left + h, c.top + v, c.right - h, f.top - v);

    Regions {
        rects: [left, below, right, above].map(collapse),
    }
}

fn collapse(r: IntRect) -> IntRect {
    IntRect {
        right: r.right.max(r.left),
        bottom: r.bottom.max(r.top),
        ..r
    }
}
