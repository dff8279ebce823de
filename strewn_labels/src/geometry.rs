// Copyright 2025 the Strewn Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Integer rectangles and the two set operations placement needs.

use kurbo::Rect;

/// Coordinate unit a rectangle is expressed in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Unit {
    /// Device pixels, the unit of the host tree's world space.
    #[default]
    Pixel,
    /// Density-independent units; multiply by the display density to get pixels.
    Dip,
}

/// Convert a density-independent length to pixels, truncating toward zero.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    reason = "Truncation matches how the host converts dimensions."
)]
pub fn dip_to_px(dip: i32, density: f64) -> i32 {
    (f64::from(dip) * density) as i32
}

/// An axis-aligned rectangle on the integer grid.
///
/// Constructed rectangles have `left <= right` and `top <= bottom`; a zero-area rectangle
/// denotes a single point. [`clip_below`] may produce `bottom < top`, which reads as empty.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct IntRect {
    /// Left edge.
    pub left: i32,
    /// Top edge.
    pub top: i32,
    /// Right edge (exclusive).
    pub right: i32,
    /// Bottom edge (exclusive).
    pub bottom: i32,
    /// Unit of all four coordinates.
    pub unit: Unit,
}

impl IntRect {
    /// A pixel rectangle from its edges.
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
            unit: Unit::Pixel,
        }
    }

    /// A zero-area pixel rectangle at `(x, y)`.
    pub const fn point(x: i32, y: i32) -> Self {
        Self::new(x, y, x, y)
    }

    /// Re-tag the coordinates with `unit` without converting them.
    #[must_use]
    pub const fn with_unit(mut self, unit: Unit) -> Self {
        self.unit = unit;
        self
    }

    /// Snap a host-tree rectangle onto the pixel grid.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "World coordinates are within i32 range on any real display."
    )]
    pub fn from_kurbo(rect: Rect) -> Self {
        let r = rect.abs().floor();
        Self::new(r.x0 as i32, r.y0 as i32, r.x1 as i32, r.y1 as i32)
    }

    /// The same rectangle in host-tree coordinates.
    pub fn to_kurbo(self) -> Rect {
        Rect::new(
            f64::from(self.left),
            f64::from(self.top),
            f64::from(self.right),
            f64::from(self.bottom),
        )
    }

    /// Convert to pixels; a no-op for pixel rectangles.
    #[must_use]
    pub fn to_pixels(self, density: f64) -> Self {
        match self.unit {
            Unit::Pixel => self,
            Unit::Dip => Self::new(
                dip_to_px(self.left, density),
                dip_to_px(self.top, density),
                dip_to_px(self.right, density),
                dip_to_px(self.bottom, density),
            ),
        }
    }

    /// Horizontal extent; negative for inverted rectangles.
    pub const fn width(&self) -> i32 {
        self.right - self.left
    }

    /// Vertical extent; negative after a clip pushed the bottom above the top.
    pub const fn height(&self) -> i32 {
        self.bottom - self.top
    }

    /// Whether no point can be sampled from this rectangle.
    pub const fn is_empty(&self) -> bool {
        self.width() <= 0 || self.height() <= 0
    }

    /// Whether `(x, y)` lies inside, edges included.
    pub const fn contains(&self, x: i32, y: i32) -> bool {
        self.left <= x && x <= self.right && self.top <= y && y <= self.bottom
    }
}

/// Whether two rectangles share interior area.
///
/// Touching edges do not count, and an empty rectangle intersects nothing.
pub fn intersects(a: &IntRect, b: &IntRect) -> bool {
    a.left < b.right && b.left < a.right && a.top < b.bottom && b.top < a.bottom
}

/// Pull the bottom edge of `region` up to `inset` above the top of `obstacle`.
///
/// Returns `region` unchanged when its bottom already lies at or above the obstacle's top.
/// The result may be inverted (`bottom < top`).
#[must_use]
pub fn clip_below(region: IntRect, obstacle: &IntRect, inset: i32) -> IntRect {
    if region.bottom > obstacle.top {
        IntRect {
            bottom: obstacle.top - inset,
            ..region
        }
    } else {
        region
    }
}
