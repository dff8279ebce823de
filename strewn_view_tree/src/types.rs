// Copyright 2025 the Strewn Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the view tree: node identifiers, flags, layout parameters, and decoration.

use alloc::string::String;

use kurbo::{Affine, Insets, Rect};

/// Identifier for a node in the tree (generational).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct NodeId(pub(crate) u32, pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

bitflags::bitflags! {
    /// Node flags controlling visibility and bookkeeping.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct NodeFlags: u8 {
        /// Node is visible (participates in rendering).
        const VISIBLE   = 0b0000_0001;
        /// Node was inserted by a library to group other nodes, not by the application.
        const SYNTHETIC = 0b0000_0010;
    }
}

impl Default for NodeFlags {
    fn default() -> Self {
        Self::VISIBLE
    }
}

bitflags::bitflags! {
    /// Placement of a child inside its parent's bounds, frame-layout style.
    ///
    /// Horizontal and vertical bits combine; a missing axis defaults to the start edge.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Gravity: u8 {
        /// Align to the left edge.
        const LEFT              = 0b0000_0001;
        /// Align to the right edge.
        const RIGHT             = 0b0000_0010;
        /// Align to the top edge.
        const TOP               = 0b0000_0100;
        /// Align to the bottom edge.
        const BOTTOM            = 0b0000_1000;
        /// Center horizontally.
        const CENTER_HORIZONTAL = 0b0001_0000;
        /// Center vertically.
        const CENTER_VERTICAL   = 0b0010_0000;
        /// Center on both axes.
        const CENTER = Self::CENTER_HORIZONTAL.bits() | Self::CENTER_VERTICAL.bits();
    }
}

impl Default for Gravity {
    fn default() -> Self {
        Self::LEFT | Self::TOP
    }
}

/// Requested extent of a node along one axis.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Dimension {
    /// Fill the parent along this axis.
    #[default]
    MatchParent,
    /// Size to the node's own content.
    WrapContent,
    /// An exact extent in tree units.
    Fixed(f64),
}

/// Layout parameters a parent uses to arrange a child.
///
/// The tree stores these verbatim; it never interprets them. They exist so that code which
/// moves nodes around can carry a node's slot configuration along with it.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LayoutParams {
    /// Horizontal extent.
    pub width: Dimension,
    /// Vertical extent.
    pub height: Dimension,
    /// Alignment within the parent.
    pub gravity: Gravity,
    /// Margins on each side; only the sides named by `gravity` are meaningful.
    pub margins: Insets,
}

impl LayoutParams {
    /// Wrap-content on both axes with the given gravity and margins.
    pub fn wrap(gravity: Gravity, margins: Insets) -> Self {
        Self {
            width: Dimension::WrapContent,
            height: Dimension::WrapContent,
            gravity,
            margins,
        }
    }
}

/// An 8-bit-per-channel RGBA color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
    /// Alpha; 255 is opaque.
    pub a: u8,
}

impl Color {
    /// Opaque white.
    pub const WHITE: Self = Self::from_rgb8(0xFF, 0xFF, 0xFF);
    /// Opaque black.
    pub const BLACK: Self = Self::from_rgb8(0x00, 0x00, 0x00);

    /// An opaque color from red, green and blue channels.
    pub const fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xFF }
    }

    /// A color from all four channels.
    pub const fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Pack as `0xAARRGGBB`.
    pub const fn to_argb32(self) -> u32 {
        (self.a as u32) << 24 | (self.r as u32) << 16 | (self.g as u32) << 8 | self.b as u32
    }
}

/// Text and background attributes of a decorator node (a label or badge).
///
/// Rendering is left to the host; the tree only stores the attributes.
#[derive(Clone, Debug, PartialEq)]
pub struct Decoration {
    /// Displayed text.
    pub text: String,
    /// Fill of the rounded background.
    pub background: Color,
    /// Text color.
    pub text_color: Color,
    /// Text size in scale-independent units.
    pub text_size: f32,
    /// Bold typeface.
    pub bold: bool,
    /// Corner radius of the background, in tree units.
    pub corner_radius: f64,
    /// Horizontal padding between text and background edge, in tree units.
    pub padding_h: f64,
}

impl Default for Decoration {
    fn default() -> Self {
        Self {
            text: String::new(),
            background: Color::from_rgb8(0xFF, 0x3B, 0x30),
            text_color: Color::WHITE,
            text_size: 12.0,
            bold: false,
            corner_radius: 8.0,
            padding_h: 5.0,
        }
    }
}

/// Interpolation curve of a [`Transition`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Easing {
    /// Constant speed.
    #[default]
    Linear,
    /// Starts fast, ends slow.
    Decelerate,
    /// Starts slow, ends fast.
    Accelerate,
}

/// A named visual transition the host should play on a node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Transition {
    /// Animate opacity from `from` to `to`.
    Fade {
        /// Starting opacity in `0.0..=1.0`.
        from: f32,
        /// Final opacity in `0.0..=1.0`.
        to: f32,
        /// Duration in milliseconds.
        duration_ms: u32,
        /// Interpolation curve.
        easing: Easing,
    },
}

impl Transition {
    /// The default show transition: 300ms decelerating fade in.
    pub const fn fade_in() -> Self {
        Self::Fade {
            from: 0.0,
            to: 1.0,
            duration_ms: 300,
            easing: Easing::Decelerate,
        }
    }

    /// The default hide transition: 300ms accelerating fade out.
    pub const fn fade_out() -> Self {
        Self::Fade {
            from: 1.0,
            to: 0.0,
            duration_ms: 300,
            easing: Easing::Accelerate,
        }
    }
}

/// Local geometry and attributes for a node.
#[derive(Clone, Debug)]
pub struct LocalNode {
    /// Local (untransformed) bounds. For non-axis-aligned content, use a conservative AABB.
    pub local_bounds: Rect,
    /// Local transform relative to parent space.
    pub local_transform: Affine,
    /// Z-order within the parent. Higher is drawn on top.
    pub z_index: i32,
    /// Visibility and bookkeeping flags.
    pub flags: NodeFlags,
    /// How the parent should arrange this node.
    pub layout: LayoutParams,
    /// Present on decorator nodes.
    pub decoration: Option<Decoration>,
}

impl Default for LocalNode {
    fn default() -> Self {
        Self {
            local_bounds: Rect::ZERO,
            local_transform: Affine::IDENTITY,
            z_index: 0,
            flags: NodeFlags::default(),
            layout: LayoutParams::default(),
            decoration: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_decoration_matches_badge_defaults() {
        let d = Decoration::default();
        assert_eq!(d.background.to_argb32(), 0xFFFF_3B30);
        assert_eq!(d.text_color, Color::WHITE);
        assert!(!d.bold, "badges default to a regular typeface");
    }

    #[test]
    fn gravity_defaults_to_top_left() {
        assert_eq!(Gravity::default(), Gravity::LEFT | Gravity::TOP);
        assert!(Gravity::CENTER.contains(Gravity::CENTER_VERTICAL));
    }
}
