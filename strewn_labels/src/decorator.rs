// Copyright 2025 the Strewn Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Decorator nodes: badge construction, frame-style positioning, and visibility control.

use kurbo::{Insets, Point, Rect, Size};
use strewn_view_tree::{
    Color, Decoration, Gravity, LayoutParams, LocalNode, NodeFlags, NodeId, Transition, Tree,
};

/// Corner of the host a badge sticks to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BadgePosition {
    /// Top-left corner, offset by both margins.
    TopLeft,
    /// Top-right corner, offset by both margins.
    #[default]
    TopRight,
    /// Bottom-left corner, offset by both margins.
    BottomLeft,
    /// Bottom-right corner, offset by both margins.
    BottomRight,
    /// Centered; margins are ignored.
    Center,
}

impl BadgePosition {
    /// Gravity and margin insets for a badge at this position.
    pub fn layout(self, margin_h: f64, margin_v: f64) -> (Gravity, Insets) {
        match self {
            Self::TopLeft => (
                Gravity::LEFT | Gravity::TOP,
                Insets::new(margin_h, margin_v, 0.0, 0.0),
            ),
            Self::TopRight => (
                Gravity::RIGHT | Gravity::TOP,
                Insets::new(0.0, margin_v, margin_h, 0.0),
            ),
            Self::BottomLeft => (
                Gravity::LEFT | Gravity::BOTTOM,
                Insets::new(margin_h, 0.0, 0.0, margin_v),
            ),
            Self::BottomRight => (
                Gravity::RIGHT | Gravity::BOTTOM,
                Insets::new(0.0, 0.0, margin_h, margin_v),
            ),
            Self::Center => (Gravity::CENTER, Insets::ZERO),
        }
    }

    /// Recover the position and its horizontal and vertical margins from a badge's layout.
    ///
    /// Inverse of [`BadgePosition::layout`]; a centered badge reports zero margins.
    pub fn from_layout(gravity: Gravity, margins: Insets) -> (Self, f64, f64) {
        if gravity.contains(Gravity::CENTER) {
            return (Self::Center, 0.0, 0.0);
        }
        let right = gravity.contains(Gravity::RIGHT);
        let bottom = gravity.contains(Gravity::BOTTOM);
        let position = match (right, bottom) {
            (false, false) => Self::TopLeft,
            (true, false) => Self::TopRight,
            (false, true) => Self::BottomLeft,
            (true, true) => Self::BottomRight,
        };
        let h = if right { margins.x1 } else { margins.x0 };
        let v = if bottom { margins.y1 } else { margins.y0 };
        (position, h, v)
    }
}

/// Text height relative to the text size.
const LINE_HEIGHT: f64 = 1.4;
/// Average glyph advance relative to the text size.
const GLYPH_ADVANCE: f64 = 0.6;

/// Builder for a badge decorator.
///
/// All lengths are in pixels; convert density-independent values before handing them in.
#[derive(Clone, Debug)]
pub struct Badge {
    decoration: Decoration,
    position: BadgePosition,
    margin_h: f64,
    margin_v: f64,
    density: f64,
}

impl Badge {
    /// A badge showing `text` with default styling.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            decoration: Decoration {
                text: text.into(),
                ..Decoration::default()
            },
            position: BadgePosition::default(),
            margin_h: 5.0,
            margin_v: 5.0,
            density: 1.0,
        }
    }

    /// A builder reproducing the style and placement of an existing decorator.
    ///
    /// `density` must be the one the decorator was built with; padding and corner radius are
    /// stored in pixels and are scaled back. Returns `None` if the node is gone or carries no
    /// decoration.
    pub fn from_decorator(tree: &Tree, decorator: Decorator, density: f64) -> Option<Self> {
        let decoration = tree.decoration(decorator.node())?;
        let layout = tree.layout_params(decorator.node())?;
        let (position, margin_h, margin_v) =
            BadgePosition::from_layout(layout.gravity, layout.margins);
        Some(Self {
            decoration: Decoration {
                corner_radius: decoration.corner_radius / density,
                padding_h: decoration.padding_h / density,
                ..decoration.clone()
            },
            position,
            margin_h,
            margin_v,
            density,
        })
    }

    /// Replace the text.
    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.decoration.text = text.into();
        self
    }

    /// Where the badge sits on its host.
    #[must_use]
    pub fn position(mut self, position: BadgePosition) -> Self {
        self.position = position;
        self
    }

    /// Horizontal and vertical distance from the chosen corner.
    #[must_use]
    pub fn margins(mut self, horizontal: f64, vertical: f64) -> Self {
        self.margin_h = horizontal;
        self.margin_v = vertical;
        self
    }

    /// Background fill.
    #[must_use]
    pub fn background(mut self, color: Color) -> Self {
        self.decoration.background = color;
        self
    }

    /// Text color.
    #[must_use]
    pub fn text_color(mut self, color: Color) -> Self {
        self.decoration.text_color = color;
        self
    }

    /// Text size in scale-independent units.
    #[must_use]
    pub fn text_size(mut self, size: f32) -> Self {
        self.decoration.text_size = size;
        self
    }

    /// Bold typeface.
    #[must_use]
    pub fn bold(mut self, bold: bool) -> Self {
        self.decoration.bold = bold;
        self
    }

    /// Display density used to turn text size, padding and corner radius into pixels.
    #[must_use]
    pub fn density(mut self, density: f64) -> Self {
        self.density = density;
        self
    }

    /// Estimated pixel size of the badge.
    ///
    /// Width is never smaller than height so short numeric badges render round.
    pub fn measure(&self) -> Size {
        let text_px = f64::from(self.decoration.text_size) * self.density;
        let height = (text_px * LINE_HEIGHT).ceil();
        #[allow(
            clippy::cast_precision_loss,
            reason = "Badge texts are short."
        )]
        let glyphs = self.decoration.text.chars().count() as f64;
        let padding = 2.0 * self.decoration.padding_h * self.density;
        let width = (glyphs * text_px * GLYPH_ADVANCE + padding).ceil().max(height);
        Size::new(width, height)
    }

    /// Insert the badge into `tree` as a hidden, detached node ready for attachment.
    pub fn build(self, tree: &mut Tree) -> Decorator {
        let size = self.measure();
        let (gravity, margins) = self.position.layout(self.margin_h, self.margin_v);
        let decoration = Decoration {
            corner_radius: self.decoration.corner_radius * self.density,
            padding_h: self.decoration.padding_h * self.density,
            ..self.decoration
        };
        let node = tree.insert(
            None,
            LocalNode {
                local_bounds: Rect::from_origin_size(Point::ZERO, size),
                flags: NodeFlags::empty(),
                layout: LayoutParams::wrap(gravity, margins),
                decoration: Some(decoration),
                ..LocalNode::default()
            },
        );
        Decorator::new(node)
    }
}

/// Place a child of `size` inside `frame` according to `layout`, frame-layout style.
pub(crate) fn arrange_in_frame(frame: Rect, layout: LayoutParams, size: Size) -> Rect {
    let g = layout.gravity;
    let m = layout.margins;
    let x = if g.contains(Gravity::CENTER_HORIZONTAL) {
        frame.x0 + (frame.width() - size.width) / 2.0 + m.x0 - m.x1
    } else if g.contains(Gravity::RIGHT) {
        frame.x1 - m.x1 - size.width
    } else {
        frame.x0 + m.x0
    };
    let y = if g.contains(Gravity::CENTER_VERTICAL) {
        frame.y0 + (frame.height() - size.height) / 2.0 + m.y0 - m.y1
    } else if g.contains(Gravity::BOTTOM) {
        frame.y1 - m.y1 - size.height
    } else {
        frame.y0 + m.y0
    };
    Rect::from_origin_size((x, y), size)
}

/// Handle to a decorator node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Decorator {
    node: NodeId,
}

impl Decorator {
    /// Wrap an existing node. The node should carry a [`Decoration`].
    pub const fn new(node: NodeId) -> Self {
        Self { node }
    }

    /// The underlying tree node.
    pub const fn node(self) -> NodeId {
        self.node
    }

    /// Whether the decorator is currently marked visible.
    pub fn is_shown(self, tree: &Tree) -> bool {
        tree.flags(self.node)
            .is_some_and(|f| f.contains(NodeFlags::VISIBLE))
    }

    /// Make the decorator visible, optionally playing `transition`.
    pub fn show(self, tree: &mut Tree, transition: Option<Transition>) {
        tree.set_visible(self.node, true);
        if let Some(t) = transition {
            tree.run_transition(self.node, t);
        }
    }

    /// Hide the decorator, optionally playing `transition`.
    pub fn hide(self, tree: &mut Tree, transition: Option<Transition>) {
        tree.set_visible(self.node, false);
        if let Some(t) = transition {
            tree.run_transition(self.node, t);
        }
    }

    /// Flip visibility; returns whether the decorator is now shown.
    pub fn toggle(
        self,
        tree: &mut Tree,
        show_transition: Option<Transition>,
        hide_transition: Option<Transition>,
    ) -> bool {
        if self.is_shown(tree) {
            self.hide(tree, hide_transition);
            false
        } else {
            self.show(tree, show_transition);
            true
        }
    }

    /// Current text, if the node is a live decorator.
    pub fn text(self, tree: &Tree) -> Option<&str> {
        tree.decoration(self.node).map(|d| d.text.as_str())
    }

    /// Replace the text.
    pub fn set_text(self, tree: &mut Tree, text: &str) {
        if let Some(d) = tree.decoration_mut(self.node) {
            d.text.clear();
            d.text.push_str(text);
        }
    }

    /// Replace the background fill.
    pub fn set_background(self, tree: &mut Tree, color: Color) {
        if let Some(d) = tree.decoration_mut(self.node) {
            d.background = color;
        }
    }

    /// Add `delta` to a numeric badge and return the new value.
    ///
    /// Text that does not parse as an integer counts as zero. Returns `None` when the node is
    /// not a live decorator.
    pub fn increment(self, tree: &mut Tree, delta: i64) -> Option<i64> {
        let d = tree.decoration_mut(self.node)?;
        let value = d.text.trim().parse::<i64>().unwrap_or(0).saturating_add(delta);
        d.text = value.to_string();
        Some(value)
    }

    /// Subtract `delta` from a numeric badge and return the new value.
    pub fn decrement(self, tree: &mut Tree, delta: i64) -> Option<i64> {
        self.increment(tree, delta.saturating_neg())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame() -> Rect {
        Rect::new(0.0, 0.0, 200.0, 100.0)
    }

    #[test]
    fn corners_respect_margins() {
        let size = Size::new(20.0, 10.0);
        let cases = [
            (BadgePosition::TopLeft, Rect::new(5.0, 3.0, 25.0, 13.0)),
            (BadgePosition::TopRight, Rect::new(175.0, 3.0, 195.0, 13.0)),
            (BadgePosition::BottomLeft, Rect::new(5.0, 87.0, 25.0, 97.0)),
            (BadgePosition::BottomRight, Rect::new(175.0, 87.0, 195.0, 97.0)),
            (BadgePosition::Center, Rect::new(90.0, 45.0, 110.0, 55.0)),
        ];
        for (position, expected) in cases {
            let (gravity, margins) = position.layout(5.0, 3.0);
            let placed = arrange_in_frame(frame(), LayoutParams::wrap(gravity, margins), size);
            assert_eq!(placed, expected, "{position:?}");
        }
    }

    #[test]
    fn frame_origin_offsets_placement() {
        let frame = Rect::new(40.0, 60.0, 240.0, 160.0);
        let (gravity, margins) = BadgePosition::TopLeft.layout(12.0, 7.0);
        let placed = arrange_in_frame(
            frame,
            LayoutParams::wrap(gravity, margins),
            Size::new(1.0, 1.0),
        );
        assert_eq!(placed.origin(), Point::new(52.0, 67.0));
    }

    #[test]
    fn measure_scales_with_density_and_stays_round() {
        let empty = Badge::new("").measure();
        assert_eq!(empty.width, empty.height, "empty badges render as a dot");
        let one = Badge::new("7").measure();
        assert!(one.width >= one.height);
        let wide = Badge::new("seven hundred").measure();
        assert!(wide.width > wide.height);
        let dense = Badge::new("seven hundred").density(2.0).measure();
        assert!(dense.height >= 2.0 * wide.height - 1.0);
    }

    #[test]
    fn built_badges_start_hidden_and_detached() {
        let mut tree = Tree::new();
        let badge = Badge::new("new")
            .position(BadgePosition::BottomLeft)
            .bold(true)
            .build(&mut tree);
        assert!(!badge.is_shown(&tree));
        assert_eq!(tree.parent_of(badge.node()), None);
        let layout = tree.layout_params(badge.node()).unwrap();
        assert_eq!(layout.gravity, Gravity::LEFT | Gravity::BOTTOM);
        assert!(tree.decoration(badge.node()).unwrap().bold);
    }

    #[test]
    fn toggle_plays_matching_transition() {
        let mut tree = Tree::new();
        let badge = Badge::new("x").build(&mut tree);
        assert!(badge.toggle(&mut tree, Some(Transition::fade_in()), None));
        assert!(badge.is_shown(&tree));
        assert!(!badge.toggle(&mut tree, None, Some(Transition::fade_out())));
        let played: Vec<_> = tree
            .commit()
            .transitions
            .into_iter()
            .map(|r| r.transition)
            .collect();
        assert_eq!(played, [Transition::fade_in(), Transition::fade_out()]);
    }

    #[test]
    fn increment_parses_or_restarts_at_zero() {
        let mut tree = Tree::new();
        let badge = Badge::new("41").build(&mut tree);
        assert_eq!(badge.increment(&mut tree, 1), Some(42));
        assert_eq!(badge.text(&tree), Some("42"));
        assert_eq!(badge.decrement(&mut tree, 50), Some(-8));

        badge.set_text(&mut tree, "new");
        assert_eq!(badge.increment(&mut tree, 3), Some(3));

        tree.remove(badge.node());
        assert_eq!(badge.increment(&mut tree, 1), None);
    }

    #[test]
    fn from_decorator_rebuilds_an_identical_badge() {
        let mut tree = Tree::new();
        let original = Badge::new("12")
            .position(BadgePosition::BottomRight)
            .margins(7.0, 9.0)
            .background(Color::BLACK)
            .text_size(14.0)
            .bold(true)
            .density(2.0)
            .build(&mut tree);

        let copy = Badge::from_decorator(&tree, original, 2.0).unwrap();
        assert_eq!(copy.position, BadgePosition::BottomRight);
        assert_eq!((copy.margin_h, copy.margin_v), (7.0, 9.0));
        let rebuilt = copy.build(&mut tree);
        assert_eq!(
            tree.decoration(rebuilt.node()),
            tree.decoration(original.node())
        );
        assert_eq!(
            tree.layout_params(rebuilt.node()),
            tree.layout_params(original.node())
        );
        assert_eq!(
            tree.local(rebuilt.node()).unwrap().local_bounds,
            tree.local(original.node()).unwrap().local_bounds
        );

        let relabeled = Badge::from_decorator(&tree, original, 2.0)
            .unwrap()
            .text("7")
            .build(&mut tree);
        assert_eq!(relabeled.text(&tree), Some("7"));
        assert!(tree.decoration(relabeled.node()).unwrap().bold);

        tree.remove(original.node());
        assert!(Badge::from_decorator(&tree, original, 2.0).is_none());
    }

    #[test]
    fn layout_round_trips_through_position() {
        for position in [
            BadgePosition::TopLeft,
            BadgePosition::TopRight,
            BadgePosition::BottomLeft,
            BadgePosition::BottomRight,
        ] {
            let (gravity, margins) = position.layout(4.0, 6.0);
            assert_eq!(
                BadgePosition::from_layout(gravity, margins),
                (position, 4.0, 6.0)
            );
        }
        let (gravity, margins) = BadgePosition::Center.layout(4.0, 6.0);
        assert_eq!(
            BadgePosition::from_layout(gravity, margins),
            (BadgePosition::Center, 0.0, 0.0)
        );
    }
}
