// Copyright 2025 the Strewn Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Engine configuration.

use strewn_view_tree::{Color, Transition};

use crate::decorator::{Badge, BadgePosition};
use crate::geometry::{Unit, dip_to_px};
use crate::region::Margins;
use crate::sample::SelectionPolicy;

/// Settings for a [`LabelEngine`](crate::LabelEngine).
///
/// Lengths (`margin_*`, `region_margins`, `obstacle_inset`) are in `unit`. Offsets of placed
/// labels are always pixels because they come from world-space geometry.
#[derive(Clone, Debug, PartialEq)]
pub struct LabelConfig {
    /// Horizontal distance of the anchor badge from its corner.
    pub margin_h: i32,
    /// Vertical distance of the anchor badge from its corner.
    pub margin_v: i32,
    /// Corner of the target the anchor badge sticks to.
    pub position: BadgePosition,
    /// Anchor badge fill; also used for labels when random colors are off.
    pub background: Color,
    /// Text color of every badge.
    pub text_color: Color,
    /// Text size of every badge, in scale-independent units.
    pub text_size: f32,
    /// Bold badge text.
    pub bold: bool,
    /// Unit of the configured lengths.
    pub unit: Unit,
    /// Display density, pixels per density-independent unit.
    pub density: f64,
    /// How labels pick a region.
    pub policy: SelectionPolicy,
    /// Insets of every region edge.
    pub region_margins: Margins,
    /// Gap kept between a clipped region and the obstacle below it.
    pub obstacle_inset: i32,
    /// Played when a badge appears.
    pub show_transition: Option<Transition>,
    /// Played when a badge is hidden.
    pub hide_transition: Option<Transition>,
    /// Give each label a random background instead of `background`.
    pub random_label_colors: bool,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            margin_h: 20,
            margin_v: 20,
            position: BadgePosition::TopRight,
            background: Color::from_rgb8(0xFF, 0x3B, 0x30),
            text_color: Color::WHITE,
            text_size: 12.0,
            bold: false,
            unit: Unit::Dip,
            density: 1.0,
            policy: SelectionPolicy::Random,
            region_margins: Margins::uniform(16),
            obstacle_inset: 16,
            show_transition: Some(Transition::fade_in()),
            hide_transition: Some(Transition::fade_out()),
            random_label_colors: true,
        }
    }
}

impl LabelConfig {
    /// Same anchor margin on both axes.
    #[must_use]
    pub fn with_margin(self, margin: i32) -> Self {
        self.with_margins(margin, margin)
    }

    /// Separate horizontal and vertical anchor margins.
    #[must_use]
    pub fn with_margins(mut self, horizontal: i32, vertical: i32) -> Self {
        self.margin_h = horizontal;
        self.margin_v = vertical;
        self
    }

    /// Corner for the anchor badge.
    #[must_use]
    pub fn with_position(mut self, position: BadgePosition) -> Self {
        self.position = position;
        self
    }

    /// Anchor badge fill.
    #[must_use]
    pub fn with_background(mut self, color: Color) -> Self {
        self.background = color;
        self
    }

    /// Text color of every badge.
    #[must_use]
    pub fn with_text_color(mut self, color: Color) -> Self {
        self.text_color = color;
        self
    }

    /// Text size of every badge.
    #[must_use]
    pub fn with_text_size(mut self, size: f32) -> Self {
        self.text_size = size;
        self
    }

    /// Bold badge text.
    #[must_use]
    pub fn with_bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }

    /// Interpret configured lengths in `unit`.
    #[must_use]
    pub fn with_unit(mut self, unit: Unit) -> Self {
        self.unit = unit;
        self
    }

    /// Display density used for [`Unit::Dip`] lengths and badge text.
    #[must_use]
    pub fn with_density(mut self, density: f64) -> Self {
        self.density = density;
        self
    }

    /// Region selection policy.
    #[must_use]
    pub fn with_policy(mut self, policy: SelectionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Insets of every region edge.
    #[must_use]
    pub fn with_region_margins(mut self, margins: Margins) -> Self {
        self.region_margins = margins;
        self
    }

    /// Gap kept above obstacles.
    #[must_use]
    pub fn with_obstacle_inset(mut self, inset: i32) -> Self {
        self.obstacle_inset = inset;
        self
    }

    /// Transitions for showing and hiding badges; `None` switches instantly.
    #[must_use]
    pub fn with_transitions(mut self, show: Option<Transition>, hide: Option<Transition>) -> Self {
        self.show_transition = show;
        self.hide_transition = hide;
        self
    }

    /// Random label backgrounds on or off.
    #[must_use]
    pub fn with_random_label_colors(mut self, random: bool) -> Self {
        self.random_label_colors = random;
        self
    }

    /// Convert a configured length to pixels.
    pub fn to_px(&self, value: i32) -> i32 {
        match self.unit {
            Unit::Pixel => value,
            Unit::Dip => dip_to_px(value, self.density),
        }
    }

    /// Region margins in pixels.
    pub fn region_margins_px(&self) -> Margins {
        Margins::new(
            self.to_px(self.region_margins.horizontal),
            self.to_px(self.region_margins.vertical),
        )
    }

    /// Obstacle inset in pixels.
    pub fn obstacle_inset_px(&self) -> i32 {
        self.to_px(self.obstacle_inset)
    }

    /// A badge styled by this configuration, without position or margins.
    pub(crate) fn styled(&self, text: &str, background: Color) -> Badge {
        Badge::new(text)
            .background(background)
            .text_color(self.text_color)
            .text_size(self.text_size)
            .bold(self.bold)
            .density(self.density)
    }

    /// The anchor badge for `message`.
    pub(crate) fn anchor_badge(&self, message: &str) -> Badge {
        self.styled(message, self.background)
            .position(self.position)
            .margins(
                f64::from(self.to_px(self.margin_h)),
                f64::from(self.to_px(self.margin_v)),
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dip_lengths_scale_with_density() {
        let config = LabelConfig::default()
            .with_density(2.5)
            .with_region_margins(Margins::new(16, 8))
            .with_obstacle_inset(3);
        assert_eq!(config.to_px(20), 50);
        assert_eq!(config.region_margins_px(), Margins::new(40, 20));
        // Truncation, not rounding.
        assert_eq!(config.obstacle_inset_px(), 7);

        let pixels = config.with_unit(Unit::Pixel);
        assert_eq!(pixels.to_px(20), 20);
        assert_eq!(pixels.region_margins_px(), Margins::new(16, 8));
    }

    #[test]
    fn builders_set_fields() {
        let config = LabelConfig::default()
            .with_margins(3, 4)
            .with_position(BadgePosition::Center)
            .with_bold(true)
            .with_policy(SelectionPolicy::RoundRobin)
            .with_transitions(None, None)
            .with_random_label_colors(false);
        assert_eq!((config.margin_h, config.margin_v), (3, 4));
        assert_eq!(config.position, BadgePosition::Center);
        assert!(config.bold);
        assert_eq!(config.policy, SelectionPolicy::RoundRobin);
        assert!(config.show_transition.is_none() && config.hide_transition.is_none());
        assert!(!config.random_label_colors);
        assert_eq!(config.with_margin(9).margin_v, 9);
    }
}
