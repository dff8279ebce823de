// Copyright 2025 the Strewn Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The label engine: one anchor badge on a target, plus any number of labels scattered around
//! a focal rectangle without covering registered obstacles.

use rand::rngs::StdRng;
use strewn_view_tree::{Color, NodeId, Tree};
use tracing::debug;

use crate::attach::{AttachOutcome, AttachmentManager, Target};
use crate::avoid::Obstacles;
use crate::config::LabelConfig;
use crate::decorator::{Badge, BadgePosition, Decorator};
use crate::error::{Error, Result};
use crate::geometry::IntRect;
use crate::region::{Regions, partition};
use crate::registry::{LabelHandle, LabelRecord, LabelRegistry};
use crate::sample::{RandomSource, SelectionPolicy, Sampler};

/// Places labels around a focal rectangle inside a target's bounds.
///
/// The container is the target's committed world bounds, read once by [`LabelEngine::setup`].
/// The focal rectangle starts out as the anchor badge and can be moved with
/// [`LabelEngine::set_focal`]. All labels are attached to the target through one wrapper, so
/// the target keeps its place in the host layout.
#[derive(Debug)]
pub struct LabelEngine<R = StdRng> {
    config: LabelConfig,
    target: NodeId,
    anchor: Decorator,
    container: IntRect,
    focal: IntRect,
    regions: Regions,
    obstacles: Obstacles,
    sampler: Sampler,
    attachments: AttachmentManager,
    labels: LabelRegistry,
    rng: R,
}

impl<R: RandomSource> LabelEngine<R> {
    /// Show an anchor badge reading `message` on `target` and compute the placement regions.
    ///
    /// `target` must have been committed with non-empty bounds; otherwise this fails with
    /// [`Error::NotReady`] and the tree is left unchanged.
    pub fn setup(
        tree: &mut Tree,
        target: NodeId,
        message: &str,
        config: LabelConfig,
        rng: R,
    ) -> Result<Self> {
        let bounds = tree
            .world_bounds(target)
            .ok_or(Error::InvalidTarget(target))?;
        if bounds.is_zero_area() {
            return Err(Error::NotReady(target));
        }
        let host_transform = tree
            .world_transform(target)
            .ok_or(Error::InvalidTarget(target))?;
        let container = IntRect::from_kurbo(bounds);

        let mut attachments = AttachmentManager::new();
        let anchor = config.anchor_badge(message).build(tree);
        if let Err(e) = attachments.attach(
            tree,
            Target::Element(target),
            anchor,
            config.show_transition,
        ) {
            tree.remove(anchor.node());
            return Err(e);
        }

        // The wrapper inherited the target's transform, so the anchor's local bounds live in
        // the target's pre-wrap coordinate space.
        let anchor_local = tree
            .local(anchor.node())
            .map(|l| l.local_bounds)
            .ok_or(Error::InvalidTarget(anchor.node()))?;
        let focal = IntRect::from_kurbo(host_transform.transform_rect_bbox(anchor_local));
        let regions = partition(container, focal, config.region_margins_px());
        debug!(?container, ?focal, policy = ?config.policy, "label engine ready");

        Ok(Self {
            sampler: Sampler::new(config.policy),
            config,
            target,
            anchor,
            container,
            focal,
            regions,
            obstacles: Obstacles::new(),
            attachments,
            labels: LabelRegistry::new(),
            rng,
        })
    }

    /// Move the focal rectangle to the committed world bounds of `node` and recompute regions.
    ///
    /// On error the previous regions stay in effect.
    pub fn set_focal(&mut self, tree: &Tree, node: NodeId) -> Result<()> {
        let bounds = tree.world_bounds(node).ok_or(Error::InvalidTarget(node))?;
        if bounds.is_zero_area() {
            return Err(Error::NotReady(node));
        }
        self.focal = IntRect::from_kurbo(bounds);
        self.regions = partition(self.container, self.focal, self.config.region_margins_px());
        debug!(focal = ?self.focal, "regions recomputed");
        Ok(())
    }

    /// Keep labels from covering `rect`, converting it to pixels first.
    pub fn register_obstacle(&mut self, rect: IntRect) {
        let rect = rect.to_pixels(self.config.density);
        debug!(?rect, total = self.obstacles.len() + 1, "obstacle registered");
        self.obstacles.register(rect);
    }

    /// Register the committed world bounds of `node` as an obstacle.
    pub fn register_obstacle_node(&mut self, tree: &Tree, node: NodeId) -> Result<()> {
        let bounds = tree.world_bounds(node).ok_or(Error::InvalidTarget(node))?;
        if bounds.is_zero_area() {
            return Err(Error::NotReady(node));
        }
        self.register_obstacle(IntRect::from_kurbo(bounds));
        Ok(())
    }

    /// Place a label reading `message` at a random free point and attach it to the target.
    ///
    /// Labels copy the anchor badge's current style, so restyling the anchor restyles every
    /// later label. Without an anchor they fall back to the configured style.
    pub fn add_label(&mut self, tree: &mut Tree, message: &str) -> Result<LabelHandle> {
        if !tree.is_alive(self.target) {
            return Err(Error::InvalidTarget(self.target));
        }
        let inset = self.config.obstacle_inset_px();
        let placement = self.sampler.sample(
            &self.regions,
            self.container,
            self.obstacles.as_slice(),
            inset,
            &mut self.rng,
        );
        let background = if self.config.random_label_colors {
            random_color(&mut self.rng)
        } else {
            self.config.background
        };

        let decorator = Badge::from_decorator(tree, self.anchor, self.config.density)
            .unwrap_or_else(|| self.config.styled("", background))
            .text(message)
            .background(background)
            .position(BadgePosition::TopLeft)
            .margins(f64::from(placement.x), f64::from(placement.y))
            .build(tree);
        if let Err(e) = self.attachments.attach(
            tree,
            Target::Element(self.target),
            decorator,
            self.config.show_transition,
        ) {
            tree.remove(decorator.node());
            return Err(e);
        }

        Ok(self.labels.register(LabelRecord {
            message: message.into(),
            background,
            x: placement.x,
            y: placement.y,
            region: placement.region,
            decorator,
        }))
    }

    /// Attach an arbitrary decorator through the engine's attachment manager.
    ///
    /// Uses the configured show transition. Decorators attached this way are not labels and
    /// survive [`LabelEngine::clear`].
    pub fn attach(
        &mut self,
        tree: &mut Tree,
        target: Target,
        decorator: Decorator,
    ) -> Result<AttachOutcome> {
        self.attachments
            .attach(tree, target, decorator, self.config.show_transition)
    }

    /// Flip a label's visibility with the configured transitions.
    ///
    /// Returns the new visibility, or `None` for unknown handles.
    pub fn toggle_label(&self, tree: &mut Tree, handle: LabelHandle) -> Option<bool> {
        let record = self.labels.get(handle)?;
        Some(record.decorator.toggle(
            tree,
            self.config.show_transition,
            self.config.hide_transition,
        ))
    }

    /// Remove every label added since setup or the last clear. The anchor stays.
    pub fn clear(&mut self, tree: &mut Tree) -> usize {
        self.labels.clear(tree, &mut self.attachments)
    }

    /// Remove every decorator on the target, the anchor badge included.
    ///
    /// The target stays in its wrapper at its original slot. Returns the number of decorators
    /// removed.
    pub fn detach_all(&mut self, tree: &mut Tree) -> usize {
        let removed = self
            .attachments
            .detach_all(tree, Target::Element(self.target));
        self.labels.clear(tree, &mut self.attachments);
        removed
    }

    /// The target the engine was set up on.
    pub fn target(&self) -> NodeId {
        self.target
    }

    /// The anchor badge.
    pub fn anchor(&self) -> Decorator {
        self.anchor
    }

    /// Container rectangle in world pixels.
    pub fn container(&self) -> IntRect {
        self.container
    }

    /// Focal rectangle in world pixels.
    pub fn focal(&self) -> IntRect {
        self.focal
    }

    /// Current region templates.
    pub fn regions(&self) -> &Regions {
        &self.regions
    }

    /// Registered obstacles, in pixels.
    pub fn obstacles(&self) -> &[IntRect] {
        self.obstacles.as_slice()
    }

    /// Active region selection policy.
    pub fn policy(&self) -> SelectionPolicy {
        self.sampler.policy()
    }

    /// Labels placed since setup or the last clear.
    pub fn labels(&self) -> &LabelRegistry {
        &self.labels
    }

    /// Number of placements that found no room and fell back to the container origin.
    pub fn degenerate_placements(&self) -> u64 {
        self.sampler.degenerate_placements()
    }

    /// The attachment manager, for wrapper lookups.
    pub fn attachments(&self) -> &AttachmentManager {
        &self.attachments
    }

    /// The engine configuration.
    pub fn config(&self) -> &LabelConfig {
        &self.config
    }
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "Unit values scale into 0..255."
)]
fn random_color(rng: &mut impl RandomSource) -> Color {
    let mut channel = || (rng.next_unit() * 255.0) as u8;
    Color::from_rgb8(channel(), channel(), channel())
}
