// Copyright 2025 the Strewn Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Strewn Labels: scatter text badges around a focal element without covering obstacles.
//!
//! The engine works on a [`strewn_view_tree::Tree`]. Given a target node whose bounds have been
//! committed, it:
//!
//! - attaches an anchor badge to the target, wrapping the target in a synthetic node that takes
//!   over its slot so the surrounding layout is not disturbed;
//! - splits the target's bounds into four regions around a focal rectangle (the anchor, or any
//!   node passed to [`LabelEngine::set_focal`]);
//! - places each new label at a random point of one region, after pulling the region's bottom
//!   edge above every registered obstacle whose top lies above that edge.
//!
//! Randomness is injected. Any [`rand::RngCore`] works, so a seeded
//! [`rand::rngs::StdRng`] reproduces a layout exactly, and [`SequenceSource`] scripts the draws.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::Rect;
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//! use strewn_labels::{IntRect, LabelConfig, LabelEngine};
//! use strewn_view_tree::{LocalNode, Tree};
//!
//! let mut tree = Tree::new();
//! let screen = tree.insert(
//!     None,
//!     LocalNode {
//!         local_bounds: Rect::new(0.0, 0.0, 300.0, 500.0),
//!         ..LocalNode::default()
//!     },
//! );
//! // Geometry is only valid after a commit.
//! let _ = tree.commit();
//!
//! let mut engine = LabelEngine::setup(
//!     &mut tree,
//!     screen,
//!     "hello",
//!     LabelConfig::default(),
//!     StdRng::seed_from_u64(7),
//! )
//! .unwrap();
//! engine.register_obstacle(IntRect::new(0, 440, 300, 500));
//!
//! let handle = engine.add_label(&mut tree, "world").unwrap();
//! let label = engine.labels().get(handle).unwrap();
//! assert!(engine.container().contains(label.x, label.y));
//!
//! assert_eq!(engine.clear(&mut tree), 1);
//! assert!(engine.anchor().is_shown(&tree));
//! ```
//!
//! ## Errors
//!
//! Only precondition violations surface as [`Error`]: stale nodes ([`Error::InvalidTarget`])
//! and geometry read before a commit ([`Error::NotReady`]). A placement that finds no room
//! falls back to the container origin and is counted by
//! [`LabelEngine::degenerate_placements`].
//!
//! ## Lower-level pieces
//!
//! [`partition`], [`clip`] and [`Sampler`] are usable on their own with plain [`IntRect`]s.
//! [`AttachmentManager`] and [`Badge`] attach decorators to any node, including single slots of
//! indexed containers via [`Target::Indexed`].

mod attach;
mod avoid;
mod config;
mod decorator;
mod engine;
mod error;
mod geometry;
mod region;
mod registry;
mod sample;

pub use attach::{AttachOutcome, AttachmentManager, Target};
pub use avoid::{Obstacles, clip};
pub use config::LabelConfig;
pub use decorator::{Badge, BadgePosition, Decorator};
pub use engine::LabelEngine;
pub use error::{Error, Result};
pub use geometry::{IntRect, Unit, clip_below, dip_to_px, intersects};
pub use region::{Margins, Region, Regions, partition};
pub use registry::{LabelHandle, LabelRecord, LabelRegistry};
pub use sample::{Placement, RandomSource, Sampler, SelectionPolicy, SequenceSource};
