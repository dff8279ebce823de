// Copyright 2025 the Strewn Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Strewn View Tree: a small, Kurbo-native host tree for overlay decorations.
//!
//! This crate stands in for the view system of a UI toolkit. It gives libraries that decorate
//! an existing UI (badges, labels, hints) the handful of capabilities they need:
//!
//! - A hierarchy of nodes with ordered children, addressed by generational [`NodeId`]s.
//! - Per-node local geometry (bounds and an affine transform) and a [`Tree::commit`] step that
//!   computes world-space transforms and bounds, standing in for the host's layout pass.
//! - Opaque [`LayoutParams`] that travel with a node when it is moved between parents.
//! - Visibility via [`NodeFlags`], [`Decoration`] attributes for text badges, and named
//!   [`Transition`]s that the host plays after a commit.
//!
//! ## Not a layout engine
//!
//! The tree never measures or arranges anything. [`LayoutParams`] are stored verbatim and
//! world bounds are derived purely from local bounds and transforms. Callers compute positions
//! with whatever layout system they like and write the results into the tree.
//!
//! ## Readiness
//!
//! World-space data is only valid after a commit. Nodes inserted since the last commit report
//! [`kurbo::Rect::ZERO`] world bounds, which is how callers detect that a layout pass is still
//! pending.
//!
//! ## API overview
//!
//! - [`Tree::insert`] / [`Tree::insert_at`] → [`NodeId`]
//! - [`Tree::remove`], [`Tree::reparent`], [`Tree::reparent_at`]
//! - [`Tree::set_local_bounds`] / [`Tree::set_local_transform`] / [`Tree::set_layout_params`] /
//!   [`Tree::set_visible`] / [`Tree::set_decoration`]
//! - [`Tree::run_transition`] queues a [`Transition`]; [`Tree::commit`] returns it in [`Damage`].
//! - [`Tree::world_bounds`], [`Tree::parent_of`], [`Tree::index_in_parent`],
//!   [`Tree::children_of`], [`Tree::is_shown`].
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod damage;
mod tree;
mod types;

pub use damage::{Damage, TransitionRequest};
pub use tree::Tree;
pub use types::{
    Color, Decoration, Dimension, Easing, Gravity, LayoutParams, LocalNode, NodeFlags, NodeId,
    Transition,
};
