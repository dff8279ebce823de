// Copyright 2025 the Strewn Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Attachment of decorators to arbitrary host nodes.
//!
//! A host node is wrapped at most once: the first attachment replaces it in its parent with a
//! synthetic wrapper node that takes over the host's slot (index, layout parameters, transform,
//! z-order) and holds the host as its first child. Decorators are appended after the host so
//! they draw above it. Later attachments find the wrapper in the manager's map and skip the
//! reparenting entirely.

use hashbrown::HashMap;
use kurbo::{Affine, Rect};
use smallvec::SmallVec;
use strewn_view_tree::{LocalNode, NodeFlags, NodeId, Transition, Tree};
use tracing::{debug, trace};

use crate::decorator::{Decorator, arrange_in_frame};
use crate::error::{Error, Result};

/// What a decorator is attached to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Target {
    /// A single node; its slot in the parent is taken over by the wrapper.
    Element(NodeId),
    /// One slot of a container whose children are addressed by index, such as a tab strip.
    ///
    /// The wrapper is added as an overlay spanning the whole container, and decorators are
    /// positioned within the `index`-th (non-synthetic) child's bounds.
    Indexed {
        /// The indexed container.
        container: NodeId,
        /// Child slot the decorators belong to.
        index: usize,
    },
}

impl Target {
    /// The node the wrapper is created around or on top of.
    pub const fn host(self) -> NodeId {
        match self {
            Self::Element(node) => node,
            Self::Indexed { container, .. } => container,
        }
    }
}

/// Result of a successful [`AttachmentManager::attach`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AttachOutcome {
    /// The target was wrapped by this call.
    Wrapped,
    /// The target already had a wrapper; only the decorator was added.
    AlreadyWrapped,
}

#[derive(Clone, Debug)]
struct Wrapper {
    node: NodeId,
    decorators: SmallVec<[NodeId; 4]>,
}

/// Owns the target → wrapper map and performs the reparenting.
#[derive(Clone, Debug, Default)]
pub struct AttachmentManager {
    wrappers: HashMap<Target, Wrapper>,
}

impl AttachmentManager {
    /// A manager with no wrapped targets.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach `decorator` above `target`, wrapping the target on first use.
    ///
    /// The decorator is positioned from its own layout parameters inside the target's frame,
    /// appended hidden as the wrapper's last child, then shown with `show`. A decorator already
    /// attached through this manager moves to `target` instead of being listed twice. The host
    /// node and existing wrappers are rejected as decorators.
    ///
    /// If the recorded wrapper was detached from the target by the application, its remaining
    /// decorators are removed and the target is wrapped again. On error the tree is left
    /// untouched.
    pub fn attach(
        &mut self,
        tree: &mut Tree,
        target: Target,
        decorator: Decorator,
        show: Option<Transition>,
    ) -> Result<AttachOutcome> {
        let node = decorator.node();
        if !tree.is_alive(node) || node == target.host() || self.is_wrapper(node) {
            return Err(Error::InvalidTarget(node));
        }
        let frame = frame_of(tree, target)?;

        self.forget(node);
        let stale = self
            .wrappers
            .get(&target)
            .is_some_and(|w| !is_current_wrapper(tree, target, w.node));
        if stale {
            self.discard(tree, target);
        }

        let (wrapper, outcome) = match self.wrappers.get(&target).map(|w| w.node) {
            Some(w) => {
                trace!(?target, wrapper = ?w, "target already wrapped");
                (w, AttachOutcome::AlreadyWrapped)
            }
            None => {
                let w = match target {
                    Target::Element(host) => wrap_element(tree, host)?,
                    Target::Indexed { container, .. } => overlay_container(tree, container),
                };
                debug!(?target, wrapper = ?w, "wrapped target");
                self.wrappers.insert(
                    target,
                    Wrapper {
                        node: w,
                        decorators: SmallVec::new(),
                    },
                );
                (w, AttachOutcome::Wrapped)
            }
        };

        if let Some(local) = tree.local(node) {
            let bounds = arrange_in_frame(frame, local.layout, local.local_bounds.size());
            tree.set_local_bounds(node, bounds);
        }
        tree.set_local_transform(node, Affine::IDENTITY);
        tree.set_visible(node, false);
        tree.reparent(node, Some(wrapper));
        if let Some(w) = self.wrappers.get_mut(&target) {
            w.decorators.push(node);
        }
        decorator.show(tree, show);
        Ok(outcome)
    }

    fn is_wrapper(&self, node: NodeId) -> bool {
        self.wrappers.values().any(|w| w.node == node)
    }

    /// Drop `node` from every decorator list without touching the tree.
    fn forget(&mut self, node: NodeId) {
        for wrapper in self.wrappers.values_mut() {
            wrapper.decorators.retain(|d| *d != node);
        }
    }

    /// Remove the entry for `target` along with its decorators. The wrapper node goes too once
    /// nothing else is left inside it.
    fn discard(&mut self, tree: &mut Tree, target: Target) {
        let Some(old) = self.wrappers.remove(&target) else {
            return;
        };
        for node in old.decorators {
            tree.remove(node);
        }
        if tree.is_alive(old.node) && tree.children_of(old.node).is_empty() {
            tree.remove(old.node);
        }
        debug!(?target, wrapper = ?old.node, "discarded stale wrapper");
    }

    /// Wrapper node of `target`, if it has been wrapped.
    pub fn wrapper_of(&self, target: Target) -> Option<NodeId> {
        self.wrappers.get(&target).map(|w| w.node)
    }

    /// Whether `target` has a wrapper.
    pub fn is_wrapped(&self, target: Target) -> bool {
        self.wrappers.contains_key(&target)
    }

    /// Decorators currently attached to `target`, oldest first.
    pub fn decorators_of(&self, target: Target) -> &[NodeId] {
        self.wrappers
            .get(&target)
            .map(|w| w.decorators.as_slice())
            .unwrap_or(&[])
    }

    /// Number of wrapped targets.
    pub fn len(&self) -> usize {
        self.wrappers.len()
    }

    /// Whether no target has been wrapped.
    pub fn is_empty(&self) -> bool {
        self.wrappers.is_empty()
    }

    /// Remove one decorator attached through this manager.
    ///
    /// Returns `false` (and leaves the tree alone) for nodes this manager did not attach.
    pub fn detach(&mut self, tree: &mut Tree, decorator: Decorator) -> bool {
        let node = decorator.node();
        for wrapper in self.wrappers.values_mut() {
            if let Some(pos) = wrapper.decorators.iter().position(|&d| d == node) {
                wrapper.decorators.remove(pos);
                tree.remove(node);
                return true;
            }
        }
        false
    }

    /// Remove every decorator attached to `target`, keeping the wrapper and the target in place.
    ///
    /// Returns how many live decorators were removed.
    pub fn detach_all(&mut self, tree: &mut Tree, target: Target) -> usize {
        let Some(wrapper) = self.wrappers.get_mut(&target) else {
            return 0;
        };
        let mut removed = 0;
        for node in wrapper.decorators.drain(..) {
            if tree.is_alive(node) {
                tree.remove(node);
                removed += 1;
            }
        }
        debug!(?target, removed, "detached all decorators");
        removed
    }

    /// Forget targets that no longer exist, removing their wrappers from the tree.
    ///
    /// Returns the number of entries dropped.
    pub fn prune(&mut self, tree: &mut Tree) -> usize {
        let before = self.wrappers.len();
        self.wrappers.retain(|target, wrapper| {
            let host_alive = match *target {
                Target::Element(node) => {
                    tree.is_alive(node) && tree.parent_of(node) == Some(wrapper.node)
                }
                Target::Indexed { container, .. } => tree.is_alive(container),
            };
            if host_alive && tree.is_alive(wrapper.node) {
                return true;
            }
            tree.remove(wrapper.node);
            false
        });
        before - self.wrappers.len()
    }
}

/// Rectangle, in wrapper space, that decorators of `target` are positioned in.
fn frame_of(tree: &Tree, target: Target) -> Result<Rect> {
    match target {
        Target::Element(node) => tree
            .local(node)
            .map(|l| l.local_bounds)
            .ok_or(Error::InvalidTarget(node)),
        Target::Indexed { container, index } => {
            if !tree.is_alive(container) {
                return Err(Error::InvalidTarget(container));
            }
            let slots: SmallVec<[NodeId; 8]> = tree
                .children_of(container)
                .iter()
                .copied()
                .filter(|&c| {
                    tree.flags(c)
                        .is_some_and(|f| !f.contains(NodeFlags::SYNTHETIC))
                })
                .collect();
            let slot = slots.get(index).ok_or(Error::SlotOutOfRange {
                container,
                index,
                len: slots.len(),
            })?;
            tree.bounds_in_parent(*slot)
                .ok_or(Error::InvalidTarget(*slot))
        }
    }
}

fn is_current_wrapper(tree: &Tree, target: Target, wrapper: NodeId) -> bool {
    if !tree.is_alive(wrapper) {
        return false;
    }
    match target {
        Target::Element(node) => tree.parent_of(node) == Some(wrapper),
        Target::Indexed { container, .. } => tree.parent_of(wrapper) == Some(container),
    }
}

/// Replace `node` in its parent with a wrapper that inherits its slot, then move it inside.
fn wrap_element(tree: &mut Tree, node: NodeId) -> Result<NodeId> {
    let (bounds, transform, z_index, layout) = tree
        .local(node)
        .map(|l| (l.local_bounds, l.local_transform, l.z_index, l.layout))
        .ok_or(Error::InvalidTarget(node))?;
    let wrapper_local = LocalNode {
        local_bounds: bounds,
        local_transform: transform,
        z_index,
        flags: NodeFlags::VISIBLE | NodeFlags::SYNTHETIC,
        layout,
        decoration: None,
    };
    let wrapper = match (tree.parent_of(node), tree.index_in_parent(node)) {
        (Some(parent), Some(index)) => {
            tree.reparent(node, None);
            tree.insert_at(parent, index, wrapper_local)
        }
        _ => tree.insert(None, wrapper_local),
    };
    tree.reparent(node, Some(wrapper));
    // The wrapper carries the transform and z-order now.
    tree.set_local_transform(node, Affine::IDENTITY);
    tree.set_z_index(node, 0);
    Ok(wrapper)
}

/// Add an overlay spanning `container` as its last child.
fn overlay_container(tree: &mut Tree, container: NodeId) -> NodeId {
    let bounds = tree
        .local(container)
        .map(|l| l.local_bounds)
        .unwrap_or(Rect::ZERO);
    tree.insert(
        Some(container),
        LocalNode {
            local_bounds: bounds,
            flags: NodeFlags::VISIBLE | NodeFlags::SYNTHETIC,
            ..LocalNode::default()
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decorator::{Badge, BadgePosition};
    use kurbo::{Insets, Vec2};
    use strewn_view_tree::{Dimension, Gravity, LayoutParams};

    struct Scene {
        tree: Tree,
        root: NodeId,
        before: NodeId,
        target: NodeId,
        after: NodeId,
        params: LayoutParams,
    }

    fn scene() -> Scene {
        let mut tree = Tree::new();
        let root = tree.insert(
            None,
            LocalNode {
                local_bounds: Rect::new(0.0, 0.0, 400.0, 400.0),
                ..LocalNode::default()
            },
        );
        let before = tree.insert(Some(root), LocalNode::default());
        let params = LayoutParams {
            width: Dimension::Fixed(100.0),
            height: Dimension::WrapContent,
            gravity: Gravity::CENTER,
            margins: Insets::uniform(4.0),
        };
        let target = tree.insert(
            Some(root),
            LocalNode {
                local_bounds: Rect::new(0.0, 0.0, 100.0, 40.0),
                local_transform: Affine::translate(Vec2::new(30.0, 60.0)),
                z_index: 3,
                layout: params,
                ..LocalNode::default()
            },
        );
        let after = tree.insert(Some(root), LocalNode::default());
        let _ = tree.commit();
        Scene {
            tree,
            root,
            before,
            target,
            after,
            params,
        }
    }

    #[test]
    fn double_attach_wraps_once_and_keeps_slot() {
        let Scene {
            mut tree,
            root,
            before,
            target,
            after,
            params,
        } = scene();
        let world_before = tree.world_bounds(target).unwrap();
        let mut manager = AttachmentManager::new();

        let a = Badge::new("1").build(&mut tree);
        let b = Badge::new("2").build(&mut tree);
        let first = manager
            .attach(&mut tree, Target::Element(target), a, None)
            .unwrap();
        let second = manager
            .attach(&mut tree, Target::Element(target), b, None)
            .unwrap();
        assert_eq!(first, AttachOutcome::Wrapped);
        assert_eq!(second, AttachOutcome::AlreadyWrapped);

        let wrapper = manager.wrapper_of(Target::Element(target)).unwrap();
        assert_eq!(tree.children_of(root), &[before, wrapper, after]);
        assert_eq!(tree.children_of(wrapper), &[target, a.node(), b.node()]);
        assert_eq!(tree.parent_of(wrapper), Some(root), "no nested wrappers");
        assert_eq!(tree.layout_params(wrapper), Some(params));
        assert_eq!(tree.layout_params(target), Some(params));
        assert_eq!(tree.z_index(wrapper), Some(3));
        assert!(tree.flags(wrapper).unwrap().contains(NodeFlags::SYNTHETIC));
        assert_eq!(manager.len(), 1);

        let _ = tree.commit();
        assert_eq!(tree.world_bounds(target), Some(world_before));
    }

    #[test]
    fn decorator_is_positioned_and_shown() {
        let Scene {
            mut tree, target, ..
        } = scene();
        let mut manager = AttachmentManager::new();
        let badge = Badge::new("")
            .position(BadgePosition::TopRight)
            .margins(5.0, 5.0)
            .build(&mut tree);
        let size = tree.local(badge.node()).unwrap().local_bounds.size();
        manager
            .attach(
                &mut tree,
                Target::Element(target),
                badge,
                Some(Transition::fade_in()),
            )
            .unwrap();

        assert!(badge.is_shown(&tree));
        let local = tree.local(badge.node()).unwrap().local_bounds;
        assert_eq!(local.x1, 95.0);
        assert_eq!(local.y0, 5.0);
        assert_eq!(local.size(), size);

        let damage = tree.commit();
        assert_eq!(damage.transitions.len(), 1);
        let world = tree.world_bounds(badge.node()).unwrap();
        assert_eq!((world.x1, world.y0), (125.0, 65.0));
    }

    #[test]
    fn dead_target_is_rejected_without_mutation() {
        let Scene {
            mut tree,
            root,
            target,
            ..
        } = scene();
        let mut manager = AttachmentManager::new();
        tree.remove(target);
        let children = tree.children_of(root).to_vec();

        let badge = Badge::new("x").build(&mut tree);
        let err = manager
            .attach(&mut tree, Target::Element(target), badge, None)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidTarget(id) if id == target));
        assert_eq!(tree.children_of(root), children.as_slice());
        assert_eq!(tree.parent_of(badge.node()), None);
        assert!(manager.is_empty());
    }

    #[test]
    fn root_targets_get_a_root_wrapper() {
        let mut tree = Tree::new();
        let lonely = tree.insert(
            None,
            LocalNode {
                local_bounds: Rect::new(0.0, 0.0, 10.0, 10.0),
                ..LocalNode::default()
            },
        );
        let mut manager = AttachmentManager::new();
        let badge = Badge::new("x").build(&mut tree);
        manager
            .attach(&mut tree, Target::Element(lonely), badge, None)
            .unwrap();
        let wrapper = manager.wrapper_of(Target::Element(lonely)).unwrap();
        assert_eq!(tree.parent_of(wrapper), None);
        assert_eq!(tree.parent_of(lonely), Some(wrapper));
    }

    #[test]
    fn indexed_target_overlays_container() {
        let mut tree = Tree::new();
        let strip = tree.insert(
            None,
            LocalNode {
                local_bounds: Rect::new(0.0, 0.0, 300.0, 48.0),
                ..LocalNode::default()
            },
        );
        let tabs: Vec<NodeId> = (0..3_u32)
            .map(|i| {
                tree.insert(
                    Some(strip),
                    LocalNode {
                        local_bounds: Rect::new(0.0, 0.0, 100.0, 48.0),
                        local_transform: Affine::translate(Vec2::new(f64::from(i) * 100.0, 0.0)),
                        ..LocalNode::default()
                    },
                )
            })
            .collect();
        let mut manager = AttachmentManager::new();
        let target = Target::Indexed {
            container: strip,
            index: 1,
        };

        let badge = Badge::new("")
            .position(BadgePosition::TopLeft)
            .margins(2.0, 3.0)
            .build(&mut tree);
        let outcome = manager.attach(&mut tree, target, badge, None).unwrap();
        assert_eq!(outcome, AttachOutcome::Wrapped);

        let overlay = manager.wrapper_of(target).unwrap();
        assert_eq!(tree.children_of(strip)[..3], tabs[..]);
        assert_eq!(tree.children_of(strip).last(), Some(&overlay));
        assert_eq!(
            tree.local(overlay).unwrap().local_bounds,
            Rect::new(0.0, 0.0, 300.0, 48.0)
        );
        let local = tree.local(badge.node()).unwrap().local_bounds;
        assert_eq!((local.x0, local.y0), (102.0, 3.0));

        // The overlay is synthetic, so slot 2 is still the third tab.
        let again = Badge::new("").build(&mut tree);
        let outcome = manager
            .attach(
                &mut tree,
                Target::Indexed {
                    container: strip,
                    index: 2,
                },
                again,
                None,
            )
            .unwrap();
        assert_eq!(outcome, AttachOutcome::Wrapped);

        let third = Badge::new("").build(&mut tree);
        assert_eq!(
            manager.attach(&mut tree, target, third, None).unwrap(),
            AttachOutcome::AlreadyWrapped
        );

        let missing = Badge::new("").build(&mut tree);
        let err = manager
            .attach(
                &mut tree,
                Target::Indexed {
                    container: strip,
                    index: 3,
                },
                missing,
                None,
            )
            .unwrap_err();
        assert!(matches!(err, Error::SlotOutOfRange { len: 3, .. }));
    }

    #[test]
    fn detach_all_keeps_wrapper_and_target() {
        let Scene {
            mut tree, target, ..
        } = scene();
        let mut manager = AttachmentManager::new();
        let t = Target::Element(target);
        let badges: Vec<Decorator> = (0..3)
            .map(|i| Badge::new(i.to_string()).build(&mut tree))
            .collect();
        for &b in &badges {
            manager.attach(&mut tree, t, b, None).unwrap();
        }
        assert_eq!(manager.decorators_of(t).len(), 3);

        assert!(manager.detach(&mut tree, badges[0]));
        assert!(!manager.detach(&mut tree, badges[0]));
        assert_eq!(manager.detach_all(&mut tree, t), 2);
        assert_eq!(manager.detach_all(&mut tree, t), 0);

        let wrapper = manager.wrapper_of(t).unwrap();
        assert!(badges.iter().all(|b| !tree.is_alive(b.node())));
        assert_eq!(tree.children_of(wrapper), &[target]);
        assert!(tree.is_shown(target));
    }

    #[test]
    fn prune_drops_wrappers_of_removed_targets() {
        let Scene {
            mut tree, target, ..
        } = scene();
        let mut manager = AttachmentManager::new();
        let badge = Badge::new("x").build(&mut tree);
        manager
            .attach(&mut tree, Target::Element(target), badge, None)
            .unwrap();
        let wrapper = manager.wrapper_of(Target::Element(target)).unwrap();
        assert_eq!(manager.prune(&mut tree), 0);

        tree.remove(target);
        assert_eq!(manager.prune(&mut tree), 1);
        assert!(!tree.is_alive(wrapper));
        assert!(!tree.is_alive(badge.node()));
        assert!(!manager.is_wrapped(Target::Element(target)));
    }

    #[test]
    fn rewrapping_a_moved_target_removes_old_decorators() {
        let Scene {
            mut tree,
            root,
            target,
            ..
        } = scene();
        let mut manager = AttachmentManager::new();
        let t = Target::Element(target);
        let old = Badge::new("old").build(&mut tree);
        manager.attach(&mut tree, t, old, None).unwrap();
        let old_wrapper = manager.wrapper_of(t).unwrap();

        // The application moves the target out of its wrapper.
        tree.reparent(target, Some(root));
        let new = Badge::new("new").build(&mut tree);
        assert_eq!(
            manager.attach(&mut tree, t, new, None).unwrap(),
            AttachOutcome::Wrapped
        );

        assert!(!tree.is_alive(old.node()));
        assert!(!tree.is_alive(old_wrapper));
        assert_eq!(manager.decorators_of(t), &[new.node()]);
        assert_eq!(manager.detach_all(&mut tree, t), 1);
        let wrapper = manager.wrapper_of(t).unwrap();
        assert_eq!(tree.children_of(wrapper), &[target]);
        assert_eq!(manager.len(), 1);
    }

    #[test]
    fn repeated_decorator_is_listed_once() {
        let Scene {
            mut tree, target, ..
        } = scene();
        let mut manager = AttachmentManager::new();
        let t = Target::Element(target);
        let badge = Badge::new("x").build(&mut tree);
        manager.attach(&mut tree, t, badge, None).unwrap();
        assert_eq!(
            manager.attach(&mut tree, t, badge, None).unwrap(),
            AttachOutcome::AlreadyWrapped
        );
        assert_eq!(manager.decorators_of(t), &[badge.node()]);

        let wrapper = manager.wrapper_of(t).unwrap();
        assert_eq!(tree.children_of(wrapper), &[target, badge.node()]);
        assert_eq!(manager.detach_all(&mut tree, t), 1);
        assert!(!manager.detach(&mut tree, badge));
    }

    #[test]
    fn decorator_moves_between_targets() {
        let Scene {
            mut tree,
            target,
            after,
            ..
        } = scene();
        let mut manager = AttachmentManager::new();
        let badge = Badge::new("x").build(&mut tree);
        manager
            .attach(&mut tree, Target::Element(target), badge, None)
            .unwrap();
        manager
            .attach(&mut tree, Target::Element(after), badge, None)
            .unwrap();
        assert!(manager.decorators_of(Target::Element(target)).is_empty());
        assert_eq!(manager.decorators_of(Target::Element(after)), &[badge.node()]);
        assert_eq!(manager.detach_all(&mut tree, Target::Element(target)), 0);
        assert!(tree.is_alive(badge.node()));
    }

    #[test]
    fn host_and_wrappers_cannot_decorate() {
        let Scene {
            mut tree,
            root,
            target,
            ..
        } = scene();
        let mut manager = AttachmentManager::new();
        let t = Target::Element(target);
        let children = tree.children_of(root).to_vec();

        let err = manager
            .attach(&mut tree, t, Decorator::new(target), None)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidTarget(id) if id == target));
        assert!(manager.is_empty());
        assert_eq!(tree.children_of(root), children.as_slice());

        let badge = Badge::new("x").build(&mut tree);
        manager.attach(&mut tree, t, badge, None).unwrap();
        let wrapper = manager.wrapper_of(t).unwrap();
        let err = manager
            .attach(&mut tree, t, Decorator::new(wrapper), None)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidTarget(id) if id == wrapper));
        assert_eq!(manager.decorators_of(t), &[badge.node()]);
        assert!(tree.is_shown(target));
    }
}
