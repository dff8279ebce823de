// Copyright 2025 the Strewn Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core tree implementation: structure, updates, queries.

use alloc::{vec, vec::Vec};
use kurbo::{Affine, Rect};
use smallvec::SmallVec;

use crate::damage::{Damage, TransitionRequest};
use crate::types::{Decoration, LayoutParams, LocalNode, NodeFlags, NodeId, Transition};

/// Top-level view tree.
///
/// Changes to local node data (bounds, transform, flags) do **not** change
/// world-space data immediately. World transforms and bounds are recomputed
/// when [`Tree::commit`] is called, which plays the role of the host's layout
/// pass: until the first commit after a node is inserted, its world bounds are
/// [`Rect::ZERO`].
///
/// ## Example
///
/// ```rust
/// use kurbo::{Affine, Rect, Vec2};
/// use strewn_view_tree::{LocalNode, Tree};
///
/// let mut tree = Tree::new();
/// let screen = tree.insert(
///     None,
///     LocalNode {
///         local_bounds: Rect::new(0.0, 0.0, 320.0, 480.0),
///         ..LocalNode::default()
///     },
/// );
/// let button = tree.insert(
///     Some(screen),
///     LocalNode {
///         local_bounds: Rect::new(0.0, 0.0, 80.0, 32.0),
///         local_transform: Affine::translate(Vec2::new(40.0, 400.0)),
///         ..LocalNode::default()
///     },
/// );
/// // No layout pass yet.
/// assert_eq!(tree.world_bounds(button), Some(Rect::ZERO));
///
/// let _ = tree.commit();
/// assert_eq!(
///     tree.world_bounds(button),
///     Some(Rect::new(40.0, 400.0, 120.0, 432.0))
/// );
/// ```
pub struct Tree {
    /// slots
    nodes: Vec<Option<Node>>,
    /// last generation per slot (persists across frees)
    generations: Vec<u32>,
    free_list: Vec<usize>,
    epoch: u64,
    pending_transitions: Vec<TransitionRequest>,
}

impl core::fmt::Debug for Tree {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let live = self.nodes.iter().flatten().count();
        let roots = self
            .nodes
            .iter()
            .flatten()
            .filter(|n| n.parent.is_none())
            .count();
        f.debug_struct("Tree")
            .field("live", &live)
            .field("roots", &roots)
            .field("slots", &self.nodes.len())
            .field("epoch", &self.epoch)
            .field("pending_transitions", &self.pending_transitions.len())
            .finish_non_exhaustive()
    }
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Debug, Default)]
struct WorldNode {
    world_transform: Affine,
    world_bounds: Rect,
}

#[derive(Clone, Debug)]
struct Node {
    generation: u32,
    parent: Option<NodeId>,
    children: SmallVec<[NodeId; 4]>,
    local: LocalNode,
    world: WorldNode,
}

impl Node {
    fn new(generation: u32, local: LocalNode) -> Self {
        Self {
            generation,
            parent: None,
            children: SmallVec::new(),
            local,
            world: WorldNode::default(),
        }
    }
}

impl Tree {
    /// Create a new empty tree.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            epoch: 0,
            pending_transitions: Vec::new(),
        }
    }

    /// Insert a new node as the last child of `parent` (or as a root if `None`).
    ///
    /// The returned [`NodeId`] becomes live immediately, but world-space data
    /// is only computed on the next call to [`Tree::commit`]. A stale `parent`
    /// inserts the node as a root.
    pub fn insert(&mut self, parent: Option<NodeId>, local: LocalNode) -> NodeId {
        let id = self.alloc(local);
        if let Some(p) = parent
            && self.is_alive(p)
        {
            let end = self.node(p).children.len();
            self.link_parent(id, p, end);
        }
        id
    }

    /// Insert a new node as a child of `parent` at position `index`.
    ///
    /// `index` is clamped to the current number of children, so any index past
    /// the end appends.
    pub fn insert_at(&mut self, parent: NodeId, index: usize, local: LocalNode) -> NodeId {
        let id = self.alloc(local);
        if self.is_alive(parent) {
            let index = index.min(self.node(parent).children.len());
            self.link_parent(id, parent, index);
        }
        id
    }

    fn alloc(&mut self, local: LocalNode) -> NodeId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(Node::new(generation, local));
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId uses 32-bit indices by design."
            )]
            (idx as u32, generation)
        } else {
            let generation = 1_u32;
            self.nodes.push(Some(Node::new(generation, local)));
            self.generations.push(generation);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId uses 32-bit indices by design."
            )]
            ((self.nodes.len() - 1) as u32, generation)
        };
        NodeId::new(idx, generation)
    }

    /// Remove a node (and its subtree) from the tree.
    ///
    /// The node and its descendants become stale immediately.
    pub fn remove(&mut self, id: NodeId) {
        if !self.is_alive(id) {
            return;
        }
        if let Some(parent) = self.node(id).parent {
            self.unlink_parent(id, parent);
        }
        let children = self.node(id).children.clone();
        for child in children {
            self.remove(child);
        }
        self.nodes[id.idx()] = None;
        self.free_list.push(id.idx());
    }

    /// Reparent `id` as the last child of `new_parent`, or detach it as a root if `None`.
    ///
    /// Moving a node under itself or one of its descendants is ignored.
    pub fn reparent(&mut self, id: NodeId, new_parent: Option<NodeId>) {
        let index = new_parent
            .filter(|p| self.is_alive(*p))
            .map(|p| self.node(p).children.len())
            .unwrap_or(0);
        self.reparent_at(id, new_parent, index);
    }

    /// Reparent `id` under `new_parent` at child position `index` (clamped).
    ///
    /// With `None`, the node is detached and becomes a root; `index` is ignored.
    /// Moving a node under itself or one of its descendants is ignored, as is a
    /// stale `new_parent`.
    pub fn reparent_at(&mut self, id: NodeId, new_parent: Option<NodeId>, index: usize) {
        if !self.is_alive(id) {
            return;
        }
        if let Some(p) = new_parent
            && (!self.is_alive(p) || self.is_ancestor_or_self(id, p))
        {
            return;
        }
        if let Some(parent) = self.node(id).parent {
            self.unlink_parent(id, parent);
        }
        if let Some(p) = new_parent {
            let index = index.min(self.node(p).children.len());
            self.link_parent(id, p, index);
        }
    }

    /// Update local transform.
    pub fn set_local_transform(&mut self, id: NodeId, tf: Affine) {
        if let Some(n) = self.node_opt_mut(id) {
            n.local.local_transform = tf;
        }
    }

    /// Update z index.
    pub fn set_z_index(&mut self, id: NodeId, z: i32) {
        if let Some(n) = self.node_opt_mut(id) {
            n.local.z_index = z;
        }
    }

    /// Update local bounds.
    pub fn set_local_bounds(&mut self, id: NodeId, bounds: Rect) {
        if let Some(n) = self.node_opt_mut(id) {
            n.local.local_bounds = bounds;
        }
    }

    /// Update node flags.
    pub fn set_flags(&mut self, id: NodeId, flags: NodeFlags) {
        if let Some(n) = self.node_opt_mut(id) {
            n.local.flags = flags;
        }
    }

    /// Set or clear [`NodeFlags::VISIBLE`], leaving the other flags untouched.
    pub fn set_visible(&mut self, id: NodeId, visible: bool) {
        if let Some(n) = self.node_opt_mut(id) {
            n.local.flags.set(NodeFlags::VISIBLE, visible);
        }
    }

    /// Update the layout parameters.
    pub fn set_layout_params(&mut self, id: NodeId, layout: LayoutParams) {
        if let Some(n) = self.node_opt_mut(id) {
            n.local.layout = layout;
        }
    }

    /// Replace the decoration attributes of a node.
    pub fn set_decoration(&mut self, id: NodeId, decoration: Option<Decoration>) {
        if let Some(n) = self.node_opt_mut(id) {
            n.local.decoration = decoration;
        }
    }

    /// Mutable access to the decoration of a live decorator node.
    pub fn decoration_mut(&mut self, id: NodeId) -> Option<&mut Decoration> {
        self.node_opt_mut(id)?.local.decoration.as_mut()
    }

    /// Queue a transition for the host to play on `id`.
    ///
    /// Requests are handed out by the next [`Tree::commit`] in [`Damage::transitions`].
    pub fn run_transition(&mut self, id: NodeId, transition: Transition) {
        if self.is_alive(id) {
            self.pending_transitions.push(TransitionRequest {
                node: id,
                transition,
            });
        }
    }

    /// Return the world transform for a live node as of the last [`Tree::commit`].
    ///
    /// Returns `None` for stale identifiers.
    pub fn world_transform(&self, id: NodeId) -> Option<Affine> {
        self.node_opt(id).map(|node| node.world.world_transform)
    }

    /// Return the world-space axis-aligned bounding box for a live node.
    ///
    /// This is computed during [`Tree::commit`]; nodes inserted since the last
    /// commit report [`Rect::ZERO`]. Returns `None` for stale identifiers.
    pub fn world_bounds(&self, id: NodeId) -> Option<Rect> {
        self.node_opt(id).map(|node| node.world.world_bounds)
    }

    /// Bounds of a live node expressed in its parent's coordinate space.
    ///
    /// Derived from local data only, so it does not depend on a commit.
    pub fn bounds_in_parent(&self, id: NodeId) -> Option<Rect> {
        self.node_opt(id).map(|node| {
            node.local
                .local_transform
                .transform_rect_bbox(node.local.local_bounds)
        })
    }

    /// Local data of a live node.
    pub fn local(&self, id: NodeId) -> Option<&LocalNode> {
        self.node_opt(id).map(|node| &node.local)
    }

    /// Layout parameters of a live node.
    pub fn layout_params(&self, id: NodeId) -> Option<LayoutParams> {
        self.node_opt(id).map(|node| node.local.layout)
    }

    /// Decoration attributes of a live decorator node.
    pub fn decoration(&self, id: NodeId) -> Option<&Decoration> {
        self.node_opt(id)?.local.decoration.as_ref()
    }

    /// Number of commits performed so far.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Run the batched update and return coarse damage.
    ///
    /// This recomputes world-space transforms and bounds for all live nodes
    /// reachable from roots, and returns a [`Damage`] summary with the old and
    /// new bounds of every node that moved plus the transitions queued since
    /// the previous commit.
    pub fn commit(&mut self) -> Damage {
        let mut damage = Damage::default();
        let roots: Vec<NodeId> = self
            .nodes
            .iter()
            .enumerate()
            .filter_map(|(i, n)| match n {
                Some(n) if n.parent.is_none() =>
                {
                    #[allow(
                        clippy::cast_possible_truncation,
                        reason = "NodeId uses 32-bit indices by design."
                    )]
                    Some(NodeId::new(i as u32, n.generation))
                }
                _ => None,
            })
            .collect();

        for root in roots {
            self.update_world_recursive(root, &mut damage);
        }

        let pending = core::mem::take(&mut self.pending_transitions);
        damage.transitions = pending
            .into_iter()
            .filter(|request| self.is_alive(request.node))
            .collect();
        self.epoch += 1;
        damage
    }
}

impl Tree {
    /// Returns true if `id` refers to a live node.
    ///
    /// A `NodeId` is considered live if its slot exists and its generation matches
    /// the current generation stored in that slot.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.nodes
            .get(id.idx())
            .and_then(|n| n.as_ref())
            .map(|n| n.generation == id.1)
            .unwrap_or(false)
    }

    /// Returns the z-index of a node if the identifier is live.
    pub fn z_index(&self, id: NodeId) -> Option<i32> {
        self.node_opt(id).map(|node| node.local.z_index)
    }

    /// Returns the parent of a node if live, or `None` for roots or stale ids.
    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.node_opt(id).and_then(|node| node.parent)
    }

    /// Returns the flags of a node if the identifier is live.
    pub fn flags(&self, id: NodeId) -> Option<NodeFlags> {
        self.node_opt(id).map(|node| node.local.flags)
    }

    /// Position of `id` among its parent's children, or `None` for roots and stale ids.
    pub fn index_in_parent(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent_of(id)?;
        self.node(parent).children.iter().position(|&c| c == id)
    }

    /// Whether `id` and all of its ancestors are visible.
    pub fn is_shown(&self, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(c) = current {
            let Some(node) = self.node_opt(c) else {
                return false;
            };
            if !node.local.flags.contains(NodeFlags::VISIBLE) {
                return false;
            }
            current = node.parent;
        }
        true
    }

    /// Get the children of a node, or empty slice if node is stale.
    pub fn children_of(&self, id: NodeId) -> &[NodeId] {
        if !self.is_alive(id) {
            return &[];
        }
        &self.node(id).children
    }

    // --- internals ---

    fn node(&self, id: NodeId) -> &Node {
        self.nodes[id.idx()].as_ref().expect("dangling NodeId")
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        self.nodes[id.idx()].as_mut().expect("dangling NodeId")
    }

    fn node_opt(&self, id: NodeId) -> Option<&Node> {
        let n = self.nodes.get(id.idx())?.as_ref()?;
        if n.generation != id.1 {
            return None;
        }
        Some(n)
    }

    fn node_opt_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let n = self.nodes.get_mut(id.idx())?.as_mut()?;
        if n.generation != id.1 {
            return None;
        }
        Some(n)
    }

    /// Whether `ancestor` is `node` or lies on the path from `node` to its root.
    fn is_ancestor_or_self(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(c) = current {
            if c == ancestor {
                return true;
            }
            current = self.parent_of(c);
        }
        false
    }

    fn link_parent(&mut self, id: NodeId, parent: NodeId, index: usize) {
        let parent_node = self.node_mut(parent);
        parent_node.children.insert(index, id);
        self.node_mut(id).parent = Some(parent);
    }

    fn unlink_parent(&mut self, id: NodeId, parent: NodeId) {
        let p = self.node_mut(parent);
        p.children.retain(|c| *c != id);
        self.node_mut(id).parent = None;
    }

    fn update_world_recursive(&mut self, root_id: NodeId, damage: &mut Damage) {
        // Walk depth-first, propagating transforms toward the leaves.
        let mut stack = vec![(root_id, Affine::IDENTITY)];

        while let Some((id, parent_tf)) = stack.pop() {
            let node = self.node_mut(id);
            let old_world_bounds = node.world.world_bounds;
            node.world.world_transform = parent_tf * node.local.local_transform;
            node.world.world_bounds = node
                .world
                .world_transform
                .transform_rect_bbox(node.local.local_bounds);

            if old_world_bounds != node.world.world_bounds {
                if old_world_bounds.width() > 0.0 && old_world_bounds.height() > 0.0 {
                    damage.dirty_rects.push(old_world_bounds);
                }
                if node.world.world_bounds.width() > 0.0 && node.world.world_bounds.height() > 0.0 {
                    damage.dirty_rects.push(node.world.world_bounds);
                }
            }

            for &child in node.children.iter().rev() {
                stack.push((child, node.world.world_transform));
            }
        }
    }
}
