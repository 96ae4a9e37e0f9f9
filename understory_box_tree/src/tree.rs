// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The node container: hierarchy, transforms, hit testing, and ancestor subscriptions.

use alloc::vec::Vec;

use kurbo::{Affine, Point, Rect, Vec2};
use smallvec::SmallVec;

use crate::types::{LocalNode, NodeFlags, NodeId, SubscriptionId};

/// Result of [`Tree::hit_test_point`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Hit {
    /// The topmost node under the point.
    pub node: NodeId,
    /// Root→node path, inclusive of both ends.
    pub path: Vec<NodeId>,
}

#[derive(Clone, Debug)]
struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    local: LocalNode,
}

#[derive(Clone, Debug)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

#[derive(Clone, Copy, Debug)]
struct Subscription {
    node: NodeId,
    changed: bool,
}

#[derive(Clone, Debug)]
struct SubscriptionSlot {
    generation: u32,
    subscription: Option<Subscription>,
}

/// A hierarchy of nodes with local transforms.
///
/// World transforms are composed on demand by walking the parent chain, so
/// mutations take effect immediately and there is no separate commit step.
///
/// ## Ancestor subscriptions
///
/// [`Tree::subscribe_ancestors`] registers interest in the transform chain
/// *above* a node. Any later change to the local transform of a strict ancestor,
/// or moving the node (or one of its ancestors) under a different parent, marks
/// the subscription as changed. Changes to the subscribed node's own transform
/// are ignored: a gesture that translates its own target must not be told that
/// its frame moved.
///
/// Notifications are pulled rather than pushed. Call
/// [`Tree::take_ancestor_change`] (or iterate [`Tree::changed_subscriptions`])
/// once per dispatch turn; several mutations in one turn coalesce into a single
/// pending change.
#[derive(Clone, Debug, Default)]
pub struct Tree {
    slots: Vec<Slot>,
    free: Vec<u32>,
    roots: Vec<NodeId>,
    subscriptions: Vec<SubscriptionSlot>,
    free_subscriptions: Vec<u32>,
}

impl Tree {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a node under `parent` (or as a root when `None`).
    ///
    /// A stale `parent` inserts the node as a root.
    pub fn insert(&mut self, parent: Option<NodeId>, local: LocalNode) -> NodeId {
        let parent = parent.filter(|p| self.is_alive(*p));
        let node = Node {
            parent,
            children: Vec::new(),
            local,
        };
        let id = if let Some(idx) = self.free.pop() {
            let slot = &mut self.slots[idx as usize];
            slot.generation += 1;
            slot.node = Some(node);
            NodeId::new(idx, slot.generation)
        } else {
            let idx = u32::try_from(self.slots.len()).unwrap_or(u32::MAX);
            self.slots.push(Slot {
                generation: 1,
                node: Some(node),
            });
            NodeId::new(idx, 1)
        };
        match parent {
            Some(p) => {
                if let Some(pn) = self.node_mut(p) {
                    pn.children.push(id);
                }
            }
            None => self.roots.push(id),
        }
        id
    }

    /// Removes a node and its whole subtree. Returns `false` for stale ids.
    ///
    /// Subscriptions on removed nodes stay registered but never report changes;
    /// their owners are expected to [`unsubscribe`](Self::unsubscribe).
    pub fn remove(&mut self, id: NodeId) -> bool {
        let Some(node) = self.node(id) else {
            return false;
        };
        let parent = node.parent;
        self.detach_from_parent(id, parent);

        let mut stack: SmallVec<[NodeId; 16]> = SmallVec::new();
        stack.push(id);
        while let Some(cur) = stack.pop() {
            if let Some(node) = self.slots[cur.idx()].node.take() {
                stack.extend(node.children);
                self.free.push(cur.0);
            }
        }
        true
    }

    /// Moves `id` under `new_parent` (or to the root level), keeping its local transform.
    ///
    /// Returns `false` if either id is stale or the move would create a cycle.
    pub fn reparent(&mut self, id: NodeId, new_parent: Option<NodeId>) -> bool {
        let Some(node) = self.node(id) else {
            return false;
        };
        let old_parent = node.parent;
        if let Some(p) = new_parent {
            if !self.is_alive(p) || p == id || self.is_strict_ancestor(id, p) {
                return false;
            }
        }
        if old_parent == new_parent {
            return true;
        }
        self.detach_from_parent(id, old_parent);
        match new_parent {
            Some(p) => {
                if let Some(pn) = self.node_mut(p) {
                    pn.children.push(id);
                }
            }
            None => self.roots.push(id),
        }
        if let Some(n) = self.node_mut(id) {
            n.parent = new_parent;
        }
        // The moved node's frame changed along with everything under it.
        self.mark_subscriptions(|tree, sub| sub == id || tree.is_strict_ancestor(id, sub));
        true
    }

    /// Returns `true` if `id` refers to a live node.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    /// Parent of a live node.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id)?.parent
    }

    /// Children of a live node, in insertion order.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map_or(&[], |n| n.children.as_slice())
    }

    /// Local data of a live node.
    pub fn local(&self, id: NodeId) -> Option<&LocalNode> {
        self.node(id).map(|n| &n.local)
    }

    /// Z-index of a live node.
    pub fn z_index(&self, id: NodeId) -> Option<i32> {
        self.local(id).map(|l| l.z_index)
    }

    /// Replaces the local transform. Notifies subscriptions below `id` when it changes.
    pub fn set_local_transform(&mut self, id: NodeId, transform: Affine) {
        let Some(node) = self.node_mut(id) else {
            return;
        };
        if node.local.local_transform == transform {
            return;
        }
        node.local.local_transform = transform;
        self.mark_subscriptions(|tree, sub| tree.is_strict_ancestor(id, sub));
    }

    /// Sets the translation component of the local transform, keeping its linear part.
    pub fn set_translation(&mut self, id: NodeId, translation: Vec2) {
        if let Some(local) = self.local(id) {
            let transform = local.local_transform.with_translation(translation);
            self.set_local_transform(id, transform);
        }
    }

    /// Translation component of the local transform.
    pub fn translation(&self, id: NodeId) -> Option<Vec2> {
        self.local(id).map(|l| l.local_transform.translation())
    }

    /// Replaces the local bounds.
    pub fn set_local_bounds(&mut self, id: NodeId, bounds: Rect) {
        if let Some(node) = self.node_mut(id) {
            node.local.local_bounds = bounds;
        }
    }

    /// Replaces the flags.
    pub fn set_flags(&mut self, id: NodeId, flags: NodeFlags) {
        if let Some(node) = self.node_mut(id) {
            node.local.flags = flags;
        }
    }

    /// Replaces the z-index.
    pub fn set_z_index(&mut self, id: NodeId, z_index: i32) {
        if let Some(node) = self.node_mut(id) {
            node.local.z_index = z_index;
        }
    }

    /// Root→node transform, including the node's own local transform.
    ///
    /// Stale ids yield the identity.
    pub fn world_transform(&self, id: NodeId) -> Affine {
        let Some(node) = self.node(id) else {
            return Affine::IDENTITY;
        };
        self.chain_above(node.parent) * node.local.local_transform
    }

    /// Root→parent transform: the composed ancestor chain, excluding the node itself.
    pub fn parent_world_transform(&self, id: NodeId) -> Affine {
        self.chain_above(self.parent(id))
    }

    /// Strict ancestors of `id`, root first.
    pub fn ancestors(&self, id: NodeId) -> SmallVec<[NodeId; 8]> {
        let mut out = SmallVec::new();
        let mut cur = self.parent(id);
        while let Some(p) = cur {
            out.push(p);
            cur = self.parent(p);
        }
        out.reverse();
        out
    }

    /// Maps a point in the node's local frame to the global frame.
    pub fn local_to_global_point(&self, id: NodeId, pt: Point) -> Point {
        self.world_transform(id) * pt
    }

    /// Maps a point in the global frame into the node's local frame.
    pub fn global_to_local_point(&self, id: NodeId, pt: Point) -> Point {
        self.world_transform(id).inverse() * pt
    }

    /// Conservative global-frame AABB of a node's local bounds.
    pub fn world_bounds(&self, id: NodeId) -> Option<Rect> {
        let local = self.local(id)?;
        Some(self.world_transform(id).transform_rect_bbox(local.local_bounds))
    }

    /// Topmost visible, pickable node whose local bounds contain `pt`.
    ///
    /// Siblings are ordered by z-index, then insertion order. A node without
    /// [`NodeFlags::VISIBLE`] hides its whole subtree; a node without
    /// [`NodeFlags::PICKABLE`] is skipped but its children remain hittable.
    pub fn hit_test_point(&self, pt: Point) -> Option<Hit> {
        let mut best = None;
        for root in self.paint_order(&self.roots) {
            self.hit_walk(root, Affine::IDENTITY, pt, &mut best);
        }
        best.map(|node| {
            let mut path: Vec<NodeId> = self.ancestors(node).into_vec();
            path.push(node);
            Hit { node, path }
        })
    }

    /// Subscribes to transform changes above `node`.
    pub fn subscribe_ancestors(&mut self, node: NodeId) -> SubscriptionId {
        let subscription = Subscription {
            node,
            changed: false,
        };
        if let Some(idx) = self.free_subscriptions.pop() {
            let slot = &mut self.subscriptions[idx as usize];
            slot.generation += 1;
            slot.subscription = Some(subscription);
            SubscriptionId(idx, slot.generation)
        } else {
            let idx = u32::try_from(self.subscriptions.len()).unwrap_or(u32::MAX);
            self.subscriptions.push(SubscriptionSlot {
                generation: 1,
                subscription: Some(subscription),
            });
            SubscriptionId(idx, 1)
        }
    }

    /// Removes a subscription. Returns `false` if it was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        match self.subscriptions.get_mut(id.idx()) {
            Some(slot) if slot.generation == id.1 && slot.subscription.is_some() => {
                slot.subscription = None;
                self.free_subscriptions.push(id.0);
                true
            }
            _ => false,
        }
    }

    /// Returns and clears the pending-change flag of a subscription.
    pub fn take_ancestor_change(&mut self, id: SubscriptionId) -> bool {
        match self.subscriptions.get_mut(id.idx()) {
            Some(SubscriptionSlot {
                generation,
                subscription: Some(sub),
            }) if *generation == id.1 => core::mem::take(&mut sub.changed),
            _ => false,
        }
    }

    /// Number of live subscriptions.
    pub fn subscription_count(&self) -> usize {
        self.subscriptions
            .iter()
            .filter(|s| s.subscription.is_some())
            .count()
    }

    /// Subscriptions with a pending change, without clearing them.
    pub fn changed_subscriptions(&self) -> impl Iterator<Item = SubscriptionId> + '_ {
        self.subscriptions
            .iter()
            .enumerate()
            .filter_map(|(idx, slot)| match slot.subscription {
                Some(sub) if sub.changed => Some(SubscriptionId(
                    u32::try_from(idx).unwrap_or(u32::MAX),
                    slot.generation,
                )),
                _ => None,
            })
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        let slot = self.slots.get(id.idx())?;
        if slot.generation != id.generation() {
            return None;
        }
        slot.node.as_ref()
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let slot = self.slots.get_mut(id.idx())?;
        if slot.generation != id.generation() {
            return None;
        }
        slot.node.as_mut()
    }

    fn detach_from_parent(&mut self, id: NodeId, parent: Option<NodeId>) {
        match parent {
            Some(p) => {
                if let Some(pn) = self.node_mut(p) {
                    pn.children.retain(|c| *c != id);
                }
            }
            None => self.roots.retain(|r| *r != id),
        }
    }

    fn chain_above(&self, mut cur: Option<NodeId>) -> Affine {
        let mut transform = Affine::IDENTITY;
        while let Some(id) = cur {
            let Some(node) = self.node(id) else {
                break;
            };
            transform = node.local.local_transform * transform;
            cur = node.parent;
        }
        transform
    }

    /// Whether `ancestor` appears strictly above `node`.
    fn is_strict_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut cur = self.parent(node);
        while let Some(p) = cur {
            if p == ancestor {
                return true;
            }
            cur = self.parent(p);
        }
        false
    }

    fn mark_subscriptions(&mut self, affected: impl Fn(&Self, NodeId) -> bool) {
        let mut hits: SmallVec<[usize; 4]> = SmallVec::new();
        for (idx, slot) in self.subscriptions.iter().enumerate() {
            if let Some(sub) = slot.subscription {
                if !sub.changed && affected(self, sub.node) {
                    hits.push(idx);
                }
            }
        }
        for idx in hits {
            if let Some(sub) = self.subscriptions[idx].subscription.as_mut() {
                sub.changed = true;
            }
        }
    }

    fn paint_order(&self, ids: &[NodeId]) -> SmallVec<[NodeId; 8]> {
        let mut sorted: SmallVec<[NodeId; 8]> = ids.iter().copied().collect();
        sorted.sort_by_key(|id| self.z_index(*id).unwrap_or(0));
        sorted
    }

    fn hit_walk(&self, id: NodeId, parent_world: Affine, pt: Point, best: &mut Option<NodeId>) {
        let Some(node) = self.node(id) else {
            return;
        };
        if !node.local.flags.contains(NodeFlags::VISIBLE) {
            return;
        }
        let world = parent_world * node.local.local_transform;
        if node.local.flags.contains(NodeFlags::PICKABLE)
            && world.determinant() != 0.0
            && node.local.local_bounds.contains(world.inverse() * pt)
        {
            *best = Some(id);
        }
        for child in self.paint_order(&node.children) {
            self.hit_walk(child, world, pt, best);
        }
    }
}
