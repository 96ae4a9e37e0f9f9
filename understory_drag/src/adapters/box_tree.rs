// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drag context over an [`understory_box_tree::Tree`].
//!
//! [`BoxTreeContext`] borrows the tree and the pointer registry for the span of
//! one dispatched event:
//!
//! ```rust
//! use kurbo::{Point, Rect, Vec2};
//! use understory_box_tree::{LocalNode, Tree};
//! use understory_drag::DragOptions;
//! use understory_drag::adapters::box_tree::{BoxTreeContext, BoxTreeDragListener};
//! use understory_event_state::pointer::{Pointer, PointerButton, PointerEvent, PointerId, PointerKind, Pointers};
//!
//! let mut tree = Tree::new();
//! let knob = tree.insert(None, LocalNode::with_bounds(Rect::new(0.0, 0.0, 20.0, 20.0)));
//! let mut pointers = Pointers::new();
//! let id = PointerId(1);
//! pointers.add(Pointer::new(id, PointerKind::Mouse, Point::new(10.0, 10.0)));
//!
//! let mut listener = BoxTreeDragListener::new(DragOptions::new()).unwrap();
//!
//! pointers.down(id, PointerButton::Primary);
//! let down = PointerEvent::new(id, knob).with_button(PointerButton::Primary);
//! assert!(listener.press(&mut BoxTreeContext::new(&mut tree, &mut pointers), &down, None));
//!
//! pointers.move_to(id, Point::new(20.0, 15.0));
//! listener.drag(&mut BoxTreeContext::new(&mut tree, &mut pointers), &PointerEvent::new(id, knob));
//! assert_eq!(tree.translation(knob), Some(Vec2::new(10.0, 5.0)));
//! ```

use kurbo::{Affine, Vec2};
use understory_box_tree::{NodeId, SubscriptionId, Tree};
use understory_event_state::pointer::{Pointer, PointerAccess, PointerId, Pointers};

use crate::listener::DragListener;
use crate::scene::{AncestorTracker, TransformChain};

/// A drag listener keyed by box-tree handles.
pub type BoxTreeDragListener = DragListener<NodeId, SubscriptionId>;

/// Borrowed tree and pointers, implementing [`DragContext`](crate::DragContext).
#[derive(Debug)]
pub struct BoxTreeContext<'a> {
    /// The scene.
    pub tree: &'a mut Tree,
    /// Live pointers.
    pub pointers: &'a mut Pointers,
}

impl<'a> BoxTreeContext<'a> {
    /// Bundles the two borrows.
    pub fn new(tree: &'a mut Tree, pointers: &'a mut Pointers) -> Self {
        Self { tree, pointers }
    }
}

impl TransformChain for BoxTreeContext<'_> {
    type Node = NodeId;

    fn parent_to_global(&self, node: NodeId) -> Affine {
        self.tree.parent_world_transform(node)
    }

    fn local_transform(&self, node: NodeId) -> Affine {
        self.tree
            .local(node)
            .map_or(Affine::IDENTITY, |local| local.local_transform)
    }

    fn set_translation(&mut self, node: NodeId, translation: Vec2) {
        self.tree.set_translation(node, translation);
    }
}

impl AncestorTracker for BoxTreeContext<'_> {
    type Subscription = SubscriptionId;

    fn track_ancestors(&mut self, node: NodeId) -> SubscriptionId {
        self.tree.subscribe_ancestors(node)
    }

    fn untrack(&mut self, subscription: SubscriptionId) {
        self.tree.unsubscribe(subscription);
    }

    fn take_ancestor_change(&mut self, subscription: SubscriptionId) -> bool {
        self.tree.take_ancestor_change(subscription)
    }
}

impl PointerAccess for BoxTreeContext<'_> {
    fn pointer(&self, id: PointerId) -> Option<&Pointer> {
        self.pointers.pointer(id)
    }

    fn pointer_mut(&mut self, id: PointerId) -> Option<&mut Pointer> {
        self.pointers.pointer_mut(id)
    }
}
