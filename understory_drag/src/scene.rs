// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! What a drag listener needs from its host.
//!
//! The listener never owns the scene or the pointers. Each entry point takes a
//! `&mut` context implementing [`DragContext`], which is the combination of:
//!
//! - [`TransformChain`]: read the transforms around a node and translate it.
//! - [`AncestorTracker`]: watch the transform chain above a node for changes.
//! - [`PointerAccess`]: look up and claim pointers.
//!
//! Ancestor changes are polled, not pushed: the host calls
//! [`DragListener::sync_ancestors`](crate::DragListener::sync_ancestors) once
//! per dispatch turn, and the tracker reports whether anything above the
//! dragged node moved since the last poll. This keeps the listener free of
//! shared mutable state and coalesces bursts of ancestor edits.

use core::fmt::Debug;

use kurbo::{Affine, Vec2};
use understory_event_state::pointer::PointerAccess;

/// Transform queries and node translation.
pub trait TransformChain {
    /// Node handle.
    type Node: Copy + Eq + Debug;

    /// The composed transform of all strict ancestors of `node`, mapping the
    /// node's parent frame to the global frame.
    fn parent_to_global(&self, node: Self::Node) -> Affine;

    /// The node's own transform, mapping its local frame to its parent frame.
    fn local_transform(&self, node: Self::Node) -> Affine;

    /// Replaces the translation component of the node's own transform.
    fn set_translation(&mut self, node: Self::Node, translation: Vec2);
}

/// Change tracking for the transform chain above a node.
pub trait AncestorTracker: TransformChain {
    /// Handle for one tracking registration.
    type Subscription: Copy + Eq + Debug;

    /// Starts watching the strict ancestors of `node`.
    fn track_ancestors(&mut self, node: Self::Node) -> Self::Subscription;

    /// Stops watching. Unknown subscriptions are ignored.
    fn untrack(&mut self, subscription: Self::Subscription);

    /// Returns whether an ancestor changed since the last call, and clears the flag.
    fn take_ancestor_change(&mut self, subscription: Self::Subscription) -> bool;
}

/// Everything a [`DragListener`](crate::DragListener) needs, in one bound.
pub trait DragContext: AncestorTracker + PointerAccess {}

impl<T: AncestorTracker + PointerAccess + ?Sized> DragContext for T {}
