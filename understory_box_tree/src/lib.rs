// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_box_tree --heading-base-level=0

//! Understory Box Tree: a Kurbo-native node hierarchy with local transforms.
//!
//! Understory Box Tree is the geometry half of a retained scene: it knows where
//! things are, not how they are painted.
//!
//! - Represents a hierarchy of regions with local transforms, bounds, z-order, and flags.
//! - Composes world transforms on demand, so every mutation is visible immediately.
//! - Answers point hit tests in paint order.
//! - Lets interaction code subscribe to the transform chain above a node, which is
//!   how a drag gesture keeps its target under the pointer while a parent scrolls.
//!
//! ## Where this fits: three-tree model
//!
//! - Widget tree: interaction/state.
//! - Box tree: geometry (this crate).
//! - Render tree: display list.
//!
//! ## Not a layout engine
//!
//! This crate does not measure or arrange anything. Upstream code computes
//! positions and sizes and writes the results in as local transforms and bounds.
//!
//! ## API overview
//!
//! - [`Tree`]: container managing nodes and ancestor subscriptions.
//! - [`LocalNode`]: per-node local data (bounds, transform, z, flags).
//! - [`NodeFlags`]: visibility and picking controls.
//! - [`NodeId`] / [`SubscriptionId`]: generational handles.
//!
//! Key operations:
//! - [`Tree::insert`] → [`NodeId`], [`Tree::remove`], [`Tree::reparent`]
//! - [`Tree::set_local_transform`] / [`Tree::set_translation`] / [`Tree::set_local_bounds`]
//! - [`Tree::world_transform`] / [`Tree::parent_world_transform`]
//! - [`Tree::hit_test_point`] → [`Hit`]
//! - [`Tree::subscribe_ancestors`] / [`Tree::take_ancestor_change`] / [`Tree::unsubscribe`]
//!
//! ```rust
//! use kurbo::{Affine, Point, Rect, Vec2};
//! use understory_box_tree::{LocalNode, Tree};
//!
//! let mut tree = Tree::new();
//! let panel = tree.insert(None, LocalNode::with_bounds(Rect::new(0.0, 0.0, 200.0, 200.0)));
//! let knob = tree.insert(
//!     Some(panel),
//!     LocalNode::with_bounds(Rect::new(0.0, 0.0, 10.0, 10.0))
//!         .transform(Affine::translate((50.0, 50.0))),
//! );
//!
//! let sub = tree.subscribe_ancestors(knob);
//! tree.set_translation(panel, Vec2::new(5.0, 0.0));
//! assert!(tree.take_ancestor_change(sub));
//!
//! let hit = tree.hit_test_point(Point::new(57.0, 52.0)).unwrap();
//! assert_eq!(hit.node, knob);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod tree;
mod types;

pub use tree::{Hit, Tree};
pub use types::{LocalNode, NodeFlags, NodeId, SubscriptionId};
