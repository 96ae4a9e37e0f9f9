// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_drag --heading-base-level=0

//! Understory Drag: a drag-gesture engine for retained scenes.
//!
//! A [`DragListener`] turns a pointer press on a node into a continuous drag.
//! On every move it maps the pointer through four coordinate frames (global,
//! parent, local, model), keeps the grabbed point under the pointer, constrains
//! the result, and publishes it by translating the node, by writing a shared
//! [`PositionCell`], or both.
//!
//! ## What it handles
//!
//! - **Grab offsets**: the node does not jump so its origin sits under the
//!   pointer, unless asked to ([`OffsetStrategy`]).
//! - **Model space**: the published position can live in an application frame
//!   related to the parent frame by any invertible [`kurbo::Affine`] ([`ModelSpace`]).
//! - **Constraints**: a custom remap and/or a rectangle clamp ([`ClampPolicy`]).
//! - **Moving ancestors**: with ancestor tracking, a scroll or pan of a
//!   container mid-drag repositions once, keeping the grabbed point under the pointer.
//! - **Touch**: a free touch that slides onto the node can start a drag, and an
//!   interrupted touch cannot immediately re-press.
//!
//! ## Host integration
//!
//! The listener owns no scene and no pointers. Every operation takes a context
//! implementing [`DragContext`]; see [`scene`] for the traits and
//! [`adapters::box_tree`] for a ready-made context over `understory_box_tree`.
//!
//! A host dispatch loop looks like:
//!
//! - pointer down on the node → [`DragListener::press`]
//! - pointer move → [`DragListener::drag`], then [`DragListener::sync_ancestors`]
//!   once per turn
//! - pointer up → [`DragListener::release`]
//! - pointer cancel / gesture stolen → [`DragListener::interrupt`]
//!
//! ```rust
//! use kurbo::{Point, Rect};
//! use understory_box_tree::{LocalNode, Tree};
//! use understory_drag::adapters::box_tree::{BoxTreeContext, BoxTreeDragListener};
//! use understory_drag::{DragOptions, PositionCell};
//! use understory_event_state::pointer::{Pointer, PointerButton, PointerEvent, PointerId, PointerKind, Pointers};
//!
//! let mut tree = Tree::new();
//! let slider = tree.insert(None, LocalNode::with_bounds(Rect::new(0.0, 0.0, 8.0, 8.0)));
//! let mut pointers = Pointers::new();
//! let finger = PointerId(3);
//! pointers.add(Pointer::new(finger, PointerKind::Touch, Point::new(4.0, 4.0)));
//! pointers.down(finger, PointerButton::Primary);
//!
//! let value = PositionCell::new(Point::ZERO);
//! let mut listener = BoxTreeDragListener::new(
//!     DragOptions::new()
//!         .position(value.clone())
//!         .translate_node(true)
//!         .drag_bounds(Rect::new(0.0, 0.0, 100.0, 0.0)),
//! )
//! .unwrap();
//!
//! let event = PointerEvent::new(finger, slider);
//! listener.press(&mut BoxTreeContext::new(&mut tree, &mut pointers), &event, None);
//! pointers.move_to(finger, Point::new(54.0, 30.0));
//! listener.drag(&mut BoxTreeContext::new(&mut tree, &mut pointers), &event);
//! listener.release(&mut BoxTreeContext::new(&mut tree, &mut pointers), Some(&event));
//!
//! assert_eq!(value.get(), Point::new(50.0, 0.0));
//! ```
//!
//! ## Features
//!
//! - `std` (default): forwards to Kurbo's `std` feature.
//! - `libm`: `no_std` math for Kurbo.
//! - `box_tree_adapter` (default): [`adapters::box_tree`].
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod adapters;
mod cell;
mod error;
pub mod frames;
mod listener;
mod options;
pub mod policy;
pub mod scene;
mod session;

pub use cell::{PositionCell, PositionChangedCallback};
pub use error::DragError;
pub use frames::{Frames, ModelSpace};
pub use listener::DragListener;
pub use options::{CanStartPressFn, DragCallback, DragOptions};
pub use policy::{ClampPolicy, MapPositionFn, OffsetPositionFn, OffsetStrategy};
pub use scene::{AncestorTracker, DragContext, TransformChain};
pub use session::DragSnapshot;
