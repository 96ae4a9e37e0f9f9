// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_event_state --heading-base-level=0

//! Understory Event State: pointer model and input state machines for UI interactions.
//!
//! This crate provides small, focused pieces of interaction state that need to
//! persist across multiple events:
//!
//! - [`pointer`]: Input contacts (mouse, touch, pen), their claim state, and a registry
//! - [`press`]: The generic press lifecycle (press, release, interrupt, click, hover)
//! - [`drag`]: Movement tracking that coalesces zero-length moves
//!
//! ## Design Philosophy
//!
//! Each state manager is designed to be:
//!
//! - **Minimal and focused**: Each handles one specific interaction pattern
//! - **Stateful but simple**: Track just enough state to compute transitions
//! - **Integration-friendly**: Work with any event routing or spatial query system
//! - **Generic**: Accept application-specific node/widget ID types
//!
//! The crate does not assume any particular UI framework or event system. Pointer
//! state is reached through the [`pointer::PointerAccess`] capability, so hosts can
//! keep their pointers wherever they like.
//!
//! ## Usage Patterns
//!
//! ### Pressing
//!
//! ```rust
//! use kurbo::Point;
//! use understory_event_state::pointer::{
//!     Pointer, PointerButton, PointerEvent, PointerId, PointerKind, Pointers,
//! };
//! use understory_event_state::press::{PressOptions, PressState};
//!
//! let mut pointers = Pointers::new();
//! pointers.add(Pointer::new(PointerId(1), PointerKind::Touch, Point::ZERO));
//! pointers.down(PointerId(1), PointerButton::Primary);
//!
//! let mut press = PressState::new(PressOptions::default());
//! let event = PointerEvent::new(PointerId(1), 42_u32);
//! assert!(press.press(&mut pointers, &event, 42));
//! assert!(press.interrupt(&mut pointers).unwrap().interrupted);
//! ```
//!
//! ### Movement
//!
//! ```rust
//! use kurbo::Point;
//! use understory_event_state::drag::DragState;
//!
//! let mut drag = DragState::default();
//! drag.start(Point::new(10.0, 10.0));
//! let delta = drag.update(Point::new(15.0, 12.0)).unwrap();
//! assert_eq!((delta.x, delta.y), (5.0, 2.0));
//! ```
//!
//! ## Integration with Understory
//!
//! - Use `understory_box_tree` hit testing to find the node under a pointer
//! - Feed pointer events into a [`press::PressState`] (or a drag listener built on it)
//!
//! This crate is `no_std` compatible (with `alloc`).

#![no_std]

pub mod drag;
pub mod pointer;
pub mod press;
