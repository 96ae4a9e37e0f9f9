// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer movement tracker: movement deltas since the last accepted position.
//!
//! Hosts and browsers sometimes deliver move events that do not move anything
//! (synthetic moves on focus changes, repeated moves at the same position).
//! [`DragState::update`] treats those as "nothing happened" and returns `None`,
//! so callers can use the return value directly as the "should I react?" signal.
//!
//! ## Usage
//!
//! 1) Start tracking with [`DragState::start`] at the press position.
//! 2) On each move, call [`DragState::update`]; `Some(delta)` means the position changed.
//! 3) [`DragState::total_offset`] gives the offset from the start position.
//! 4) End with [`DragState::end`].
//!
//! ## Minimal example
//!
//! ```
//! use kurbo::{Point, Vec2};
//! use understory_event_state::drag::DragState;
//!
//! let mut drag = DragState::default();
//! drag.start(Point::new(10.0, 20.0));
//!
//! assert_eq!(drag.update(Point::new(15.0, 25.0)), Some(Vec2::new(5.0, 5.0)));
//! // Same position again: coalesced.
//! assert_eq!(drag.update(Point::new(15.0, 25.0)), None);
//! assert_eq!(drag.total_offset(Point::new(15.0, 25.0)), Some(Vec2::new(5.0, 5.0)));
//! ```

use kurbo::{Point, Vec2};

/// Tracks pointer positions across a drag.
#[derive(Debug, Clone, Default, Copy)]
pub struct DragState {
    /// Position where tracking started.
    pub start_pos: Option<Point>,
    /// Last accepted position.
    pub last_pos: Option<Point>,
}

impl DragState {
    /// Start tracking from the given position.
    pub fn start(&mut self, pos: Point) {
        self.start_pos = Some(pos);
        self.last_pos = Some(pos);
    }

    /// Accept a new position, returning the movement since the last accepted one.
    ///
    /// Returns `None` when not tracking, or when `pos` equals the last position.
    pub fn update(&mut self, pos: Point) -> Option<Vec2> {
        self.start_pos?;
        match self.last_pos {
            Some(last) if last == pos => None,
            Some(last) => {
                self.last_pos = Some(pos);
                Some(pos - last)
            }
            None => {
                self.last_pos = Some(pos);
                None
            }
        }
    }

    /// The last accepted position.
    pub fn last_position(&self) -> Option<Point> {
        self.last_pos
    }

    /// Offset of `current_pos` from the start position.
    pub fn total_offset(&self, current_pos: Point) -> Option<Vec2> {
        self.start_pos.map(|start_pos| current_pos - start_pos)
    }

    /// Stop tracking and reset state.
    pub fn end(&mut self) {
        self.start_pos = None;
        self.last_pos = None;
    }

    /// Returns `true` while tracking.
    pub fn is_dragging(&self) -> bool {
        self.start_pos.is_some()
    }
}
