// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-gesture state.

use kurbo::{Point, Vec2};
use understory_event_state::drag::DragState;
use understory_event_state::pointer::{PointerId, PointerKind};

/// The listener's view of a gesture, handed to callbacks.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DragSnapshot<N> {
    /// The dragging pointer; `None` for synthetic clicks.
    pub pointer: Option<PointerId>,
    /// The node being dragged.
    pub target: N,
    /// Last pointer position in the global frame.
    pub global_point: Point,
    /// Grabbed point in the target's local frame.
    pub local_point: Point,
    /// Published position in the target's parent frame.
    pub parent_point: Point,
    /// Published position in the model frame.
    pub model_point: Point,
    /// Model point minus the previous model point.
    pub model_delta: Vec2,
    /// The gesture ended by interruption rather than release.
    pub interrupted: bool,
}

/// Points published by the most recent reposition.
///
/// These outlive the gesture so accessors stay meaningful after release, and so
/// the model delta always relates two consecutive repositions.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub(crate) struct DragPoints {
    pub(crate) global: Point,
    pub(crate) local: Point,
    pub(crate) parent: Point,
    pub(crate) model: Point,
    pub(crate) model_delta: Vec2,
}

/// State that only exists while a pointer is dragging.
#[derive(Clone, Debug)]
pub(crate) struct DragSession<N, S> {
    pub(crate) pointer: PointerId,
    pub(crate) kind: PointerKind,
    pub(crate) target: N,
    /// Parent-space offset from pointer to bound position, for the parent-offset strategy.
    pub(crate) parent_offset: Vec2,
    pub(crate) movement: DragState,
    pub(crate) subscription: Option<S>,
    /// Latest unapplied move when collapsing drag events.
    pub(crate) pending: Option<Point>,
}
