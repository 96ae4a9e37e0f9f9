// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Listener configuration.

use alloc::boxed::Box;
use core::fmt;

use kurbo::{Affine, Point, Rect, Vec2};
use understory_event_state::pointer::{PointerButton, PointerEvent};

use crate::cell::PositionCell;
use crate::policy::{MapPositionFn, OffsetPositionFn};
use crate::session::DragSnapshot;

/// Gesture callback.
pub type DragCallback<N> = Box<dyn FnMut(&DragSnapshot<N>)>;

/// Press filter consulted before the built-in press checks succeed.
pub type CanStartPressFn<N> = Box<dyn Fn(&PointerEvent<N>) -> bool>;

/// Builder for a [`DragListener`](crate::DragListener).
///
/// Options are fixed once the listener is built. Combinations that can never
/// work are rejected by [`DragListener::new`](crate::DragListener::new).
///
/// ```rust
/// use kurbo::{Point, Rect};
/// use understory_box_tree::{NodeId, SubscriptionId};
/// use understory_drag::{DragListener, DragOptions, PositionCell};
///
/// let position = PositionCell::new(Point::ZERO);
/// let listener = DragListener::<NodeId, SubscriptionId>::new(
///     DragOptions::new()
///         .position(position.clone())
///         .translate_node(true)
///         .drag_bounds(Rect::new(0.0, 0.0, 100.0, 100.0))
///         .on_end(|snapshot| assert!(!snapshot.model_point.x.is_nan())),
/// )
/// .unwrap();
/// assert!(!listener.is_pressed());
/// ```
pub struct DragOptions<N> {
    pub(crate) position: Option<PositionCell>,
    pub(crate) translate_node: Option<bool>,
    pub(crate) apply_offset: bool,
    pub(crate) use_parent_offset: bool,
    pub(crate) track_ancestors: bool,
    pub(crate) model_transform: Option<Affine>,
    pub(crate) drag_bounds: Option<Rect>,
    pub(crate) map_position: Option<MapPositionFn>,
    pub(crate) offset_position: Option<OffsetPositionFn>,
    pub(crate) allow_touch_snag: bool,
    pub(crate) can_click: bool,
    pub(crate) attach: bool,
    pub(crate) mouse_button: PointerButton,
    pub(crate) collapse_drag_events: bool,
    pub(crate) can_start_press: Option<CanStartPressFn<N>>,
    pub(crate) on_start: Option<DragCallback<N>>,
    pub(crate) on_drag: Option<DragCallback<N>>,
    pub(crate) on_end: Option<DragCallback<N>>,
}

impl<N> Default for DragOptions<N> {
    fn default() -> Self {
        Self {
            position: None,
            translate_node: None,
            apply_offset: true,
            use_parent_offset: false,
            track_ancestors: false,
            model_transform: None,
            drag_bounds: None,
            map_position: None,
            offset_position: None,
            allow_touch_snag: true,
            can_click: false,
            attach: true,
            mouse_button: PointerButton::Primary,
            collapse_drag_events: false,
            can_start_press: None,
            on_start: None,
            on_drag: None,
            on_end: None,
        }
    }
}

// Manual Debug impl since callbacks aren't Debug
impl<N> fmt::Debug for DragOptions<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DragOptions")
            .field("position", &self.position)
            .field("translate_node", &self.translate_node)
            .field("apply_offset", &self.apply_offset)
            .field("use_parent_offset", &self.use_parent_offset)
            .field("track_ancestors", &self.track_ancestors)
            .field("model_transform", &self.model_transform)
            .field("drag_bounds", &self.drag_bounds)
            .field("has_map_position", &self.map_position.is_some())
            .field("has_offset_position", &self.offset_position.is_some())
            .field("allow_touch_snag", &self.allow_touch_snag)
            .field("can_click", &self.can_click)
            .field("attach", &self.attach)
            .field("mouse_button", &self.mouse_button)
            .field("collapse_drag_events", &self.collapse_drag_events)
            .field("has_can_start_press", &self.can_start_press.is_some())
            .field("has_on_start", &self.on_start.is_some())
            .field("has_on_drag", &self.on_drag.is_some())
            .field("has_on_end", &self.on_end.is_some())
            .finish()
    }
}

impl<N> DragOptions<N> {
    /// Default options: local-origin offset, no bounds, identity model space.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds a model-space position cell that is written on every reposition.
    #[must_use]
    pub fn position(mut self, position: PositionCell) -> Self {
        self.position = Some(position);
        self
    }

    /// Whether to write the parent point into the node's translation.
    ///
    /// Defaults to `true` when no position cell is bound and `false` otherwise.
    #[must_use]
    pub fn translate_node(mut self, translate_node: bool) -> Self {
        self.translate_node = Some(translate_node);
        self
    }

    /// Whether to preserve the grab offset. Defaults to `true`.
    ///
    /// When off, the node's origin jumps to the pointer.
    #[must_use]
    pub fn apply_offset(mut self, apply_offset: bool) -> Self {
        self.apply_offset = apply_offset;
        self
    }

    /// Keep the parent-space offset between pointer and bound position instead
    /// of the grabbed local point. Requires [`position`](Self::position).
    #[must_use]
    pub fn use_parent_offset(mut self, use_parent_offset: bool) -> Self {
        self.use_parent_offset = use_parent_offset;
        self
    }

    /// Follow transform changes above the dragged node during a drag.
    #[must_use]
    pub fn track_ancestors(mut self, track_ancestors: bool) -> Self {
        self.track_ancestors = track_ancestors;
        self
    }

    /// Model → parent transform. Must be invertible.
    #[must_use]
    pub fn model_transform(mut self, transform: Affine) -> Self {
        self.model_transform = Some(transform);
        self
    }

    /// Model-space rectangle the position is clamped into.
    #[must_use]
    pub fn drag_bounds(mut self, bounds: Rect) -> Self {
        self.drag_bounds = Some(bounds);
        self
    }

    /// Model-space remap, applied before [`drag_bounds`](Self::drag_bounds).
    #[must_use]
    pub fn map_position<F>(mut self, map: F) -> Self
    where
        F: Fn(Point) -> Point + 'static,
    {
        self.map_position = Some(Box::new(map));
        self
    }

    /// Extra parent-space offset added on every reposition, computed from the
    /// parent point before any grab offset is applied.
    #[must_use]
    pub fn offset_position<F>(mut self, offset: F) -> Self
    where
        F: Fn(Point) -> Vec2 + 'static,
    {
        self.offset_position = Some(Box::new(offset));
        self
    }

    /// Let a touch contact that slides onto the node start a drag. Defaults to `true`.
    #[must_use]
    pub fn allow_touch_snag(mut self, allow_touch_snag: bool) -> Self {
        self.allow_touch_snag = allow_touch_snag;
        self
    }

    /// Accept synthetic [`click`](crate::DragListener::click) activation. Defaults to `false`.
    #[must_use]
    pub fn can_click(mut self, can_click: bool) -> Self {
        self.can_click = can_click;
        self
    }

    /// Claim the pointer exclusively while dragging. Defaults to `true`.
    #[must_use]
    pub fn attach(mut self, attach: bool) -> Self {
        self.attach = attach;
        self
    }

    /// The mouse button that starts a drag. Defaults to primary.
    #[must_use]
    pub fn mouse_button(mut self, button: PointerButton) -> Self {
        self.mouse_button = button;
        self
    }

    /// Defer moves until [`flush_pending_drag`](crate::DragListener::flush_pending_drag),
    /// keeping only the latest.
    #[must_use]
    pub fn collapse_drag_events(mut self, collapse: bool) -> Self {
        self.collapse_drag_events = collapse;
        self
    }

    /// Extra predicate a press must pass.
    #[must_use]
    pub fn can_start_press<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&PointerEvent<N>) -> bool + 'static,
    {
        self.can_start_press = Some(Box::new(predicate));
        self
    }

    /// Called once a press has been accepted and the first reposition ran.
    #[must_use]
    pub fn on_start<F>(mut self, callback: F) -> Self
    where
        F: FnMut(&DragSnapshot<N>) + 'static,
    {
        self.on_start = Some(Box::new(callback));
        self
    }

    /// Called after each reposition caused by pointer movement.
    #[must_use]
    pub fn on_drag<F>(mut self, callback: F) -> Self
    where
        F: FnMut(&DragSnapshot<N>) + 'static,
    {
        self.on_drag = Some(Box::new(callback));
        self
    }

    /// Called when the drag ends, after ancestor tracking has stopped.
    #[must_use]
    pub fn on_end<F>(mut self, callback: F) -> Self
    where
        F: FnMut(&DragSnapshot<N>) + 'static,
    {
        self.on_end = Some(Box::new(callback));
        self
    }
}
