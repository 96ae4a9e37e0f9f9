// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The drag gesture engine.

use core::fmt;

use kurbo::{Point, Vec2};
use tracing::{debug, trace, warn};
use understory_event_state::drag::DragState;
use understory_event_state::pointer::{PointerAccess, PointerEvent, PointerId};
use understory_event_state::press::{PressOptions, PressState};

use crate::cell::PositionCell;
use crate::error::DragError;
use crate::frames::{Frames, ModelSpace, nearly_equal_within};
use crate::options::{CanStartPressFn, DragCallback, DragOptions};
use crate::policy::{ClampPolicy, OffsetPositionFn, OffsetStrategy};
use crate::scene::DragContext;
use crate::session::{DragPoints, DragSession, DragSnapshot};

/// Turns a pointer press on a node into a continuous drag.
///
/// `N` is the host's node handle and `S` its ancestor-subscription handle; both
/// come from the [`DragContext`] passed to every operation.
///
/// ## Lifecycle
///
/// ```text
/// idle ──press──▶ dragging ──release──────▶ idle   (on_end, interrupted = false)
///                   │  ▲ drag / sync_ancestors
///                   │  └─┘
///                   └──────interrupt──────▶ idle   (on_end, interrupted = true)
/// ```
///
/// Every accepted press, move, and ancestor change runs one *reposition*: the
/// pointer is mapped into the target's parent frame, the grab offset is
/// applied, the result is mapped into model space and constrained, and the
/// constrained point is mapped back to parent space and published to the node
/// translation and/or the bound [`PositionCell`].
///
/// Per-event anomalies (moves while idle, zero-length moves, events from the
/// wrong pointer) are ignored rather than reported.
pub struct DragListener<N, S> {
    press: PressState<N>,
    position: Option<PositionCell>,
    translate_node: bool,
    offset: OffsetStrategy,
    offset_position: Option<OffsetPositionFn>,
    model: ModelSpace,
    clamp: ClampPolicy,
    track_ancestors: bool,
    allow_touch_snag: bool,
    collapse_drag_events: bool,
    can_start_press: Option<CanStartPressFn<N>>,
    on_start: Option<DragCallback<N>>,
    on_drag: Option<DragCallback<N>>,
    on_end: Option<DragCallback<N>>,
    session: Option<DragSession<N, S>>,
    points: DragPoints,
    last_interrupted_touch: Option<PointerId>,
    disposed: bool,
}

// Manual Debug impl since callbacks aren't Debug
impl<N: fmt::Debug, S: fmt::Debug> fmt::Debug for DragListener<N, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DragListener")
            .field("press", &self.press)
            .field("position", &self.position)
            .field("translate_node", &self.translate_node)
            .field("offset", &self.offset)
            .field("has_offset_position", &self.offset_position.is_some())
            .field("model", &self.model)
            .field("clamp", &self.clamp)
            .field("track_ancestors", &self.track_ancestors)
            .field("allow_touch_snag", &self.allow_touch_snag)
            .field("collapse_drag_events", &self.collapse_drag_events)
            .field("has_can_start_press", &self.can_start_press.is_some())
            .field("has_on_start", &self.on_start.is_some())
            .field("has_on_drag", &self.on_drag.is_some())
            .field("has_on_end", &self.on_end.is_some())
            .field("session", &self.session)
            .field("points", &self.points)
            .field("last_interrupted_touch", &self.last_interrupted_touch)
            .field("disposed", &self.disposed)
            .finish()
    }
}

#[derive(Copy, Clone, Debug)]
enum Notify {
    Start,
    Drag,
}

impl<N, S> DragListener<N, S>
where
    N: Copy + Eq + fmt::Debug,
    S: Copy + Eq + fmt::Debug,
{
    /// Validates `options` and builds an idle listener.
    pub fn new(options: DragOptions<N>) -> Result<Self, DragError> {
        if options.use_parent_offset {
            if options.position.is_none() {
                return Err(DragError::ParentOffsetWithoutPosition);
            }
            if !options.apply_offset {
                return Err(DragError::ParentOffsetWithoutApplyOffset);
            }
        }
        let model = match options.model_transform {
            Some(transform) => ModelSpace::from_transform(transform)?,
            None => ModelSpace::Identity,
        };
        if let Some(bounds) = options.drag_bounds {
            if !bounds.is_finite() || bounds.x0 > bounds.x1 || bounds.y0 > bounds.y1 {
                return Err(DragError::InvalidDragBounds(bounds));
            }
        }

        let translate_node = options
            .translate_node
            .unwrap_or(options.position.is_none());
        let offset = OffsetStrategy::from_flags(options.apply_offset, options.use_parent_offset);
        let mut points = DragPoints::default();
        if let Some(position) = &options.position {
            points.model = position.get();
            points.parent = model.model_to_parent(points.model);
        }
        debug!(
            target: "understory_drag",
            ?offset,
            translate_node,
            track_ancestors = options.track_ancestors,
            bound = options.position.is_some(),
            "drag listener created"
        );

        Ok(Self {
            press: PressState::new(PressOptions {
                attach: options.attach,
                mouse_button: options.mouse_button,
                can_click: options.can_click,
            }),
            position: options.position,
            translate_node,
            offset,
            offset_position: options.offset_position,
            model,
            clamp: ClampPolicy::from_parts(options.map_position, options.drag_bounds),
            track_ancestors: options.track_ancestors,
            allow_touch_snag: options.allow_touch_snag,
            collapse_drag_events: options.collapse_drag_events,
            can_start_press: options.can_start_press,
            on_start: options.on_start,
            on_drag: options.on_drag,
            on_end: options.on_end,
            session: None,
            points,
            last_interrupted_touch: None,
            disposed: false,
        })
    }

    /// Whether `event` would start a drag right now.
    ///
    /// Refuses while a drag is active, for the pointer most recently
    /// interrupted, for pointers claimed by another listener, and for events
    /// rejected by the `can_start_press` predicate.
    pub fn can_press<C: PointerAccess + ?Sized>(&self, cx: &C, event: &PointerEvent<N>) -> bool {
        if self.disposed {
            return false;
        }
        if self.last_interrupted_touch == Some(event.pointer) {
            trace!(target: "understory_drag", pointer = ?event.pointer, "press vetoed after interrupt");
            return false;
        }
        if let Err(reason) = self.press.check_press(cx, event) {
            trace!(target: "understory_drag", pointer = ?event.pointer, ?reason, "press refused");
            return false;
        }
        self.can_start_press
            .as_ref()
            .is_none_or(|predicate| predicate(event))
    }

    /// Starts a drag of `target` (or of `event.target` when `None`).
    ///
    /// Returns `false`, and changes nothing, when the press is refused.
    pub fn press<C>(&mut self, cx: &mut C, event: &PointerEvent<N>, target: Option<N>) -> bool
    where
        C: DragContext<Node = N, Subscription = S> + ?Sized,
    {
        self.press_then(cx, event, target, |_| {})
    }

    /// [`press`](Self::press), running `on_success` after the first reposition
    /// and before `on_start`.
    pub fn press_then<C, F>(
        &mut self,
        cx: &mut C,
        event: &PointerEvent<N>,
        target: Option<N>,
        on_success: F,
    ) -> bool
    where
        C: DragContext<Node = N, Subscription = S> + ?Sized,
        F: FnOnce(&DragSnapshot<N>),
    {
        if self.disposed {
            warn!(target: "understory_drag", "press on a disposed drag listener");
            return false;
        }
        if !self.can_press(&*cx, event) {
            return false;
        }
        let target = target.unwrap_or(event.target);
        if !self.press.press(cx, event, target) {
            return false;
        }
        // A successful press by any other pointer lifts the interrupt veto.
        self.last_interrupted_touch = None;

        let Some((global, kind)) = cx.pointer_mut(event.pointer).map(|pointer| {
            pointer.reserve_for_drag();
            (pointer.point(), pointer.kind())
        }) else {
            self.press.interrupt(cx);
            return false;
        };

        let subscription = self.track_ancestors.then(|| cx.track_ancestors(target));
        let frames = Frames::capture(&*cx, target);
        let pointer_parent = frames.global_to_parent(global);
        let parent_offset = match (&self.offset, &self.position) {
            (OffsetStrategy::ParentOffset, Some(position)) => {
                self.model.model_to_parent(position.get()) - pointer_parent
            }
            _ => Vec2::ZERO,
        };
        self.points.local = frames.parent_to_local(pointer_parent);

        let mut movement = DragState::default();
        movement.start(global);
        self.session = Some(DragSession {
            pointer: event.pointer,
            kind,
            target,
            parent_offset,
            movement,
            subscription,
            pending: None,
        });
        debug!(
            target: "understory_drag",
            pointer = ?event.pointer,
            ?kind,
            node = ?target,
            x = global.x,
            y = global.y,
            "drag started"
        );

        self.reposition(cx, global);
        if let Some(snapshot) = self.session_snapshot() {
            on_success(&snapshot);
        }
        self.notify(Notify::Start);
        true
    }

    /// Handles a move of the dragging pointer.
    ///
    /// Moves from other pointers, moves while idle, and moves to the
    /// last-seen position are ignored.
    pub fn drag<C>(&mut self, cx: &mut C, event: &PointerEvent<N>)
    where
        C: DragContext<Node = N, Subscription = S> + ?Sized,
    {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if session.pointer != event.pointer {
            return;
        }
        let Some(point) = cx.pointer(event.pointer).map(|p| p.point()) else {
            return;
        };
        if session.movement.update(point).is_none() {
            trace!(target: "understory_drag", x = point.x, y = point.y, "zero-length move ignored");
            return;
        }
        self.press.note_drag();
        if self.collapse_drag_events {
            session.pending = Some(point);
            return;
        }
        self.reposition(cx, point);
        self.notify(Notify::Drag);
    }

    /// Applies the latest deferred move, if any.
    ///
    /// Only meaningful with `collapse_drag_events`; hosts call this once per
    /// frame or dispatch turn.
    pub fn flush_pending_drag<C>(&mut self, cx: &mut C)
    where
        C: DragContext<Node = N, Subscription = S> + ?Sized,
    {
        let Some(point) = self.session.as_mut().and_then(|s| s.pending.take()) else {
            return;
        };
        self.reposition(cx, point);
        self.notify(Notify::Drag);
    }

    /// Ends the drag normally.
    ///
    /// `event` is the pointer-up that ended it, or `None` for a programmatic
    /// release. An event from a pointer other than the dragging one is ignored.
    pub fn release<C>(&mut self, cx: &mut C, event: Option<&PointerEvent<N>>)
    where
        C: DragContext<Node = N, Subscription = S> + ?Sized,
    {
        self.release_then(cx, event, |_| {});
    }

    /// [`release`](Self::release), running `on_complete` after `on_end`.
    pub fn release_then<C, F>(&mut self, cx: &mut C, event: Option<&PointerEvent<N>>, on_complete: F)
    where
        C: DragContext<Node = N, Subscription = S> + ?Sized,
        F: FnOnce(&DragSnapshot<N>),
    {
        let Some(session) = &self.session else {
            return;
        };
        if event.is_some_and(|e| e.pointer != session.pointer) {
            return;
        }
        self.flush_pending_drag(cx);
        if let Some(snapshot) = self.finish(cx, false) {
            on_complete(&snapshot);
        }
    }

    /// Cancels the drag. No-op when idle.
    ///
    /// A touch-like pointer interrupted here cannot start the next press on
    /// this listener; any other pointer pressing successfully lifts the veto.
    /// A deferred move is discarded rather than applied.
    pub fn interrupt<C>(&mut self, cx: &mut C)
    where
        C: DragContext<Node = N, Subscription = S> + ?Sized,
    {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        session.pending = None;
        if session.kind.is_touch_like() {
            self.last_interrupted_touch = Some(session.pointer);
        }
        self.finish(cx, true);
    }

    /// Synthetic activation (keyboard, assistive technology).
    ///
    /// Fires `on_start` then `on_end` without moving anything. Only accepted
    /// when `can_click` is enabled and no drag is active.
    pub fn click(&mut self, target: N) -> bool {
        self.click_then(target, |_| {})
    }

    /// [`click`](Self::click), running `on_success` between `on_start` and `on_end`.
    pub fn click_then<F>(&mut self, target: N, on_success: F) -> bool
    where
        F: FnOnce(&DragSnapshot<N>),
    {
        if self.disposed || !self.press.click() {
            return false;
        }
        debug!(target: "understory_drag", node = ?target, "click");
        let snapshot = self.snapshot_for(target, false);
        if let Some(callback) = self.on_start.as_mut() {
            callback(&snapshot);
        }
        on_success(&snapshot);
        if let Some(callback) = self.on_end.as_mut() {
            callback(&snapshot);
        }
        true
    }

    /// A touch-like pointer entered the target while down.
    pub fn touchenter<C>(&mut self, cx: &mut C, event: &PointerEvent<N>)
    where
        C: DragContext<Node = N, Subscription = S> + ?Sized,
    {
        self.try_touch_snag(cx, event);
    }

    /// A touch-like pointer moved over the target while down.
    pub fn touchmove<C>(&mut self, cx: &mut C, event: &PointerEvent<N>)
    where
        C: DragContext<Node = N, Subscription = S> + ?Sized,
    {
        self.try_touch_snag(cx, event);
    }

    /// The host cancelled a pointer. Interrupts if it is the dragging pointer.
    pub fn pointer_cancel<C>(&mut self, cx: &mut C, event: &PointerEvent<N>)
    where
        C: DragContext<Node = N, Subscription = S> + ?Sized,
    {
        if self.pressed_pointer() == Some(event.pointer) {
            self.interrupt(cx);
        }
    }

    /// Polls the ancestor subscription and repositions once if anything above
    /// the target moved. Returns whether a reposition ran.
    ///
    /// Hosts call this once per dispatch turn while a drag is active.
    pub fn sync_ancestors<C>(&mut self, cx: &mut C) -> bool
    where
        C: DragContext<Node = N, Subscription = S> + ?Sized,
    {
        let Some(subscription) = self.session.as_ref().and_then(|s| s.subscription) else {
            return false;
        };
        if !cx.take_ancestor_change(subscription) {
            return false;
        }
        self.ancestors_changed(cx);
        true
    }

    /// Repositions at the dragging pointer's current position.
    ///
    /// For hosts that track ancestor changes themselves.
    pub fn ancestors_changed<C>(&mut self, cx: &mut C)
    where
        C: DragContext<Node = N, Subscription = S> + ?Sized,
    {
        let Some(session) = &self.session else {
            return;
        };
        let point = cx
            .pointer(session.pointer)
            .map_or(self.points.global, |p| p.point());
        trace!(target: "understory_drag", node = ?session.target, "ancestor transform changed");
        self.reposition(cx, point);
    }

    /// Runs one reposition at `global` for the active drag. No-op when idle.
    pub fn reposition<C>(&mut self, cx: &mut C, global: Point)
    where
        C: DragContext<Node = N, Subscription = S> + ?Sized,
    {
        let Some(session) = &self.session else {
            return;
        };
        let target = session.target;
        let frames = Frames::capture(&*cx, target);
        self.points.global = global;

        let mut parent = frames.global_to_parent(global);
        if let Some(offset_position) = &self.offset_position {
            parent += offset_position(parent);
        }
        match self.offset {
            OffsetStrategy::None => {}
            OffsetStrategy::LocalOrigin => {
                parent = parent - frames.local_to_parent(self.points.local).to_vec2()
                    + frames.parent_origin().to_vec2();
            }
            OffsetStrategy::ParentOffset => parent += session.parent_offset,
        }

        let previous = self.points.model;
        let unclamped = self.model.parent_to_model(parent);
        let model = self.clamp.apply(unclamped);
        self.points.model = model;
        self.points.model_delta = model - previous;
        self.points.parent = self.model.model_to_parent(model);

        if self.translate_node {
            cx.set_translation(target, self.points.parent.to_vec2());
        }
        if let Some(position) = &self.position {
            position.set(model);
        }

        #[cfg(debug_assertions)]
        self.check_consistency(parent, unclamped);
    }

    /// Cancels any drag and makes every later call a no-op.
    pub fn dispose<C>(&mut self, cx: &mut C)
    where
        C: DragContext<Node = N, Subscription = S> + ?Sized,
    {
        if self.disposed {
            return;
        }
        self.interrupt(cx);
        self.last_interrupted_touch = None;
        self.disposed = true;
        debug!(target: "understory_drag", "drag listener disposed");
    }

    /// Whether [`dispose`](Self::dispose) was called.
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Last pointer position, global frame.
    pub fn global_point(&self) -> Point {
        self.points.global
    }

    /// Grabbed point, target's local frame.
    pub fn local_point(&self) -> Point {
        self.points.local
    }

    /// Last published position, parent frame.
    pub fn parent_point(&self) -> Point {
        self.points.parent
    }

    /// Last published position, model frame.
    pub fn model_point(&self) -> Point {
        self.points.model
    }

    /// Change of the model point in the last reposition.
    pub fn model_delta(&self) -> Vec2 {
        self.points.model_delta
    }

    /// Whether a drag is active.
    pub fn is_pressed(&self) -> bool {
        self.session.is_some()
    }

    /// The dragging pointer.
    pub fn pressed_pointer(&self) -> Option<PointerId> {
        self.session.as_ref().map(|s| s.pointer)
    }

    /// The node being dragged.
    pub fn pressed_target(&self) -> Option<N> {
        self.session.as_ref().map(|s| s.target)
    }

    /// The bound position cell.
    pub fn position(&self) -> Option<&PositionCell> {
        self.position.as_ref()
    }

    /// The underlying press machine, for hover and highlight queries.
    pub fn press_state(&self) -> &PressState<N> {
        &self.press
    }

    /// A pointer moved over the target.
    pub fn enter(&mut self, pointer: PointerId) {
        self.press.enter(pointer);
    }

    /// A pointer left the target.
    pub fn exit(&mut self, pointer: PointerId) {
        self.press.exit(pointer);
    }

    fn try_touch_snag<C>(&mut self, cx: &mut C, event: &PointerEvent<N>)
    where
        C: DragContext<Node = N, Subscription = S> + ?Sized,
    {
        if !self.allow_touch_snag || self.disposed {
            return;
        }
        let Some(pointer) = cx.pointer(event.pointer) else {
            return;
        };
        if !pointer.is_touch_like() || !pointer.is_down() || pointer.is_attached() {
            return;
        }
        trace!(target: "understory_drag", pointer = ?event.pointer, "touch snag");
        self.press(cx, event, None);
    }

    /// Tears down the session: ancestor tracking first, then the press, then `on_end`.
    fn finish<C>(&mut self, cx: &mut C, interrupted: bool) -> Option<DragSnapshot<N>>
    where
        C: DragContext<Node = N, Subscription = S> + ?Sized,
    {
        let session = self.session.take()?;
        if let Some(subscription) = session.subscription {
            cx.untrack(subscription);
        }
        if interrupted {
            self.press.interrupt(cx);
        } else {
            self.press.release(cx);
        }
        debug!(
            target: "understory_drag",
            pointer = ?session.pointer,
            node = ?session.target,
            interrupted,
            "drag ended"
        );
        let snapshot = DragSnapshot {
            pointer: Some(session.pointer),
            ..self.snapshot_for(session.target, interrupted)
        };
        if let Some(callback) = self.on_end.as_mut() {
            callback(&snapshot);
        }
        Some(snapshot)
    }

    fn notify(&mut self, which: Notify) {
        let Some(snapshot) = self.session_snapshot() else {
            return;
        };
        let callback = match which {
            Notify::Start => self.on_start.as_mut(),
            Notify::Drag => self.on_drag.as_mut(),
        };
        if let Some(callback) = callback {
            callback(&snapshot);
        }
    }

    fn session_snapshot(&self) -> Option<DragSnapshot<N>> {
        let session = self.session.as_ref()?;
        Some(DragSnapshot {
            pointer: Some(session.pointer),
            ..self.snapshot_for(session.target, false)
        })
    }

    fn snapshot_for(&self, target: N, interrupted: bool) -> DragSnapshot<N> {
        DragSnapshot {
            pointer: None,
            target,
            global_point: self.points.global,
            local_point: self.points.local,
            parent_point: self.points.parent,
            model_point: self.points.model,
            model_delta: self.points.model_delta,
            interrupted,
        }
    }

    /// Checks that the model space inverts the unclamped pipeline output.
    ///
    /// Only engine state is compared. The host may ignore `set_translation`
    /// or drop the node mid-drag.
    #[cfg(debug_assertions)]
    fn check_consistency(&self, raw_parent: Point, unclamped: Point) {
        if !(raw_parent.is_finite() && unclamped.is_finite()) {
            return;
        }
        let round_trip = self.model.model_to_parent(unclamped);
        debug_assert!(
            nearly_equal_within(round_trip, raw_parent, 1e-6 * self.model.condition()),
            "model space does not invert: {raw_parent:?} came back as {round_trip:?}"
        );
    }
}
