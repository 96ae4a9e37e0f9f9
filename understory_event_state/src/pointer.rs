// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer model: one input contact (mouse, touch, or pen) and a registry of live contacts.
//!
//! A [`Pointer`] carries its current global position, the buttons it holds, and two
//! pieces of claim state that gesture recognizers coordinate through:
//!
//! - **Attachment**: at most one listener may own a pointer at a time
//!   ([`Pointer::attach`] / [`Pointer::detach`]). A press state machine attaches on
//!   press and detaches on release, so competing listeners see the pointer as taken.
//! - **Drag reservation**: [`Pointer::reserve_for_drag`] marks the contact as
//!   driving a drag. Pan/zoom style handlers should leave reserved pointers alone.
//!   The reservation is cleared when the contact lifts.
//!
//! Gesture code reaches pointers through the narrow [`PointerAccess`] capability so
//! that hosts can keep pointer state wherever they like; [`Pointers`] is the
//! ready-made registry.

use core::sync::atomic::{AtomicU64, Ordering};

use hashbrown::HashMap;
use hashbrown::hash_map::Entry;
use kurbo::Point;

/// Identity of a single input contact.
///
/// Touch contacts should get a fresh id per touch-down so that a lifted finger
/// and the next finger are distinguishable.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PointerId(pub u64);

/// What kind of device produced a pointer.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PointerKind {
    /// A mouse or trackpad cursor.
    Mouse,
    /// A finger on a touch surface.
    Touch,
    /// A stylus.
    Pen,
}

impl PointerKind {
    /// Touch and pen contacts are "touch-like": they only exist while in contact
    /// and cannot hover independently of pressing.
    pub const fn is_touch_like(self) -> bool {
        matches!(self, Self::Touch | Self::Pen)
    }
}

/// A single button.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum PointerButton {
    /// Left mouse button, finger contact, or pen tip.
    #[default]
    Primary,
    /// Right mouse button or pen barrel button.
    Secondary,
    /// Middle mouse button.
    Auxiliary,
}

bitflags::bitflags! {
    /// Set of buttons currently held by a pointer.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct PointerButtons: u8 {
        /// See [`PointerButton::Primary`].
        const PRIMARY   = 0b0000_0001;
        /// See [`PointerButton::Secondary`].
        const SECONDARY = 0b0000_0010;
        /// See [`PointerButton::Auxiliary`].
        const AUXILIARY = 0b0000_0100;
    }
}

impl From<PointerButton> for PointerButtons {
    fn from(button: PointerButton) -> Self {
        match button {
            PointerButton::Primary => Self::PRIMARY,
            PointerButton::Secondary => Self::SECONDARY,
            PointerButton::Auxiliary => Self::AUXILIARY,
        }
    }
}

/// Identity of a listener that can own pointers.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

impl ListenerId {
    /// Allocates a process-unique id.
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// Attachment was refused because another listener owns the pointer.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AlreadyAttached(pub ListenerId);

/// State of one input contact.
#[derive(Clone, Debug)]
pub struct Pointer {
    id: PointerId,
    kind: PointerKind,
    point: Point,
    buttons: PointerButtons,
    attached: Option<ListenerId>,
    reserved_for_drag: bool,
}

impl Pointer {
    /// Creates a pointer at `point` with no buttons held.
    pub fn new(id: PointerId, kind: PointerKind, point: Point) -> Self {
        Self {
            id,
            kind,
            point,
            buttons: PointerButtons::empty(),
            attached: None,
            reserved_for_drag: false,
        }
    }

    /// The pointer's identity.
    pub fn id(&self) -> PointerId {
        self.id
    }

    /// The device kind.
    pub fn kind(&self) -> PointerKind {
        self.kind
    }

    /// Shorthand for `self.kind().is_touch_like()`.
    pub fn is_touch_like(&self) -> bool {
        self.kind.is_touch_like()
    }

    /// Current position in the global frame.
    pub fn point(&self) -> Point {
        self.point
    }

    /// Buttons currently held.
    pub fn buttons(&self) -> PointerButtons {
        self.buttons
    }

    /// Whether any button is held.
    pub fn is_down(&self) -> bool {
        !self.buttons.is_empty()
    }

    /// The listener that owns this pointer, if any.
    pub fn attached_listener(&self) -> Option<ListenerId> {
        self.attached
    }

    /// Whether a listener owns this pointer.
    pub fn is_attached(&self) -> bool {
        self.attached.is_some()
    }

    /// Claims the pointer for `listener`. Re-attaching the current owner is a no-op.
    pub fn attach(&mut self, listener: ListenerId) -> Result<(), AlreadyAttached> {
        match self.attached {
            Some(owner) if owner != listener => Err(AlreadyAttached(owner)),
            _ => {
                self.attached = Some(listener);
                Ok(())
            }
        }
    }

    /// Releases the claim held by `listener`. Returns `false` if it did not own the pointer.
    pub fn detach(&mut self, listener: ListenerId) -> bool {
        if self.attached == Some(listener) {
            self.attached = None;
            true
        } else {
            false
        }
    }

    /// Marks the pointer as driving a drag.
    pub fn reserve_for_drag(&mut self) {
        self.reserved_for_drag = true;
    }

    /// Whether [`reserve_for_drag`](Self::reserve_for_drag) was called since the last lift.
    pub fn is_reserved_for_drag(&self) -> bool {
        self.reserved_for_drag
    }

    /// Moves the pointer.
    pub fn set_point(&mut self, point: Point) {
        self.point = point;
    }

    /// Presses `button`.
    pub fn press_button(&mut self, button: PointerButton) {
        self.buttons |= PointerButtons::from(button);
    }

    /// Lifts `button`. Lifting the last button clears the drag reservation.
    pub fn release_button(&mut self, button: PointerButton) {
        self.buttons -= PointerButtons::from(button);
        if self.buttons.is_empty() {
            self.reserved_for_drag = false;
        }
    }
}

/// Read and write access to pointer state.
///
/// This is the only thing press and drag state machines need to know about
/// where pointers live.
pub trait PointerAccess {
    /// Look up a pointer.
    fn pointer(&self, id: PointerId) -> Option<&Pointer>;
    /// Look up a pointer mutably.
    fn pointer_mut(&mut self, id: PointerId) -> Option<&mut Pointer>;
}

/// Registry of live pointers.
#[derive(Clone, Debug, Default)]
pub struct Pointers {
    pointers: HashMap<PointerId, Pointer>,
}

impl Pointers {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) a pointer and returns a mutable reference to it.
    pub fn add(&mut self, pointer: Pointer) -> &mut Pointer {
        match self.pointers.entry(pointer.id()) {
            Entry::Occupied(mut slot) => {
                slot.insert(pointer);
                slot.into_mut()
            }
            Entry::Vacant(slot) => slot.insert(pointer),
        }
    }

    /// Removes a pointer, e.g. when a touch ends.
    pub fn remove(&mut self, id: PointerId) -> Option<Pointer> {
        self.pointers.remove(&id)
    }

    /// Moves a pointer. Unknown ids are ignored.
    pub fn move_to(&mut self, id: PointerId, point: Point) {
        if let Some(p) = self.pointers.get_mut(&id) {
            p.set_point(point);
        }
    }

    /// Presses a button on a pointer. Unknown ids are ignored.
    pub fn down(&mut self, id: PointerId, button: PointerButton) {
        if let Some(p) = self.pointers.get_mut(&id) {
            p.press_button(button);
        }
    }

    /// Lifts a button on a pointer. Unknown ids are ignored.
    pub fn up(&mut self, id: PointerId, button: PointerButton) {
        if let Some(p) = self.pointers.get_mut(&id) {
            p.release_button(button);
        }
    }

    /// Number of live pointers.
    pub fn len(&self) -> usize {
        self.pointers.len()
    }

    /// Whether no pointers are live.
    pub fn is_empty(&self) -> bool {
        self.pointers.is_empty()
    }
}

impl PointerAccess for Pointers {
    fn pointer(&self, id: PointerId) -> Option<&Pointer> {
        self.pointers.get(&id)
    }

    fn pointer_mut(&mut self, id: PointerId) -> Option<&mut Pointer> {
        self.pointers.get_mut(&id)
    }
}

/// An input event as seen by a listener.
///
/// `target` is the node the listener is attached to (the current target of
/// dispatch), not necessarily the deepest node that was hit.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PointerEvent<K> {
    /// The contact that produced the event.
    pub pointer: PointerId,
    /// The node whose listener is handling the event.
    pub target: K,
    /// The button that changed, for down/up events.
    pub button: Option<PointerButton>,
}

impl<K> PointerEvent<K> {
    /// An event without a button change (move, enter, exit).
    pub fn new(pointer: PointerId, target: K) -> Self {
        Self {
            pointer,
            target,
            button: None,
        }
    }

    /// Builder-style setter for the changed button.
    #[must_use]
    pub fn with_button(mut self, button: PointerButton) -> Self {
        self.button = Some(button);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touch_and_pen_are_touch_like() {
        assert!(!PointerKind::Mouse.is_touch_like());
        assert!(PointerKind::Touch.is_touch_like());
        assert!(PointerKind::Pen.is_touch_like());
    }

    #[test]
    fn attach_is_exclusive() {
        let a = ListenerId::next();
        let b = ListenerId::next();
        let mut p = Pointer::new(PointerId(1), PointerKind::Mouse, Point::ZERO);

        assert_eq!(p.attach(a), Ok(()));
        assert_eq!(p.attach(a), Ok(()));
        assert_eq!(p.attach(b), Err(AlreadyAttached(a)));
        assert!(!p.detach(b));
        assert!(p.detach(a));
        assert!(!p.is_attached());
        assert_eq!(p.attach(b), Ok(()));
    }

    #[test]
    fn lifting_last_button_clears_reservation() {
        let mut pointers = Pointers::new();
        pointers.add(Pointer::new(PointerId(7), PointerKind::Touch, Point::ZERO));
        pointers.down(PointerId(7), PointerButton::Primary);
        pointers.down(PointerId(7), PointerButton::Secondary);
        pointers.pointer_mut(PointerId(7)).unwrap().reserve_for_drag();

        pointers.up(PointerId(7), PointerButton::Secondary);
        let p = pointers.pointer(PointerId(7)).unwrap();
        assert!(p.is_down());
        assert!(p.is_reserved_for_drag());

        pointers.up(PointerId(7), PointerButton::Primary);
        let p = pointers.pointer(PointerId(7)).unwrap();
        assert!(!p.is_down());
        assert!(!p.is_reserved_for_drag());
    }

    #[test]
    fn unknown_pointers_are_ignored() {
        let mut pointers = Pointers::new();
        pointers.move_to(PointerId(3), Point::new(1.0, 1.0));
        pointers.down(PointerId(3), PointerButton::Primary);
        assert!(pointers.pointer(PointerId(3)).is_none());
        assert!(pointers.is_empty());
    }
}
