// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Press state machine: "is something pressed by this pointer".
//!
//! [`PressState`] implements the generic lifecycle every pressable control shares:
//!
//! ```text
//! idle ──press──▶ pressed ──release──▶ idle
//!                    │
//!                    └──interrupt──▶ idle   (is_interrupted() == true)
//! ```
//!
//! While pressed, the pressing pointer is attached to this state machine's
//! [`ListenerId`] (unless [`PressOptions::attach`] is off), which keeps competing
//! listeners from claiming the same contact. Only one press is active at a time;
//! a second pointer is rejected until the first one is released or interrupted.
//!
//! Orthogonally, the machine tracks which pointers are over its target
//! ([`enter`](PressState::enter) / [`exit`](PressState::exit)) to derive hover
//! and highlight states, and supports a synthetic [`click`](PressState::click)
//! activation for keyboard and assistive input when enabled.
//!
//! ## Minimal example
//!
//! ```
//! use kurbo::Point;
//! use understory_event_state::pointer::{
//!     Pointer, PointerAccess, PointerButton, PointerEvent, PointerId, PointerKind, Pointers,
//! };
//! use understory_event_state::press::{PressOptions, PressState};
//!
//! let mut pointers = Pointers::new();
//! pointers.add(Pointer::new(PointerId(1), PointerKind::Mouse, Point::new(5.0, 5.0)));
//! pointers.down(PointerId(1), PointerButton::Primary);
//!
//! let mut press = PressState::new(PressOptions::default());
//! let down = PointerEvent::new(PointerId(1), "button").with_button(PointerButton::Primary);
//! assert!(press.press(&mut pointers, &down, "button"));
//! assert!(pointers.pointer(PointerId(1)).unwrap().is_attached());
//!
//! let released = press.release(&mut pointers).unwrap();
//! assert_eq!(released.press.target, "button");
//! assert!(!released.interrupted);
//! assert!(!pointers.pointer(PointerId(1)).unwrap().is_attached());
//! ```

use smallvec::SmallVec;

use crate::pointer::{
    ListenerId, PointerAccess, PointerButton, PointerEvent, PointerId, PointerKind,
};

/// Configuration for a [`PressState`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PressOptions {
    /// Claim the pressing pointer exclusively while pressed.
    pub attach: bool,
    /// Mouse presses must use this button. Touch and pen presses are not filtered.
    pub mouse_button: PointerButton,
    /// Allow synthetic [`PressState::click`] activation.
    pub can_click: bool,
}

impl Default for PressOptions {
    fn default() -> Self {
        Self {
            attach: true,
            mouse_button: PointerButton::Primary,
            can_click: true,
        }
    }
}

/// Why a press was refused.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PressRejected {
    /// Another press is active.
    AlreadyPressed,
    /// The event names a pointer the host does not know about.
    UnknownPointer,
    /// Another listener owns the pointer.
    PointerAttached,
    /// A mouse press used a different button than configured.
    WrongButton,
}

/// An active press.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Press<K> {
    /// The pressing contact.
    pub pointer: PointerId,
    /// Kind of the pressing contact, captured at press time.
    pub kind: PointerKind,
    /// The node that was pressed.
    pub target: K,
}

/// A press that just ended.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Released<K> {
    /// The press that ended.
    pub press: Press<K>,
    /// Whether [`PressState::note_drag`] was called during the press.
    pub dragged: bool,
    /// Whether the press was interrupted rather than released.
    pub interrupted: bool,
}

/// Generic press lifecycle, keyed by node type `K`.
#[derive(Clone, Debug)]
pub struct PressState<K> {
    id: ListenerId,
    options: PressOptions,
    press: Option<Press<K>>,
    dragged: bool,
    interrupted: bool,
    over: SmallVec<[PointerId; 2]>,
}

impl<K: Copy> PressState<K> {
    /// Creates an idle press state with a fresh [`ListenerId`].
    pub fn new(options: PressOptions) -> Self {
        Self {
            id: ListenerId::next(),
            options,
            press: None,
            dragged: false,
            interrupted: false,
            over: SmallVec::new(),
        }
    }

    /// The id used when attaching pointers.
    pub fn id(&self) -> ListenerId {
        self.id
    }

    /// The configuration.
    pub fn options(&self) -> PressOptions {
        self.options
    }

    /// Checks whether `event` could start a press, and why not.
    pub fn check_press<P: PointerAccess + ?Sized>(
        &self,
        pointers: &P,
        event: &PointerEvent<K>,
    ) -> Result<(), PressRejected> {
        if self.press.is_some() {
            return Err(PressRejected::AlreadyPressed);
        }
        let pointer = pointers
            .pointer(event.pointer)
            .ok_or(PressRejected::UnknownPointer)?;
        if self.options.attach {
            if let Some(owner) = pointer.attached_listener() {
                if owner != self.id {
                    return Err(PressRejected::PointerAttached);
                }
            }
        }
        if pointer.kind() == PointerKind::Mouse {
            if let Some(button) = event.button {
                if button != self.options.mouse_button {
                    return Err(PressRejected::WrongButton);
                }
            }
        }
        Ok(())
    }

    /// Whether `event` could start a press.
    pub fn can_press<P: PointerAccess + ?Sized>(&self, pointers: &P, event: &PointerEvent<K>) -> bool {
        self.check_press(pointers, event).is_ok()
    }

    /// Starts a press on `target`. Returns `false` (and changes nothing) if refused.
    pub fn press<P: PointerAccess + ?Sized>(
        &mut self,
        pointers: &mut P,
        event: &PointerEvent<K>,
        target: K,
    ) -> bool {
        if self.check_press(pointers, event).is_err() {
            return false;
        }
        let Some(pointer) = pointers.pointer_mut(event.pointer) else {
            return false;
        };
        if self.options.attach && pointer.attach(self.id).is_err() {
            return false;
        }
        self.press = Some(Press {
            pointer: event.pointer,
            kind: pointer.kind(),
            target,
        });
        self.dragged = false;
        self.interrupted = false;
        true
    }

    /// Whether a press is active.
    pub fn is_pressed(&self) -> bool {
        self.press.is_some()
    }

    /// The active press.
    pub fn current(&self) -> Option<&Press<K>> {
        self.press.as_ref()
    }

    /// The pressing pointer.
    pub fn pointer(&self) -> Option<PointerId> {
        self.press.map(|p| p.pointer)
    }

    /// The pressed node.
    pub fn target(&self) -> Option<K> {
        self.press.map(|p| p.target)
    }

    /// Records that the pointer moved during the press.
    pub fn note_drag(&mut self) {
        if self.press.is_some() {
            self.dragged = true;
        }
    }

    /// Whether the pointer moved since the press started.
    pub fn has_dragged(&self) -> bool {
        self.dragged
    }

    /// Whether the most recent press ended by [`interrupt`](Self::interrupt).
    ///
    /// Cleared by the next successful press.
    pub fn is_interrupted(&self) -> bool {
        self.interrupted
    }

    /// Ends the press normally and detaches the pointer.
    pub fn release<P: PointerAccess + ?Sized>(&mut self, pointers: &mut P) -> Option<Released<K>> {
        self.finish(pointers, false)
    }

    /// Ends the press abnormally and detaches the pointer. No-op when idle.
    pub fn interrupt<P: PointerAccess + ?Sized>(&mut self, pointers: &mut P) -> Option<Released<K>> {
        self.finish(pointers, true)
    }

    /// Whether a synthetic click would be accepted right now.
    pub fn can_click(&self) -> bool {
        self.options.can_click && self.press.is_none()
    }

    /// Accepts a synthetic click if allowed. The caller runs the activation.
    pub fn click(&mut self) -> bool {
        if !self.can_click() {
            return false;
        }
        self.interrupted = false;
        true
    }

    /// A pointer moved over the target.
    pub fn enter(&mut self, pointer: PointerId) {
        if !self.over.contains(&pointer) {
            self.over.push(pointer);
        }
    }

    /// A pointer left the target.
    pub fn exit(&mut self, pointer: PointerId) {
        self.over.retain(|p| *p != pointer);
    }

    /// Whether any pointer is over the target.
    pub fn is_over(&self) -> bool {
        !self.over.is_empty()
    }

    /// Whether a pointer is over the target without pressing something else.
    ///
    /// A pointer counts if it is not down, or if it is the one pressing us.
    pub fn is_hovering<P: PointerAccess + ?Sized>(&self, pointers: &P) -> bool {
        let pressing = self.pointer();
        self.over.iter().any(|id| {
            Some(*id) == pressing || pointers.pointer(*id).is_some_and(|p| !p.is_down())
        })
    }

    /// Hovering or pressed.
    pub fn is_highlighted<P: PointerAccess + ?Sized>(&self, pointers: &P) -> bool {
        self.is_pressed() || self.is_hovering(pointers)
    }

    /// Pressed, with the pressing pointer still over the target.
    pub fn looks_pressed(&self) -> bool {
        self.pointer().is_some_and(|id| self.over.contains(&id))
    }

    fn finish<P: PointerAccess + ?Sized>(
        &mut self,
        pointers: &mut P,
        interrupted: bool,
    ) -> Option<Released<K>> {
        let press = self.press.take()?;
        if self.options.attach {
            if let Some(pointer) = pointers.pointer_mut(press.pointer) {
                pointer.detach(self.id);
            }
        }
        self.interrupted = interrupted;
        let dragged = core::mem::take(&mut self.dragged);
        Some(Released {
            press,
            dragged,
            interrupted,
        })
    }
}

#[cfg(test)]
mod tests {
    use kurbo::Point;

    use super::*;
    use crate::pointer::{Pointer, Pointers};

    fn pointers_with(id: u64, kind: PointerKind) -> Pointers {
        let mut pointers = Pointers::new();
        pointers.add(Pointer::new(PointerId(id), kind, Point::ZERO));
        pointers.down(PointerId(id), PointerButton::Primary);
        pointers
    }

    fn down(id: u64) -> PointerEvent<u32> {
        PointerEvent::new(PointerId(id), 1).with_button(PointerButton::Primary)
    }

    #[test]
    fn only_one_press_at_a_time() {
        let mut pointers = pointers_with(1, PointerKind::Touch);
        pointers.add(Pointer::new(PointerId(2), PointerKind::Touch, Point::ZERO));
        let mut press = PressState::new(PressOptions::default());

        assert!(press.press(&mut pointers, &down(1), 1));
        assert_eq!(
            press.check_press(&pointers, &down(2)),
            Err(PressRejected::AlreadyPressed)
        );
        assert!(!press.press(&mut pointers, &down(2), 1));
        assert_eq!(press.pointer(), Some(PointerId(1)));
    }

    #[test]
    fn attached_pointer_is_refused() {
        let mut pointers = pointers_with(1, PointerKind::Mouse);
        let mut first = PressState::new(PressOptions::default());
        let mut second = PressState::new(PressOptions::default());

        assert!(first.press(&mut pointers, &down(1), 1));
        assert_eq!(
            second.check_press(&pointers, &down(1)),
            Err(PressRejected::PointerAttached)
        );

        first.release(&mut pointers);
        assert!(second.press(&mut pointers, &down(1), 1));
    }

    #[test]
    fn non_attaching_press_shares_pointer() {
        let mut pointers = pointers_with(1, PointerKind::Mouse);
        let mut owner = PressState::new(PressOptions::default());
        let mut observer = PressState::new(PressOptions {
            attach: false,
            ..PressOptions::default()
        });
        assert!(owner.press(&mut pointers, &down(1), 1));
        assert!(observer.press(&mut pointers, &down(1), 1));
        observer.release(&mut pointers);
        assert_eq!(
            pointers.pointer(PointerId(1)).unwrap().attached_listener(),
            Some(owner.id())
        );
    }

    #[test]
    fn mouse_button_filter_only_applies_to_mice() {
        let mouse = pointers_with(1, PointerKind::Mouse);
        let touch = pointers_with(2, PointerKind::Touch);
        let press = PressState::<u32>::new(PressOptions::default());
        let right = |id| PointerEvent::new(PointerId(id), 1).with_button(PointerButton::Secondary);

        assert_eq!(
            press.check_press(&mouse, &right(1)),
            Err(PressRejected::WrongButton)
        );
        assert!(press.can_press(&touch, &right(2)));
        assert_eq!(
            press.check_press(&mouse, &down(9)),
            Err(PressRejected::UnknownPointer)
        );
    }

    #[test]
    fn interrupt_reports_and_is_idempotent() {
        let mut pointers = pointers_with(1, PointerKind::Touch);
        let mut press = PressState::new(PressOptions::default());
        assert!(press.interrupt(&mut pointers).is_none());

        press.press(&mut pointers, &down(1), 1);
        press.note_drag();
        let released = press.interrupt(&mut pointers).unwrap();
        assert!(released.interrupted);
        assert!(released.dragged);
        assert!(press.is_interrupted());
        assert!(press.interrupt(&mut pointers).is_none());
        assert!(!pointers.pointer(PointerId(1)).unwrap().is_attached());

        press.press(&mut pointers, &down(1), 1);
        assert!(!press.is_interrupted());
        assert!(!press.has_dragged());
    }

    #[test]
    fn click_requires_opt_in_and_idle() {
        let mut pointers = pointers_with(1, PointerKind::Mouse);
        let mut disabled = PressState::<u32>::new(PressOptions {
            can_click: false,
            ..PressOptions::default()
        });
        assert!(!disabled.click());

        let mut press = PressState::new(PressOptions::default());
        assert!(press.click());
        press.press(&mut pointers, &down(1), 1);
        assert!(!press.click());
    }

    #[test]
    fn hover_and_highlight() {
        let mut pointers = Pointers::new();
        pointers.add(Pointer::new(PointerId(1), PointerKind::Mouse, Point::ZERO));
        pointers.add(Pointer::new(PointerId(2), PointerKind::Mouse, Point::ZERO));
        let mut press = PressState::<u32>::new(PressOptions::default());

        press.enter(PointerId(1));
        press.enter(PointerId(1));
        assert!(press.is_over());
        assert!(press.is_hovering(&pointers));

        // A pointer that is down on something else does not hover.
        pointers.down(PointerId(1), PointerButton::Primary);
        assert!(!press.is_hovering(&pointers));
        assert!(!press.is_highlighted(&pointers));

        press.press(&mut pointers, &down(1), 1);
        assert!(press.is_hovering(&pointers));
        assert!(press.looks_pressed());
        press.exit(PointerId(1));
        assert!(!press.looks_pressed());
        assert!(press.is_highlighted(&pointers));
        assert!(!press.is_over());
    }
}
