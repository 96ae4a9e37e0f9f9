// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared model-space position.

use alloc::rc::Rc;
use core::cell::{Cell, RefCell};
use core::fmt;

use kurbo::Point;
use smallvec::SmallVec;

/// Callback invoked with `(old, new)` after every [`PositionCell::set`].
pub type PositionChangedCallback = Rc<dyn Fn(Point, Point)>;

struct Inner {
    value: Cell<Point>,
    revision: Cell<u64>,
    listeners: RefCell<SmallVec<[PositionChangedCallback; 2]>>,
}

/// A model-space position shared between a drag listener and the rest of an
/// application.
///
/// Cloning yields another handle to the same cell. Every [`set`](Self::set)
/// bumps the [`revision`](Self::revision) and notifies listeners, even when the
/// new value equals the old one, so observers that compare revisions see each
/// write.
///
/// ```
/// use kurbo::Point;
/// use understory_drag::PositionCell;
///
/// let cell = PositionCell::new(Point::ZERO);
/// let view = cell.clone();
/// cell.set(Point::new(3.0, 4.0));
/// assert_eq!(view.get(), Point::new(3.0, 4.0));
/// assert_eq!(view.revision(), 1);
/// ```
#[derive(Clone)]
pub struct PositionCell {
    inner: Rc<Inner>,
}

impl PositionCell {
    /// Creates a cell holding `value`, at revision 0.
    pub fn new(value: Point) -> Self {
        Self {
            inner: Rc::new(Inner {
                value: Cell::new(value),
                revision: Cell::new(0),
                listeners: RefCell::new(SmallVec::new()),
            }),
        }
    }

    /// The current value.
    pub fn get(&self) -> Point {
        self.inner.value.get()
    }

    /// Stores `value` and notifies listeners.
    ///
    /// Listeners may read the cell, write it again, or register more listeners;
    /// ones registered during notification are first called on the next write.
    pub fn set(&self, value: Point) {
        let old = self.inner.value.replace(value);
        self.inner.revision.set(self.inner.revision.get() + 1);
        let listeners = self.inner.listeners.borrow().clone();
        for listener in &listeners {
            listener(old, value);
        }
    }

    /// Number of writes since creation.
    pub fn revision(&self) -> u64 {
        self.inner.revision.get()
    }

    /// Registers a callback invoked after each write with the old and new value.
    pub fn on_changed<F>(&self, callback: F)
    where
        F: Fn(Point, Point) + 'static,
    {
        let callback: PositionChangedCallback = Rc::new(callback);
        self.inner.listeners.borrow_mut().push(callback);
    }

    /// Whether both handles refer to the same cell.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for PositionCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PositionCell")
            .field("value", &self.get())
            .field("revision", &self.revision())
            .field("listeners", &self.inner.listeners.borrow().len())
            .finish()
    }
}
