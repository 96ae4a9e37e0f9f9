// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! How the raw pointer position becomes a model position.

use alloc::boxed::Box;
use core::fmt;

use kurbo::{Point, Rect, Vec2};

/// Remaps a model-space point.
pub type MapPositionFn = Box<dyn Fn(Point) -> Point>;

/// Extra parent-space offset computed from the offset-free parent point.
pub type OffsetPositionFn = Box<dyn Fn(Point) -> Vec2>;

/// Constraint applied to every model point before it is published.
#[derive(Default)]
pub enum ClampPolicy {
    /// Accept every point.
    #[default]
    None,
    /// Snap to the closest point inside a rectangle.
    Rect(Rect),
    /// Arbitrary remap.
    Custom(MapPositionFn),
}

impl ClampPolicy {
    /// Combines the optional remap and bounds, remap first.
    pub fn from_parts(map: Option<MapPositionFn>, bounds: Option<Rect>) -> Self {
        match (map, bounds) {
            (None, None) => Self::None,
            (None, Some(rect)) => Self::Rect(rect),
            (Some(map), None) => Self::Custom(map),
            (Some(map), Some(rect)) => {
                Self::Custom(Box::new(move |p| closest_point_in(rect, map(p))))
            }
        }
    }

    /// Applies the constraint.
    pub fn apply(&self, point: Point) -> Point {
        match self {
            Self::None => point,
            Self::Rect(rect) => closest_point_in(*rect, point),
            Self::Custom(map) => map(point),
        }
    }
}

impl fmt::Debug for ClampPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Rect(rect) => f.debug_tuple("Rect").field(rect).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// The point of `rect` closest to `point`; `point` itself when inside or on the edge.
pub fn closest_point_in(rect: Rect, point: Point) -> Point {
    Point::new(
        point.x.max(rect.x0).min(rect.x1),
        point.y.max(rect.y0).min(rect.y1),
    )
}

/// How the grab offset between pointer and node is preserved.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum OffsetStrategy {
    /// The node's origin follows the pointer exactly.
    None,
    /// The local point grabbed at press time stays under the pointer.
    #[default]
    LocalOrigin,
    /// The parent-space offset between pointer and bound position at press time
    /// is kept constant.
    ParentOffset,
}

impl OffsetStrategy {
    /// Derives the strategy from the two listener flags.
    pub fn from_flags(apply_offset: bool, use_parent_offset: bool) -> Self {
        match (apply_offset, use_parent_offset) {
            (false, _) => Self::None,
            (true, false) => Self::LocalOrigin,
            (true, true) => Self::ParentOffset,
        }
    }
}
