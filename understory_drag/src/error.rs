// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Construction errors.

use kurbo::{Affine, Rect};

/// Why a [`DragOptions`](crate::DragOptions) could not become a listener.
///
/// Every variant describes a configuration that can never drag correctly, so
/// they are reported once by [`DragListener::new`](crate::DragListener::new)
/// instead of surfacing as misbehavior mid-gesture.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum DragError {
    /// `use_parent_offset` needs a bound position cell to measure the offset from.
    #[error("parent-offset dragging requires a bound position cell")]
    ParentOffsetWithoutPosition,
    /// `use_parent_offset` was requested while offsets are disabled.
    #[error("parent-offset dragging requires `apply_offset` to be enabled")]
    ParentOffsetWithoutApplyOffset,
    /// The model transform has no inverse.
    #[error("model transform {0:?} is not invertible")]
    SingularModelTransform(Affine),
    /// Drag bounds with non-finite or inverted edges.
    #[error("drag bounds {0:?} are not a finite, non-inverted rectangle")]
    InvalidDragBounds(Rect),
}
