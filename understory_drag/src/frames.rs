// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Coordinate frames a drag moves through.
//!
//! ```text
//! global ──global_to_parent──▶ parent ──parent_to_local──▶ local
//!                                │  ▲
//!                 parent_to_model│  │model_to_parent
//!                                ▼  │
//!                                model
//! ```
//!
//! *Global* is the pointer's frame. *Parent* is the frame the dragged node's own
//! transform is expressed in; writing a translation there moves the node.
//! *Local* is the node's own frame, where the grab point lives. *Model* is the
//! application's frame for the bound position, related to parent by an optional
//! invertible transform.

use kurbo::{Affine, Point};

use crate::error::DragError;
use crate::scene::TransformChain;

/// Relation between the parent frame and the application's model frame.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum ModelSpace {
    /// Model and parent coordinates coincide.
    #[default]
    Identity,
    /// Model coordinates map to parent coordinates through `to_parent`.
    Transform {
        /// Model → parent.
        to_parent: Affine,
        /// Parent → model, the inverse of `to_parent`.
        to_model: Affine,
    },
}

impl ModelSpace {
    /// Builds a model space from a model → parent transform.
    ///
    /// Fails when the transform is not finite or not invertible.
    pub fn from_transform(to_parent: Affine) -> Result<Self, DragError> {
        let det = to_parent.determinant();
        if !to_parent.is_finite() || det == 0.0 || !det.is_finite() {
            return Err(DragError::SingularModelTransform(to_parent));
        }
        if to_parent == Affine::IDENTITY {
            return Ok(Self::Identity);
        }
        Ok(Self::Transform {
            to_parent,
            to_model: to_parent.inverse(),
        })
    }

    /// Parent → model.
    pub fn parent_to_model(&self, point: Point) -> Point {
        match self {
            Self::Identity => point,
            Self::Transform { to_model, .. } => *to_model * point,
        }
    }

    /// Model → parent.
    pub fn model_to_parent(&self, point: Point) -> Point {
        match self {
            Self::Identity => point,
            Self::Transform { to_parent, .. } => *to_parent * point,
        }
    }

    /// Upper bound on the condition number of the linear part. `1` for the identity.
    #[cfg_attr(
        not(debug_assertions),
        allow(dead_code, reason = "only used by debug consistency checks")
    )]
    pub(crate) fn condition(&self) -> f64 {
        match self {
            Self::Identity => 1.0,
            Self::Transform { to_parent, .. } => {
                let [a, b, c, d, _, _] = to_parent.as_coeffs();
                (a * a + b * b + c * c + d * d) / to_parent.determinant().abs()
            }
        }
    }
}

/// Transforms around one dragged node, read from the scene at one instant.
///
/// Frames are cheap to capture and must be recaptured whenever the scene may
/// have changed, since the node's own translation and its ancestors both move
/// during a drag.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Frames {
    parent_to_global: Affine,
    local_to_parent: Affine,
}

impl Frames {
    /// Reads the current transforms of `node` from `scene`.
    pub fn capture<C: TransformChain + ?Sized>(scene: &C, node: C::Node) -> Self {
        Self {
            parent_to_global: scene.parent_to_global(node),
            local_to_parent: scene.local_transform(node),
        }
    }

    /// Builds frames from explicit transforms.
    pub fn new(parent_to_global: Affine, local_to_parent: Affine) -> Self {
        Self {
            parent_to_global,
            local_to_parent,
        }
    }

    /// Global → parent.
    pub fn global_to_parent(&self, point: Point) -> Point {
        self.parent_to_global.inverse() * point
    }

    /// Parent → global.
    pub fn parent_to_global(&self, point: Point) -> Point {
        self.parent_to_global * point
    }

    /// Parent → local.
    pub fn parent_to_local(&self, point: Point) -> Point {
        self.local_to_parent.inverse() * point
    }

    /// Local → parent.
    pub fn local_to_parent(&self, point: Point) -> Point {
        self.local_to_parent * point
    }

    /// Where the node's local origin sits in the parent frame.
    pub fn parent_origin(&self) -> Point {
        self.local_to_parent(Point::ORIGIN)
    }
}

#[cfg(test)]
fn nearly_equal(a: Point, b: Point) -> bool {
    nearly_equal_within(a, b, 1e-6)
}

/// Whether two points agree to within `relative` times their magnitude.
#[cfg_attr(
    not(debug_assertions),
    allow(dead_code, reason = "only used by debug consistency checks")
)]
pub(crate) fn nearly_equal_within(a: Point, b: Point, relative: f64) -> bool {
    let scale = 1.0_f64.max(a.x.abs()).max(a.y.abs()).max(b.x.abs()).max(b.y.abs());
    let tolerance = relative * scale;
    (a.x - b.x).abs() <= tolerance && (a.y - b.y).abs() <= tolerance
}
