// Copyright 2025 the Spotline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Local entity placement and its affine form.

use core::f64::consts::PI;
use kurbo::{Affine, Point};

/// An entity's local placement relative to its parent's origin.
///
/// The rotation is expressed in degrees and is applied about [`Pose::anchor`],
/// so the full local transform is
/// `translate(position) · translate(anchor) · rotate(rotation) · translate(−anchor)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pose {
    /// Offset from the parent's origin.
    pub position: Point,
    /// Rotation in degrees, counter-clockwise, applied about `anchor`.
    pub rotation: f64,
    /// Local pivot point the rotation is applied about.
    pub anchor: Point,
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            position: Point::ZERO,
            rotation: 0.0,
            anchor: Point::ZERO,
        }
    }
}

impl Pose {
    /// A pose that only translates by `position`.
    pub fn at(position: Point) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// The local transform this pose describes.
    ///
    /// Composing this with the parent's world transform
    /// (`parent_world * pose.to_affine()`) yields the entity's world matrix.
    pub fn to_affine(&self) -> Affine {
        let radians = self.rotation * (PI / 180.0);
        Affine::translate(self.position.to_vec2())
            * Affine::translate(self.anchor.to_vec2())
            * Affine::rotate(radians)
            * Affine::translate(-self.anchor.to_vec2())
    }
}
