// Copyright 2025 the Spotline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Spotline Transform: affine poses and the local-to-world transform stack.
//!
//! This crate is the geometry leaf of the Spotline workspace. It provides:
//!
//! - [`Pose`]: an entity's local placement (position, rotation in degrees
//!   about an anchor point) and its conversion to a [`kurbo::Affine`].
//! - [`TransformStack`]: an explicit stack that mirrors nested local-to-world
//!   accumulation during a depth-first scene traversal. The engine owns the
//!   stack and renderers consume matrices from it; nothing infers matrices
//!   from drawing-surface side effects.
//! - [`checked_inverse`]: matrix inversion that reports a
//!   [`DegenerateTransform`] for zero-determinant matrices instead of
//!   producing non-finite coefficients.
//! - [`transform_rect_bbox`]: a conservative world-space AABB of a
//!   transformed rectangle, used for damage tracking and bounds queries.
//!
//! Matrices are 2×3 affine with coefficients `[a, b, c, d, e, f]` such that
//! `x' = a·x + c·y + e` and `y' = b·x + d·y + f`, matching
//! [`kurbo::Affine::as_coeffs`]. Composition is `parent * local` and is
//! associative.
//!
//! ## Example
//!
//! ```rust
//! use kurbo::Point;
//! use spotline_transform::{Pose, TransformStack};
//!
//! // A 40x80 entity rotated half a turn about its center.
//! let pose = Pose {
//!     position: Point::new(100.0, 50.0),
//!     rotation: 180.0,
//!     anchor: Point::new(20.0, 40.0),
//! };
//!
//! let mut stack = TransformStack::new();
//! stack.push(pose.to_affine());
//! let world = stack.current();
//!
//! // Rotation about the anchor never moves the anchor itself.
//! let anchor_world = world * pose.anchor;
//! assert!((anchor_world.x - 120.0).abs() < 1e-9);
//! assert!((anchor_world.y - 90.0).abs() < 1e-9);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod matrix;
mod pose;
mod stack;

pub use matrix::{DegenerateTransform, checked_inverse, transform_rect_bbox};
pub use pose::Pose;
pub use stack::TransformStack;
