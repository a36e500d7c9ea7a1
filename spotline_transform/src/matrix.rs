// Copyright 2025 the Spotline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Checked inversion and rectangle bounding helpers.

use kurbo::{Affine, Rect};
use thiserror::Error;

/// Determinants smaller than this are treated as singular.
const DET_EPSILON: f64 = 1e-12;

/// A matrix could not be inverted because its determinant is (near) zero.
///
/// Under pure translate/rotate/scale composition this cannot occur; the
/// check exists so a degenerate matrix surfaces as an error instead of as
/// non-finite coefficients and false hits downstream.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("affine matrix is singular and cannot be inverted")]
pub struct DegenerateTransform;

/// Invert an affine matrix, rejecting singular input.
///
/// Returns the inverse mapping such that `checked_inverse(m)? * (m * p) == p`
/// up to floating-point error.
pub fn checked_inverse(m: Affine) -> Result<Affine, DegenerateTransform> {
    let [a, b, c, d, e, f] = m.as_coeffs();
    let det = a * d - b * c;
    if det < DET_EPSILON && det > -DET_EPSILON {
        return Err(DegenerateTransform);
    }
    let inv_det = det.recip();
    Ok(Affine::new([
        d * inv_det,
        -b * inv_det,
        -c * inv_det,
        a * inv_det,
        (c * f - d * e) * inv_det,
        (b * e - a * f) * inv_det,
    ]))
}

/// Transform an axis-aligned `Rect` by an `Affine` and return a conservative
/// axis-aligned bounding box in the target space.
pub fn transform_rect_bbox(affine: Affine, rect: Rect) -> Rect {
    let [a, b, c, d, e, f] = affine.as_coeffs();
    let min_x = (a * rect.x0).min(a * rect.x1) + (c * rect.y0).min(c * rect.y1);
    let max_x = (a * rect.x0).max(a * rect.x1) + (c * rect.y0).max(c * rect.y1);
    let min_y = (b * rect.x0).min(b * rect.x1) + (d * rect.y0).min(d * rect.y1);
    let max_y = (b * rect.x0).max(b * rect.x1) + (d * rect.y0).max(d * rect.y1);
    Rect::new(min_x + e, min_y + f, max_x + e, max_y + f)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::{Point, Vec2};

    #[test]
    fn inverse_round_trips_points() {
        let m = Affine::translate(Vec2::new(12.0, -7.0))
            * Affine::rotate(0.7)
            * Affine::scale(2.5);
        let inv = checked_inverse(m).expect("matrix is invertible");
        let p = Point::new(3.0, 9.0);
        let back = inv * (m * p);
        assert!((back - p).hypot() < 1e-9, "round trip drifted: {back:?}");
    }

    #[test]
    fn inverse_of_identity_is_identity() {
        let inv = checked_inverse(Affine::IDENTITY).expect("identity inverts");
        assert_eq!(inv, Affine::IDENTITY);
    }

    #[test]
    fn zero_scale_is_degenerate() {
        assert_eq!(
            checked_inverse(Affine::scale(0.0)),
            Err(DegenerateTransform)
        );
        // Collapsing a single axis is just as singular.
        assert_eq!(
            checked_inverse(Affine::scale_non_uniform(1.0, 0.0)),
            Err(DegenerateTransform)
        );
    }

    #[test]
    fn bbox_of_translated_rect() {
        let r = Rect::new(0.0, 0.0, 10.0, 20.0);
        let bb = transform_rect_bbox(Affine::translate(Vec2::new(5.0, 6.0)), r);
        assert_eq!(bb, Rect::new(5.0, 6.0, 15.0, 26.0));
    }

    #[test]
    fn bbox_of_rotated_rect_is_conservative() {
        // A unit square rotated 45 degrees spans sqrt(2) on each axis.
        let r = Rect::new(0.0, 0.0, 1.0, 1.0);
        let bb = transform_rect_bbox(Affine::rotate(core::f64::consts::FRAC_PI_4), r);
        let half = core::f64::consts::SQRT_2 / 2.0;
        assert!((bb.x0 - -half).abs() < 1e-9, "x0 was {}", bb.x0);
        assert!((bb.x1 - half).abs() < 1e-9, "x1 was {}", bb.x1);
        assert!(bb.y1 - bb.y0 > 1.0, "rotated bbox must expand");
    }
}
