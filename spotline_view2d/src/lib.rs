// Copyright 2025 the Spotline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Spotline View2d: the pan/zoom viewport between scene and screen space.
//!
//! The viewport is a uniform scale plus two translations, entirely separate
//! from entity transforms: entities never know about zoom. A screen point is
//! produced as `scale * (scene + offset) - pan`, where `offset` is the
//! anchored base translation (where the content sits at scale 1) and `pan`
//! is the external scroll position a host scroll container owns.
//!
//! Zooming about a cursor keeps the scene point under the cursor visually
//! fixed: [`Viewport::zoom_at`] captures that point with the pre-change
//! mapping, applies the clamped new scale against the unchanged base
//! `offset`, and folds the whole residual drift into `pan`. The correction
//! is algebraically exact, so repeated zoom-in/zoom-out sequences do not
//! accumulate drift.
//!
//! ```rust
//! use kurbo::Point;
//! use spotline_view2d::Viewport;
//!
//! let mut view = Viewport::new();
//! let cursor = Point::new(400.0, 300.0);
//! let under_cursor = view.screen_to_scene(cursor);
//!
//! let pan_delta = view.zoom_at(cursor, 2.0);
//! assert_eq!(view.screen_to_scene(cursor), under_cursor);
//! assert!(pan_delta.hypot() > 0.0);
//! ```
//!
//! This crate is `no_std`.

#![no_std]

use kurbo::{Affine, Point, Vec2};

/// Lower bound on the configurable minimum scale; keeps the viewport matrix
/// invertible.
const SCALE_FLOOR: f64 = 1e-6;

/// Uniform-scale pan/zoom state mapping scene coordinates to screen
/// coordinates.
#[derive(Clone, Debug)]
pub struct Viewport {
    scale: f64,
    min_scale: f64,
    max_scale: f64,
    /// Anchored base translation, applied in scene space before scaling.
    offset: Vec2,
    /// External scroll position, applied in screen space after scaling.
    pan: Vec2,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new()
    }
}

impl Viewport {
    /// A viewport at scale 1 with no offset or pan, allowing scales in
    /// `[0.1, 10.0]`.
    pub fn new() -> Self {
        Self::with_scale_limits(0.1, 10.0)
    }

    /// A viewport at scale 1 with custom scale limits.
    pub fn with_scale_limits(min_scale: f64, max_scale: f64) -> Self {
        let min_scale = min_scale.max(SCALE_FLOOR);
        let max_scale = max_scale.max(min_scale);
        Self {
            scale: 1.0_f64.clamp(min_scale, max_scale),
            min_scale,
            max_scale,
            offset: Vec2::ZERO,
            pan: Vec2::ZERO,
        }
    }

    /// The current scale.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// The allowed scale range.
    pub fn scale_limits(&self) -> (f64, f64) {
        (self.min_scale, self.max_scale)
    }

    /// The anchored base translation.
    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    /// The external scroll position.
    pub fn pan(&self) -> Vec2 {
        self.pan
    }

    /// Set the scale, clamped to the configured limits, with no cursor
    /// correction. Use [`Viewport::zoom_at`] for zooming about a point.
    pub fn set_scale(&mut self, scale: f64) {
        self.scale = scale.clamp(self.min_scale, self.max_scale);
    }

    /// Set the anchored base translation.
    pub fn set_offset(&mut self, offset: Vec2) {
        self.offset = offset;
    }

    /// Set the external scroll position.
    pub fn set_pan(&mut self, pan: Vec2) {
        self.pan = pan;
    }

    /// The scene-to-screen matrix.
    pub fn matrix(&self) -> Affine {
        Affine::translate(-self.pan) * Affine::scale(self.scale) * Affine::translate(self.offset)
    }

    /// Map a scene-space point to screen space.
    pub fn scene_to_screen(&self, point: Point) -> Point {
        Point::new(
            self.scale * (point.x + self.offset.x) - self.pan.x,
            self.scale * (point.y + self.offset.y) - self.pan.y,
        )
    }

    /// Map a screen-space point (for example a pointer event position) to
    /// scene space.
    pub fn screen_to_scene(&self, point: Point) -> Point {
        // `scale` is clamped above SCALE_FLOOR, so the division is sound.
        Point::new(
            (point.x + self.pan.x) / self.scale - self.offset.x,
            (point.y + self.pan.y) / self.scale - self.offset.y,
        )
    }

    /// Zoom to `new_scale` (clamped) keeping the scene point under `cursor`
    /// visually fixed.
    ///
    /// The base `offset` stays anchored; the entire correction lands in
    /// `pan`. Returns the change in `pan` so a host scroll container can
    /// mirror its scroll position.
    pub fn zoom_at(&mut self, cursor: Point, new_scale: f64) -> Vec2 {
        let anchored = self.screen_to_scene(cursor);
        self.scale = new_scale.clamp(self.min_scale, self.max_scale);
        let old_pan = self.pan;
        self.pan = Vec2::new(
            self.scale * (anchored.x + self.offset.x) - cursor.x,
            self.scale * (anchored.y + self.offset.y) - cursor.y,
        );
        self.pan - old_pan
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: Point, b: Point) {
        assert!(
            (a - b).hypot() < 1e-6,
            "points differ beyond tolerance: {a:?} vs {b:?}"
        );
    }

    #[test]
    fn identity_viewport_maps_points_unchanged() {
        let view = Viewport::new();
        let p = Point::new(123.0, -45.0);
        assert_eq!(view.scene_to_screen(p), p);
        assert_eq!(view.screen_to_scene(p), p);
    }

    #[test]
    fn conversions_are_inverse_of_each_other() {
        let mut view = Viewport::new();
        view.set_scale(2.5);
        view.set_offset(Vec2::new(40.0, -10.0));
        view.set_pan(Vec2::new(120.0, 35.0));
        let p = Point::new(77.0, 203.0);
        assert_close(view.screen_to_scene(view.scene_to_screen(p)), p);
        assert_close(view.scene_to_screen(view.screen_to_scene(p)), p);
    }

    #[test]
    fn matrix_matches_the_closed_form() {
        let mut view = Viewport::new();
        view.set_scale(3.0);
        view.set_offset(Vec2::new(10.0, 20.0));
        view.set_pan(Vec2::new(5.0, 7.0));
        let p = Point::new(11.0, 13.0);
        assert_close(view.matrix() * p, view.scene_to_screen(p));
    }

    #[test]
    fn scale_is_clamped_to_limits() {
        let mut view = Viewport::with_scale_limits(0.5, 4.0);
        view.set_scale(100.0);
        assert_eq!(view.scale(), 4.0);
        view.set_scale(0.01);
        assert_eq!(view.scale(), 0.5);
        view.zoom_at(Point::ZERO, 99.0);
        assert_eq!(view.scale(), 4.0);
    }

    #[test]
    fn zoom_keeps_the_cursor_point_fixed() {
        let mut view = Viewport::new();
        view.set_offset(Vec2::new(30.0, 60.0));
        let cursor = Point::new(400.0, 300.0);
        let anchored = view.screen_to_scene(cursor);

        view.zoom_at(cursor, 2.0);
        assert_close(view.screen_to_scene(cursor), anchored);

        view.zoom_at(cursor, 0.4);
        assert_close(view.screen_to_scene(cursor), anchored);
    }

    #[test]
    fn repeated_zooms_do_not_accumulate_drift() {
        let mut view = Viewport::new();
        view.set_offset(Vec2::new(-15.0, 8.0));
        view.set_pan(Vec2::new(200.0, 100.0));
        let cursor = Point::new(640.0, 360.0);
        let anchored = view.screen_to_scene(cursor);

        for step in 0..100 {
            let target = if step % 2 == 0 { 3.7 } else { 0.21 };
            view.zoom_at(cursor, target);
            assert_close(view.screen_to_scene(cursor), anchored);
        }
    }

    #[test]
    fn zoom_reports_the_pan_delta() {
        let mut view = Viewport::new();
        let cursor = Point::new(100.0, 100.0);
        let before = view.pan();
        let delta = view.zoom_at(cursor, 2.0);
        assert_eq!(view.pan() - before, delta);
        // At scale 2 with zero offset the pan must equal the cursor point
        // itself for the cursor-scene point to stay fixed.
        assert_eq!(view.pan(), Vec2::new(100.0, 100.0));
    }

    #[test]
    fn offset_stays_anchored_across_zoom() {
        let mut view = Viewport::new();
        view.set_offset(Vec2::new(25.0, 35.0));
        view.zoom_at(Point::new(50.0, 50.0), 1.5);
        assert_eq!(view.offset(), Vec2::new(25.0, 35.0));
    }

    #[test]
    fn degenerate_limits_are_floored() {
        let view = Viewport::with_scale_limits(0.0, -1.0);
        let (min, max) = view.scale_limits();
        assert!(min > 0.0);
        assert!(max >= min);
    }
}
