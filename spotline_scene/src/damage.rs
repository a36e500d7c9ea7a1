// Copyright 2025 the Spotline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Repaint summary returned from the traversal pass.

use kurbo::Rect;

/// World-space regions whose contents changed during [`crate::Scene::traverse`].
///
/// The rectangles may overlap and are not a minimal cover; they are
/// sufficient to bound a repaint.
#[derive(Clone, Debug, Default)]
pub struct Damage {
    /// World-space rectangles that should be repainted.
    pub dirty_rects: alloc::vec::Vec<Rect>,
}

impl Damage {
    /// Returns the union of all damage rects, or `None` when nothing moved.
    pub fn union_rect(&self) -> Option<Rect> {
        let mut it = self.dirty_rects.iter().copied();
        let first = it.next()?;
        Some(it.fold(first, |acc, r| acc.union(r)))
    }
}
