// Copyright 2025 the Spotline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Entity variants and their per-variant behavior.

use alloc::format;
use alloc::string::String;
use kurbo::{Point, Rect, Size};

use crate::ids::IdAllocator;

/// Base width of a parking spot, in layout units.
pub const SPOT_WIDTH: f64 = 4.0;
/// Base height of a parking spot, in layout units.
pub const SPOT_HEIGHT: f64 = 8.0;
/// Layout-unit to scene-unit scale factor.
pub const SPOT_SCALE: f64 = 10.0;
/// Padding applied around an entity's box when drawing selection bounds.
pub const SELECTION_PADDING: f64 = 3.0;

/// The scene-space size of a single spot.
pub fn spot_size() -> Size {
    Size::new(SPOT_WIDTH * SPOT_SCALE, SPOT_HEIGHT * SPOT_SCALE)
}

/// Deterministic text metrics for labels: a fixed per-character advance and
/// line height, with the anchor centered in the measured box.
pub(crate) fn label_metrics(text: &str, font_size: f64) -> (Size, Point) {
    #[allow(
        clippy::cast_precision_loss,
        reason = "label lengths are tiny; f64 is exact here"
    )]
    let chars = text.chars().count().max(1) as f64;
    let size = Size::new(0.6 * font_size * chars, 1.2 * font_size);
    (size, Point::new(size.width / 2.0, size.height / 2.0))
}

/// The closed set of entity variants.
///
/// Behavior is dispatched per variant through [`EntityKind::primitive`],
/// [`EntityKind::annotation`], and the attach/detach hooks the scene runs
/// when an entity joins or leaves the registered tree. The serialization
/// registry maps each variant's [`EntityKind::tag`] back to a constructor.
#[derive(Clone, Debug, PartialEq)]
pub enum EntityKind {
    /// A pure grouping node (wire tag `"Entity"`).
    Generic,
    /// A single parking spot with a display id allocated on attach.
    Spot {
        /// Display id; `None` until the spot is attached to the scene.
        id: Option<u32>,
    },
    /// A generated row (or mirrored double row) of spots.
    SpotGroup {
        /// Number of spots per row.
        length: usize,
        /// Whether a second, 180°-rotated row is generated above the first.
        mirrored: bool,
    },
    /// A text label.
    Label {
        /// The label text.
        text: String,
        /// Font size; the measured box derives from it.
        font_size: f64,
    },
    /// A diagnostic marker drawn as a dot.
    DebugPoint,
}

impl EntityKind {
    /// The wire/type tag used by the serialization registry.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Generic => "Entity",
            Self::Spot { .. } => "Spot",
            Self::SpotGroup { .. } => "SpotGroup",
            Self::Label { .. } => "Label",
            Self::DebugPoint => "DebugPoint",
        }
    }

    /// Hook run when the entity joins the registered tree.
    pub(crate) fn on_attach(&mut self, ids: &mut IdAllocator) {
        if let Self::Spot { id } = self {
            *id = Some(ids.allocate());
        }
    }

    /// Hook run when the entity leaves the registered tree.
    pub(crate) fn on_detach(&mut self, ids: &mut IdAllocator) {
        if let Self::Spot { id } = self
            && let Some(spot_id) = id.take()
        {
            ids.release(spot_id);
        }
    }

    /// The shape a renderer draws for this entity, in local coordinates.
    pub fn primitive(&self, size: Option<Size>) -> Option<Primitive> {
        match self {
            Self::Spot { .. } => size.map(|sz| Primitive::Stall(sz.to_rect())),
            Self::Label { text, font_size } => Some(Primitive::Text {
                text: text.clone(),
                origin: Point::new(10.0, 10.0),
                font_size: *font_size,
            }),
            Self::DebugPoint => Some(Primitive::Dot { radius: 5.0 }),
            Self::Generic | Self::SpotGroup { .. } => None,
        }
    }

    /// The untransformed overlay a renderer draws for this entity, given the
    /// world position of its anchor.
    pub fn annotation(&self, world_anchor: Point) -> Option<Primitive> {
        match self {
            Self::Spot { id: Some(id) } => Some(Primitive::Text {
                text: format!("{id}"),
                origin: world_anchor,
                font_size: 10.0,
            }),
            _ => None,
        }
    }
}

/// A drawable description consumed by rendering collaborators.
///
/// The core never rasterizes anything; it only describes what each variant
/// looks like so a renderer can paint it under the matrices the traversal
/// produces.
#[derive(Clone, Debug, PartialEq)]
pub enum Primitive {
    /// An open three-sided stall outline (left, top, and right edges of the
    /// rect; the entrance edge stays open).
    Stall(Rect),
    /// A filled dot at the local origin.
    Dot {
        /// Dot radius in scene units.
        radius: f64,
    },
    /// Text drawn at a point.
    Text {
        /// The text to draw.
        text: String,
        /// Where to draw it.
        origin: Point,
        /// Font size to draw it at.
        font_size: f64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn tags_cover_every_variant() {
        assert_eq!(EntityKind::Generic.tag(), "Entity");
        assert_eq!(EntityKind::Spot { id: None }.tag(), "Spot");
        assert_eq!(
            EntityKind::SpotGroup {
                length: 1,
                mirrored: false
            }
            .tag(),
            "SpotGroup"
        );
        assert_eq!(
            EntityKind::Label {
                text: "x".to_string(),
                font_size: 10.0
            }
            .tag(),
            "Label"
        );
        assert_eq!(EntityKind::DebugPoint.tag(), "DebugPoint");
    }

    #[test]
    fn attach_allocates_and_detach_releases_spot_ids() {
        let mut ids = IdAllocator::new();
        let mut kind = EntityKind::Spot { id: None };
        kind.on_attach(&mut ids);
        assert_eq!(kind, EntityKind::Spot { id: Some(0) });

        kind.on_detach(&mut ids);
        assert_eq!(kind, EntityKind::Spot { id: None });
        assert!(ids.is_empty(), "released id must return to the pool");
    }

    #[test]
    fn attach_hooks_ignore_other_variants() {
        let mut ids = IdAllocator::new();
        let mut kind = EntityKind::Generic;
        kind.on_attach(&mut ids);
        kind.on_detach(&mut ids);
        assert!(ids.is_empty(), "non-spot variants never touch the allocator");
    }

    #[test]
    fn spot_annotation_shows_its_id() {
        let kind = EntityKind::Spot { id: Some(7) };
        let ann = kind.annotation(Point::new(3.0, 4.0));
        assert_eq!(
            ann,
            Some(Primitive::Text {
                text: "7".to_string(),
                origin: Point::new(3.0, 4.0),
                font_size: 10.0,
            })
        );
        // Unattached spots have nothing to annotate yet.
        assert_eq!(EntityKind::Spot { id: None }.annotation(Point::ZERO), None);
    }

    #[test]
    fn grouping_variants_have_no_primitive() {
        assert_eq!(EntityKind::Generic.primitive(None), None);
        assert_eq!(
            EntityKind::SpotGroup {
                length: 2,
                mirrored: true
            }
            .primitive(Some(Size::new(80.0, 160.0))),
            None
        );
    }
}
