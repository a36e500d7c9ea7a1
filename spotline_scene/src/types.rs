// Copyright 2025 the Spotline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the scene: entity identifiers, flags, and local data.

use alloc::string::String;
use kurbo::{Point, Size};
use spotline_transform::Pose;

use crate::entity::{EntityKind, label_metrics, spot_size};

/// Identifier for an entity in the scene (generational).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct EntityId(pub(crate) u32, pub(crate) u32);

impl EntityId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

bitflags::bitflags! {
    /// Entity flags controlling visibility and selection eligibility.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct EntityFlags: u8 {
        /// Entity is visible (participates in drawing).
        const VISIBLE    = 0b0000_0001;
        /// Entity may appear on the selection stack. Non-selectable nodes
        /// (such as the scene root) act as transparent selection barriers.
        const SELECTABLE = 0b0000_0010;
    }
}

impl Default for EntityFlags {
    fn default() -> Self {
        Self::VISIBLE | Self::SELECTABLE
    }
}

/// Local (parent-relative) data for an entity.
#[derive(Clone, Debug)]
pub struct LocalEntity {
    /// Placement relative to the parent's origin: position, rotation in
    /// degrees about the anchor, and the anchor itself.
    pub pose: Pose,
    /// Hit-testable bounding box, with the local origin at its top-left.
    /// `None` means the entity is a pure grouping node and never matches a
    /// hit test or bounds query.
    pub size: Option<Size>,
    /// Visibility and selection flags.
    pub flags: EntityFlags,
    /// Which variant this entity is, with its variant-specific data.
    pub kind: EntityKind,
}

impl Default for LocalEntity {
    fn default() -> Self {
        Self {
            pose: Pose::default(),
            size: None,
            flags: EntityFlags::default(),
            kind: EntityKind::Generic,
        }
    }
}

impl LocalEntity {
    /// A plain grouping entity with no size of its own.
    pub fn generic(position: Point) -> Self {
        Self {
            pose: Pose::at(position),
            ..Self::default()
        }
    }

    /// A single parking spot, rotated about its centered anchor.
    ///
    /// The display id is allocated when the spot is attached to the scene.
    pub fn spot(position: Point, rotation: f64) -> Self {
        let size = spot_size();
        Self {
            pose: Pose {
                position,
                rotation,
                anchor: Point::new(size.width / 2.0, size.height / 2.0),
            },
            size: Some(size),
            flags: EntityFlags::default(),
            kind: EntityKind::Spot { id: None },
        }
    }

    /// A row (or mirrored double row) of generated spots.
    ///
    /// Inserting a spot group generates its spot children; they are owned by
    /// the group and regenerate whenever `length`/`mirrored` change.
    pub fn spot_group(position: Point, length: usize, mirrored: bool) -> Self {
        let spot = spot_size();
        #[allow(
            clippy::cast_precision_loss,
            reason = "group lengths are tiny; f64 is exact here"
        )]
        let width = length as f64 * spot.width;
        let (height, anchor_y) = if mirrored {
            (2.0 * spot.height, spot.height)
        } else {
            (spot.height, 0.0)
        };
        Self {
            pose: Pose {
                position,
                rotation: 0.0,
                anchor: Point::new(0.0, anchor_y),
            },
            size: Some(Size::new(width, height)),
            flags: EntityFlags::default(),
            kind: EntityKind::SpotGroup { length, mirrored },
        }
    }

    /// A text label; size and anchor come from deterministic text metrics.
    pub fn label(position: Point, text: String, font_size: f64) -> Self {
        let (size, anchor) = label_metrics(&text, font_size);
        Self {
            pose: Pose {
                position,
                rotation: 0.0,
                anchor,
            },
            size: Some(size),
            flags: EntityFlags::default(),
            kind: EntityKind::Label { text, font_size },
        }
    }

    /// A diagnostic marker: drawn as a dot, never selectable or hit-tested.
    pub fn debug_point(position: Point) -> Self {
        Self {
            pose: Pose::at(position),
            size: None,
            flags: EntityFlags::VISIBLE,
            kind: EntityKind::DebugPoint,
        }
    }

    /// Whether this entity may appear on the selection stack.
    pub fn selectable(&self) -> bool {
        self.flags.contains(EntityFlags::SELECTABLE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn spot_defaults_match_lot_geometry() {
        let spot = LocalEntity::spot(Point::new(500.0, 200.0), 135.0);
        assert_eq!(spot.size, Some(Size::new(40.0, 80.0)));
        assert_eq!(spot.pose.anchor, Point::new(20.0, 40.0));
        assert!(spot.selectable());
        assert!(matches!(spot.kind, EntityKind::Spot { id: None }));
    }

    #[test]
    fn mirrored_group_doubles_height_and_raises_anchor() {
        let single = LocalEntity::spot_group(Point::ZERO, 3, false);
        assert_eq!(single.size, Some(Size::new(120.0, 80.0)));
        assert_eq!(single.pose.anchor, Point::ZERO);

        let double = LocalEntity::spot_group(Point::ZERO, 3, true);
        assert_eq!(double.size, Some(Size::new(120.0, 160.0)));
        assert_eq!(double.pose.anchor, Point::new(0.0, 80.0));
    }

    #[test]
    fn debug_point_is_never_selectable() {
        let point = LocalEntity::debug_point(Point::ZERO);
        assert!(!point.selectable());
        assert!(point.size.is_none());
    }

    #[test]
    fn label_size_scales_with_text_and_font() {
        let short = LocalEntity::label(Point::ZERO, "ab".to_string(), 10.0);
        let long = LocalEntity::label(Point::ZERO, "abcd".to_string(), 10.0);
        let short_w = short.size.expect("labels have a size").width;
        let long_w = long.size.expect("labels have a size").width;
        assert!(long_w > short_w, "longer text must measure wider");
    }
}
