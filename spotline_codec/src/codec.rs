// Copyright 2025 the Spotline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Encoding a scene subtree to records and rebuilding it.

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use kurbo::{Point, Size};
use spotline_scene::{EntityFlags, EntityId, EntityKind, Scene};

use crate::error::CodecError;
use crate::record::EntityRecord;
use crate::registry::Registry;

/// Encode an entity subtree to its transferable record.
///
/// Children are encoded in attachment order. Kinds that own generated
/// children encode the generating parameters instead of the children
/// themselves. Returns `None` for stale ids.
pub fn encode(scene: &Scene, id: EntityId) -> Option<EntityRecord> {
    let local = scene.local(id)?;
    let mut record = EntityRecord {
        tag: local.kind.tag().to_string(),
        x: local.pose.position.x,
        y: local.pose.position.y,
        rotation: local.pose.rotation,
        anchor: [local.pose.anchor.x, local.pose.anchor.y],
        width: local.size.map(|sz| sz.width),
        height: local.size.map(|sz| sz.height),
        visible: local.flags.contains(EntityFlags::VISIBLE),
        selectable: local.flags.contains(EntityFlags::SELECTABLE),
        length: None,
        mirrored: None,
        text: None,
        font_size: None,
        children: Vec::new(),
    };
    match &local.kind {
        EntityKind::SpotGroup { length, mirrored } => {
            record.length = Some(*length);
            record.mirrored = Some(*mirrored);
            // Generated spots are derived data; decoding regenerates them
            // from length/mirrored.
            return Some(record);
        }
        EntityKind::Label { text, font_size } => {
            record.text = Some(text.clone());
            record.font_size = Some(*font_size);
        }
        EntityKind::Generic | EntityKind::Spot { .. } | EntityKind::DebugPoint => {}
    }
    for &child in scene.children_of(id) {
        record.children.push(encode(scene, child)?);
    }
    Some(record)
}

/// Rebuild a record subtree inside `scene`, attached under `parent`.
///
/// Each record's tag is resolved through the registry to a default entity,
/// whose generic fields are then overwritten from the record; the entity is
/// attached through the normal insertion path so attach hooks (spot id
/// allocation, spot-group generation) run exactly as for freshly built
/// entities. On error the partially built subtree is removed again.
pub fn decode(
    scene: &mut Scene,
    registry: &Registry,
    parent: Option<EntityId>,
    record: &EntityRecord,
) -> Result<EntityId, CodecError> {
    let mut local = registry.construct(record)?;
    local.pose.position = Point::new(record.x, record.y);
    local.pose.rotation = record.rotation;
    local.pose.anchor = Point::new(record.anchor[0], record.anchor[1]);
    if let (Some(width), Some(height)) = (record.width, record.height) {
        local.size = Some(Size::new(width, height));
    }
    let mut flags = EntityFlags::empty();
    flags.set(EntityFlags::VISIBLE, record.visible);
    flags.set(EntityFlags::SELECTABLE, record.selectable);
    local.flags = flags;

    let owns_children = matches!(local.kind, EntityKind::SpotGroup { .. });
    let id = scene.insert(parent, local);
    if !owns_children {
        for child in &record.children {
            if let Err(err) = decode(scene, registry, Some(id), child) {
                scene.remove(id);
                return Err(err);
            }
        }
    }
    Ok(id)
}

/// Print a record tree as JSON.
pub fn to_json_string(record: &EntityRecord) -> Result<String, CodecError> {
    Ok(serde_json::to_string(record)?)
}

/// Parse a record tree from JSON.
pub fn from_json_str(json: &str) -> Result<EntityRecord, CodecError> {
    Ok(serde_json::from_str(json)?)
}
