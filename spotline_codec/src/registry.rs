// Copyright 2025 the Spotline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Type-tag to constructor mapping used during decoding.

use alloc::string::{String, ToString};
use hashbrown::HashMap;
use kurbo::Point;
use spotline_scene::LocalEntity;

use crate::error::CodecError;
use crate::record::EntityRecord;

/// Builds a default entity of one variant from a record's type-specific
/// fields. Generic fields (pose, size, flags) are overwritten by the decoder
/// afterwards.
pub type Factory = fn(&EntityRecord) -> Result<LocalEntity, CodecError>;

/// Maps type tags to entity factories.
///
/// [`Registry::standard`] covers the built-in variants; hosts can
/// [`Registry::register`] additional tags to extend the wire format without
/// touching the decoder.
#[derive(Clone, Debug)]
pub struct Registry {
    factories: HashMap<String, Factory>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::standard()
    }
}

impl Registry {
    /// A registry with no tags at all.
    pub fn empty() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// A registry covering the built-in variant set.
    pub fn standard() -> Self {
        let mut registry = Self::empty();
        registry.register("Entity", generic);
        registry.register("Spot", spot);
        registry.register("SpotGroup", spot_group);
        registry.register("Label", label);
        registry.register("DebugPoint", debug_point);
        registry
    }

    /// Map `tag` to `factory`, replacing any previous mapping.
    pub fn register(&mut self, tag: &str, factory: Factory) {
        self.factories.insert(tag.to_string(), factory);
    }

    /// Whether a factory is registered for `tag`.
    pub fn knows(&self, tag: &str) -> bool {
        self.factories.contains_key(tag)
    }

    /// Run the factory for the record's tag.
    pub fn construct(&self, record: &EntityRecord) -> Result<LocalEntity, CodecError> {
        let factory = self
            .factories
            .get(record.tag.as_str())
            .ok_or_else(|| CodecError::UnknownEntityType(record.tag.clone()))?;
        factory(record)
    }
}

fn require<T: Copy>(
    value: Option<T>,
    record: &EntityRecord,
    field: &'static str,
) -> Result<T, CodecError> {
    value.ok_or_else(|| CodecError::MissingField {
        tag: record.tag.clone(),
        field,
    })
}

fn generic(_record: &EntityRecord) -> Result<LocalEntity, CodecError> {
    Ok(LocalEntity::generic(Point::ZERO))
}

fn spot(_record: &EntityRecord) -> Result<LocalEntity, CodecError> {
    Ok(LocalEntity::spot(Point::ZERO, 0.0))
}

fn spot_group(record: &EntityRecord) -> Result<LocalEntity, CodecError> {
    let length = require(record.length, record, "length")?;
    let mirrored = record.mirrored.unwrap_or(false);
    Ok(LocalEntity::spot_group(Point::ZERO, length, mirrored))
}

fn label(record: &EntityRecord) -> Result<LocalEntity, CodecError> {
    let text = record.text.clone().ok_or_else(|| CodecError::MissingField {
        tag: record.tag.clone(),
        field: "text",
    })?;
    let font_size = require(record.font_size, record, "fontSize")?;
    Ok(LocalEntity::label(Point::ZERO, text, font_size))
}

fn debug_point(_record: &EntityRecord) -> Result<LocalEntity, CodecError> {
    Ok(LocalEntity::debug_point(Point::ZERO))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;
    use spotline_scene::EntityKind;

    fn record(tag: &str) -> EntityRecord {
        EntityRecord {
            tag: tag.to_string(),
            x: 0.0,
            y: 0.0,
            rotation: 0.0,
            anchor: [0.0, 0.0],
            width: None,
            height: None,
            visible: true,
            selectable: true,
            length: None,
            mirrored: None,
            text: None,
            font_size: None,
            children: Vec::new(),
        }
    }

    #[test]
    fn standard_registry_knows_every_builtin_tag() {
        let registry = Registry::standard();
        for tag in ["Entity", "Spot", "SpotGroup", "Label", "DebugPoint"] {
            assert!(registry.knows(tag), "missing builtin tag {tag}");
        }
    }

    #[test]
    fn unknown_tag_is_an_error() {
        let registry = Registry::standard();
        let err = registry.construct(&record("Hydrant")).unwrap_err();
        assert!(matches!(err, CodecError::UnknownEntityType(tag) if tag == "Hydrant"));
    }

    #[test]
    fn spot_group_requires_its_length() {
        let registry = Registry::standard();
        let err = registry.construct(&record("SpotGroup")).unwrap_err();
        assert!(matches!(
            err,
            CodecError::MissingField { field: "length", .. }
        ));

        let mut ok = record("SpotGroup");
        ok.length = Some(3);
        let local = registry.construct(&ok).expect("length present");
        assert!(matches!(
            local.kind,
            EntityKind::SpotGroup {
                length: 3,
                mirrored: false
            }
        ));
    }

    #[test]
    fn label_requires_text_and_font_size() {
        let registry = Registry::standard();
        let mut rec = record("Label");
        rec.font_size = Some(12.0);
        let err = registry.construct(&rec).unwrap_err();
        assert!(matches!(err, CodecError::MissingField { field: "text", .. }));
    }

    #[test]
    fn custom_tags_can_be_registered() {
        let mut registry = Registry::standard();
        registry.register("Marker", |_record| {
            Ok(LocalEntity::debug_point(Point::ZERO))
        });
        let local = registry.construct(&record("Marker")).expect("registered");
        assert!(matches!(local.kind, EntityKind::DebugPoint));
    }
}
