// Copyright 2025 the Spotline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The transferable record format for one entity subtree.

use alloc::string::String;
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

fn default_true() -> bool {
    true
}

/// One serialized entity with its children, in attachment order.
///
/// Records carry local fields only: parent back-references and per-frame
/// world caches never cross the boundary, and a spot's display id is
/// allocation-derived, so re-attaching the decoded tree reproduces it. The
/// optional fields that do not apply to a record's tag are omitted from the
/// serialized form entirely.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EntityRecord {
    /// Type tag resolved through the [`crate::Registry`].
    #[serde(rename = "type")]
    pub tag: String,
    /// Local x offset from the parent's origin.
    pub x: f64,
    /// Local y offset from the parent's origin.
    pub y: f64,
    /// Rotation in degrees about the anchor.
    #[serde(default)]
    pub rotation: f64,
    /// Local pivot point as `[x, y]`.
    #[serde(default)]
    pub anchor: [f64; 2],
    /// Box width; absent for pure grouping nodes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    /// Box height; absent for pure grouping nodes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    /// Whether the entity is drawn.
    #[serde(default = "default_true")]
    pub visible: bool,
    /// Whether the entity may appear on the selection stack.
    #[serde(default = "default_true")]
    pub selectable: bool,
    /// Spots per row; `SpotGroup` only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<usize>,
    /// Whether a second mirrored row is generated; `SpotGroup` only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mirrored: Option<bool>,
    /// Label text; `Label` only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Label font size; `Label` only.
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "fontSize")]
    pub font_size: Option<f64>,
    /// Child records in attachment order. Empty for kinds that own their
    /// generated children; those are rebuilt from the record's own fields.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<EntityRecord>,
}
