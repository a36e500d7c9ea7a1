// Copyright 2025 the Spotline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Spotline Scene: the entity tree at the heart of the editor core.
//!
//! This crate maintains a hierarchy of spatially-placed entities (parking
//! "spot" layouts and their grouping nodes), recomputes composed world
//! transforms in a single depth-first pass per frame, and resolves pointer
//! hits against the cached matrices.
//!
//! ## API overview
//!
//! - [`Scene`]: arena-backed container managing nodes, the flat attachment
//!   registry, and per-pass world caches.
//! - [`LocalEntity`]: per-node local data (pose, optional size, flags, kind),
//!   with per-variant constructors such as [`LocalEntity::spot`] and
//!   [`LocalEntity::spot_group`].
//! - [`EntityKind`]: the closed variant set
//!   `{Generic, Spot, SpotGroup, Label, DebugPoint}`.
//! - [`EntityId`]: generational handle of a node; stale handles are rejected
//!   by every accessor.
//! - [`IdAllocator`]: gap-filling allocator for spot display ids, run from
//!   the attach hook.
//!
//! Key operations:
//! - [`Scene::insert`] → [`EntityId`]; kinds that own generated children
//!   (spot groups) populate them synchronously.
//! - [`Scene::add_child`] / [`Scene::detach`] / [`Scene::remove`] /
//!   [`Scene::remove_all_children`] for structure edits; detached subtrees
//!   stay alive and can be re-attached.
//! - [`Scene::traverse`] → [`Damage`]: the once-per-frame pass that stamps
//!   world transforms, anchors, and bounds. It must run before any hit-test
//!   or bounds query in that frame; queries against entities the current
//!   pass has not touched report "no match" rather than stale data.
//! - [`Scene::hit_test_at`] resolves a scene-space point to the topmost
//!   drawn entity with a defined size.
//! - [`Scene::corners`] / [`Scene::bounds_rect`] for rectangle-select and
//!   selection-outline drawing.
//!
//! ## Hit-test ordering
//!
//! Candidates are scanned in reverse draw order (the reverse of the
//! traversal's pre-order visit), so among overlapping entities the
//! topmost-drawn one wins. Draw order and attachment order can disagree;
//! this crate deliberately resolves hits against what is visually on top.
//!
//! ## Example
//!
//! ```rust
//! use kurbo::Point;
//! use spotline_scene::{EntityFlags, LocalEntity, Scene};
//!
//! let mut scene = Scene::new();
//! let root = scene.insert(None, LocalEntity::generic(Point::ZERO));
//! scene.set_flags(root, EntityFlags::VISIBLE); // the root is a selection barrier
//!
//! let spot = scene.insert(Some(root), LocalEntity::spot(Point::new(100.0, 100.0), 0.0));
//! let _damage = scene.traverse(root);
//!
//! let hit = scene.hit_test_at(Point::new(120.0, 140.0)).unwrap();
//! assert_eq!(hit, Some(spot));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod damage;
mod entity;
mod ids;
mod tree;
mod types;

pub use damage::Damage;
pub use entity::{
    EntityKind, Primitive, SELECTION_PADDING, SPOT_HEIGHT, SPOT_SCALE, SPOT_WIDTH, spot_size,
};
pub use ids::IdAllocator;
pub use spotline_transform::DegenerateTransform;
pub use tree::Scene;
pub use types::{EntityFlags, EntityId, LocalEntity};
