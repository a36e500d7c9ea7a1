// Copyright 2025 the Spotline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Spotline Codec: structural serialization of the entity tree.
//!
//! [`encode`] walks a subtree and produces a plain [`EntityRecord`] tree
//! with no shared references and no cycles: each node's local fields plus
//! its children in attachment order. Parent back-references, per-frame world
//! caches, and allocation-derived data (spot display ids) are deliberately
//! not part of the wire form.
//!
//! [`decode`] rebuilds the tree inside a scene. Type tags resolve through a
//! [`Registry`] of per-variant factories; unknown tags fail with
//! [`CodecError::UnknownEntityType`] rather than guessing. Rebuilt entities
//! attach through the scene's normal insertion path, so attach hooks run
//! exactly as for freshly created entities and a decoded lot ends up with
//! the same spot ids its original had.
//!
//! ```rust
//! use kurbo::Point;
//! use spotline_codec::{Registry, decode, encode};
//! use spotline_scene::{LocalEntity, Scene};
//!
//! let mut scene = Scene::new();
//! let root = scene.insert(None, LocalEntity::generic(Point::ZERO));
//! scene.insert(Some(root), LocalEntity::spot_group(Point::ZERO, 3, true));
//!
//! let record = encode(&scene, root).expect("root is alive");
//! let mut copy = Scene::new();
//! let new_root = decode(&mut copy, &Registry::standard(), None, &record).unwrap();
//! assert_eq!(copy.registered().len(), scene.registered().len());
//! # let _ = new_root;
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod codec;
mod error;
mod record;
mod registry;

pub use codec::{decode, encode, from_json_str, to_json_string};
pub use error::CodecError;
pub use record::EntityRecord;
pub use registry::{Factory, Registry};
