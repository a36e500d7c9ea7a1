// Copyright 2025 the Spotline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Spotline Selection: the ordered selection stack and its drill-down rules.
//!
//! Selection is an ordered stack of entity ids. The oldest entry sits at
//! index 0 and the last entry is the "active" entity, the one an inspector
//! would show. [`SelectionStack::select`] implements an ascent/descent
//! protocol over the scene hierarchy:
//!
//! - Selecting an entity whose nearest selectable ancestor is not yet
//!   selected walks *up* and selects that ancestor first. The first click on
//!   a compound entity therefore lands on the whole thing.
//! - Selecting a child while its selectable parent is already on the stack
//!   drills *down*: the stack becomes `[parent, child]`, keeping the parent
//!   visible as context. Selecting a sibling afterwards swaps the child and
//!   keeps the parent.
//! - Selecting an unrelated top-level entity clears the stack and starts
//!   fresh.
//!
//! Non-selectable entities (such as the scene root) act as transparent
//! barriers: the ascent stops below them and they can never appear on the
//! stack.
//!
//! ```rust
//! use kurbo::Point;
//! use spotline_scene::{EntityFlags, LocalEntity, Scene};
//! use spotline_selection::SelectionStack;
//!
//! let mut scene = Scene::new();
//! let root = scene.insert(None, LocalEntity::generic(Point::ZERO));
//! scene.set_flags(root, EntityFlags::VISIBLE);
//! let group = scene.insert(Some(root), LocalEntity::spot_group(Point::ZERO, 2, true));
//! let spot = scene.children_of(group)[0];
//!
//! let mut selection = SelectionStack::new();
//! selection.select(&scene, spot, true);
//! assert_eq!(selection.as_slice(), &[group]); // first click: whole group
//! selection.select(&scene, spot, true);
//! assert_eq!(selection.as_slice(), &[group, spot]); // second click: drill down
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

use alloc::vec::Vec;
use spotline_scene::{EntityId, Scene};

/// Ordered stack of selected entities; the last entry is the active one.
///
/// The stack never holds non-selectable or duplicate entries. It stores ids,
/// not nodes, so it stays valid across structure edits; [`SelectionStack::prune`]
/// drops entries whose entities have since been destroyed.
#[derive(Clone, Debug, Default)]
pub struct SelectionStack {
    stack: Vec<EntityId>,
}

impl SelectionStack {
    /// An empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Select an entity, applying the ascent/descent protocol.
    ///
    /// `descend` distinguishes a drill-down click from a plain one: with
    /// `descend` set, selecting a child of an already-selected parent
    /// replaces the selection with `[parent, child]`; without it the call is
    /// a no-op in that situation. Returns `false` when nothing changed
    /// (non-selectable or stale entity, or already selected).
    pub fn select(&mut self, scene: &Scene, id: EntityId, descend: bool) -> bool {
        if !scene.selectable(id) || self.contains(id) {
            return false;
        }
        match scene.parent_of(id).filter(|p| scene.selectable(*p)) {
            Some(parent) if descend && self.contains(parent) => {
                self.deselect(scene, parent);
                self.stack.push(parent);
                self.stack.push(id);
                true
            }
            // Walk up to the nearest selectable ancestor first.
            Some(parent) => self.select(scene, parent, true),
            None => {
                self.stack.clear();
                self.stack.push(id);
                true
            }
        }
    }

    /// Remove an entity from the selection, cascading to any selected
    /// entries parented under it. Returns `false` if it was not selected.
    pub fn deselect(&mut self, scene: &Scene, id: EntityId) -> bool {
        let Some(pos) = self.stack.iter().position(|e| *e == id) else {
            return false;
        };
        self.stack.remove(pos);
        let children: Vec<EntityId> = self
            .stack
            .iter()
            .copied()
            .filter(|e| scene.parent_of(*e) == Some(id))
            .collect();
        for child in children {
            self.deselect(scene, child);
        }
        true
    }

    /// Select every selectable entity in the scene, in attachment order.
    ///
    /// This bypasses the ascent/descent protocol: parents and their children
    /// can coexist on the stack afterwards.
    pub fn select_all(&mut self, scene: &Scene) {
        for &id in scene.registered() {
            if scene.selectable(id) && !self.contains(id) {
                self.stack.push(id);
            }
        }
    }

    /// Clear the selection.
    pub fn deselect_all(&mut self) {
        self.stack.clear();
    }

    /// Replace the selection with the given entities, keeping only
    /// selectable ones and dropping duplicates. Used by rectangle-select.
    pub fn replace(&mut self, scene: &Scene, ids: impl IntoIterator<Item = EntityId>) {
        self.stack.clear();
        for id in ids {
            if scene.selectable(id) && !self.contains(id) {
                self.stack.push(id);
            }
        }
    }

    /// Drop entries whose entities no longer exist.
    pub fn prune(&mut self, scene: &Scene) {
        self.stack.retain(|id| scene.is_alive(*id));
    }

    /// The active (most recently selected) entity.
    pub fn active(&self) -> Option<EntityId> {
        self.stack.last().copied()
    }

    /// Whether the entity is currently selected.
    pub fn contains(&self, id: EntityId) -> bool {
        self.stack.contains(&id)
    }

    /// The selection in stack order, oldest first.
    pub fn as_slice(&self) -> &[EntityId] {
        &self.stack
    }

    /// Number of selected entities.
    pub fn len(&self) -> usize {
        self.stack.len()
    }

    /// Whether nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Iterate the selection in stack order, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.stack.iter().copied()
    }
}
