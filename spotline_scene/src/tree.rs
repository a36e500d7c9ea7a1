// Copyright 2025 the Spotline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core scene implementation: structure, the traversal pass, queries.

use alloc::vec::Vec;
use kurbo::{Affine, Point, Rect, Size};
use spotline_transform::{
    DegenerateTransform, Pose, TransformStack, checked_inverse, transform_rect_bbox,
};

use crate::damage::Damage;
use crate::entity::{EntityKind, Primitive, SELECTION_PADDING, SPOT_HEIGHT, SPOT_SCALE, SPOT_WIDTH};
use crate::ids::IdAllocator;
use crate::types::{EntityFlags, EntityId, LocalEntity};

/// World-space data stamped by the traversal pass.
#[derive(Clone, Debug)]
struct WorldEntity {
    /// Composition of every ancestor's pose transform with this entity's own.
    transform: Affine,
    /// The anchor point mapped through `transform`.
    anchor: Point,
    /// Conservative world AABB of the sized box, if the entity has one.
    bounds: Option<Rect>,
    /// Which traversal pass produced this data.
    epoch: u64,
}

#[derive(Clone, Debug)]
struct Node {
    generation: u32,
    parent: Option<EntityId>,
    children: Vec<EntityId>,
    /// Whether the node currently belongs to the scene's flat registry.
    registered: bool,
    local: LocalEntity,
    world: Option<WorldEntity>,
}

impl Node {
    fn new(generation: u32, local: LocalEntity) -> Self {
        Self {
            generation,
            parent: None,
            children: Vec::new(),
            registered: false,
            local,
            world: None,
        }
    }
}

/// The entity tree plus its flat registries and per-pass caches.
///
/// Structure edits (insert/attach/detach) take effect immediately; world
/// transforms, anchors, and bounds are only (re)computed by
/// [`Scene::traverse`], which stamps them with a fresh pass epoch. Queries
/// that depend on world data ignore entities the current pass has not
/// touched, so a freshly attached entity reports "no match" until the next
/// traversal instead of exposing stale or default matrices.
pub struct Scene {
    /// slots
    nodes: Vec<Option<Node>>,
    /// last generation per slot (persists across frees)
    generations: Vec<u32>,
    free_list: Vec<usize>,
    /// Flat registry in attachment order; drives `select_all` and spot ids.
    order: Vec<EntityId>,
    /// Visit order of the latest traversal pass (draw order).
    draw_order: Vec<EntityId>,
    epoch: u64,
    spot_ids: IdAllocator,
}

impl core::fmt::Debug for Scene {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.nodes.len();
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        f.debug_struct("Scene")
            .field("nodes_total", &total)
            .field("nodes_alive", &alive)
            .field("registered", &self.order.len())
            .field("epoch", &self.epoch)
            .field("spot_ids", &self.spot_ids)
            .finish_non_exhaustive()
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// Create a new empty scene.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            order: Vec::new(),
            draw_order: Vec::new(),
            epoch: 0,
            spot_ids: IdAllocator::new(),
        }
    }

    /// Insert a new entity as a child of `parent` (or as a free root if
    /// `None` or stale).
    ///
    /// Roots and children of registered parents join the flat registry
    /// immediately, which runs attach hooks (spot id allocation). Kinds that
    /// own generated children ([`EntityKind::SpotGroup`]) populate them here,
    /// through the same attach path as externally built entities.
    pub fn insert(&mut self, parent: Option<EntityId>, local: LocalEntity) -> EntityId {
        let kind_is_group = matches!(local.kind, EntityKind::SpotGroup { .. });
        let idx = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(Node::new(generation, local));
            idx
        } else {
            self.nodes.push(Some(Node::new(1, local)));
            self.generations.push(1);
            self.nodes.len() - 1
        };
        #[allow(
            clippy::cast_possible_truncation,
            reason = "EntityId uses 32-bit indices by design."
        )]
        let id = EntityId::new(idx as u32, self.generations[idx]);
        match parent.filter(|p| self.is_alive(*p)) {
            Some(p) => {
                self.link_parent(id, p);
                if self.node(p).registered {
                    self.register_subtree(id);
                }
            }
            None => self.register_subtree(id),
        }
        if kind_is_group {
            self.generate_spots(id);
        }
        id
    }

    /// Attach `child` under `parent`, reparenting if necessary.
    ///
    /// Returns `false` (and changes nothing) for stale ids, self-attachment,
    /// or when the edge would create a cycle. Attaching a detached subtree to
    /// a registered parent re-registers it, re-running attach hooks exactly
    /// as for freshly created entities.
    pub fn add_child(&mut self, parent: EntityId, child: EntityId) -> bool {
        if !self.is_alive(parent) || !self.is_alive(child) || parent == child {
            return false;
        }
        // Reject cycles: `child` must not be an ancestor of `parent`.
        let mut current = Some(parent);
        while let Some(id) = current {
            if id == child {
                return false;
            }
            current = self.node(id).parent;
        }
        if let Some(old_parent) = self.node(child).parent {
            self.unlink_parent(child, old_parent);
        }
        self.link_parent(child, parent);
        match (self.node(parent).registered, self.node(child).registered) {
            (true, false) => self.register_subtree(child),
            (false, true) => self.unregister_subtree(child),
            _ => {}
        }
        true
    }

    /// Detach an entity from its parent and from the flat registry.
    ///
    /// The subtree stays alive as a free-standing tree eligible for
    /// re-attachment; spot display ids are released back to the allocator.
    /// Returns `false` for stale ids.
    pub fn detach(&mut self, id: EntityId) -> bool {
        if !self.is_alive(id) {
            return false;
        }
        if let Some(parent) = self.node(id).parent {
            self.unlink_parent(id, parent);
        }
        self.unregister_subtree(id);
        true
    }

    /// Detach every child of `parent`, leaving them free-standing.
    pub fn remove_all_children(&mut self, parent: EntityId) {
        if !self.is_alive(parent) {
            return;
        }
        let children = self.node(parent).children.clone();
        for child in children {
            self.detach(child);
        }
    }

    /// Destroy an entity and its subtree, freeing their slots.
    ///
    /// The ids become stale immediately; spot display ids return to the
    /// allocator.
    pub fn remove(&mut self, id: EntityId) {
        if !self.is_alive(id) {
            return;
        }
        self.detach(id);
        self.free_subtree(id);
    }

    fn free_subtree(&mut self, id: EntityId) {
        let children = self.node(id).children.clone();
        for child in children {
            self.free_subtree(child);
        }
        self.nodes[id.idx()] = None;
        self.free_list.push(id.idx());
    }

    /// Deep-copy a subtree, attaching the copy under `new_parent`.
    ///
    /// Copies go through the normal insert/attach path, so attach hooks
    /// re-run: cloned spots receive fresh display ids and cloned spot groups
    /// regenerate their own children. Returns `None` for stale ids.
    pub fn clone_subtree(
        &mut self,
        id: EntityId,
        new_parent: Option<EntityId>,
    ) -> Option<EntityId> {
        if !self.is_alive(id) {
            return None;
        }
        let mut local = self.node(id).local.clone();
        if let EntityKind::Spot { id: spot_id } = &mut local.kind {
            *spot_id = None;
        }
        let owns_children = matches!(local.kind, EntityKind::SpotGroup { .. });
        let clone = self.insert(new_parent, local);
        if !owns_children {
            let children = self.node(id).children.clone();
            for child in children {
                self.clone_subtree(child, Some(clone));
            }
        }
        Some(clone)
    }

    /// Change a spot group's row length and mirroring, regenerating its
    /// owned spot children and refitting its box. Returns `false` if `id`
    /// is stale or not a spot group.
    pub fn set_spot_group(&mut self, id: EntityId, length: usize, mirrored: bool) -> bool {
        if !self.is_alive(id) {
            return false;
        }
        {
            let node = self.node_mut(id);
            let EntityKind::SpotGroup {
                length: len,
                mirrored: mir,
            } = &mut node.local.kind
            else {
                return false;
            };
            *len = length;
            *mir = mirrored;
            let template = LocalEntity::spot_group(node.local.pose.position, length, mirrored);
            node.local.size = template.size;
            node.local.pose.anchor = template.pose.anchor;
        }
        let children = self.node(id).children.clone();
        for child in children {
            self.remove(child);
        }
        self.generate_spots(id);
        true
    }

    fn generate_spots(&mut self, group: EntityId) {
        let EntityKind::SpotGroup { length, mirrored } = self.node(group).local.kind else {
            return;
        };
        let spot_w = SPOT_WIDTH * SPOT_SCALE;
        let spot_h = SPOT_HEIGHT * SPOT_SCALE;
        #[allow(
            clippy::cast_precision_loss,
            reason = "group lengths are tiny; f64 is exact here"
        )]
        let column = |i: usize| i as f64 * spot_w;
        if mirrored {
            for i in 0..length {
                self.insert(
                    Some(group),
                    LocalEntity::spot(Point::new(column(i), 0.0), 180.0),
                );
            }
            for i in 0..length {
                self.insert(
                    Some(group),
                    LocalEntity::spot(Point::new(column(i), spot_h), 0.0),
                );
            }
        } else {
            for i in 0..length {
                self.insert(
                    Some(group),
                    LocalEntity::spot(Point::new(column(i), 0.0), 0.0),
                );
            }
        }
    }

    // --- traversal ---

    /// Run the once-per-frame depth-first pass from `root`.
    ///
    /// Recomputes and stamps every visited entity's world transform, world
    /// anchor, and world bounds, records the pass's draw order, and returns
    /// coarse [`Damage`] covering entities whose world bounds changed. All
    /// world-dependent queries in the frame must run after this.
    pub fn traverse(&mut self, root: EntityId) -> Damage {
        let mut damage = Damage::default();
        if !self.is_alive(root) {
            return damage;
        }
        self.epoch += 1;
        self.draw_order.clear();
        let mut stack = TransformStack::new();
        self.visit(root, &mut stack, &mut damage);
        damage
    }

    fn visit(&mut self, id: EntityId, stack: &mut TransformStack, damage: &mut Damage) {
        let (local_affine, anchor, size, children) = {
            let node = self.node(id);
            (
                node.local.pose.to_affine(),
                node.local.pose.anchor,
                node.local.size,
                node.children.clone(),
            )
        };
        let world = stack.push(local_affine);
        let bounds = size.map(|sz| transform_rect_bbox(world, sz.to_rect()));
        let epoch = self.epoch;
        {
            let node = self.node_mut(id);
            let old_bounds = node.world.as_ref().and_then(|w| w.bounds);
            if old_bounds != bounds {
                if let Some(old) = old_bounds {
                    damage.dirty_rects.push(old);
                }
                if let Some(new) = bounds {
                    damage.dirty_rects.push(new);
                }
            }
            node.world = Some(WorldEntity {
                transform: world,
                anchor: world * anchor,
                bounds,
                epoch,
            });
        }
        self.draw_order.push(id);
        for child in children {
            if self.is_alive(child) {
                self.visit(child, stack, damage);
            }
        }
        stack.pop();
    }

    // --- queries ---

    /// Resolve a scene-space point to an entity.
    ///
    /// Candidates are the entities visited by the current pass, scanned in
    /// reverse draw order so the topmost-drawn one wins. Entities without a
    /// `size`, invisible entities, and entities the current pass has not
    /// stamped never match. The error case is a singular world matrix, which
    /// cannot arise from translate/rotate poses and is guarded defensively.
    pub fn hit_test_at(&self, point: Point) -> Result<Option<EntityId>, DegenerateTransform> {
        for &id in self.draw_order.iter().rev() {
            let Some(node) = self.node_opt(id) else {
                continue;
            };
            if !node.local.flags.contains(EntityFlags::VISIBLE) {
                continue;
            }
            let Some(size) = node.local.size else {
                continue;
            };
            let Some(world) = &node.world else {
                continue;
            };
            if world.epoch != self.epoch {
                continue;
            }
            let local = checked_inverse(world.transform)? * point;
            if local.x >= 0.0
                && local.x <= size.width
                && local.y >= 0.0
                && local.y <= size.height
            {
                return Ok(Some(id));
            }
        }
        Ok(None)
    }

    /// The four world-space corners of the entity's sized box, in
    /// `(0,0) → (w,0) → (w,h) → (0,h)` order.
    ///
    /// `None` for sizeless entities or when the current pass has not stamped
    /// the entity.
    pub fn corners(&self, id: EntityId) -> Option<[Point; 4]> {
        let node = self.node_opt(id)?;
        let size = node.local.size?;
        let world = self.stamped_world(id)?;
        let m = world.transform;
        Some([
            m * Point::ZERO,
            m * Point::new(size.width, 0.0),
            m * Point::new(size.width, size.height),
            m * Point::new(0.0, size.height),
        ])
    }

    /// The local-space selection outline for the entity: its sized box
    /// inflated by the standard selection padding. Draw it under
    /// [`Scene::world_transform`].
    pub fn bounds_rect(&self, id: EntityId) -> Option<Rect> {
        let node = self.node_opt(id)?;
        let size = node.local.size?;
        Some(Rect::new(
            -SELECTION_PADDING,
            -SELECTION_PADDING,
            size.width + SELECTION_PADDING,
            size.height + SELECTION_PADDING,
        ))
    }

    /// The entity's local-to-world matrix as of the current pass.
    pub fn world_transform(&self, id: EntityId) -> Option<Affine> {
        self.stamped_world(id).map(|w| w.transform)
    }

    /// The entity's anchor mapped to world space as of the current pass.
    pub fn world_anchor(&self, id: EntityId) -> Option<Point> {
        self.stamped_world(id).map(|w| w.anchor)
    }

    /// The entity's conservative world AABB as of the current pass.
    pub fn world_bounds(&self, id: EntityId) -> Option<Rect> {
        self.stamped_world(id).and_then(|w| w.bounds)
    }

    /// The shape a renderer draws for this entity, in local coordinates.
    pub fn primitive(&self, id: EntityId) -> Option<Primitive> {
        let node = self.node_opt(id)?;
        node.local.kind.primitive(node.local.size)
    }

    /// The untransformed overlay for this entity (for example a spot's id at
    /// its anchor), positioned with current-pass world data.
    pub fn annotation(&self, id: EntityId) -> Option<Primitive> {
        let anchor = self.stamped_world(id)?.anchor;
        self.node_opt(id)?.local.kind.annotation(anchor)
    }

    // --- accessors ---

    /// Returns true if `id` refers to a live entity.
    pub fn is_alive(&self, id: EntityId) -> bool {
        self.node_opt(id).is_some()
    }

    /// The parent of an entity, or `None` for roots, detached trees, and
    /// stale ids.
    pub fn parent_of(&self, id: EntityId) -> Option<EntityId> {
        self.node_opt(id).and_then(|n| n.parent)
    }

    /// The children of an entity in draw order, or an empty slice for stale
    /// ids.
    pub fn children_of(&self, id: EntityId) -> &[EntityId] {
        self.node_opt(id).map_or(&[], |n| &n.children)
    }

    /// Registered entities in attachment order.
    pub fn registered(&self) -> &[EntityId] {
        &self.order
    }

    /// The entity's local data, if live.
    pub fn local(&self, id: EntityId) -> Option<&LocalEntity> {
        self.node_opt(id).map(|n| &n.local)
    }

    /// The entity's variant, if live.
    pub fn kind(&self, id: EntityId) -> Option<&EntityKind> {
        self.node_opt(id).map(|n| &n.local.kind)
    }

    /// A spot's display id, if live, a spot, and currently attached.
    pub fn spot_id(&self, id: EntityId) -> Option<u32> {
        match self.kind(id)? {
            EntityKind::Spot { id } => *id,
            _ => None,
        }
    }

    /// The entity's flags, if live.
    pub fn flags(&self, id: EntityId) -> Option<EntityFlags> {
        self.node_opt(id).map(|n| n.local.flags)
    }

    /// Whether the entity may appear on the selection stack.
    pub fn selectable(&self, id: EntityId) -> bool {
        self.flags(id)
            .is_some_and(|f| f.contains(EntityFlags::SELECTABLE))
    }

    /// Whether the entity is selectable with no selectable ancestor above it
    /// (the draggable/rectangle-selectable tier).
    pub fn is_top_level(&self, id: EntityId) -> bool {
        self.selectable(id)
            && self
                .parent_of(id)
                .is_none_or(|parent| !self.selectable(parent))
    }

    /// The entity's local position, if live.
    pub fn position(&self, id: EntityId) -> Option<Point> {
        self.node_opt(id).map(|n| n.local.pose.position)
    }

    /// Set the entity's local position. No-op for stale ids.
    pub fn set_position(&mut self, id: EntityId, position: Point) {
        if let Some(node) = self.node_opt_mut(id) {
            node.local.pose.position = position;
        }
    }

    /// Set the entity's rotation in degrees. No-op for stale ids.
    pub fn set_rotation(&mut self, id: EntityId, degrees: f64) {
        if let Some(node) = self.node_opt_mut(id) {
            node.local.pose.rotation = degrees;
        }
    }

    /// Set the entity's pose wholesale. No-op for stale ids.
    pub fn set_pose(&mut self, id: EntityId, pose: Pose) {
        if let Some(node) = self.node_opt_mut(id) {
            node.local.pose = pose;
        }
    }

    /// Set the entity's sized box. No-op for stale ids.
    pub fn set_size(&mut self, id: EntityId, size: Option<Size>) {
        if let Some(node) = self.node_opt_mut(id) {
            node.local.size = size;
        }
    }

    /// Set the entity's flags. No-op for stale ids.
    pub fn set_flags(&mut self, id: EntityId, flags: EntityFlags) {
        if let Some(node) = self.node_opt_mut(id) {
            node.local.flags = flags;
        }
    }

    // --- internals ---

    fn node(&self, id: EntityId) -> &Node {
        self.nodes[id.idx()].as_ref().expect("dangling EntityId")
    }

    fn node_mut(&mut self, id: EntityId) -> &mut Node {
        self.nodes[id.idx()].as_mut().expect("dangling EntityId")
    }

    fn node_opt(&self, id: EntityId) -> Option<&Node> {
        let n = self.nodes.get(id.idx())?.as_ref()?;
        (n.generation == id.1).then_some(n)
    }

    fn node_opt_mut(&mut self, id: EntityId) -> Option<&mut Node> {
        let n = self.nodes.get_mut(id.idx())?.as_mut()?;
        (n.generation == id.1).then_some(n)
    }

    fn stamped_world(&self, id: EntityId) -> Option<&WorldEntity> {
        let world = self.node_opt(id)?.world.as_ref()?;
        (world.epoch == self.epoch).then_some(world)
    }

    fn link_parent(&mut self, id: EntityId, parent: EntityId) {
        self.node_mut(parent).children.push(id);
        self.node_mut(id).parent = Some(parent);
    }

    fn unlink_parent(&mut self, id: EntityId, parent: EntityId) {
        self.node_mut(parent).children.retain(|c| *c != id);
        self.node_mut(id).parent = None;
    }

    fn register_subtree(&mut self, id: EntityId) {
        let children = {
            let Self {
                nodes,
                order,
                spot_ids,
                ..
            } = self;
            let node = nodes[id.idx()].as_mut().expect("dangling EntityId");
            if node.registered {
                return;
            }
            node.registered = true;
            node.local.kind.on_attach(spot_ids);
            order.push(id);
            node.children.clone()
        };
        for child in children {
            self.register_subtree(child);
        }
    }

    fn unregister_subtree(&mut self, id: EntityId) {
        let children = {
            let Self {
                nodes,
                order,
                spot_ids,
                ..
            } = self;
            let node = nodes[id.idx()].as_mut().expect("dangling EntityId");
            if !node.registered {
                return;
            }
            node.registered = false;
            node.local.kind.on_detach(spot_ids);
            order.retain(|e| *e != id);
            node.children.clone()
        };
        for child in children {
            self.unregister_subtree(child);
        }
    }
}
