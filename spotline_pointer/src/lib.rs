// Copyright 2025 the Spotline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Spotline Pointer: the single-pointer interaction session.
//!
//! A [`PointerSession`] turns a down/move/up event stream (already mapped to
//! scene space by the viewport) into clicks, drags, and rectangle-selects:
//!
//! - **Down** stages the point. Nothing is decided yet.
//! - The **first move** promotes the staged point: a non-descending
//!   hit-test/select runs at the down point, and if it grabbed something the
//!   drag set is built from the selection filtered to top-level entities,
//!   each with its fixed offset from the cursor in its parent's space.
//!   A miss instead opens a rectangle-select.
//! - **Subsequent moves** assign each dragged entity's position directly
//!   from the current cursor plus its stored offset. Positions are not
//!   accumulated from deltas, so missed move events cannot skew the result.
//! - **Up** resolves the session: a never-moved pointer is a plain
//!   (descending) click, an un-grabbed drag selects every top-level entity
//!   whose four world corners lie fully inside the down-to-up rectangle,
//!   and a grabbed drag simply drops.
//!
//! Sub-selected children are never dragged directly; they move with their
//! top-level ancestor through the transform tree.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

use alloc::vec::Vec;
use kurbo::{Point, Rect, Vec2};
use spotline_scene::{EntityId, Scene};
use spotline_selection::SelectionStack;
use spotline_transform::checked_inverse;

/// One dragged entity and its fixed cursor offset in parent space.
#[derive(Clone, Copy, Debug)]
struct DragItem {
    entity: EntityId,
    offset: Vec2,
}

#[derive(Clone, Debug)]
enum Phase {
    Idle,
    /// Down received, not yet moved.
    Pending { down: Point },
    /// Moved at least once; either dragging entities or sweeping a
    /// rectangle.
    Engaged {
        down: Point,
        grabbed: bool,
        items: Vec<DragItem>,
    },
}

/// How a pointer session ended.
#[derive(Clone, Debug, PartialEq)]
pub enum PointerOutcome {
    /// Up without a matching down; nothing happened.
    Ignored,
    /// The pointer never moved: a plain click, with what it hit.
    Click {
        /// The entity under the click, if any. A miss clears the selection.
        hit: Option<EntityId>,
    },
    /// A grabbed drag ended; the listed entities were repositioned.
    Dropped {
        /// Top-level entities that were dragged.
        moved: Vec<EntityId>,
    },
    /// An un-grabbed drag ended: a rectangle-select over this region ran.
    RectSelect {
        /// The down-to-up sweep region in scene space.
        rect: Rect,
    },
}

/// Tracks one pointer from down to up.
///
/// All points are in scene space; convert screen events through the
/// viewport before feeding them in. The session mutates the scene (entity
/// positions) and the selection stack as the interaction unfolds.
#[derive(Clone, Debug, Default)]
pub struct PointerSession {
    phase: Phase,
}

impl Default for Phase {
    fn default() -> Self {
        Self::Idle
    }
}

impl PointerSession {
    /// A session with no pointer down.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a grabbed drag is in progress.
    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, Phase::Engaged { grabbed: true, .. })
    }

    /// Stage a pointer-down at a scene-space point. Any session already in
    /// progress is abandoned.
    pub fn on_down(&mut self, point: Point) {
        self.phase = Phase::Pending { down: point };
    }

    /// Abandon the session (pointer capture lost). Positions already
    /// assigned by earlier moves stay as they are.
    pub fn cancel(&mut self) {
        self.phase = Phase::Idle;
    }

    /// Feed a pointer-move at a scene-space point.
    ///
    /// The first move after a down promotes the staged point into a drag or
    /// a rectangle sweep; later moves reposition the drag set. Moves with no
    /// pointer down are ignored.
    pub fn on_move(&mut self, scene: &mut Scene, selection: &mut SelectionStack, point: Point) {
        match &self.phase {
            Phase::Idle => {}
            Phase::Pending { down } => {
                let down = *down;
                // Singular matrices cannot arise from translate/rotate poses;
                // treat the defensive error as a miss.
                let hit = scene.hit_test_at(down).ok().flatten();
                if let Some(entity) = hit {
                    selection.select(scene, entity, false);
                }
                let grabbed = hit.is_some();
                let items = if grabbed {
                    build_drag_set(scene, selection, down)
                } else {
                    Vec::new()
                };
                self.phase = Phase::Engaged {
                    down,
                    grabbed,
                    items,
                };
                self.drag_to(scene, point);
            }
            Phase::Engaged { .. } => self.drag_to(scene, point),
        }
    }

    /// Resolve the session at a pointer-up.
    pub fn on_up(
        &mut self,
        scene: &mut Scene,
        selection: &mut SelectionStack,
        point: Point,
    ) -> PointerOutcome {
        match core::mem::take(&mut self.phase) {
            Phase::Idle => PointerOutcome::Ignored,
            Phase::Pending { down } => {
                let hit = scene.hit_test_at(down).ok().flatten();
                match hit {
                    Some(entity) => {
                        selection.select(scene, entity, true);
                    }
                    None => selection.deselect_all(),
                }
                PointerOutcome::Click { hit }
            }
            Phase::Engaged {
                down,
                grabbed: false,
                ..
            } => {
                let rect = Rect::from_points(down, point);
                let picked: Vec<EntityId> = scene
                    .registered()
                    .iter()
                    .copied()
                    .filter(|id| scene.is_top_level(*id))
                    .filter(|id| fully_inside(scene, *id, rect))
                    .collect();
                selection.replace(scene, picked);
                PointerOutcome::RectSelect { rect }
            }
            Phase::Engaged {
                grabbed: true,
                items,
                ..
            } => PointerOutcome::Dropped {
                moved: items.iter().map(|item| item.entity).collect(),
            },
        }
    }

    fn drag_to(&self, scene: &mut Scene, point: Point) {
        let Phase::Engaged {
            grabbed: true,
            items,
            ..
        } = &self.phase
        else {
            return;
        };
        for item in items {
            if let Some(local) = parent_space(scene, item.entity, point) {
                scene.set_position(item.entity, local + item.offset);
            }
        }
    }
}

/// Map a scene-space point into the coordinate space the entity's position
/// lives in (its parent's local space).
fn parent_space(scene: &Scene, id: EntityId, point: Point) -> Option<Point> {
    match scene.parent_of(id) {
        None => Some(point),
        Some(parent) => {
            let world = scene.world_transform(parent)?;
            checked_inverse(world).ok().map(|inverse| inverse * point)
        }
    }
}

fn build_drag_set(scene: &Scene, selection: &SelectionStack, down: Point) -> Vec<DragItem> {
    selection
        .iter()
        .filter(|id| scene.is_top_level(*id))
        .filter_map(|id| {
            let local = parent_space(scene, id, down)?;
            let position = scene.position(id)?;
            Some(DragItem {
                entity: id,
                offset: position - local,
            })
        })
        .collect()
}

/// Whether all four world corners of the entity lie inside `rect`
/// (inclusive edges).
fn fully_inside(scene: &Scene, id: EntityId, rect: Rect) -> bool {
    let Some(corners) = scene.corners(id) else {
        return false;
    };
    corners.iter().all(|corner| {
        corner.x >= rect.x0 && corner.x <= rect.x1 && corner.y >= rect.y0 && corner.y <= rect.y1
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use spotline_scene::{EntityFlags, LocalEntity};

    /// Root barrier with a lone spot at (100, 100) and a two-spot group at
    /// (400, 0).
    fn lot() -> (Scene, EntityId, EntityId, EntityId) {
        let mut scene = Scene::new();
        let root = scene.insert(None, LocalEntity::generic(Point::ZERO));
        scene.set_flags(root, EntityFlags::VISIBLE);
        let spot = scene.insert(Some(root), LocalEntity::spot(Point::new(100.0, 100.0), 0.0));
        let group = scene.insert(Some(root), LocalEntity::spot_group(Point::new(400.0, 0.0), 2, false));
        let _ = scene.traverse(root);
        (scene, root, spot, group)
    }

    #[test]
    fn plain_click_selects_descending() {
        let (mut scene, _, spot, _) = lot();
        let mut selection = SelectionStack::new();
        let mut session = PointerSession::new();

        session.on_down(Point::new(120.0, 140.0));
        let outcome = session.on_up(&mut scene, &mut selection, Point::new(120.0, 140.0));
        assert_eq!(outcome, PointerOutcome::Click { hit: Some(spot) });
        assert_eq!(selection.as_slice(), &[spot]);
    }

    #[test]
    fn click_on_empty_space_clears_selection() {
        let (mut scene, _, spot, _) = lot();
        let mut selection = SelectionStack::new();
        selection.select(&scene, spot, true);

        let mut session = PointerSession::new();
        session.on_down(Point::new(-50.0, -50.0));
        let outcome = session.on_up(&mut scene, &mut selection, Point::new(-50.0, -50.0));
        assert_eq!(outcome, PointerOutcome::Click { hit: None });
        assert!(selection.is_empty());
    }

    #[test]
    fn cancel_abandons_the_session() {
        let (mut scene, _, _, _) = lot();
        let mut selection = SelectionStack::new();
        let mut session = PointerSession::new();
        session.on_down(Point::new(120.0, 140.0));
        session.on_move(&mut scene, &mut selection, Point::new(130.0, 150.0));
        session.cancel();
        assert!(!session.is_dragging());
        assert_eq!(
            session.on_up(&mut scene, &mut selection, Point::ZERO),
            PointerOutcome::Ignored
        );
    }

    #[test]
    fn up_without_down_is_ignored() {
        let (mut scene, _, _, _) = lot();
        let mut selection = SelectionStack::new();
        let mut session = PointerSession::new();
        assert_eq!(
            session.on_up(&mut scene, &mut selection, Point::ZERO),
            PointerOutcome::Ignored
        );
    }

    #[test]
    fn drag_assigns_positions_absolutely() {
        let (mut scene, _, spot, _) = lot();
        let mut selection = SelectionStack::new();
        let mut session = PointerSession::new();

        // Grab the spot 20,40 inside its box.
        session.on_down(Point::new(120.0, 140.0));
        session.on_move(&mut scene, &mut selection, Point::new(220.0, 240.0));
        assert!(session.is_dragging());
        assert_eq!(scene.position(spot), Some(Point::new(200.0, 200.0)));

        // A large jump lands exactly; nothing accumulates between moves.
        session.on_move(&mut scene, &mut selection, Point::new(520.0, 640.0));
        assert_eq!(scene.position(spot), Some(Point::new(500.0, 600.0)));

        let outcome = session.on_up(&mut scene, &mut selection, Point::new(520.0, 640.0));
        assert_eq!(outcome, PointerOutcome::Dropped { moved: vec![spot] });
        assert!(!session.is_dragging());
    }

    #[test]
    fn drag_offset_accounts_for_a_transformed_root() {
        let mut scene = Scene::new();
        let root = scene.insert(None, LocalEntity::generic(Point::new(50.0, 0.0)));
        scene.set_flags(root, EntityFlags::VISIBLE);
        let spot = scene.insert(Some(root), LocalEntity::spot(Point::new(100.0, 100.0), 0.0));
        let _ = scene.traverse(root);

        let mut selection = SelectionStack::new();
        let mut session = PointerSession::new();
        // Scene-space cursor: root shifts the spot's box to x in [150, 190].
        session.on_down(Point::new(170.0, 140.0));
        session.on_move(&mut scene, &mut selection, Point::new(270.0, 140.0));
        // Position is parent-local, so the +50 root shift stays factored out.
        assert_eq!(scene.position(spot), Some(Point::new(200.0, 100.0)));
    }

    #[test]
    fn dragging_a_group_moves_the_group_not_its_spots() {
        let (mut scene, _, _, group) = lot();
        let mut selection = SelectionStack::new();
        let mut session = PointerSession::new();
        let child_positions: Vec<_> = scene
            .children_of(group)
            .iter()
            .map(|c| scene.position(*c))
            .collect();

        // Group box spans x in [400, 480], y in [0, 80].
        session.on_down(Point::new(410.0, 10.0));
        session.on_move(&mut scene, &mut selection, Point::new(410.0, 110.0));
        assert_eq!(scene.position(group), Some(Point::new(400.0, 100.0)));
        let after: Vec<_> = scene
            .children_of(group)
            .iter()
            .map(|c| scene.position(*c))
            .collect();
        assert_eq!(child_positions, after, "spots ride along via the tree");
    }

    #[test]
    fn sub_selection_drags_nothing_directly() {
        let (mut scene, _, _, group) = lot();
        let child = scene.children_of(group)[0];
        let mut selection = SelectionStack::new();
        // Drill down to [group, child].
        selection.select(&scene, child, true);
        selection.select(&scene, child, true);
        let child_pos = scene.position(child);

        let mut session = PointerSession::new();
        session.on_down(Point::new(410.0, 10.0));
        session.on_move(&mut scene, &mut selection, Point::new(460.0, 60.0));
        // Only the top-level group was repositioned.
        assert_eq!(scene.position(group), Some(Point::new(450.0, 50.0)));
        assert_eq!(scene.position(child), child_pos);
    }

    #[test]
    fn rect_select_requires_full_containment() {
        let (mut scene, _, spot, group) = lot();
        let mut selection = SelectionStack::new();
        selection.select(&scene, group, true);
        let mut session = PointerSession::new();

        // Sweep from empty space over the lone spot (box x [100,140],
        // y [100,180]) but only partially over the group.
        session.on_down(Point::new(50.0, 50.0));
        session.on_move(&mut scene, &mut selection, Point::new(60.0, 60.0));
        let outcome = session.on_up(&mut scene, &mut selection, Point::new(420.0, 300.0));

        assert!(matches!(outcome, PointerOutcome::RectSelect { .. }));
        assert_eq!(
            selection.as_slice(),
            &[spot],
            "partially covered entities stay out; prior selection is replaced"
        );
    }

    #[test]
    fn rect_select_excludes_rotated_corner_leaks() {
        let mut scene = Scene::new();
        let root = scene.insert(None, LocalEntity::generic(Point::ZERO));
        scene.set_flags(root, EntityFlags::VISIBLE);
        // Rotated 45 degrees, the box's corners poke outside its unrotated
        // footprint even though its center stays put.
        let spot = scene.insert(Some(root), LocalEntity::spot(Point::new(100.0, 100.0), 45.0));
        let _ = scene.traverse(root);

        let mut selection = SelectionStack::new();
        let mut session = PointerSession::new();
        session.on_down(Point::new(100.0, 100.0));
        session.on_move(&mut scene, &mut selection, Point::new(101.0, 101.0));
        // Rect matches the unrotated 40x80 box exactly; rotated corners leak.
        let outcome = session.on_up(&mut scene, &mut selection, Point::new(140.0, 180.0));
        assert!(matches!(outcome, PointerOutcome::RectSelect { .. }));
        assert!(selection.is_empty());

        // A generous sweep catches it.
        session.on_down(Point::new(0.0, 0.0));
        session.on_move(&mut scene, &mut selection, Point::new(1.0, 1.0));
        let _ = session.on_up(&mut scene, &mut selection, Point::new(300.0, 300.0));
        assert_eq!(selection.as_slice(), &[spot]);
    }

    #[test]
    fn first_move_grab_keeps_existing_multi_selection() {
        let (mut scene, _, spot, group) = lot();
        let mut selection = SelectionStack::new();
        selection.select_all(&scene);
        let selected_before = selection.len();

        let mut session = PointerSession::new();
        session.on_down(Point::new(120.0, 140.0));
        session.on_move(&mut scene, &mut selection, Point::new(130.0, 150.0));
        assert_eq!(
            selection.len(),
            selected_before,
            "non-descending grab of a selected entity changes nothing"
        );
        // Both top-level entities moved by the same amount.
        assert_eq!(scene.position(spot), Some(Point::new(110.0, 110.0)));
        assert_eq!(scene.position(group), Some(Point::new(410.0, 10.0)));
    }
}
