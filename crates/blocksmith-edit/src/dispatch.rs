use blocksmith_geom::LatticePos;
use blocksmith_world::{BlockId, Color, Insert, World};

use crate::placement::{Pick, Rejection, resolve_face, resolve_ground};
use crate::tool::ToolMode;

/// The single store call a pick turns into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Add(LatticePos),
    Remove(BlockId),
    Repaint(BlockId),
    Reject(Rejection),
    Nothing,
}

/// Maps a pick to an action under the given tool mode.
pub fn plan(mode: ToolMode, pick: &Pick) -> Action {
    match (mode, *pick) {
        (ToolMode::Build, Pick::Face { position, normal, .. }) => {
            match resolve_face(position, normal) {
                Ok(target) => Action::Add(target),
                Err(r) => Action::Reject(r),
            }
        }
        (ToolMode::Build, Pick::Ground { point }) => match resolve_ground(point) {
            Ok(target) => Action::Add(target),
            Err(r) => Action::Reject(r),
        },
        (ToolMode::Delete, Pick::Face { block, .. }) => Action::Remove(block),
        (ToolMode::Paint, Pick::Face { block, .. }) => Action::Repaint(block),
        (ToolMode::Delete | ToolMode::Paint, Pick::Ground { .. }) => Action::Nothing,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditOutcome {
    Added { id: BlockId, pos: LatticePos },
    /// Target cell was taken; the world is unchanged.
    Occupied { pos: LatticePos, existing: BlockId },
    Rejected(Rejection),
    Removed(BlockId),
    Repainted(BlockId),
    /// Delete or paint aimed at an id the world no longer has.
    Missing(BlockId),
    Ignored,
}

impl EditOutcome {
    pub fn changed_world(&self) -> bool {
        matches!(
            self,
            EditOutcome::Added { .. } | EditOutcome::Removed(_) | EditOutcome::Repainted(_)
        )
    }
}

/// Resolve a pick and perform at most one store call.
pub fn apply_pick(world: &mut World, mode: ToolMode, color: &Color, pick: &Pick) -> EditOutcome {
    let outcome = match plan(mode, pick) {
        Action::Add(pos) => match world.add(pos, color.clone()) {
            Insert::Added(id) => EditOutcome::Added { id, pos },
            Insert::Occupied(existing) => EditOutcome::Occupied { pos, existing },
            Insert::BelowGround => EditOutcome::Rejected(Rejection::BelowGround),
        },
        Action::Remove(id) => {
            if world.remove(id) {
                EditOutcome::Removed(id)
            } else {
                EditOutcome::Missing(id)
            }
        }
        Action::Repaint(id) => {
            if world.repaint(id, color.clone()) {
                EditOutcome::Repainted(id)
            } else {
                EditOutcome::Missing(id)
            }
        }
        Action::Reject(r) => EditOutcome::Rejected(r),
        Action::Nothing => EditOutcome::Ignored,
    };
    log::debug!("{} pick {:?} -> {:?}", mode, pick, outcome);
    outcome
}
