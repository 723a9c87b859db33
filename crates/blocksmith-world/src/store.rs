use std::collections::HashMap;
use std::fmt;

use blocksmith_geom::LatticePos;

use crate::color::Color;

/// Opaque block identity. Issued once per world and never handed out again.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId(u64);

impl BlockId {
    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Rebuild an id from its raw value, e.g. one echoed back by a renderer.
    #[inline]
    pub const fn from_raw(raw: u64) -> Self {
        BlockId(raw)
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Block {
    pub id: BlockId,
    pub pos: LatticePos,
    pub color: Color,
}

/// Result of [`World::add`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Insert {
    Added(BlockId),
    /// The cell already holds this block; nothing changed.
    Occupied(BlockId),
    BelowGround,
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorldStats {
    pub blocks: usize,
    pub rev: u64,
    pub ids_issued: u64,
}

/// Position-keyed block store. At most one block per cell, all cells at y >= 0.
#[derive(Debug, Default)]
pub struct World {
    cells: HashMap<LatticePos, Block>,
    index: HashMap<BlockId, LatticePos>,
    next_id: u64,
    rev: u64,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    fn alloc_id(&mut self) -> BlockId {
        self.next_id += 1;
        BlockId(self.next_id)
    }

    #[inline]
    fn bump_rev(&mut self) {
        self.rev = self.rev.wrapping_add(1).max(1);
    }

    pub fn add(&mut self, pos: LatticePos, color: Color) -> Insert {
        if !pos.is_grounded() {
            return Insert::BelowGround;
        }
        if let Some(existing) = self.cells.get(&pos) {
            return Insert::Occupied(existing.id);
        }
        let id = self.alloc_id();
        self.cells.insert(pos, Block { id, pos, color });
        self.index.insert(id, pos);
        self.bump_rev();
        Insert::Added(id)
    }

    /// Returns whether a block was removed. Unknown ids are a no-op.
    pub fn remove(&mut self, id: BlockId) -> bool {
        let Some(pos) = self.index.remove(&id) else {
            return false;
        };
        self.cells.remove(&pos);
        self.bump_rev();
        true
    }

    /// Returns whether the block exists. Unknown ids are a no-op.
    pub fn repaint(&mut self, id: BlockId, color: Color) -> bool {
        let Some(pos) = self.index.get(&id) else {
            return false;
        };
        let Some(block) = self.cells.get_mut(pos) else {
            return false;
        };
        if block.color != color {
            block.color = color;
            self.bump_rev();
        }
        true
    }

    pub fn clear(&mut self) {
        if self.cells.is_empty() {
            return;
        }
        self.cells.clear();
        self.index.clear();
        self.bump_rev();
    }

    /// Swap in a whole new set of blocks. Later entries win on shared cells and
    /// entries below ground are skipped. Returns the resulting block count.
    pub fn replace_all<I>(&mut self, entries: I) -> usize
    where
        I: IntoIterator<Item = (LatticePos, Color)>,
    {
        let mut cells: HashMap<LatticePos, Block> = HashMap::new();
        let mut index = HashMap::new();
        for (pos, color) in entries {
            if !pos.is_grounded() {
                continue;
            }
            if let Some(block) = cells.get_mut(&pos) {
                block.color = color;
                continue;
            }
            let id = self.alloc_id();
            cells.insert(pos, Block { id, pos, color });
            index.insert(id, pos);
        }
        self.cells = cells;
        self.index = index;
        self.bump_rev();
        self.cells.len()
    }

    pub fn get(&self, id: BlockId) -> Option<&Block> {
        self.index.get(&id).and_then(|p| self.cells.get(p))
    }

    pub fn block_at(&self, pos: LatticePos) -> Option<&Block> {
        self.cells.get(&pos)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Bumped by every call that changed the world.
    #[inline]
    pub fn rev(&self) -> u64 {
        self.rev
    }

    /// Owned copy of all blocks in creation order.
    pub fn snapshot(&self) -> Vec<Block> {
        let mut out: Vec<Block> = self.cells.values().cloned().collect();
        out.sort_by_key(|b| b.id);
        out
    }

    pub fn stats(&self) -> WorldStats {
        WorldStats {
            blocks: self.cells.len(),
            rev: self.rev,
            ids_issued: self.next_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn red() -> Color {
        Color::parse("#ef4444").unwrap()
    }

    fn blue() -> Color {
        Color::parse("#3b82f6").unwrap()
    }

    #[test]
    fn second_add_on_same_cell_keeps_original() {
        let mut w = World::new();
        let p = LatticePos::new(1, 0, 1);
        let Insert::Added(id) = w.add(p, red()) else {
            panic!("first add must succeed");
        };
        assert_eq!(w.add(p, blue()), Insert::Occupied(id));
        assert_eq!(w.len(), 1);
        assert_eq!(w.block_at(p).unwrap().color, red());
    }

    #[test]
    fn below_ground_is_rejected() {
        let mut w = World::new();
        assert_eq!(w.add(LatticePos::new(0, -1, 0), red()), Insert::BelowGround);
        assert!(w.is_empty());
        assert_eq!(w.rev(), 0);
    }

    #[test]
    fn rev_moves_only_on_change() {
        let mut w = World::new();
        let Insert::Added(id) = w.add(LatticePos::ORIGIN, red()) else {
            panic!("add");
        };
        let r = w.rev();
        w.repaint(id, red());
        assert_eq!(w.rev(), r);
        w.add(LatticePos::ORIGIN, blue());
        assert_eq!(w.rev(), r);
        w.repaint(id, blue());
        assert!(w.rev() > r);
        let r = w.rev();
        assert!(!w.remove(BlockId::from_raw(999)));
        assert_eq!(w.rev(), r);
    }

    #[test]
    fn replace_all_is_last_write_wins() {
        let mut w = World::new();
        w.add(LatticePos::new(5, 5, 5), red());
        let n = w.replace_all([
            (LatticePos::ORIGIN, red()),
            (LatticePos::new(0, -3, 0), red()),
            (LatticePos::ORIGIN, blue()),
        ]);
        assert_eq!(n, 1);
        assert!(w.block_at(LatticePos::new(5, 5, 5)).is_none());
        assert_eq!(w.block_at(LatticePos::ORIGIN).unwrap().color, blue());
    }
}
