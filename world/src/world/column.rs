use serde::{Deserialize, Serialize};
use strata_engine::{BlockId, ColumnStore};

use crate::block_registry::AIR;
use crate::world::chunk::Chunk;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnPos {
    pub x: i32,
    pub z: i32,
}

impl ColumnPos {
    pub fn new(x: i32, z: i32) -> Self { Self { x, z } }
}

/// A vertical stack of chunks sharing one (x, z) chunk position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkColumn {
    pub pos: ColumnPos,
    pub chunks: Vec<Chunk>,
    /// Terrain height per block column, indexed `lz * 32 + lx`.
    pub height_map: Vec<u16>,
}

impl ChunkColumn {
    pub fn new(pos: ColumnPos, height_chunks: u32) -> Self {
        let chunks = (0..height_chunks as i32).map(|y| Chunk::new([pos.x, y, pos.z])).collect();
        Self { pos, chunks, height_map: vec![0; (Chunk::SIZE * Chunk::SIZE) as usize] }
    }

    pub fn height(&self) -> i32 { self.chunks.len() as i32 * Chunk::SIZE as i32 }

    pub fn surface_at(&self, lx: u32, lz: u32) -> i32 {
        self.height_map[(lz * Chunk::SIZE + lx) as usize] as i32
    }

    pub fn get_block(&self, lx: u32, y: i32, lz: u32) -> BlockId {
        if y < 0 || y >= self.height() {
            return AIR;
        }
        let chunk = &self.chunks[(y / Chunk::SIZE as i32) as usize];
        chunk.get_block(lx, y as u32 % Chunk::SIZE, lz)
    }

    pub fn set_block(&mut self, lx: u32, y: i32, lz: u32, id: BlockId) {
        if y < 0 || y >= self.height() {
            return;
        }
        let chunk = &mut self.chunks[(y / Chunk::SIZE as i32) as usize];
        chunk.set_block(lx, y as u32 % Chunk::SIZE, lz, id);
    }

    pub fn view(&mut self, lx: u32, lz: u32, placeholder: BlockId) -> ColumnView<'_> {
        ColumnView { column: self, lx, lz, placeholder }
    }

    /// Runs of identical blocks from the top of the world down, as `(top, bottom, block)`.
    pub fn profile(&self, lx: u32, lz: u32) -> Vec<(i32, i32, BlockId)> {
        let mut runs: Vec<(i32, i32, BlockId)> = Vec::new();
        for y in (0..self.height()).rev() {
            let block = self.get_block(lx, y, lz);
            if let Some(run) = runs.last_mut().filter(|run| run.2 == block) {
                run.1 = y;
            } else {
                runs.push((y, y, block));
            }
        }
        runs
    }
}

/// One block column of a [`ChunkColumn`], as seen by the strata pass.
pub struct ColumnView<'a> {
    column: &'a mut ChunkColumn,
    lx: u32,
    lz: u32,
    placeholder: BlockId,
}

impl ColumnStore for ColumnView<'_> {
    fn surface_height(&self) -> i32 { self.column.surface_at(self.lx, self.lz) }

    fn block_at(&self, y: i32) -> BlockId { self.column.get_block(self.lx, y, self.lz) }

    fn set_block(&mut self, y: i32, id: BlockId) { self.column.set_block(self.lx, y, self.lz, id) }

    fn placeholder(&self) -> BlockId { self.placeholder }
}
