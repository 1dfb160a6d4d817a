use serde::{Deserialize, Serialize};
use strata_engine::BlockId;

use crate::block_registry::AIR;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Chunk {
    pub coord: [i32; 3],
    pub blocks: Vec<u16>,
    #[serde(skip)]
    pub dirty: bool,
}

impl Chunk {

    pub const SIZE: u32 = 32;
    pub const COUNT: usize = (32*32*32) as usize;

    pub fn new(coord: [i32; 3]) -> Self {
        Self { coord, blocks: vec![AIR.0; Self::COUNT], dirty: true }
    }

    #[inline]
    fn index(x: u32, y: u32, z: u32) -> usize {
        // x fastest, then z, then y: (y*32 + z)*32 + x
        ((y as usize) * 32 + (z as usize)) * 32 + (x as usize)
    }

    pub fn set_block(&mut self, x: u32, y: u32, z: u32, id: BlockId) {
        let idx = Self::index(x, y, z);
        let old_block = self.blocks[idx];
        self.blocks[idx] = id.0;

        if old_block != id.0 {
            self.dirty = true;
        }
    }

    pub fn get_block(&self, x: u32, y: u32, z: u32) -> BlockId {
        BlockId(self.blocks[Self::index(x, y, z)])
    }

    pub fn count_solid(&self) -> usize {
        self.blocks.iter().filter(|b| **b != AIR.0).count()
    }
}
