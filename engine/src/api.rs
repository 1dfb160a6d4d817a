use std::ops::{Index, IndexMut};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StrataError {
    #[error("Failed to read config {path:?}: {source}")]
    Io { path: PathBuf, #[source] source: std::io::Error },
    #[error("Invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid RON config: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("Config validation failed: {0}")]
    Validation(String),
    #[error("Province weight vector has {got} entries, expected {expected}")]
    WeightCount { expected: usize, got: usize },
    #[error("Got {got} stratum noise fields, expected {expected}")]
    NoiseFieldCount { expected: usize, got: usize },
}

/// Rock group of a stratum. Discriminants are the configuration indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RockGroup {
    Sedimentary = 0,
    Metamorphic = 1,
    Igneous = 2,
    Volcanic = 3,
}

impl RockGroup {
    pub const COUNT: usize = 4;

    pub const ALL: [RockGroup; Self::COUNT] = [
        RockGroup::Sedimentary,
        RockGroup::Metamorphic,
        RockGroup::Igneous,
        RockGroup::Volcanic,
    ];

    /// Order in which groups are written into a column. Igneous goes last and
    /// fills whatever room the others leave.
    pub const GENERATION_ORDER: [RockGroup; Self::COUNT] = [
        RockGroup::Volcanic,
        RockGroup::Sedimentary,
        RockGroup::Metamorphic,
        RockGroup::Igneous,
    ];

    #[inline]
    pub fn index(self) -> usize { self as usize }
}

/// One value per rock group.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PerGroup<T>(pub [T; RockGroup::COUNT]);

impl<T: Copy> PerGroup<T> {
    pub fn splat(value: T) -> Self { Self([value; RockGroup::COUNT]) }

    pub fn from_fn(mut f: impl FnMut(RockGroup) -> T) -> Self {
        Self(RockGroup::ALL.map(|g| f(g)))
    }
}

impl<T> Index<RockGroup> for PerGroup<T> {
    type Output = T;
    fn index(&self, group: RockGroup) -> &T { &self.0[group.index()] }
}

impl<T> IndexMut<RockGroup> for PerGroup<T> {
    fn index_mut(&mut self, group: RockGroup) -> &mut T { &mut self.0[group.index()] }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GenDir { TopDown, BottomUp }

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockId(pub u16);

pub const CHUNK_SIZE: i32 = 32;

/// Horizontal position of one block column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColumnSite {
    pub chunk_x: i32,
    pub chunk_z: i32,
    pub local_x: i32,
    pub local_z: i32,
}

impl ColumnSite {
    pub fn new(chunk_x: i32, chunk_z: i32, local_x: i32, local_z: i32) -> Self {
        Self { chunk_x, chunk_z, local_x, local_z }
    }

    pub fn from_world(world_x: i32, world_z: i32) -> Self {
        Self {
            chunk_x: world_x.div_euclid(CHUNK_SIZE),
            chunk_z: world_z.div_euclid(CHUNK_SIZE),
            local_x: world_x.rem_euclid(CHUNK_SIZE),
            local_z: world_z.rem_euclid(CHUNK_SIZE),
        }
    }

    pub fn world_x(&self) -> i32 { self.chunk_x * CHUNK_SIZE + self.local_x }
    pub fn world_z(&self) -> i32 { self.chunk_z * CHUNK_SIZE + self.local_z }
}

/// Interpolated geologic province weights.
pub trait ProvinceWeightField: Send + Sync {
    fn province_count(&self) -> usize;
    /// Writes one weight per province into `out`, in province configuration order.
    fn weights_at(&self, site: ColumnSite, out: &mut [f32]);
}

/// Raw thickness noise of a single rock stratum, sampled in world block space.
pub trait StratumNoiseField: Send + Sync {
    fn sample(&self, x: f32, z: f32) -> f32;
}

pub trait DistortionNoise: Send + Sync {
    fn sample_x(&self, world_x: f64, world_z: f64) -> f32;
    fn sample_z(&self, world_x: f64, world_z: f64) -> f32;
}

/// Block access for a single vertical column.
pub trait ColumnStore {
    fn surface_height(&self) -> i32;
    fn block_at(&self, y: i32) -> BlockId;
    fn set_block(&mut self, y: i32, id: BlockId);
    /// The generic rock block that strata are allowed to replace.
    fn placeholder(&self) -> BlockId;

    fn is_placeholder(&self, y: i32) -> bool {
        self.block_at(y) == self.placeholder()
    }
}

/// In-memory column, indexed from y = 0.
#[derive(Debug, Clone, PartialEq)]
pub struct VecColumn {
    pub blocks: Vec<BlockId>,
    pub surface: i32,
    pub placeholder: BlockId,
}

impl VecColumn {
    /// Column filled with `placeholder` from 0 through `surface`.
    pub fn filled(surface: i32, placeholder: BlockId) -> Self {
        let len = (surface.max(0) + 1) as usize;
        Self { blocks: vec![placeholder; len], surface, placeholder }
    }

    pub fn count(&self, id: BlockId) -> usize {
        self.blocks.iter().filter(|b| **b == id).count()
    }
}

impl ColumnStore for VecColumn {
    fn surface_height(&self) -> i32 { self.surface }

    fn block_at(&self, y: i32) -> BlockId {
        usize::try_from(y).ok().and_then(|i| self.blocks.get(i)).copied().unwrap_or_default()
    }

    fn set_block(&mut self, y: i32, id: BlockId) {
        if let Some(slot) = usize::try_from(y).ok().and_then(|i| self.blocks.get_mut(i)) {
            *slot = id;
        }
    }

    fn placeholder(&self) -> BlockId { self.placeholder }
}
