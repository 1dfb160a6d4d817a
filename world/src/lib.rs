//! Voxel world generation around the rock strata pass: chunk columns,
//! block registry, province and stratum maps, and a parallel region generator.

pub mod block_registry;
pub mod config;
pub mod world;

pub use config::{WorldConfig, WorldError, WorldGeneratorConfig};
pub use world::{ChunkColumn, ChunkStorage, ColumnPos, ColumnStats, WorldGenerator};
