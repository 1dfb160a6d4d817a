pub mod chunk;
pub mod column;
pub mod generator;
pub mod sampling;
pub mod storage;

pub use self::column::{ChunkColumn, ColumnPos};
pub use self::generator::{ColumnStats, WorldGenerator};
pub use self::storage::ChunkStorage;
