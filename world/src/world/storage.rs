use dashmap::DashMap;

use crate::world::column::{ChunkColumn, ColumnPos};

#[derive(Default)]
pub struct ChunkStorage {
    pub columns: DashMap<ColumnPos, ChunkColumn>,
}

impl ChunkStorage {
    pub fn new() -> Self {
        Self {
            columns: DashMap::new(),
        }
    }

    pub fn insert(&self, column: ChunkColumn) {
        self.columns.insert(column.pos, column);
    }

    pub fn contains(&self, pos: &ColumnPos) -> bool {
        self.columns.contains_key(pos)
    }

    /// Runs `f` against the stored column, if any.
    pub fn with_column<R>(&self, pos: &ColumnPos, f: impl FnOnce(&ChunkColumn) -> R) -> Option<R> {
        self.columns.get(pos).map(|c| f(c.value()))
    }

    pub fn remove(&self, pos: &ColumnPos) -> Option<ChunkColumn> {
        self.columns.remove(pos).map(|(_, column)| column)
    }

    pub fn len(&self) -> usize { self.columns.len() }

    pub fn is_empty(&self) -> bool { self.columns.is_empty() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_replace_and_remove() {
        let storage = ChunkStorage::new();
        assert!(storage.is_empty());

        let pos = ColumnPos::new(2, -3);
        storage.insert(ChunkColumn::new(pos, 1));
        storage.insert(ChunkColumn::new(pos, 2));
        assert_eq!(storage.len(), 1);
        assert_eq!(storage.with_column(&pos, |c| c.chunks.len()), Some(2));

        let removed = storage.remove(&pos).unwrap();
        assert_eq!(removed.pos, pos);
        assert!(!storage.contains(&pos));
        assert!(storage.is_empty());
        assert_eq!(storage.with_column(&pos, |c| c.height()), None);
    }
}
