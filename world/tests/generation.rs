use strata_engine::SamplingMode;
use strata_world::block_registry::{AIR, BEDROCK, ORE, STONE};
use strata_world::world::chunk::Chunk;
use strata_world::{ChunkStorage, ColumnPos, WorldConfig, WorldGenerator};

fn generator() -> WorldGenerator {
    WorldGenerator::new(WorldConfig::builtin().unwrap()).unwrap()
}

#[test]
fn same_seed_same_column() {
    let a = generator();
    let b = generator();
    let (ca, sa) = a.generate_column(ColumnPos::new(3, -7)).unwrap();
    let (cb, sb) = b.generate_column(ColumnPos::new(3, -7)).unwrap();
    assert_eq!(ca, cb);
    assert_eq!(sa, sb);
    assert_eq!(sa.columns, (Chunk::SIZE * Chunk::SIZE) as u64);
}

#[test]
fn parallel_region_matches_sequential_columns() {
    let gen = generator();
    let storage = ChunkStorage::new();
    let stats = gen.generate_region(ColumnPos::new(0, 0), 1, &storage).unwrap();
    assert_eq!(storage.len(), 9);
    assert_eq!(stats.columns, 9 * 1024);

    for x in -1..=1 {
        for z in -1..=1 {
            let pos = ColumnPos::new(x, z);
            let (expected, _) = gen.generate_column(pos).unwrap();
            assert_eq!(storage.with_column(&pos, |c| c == &expected), Some(true));
        }
    }
}

#[test]
fn strata_replace_only_placeholder_stone() {
    let gen = generator();
    let pos = ColumnPos::new(1, 2);
    let terrain = gen.generate_terrain(pos);
    let mut layered = terrain.clone();
    gen.apply_strata(&mut layered).unwrap();

    let mut replaced = 0;
    for lx in 0..Chunk::SIZE {
        for lz in 0..Chunk::SIZE {
            for y in 0..terrain.height() {
                let before = terrain.get_block(lx, y, lz);
                let after = layered.get_block(lx, y, lz);
                if before != STONE {
                    assert_eq!(before, after, "feature at ({lx}, {y}, {lz}) overwritten");
                } else if after != STONE {
                    replaced += 1;
                }
            }
        }
    }
    assert!(replaced > 0);
    assert_eq!(layered.get_block(0, 0, 0), BEDROCK);
}

#[test]
fn terrain_contains_protected_features() {
    let gen = generator();
    let terrain = gen.generate_terrain(ColumnPos::new(0, 0));
    let blocks: Vec<u16> = terrain.chunks.iter().flat_map(|c| c.blocks.iter().copied()).collect();
    assert!(blocks.contains(&BEDROCK.0));
    assert!(blocks.contains(&STONE.0));
    assert!(blocks.contains(&AIR.0));
    // ore pockets stay a minority of the placeholder rock
    let ore = blocks.iter().filter(|b| **b == ORE.0).count();
    let stone = blocks.iter().filter(|b| **b == STONE.0).count();
    assert!(ore < stone);
}

#[test]
fn sampling_mode_changes_layout() {
    let mut legacy_config = WorldConfig::builtin().unwrap();
    legacy_config.generator.sampling = SamplingMode::Legacy;
    let legacy = WorldGenerator::new(legacy_config).unwrap();
    let corrected = generator();

    let pos = ColumnPos::new(4, 9);
    let (a, _) = legacy.generate_column(pos).unwrap();
    let (b, _) = corrected.generate_column(pos).unwrap();
    assert_eq!(a.height_map, b.height_map);
    assert_ne!(a, b);
}

#[test]
fn profile_spans_air_to_bedrock() {
    let gen = generator();
    let (column, _) = gen.generate_column(ColumnPos::new(0, 0)).unwrap();
    let surface = column.surface_at(5, 5);
    let profile = column.profile(5, 5);
    assert_eq!(profile.last(), Some(&(0, 0, BEDROCK)));
    assert_eq!(profile[0].0, column.height() - 1);
    assert_eq!(profile[0].2, AIR);
    assert!(profile[0].1 <= surface + 1);
}
