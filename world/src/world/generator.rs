use noise::{NoiseFn, Perlin};
use rayon::prelude::*;
use strata_engine::fill::FillReport;
use strata_engine::{ColumnInputs, ColumnSite, StrataGenerator};
use tracing::{debug, info};

use crate::block_registry::{BlockRegistry, AIR, BEDROCK, DIRT, GRASS, ORE, STONE};
use crate::config::{WorldConfig, WorldError, WorldGeneratorConfig};
use crate::world::chunk::Chunk;
use crate::world::column::{ChunkColumn, ColumnPos};
use crate::world::sampling::{bake_stratum, BlockRect, ProvinceLayout, SimplexDistortion, StratumMap};
use crate::world::storage::ChunkStorage;

const SOIL_DEPTH: i32 = 4;

/// Strata totals over one or more chunk columns.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ColumnStats {
    pub columns: u64,
    pub exhausted: u64,
    pub culled: u64,
    /// Blocks written per stratum, in configuration order.
    pub written: Vec<u64>,
}

impl ColumnStats {
    pub fn new(strata: usize) -> Self {
        Self { written: vec![0; strata], ..Default::default() }
    }

    fn record(&mut self, fill: &FillReport) {
        self.columns += 1;
        self.exhausted += fill.exhausted as u64;
        self.culled += fill.culled.len() as u64;
        for (total, w) in self.written.iter_mut().zip(&fill.written) {
            *total += *w as u64;
        }
    }

    pub fn merge(&mut self, other: &ColumnStats) {
        self.columns += other.columns;
        self.exhausted += other.exhausted;
        self.culled += other.culled;
        for (total, w) in self.written.iter_mut().zip(&other.written) {
            *total += w;
        }
    }
}

/// 世界生成器
pub struct WorldGenerator {
    terrain_noise: Perlin,
    cave_noise: Perlin,
    ore_noise: Perlin,
    stratum_noise: Vec<Perlin>,
    distortion: SimplexDistortion,
    provinces: ProvinceLayout,
    strata: StrataGenerator,
    registry: BlockRegistry,
    config: WorldGeneratorConfig,
}

impl WorldGenerator {
    pub fn new(world: WorldConfig) -> Result<Self, WorldError> {
        let WorldConfig { generator: config, strata, provinces } = world;
        config.validate()?;

        let registry = BlockRegistry::with_strata(&strata);
        let blocks = registry.strata_blocks(&strata)?;
        let layout = ProvinceLayout::new(config.seed, &provinces)?;
        let strata = StrataGenerator::new(strata, &provinces, config.strata_settings(), blocks)?;

        let seed = config.seed;
        let stratum_noise = (0..strata.strata().variants.len())
            .map(|i| Perlin::new(seed.wrapping_add(100 + i as u32)))
            .collect();

        Ok(Self {
            terrain_noise: Perlin::new(seed),
            cave_noise: Perlin::new(seed.wrapping_add(1)),
            ore_noise: Perlin::new(seed.wrapping_add(2)),
            stratum_noise,
            distortion: SimplexDistortion::new(
                seed,
                config.distortion_frequency,
                config.distortion_amplitude,
                config.distortion_bias,
            ),
            provinces: layout,
            strata,
            registry,
            config,
        })
    }

    pub fn registry(&self) -> &BlockRegistry { &self.registry }
    pub fn strata(&self) -> &StrataGenerator { &self.strata }

    fn generate_height(&self, x: i32, z: i32) -> i32 {
        let mut height = 0.0;
        let mut amplitude = 1.0;
        let mut frequency = self.config.terrain_scale;

        for _ in 0..self.config.terrain_octaves {
            height += self.terrain_noise.get([x as f64 * frequency, z as f64 * frequency]) * amplitude;
            amplitude *= 0.5;
            frequency *= 2.0;
        }

        // [-1, 1] -> [0, 1]
        let normalized_height = (height + 1.0) * 0.5;
        let terrain_height = self.config.min_height as f64 +
            normalized_height * (self.config.max_height - self.config.min_height) as f64;

        (terrain_height as i32).clamp(self.config.min_height, self.config.max_height)
    }

    fn is_cave(&self, x: i32, y: i32, z: i32) -> bool {
        // keep caves away from the surface
        if y > self.config.sea_level + 10 {
            return false;
        }

        let cave_value = self.cave_noise.get([
            x as f64 * 0.02,
            y as f64 * 0.02,
            z as f64 * 0.02,
        ]);

        cave_value > self.config.cave_threshold
    }

    fn is_ore(&self, x: i32, y: i32, z: i32) -> bool {
        let f = self.config.ore_frequency;
        self.ore_noise.get([x as f64 * f, y as f64 * f, z as f64 * f]) > self.config.ore_threshold
    }

    /// Bedrock, placeholder stone, ore pockets and caves up to the terrain height.
    pub fn generate_terrain(&self, pos: ColumnPos) -> ChunkColumn {
        let mut column = ChunkColumn::new(pos, self.config.height_chunks);
        let size = Chunk::SIZE;
        for lx in 0..size {
            for lz in 0..size {
                let world_x = pos.x * size as i32 + lx as i32;
                let world_z = pos.z * size as i32 + lz as i32;
                let height = self.generate_height(world_x, world_z);
                column.height_map[(lz * size + lx) as usize] = height as u16;

                for y in 0..=height {
                    let block = if y == 0 {
                        BEDROCK
                    } else if self.is_cave(world_x, y, world_z) {
                        AIR
                    } else if self.is_ore(world_x, y, world_z) {
                        ORE
                    } else {
                        STONE
                    };
                    column.set_block(lx, y, lz, block);
                }
            }
        }
        column
    }

    /// Replaces placeholder stone with rock strata in every block column.
    pub fn apply_strata(&self, column: &mut ChunkColumn) -> Result<ColumnStats, WorldError> {
        let pos = column.pos;
        let window = BlockRect::stratum_window(pos.x, pos.z, self.distortion.margin(), self.config.sampling);
        let provinces = self.provinces.bake(BlockRect::chunk(pos.x, pos.z), self.config.province_cell_size);
        let fields: Vec<StratumMap> = self
            .strata
            .strata()
            .variants
            .iter()
            .zip(&self.stratum_noise)
            .map(|(stratum, noise)| bake_stratum(noise, &stratum.noise, window, self.config.stratum_cell_size))
            .collect();
        let inputs = ColumnInputs { provinces: &provinces, strata: &fields, distortion: &self.distortion };

        let mut stats = ColumnStats::new(fields.len());
        for lx in 0..Chunk::SIZE {
            for lz in 0..Chunk::SIZE {
                let site = ColumnSite::new(pos.x, pos.z, lx as i32, lz as i32);
                let mut view = column.view(lx, lz, STONE);
                let report = self.strata.gen_column(site, &inputs, &mut view)?;
                stats.record(&report.fill);
            }
        }
        Ok(stats)
    }

    fn place_soil(&self, column: &mut ChunkColumn) {
        for lx in 0..Chunk::SIZE {
            for lz in 0..Chunk::SIZE {
                let surface = column.surface_at(lx, lz);
                for y in (surface - SOIL_DEPTH + 1).max(1)..=surface {
                    if column.get_block(lx, y, lz) == AIR {
                        continue;
                    }
                    let block = if y == surface && surface > self.config.sea_level { GRASS } else { DIRT };
                    column.set_block(lx, y, lz, block);
                }
            }
        }
    }

    /// Terrain, then rock strata, then top soil.
    pub fn generate_column(&self, pos: ColumnPos) -> Result<(ChunkColumn, ColumnStats), WorldError> {
        let mut column = self.generate_terrain(pos);
        let stats = self.apply_strata(&mut column)?;
        self.place_soil(&mut column);
        debug!(
            "Generated column ({}, {}): {} strata culled, {} columns exhausted",
            pos.x, pos.z, stats.culled, stats.exhausted
        );
        Ok((column, stats))
    }

    /// Generates the square of columns within `radius` of `center` in parallel.
    pub fn generate_region(&self, center: ColumnPos, radius: i32, storage: &ChunkStorage) -> Result<ColumnStats, WorldError> {
        let positions: Vec<ColumnPos> = (-radius..=radius)
            .flat_map(|dx| (-radius..=radius).map(move |dz| ColumnPos::new(center.x + dx, center.z + dz)))
            .collect();
        info!("Generating {} chunk columns around ({}, {})", positions.len(), center.x, center.z);

        let per_column = positions
            .par_iter()
            .map(|pos| -> Result<ColumnStats, WorldError> {
                let (column, stats) = self.generate_column(*pos)?;
                storage.insert(column);
                Ok(stats)
            })
            .collect::<Result<Vec<_>, WorldError>>()?;

        let mut total = ColumnStats::new(self.stratum_noise.len());
        for stats in &per_column {
            total.merge(stats);
        }
        info!("Region done: {} block columns, {} exhausted", total.columns, total.exhausted);
        Ok(total)
    }
}
