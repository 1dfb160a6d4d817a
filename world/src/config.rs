use std::path::Path;

use serde::{Deserialize, Serialize};
use strata_engine::config::{load_config, parse_config};
use strata_engine::{GeologicProvinces, RockStrataConfig, SamplingMode, StrataError, StrataSettings};
use thiserror::Error;

use crate::world::chunk::Chunk;

const DEFAULT_CONFIG: &str = include_str!("../config/default.ron");

#[derive(Debug, Error)]
pub enum WorldError {
    #[error(transparent)]
    Strata(#[from] StrataError),
    #[error("Unknown block '{0}'")]
    UnknownBlock(String),
    #[error("Invalid world config: {0}")]
    InvalidConfig(String),
}

/// 世界生成器配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldGeneratorConfig {
    pub seed: u32,
    pub sea_level: i32,
    /// Vertical size of the world in chunks.
    pub height_chunks: u32,
    pub max_height: i32,
    pub min_height: i32,
    pub terrain_scale: f64,
    pub terrain_octaves: usize,
    pub cave_threshold: f64,
    pub ore_frequency: f64,
    pub ore_threshold: f64,
    pub distortion_frequency: f32,
    /// Peak offset of the distortion fields around their bias, in blocks.
    pub distortion_amplitude: f32,
    /// Constant added to each distortion field; 15 centres the thickness scale on 1.0.
    pub distortion_bias: f32,
    pub province_cell_size: i32,
    pub stratum_cell_size: i32,
    pub sampling: SamplingMode,
}

impl Default for WorldGeneratorConfig {
    fn default() -> Self {
        Self {
            seed: 12345,
            sea_level: 64,
            height_chunks: 5,
            max_height: 128,
            min_height: 8,
            terrain_scale: 0.01,
            terrain_octaves: 4,
            cave_threshold: 0.6,
            ore_frequency: 0.05,
            ore_threshold: 0.7,
            distortion_frequency: 0.02,
            distortion_amplitude: 8.0,
            distortion_bias: 15.0,
            province_cell_size: 128,
            stratum_cell_size: 16,
            sampling: SamplingMode::Corrected,
        }
    }
}

impl WorldGeneratorConfig {
    pub fn world_height(&self) -> i32 {
        self.height_chunks as i32 * Chunk::SIZE as i32
    }

    pub fn strata_settings(&self) -> StrataSettings {
        StrataSettings { sea_level: self.sea_level, world_height: self.world_height(), sampling: self.sampling }
    }

    pub fn validate(&self) -> Result<(), WorldError> {
        if self.height_chunks == 0 {
            return Err(WorldError::InvalidConfig("height_chunks must be at least 1".into()));
        }
        if self.min_height < 1 || self.max_height >= self.world_height() || self.min_height > self.max_height {
            return Err(WorldError::InvalidConfig(format!(
                "terrain range {}..={} does not fit a world of height {}",
                self.min_height,
                self.max_height,
                self.world_height()
            )));
        }
        if self.province_cell_size <= 0 || self.stratum_cell_size <= 0 {
            return Err(WorldError::InvalidConfig("map cell sizes must be positive".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldConfig {
    #[serde(default)]
    pub generator: WorldGeneratorConfig,
    pub strata: RockStrataConfig,
    pub provinces: GeologicProvinces,
}

impl WorldConfig {
    /// The configuration shipped with the crate.
    pub fn builtin() -> Result<Self, WorldError> {
        Ok(parse_config(DEFAULT_CONFIG, Path::new("default.ron"))?)
    }

    pub fn load(path: &Path) -> Result<Self, WorldError> {
        Ok(load_config(path)?)
    }
}
