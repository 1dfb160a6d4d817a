use tracing::info;

use crate::aggregate::{aggregate_noise, NoiseSample};
use crate::allocate::{allocate, Allocation};
use crate::api::{BlockId, ColumnSite, ColumnStore, DistortionNoise, PerGroup, ProvinceWeightField, StrataError, StratumNoiseField};
use crate::caps::resolve_group_caps;
use crate::config::{GeologicProvinces, RockStrataConfig, StrataSettings};
use crate::directory::RockTypeDirectory;
use crate::fill::{fill_column, FillInputs, FillReport};

/// External fields sampled for a column.
pub struct ColumnInputs<'a, N: StratumNoiseField> {
    pub provinces: &'a dyn ProvinceWeightField,
    /// One field per stratum, in configuration order.
    pub strata: &'a [N],
    pub distortion: &'a dyn DistortionNoise,
}

/// Intermediate values and fill outcome of one column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnReport {
    pub raw_caps: PerGroup<f32>,
    pub noise: NoiseSample,
    pub allocation: Allocation,
    pub fill: FillReport,
}

/// Rock strata pass for block columns. Immutable once built, so one instance
/// can serve any number of concurrent columns.
#[derive(Debug, Clone)]
pub struct StrataGenerator {
    strata: RockStrataConfig,
    directory: RockTypeDirectory,
    province_caps: Vec<PerGroup<f32>>,
    blocks: Vec<BlockId>,
    settings: StrataSettings,
}

impl StrataGenerator {
    /// `blocks` holds the block id written for each stratum.
    pub fn new(
        strata: RockStrataConfig,
        provinces: &GeologicProvinces,
        settings: StrataSettings,
        blocks: Vec<BlockId>,
    ) -> Result<Self, StrataError> {
        strata.validate()?;
        provinces.validate()?;
        if blocks.len() != strata.variants.len() {
            return Err(StrataError::Validation(format!(
                "{} block ids for {} strata",
                blocks.len(),
                strata.variants.len()
            )));
        }
        if settings.world_height <= 0 {
            return Err(StrataError::Validation(format!("world height {} must be positive", settings.world_height)));
        }

        let directory = RockTypeDirectory::build(&strata);
        let province_caps = provinces.scaled(settings.world_height);
        info!(
            "Strata generator ready: {} strata, {} provinces, sea level {}",
            strata.variants.len(),
            province_caps.len(),
            settings.sea_level
        );
        Ok(Self { strata, directory, province_caps, blocks, settings })
    }

    pub fn strata(&self) -> &RockStrataConfig { &self.strata }
    pub fn directory(&self) -> &RockTypeDirectory { &self.directory }
    pub fn settings(&self) -> &StrataSettings { &self.settings }
    pub fn province_count(&self) -> usize { self.province_caps.len() }

    /// Computes the layer thicknesses for `site` and writes them into `column`.
    pub fn gen_column<N, C>(&self, site: ColumnSite, inputs: &ColumnInputs<'_, N>, column: &mut C) -> Result<ColumnReport, StrataError>
    where
        N: StratumNoiseField,
        C: ColumnStore + ?Sized,
    {
        if inputs.strata.len() != self.strata.variants.len() {
            return Err(StrataError::NoiseFieldCount { expected: self.strata.variants.len(), got: inputs.strata.len() });
        }

        if inputs.provinces.province_count() != self.province_caps.len() {
            return Err(StrataError::WeightCount { expected: self.province_caps.len(), got: inputs.provinces.province_count() });
        }

        let mut weights = vec![0.0f32; self.province_caps.len()];
        inputs.provinces.weights_at(site, &mut weights);
        let raw_caps = resolve_group_caps(&self.province_caps, &weights);

        let noise = aggregate_noise(site, &self.strata, inputs.strata, inputs.distortion, self.settings.sampling);

        let floor = 1;
        let column_height = column.surface_height() - floor;
        let allocation = allocate(&self.strata, &raw_caps, &noise, column_height);

        let fill_inputs = FillInputs {
            strata: &self.strata,
            directory: &self.directory,
            blocks: &self.blocks,
            raw_caps: &raw_caps,
            thickness_distort: noise.thickness_distort,
            sea_level: self.settings.sea_level,
        };
        let fill = fill_column(&fill_inputs, &allocation, column);

        Ok(ColumnReport { raw_caps, noise, allocation, fill })
    }
}
