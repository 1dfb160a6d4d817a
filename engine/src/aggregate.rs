use crate::api::{ColumnSite, DistortionNoise, PerGroup, StratumNoiseField, CHUNK_SIZE};
use crate::config::{RockStrataConfig, SamplingMode};

pub const MIN_THICKNESS_DISTORT: f32 = 0.9;
pub const MAX_THICKNESS_DISTORT: f32 = 1.1;
const DISTORT_DIVISOR: f32 = 30.0;

/// Noise samples for one column.
#[derive(Debug, Clone, PartialEq)]
pub struct NoiseSample {
    /// Raw thickness per stratum, in configuration order.
    pub thickness: Vec<f32>,
    pub group_sums: PerGroup<f32>,
    /// Uniform scale applied to every group cap, in `[0.9, 1.1]`.
    pub thickness_distort: f32,
}

pub fn thickness_distort(dist_x: f32, dist_z: f32) -> f32 {
    ((dist_x + dist_z) / DISTORT_DIVISOR).clamp(MIN_THICKNESS_DISTORT, MAX_THICKNESS_DISTORT)
}

/// World-space coordinate every stratum field is sampled at for this column.
pub fn sample_coord(site: ColumnSite, dist_x: f32, dist_z: f32, mode: SamplingMode) -> (f32, f32) {
    let x = site.world_x() as f32 + dist_x;
    let z = match mode {
        SamplingMode::Corrected => site.world_z() as f32 + dist_z,
        SamplingMode::Legacy => (site.chunk_x * CHUNK_SIZE + site.local_z) as f32 + dist_x,
    };
    (x, z)
}

pub fn aggregate_noise<N: StratumNoiseField>(
    site: ColumnSite,
    strata: &RockStrataConfig,
    fields: &[N],
    distortion: &dyn DistortionNoise,
    mode: SamplingMode,
) -> NoiseSample {
    let wx = site.world_x() as f64;
    let wz = site.world_z() as f64;
    let dist_x = distortion.sample_x(wx, wz);
    let dist_z = distortion.sample_z(wx, wz);
    let (nx, nz) = sample_coord(site, dist_x, dist_z, mode);

    let mut group_sums = PerGroup::splat(0.0f32);
    let thickness = strata
        .variants
        .iter()
        .zip(fields)
        .map(|(stratum, field)| {
            let t = field.sample(nx, nz);
            group_sums[stratum.rock_group] += t;
            t
        })
        .collect();

    NoiseSample { thickness, group_sums, thickness_distort: thickness_distort(dist_x, dist_z) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{GenDir, RockGroup};
    use crate::config::{RockStratum, StratumNoiseParams};
    use std::sync::Mutex;

    struct Const(f32);
    impl StratumNoiseField for Const {
        fn sample(&self, _x: f32, _z: f32) -> f32 { self.0 }
    }

    /// Records the coordinates it was sampled at.
    struct Probe(Mutex<Vec<(f32, f32)>>);
    impl StratumNoiseField for Probe {
        fn sample(&self, x: f32, z: f32) -> f32 {
            self.0.lock().unwrap().push((x, z));
            1.0
        }
    }

    struct FixedDistortion(f32, f32);
    impl DistortionNoise for FixedDistortion {
        fn sample_x(&self, _: f64, _: f64) -> f32 { self.0 }
        fn sample_z(&self, _: f64, _: f64) -> f32 { self.1 }
    }

    fn strata(groups: &[RockGroup]) -> RockStrataConfig {
        RockStrataConfig {
            variants: groups
                .iter()
                .enumerate()
                .map(|(i, g)| RockStratum {
                    code: format!("s{i}"),
                    block_code: format!("rock-s{i}"),
                    rock_group: *g,
                    gen_dir: GenDir::TopDown,
                    noise: StratumNoiseParams::default(),
                })
                .collect(),
        }
    }

    #[test]
    fn distort_is_clamped() {
        assert_eq!(thickness_distort(0.0, 0.0), 0.9);
        assert_eq!(thickness_distort(100.0, 100.0), 1.1);
        assert!((thickness_distort(15.0, 15.0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn sums_per_group() {
        let cfg = strata(&[RockGroup::Sedimentary, RockGroup::Igneous, RockGroup::Sedimentary]);
        let fields = [Const(30.0), Const(100.0), Const(10.0)];
        let sample = aggregate_noise(ColumnSite::new(0, 0, 0, 0), &cfg, &fields, &FixedDistortion(15.0, 15.0), SamplingMode::Corrected);
        assert_eq!(sample.thickness, vec![30.0, 100.0, 10.0]);
        assert_eq!(sample.group_sums[RockGroup::Sedimentary], 40.0);
        assert_eq!(sample.group_sums[RockGroup::Igneous], 100.0);
        assert_eq!(sample.group_sums[RockGroup::Volcanic], 0.0);
    }

    #[test]
    fn every_stratum_sees_same_coordinate() {
        let cfg = strata(&[RockGroup::Sedimentary, RockGroup::Volcanic]);
        let fields = [Probe(Mutex::new(vec![])), Probe(Mutex::new(vec![]))];
        let site = ColumnSite::new(2, 3, 5, 7);
        aggregate_noise(site, &cfg, &fields, &FixedDistortion(1.5, -2.0), SamplingMode::Corrected);
        let a = fields[0].0.lock().unwrap().clone();
        let b = fields[1].0.lock().unwrap().clone();
        assert_eq!(a, b);
        assert_eq!(a, vec![(64.0 + 5.0 + 1.5, 96.0 + 7.0 - 2.0)]);
    }

    #[test]
    fn legacy_mode_reuses_x_distortion() {
        let site = ColumnSite::new(2, 3, 5, 7);
        assert_eq!(sample_coord(site, 1.5, -2.0, SamplingMode::Legacy), (70.5, 64.0 + 7.0 + 1.5));
    }
}
