use fastnoise_lite::{FastNoiseLite, NoiseType};
use ndarray::Array2;
use noise::{NoiseFn, Perlin};
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::SeedableRng;
use strata_engine::api::{ColumnSite, DistortionNoise, ProvinceWeightField, StratumNoiseField, CHUNK_SIZE};
use strata_engine::config::StratumNoiseParams;
use strata_engine::{GeologicProvinces, SamplingMode};

use crate::config::WorldError;

/// Inclusive block-space rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockRect {
    pub min_x: i32,
    pub min_z: i32,
    pub max_x: i32,
    pub max_z: i32,
}

impl BlockRect {
    /// Area a chunk column's stratum samples can land in, given the distortion margin.
    pub fn stratum_window(chunk_x: i32, chunk_z: i32, margin: i32, mode: SamplingMode) -> Self {
        // legacy sampling derives z from the chunk's x origin
        let z_chunk = match mode {
            SamplingMode::Corrected => chunk_z,
            SamplingMode::Legacy => chunk_x,
        };
        Self {
            min_x: chunk_x * CHUNK_SIZE - margin,
            min_z: z_chunk * CHUNK_SIZE - margin,
            max_x: (chunk_x + 1) * CHUNK_SIZE + margin,
            max_z: (z_chunk + 1) * CHUNK_SIZE + margin,
        }
    }

    pub fn chunk(chunk_x: i32, chunk_z: i32) -> Self {
        Self::stratum_window(chunk_x, chunk_z, 0, SamplingMode::Corrected)
    }
}

/// Values on a square lattice covering a [`BlockRect`], sampled by bilinear interpolation.
#[derive(Debug, Clone, PartialEq)]
pub struct LatticeMap<T> {
    data: Array2<T>,
    /// Lattice coordinate of `data[[0, 0]]`, as (x, z).
    origin: (i32, i32),
    cell_size: f32,
}

impl<T: Copy> LatticeMap<T> {
    pub fn bake(rect: BlockRect, cell_size: i32, mut value: impl FnMut(i32, i32) -> T) -> Self {
        let x0 = rect.min_x.div_euclid(cell_size);
        let z0 = rect.min_z.div_euclid(cell_size);
        let x1 = rect.max_x.div_euclid(cell_size) + 1;
        let z1 = rect.max_z.div_euclid(cell_size) + 1;
        let shape = ((z1 - z0 + 1) as usize, (x1 - x0 + 1) as usize);
        let data = Array2::from_shape_fn(shape, |(row, col)| value(x0 + col as i32, z0 + row as i32));
        Self { data, origin: (x0, z0), cell_size: cell_size as f32 }
    }

    /// The four lattice values around `(x, z)` with their bilinear weights.
    /// Positions outside the baked area clamp to its edge.
    fn corners(&self, x: f32, z: f32) -> [(T, f32); 4] {
        let (rows, cols) = self.data.dim();
        let fx = (x / self.cell_size - self.origin.0 as f32).clamp(0.0, (cols - 1) as f32);
        let fz = (z / self.cell_size - self.origin.1 as f32).clamp(0.0, (rows - 1) as f32);
        let c0 = (fx.floor() as usize).min(cols.saturating_sub(2));
        let r0 = (fz.floor() as usize).min(rows.saturating_sub(2));
        let c1 = (c0 + 1).min(cols - 1);
        let r1 = (r0 + 1).min(rows - 1);
        let tx = fx - c0 as f32;
        let tz = fz - r0 as f32;
        [
            (self.data[[r0, c0]], (1.0 - tx) * (1.0 - tz)),
            (self.data[[r0, c1]], tx * (1.0 - tz)),
            (self.data[[r1, c0]], (1.0 - tx) * tz),
            (self.data[[r1, c1]], tx * tz),
        ]
    }
}

/// Baked raw thickness of one stratum.
pub type StratumMap = LatticeMap<i32>;

impl StratumNoiseField for StratumMap {
    fn sample(&self, x: f32, z: f32) -> f32 {
        self.corners(x, z).iter().map(|(v, w)| *v as f32 * w).sum()
    }
}

/// Bakes stratum thickness from Perlin noise: `max(0, noise * amplitude + offset)`, rounded.
pub fn bake_stratum(noise: &Perlin, params: &StratumNoiseParams, rect: BlockRect, cell_size: i32) -> StratumMap {
    LatticeMap::bake(rect, cell_size, |cx, cz| {
        let x = (cx * cell_size) as f64 * params.frequency;
        let z = (cz * cell_size) as f64 * params.frequency;
        let n = noise.get([x, z]) as f32;
        (n * params.amplitude + params.offset).max(0.0).round() as i32
    })
}

/// Scatters provinces over a coarse lattice by configured weight.
#[derive(Debug, Clone)]
pub struct ProvinceLayout {
    seed: u64,
    choice: WeightedIndex<f32>,
    count: usize,
}

impl ProvinceLayout {
    pub fn new(seed: u32, provinces: &GeologicProvinces) -> Result<Self, WorldError> {
        let choice = WeightedIndex::new(provinces.variants.iter().map(|p| p.weight))
            .map_err(|e| WorldError::InvalidConfig(format!("province weights: {e}")))?;
        Ok(Self { seed: seed as u64, choice, count: provinces.variants.len() })
    }

    /// Province index of lattice cell `(cx, cz)`.
    pub fn province_at(&self, cx: i32, cz: i32) -> u16 {
        let mut rng = StdRng::seed_from_u64(cell_seed(self.seed, cx, cz));
        self.choice.sample(&mut rng) as u16
    }

    pub fn bake(&self, rect: BlockRect, cell_size: i32) -> ProvinceMap {
        ProvinceMap { lattice: LatticeMap::bake(rect, cell_size, |cx, cz| self.province_at(cx, cz)), count: self.count }
    }
}

fn cell_seed(seed: u64, cx: i32, cz: i32) -> u64 {
    // splitmix64 finalizer over the packed coordinates
    let mut h = seed ^ (((cx as u32 as u64) << 32) | cz as u32 as u64);
    h = h.wrapping_add(0x9E37_79B9_7F4A_7C15);
    h = (h ^ (h >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    h = (h ^ (h >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    h ^ (h >> 31)
}

/// Province indices blended into per-province weights.
#[derive(Debug, Clone, PartialEq)]
pub struct ProvinceMap {
    lattice: LatticeMap<u16>,
    count: usize,
}

impl ProvinceWeightField for ProvinceMap {
    fn province_count(&self) -> usize { self.count }

    fn weights_at(&self, site: ColumnSite, out: &mut [f32]) {
        out.fill(0.0);
        for (province, w) in self.lattice.corners(site.world_x() as f32, site.world_z() as f32) {
            if let Some(slot) = out.get_mut(province as usize) {
                *slot += w;
            }
        }
    }
}

/// Two independent simplex fields offsetting stratum sample positions.
///
/// Each field yields `bias + noise * amplitude`. The engine scales group caps
/// by `(dx + dz) / 30` clamped to `[0.9, 1.1]`, so a bias of 15 centres that
/// scale on 1.0; the bias itself only translates the stratum pattern.
pub struct SimplexDistortion {
    x: FastNoiseLite,
    z: FastNoiseLite,
    amplitude: f32,
    bias: f32,
}

impl SimplexDistortion {
    pub fn new(seed: u32, frequency: f32, amplitude: f32, bias: f32) -> Self {
        let make = |s: i32| {
            let mut f = FastNoiseLite::with_seed(s);
            f.set_noise_type(Some(NoiseType::OpenSimplex2));
            f.set_frequency(Some(frequency));
            f
        };
        Self { x: make(seed as i32 ^ 0x2D0F), z: make(seed as i32 ^ 0x5A17), amplitude, bias }
    }

    /// Largest offset either field can produce, rounded up to whole blocks.
    pub fn margin(&self) -> i32 { (self.bias.abs() + self.amplitude.abs()).ceil() as i32 + 1 }
}

impl DistortionNoise for SimplexDistortion {
    fn sample_x(&self, world_x: f64, world_z: f64) -> f32 {
        self.bias + self.x.get_noise_2d(world_x as f32, world_z as f32) * self.amplitude
    }

    fn sample_z(&self, world_x: f64, world_z: f64) -> f32 {
        self.bias + self.z.get_noise_2d(world_x as f32, world_z as f32) * self.amplitude
    }
}
