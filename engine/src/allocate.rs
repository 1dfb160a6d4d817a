use crate::aggregate::NoiseSample;
use crate::api::{PerGroup, RockGroup};
use crate::config::RockStrataConfig;

/// Extra room granted to igneous rock, since strata culled for thinness leave
/// part of the column unclaimed.
pub const IGNEOUS_HEADROOM_SLACK: f32 = 1.2;

#[derive(Debug, Clone, PartialEq)]
pub struct Allocation {
    /// Group caps after reconciling against noise support.
    pub adjusted_caps: PerGroup<f32>,
    /// Target thickness per stratum, in configuration order. Never NaN.
    pub targets: Vec<f32>,
}

/// `adj[g] = min(noise_sum[g], raw_cap[g] * distort)`, then igneous is
/// limited to the height left over by the other three groups.
pub fn adjust_caps(raw_caps: &PerGroup<f32>, sample: &NoiseSample, column_height: i32) -> PerGroup<f32> {
    let mut adj = PerGroup::from_fn(|g| sample.group_sums[g].min(raw_caps[g] * sample.thickness_distort));

    let claimed = adj[RockGroup::Sedimentary] + adj[RockGroup::Metamorphic] + adj[RockGroup::Volcanic];
    let remaining = (column_height as f32 - claimed) * IGNEOUS_HEADROOM_SLACK;
    adj[RockGroup::Igneous] = remaining.min(adj[RockGroup::Igneous]);
    adj
}

pub fn allocate(
    strata: &RockStrataConfig,
    raw_caps: &PerGroup<f32>,
    sample: &NoiseSample,
    column_height: i32,
) -> Allocation {
    let adjusted_caps = adjust_caps(raw_caps, sample, column_height);
    let targets = strata
        .variants
        .iter()
        .zip(&sample.thickness)
        .map(|(stratum, &noise)| {
            let g = stratum.rock_group;
            let share = noise / sample.group_sums[g];
            let weighted = share * adjusted_caps[g];
            // 0/0 when the group has no noise support
            if weighted.is_finite() { weighted } else { 0.0 }
        })
        .collect();

    Allocation { adjusted_caps, targets }
}
