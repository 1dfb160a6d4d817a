use crate::api::PerGroup;

/// Blends each province's group caps by its weight at this column.
///
/// `province_caps` and `weights` are parallel, in province configuration order.
/// Zero-weight provinces are skipped.
pub fn resolve_group_caps(province_caps: &[PerGroup<f32>], weights: &[f32]) -> PerGroup<f32> {
    let mut caps = PerGroup::splat(0.0f32);
    for (province, &w) in province_caps.iter().zip(weights) {
        if w == 0.0 {
            continue;
        }
        for (cap, max) in caps.0.iter_mut().zip(province.0) {
            *cap += max * w;
        }
    }
    caps
}
