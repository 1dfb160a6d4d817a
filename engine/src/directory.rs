use tracing::info;

use crate::api::{PerGroup, RockGroup};
use crate::config::RockStrataConfig;

/// Stratum indices grouped by rock group, each list in configuration order.
#[derive(Debug, Clone, PartialEq)]
pub struct RockTypeDirectory {
    by_group: PerGroup<Vec<usize>>,
    len: usize,
}

impl RockTypeDirectory {
    pub fn build(strata: &RockStrataConfig) -> Self {
        let mut by_group: PerGroup<Vec<usize>> = PerGroup(Default::default());
        for (id, stratum) in strata.variants.iter().enumerate() {
            by_group[stratum.rock_group].push(id);
        }
        info!("Built rock directory: {} variants", strata.variants.len());
        Self { by_group, len: strata.variants.len() }
    }

    pub fn group(&self, group: RockGroup) -> &[usize] {
        &self.by_group[group]
    }

    /// Total number of strata across all groups.
    pub fn len(&self) -> usize { self.len }

    pub fn is_empty(&self) -> bool { self.len == 0 }
}
