use tracing::trace;

use crate::allocate::Allocation;
use crate::api::{BlockId, ColumnStore, GenDir, PerGroup, RockGroup};
use crate::config::RockStrataConfig;
use crate::directory::RockTypeDirectory;

/// Strata thinner than this are not generated at all.
pub const MIN_STRATUM_THICKNESS: f32 = 2.0;
/// Sedimentary thickness lost per block of column height above sea level.
pub const SEDIMENT_SEA_LEVEL_FALLOFF: f32 = 0.5;

/// Everything the filler reads besides the column itself.
#[derive(Debug, Clone, Copy)]
pub struct FillInputs<'a> {
    pub strata: &'a RockStrataConfig,
    pub directory: &'a RockTypeDirectory,
    /// Block written for each stratum, in configuration order.
    pub blocks: &'a [BlockId],
    pub raw_caps: &'a PerGroup<f32>,
    pub thickness_distort: f32,
    pub sea_level: i32,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FillReport {
    /// Cells consumed per stratum, including protected cells left untouched.
    pub consumed: Vec<u32>,
    /// Cells actually overwritten per stratum.
    pub written: Vec<u32>,
    /// Strata skipped for being too thin, in the order they were visited.
    pub culled: Vec<usize>,
    pub group_filled: PerGroup<u32>,
    /// Remaining unfilled interval `[floor, ceiling]`; empty when `floor > ceiling`.
    pub floor: i32,
    pub ceiling: i32,
    pub exhausted: bool,
}

/// Realizable thickness of a stratum given what its group already placed.
pub fn realized_thickness(
    group: RockGroup,
    group_cap: f32,
    group_filled: u32,
    target: f32,
    ceiling: i32,
    sea_level: i32,
) -> f32 {
    let mut thickness = (group_cap - group_filled as f32).min(target);
    if group == RockGroup::Sedimentary {
        thickness -= (ceiling - sea_level).max(0) as f32 * SEDIMENT_SEA_LEVEL_FALLOFF;
    }
    thickness
}

/// Writes strata into `column`, consuming `[1, surface]` from both ends.
///
/// Groups go in [`RockGroup::GENERATION_ORDER`], strata within a group in
/// directory order. Only placeholder cells are overwritten.
pub fn fill_column<C: ColumnStore + ?Sized>(inputs: &FillInputs<'_>, alloc: &Allocation, column: &mut C) -> FillReport {
    let n = inputs.strata.variants.len();
    let mut report = FillReport {
        consumed: vec![0; n],
        written: vec![0; n],
        floor: 1,
        ceiling: column.surface_height(),
        ..Default::default()
    };
    'groups: for group in RockGroup::GENERATION_ORDER {
        let group_cap = inputs.raw_caps[group] * inputs.thickness_distort;

        for &id in inputs.directory.group(group) {
            if report.floor > report.ceiling {
                report.exhausted = true;
                break 'groups;
            }

            let thickness = realized_thickness(
                group,
                group_cap,
                report.group_filled[group],
                alloc.targets[id],
                report.ceiling,
                inputs.sea_level,
            );
            if thickness.is_nan() || thickness < MIN_STRATUM_THICKNESS {
                trace!("Culled stratum {} ({:.2} blocks)", inputs.strata.variants[id].code, thickness);
                report.culled.push(id);
                continue;
            }

            let gen_dir = inputs.strata.variants[id].gen_dir;
            let block = inputs.blocks[id];
            for _ in 0..thickness as i32 {
                if report.floor > report.ceiling {
                    report.exhausted = true;
                    break 'groups;
                }

                report.group_filled[group] += 1;
                report.consumed[id] += 1;

                let y = match gen_dir {
                    GenDir::BottomUp => {
                        report.floor += 1;
                        report.floor - 1
                    }
                    GenDir::TopDown => {
                        report.ceiling -= 1;
                        report.ceiling + 1
                    }
                };
                if column.is_placeholder(y) {
                    column.set_block(y, block);
                    report.written[id] += 1;
                }
            }
        }
    }

    report.exhausted |= report.floor > report.ceiling;
    report
}
