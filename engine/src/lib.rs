//! Rock strata layering for voxel block columns.
//!
//! Per column: blend province caps, sample stratum noise, split each group's
//! cap among its strata by noise share, then write the strata into the column
//! from both ends.

pub mod aggregate;
pub mod allocate;
pub mod api;
pub mod caps;
pub mod config;
pub mod directory;
pub mod fill;
pub mod pass;

pub use api::{BlockId, ColumnSite, ColumnStore, GenDir, PerGroup, RockGroup, StrataError};
pub use config::{GeologicProvinces, RockStrataConfig, SamplingMode, StrataSettings};
pub use pass::{ColumnInputs, ColumnReport, StrataGenerator};
