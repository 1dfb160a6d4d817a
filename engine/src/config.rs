use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::api::{GenDir, PerGroup, RockGroup, StrataError};

/// World height the province thickness values are authored against.
pub const REFERENCE_WORLD_HEIGHT: f32 = 256.0;

/// Parameters for baking a stratum's thickness map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StratumNoiseParams {
    pub amplitude: f32,
    pub frequency: f64,
    /// Added to the noise before clamping at zero. Negative values make a stratum patchy.
    #[serde(default)]
    pub offset: f32,
}

impl Default for StratumNoiseParams {
    fn default() -> Self {
        Self { amplitude: 40.0, frequency: 0.004, offset: 0.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RockStratum {
    pub code: String,
    pub block_code: String,
    pub rock_group: RockGroup,
    pub gen_dir: GenDir,
    #[serde(default)]
    pub noise: StratumNoiseParams,
}

/// Ordered rock strata. The order within a group is the stacking order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RockStrataConfig {
    pub variants: Vec<RockStratum>,
}

impl RockStrataConfig {
    pub fn validate(&self) -> Result<(), StrataError> {
        if self.variants.is_empty() {
            return Err(StrataError::Validation("no rock strata configured".into()));
        }
        let mut seen = HashSet::new();
        for stratum in &self.variants {
            if !seen.insert(stratum.code.as_str()) {
                return Err(StrataError::Validation(format!("duplicate stratum code '{}'", stratum.code)));
            }
        }
        Ok(())
    }
}

/// Maximum thickness per rock group, in blocks at the reference world height.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GroupThickness {
    pub sedimentary: f32,
    pub metamorphic: f32,
    pub igneous: f32,
    pub volcanic: f32,
}

impl GroupThickness {
    pub fn to_per_group(self) -> PerGroup<f32> {
        PerGroup::from_fn(|g| match g {
            RockGroup::Sedimentary => self.sedimentary,
            RockGroup::Metamorphic => self.metamorphic,
            RockGroup::Igneous => self.igneous,
            RockGroup::Volcanic => self.volcanic,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeologicProvince {
    pub code: String,
    /// Relative frequency when provinces are scattered over the world.
    #[serde(default = "default_weight")]
    pub weight: f32,
    pub max_thickness: GroupThickness,
}

fn default_weight() -> f32 { 1.0 }

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GeologicProvinces {
    pub variants: Vec<GeologicProvince>,
}

impl GeologicProvinces {
    pub fn validate(&self) -> Result<(), StrataError> {
        if self.variants.is_empty() {
            return Err(StrataError::Validation("no geologic provinces configured".into()));
        }
        for p in &self.variants {
            let caps = p.max_thickness.to_per_group();
            if caps.0.iter().any(|c| !c.is_finite() || *c < 0.0) {
                return Err(StrataError::Validation(format!("province '{}' has a negative or non-finite thickness", p.code)));
            }
            if !p.weight.is_finite() || p.weight < 0.0 {
                return Err(StrataError::Validation(format!("province '{}' has an invalid weight", p.code)));
            }
        }
        Ok(())
    }

    /// Per-province group caps scaled to the actual world height.
    pub fn scaled(&self, world_height: i32) -> Vec<PerGroup<f32>> {
        let scale = world_height as f32 / REFERENCE_WORLD_HEIGHT;
        self.variants
            .iter()
            .map(|p| {
                let mut caps = p.max_thickness.to_per_group();
                for c in caps.0.iter_mut() { *c *= scale; }
                caps
            })
            .collect()
    }
}

/// How the distorted coordinate for stratum noise is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SamplingMode {
    /// x is offset by the x distortion, z by the z distortion.
    #[default]
    Corrected,
    /// z is taken from the chunk's x origin and the x distortion. Reproduces
    /// layouts generated by older worlds.
    Legacy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrataSettings {
    pub sea_level: i32,
    pub world_height: i32,
    #[serde(default)]
    pub sampling: SamplingMode,
}

impl Default for StrataSettings {
    fn default() -> Self {
        Self { sea_level: 110, world_height: 256, sampling: SamplingMode::Corrected }
    }
}

/// Parses `content`; `.json` paths are read as JSON, anything else as RON.
pub fn parse_config<T: DeserializeOwned>(content: &str, path: &Path) -> Result<T, StrataError> {
    let is_json = path.extension().map(|e| e == "json").unwrap_or(false);
    if is_json {
        Ok(serde_json::from_str(content)?)
    } else {
        Ok(ron::from_str(content)?)
    }
}

pub fn load_config<T: DeserializeOwned>(path: &Path) -> Result<T, StrataError> {
    let content = fs::read_to_string(path)
        .map_err(|source| StrataError::Io { path: path.to_path_buf(), source })?;
    let value = parse_config(&content, path)?;
    info!("Loaded config {:?}", path);
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_strata_from_json_and_ron() {
        let json = r#"{ "variants": [
            { "code": "shale", "block_code": "rock-shale", "rock_group": "Sedimentary", "gen_dir": "TopDown" }
        ] }"#;
        let cfg: RockStrataConfig = parse_config(json, Path::new("rockstrata.json")).unwrap();
        assert_eq!(cfg.variants[0].rock_group, RockGroup::Sedimentary);
        assert_eq!(cfg.variants[0].noise, StratumNoiseParams::default());

        let ron_src = r#"(variants: [
            (code: "basalt", block_code: "rock-basalt", rock_group: Volcanic, gen_dir: BottomUp,
             noise: (amplitude: 10.0, frequency: 0.01)),
        ])"#;
        let cfg: RockStrataConfig = parse_config(ron_src, Path::new("rockstrata.ron")).unwrap();
        assert_eq!(cfg.variants[0].gen_dir, GenDir::BottomUp);
        assert_eq!(cfg.variants[0].noise.offset, 0.0);
    }

    #[test]
    fn rejects_duplicate_codes() {
        let s = RockStratum {
            code: "granite".into(),
            block_code: "rock-granite".into(),
            rock_group: RockGroup::Igneous,
            gen_dir: GenDir::BottomUp,
            noise: StratumNoiseParams::default(),
        };
        let cfg = RockStrataConfig { variants: vec![s.clone(), s] };
        assert!(matches!(cfg.validate(), Err(StrataError::Validation(_))));
        assert!(RockStrataConfig::default().validate().is_err());
    }

    #[test]
    fn scales_caps_with_world_height() {
        let provinces = GeologicProvinces {
            variants: vec![GeologicProvince {
                code: "shield".into(),
                weight: 1.0,
                max_thickness: GroupThickness { sedimentary: 20.0, metamorphic: 40.0, igneous: 255.0, volcanic: 8.0 },
            }],
        };
        provinces.validate().unwrap();
        let scaled = provinces.scaled(512);
        assert_eq!(scaled[0][RockGroup::Sedimentary], 40.0);
        assert_eq!(scaled[0][RockGroup::Igneous], 510.0);
    }

    #[test]
    fn rejects_negative_caps() {
        let provinces = GeologicProvinces {
            variants: vec![GeologicProvince {
                code: "bad".into(),
                weight: 1.0,
                max_thickness: GroupThickness { sedimentary: -1.0, ..Default::default() },
            }],
        };
        assert!(provinces.validate().is_err());
    }
}
