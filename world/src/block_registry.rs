use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use strata_engine::{BlockId, RockStrataConfig};
use tracing::{debug, info};

use crate::config::WorldError;

pub const AIR: BlockId = BlockId(0);
pub const STONE: BlockId = BlockId(1);
pub const BEDROCK: BlockId = BlockId(2);
pub const DIRT: BlockId = BlockId(3);
pub const GRASS: BlockId = BlockId(4);
pub const ORE: BlockId = BlockId(5);

const BASE_BLOCKS: [(&str, bool); 6] = [
    ("air", false),
    ("stone", true),
    ("bedrock", true),
    ("dirt", true),
    ("grass", true),
    ("ore", true),
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockDefinition {
    pub id: String,
    pub solid: bool,
}

#[derive(Debug, Clone)]
pub struct BlockRegistry {
    pub definitions: Vec<BlockDefinition>,
    pub id_to_blockid: HashMap<String, BlockId>,
}

impl Default for BlockRegistry {
    fn default() -> Self {
        let mut registry = Self { definitions: Vec::new(), id_to_blockid: HashMap::new() };
        for (code, solid) in BASE_BLOCKS {
            registry.register(code, solid);
        }
        registry
    }
}

impl BlockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Base blocks plus one block per distinct stratum `block_code`.
    pub fn with_strata(strata: &RockStrataConfig) -> Self {
        let mut registry = Self::new();
        for stratum in &strata.variants {
            registry.register(&stratum.block_code, true);
        }
        info!("Registered {} blocks ({} rock strata)", registry.definitions.len(), strata.variants.len());
        registry
    }

    /// Returns the existing id if `code` is already registered.
    pub fn register(&mut self, code: &str, solid: bool) -> BlockId {
        if let Some(id) = self.id_to_blockid.get(code) {
            return *id;
        }
        let id = BlockId(self.definitions.len() as u16);
        self.definitions.push(BlockDefinition { id: code.to_string(), solid });
        self.id_to_blockid.insert(code.to_string(), id);
        debug!("Registered block: {} -> {}", code, id.0);
        id
    }

    pub fn get_block_id(&self, code: &str) -> Option<BlockId> {
        self.id_to_blockid.get(code).copied()
    }

    pub fn get_definition(&self, id: BlockId) -> Option<&BlockDefinition> {
        self.definitions.get(id.0 as usize)
    }

    pub fn code(&self, id: BlockId) -> &str {
        self.get_definition(id).map(|d| d.id.as_str()).unwrap_or("unknown")
    }

    /// Block id for every stratum, in configuration order.
    pub fn strata_blocks(&self, strata: &RockStrataConfig) -> Result<Vec<BlockId>, WorldError> {
        strata
            .variants
            .iter()
            .map(|s| self.get_block_id(&s.block_code).ok_or_else(|| WorldError::UnknownBlock(s.block_code.clone())))
            .collect()
    }
}
