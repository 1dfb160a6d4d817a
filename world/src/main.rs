use std::path::PathBuf;

use clap::Parser;
use strata_engine::{ColumnSite, RockGroup};
use strata_world::{ChunkStorage, ColumnPos, WorldConfig, WorldGenerator};
use tracing::{info, Level};

/// Generate a region of chunk columns with layered rock strata.
#[derive(Parser, Debug)]
#[command(name = "strata_world", version)]
struct Args {
    /// World config (RON, or JSON with a .json extension). Uses the built-in config if omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the configured seed.
    #[arg(long)]
    seed: Option<u32>,

    /// Chunk radius around the origin.
    #[arg(long, default_value_t = 1)]
    radius: i32,

    /// Print the vertical profile of the block column at world X Z.
    #[arg(long, num_args = 2, value_names = ["X", "Z"], allow_negative_numbers = true)]
    column: Option<Vec<i32>>,

    /// Log per-column details.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::INFO })
        .init();

    let mut config = match &args.config {
        Some(path) => WorldConfig::load(path)?,
        None => WorldConfig::builtin()?,
    };
    if let Some(seed) = args.seed {
        config.generator.seed = seed;
    }
    info!("Using seed {}", config.generator.seed);

    let generator = WorldGenerator::new(config)?;
    let storage = ChunkStorage::new();
    let stats = generator.generate_region(ColumnPos::new(0, 0), args.radius.max(0), &storage)?;

    let strata = generator.strata();
    let variants = &strata.strata().variants;
    println!("{} chunk columns, {} block columns ({} exhausted)", storage.len(), stats.columns, stats.exhausted);
    for group in RockGroup::GENERATION_ORDER {
        println!("{:?}: {} strata", group, strata.directory().group(group).len());
    }
    for (stratum, written) in variants.iter().zip(&stats.written) {
        println!("  {:<12} {:>9} blocks", stratum.code, written);
    }

    if let Some(coords) = &args.column {
        let site = ColumnSite::from_world(coords[0], coords[1]);
        let pos = ColumnPos::new(site.chunk_x, site.chunk_z);
        if !storage.contains(&pos) {
            let (column, _) = generator.generate_column(pos)?;
            storage.insert(column);
        }
        let registry = generator.registry();
        let profile = storage
            .with_column(&pos, |c| c.profile(site.local_x as u32, site.local_z as u32))
            .unwrap_or_default();
        println!("Column ({}, {}):", coords[0], coords[1]);
        for (top, bottom, block) in profile {
            println!("  {:>4}..={:<4} {}", bottom, top, registry.code(block));
        }
    }

    Ok(())
}
