// Saunsei Identity - deterministic avatar and image mapping
// Copyright (c) 2026 Saunsei contributors
// Licensed under MIT License

use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;

use saunsei_identity::roster::{self, Roster, SpreadReport};
use saunsei_identity::{AssetPool, IdentityMapper, MapperSettings, NameTables};

#[derive(Parser)]
#[command(author, version, about = "Stable avatar seeds and sauna images from names", long_about = None)]
struct Cli {
    /// Settings file (defaults to ./identity_settings.json when present)
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Classify names and print their avatar seeds and URLs
    Avatar {
        #[arg(required = true)]
        names: Vec<String>,
        #[arg(long)]
        size: Option<u32>,
    },
    /// Pick the local image for location names
    Image {
        #[arg(required = true)]
        keys: Vec<String>,
        /// Use this slot (modulo the pool size) instead of the key hash
        #[arg(long)]
        index: Option<usize>,
    },
    /// Generate a demo user roster
    Roster {
        #[arg(long, default_value_t = 10)]
        count: usize,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        #[arg(long)]
        size: Option<u32>,
    },
    /// Histogram of image indices over a demo corpus
    Spread {
        #[arg(long, default_value_t = 5)]
        pool: usize,
        #[arg(long, default_value_t = 200)]
        count: usize,
        #[arg(long, default_value_t = 0)]
        seed: u64,
    },
    /// Dump the active name tables as JSON
    Tables {
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn load_settings(path: Option<&Path>) -> Result<MapperSettings> {
    match path {
        Some(path) => MapperSettings::load_from_disk(path),
        None => MapperSettings::load_or_default(&MapperSettings::default_path()),
    }
}

fn load_tables(settings: &MapperSettings) -> Result<Option<NameTables>> {
    settings
        .tables_path
        .as_deref()
        .map(NameTables::load_from_disk)
        .transpose()
}

fn print_json(value: &impl serde::Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    let settings = load_settings(cli.settings.as_deref())?;
    let custom_tables = load_tables(&settings)?;
    let mapper = match &custom_tables {
        Some(tables) => IdentityMapper::new(tables),
        None => IdentityMapper::builtin(),
    };
    log::debug!("Using name tables v{}", mapper.version());

    match cli.cmd {
        Cmd::Avatar { names, size } => {
            let size = settings.clamp_size(size);
            for name in names {
                print_json(&roster::entry_for(&mapper, &settings, name, size))?;
            }
        }
        Cmd::Image { keys, index } => {
            let pool = AssetPool::from_settings(&settings)?;
            for key in keys {
                let slot = pool.resolve_index(&key, index);
                print_json(&json!({
                    "key": key,
                    "index": slot,
                    "path": pool.pick_or_at(&key, index).display().to_string(),
                }))?;
            }
        }
        Cmd::Roster { count, seed, size } => {
            let size = settings.clamp_size(size);
            let roster = Roster::generate(&mapper, &settings, count, seed, size);
            log::info!("Generated {} demo users (seed {})", roster.entries.len(), seed);
            print_json(&roster)?;
        }
        Cmd::Spread { pool, count, seed } => {
            let pool = NonZeroUsize::new(pool).context("--pool must be at least 1")?;
            // demo_names warns when `count` exceeds the name capacity.
            let names = roster::demo_names(count, seed);
            let report = SpreadReport::from_counts(roster::spread(&names, pool));
            if !report.all_buckets_used() {
                log::warn!("Some image slots received no names: {:?}", report.counts);
            }
            print_json(&report)?;
        }
        Cmd::Tables { out } => {
            let tables = mapper.tables();
            match out {
                Some(path) => {
                    tables.save_to_disk(&path)?;
                    println!("Saved name tables v{} to {}", tables.version, path.display());
                }
                None => print_json(tables)?,
            }
        }
    }
    Ok(())
}

fn main() {
    use env_logger::Env;
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    if let Err(err) = run(Cli::parse()) {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}
