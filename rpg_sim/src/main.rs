//! rpg_sim - Headless encounter driver for rpg_core
//!
//! Builds a world, spawns enemies, lets a scripted pilot fight them and
//! prints a summary plus the final player snapshot as JSON.

mod simulation;

use anyhow::{Context, Result};
use clap::Parser;
use rpg_core::{Catalog, Position, World};
use serde::Serialize;
use simulation::{run_encounter, EncounterSummary, Pilot};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Run a scripted encounter against the simulation core
#[derive(Parser)]
#[command(name = "rpg_sim")]
#[command(about = "Headless encounter driver for rpg_core", long_about = None)]
#[command(version)]
struct Cli {
    /// Player class id
    #[arg(long, default_value = "warrior")]
    class: String,

    /// Enemy template to spawn
    #[arg(long, default_value = "slime")]
    enemy: String,

    /// How many enemies to spawn
    #[arg(long, default_value_t = 5)]
    count: u32,

    /// Quest to accept before the fight
    #[arg(long)]
    quest: Option<String>,

    /// Number of ticks to simulate
    #[arg(long, default_value_t = 3000)]
    ticks: u32,

    /// Tick length in milliseconds
    #[arg(long, default_value_t = 16)]
    tick_ms: u64,

    /// RNG seed
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Load catalog TOML files from this directory instead of the built-in set
    #[arg(long)]
    catalog_dir: Option<PathBuf>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

#[derive(Serialize)]
struct Output<'a> {
    summary: &'a EncounterSummary,
    player: rpg_core::PlayerSnapshot,
}

fn main() -> Result<()> {
    setup_logging();
    let cli = Cli::parse();

    let catalog = match &cli.catalog_dir {
        Some(dir) => Catalog::load_dir(dir).with_context(|| format!("loading catalog from {}", dir.display()))?,
        None => Catalog::load_default().context("loading built-in catalog")?,
    };
    let catalog = Arc::new(catalog);

    let mut world = World::with_seed(Arc::clone(&catalog), &cli.class, cli.seed)
        .with_context(|| format!("creating a {} player", cli.class))?;

    let width = catalog.constants().world.map_width;
    for i in 0..cli.count {
        let x = width * (i + 1) as f64 / (cli.count + 1) as f64;
        world
            .spawn_enemy(&cli.enemy, Position::new(x, 0.0))
            .with_context(|| format!("spawning {}", cli.enemy))?;
    }
    if let Some(quest) = &cli.quest {
        world
            .accept_quest(quest)
            .with_context(|| format!("accepting quest {quest}"))?;
    }

    info!(class = %cli.class, enemy = %cli.enemy, count = cli.count, ticks = cli.ticks, "starting encounter");
    let summary = run_encounter(&mut world, &mut Pilot::new(), cli.ticks, cli.tick_ms);
    info!(kills = summary.kills, level = world.player().level, "encounter finished");

    let output = Output {
        summary: &summary,
        player: world.snapshot(),
    };
    let json = if cli.pretty {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    };
    println!("{json}");
    Ok(())
}

/// Log to stderr; `RUST_LOG` overrides the default `info` level
fn setup_logging() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
