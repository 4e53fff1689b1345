//! workshop: headless run of the elf workshop.
//!
//! Loads item and station content (the bundled CSVs under `data/`, or the
//! two paths given on the command line), requests a handful of toys, and
//! steps the simulation until every request has been launched or the tick
//! budget runs out.  Stands in for the UI by starting a build on any free
//! toy station whenever an item becomes buildable.
//!
//! ```text
//! RUST_LOG=info cargo run -p workshop
//! RUST_LOG=ws_craft=debug cargo run -p workshop -- items.csv stations.csv
//! ```

use std::io::Cursor;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use tracing::info;
use tracing_subscriber::EnvFilter;

use ws_agents::{ElfConfig, SnowmanConfig};
use ws_core::{SimConfig, Tick};
use ws_craft::{
    ItemCatalog, Station, StationKind, Workshop, WorkshopEvent, load_items_csv, load_items_reader,
    load_stations_csv, load_stations_reader,
};
use ws_sim::{Sim, SimBuilder, SimEvent, SimObserver};

// ── Constants ─────────────────────────────────────────────────────────────────

const ELF_COUNT:     usize = 8;
const SNOWMAN_COUNT: usize = 3;
const SEED:          u64   = 42;
const SIM_MINUTES:   u64   = 10;
const REQUESTED:     &[&str] = &["train", "robot", "train"];

const ITEMS_CSV:    &str = include_str!("../data/items.csv");
const STATIONS_CSV: &str = include_str!("../data/stations.csv");

// ── Observer ──────────────────────────────────────────────────────────────────

#[derive(Default)]
struct Scoreboard {
    launched: Vec<(Tick, String)>,
    built:    usize,
    throws:   usize,
    names:    Vec<String>,
}

impl SimObserver for Scoreboard {
    fn on_event(&mut self, tick: Tick, event: &SimEvent) {
        match event {
            SimEvent::Workshop(WorkshopEvent::ItemLaunched { item, .. }) => {
                let name = self.names.get(item.index()).cloned().unwrap_or_default();
                info!(%tick, item = %name, "launched");
                self.launched.push((tick, name));
            }
            SimEvent::Workshop(WorkshopEvent::ItemBuilt { .. }) => self.built += 1,
            SimEvent::Agent(ws_agents::AgentEvent::SnowballThrown { .. }) => self.throws += 1,
            _ => {}
        }
    }
}

// ── Content ───────────────────────────────────────────────────────────────────

fn load_content() -> Result<(ItemCatalog, Vec<Station>)> {
    let args: Vec<PathBuf> = std::env::args_os().skip(1).map(PathBuf::from).collect();
    match args.as_slice() {
        [] => {
            let catalog = load_items_reader(Cursor::new(ITEMS_CSV))?;
            let stations = load_stations_reader(Cursor::new(STATIONS_CSV), &catalog)?;
            Ok((catalog, stations))
        }
        [items, stations] => {
            let catalog = load_items_csv(items).with_context(|| format!("loading {}", items.display()))?;
            let stations = load_stations_csv(stations, &catalog)
                .with_context(|| format!("loading {}", stations.display()))?;
            Ok((catalog, stations))
        }
        _ => bail!("usage: workshop [ITEMS_CSV STATIONS_CSV]"),
    }
}

/// Start every buildable item on the first toy station that accepts it.
fn plan_builds(sim: &mut Sim) {
    let toys: Vec<_> = sim
        .workshop
        .stations
        .iter()
        .filter(|s| matches!(s.kind, StationKind::Toy(_)))
        .map(|s| s.id)
        .collect();
    // Most complex items sit last in the catalog; start them first.
    for item in sim.buildable_items().into_iter().rev() {
        for &station in &toys {
            if sim.begin_building_item(item, station) {
                break;
            }
        }
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let (catalog, stations) = load_content()?;
    let requested = REQUESTED
        .iter()
        .map(|name| catalog.find(name).with_context(|| format!("unknown requested item {name:?}")))
        .collect::<Result<Vec<_>>>()?;

    println!("=== workshop ===");
    println!("Elves: {ELF_COUNT}  |  Snowmen: {SNOWMAN_COUNT}  |  Seed: {SEED}");
    println!("Items: {}  |  Stations: {}  |  Requested: {}", catalog.len(), stations.len(), REQUESTED.join(", "));
    println!();

    let mut scoreboard = Scoreboard {
        names: catalog.iter().map(|(_, t)| t.name.clone()).collect(),
        ..Scoreboard::default()
    };

    let config = SimConfig {
        seed:        SEED,
        total_ticks: SIM_MINUTES * 60 * 60,
        ..SimConfig::default()
    };
    let workshop = Workshop::new(catalog, stations, requested)?;
    let mut sim = SimBuilder::new(config, workshop)
        .elves(ELF_COUNT, ElfConfig::default())
        .snowmen(SNOWMAN_COUNT, SnowmanConfig::default())
        .build()?;

    let t0 = Instant::now();
    while sim.clock.current_tick < sim.config.end_tick() && scoreboard.launched.len() < REQUESTED.len() {
        plan_builds(&mut sim);
        sim.step(sim.config.fixed_delta_secs, &mut scoreboard)?;
    }
    let wall = t0.elapsed();

    println!("Simulated {} ({:.1} s) in {:.2?}", sim.clock.current_tick, sim.now(), wall);
    println!("Built: {}  |  Snowballs: {}  |  Piles on the ground: {}", scoreboard.built, scoreboard.throws, sim.obstacles.len());
    for (tick, name) in &scoreboard.launched {
        println!("  {tick}  launched {name}");
    }
    if scoreboard.launched.len() < REQUESTED.len() {
        println!("{} of {} requests still outstanding", REQUESTED.len() - scoreboard.launched.len(), REQUESTED.len());
    }
    Ok(())
}
