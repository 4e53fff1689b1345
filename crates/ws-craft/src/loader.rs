//! CSV content loader for items and stations.
//!
//! # Items
//!
//! ```csv
//! name,craftable,ingredients
//! wood,false,
//! paint,false,
//! block,true,wood;paint
//! train,true,block;block;wood
//! ```
//!
//! `ingredients` is a `;`-separated list of item names; repeat a name for
//! more than one unit.  Items may reference items defined later in the
//! file.  Cyclic recipes are rejected.
//!
//! # Stations
//!
//! ```csv
//! kind,x,z,radius_item,radius_use,use_dx,use_dz,output
//! resource,-8,4,1.2,1.2,0,0,wood
//! toy,0,0,1.5,1,0,-1.5,
//! finish,8,0,1.5,1.5,0,0,
//! ```
//!
//! | Column        | Meaning                                                 |
//! |---------------|---------------------------------------------------------|
//! | `kind`        | `resource`, `toy`, `finish` or `conveyor`               |
//! | `x`, `z`      | station position (also the item circle center)          |
//! | `radius_item` | item circle radius                                      |
//! | `radius_use`  | use circle radius                                       |
//! | `use_dx/dz`   | use circle center offset from the station position      |
//! | `output`      | item name, required for `resource`, ignored otherwise   |
//!
//! Stations get ids in file order.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use ws_core::{StationId, Vec3};

use crate::{CraftError, CraftResult, ItemCatalog, Station};

// ── CSV records ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct ItemRecord {
    name:        String,
    craftable:   bool,
    #[serde(default)]
    ingredients: String,
}

#[derive(Deserialize)]
struct StationRecord {
    kind:        String,
    x:           f32,
    z:           f32,
    radius_item: f32,
    radius_use:  f32,
    use_dx:      f32,
    use_dz:      f32,
    #[serde(default)]
    output:      String,
}

// ── Public API ────────────────────────────────────────────────────────────────

pub fn load_items_csv(path: &Path) -> CraftResult<ItemCatalog> {
    let file = std::fs::File::open(path)?;
    load_items_reader(file)
}

/// Like [`load_items_csv`] but accepts any `Read` source.
pub fn load_items_reader<R: Read>(reader: R) -> CraftResult<ItemCatalog> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let records: Vec<ItemRecord> = csv_reader
        .deserialize()
        .collect::<Result<_, _>>()
        .map_err(|e: csv::Error| CraftError::Parse(e.to_string()))?;

    // Register every name first so recipes may point forward.
    let mut catalog = ItemCatalog::new();
    let mut ids = Vec::with_capacity(records.len());
    for r in &records {
        ids.push(catalog.add(r.name.trim(), r.craftable, Vec::new())?);
    }

    for (r, &id) in records.iter().zip(&ids) {
        let ingredients = r
            .ingredients
            .split(';')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|name| catalog.find(name).ok_or_else(|| CraftError::UnknownItem(name.to_owned())))
            .collect::<CraftResult<Vec<_>>>()?;
        catalog.set_ingredients(id, ingredients)?;
    }

    catalog.validate()?;
    Ok(catalog)
}

pub fn load_stations_csv(path: &Path, catalog: &ItemCatalog) -> CraftResult<Vec<Station>> {
    let file = std::fs::File::open(path)?;
    load_stations_reader(file, catalog)
}

/// Like [`load_stations_csv`] but accepts any `Read` source.
pub fn load_stations_reader<R: Read>(reader: R, catalog: &ItemCatalog) -> CraftResult<Vec<Station>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut stations = Vec::new();

    for (i, result) in csv_reader.deserialize::<StationRecord>().enumerate() {
        let r = result.map_err(|e| CraftError::Parse(e.to_string()))?;
        let id = StationId(i as u32);
        let position = Vec3::ground(r.x, r.z);

        let station = match r.kind.trim() {
            "resource" => {
                let name = r.output.trim();
                let output = catalog
                    .find(name)
                    .ok_or_else(|| CraftError::UnknownItem(name.to_owned()))?;
                Station::resource(id, position, output)
            }
            "toy" => Station::toy(id, position),
            "finish" => Station::finish(id, position),
            "conveyor" => Station::conveyor(id, position),
            other => {
                return Err(CraftError::Parse(format!(
                    "invalid station kind {other:?}: expected resource, toy, finish or conveyor"
                )));
            }
        };

        stations.push(
            station
                .with_item_circle(position, r.radius_item)
                .with_use_circle(position + Vec3::ground(r.use_dx, r.use_dz), r.radius_use),
        );
    }

    Ok(stations)
}
