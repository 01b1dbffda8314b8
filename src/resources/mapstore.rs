//! Stage map storage and loading.
//!
//! Maps are JSON files named `1.json`, `2.json`, … inside the maps
//! directory. [`probe_map`] classifies one slot as found, missing or
//! malformed; [`load_maps`] probes the slots in order and stops at the first
//! one that is not found, so a gap or a broken file ends the stage list.
//!
//! # Map Format
//!
//! ```json
//! {
//!   "name": "First steps",
//!   "difficulty": 1,
//!   "move_target": 2,
//!   "width": 4,
//!   "height": 3,
//!   "tiles": [1,1,1,1, 0,0,0,0, 1,1,1,1],
//!   "workers": [
//!     { "x": 0, "y": 1, "color": "red" },
//!     { "x": 3, "y": 1, "color": "red", "cog": true }
//!   ]
//! }
//! ```

use std::path::{Path, PathBuf};

use bevy_ecs::prelude::Resource;
use log::{info, warn};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::components::tilegrid::{Point, TileGrid, TileKind};
use crate::components::worker::{WorkerColor, WorkerSpawn};

/// One worker placement inside a map file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct MapWorker {
    pub x: i32,
    pub y: i32,
    #[serde(default)]
    pub color: WorkerColor,
    #[serde(default)]
    pub sleeping: bool,
    #[serde(default)]
    pub cog: bool,
}

/// A stage map as stored on disk.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct MapFile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub difficulty: u32,
    /// Turn budget for a perfect clear.
    #[serde(default)]
    pub move_target: Option<u32>,
    pub width: i32,
    pub height: i32,
    /// Row-major tile ids; `1` is a wall.
    pub tiles: Vec<u8>,
    #[serde(default)]
    pub workers: Vec<MapWorker>,
}

impl MapFile {
    /// Check the map is internally consistent.
    pub fn validate(&self) -> Result<(), String> {
        if self.width <= 0 || self.height <= 0 {
            return Err(format!("invalid size {}x{}", self.width, self.height));
        }
        let expected = (self.width as usize) * (self.height as usize);
        if self.tiles.len() != expected {
            return Err(format!(
                "expected {} tiles, found {}",
                expected,
                self.tiles.len()
            ));
        }
        let mut placed: FxHashMap<(i32, i32), SmallVec<[&MapWorker; 2]>> = FxHashMap::default();
        for w in &self.workers {
            if w.x < 0 || w.y < 0 || w.x >= self.width || w.y >= self.height {
                return Err(format!("worker at ({}, {}) is outside the map", w.x, w.y));
            }
            let id = self.tiles[(w.y * self.width + w.x) as usize];
            if TileKind::from_id(id) == TileKind::Wall {
                return Err(format!("worker at ({}, {}) is inside a wall", w.x, w.y));
            }
            placed.entry((w.x, w.y)).or_default().push(w);
        }
        for ((x, y), group) in &placed {
            // A shared tile is only a worker resting on its own cog.
            let shared_ok = match group.as_slice() {
                [_] => true,
                [a, b] => a.cog != b.cog && a.color == b.color,
                _ => false,
            };
            if !shared_ok {
                return Err(format!("{} workers overlap at ({x}, {y})", group.len()));
            }
        }
        Ok(())
    }

    pub fn grid(&self) -> TileGrid {
        let cells: Vec<TileKind> = self.tiles.iter().map(|&id| TileKind::from_id(id)).collect();
        TileGrid::from_cells(self.width, self.height, cells)
            .unwrap_or_else(|| TileGrid::open(self.width, self.height))
    }

    pub fn spawns(&self) -> Vec<WorkerSpawn> {
        self.workers
            .iter()
            .map(|w| WorkerSpawn {
                position: Point::new(w.x, w.y),
                color: w.color,
                sleeping: w.sleeping,
                is_cog: w.cog,
            })
            .collect()
    }
}

/// Outcome of probing one map slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapProbe {
    Found(MapFile),
    NotFound,
    Malformed(String),
}

/// Path of map slot `index` inside `dir`.
pub fn map_path(dir: &Path, index: usize) -> PathBuf {
    dir.join(format!("{index}.json"))
}

/// Read and classify one map file.
pub fn probe_map(path: &Path) -> MapProbe {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return MapProbe::NotFound,
        Err(e) => return MapProbe::Malformed(format!("cannot read: {e}")),
    };
    let map: MapFile = match serde_json::from_str(&text) {
        Ok(map) => map,
        Err(e) => return MapProbe::Malformed(format!("invalid JSON: {e}")),
    };
    match map.validate() {
        Ok(()) => MapProbe::Found(map),
        Err(e) => MapProbe::Malformed(e),
    }
}

/// Probe slots `1..=max` in order, stopping at the first slot that is not
/// a valid map.
pub fn load_maps(dir: &Path, max: usize) -> Vec<MapFile> {
    let mut maps = Vec::new();
    for index in 1..=max {
        let path = map_path(dir, index);
        match probe_map(&path) {
            MapProbe::Found(map) => maps.push(map),
            MapProbe::NotFound => break,
            MapProbe::Malformed(reason) => {
                warn!("Stage map {:?} is malformed: {}", path, reason);
                break;
            }
        }
    }
    info!("Loaded {} stage maps from {:?}", maps.len(), dir);
    maps
}

/// Loaded stage maps, indexed by stage number starting at 1.
#[derive(Resource, Debug, Default, Clone)]
pub struct MapStore {
    maps: Vec<MapFile>,
}

impl MapStore {
    pub fn new(maps: Vec<MapFile>) -> Self {
        MapStore { maps }
    }

    pub fn len(&self) -> usize {
        self.maps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.maps.is_empty()
    }

    /// Map of stage `index` (1-based).
    pub fn get(&self, index: usize) -> Option<&MapFile> {
        index.checked_sub(1).and_then(|i| self.maps.get(i))
    }

    pub fn iter(&self) -> impl Iterator<Item = &MapFile> {
        self.maps.iter()
    }
}
