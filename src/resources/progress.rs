//! Stage completion record.
//!
//! The record is a JSON array with one integer per stage (see
//! [`ClearQuality`](crate::resources::stage::ClearQuality) for the values).
//! It is read entirely when the stage menu initialises and rewritten entirely
//! whenever a stage result improves.
//!
//! Loading never fails: a missing or unreadable record yields zeros. Saving
//! writes a sibling `.tmp` file first and renames it over the record, so a
//! failed write leaves the previous record intact.

use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use bevy_ecs::prelude::{Mut, Resource, World};
use log::{info, warn};

use crate::resources::gameconfig::GameConfig;
use crate::resources::mapstore::MapStore;

/// Errors raised while saving the record.
#[derive(Debug)]
pub enum ProgressError {
    Io(std::io::Error),
    Encode(serde_json::Error),
}

impl fmt::Display for ProgressError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgressError::Io(e) => write!(f, "progress I/O error: {e}"),
            ProgressError::Encode(e) => write!(f, "progress encoding error: {e}"),
        }
    }
}

impl std::error::Error for ProgressError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProgressError::Io(e) => Some(e),
            ProgressError::Encode(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for ProgressError {
    fn from(e: std::io::Error) -> Self {
        ProgressError::Io(e)
    }
}

impl From<serde_json::Error> for ProgressError {
    fn from(e: serde_json::Error) -> Self {
        ProgressError::Encode(e)
    }
}

/// Read the record at `path`, resized to `stage_count` entries.
pub fn load(path: &Path, stage_count: usize) -> Vec<i32> {
    let mut record = match fs::read_to_string(path) {
        Ok(text) => match serde_json::from_str::<Vec<i32>>(&text) {
            Ok(values) => values,
            Err(e) => {
                warn!("Progress record {:?} is corrupt, starting fresh: {}", path, e);
                Vec::new()
            }
        },
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
        Err(e) => {
            warn!("Progress record {:?} is unreadable, starting fresh: {}", path, e);
            Vec::new()
        }
    };
    record.resize(stage_count, 0);
    record
}

/// Replace the record at `path` with `record`.
pub fn save(path: &Path, record: &[i32]) -> Result<(), ProgressError> {
    let encoded = serde_json::to_vec(record)?;
    let tmp = tmp_path(path);
    {
        let mut file = fs::File::create(&tmp)?;
        file.write_all(&encoded)?;
        file.sync_all()?;
    }
    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(e.into());
    }
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Completion record of every stage, kept in sync with its file.
#[derive(Resource, Debug, Clone)]
pub struct ProgressStore {
    path: PathBuf,
    completion: Vec<i32>,
}

impl ProgressStore {
    /// Load the record for `stage_count` stages from `path`.
    pub fn load(path: impl Into<PathBuf>, stage_count: usize) -> Self {
        let path = path.into();
        let completion = load(&path, stage_count);
        info!("Progress loaded from {:?}: {:?}", path, completion);
        ProgressStore { path, completion }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn completion(&self) -> &[i32] {
        &self.completion
    }

    /// Metric recorded for stage `stage` (1-based); `0` when unknown.
    pub fn get(&self, stage: usize) -> i32 {
        stage
            .checked_sub(1)
            .and_then(|i| self.completion.get(i))
            .copied()
            .unwrap_or(0)
    }

    /// Raise the metric of `stage` to `metric`. Returns `true` when the
    /// record changed; lower or equal values are ignored.
    pub fn improve(&mut self, stage: usize, metric: i32) -> bool {
        let Some(slot) = stage.checked_sub(1).and_then(|i| self.completion.get_mut(i)) else {
            warn!("Ignoring result for unknown stage {}", stage);
            return false;
        };
        if metric <= *slot {
            return false;
        }
        *slot = metric;
        true
    }

    /// Zero every entry.
    pub fn clear(&mut self) {
        self.completion.iter_mut().for_each(|v| *v = 0);
    }

    pub fn save(&self) -> Result<(), ProgressError> {
        save(&self.path, &self.completion)?;
        info!("Progress saved to {:?}", self.path);
        Ok(())
    }

    /// Raise the metric and persist it when it improved. Save failures are
    /// logged; the improvement stays in memory and is written with the next
    /// successful save.
    pub fn record(&mut self, stage: usize, metric: i32) -> bool {
        if !self.improve(stage, metric) {
            return false;
        }
        if let Err(e) = self.save() {
            log::error!("Failed to save progress: {}", e);
        }
        true
    }
}

/// The [`ProgressStore`] resource, loaded from the configured save path on
/// first use.
pub fn progress_mut(world: &mut World) -> Mut<'_, ProgressStore> {
    if !world.contains_resource::<ProgressStore>() {
        let path = world
            .get_resource::<GameConfig>()
            .map(|c| c.save_path.clone())
            .unwrap_or_else(|| GameConfig::new().save_path);
        let count = world.get_resource::<MapStore>().map_or(0, |m| m.len());
        world.insert_resource(ProgressStore::load(path, count));
    }
    world.resource_mut::<ProgressStore>()
}
