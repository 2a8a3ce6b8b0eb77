use crate::colony::ColonyState;
use crate::field::SpatialField;
use serde::{Deserialize, Serialize};

/// Per-tick sample of colony and field counters.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StepMetrics {
    pub step: usize,
    pub nectar: u64,
    pub honey: u64,
    pub eggs_laid: u64,
    pub bee_count: usize,
    pub worker_count: usize,
    pub drone_count: usize,
    pub larva_count: usize,
    pub flower_cells: usize,
    pub known_flower_count: usize,
    pub queen_alive: bool,
    pub split_events: u64,
}

/// Read-only view of the foraging queen for the rendering layer.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QueenSnapshot {
    pub x: f64,
    pub y: f64,
    pub state: String,
    pub nectar_collected: u32,
    pub nectar_needed: u32,
    pub eggs_laid: u64,
    pub age: u64,
    pub return_path: Vec<(usize, usize)>,
}

/// Read-only per-frame view of the colony. The rendering layer reads
/// this (plus the field's grid accessors) and never mutates simulation
/// state.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ColonySnapshot {
    pub age: u64,
    pub hive_location: (usize, usize),
    pub nectar: u64,
    pub honey: u64,
    pub eggs_laid: u64,
    pub bee_count: usize,
    pub split_events: u64,
    pub queen: Option<QueenSnapshot>,
}

fn default_schema_version() -> u32 {
    1
}

/// Serialized result of a headless run.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunSummary {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub steps: usize,
    pub sample_every: usize,
    pub samples: Vec<StepMetrics>,
    pub final_snapshot: ColonySnapshot,
}

pub fn collect_step_metrics(
    step: usize,
    colony: &ColonyState,
    field: &SpatialField,
) -> StepMetrics {
    StepMetrics {
        step,
        nectar: colony.nectar(),
        honey: colony.honey(),
        eggs_laid: colony.eggs_laid(),
        bee_count: colony.roster_len(),
        worker_count: colony.worker_count(),
        drone_count: colony.drone_count(),
        larva_count: colony.larva_count(),
        flower_cells: field.flower_cell_count(),
        known_flower_count: colony.known_flowers().len(),
        queen_alive: colony.queen().is_some(),
        split_events: colony.split_events(),
    }
}

pub fn snapshot_colony(colony: &ColonyState) -> ColonySnapshot {
    ColonySnapshot {
        age: colony.age(),
        hive_location: colony.hive_location(),
        nectar: colony.nectar(),
        honey: colony.honey(),
        eggs_laid: colony.eggs_laid(),
        bee_count: colony.roster_len(),
        split_events: colony.split_events(),
        queen: colony.queen().map(|q| QueenSnapshot {
            x: q.position()[0],
            y: q.position()[1],
            state: q.state().name().to_string(),
            nectar_collected: q.nectar_collected(),
            nectar_needed: q.nectar_needed(),
            eggs_laid: q.eggs_laid(),
            age: q.age(),
            return_path: q.return_path().to_vec(),
        }),
    }
}
