//! Monte-Carlo generation survey
//!
//! Generates many houses from one configuration to see how a grammar
//! behaves in practice: how many rooms it builds, how many of them fit
//! inside the limits, how tall houses get, and how often floors are left
//! unconnected. Runs are independent and spread across cores with rayon;
//! per-run seeds are derived from the base seed with SHA3 so a survey is
//! reproducible.

use std::collections::BTreeMap;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use sha3::{Digest, Sha3_256};
use tracing::{info, warn};

use crate::config::HouseConfig;
use crate::constants::{DEFAULT_SEED, DEFAULT_SURVEY_RUNS};
use crate::finish::GapKind;
use crate::grammar::RoomType;
use crate::house::House;
use crate::logging::TimingSpan;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurveyConfig {
    pub base_seed: u64,
    pub runs: u64,
    /// Template for every run; its own `seed` is replaced per run
    pub house: HouseConfig,
}

impl Default for SurveyConfig {
    fn default() -> Self {
        Self {
            base_seed: DEFAULT_SEED,
            runs: DEFAULT_SURVEY_RUNS,
            house: HouseConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveyReport {
    pub runs: u64,
    /// Runs aborted by a configuration error
    pub failures: u64,
    pub avg_rooms_built: f64,
    pub avg_rooms_placed: f64,
    /// Placed rooms over built rooms, across all successful runs
    pub placement_ratio: f64,
    pub max_stories_used: u32,
    pub total_gaps: u64,
    /// Rooms on another story than their parent with no stairs between them,
    /// mostly lifted rooms that landed beside the parent instead of above it
    pub unconnected_floors: u64,
    pub unplaced_by_type: BTreeMap<RoomType, u64>,
}

/// Seed for run `index` of a survey.
pub fn derive_seed(base_seed: u64, index: u64) -> u64 {
    let mut hasher = Sha3_256::new();
    hasher.update(base_seed.to_le_bytes());
    hasher.update(index.to_le_bytes());
    let result = hasher.finalize();
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&result[0..8]);
    u64::from_le_bytes(bytes)
}

/// Per-run numbers kept after the house itself is dropped.
struct RunStats {
    built: usize,
    placed: usize,
    stories: u32,
    gaps: usize,
    floor_gaps: usize,
    unplaced: Vec<RoomType>,
}

impl RunStats {
    fn of(house: &House) -> Self {
        let unplaced: Vec<RoomType> = house
            .tree
            .ids()
            .filter(|&id| !house.is_placed(id))
            .map(|id| house.tree[id].room_type())
            .collect();
        Self {
            built: house.tree.len(),
            placed: house.tree.len() - unplaced.len(),
            stories: house.stories(),
            gaps: house.gaps.len(),
            floor_gaps: house
                .gaps
                .iter()
                .filter(|gap| gap.kind == GapKind::NoSharedFloor)
                .count(),
            unplaced,
        }
    }
}

/// Run the survey with rayon parallelism.
pub fn run_survey(config: &SurveyConfig) -> SurveyReport {
    let _span = TimingSpan::new("survey");

    let results: Vec<Option<RunStats>> = (0..config.runs)
        .into_par_iter()
        .map(|i| {
            let seed = derive_seed(config.base_seed, i);
            let house_config = config.house.clone().with_seed(seed);
            match House::generate(&house_config) {
                Ok(house) => Some(RunStats::of(&house)),
                Err(err) => {
                    warn!(seed, error = %err, "survey run failed");
                    None
                }
            }
        })
        .collect();

    let report = summarize(&results, config.runs);
    info!(
        runs = report.runs,
        failures = report.failures,
        placement_ratio = report.placement_ratio,
        max_stories = report.max_stories_used,
        unconnected_floors = report.unconnected_floors,
        "survey complete"
    );
    report
}

fn summarize(results: &[Option<RunStats>], runs: u64) -> SurveyReport {
    let ok: Vec<&RunStats> = results.iter().flatten().collect();
    let failures = runs - ok.len() as u64;

    let mut unplaced_by_type = BTreeMap::new();
    for stats in &ok {
        for &room_type in &stats.unplaced {
            *unplaced_by_type.entry(room_type).or_insert(0) += 1;
        }
    }

    let built: usize = ok.iter().map(|s| s.built).sum();
    let placed: usize = ok.iter().map(|s| s.placed).sum();
    let per_run = |total: usize| {
        if ok.is_empty() {
            0.0
        } else {
            total as f64 / ok.len() as f64
        }
    };

    SurveyReport {
        runs,
        failures,
        avg_rooms_built: per_run(built),
        avg_rooms_placed: per_run(placed),
        placement_ratio: if built == 0 {
            0.0
        } else {
            placed as f64 / built as f64
        },
        max_stories_used: ok.iter().map(|s| s.stories).max().unwrap_or(0),
        total_gaps: ok.iter().map(|s| s.gaps as u64).sum(),
        unconnected_floors: ok.iter().map(|s| s.floor_gaps as u64).sum(),
        unplaced_by_type,
    }
}
