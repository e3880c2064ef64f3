use crate::types::{Points, ShiftIdx};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Names of the four record files inside the data directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputFiles {
    pub institutions: String,
    pub shifts: String,
    pub priorities: String,
    pub questionnaire: String,
}

impl Default for InputFiles {
    fn default() -> Self {
        Self {
            institutions:  "Inst.csv".into(),
            shifts:        "Shift.csv".into(),
            priorities:    "Pri.csv".into(),
            questionnaire: "Ind.csv".into(),
        }
    }
}

/// Tunables of one allocation period.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Positive-point shifts the calendar must contain. A mismatch aborts.
    pub expected_shift_count: usize,
    pub master_seed: u64,
    /// Seeds tried by a scan.
    pub scan_seeds: usize,
    /// Scan progress is logged every this many seeds.
    pub progress_interval: usize,
    /// Institution deficit at which every member is cautioned.
    /// An earlier revision used 1; see DESIGN.md.
    pub caution_margin: Points,
    /// Cautioned members may not take shifts worth more than this in LoP-1.
    pub caution_point_threshold: Points,
    pub virgin_bonus: f64,
    /// Added on top of the virgin bonus for people shut out last period.
    pub extra_virgin_bonus: f64,
    /// Bonus increment for every qualified requester who lost a shift.
    pub consolation_bonus: f64,
    /// Shifts resolved ahead of the fewest-requesters heuristic, in order.
    pub directed_shifts: Vec<ShiftIdx>,
    pub deficiency_reports: bool,
    pub files: InputFiles,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            expected_shift_count:    90,
            master_seed:             271_828_183,
            scan_seeds:              1_000_000,
            progress_interval:       10_000,
            caution_margin:          10,
            caution_point_threshold: 10,
            virgin_bonus:            0.3,
            extra_virgin_bonus:      0.5,
            consolation_bonus:       0.1,
            directed_shifts:         Vec::new(),
            deficiency_reports:      false,
            files:                   InputFiles::default(),
        }
    }
}

impl EngineConfig {
    pub const FILE_NAME: &'static str = "engine.json";

    /// Load `engine.json` from the data directory.
    /// Falls back to defaults when the file is absent.
    pub fn load(data_dir: &str) -> anyhow::Result<Self> {
        let path = Path::new(data_dir).join(Self::FILE_NAME);
        if !path.exists() {
            log::debug!("{} not found, using default engine config", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("Cannot read {}: {e}", path.display()))?;
        let config: EngineConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Config for small hand-built calendars in tests.
    pub fn default_test(expected_shift_count: usize) -> Self {
        Self {
            expected_shift_count,
            scan_seeds: 10,
            progress_interval: 0,
            ..Self::default()
        }
    }
}
