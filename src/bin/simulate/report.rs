// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Project Valuation Simulation Suite - Runner Report Types

use serde::Serialize;

use valuation_engine::records::{ConfigRow, IterationRow, RandomDrawRow, SummaryRow};
use valuation_engine::{ConfidenceBands, FrequencyBin, IrrSummary, ValidationReport};

// ─── Per-Scenario Output ────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ScenarioReport {
    pub config: ConfigRow,
    pub summary: SummaryRow,
    pub irr: IrrSummary,
    pub bands: ConfidenceBands,
    pub histogram: Vec<FrequencyBin>,
    /// Present only with `--dump-iterations`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iterations: Option<Vec<IterationRow>>,
    pub elapsed_ms: u64,
}

// ─── Top-Level Report ───────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct RunReport {
    pub timestamp: String,
    pub version: &'static str,
    pub prng: &'static str,
    pub iterations: usize,
    pub seed: u64,
    pub scenarios: Vec<ScenarioReport>,
    pub validation: ValidationSection,
}

#[derive(Debug, Serialize)]
pub struct ValidationSection {
    pub all_accepted: bool,
    pub report: ValidationReport,
    pub draws: Vec<RandomDrawRow>,
}

pub fn verdict(accepted: bool) -> &'static str {
    if accepted {
        "ACCEPT"
    } else {
        "REJECT"
    }
}
