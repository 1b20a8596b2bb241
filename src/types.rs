// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Project Valuation Simulation Suite - Type Definitions

use serde::{Deserialize, Serialize};

// ─── Distribution ────────────────────────────────────────────────────────────

/// How a single stochastic driver is sampled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Distribution {
    Uniform { low: f64, high: f64 },
    Normal { mean: f64, stddev: f64 },
    Discrete { values: Vec<f64>, probabilities: Vec<f64> },
}

// ─── Driver ──────────────────────────────────────────────────────────────────

/// The four stochastic economic drivers of the project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Driver {
    Demand = 0,
    UnitPrice = 1,
    UnitVariableCost = 2,
    FixedCost = 3,
}

impl Driver {
    pub const ALL: [Driver; 4] = [
        Driver::Demand,
        Driver::UnitPrice,
        Driver::UnitVariableCost,
        Driver::FixedCost,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Demand => "Demand",
            Self::UnitPrice => "Unit price",
            Self::UnitVariableCost => "Unit variable cost",
            Self::FixedCost => "Fixed cost",
        }
    }
}

// ─── Driver Draws ────────────────────────────────────────────────────────────

/// One sampled value per driver, held constant across the horizon of a trial.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DriverDraws {
    pub demand: f64,
    pub unit_price: f64,
    pub unit_variable_cost: f64,
    pub fixed_cost: f64,
}

// ─── Period Breakdown ────────────────────────────────────────────────────────

/// Accounting breakdown of a single period's cash flow.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeriodBreakdown {
    pub revenue: f64,
    pub variable_cost: f64,
    pub pretax_income: f64,
    pub tax: f64,
    pub net_income: f64,
    pub cash_flow: f64,
    /// Salvage actually credited; zero outside the terminal period.
    pub salvage_applied: f64,
}

// ─── IRR ─────────────────────────────────────────────────────────────────────

/// Outcome of the IRR root search.
///
/// `Undefined` is a reportable data point (no sign change, no bracketed
/// root, non-convergence), never a silent zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "rate", rename_all = "snake_case")]
pub enum Irr {
    Converged(f64),
    Undefined,
}

impl Irr {
    pub fn rate(&self) -> Option<f64> {
        match self {
            Self::Converged(r) => Some(*r),
            Self::Undefined => None,
        }
    }

    pub fn is_converged(&self) -> bool {
        matches!(self, Self::Converged(_))
    }
}

// ─── Iteration Record ────────────────────────────────────────────────────────

/// Transient state of one simulated trial.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IterationRecord {
    pub index: usize,
    pub draws: DriverDraws,
    /// One entry per period `1..=horizon`; the last one carries the salvage.
    pub periods: Vec<PeriodBreakdown>,
    pub npv: f64,
    pub irr: Irr,
}

impl IterationRecord {
    pub fn cash_flows(&self) -> Vec<f64> {
        self.periods.iter().map(|p| p.cash_flow).collect()
    }
}

// ─── Summary Statistics ──────────────────────────────────────────────────────

/// Descriptive statistics over a non-empty numeric sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryStatistics {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    /// Population standard deviation.
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub p5: f64,
    pub p25: f64,
    pub p75: f64,
    pub p95: f64,
}

/// IRR aggregates over converged iterations only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IrrSummary {
    pub converged: usize,
    pub undefined: usize,
    pub mean: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationSummary {
    pub npv: SummaryStatistics,
    pub irr: IrrSummary,
}

/// `mean ± σ` and `mean ± 1.96σ` bands around a summary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceBands {
    pub lower_68: f64,
    pub upper_68: f64,
    pub lower_95: f64,
    pub upper_95: f64,
}

/// One bin of an equal-width frequency table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrequencyBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
    pub relative_frequency: f64,
}

// ─── Simulation Result Set ───────────────────────────────────────────────────

/// Output of a full run, owned by the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationResultSet {
    pub iterations: usize,
    pub seed: u64,
    pub npv: Vec<f64>,
    pub irr: Vec<Irr>,
    /// Detailed schedule of iteration 0.
    pub retained: IterationRecord,
    pub summary: SimulationSummary,
    /// Wall-clock duration; `None` where no clock is available (wasm32).
    #[serde(default)]
    pub elapsed_ms: Option<u64>,
}

// ─── Validation ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestKind {
    ChiSquareUniform,
    ChiSquareDiscrete,
    KolmogorovSmirnovNormal,
    /// Degenerate distribution: statistic is the fraction of off-point draws.
    PointMass,
}

impl TestKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::ChiSquareUniform => "Chi-square (uniform)",
            Self::ChiSquareDiscrete => "Chi-square (discrete)",
            Self::KolmogorovSmirnovNormal => "Kolmogorov-Smirnov (normal)",
            Self::PointMass => "Point mass",
        }
    }
}

/// Goodness-of-fit outcome for one driver at 5% significance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub test: TestKind,
    pub statistic: f64,
    pub critical_value: f64,
    /// Chi-square tests only.
    pub degrees_of_freedom: Option<usize>,
    pub sample_size: usize,
    pub accepted: bool,
}
