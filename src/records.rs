// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Project Valuation Simulation Suite - Flat Records
//
// Row shapes for callers that persist or tabulate results. Nothing here
// writes anywhere; rows are plain serde values.

use serde::{Deserialize, Serialize};

use crate::config::ScenarioConfig;
use crate::types::{Driver, SimulationResultSet, SummaryStatistics};
use crate::validation::ValidationReport;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigRow {
    pub label: String,
    pub iterations: usize,
    pub seed: u64,
    pub tax_rate: f64,
    pub discount_rate: f64,
    pub horizon: u32,
    pub depreciation: f64,
    pub salvage_value: f64,
    pub initial_investment: f64,
}

impl ConfigRow {
    pub fn new(label: &str, config: &ScenarioConfig, iterations: usize, seed: u64) -> Self {
        Self {
            label: label.to_string(),
            iterations,
            seed,
            tax_rate: config.tax_rate,
            discount_rate: config.discount_rate,
            horizon: config.horizon,
            depreciation: config.depreciation,
            salvage_value: config.salvage_value,
            initial_investment: config.initial_investment,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRow {
    pub label: String,
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub p5: f64,
    pub p95: f64,
    pub irr_mean: Option<f64>,
    pub irr_undefined: usize,
}

impl SummaryRow {
    pub fn from_result(label: &str, result: &SimulationResultSet) -> Self {
        let SummaryStatistics { count, mean, median, std_dev, min, max, p5, p95, .. } = result.summary.npv;
        Self {
            label: label.to_string(),
            count,
            mean,
            median,
            std_dev,
            min,
            max,
            p5,
            p95,
            irr_mean: result.summary.irr.mean,
            irr_undefined: result.summary.irr.undefined,
        }
    }
}

/// NPV and IRR of one iteration; `irr` is `None` when undefined.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IterationRow {
    pub index: usize,
    pub npv: f64,
    pub irr: Option<f64>,
}

pub fn iteration_rows(result: &SimulationResultSet) -> Vec<IterationRow> {
    result
        .npv
        .iter()
        .zip(&result.irr)
        .enumerate()
        .map(|(index, (npv, irr))| IterationRow { index, npv: *npv, irr: irr.rate() })
        .collect()
}

/// The `index`-th validation draw of every driver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RandomDrawRow {
    pub index: usize,
    pub demand: f64,
    pub unit_price: f64,
    pub unit_variable_cost: f64,
    pub fixed_cost: f64,
}

/// One row per draw index, truncated to the shortest driver sample.
pub fn random_draw_rows(report: &ValidationReport) -> Vec<RandomDrawRow> {
    let column = |driver: Driver| report.samples.get(&driver).map(Vec::as_slice).unwrap_or(&[]);
    let (demand, price, cost, fixed) = (
        column(Driver::Demand),
        column(Driver::UnitPrice),
        column(Driver::UnitVariableCost),
        column(Driver::FixedCost),
    );
    let len = demand.len().min(price.len()).min(cost.len()).min(fixed.len());
    (0..len)
        .map(|i| RandomDrawRow {
            index: i,
            demand: demand[i],
            unit_price: price[i],
            unit_variable_cost: cost[i],
            fixed_cost: fixed[i],
        })
        .collect()
}
