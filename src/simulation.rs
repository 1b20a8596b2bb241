// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Project Valuation Simulation Suite - Simulation Core

use std::time::Instant;

use rand::Rng;
use rayon::prelude::*;
use tracing::{info, warn};

use crate::cash_flow::{build_schedule, AccountingParams};
use crate::config::ScenarioConfig;
use crate::error::SimulationError;
use crate::generators::{sample_drivers, stream_rng};
use crate::statistics::summarize_simulation;
use crate::types::*;
use crate::valuation::{internal_rate_of_return, net_present_value};

// ─── ProjectSimulation ───────────────────────────────────────────────────────

/// Monte Carlo driver over one validated scenario.
///
/// Iterations share nothing but the read-only configuration. Iteration `i`
/// draws from ChaCha stream `i` of the run seed, so a run is reproducible
/// regardless of how rayon schedules the work.
#[derive(Debug, Clone)]
pub struct ProjectSimulation {
    config: ScenarioConfig,
    accounting: AccountingParams,
}

impl ProjectSimulation {
    pub fn new(config: ScenarioConfig) -> Result<Self, SimulationError> {
        config.validate()?;
        let accounting = AccountingParams::from(&config);
        Ok(Self { config, accounting })
    }

    pub fn config(&self) -> &ScenarioConfig {
        &self.config
    }

    /// One trial: sample drivers, build the schedule, value it.
    pub fn run_iteration<R: Rng + ?Sized>(
        &self,
        index: usize,
        rng: &mut R,
    ) -> Result<IterationRecord, SimulationError> {
        let draws = sample_drivers(rng, &self.config)?;
        let periods = build_schedule(&draws, &self.accounting, self.config.horizon);
        let cash_flows: Vec<f64> = periods.iter().map(|p| p.cash_flow).collect();

        let npv = net_present_value(self.config.initial_investment, self.config.discount_rate, &cash_flows)?;

        let mut flows = Vec::with_capacity(cash_flows.len() + 1);
        flows.push(self.config.initial_investment);
        flows.extend_from_slice(&cash_flows);
        let irr = internal_rate_of_return(&flows);

        Ok(IterationRecord { index, draws, periods, npv, irr })
    }

    /// Run `iterations` independent trials and summarize them.
    pub fn run(&self, iterations: usize, seed: u64) -> Result<SimulationResultSet, SimulationError> {
        if iterations == 0 {
            return Err(SimulationError::NoIterations);
        }
        info!(iterations, seed, horizon = self.config.horizon, "running simulation");
        let started = start_clock();

        // Only iteration 0 keeps its full record; the rest fold down to NPV/IRR.
        let outcomes: Vec<(f64, Irr, Option<IterationRecord>)> = (0..iterations)
            .into_par_iter()
            .map(|index| -> Result<_, SimulationError> {
                let mut rng = stream_rng(seed, index as u64);
                let record = self.run_iteration(index, &mut rng)?;
                let (npv, irr) = (record.npv, record.irr);
                Ok((npv, irr, (index == 0).then_some(record)))
            })
            .collect::<Result<_, SimulationError>>()?;

        let mut npv = Vec::with_capacity(iterations);
        let mut irr = Vec::with_capacity(iterations);
        let mut retained = None;
        for (value, rate, record) in outcomes {
            npv.push(value);
            irr.push(rate);
            if record.is_some() {
                retained = record;
            }
        }
        let retained = retained.ok_or(SimulationError::NoIterations)?;
        let summary = summarize_simulation(&npv, &irr)?;

        if summary.irr.undefined > 0 {
            warn!(
                undefined = summary.irr.undefined,
                iterations, "IRR undefined in some iterations; excluded from IRR statistics"
            );
        }
        let elapsed_ms = elapsed_since(started);
        info!(
            iterations,
            mean_npv = summary.npv.mean,
            std_dev = summary.npv.std_dev,
            elapsed_ms = ?elapsed_ms,
            "simulation complete"
        );

        Ok(SimulationResultSet { iterations, seed, npv, irr, retained, summary, elapsed_ms })
    }
}

/// Wall-clock start of a run. `Instant::now` panics on wasm32, where runs
/// go untimed.
pub(crate) fn start_clock() -> Option<Instant> {
    if cfg!(target_arch = "wasm32") {
        None
    } else {
        Some(Instant::now())
    }
}

pub(crate) fn elapsed_since(started: Option<Instant>) -> Option<u64> {
    started.map(|s| s.elapsed().as_millis() as u64)
}

/// Validate `config` and run it once.
pub fn run(config: &ScenarioConfig, iterations: usize, seed: u64) -> Result<SimulationResultSet, SimulationError> {
    ProjectSimulation::new(config.clone())?.run(iterations, seed)
}
