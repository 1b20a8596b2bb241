// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Project Valuation Simulation Suite

pub mod types;
pub mod error;
pub mod config;
pub mod generators;
pub mod cash_flow;
pub mod valuation;
pub mod statistics;
pub mod simulation;
pub mod validation;
pub mod scenarios;
pub mod records;

pub use types::*;
pub use config::{ScenarioAdjustment, ScenarioConfig, ValidationConfig};
pub use error::{ConfigError, SampleError, SimulationError, StatisticsError, ValuationError};
pub use scenarios::{compare_scenarios, ScenarioComparison, ScenarioKind};
pub use simulation::ProjectSimulation;
pub use validation::{validate_generators, ValidationReport};

use wasm_bindgen::prelude::*;

// ─── WASM Interface ──────────────────────────────────────────────────────────

/// Browser-facing handle over one scenario.
///
/// Keeps the NPVs of the last run so the dashboard can rebin them without
/// re-simulating.
#[wasm_bindgen]
pub struct WasmSimulator {
    config: ScenarioConfig,
    last_npv: Vec<f64>,
}

#[wasm_bindgen]
impl WasmSimulator {
    /// Build from a JSON configuration; an empty string selects the base case.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str) -> Result<WasmSimulator, JsValue> {
        #[cfg(target_arch = "wasm32")]
        std::panic::set_hook(Box::new(console_error_panic_hook::hook));

        let config = if config_json.trim().is_empty() {
            ScenarioConfig::base_case()
        } else {
            serde_json::from_str(config_json).map_err(|e| JsValue::from_str(&e.to_string()))?
        };
        config.validate().map_err(to_js_error)?;
        Ok(Self { config, last_npv: Vec::new() })
    }

    pub fn config(&self) -> JsValue {
        serde_wasm_bindgen::to_value(&self.config).unwrap_or(JsValue::NULL)
    }

    pub fn run(&mut self, iterations: u32, seed: u64) -> Result<JsValue, JsValue> {
        let result = simulation::run(&self.config, iterations as usize, seed).map_err(to_js_error)?;
        self.last_npv = result.npv.clone();
        serde_wasm_bindgen::to_value(&result).map_err(JsValue::from)
    }

    pub fn compare(&self, iterations: u32, seed: u64) -> Result<JsValue, JsValue> {
        let comparison = compare_scenarios(&self.config, iterations as usize, seed).map_err(to_js_error)?;
        serde_wasm_bindgen::to_value(&comparison).map_err(JsValue::from)
    }

    pub fn validate(&self, sample_size: u32, seed: u64) -> Result<JsValue, JsValue> {
        let report = validate_generators(
            &self.config,
            &ValidationConfig::with_sample_size(sample_size as usize),
            seed,
        )
        .map_err(to_js_error)?;
        serde_wasm_bindgen::to_value(&report).map_err(JsValue::from)
    }

    /// Histogram of the last run's NPVs.
    pub fn frequency_table(&self, bins: u32) -> Result<JsValue, JsValue> {
        let table = statistics::frequency_table(&self.last_npv, bins as usize).map_err(to_js_error)?;
        serde_wasm_bindgen::to_value(&table).map_err(JsValue::from)
    }

    pub fn density_curve(&self, points: u32) -> JsValue {
        let curve = statistics::summarize(&self.last_npv)
            .map(|s| statistics::density_curve(s.mean, s.std_dev, points as usize))
            .unwrap_or_default();
        serde_wasm_bindgen::to_value(&curve).unwrap_or(JsValue::NULL)
    }
}

fn to_js_error<E: std::fmt::Display>(err: E) -> JsValue {
    JsValue::from_str(&err.to_string())
}
