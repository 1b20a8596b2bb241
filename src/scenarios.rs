// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Project Valuation Simulation Suite - Scenario Comparison
//
// Base, optimistic and pessimistic variants run with the same seed so the
// differences come from the inputs, not from the random streams.

use serde::{Deserialize, Serialize};

use crate::config::ScenarioConfig;
use crate::error::SimulationError;
use crate::simulation;
use crate::types::{SimulationResultSet, SimulationSummary};

// ─── Scenario Kind ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioKind {
    Base,
    Optimistic,
    Pessimistic,
}

impl ScenarioKind {
    pub const ALL: [ScenarioKind; 3] = [Self::Base, Self::Optimistic, Self::Pessimistic];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Base => "Base",
            Self::Optimistic => "A (optimistic)",
            Self::Pessimistic => "B (pessimistic)",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "base" => Some(Self::Base),
            "optimistic" | "a" => Some(Self::Optimistic),
            "pessimistic" | "b" => Some(Self::Pessimistic),
            _ => None,
        }
    }

    /// Derive this variant from `base`.
    pub fn build(&self, base: &ScenarioConfig) -> Result<ScenarioConfig, SimulationError> {
        let config = match self {
            Self::Base => {
                base.validate()?;
                base.clone()
            }
            Self::Optimistic => base.optimistic()?,
            Self::Pessimistic => base.pessimistic()?,
        };
        Ok(config)
    }
}

// ─── Comparison ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioOutcome {
    pub kind: ScenarioKind,
    pub label: String,
    pub config: ScenarioConfig,
    pub summary: SimulationSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioComparison {
    pub iterations: usize,
    pub seed: u64,
    pub outcomes: Vec<ScenarioOutcome>,
}

impl ScenarioComparison {
    pub fn get(&self, kind: ScenarioKind) -> Option<&ScenarioOutcome> {
        self.outcomes.iter().find(|o| o.kind == kind)
    }
}

/// Run one variant, returning the full result set.
pub fn run_scenario(
    kind: ScenarioKind,
    base: &ScenarioConfig,
    iterations: usize,
    seed: u64,
) -> Result<(ScenarioConfig, SimulationResultSet), SimulationError> {
    let config = kind.build(base)?;
    let result = simulation::run(&config, iterations, seed)?;
    Ok((config, result))
}

/// Run all three variants with the same seed and collect their summaries.
pub fn compare_scenarios(
    base: &ScenarioConfig,
    iterations: usize,
    seed: u64,
) -> Result<ScenarioComparison, SimulationError> {
    let outcomes = ScenarioKind::ALL
        .iter()
        .map(|kind| {
            let (config, result) = run_scenario(*kind, base, iterations, seed)?;
            Ok(ScenarioOutcome {
                kind: *kind,
                label: kind.label().to_string(),
                config,
                summary: result.summary,
            })
        })
        .collect::<Result<Vec<_>, SimulationError>>()?;
    Ok(ScenarioComparison { iterations, seed, outcomes })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_parse() {
        assert_eq!(ScenarioKind::from_name("Optimistic"), Some(ScenarioKind::Optimistic));
        assert_eq!(ScenarioKind::from_name("b"), Some(ScenarioKind::Pessimistic));
        assert_eq!(ScenarioKind::from_name("worst"), None);
    }

    #[test]
    fn comparison_orders_by_outlook() {
        let cmp = compare_scenarios(&ScenarioConfig::base_case(), 300, 21).expect("test: comparison runs");
        assert_eq!(cmp.outcomes.len(), 3);
        let mean = |k| cmp.get(k).expect("test: outcome present").summary.npv.mean;
        assert!(mean(ScenarioKind::Optimistic) > mean(ScenarioKind::Base));
        assert!(mean(ScenarioKind::Base) > mean(ScenarioKind::Pessimistic));
    }

    #[test]
    fn base_variant_is_unchanged() {
        let base = ScenarioConfig::base_case();
        let built = ScenarioKind::Base.build(&base).expect("test: base builds");
        assert_eq!(built, base);
    }
}
