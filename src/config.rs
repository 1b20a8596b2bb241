// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Project Valuation Simulation Suite - Scenario Configuration
//
// Configurations are immutable once validated. Optimistic/pessimistic
// variants are derived into new values; the base is never mutated.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::{Distribution, Driver};

/// Accepted deviation of a discrete probability table from a total of 1.
pub const PROBABILITY_TOLERANCE: f64 = 0.01;

pub const DEFAULT_SAMPLE_SIZE: usize = 200;
pub const DEFAULT_UNIFORM_BINS: usize = 5;

// ─── Scenario Configuration ─────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioConfig {
    pub demand: Distribution,
    pub unit_price: Distribution,
    pub unit_variable_cost: Distribution,
    pub fixed_cost: Distribution,
    pub tax_rate: f64,
    pub discount_rate: f64,
    /// Number of annual periods.
    pub horizon: u32,
    pub depreciation: f64,
    pub salvage_value: f64,
    /// Signed outlay, negative by convention (e.g. -812500).
    pub initial_investment: f64,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self::base_case()
    }
}

impl ScenarioConfig {
    /// Reference project used by the runner and the test suite.
    pub fn base_case() -> Self {
        Self {
            demand: Distribution::Uniform { low: 9061.0, high: 11915.0 },
            unit_price: Distribution::Normal { mean: 26.48, stddev: 0.83 },
            unit_variable_cost: Distribution::Uniform { low: 9.01, high: 10.71 },
            fixed_cost: Distribution::Discrete {
                values: vec![28000.0, 30000.0, 32000.0],
                probabilities: vec![0.30, 0.3667, 0.3333],
            },
            tax_rate: 0.10,
            discount_rate: 0.20,
            horizon: 10,
            depreciation: 14000.0,
            salvage_value: 524000.0,
            initial_investment: -812500.0,
        }
    }

    pub fn distribution(&self, driver: Driver) -> &Distribution {
        match driver {
            Driver::Demand => &self.demand,
            Driver::UnitPrice => &self.unit_price,
            Driver::UnitVariableCost => &self.unit_variable_cost,
            Driver::FixedCost => &self.fixed_cost,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for driver in Driver::ALL {
            self.distribution(driver).validate(driver)?;
        }
        if self.horizon == 0 {
            return Err(ConfigError::ZeroHorizon);
        }
        for (field, value) in [
            ("tax_rate", self.tax_rate),
            ("discount_rate", self.discount_rate),
            ("depreciation", self.depreciation),
            ("salvage_value", self.salvage_value),
            ("initial_investment", self.initial_investment),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite { field, value });
            }
        }
        if self.discount_rate <= -1.0 {
            return Err(ConfigError::DiscountRate(self.discount_rate));
        }
        Ok(())
    }

    /// Build a new configuration by scaling driver distributions.
    pub fn derive(&self, adjustment: &ScenarioAdjustment) -> Result<Self, ConfigError> {
        adjustment.validate()?;
        let derived = Self {
            demand: self.demand.scaled(adjustment.demand),
            unit_price: self.unit_price.scaled(adjustment.unit_price),
            unit_variable_cost: self.unit_variable_cost.scaled(adjustment.unit_variable_cost),
            fixed_cost: self.fixed_cost.scaled(adjustment.fixed_cost),
            ..self.clone()
        };
        derived.validate()?;
        Ok(derived)
    }

    pub fn optimistic(&self) -> Result<Self, ConfigError> {
        self.derive(&ScenarioAdjustment::optimistic())
    }

    pub fn pessimistic(&self) -> Result<Self, ConfigError> {
        self.derive(&ScenarioAdjustment::pessimistic())
    }
}

// ─── Scenario Adjustment ────────────────────────────────────────────────────

/// Multiplicative factors applied to each driver's distribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScenarioAdjustment {
    pub demand: f64,
    pub unit_price: f64,
    pub unit_variable_cost: f64,
    pub fixed_cost: f64,
}

impl Default for ScenarioAdjustment {
    fn default() -> Self {
        Self { demand: 1.0, unit_price: 1.0, unit_variable_cost: 1.0, fixed_cost: 1.0 }
    }
}

impl ScenarioAdjustment {
    /// Demand +10%, unit variable cost -10%, fixed cost -5%.
    pub fn optimistic() -> Self {
        Self { demand: 1.10, unit_variable_cost: 0.90, fixed_cost: 0.95, ..Self::default() }
    }

    /// Demand -10%, unit variable cost +10%, fixed cost +5%.
    pub fn pessimistic() -> Self {
        Self { demand: 0.90, unit_variable_cost: 1.10, fixed_cost: 1.05, ..Self::default() }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("demand", self.demand),
            ("unit_price", self.unit_price),
            ("unit_variable_cost", self.unit_variable_cost),
            ("fixed_cost", self.fixed_cost),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::InvalidAdjustment { field, value });
            }
        }
        Ok(())
    }
}

// ─── Validation Configuration ───────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationConfig {
    pub sample_size: usize,
    /// Equal-width bins for the uniform chi-square test.
    pub uniform_bins: usize,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self { sample_size: DEFAULT_SAMPLE_SIZE, uniform_bins: DEFAULT_UNIFORM_BINS }
    }
}

impl ValidationConfig {
    pub fn with_sample_size(sample_size: usize) -> Self {
        Self { sample_size, ..Self::default() }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sample_size == 0 {
            return Err(ConfigError::ZeroSampleSize);
        }
        if self.uniform_bins < 2 {
            return Err(ConfigError::TooFewBins(self.uniform_bins));
        }
        Ok(())
    }
}

// ─── Distribution checks ────────────────────────────────────────────────────

impl Distribution {
    pub fn validate(&self, driver: Driver) -> Result<(), ConfigError> {
        let name = || driver.label().to_string();
        match self {
            Self::Uniform { low, high } => {
                if !low.is_finite() || !high.is_finite() || low > high {
                    return Err(ConfigError::InvalidUniform { driver: name(), low: *low, high: *high });
                }
            }
            Self::Normal { mean, stddev } => {
                if !mean.is_finite() || !stddev.is_finite() || *stddev < 0.0 {
                    return Err(ConfigError::InvalidNormal {
                        driver: name(),
                        mean: *mean,
                        stddev: *stddev,
                    });
                }
            }
            Self::Discrete { values, probabilities } => {
                if values.is_empty() {
                    return Err(ConfigError::EmptyDiscrete { driver: name() });
                }
                if values.len() != probabilities.len() {
                    return Err(ConfigError::DiscreteLengthMismatch {
                        driver: name(),
                        values: values.len(),
                        probabilities: probabilities.len(),
                    });
                }
                if values.iter().any(|v| !v.is_finite()) {
                    return Err(ConfigError::NonFiniteValue { driver: name() });
                }
                let duplicate = values
                    .iter()
                    .enumerate()
                    .find_map(|(i, v)| values[..i].contains(v).then_some(*v));
                if let Some(value) = duplicate {
                    return Err(ConfigError::DuplicateDiscreteValue { driver: name(), value });
                }
                if probabilities.iter().any(|p| !p.is_finite() || *p < 0.0) {
                    return Err(ConfigError::NegativeProbability { driver: name() });
                }
                let sum: f64 = probabilities.iter().sum();
                if (sum - 1.0).abs() > PROBABILITY_TOLERANCE {
                    return Err(ConfigError::ProbabilitySum { driver: name(), sum });
                }
            }
        }
        Ok(())
    }

    /// Distribution of `factor * X`. Probabilities are left untouched.
    pub fn scaled(&self, factor: f64) -> Self {
        match self {
            Self::Uniform { low, high } => Self::Uniform { low: low * factor, high: high * factor },
            Self::Normal { mean, stddev } => {
                Self::Normal { mean: mean * factor, stddev: stddev * factor }
            }
            Self::Discrete { values, probabilities } => Self::Discrete {
                values: values.iter().map(|v| v * factor).collect(),
                probabilities: probabilities.clone(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_case_is_valid() {
        ScenarioConfig::base_case().validate().expect("test: base case validates");
    }

    #[test]
    fn zero_horizon_rejected() {
        let cfg = ScenarioConfig { horizon: 0, ..ScenarioConfig::base_case() };
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroHorizon));
    }

    #[test]
    fn inverted_uniform_rejected() {
        let cfg = ScenarioConfig {
            demand: Distribution::Uniform { low: 10.0, high: 5.0 },
            ..ScenarioConfig::base_case()
        };
        assert!(matches!(cfg.validate(), Err(ConfigError::InvalidUniform { .. })));
    }

    #[test]
    fn negative_stddev_rejected() {
        let cfg = ScenarioConfig {
            unit_price: Distribution::Normal { mean: 26.0, stddev: -1.0 },
            ..ScenarioConfig::base_case()
        };
        assert!(matches!(cfg.validate(), Err(ConfigError::InvalidNormal { .. })));
    }

    #[test]
    fn discrete_mismatch_and_negative_probability_rejected() {
        let mismatch = Distribution::Discrete { values: vec![1.0, 2.0], probabilities: vec![1.0] };
        assert!(matches!(
            mismatch.validate(Driver::FixedCost),
            Err(ConfigError::DiscreteLengthMismatch { values: 2, probabilities: 1, .. })
        ));

        let negative =
            Distribution::Discrete { values: vec![1.0, 2.0], probabilities: vec![1.2, -0.2] };
        assert!(matches!(
            negative.validate(Driver::FixedCost),
            Err(ConfigError::NegativeProbability { .. })
        ));

        let short = Distribution::Discrete { values: vec![1.0, 2.0], probabilities: vec![0.2, 0.2] };
        assert!(matches!(short.validate(Driver::FixedCost), Err(ConfigError::ProbabilitySum { .. })));
    }

    #[test]
    fn repeated_discrete_value_rejected() {
        let repeated = Distribution::Discrete {
            values: vec![1.0, 1.0, 2.0],
            probabilities: vec![0.25, 0.25, 0.5],
        };
        assert_eq!(
            repeated.validate(Driver::FixedCost),
            Err(ConfigError::DuplicateDiscreteValue { driver: "Fixed cost".to_string(), value: 1.0 })
        );

        let cfg = ScenarioConfig { fixed_cost: repeated, ..ScenarioConfig::base_case() };
        assert!(matches!(cfg.validate(), Err(ConfigError::DuplicateDiscreteValue { .. })));
    }

    #[test]
    fn discount_rate_at_minus_one_rejected() {
        let cfg = ScenarioConfig { discount_rate: -1.0, ..ScenarioConfig::base_case() };
        assert_eq!(cfg.validate(), Err(ConfigError::DiscountRate(-1.0)));
    }

    #[test]
    fn optimistic_scales_without_touching_base() {
        let base = ScenarioConfig::base_case();
        let snapshot = base.clone();
        let opt = base.optimistic().expect("test: optimistic derives");

        assert_eq!(base, snapshot);
        match opt.demand {
            Distribution::Uniform { low, high } => {
                assert!((low - 9061.0 * 1.10).abs() < 1e-9);
                assert!((high - 11915.0 * 1.10).abs() < 1e-9);
            }
            other => panic!("unexpected demand distribution {other:?}"),
        }
        match opt.fixed_cost {
            Distribution::Discrete { values, probabilities } => {
                assert!((values[0] - 28000.0 * 0.95).abs() < 1e-9);
                assert_eq!(probabilities, vec![0.30, 0.3667, 0.3333]);
            }
            other => panic!("unexpected fixed cost distribution {other:?}"),
        }
        assert_eq!(opt.unit_price, base.unit_price);
        assert_eq!(opt.horizon, base.horizon);
    }

    #[test]
    fn pessimistic_raises_costs() {
        let pes = ScenarioConfig::base_case().pessimistic().expect("test: pessimistic derives");
        match pes.unit_variable_cost {
            Distribution::Uniform { low, high } => {
                assert!((low - 9.01 * 1.10).abs() < 1e-9);
                assert!((high - 10.71 * 1.10).abs() < 1e-9);
            }
            other => panic!("unexpected variable cost distribution {other:?}"),
        }
    }

    #[test]
    fn non_positive_adjustment_rejected() {
        let adj = ScenarioAdjustment { demand: 0.0, ..ScenarioAdjustment::default() };
        let err = ScenarioConfig::base_case().derive(&adj);
        assert!(matches!(err, Err(ConfigError::InvalidAdjustment { field: "demand", .. })));
    }

    #[test]
    fn config_round_trips_through_json() {
        let cfg = ScenarioConfig::base_case();
        let json = serde_json::to_string(&cfg).expect("test: serialize config");
        assert!(json.contains("\"kind\":\"uniform\""));
        let back: ScenarioConfig = serde_json::from_str(&json).expect("test: deserialize config");
        assert_eq!(back.horizon, cfg.horizon);
        assert!((back.initial_investment - cfg.initial_investment).abs() < 1e-9);
        match &back.fixed_cost {
            Distribution::Discrete { values, probabilities } => {
                assert_eq!(values.len(), 3);
                assert!((probabilities[1] - 0.3667).abs() < 1e-12);
            }
            other => panic!("unexpected fixed cost distribution {other:?}"),
        }
        assert!(back.validate().is_ok());
    }

    #[test]
    fn validation_config_bounds() {
        assert!(ValidationConfig::default().validate().is_ok());
        assert_eq!(ValidationConfig::with_sample_size(0).validate(), Err(ConfigError::ZeroSampleSize));
        let cfg = ValidationConfig { sample_size: 10, uniform_bins: 1 };
        assert_eq!(cfg.validate(), Err(ConfigError::TooFewBins(1)));
    }
}
