// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Project Valuation Simulation Suite - Error Types

//! Error taxonomy for the valuation engine.
//!
//! Configuration and aggregation problems fail fast at the call that
//! receives the bad input. Numerical edge cases (degenerate distributions,
//! non-convergent IRR) are values, not errors, and never appear here.

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Invalid scenario, distribution or validation parameters.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("{driver}: uniform bounds must be finite with low <= high (got {low}..{high})")]
    InvalidUniform { driver: String, low: f64, high: f64 },

    #[error("{driver}: normal requires finite mean and stddev >= 0 (got mean {mean}, stddev {stddev})")]
    InvalidNormal { driver: String, mean: f64, stddev: f64 },

    #[error("{driver}: discrete distribution has no values")]
    EmptyDiscrete { driver: String },

    #[error("{driver}: {values} values but {probabilities} probabilities")]
    DiscreteLengthMismatch { driver: String, values: usize, probabilities: usize },

    #[error("{driver}: probabilities must be finite and non-negative")]
    NegativeProbability { driver: String },

    #[error("{driver}: probabilities sum to {sum}, expected ~1")]
    ProbabilitySum { driver: String, sum: f64 },

    #[error("{driver}: discrete values must be finite")]
    NonFiniteValue { driver: String },

    #[error("{driver}: discrete value {value} is declared more than once")]
    DuplicateDiscreteValue { driver: String, value: f64 },

    #[error("horizon must be at least one period")]
    ZeroHorizon,

    #[error("{field} must be finite (got {value})")]
    NonFinite { field: &'static str, value: f64 },

    #[error("discount rate must be greater than -1 (got {0})")]
    DiscountRate(f64),

    #[error("scenario adjustment factor {field} must be finite and positive (got {value})")]
    InvalidAdjustment { field: &'static str, value: f64 },

    #[error("validation sample size must be positive")]
    ZeroSampleSize,

    #[error("uniform goodness-of-fit needs at least 2 bins (got {0})")]
    TooFewBins(usize),
}

// ---------------------------------------------------------------------------
// Sampling
// ---------------------------------------------------------------------------

/// Sampler called with parameters outside its domain.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SampleError {
    #[error("uniform bounds must be finite with low <= high (got {low}..{high})")]
    InvalidUniform { low: f64, high: f64 },

    #[error("normal requires finite mean and stddev >= 0 (got mean {mean}, stddev {stddev})")]
    InvalidNormal { mean: f64, stddev: f64 },

    #[error("discrete distribution has no values")]
    EmptyDiscrete,

    #[error("{values} values but {probabilities} probabilities")]
    LengthMismatch { values: usize, probabilities: usize },

    #[error("probability {0} is negative or not finite")]
    InvalidProbability(f64),
}

// ---------------------------------------------------------------------------
// Valuation
// ---------------------------------------------------------------------------

/// Discounting outside the domain where `(1 + r)^t` is meaningful.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValuationError {
    #[error("discount rate {0} is outside the valuation domain (must be > -1)")]
    DiscountRateDomain(f64),
}

// ---------------------------------------------------------------------------
// Statistics
// ---------------------------------------------------------------------------

/// Aggregation over inputs that cannot produce a meaningful record.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StatisticsError {
    #[error("cannot summarize an empty sequence")]
    EmptyInput,

    #[error("frequency table needs at least one bin")]
    ZeroBins,
}

// ---------------------------------------------------------------------------
// Simulation
// ---------------------------------------------------------------------------

/// Errors from a full simulation run.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SimulationError {
    #[error("iteration count must be at least 1")]
    NoIterations,

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Sample(#[from] SampleError),

    #[error(transparent)]
    Valuation(#[from] ValuationError),

    #[error(transparent)]
    Statistics(#[from] StatisticsError),
}
