// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Project Valuation Simulation Suite - Random Variate Generation
//
// Every sampler takes the random stream explicitly; there is no global
// source. Degenerate parameters return the point value without consuming
// randomness. Parameters outside a sampler's domain are rejected before
// any draw is taken.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution as _, Normal};

use crate::error::SampleError;
use crate::types::{Distribution, DriverDraws};

/// Independent ChaCha stream `stream` of `seed`.
///
/// Simulation iterations use streams `0..n`; validation draws sit in the
/// upper half of the stream space so the two never overlap for one seed.
pub fn stream_rng(seed: u64, stream: u64) -> ChaCha8Rng {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    rng.set_stream(stream);
    rng
}

/// `low + r * (high - low)` for `r` in `[0, 1)`.
pub fn sample_uniform<R: Rng + ?Sized>(rng: &mut R, low: f64, high: f64) -> Result<f64, SampleError> {
    if !low.is_finite() || !high.is_finite() || low > high {
        return Err(SampleError::InvalidUniform { low, high });
    }
    if low == high {
        return Ok(low);
    }
    let r: f64 = rng.gen();
    Ok(low + r * (high - low))
}

/// One draw from `N(mean, stddev)`; `stddev == 0` returns `mean`.
pub fn sample_normal<R: Rng + ?Sized>(rng: &mut R, mean: f64, stddev: f64) -> Result<f64, SampleError> {
    if !mean.is_finite() || !stddev.is_finite() || stddev < 0.0 {
        return Err(SampleError::InvalidNormal { mean, stddev });
    }
    if stddev == 0.0 {
        return Ok(mean);
    }
    let normal = Normal::new(mean, stddev).map_err(|_| SampleError::InvalidNormal { mean, stddev })?;
    Ok(normal.sample(rng))
}

/// Walk the cumulative mass in declared order and return the first value
/// whose cumulative probability reaches `r`.
///
/// When rounding leaves `r` above the total mass the last value is returned.
pub fn sample_discrete<R: Rng + ?Sized>(
    rng: &mut R,
    values: &[f64],
    probabilities: &[f64],
) -> Result<f64, SampleError> {
    if values.len() != probabilities.len() {
        return Err(SampleError::LengthMismatch {
            values: values.len(),
            probabilities: probabilities.len(),
        });
    }
    if let Some(p) = probabilities.iter().find(|p| !p.is_finite() || **p < 0.0) {
        return Err(SampleError::InvalidProbability(*p));
    }
    let last = *values.last().ok_or(SampleError::EmptyDiscrete)?;

    let r: f64 = rng.gen();
    let mut cumulative = 0.0;
    for (value, p) in values.iter().zip(probabilities) {
        cumulative += p;
        if r <= cumulative {
            return Ok(*value);
        }
    }
    Ok(last)
}

impl Distribution {
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<f64, SampleError> {
        match self {
            Self::Uniform { low, high } => sample_uniform(rng, *low, *high),
            Self::Normal { mean, stddev } => sample_normal(rng, *mean, *stddev),
            Self::Discrete { values, probabilities } => sample_discrete(rng, values, probabilities),
        }
    }

    /// Whether every draw is the same value.
    pub fn is_degenerate(&self) -> bool {
        match self {
            Self::Uniform { low, high } => low == high,
            Self::Normal { stddev, .. } => *stddev == 0.0,
            Self::Discrete { probabilities, .. } => {
                probabilities.iter().filter(|p| **p > 0.0).count() <= 1
            }
        }
    }
}

/// Sample all four drivers of a scenario in a fixed order.
pub fn sample_drivers<R: Rng + ?Sized>(
    rng: &mut R,
    config: &crate::config::ScenarioConfig,
) -> Result<DriverDraws, SampleError> {
    Ok(DriverDraws {
        demand: config.demand.sample(rng)?,
        unit_price: config.unit_price.sample(rng)?,
        unit_variable_cost: config.unit_variable_cost.sample(rng)?,
        fixed_cost: config.fixed_cost.sample(rng)?,
    })
}
