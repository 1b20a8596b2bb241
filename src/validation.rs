// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Project Valuation Simulation Suite - Generator Validation
//
// Goodness-of-fit checks run on fresh draws, independent of any simulation:
//   uniform  -> chi-square over equal-width bins
//   discrete -> chi-square over declared values
//   normal   -> Kolmogorov-Smirnov against the erf-based CDF
// All at 5% significance. A sample never causes an error; degenerate
// distributions are tested as point masses.

use std::collections::BTreeMap;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use statrs::distribution::{ChiSquared, ContinuousCDF};
use statrs::function::erf::erf;
use tracing::{debug, info, warn};

use crate::config::{ScenarioConfig, ValidationConfig};
use crate::error::SimulationError;
use crate::generators::stream_rng;
use crate::simulation::{elapsed_since, start_clock};
use crate::statistics::bin_index;
use crate::types::{Distribution, Driver, TestKind, ValidationResult};

pub const SIGNIFICANCE: f64 = 0.05;

/// Large-sample KS coefficient at 5%: `D_crit = 1.36 / sqrt(n)`.
pub const KS_COEFFICIENT: f64 = 1.36;

/// Upper 5% chi-square points for 1..=10 degrees of freedom.
const CHI_SQUARE_TABLE: [f64; 10] = [3.84, 5.99, 7.81, 9.49, 11.07, 12.59, 14.07, 15.51, 16.92, 18.31];

/// First ChaCha stream used for validation draws.
pub const VALIDATION_STREAM_BASE: u64 = 1 << 63;

// ─── Critical Values ────────────────────────────────────────────────────────

/// Tabulated 5% critical value, exact `statrs` quantile beyond the table.
pub fn chi_square_critical_value(degrees_of_freedom: usize) -> f64 {
    if degrees_of_freedom == 0 {
        return 0.0;
    }
    if let Some(v) = CHI_SQUARE_TABLE.get(degrees_of_freedom - 1) {
        return *v;
    }
    // Only a non-positive shape is rejected, and k >= 11 here.
    ChiSquared::new(degrees_of_freedom as f64)
        .map_or(f64::INFINITY, |dist| dist.inverse_cdf(1.0 - SIGNIFICANCE))
}

pub fn ks_critical_value(sample_size: usize) -> f64 {
    KS_COEFFICIENT / (sample_size.max(1) as f64).sqrt()
}

// ─── Goodness-of-fit Tests ──────────────────────────────────────────────────

/// Chi-square against `Uniform(low, high)` with `bins` equal-width bins.
pub fn chi_square_uniform(sample: &[f64], low: f64, high: f64, bins: usize) -> ValidationResult {
    if low == high {
        return point_mass(sample, low);
    }
    let bins = bins.max(2);
    let width = (high - low) / bins as f64;
    let mut observed = vec![0usize; bins];
    for x in sample {
        if let Some(idx) = bin_index(*x, low, high, width, bins) {
            observed[idx] += 1;
        }
    }
    let expected = vec![sample.len() as f64 / bins as f64; bins];
    chi_square_result(TestKind::ChiSquareUniform, &observed, &expected, sample.len())
}

/// Chi-square against a discrete table. Zero-probability categories are
/// dropped from both the statistic and the degrees of freedom; a value
/// listed more than once is one category carrying the summed probability.
pub fn chi_square_discrete(sample: &[f64], values: &[f64], probabilities: &[f64]) -> ValidationResult {
    let mut active: Vec<(f64, f64)> = Vec::with_capacity(values.len());
    for (v, p) in values.iter().zip(probabilities).filter(|(_, p)| **p > 0.0) {
        match active.iter_mut().find(|(seen, _)| seen == v) {
            Some((_, mass)) => *mass += p,
            None => active.push((*v, *p)),
        }
    }
    if active.len() <= 1 {
        let point = active.first().map(|(v, _)| *v).or_else(|| values.last().copied());
        return point_mass(sample, point.unwrap_or(f64::NAN));
    }

    let n = sample.len() as f64;
    let observed: Vec<usize> = active
        .iter()
        .map(|(v, _)| sample.iter().filter(|x| **x == *v).count())
        .collect();
    let expected: Vec<f64> = active.iter().map(|(_, p)| n * p).collect();
    chi_square_result(TestKind::ChiSquareDiscrete, &observed, &expected, sample.len())
}

/// Two-sided KS statistic `max(D+, D-)` against `N(mean, stddev)`.
pub fn kolmogorov_smirnov_normal(sample: &[f64], mean: f64, stddev: f64) -> ValidationResult {
    if stddev == 0.0 {
        return point_mass(sample, mean);
    }
    let mut sorted = sample.to_vec();
    sorted.sort_by(f64::total_cmp);
    let n = sorted.len() as f64;

    let statistic = sorted
        .iter()
        .enumerate()
        .map(|(i, x)| {
            let cdf = normal_cdf(*x, mean, stddev);
            let d_plus = (i + 1) as f64 / n - cdf;
            let d_minus = cdf - i as f64 / n;
            d_plus.max(d_minus)
        })
        .fold(0.0_f64, f64::max);

    let critical_value = ks_critical_value(sorted.len());
    ValidationResult {
        test: TestKind::KolmogorovSmirnovNormal,
        statistic,
        critical_value,
        degrees_of_freedom: None,
        sample_size: sorted.len(),
        accepted: statistic < critical_value,
    }
}

/// Fraction of draws that miss `point`, which is `sup |ECDF - F|` for a
/// point mass, judged against the KS bound.
pub fn point_mass(sample: &[f64], point: f64) -> ValidationResult {
    let misses = sample.iter().filter(|x| **x != point).count();
    let statistic = if sample.is_empty() { 0.0 } else { misses as f64 / sample.len() as f64 };
    let critical_value = ks_critical_value(sample.len());
    ValidationResult {
        test: TestKind::PointMass,
        statistic,
        critical_value,
        degrees_of_freedom: None,
        sample_size: sample.len(),
        accepted: statistic < critical_value,
    }
}

pub fn normal_cdf(x: f64, mean: f64, stddev: f64) -> f64 {
    0.5 * (1.0 + erf((x - mean) / (stddev * std::f64::consts::SQRT_2)))
}

fn chi_square_result(test: TestKind, observed: &[usize], expected: &[f64], sample_size: usize) -> ValidationResult {
    let statistic: f64 = observed
        .iter()
        .zip(expected)
        .filter(|(_, e)| **e > 0.0)
        .map(|(o, e)| (*o as f64 - e).powi(2) / e)
        .sum();
    let degrees_of_freedom = observed.len().saturating_sub(1);
    let critical_value = chi_square_critical_value(degrees_of_freedom);
    ValidationResult {
        test,
        statistic,
        critical_value,
        degrees_of_freedom: Some(degrees_of_freedom),
        sample_size,
        accepted: statistic < critical_value,
    }
}

/// Pick the test matching the distribution shape and run it.
pub fn validate_sample(distribution: &Distribution, sample: &[f64], uniform_bins: usize) -> ValidationResult {
    match distribution {
        Distribution::Uniform { low, high } => chi_square_uniform(sample, *low, *high, uniform_bins),
        Distribution::Normal { mean, stddev } => kolmogorov_smirnov_normal(sample, *mean, *stddev),
        Distribution::Discrete { values, probabilities } => {
            chi_square_discrete(sample, values, probabilities)
        }
    }
}

// ─── Validation Report ──────────────────────────────────────────────────────

/// One result per driver plus the draws that produced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    pub sample_size: usize,
    pub seed: u64,
    pub results: BTreeMap<Driver, ValidationResult>,
    pub samples: BTreeMap<Driver, Vec<f64>>,
}

impl ValidationReport {
    pub fn all_accepted(&self) -> bool {
        self.results.values().all(|r| r.accepted)
    }

    pub fn rejected(&self) -> Vec<Driver> {
        self.results.iter().filter(|(_, r)| !r.accepted).map(|(d, _)| *d).collect()
    }
}

/// Draw `sample_size` fresh values per driver and test each one.
///
/// Each driver reads its own ChaCha stream of `seed`, disjoint from the
/// simulation's iteration streams, so results are the
/// same whether the drivers run in parallel or not.
pub fn validate_generators(
    config: &ScenarioConfig,
    settings: &ValidationConfig,
    seed: u64,
) -> Result<ValidationReport, SimulationError> {
    config.validate()?;
    settings.validate()?;
    let started = start_clock();

    let outcomes: Vec<(Driver, ValidationResult, Vec<f64>)> = Driver::ALL
        .par_iter()
        .map(|driver| -> Result<_, SimulationError> {
            let distribution = config.distribution(*driver);
            let mut rng = stream_rng(seed, VALIDATION_STREAM_BASE + *driver as u64);
            let sample = (0..settings.sample_size)
                .map(|_| distribution.sample(&mut rng))
                .collect::<Result<Vec<f64>, _>>()?;
            let result = validate_sample(distribution, &sample, settings.uniform_bins);
            Ok((*driver, result, sample))
        })
        .collect::<Result<_, SimulationError>>()?;

    let mut results = BTreeMap::new();
    let mut samples = BTreeMap::new();
    for (driver, result, sample) in outcomes {
        debug!(
            driver = driver.label(),
            test = result.test.label(),
            statistic = result.statistic,
            critical = result.critical_value,
            accepted = result.accepted,
            "goodness-of-fit"
        );
        if !result.accepted {
            warn!(driver = driver.label(), statistic = result.statistic, "generator rejected at 5%");
        }
        results.insert(driver, result);
        samples.insert(driver, sample);
    }

    let report = ValidationReport { sample_size: settings.sample_size, seed, results, samples };
    info!(
        sample_size = report.sample_size,
        accepted = report.results.len() - report.rejected().len(),
        total = report.results.len(),
        elapsed_ms = ?elapsed_since(started),
        "generator validation complete"
    );
    Ok(report)
}
