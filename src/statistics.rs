// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Project Valuation Simulation Suite - Summary Statistics
//
// All statistics are computed from a sorted copy of the input so that the
// record does not depend on the order the iterations finished in.

use crate::error::StatisticsError;
use crate::types::{ConfidenceBands, FrequencyBin, Irr, IrrSummary, SimulationSummary, SummaryStatistics};

/// z-score of the two-sided 95% band.
const Z_95: f64 = 1.96;
/// Half-width added around a single-valued input, absolute and relative.
const SINGLE_VALUE_PAD: f64 = 0.5;
const SINGLE_VALUE_REL_PAD: f64 = 1e-9;
/// Half-width of the density overlay, in standard deviations.
const CURVE_SPAN_SIGMAS: f64 = 4.0;

// ─── Summaries ──────────────────────────────────────────────────────────────

pub fn summarize(values: &[f64]) -> Result<SummaryStatistics, StatisticsError> {
    if values.is_empty() {
        return Err(StatisticsError::EmptyInput);
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let n = sorted.len() as f64;
    let mean = sorted.iter().sum::<f64>() / n;
    let variance = sorted.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;

    Ok(SummaryStatistics {
        count: sorted.len(),
        mean,
        median: percentile_sorted(&sorted, 50.0),
        std_dev: variance.sqrt(),
        min: sorted[0],
        max: sorted[sorted.len() - 1],
        p5: percentile_sorted(&sorted, 5.0),
        p25: percentile_sorted(&sorted, 25.0),
        p75: percentile_sorted(&sorted, 75.0),
        p95: percentile_sorted(&sorted, 95.0),
    })
}

/// Percentile `p` in `[0, 100]` by linear interpolation between order
/// statistics. `sorted` must be ascending and non-empty.
pub fn percentile_sorted(sorted: &[f64], p: f64) -> f64 {
    let rank = (p / 100.0).clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

/// IRR aggregates over converged iterations; undefined ones are counted, not averaged.
pub fn summarize_irr(irr: &[Irr]) -> IrrSummary {
    let mut rates: Vec<f64> = irr.iter().filter_map(Irr::rate).collect();
    rates.sort_by(f64::total_cmp);
    let converged = rates.len();

    let (mean, min, max) = if rates.is_empty() {
        (None, None, None)
    } else {
        (
            Some(rates.iter().sum::<f64>() / converged as f64),
            rates.first().copied(),
            rates.last().copied(),
        )
    };

    IrrSummary { converged, undefined: irr.len() - converged, mean, min, max }
}

pub fn summarize_simulation(npv: &[f64], irr: &[Irr]) -> Result<SimulationSummary, StatisticsError> {
    Ok(SimulationSummary { npv: summarize(npv)?, irr: summarize_irr(irr) })
}

impl SummaryStatistics {
    pub fn confidence_bands(&self) -> ConfidenceBands {
        ConfidenceBands {
            lower_68: self.mean - self.std_dev,
            upper_68: self.mean + self.std_dev,
            lower_95: self.mean - Z_95 * self.std_dev,
            upper_95: self.mean + Z_95 * self.std_dev,
        }
    }
}

// ─── Frequency Table ────────────────────────────────────────────────────────

/// Equal-width histogram over the value range.
///
/// Bins are `[lower, upper)` except the last, which is closed. A
/// single-valued input is widened to `value ± max(0.5, |value|·1e-9)` so
/// every bin has a positive width at any magnitude; all of its mass lands
/// in one bin.
pub fn frequency_table(values: &[f64], bin_count: usize) -> Result<Vec<FrequencyBin>, StatisticsError> {
    if values.is_empty() {
        return Err(StatisticsError::EmptyInput);
    }
    if bin_count == 0 {
        return Err(StatisticsError::ZeroBins);
    }

    let (mut lo, mut hi) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(*v), hi.max(*v)));
    if lo == hi {
        let pad = SINGLE_VALUE_PAD.max(lo.abs() * SINGLE_VALUE_REL_PAD);
        lo -= pad;
        hi += pad;
    }
    let width = (hi - lo) / bin_count as f64;

    let mut counts = vec![0usize; bin_count];
    for v in values {
        if let Some(idx) = bin_index(*v, lo, hi, width, bin_count) {
            counts[idx] += 1;
        }
    }

    let total = values.len() as f64;
    Ok(counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| FrequencyBin {
            lower: lo + i as f64 * width,
            upper: if i + 1 == bin_count { hi } else { lo + (i + 1) as f64 * width },
            count,
            relative_frequency: count as f64 / total,
        })
        .collect())
}

/// Bin for `v`, clamping the closed upper edge into the last bin.
pub(crate) fn bin_index(v: f64, lo: f64, hi: f64, width: f64, bin_count: usize) -> Option<usize> {
    if !(lo..=hi).contains(&v) {
        return None;
    }
    let idx = ((v - lo) / width) as usize;
    Some(idx.min(bin_count - 1))
}

// ─── Density Overlay ────────────────────────────────────────────────────────

/// Normal density sampled at `points` abscissae across `mean ± 4σ`.
pub fn density_curve(mean: f64, std_dev: f64, points: usize) -> Vec<(f64, f64)> {
    if points < 2 || !std_dev.is_finite() || std_dev <= 0.0 || !mean.is_finite() {
        return Vec::new();
    }
    let start = mean - CURVE_SPAN_SIGMAS * std_dev;
    let step = 2.0 * CURVE_SPAN_SIGMAS * std_dev / (points - 1) as f64;
    let norm = 1.0 / (std_dev * (2.0 * std::f64::consts::PI).sqrt());
    (0..points)
        .map(|i| {
            let x = start + i as f64 * step;
            let z = (x - mean) / std_dev;
            (x, norm * (-0.5 * z * z).exp())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_of_known_sequence() {
        let s = summarize(&[1.0, 2.0, 3.0, 4.0, 5.0]).expect("test: non-empty");
        assert_eq!(s.count, 5);
        assert_eq!(s.mean, 3.0);
        assert_eq!(s.median, 3.0);
        assert!((s.std_dev - 2.0_f64.sqrt()).abs() < 1e-12);
        assert_eq!(s.min, 1.0);
        assert_eq!(s.max, 5.0);
        assert!((s.p5 - 1.2).abs() < 1e-12);
        assert_eq!(s.p25, 2.0);
        assert_eq!(s.p75, 4.0);
        assert!((s.p95 - 4.8).abs() < 1e-12);
    }

    #[test]
    fn even_length_median_interpolates() {
        let s = summarize(&[4.0, 1.0, 3.0, 2.0]).expect("test: non-empty");
        assert_eq!(s.median, 2.5);
        assert_eq!(s.p25, 1.75);
    }

    #[test]
    fn summary_is_order_independent() {
        let values: Vec<f64> = (0..257).map(|i| ((i * 7919) % 1000) as f64 * 0.37 - 120.0).collect();
        let mut permuted = values.clone();
        permuted.reverse();
        permuted.rotate_left(31);
        assert_eq!(
            summarize(&values).expect("test: non-empty"),
            summarize(&permuted).expect("test: non-empty")
        );
    }

    #[test]
    fn empty_input_fails_fast() {
        assert_eq!(summarize(&[]), Err(StatisticsError::EmptyInput));
        assert_eq!(frequency_table(&[], 10), Err(StatisticsError::EmptyInput));
        assert_eq!(frequency_table(&[1.0], 0), Err(StatisticsError::ZeroBins));
    }

    #[test]
    fn single_value_summary() {
        let s = summarize(&[42.0]).expect("test: non-empty");
        assert_eq!(s.std_dev, 0.0);
        assert_eq!(s.p5, 42.0);
        assert_eq!(s.p95, 42.0);
    }

    #[test]
    fn frequency_table_counts_and_edges() {
        let values = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 10.0];
        let table = frequency_table(&values, 5).expect("test: valid table");
        assert_eq!(table.len(), 5);
        assert_eq!(table[0].lower, 0.0);
        assert_eq!(table[4].upper, 10.0);
        let counts: Vec<usize> = table.iter().map(|b| b.count).collect();
        // [0,2) [2,4) [4,6) [6,8) [8,10]
        assert_eq!(counts, vec![2, 2, 2, 2, 2]);
        let rel: f64 = table.iter().map(|b| b.relative_frequency).sum();
        assert!((rel - 1.0).abs() < 1e-12);
    }

    #[test]
    fn frequency_table_single_valued_input() {
        let table = frequency_table(&[7.0; 12], 10).expect("test: valid table");
        let occupied: Vec<&FrequencyBin> = table.iter().filter(|b| b.count > 0).collect();
        assert_eq!(occupied.len(), 1);
        assert_eq!(occupied[0].count, 12);
        assert_eq!(occupied[0].relative_frequency, 1.0);
        assert!(table.iter().all(|b| b.upper > b.lower));
        assert!(occupied[0].lower <= 7.0 && 7.0 < occupied[0].upper);
    }

    #[test]
    fn frequency_table_single_large_value() {
        let table = frequency_table(&[1e17; 4], 3).expect("test: valid table");
        assert!(table.iter().all(|b| b.upper > b.lower), "{table:?}");
        assert_eq!(table.iter().filter(|b| b.count > 0).count(), 1);
        assert_eq!(table.iter().map(|b| b.count).sum::<usize>(), 4);
        assert!(table[0].lower < 1e17 && 1e17 < table[2].upper);
    }

    #[test]
    fn irr_summary_excludes_undefined() {
        let irr = [Irr::Converged(0.1), Irr::Undefined, Irr::Converged(0.3), Irr::Undefined];
        let s = summarize_irr(&irr);
        assert_eq!(s.converged, 2);
        assert_eq!(s.undefined, 2);
        assert!((s.mean.expect("test: has mean") - 0.2).abs() < 1e-12);
        assert_eq!(s.min, Some(0.1));
        assert_eq!(s.max, Some(0.3));

        let none = summarize_irr(&[Irr::Undefined]);
        assert_eq!(none.mean, None);
        assert_eq!(none.undefined, 1);
    }

    #[test]
    fn confidence_bands_follow_sigma() {
        let s = summarize(&[-1.0, 1.0]).expect("test: non-empty");
        let bands = s.confidence_bands();
        assert_eq!(bands.lower_68, -1.0);
        assert_eq!(bands.upper_68, 1.0);
        assert!((bands.upper_95 - 1.96).abs() < 1e-12);
    }

    #[test]
    fn density_curve_peaks_at_mean() {
        let curve = density_curve(10.0, 2.0, 401);
        assert_eq!(curve.len(), 401);
        let (x_peak, y_peak) = curve[200];
        assert!((x_peak - 10.0).abs() < 1e-9);
        assert!((y_peak - 1.0 / (2.0 * (2.0 * std::f64::consts::PI).sqrt())).abs() < 1e-12);
        assert!(density_curve(10.0, 0.0, 100).is_empty());
        assert!(density_curve(10.0, 1.0, 1).is_empty());
    }
}
