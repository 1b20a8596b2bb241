// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Project Valuation Simulation Suite - NPV / IRR

//! Discounting and IRR root finding.
//!
//! NPV negates the signed investment once: with the negative-outlay
//! convention of [`ScenarioConfig`](crate::config::ScenarioConfig) the
//! caller passes the value as stored and never negates it again.
//!
//! IRR is a Newton-Raphson search seeded at 10%, falling back to bisection
//! over a fixed bracket ladder. Anything that does not produce a root is
//! reported as [`Irr::Undefined`].

use crate::error::ValuationError;
use crate::types::Irr;

const NEWTON_GUESS: f64 = 0.10;
const NEWTON_MAX_ITER: usize = 100;
const BISECTION_MAX_ITER: usize = 200;
const RATE_TOLERANCE: f64 = 1e-12;
/// Residual tolerance relative to the gross magnitude of the flows.
const RESIDUAL_TOLERANCE: f64 = 1e-9;

/// Candidate rates scanned for a sign change when Newton fails.
const BRACKET_LADDER: [f64; 14] = [
    -0.999, -0.99, -0.9, -0.5, -0.2, 0.0, 0.1, 0.25, 0.5, 1.0, 2.0, 10.0, 100.0, 1000.0,
];

/// `-initial_investment + Σ cash_flows[t-1] / (1 + rate)^t` for `t = 1..=n`.
pub fn net_present_value(
    initial_investment: f64,
    discount_rate: f64,
    cash_flows: &[f64],
) -> Result<f64, ValuationError> {
    if discount_rate.is_nan() || discount_rate <= -1.0 {
        return Err(ValuationError::DiscountRateDomain(discount_rate));
    }
    let base = 1.0 + discount_rate;
    let mut factor = 1.0;
    let mut npv = -initial_investment;
    for cf in cash_flows {
        factor *= base;
        npv += cf / factor;
    }
    Ok(npv)
}

/// Rate `r` with `Σ flows[t] / (1 + r)^t = 0` over `t = 0..=n`.
pub fn internal_rate_of_return(flows: &[f64]) -> Irr {
    if flows.len() < 2 || flows.iter().any(|f| !f.is_finite()) || !has_sign_change(flows) {
        return Irr::Undefined;
    }
    let scale: f64 = flows.iter().map(|f| f.abs()).sum();
    let tolerance = RESIDUAL_TOLERANCE * scale;

    if let Some(rate) = newton(flows, tolerance) {
        return Irr::Converged(rate);
    }
    match bisection(flows, tolerance) {
        Some(rate) => Irr::Converged(rate),
        None => Irr::Undefined,
    }
}

fn has_sign_change(flows: &[f64]) -> bool {
    let positive = flows.iter().any(|f| *f > 0.0);
    let negative = flows.iter().any(|f| *f < 0.0);
    positive && negative
}

/// Present value at `rate` (period 0 undiscounted) and its derivative.
fn pv_and_derivative(flows: &[f64], rate: f64) -> (f64, f64) {
    let base = 1.0 + rate;
    let mut pv = 0.0;
    let mut dpv = 0.0;
    let mut factor = 1.0;
    for (t, f) in flows.iter().enumerate() {
        pv += f / factor;
        if t > 0 {
            dpv -= t as f64 * f / (factor * base);
        }
        factor *= base;
    }
    (pv, dpv)
}

fn pv(flows: &[f64], rate: f64) -> f64 {
    pv_and_derivative(flows, rate).0
}

fn newton(flows: &[f64], tolerance: f64) -> Option<f64> {
    let mut rate = NEWTON_GUESS;
    for _ in 0..NEWTON_MAX_ITER {
        let (value, slope) = pv_and_derivative(flows, rate);
        if !value.is_finite() || !slope.is_finite() || slope == 0.0 {
            return None;
        }
        let next = rate - value / slope;
        if !next.is_finite() || next <= -1.0 {
            return None;
        }
        if (next - rate).abs() < RATE_TOLERANCE {
            return (pv(flows, next).abs() <= tolerance).then_some(next);
        }
        rate = next;
    }
    (pv(flows, rate).abs() <= tolerance).then_some(rate)
}

fn bisection(flows: &[f64], tolerance: f64) -> Option<f64> {
    let (mut lo, mut hi) = BRACKET_LADDER.windows(2).find_map(|w| {
        let (a, b) = (w[0], w[1]);
        let (fa, fb) = (pv(flows, a), pv(flows, b));
        (fa.is_finite() && fb.is_finite() && fa.signum() != fb.signum()).then_some((a, b))
    })?;

    let mut f_lo = pv(flows, lo);
    for _ in 0..BISECTION_MAX_ITER {
        let mid = 0.5 * (lo + hi);
        let f_mid = pv(flows, mid);
        if f_mid.abs() <= tolerance || (hi - lo) < RATE_TOLERANCE {
            return Some(mid);
        }
        if f_mid.signum() == f_lo.signum() {
            lo = mid;
            f_lo = f_mid;
        } else {
            hi = mid;
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_flows_return_negated_investment() {
        for rate in [-0.5, 0.0, 0.2, 3.0] {
            let npv = net_present_value(-812_500.0, rate, &[0.0; 10]).expect("test: valid rate");
            assert_eq!(npv, 812_500.0);
            let npv = net_present_value(1000.0, rate, &[0.0; 3]).expect("test: valid rate");
            assert_eq!(npv, -1000.0);
        }
    }

    #[test]
    fn npv_discounts_each_period() {
        // -1000 + 600/1.1 + 600/1.21
        let npv = net_present_value(1000.0, 0.10, &[600.0, 600.0]).expect("test: valid rate");
        let expected = -1000.0 + 600.0 / 1.1 + 600.0 / 1.21;
        assert!((npv - expected).abs() < 1e-9);
    }

    #[test]
    fn npv_rejects_rates_at_or_below_minus_one() {
        assert_eq!(
            net_present_value(0.0, -1.0, &[1.0]),
            Err(ValuationError::DiscountRateDomain(-1.0))
        );
        assert!(net_present_value(0.0, -2.5, &[1.0]).is_err());
    }

    #[test]
    fn irr_single_period() {
        match internal_rate_of_return(&[-100.0, 110.0]) {
            Irr::Converged(r) => assert!((r - 0.10).abs() < 1e-9, "irr {r}"),
            Irr::Undefined => panic!("expected a root"),
        }
    }

    #[test]
    fn irr_two_periods_matches_closed_form() {
        // 60x + 60x^2 = 100 with x = 1/(1+r)
        let x = (-1.0 + (1.0_f64 + 4.0 * 100.0 / 60.0).sqrt()) / 2.0;
        let expected = 1.0 / x - 1.0;
        match internal_rate_of_return(&[-100.0, 60.0, 60.0]) {
            Irr::Converged(r) => assert!((r - expected).abs() < 1e-8, "irr {r} vs {expected}"),
            Irr::Undefined => panic!("expected a root"),
        }
    }

    #[test]
    fn irr_without_sign_change_is_undefined() {
        assert_eq!(internal_rate_of_return(&[100.0, 50.0, 25.0]), Irr::Undefined);
        assert_eq!(internal_rate_of_return(&[-100.0, -50.0]), Irr::Undefined);
        assert_eq!(internal_rate_of_return(&[0.0, 0.0]), Irr::Undefined);
        assert_eq!(internal_rate_of_return(&[-5.0]), Irr::Undefined);
        assert_eq!(internal_rate_of_return(&[]), Irr::Undefined);
    }

    #[test]
    fn irr_with_multiple_sign_changes_finds_a_root() {
        // Roots at 10% and 20%.
        let flows = [-100.0, 230.0, -132.0];
        match internal_rate_of_return(&flows) {
            Irr::Converged(r) => {
                assert!((r - 0.10).abs() < 1e-6 || (r - 0.20).abs() < 1e-6, "irr {r}");
            }
            Irr::Undefined => panic!("expected a root"),
        }
    }

    #[test]
    fn irr_no_real_root_is_undefined() {
        // -100 + 50x - 100x^2 has no real root: pv stays negative everywhere.
        assert_eq!(internal_rate_of_return(&[-100.0, 50.0, -100.0]), Irr::Undefined);
    }

    #[test]
    fn irr_of_project_sized_flows() {
        let mut flows = vec![-812_500.0];
        flows.extend(std::iter::repeat(150_000.0).take(9));
        flows.push(674_000.0);
        match internal_rate_of_return(&flows) {
            Irr::Converged(r) => {
                let residual = pv(&flows, r);
                assert!(residual.abs() < 1e-2, "residual {residual}");
                assert!(r > 0.0 && r < 1.0);
            }
            Irr::Undefined => panic!("expected a root"),
        }
    }

    #[test]
    fn irr_serializes_with_explicit_tag() {
        let json = serde_json::to_string(&Irr::Undefined).expect("test: serialize");
        assert_eq!(json, r#"{"status":"undefined"}"#);
        let json = serde_json::to_string(&Irr::Converged(0.5)).expect("test: serialize");
        assert_eq!(json, r#"{"status":"converged","rate":0.5}"#);
    }
}
