// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Project Valuation Simulation Suite - Period Cash Flow
//
// Straight accounting arithmetic. Tax is not floored at zero: a negative
// pretax income produces a tax credit.

use serde::{Deserialize, Serialize};

use crate::config::ScenarioConfig;
use crate::types::{DriverDraws, PeriodBreakdown};

/// Fixed accounting parameters shared by every period of a project.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AccountingParams {
    pub depreciation: f64,
    pub tax_rate: f64,
    pub salvage_value: f64,
}

impl From<&ScenarioConfig> for AccountingParams {
    fn from(config: &ScenarioConfig) -> Self {
        Self {
            depreciation: config.depreciation,
            tax_rate: config.tax_rate,
            salvage_value: config.salvage_value,
        }
    }
}

/// After-tax cash flow of one period and its breakdown.
///
/// `salvage_value` is only credited when `is_terminal` is set.
#[allow(clippy::too_many_arguments)]
pub fn compute_period(
    demand: f64,
    price: f64,
    unit_variable_cost: f64,
    fixed_cost: f64,
    depreciation: f64,
    tax_rate: f64,
    salvage_value: f64,
    is_terminal: bool,
) -> (f64, PeriodBreakdown) {
    let revenue = demand * price;
    let variable_cost = demand * unit_variable_cost;
    let pretax_income = revenue - variable_cost - fixed_cost - depreciation;
    let tax = pretax_income * tax_rate;
    let net_income = pretax_income - tax;

    let salvage_applied = if is_terminal { salvage_value } else { 0.0 };
    let cash_flow = net_income + depreciation + salvage_applied;

    let breakdown = PeriodBreakdown {
        revenue,
        variable_cost,
        pretax_income,
        tax,
        net_income,
        cash_flow,
        salvage_applied,
    };
    (cash_flow, breakdown)
}

/// Full schedule for periods `1..=horizon` with the drivers held constant.
pub fn build_schedule(draws: &DriverDraws, params: &AccountingParams, horizon: u32) -> Vec<PeriodBreakdown> {
    (1..=horizon)
        .map(|period| {
            let (_, breakdown) = compute_period(
                draws.demand,
                draws.unit_price,
                draws.unit_variable_cost,
                draws.fixed_cost,
                params.depreciation,
                params.tax_rate,
                params.salvage_value,
                period == horizon,
            );
            breakdown
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn hand_computed_period() {
        // revenue 10000*26 = 260000, cv 10000*10 = 100000
        // pretax = 260000 - 100000 - 30000 - 14000 = 116000
        // tax = 11600, net = 104400, cash = 118400
        let (cash, b) = compute_period(10_000.0, 26.0, 10.0, 30_000.0, 14_000.0, 0.10, 524_000.0, false);
        assert!(close(b.revenue, 260_000.0));
        assert!(close(b.variable_cost, 100_000.0));
        assert!(close(b.pretax_income, 116_000.0));
        assert!(close(b.tax, 11_600.0));
        assert!(close(b.net_income, 104_400.0));
        assert!(close(cash, 118_400.0));
        assert_eq!(b.salvage_applied, 0.0);
    }

    #[test]
    fn terminal_period_adds_salvage() {
        let (plain, _) = compute_period(10_000.0, 26.0, 10.0, 30_000.0, 14_000.0, 0.10, 524_000.0, false);
        let (last, b) = compute_period(10_000.0, 26.0, 10.0, 30_000.0, 14_000.0, 0.10, 524_000.0, true);
        assert!(close(last - plain, 524_000.0));
        assert_eq!(b.salvage_applied, 524_000.0);
        assert_eq!(b.cash_flow, last);
    }

    #[test]
    fn zero_demand_is_fixed_cost_tax_and_depreciation_only() {
        let fixed = 28_000.0;
        let dep = 14_000.0;
        let tax_rate = 0.10;
        let (cash, b) = compute_period(0.0, 26.48, 9.5, fixed, dep, tax_rate, 0.0, false);
        let expected = -fixed - dep + (fixed + dep) * tax_rate + dep;
        assert!(close(cash, expected), "{cash} vs {expected}");
        // -42000 pretax earns a 4200 credit
        assert!(close(b.tax, -4_200.0));
        assert!(close(cash, -23_800.0));
    }

    #[test]
    fn negative_income_yields_tax_credit() {
        let (_, b) = compute_period(100.0, 1.0, 5.0, 1000.0, 0.0, 0.30, 0.0, false);
        assert!(b.pretax_income < 0.0);
        assert!(b.tax < 0.0);
        assert!(close(b.net_income, b.pretax_income * 0.70));
    }

    #[test]
    fn schedule_marks_only_last_period_terminal() {
        let draws = DriverDraws { demand: 10_000.0, unit_price: 26.0, unit_variable_cost: 10.0, fixed_cost: 30_000.0 };
        let params = AccountingParams { depreciation: 14_000.0, tax_rate: 0.10, salvage_value: 524_000.0 };
        let schedule = build_schedule(&draws, &params, 10);
        assert_eq!(schedule.len(), 10);
        assert!(schedule[..9].iter().all(|p| p.salvage_applied == 0.0));
        assert_eq!(schedule[9].salvage_applied, 524_000.0);
        assert!(close(schedule[0].cash_flow, 118_400.0));
        assert!(close(schedule[9].cash_flow, 642_400.0));
    }

    #[test]
    fn single_period_horizon_is_terminal() {
        let draws = DriverDraws { demand: 1.0, unit_price: 1.0, unit_variable_cost: 0.0, fixed_cost: 0.0 };
        let params = AccountingParams { depreciation: 0.0, tax_rate: 0.0, salvage_value: 5.0 };
        let schedule = build_schedule(&draws, &params, 1);
        assert_eq!(schedule.len(), 1);
        assert!(close(schedule[0].cash_flow, 6.0));
    }
}
