//! Fixed-table commission.

use rust_decimal::Decimal;

use super::percentage_commission::monthly_to_period;
use super::plan_classification::classify_nearest;
use crate::config::PlanRateTable;
use crate::models::{EmployeeAttendance, FixedTableAgent, PayFrequency, RateBasis};

/// Commission on one period's deduction for a fixed-table agent.
///
/// The deduction is labelled with the nearest-form classifier and priced
/// from the agent's table. Monthly tables are scaled by `12 / divisor`.
///
/// # Example
///
/// ```
/// use commission_engine::calculation::fixed_table_period_commission;
/// use commission_engine::config::PlanRateTable;
/// use commission_engine::models::{FixedTableAgent, PayFrequency};
/// use rust_decimal::Decimal;
///
/// let harry = &FixedTableAgent::standard_roster()[1];
/// let commission = fixed_table_period_commission(
///     harry,
///     Decimal::from(1600),
///     PayFrequency::Monthly,
///     12,
///     &PlanRateTable::standard(),
/// );
/// assert_eq!(commission, Decimal::from(97));
/// ```
pub fn fixed_table_period_commission(
    agent: &FixedTableAgent,
    deduction: Decimal,
    frequency: PayFrequency,
    divisor: u32,
    table: &PlanRateTable,
) -> Decimal {
    let Some(level) = classify_nearest(deduction, frequency, table) else {
        return Decimal::ZERO;
    };

    let rate = agent.rates.get(level);
    match agent.basis {
        RateBasis::Monthly => monthly_to_period(rate, divisor),
        RateBasis::PerPeriod => rate,
    }
}

/// Per-period commissions for one employee under a fixed-table agent.
pub fn employee_fixed_table_commissions(
    agent: &FixedTableAgent,
    employee: &EmployeeAttendance,
    frequency: PayFrequency,
    divisor: u32,
    table: &PlanRateTable,
) -> Vec<Decimal> {
    employee
        .payments
        .iter()
        .map(|&deduction| fixed_table_period_commission(agent, deduction, frequency, divisor, table))
        .collect()
}
