//! Percentage-of-plan commission.

use rust_decimal::Decimal;

use super::plan_classification::classify_nearest;
use crate::config::PlanRateTable;
use crate::models::{EmployeeAttendance, PayFrequency, PercentageAgent};

/// Converts a monthly amount into a per-period amount: `monthly × 12 / divisor`.
///
/// A zero divisor yields zero.
pub fn monthly_to_period(monthly: Decimal, divisor: u32) -> Decimal {
    (monthly * Decimal::from(12))
        .checked_div(Decimal::from(divisor))
        .unwrap_or(Decimal::ZERO)
}

/// Commission on one period's deduction for a percentage agent.
///
/// The deduction is labelled with the nearest-form classifier, and the
/// agent earns `percent_of_plan` of that plan's monthly value, scaled to the
/// period. A zero deduction earns nothing.
///
/// # Example
///
/// ```
/// use commission_engine::calculation::percentage_period_commission;
/// use commission_engine::config::PlanRateTable;
/// use commission_engine::models::{PayFrequency, PercentageAgent};
/// use rust_decimal::Decimal;
///
/// let agent = PercentageAgent {
///     name: "Ten".to_string(),
///     percent_of_plan: Decimal::from(10),
/// };
/// let commission = percentage_period_commission(
///     &agent,
///     Decimal::new(36923, 2),
///     PayFrequency::Weekly,
///     52,
///     &PlanRateTable::standard(),
/// );
/// assert_eq!(commission.round_dp(2), Decimal::new(3692, 2));
/// ```
pub fn percentage_period_commission(
    agent: &PercentageAgent,
    deduction: Decimal,
    frequency: PayFrequency,
    divisor: u32,
    table: &PlanRateTable,
) -> Decimal {
    match classify_nearest(deduction, frequency, table) {
        Some(level) => {
            let monthly = level.monthly_value() * agent.percent_of_plan / Decimal::ONE_HUNDRED;
            monthly_to_period(monthly, divisor)
        }
        None => Decimal::ZERO,
    }
}

/// Per-period commissions for one employee under a percentage agent.
pub fn employee_percentage_commissions(
    agent: &PercentageAgent,
    employee: &EmployeeAttendance,
    frequency: PayFrequency,
    divisor: u32,
    table: &PlanRateTable,
) -> Vec<Decimal> {
    employee
        .payments
        .iter()
        .map(|&deduction| percentage_period_commission(agent, deduction, frequency, divisor, table))
        .collect()
}
