//! Plan counting over perfect employees.
//!
//! Tier commissions count each perfect employee once at its own plan level.
//! Downline commissions instead split perfect employees into a 1000 bucket
//! and an other-plans bucket using the per-period labels.

use tracing::{debug, warn};

use super::plan_classification::{classify_nearest, match_nearest};
use crate::config::PlanRateTable;
use crate::models::{
    AuditWarning, EmployeeAttendance, PayFrequency, PlanCountSummary, PlanCounts, PlanLevel,
    Reconciliation, WARN_PLAN_FALLBACK, WarningSeverity,
};

/// The nearest-form label for each of an employee's payments.
///
/// Zero payments are `None`; every nonzero payment gets a label.
pub fn period_plan_labels(
    attendance: &EmployeeAttendance,
    frequency: PayFrequency,
    table: &PlanRateTable,
) -> Vec<Option<PlanLevel>> {
    attendance
        .payments
        .iter()
        .map(|&amount| classify_nearest(amount, frequency, table))
        .collect()
}

/// Flags every paid period of a perfect employee that only classified to
/// the 1000 plan by fallback.
///
/// Those periods are still paid at the 1000 plan; each one is logged and
/// returned as a warning.
pub fn nearest_fallback_warnings(
    reconciliation: &Reconciliation,
    table: &PlanRateTable,
) -> Vec<AuditWarning> {
    let mut warnings = Vec::new();

    for employee in &reconciliation.perfect {
        for (period, &amount) in employee.payments.iter().enumerate() {
            let fallback = match_nearest(amount, reconciliation.frequency, table)
                .is_some_and(|matched| matched.fallback);
            if !fallback {
                continue;
            }

            let period_date = reconciliation.period_dates.get(period);
            warn!(
                employee_id = %employee.employee_id,
                period,
                period_date = ?period_date,
                %amount,
                frequency = %reconciliation.frequency,
                "Payment matched no plan amount; priced as Plan 1000"
            );
            let when = match period_date {
                Some(date) => date.format("%m/%d/%Y").to_string(),
                None => format!("period {}", period + 1),
            };
            warnings.push(AuditWarning::new(
                WARN_PLAN_FALLBACK,
                format!(
                    "Employee '{}' payment {} on {} matched no {} plan amount and was paid as Plan 1000",
                    employee.employee_id, amount, when, reconciliation.frequency
                ),
                WarningSeverity::Medium,
            ));
        }
    }

    warnings
}

/// Counts perfect employees at each plan level for tier commissions.
///
/// Employees whose first payment was unclassified are not counted.
///
/// # Example
///
/// ```
/// use commission_engine::calculation::plan_counts;
/// use commission_engine::models::{
///     AttendanceStatus, EmployeeAttendance, PayFrequency, PlanLevel, Reconciliation,
/// };
///
/// let employee = |id: &str, level| EmployeeAttendance {
///     employee_id: id.to_string(),
///     payments: vec![],
///     status: AttendanceStatus::Perfect,
///     plan_level: level,
///     missed_periods: vec![],
/// };
/// let reconciliation = Reconciliation {
///     frequency: PayFrequency::Weekly,
///     divisor: 52,
///     period_dates: vec![],
///     perfect: vec![
///         employee("1", Some(PlanLevel::Plan1600)),
///         employee("2", Some(PlanLevel::Plan1600)),
///         employee("3", None),
///     ],
///     imperfect: vec![],
/// };
///
/// let counts = plan_counts(&reconciliation);
/// assert_eq!(counts.get(PlanLevel::Plan1600), 2);
/// assert_eq!(counts.total(), 2);
/// ```
pub fn plan_counts(reconciliation: &Reconciliation) -> PlanCounts {
    let mut counts = PlanCounts::default();
    for level in reconciliation
        .perfect
        .iter()
        .filter_map(|employee| employee.plan_level)
    {
        counts.increment(level);
    }
    debug!(?counts, "Counted perfect employees by plan level");
    counts
}

/// Splits perfect employees into the 1000 and other-plans buckets.
///
/// An employee counts toward `plan_1000` if any period is labelled 1000, and
/// toward `other_plans` if no period is 1000 and at least one is 1200, 1400
/// or 1600.
pub fn summarize_plan_labels(
    reconciliation: &Reconciliation,
    table: &PlanRateTable,
) -> PlanCountSummary {
    let mut summary = PlanCountSummary::default();

    for employee in &reconciliation.perfect {
        let labels = period_plan_labels(employee, reconciliation.frequency, table);
        if labels.contains(&Some(PlanLevel::Plan1000)) {
            summary.plan_1000 += 1;
        } else if labels.iter().any(Option::is_some) {
            summary.other_plans += 1;
        }
    }

    debug!(
        plan_1000 = summary.plan_1000,
        other_plans = summary.other_plans,
        "Summarized plan labels"
    );
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AttendanceStatus;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn employee(id: &str, payments: &[&str], level: Option<PlanLevel>) -> EmployeeAttendance {
        EmployeeAttendance {
            employee_id: id.to_string(),
            payments: payments.iter().map(|p| dec(p)).collect(),
            status: AttendanceStatus::Perfect,
            plan_level: level,
            missed_periods: vec![],
        }
    }

    fn reconciliation(perfect: Vec<EmployeeAttendance>) -> Reconciliation {
        Reconciliation {
            frequency: PayFrequency::Weekly,
            divisor: 52,
            period_dates: vec![],
            perfect,
            imperfect: vec![employee("x", &["0", "369.23"], Some(PlanLevel::Plan1600))],
        }
    }

    #[test]
    fn test_period_labels_use_nearest_form() {
        let e = employee("1", &["369.23", "0", "323.08", "12.00"], None);
        let labels = period_plan_labels(&e, PayFrequency::Weekly, &PlanRateTable::standard());

        assert_eq!(
            labels,
            vec![
                Some(PlanLevel::Plan1600),
                None,
                Some(PlanLevel::Plan1400),
                Some(PlanLevel::Plan1000),
            ]
        );
    }

    /// PN-001: tier counts ignore imperfect and unclassified employees
    #[test]
    fn test_plan_counts_only_perfect_and_classified() {
        let r = reconciliation(vec![
            employee("1", &["369.23"], Some(PlanLevel::Plan1600)),
            employee("2", &["276.92"], Some(PlanLevel::Plan1200)),
            employee("3", &["50"], None),
        ]);

        let counts = plan_counts(&r);

        assert_eq!(counts.get(PlanLevel::Plan1600), 1);
        assert_eq!(counts.get(PlanLevel::Plan1200), 1);
        assert_eq!(counts.total(), 2);
    }

    /// PN-002: any 1000 period puts the employee in the 1000 bucket
    #[test]
    fn test_summary_any_1000_period_counts_as_1000() {
        let r = reconciliation(vec![
            employee("1", &["369.23", "230.77"], Some(PlanLevel::Plan1600)),
            employee("2", &["369.23", "369.23"], Some(PlanLevel::Plan1600)),
            employee("3", &["323.08", "276.92"], Some(PlanLevel::Plan1400)),
        ]);

        let summary = summarize_plan_labels(&r, &PlanRateTable::standard());

        assert_eq!(summary.plan_1000, 1);
        assert_eq!(summary.other_plans, 2);
    }

    /// PN-003: an unmatched amount labels as 1000
    #[test]
    fn test_summary_unmatched_amount_counts_as_1000() {
        let r = reconciliation(vec![employee("1", &["50.00"], None)]);

        let summary = summarize_plan_labels(&r, &PlanRateTable::standard());

        assert_eq!(summary.plan_1000, 1);
        assert_eq!(summary.other_plans, 0);
    }

    #[test]
    fn test_empty_reconciliation_counts_nothing() {
        let r = reconciliation(vec![]);
        assert_eq!(plan_counts(&r), PlanCounts::default());
        assert_eq!(
            summarize_plan_labels(&r, &PlanRateTable::standard()),
            PlanCountSummary::default()
        );
    }

    /// PN-004: a paid period priced by the 1000 fallback is flagged once
    #[test]
    fn test_fallback_periods_are_flagged() {
        let r = reconciliation(vec![
            employee("1", &["369.23", "100", "369.23"], Some(PlanLevel::Plan1600)),
            employee("2", &["230.77", "230.77", "230.77"], Some(PlanLevel::Plan1000)),
        ]);

        let warnings = nearest_fallback_warnings(&r, &PlanRateTable::standard());

        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].code, WARN_PLAN_FALLBACK);
        assert!(warnings[0].message.contains("'1'"));
        assert!(warnings[0].message.contains("period 2"));
    }
}
