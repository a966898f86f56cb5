//! Employee reconciliation across period packets.
//!
//! Every employee id seen in any packet gets one payment per packet, zero
//! where the id is absent. An employee is perfect only if every payment is
//! nonzero; the plan level comes from the first nonzero payment alone.

use std::collections::BTreeSet;

use tracing::{debug, info, warn};

use super::plan_classification::classify_by_threshold;
use crate::config::ThresholdLadder;
use crate::models::{
    AttendanceStatus, AuditWarning, EmployeeAttendance, PayFrequency, PeriodPacket,
    Reconciliation, WARN_MIXED_FREQUENCY, WARN_UNCLASSIFIED_PLAN, WarningSeverity,
};

/// The result of reconciling a run, including any warnings raised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconciliationResult {
    /// The reconciled attendance.
    pub reconciliation: Reconciliation,
    /// Degradations found while reconciling.
    pub warnings: Vec<AuditWarning>,
}

/// Reconciles packets, given in ascending period order, into attendance records.
///
/// The run frequency is the first packet's frequency; zero packets yield an
/// empty weekly reconciliation.
///
/// # Example
///
/// ```
/// use commission_engine::calculation::reconcile_employees;
/// use commission_engine::config::ThresholdLadder;
/// use commission_engine::models::{PayFrequency, PeriodPacket, PlanLevel};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
/// use std::collections::BTreeMap;
///
/// let packets: Vec<PeriodPacket> = [7, 14, 21]
///     .into_iter()
///     .map(|day| {
///         let mut deductions = BTreeMap::new();
///         deductions.insert("111".to_string(), Decimal::new(36923, 2));
///         PeriodPacket::new(
///             NaiveDate::from_ymd_opt(2025, 12, day).unwrap(),
///             PayFrequency::Weekly,
///             deductions,
///         )
///         .unwrap()
///     })
///     .collect();
///
/// let result = reconcile_employees(&packets, &ThresholdLadder::standard());
/// let employee = &result.reconciliation.perfect[0];
/// assert_eq!(employee.plan_level, Some(PlanLevel::Plan1600));
/// assert_eq!(employee.payments.len(), 3);
/// ```
pub fn reconcile_employees(
    packets: &[PeriodPacket],
    ladder: &ThresholdLadder,
) -> ReconciliationResult {
    let mut warnings = Vec::new();

    let frequency = packets
        .first()
        .map(PeriodPacket::frequency)
        .unwrap_or(PayFrequency::Weekly);
    let divisor = packets.first().map(PeriodPacket::divisor).unwrap_or(52);

    for packet in packets.iter().filter(|p| p.frequency() != frequency) {
        warn!(
            period_date = %packet.period_date(),
            packet_frequency = %packet.frequency(),
            run_frequency = %frequency,
            "Packet frequency differs from run frequency"
        );
        warnings.push(AuditWarning::new(
            WARN_MIXED_FREQUENCY,
            format!(
                "Period {} is {} but the run is classified as {}",
                packet.period_date(),
                packet.frequency(),
                frequency
            ),
            WarningSeverity::Low,
        ));
    }

    let employee_ids: BTreeSet<&str> = packets
        .iter()
        .flat_map(PeriodPacket::employee_ids)
        .collect();

    let mut perfect = Vec::new();
    let mut imperfect = Vec::new();

    for employee_id in employee_ids {
        let payments: Vec<_> = packets.iter().map(|p| p.amount(employee_id)).collect();
        let missed_periods: Vec<_> = packets
            .iter()
            .filter(|p| !p.is_paid(employee_id))
            .map(PeriodPacket::period_date)
            .collect();

        let status = if missed_periods.is_empty() {
            AttendanceStatus::Perfect
        } else {
            AttendanceStatus::Imperfect
        };

        let mut attendance = EmployeeAttendance {
            employee_id: employee_id.to_string(),
            payments,
            status,
            plan_level: None,
            missed_periods,
        };
        let first_payment = attendance.first_nonzero_payment();
        attendance.plan_level =
            first_payment.and_then(|amount| classify_by_threshold(amount, frequency, ladder));

        match status {
            AttendanceStatus::Perfect => {
                if attendance.plan_level.is_none() {
                    warn!(
                        employee_id,
                        first_payment = ?first_payment,
                        %frequency,
                        "First payment is below every plan threshold"
                    );
                    warnings.push(AuditWarning::new(
                        WARN_UNCLASSIFIED_PLAN,
                        format!(
                            "Employee '{}' first payment {} is below every {} threshold",
                            employee_id,
                            first_payment.unwrap_or_default(),
                            frequency
                        ),
                        WarningSeverity::Medium,
                    ));
                }
                perfect.push(attendance);
            }
            AttendanceStatus::Imperfect => imperfect.push(attendance),
        }
    }

    perfect.sort_by(|a, b| {
        b.plan_level
            .cmp(&a.plan_level)
            .then_with(|| a.employee_id.cmp(&b.employee_id))
    });
    imperfect.sort_by(|a, b| a.employee_id.cmp(&b.employee_id));

    info!(
        packets = packets.len(),
        perfect = perfect.len(),
        imperfect = imperfect.len(),
        %frequency,
        "Reconciled employees"
    );
    debug!(divisor, "Run divisor");

    ReconciliationResult {
        reconciliation: Reconciliation {
            frequency,
            divisor,
            period_dates: packets.iter().map(PeriodPacket::period_date).collect(),
            perfect,
            imperfect,
        },
        warnings,
    }
}
