//! Employee attendance models produced by reconciliation.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{PayFrequency, PlanLevel};

/// Whether an employee paid in every period of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    /// Nonzero deduction in every period.
    Perfect,
    /// At least one zero or absent period.
    Imperfect,
}

/// One employee's payments across every packet of a run.
///
/// # Example
///
/// ```
/// use commission_engine::models::{AttendanceStatus, EmployeeAttendance, PlanLevel};
/// use rust_decimal::Decimal;
///
/// let attendance = EmployeeAttendance {
///     employee_id: "111".to_string(),
///     payments: vec![Decimal::new(36923, 2); 3],
///     status: AttendanceStatus::Perfect,
///     plan_level: Some(PlanLevel::Plan1600),
///     missed_periods: vec![],
/// };
/// assert!(attendance.is_perfect());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeAttendance {
    /// The employee id.
    pub employee_id: String,
    /// Signed payment per packet, in packet order; zero where absent.
    pub payments: Vec<Decimal>,
    /// Perfect or imperfect.
    pub status: AttendanceStatus,
    /// Plan level from the first nonzero payment; `None` if unclassified.
    pub plan_level: Option<PlanLevel>,
    /// Dates of every zero or absent period.
    pub missed_periods: Vec<NaiveDate>,
}

impl EmployeeAttendance {
    /// Returns true for perfect attendance.
    pub fn is_perfect(&self) -> bool {
        self.status == AttendanceStatus::Perfect
    }

    /// The first nonzero payment, in period order.
    pub fn first_nonzero_payment(&self) -> Option<Decimal> {
        self.payments.iter().copied().find(|amount| !amount.is_zero())
    }
}

/// The reconciled attendance for a whole run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reconciliation {
    /// Frequency every classification in the run uses.
    pub frequency: PayFrequency,
    /// Pay periods per year for `frequency`.
    pub divisor: u32,
    /// Period dates in packet order.
    pub period_dates: Vec<NaiveDate>,
    /// Perfect employees, sorted by plan level descending then id.
    pub perfect: Vec<EmployeeAttendance>,
    /// Imperfect employees, sorted by id.
    pub imperfect: Vec<EmployeeAttendance>,
}

impl Reconciliation {
    /// Number of distinct employee ids across all packets.
    pub fn total_employees(&self) -> usize {
        self.perfect.len() + self.imperfect.len()
    }

    /// Returns true when no employee ids were observed.
    pub fn is_empty(&self) -> bool {
        self.total_employees() == 0
    }

    /// Number of packets reconciled.
    pub fn period_count(&self) -> usize {
        self.period_dates.len()
    }
}
