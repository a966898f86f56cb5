//! Core data models for the commission engine.
//!
//! This module contains all the domain models used throughout the engine.

mod agent;
mod attendance;
mod audit;
mod commission;
mod downline;
mod frequency;
mod packet;
mod plan;
mod report;

pub use agent::{AgentConfig, FixedTableAgent, PercentageAgent, RateBasis, TierAgent, TierGroup};
pub use attendance::{AttendanceStatus, EmployeeAttendance, Reconciliation};
pub use audit::{
    AuditStep, AuditWarning, WARN_DUPLICATE_EMPLOYEE, WARN_FREQUENCY_DEFAULTED,
    WARN_MIXED_FREQUENCY, WARN_PAYMENTS_MISMATCH, WARN_PLAN_FALLBACK, WARN_TIER_NOT_LOWER,
    WARN_UNCLASSIFIED_PLAN, WARN_UNKNOWN_CLIENT, WARN_UNKNOWN_TIER, WarningSeverity,
};
pub use commission::{
    CommissionBreakdown, CommissionModel, CommissionResult, DownlineAgentCommission,
    DownlineClientCommission, DownlineResult, OverrideCommission, TierCommission,
    TierGroupResult,
};
pub use downline::{DownlineAgent, DownlineClient, DownlineRoster, SplitRates};
pub use frequency::PayFrequency;
pub use packet::{PeriodPacket, packets_in_order};
pub use plan::{PlanCountSummary, PlanCounts, PlanLevel, PlanRates};
pub use report::{
    AgentTotal, COMMISSIONS_SHEET, Cell, CellRange, CellRef, CellValue, DOWNLINE_SHEET,
    NoDataReason, ReportModel, ReportOutcome, RunSummary, Sheet, SheetKind, TIER_SUMMARY_SHEET,
    UNPAID_SHEET,
};
