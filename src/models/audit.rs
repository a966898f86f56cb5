//! Audit records attached to calculation results.

use serde::{Deserialize, Serialize};

/// A single step in the audit trail recording a calculation decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// How much attention a warning needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningSeverity {
    /// Informational.
    Low,
    /// A value fell back to a default.
    Medium,
    /// A configured value contributed nothing.
    High,
}

/// A degradation recorded during a run.
///
/// Warnings never stop a run; they mark every place a lookup missed and a
/// default was used instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level.
    pub severity: WarningSeverity,
}

impl AuditWarning {
    /// Creates a warning.
    pub fn new(code: &str, message: impl Into<String>, severity: WarningSeverity) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
            severity,
        }
    }
}

/// Frequency could not be matched and fell back to weekly.
pub const WARN_FREQUENCY_DEFAULTED: &str = "FREQUENCY_DEFAULTED";
/// An employee's first nonzero payment matched no ladder threshold.
pub const WARN_UNCLASSIFIED_PLAN: &str = "UNCLASSIFIED_PLAN";
/// An employee id appeared more than once in one packet.
pub const WARN_DUPLICATE_EMPLOYEE: &str = "DUPLICATE_EMPLOYEE_ID";
/// A tier code has no entry in the tier rate table.
pub const WARN_UNKNOWN_TIER: &str = "UNKNOWN_TIER_CODE";
/// A sub-agent's tier is not below its main agent's tier.
pub const WARN_TIER_NOT_LOWER: &str = "SUB_TIER_NOT_LOWER";
/// A downline client filter matched no client.
pub const WARN_UNKNOWN_CLIENT: &str = "UNKNOWN_DOWNLINE_CLIENT";
/// A paid period matched no canonical amount and was priced as the 1000 plan.
pub const WARN_PLAN_FALLBACK: &str = "PLAN_FALLBACK_1000";
/// An employee's payments did not line up with the run's periods.
pub const WARN_PAYMENTS_MISMATCH: &str = "PAYMENTS_LENGTH_MISMATCH";
/// Packets in one run disagree on frequency.
pub const WARN_MIXED_FREQUENCY: &str = "MIXED_FREQUENCY";
