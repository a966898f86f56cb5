//! Commission result models.
//!
//! Every value is kept at full decimal precision; rounding to cents is left
//! to whoever renders the numbers.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{AuditStep, PlanCountSummary, PlanCounts, SplitRates};

/// Which rate model produced a commission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommissionModel {
    /// Percentage of plan value.
    Percentage,
    /// Fixed amount per plan level.
    FixedTable,
    /// Tier rate on whole-run plan counts.
    Tier,
}

/// How a commission is broken down.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CommissionBreakdown {
    /// One amount per period, summed over perfect employees.
    PerPeriod {
        /// Period totals in packet order.
        amounts: Vec<Decimal>,
    },
    /// A single amount for the whole run.
    Aggregate {
        /// The run amount.
        amount: Decimal,
    },
}

/// The commission one agent earns over a run.
///
/// # Example
///
/// ```
/// use commission_engine::models::{CommissionBreakdown, CommissionModel, CommissionResult};
/// use rust_decimal::Decimal;
///
/// let result = CommissionResult::per_period(
///     "Ten",
///     CommissionModel::Percentage,
///     vec![Decimal::from(10), Decimal::from(12)],
/// );
/// assert_eq!(result.grand_total, Decimal::from(22));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommissionResult {
    /// The agent's name.
    pub agent_name: String,
    /// The rate model used.
    pub model: CommissionModel,
    /// Per-period or aggregate amounts.
    pub breakdown: CommissionBreakdown,
    /// The total over the run.
    pub grand_total: Decimal,
}

impl CommissionResult {
    /// Builds a per-period result; the grand total is the sum of the periods.
    pub fn per_period(agent_name: &str, model: CommissionModel, amounts: Vec<Decimal>) -> Self {
        let grand_total = amounts.iter().copied().sum();
        Self {
            agent_name: agent_name.to_string(),
            model,
            breakdown: CommissionBreakdown::PerPeriod { amounts },
            grand_total,
        }
    }

    /// Builds an aggregate result.
    pub fn aggregate(agent_name: &str, model: CommissionModel, amount: Decimal) -> Self {
        Self {
            agent_name: agent_name.to_string(),
            model,
            breakdown: CommissionBreakdown::Aggregate { amount },
            grand_total: amount,
        }
    }
}

/// The tier commission for one agent, with its audit step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierCommission {
    /// Agent name.
    pub agent_name: String,
    /// Tier code used.
    pub tier_code: String,
    /// Whether the tier code was found in the rate table.
    pub known_tier: bool,
    /// Commission amount; zero for an unknown tier.
    pub amount: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// The override a main agent earns on one sub-agent's book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverrideCommission {
    /// Sub-agent name.
    pub sub_agent: String,
    /// Sub-agent tier code.
    pub sub_tier_code: String,
    /// Override amount; zero if either tier is unknown.
    pub amount: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// The full breakdown for a tier group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierGroupResult {
    /// Group name.
    pub group_name: String,
    /// Perfect employees per plan level over the whole run.
    pub plan_counts: PlanCounts,
    /// Each sub-agent's own tier commission.
    pub sub_agents: Vec<TierCommission>,
    /// The main agent's own tier commission.
    pub main: TierCommission,
    /// The main agent's override on each sub-agent.
    pub overrides: Vec<OverrideCommission>,
    /// Sum of every sub-agent's own commission.
    pub sub_agent_total: Decimal,
    /// Sum of every override.
    pub override_total: Decimal,
    /// Main agent's own commission plus overrides.
    pub main_total: Decimal,
    /// Sub-agent total plus main total.
    pub grand_total: Decimal,
}

/// One agent's line on a downline sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownlineAgentCommission {
    /// Agent name.
    pub agent_name: String,
    /// Rates applied.
    pub rates: SplitRates,
    /// Whether the client's period-count rates replaced the agent's own.
    pub period_count_override: bool,
    /// Commission amount.
    pub amount: Decimal,
}

/// All agent lines for one downline client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownlineClientCommission {
    /// Client name.
    pub client_name: String,
    /// Agent lines in roster order.
    pub agents: Vec<DownlineAgentCommission>,
    /// Sum of the agent lines.
    pub total: Decimal,
}

/// Downline commissions for a roster over one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownlineResult {
    /// Roster title.
    pub roster_title: String,
    /// Plan 1000 and other-plan employee counts.
    pub summary: PlanCountSummary,
    /// Number of packets the run covered.
    pub period_count: usize,
    /// Client sections in roster order.
    pub clients: Vec<DownlineClientCommission>,
    /// Sum over every client.
    pub grand_total: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_per_period_grand_total_is_sum() {
        let result = CommissionResult::per_period(
            "Charles",
            CommissionModel::FixedTable,
            vec![dec("3.46"), dec("3.46"), dec("1.15")],
        );
        assert_eq!(result.grand_total, dec("8.07"));
    }

    #[test]
    fn test_aggregate_grand_total_is_amount() {
        let result = CommissionResult::aggregate("Main", CommissionModel::Tier, dec("239"));
        assert_eq!(result.grand_total, dec("239"));
        assert_eq!(
            result.breakdown,
            CommissionBreakdown::Aggregate { amount: dec("239") }
        );
    }

    #[test]
    fn test_breakdown_serialization_is_tagged() {
        let result = CommissionResult::per_period("Ten", CommissionModel::Percentage, vec![]);
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["model"], "percentage");
        assert_eq!(json["breakdown"]["kind"], "per_period");
        assert_eq!(json["grand_total"], "0");
    }
}
