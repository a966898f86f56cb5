//! Tier-count commission and overrides.
//!
//! Tier agents are paid on the count of perfect employees at each plan level
//! across the whole run, priced from the shared tier rate table. A main agent
//! also earns the spread between its own tier and each sub-agent's tier on
//! the same counts.

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::config::TierRateTable;
use crate::models::{
    AuditStep, AuditWarning, OverrideCommission, PlanCounts, PlanRates, TierAgent,
    TierCommission, TierGroup, TierGroupResult, WARN_TIER_NOT_LOWER, WARN_UNKNOWN_TIER,
    WarningSeverity,
};

/// The tier group breakdown along with any warnings raised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TierGroupCalculation {
    /// The full breakdown.
    pub result: TierGroupResult,
    /// Unknown tiers and tier ordering problems.
    pub warnings: Vec<AuditWarning>,
}

/// `Σ count[level] × rate[level]` over every plan level.
pub fn priced_counts(counts: &PlanCounts, rates: &PlanRates) -> Decimal {
    rates
        .iter()
        .map(|(level, rate)| Decimal::from(counts.get(level)) * rate)
        .sum()
}

/// Computes a tier agent's own commission on the run's plan counts.
///
/// An unknown tier code earns zero and is flagged with `known_tier = false`.
///
/// # Example
///
/// ```
/// use commission_engine::calculation::calculate_tier_commission;
/// use commission_engine::config::TierRateTable;
/// use commission_engine::models::{PlanCounts, TierAgent};
/// use rust_decimal::Decimal;
///
/// let counts = PlanCounts { plan_1600: 2, plan_1400: 0, plan_1200: 0, plan_1000: 1 };
/// let agent = TierAgent { name: "Main".to_string(), tier_code: "70".to_string() };
///
/// let commission = calculate_tier_commission(&agent, &counts, &TierRateTable::standard(), 1);
/// assert_eq!(commission.amount, Decimal::from(239));
/// ```
pub fn calculate_tier_commission(
    agent: &TierAgent,
    counts: &PlanCounts,
    tiers: &TierRateTable,
    step_number: u32,
) -> TierCommission {
    let rates = tiers.get(&agent.tier_code);
    let amount = rates
        .map(|rates| priced_counts(counts, rates))
        .unwrap_or(Decimal::ZERO);

    let reasoning = match rates {
        Some(rates) => format!(
            "{} x {} + {} x {} + {} x {} + {} x {} = {}",
            counts.plan_1600,
            rates.plan_1600,
            counts.plan_1400,
            rates.plan_1400,
            counts.plan_1200,
            rates.plan_1200,
            counts.plan_1000,
            rates.plan_1000,
            amount
        ),
        None => format!("Tier code '{}' not found; commission is 0", agent.tier_code),
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "tier_commission".to_string(),
        rule_name: "Tier Commission".to_string(),
        input: serde_json::json!({
            "agent": agent.name,
            "tier_code": agent.tier_code,
            "plan_counts": counts,
        }),
        output: serde_json::json!({
            "commission": amount.to_string(),
            "known_tier": rates.is_some(),
        }),
        reasoning,
    };

    TierCommission {
        agent_name: agent.name.clone(),
        tier_code: agent.tier_code.clone(),
        known_tier: rates.is_some(),
        amount,
        audit_step,
    }
}

/// Computes the override a main agent earns on a sub-agent's book.
///
/// `Σ count[level] × (rate_main[level] − rate_sub[level])`; zero if either
/// tier code is unknown. A sub tier that is not lower than the main tier
/// yields a zero or negative override, exactly as the formula gives.
pub fn calculate_override_commission(
    main: &TierAgent,
    sub_agent: &TierAgent,
    counts: &PlanCounts,
    tiers: &TierRateTable,
    step_number: u32,
) -> OverrideCommission {
    let spread = tiers
        .get(&main.tier_code)
        .zip(tiers.get(&sub_agent.tier_code))
        .map(|(main_rates, sub_rates)| {
            PlanRates::new(
                main_rates.plan_1600 - sub_rates.plan_1600,
                main_rates.plan_1400 - sub_rates.plan_1400,
                main_rates.plan_1200 - sub_rates.plan_1200,
                main_rates.plan_1000 - sub_rates.plan_1000,
            )
        });

    let amount = spread
        .map(|spread| priced_counts(counts, &spread))
        .unwrap_or(Decimal::ZERO);

    let reasoning = match spread {
        Some(spread) => format!(
            "Spread {}/{}/{}/{} between tier {} and tier {} on {} employees = {}",
            spread.plan_1600,
            spread.plan_1400,
            spread.plan_1200,
            spread.plan_1000,
            main.tier_code,
            sub_agent.tier_code,
            counts.total(),
            amount
        ),
        None => format!(
            "Tier {} or tier {} not found; override is 0",
            main.tier_code, sub_agent.tier_code
        ),
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "override_commission".to_string(),
        rule_name: "Override Commission".to_string(),
        input: serde_json::json!({
            "main_tier": main.tier_code,
            "sub_tier": sub_agent.tier_code,
            "plan_counts": counts,
        }),
        output: serde_json::json!({
            "override": amount.to_string(),
        }),
        reasoning,
    };

    OverrideCommission {
        sub_agent: sub_agent.name.clone(),
        sub_tier_code: sub_agent.tier_code.clone(),
        amount,
        audit_step,
    }
}

fn tier_rank(tier_code: &str) -> Option<Decimal> {
    tier_code.trim().parse().ok()
}

/// Logs and records an unknown tier code once per agent.
pub(crate) fn check_known_tier(
    agent: &TierAgent,
    tiers: &TierRateTable,
    warnings: &mut Vec<AuditWarning>,
) {
    if !tiers.is_known_tier(&agent.tier_code) {
        warn!(
            agent = %agent.name,
            tier_code = %agent.tier_code,
            "Unknown tier code; commission is zero"
        );
        warnings.push(AuditWarning::new(
            WARN_UNKNOWN_TIER,
            format!(
                "Tier code '{}' for agent '{}' not found; commission is 0",
                agent.tier_code, agent.name
            ),
            WarningSeverity::High,
        ));
    }
}

/// Computes the full breakdown for a main agent and its sub-agents.
///
/// The main total is the main agent's own commission plus every override;
/// the grand total adds every sub-agent's own commission.
pub fn calculate_tier_group(
    group: &TierGroup,
    counts: &PlanCounts,
    tiers: &TierRateTable,
) -> TierGroupCalculation {
    let mut warnings = Vec::new();
    let mut step_number = 1;

    check_known_tier(&group.main, tiers, &mut warnings);
    let main_rank = tier_rank(&group.main.tier_code);
    for sub_agent in &group.sub_agents {
        check_known_tier(sub_agent, tiers, &mut warnings);

        let not_lower = match (main_rank, tier_rank(&sub_agent.tier_code)) {
            (Some(main_rank), Some(sub_rank)) => sub_rank >= main_rank,
            _ => false,
        };
        if not_lower {
            warn!(
                group = %group.name,
                main_tier = %group.main.tier_code,
                sub_agent = %sub_agent.name,
                sub_tier = %sub_agent.tier_code,
                "Sub-agent tier is not lower than main tier"
            );
            warnings.push(AuditWarning::new(
                WARN_TIER_NOT_LOWER,
                format!(
                    "Sub-agent '{}' tier {} is not lower than main tier {}",
                    sub_agent.name, sub_agent.tier_code, group.main.tier_code
                ),
                WarningSeverity::Medium,
            ));
        }
    }

    let mut sub_agents = Vec::with_capacity(group.sub_agents.len());
    for sub_agent in &group.sub_agents {
        sub_agents.push(calculate_tier_commission(sub_agent, counts, tiers, step_number));
        step_number += 1;
    }

    let main = calculate_tier_commission(&group.main, counts, tiers, step_number);
    step_number += 1;

    let mut overrides = Vec::with_capacity(group.sub_agents.len());
    for sub_agent in &group.sub_agents {
        overrides.push(calculate_override_commission(
            &group.main,
            sub_agent,
            counts,
            tiers,
            step_number,
        ));
        step_number += 1;
    }

    let sub_agent_total: Decimal = sub_agents.iter().map(|c| c.amount).sum();
    let override_total: Decimal = overrides.iter().map(|o| o.amount).sum();
    let main_total = main.amount + override_total;
    let grand_total = sub_agent_total + main_total;

    debug!(
        group = %group.name,
        %sub_agent_total,
        %override_total,
        %main_total,
        %grand_total,
        "Calculated tier group"
    );

    TierGroupCalculation {
        result: TierGroupResult {
            group_name: group.name.clone(),
            plan_counts: *counts,
            sub_agents,
            main,
            overrides,
            sub_agent_total,
            override_total,
            main_total,
            grand_total,
        },
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn agent(name: &str, tier_code: &str) -> TierAgent {
        TierAgent {
            name: name.to_string(),
            tier_code: tier_code.to_string(),
        }
    }

    fn scenario_counts() -> PlanCounts {
        PlanCounts {
            plan_1600: 2,
            plan_1400: 0,
            plan_1200: 0,
            plan_1000: 1,
        }
    }

    /// TC-001: tier 70 on {1600: 2, 1000: 1}
    #[test]
    fn test_tier_commission_scenario() {
        let result = calculate_tier_commission(
            &agent("Main", "70"),
            &scenario_counts(),
            &TierRateTable::standard(),
            1,
        );

        assert_eq!(result.amount, dec("239"));
        assert!(result.known_tier);
        assert_eq!(result.audit_step.rule_id, "tier_commission");
        assert!(result.audit_step.reasoning.contains("239"));
    }

    /// TC-002: override of tier 70 over tier 50
    #[test]
    fn test_override_commission_scenario() {
        let result = calculate_override_commission(
            &agent("Main", "70"),
            &agent("Sub", "50"),
            &scenario_counts(),
            &TierRateTable::standard(),
            2,
        );

        assert_eq!(result.amount, dec("50"));
        assert_eq!(result.sub_agent, "Sub");
        assert_eq!(result.audit_step.step_number, 2);
    }

    /// TC-003: unknown tier earns zero
    #[test]
    fn test_unknown_tier_earns_zero() {
        let result = calculate_tier_commission(
            &agent("Ghost", "99"),
            &scenario_counts(),
            &TierRateTable::standard(),
            1,
        );

        assert_eq!(result.amount, Decimal::ZERO);
        assert!(!result.known_tier);
    }

    #[test]
    fn test_override_with_unknown_tier_is_zero() {
        let result = calculate_override_commission(
            &agent("Main", "70"),
            &agent("Sub", "99"),
            &scenario_counts(),
            &TierRateTable::standard(),
            1,
        );
        assert_eq!(result.amount, Decimal::ZERO);
    }

    /// TC-004: override equals difference of tier commissions
    #[test]
    fn test_override_equals_difference_of_commissions() {
        let tiers = TierRateTable::standard();
        let counts = PlanCounts {
            plan_1600: 7,
            plan_1400: 3,
            plan_1200: 5,
            plan_1000: 11,
        };

        let main = calculate_tier_commission(&agent("Main", "60"), &counts, &tiers, 1);
        let sub = calculate_tier_commission(&agent("Sub", "25"), &counts, &tiers, 2);
        let spread =
            calculate_override_commission(&agent("Main", "60"), &agent("Sub", "25"), &counts, &tiers, 3);

        assert_eq!(spread.amount, main.amount - sub.amount);
    }

    /// TC-005: group totals
    #[test]
    fn test_tier_group_totals() {
        let group = TierGroup {
            name: "Group".to_string(),
            main: agent("Main", "70"),
            sub_agents: vec![agent("Sub A", "50"), agent("Sub B", "40")],
        };

        let calculation = calculate_tier_group(&group, &scenario_counts(), &TierRateTable::standard());
        let result = calculation.result;

        // Sub A: 2 x 87 + 15 = 189; Sub B: 2 x 77 + 12.5 = 166.5
        assert_eq!(result.sub_agent_total, dec("355.5"));
        // Overrides: 50 and 2 x 30 + 12.5 = 72.5
        assert_eq!(result.override_total, dec("122.5"));
        assert_eq!(result.main.amount, dec("239"));
        assert_eq!(result.main_total, dec("361.5"));
        assert_eq!(result.grand_total, dec("717"));
        assert!(calculation.warnings.is_empty());

        let steps: Vec<_> = result
            .sub_agents
            .iter()
            .map(|c| c.audit_step.step_number)
            .chain(std::iter::once(result.main.audit_step.step_number))
            .chain(result.overrides.iter().map(|o| o.audit_step.step_number))
            .collect();
        assert_eq!(steps, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_sub_tier_not_lower_warns_and_goes_negative() {
        let group = TierGroup {
            name: "Inverted".to_string(),
            main: agent("Main", "50"),
            sub_agents: vec![agent("Sub", "70")],
        };

        let calculation = calculate_tier_group(&group, &scenario_counts(), &TierRateTable::standard());

        assert_eq!(calculation.result.override_total, dec("-50"));
        assert_eq!(calculation.warnings.len(), 1);
        assert_eq!(calculation.warnings[0].code, WARN_TIER_NOT_LOWER);
    }

    #[test]
    fn test_unknown_tier_in_group_warns() {
        let group = TierGroup {
            name: "Unknown".to_string(),
            main: agent("Main", "99"),
            sub_agents: vec![],
        };

        let calculation = calculate_tier_group(&group, &scenario_counts(), &TierRateTable::standard());

        assert_eq!(calculation.result.grand_total, Decimal::ZERO);
        assert_eq!(calculation.warnings[0].code, WARN_UNKNOWN_TIER);
        assert_eq!(calculation.warnings[0].severity, WarningSeverity::High);
    }
}
