//! Downline roster commissions.
//!
//! Each downline agent earns `plan_1000 × rate_1000 + other_plans × rate_other`
//! on the run's plan count summary. A client may replace those two rates
//! for runs of a particular length.

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::models::{
    AuditWarning, DownlineAgentCommission, DownlineClient, DownlineClientCommission,
    DownlineResult, DownlineRoster, PlanCountSummary, SplitRates, WARN_UNKNOWN_CLIENT,
    WarningSeverity,
};

/// Downline commissions along with any warnings raised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownlineCalculation {
    /// The roster breakdown.
    pub result: DownlineResult,
    /// Client filter misses.
    pub warnings: Vec<AuditWarning>,
}

/// One agent's commission for the given split rates.
pub fn downline_agent_commission(summary: &PlanCountSummary, rates: &SplitRates) -> Decimal {
    Decimal::from(summary.plan_1000) * rates.plan_1000
        + Decimal::from(summary.other_plans) * rates.other
}

fn client_commission(
    client: &DownlineClient,
    summary: &PlanCountSummary,
    period_count: usize,
) -> DownlineClientCommission {
    let period_count_override = client.period_count_rates.contains_key(&period_count);

    let agents: Vec<DownlineAgentCommission> = client
        .agents
        .iter()
        .map(|agent| {
            let rates = client.rates_for(agent, period_count);
            DownlineAgentCommission {
                agent_name: agent.name.clone(),
                rates,
                period_count_override,
                amount: downline_agent_commission(summary, &rates),
            }
        })
        .collect();

    let total = agents.iter().map(|agent| agent.amount).sum();
    DownlineClientCommission {
        client_name: client.name.clone(),
        agents,
        total,
    }
}

/// Computes commissions for a roster, optionally limited to one client.
///
/// A client filter that matches nothing falls back to the whole roster and
/// records a warning.
///
/// # Example
///
/// ```
/// use commission_engine::calculation::calculate_downline;
/// use commission_engine::models::{
///     DownlineAgent, DownlineClient, DownlineRoster, PlanCountSummary, PlanRates,
/// };
/// use rust_decimal::Decimal;
/// use std::collections::BTreeMap;
///
/// let roster = DownlineRoster {
///     title: "Downline".to_string(),
///     clients: vec![DownlineClient {
///         name: "JANUS".to_string(),
///         agents: vec![DownlineAgent {
///             name: "Agent1".to_string(),
///             rates: PlanRates::new(
///                 Decimal::from(35),
///                 Decimal::from(35),
///                 Decimal::from(35),
///                 Decimal::from(15),
///             ),
///         }],
///         period_count_rates: BTreeMap::new(),
///     }],
/// };
/// let summary = PlanCountSummary { plan_1000: 2, other_plans: 3 };
///
/// let calculation = calculate_downline(&roster, None, &summary, 4);
/// assert_eq!(calculation.result.grand_total, Decimal::from(135));
/// ```
pub fn calculate_downline(
    roster: &DownlineRoster,
    client_filter: Option<&str>,
    summary: &PlanCountSummary,
    period_count: usize,
) -> DownlineCalculation {
    let mut warnings = Vec::new();

    let selected: Vec<&DownlineClient> = match client_filter {
        Some(name) => match roster.client(name) {
            Some(client) => vec![client],
            None => {
                warn!(
                    roster = %roster.title,
                    client = name,
                    "Unknown downline client; using whole roster"
                );
                warnings.push(AuditWarning::new(
                    WARN_UNKNOWN_CLIENT,
                    format!(
                        "Client '{}' not found in {}; using every client",
                        name, roster.title
                    ),
                    WarningSeverity::Low,
                ));
                roster.clients.iter().collect()
            }
        },
        None => roster.clients.iter().collect(),
    };

    let clients: Vec<DownlineClientCommission> = selected
        .into_iter()
        .map(|client| client_commission(client, summary, period_count))
        .collect();
    let grand_total = clients.iter().map(|client| client.total).sum();

    debug!(
        roster = %roster.title,
        clients = clients.len(),
        %grand_total,
        "Calculated downline commissions"
    );

    DownlineCalculation {
        result: DownlineResult {
            roster_title: roster.title.clone(),
            summary: *summary,
            period_count,
            clients,
            grand_total,
        },
        warnings,
    }
}
