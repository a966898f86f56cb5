//! Downline roster models.
//!
//! A downline roster lists client groups and the agents paid on each
//! client's book. Rates arrive in two shapes in configuration and are
//! resolved into [`PlanRates`] before they reach these types.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::PlanRates;

/// The two rates a downline pays on: plan 1000 and everything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SplitRates {
    /// Rate per employee on the 1000 plan.
    pub plan_1000: Decimal,
    /// Rate per employee on any other plan.
    pub other: Decimal,
}

/// An agent paid on a client's book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownlineAgent {
    /// Agent name.
    pub name: String,
    /// Resolved rate per plan level.
    pub rates: PlanRates,
}

impl DownlineAgent {
    /// The agent's own split: the 1000 rate and the 1600 rate for other plans.
    pub fn split_rates(&self) -> SplitRates {
        SplitRates {
            plan_1000: self.rates.plan_1000,
            other: self.rates.plan_1600,
        }
    }
}

/// A client group within a roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownlineClient {
    /// Client name.
    pub name: String,
    /// Agents paid on this client.
    pub agents: Vec<DownlineAgent>,
    /// Rates that replace every agent's own split when the run has exactly
    /// this many packets.
    #[serde(default)]
    pub period_count_rates: BTreeMap<usize, SplitRates>,
}

impl DownlineClient {
    /// The split used for an agent in a run of `period_count` packets.
    pub fn rates_for(&self, agent: &DownlineAgent, period_count: usize) -> SplitRates {
        self.period_count_rates
            .get(&period_count)
            .copied()
            .unwrap_or_else(|| agent.split_rates())
    }
}

/// A named set of client groups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownlineRoster {
    /// Title shown on the downline sheet.
    pub title: String,
    /// Client groups in display order.
    pub clients: Vec<DownlineClient>,
}

impl DownlineRoster {
    /// Finds a client by name, ignoring case and surrounding whitespace.
    pub fn client(&self, name: &str) -> Option<&DownlineClient> {
        let wanted = name.trim();
        self.clients
            .iter()
            .find(|client| client.name.eq_ignore_ascii_case(wanted))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn agent(name: &str, other: &str, plan_1000: &str) -> DownlineAgent {
        DownlineAgent {
            name: name.to_string(),
            rates: PlanRates::new(dec(other), dec(other), dec(other), dec(plan_1000)),
        }
    }

    fn confidence() -> DownlineClient {
        let mut period_count_rates = BTreeMap::new();
        period_count_rates.insert(
            3,
            SplitRates {
                plan_1000: dec("2.31"),
                other: dec("5"),
            },
        );
        DownlineClient {
            name: "CONFIDENCE".to_string(),
            agents: vec![agent("Agent1", "15", "5")],
            period_count_rates,
        }
    }

    #[test]
    fn test_agent_split_uses_1600_rate_for_other_plans() {
        let a = DownlineAgent {
            name: "Adam".to_string(),
            rates: PlanRates::new(dec("82"), dec("63"), dec("45"), dec("13")),
        };
        let split = a.split_rates();
        assert_eq!(split.plan_1000, dec("13"));
        assert_eq!(split.other, dec("82"));
    }

    /// DL-001: period-count rates replace the agent split
    #[test]
    fn test_period_count_rates_override_agent_split() {
        let client = confidence();
        let a = &client.agents[0];

        let three = client.rates_for(a, 3);
        assert_eq!(three.plan_1000, dec("2.31"));
        assert_eq!(three.other, dec("5"));

        let six = client.rates_for(a, 6);
        assert_eq!(six.plan_1000, dec("5"));
        assert_eq!(six.other, dec("15"));
    }

    #[test]
    fn test_client_lookup_ignores_case() {
        let roster = DownlineRoster {
            title: "Harry".to_string(),
            clients: vec![confidence()],
        };
        assert!(roster.client(" confidence ").is_some());
        assert!(roster.client("JANUS").is_none());
    }
}
