//! Report model building.
//!
//! Produces the per-sheet cell grid a renderer turns into a workbook:
//! Commissions and Unpaid employee sheets, optional tier and downline
//! summaries, and one sheet per period packet.

mod builder;
mod sheets;

use serde::{Deserialize, Serialize};

use crate::models::{AgentConfig, DownlineRoster, TierGroup};

pub use builder::ReportBuilder;

/// A downline roster to report on, optionally narrowed to one client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownlineSelection {
    /// The resolved roster.
    pub roster: DownlineRoster,
    /// Client name to keep; every client when absent.
    #[serde(default)]
    pub client: Option<String>,
}

/// What to compute commissions for in one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Percentage, fixed-table and standalone tier agents, in column order.
    #[serde(default)]
    pub agents: Vec<AgentConfig>,
    /// A main tier agent and its sub-agents.
    #[serde(default)]
    pub tier_group: Option<TierGroup>,
    /// A downline roster.
    #[serde(default)]
    pub downline: Option<DownlineSelection>,
}

impl ReportConfig {
    /// A configuration with only the given agents.
    pub fn with_agents(agents: Vec<AgentConfig>) -> Self {
        Self {
            agents,
            ..Self::default()
        }
    }

    /// Returns true if anything would earn a commission.
    pub fn has_commission_sources(&self) -> bool {
        !self.agents.is_empty() || self.tier_group.is_some() || self.downline.is_some()
    }
}
