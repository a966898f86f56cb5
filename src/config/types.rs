//! Configuration types for the commission program.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files, plus the resolved
//! [`CommissionConfig`] the engine works from.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Deserialize;

use super::tables::{
    DEFAULT_SAMPLE_SIZE, DETECTION_TOLERANCE, PlanRateTable, ThresholdLadder, TierRateTable,
};
use crate::models::{
    AgentConfig, DownlineAgent, DownlineClient, DownlineRoster, FixedTableAgent, PlanLevel,
    PlanRates, SplitRates,
};

/// Rate key shared by the 1600, 1400 and 1200 plans in grouped rate maps.
pub const GROUPED_PLAN_KEY: &str = "1600/1400/1200";

/// Metadata about the commission program.
#[derive(Debug, Clone, Deserialize)]
pub struct ProgramMetadata {
    /// Short program code.
    pub code: String,
    /// Human-readable program name.
    pub name: String,
    /// Version or effective date of the configuration.
    pub version: String,
}

fn default_tolerance() -> Decimal {
    DETECTION_TOLERANCE
}

fn default_sample_size() -> usize {
    DEFAULT_SAMPLE_SIZE
}

/// Frequency detection settings.
#[derive(Debug, Clone, Deserialize)]
pub struct DetectionSettings {
    /// Absolute matching tolerance.
    #[serde(default = "default_tolerance")]
    pub tolerance: Decimal,
    /// Nonzero deductions sampled per file.
    #[serde(default = "default_sample_size")]
    pub sample_size: usize,
}

impl Default for DetectionSettings {
    fn default() -> Self {
        Self {
            tolerance: DETECTION_TOLERANCE,
            sample_size: DEFAULT_SAMPLE_SIZE,
        }
    }
}

/// `program.yaml` file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct ProgramConfig {
    /// Program metadata.
    pub program: ProgramMetadata,
    /// Detection settings.
    #[serde(default)]
    pub detection: DetectionSettings,
}

/// `tiers.yaml` file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct TiersConfig {
    /// Tier code to per-plan rate.
    pub tiers: TierRateTable,
}

/// `agents.yaml` file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct AgentsConfig {
    /// Default per-period agents.
    pub agents: Vec<AgentConfig>,
}

/// A downline agent as written in configuration.
///
/// `rates` may use per-plan keys (`"1600"`, `"1400"`, ...) or the grouped
/// key `"1600/1400/1200"` alongside `"1000"`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawDownlineAgent {
    /// Agent name.
    pub name: String,
    /// Rate map in either shape.
    pub rates: BTreeMap<String, Decimal>,
}

/// A downline client as written in configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RawDownlineClient {
    /// Client name.
    pub name: String,
    /// Agents paid on this client.
    pub agents: Vec<RawDownlineAgent>,
    /// Rates keyed by run packet count.
    #[serde(default)]
    pub period_count_rates: BTreeMap<usize, SplitRates>,
}

/// A downline roster as written in configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RawDownlineRoster {
    /// Sheet title.
    pub title: String,
    /// Client groups.
    pub clients: Vec<RawDownlineClient>,
}

/// `downlines.yaml` file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct DownlinesConfig {
    /// Roster name to roster.
    pub rosters: BTreeMap<String, RawDownlineRoster>,
}

/// Resolves a rate map in either shape into one rate per plan.
///
/// A per-plan key wins; otherwise the grouped key covers 1600, 1400 and
/// 1200; otherwise the `"1000"` rate applies; otherwise zero.
pub fn resolve_rates(raw: &BTreeMap<String, Decimal>) -> PlanRates {
    let trimmed: BTreeMap<&str, Decimal> =
        raw.iter().map(|(key, value)| (key.trim(), *value)).collect();

    let lookup = |level: PlanLevel| -> Decimal {
        let grouped = match level {
            PlanLevel::Plan1000 => None,
            _ => trimmed.get(GROUPED_PLAN_KEY),
        };
        trimmed
            .get(level.code())
            .or(grouped)
            .or_else(|| trimmed.get(PlanLevel::Plan1000.code()))
            .copied()
            .unwrap_or(Decimal::ZERO)
    };

    PlanRates::new(
        lookup(PlanLevel::Plan1600),
        lookup(PlanLevel::Plan1400),
        lookup(PlanLevel::Plan1200),
        lookup(PlanLevel::Plan1000),
    )
}

impl RawDownlineRoster {
    /// Resolves every agent's rates.
    pub fn resolve(self) -> DownlineRoster {
        DownlineRoster {
            title: self.title,
            clients: self
                .clients
                .into_iter()
                .map(|client| DownlineClient {
                    name: client.name,
                    agents: client
                        .agents
                        .into_iter()
                        .map(|agent| DownlineAgent {
                            rates: resolve_rates(&agent.rates),
                            name: agent.name,
                        })
                        .collect(),
                    period_count_rates: client.period_count_rates,
                })
                .collect(),
        }
    }
}

/// Complete resolved configuration for the commission program.
///
/// This struct aggregates all configuration loaded from the various
/// YAML files in a program configuration directory.
#[derive(Debug, Clone)]
pub struct CommissionConfig {
    /// Program metadata.
    program: ProgramMetadata,
    /// Canonical amounts and detection settings.
    plan_table: PlanRateTable,
    /// First-payment cutoffs.
    ladder: ThresholdLadder,
    /// Tier rates.
    tiers: TierRateTable,
    /// Default per-period agents.
    agents: Vec<AgentConfig>,
    /// Downline rosters by name.
    rosters: BTreeMap<String, DownlineRoster>,
}

impl CommissionConfig {
    /// Creates a new CommissionConfig from its component parts.
    pub fn new(
        program: ProgramMetadata,
        plan_table: PlanRateTable,
        tiers: TierRateTable,
        agents: Vec<AgentConfig>,
        rosters: BTreeMap<String, DownlineRoster>,
    ) -> Self {
        Self {
            program,
            plan_table,
            ladder: ThresholdLadder::standard(),
            tiers,
            agents,
            rosters,
        }
    }

    /// The built-in tables and fixed-table roster with no downline rosters.
    pub fn standard() -> Self {
        Self::new(
            ProgramMetadata {
                code: "standard".to_string(),
                name: "Payroll deduction commissions".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            PlanRateTable::standard(),
            TierRateTable::standard(),
            FixedTableAgent::standard_roster()
                .into_iter()
                .map(AgentConfig::from)
                .collect(),
            BTreeMap::new(),
        )
    }

    /// Returns the program metadata.
    pub fn program(&self) -> &ProgramMetadata {
        &self.program
    }

    /// Returns the plan rate table.
    pub fn plan_table(&self) -> &PlanRateTable {
        &self.plan_table
    }

    /// Returns the threshold ladder.
    pub fn ladder(&self) -> &ThresholdLadder {
        &self.ladder
    }

    /// Returns the tier rate table.
    pub fn tiers(&self) -> &TierRateTable {
        &self.tiers
    }

    /// Returns the default per-period agents.
    pub fn agents(&self) -> &[AgentConfig] {
        &self.agents
    }

    /// Returns all downline rosters.
    pub fn rosters(&self) -> &BTreeMap<String, DownlineRoster> {
        &self.rosters
    }
}
