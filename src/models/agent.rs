//! Agent configuration models.
//!
//! An agent is paid under exactly one rate model. Percentage and fixed-table
//! agents are paid per employee per period; tier agents are paid on the count
//! of perfect employees at each plan level over the whole run.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::PlanRates;
use crate::error::{EngineError, EngineResult};

/// An agent paid a percentage of each employee's monthly plan value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PercentageAgent {
    /// Agent name, used as the report column header.
    pub name: String,
    /// Percent of the plan's monthly value, between 0 and 100.
    pub percent_of_plan: Decimal,
}

/// How a fixed-table agent's rates are expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateBasis {
    /// Rates are monthly and scaled by `12 / divisor` per period.
    #[default]
    Monthly,
    /// Rates are already per period and used as is.
    PerPeriod,
}

/// An agent paid a fixed amount per plan level.
///
/// # Example
///
/// ```
/// use commission_engine::models::FixedTableAgent;
///
/// let roster = FixedTableAgent::standard_roster();
/// assert_eq!(roster.len(), 3);
/// assert_eq!(roster[1].name, "Harry");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedTableAgent {
    /// Agent name, used as the report column header.
    pub name: String,
    /// Rate per plan level.
    pub rates: PlanRates,
    /// Whether `rates` are monthly or per period.
    #[serde(default)]
    pub basis: RateBasis,
}

impl FixedTableAgent {
    /// The three built-in fixed-table agents, with monthly rates.
    pub fn standard_roster() -> Vec<FixedTableAgent> {
        vec![
            FixedTableAgent {
                name: "Charles".to_string(),
                rates: PlanRates::new(
                    Decimal::from(15),
                    Decimal::from(10),
                    Decimal::from(5),
                    Decimal::new(15, 1),
                ),
                basis: RateBasis::Monthly,
            },
            FixedTableAgent {
                name: "Harry".to_string(),
                rates: PlanRates::new(
                    Decimal::from(97),
                    Decimal::from(78),
                    Decimal::from(60),
                    Decimal::from(25),
                ),
                basis: RateBasis::Monthly,
            },
            FixedTableAgent {
                name: "LightHouse".to_string(),
                rates: PlanRates::new(
                    Decimal::from(25),
                    Decimal::from(20),
                    Decimal::from(15),
                    Decimal::from(2),
                ),
                basis: RateBasis::Monthly,
            },
        ]
    }
}

/// An agent paid from the shared tier rate table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierAgent {
    /// Agent name.
    pub name: String,
    /// Tier code such as `"70"`.
    pub tier_code: String,
}

/// A main tier agent with the sub-agents it earns overrides on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierGroup {
    /// Group name, used as the summary sheet title.
    pub name: String,
    /// The parent agent.
    pub main: TierAgent,
    /// Sub-agents, each with a lower tier than `main`.
    #[serde(default)]
    pub sub_agents: Vec<TierAgent>,
}

impl TierGroup {
    /// Checks every agent in the group.
    ///
    /// # Errors
    ///
    /// Returns `InvalidAgentConfig` for a blank name or tier code.
    pub fn validate(&self) -> EngineResult<()> {
        validate_tier_agent(&self.main)?;
        for sub_agent in &self.sub_agents {
            validate_tier_agent(sub_agent)?;
        }
        Ok(())
    }
}

/// Configuration for one agent under one of the three rate models.
///
/// Serialized with a `kind` tag:
///
/// ```
/// use commission_engine::models::AgentConfig;
///
/// let json = r#"{"kind": "percentage", "name": "Ten", "percent_of_plan": "10"}"#;
/// let agent: AgentConfig = serde_json::from_str(json).unwrap();
/// assert_eq!(agent.name(), "Ten");
/// assert!(agent.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AgentConfig {
    /// Percentage of plan value.
    Percentage(PercentageAgent),
    /// Fixed amount per plan level.
    FixedTable(FixedTableAgent),
    /// Tier rate on whole-run plan counts.
    Tier(TierAgent),
}

impl AgentConfig {
    /// The agent's name.
    pub fn name(&self) -> &str {
        match self {
            AgentConfig::Percentage(agent) => &agent.name,
            AgentConfig::FixedTable(agent) => &agent.name,
            AgentConfig::Tier(agent) => &agent.name,
        }
    }

    /// Returns true for models paid per employee per period.
    pub fn is_per_period(&self) -> bool {
        !matches!(self, AgentConfig::Tier(_))
    }

    /// Checks the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns `InvalidAgentConfig` for a blank name, a percentage outside
    /// 0..=100, a negative fixed rate or a blank tier code.
    pub fn validate(&self) -> EngineResult<()> {
        if self.name().trim().is_empty() {
            return Err(invalid(self.name(), "name must not be blank"));
        }

        match self {
            AgentConfig::Percentage(agent) => {
                if agent.percent_of_plan < Decimal::ZERO
                    || agent.percent_of_plan > Decimal::ONE_HUNDRED
                {
                    return Err(invalid(
                        &agent.name,
                        "percent_of_plan must be between 0 and 100",
                    ));
                }
            }
            AgentConfig::FixedTable(agent) => {
                if agent.rates.has_negative() {
                    return Err(invalid(&agent.name, "rates must not be negative"));
                }
            }
            AgentConfig::Tier(agent) => validate_tier_agent(agent)?,
        }

        Ok(())
    }
}

impl From<FixedTableAgent> for AgentConfig {
    fn from(agent: FixedTableAgent) -> Self {
        AgentConfig::FixedTable(agent)
    }
}

impl From<PercentageAgent> for AgentConfig {
    fn from(agent: PercentageAgent) -> Self {
        AgentConfig::Percentage(agent)
    }
}

fn validate_tier_agent(agent: &TierAgent) -> EngineResult<()> {
    if agent.name.trim().is_empty() {
        return Err(invalid(&agent.name, "name must not be blank"));
    }
    if agent.tier_code.trim().is_empty() {
        return Err(invalid(&agent.name, "tier_code must not be blank"));
    }
    Ok(())
}

fn invalid(agent: &str, message: &str) -> EngineError {
    EngineError::InvalidAgentConfig {
        agent: agent.to_string(),
        message: message.to_string(),
    }
}
