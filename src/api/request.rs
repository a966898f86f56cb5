//! Request types for the commission engine API.
//!
//! This module defines the JSON request structures for the `/reports` endpoint
//! and their conversion into engine inputs.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::ConfigLoader;
use crate::error::EngineResult;
use crate::models::{AgentConfig, AuditWarning, PayFrequency, PeriodPacket, TierGroup};
use crate::report::{DownlineSelection, ReportConfig};

/// Request body for the `/reports` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportRequest {
    /// One entry per pay period, in any order.
    pub packets: Vec<PacketRequest>,
    /// Agents to pay; the configured defaults when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agents: Option<Vec<AgentConfig>>,
    /// A main tier agent and its sub-agents.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tier_group: Option<TierGroup>,
    /// A configured downline roster to report on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub downline: Option<DownlineRequest>,
}

/// One pay period's deductions in a report request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PacketRequest {
    /// The pay period date.
    pub period_date: NaiveDate,
    /// The pay frequency; detected from the deductions when absent or `unknown`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<PayFrequency>,
    /// Employee id to deduction amount.
    pub deductions: BTreeMap<String, Decimal>,
}

/// A downline roster reference in a report request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownlineRequest {
    /// Configured roster name, such as `harry` or `adam`.
    pub roster: String,
    /// Client to keep; the whole roster when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client: Option<String>,
}

impl PacketRequest {
    /// Builds the period packet, detecting the frequency if needed.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPacket` for a blank or duplicated employee id when
    /// the frequency was supplied.
    pub fn into_packet(
        self,
        config: &ConfigLoader,
    ) -> EngineResult<(PeriodPacket, Vec<AuditWarning>)> {
        match self.frequency.filter(|frequency| frequency.is_known()) {
            Some(frequency) => {
                let packet = PeriodPacket::new(self.period_date, frequency, self.deductions)?;
                Ok((packet, Vec::new()))
            }
            None => {
                let assembled =
                    PeriodPacket::from_rows(self.period_date, self.deductions, config.plan_table())?;
                Ok((assembled.packet, assembled.warnings))
            }
        }
    }
}

/// Engine inputs resolved from a request.
#[derive(Debug)]
pub struct ResolvedRequest {
    /// Period packets.
    pub packets: Vec<PeriodPacket>,
    /// What to compute.
    pub report: ReportConfig,
    /// Warnings raised while building packets.
    pub warnings: Vec<AuditWarning>,
}

impl ReportRequest {
    /// Resolves packets, agents and roster references against the configuration.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPacket`, `InvalidAgentConfig` or `UnknownRoster`.
    pub fn resolve(self, config: &ConfigLoader) -> EngineResult<ResolvedRequest> {
        let mut packets = Vec::with_capacity(self.packets.len());
        let mut warnings = Vec::new();
        for packet in self.packets {
            let (packet, packet_warnings) = packet.into_packet(config)?;
            packets.push(packet);
            warnings.extend(packet_warnings);
        }

        let agents = match self.agents {
            Some(agents) => agents,
            None => config.default_agents().to_vec(),
        };
        for agent in &agents {
            agent.validate()?;
        }

        if let Some(group) = &self.tier_group {
            group.validate()?;
        }

        let downline = match self.downline {
            Some(request) => Some(DownlineSelection {
                roster: config.roster(&request.roster)?.clone(),
                client: request.client,
            }),
            None => None,
        };

        Ok(ResolvedRequest {
            packets,
            report: ReportConfig {
                agents,
                tier_group: self.tier_group,
                downline,
            },
            warnings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use crate::models::PercentageAgent;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn packet_request(frequency: Option<PayFrequency>) -> PacketRequest {
        let mut deductions = BTreeMap::new();
        deductions.insert("111".to_string(), dec("-738.46"));
        PacketRequest {
            period_date: NaiveDate::from_ymd_opt(2025, 12, 7).unwrap(),
            frequency,
            deductions,
        }
    }

    #[test]
    fn test_deserialize_minimal_request() {
        let json = r#"{
            "packets": [
                {"period_date": "2025-12-07", "deductions": {"111": "-369.23"}}
            ]
        }"#;
        let request: ReportRequest = serde_json::from_str(json).unwrap();

        assert_eq!(request.packets.len(), 1);
        assert!(request.packets[0].frequency.is_none());
        assert!(request.agents.is_none());
    }

    #[test]
    fn test_missing_frequency_is_detected() {
        let config = ConfigLoader::standard();
        let (packet, warnings) = packet_request(None).into_packet(&config).unwrap();

        assert_eq!(packet.frequency(), PayFrequency::BiWeekly);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_unknown_frequency_is_detected() {
        let config = ConfigLoader::standard();
        let (packet, _) = packet_request(Some(PayFrequency::Unknown))
            .into_packet(&config)
            .unwrap();
        assert_eq!(packet.frequency(), PayFrequency::BiWeekly);
    }

    #[test]
    fn test_supplied_frequency_is_kept() {
        let config = ConfigLoader::standard();
        let (packet, _) = packet_request(Some(PayFrequency::Monthly))
            .into_packet(&config)
            .unwrap();
        assert_eq!(packet.frequency(), PayFrequency::Monthly);
    }

    #[test]
    fn test_resolve_uses_default_agents() {
        let config = ConfigLoader::standard();
        let request = ReportRequest {
            packets: vec![packet_request(None)],
            agents: None,
            tier_group: None,
            downline: None,
        };

        let resolved = request.resolve(&config).unwrap();

        assert_eq!(resolved.report.agents.len(), 3);
        assert_eq!(resolved.report.agents[0].name(), "Charles");
    }

    #[test]
    fn test_resolve_rejects_invalid_agent() {
        let config = ConfigLoader::standard();
        let request = ReportRequest {
            packets: vec![packet_request(None)],
            agents: Some(vec![AgentConfig::Percentage(PercentageAgent {
                name: "Greedy".to_string(),
                percent_of_plan: dec("150"),
            })]),
            tier_group: None,
            downline: None,
        };

        assert!(matches!(
            request.resolve(&config),
            Err(EngineError::InvalidAgentConfig { .. })
        ));
    }

    #[test]
    fn test_resolve_rejects_unknown_roster() {
        let config = ConfigLoader::standard();
        let request = ReportRequest {
            packets: vec![packet_request(None)],
            agents: None,
            tier_group: None,
            downline: Some(DownlineRequest {
                roster: "nobody".to_string(),
                client: None,
            }),
        };

        assert!(matches!(
            request.resolve(&config),
            Err(EngineError::UnknownRoster { .. })
        ));
    }

    #[test]
    fn test_supplied_frequency_rejects_ids_colliding_after_trim() {
        let config = ConfigLoader::standard();
        let mut request = packet_request(Some(PayFrequency::BiWeekly));
        request.deductions.insert("111 ".to_string(), Decimal::ZERO);

        assert!(matches!(
            request.into_packet(&config),
            Err(EngineError::InvalidPacket { .. })
        ));
    }
}
