//! Builds a [`ReportModel`] from period packets.

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use super::sheets::{
    EmployeeSheetContext, PeriodSheet, commissions_sheet, downline_sheet, period_sheet,
    period_sheet_names, tier_summary_sheet, unpaid_sheet,
};
use super::{DownlineSelection, ReportConfig};
use crate::calculation::{
    CommissionEngine, calculate_downline, calculate_tier_group, nearest_fallback_warnings,
    plan_counts, reconcile_employees, summarize_plan_labels,
};
use crate::config::{CommissionConfig, PlanRateTable, ThresholdLadder, TierRateTable};
use crate::models::{
    AgentConfig, AgentTotal, COMMISSIONS_SHEET, CommissionResult, DOWNLINE_SHEET, NoDataReason,
    PeriodPacket, ReportModel, ReportOutcome, RunSummary, TIER_SUMMARY_SHEET, UNPAID_SHEET,
    packets_in_order,
};

/// Turns a run's packets into a report.
#[derive(Debug, Clone, Copy)]
pub struct ReportBuilder<'a> {
    plan_table: &'a PlanRateTable,
    ladder: &'a ThresholdLadder,
    tiers: &'a TierRateTable,
}

impl<'a> ReportBuilder<'a> {
    /// Creates a builder over a loaded configuration.
    pub fn new(config: &'a CommissionConfig) -> Self {
        Self::from_tables(config.plan_table(), config.ladder(), config.tiers())
    }

    /// Creates a builder over explicit tables.
    pub fn from_tables(
        plan_table: &'a PlanRateTable,
        ladder: &'a ThresholdLadder,
        tiers: &'a TierRateTable,
    ) -> Self {
        Self {
            plan_table,
            ladder,
            tiers,
        }
    }

    /// Builds the report for one run.
    ///
    /// Packets are put in date order first. Empty input never fails: it
    /// yields [`ReportOutcome::NoData`] with the reason.
    ///
    /// # Example
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use commission_engine::config::CommissionConfig;
    /// use commission_engine::models::{
    ///     FixedTableAgent, NoDataReason, PayFrequency, PeriodPacket, ReportOutcome,
    /// };
    /// use commission_engine::report::{ReportBuilder, ReportConfig};
    /// use rust_decimal::Decimal;
    /// use std::collections::BTreeMap;
    ///
    /// let config = CommissionConfig::standard();
    /// let builder = ReportBuilder::new(&config);
    /// let agents = ReportConfig::with_agents(
    ///     FixedTableAgent::standard_roster().into_iter().map(Into::into).collect(),
    /// );
    ///
    /// let outcome = builder.build(vec![], &agents);
    /// assert_eq!(outcome, ReportOutcome::NoData { reason: NoDataReason::NoPackets });
    ///
    /// let mut deductions = BTreeMap::new();
    /// deductions.insert("111".to_string(), Decimal::new(-36923, 2));
    /// let packet = PeriodPacket::new(
    ///     NaiveDate::from_ymd_opt(2025, 12, 7).unwrap(),
    ///     PayFrequency::Weekly,
    ///     deductions,
    /// )
    /// .unwrap();
    ///
    /// let ReportOutcome::Report(report) = builder.build(vec![packet], &agents) else {
    ///     panic!("expected a report");
    /// };
    /// assert_eq!(report.summary.perfect_employees, 1);
    /// assert_eq!(report.sheet_order, vec!["Commissions", "Unpaid", "12.7"]);
    /// ```
    pub fn build(&self, packets: Vec<PeriodPacket>, config: &ReportConfig) -> ReportOutcome {
        if packets.is_empty() {
            warn!("No packets supplied; nothing to report");
            return ReportOutcome::NoData {
                reason: NoDataReason::NoPackets,
            };
        }
        if packets.iter().all(PeriodPacket::is_empty) {
            warn!(packets = packets.len(), "Packets hold no employee rows");
            return ReportOutcome::NoData {
                reason: NoDataReason::NoBillableEmployees,
            };
        }
        if !config.has_commission_sources() {
            warn!("No agents, tier group or downline configured");
            return ReportOutcome::NoData {
                reason: NoDataReason::NoAgents,
            };
        }

        let packets = packets_in_order(packets);
        let reconciled = reconcile_employees(&packets, self.ladder);
        let reconciliation = reconciled.reconciliation;
        let mut warnings = reconciled.warnings;
        warnings.extend(nearest_fallback_warnings(&reconciliation, self.plan_table));

        let engine = CommissionEngine::new(self.plan_table, self.tiers);
        let agent_commissions = engine.calculate_all(&config.agents, &reconciliation);
        warnings.extend(agent_commissions.warnings);
        let commissions = agent_commissions.results;

        let tier_group = config.tier_group.as_ref().map(|group| {
            let calculation = calculate_tier_group(group, &plan_counts(&reconciliation), self.tiers);
            warnings.extend(calculation.warnings);
            calculation.result
        });

        let downline = config.downline.as_ref().map(
            |DownlineSelection { roster, client }| {
                let summary = summarize_plan_labels(&reconciliation, self.plan_table);
                let calculation = calculate_downline(
                    roster,
                    client.as_deref(),
                    &summary,
                    reconciliation.period_count(),
                );
                warnings.extend(calculation.warnings);
                calculation.result
            },
        );

        let period_sheets: Vec<PeriodSheet> = period_sheet_names(&packets)
            .into_iter()
            .zip(&packets)
            .map(|(name, packet)| period_sheet(packet, name))
            .collect();

        let (per_period_agents, per_period_results): (Vec<&AgentConfig>, Vec<CommissionResult>) =
            config
                .agents
                .iter()
                .zip(&commissions)
                .filter(|(agent, _)| agent.is_per_period())
                .map(|(agent, result)| (agent, result.clone()))
                .unzip();

        let context = EmployeeSheetContext {
            packets: &packets,
            period_sheets: &period_sheets,
            agents: &per_period_agents,
            engine,
            plan_table: self.plan_table,
            reconciliation: &reconciliation,
        };

        let mut sheets = vec![
            commissions_sheet(&context, &per_period_results),
            unpaid_sheet(&context),
        ];
        let mut sheet_order = vec![COMMISSIONS_SHEET.to_string(), UNPAID_SHEET.to_string()];
        if let Some(result) = &tier_group {
            sheets.push(tier_summary_sheet(result));
            sheet_order.push(TIER_SUMMARY_SHEET.to_string());
        }
        if let Some(result) = &downline {
            sheets.push(downline_sheet(result));
            sheet_order.push(DOWNLINE_SHEET.to_string());
        }
        for period_sheet in period_sheets {
            sheet_order.push(period_sheet.sheet.name.clone());
            sheets.push(period_sheet.sheet);
        }

        let mut agent_totals: Vec<AgentTotal> = commissions
            .iter()
            .map(|result| AgentTotal {
                agent_name: result.agent_name.clone(),
                grand_total: result.grand_total,
            })
            .collect();
        if let Some(result) = &tier_group {
            agent_totals.push(AgentTotal {
                agent_name: result.group_name.clone(),
                grand_total: result.grand_total,
            });
        }
        if let Some(result) = &downline {
            agent_totals.push(AgentTotal {
                agent_name: result.roster_title.clone(),
                grand_total: result.grand_total,
            });
        }

        let summary = RunSummary {
            frequency: reconciliation.frequency,
            divisor: reconciliation.divisor,
            first_period: packets[0].period_date(),
            last_period: packets[packets.len() - 1].period_date(),
            total_employees: reconciliation.total_employees(),
            perfect_employees: reconciliation.perfect.len(),
            imperfect_employees: reconciliation.imperfect.len(),
            packet_count: packets.len(),
            agent_totals,
        };

        let report = ReportModel {
            report_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            frequency: reconciliation.frequency,
            sheet_order,
            sheets,
            summary,
            commissions,
            tier_group,
            downline,
            warnings,
        };

        info!(
            report_id = %report.report_id,
            frequency = %report.frequency,
            packets = report.summary.packet_count,
            perfect = report.summary.perfect_employees,
            imperfect = report.summary.imperfect_employees,
            sheets = report.sheets.len(),
            warnings = report.warnings.len(),
            "Built commission report"
        );

        ReportOutcome::Report(Box::new(report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        CellValue, DownlineAgent, DownlineClient, DownlineRoster, FixedTableAgent, PayFrequency,
        PercentageAgent, PlanRates, TierAgent, TierGroup, WARN_PLAN_FALLBACK,
        WARN_UNCLASSIFIED_PLAN, WARN_UNKNOWN_CLIENT,
    };
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use std::collections::BTreeMap;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 12, day).unwrap()
    }

    fn packet(day: u32, rows: &[(&str, &str)]) -> PeriodPacket {
        let deductions = rows
            .iter()
            .map(|(id, amount)| (id.to_string(), dec(amount)))
            .collect();
        PeriodPacket::new(date(day), PayFrequency::Weekly, deductions).unwrap()
    }

    fn scenario_packets() -> Vec<PeriodPacket> {
        vec![
            packet(7, &[("111", "-369.23"), ("222", "-230.77")]),
            packet(14, &[("111", "-369.23"), ("222", "0")]),
            packet(21, &[("111", "-369.23"), ("222", "-230.77")]),
        ]
    }

    fn ten_percent() -> ReportConfig {
        ReportConfig::with_agents(vec![AgentConfig::Percentage(PercentageAgent {
            name: "Ten".to_string(),
            percent_of_plan: dec("10"),
        })])
    }

    fn report(outcome: ReportOutcome) -> ReportModel {
        match outcome {
            ReportOutcome::Report(report) => *report,
            ReportOutcome::NoData { reason } => panic!("expected a report, got {:?}", reason),
        }
    }

    /// RB-001: empty inputs give a no-data outcome
    #[test]
    fn test_no_data_outcomes() {
        let config = CommissionConfig::standard();
        let builder = ReportBuilder::new(&config);

        assert_eq!(
            builder.build(vec![], &ten_percent()),
            ReportOutcome::NoData {
                reason: NoDataReason::NoPackets
            }
        );
        assert_eq!(
            builder.build(vec![packet(7, &[])], &ten_percent()),
            ReportOutcome::NoData {
                reason: NoDataReason::NoBillableEmployees
            }
        );
        assert_eq!(
            builder.build(scenario_packets(), &ReportConfig::default()),
            ReportOutcome::NoData {
                reason: NoDataReason::NoAgents
            }
        );
    }

    /// RB-002: perfect and imperfect employees land on their sheets
    #[test]
    fn test_commissions_and_unpaid_sheets() {
        let config = CommissionConfig::standard();
        let report = report(ReportBuilder::new(&config).build(scenario_packets(), &ten_percent()));

        let commissions = report.sheet(COMMISSIONS_SHEET).unwrap();
        assert_eq!(
            commissions.get(2, 0).and_then(CellValue::as_text),
            Some("111")
        );
        // Block: deduction, plan, Ten
        assert_eq!(
            commissions.get(2, 2).and_then(CellValue::as_text),
            Some("Plan 1600")
        );
        assert_eq!(
            commissions.get(2, 3).and_then(CellValue::numeric).unwrap().round_dp(2),
            dec("36.92")
        );

        let unpaid = report.sheet(UNPAID_SHEET).unwrap();
        assert_eq!(unpaid.get(2, 0).and_then(CellValue::as_text), Some("222"));
        assert_eq!(unpaid.get(2, 4), Some(&CellValue::Blank));
        assert_eq!(
            unpaid.get(2, 10).and_then(CellValue::as_text),
            Some("12/14/2025")
        );

        assert_eq!(report.summary.perfect_employees, 1);
        assert_eq!(report.summary.imperfect_employees, 1);
        assert_eq!(report.summary.total_employees, 2);
    }

    /// RB-003: deductions reference the period sheet row
    #[test]
    fn test_deduction_references_period_sheet() {
        let config = CommissionConfig::standard();
        let report = report(ReportBuilder::new(&config).build(scenario_packets(), &ten_percent()));

        let Some(CellValue::Reference { value, target }) =
            report.sheet(COMMISSIONS_SHEET).unwrap().get(2, 1)
        else {
            panic!("expected a reference");
        };
        assert_eq!(*value, dec("-369.23"));
        assert_eq!(target.sheet, "12.7");
        assert_eq!(target.row, 1);

        let period = report.sheet("12.7").unwrap();
        assert_eq!(period.get(1, 0).and_then(CellValue::as_text), Some("111"));
        assert_eq!(
            period.get(3, 1).and_then(CellValue::numeric),
            Some(dec("-600.00"))
        );
    }

    /// RB-004: totals match the engine results
    #[test]
    fn test_period_and_grand_totals() {
        let config = CommissionConfig::standard();
        let report = report(ReportBuilder::new(&config).build(scenario_packets(), &ten_percent()));
        let commissions = report.sheet(COMMISSIONS_SHEET).unwrap();

        // One employee row, blank row, totals row
        let Some(CellValue::Total { value, ranges }) = commissions.get(4, 3) else {
            panic!("expected a period total");
        };
        assert_eq!(value.round_dp(2), dec("36.92"));
        assert_eq!(ranges[0].first_row, 2);
        assert_eq!(ranges[0].last_row, 2);

        // Three blocks of three columns, then a spacer column
        let Some(CellValue::Total { value, ranges }) = commissions.get(2, 11) else {
            panic!("expected a grand total");
        };
        assert_eq!(*value, report.commissions[0].grand_total);
        assert_eq!(ranges.len(), 3);
        assert_eq!(value.round_dp(2), dec("110.77"));
    }

    #[test]
    fn test_sheet_order_and_duplicate_dates() {
        let config = CommissionConfig::standard();
        let packets = vec![
            packet(14, &[("111", "-369.23")]),
            packet(7, &[("111", "-369.23")]),
            packet(14, &[("111", "-369.23")]),
        ];

        let report = report(ReportBuilder::new(&config).build(packets, &ten_percent()));

        assert_eq!(
            report.sheet_order,
            vec!["Commissions", "Unpaid", "12.7", "12.14", "12.14 (2)"]
        );
        assert_eq!(report.summary.first_period, date(7));
        assert_eq!(report.summary.last_period, date(14));
    }

    #[test]
    fn test_tier_group_and_downline_sheets() {
        let config = CommissionConfig::standard();
        let roster = DownlineRoster {
            title: "Harry's Downline".to_string(),
            clients: vec![DownlineClient {
                name: "AMERISTAR".to_string(),
                agents: vec![DownlineAgent {
                    name: "Agent1".to_string(),
                    rates: PlanRates::new(dec("35"), dec("35"), dec("35"), dec("15")),
                }],
                period_count_rates: BTreeMap::new(),
            }],
        };
        let report_config = ReportConfig {
            agents: FixedTableAgent::standard_roster()
                .into_iter()
                .map(Into::into)
                .collect(),
            tier_group: Some(TierGroup {
                name: "Group".to_string(),
                main: TierAgent {
                    name: "Main".to_string(),
                    tier_code: "70".to_string(),
                },
                sub_agents: vec![TierAgent {
                    name: "Sub".to_string(),
                    tier_code: "50".to_string(),
                }],
            }),
            downline: Some(DownlineSelection {
                roster,
                client: Some("Nobody".to_string()),
            }),
        };

        let report = report(ReportBuilder::new(&config).build(scenario_packets(), &report_config));

        assert_eq!(
            &report.sheet_order[..4],
            &["Commissions", "Unpaid", "Tier Summary", "Downline"]
        );
        // One perfect 1600 employee: 87 for the sub, 107 + 20 for the main
        assert_eq!(report.tier_group.as_ref().unwrap().grand_total, dec("214"));
        // One other-plan employee at 35
        assert_eq!(report.downline.as_ref().unwrap().grand_total, dec("35"));
        assert!(report.warnings.iter().any(|w| w.code == WARN_UNKNOWN_CLIENT));

        let names: Vec<&str> = report
            .summary
            .agent_totals
            .iter()
            .map(|total| total.agent_name.as_str())
            .collect();
        assert_eq!(
            names,
            vec!["Charles", "Harry", "LightHouse", "Group", "Harry's Downline"]
        );
    }

    #[test]
    fn test_tier_group_alone_is_enough_to_report() {
        let config = CommissionConfig::standard();
        let report_config = ReportConfig {
            tier_group: Some(TierGroup {
                name: "Solo".to_string(),
                main: TierAgent {
                    name: "Main".to_string(),
                    tier_code: "70".to_string(),
                },
                sub_agents: vec![],
            }),
            ..ReportConfig::default()
        };

        let report = report(ReportBuilder::new(&config).build(scenario_packets(), &report_config));

        assert!(report.commissions.is_empty());
        assert_eq!(report.tier_group.unwrap().grand_total, dec("107"));
    }

    /// RB-005: periods paid through the 1000 fallback are flagged
    #[test]
    fn test_fallback_priced_periods_are_flagged() {
        let config = CommissionConfig::standard();
        let packets = vec![
            packet(7, &[("111", "-369.23"), ("999", "-5.00")]),
            packet(14, &[("111", "-369.23"), ("999", "-5.00")]),
            packet(21, &[("111", "-369.23"), ("999", "-5.00")]),
        ];
        let harry = ReportConfig::with_agents(vec![AgentConfig::FixedTable(
            FixedTableAgent::standard_roster().remove(1),
        )]);

        let report = report(ReportBuilder::new(&config).build(packets, &harry));

        // 999 is still paid as Plan 1000 each period: (97 + 25) x 12 / 52 x 3
        assert_eq!(report.commissions[0].grand_total.round_dp(2), dec("84.46"));
        let fallbacks: Vec<_> = report
            .warnings
            .iter()
            .filter(|w| w.code == WARN_PLAN_FALLBACK)
            .collect();
        assert_eq!(fallbacks.len(), 3);
        assert!(fallbacks.iter().all(|w| w.message.contains("'999'")));
        assert!(fallbacks[1].message.contains("12/14/2025"));
        assert!(report.warnings.iter().any(|w| w.code == WARN_UNCLASSIFIED_PLAN));
    }

    #[test]
    fn test_every_sheet_writes_each_position_once() {
        let config = CommissionConfig::standard();
        let report_config = ReportConfig {
            agents: FixedTableAgent::standard_roster()
                .into_iter()
                .map(Into::into)
                .collect(),
            tier_group: Some(TierGroup {
                name: "Group".to_string(),
                main: TierAgent {
                    name: "Main".to_string(),
                    tier_code: "70".to_string(),
                },
                sub_agents: vec![TierAgent {
                    name: "Sub".to_string(),
                    tier_code: "50".to_string(),
                }],
            }),
            downline: None,
        };

        let report = report(ReportBuilder::new(&config).build(scenario_packets(), &report_config));

        for sheet in &report.sheets {
            let mut positions = std::collections::HashSet::new();
            for cell in &sheet.cells {
                assert!(
                    positions.insert((cell.row, cell.col)),
                    "{} writes ({}, {}) twice",
                    sheet.name,
                    cell.row,
                    cell.col
                );
            }
        }
    }
}
