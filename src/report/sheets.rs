//! Sheet layouts.
//!
//! Row and column positions here are the contract with renderers: headers on
//! rows 0 and 1, employee rows from row 2, one column block per period.

use std::collections::HashMap;

use rust_decimal::Decimal;

use crate::calculation::{CommissionEngine, period_plan_labels};
use crate::config::PlanRateTable;
use crate::models::{
    AgentConfig, COMMISSIONS_SHEET, CellRange, CellRef, CellValue, CommissionBreakdown,
    CommissionResult, DOWNLINE_SHEET, DownlineResult, EmployeeAttendance, PeriodPacket,
    PlanLevel, Reconciliation, Sheet, SheetKind, TIER_SUMMARY_SHEET, TierGroupResult,
    UNPAID_SHEET,
};

/// First row holding employee data on the Commissions and Unpaid sheets.
pub(crate) const FIRST_DATA_ROW: u32 = 2;
/// Column of the deduction on a period sheet.
pub(crate) const PERIOD_AMOUNT_COL: u32 = 1;

/// A built period sheet and where each employee's row landed.
pub(crate) struct PeriodSheet {
    pub sheet: Sheet,
    rows: HashMap<String, u32>,
}

impl PeriodSheet {
    fn name(&self) -> &str {
        &self.sheet.name
    }

    fn row_of(&self, employee_id: &str) -> Option<u32> {
        self.rows.get(employee_id).copied()
    }
}

/// Names period sheets `M.D`, suffixing repeats with ` (2)`, ` (3)`, ...
pub(crate) fn period_sheet_names(packets: &[PeriodPacket]) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    packets
        .iter()
        .map(|packet| {
            let base = packet.sheet_name();
            let count = seen.entry(base.clone()).or_insert(0);
            *count += 1;
            if *count == 1 {
                base
            } else {
                format!("{} ({})", base, count)
            }
        })
        .collect()
}

/// One packet's raw deductions: id, display amount, and a total row.
pub(crate) fn period_sheet(packet: &PeriodPacket, name: String) -> PeriodSheet {
    let mut sheet = Sheet::new(name, SheetKind::Period);
    let mut rows = HashMap::new();

    sheet.set(0, 0, CellValue::text("Employee ID"));
    sheet.set(0, PERIOD_AMOUNT_COL, CellValue::text("Deduction"));
    sheet.set(0, 2, CellValue::text(packet.display_date()));

    let mut row = 1;
    let mut total = Decimal::ZERO;
    for employee_id in packet.employee_ids() {
        sheet.set(row, 0, CellValue::text(employee_id));
        match packet.display_amount(employee_id) {
            Some(value) => {
                total += value;
                sheet.set(row, PERIOD_AMOUNT_COL, CellValue::Amount { value });
            }
            None => sheet.set(row, PERIOD_AMOUNT_COL, CellValue::Blank),
        }
        rows.insert(employee_id.to_string(), row);
        row += 1;
    }

    let ranges = if row > 1 {
        vec![CellRange {
            sheet: sheet.name.clone(),
            col: PERIOD_AMOUNT_COL,
            first_row: 1,
            last_row: row - 1,
        }]
    } else {
        Vec::new()
    };
    sheet.set(row, 0, CellValue::text("Total"));
    sheet.set(row, PERIOD_AMOUNT_COL, CellValue::Total { value: total, ranges });

    PeriodSheet { sheet, rows }
}

/// Column positions of one period block.
struct PeriodColumns {
    deduction: u32,
    plan: u32,
    agents: Vec<u32>,
}

fn period_columns(packet_count: usize, agent_count: usize) -> Vec<PeriodColumns> {
    let width = 2 + agent_count as u32;
    (0..packet_count as u32)
        .map(|period| {
            let base = 1 + period * width;
            PeriodColumns {
                deduction: base,
                plan: base + 1,
                agents: (0..agent_count as u32).map(|agent| base + 2 + agent).collect(),
            }
        })
        .collect()
}

/// Everything the employee sheets need to lay out rows.
pub(crate) struct EmployeeSheetContext<'a> {
    pub packets: &'a [PeriodPacket],
    pub period_sheets: &'a [PeriodSheet],
    pub agents: &'a [&'a AgentConfig],
    pub engine: CommissionEngine<'a>,
    pub plan_table: &'a PlanRateTable,
    pub reconciliation: &'a Reconciliation,
}

impl EmployeeSheetContext<'_> {
    fn columns(&self) -> Vec<PeriodColumns> {
        period_columns(self.packets.len(), self.agents.len())
    }

    /// First column to the right of every period block.
    fn trailing_col(&self) -> u32 {
        1 + (self.packets.len() * (2 + self.agents.len())) as u32
    }

    fn write_headers(&self, sheet: &mut Sheet, columns: &[PeriodColumns]) {
        sheet.set(0, 0, CellValue::text("Employee ID"));
        for (packet, block) in self.packets.iter().zip(columns) {
            sheet.set(0, block.deduction, CellValue::text(packet.display_date()));
            sheet.set(1, block.deduction, CellValue::text("Deduction"));
            sheet.set(1, block.plan, CellValue::text("Plan"));
            for (agent, &col) in self.agents.iter().zip(&block.agents) {
                sheet.set(1, col, CellValue::text(agent.name()));
            }
        }
    }

    fn write_employee(
        &self,
        sheet: &mut Sheet,
        row: u32,
        employee: &EmployeeAttendance,
        columns: &[PeriodColumns],
    ) {
        let id = employee.employee_id.as_str();
        sheet.set(row, 0, CellValue::text(id));

        let labels = period_plan_labels(employee, self.reconciliation.frequency, self.plan_table);
        let commissions: Vec<Vec<Decimal>> = self
            .agents
            .iter()
            .map(|agent| {
                self.engine
                    .employee_period_commissions(agent, employee, self.reconciliation)
            })
            .collect();

        for (period, block) in columns.iter().enumerate() {
            let packet = &self.packets[period];
            let period_sheet = &self.period_sheets[period];

            let deduction = match (packet.display_amount(id), period_sheet.row_of(id)) {
                (Some(value), Some(target_row)) => CellValue::Reference {
                    value,
                    target: CellRef {
                        sheet: period_sheet.name().to_string(),
                        row: target_row,
                        col: PERIOD_AMOUNT_COL,
                    },
                },
                _ => CellValue::Blank,
            };
            sheet.set(row, block.deduction, deduction);

            let label = labels.get(period).copied().flatten();
            sheet.set(row, block.plan, plan_label(label));

            for (agent_amounts, &col) in commissions.iter().zip(&block.agents) {
                let value = agent_amounts.get(period).copied().unwrap_or(Decimal::ZERO);
                sheet.set(row, col, CellValue::Amount { value });
            }
        }
    }
}

fn plan_label(level: Option<PlanLevel>) -> CellValue {
    match level {
        Some(level) => CellValue::text(level.to_string()),
        None => CellValue::Blank,
    }
}

fn column_range(sheet: &str, col: u32, rows: u32) -> Option<CellRange> {
    (rows > 0).then(|| CellRange {
        sheet: sheet.to_string(),
        col,
        first_row: FIRST_DATA_ROW,
        last_row: FIRST_DATA_ROW + rows - 1,
    })
}

/// Perfect employees with per-period commissions, period totals and grand totals.
///
/// `results` must line up with `context.agents`.
pub(crate) fn commissions_sheet(
    context: &EmployeeSheetContext<'_>,
    results: &[CommissionResult],
) -> Sheet {
    let mut sheet = Sheet::new(COMMISSIONS_SHEET, SheetKind::Commissions);
    let columns = context.columns();
    context.write_headers(&mut sheet, &columns);

    let perfect = &context.reconciliation.perfect;
    for (index, employee) in perfect.iter().enumerate() {
        context.write_employee(&mut sheet, FIRST_DATA_ROW + index as u32, employee, &columns);
    }

    let rows = perfect.len() as u32;
    let totals_row = FIRST_DATA_ROW + rows + 1;
    sheet.set(totals_row, 0, CellValue::text("Period Totals"));
    for (period, block) in columns.iter().enumerate() {
        for (result, &col) in results.iter().zip(&block.agents) {
            let value = per_period_amount(result, period);
            sheet.set(
                totals_row,
                col,
                CellValue::Total {
                    value,
                    ranges: column_range(COMMISSIONS_SHEET, col, rows).into_iter().collect(),
                },
            );
        }
    }

    let totals_col = context.trailing_col() + 1;
    sheet.set(0, totals_col, CellValue::text("Grand Totals"));
    for (index, result) in results.iter().enumerate() {
        let col = totals_col + index as u32;
        let ranges = columns
            .iter()
            .filter_map(|block| block.agents.get(index))
            .filter_map(|&agent_col| column_range(COMMISSIONS_SHEET, agent_col, rows))
            .collect();
        sheet.set(1, col, CellValue::text(&result.agent_name));
        sheet.set(
            FIRST_DATA_ROW,
            col,
            CellValue::Total {
                value: result.grand_total,
                ranges,
            },
        );
    }

    sheet
}

fn per_period_amount(result: &CommissionResult, period: usize) -> Decimal {
    match &result.breakdown {
        CommissionBreakdown::PerPeriod { amounts } => {
            amounts.get(period).copied().unwrap_or(Decimal::ZERO)
        }
        CommissionBreakdown::Aggregate { .. } => Decimal::ZERO,
    }
}

/// Imperfect employees with the same period blocks and their missed dates.
pub(crate) fn unpaid_sheet(context: &EmployeeSheetContext<'_>) -> Sheet {
    let mut sheet = Sheet::new(UNPAID_SHEET, SheetKind::Unpaid);
    let columns = context.columns();
    context.write_headers(&mut sheet, &columns);

    let missed_col = context.trailing_col();
    sheet.set(1, missed_col, CellValue::text("Missed Periods"));

    for (index, employee) in context.reconciliation.imperfect.iter().enumerate() {
        let row = FIRST_DATA_ROW + index as u32;
        context.write_employee(&mut sheet, row, employee, &columns);

        let missed: Vec<String> = employee
            .missed_periods
            .iter()
            .map(|date| date.format("%m/%d/%Y").to_string())
            .collect();
        sheet.set(row, missed_col, CellValue::text(missed.join(", ")));
    }

    sheet
}

/// Plan counts, each tier commission and override, and the group totals.
pub(crate) fn tier_summary_sheet(result: &TierGroupResult) -> Sheet {
    let mut sheet = Sheet::new(TIER_SUMMARY_SHEET, SheetKind::TierSummary);

    sheet.set(0, 0, CellValue::text(&result.group_name));
    sheet.set(1, 0, CellValue::text("Plan"));
    sheet.set(1, 1, CellValue::text("Perfect Employees"));
    let mut row = 2;
    for level in PlanLevel::DESCENDING {
        sheet.set(row, 0, CellValue::text(level.to_string()));
        sheet.set(
            row,
            1,
            CellValue::Count {
                value: result.plan_counts.get(level),
            },
        );
        row += 1;
    }

    row += 1;
    sheet.set(row, 0, CellValue::text("Agent"));
    sheet.set(row, 1, CellValue::text("Tier"));
    sheet.set(row, 2, CellValue::text("Role"));
    sheet.set(row, 3, CellValue::text("Commission"));
    row += 1;

    let sub_first = row;
    for sub_agent in &result.sub_agents {
        sheet.set(row, 0, CellValue::text(&sub_agent.agent_name));
        sheet.set(row, 1, CellValue::text(&sub_agent.tier_code));
        sheet.set(row, 2, CellValue::text("Sub-agent"));
        sheet.set(row, 3, CellValue::Amount { value: sub_agent.amount });
        row += 1;
    }
    let sub_rows = row - sub_first;

    let main_first = row;
    sheet.set(row, 0, CellValue::text(&result.main.agent_name));
    sheet.set(row, 1, CellValue::text(&result.main.tier_code));
    sheet.set(row, 2, CellValue::text("Main"));
    sheet.set(row, 3, CellValue::Amount { value: result.main.amount });
    row += 1;
    for override_commission in &result.overrides {
        sheet.set(
            row,
            0,
            CellValue::text(format!("Override on {}", override_commission.sub_agent)),
        );
        sheet.set(row, 1, CellValue::text(&override_commission.sub_tier_code));
        sheet.set(row, 2, CellValue::text("Override"));
        sheet.set(
            row,
            3,
            CellValue::Amount {
                value: override_commission.amount,
            },
        );
        row += 1;
    }
    let main_rows = row - main_first;

    let sub_range = (sub_rows > 0).then(|| CellRange {
        sheet: TIER_SUMMARY_SHEET.to_string(),
        col: 3,
        first_row: sub_first,
        last_row: sub_first + sub_rows - 1,
    });
    let main_range = CellRange {
        sheet: TIER_SUMMARY_SHEET.to_string(),
        col: 3,
        first_row: main_first,
        last_row: main_first + main_rows - 1,
    };

    row += 1;
    sheet.set(row, 0, CellValue::text("Sub-agent Total"));
    sheet.set(
        row,
        3,
        CellValue::Total {
            value: result.sub_agent_total,
            ranges: sub_range.clone().into_iter().collect(),
        },
    );
    row += 1;
    sheet.set(row, 0, CellValue::text("Main Total"));
    sheet.set(
        row,
        3,
        CellValue::Total {
            value: result.main_total,
            ranges: vec![main_range.clone()],
        },
    );
    row += 1;
    sheet.set(row, 0, CellValue::text("Grand Total"));
    sheet.set(
        row,
        3,
        CellValue::Total {
            value: result.grand_total,
            ranges: sub_range.into_iter().chain([main_range]).collect(),
        },
    );

    sheet
}

/// Plan count summary followed by one section per client.
pub(crate) fn downline_sheet(result: &DownlineResult) -> Sheet {
    let mut sheet = Sheet::new(DOWNLINE_SHEET, SheetKind::Downline);

    sheet.set(0, 0, CellValue::text(&result.roster_title));
    sheet.set(1, 0, CellValue::text("Plan 1000 Employees"));
    sheet.set(
        1,
        1,
        CellValue::Count {
            value: result.summary.plan_1000,
        },
    );
    sheet.set(2, 0, CellValue::text("Other Plan Employees"));
    sheet.set(
        2,
        1,
        CellValue::Count {
            value: result.summary.other_plans,
        },
    );
    sheet.set(3, 0, CellValue::text("Periods"));
    sheet.set(
        3,
        1,
        CellValue::Count {
            value: result.period_count as u32,
        },
    );

    let mut row = 5;
    sheet.set(row, 0, CellValue::text("Client"));
    sheet.set(row, 1, CellValue::text("Agent"));
    sheet.set(row, 2, CellValue::text("Plan 1000 Rate"));
    sheet.set(row, 3, CellValue::text("Other Plan Rate"));
    sheet.set(row, 4, CellValue::text("Commission"));
    row += 1;

    let mut client_ranges = Vec::new();
    for client in &result.clients {
        let first = row;
        for agent in &client.agents {
            sheet.set(row, 0, CellValue::text(&client.client_name));
            sheet.set(row, 1, CellValue::text(&agent.agent_name));
            sheet.set(row, 2, CellValue::Amount { value: agent.rates.plan_1000 });
            sheet.set(row, 3, CellValue::Amount { value: agent.rates.other });
            sheet.set(row, 4, CellValue::Amount { value: agent.amount });
            row += 1;
        }

        let range = (row > first).then(|| CellRange {
            sheet: DOWNLINE_SHEET.to_string(),
            col: 4,
            first_row: first,
            last_row: row - 1,
        });
        sheet.set(row, 0, CellValue::text(format!("{} Total", client.client_name)));
        sheet.set(
            row,
            4,
            CellValue::Total {
                value: client.total,
                ranges: range.clone().into_iter().collect(),
            },
        );
        client_ranges.extend(range);
        row += 2;
    }

    sheet.set(row, 0, CellValue::text("Grand Total"));
    sheet.set(
        row,
        4,
        CellValue::Total {
            value: result.grand_total,
            ranges: client_ranges,
        },
    );

    sheet
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculation::{calculate_downline, calculate_tier_group};
    use crate::config::TierRateTable;
    use crate::models::{
        DownlineAgent, DownlineClient, DownlineRoster, PayFrequency, PlanCountSummary,
        PlanCounts, PlanRates, TierAgent, TierGroup,
    };
    use chrono::NaiveDate;
    use std::collections::BTreeMap;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn packet(month: u32, day: u32, rows: &[(&str, &str)]) -> PeriodPacket {
        let deductions = rows
            .iter()
            .map(|(id, amount)| (id.to_string(), dec(amount)))
            .collect();
        PeriodPacket::new(
            NaiveDate::from_ymd_opt(2025, month, day).unwrap(),
            PayFrequency::Weekly,
            deductions,
        )
        .unwrap()
    }

    #[test]
    fn test_period_sheet_names_suffix_repeats() {
        let packets = vec![
            packet(12, 7, &[]),
            packet(12, 7, &[]),
            packet(1, 4, &[]),
            packet(12, 7, &[]),
        ];
        assert_eq!(
            period_sheet_names(&packets),
            vec!["12.7", "12.7 (2)", "1.4", "12.7 (3)"]
        );
    }

    /// RS-001: period sheet shows paid amounts negated and unpaid as blank
    #[test]
    fn test_period_sheet_layout() {
        let p = packet(12, 7, &[("222", "0"), ("111", "369.23")]);
        let period = period_sheet(&p, p.sheet_name());

        assert_eq!(period.sheet.get(0, 2).and_then(CellValue::as_text), Some("12/07/2025"));
        assert_eq!(period.sheet.get(1, 0).and_then(CellValue::as_text), Some("111"));
        assert_eq!(
            period.sheet.get(1, 1),
            Some(&CellValue::Amount {
                value: dec("-369.23")
            })
        );
        assert_eq!(period.sheet.get(2, 1), Some(&CellValue::Blank));
        assert_eq!(period.row_of("222"), Some(2));
        assert_eq!(
            period.sheet.get(3, 1).and_then(CellValue::numeric),
            Some(dec("-369.23"))
        );
    }

    #[test]
    fn test_empty_period_sheet_total_has_no_ranges() {
        let p = packet(12, 7, &[]);
        let period = period_sheet(&p, p.sheet_name());

        assert_eq!(
            period.sheet.get(1, 1),
            Some(&CellValue::Total {
                value: Decimal::ZERO,
                ranges: vec![]
            })
        );
    }

    #[test]
    fn test_tier_summary_totals() {
        let group = TierGroup {
            name: "Group".to_string(),
            main: TierAgent {
                name: "Main".to_string(),
                tier_code: "70".to_string(),
            },
            sub_agents: vec![TierAgent {
                name: "Sub".to_string(),
                tier_code: "50".to_string(),
            }],
        };
        let counts = PlanCounts {
            plan_1600: 2,
            plan_1400: 0,
            plan_1200: 0,
            plan_1000: 1,
        };
        let result = calculate_tier_group(&group, &counts, &TierRateTable::standard()).result;

        let sheet = tier_summary_sheet(&result);

        assert_eq!(sheet.get(2, 1), Some(&CellValue::Count { value: 2 }));
        // Rows: title, header, four counts, blank, agent header, sub, main, override
        assert_eq!(sheet.get(8, 3).and_then(CellValue::numeric), Some(dec("189")));
        assert_eq!(sheet.get(10, 3).and_then(CellValue::numeric), Some(dec("50")));
        let Some(CellValue::Total { value, ranges }) = sheet.get(14, 3) else {
            panic!("expected grand total");
        };
        assert_eq!(*value, dec("478"));
        assert_eq!(ranges.len(), 2);
    }

    #[test]
    fn test_downline_sheet_client_sections() {
        let roster = DownlineRoster {
            title: "Harry's Downline".to_string(),
            clients: vec![DownlineClient {
                name: "JANUS".to_string(),
                agents: vec![
                    DownlineAgent {
                        name: "Agent1".to_string(),
                        rates: PlanRates::new(dec("35"), dec("35"), dec("35"), dec("15")),
                    },
                    DownlineAgent {
                        name: "Agent2".to_string(),
                        rates: PlanRates::new(dec("35"), dec("35"), dec("35"), dec("15")),
                    },
                ],
                period_count_rates: BTreeMap::new(),
            }],
        };
        let summary = PlanCountSummary {
            plan_1000: 1,
            other_plans: 2,
        };
        let result = calculate_downline(&roster, None, &summary, 3).result;

        let sheet = downline_sheet(&result);

        assert_eq!(sheet.get(3, 1), Some(&CellValue::Count { value: 3 }));
        assert_eq!(sheet.get(6, 4).and_then(CellValue::numeric), Some(dec("85")));
        assert_eq!(sheet.get(8, 0).and_then(CellValue::as_text), Some("JANUS Total"));
        assert_eq!(sheet.get(8, 4).and_then(CellValue::numeric), Some(dec("170")));
        assert_eq!(sheet.get(10, 4).and_then(CellValue::numeric), Some(dec("170")));
    }
}
