//! Report model handed to a renderer.
//!
//! A [`ReportModel`] is a plain grid of cells per sheet. Computed numbers are
//! always present as values; cross-references and totals additionally carry
//! the cells they were derived from so a spreadsheet renderer can emit
//! formulas without redoing any commission math.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{AuditWarning, CommissionResult, DownlineResult, PayFrequency, TierGroupResult};

/// Sheet name for perfect employees.
pub const COMMISSIONS_SHEET: &str = "Commissions";
/// Sheet name for imperfect employees.
pub const UNPAID_SHEET: &str = "Unpaid";
/// Sheet name for the tier group breakdown.
pub const TIER_SUMMARY_SHEET: &str = "Tier Summary";
/// Sheet name for downline commissions.
pub const DOWNLINE_SHEET: &str = "Downline";

/// A cell address on a named sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellRef {
    /// Target sheet name.
    pub sheet: String,
    /// Zero-based row.
    pub row: u32,
    /// Zero-based column.
    pub col: u32,
}

/// A vertical run of cells in one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellRange {
    /// Sheet name.
    pub sheet: String,
    /// Zero-based column.
    pub col: u32,
    /// First row, inclusive.
    pub first_row: u32,
    /// Last row, inclusive.
    pub last_row: u32,
}

/// The content of one cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CellValue {
    /// Literal text.
    Text {
        /// The text.
        text: String,
    },
    /// A currency amount.
    Amount {
        /// The amount.
        value: Decimal,
    },
    /// An employee count.
    Count {
        /// The count.
        value: u32,
    },
    /// An intentionally empty cell.
    Blank,
    /// A value looked up from another cell.
    Reference {
        /// The looked-up value.
        value: Decimal,
        /// Where it was looked up from.
        target: CellRef,
    },
    /// A sum over one or more ranges.
    Total {
        /// The computed sum.
        value: Decimal,
        /// The ranges summed; empty when there were no rows.
        ranges: Vec<CellRange>,
    },
}

impl CellValue {
    /// Creates a text cell.
    pub fn text(text: impl Into<String>) -> Self {
        CellValue::Text { text: text.into() }
    }

    /// The numeric value of amount, count, reference and total cells.
    pub fn numeric(&self) -> Option<Decimal> {
        match self {
            CellValue::Amount { value }
            | CellValue::Reference { value, .. }
            | CellValue::Total { value, .. } => Some(*value),
            CellValue::Count { value } => Some(Decimal::from(*value)),
            CellValue::Text { .. } | CellValue::Blank => None,
        }
    }

    /// The text of a text cell.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text { text } => Some(text),
            _ => None,
        }
    }
}

/// One positioned cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    /// Zero-based row.
    pub row: u32,
    /// Zero-based column.
    pub col: u32,
    /// Cell content.
    pub value: CellValue,
}

/// What a sheet shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SheetKind {
    /// Perfect employees with per-period commissions.
    Commissions,
    /// Imperfect employees with missed periods.
    Unpaid,
    /// One pay period's raw deductions.
    Period,
    /// Tier group breakdown.
    TierSummary,
    /// Downline client breakdown.
    Downline,
}

/// One sheet of the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sheet {
    /// Sheet name.
    pub name: String,
    /// Sheet kind.
    pub kind: SheetKind,
    /// Cells in the order they were written; renderers place them by
    /// `row` and `col`. Each position is written once.
    pub cells: Vec<Cell>,
}

impl Sheet {
    /// Creates an empty sheet.
    pub fn new(name: impl Into<String>, kind: SheetKind) -> Self {
        Self {
            name: name.into(),
            kind,
            cells: Vec::new(),
        }
    }

    /// Appends a cell. Layouts write each position once, so this never
    /// replaces an earlier cell.
    pub fn set(&mut self, row: u32, col: u32, value: CellValue) {
        self.cells.push(Cell { row, col, value });
    }

    /// Returns the value at a position.
    pub fn get(&self, row: u32, col: u32) -> Option<&CellValue> {
        self.cells
            .iter()
            .find(|cell| cell.row == row && cell.col == col)
            .map(|cell| &cell.value)
    }

    /// Number of rows in use.
    pub fn row_count(&self) -> u32 {
        self.cells.iter().map(|cell| cell.row + 1).max().unwrap_or(0)
    }
}

/// An agent's total for the run summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentTotal {
    /// Agent or group name.
    pub agent_name: String,
    /// Run total.
    pub grand_total: Decimal,
}

/// Headline numbers for a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Run frequency.
    pub frequency: PayFrequency,
    /// Pay periods per year.
    pub divisor: u32,
    /// Earliest period date.
    pub first_period: NaiveDate,
    /// Latest period date.
    pub last_period: NaiveDate,
    /// Distinct employee ids.
    pub total_employees: usize,
    /// Perfect employees.
    pub perfect_employees: usize,
    /// Imperfect employees.
    pub imperfect_employees: usize,
    /// Number of packets.
    pub packet_count: usize,
    /// Totals per agent, in report column order.
    pub agent_totals: Vec<AgentTotal>,
}

/// A complete report for one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportModel {
    /// Unique identifier for this report.
    pub report_id: Uuid,
    /// When the report was built.
    pub generated_at: DateTime<Utc>,
    /// Version of the engine that built it.
    pub engine_version: String,
    /// Run frequency.
    pub frequency: PayFrequency,
    /// Sheet names in display order.
    pub sheet_order: Vec<String>,
    /// Sheets, in build order.
    pub sheets: Vec<Sheet>,
    /// Headline numbers.
    pub summary: RunSummary,
    /// Per-period and aggregate agent commissions.
    pub commissions: Vec<CommissionResult>,
    /// Tier group breakdown, when configured.
    pub tier_group: Option<TierGroupResult>,
    /// Downline breakdown, when configured.
    pub downline: Option<DownlineResult>,
    /// Every degradation recorded during the run.
    pub warnings: Vec<AuditWarning>,
}

impl ReportModel {
    /// Finds a sheet by name.
    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|sheet| sheet.name == name)
    }
}

/// Why a run produced no report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoDataReason {
    /// No packets were supplied.
    NoPackets,
    /// Packets were supplied but held no employee rows.
    NoBillableEmployees,
    /// No agent, tier group or downline was configured.
    NoAgents,
}

/// The result of a report run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ReportOutcome {
    /// A report was built.
    Report(Box<ReportModel>),
    /// Nothing to report.
    NoData {
        /// Why.
        reason: NoDataReason,
    },
}
