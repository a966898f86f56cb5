//! Building period packets from ingested rows.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{debug, warn};

use super::frequency_detection::{FrequencyDetection, detect_file_frequency};
use crate::config::PlanRateTable;
use crate::error::EngineResult;
use crate::models::{AuditWarning, PeriodPacket, WARN_DUPLICATE_EMPLOYEE, WarningSeverity};

/// A packet built from raw rows, with what was learned building it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledPacket {
    /// The finished packet.
    pub packet: PeriodPacket,
    /// How its frequency was established.
    pub detection: FrequencyDetection,
    /// Degradations found while building it.
    pub warnings: Vec<AuditWarning>,
}

impl PeriodPacket {
    /// Builds a packet from `(employee_id, amount)` rows in file order.
    ///
    /// Ids are trimmed and blank ids skipped. The frequency is detected from
    /// the rows' amounts. When an id repeats, the first row wins and a
    /// warning is recorded.
    ///
    /// # Example
    ///
    /// ```
    /// use commission_engine::config::PlanRateTable;
    /// use commission_engine::models::{PayFrequency, PeriodPacket};
    /// use chrono::NaiveDate;
    /// use rust_decimal::Decimal;
    ///
    /// let rows = vec![
    ///     ("111", Decimal::new(-36923, 2)),
    ///     ("", Decimal::new(100, 0)),
    ///     ("222", Decimal::ZERO),
    /// ];
    /// let assembled = PeriodPacket::from_rows(
    ///     NaiveDate::from_ymd_opt(2025, 12, 7).unwrap(),
    ///     rows,
    ///     &PlanRateTable::standard(),
    /// )
    /// .unwrap();
    ///
    /// assert_eq!(assembled.packet.frequency(), PayFrequency::Weekly);
    /// assert_eq!(assembled.packet.len(), 2);
    /// ```
    pub fn from_rows<I, S>(
        period_date: NaiveDate,
        rows: I,
        table: &PlanRateTable,
    ) -> EngineResult<AssembledPacket>
    where
        I: IntoIterator<Item = (S, Decimal)>,
        S: AsRef<str>,
    {
        let mut deductions = BTreeMap::new();
        let mut amounts_in_order = Vec::new();
        let mut warnings = Vec::new();

        for (employee_id, amount) in rows {
            let employee_id = employee_id.as_ref().trim();
            if employee_id.is_empty() {
                continue;
            }
            amounts_in_order.push(amount);

            match deductions.entry(employee_id.to_string()) {
                Entry::Vacant(entry) => {
                    entry.insert(amount);
                }
                Entry::Occupied(entry) => {
                    warn!(
                        %period_date,
                        employee_id,
                        kept = %entry.get(),
                        ignored = %amount,
                        "Duplicate employee id in packet; keeping first row"
                    );
                    warnings.push(AuditWarning::new(
                        WARN_DUPLICATE_EMPLOYEE,
                        format!(
                            "Employee '{}' appears more than once in period {}; kept {}",
                            employee_id,
                            period_date,
                            entry.get()
                        ),
                        WarningSeverity::Medium,
                    ));
                }
            }
        }

        let detection = detect_file_frequency(amounts_in_order, table);
        if let Some(warning) = detection.warning(&format!("period {}", period_date)) {
            warnings.push(warning);
        }

        let packet = PeriodPacket::new(period_date, detection.frequency, deductions)?;
        debug!(
            %period_date,
            frequency = %packet.frequency(),
            rows = packet.len(),
            "Assembled period packet"
        );

        Ok(AssembledPacket {
            packet,
            detection,
            warnings,
        })
    }
}
