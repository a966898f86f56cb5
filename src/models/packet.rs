//! Period packet model.
//!
//! A [`PeriodPacket`] holds one pay period's cleaned employee to deduction
//! mapping. Packets are immutable once built and always carry a known
//! frequency.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

use super::PayFrequency;
use crate::error::{EngineError, EngineResult};

/// One pay period's deductions.
///
/// Amounts are stored signed as they appear in payroll; classification and
/// commission math only ever look at the magnitude.
///
/// # Example
///
/// ```
/// use commission_engine::models::{PayFrequency, PeriodPacket};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
/// use std::collections::BTreeMap;
///
/// let mut deductions = BTreeMap::new();
/// deductions.insert("111".to_string(), Decimal::new(36923, 2));
///
/// let packet = PeriodPacket::new(
///     NaiveDate::from_ymd_opt(2025, 12, 7).unwrap(),
///     PayFrequency::Weekly,
///     deductions,
/// )
/// .unwrap();
///
/// assert_eq!(packet.divisor(), 52);
/// assert_eq!(packet.sheet_name(), "12.7");
/// assert_eq!(packet.display_amount("111"), Some(Decimal::new(-36923, 2)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeriodPacket {
    period_date: NaiveDate,
    frequency: PayFrequency,
    divisor: u32,
    deductions: BTreeMap<String, Decimal>,
}

impl PeriodPacket {
    /// Creates a packet from an already-cleaned deduction mapping.
    ///
    /// # Errors
    ///
    /// Returns `UnknownFrequency` if `frequency` is `Unknown`, and
    /// `InvalidPacket` if any employee id is blank or two ids are the same
    /// once trimmed.
    pub fn new(
        period_date: NaiveDate,
        frequency: PayFrequency,
        deductions: BTreeMap<String, Decimal>,
    ) -> EngineResult<Self> {
        let divisor = frequency
            .divisor()
            .ok_or(EngineError::UnknownFrequency { period_date })?;

        let mut cleaned = BTreeMap::new();
        for (employee_id, amount) in deductions {
            let trimmed = employee_id.trim();
            if trimmed.is_empty() {
                return Err(EngineError::InvalidPacket {
                    period_date,
                    message: "blank employee id".to_string(),
                });
            }
            match cleaned.entry(trimmed.to_string()) {
                Entry::Vacant(entry) => {
                    entry.insert(amount);
                }
                Entry::Occupied(entry) => {
                    return Err(EngineError::InvalidPacket {
                        period_date,
                        message: format!(
                            "employee id '{}' appears more than once after trimming",
                            entry.key()
                        ),
                    });
                }
            }
        }

        Ok(Self {
            period_date,
            frequency,
            divisor,
            deductions: cleaned,
        })
    }

    /// The pay period date.
    pub fn period_date(&self) -> NaiveDate {
        self.period_date
    }

    /// The packet's pay frequency; never `Unknown`.
    pub fn frequency(&self) -> PayFrequency {
        self.frequency
    }

    /// Pay periods per year for this packet's frequency.
    pub fn divisor(&self) -> u32 {
        self.divisor
    }

    /// All deductions keyed by employee id.
    pub fn deductions(&self) -> &BTreeMap<String, Decimal> {
        &self.deductions
    }

    /// Employee ids present in this packet, ascending.
    pub fn employee_ids(&self) -> impl Iterator<Item = &str> {
        self.deductions.keys().map(String::as_str)
    }

    /// The signed deduction for an employee; absent ids read as zero.
    pub fn amount(&self, employee_id: &str) -> Decimal {
        self.deductions
            .get(employee_id)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// Returns true if the employee has a nonzero deduction in this period.
    pub fn is_paid(&self, employee_id: &str) -> bool {
        !self.amount(employee_id).is_zero()
    }

    /// The amount as shown on a period sheet: `-|amount|` when paid, blank otherwise.
    pub fn display_amount(&self, employee_id: &str) -> Option<Decimal> {
        let amount = self.amount(employee_id);
        if amount.is_zero() {
            None
        } else {
            Some(-amount.abs())
        }
    }

    /// Number of employee rows in the packet.
    pub fn len(&self) -> usize {
        self.deductions.len()
    }

    /// Returns true if the packet has no employee rows.
    pub fn is_empty(&self) -> bool {
        self.deductions.is_empty()
    }

    /// Sheet name for this period (`M.D`, e.g. `12.7`).
    pub fn sheet_name(&self) -> String {
        format!("{}.{}", self.period_date.month(), self.period_date.day())
    }

    /// Display date for this period (`MM/DD/YYYY`).
    pub fn display_date(&self) -> String {
        self.period_date.format("%m/%d/%Y").to_string()
    }
}

/// Sorts packets ascending by period date.
///
/// The sort is stable, so packets sharing a date keep their input order.
pub fn packets_in_order(mut packets: Vec<PeriodPacket>) -> Vec<PeriodPacket> {
    packets.sort_by_key(PeriodPacket::period_date);
    packets
}
