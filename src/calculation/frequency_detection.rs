//! Pay frequency detection.
//!
//! A deduction amount on its own is ambiguous between frequency and plan, so
//! frequency is treated as a property of a whole file and inferred from a
//! small sample of its nonzero deductions.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::PlanRateTable;
use crate::models::{
    AuditWarning, PayFrequency, PlanLevel, WARN_FREQUENCY_DEFAULTED, WarningSeverity,
};

/// The outcome of detecting a file's frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrequencyDetection {
    /// The detected frequency; `Weekly` when defaulted.
    pub frequency: PayFrequency,
    /// The sampled deduction that matched, if any.
    pub matched_sample: Option<Decimal>,
    /// True when no sample matched and the weekly default was used.
    pub defaulted: bool,
}

impl FrequencyDetection {
    /// A warning describing the fallback, if one was used.
    pub fn warning(&self, context: &str) -> Option<AuditWarning> {
        self.defaulted.then(|| {
            AuditWarning::new(
                WARN_FREQUENCY_DEFAULTED,
                format!(
                    "No deduction in {} matched a canonical amount; defaulted to Weekly",
                    context
                ),
                WarningSeverity::Medium,
            )
        })
    }
}

/// Classifies one deduction into a pay frequency.
///
/// Frequencies are tried in the order Weekly, BiWeekly, SemiMonthly,
/// Monthly; the first one with any plan's canonical amount strictly within
/// tolerance of the magnitude wins. Zero never matches.
///
/// # Example
///
/// ```
/// use commission_engine::calculation::detect_frequency;
/// use commission_engine::config::PlanRateTable;
/// use commission_engine::models::PayFrequency;
/// use rust_decimal::Decimal;
///
/// let table = PlanRateTable::standard();
/// assert_eq!(
///     detect_frequency(Decimal::new(-73846, 2), &table),
///     Some(PayFrequency::BiWeekly)
/// );
/// assert_eq!(detect_frequency(Decimal::ZERO, &table), None);
/// ```
pub fn detect_frequency(amount: Decimal, table: &PlanRateTable) -> Option<PayFrequency> {
    let magnitude = amount.abs();
    if magnitude.is_zero() {
        return None;
    }

    PayFrequency::DETECTION_ORDER.into_iter().find(|&frequency| {
        PlanLevel::DESCENDING.into_iter().any(|level| {
            table
                .canonical(level, frequency)
                .is_some_and(|canonical| table.within_tolerance(magnitude, canonical))
        })
    })
}

/// Detects the frequency of a whole file from its deductions, in input order.
///
/// Only the first `table.sample_size()` nonzero deductions are examined. If
/// none matches, the result defaults to `Weekly` with `defaulted` set.
pub fn detect_file_frequency<I>(deductions: I, table: &PlanRateTable) -> FrequencyDetection
where
    I: IntoIterator<Item = Decimal>,
{
    let detected = deductions
        .into_iter()
        .filter(|amount| !amount.is_zero())
        .take(table.sample_size())
        .find_map(|amount| detect_frequency(amount, table).map(|frequency| (frequency, amount)));

    match detected {
        Some((frequency, sample)) => {
            debug!(%frequency, %sample, "Detected pay frequency");
            FrequencyDetection {
                frequency,
                matched_sample: Some(sample),
                defaulted: false,
            }
        }
        None => {
            warn!(
                sample_size = table.sample_size(),
                "No sampled deduction matched a canonical amount; defaulting to Weekly"
            );
            FrequencyDetection {
                frequency: PayFrequency::Weekly,
                matched_sample: None,
                defaulted: true,
            }
        }
    }
}
