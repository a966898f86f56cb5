//! Plan level classification.
//!
//! Two classifiers share the same calibration data but differ on a miss:
//! the threshold ladder leaves an amount unclassified, while the nearest
//! form falls back to the 1000 plan. Both operate on the magnitude.

use rust_decimal::Decimal;

use crate::config::{PlanRateTable, ThresholdLadder};
use crate::models::{PayFrequency, PlanLevel};

/// Classifies an employee's first payment against frequency-specific cutoffs.
///
/// Cutoffs are lower bounds checked from the 1600 plan down. An amount
/// below the lowest cutoff, a zero amount, or an `Unknown` frequency gives
/// `None`.
///
/// # Example
///
/// ```
/// use commission_engine::calculation::classify_by_threshold;
/// use commission_engine::config::ThresholdLadder;
/// use commission_engine::models::{PayFrequency, PlanLevel};
/// use rust_decimal::Decimal;
///
/// let ladder = ThresholdLadder::standard();
/// assert_eq!(
///     classify_by_threshold(Decimal::from(316), PayFrequency::Weekly, &ladder),
///     Some(PlanLevel::Plan1400)
/// );
/// assert_eq!(
///     classify_by_threshold(Decimal::from(219), PayFrequency::Weekly, &ladder),
///     None
/// );
/// ```
pub fn classify_by_threshold(
    amount: Decimal,
    frequency: PayFrequency,
    ladder: &ThresholdLadder,
) -> Option<PlanLevel> {
    let magnitude = amount.abs();
    if magnitude.is_zero() {
        return None;
    }

    let cutoffs = ladder.cutoffs(frequency)?;
    PlanLevel::DESCENDING
        .into_iter()
        .find(|&level| magnitude >= cutoffs.get(level))
}

/// Classifies an arbitrary period deduction to the nearest canonical amount.
///
/// Plans are checked from 1600 down; the first canonical amount strictly
/// within tolerance wins. A nonzero amount that matches nothing falls back to
/// the 1000 plan. Zero gives `None`.
///
/// # Example
///
/// ```
/// use commission_engine::calculation::classify_nearest;
/// use commission_engine::config::PlanRateTable;
/// use commission_engine::models::{PayFrequency, PlanLevel};
/// use rust_decimal::Decimal;
///
/// let table = PlanRateTable::standard();
/// assert_eq!(
///     classify_nearest(Decimal::new(36923, 2), PayFrequency::Weekly, &table),
///     Some(PlanLevel::Plan1600)
/// );
/// assert_eq!(
///     classify_nearest(Decimal::from(5), PayFrequency::Weekly, &table),
///     Some(PlanLevel::Plan1000)
/// );
/// ```
pub fn classify_nearest(
    amount: Decimal,
    frequency: PayFrequency,
    table: &PlanRateTable,
) -> Option<PlanLevel> {
    match_nearest(amount, frequency, table).map(|matched| matched.level)
}

/// A nearest-form classification and whether it came from the fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NearestMatch {
    /// The plan level assigned.
    pub level: PlanLevel,
    /// True when no canonical amount was within tolerance.
    pub fallback: bool,
}

/// Like [`classify_nearest`], but reports whether the 1000 plan was a fallback.
pub fn match_nearest(
    amount: Decimal,
    frequency: PayFrequency,
    table: &PlanRateTable,
) -> Option<NearestMatch> {
    let magnitude = amount.abs();
    if magnitude.is_zero() {
        return None;
    }

    let matched = table.amounts(frequency).and_then(|amounts| {
        PlanLevel::DESCENDING
            .into_iter()
            .find(|&level| table.within_tolerance(magnitude, amounts.get(level)))
    });

    Some(match matched {
        Some(level) => NearestMatch {
            level,
            fallback: false,
        },
        None => NearestMatch {
            level: PlanLevel::Plan1000,
            fallback: true,
        },
    })
}
