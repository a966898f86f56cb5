//! Built-in rate tables.
//!
//! These tables are immutable value objects passed explicitly into every
//! calculation. The standard constructors hold the calibration data the
//! program has always used; `tiers.yaml` may replace the tier table.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{PayFrequency, PlanLevel, PlanRates};

/// Absolute tolerance used when matching a deduction to a canonical amount.
pub const DETECTION_TOLERANCE: Decimal = Decimal::ONE;

/// How many nonzero deductions file-level frequency detection samples.
pub const DEFAULT_SAMPLE_SIZE: usize = 20;

fn rates(plan_1600: i64, plan_1400: i64, plan_1200: i64, plan_1000: i64, scale: u32) -> PlanRates {
    PlanRates::new(
        Decimal::new(plan_1600, scale),
        Decimal::new(plan_1400, scale),
        Decimal::new(plan_1200, scale),
        Decimal::new(plan_1000, scale),
    )
}

/// Canonical per-period deduction for every plan at every frequency.
///
/// # Example
///
/// ```
/// use commission_engine::config::PlanRateTable;
/// use commission_engine::models::{PayFrequency, PlanLevel};
/// use rust_decimal::Decimal;
///
/// let table = PlanRateTable::standard();
/// assert_eq!(
///     table.canonical(PlanLevel::Plan1600, PayFrequency::Weekly),
///     Some(Decimal::new(36923, 2))
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanRateTable {
    weekly: PlanRates,
    bi_weekly: PlanRates,
    semi_monthly: PlanRates,
    monthly: PlanRates,
    tolerance: Decimal,
    sample_size: usize,
}

impl PlanRateTable {
    /// The standard calibration table with the default tolerance and sample size.
    pub fn standard() -> Self {
        Self {
            weekly: rates(36923, 32308, 27692, 23077, 2),
            bi_weekly: rates(73846, 64615, 55385, 46154, 2),
            semi_monthly: rates(800, 700, 600, 500, 0),
            monthly: rates(1600, 1400, 1200, 1000, 0),
            tolerance: DETECTION_TOLERANCE,
            sample_size: DEFAULT_SAMPLE_SIZE,
        }
    }

    /// Returns a copy with different detection settings.
    pub fn with_detection(mut self, tolerance: Decimal, sample_size: usize) -> Self {
        self.tolerance = tolerance;
        self.sample_size = sample_size;
        self
    }

    /// Canonical amounts for one frequency; `None` for `Unknown`.
    pub fn amounts(&self, frequency: PayFrequency) -> Option<&PlanRates> {
        match frequency {
            PayFrequency::Weekly => Some(&self.weekly),
            PayFrequency::BiWeekly => Some(&self.bi_weekly),
            PayFrequency::SemiMonthly => Some(&self.semi_monthly),
            PayFrequency::Monthly => Some(&self.monthly),
            PayFrequency::Unknown => None,
        }
    }

    /// Canonical amount for one plan at one frequency.
    pub fn canonical(&self, level: PlanLevel, frequency: PayFrequency) -> Option<Decimal> {
        self.amounts(frequency).map(|amounts| amounts.get(level))
    }

    /// Returns true if `amount` lies strictly within tolerance of `canonical`.
    pub fn within_tolerance(&self, amount: Decimal, canonical: Decimal) -> bool {
        (amount - canonical).abs() < self.tolerance
    }

    /// Matching tolerance.
    pub fn tolerance(&self) -> Decimal {
        self.tolerance
    }

    /// Number of nonzero deductions sampled for file-level detection.
    pub fn sample_size(&self) -> usize {
        self.sample_size
    }
}

impl Default for PlanRateTable {
    fn default() -> Self {
        Self::standard()
    }
}

/// Lower-bound cutoffs for classifying a first payment, per frequency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThresholdLadder {
    weekly: PlanRates,
    bi_weekly: PlanRates,
    semi_monthly: PlanRates,
    monthly: PlanRates,
}

impl ThresholdLadder {
    /// The standard cutoffs.
    pub fn standard() -> Self {
        Self {
            weekly: rates(360, 315, 270, 220, 0),
            bi_weekly: rates(720, 630, 540, 450, 0),
            semi_monthly: rates(780, 680, 580, 480, 0),
            monthly: rates(1550, 1350, 1150, 950, 0),
        }
    }

    /// Cutoffs for one frequency; `None` for `Unknown`.
    pub fn cutoffs(&self, frequency: PayFrequency) -> Option<&PlanRates> {
        match frequency {
            PayFrequency::Weekly => Some(&self.weekly),
            PayFrequency::BiWeekly => Some(&self.bi_weekly),
            PayFrequency::SemiMonthly => Some(&self.semi_monthly),
            PayFrequency::Monthly => Some(&self.monthly),
            PayFrequency::Unknown => None,
        }
    }
}

impl Default for ThresholdLadder {
    fn default() -> Self {
        Self::standard()
    }
}

/// Per-employee commission rate for each plan, keyed by tier code.
///
/// # Example
///
/// ```
/// use commission_engine::config::TierRateTable;
/// use commission_engine::models::PlanLevel;
/// use rust_decimal::Decimal;
///
/// let tiers = TierRateTable::standard();
/// assert_eq!(tiers.get("70").unwrap().get(PlanLevel::Plan1600), Decimal::from(107));
/// assert!(!tiers.is_known_tier("99"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, PlanRates>", into = "BTreeMap<String, PlanRates>")]
pub struct TierRateTable {
    tiers: BTreeMap<String, PlanRates>,
}

impl From<BTreeMap<String, PlanRates>> for TierRateTable {
    fn from(tiers: BTreeMap<String, PlanRates>) -> Self {
        Self::new(tiers)
    }
}

impl From<TierRateTable> for BTreeMap<String, PlanRates> {
    fn from(table: TierRateTable) -> Self {
        table.tiers
    }
}

impl TierRateTable {
    /// Creates a table from explicit entries.
    pub fn new(tiers: BTreeMap<String, PlanRates>) -> Self {
        let tiers = tiers
            .into_iter()
            .map(|(code, rates)| (code.trim().to_string(), rates))
            .collect();
        Self { tiers }
    }

    /// The standard tier table, codes 70 down to 15.
    pub fn standard() -> Self {
        let entries = [
            ("70", rates(1070, 880, 700, 250, 1)),
            ("60", rates(970, 780, 600, 250, 1)),
            ("50", rates(870, 680, 500, 150, 1)),
            ("45", rates(820, 630, 450, 130, 1)),
            ("40", rates(770, 580, 400, 125, 1)),
            ("35", rates(720, 530, 350, 100, 1)),
            ("30", rates(520, 370, 300, 80, 1)),
            ("25", rates(440, 320, 250, 75, 1)),
            ("20", rates(370, 270, 200, 60, 1)),
            ("15", rates(300, 220, 150, 50, 1)),
        ];
        Self {
            tiers: entries
                .into_iter()
                .map(|(code, rates)| (code.to_string(), rates))
                .collect(),
        }
    }

    /// Rates for a tier code.
    pub fn get(&self, tier_code: &str) -> Option<&PlanRates> {
        self.tiers.get(tier_code.trim())
    }

    /// Returns true if the tier code has an entry.
    pub fn is_known_tier(&self, tier_code: &str) -> bool {
        self.get(tier_code).is_some()
    }

    /// Known tier codes, ascending by string.
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.tiers.keys().map(String::as_str)
    }
}

impl Default for TierRateTable {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_standard_plan_table_values() {
        let table = PlanRateTable::standard();

        let expected = [
            (PayFrequency::Weekly, ["369.23", "323.08", "276.92", "230.77"]),
            (PayFrequency::BiWeekly, ["738.46", "646.15", "553.85", "461.54"]),
            (PayFrequency::SemiMonthly, ["800", "700", "600", "500"]),
            (PayFrequency::Monthly, ["1600", "1400", "1200", "1000"]),
        ];

        for (frequency, values) in expected {
            for (level, value) in PlanLevel::DESCENDING.iter().zip(values) {
                assert_eq!(
                    table.canonical(*level, frequency),
                    Some(dec(value)),
                    "{} at {}",
                    level,
                    frequency
                );
            }
        }
    }

    #[test]
    fn test_unknown_frequency_has_no_amounts() {
        let table = PlanRateTable::standard();
        assert!(table.amounts(PayFrequency::Unknown).is_none());
        assert!(ThresholdLadder::standard().cutoffs(PayFrequency::Unknown).is_none());
    }

    /// TB-001: tolerance is strict
    #[test]
    fn test_tolerance_is_strict() {
        let table = PlanRateTable::standard();
        assert!(table.within_tolerance(dec("369.99"), dec("369.23")));
        assert!(table.within_tolerance(dec("368.24"), dec("369.23")));
        assert!(!table.within_tolerance(dec("370.23"), dec("369.23")));
        assert!(!table.within_tolerance(dec("368.23"), dec("369.23")));
    }

    #[test]
    fn test_with_detection_overrides_settings() {
        let table = PlanRateTable::standard().with_detection(dec("0.5"), 5);
        assert_eq!(table.tolerance(), dec("0.5"));
        assert_eq!(table.sample_size(), 5);
    }

    #[test]
    fn test_standard_ladder_cutoffs() {
        let ladder = ThresholdLadder::standard();
        let weekly = ladder.cutoffs(PayFrequency::Weekly).unwrap();
        assert_eq!(weekly.plan_1600, dec("360"));
        assert_eq!(weekly.plan_1000, dec("220"));

        let monthly = ladder.cutoffs(PayFrequency::Monthly).unwrap();
        assert_eq!(monthly.plan_1400, dec("1350"));
        assert_eq!(monthly.plan_1200, dec("1150"));
    }

    #[test]
    fn test_standard_tier_table() {
        let tiers = TierRateTable::standard();
        assert_eq!(tiers.codes().count(), 10);

        let t40 = tiers.get("40").unwrap();
        assert_eq!(t40.plan_1000, dec("12.5"));

        let t15 = tiers.get("15").unwrap();
        assert_eq!(t15.plan_1600, dec("30"));
        assert_eq!(t15.plan_1400, dec("22"));
    }

    #[test]
    fn test_tier_lookup_trims_code() {
        let tiers = TierRateTable::standard();
        assert!(tiers.is_known_tier(" 70 "));
        assert!(!tiers.is_known_tier("75"));
    }

    #[test]
    fn test_tier_table_deserializes_from_map() {
        let yaml = r#"
"70": { "1600": 107, "1400": 88, "1200": 70, "1000": 25 }
"#;
        let tiers: TierRateTable = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(tiers.get("70").unwrap().plan_1400, dec("88"));
    }

    #[test]
    fn test_deserialized_tier_codes_are_trimmed() {
        let yaml = r#"
" 70": { "1600": 107, "1400": 88, "1200": 70, "1000": 25 }
"#;
        let tiers: TierRateTable = serde_yaml::from_str(yaml).unwrap();

        assert!(tiers.is_known_tier("70"));
        assert_eq!(tiers.codes().collect::<Vec<_>>(), vec!["70"]);
        assert_eq!(tiers.get("70").unwrap().plan_1000, dec("25"));
    }
}
