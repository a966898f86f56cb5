//! Plan level models.
//!
//! A plan level is the tier of insurance coverage an employee buys, named
//! after its monthly premium. Rates and counts keyed by plan level are kept
//! in fixed-shape structs rather than maps so every level is always present.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A coverage plan, named after its monthly premium.
///
/// Levels are declared lowest first so the derived `Ord` ranks
/// `Plan1600 > Plan1400 > Plan1200 > Plan1000`. An unclassified employee is
/// represented as `Option::<PlanLevel>::None`, which ranks below every level.
///
/// # Example
///
/// ```
/// use commission_engine::models::PlanLevel;
///
/// assert!(PlanLevel::Plan1600 > PlanLevel::Plan1000);
/// assert!(Some(PlanLevel::Plan1000) > None);
/// assert_eq!(PlanLevel::Plan1400.to_string(), "Plan 1400");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PlanLevel {
    /// The 1000 plan.
    #[serde(rename = "1000")]
    Plan1000,
    /// The 1200 plan.
    #[serde(rename = "1200")]
    Plan1200,
    /// The 1400 plan.
    #[serde(rename = "1400")]
    Plan1400,
    /// The 1600 plan.
    #[serde(rename = "1600")]
    Plan1600,
}

impl PlanLevel {
    /// All plan levels, highest first.
    pub const DESCENDING: [PlanLevel; 4] = [
        PlanLevel::Plan1600,
        PlanLevel::Plan1400,
        PlanLevel::Plan1200,
        PlanLevel::Plan1000,
    ];

    /// Returns the canonical monthly premium for this plan.
    pub fn monthly_value(self) -> Decimal {
        match self {
            PlanLevel::Plan1000 => Decimal::from(1000),
            PlanLevel::Plan1200 => Decimal::from(1200),
            PlanLevel::Plan1400 => Decimal::from(1400),
            PlanLevel::Plan1600 => Decimal::from(1600),
        }
    }

    /// Returns the short code used as a rate key ("1600", "1400", ...).
    pub fn code(self) -> &'static str {
        match self {
            PlanLevel::Plan1000 => "1000",
            PlanLevel::Plan1200 => "1200",
            PlanLevel::Plan1400 => "1400",
            PlanLevel::Plan1600 => "1600",
        }
    }

    /// Parses a rate key such as `"1400"`.
    pub fn from_code(code: &str) -> Option<PlanLevel> {
        PlanLevel::DESCENDING
            .into_iter()
            .find(|level| level.code() == code.trim())
    }
}

impl fmt::Display for PlanLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Plan {}", self.code())
    }
}

/// One decimal value per plan level.
///
/// Used for canonical per-period amounts, fixed-table agent rates, tier
/// rates and downline rates alike.
///
/// # Example
///
/// ```
/// use commission_engine::models::{PlanLevel, PlanRates};
/// use rust_decimal::Decimal;
///
/// let rates = PlanRates::new(
///     Decimal::from(15),
///     Decimal::from(10),
///     Decimal::from(5),
///     Decimal::new(15, 1),
/// );
/// assert_eq!(rates.get(PlanLevel::Plan1000), Decimal::new(15, 1));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PlanRates {
    /// Value for the 1600 plan.
    #[serde(rename = "1600")]
    pub plan_1600: Decimal,
    /// Value for the 1400 plan.
    #[serde(rename = "1400")]
    pub plan_1400: Decimal,
    /// Value for the 1200 plan.
    #[serde(rename = "1200")]
    pub plan_1200: Decimal,
    /// Value for the 1000 plan.
    #[serde(rename = "1000")]
    pub plan_1000: Decimal,
}

impl PlanRates {
    /// Creates a rate set, highest plan first.
    pub fn new(
        plan_1600: Decimal,
        plan_1400: Decimal,
        plan_1200: Decimal,
        plan_1000: Decimal,
    ) -> Self {
        Self {
            plan_1600,
            plan_1400,
            plan_1200,
            plan_1000,
        }
    }

    /// Returns the value for the given plan level.
    pub fn get(&self, level: PlanLevel) -> Decimal {
        match level {
            PlanLevel::Plan1600 => self.plan_1600,
            PlanLevel::Plan1400 => self.plan_1400,
            PlanLevel::Plan1200 => self.plan_1200,
            PlanLevel::Plan1000 => self.plan_1000,
        }
    }

    /// Iterates over `(level, value)` pairs, highest plan first.
    pub fn iter(&self) -> impl Iterator<Item = (PlanLevel, Decimal)> + '_ {
        PlanLevel::DESCENDING
            .into_iter()
            .map(move |level| (level, self.get(level)))
    }

    /// Returns true if any value is negative.
    pub fn has_negative(&self) -> bool {
        self.iter().any(|(_, value)| value.is_sign_negative() && !value.is_zero())
    }
}

/// The number of perfect employees at each plan level across a whole run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PlanCounts {
    /// Employees on the 1600 plan.
    #[serde(rename = "1600")]
    pub plan_1600: u32,
    /// Employees on the 1400 plan.
    #[serde(rename = "1400")]
    pub plan_1400: u32,
    /// Employees on the 1200 plan.
    #[serde(rename = "1200")]
    pub plan_1200: u32,
    /// Employees on the 1000 plan.
    #[serde(rename = "1000")]
    pub plan_1000: u32,
}

impl PlanCounts {
    /// Returns the count for the given plan level.
    pub fn get(&self, level: PlanLevel) -> u32 {
        match level {
            PlanLevel::Plan1600 => self.plan_1600,
            PlanLevel::Plan1400 => self.plan_1400,
            PlanLevel::Plan1200 => self.plan_1200,
            PlanLevel::Plan1000 => self.plan_1000,
        }
    }

    /// Adds one employee at the given plan level.
    pub fn increment(&mut self, level: PlanLevel) {
        match level {
            PlanLevel::Plan1600 => self.plan_1600 += 1,
            PlanLevel::Plan1400 => self.plan_1400 += 1,
            PlanLevel::Plan1200 => self.plan_1200 += 1,
            PlanLevel::Plan1000 => self.plan_1000 += 1,
        }
    }

    /// Total employees counted across all levels.
    pub fn total(&self) -> u32 {
        self.plan_1600 + self.plan_1400 + self.plan_1200 + self.plan_1000
    }
}

/// Perfect employees split into the two buckets downline rosters price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PlanCountSummary {
    /// Employees with at least one period labelled 1000.
    pub plan_1000: u32,
    /// Employees never labelled 1000 and labelled 1200/1400/1600 at least once.
    pub other_plans: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_plan_levels_rank_highest_first() {
        let mut levels = vec![
            PlanLevel::Plan1000,
            PlanLevel::Plan1600,
            PlanLevel::Plan1200,
            PlanLevel::Plan1400,
        ];
        levels.sort_by(|a, b| b.cmp(a));
        assert_eq!(levels, PlanLevel::DESCENDING.to_vec());
    }

    #[test]
    fn test_unclassified_ranks_below_every_level() {
        for level in PlanLevel::DESCENDING {
            assert!(Some(level) > None);
        }
    }

    #[test]
    fn test_monthly_values() {
        assert_eq!(PlanLevel::Plan1600.monthly_value(), dec("1600"));
        assert_eq!(PlanLevel::Plan1000.monthly_value(), dec("1000"));
    }

    #[test]
    fn test_from_code_round_trips_and_rejects_unknown() {
        for level in PlanLevel::DESCENDING {
            assert_eq!(PlanLevel::from_code(level.code()), Some(level));
        }
        assert_eq!(PlanLevel::from_code(" 1200 "), Some(PlanLevel::Plan1200));
        assert_eq!(PlanLevel::from_code("1800"), None);
    }

    #[test]
    fn test_plan_level_serializes_as_code() {
        let json = serde_json::to_string(&PlanLevel::Plan1400).unwrap();
        assert_eq!(json, "\"1400\"");

        let level: PlanLevel = serde_json::from_str("\"1600\"").unwrap();
        assert_eq!(level, PlanLevel::Plan1600);
    }

    #[test]
    fn test_plan_rates_lookup_and_iteration_order() {
        let rates = PlanRates::new(dec("97"), dec("78"), dec("60"), dec("25"));
        assert_eq!(rates.get(PlanLevel::Plan1400), dec("78"));

        let collected: Vec<_> = rates.iter().collect();
        assert_eq!(collected[0], (PlanLevel::Plan1600, dec("97")));
        assert_eq!(collected[3], (PlanLevel::Plan1000, dec("25")));
    }

    #[test]
    fn test_plan_rates_deserialize_from_plan_keys() {
        let json = r#"{"1600": "25", "1400": "20", "1200": "15", "1000": "2"}"#;
        let rates: PlanRates = serde_json::from_str(json).unwrap();
        assert_eq!(rates.plan_1600, dec("25"));
        assert_eq!(rates.plan_1000, dec("2"));
    }

    #[test]
    fn test_plan_rates_negative_detection() {
        let rates = PlanRates::new(dec("1"), dec("-1"), dec("0"), dec("0"));
        assert!(rates.has_negative());
        assert!(!PlanRates::default().has_negative());
    }

    #[test]
    fn test_plan_counts_increment_and_total() {
        let mut counts = PlanCounts::default();
        counts.increment(PlanLevel::Plan1600);
        counts.increment(PlanLevel::Plan1600);
        counts.increment(PlanLevel::Plan1000);

        assert_eq!(counts.get(PlanLevel::Plan1600), 2);
        assert_eq!(counts.get(PlanLevel::Plan1400), 0);
        assert_eq!(counts.total(), 3);
    }
}
