//! Pay frequency model.

use std::fmt;

use serde::{Deserialize, Serialize};

/// How often a payroll file deducts premiums.
///
/// Each known frequency maps to a divisor (pay periods per year) used to
/// convert monthly amounts into per-period amounts.
///
/// # Example
///
/// ```
/// use commission_engine::models::PayFrequency;
///
/// assert_eq!(PayFrequency::Weekly.divisor(), Some(52));
/// assert_eq!(PayFrequency::Unknown.divisor(), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayFrequency {
    /// 52 periods per year.
    Weekly,
    /// 26 periods per year.
    #[serde(alias = "biweekly")]
    BiWeekly,
    /// 24 periods per year.
    #[serde(alias = "semimonthly")]
    SemiMonthly,
    /// 12 periods per year.
    Monthly,
    /// No frequency could be established.
    Unknown,
}

impl PayFrequency {
    /// Known frequencies in detection priority order.
    pub const DETECTION_ORDER: [PayFrequency; 4] = [
        PayFrequency::Weekly,
        PayFrequency::BiWeekly,
        PayFrequency::SemiMonthly,
        PayFrequency::Monthly,
    ];

    /// Returns the number of pay periods per year, or `None` for `Unknown`.
    pub fn divisor(self) -> Option<u32> {
        match self {
            PayFrequency::Weekly => Some(52),
            PayFrequency::BiWeekly => Some(26),
            PayFrequency::SemiMonthly => Some(24),
            PayFrequency::Monthly => Some(12),
            PayFrequency::Unknown => None,
        }
    }

    /// Returns true for every frequency except `Unknown`.
    pub fn is_known(self) -> bool {
        self.divisor().is_some()
    }

    /// Returns the display name used in report headers.
    pub fn name(self) -> &'static str {
        match self {
            PayFrequency::Weekly => "Weekly",
            PayFrequency::BiWeekly => "BiWeekly",
            PayFrequency::SemiMonthly => "SemiMonthly",
            PayFrequency::Monthly => "Monthly",
            PayFrequency::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for PayFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
