//! Calculation logic for the commission engine.
//!
//! This module covers frequency detection, plan classification, packet
//! assembly, attendance reconciliation, plan counting, and the percentage,
//! fixed-table, tier and downline commission models.

mod commission_engine;
mod downline_commission;
mod fixed_table_commission;
mod frequency_detection;
mod packet_assembly;
mod percentage_commission;
mod plan_classification;
mod plan_counting;
mod reconciliation;
mod tier_commission;

pub use commission_engine::{AgentCommissions, CommissionCalculation, CommissionEngine};
pub use downline_commission::{DownlineCalculation, calculate_downline, downline_agent_commission};
pub use fixed_table_commission::{employee_fixed_table_commissions, fixed_table_period_commission};
pub use frequency_detection::{FrequencyDetection, detect_file_frequency, detect_frequency};
pub use packet_assembly::AssembledPacket;
pub use percentage_commission::{
    employee_percentage_commissions, monthly_to_period, percentage_period_commission,
};
pub use plan_classification::{
    NearestMatch, classify_by_threshold, classify_nearest, match_nearest,
};
pub use plan_counting::{
    nearest_fallback_warnings, period_plan_labels, plan_counts, summarize_plan_labels,
};
pub use reconciliation::{ReconciliationResult, reconcile_employees};
pub use tier_commission::{
    TierGroupCalculation, calculate_override_commission, calculate_tier_commission,
    calculate_tier_group, priced_counts,
};
