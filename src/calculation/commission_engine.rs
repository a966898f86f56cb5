//! Agent commission dispatch.
//!
//! Per-period models (percentage and fixed table) are evaluated on every
//! perfect employee's payment for each period and summed per period. Tier
//! agents are paid once on the run's plan counts.

use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use super::fixed_table_commission::employee_fixed_table_commissions;
use super::percentage_commission::employee_percentage_commissions;
use super::plan_counting::plan_counts;
use super::tier_commission::{calculate_tier_commission, check_known_tier};
use crate::config::{PlanRateTable, TierRateTable};
use crate::models::{
    AgentConfig, AuditWarning, CommissionModel, CommissionResult, EmployeeAttendance, PlanCounts,
    Reconciliation, WARN_PAYMENTS_MISMATCH, WarningSeverity,
};

/// One agent's commission along with any warnings raised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommissionCalculation {
    /// The agent's result.
    pub result: CommissionResult,
    /// Employees left out because their payments did not match the run.
    pub warnings: Vec<AuditWarning>,
}

/// Results for every agent in a run, along with any warnings raised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentCommissions {
    /// One result per agent, in input order.
    pub results: Vec<CommissionResult>,
    /// Unknown tier codes and mismatched payment vectors.
    pub warnings: Vec<AuditWarning>,
}

/// Evaluates agent commissions against the shared rate tables.
#[derive(Debug, Clone, Copy)]
pub struct CommissionEngine<'a> {
    plan_table: &'a PlanRateTable,
    tiers: &'a TierRateTable,
}

impl<'a> CommissionEngine<'a> {
    /// Creates an engine over the given tables.
    pub fn new(plan_table: &'a PlanRateTable, tiers: &'a TierRateTable) -> Self {
        Self { plan_table, tiers }
    }

    /// One employee's per-period commissions under a per-period agent.
    ///
    /// Tier agents are not paid per employee, so they yield zeros.
    pub fn employee_period_commissions(
        &self,
        agent: &AgentConfig,
        employee: &EmployeeAttendance,
        reconciliation: &Reconciliation,
    ) -> Vec<Decimal> {
        let frequency = reconciliation.frequency;
        let divisor = reconciliation.divisor;

        match agent {
            AgentConfig::Percentage(agent) => {
                employee_percentage_commissions(agent, employee, frequency, divisor, self.plan_table)
            }
            AgentConfig::FixedTable(agent) => {
                employee_fixed_table_commissions(agent, employee, frequency, divisor, self.plan_table)
            }
            AgentConfig::Tier(_) => vec![Decimal::ZERO; employee.payments.len()],
        }
    }

    /// Computes one agent's commission over the run.
    ///
    /// An employee whose payment count differs from the run's period count
    /// contributes nothing and is reported as a warning.
    ///
    /// # Example
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use commission_engine::calculation::{CommissionEngine, plan_counts};
    /// use commission_engine::config::{PlanRateTable, TierRateTable};
    /// use commission_engine::models::{
    ///     AgentConfig, AttendanceStatus, EmployeeAttendance, PayFrequency, PercentageAgent,
    ///     PlanLevel, Reconciliation,
    /// };
    /// use rust_decimal::Decimal;
    ///
    /// let reconciliation = Reconciliation {
    ///     frequency: PayFrequency::Monthly,
    ///     divisor: 12,
    ///     period_dates: vec![NaiveDate::from_ymd_opt(2025, 12, 1).unwrap()],
    ///     perfect: vec![EmployeeAttendance {
    ///         employee_id: "111".to_string(),
    ///         payments: vec![Decimal::from(1600)],
    ///         status: AttendanceStatus::Perfect,
    ///         plan_level: Some(PlanLevel::Plan1600),
    ///         missed_periods: vec![],
    ///     }],
    ///     imperfect: vec![],
    /// };
    /// let agent = AgentConfig::Percentage(PercentageAgent {
    ///     name: "Ten".to_string(),
    ///     percent_of_plan: Decimal::from(10),
    /// });
    ///
    /// let plan_table = PlanRateTable::standard();
    /// let tiers = TierRateTable::standard();
    /// let engine = CommissionEngine::new(&plan_table, &tiers);
    /// let calculation = engine.calculate(&agent, &reconciliation, &plan_counts(&reconciliation));
    /// assert_eq!(calculation.result.grand_total, Decimal::from(160));
    /// assert!(calculation.warnings.is_empty());
    /// ```
    pub fn calculate(
        &self,
        agent: &AgentConfig,
        reconciliation: &Reconciliation,
        counts: &PlanCounts,
    ) -> CommissionCalculation {
        let mut warnings = Vec::new();

        let result = match agent {
            AgentConfig::Tier(tier_agent) => {
                let commission = calculate_tier_commission(tier_agent, counts, self.tiers, 1);
                CommissionResult::aggregate(&tier_agent.name, CommissionModel::Tier, commission.amount)
            }
            _ => {
                let model = match agent {
                    AgentConfig::Percentage(_) => CommissionModel::Percentage,
                    _ => CommissionModel::FixedTable,
                };
                let period_count = reconciliation.period_count();
                let mut amounts = vec![Decimal::ZERO; period_count];
                for employee in &reconciliation.perfect {
                    if employee.payments.len() != period_count {
                        warn!(
                            agent = %agent.name(),
                            employee_id = %employee.employee_id,
                            payments = employee.payments.len(),
                            periods = period_count,
                            "Payments do not match the run's periods; employee skipped"
                        );
                        warnings.push(AuditWarning::new(
                            WARN_PAYMENTS_MISMATCH,
                            format!(
                                "Employee '{}' has {} payments for {} periods; not paid by {}",
                                employee.employee_id,
                                employee.payments.len(),
                                period_count,
                                agent.name()
                            ),
                            WarningSeverity::High,
                        ));
                        continue;
                    }
                    let commissions =
                        self.employee_period_commissions(agent, employee, reconciliation);
                    for (total, commission) in amounts.iter_mut().zip(commissions) {
                        *total += commission;
                    }
                }
                CommissionResult::per_period(agent.name(), model, amounts)
            }
        };

        debug!(
            agent = %result.agent_name,
            model = ?result.model,
            grand_total = %result.grand_total,
            "Calculated agent commission"
        );
        CommissionCalculation { result, warnings }
    }

    /// Computes every agent's commission over the run.
    pub fn calculate_all(
        &self,
        agents: &[AgentConfig],
        reconciliation: &Reconciliation,
    ) -> AgentCommissions {
        let counts = plan_counts(reconciliation);
        let mut warnings = Vec::new();
        let mut results = Vec::with_capacity(agents.len());

        for agent in agents {
            if let AgentConfig::Tier(tier_agent) = agent {
                check_known_tier(tier_agent, self.tiers, &mut warnings);
            }
            let calculation = self.calculate(agent, reconciliation, &counts);
            warnings.extend(calculation.warnings);
            results.push(calculation.result);
        }

        info!(
            agents = results.len(),
            perfect = reconciliation.perfect.len(),
            periods = reconciliation.period_count(),
            "Calculated agent commissions"
        );

        AgentCommissions { results, warnings }
    }
}
