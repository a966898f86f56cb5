//! Commission engine for payroll-deduction insurance programs.
//!
//! This crate reconciles employee deductions across pay periods, infers pay
//! frequency and plan level from deduction amounts, computes agent
//! commissions under percentage, fixed-table, tier and downline models, and
//! builds a cross-referenced report model for a renderer to emit.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
pub mod report;
