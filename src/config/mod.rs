//! Configuration loading and management for the commission engine.
//!
//! This module provides the built-in rate tables and loads program
//! configuration from YAML files: detection settings, tier rates, default
//! agents and downline rosters.
//!
//! # Example
//!
//! ```no_run
//! use commission_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/commission").unwrap();
//! println!("Loaded program: {}", config.program().name);
//! ```

mod loader;
mod tables;
mod types;

pub use loader::ConfigLoader;
pub use tables::{
    DEFAULT_SAMPLE_SIZE, DETECTION_TOLERANCE, PlanRateTable, ThresholdLadder, TierRateTable,
};
pub use types::{
    AgentsConfig, CommissionConfig, DetectionSettings, DownlinesConfig, GROUPED_PLAN_KEY,
    ProgramConfig, ProgramMetadata, RawDownlineAgent, RawDownlineClient, RawDownlineRoster,
    TiersConfig, resolve_rates,
};
