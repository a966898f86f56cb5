//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading commission
//! program configurations from YAML files.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::{EngineError, EngineResult};
use crate::models::{AgentConfig, DownlineRoster};

use super::tables::{PlanRateTable, ThresholdLadder, TierRateTable};
use super::types::{AgentsConfig, CommissionConfig, DownlinesConfig, ProgramConfig, TiersConfig};

/// Loads and provides access to commission program configuration.
///
/// # Directory Structure
///
/// The configuration directory should have the following structure:
/// ```text
/// config/commission/
/// ├── program.yaml    # Program metadata and detection settings
/// ├── tiers.yaml      # Tier code to per-plan rate
/// ├── agents.yaml     # Default percentage / fixed-table agents
/// └── downlines.yaml  # Downline rosters
/// ```
///
/// # Example
///
/// ```no_run
/// use commission_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/commission").unwrap();
///
/// println!("Program: {}", loader.program().name);
/// let roster = loader.roster("harry").unwrap();
/// println!("Roster: {}", roster.title);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: CommissionConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration directory (e.g., "./config/commission")
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - Any required file is missing (`ConfigNotFound`)
    /// - Any file contains invalid YAML (`ConfigParseError`)
    /// - A default agent fails validation (`InvalidAgentConfig`)
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let program = Self::load_yaml::<ProgramConfig>(&path.join("program.yaml"))?;
        let tiers = Self::load_yaml::<TiersConfig>(&path.join("tiers.yaml"))?;
        let agents = Self::load_yaml::<AgentsConfig>(&path.join("agents.yaml"))?;
        let downlines = Self::load_yaml::<DownlinesConfig>(&path.join("downlines.yaml"))?;

        for agent in &agents.agents {
            agent.validate()?;
        }

        let plan_table = PlanRateTable::standard()
            .with_detection(program.detection.tolerance, program.detection.sample_size);

        let rosters = downlines
            .rosters
            .into_iter()
            .map(|(name, roster)| (name.trim().to_lowercase(), roster.resolve()))
            .collect();

        let config = CommissionConfig::new(
            program.program,
            plan_table,
            tiers.tiers,
            agents.agents,
            rosters,
        );

        info!(
            path = %path.display(),
            agents = config.agents().len(),
            tiers = config.tiers().codes().count(),
            rosters = config.rosters().len(),
            "Loaded commission configuration"
        );

        Ok(Self { config })
    }

    /// Wraps the built-in tables without reading any files.
    pub fn standard() -> Self {
        Self {
            config: CommissionConfig::standard(),
        }
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the underlying commission configuration.
    pub fn config(&self) -> &CommissionConfig {
        &self.config
    }

    /// Returns the program metadata.
    pub fn program(&self) -> &super::ProgramMetadata {
        self.config.program()
    }

    /// Returns the plan rate table.
    pub fn plan_table(&self) -> &PlanRateTable {
        self.config.plan_table()
    }

    /// Returns the threshold ladder.
    pub fn ladder(&self) -> &ThresholdLadder {
        self.config.ladder()
    }

    /// Returns the tier rate table.
    pub fn tiers(&self) -> &TierRateTable {
        self.config.tiers()
    }

    /// Returns the default per-period agents.
    pub fn default_agents(&self) -> &[AgentConfig] {
        self.config.agents()
    }

    /// Gets a downline roster by name, ignoring case.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use commission_engine::config::ConfigLoader;
    ///
    /// let loader = ConfigLoader::load("./config/commission")?;
    /// let roster = loader.roster("adam")?;
    /// println!("{} clients", roster.clients.len());
    /// # Ok::<(), commission_engine::error::EngineError>(())
    /// ```
    pub fn roster(&self, name: &str) -> EngineResult<&DownlineRoster> {
        self.config
            .rosters()
            .get(&name.trim().to_lowercase())
            .ok_or_else(|| EngineError::UnknownRoster {
                name: name.to_string(),
            })
    }
}
