//! Error types for the commission engine.
//!
//! Only configuration loading and input construction fail with an error.
//! Misses during a run (unmatched deductions, unknown tier codes, empty
//! input) degrade to defined defaults and are reported as audit warnings.

use chrono::NaiveDate;
use thiserror::Error;

/// The main error type for the commission engine.
///
/// # Example
///
/// ```
/// use commission_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/tiers.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/tiers.yaml");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A period packet was built with an unknown pay frequency.
    #[error("Unknown pay frequency for period {period_date}")]
    UnknownFrequency {
        /// The period date of the rejected packet.
        period_date: NaiveDate,
    },

    /// A period packet contained inconsistent data.
    #[error("Invalid packet for period {period_date}: {message}")]
    InvalidPacket {
        /// The period date of the rejected packet.
        period_date: NaiveDate,
        /// A description of what made the packet invalid.
        message: String,
    },

    /// A downline roster name was not present in the configuration.
    #[error("Downline roster not found: {name}")]
    UnknownRoster {
        /// The roster name that was requested.
        name: String,
    },

    /// An agent configuration was invalid.
    #[error("Invalid agent configuration '{agent}': {message}")]
    InvalidAgentConfig {
        /// The agent name.
        agent: String,
        /// A description of what made the configuration invalid.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
