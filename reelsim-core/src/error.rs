//! Error types for reelsim-core
//!
//! The retention model and the trigger impact analyzer are total functions and
//! never return these. Errors only come from the ingestion boundary: parsing
//! producer output, loading configuration and editing script variants.

use thiserror::Error;

use crate::trigger::Trigger;

/// Error type for ingestion and configuration operations
#[derive(Debug, Error)]
pub enum ReelsimError {
    /// Timeline event whose interval is empty or reversed
    #[error("Invalid interval on event {index}: [{sec_start}, {sec_end})")]
    InvalidInterval {
        index: usize,
        sec_start: u32,
        sec_end: u32,
    },

    /// Event index passed to an edit operation does not exist
    #[error("Event index {index} out of range (timeline has {len} events)")]
    EventIndexOutOfRange { index: usize, len: usize },

    /// Trigger is neither suggested for nor applied to the event
    #[error("Trigger {trigger} is not suggested for event {index}")]
    TriggerNotSuggested { index: usize, trigger: Trigger },

    /// Requested variant id not present in the loaded scripts
    #[error("Variant not found: {0}")]
    VariantNotFound(String),

    /// Configuration values out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration file could not be parsed
    #[error("Config parse error: {0}")]
    Config(#[from] toml::de::Error),

    /// Producer output could not be parsed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for reelsim operations
pub type Result<T> = std::result::Result<T, ReelsimError>;
