//! Seismic catalog analysis configuration and validation.
//!
//! This crate provides:
//! - Typed Rust structs for every analysis stage
//! - Closed algorithm enums parsed at configuration time
//! - Semantic validation of parameter ranges

pub mod params;
pub mod validate;

pub use params::{
    AnalysisConfig, CompletenessConfig, DeclusterConfig, DeclusterMethod, FaultMfdConfig,
    MaxMagnitudeConfig, MaxMagnitudeMethod, ObservedMax, Rake, ReasenbergParams,
    RecurrenceConfig, RecurrenceMethod, WindowMethod,
};
pub use validate::{ValidationError, ValidationResult};

/// Schema version for configuration documents.
pub const CONFIG_SCHEMA_VERSION: &str = "1.0.0";
