//! Configuration validation errors and semantic validation.

use crate::params::{
    AnalysisConfig, CompletenessConfig, DeclusterConfig, FaultMfdConfig, MaxMagnitudeConfig,
    RecurrenceConfig,
};
use thiserror::Error;

/// Validation result type.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Configuration validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Unknown {kind}: '{name}'")]
    UnknownAlgorithm { kind: String, name: String },

    #[error("Version mismatch: expected {expected}, got {actual}")]
    VersionMismatch { expected: String, actual: String },
}

impl ValidationError {
    /// Error code for structured error reporting.
    pub fn code(&self) -> u32 {
        match self {
            ValidationError::ParseError(_) => 12,
            ValidationError::MissingField(_) => 13,
            ValidationError::InvalidValue { .. } => 14,
            ValidationError::UnknownAlgorithm { .. } => 11,
            ValidationError::VersionMismatch { .. } => 15,
        }
    }

    pub(crate) fn unknown(kind: &str, name: &str) -> Self {
        ValidationError::UnknownAlgorithm {
            kind: kind.to_string(),
            name: name.to_string(),
        }
    }
}

impl From<ValidationError> for qk_common::Error {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::UnknownAlgorithm { kind, name } => {
                qk_common::Error::UnknownAlgorithm { kind, name }
            }
            other => qk_common::Error::InvalidConfig(other.to_string()),
        }
    }
}

fn positive(field: &str, value: f64) -> ValidationResult<()> {
    if !(value.is_finite() && value > 0.0) {
        return Err(ValidationError::InvalidValue {
            field: field.to_string(),
            message: format!("Must be positive, got {}", value),
        });
    }
    Ok(())
}

fn non_negative(field: &str, value: f64) -> ValidationResult<()> {
    if !(value.is_finite() && value >= 0.0) {
        return Err(ValidationError::InvalidValue {
            field: field.to_string(),
            message: format!("Must be non-negative, got {}", value),
        });
    }
    Ok(())
}

fn finite(field: &str, value: f64) -> ValidationResult<()> {
    if !value.is_finite() {
        return Err(ValidationError::InvalidValue {
            field: field.to_string(),
            message: format!("Must be finite, got {}", value),
        });
    }
    Ok(())
}

fn at_least(field: &str, value: usize, min: usize) -> ValidationResult<()> {
    if value < min {
        return Err(ValidationError::InvalidValue {
            field: field.to_string(),
            message: format!("Must be at least {}, got {}", min, value),
        });
    }
    Ok(())
}

/// Validate the whole document, stage by stage.
pub fn validate_analysis(config: &AnalysisConfig) -> ValidationResult<()> {
    if config.schema_version != crate::CONFIG_SCHEMA_VERSION {
        return Err(ValidationError::VersionMismatch {
            expected: crate::CONFIG_SCHEMA_VERSION.to_string(),
            actual: config.schema_version.clone(),
        });
    }
    validate_decluster(&config.decluster)?;
    validate_completeness(&config.completeness)?;
    validate_recurrence(&config.recurrence)?;
    validate_max_magnitude(&config.max_magnitude)?;
    if let Some(ref fault) = config.fault_mfd {
        validate_fault_mfd(fault)?;
    }
    Ok(())
}

/// Validate declustering parameters.
pub fn validate_decluster(config: &DeclusterConfig) -> ValidationResult<()> {
    non_negative("decluster.foreshock_time_prop", config.foreshock_time_prop)?;
    positive(
        "decluster.afteran_time_window_days",
        config.afteran_time_window_days,
    )?;

    let r = &config.reasenberg;
    positive("decluster.reasenberg.tau_min_days", r.tau_min_days)?;
    positive("decluster.reasenberg.tau_max_days", r.tau_max_days)?;
    if r.tau_max_days < r.tau_min_days {
        return Err(ValidationError::InvalidValue {
            field: "decluster.reasenberg.tau_max_days".to_string(),
            message: format!(
                "Must be >= tau_min_days ({}), got {}",
                r.tau_min_days, r.tau_max_days
            ),
        });
    }
    if !(r.confidence > 0.0 && r.confidence < 1.0) {
        return Err(ValidationError::InvalidValue {
            field: "decluster.reasenberg.confidence".to_string(),
            message: format!("Must be in (0, 1), got {}", r.confidence),
        });
    }
    finite("decluster.reasenberg.magnitude_factor", r.magnitude_factor)?;
    finite(
        "decluster.reasenberg.effective_min_magnitude",
        r.effective_min_magnitude,
    )?;
    positive("decluster.reasenberg.radius_factor", r.radius_factor)?;
    positive("decluster.reasenberg.max_radius_km", r.max_radius_km)?;
    Ok(())
}

/// Validate Stepp parameters.
pub fn validate_completeness(config: &CompletenessConfig) -> ValidationResult<()> {
    positive("completeness.magnitude_window", config.magnitude_window)?;
    positive("completeness.time_window", config.time_window)?;
    positive("completeness.sensitivity", config.sensitivity)?;
    Ok(())
}

/// Validate recurrence parameters.
pub fn validate_recurrence(config: &RecurrenceConfig) -> ValidationResult<()> {
    positive("recurrence.magnitude_window", config.magnitude_window)?;
    finite("recurrence.reference_magnitude", config.reference_magnitude)?;
    positive("recurrence.time_window", config.time_window)?;
    positive("recurrence.initial_beta", config.initial_beta)?;
    positive("recurrence.tolerance", config.tolerance)?;
    at_least("recurrence.max_iterations", config.max_iterations, 1)?;
    Ok(())
}

/// Validate maximum-magnitude parameters.
pub fn validate_max_magnitude(config: &MaxMagnitudeConfig) -> ValidationResult<()> {
    positive(
        "max_magnitude.iteration_tolerance",
        config.iteration_tolerance,
    )?;
    at_least(
        "max_magnitude.maximum_iterations",
        config.maximum_iterations,
        1,
    )?;
    at_least(
        "max_magnitude.number_earthquakes",
        config.number_earthquakes,
        2,
    )?;
    at_least("max_magnitude.number_samples", config.number_samples, 2)?;
    at_least(
        "max_magnitude.number_bootstraps",
        config.number_bootstraps,
        2,
    )?;
    if let Some(obs) = config.observed_max {
        finite("max_magnitude.observed_max.magnitude", obs.magnitude)?;
        non_negative("max_magnitude.observed_max.sigma", obs.sigma)?;
    }
    Ok(())
}

/// Validate fault MFD inputs.
pub fn validate_fault_mfd(config: &FaultMfdConfig) -> ValidationResult<()> {
    positive("fault_mfd.slip_rate_mm_yr", config.slip_rate_mm_yr)?;
    positive(
        "fault_mfd.displacement_length_ratio",
        config.displacement_length_ratio,
    )?;
    positive("fault_mfd.shear_modulus_gpa", config.shear_modulus_gpa)?;
    positive("fault_mfd.fault_width_km", config.fault_width_km)?;
    positive("fault_mfd.b_value", config.b_value)?;
    finite("fault_mfd.min_magnitude", config.min_magnitude)?;
    positive("fault_mfd.bin_width", config.bin_width)?;
    // dbar - bbar must stay positive for the moment-balanced rate.
    if config.b_value >= 1.5 {
        return Err(ValidationError::InvalidValue {
            field: "fault_mfd.b_value".to_string(),
            message: format!("Must be below 1.5, got {}", config.b_value),
        });
    }
    match (config.max_magnitude, config.rupture_area_km2) {
        (Some(m), _) => {
            finite("fault_mfd.max_magnitude", m)?;
            if m < config.min_magnitude {
                return Err(ValidationError::InvalidValue {
                    field: "fault_mfd.max_magnitude".to_string(),
                    message: format!(
                        "Must be >= min_magnitude ({}), got {}",
                        config.min_magnitude, m
                    ),
                });
            }
        }
        (None, Some(area)) => positive("fault_mfd.rupture_area_km2", area)?,
        (None, None) => {
            return Err(ValidationError::MissingField(
                "fault_mfd.rupture_area_km2 (required without max_magnitude)".to_string(),
            ))
        }
    }
    if let Some(rake) = config.rake {
        finite("fault_mfd.rake", rake)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fault() -> FaultMfdConfig {
        FaultMfdConfig {
            slip_rate_mm_yr: 20.0,
            displacement_length_ratio: 1.25e-5,
            shear_modulus_gpa: 27.7,
            fault_width_km: 355.685110616,
            b_value: 0.8,
            min_magnitude: 5.0,
            bin_width: 0.1,
            max_magnitude: Some(8.5),
            rake: None,
            rupture_area_km2: None,
        }
    }

    #[test]
    fn defaults_are_valid() {
        assert!(validate_analysis(&AnalysisConfig::default()).is_ok());
    }

    #[test]
    fn rejects_version_mismatch() {
        let cfg = AnalysisConfig {
            schema_version: "0.1.0".to_string(),
            ..AnalysisConfig::default()
        };
        assert!(matches!(
            validate_analysis(&cfg),
            Err(ValidationError::VersionMismatch { .. })
        ));
    }

    #[test]
    fn rejects_non_positive_bin_width() {
        let cfg = CompletenessConfig {
            magnitude_window: 0.0,
            ..CompletenessConfig::default()
        };
        let err = validate_completeness(&cfg).unwrap_err();
        assert!(err.to_string().contains("completeness.magnitude_window"));
        assert_eq!(err.code(), 14);
    }

    #[test]
    fn rejects_inverted_tau_bounds() {
        let mut cfg = DeclusterConfig::default();
        cfg.reasenberg.tau_max_days = 0.5;
        assert!(validate_decluster(&cfg).is_err());
    }

    #[test]
    fn rejects_confidence_outside_unit_interval() {
        let mut cfg = DeclusterConfig::default();
        cfg.reasenberg.confidence = 1.0;
        assert!(validate_decluster(&cfg).is_err());
    }

    #[test]
    fn rejects_single_bootstrap() {
        let cfg = MaxMagnitudeConfig {
            number_bootstraps: 1,
            ..MaxMagnitudeConfig::default()
        };
        assert!(validate_max_magnitude(&cfg).is_err());
    }

    #[test]
    fn rejects_zero_iteration_cap() {
        let cfg = RecurrenceConfig {
            max_iterations: 0,
            ..RecurrenceConfig::default()
        };
        assert!(validate_recurrence(&cfg).is_err());
    }

    #[test]
    fn fault_needs_area_without_max_magnitude() {
        assert!(validate_fault_mfd(&fault()).is_ok());
        let mut cfg = fault();
        cfg.max_magnitude = None;
        assert!(matches!(
            validate_fault_mfd(&cfg),
            Err(ValidationError::MissingField(_))
        ));
        cfg.rupture_area_km2 = Some(1500.0);
        assert!(validate_fault_mfd(&cfg).is_ok());
    }

    #[test]
    fn converts_into_common_error() {
        let err: qk_common::Error = ValidationError::unknown("window method", "foo").into();
        assert_eq!(err.code(), 11);
        let err: qk_common::Error = ValidationError::MissingField("x".into()).into();
        assert_eq!(err.code(), 10);
    }
}
