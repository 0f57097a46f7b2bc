//! Analysis configuration types.
//!
//! Every stage has a serde-deserializable struct with defaults matching the
//! customary parameter choices. Algorithm names are closed enums, so an
//! unsupported name is rejected while the document is parsed.

use crate::validate::{validate_analysis, ValidationError, ValidationResult};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Space-time window model used by the window-based declustering methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WindowMethod {
    #[default]
    #[serde(rename = "GardnerKnopoff", alias = "gardner_knopoff")]
    GardnerKnopoff,
    #[serde(rename = "Gruenthal", alias = "gruenthal")]
    Gruenthal,
    #[serde(rename = "Uhrhammer", alias = "uhrhammer")]
    Uhrhammer,
}

impl WindowMethod {
    pub const ALL: [WindowMethod; 3] = [
        WindowMethod::GardnerKnopoff,
        WindowMethod::Gruenthal,
        WindowMethod::Uhrhammer,
    ];
}

impl FromStr for WindowMethod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "gardnerknopoff" | "gardnerknopoffwindow" | "gk" => Ok(WindowMethod::GardnerKnopoff),
            "gruenthal" | "gruenthalwindow" => Ok(WindowMethod::Gruenthal),
            "uhrhammer" | "uhrhammerwindow" => Ok(WindowMethod::Uhrhammer),
            _ => Err(ValidationError::unknown("window method", s)),
        }
    }
}

impl std::fmt::Display for WindowMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WindowMethod::GardnerKnopoff => write!(f, "GardnerKnopoff"),
            WindowMethod::Gruenthal => write!(f, "Gruenthal"),
            WindowMethod::Uhrhammer => write!(f, "Uhrhammer"),
        }
    }
}

/// Declustering algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DeclusterMethod {
    #[default]
    #[serde(rename = "GardnerKnopoff", alias = "gardner_knopoff")]
    GardnerKnopoff,
    #[serde(rename = "Afteran", alias = "afteran")]
    Afteran,
    #[serde(rename = "Reasenberg", alias = "reasenberg")]
    Reasenberg,
}

impl FromStr for DeclusterMethod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "gardnerknopoff" | "gk" => Ok(DeclusterMethod::GardnerKnopoff),
            "afteran" => Ok(DeclusterMethod::Afteran),
            "reasenberg" => Ok(DeclusterMethod::Reasenberg),
            _ => Err(ValidationError::unknown("declustering method", s)),
        }
    }
}

impl std::fmt::Display for DeclusterMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeclusterMethod::GardnerKnopoff => write!(f, "GardnerKnopoff"),
            DeclusterMethod::Afteran => write!(f, "Afteran"),
            DeclusterMethod::Reasenberg => write!(f, "Reasenberg"),
        }
    }
}

/// Gutenberg-Richter fitting method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RecurrenceMethod {
    #[default]
    #[serde(rename = "MLE", alias = "mle")]
    MaximumLikelihood,
    #[serde(rename = "Weichert", alias = "weichert", alias = "Wiechart")]
    Weichert,
}

impl FromStr for RecurrenceMethod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "mle" | "maximumlikelihood" => Ok(RecurrenceMethod::MaximumLikelihood),
            "weichert" | "wiechart" => Ok(RecurrenceMethod::Weichert),
            _ => Err(ValidationError::unknown("recurrence method", s)),
        }
    }
}

impl std::fmt::Display for RecurrenceMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecurrenceMethod::MaximumLikelihood => write!(f, "MLE"),
            RecurrenceMethod::Weichert => write!(f, "Weichert"),
        }
    }
}

/// Maximum-magnitude estimator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MaxMagnitudeMethod {
    #[default]
    #[serde(rename = "Kijko_Npg", alias = "kijko_npg")]
    KijkoNonParametricGaussian,
    #[serde(rename = "Cumulative_Moment", alias = "cumulative_moment")]
    CumulativeMoment,
}

impl FromStr for MaxMagnitudeMethod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "kijkonpg" | "kijko" => Ok(MaxMagnitudeMethod::KijkoNonParametricGaussian),
            "cumulativemoment" => Ok(MaxMagnitudeMethod::CumulativeMoment),
            _ => Err(ValidationError::unknown("maximum magnitude method", s)),
        }
    }
}

impl std::fmt::Display for MaxMagnitudeMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MaxMagnitudeMethod::KijkoNonParametricGaussian => write!(f, "Kijko_Npg"),
            MaxMagnitudeMethod::CumulativeMoment => write!(f, "Cumulative_Moment"),
        }
    }
}

/// Faulting style, classified from the rake angle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rake {
    /// No rake given; use the all-mechanism relation.
    #[default]
    Unspecified,
    StrikeSlip,
    Reverse,
    Normal,
}

impl Rake {
    /// Classify a rake angle in degrees (Aki-Richards convention).
    pub fn from_degrees(rake: Option<f64>) -> Self {
        match rake {
            None => Rake::Unspecified,
            Some(r) if (-45.0..=45.0).contains(&r) || r >= 135.0 || r <= -135.0 => {
                Rake::StrikeSlip
            }
            Some(r) if r > 0.0 => Rake::Reverse,
            Some(_) => Rake::Normal,
        }
    }
}

impl FromStr for Rake {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "unspecified" | "any" => Ok(Rake::Unspecified),
            "strikeslip" => Ok(Rake::StrikeSlip),
            "reverse" | "thrust" => Ok(Rake::Reverse),
            "normal" => Ok(Rake::Normal),
            _ => Err(ValidationError::unknown("rake class", s)),
        }
    }
}

fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| !matches!(c, '_' | '-' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Link-based (Reasenberg) clustering parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReasenbergParams {
    /// Look-ahead time for unclustered events, days.
    #[serde(alias = "taumin")]
    pub tau_min_days: f64,
    /// Upper bound on the look-ahead time, days.
    #[serde(alias = "taumax")]
    pub tau_max_days: f64,
    /// Confidence of observing the next event in the sequence.
    #[serde(alias = "p")]
    pub confidence: f64,
    /// Fraction of the largest magnitude used for the effective lower cutoff.
    #[serde(alias = "xk")]
    pub magnitude_factor: f64,
    /// Effective minimum magnitude of the catalog.
    #[serde(alias = "xmeff")]
    pub effective_min_magnitude: f64,
    /// Multiple of the crack radius used as the interaction radius.
    #[serde(alias = "rfact")]
    pub radius_factor: f64,
    /// Upper bound on interaction distances, km.
    #[serde(alias = "rmax")]
    pub max_radius_km: f64,
}

impl Default for ReasenbergParams {
    fn default() -> Self {
        Self {
            tau_min_days: 1.0,
            tau_max_days: 10.0,
            confidence: 0.95,
            magnitude_factor: 0.5,
            effective_min_magnitude: 1.5,
            radius_factor: 10.0,
            max_radius_km: 30.0,
        }
    }
}

/// Declustering stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeclusterConfig {
    pub method: DeclusterMethod,
    #[serde(alias = "time_dist_windows")]
    pub window: WindowMethod,
    /// Fraction of the time window searched before the trigger (foreshocks).
    #[serde(alias = "foreshock_time_window")]
    pub foreshock_time_prop: f64,
    /// Moving time window of the Afteran method, days.
    pub afteran_time_window_days: f64,
    pub reasenberg: ReasenbergParams,
}

impl Default for DeclusterConfig {
    fn default() -> Self {
        Self {
            method: DeclusterMethod::GardnerKnopoff,
            window: WindowMethod::GardnerKnopoff,
            foreshock_time_prop: 0.0,
            afteran_time_window_days: 60.0,
            reasenberg: ReasenbergParams::default(),
        }
    }
}

/// Stepp completeness stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletenessConfig {
    /// Magnitude bin width.
    #[serde(alias = "magnitude_windows")]
    pub magnitude_window: f64,
    /// Time window increment, years.
    pub time_window: f64,
    /// Tolerance on consecutive slope residuals.
    pub sensitivity: f64,
    /// Force completeness years to be non-increasing with magnitude.
    pub increment_lock: bool,
}

impl Default for CompletenessConfig {
    fn default() -> Self {
        Self {
            magnitude_window: 0.1,
            time_window: 5.0,
            sensitivity: 0.2,
            increment_lock: true,
        }
    }
}

/// Recurrence stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecurrenceConfig {
    #[serde(alias = "recurrence_algorithm")]
    pub method: RecurrenceMethod,
    /// Magnitude bin width.
    pub magnitude_window: f64,
    /// Magnitude at which the a-value is reported.
    pub reference_magnitude: f64,
    /// Time bin width for the Weichert table, years.
    pub time_window: f64,
    /// Starting value of beta for Newton-Raphson.
    pub initial_beta: f64,
    /// Stop when successive beta values differ by at most this.
    pub tolerance: f64,
    pub max_iterations: usize,
}

impl Default for RecurrenceConfig {
    fn default() -> Self {
        Self {
            method: RecurrenceMethod::MaximumLikelihood,
            magnitude_window: 0.1,
            reference_magnitude: 0.0,
            time_window: 1.0,
            initial_beta: 1.5,
            tolerance: 1e-5,
            max_iterations: 1000,
        }
    }
}

/// Externally supplied maximum observed magnitude and its uncertainty.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObservedMax {
    pub magnitude: f64,
    pub sigma: f64,
}

/// Maximum-magnitude stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaxMagnitudeConfig {
    #[serde(alias = "maxim_mag_algorithm")]
    pub method: MaxMagnitudeMethod,
    pub iteration_tolerance: f64,
    pub maximum_iterations: usize,
    /// Number of largest events used by the kernel estimator.
    #[serde(alias = "neq")]
    pub number_earthquakes: usize,
    /// Integration points per iteration.
    pub number_samples: usize,
    pub number_bootstraps: usize,
    /// Seed for the bootstrap generator; `None` draws from OS entropy.
    pub seed: Option<u64>,
    /// Use this instead of the catalog maximum.
    pub observed_max: Option<ObservedMax>,
}

impl Default for MaxMagnitudeConfig {
    fn default() -> Self {
        Self {
            method: MaxMagnitudeMethod::KijkoNonParametricGaussian,
            iteration_tolerance: 0.01,
            maximum_iterations: 1000,
            number_earthquakes: 100,
            number_samples: 51,
            number_bootstraps: 100,
            seed: None,
            observed_max: None,
        }
    }
}

/// Fault magnitude-frequency calculator inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaultMfdConfig {
    /// Slip rate, mm/yr.
    #[serde(alias = "slip")]
    pub slip_rate_mm_yr: f64,
    /// Displacement-to-length ratio.
    #[serde(alias = "dlr", default = "default_dlr")]
    pub displacement_length_ratio: f64,
    /// Shear modulus, GPa.
    #[serde(alias = "smod", default = "default_shear_modulus")]
    pub shear_modulus_gpa: f64,
    /// Down-dip fault width, km.
    #[serde(alias = "fault_width")]
    pub fault_width_km: f64,
    pub b_value: f64,
    #[serde(alias = "min_mag")]
    pub min_magnitude: f64,
    #[serde(default = "default_bin_width")]
    pub bin_width: f64,
    /// Characteristic maximum magnitude; derived from the rupture area when absent.
    #[serde(alias = "max_mag", default)]
    pub max_magnitude: Option<f64>,
    /// Rake angle in degrees.
    #[serde(default)]
    pub rake: Option<f64>,
    /// Rupture area in km², required when `max_magnitude` is absent.
    #[serde(default)]
    pub rupture_area_km2: Option<f64>,
}

fn default_dlr() -> f64 {
    1.25e-5
}

fn default_shear_modulus() -> f64 {
    30.0
}

fn default_bin_width() -> f64 {
    0.1
}

impl FaultMfdConfig {
    pub fn mechanism(&self) -> Rake {
        Rake::from_degrees(self.rake)
    }
}

/// All analysis stages in one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub schema_version: String,
    pub decluster: DeclusterConfig,
    pub completeness: CompletenessConfig,
    pub recurrence: RecurrenceConfig,
    pub max_magnitude: MaxMagnitudeConfig,
    pub fault_mfd: Option<FaultMfdConfig>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            schema_version: crate::CONFIG_SCHEMA_VERSION.to_string(),
            decluster: DeclusterConfig::default(),
            completeness: CompletenessConfig::default(),
            recurrence: RecurrenceConfig::default(),
            max_magnitude: MaxMagnitudeConfig::default(),
            fault_mfd: None,
        }
    }
}

impl AnalysisConfig {
    /// Parse a JSON document and validate it.
    pub fn from_json_str(s: &str) -> ValidationResult<Self> {
        let config: AnalysisConfig =
            serde_json::from_str(s).map_err(|e| ValidationError::ParseError(e.to_string()))?;
        validate_analysis(&config)?;
        Ok(config)
    }

    /// Serialize to pretty JSON.
    pub fn to_json_pretty(&self) -> ValidationResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| ValidationError::ParseError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_names_parse() {
        assert_eq!("GardnerKnopoff".parse::<WindowMethod>().unwrap(), WindowMethod::GardnerKnopoff);
        assert_eq!("gruenthal".parse::<WindowMethod>().unwrap(), WindowMethod::Gruenthal);
        assert_eq!("Uhrhammer-Window".parse::<WindowMethod>().unwrap(), WindowMethod::Uhrhammer);
        let err = "Knopoff".parse::<WindowMethod>().unwrap_err();
        assert_eq!(err.to_string(), "Unknown window method: 'Knopoff'");
    }

    #[test]
    fn algorithm_names_parse() {
        assert_eq!("Wiechart".parse::<RecurrenceMethod>().unwrap(), RecurrenceMethod::Weichert);
        assert_eq!("MLE".parse::<RecurrenceMethod>().unwrap(), RecurrenceMethod::MaximumLikelihood);
        assert_eq!(
            "Cumulative_Moment".parse::<MaxMagnitudeMethod>().unwrap(),
            MaxMagnitudeMethod::CumulativeMoment
        );
        assert_eq!("reasenberg".parse::<DeclusterMethod>().unwrap(), DeclusterMethod::Reasenberg);
        assert!("kmeans".parse::<DeclusterMethod>().is_err());
    }

    #[test]
    fn display_round_trips_through_from_str() {
        for m in WindowMethod::ALL {
            assert_eq!(m.to_string().parse::<WindowMethod>().unwrap(), m);
        }
        for m in [RecurrenceMethod::MaximumLikelihood, RecurrenceMethod::Weichert] {
            assert_eq!(m.to_string().parse::<RecurrenceMethod>().unwrap(), m);
        }
    }

    #[test]
    fn rake_classification() {
        assert_eq!(Rake::from_degrees(None), Rake::Unspecified);
        assert_eq!(Rake::from_degrees(Some(0.0)), Rake::StrikeSlip);
        assert_eq!(Rake::from_degrees(Some(180.0)), Rake::StrikeSlip);
        assert_eq!(Rake::from_degrees(Some(-170.0)), Rake::StrikeSlip);
        assert_eq!(Rake::from_degrees(Some(90.0)), Rake::Reverse);
        assert_eq!(Rake::from_degrees(Some(-90.0)), Rake::Normal);
    }

    #[test]
    fn defaults() {
        let cfg = AnalysisConfig::default();
        assert_eq!(cfg.schema_version, crate::CONFIG_SCHEMA_VERSION);
        assert_eq!(cfg.decluster.reasenberg.tau_max_days, 10.0);
        assert_eq!(cfg.recurrence.max_iterations, 1000);
        assert_eq!(cfg.max_magnitude.number_samples, 51);
        assert!(cfg.fault_mfd.is_none());
    }

    #[test]
    fn serde_rejects_unknown_window() {
        let err = serde_json::from_str::<DeclusterConfig>(r#"{"window": "Nearest"}"#);
        assert!(err.is_err());
    }

    #[test]
    fn serde_accepts_legacy_keys() {
        let cfg: DeclusterConfig =
            serde_json::from_str(r#"{"time_dist_windows": "Gruenthal", "foreshock_time_window": 0.5}"#)
                .unwrap();
        assert_eq!(cfg.window, WindowMethod::Gruenthal);
        assert_eq!(cfg.foreshock_time_prop, 0.5);
    }
}
