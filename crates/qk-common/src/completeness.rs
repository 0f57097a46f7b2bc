//! Completeness tables.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// One completeness row: complete for magnitudes `>= magnitude` from `year` on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompletenessRow {
    pub year: f64,
    pub magnitude: f64,
}

/// Ordered (year, magnitude) completeness thresholds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompletenessTable {
    rows: Vec<CompletenessRow>,
}

impl CompletenessTable {
    pub fn new(rows: Vec<CompletenessRow>) -> Self {
        Self { rows }
    }

    /// Build from parallel year and magnitude columns.
    pub fn from_columns(years: &[f64], magnitudes: &[f64]) -> Result<Self> {
        if years.len() != magnitudes.len() {
            return Err(Error::length_mismatch(
                "completeness table",
                years.len(),
                magnitudes.len(),
            ));
        }
        if years
            .iter()
            .chain(magnitudes)
            .any(|v| !v.is_finite())
        {
            return Err(Error::InvalidInput(
                "completeness table contains non-finite values".to_string(),
            ));
        }
        Ok(Self {
            rows: years
                .iter()
                .zip(magnitudes)
                .map(|(&year, &magnitude)| CompletenessRow { year, magnitude })
                .collect(),
        })
    }

    pub fn rows(&self) -> &[CompletenessRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn years(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.year).collect()
    }

    pub fn magnitudes(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.magnitude).collect()
    }

    /// Start year of completeness for magnitude `m`.
    ///
    /// Uses the row with the largest threshold magnitude not above `m`.
    /// Returns `None` when `m` is below every threshold.
    pub fn start_year_for(&self, m: f64) -> Option<f64> {
        self.rows
            .iter()
            .filter(|r| r.magnitude <= m)
            .max_by(|a, b| a.magnitude.total_cmp(&b.magnitude))
            .map(|r| r.year)
    }
}
