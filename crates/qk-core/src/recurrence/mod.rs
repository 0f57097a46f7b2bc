//! Gutenberg-Richter recurrence parameters.
//!
//! Fits `log10 N = a - b M` to a declustered catalog whose completeness
//! varies with time, either by maximum likelihood per completeness
//! sub-period ([`b_maxlike_time`]) or by Weichert's method ([`weichert`]).

pub mod mle;
pub mod table;
pub mod weichert;

pub use mle::{b_max_likelihood, b_maxlike_time};
pub use table::{recurrence_table, RecurrenceRow};
pub use weichert::{weichert, weichert_prep, WeichertTable};

use qk_common::{Catalog, CompletenessTable, Result};
use qk_config::{RecurrenceConfig, RecurrenceMethod};
use qk_math::Convergence;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Fitted Gutenberg-Richter parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RecurrenceResult {
    pub b_value: f64,
    pub sigma_b: f64,
    pub a_value: f64,
    pub sigma_a: f64,
    /// Iteration report for iterative fits.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub convergence: Option<Convergence>,
}

/// Fit recurrence parameters to `catalog` with the method in `config`.
///
/// The catalog year column is used for time binning.
pub fn recurrence(
    catalog: &Catalog,
    completeness: &CompletenessTable,
    config: &RecurrenceConfig,
) -> Result<RecurrenceResult> {
    qk_config::validate::validate_recurrence(config)?;
    catalog.validate()?;

    let years: Vec<f64> = catalog.years().iter().map(|&y| y as f64).collect();
    let magnitudes = catalog.magnitudes();

    let result = match config.method {
        RecurrenceMethod::MaximumLikelihood => b_maxlike_time(
            &years,
            &magnitudes,
            completeness,
            config.magnitude_window,
            config.reference_magnitude,
        )?,
        RecurrenceMethod::Weichert => {
            let prep = weichert_prep(
                &years,
                &magnitudes,
                completeness,
                config.magnitude_window,
                config.time_window,
            )?;
            weichert(&prep, config)?
        }
    };

    debug!(
        method = %config.method,
        events = catalog.len(),
        b = result.b_value,
        a = result.a_value,
        "recurrence fit complete"
    );
    Ok(result)
}
