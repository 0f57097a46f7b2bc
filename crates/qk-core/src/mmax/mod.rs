//! Maximum magnitude estimation.

pub mod cumulative_moment;
pub mod kijko;

pub use cumulative_moment::{cumulative_moment, cumulative_moment_bootstrap};
pub use kijko::{h_smooth, kijko_integral, kijko_npg, KijkoEstimate, KijkoParams};

use qk_common::{Catalog, Error, Result};
use qk_config::{MaxMagnitudeConfig, MaxMagnitudeMethod};
use qk_math::Convergence;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Estimated maximum magnitude and its uncertainty.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaxMagnitudeResult {
    pub mmax: f64,
    pub sigma: f64,
    /// Kernel bandwidth, Kijko only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bandwidth: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub convergence: Option<Convergence>,
}

impl From<KijkoEstimate> for MaxMagnitudeResult {
    fn from(est: KijkoEstimate) -> Self {
        Self {
            mmax: est.mmax,
            sigma: est.sigma,
            bandwidth: Some(est.bandwidth),
            convergence: Some(est.convergence),
        }
    }
}

/// Maximum magnitude of `catalog` with the method in `config`.
///
/// `sigmas` are per-event magnitude uncertainties aligned with the
/// catalog; absent, every event is treated as exact.
pub fn maximum_magnitude(
    catalog: &Catalog,
    sigmas: Option<&[f64]>,
    config: &MaxMagnitudeConfig,
) -> Result<MaxMagnitudeResult> {
    qk_config::validate::validate_max_magnitude(config)?;
    catalog.validate()?;
    if catalog.is_empty() {
        return Err(Error::EmptyInput("maximum magnitude catalog".to_string()));
    }

    let magnitudes = catalog.magnitudes();
    let sigmas = match sigmas {
        Some(s) if s.len() != magnitudes.len() => {
            return Err(Error::length_mismatch(
                "catalog/magnitude sigmas",
                magnitudes.len(),
                s.len(),
            ))
        }
        Some(s) => s.to_vec(),
        None => vec![0.0; magnitudes.len()],
    };

    let result = match config.method {
        MaxMagnitudeMethod::KijkoNonParametricGaussian => {
            let params = KijkoParams {
                number_earthquakes: config.number_earthquakes,
                number_samples: config.number_samples,
                tolerance: config.iteration_tolerance,
                max_iterations: config.maximum_iterations,
            };
            kijko_npg(&magnitudes, &sigmas, &params, config.observed_max)?.into()
        }
        MaxMagnitudeMethod::CumulativeMoment => {
            let (mmax, sigma) = cumulative_moment_bootstrap(
                &catalog.years(),
                &magnitudes,
                &sigmas,
                config.number_bootstraps,
                config.seed,
            )?;
            MaxMagnitudeResult {
                mmax,
                sigma,
                bandwidth: None,
                convergence: None,
            }
        }
    };

    debug!(
        method = %config.method,
        events = catalog.len(),
        mmax = result.mmax,
        sigma = result.sigma,
        "maximum magnitude estimated"
    );
    Ok(result)
}
