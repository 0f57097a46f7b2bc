//! Seismicity parameter estimation for earthquake catalogs.
//!
//! Four independent components, each a pure function of a catalog and its
//! parameters:
//! - [`decluster`]: separate mainshocks from foreshocks and aftershocks
//! - [`completeness`]: Stepp completeness table and catalog selection
//! - [`recurrence`]: Gutenberg-Richter a- and b-values (MLE, Weichert)
//! - [`mmax`]: maximum magnitude (Kijko non-parametric Gaussian, cumulative moment)
//!
//! plus the [`fault_mfd`] calculator for moment-balanced fault rates.

pub mod completeness;
pub mod decluster;
pub mod fault_mfd;
pub mod logging;
pub mod mmax;
pub mod recurrence;

pub use completeness::{catalog_completeness, selection_flags, stepp, SteppParams};
pub use decluster::{decluster, DeclusterOutput, Declusterer};
pub use fault_mfd::{fault_mfd, wells_coppersmith_magnitude, FaultMfd};
pub use mmax::{maximum_magnitude, MaxMagnitudeResult};
pub use recurrence::{recurrence, RecurrenceResult};

pub use qk_common::{Catalog, CompletenessTable, Error, Event, LocationError, Result};
pub use qk_config::AnalysisConfig;
pub use qk_math::Convergence;
