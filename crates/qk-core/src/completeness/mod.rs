//! Catalog completeness: the Stepp analysis and the selection vector that
//! combines it with declustering output.

pub mod selection;
pub mod stepp;

pub use selection::selection_flags;
pub use stepp::{stepp, SteppParams};

use qk_common::{Catalog, CompletenessTable, Result};
use qk_config::CompletenessConfig;

/// Run Stepp on a catalog using the year column.
pub fn catalog_completeness(catalog: &Catalog, config: &CompletenessConfig) -> Result<CompletenessTable> {
    qk_config::validate::validate_completeness(config)?;
    let years: Vec<f64> = catalog.years().iter().map(|&y| y as f64).collect();
    stepp(&years, &catalog.magnitudes(), &SteppParams::from(config))
}
