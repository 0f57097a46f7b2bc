//! Catalog selection after declustering and completeness.

use qk_common::{Catalog, CompletenessTable, Error, Result};

/// Per-event exclusion flags: `1` when the event was removed by
/// declustering or predates the completeness year for its magnitude,
/// `0` when it enters the recurrence analysis.
///
/// Events below the smallest completeness magnitude are excluded.
pub fn selection_flags(
    catalog: &Catalog,
    decluster_flags: &[i32],
    table: &CompletenessTable,
) -> Result<Vec<i32>> {
    if decluster_flags.len() != catalog.len() {
        return Err(Error::length_mismatch(
            "declustering flags",
            catalog.len(),
            decluster_flags.len(),
        ));
    }
    Ok(catalog
        .iter()
        .zip(decluster_flags)
        .map(|(event, &flag)| {
            let complete = table
                .start_year_for(event.magnitude)
                .is_some_and(|start| event.year as f64 >= start);
            i32::from(flag != 0 || !complete)
        })
        .collect())
}
