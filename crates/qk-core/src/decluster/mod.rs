//! Declustering: separate mainshocks from foreshocks and aftershocks.
//!
//! Every method returns two catalog-aligned vectors plus the purged catalog:
//!
//! - `vcl`: cluster id per event, `0` for events outside any cluster
//! - `flags`: `0` for mainshocks and unclustered events, `-1` for
//!   foreshocks, `+1` for aftershocks
//! - `purged`: the events with flag `0`, in catalog order
//!
//! The sign convention of `vcl` differs per method. Gardner-Knopoff gives
//! foreshocks a negative id; Afteran and Reasenberg label every cluster
//! member with the positive id. Callers should rely on `flags` for
//! filtering and treat `vcl` as method-specific.
//!
//! Methods process events in magnitude or time order internally. The
//! ordering is an explicit [`Permutation`]; results are scattered back to
//! catalog order before they are returned.

pub mod afteran;
pub mod gardner_knopoff;
pub mod reasenberg;
pub mod windows;

pub use afteran::Afteran;
pub use gardner_knopoff::GardnerKnopoff;
pub use reasenberg::Reasenberg;
pub use windows::{window, Window};

use qk_common::{Catalog, Permutation, Result};
use qk_config::{DeclusterConfig, DeclusterMethod};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;

/// Result of a declustering run, aligned with the input catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeclusterOutput {
    /// Cluster id per event (`0` = not clustered).
    pub vcl: Vec<i32>,
    /// `-1` foreshock, `0` retained, `+1` aftershock.
    pub flags: Vec<i32>,
    /// Retained events in catalog order.
    pub purged: Catalog,
}

impl DeclusterOutput {
    /// Build the output from vectors computed in catalog order.
    pub fn from_catalog_order(catalog: &Catalog, vcl: Vec<i32>, flags: Vec<i32>) -> Result<Self> {
        let purged = catalog.retain_unflagged(&flags)?;
        Ok(Self { vcl, flags, purged })
    }

    /// Build the output from vectors computed in the processing order of `order`.
    pub fn from_processing_order(
        catalog: &Catalog,
        order: &Permutation,
        vcl: &[i32],
        flags: &[i32],
    ) -> Result<Self> {
        let vcl = order.restore(vcl)?;
        let flags = order.restore(flags)?;
        Self::from_catalog_order(catalog, vcl, flags)
    }

    /// An output where every event is retained.
    pub fn unclustered(catalog: &Catalog) -> Self {
        Self {
            vcl: vec![0; catalog.len()],
            flags: vec![0; catalog.len()],
            purged: catalog.clone(),
        }
    }

    /// Number of distinct clusters.
    pub fn cluster_count(&self) -> usize {
        self.vcl
            .iter()
            .filter(|&&c| c != 0)
            .map(|c| c.unsigned_abs())
            .collect::<BTreeSet<_>>()
            .len()
    }

    /// Number of events removed as foreshocks or aftershocks.
    pub fn removed_count(&self) -> usize {
        self.flags.iter().filter(|&&f| f != 0).count()
    }
}

/// A declustering method.
pub trait Declusterer {
    /// Short name used in log output.
    fn name(&self) -> &'static str;

    /// Classify every event of `catalog`.
    fn decluster(&self, catalog: &Catalog) -> Result<DeclusterOutput>;
}

/// Decluster `catalog` with the method and parameters in `config`.
pub fn decluster(catalog: &Catalog, config: &DeclusterConfig) -> Result<DeclusterOutput> {
    qk_config::validate::validate_decluster(config)?;
    catalog.validate()?;

    let method: Box<dyn Declusterer> = match config.method {
        DeclusterMethod::GardnerKnopoff => Box::new(GardnerKnopoff::new(
            config.window,
            config.foreshock_time_prop,
        )),
        DeclusterMethod::Afteran => Box::new(Afteran::new(
            config.window,
            config.afteran_time_window_days,
        )),
        DeclusterMethod::Reasenberg => Box::new(Reasenberg::new(config.reasenberg.clone())),
    };

    let output = method.decluster(catalog)?;
    debug!(
        method = method.name(),
        events = catalog.len(),
        clusters = output.cluster_count(),
        removed = output.removed_count(),
        retained = output.purged.len(),
        "declustering complete"
    );
    Ok(output)
}
