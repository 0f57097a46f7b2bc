//! Gardner-Knopoff window declustering.
//!
//! Events are visited from the largest magnitude down (stable, so equal
//! magnitudes keep catalog order and the earlier row claims shared
//! neighbours). Each unassigned event opens a window
//! `[-T * fs, T]` in time and `L` in epicentral distance; every other
//! unassigned event inside it joins the cluster. Members before the
//! trigger are foreshocks (`vcl = -id`, flag `-1`), members at or after it
//! are aftershocks (`vcl = id`, flag `+1`). The trigger keeps flag `0`.

use super::windows::window;
use super::{DeclusterOutput, Declusterer};
use qk_common::{Catalog, Permutation, Result};
use qk_config::WindowMethod;
use qk_math::haversine_km;

/// Fixed space-time window declustering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GardnerKnopoff {
    pub window: WindowMethod,
    /// Fraction of the time window searched before the trigger.
    pub foreshock_time_prop: f64,
}

impl GardnerKnopoff {
    pub fn new(window: WindowMethod, foreshock_time_prop: f64) -> Self {
        Self {
            window,
            foreshock_time_prop,
        }
    }
}

impl Default for GardnerKnopoff {
    fn default() -> Self {
        Self::new(WindowMethod::GardnerKnopoff, 0.0)
    }
}

impl Declusterer for GardnerKnopoff {
    fn name(&self) -> &'static str {
        "GardnerKnopoff"
    }

    fn decluster(&self, catalog: &Catalog) -> Result<DeclusterOutput> {
        if catalog.is_empty() {
            return Ok(DeclusterOutput::unclustered(catalog));
        }

        let order = Permutation::descending(&catalog.magnitudes());
        let sorted = catalog.permuted(&order)?;
        let events = sorted.events();
        let times = sorted.decimal_years();
        let n = events.len();

        let mut vcl = vec![0i32; n];
        let mut flags = vec![0i32; n];
        let mut assigned = vec![false; n];
        let mut cluster_id = 0i32;

        for i in 0..n {
            if assigned[i] {
                continue;
            }
            let trigger = &events[i];
            let w = window(self.window, trigger.magnitude);
            let earliest = -w.time_years * self.foreshock_time_prop;

            let members: Vec<usize> = (0..n)
                .filter(|&j| j != i && !assigned[j])
                .filter(|&j| {
                    let dt = times[j] - times[i];
                    dt >= earliest && dt <= w.time_years
                })
                .filter(|&j| {
                    haversine_km(
                        events[j].longitude,
                        events[j].latitude,
                        trigger.longitude,
                        trigger.latitude,
                    ) <= w.space_km
                })
                .collect();

            if members.is_empty() {
                continue;
            }

            cluster_id += 1;
            assigned[i] = true;
            vcl[i] = cluster_id;
            for j in members {
                assigned[j] = true;
                if times[j] < times[i] {
                    vcl[j] = -cluster_id;
                    flags[j] = -1;
                } else {
                    vcl[j] = cluster_id;
                    flags[j] = 1;
                }
            }
        }

        DeclusterOutput::from_processing_order(catalog, &order, &vcl, &flags)
    }
}
