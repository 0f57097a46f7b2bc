//! Reasenberg link-based declustering.
//!
//! # Model
//!
//! Events are visited in chronological order. Event `i` looks ahead for
//! `tau` days and links every later event `j` that lies within its
//! interaction radius:
//!
//! ```text
//! r_i  = min(rfact * 0.011 * 10^(0.4 M_i), rmax)
//! tau  = taumin                                        i not clustered
//! tau  = -ln(1 - p) * (t_i - t_big) / 10^((dM - 1) * 2/3)   otherwise
//!        dM = max(0, (1 - xk) * M_big - xmeff), clamped to [taumin, taumax]
//! ```
//!
//! where `big` is the largest event of the cluster `i` belongs to. An
//! event inside a cluster also links `j` when `j` lies within the crack
//! radius `min(0.011 * 10^(0.4 M_big), rmax)` of that largest event.
//!
//! Linking an unclustered `j` adds it to the cluster; linking an event of
//! a different cluster merges the two under the smaller id.
//!
//! # Location errors
//!
//! Distances are hypocentral when events carry a [`LocationError`]:
//! horizontal and vertical separations are each reduced by the summed
//! location uncertainties (floored at zero) before combining. Events
//! without one behave as surface events with exact locations.
//!
//! # Labelling
//!
//! Clusters are renumbered `1..` in order of creation. The largest member
//! (earliest on ties) is the mainshock with flag `0`; earlier members are
//! foreshocks (`-1`), later ones aftershocks (`+1`). All members carry the
//! positive cluster id.
//!
//! [`LocationError`]: qk_common::LocationError

use super::{DeclusterOutput, Declusterer};
use qk_common::{Catalog, Event, Permutation, Result};
use qk_config::ReasenbergParams;
use qk_math::haversine_km;
use std::collections::BTreeMap;

/// Crack radius in km for magnitude `m`.
pub fn crack_radius_km(m: f64) -> f64 {
    0.011 * 10f64.powf(0.4 * m)
}

/// Link distance between two events, reduced by their location errors.
pub fn link_distance_km(a: &Event, b: &Event) -> f64 {
    let la = a.location_or_default();
    let lb = b.location_or_default();
    let dh = haversine_km(a.longitude, a.latitude, b.longitude, b.latitude);
    let dz = (la.depth_km - lb.depth_km).abs();
    let eh = (dh - (la.horizontal_error_km + lb.horizontal_error_km)).max(0.0);
    let ez = (dz - (la.depth_error_km + lb.depth_error_km)).max(0.0);
    eh.hypot(ez)
}

/// Link-based declustering.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Reasenberg {
    pub params: ReasenbergParams,
}

impl Reasenberg {
    pub fn new(params: ReasenbergParams) -> Self {
        Self { params }
    }

    fn look_ahead_days(&self, t: f64, big: &Event, t_big: f64) -> f64 {
        let p = &self.params;
        let dm = ((1.0 - p.magnitude_factor) * big.magnitude - p.effective_min_magnitude).max(0.0);
        let denom = 10f64.powf((dm - 1.0) * 2.0 / 3.0);
        let tau = -(1.0 - p.confidence).ln() * (t - t_big) / denom;
        tau.max(p.tau_min_days).min(p.tau_max_days)
    }

    /// Raw cluster ids per event in chronological order (`0` = none).
    fn link(&self, events: &[Event], days: &[f64]) -> Vec<usize> {
        let p = &self.params;
        let n = events.len();
        let mut cluster = vec![0usize; n];
        // largest[id - 1] = index of the cluster's largest event
        let mut largest: Vec<usize> = Vec::new();

        for i in 0..n {
            let mut k = cluster[i];
            let tau = if k == 0 {
                p.tau_min_days
            } else {
                let big = largest[k - 1];
                self.look_ahead_days(days[i], &events[big], days[big])
            };
            let radius = (p.radius_factor * crack_radius_km(events[i].magnitude)).min(p.max_radius_km);

            for j in (i + 1)..n {
                if days[j] - days[i] > tau {
                    break;
                }
                let mut linked = link_distance_km(&events[i], &events[j]) <= radius;
                if !linked && k != 0 {
                    let big = largest[k - 1];
                    let crack = crack_radius_km(events[big].magnitude).min(p.max_radius_km);
                    linked = link_distance_km(&events[big], &events[j]) <= crack;
                }
                if !linked {
                    continue;
                }

                if k == 0 {
                    largest.push(i);
                    k = largest.len();
                    cluster[i] = k;
                }

                let kj = cluster[j];
                if kj == 0 {
                    cluster[j] = k;
                    if events[j].magnitude > events[largest[k - 1]].magnitude {
                        largest[k - 1] = j;
                    }
                } else if kj != k {
                    let (keep, drop) = (k.min(kj), k.max(kj));
                    let (a, b) = (largest[keep - 1], largest[drop - 1]);
                    let b_wins = events[b].magnitude > events[a].magnitude
                        || (events[b].magnitude == events[a].magnitude && days[b] < days[a]);
                    largest[keep - 1] = if b_wins { b } else { a };
                    for c in cluster.iter_mut().filter(|c| **c == drop) {
                        *c = keep;
                    }
                    k = keep;
                }
            }
        }
        cluster
    }
}

impl Declusterer for Reasenberg {
    fn name(&self) -> &'static str {
        "Reasenberg"
    }

    fn decluster(&self, catalog: &Catalog) -> Result<DeclusterOutput> {
        if catalog.is_empty() {
            return Ok(DeclusterOutput::unclustered(catalog));
        }

        let days: Vec<f64> = catalog.decimal_years().iter().map(|t| t * 365.0).collect();
        let order = Permutation::ascending(&days);
        let sorted = catalog.permuted(&order)?;
        let raw = self.link(sorted.events(), &order.apply(&days)?);
        let raw = order.restore(&raw)?;

        // Merged-away ids leave gaps; renumber the survivors.
        let mut renumber: BTreeMap<usize, i32> = BTreeMap::new();
        for &c in raw.iter().filter(|&&c| c != 0) {
            renumber.insert(c, 0);
        }
        for (rank, id) in renumber.values_mut().enumerate() {
            *id = rank as i32 + 1;
        }

        let events = catalog.events();
        let vcl: Vec<i32> = raw
            .iter()
            .map(|c| renumber.get(c).copied().unwrap_or(0))
            .collect();
        let mut flags = vec![0i32; events.len()];
        for &id in renumber.values() {
            let members: Vec<usize> = (0..events.len()).filter(|&x| vcl[x] == id).collect();
            let mut main = members[0];
            for &x in &members {
                let m = events[x].magnitude;
                let best = events[main].magnitude;
                if m > best || (m == best && days[x] < days[main]) {
                    main = x;
                }
            }
            for &x in members.iter().filter(|&&x| x != main) {
                flags[x] = if days[x] < days[main] { -1 } else { 1 };
            }
        }

        DeclusterOutput::from_catalog_order(catalog, vcl, flags)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qk_common::LocationError;

    #[test]
    fn crack_radius_values() {
        assert!((crack_radius_km(4.0) - 0.438).abs() < 1e-3);
        assert!((crack_radius_km(3.0) - 0.174).abs() < 1e-3);
    }

    #[test]
    fn link_distance_subtracts_errors() {
        let a = Event::new(2000, 1, 1, 22.0, 39.0, 4.0).with_location(LocationError::new(10.0, 1.0, 1.0));
        let b = Event::new(2000, 1, 1, 22.0, 39.0, 4.0).with_location(LocationError::new(14.0, 0.5, 1.0));
        // dz = 4, reduced by 2
        assert!((link_distance_km(&a, &b) - 2.0).abs() < 1e-12);

        let c = Event::new(2000, 1, 1, 22.0, 39.0, 4.0);
        assert_eq!(link_distance_km(&c, &c), 0.0);
    }

    #[test]
    fn look_ahead_is_clamped() {
        let r = Reasenberg::default();
        let big = Event::new(2000, 1, 1, 0.0, 0.0, 6.0);
        assert_eq!(r.look_ahead_days(0.0, &big, 0.0), 1.0);
        assert_eq!(r.look_ahead_days(1.0e6, &big, 0.0), 10.0);
        // dM = 1.5 -> denom = 10^(1/3)
        let tau = r.look_ahead_days(2.0, &big, 0.0);
        let expected = -(0.05f64).ln() * 2.0 / 10f64.powf(1.0 / 3.0);
        assert!((tau - expected).abs() < 1e-12);
    }

    #[test]
    fn same_day_sequence_clusters() {
        let catalog = Catalog::new(vec![
            Event::new(2000, 3, 1, 21.00, 38.00, 5.6),
            Event::new(2000, 3, 1, 21.02, 38.01, 3.1),
            Event::new(2000, 3, 2, 21.01, 37.99, 3.4),
            Event::new(2000, 2, 28, 21.01, 38.00, 3.0),
        ]);
        let out = Reasenberg::default().decluster(&catalog).unwrap();
        assert_eq!(out.vcl, vec![1, 1, 1, 1]);
        assert_eq!(out.flags, vec![0, 1, 1, -1]);
    }
}
