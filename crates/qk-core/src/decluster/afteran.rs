//! Afteran moving-window declustering.
//!
//! Like Gardner-Knopoff, events are visited by descending magnitude and
//! the magnitude-dependent space window selects candidates. The time test
//! is different: a fixed window of `time_window_days` is chained from one
//! accepted event to the next. Walking forward in time from the trigger,
//! each candidate must fall within the window of the previously accepted
//! event, and the first gap longer than the window ends the sequence. The
//! same walk backwards in time collects foreshocks.
//!
//! A cluster is recorded only when the trigger gathered at least one
//! other event. All members carry the positive cluster id.

use super::windows::window;
use super::{DeclusterOutput, Declusterer};
use qk_common::{Catalog, Permutation, Result};
use qk_config::WindowMethod;
use qk_math::haversine_km;

/// Moving time-window declustering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Afteran {
    pub window: WindowMethod,
    /// Maximum gap between consecutive cluster members, days.
    pub time_window_days: f64,
}

impl Afteran {
    pub fn new(window: WindowMethod, time_window_days: f64) -> Self {
        Self {
            window,
            time_window_days,
        }
    }
}

impl Default for Afteran {
    fn default() -> Self {
        Self::new(WindowMethod::GardnerKnopoff, 60.0)
    }
}

/// Accept candidates while each lies within `gap` of the previous accepted one.
fn chain(candidates: impl Iterator<Item = usize>, times: &[f64], start: f64, gap: f64) -> Vec<usize> {
    let mut accepted = Vec::new();
    let mut previous = start;
    for j in candidates {
        if (times[j] - previous).abs() > gap {
            break;
        }
        accepted.push(j);
        previous = times[j];
    }
    accepted
}

impl Declusterer for Afteran {
    fn name(&self) -> &'static str {
        "Afteran"
    }

    fn decluster(&self, catalog: &Catalog) -> Result<DeclusterOutput> {
        if catalog.is_empty() {
            return Ok(DeclusterOutput::unclustered(catalog));
        }

        let order = Permutation::descending(&catalog.magnitudes());
        let sorted = catalog.permuted(&order)?;
        let events = sorted.events();
        let times = sorted.decimal_years();
        let gap = self.time_window_days / 365.0;
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
            let space_km = window(self.window, trigger.magnitude).space_km;

            let mut nearby: Vec<usize> = (0..n)
                .filter(|&j| j != i && !assigned[j])
                .filter(|&j| {
                    haversine_km(
                        events[j].longitude,
                        events[j].latitude,
                        trigger.longitude,
                        trigger.latitude,
                    ) <= space_km
                })
                .collect();
            nearby.sort_by(|&a, &b| times[a].total_cmp(&times[b]));

            let t0 = times[i];
            let aftershocks = chain(
                nearby.iter().copied().filter(|&j| times[j] >= t0),
                &times,
                t0,
                gap,
            );
            let foreshocks = chain(
                nearby.iter().rev().copied().filter(|&j| times[j] < t0),
                &times,
                t0,
                gap,
            );

            if aftershocks.is_empty() && foreshocks.is_empty() {
                continue;
            }

            cluster_id += 1;
            assigned[i] = true;
            vcl[i] = cluster_id;
            for j in aftershocks {
                assigned[j] = true;
                vcl[j] = cluster_id;
                flags[j] = 1;
            }
            for j in foreshocks {
                assigned[j] = true;
                vcl[j] = cluster_id;
                flags[j] = -1;
            }
        }

        DeclusterOutput::from_processing_order(catalog, &order, &vcl, &flags)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qk_common::Event;

    #[test]
    fn chain_stops_at_first_gap() {
        let times = [0.0, 0.05, 0.1, 0.3, 0.35];
        let accepted = chain(1..5, &times, 0.0, 0.08);
        assert_eq!(accepted, vec![1, 2]);
    }

    #[test]
    fn moving_window_extends_past_fixed_interval() {
        // Each aftershock is 40 days after the previous one; the last is
        // 120 days after the trigger but still chained.
        let catalog = Catalog::new(vec![
            Event::new(2001, 1, 1, 22.0, 38.0, 5.5),
            Event::new(2001, 2, 10, 22.01, 38.0, 4.0),
            Event::new(2001, 3, 22, 22.02, 38.0, 4.1),
            Event::new(2001, 5, 1, 22.0, 38.01, 4.2),
        ]);
        let out = Afteran::default().decluster(&catalog).unwrap();
        assert_eq!(out.vcl, vec![1, 1, 1, 1]);
        assert_eq!(out.flags, vec![0, 1, 1, 1]);

        let out = Afteran::new(WindowMethod::GardnerKnopoff, 30.0)
            .decluster(&catalog)
            .unwrap();
        assert_eq!(out, DeclusterOutput::unclustered(&catalog));
    }

    #[test]
    fn foreshocks_keep_positive_id() {
        let catalog = Catalog::new(vec![
            Event::new(2001, 1, 1, 22.0, 38.0, 4.0),
            Event::new(2001, 1, 11, 22.01, 38.0, 5.5),
        ]);
        let out = Afteran::default().decluster(&catalog).unwrap();
        assert_eq!(out.vcl, vec![1, 1]);
        assert_eq!(out.flags, vec![-1, 0]);
    }
}
