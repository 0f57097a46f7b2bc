//! Deterministic catalogs shared by the integration tests.

use qk_core::{Catalog, CompletenessTable, Event, LocationError};

fn round_to(x: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (x * scale).round() / scale
}

/// Gutenberg-Richter catalog with b = 1 and a stepped completeness history.
///
/// For each year of 1900..=2009 every 0.1 magnitude bin from 4.0 to 6.5
/// accumulates `10^(4.5 - m)` expected events; an event is emitted each
/// time the accumulator passes one. Events below M4.5 before 1960 and
/// below M5.0 before 1930 are dropped. 953 events.
pub fn synthetic_catalog() -> Catalog {
    let mut accumulators = [0.5f64; 26];
    let mut events = Vec::new();
    let mut count = 0usize;
    for year in 1900..=2009 {
        for (k, acc) in accumulators.iter_mut().enumerate() {
            let magnitude = 4.0 + 0.1 * k as f64;
            *acc += 10f64.powf(4.5 - magnitude);
            while *acc >= 1.0 {
                *acc -= 1.0;
                if (magnitude < 4.45 && year < 1960) || (magnitude < 4.95 && year < 1930) {
                    continue;
                }
                events.push(Event::new(
                    year,
                    1 + (count % 12) as u32,
                    1 + ((count * 7) % 28) as u32,
                    20.0 + (count % 17) as f64 * 0.1,
                    38.0 + (count % 13) as f64 * 0.1,
                    magnitude,
                ));
                count += 1;
            }
        }
    }
    Catalog::new(events)
}

/// Per-event magnitude uncertainty aligned with [`synthetic_catalog`].
pub fn synthetic_sigmas(n: usize) -> Vec<f64> {
    (0..n).map(|k| 0.1 + 0.01 * (k % 5) as f64).collect()
}

/// Completeness history the synthetic catalog was generated with.
pub fn synthetic_completeness() -> CompletenessTable {
    CompletenessTable::from_columns(&[1964.0, 1934.0, 1914.0], &[4.0, 4.5, 5.0])
        .expect("valid completeness table")
}

/// An M7.2 mainshock followed by 19 daily aftershocks decaying in size.
pub fn aftershock_sequence() -> Catalog {
    let mut events = vec![Event::new(1982, 5, 3, 20.596, 38.545, 7.2)];
    for k in 1..20u32 {
        events.push(Event::new(
            1982,
            5,
            3 + k,
            round_to(20.596 + 0.01 * k as f64, 3),
            round_to(38.545 - 0.005 * k as f64, 3),
            round_to(6.0 - 0.1 * (k - 1) as f64, 1),
        ));
    }
    Catalog::new(events)
}

/// Twenty moderate events three years and hundreds of kilometres apart.
pub fn scattered_events() -> Catalog {
    (0..20)
        .map(|k| {
            Event::new(
                1961 + 3 * k as i32,
                1 + (k % 3) as u32,
                1 + k as u32,
                20.0 + (k % 5) as f64 * 1.5,
                30.0 + (k % 4) as f64 * 2.0,
                round_to(4.5 + ((7 * k) % 20) as f64 * 0.1, 1),
            )
        })
        .collect()
}

/// [`scattered_events`] with three embedded pairs: a mainshock then a
/// smaller aftershock, a foreshock then a larger mainshock, and another
/// mainshock-aftershock pair.
pub fn three_pairs() -> Catalog {
    let mut events = scattered_events().events().to_vec();
    events[3] = Event::new(1970, 7, 14, 22.25, 36.86, 6.5);
    events[4] = Event::new(1970, 8, 1, 22.35, 36.90, 5.0);
    events[9] = Event::new(1988, 12, 10, 23.40, 34.50, 4.0);
    events[10] = Event::new(1988, 12, 18, 23.44, 34.52, 4.8);
    events[18] = Event::new(2009, 10, 13, 29.90, 36.86, 6.3);
    events[19] = Event::new(2009, 10, 20, 29.95, 36.80, 4.9);
    Catalog::new(events)
}

/// Small-magnitude sequence for link-based clustering: a M5.6 with a
/// foreshock and aftershocks, an unrelated distant event, a pair of M4s
/// linked through a third event, and a late isolated event.
pub fn linked_sequence() -> Catalog {
    Catalog::new(vec![
        Event::new(2000, 3, 1, 21.00, 38.00, 5.6),
        Event::new(2000, 3, 1, 21.02, 38.01, 3.1),
        Event::new(2000, 3, 2, 21.01, 37.99, 3.4),
        Event::new(2000, 3, 3, 21.03, 38.02, 2.9),
        Event::new(2000, 3, 6, 21.02, 37.98, 3.0),
        Event::new(2000, 2, 28, 21.01, 38.00, 3.0),
        Event::new(2000, 3, 1, 25.00, 40.00, 4.0),
        Event::new(2001, 6, 1, 22.000, 39.00, 4.0),
        Event::new(2001, 6, 1, 22.090, 39.00, 4.1),
        Event::new(2001, 6, 2, 22.045, 39.00, 3.0),
        Event::new(2003, 1, 10, 23.0, 37.0, 4.2),
    ])
}

/// [`linked_sequence`] with 10 km depths, the linking event moved to 25 km.
pub fn linked_sequence_with_depths() -> Catalog {
    linked_sequence()
        .iter()
        .enumerate()
        .map(|(k, e)| {
            let location = if k == 9 {
                LocationError::new(25.0, 0.5, 1.0)
            } else {
                LocationError::new(10.0, 0.0, 0.0)
            };
            e.clone().with_location(location)
        })
        .collect()
}

/// Assert two floats agree to `tol`, with context on failure.
pub fn assert_close(actual: f64, expected: f64, tol: f64, what: &str) {
    assert!(
        (actual - expected).abs() <= tol,
        "{what}: expected {expected}, got {actual} (tol {tol})"
    );
}
