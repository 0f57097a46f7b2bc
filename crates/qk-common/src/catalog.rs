//! Earthquake events and the catalog matrix.
//!
//! A [`Catalog`] is an ordered sequence of [`Event`] records. Insertion order
//! carries no meaning beyond being the index every catalog-aligned output
//! vector (cluster ids, flags, selection flags) is reported against.

use crate::error::{Error, Result};
use crate::permutation::Permutation;
use serde::{Deserialize, Serialize};

/// Hypocentral depth and location uncertainty of an event.
///
/// Only link-based declustering reads these; a missing value behaves as all
/// zeros (purely epicentral clustering).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LocationError {
    /// Hypocentral depth in km.
    pub depth_km: f64,
    /// Horizontal location uncertainty in km.
    pub horizontal_error_km: f64,
    /// Depth uncertainty in km.
    pub depth_error_km: f64,
}

impl LocationError {
    pub fn new(depth_km: f64, horizontal_error_km: f64, depth_error_km: f64) -> Self {
        Self {
            depth_km,
            horizontal_error_km,
            depth_error_km,
        }
    }
}

/// A single catalog record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    /// Longitude in degrees.
    pub longitude: f64,
    /// Latitude in degrees.
    pub latitude: f64,
    /// Moment magnitude.
    pub magnitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<LocationError>,
}

impl Event {
    pub fn new(year: i32, month: u32, day: u32, longitude: f64, latitude: f64, magnitude: f64) -> Self {
        Self {
            year,
            month,
            day,
            longitude,
            latitude,
            magnitude,
            location: None,
        }
    }

    /// Attach depth and location uncertainty.
    pub fn with_location(mut self, location: LocationError) -> Self {
        self.location = Some(location);
        self
    }

    /// Event time as a decimal year (365-day years).
    pub fn decimal_year(&self) -> f64 {
        qk_math::decimal_year(self.year, self.month, self.day)
    }

    /// Location uncertainty, zeros when absent.
    pub fn location_or_default(&self) -> LocationError {
        self.location.unwrap_or_default()
    }

    fn check(&self, index: usize) -> Result<()> {
        if !(1..=12).contains(&self.month) {
            return Err(Error::InvalidInput(format!(
                "event {}: month {} outside 1..=12",
                index, self.month
            )));
        }
        if !(1..=31).contains(&self.day) {
            return Err(Error::InvalidInput(format!(
                "event {}: day {} outside 1..=31",
                index, self.day
            )));
        }
        if !(self.longitude.is_finite() && self.latitude.is_finite() && self.magnitude.is_finite()) {
            return Err(Error::InvalidInput(format!(
                "event {}: non-finite coordinate or magnitude",
                index
            )));
        }
        Ok(())
    }
}

/// Ordered earthquake catalog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    events: Vec<Event>,
}

impl Catalog {
    pub fn new(events: Vec<Event>) -> Self {
        Self { events }
    }

    /// Build a catalog from `[year, month, day, longitude, latitude, magnitude]` rows.
    pub fn from_rows(rows: &[[f64; 6]]) -> Result<Self> {
        let mut events = Vec::with_capacity(rows.len());
        for (i, row) in rows.iter().enumerate() {
            let [year, month, day, lon, lat, mag] = *row;
            for (name, v) in [("year", year), ("month", month), ("day", day)] {
                if !v.is_finite() || v.fract() != 0.0 {
                    return Err(Error::InvalidInput(format!(
                        "row {}: {} must be an integer, got {}",
                        i, name, v
                    )));
                }
            }
            if month < 1.0 || day < 1.0 {
                return Err(Error::InvalidInput(format!(
                    "row {}: month and day must be positive",
                    i
                )));
            }
            events.push(Event::new(year as i32, month as u32, day as u32, lon, lat, mag));
        }
        let catalog = Self { events };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Check every event has a valid date and finite coordinates.
    pub fn validate(&self) -> Result<()> {
        self.events
            .iter()
            .enumerate()
            .try_for_each(|(i, e)| e.check(i))
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Event> {
        self.events.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Event> {
        self.events.get(index)
    }

    pub fn push(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn years(&self) -> Vec<i32> {
        self.events.iter().map(|e| e.year).collect()
    }

    pub fn magnitudes(&self) -> Vec<f64> {
        self.events.iter().map(|e| e.magnitude).collect()
    }

    pub fn decimal_years(&self) -> Vec<f64> {
        self.events.iter().map(Event::decimal_year).collect()
    }

    /// Rows as `[year, month, day, longitude, latitude, magnitude]`.
    pub fn to_rows(&self) -> Vec<[f64; 6]> {
        self.events
            .iter()
            .map(|e| {
                [
                    e.year as f64,
                    e.month as f64,
                    e.day as f64,
                    e.longitude,
                    e.latitude,
                    e.magnitude,
                ]
            })
            .collect()
    }

    /// Events whose mask entry is true, in catalog order.
    pub fn select(&self, mask: &[bool]) -> Result<Catalog> {
        if mask.len() != self.len() {
            return Err(Error::length_mismatch("selection mask", self.len(), mask.len()));
        }
        Ok(Catalog::new(
            self.events
                .iter()
                .zip(mask)
                .filter(|(_, keep)| **keep)
                .map(|(e, _)| e.clone())
                .collect(),
        ))
    }

    /// Events whose flag is 0, in catalog order.
    pub fn retain_unflagged(&self, flags: &[i32]) -> Result<Catalog> {
        let mask: Vec<bool> = flags.iter().map(|&f| f == 0).collect();
        self.select(&mask)
    }

    /// Catalog reordered by `perm` (position `k` holds event `perm[k]`).
    pub fn permuted(&self, perm: &Permutation) -> Result<Catalog> {
        Ok(Catalog::new(perm.apply(&self.events)?))
    }
}

impl From<Vec<Event>> for Catalog {
    fn from(events: Vec<Event>) -> Self {
        Self::new(events)
    }
}

impl FromIterator<Event> for Catalog {
    fn from_iter<I: IntoIterator<Item = Event>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Event;
    type IntoIter = std::slice::Iter<'a, Event>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}
