//! Seismic catalog math utilities.

pub mod math;

pub use math::convergence::Convergence;
pub use math::geo::{decimal_year, haversine_km, EARTH_RADIUS_KM};
pub use math::grid::*;
pub use math::normal::hastings_cdf;
pub use math::quadrature::*;
pub use math::stats::*;
