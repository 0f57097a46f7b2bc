//! Space-time interaction windows.
//!
//! Each model maps a magnitude to a search radius (km) and a time span
//! (decimal years):
//!
//! ```text
//! Gardner-Knopoff  L = 10^(0.1238 M + 0.983)
//!                  T = 10^(0.032 M + 2.7389) / 365     M >= 6.5
//!                      10^(0.5409 M - 0.547) / 365     otherwise
//! Gruenthal        L = exp(1.77 + sqrt(0.037 + 1.02 M))
//!                  T = |exp(-3.95 + sqrt(0.62 + 17.32 M))| / 365   M < 6.5
//!                      10^(2.8 + 0.024 M) / 365                    otherwise
//! Uhrhammer        L = exp(-1.024 + 0.804 M)
//!                  T = exp(-2.87 + 1.235 M / 365)
//! ```

use qk_config::WindowMethod;
use serde::{Deserialize, Serialize};

/// Search window around a triggering event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Window {
    pub space_km: f64,
    pub time_years: f64,
}

/// Window for an event of magnitude `m`.
pub fn window(method: WindowMethod, m: f64) -> Window {
    match method {
        WindowMethod::GardnerKnopoff => gardner_knopoff(m),
        WindowMethod::Gruenthal => gruenthal(m),
        WindowMethod::Uhrhammer => uhrhammer(m),
    }
}

fn gardner_knopoff(m: f64) -> Window {
    let time_days = if m >= 6.5 {
        10f64.powf(0.032 * m + 2.7389)
    } else {
        10f64.powf(0.5409 * m - 0.547)
    };
    Window {
        space_km: 10f64.powf(0.1238 * m + 0.983),
        time_years: time_days / 365.0,
    }
}

fn gruenthal(m: f64) -> Window {
    let time_days = if m < 6.5 {
        (-3.95 + (0.62 + 17.32 * m).sqrt()).exp().abs()
    } else {
        10f64.powf(2.8 + 0.024 * m)
    };
    Window {
        space_km: (1.77 + (0.037 + 1.02 * m).sqrt()).exp(),
        time_years: time_days / 365.0,
    }
}

// The time term divides the magnitude coefficient, not the result.
fn uhrhammer(m: f64) -> Window {
    Window {
        space_km: (-1.024 + 0.804 * m).exp(),
        time_years: (-2.87 + 1.235 * m / 365.0).exp(),
    }
}
