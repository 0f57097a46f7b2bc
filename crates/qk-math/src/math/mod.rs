//! Core math modules.

pub mod convergence;
pub mod geo;
pub mod grid;
pub mod normal;
pub mod quadrature;
pub mod stats;
