//! Iteration reports for bounded solvers.

use serde::{Deserialize, Serialize};

/// Outcome of a bounded iterative solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Convergence {
    /// Number of update steps performed.
    pub iterations: usize,
    /// Whether the tolerance was met before the iteration cap.
    pub converged: bool,
}

impl Convergence {
    pub fn converged(iterations: usize) -> Self {
        Self {
            iterations,
            converged: true,
        }
    }

    pub fn capped(iterations: usize) -> Self {
        Self {
            iterations,
            converged: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors() {
        assert_eq!(
            Convergence::converged(4),
            Convergence {
                iterations: 4,
                converged: true
            }
        );
        assert!(!Convergence::capped(1000).converged);
    }
}
