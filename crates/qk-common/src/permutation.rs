//! Owned index permutations.
//!
//! Algorithms that process a catalog in magnitude or time order build a
//! [`Permutation`] once, gather data into processing order with
//! [`Permutation::apply`], and scatter per-event results back to catalog
//! order with [`Permutation::restore`].

use crate::error::{Error, Result};
use std::cmp::Ordering;

/// A permutation of `0..n`. Position `k` holds the source index `order[k]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Permutation {
    order: Vec<usize>,
}

impl Permutation {
    pub fn identity(n: usize) -> Self {
        Self {
            order: (0..n).collect(),
        }
    }

    /// Validate and wrap an explicit index order.
    pub fn from_order(order: Vec<usize>) -> Result<Self> {
        let mut seen = vec![false; order.len()];
        for &i in &order {
            if i >= order.len() || seen[i] {
                return Err(Error::InvalidInput(format!(
                    "index {} is out of range or repeated in a permutation of {}",
                    i,
                    order.len()
                )));
            }
            seen[i] = true;
        }
        Ok(Self { order })
    }

    /// Stable sort of `0..n` under `compare`.
    pub fn sorted_by<F>(n: usize, mut compare: F) -> Self
    where
        F: FnMut(usize, usize) -> Ordering,
    {
        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&a, &b| compare(a, b));
        Self { order }
    }

    /// Stable ascending order of `keys`.
    pub fn ascending(keys: &[f64]) -> Self {
        Self::sorted_by(keys.len(), |a, b| keys[a].total_cmp(&keys[b]))
    }

    /// Stable descending order of `keys`; ties keep their original order.
    pub fn descending(keys: &[f64]) -> Self {
        Self::sorted_by(keys.len(), |a, b| keys[b].total_cmp(&keys[a]))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Source indices in processing order.
    pub fn as_slice(&self) -> &[usize] {
        &self.order
    }

    /// The permutation that undoes this one.
    pub fn inverse(&self) -> Self {
        let mut inv = vec![0; self.order.len()];
        for (k, &i) in self.order.iter().enumerate() {
            inv[i] = k;
        }
        Self { order: inv }
    }

    /// Gather `data` into processing order: `out[k] = data[order[k]]`.
    pub fn apply<T: Clone>(&self, data: &[T]) -> Result<Vec<T>> {
        self.check_len(data.len())?;
        Ok(self.order.iter().map(|&i| data[i].clone()).collect())
    }

    /// Scatter processing-order values back: `out[order[k]] = data[k]`.
    pub fn restore<T: Clone>(&self, data: &[T]) -> Result<Vec<T>> {
        self.inverse().apply(data)
    }

    fn check_len(&self, len: usize) -> Result<()> {
        if len != self.order.len() {
            return Err(Error::length_mismatch("permuted data", self.order.len(), len));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descending_is_stable() {
        let p = Permutation::descending(&[4.0, 6.0, 4.0, 6.0, 5.0]);
        assert_eq!(p.as_slice(), &[1, 3, 4, 0, 2]);
    }

    #[test]
    fn ascending_is_stable() {
        let p = Permutation::ascending(&[2.0, 1.0, 2.0, 0.5]);
        assert_eq!(p.as_slice(), &[3, 1, 0, 2]);
    }

    #[test]
    fn apply_then_restore_is_identity() {
        let data = vec!['a', 'b', 'c', 'd'];
        let p = Permutation::from_order(vec![2, 0, 3, 1]).unwrap();
        let sorted = p.apply(&data).unwrap();
        assert_eq!(sorted, vec!['c', 'a', 'd', 'b']);
        assert_eq!(p.restore(&sorted).unwrap(), data);
    }

    #[test]
    fn inverse_composes_to_identity() {
        let p = Permutation::from_order(vec![1, 2, 0]).unwrap();
        let inv = p.inverse();
        let data = [10, 20, 30];
        assert_eq!(inv.apply(&p.apply(&data).unwrap()).unwrap(), data.to_vec());
    }

    #[test]
    fn from_order_rejects_duplicates() {
        assert!(Permutation::from_order(vec![0, 0]).is_err());
        assert!(Permutation::from_order(vec![0, 2]).is_err());
    }

    #[test]
    fn length_checked() {
        let p = Permutation::identity(3);
        assert_eq!(p.apply(&[1, 2]).unwrap_err().code(), 20);
    }
}
