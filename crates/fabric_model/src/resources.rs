//! Fixed-dimensionality integer resource vectors.
//!
//! Every unit demand and every pool capacity is a [`ResourceVec`] of the same
//! dimensionality K (one component per resource kind). The vector supports
//! the componentwise arithmetic the trimmer needs: accumulate/release a
//! unit's demand, strict capacity checks, violated-dimension lists, and the
//! maximum utilization ratio used for pool ranking.

use serde::{Deserialize, Serialize};

/// A K-dimensional integer resource vector.
///
/// All vectors flowing through one run share the same dimensionality; mixing
/// dimensionalities is a construction-time input error, so the arithmetic
/// here only debug-asserts it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceVec(Vec<i64>);

impl ResourceVec {
    /// Creates a zero vector with the given number of dimensions.
    pub fn zeros(dims: usize) -> Self {
        Self(vec![0; dims])
    }

    /// Wraps an explicit component vector.
    pub fn from_vec(components: Vec<i64>) -> Self {
        Self(components)
    }

    /// Returns the number of resource dimensions.
    pub fn dims(&self) -> usize {
        self.0.len()
    }

    /// Returns the component for dimension `d`.
    pub fn get(&self, d: usize) -> i64 {
        self.0[d]
    }

    /// Iterates over the components in dimension order.
    pub fn iter(&self) -> impl Iterator<Item = i64> + '_ {
        self.0.iter().copied()
    }

    /// Adds `other` componentwise.
    pub fn add_assign(&mut self, other: &ResourceVec) {
        debug_assert_eq!(self.dims(), other.dims());
        for (a, b) in self.0.iter_mut().zip(other.0.iter()) {
            *a += b;
        }
    }

    /// Subtracts `other` componentwise.
    pub fn sub_assign(&mut self, other: &ResourceVec) {
        debug_assert_eq!(self.dims(), other.dims());
        for (a, b) in self.0.iter_mut().zip(other.0.iter()) {
            *a -= b;
        }
    }

    /// Returns the componentwise sum of `self` and `other`.
    pub fn plus(&self, other: &ResourceVec) -> ResourceVec {
        let mut out = self.clone();
        out.add_assign(other);
        out
    }

    /// Returns whether every component is within the given capacity.
    pub fn fits_within(&self, capacity: &ResourceVec) -> bool {
        debug_assert_eq!(self.dims(), capacity.dims());
        self.0.iter().zip(capacity.0.iter()).all(|(r, c)| r <= c)
    }

    /// Returns the dimensions in which `self` exceeds the given capacity.
    pub fn exceeded_dims(&self, capacity: &ResourceVec) -> Vec<usize> {
        debug_assert_eq!(self.dims(), capacity.dims());
        self.0
            .iter()
            .zip(capacity.0.iter())
            .enumerate()
            .filter(|(_, (r, c))| r > c)
            .map(|(d, _)| d)
            .collect()
    }

    /// Returns the maximum per-dimension utilization ratio against `capacity`.
    ///
    /// A zero-capacity dimension with nonzero demand yields `f64::INFINITY`;
    /// with zero demand it contributes 0.
    pub fn max_utilization(&self, capacity: &ResourceVec) -> f64 {
        debug_assert_eq!(self.dims(), capacity.dims());
        let mut max = 0.0_f64;
        for (&r, &c) in self.0.iter().zip(capacity.0.iter()) {
            let ratio = if c == 0 {
                if r == 0 {
                    0.0
                } else {
                    f64::INFINITY
                }
            } else {
                r as f64 / c as f64
            };
            max = max.max(ratio);
        }
        max
    }

    /// Returns the sum of all components.
    pub fn total(&self) -> i64 {
        self.0.iter().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rv(v: &[i64]) -> ResourceVec {
        ResourceVec::from_vec(v.to_vec())
    }

    #[test]
    fn zeros_has_dims() {
        let z = ResourceVec::zeros(8);
        assert_eq!(z.dims(), 8);
        assert_eq!(z.total(), 0);
    }

    #[test]
    fn add_sub_roundtrip() {
        let mut a = rv(&[1, 2, 3]);
        let b = rv(&[4, 5, 6]);
        a.add_assign(&b);
        assert_eq!(a, rv(&[5, 7, 9]));
        a.sub_assign(&b);
        assert_eq!(a, rv(&[1, 2, 3]));
    }

    #[test]
    fn fits_within_strict() {
        let cap = rv(&[10, 10]);
        assert!(rv(&[10, 10]).fits_within(&cap));
        assert!(rv(&[0, 0]).fits_within(&cap));
        assert!(!rv(&[11, 0]).fits_within(&cap));
        assert!(!rv(&[0, 11]).fits_within(&cap));
    }

    #[test]
    fn exceeded_dims_lists_violations() {
        let cap = rv(&[10, 10, 10]);
        assert_eq!(rv(&[11, 5, 12]).exceeded_dims(&cap), vec![0, 2]);
        assert!(rv(&[10, 10, 10]).exceeded_dims(&cap).is_empty());
    }

    #[test]
    fn max_utilization_picks_tightest_dimension() {
        let cap = rv(&[10, 100]);
        let used = rv(&[5, 90]);
        assert_eq!(used.max_utilization(&cap), 0.9);
    }

    #[test]
    fn max_utilization_zero_capacity() {
        let cap = rv(&[0, 10]);
        assert_eq!(rv(&[0, 5]).max_utilization(&cap), 0.5);
        assert!(rv(&[1, 5]).max_utilization(&cap).is_infinite());
    }

    #[test]
    fn plus_does_not_mutate() {
        let a = rv(&[1, 1]);
        let b = rv(&[2, 3]);
        let c = a.plus(&b);
        assert_eq!(c, rv(&[3, 4]));
        assert_eq!(a, rv(&[1, 1]));
    }

    #[test]
    fn serde_roundtrip() {
        let v = rv(&[1, 2, 3, 4]);
        let json = serde_json::to_string(&v).unwrap();
        let restored: ResourceVec = serde_json::from_str(&json).unwrap();
        assert_eq!(v, restored);
    }
}
