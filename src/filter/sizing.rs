//! Closed-form Bloom filter sizing.
//!
//! m = ⌈−n·ln(p) / (ln 2)²⌉ and k = ⌈(m/n)·ln 2⌉

use std::f64::consts::LN_2;

use crate::filter::FilterError;

/// Array size and hash count for one [`ProbabilisticSet`](crate::filter::ProbabilisticSet).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub struct FilterParams {
    /// Number of bits `m`.
    pub array_size: usize,
    /// Number of hash functions `k`.
    pub hash_count: usize,
}

impl FilterParams {
    /// Explicit parameters; both must be positive.
    pub fn new(array_size: usize, hash_count: usize) -> Result<Self, FilterError> {
        if array_size == 0 {
            return Err(FilterError::InvalidParameter(
                "array size must be > 0".to_string(),
            ));
        }
        if hash_count == 0 {
            return Err(FilterError::InvalidParameter(
                "hash count must be > 0".to_string(),
            ));
        }
        Ok(Self {
            array_size,
            hash_count,
        })
    }

    /// Optimal parameters for `items` insertions at target rate `false_positive_rate`.
    pub fn for_target(items: usize, false_positive_rate: f64) -> Result<Self, FilterError> {
        let array_size = size_for_target(items, false_positive_rate)?;
        let hash_count = hash_count_for(items, array_size)?;
        Self::new(array_size, hash_count)
    }

    /// Predicted false-positive rate after `items` insertions.
    pub fn expected_false_positive_rate(&self, items: usize) -> f64 {
        expected_false_positive_rate(items, self.array_size, self.hash_count)
    }
}

/// Minimal array size achieving false-positive rate `p` for `n` items.
pub fn size_for_target(n: usize, p: f64) -> Result<usize, FilterError> {
    if n == 0 {
        return Err(FilterError::InvalidParameter(
            "item count must be > 0".to_string(),
        ));
    }
    if !(p > 0.0 && p < 1.0) {
        return Err(FilterError::InvalidParameter(format!(
            "false-positive rate must lie in (0, 1), got {p}"
        )));
    }
    let m = (-(n as f64) * p.ln()) / (LN_2 * LN_2);
    Ok(m.ceil() as usize)
}

/// Hash count minimising false positives for `n` items in `m` bits.
pub fn hash_count_for(n: usize, m: usize) -> Result<usize, FilterError> {
    if n == 0 {
        return Err(FilterError::InvalidParameter(
            "item count must be > 0".to_string(),
        ));
    }
    if m == 0 {
        return Err(FilterError::InvalidParameter(
            "array size must be > 0".to_string(),
        ));
    }
    let k = (m as f64 / n as f64) * LN_2;
    Ok((k.ceil() as usize).max(1))
}

/// (1 − e^(−k·n/m))^k
pub fn expected_false_positive_rate(n: usize, m: usize, k: usize) -> f64 {
    if m == 0 {
        return 1.0;
    }
    let exponent = -(k as f64) * (n as f64) / (m as f64);
    (1.0 - exponent.exp()).powi(k as i32)
}
