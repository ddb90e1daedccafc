use bitvec::prelude::*;
use thiserror::Error;

use crate::filter::{Blake3Mixer, FilterParams, HashFamily, SeedMixer};

/// Errors raised by the probabilistic set and the context index.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FilterError {
    /// Non-positive array size, hash count, k, or an out-of-range rate.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Input shorter than the k-mer length.
    #[error("sequence of length {len} is shorter than k = {k}")]
    SequenceTooShort {
        /// Length of the offending sequence.
        len: usize,
        /// Configured k-mer length.
        k: usize,
    },

    /// Union attempted between filters with different geometry or hash family.
    #[error("cannot combine filters: {0}")]
    IncompatibleFilters(String),
}

/// Bloom filter over byte strings.
///
/// Bits only ever go from clear to set; there is no removal.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbabilisticSet<M: SeedMixer = Blake3Mixer> {
    bits: BitVec,
    family: HashFamily<M>,
}

impl ProbabilisticSet<Blake3Mixer> {
    /// Empty set of `array_size` bits tested by `hash_count` BLAKE3-seeded functions.
    pub fn new(array_size: usize, hash_count: usize) -> Result<Self, FilterError> {
        let params = FilterParams::new(array_size, hash_count)?;
        Self::with_family(params.array_size, HashFamily::new(params.hash_count))
    }

    /// Empty set sized for `items` insertions at `false_positive_rate`.
    pub fn for_target(items: usize, false_positive_rate: f64) -> Result<Self, FilterError> {
        let params = FilterParams::for_target(items, false_positive_rate)?;
        Self::new(params.array_size, params.hash_count)
    }
}

impl<M: SeedMixer> ProbabilisticSet<M> {
    /// Empty set using an explicit hash family.
    pub fn with_family(array_size: usize, family: HashFamily<M>) -> Result<Self, FilterError> {
        FilterParams::new(array_size, family.len())?;
        Ok(Self::empty(array_size, family))
    }

    /// Caller guarantees `array_size > 0` and a non-empty family.
    pub(crate) fn empty(array_size: usize, family: HashFamily<M>) -> Self {
        Self {
            bits: bitvec![0; array_size],
            family,
        }
    }

    /// Set the bit selected by every member of the hash family.
    pub fn add(&mut self, item: &[u8]) {
        let array_size = self.bits.len();
        for idx in self.family.indices(item, array_size) {
            self.bits.set(idx, true);
        }
    }

    /// `true` iff every selected bit is set. Never false for an added item.
    pub fn check(&self, item: &[u8]) -> bool {
        self.family
            .indices(item, self.bits.len())
            .all(|idx| self.bits[idx])
    }

    /// Bitwise OR of `other` into `self`.
    pub fn union(&mut self, other: &Self) -> Result<(), FilterError> {
        if self.bits.len() != other.bits.len() {
            return Err(FilterError::IncompatibleFilters(format!(
                "array sizes differ ({} vs {})",
                self.bits.len(),
                other.bits.len()
            )));
        }
        if self.family != other.family {
            return Err(FilterError::IncompatibleFilters(
                "hash families differ".to_string(),
            ));
        }
        for (dst, src) in self
            .bits
            .as_raw_mut_slice()
            .iter_mut()
            .zip(other.bits.as_raw_slice())
        {
            *dst |= *src;
        }
        Ok(())
    }

    /// Number of bits `m`.
    pub fn array_size(&self) -> usize {
        self.bits.len()
    }

    /// Number of hash functions `k`.
    pub fn hash_count(&self) -> usize {
        self.family.len()
    }

    /// Hash family used for indexing.
    pub fn family(&self) -> &HashFamily<M> {
        &self.family
    }

    /// Number of set bits.
    pub fn ones(&self) -> usize {
        self.bits.count_ones()
    }

    /// Fraction of bits set.
    pub fn fill_ratio(&self) -> f64 {
        self.ones() as f64 / self.bits.len() as f64
    }

    /// False-positive rate implied by the current fill: `fill^k`.
    pub fn estimated_false_positive_rate(&self) -> f64 {
        self.fill_ratio().powi(self.hash_count() as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognises_added_items() {
        let mut set = ProbabilisticSet::new(959, 7).unwrap();
        set.add(b"SEQUENCE");
        set.add(b"7712");
        set.add(b"DAY3");

        assert!(set.check(b"SEQUENCE"));
        assert!(set.check(b"7712"));
        assert!(set.check(b"DAY3"));
    }

    #[test]
    fn empty_set_rejects_everything() {
        let set = ProbabilisticSet::new(64, 3).unwrap();
        assert!(!set.check(b"ACGT"));
        assert_eq!(set.ones(), 0);
        assert_eq!(set.estimated_false_positive_rate(), 0.0);
    }

    #[test]
    fn zero_parameters_are_rejected() {
        assert!(matches!(
            ProbabilisticSet::new(0, 3),
            Err(FilterError::InvalidParameter(_))
        ));
        assert!(matches!(
            ProbabilisticSet::new(16, 0),
            Err(FilterError::InvalidParameter(_))
        ));
    }

    #[test]
    fn adding_twice_changes_nothing() {
        let mut set = ProbabilisticSet::new(128, 4).unwrap();
        set.add(b"ACGT");
        let snapshot = set.clone();
        set.add(b"ACGT");
        assert_eq!(set, snapshot);
    }

    #[test]
    fn union_matches_joint_insertion() {
        let mut left = ProbabilisticSet::new(256, 5).unwrap();
        let mut right = ProbabilisticSet::new(256, 5).unwrap();
        let mut joint = ProbabilisticSet::new(256, 5).unwrap();
        for item in [&b"AAA"[..], b"CCC"] {
            left.add(item);
            joint.add(item);
        }
        for item in [&b"GGG"[..], b"TTT"] {
            right.add(item);
            joint.add(item);
        }
        left.union(&right).unwrap();
        assert_eq!(left, joint);
    }

    #[test]
    fn union_rejects_mismatched_geometry() {
        let mut left = ProbabilisticSet::new(256, 5).unwrap();
        let right = ProbabilisticSet::new(128, 5).unwrap();
        assert!(matches!(
            left.union(&right),
            Err(FilterError::IncompatibleFilters(_))
        ));

        let seeded = ProbabilisticSet::with_family(256, HashFamily::with_base_seed(9, 5)).unwrap();
        assert!(left.union(&seeded).is_err());
    }
}
