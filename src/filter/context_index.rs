use std::collections::HashMap;

use tracing::warn;

use crate::filter::{Blake3Mixer, FilterError, FilterParams, HashFamily, ProbabilisticSet, SeedMixer};
use crate::records::SequenceRecord;

/// Outcome of probing a query against a [`ContextIndex`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub enum Membership {
    /// Every window matched its context filter.
    Present,
    /// No filter exists for the context of the window at `position`.
    ContextAbsent {
        /// Window start within the query.
        position: usize,
    },
    /// The context exists but its filter rejected the k-mer at `position`.
    KmerAbsent {
        /// Window start within the query.
        position: usize,
    },
}

impl Membership {
    /// Whether the query is possibly present.
    pub fn is_present(&self) -> bool {
        matches!(self, Membership::Present)
    }
}

/// One `(context, k-mer)` pair obtained by cutting a window out of a sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Window<'a> {
    /// Start of the window.
    pub position: usize,
    /// Bytes outside the window: `seq[..position] ++ seq[position + k..]`.
    pub context: Vec<u8>,
    /// Bytes inside the window.
    pub kmer: &'a [u8],
}

/// Every full window of length `k` in `sequence`, left to right.
pub fn windows(sequence: &[u8], k: usize) -> impl Iterator<Item = Window<'_>> {
    let count = if k == 0 || sequence.len() < k {
        0
    } else {
        sequence.len() - k + 1
    };
    (0..count).map(move |position| {
        let mut context = Vec::with_capacity(sequence.len() - k);
        context.extend_from_slice(&sequence[..position]);
        context.extend_from_slice(&sequence[position + k..]);
        Window {
            position,
            context,
            kmer: &sequence[position..position + k],
        }
    })
}

/// Two-level membership index: exact routing on the context key, then a
/// per-context [`ProbabilisticSet`] test of the k-mer.
///
/// Context entries are created on first insertion and never removed.
#[derive(Debug, Clone, PartialEq)]
pub struct ContextIndex<M: SeedMixer = Blake3Mixer> {
    kmer_len: usize,
    params: FilterParams,
    family: HashFamily<M>,
    contexts: HashMap<Box<[u8]>, ProbabilisticSet<M>>,
}

impl ContextIndex<Blake3Mixer> {
    /// Empty index with BLAKE3 seeds `0..params.hash_count`.
    pub fn new(kmer_len: usize, params: FilterParams) -> Result<Self, FilterError> {
        Self::with_seed(kmer_len, params, 0)
    }

    /// Empty index with BLAKE3 seeds starting at `base_seed`.
    pub fn with_seed(
        kmer_len: usize,
        params: FilterParams,
        base_seed: u64,
    ) -> Result<Self, FilterError> {
        let family = HashFamily::with_base_seed(base_seed, params.hash_count);
        Self::with_family(kmer_len, params.array_size, family)
    }
}

impl<M: SeedMixer> ContextIndex<M> {
    /// Empty index whose context filters use `family`.
    pub fn with_family(
        kmer_len: usize,
        array_size: usize,
        family: HashFamily<M>,
    ) -> Result<Self, FilterError> {
        if kmer_len == 0 {
            return Err(FilterError::InvalidParameter(
                "k-mer length must be > 0".to_string(),
            ));
        }
        let params = FilterParams::new(array_size, family.len())?;
        Ok(Self {
            kmer_len,
            params,
            family,
            contexts: HashMap::new(),
        })
    }

    /// Insert every `(context, k-mer)` window of `sequence`.
    pub fn add(&mut self, sequence: &[u8]) -> Result<(), FilterError> {
        self.require_len(sequence)?;
        for window in windows(sequence, self.kmer_len) {
            let array_size = self.params.array_size;
            let family = &self.family;
            self.contexts
                .entry(window.context.into_boxed_slice())
                .or_insert_with(|| ProbabilisticSet::empty(array_size, family.clone()))
                .add(window.kmer);
        }
        Ok(())
    }

    /// Insert every record, skipping (and counting) sequences shorter than k.
    pub fn extend_from_records(&mut self, records: &[SequenceRecord]) -> Result<usize, FilterError> {
        let mut skipped = 0;
        for record in records {
            if record.len() < self.kmer_len {
                warn!(
                    id = %record.id,
                    len = record.len(),
                    k = self.kmer_len,
                    "skipping read shorter than k"
                );
                skipped += 1;
                continue;
            }
            self.add(&record.sequence)?;
        }
        Ok(skipped)
    }

    /// Probe `query` window by window, stopping at the first rejection.
    pub fn probe(&self, query: &[u8]) -> Result<Membership, FilterError> {
        self.require_len(query)?;
        for window in windows(query, self.kmer_len) {
            let Some(filter) = self.contexts.get(window.context.as_slice()) else {
                return Ok(Membership::ContextAbsent {
                    position: window.position,
                });
            };
            if !filter.check(window.kmer) {
                return Ok(Membership::KmerAbsent {
                    position: window.position,
                });
            }
        }
        Ok(Membership::Present)
    }

    /// `true` iff every window of `query` passes both the context lookup and
    /// its filter.
    pub fn check(&self, query: &[u8]) -> Result<bool, FilterError> {
        self.probe(query).map(|membership| membership.is_present())
    }

    /// Merge `other` into `self`: shared contexts OR their bits, new contexts are adopted.
    pub fn union(&mut self, other: Self) -> Result<(), FilterError> {
        if self.kmer_len != other.kmer_len {
            return Err(FilterError::IncompatibleFilters(format!(
                "k-mer lengths differ ({} vs {})",
                self.kmer_len, other.kmer_len
            )));
        }
        if self.params != other.params || self.family != other.family {
            return Err(FilterError::IncompatibleFilters(
                "context filters use different parameters".to_string(),
            ));
        }
        for (context, filter) in other.contexts {
            match self.contexts.get_mut(&context) {
                Some(existing) => existing.union(&filter)?,
                None => {
                    self.contexts.insert(context, filter);
                }
            }
        }
        Ok(())
    }

    /// k-mer length.
    pub fn kmer_len(&self) -> usize {
        self.kmer_len
    }

    /// Geometry of every context filter.
    pub fn params(&self) -> FilterParams {
        self.params
    }

    /// Number of distinct contexts.
    pub fn len(&self) -> usize {
        self.contexts.len()
    }

    /// Whether nothing has been inserted.
    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty()
    }

    /// Whether a filter exists for `context`.
    pub fn contains_context(&self, context: &[u8]) -> bool {
        self.contexts.contains_key(context)
    }

    /// Filter for `context`, if any.
    pub fn filter(&self, context: &[u8]) -> Option<&ProbabilisticSet<M>> {
        self.contexts.get(context)
    }

    fn require_len(&self, sequence: &[u8]) -> Result<(), FilterError> {
        if sequence.len() < self.kmer_len {
            return Err(FilterError::SequenceTooShort {
                len: sequence.len(),
                k: self.kmer_len,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index(k: usize) -> ContextIndex {
        ContextIndex::new(k, FilterParams::new(20, 2).unwrap()).unwrap()
    }

    #[test]
    fn windows_cut_out_each_kmer() {
        let observed: Vec<(Vec<u8>, &[u8])> = windows(b"ACTGCTA", 3)
            .map(|window| (window.context, window.kmer))
            .collect();
        let expected: Vec<(Vec<u8>, &[u8])> = vec![
            (b"GCTA".to_vec(), &b"ACT"[..]),
            (b"ACTA".to_vec(), &b"CTG"[..]),
            (b"ACTA".to_vec(), &b"TGC"[..]),
            (b"ACTA".to_vec(), &b"GCT"[..]),
            (b"ACTG".to_vec(), &b"CTA"[..]),
        ];
        assert_eq!(observed, expected);
    }

    #[test]
    fn short_sequences_have_no_windows() {
        assert_eq!(windows(b"AC", 3).count(), 0);
        assert_eq!(windows(b"ACG", 0).count(), 0);
        assert_eq!(windows(b"ACG", 3).count(), 1);
    }

    #[test]
    fn added_sequence_is_found() {
        let mut idx = index(3);
        idx.add(b"ACTGC").unwrap();
        assert!(idx.check(b"ACTGC").unwrap());
        // windows at 1 and 2 share the context "AC"
        assert_eq!(idx.len(), 2);
        assert!(idx.contains_context(b"GC"));
        assert!(idx.contains_context(b"AC"));
    }

    #[test]
    fn unknown_context_is_rejected_exactly() {
        let mut idx = index(3);
        idx.add(b"ACTGC").unwrap();
        assert!(!idx.check(b"JADE").unwrap());
        assert_eq!(
            idx.probe(b"JADE").unwrap(),
            Membership::ContextAbsent { position: 0 }
        );
    }

    #[test]
    fn short_query_is_an_error() {
        let mut idx = index(3);
        idx.add(b"ACTGC").unwrap();
        assert_eq!(
            idx.check(b"AC"),
            Err(FilterError::SequenceTooShort { len: 2, k: 3 })
        );
        assert!(idx.add(b"AC").is_err());
    }

    #[test]
    fn zero_k_is_invalid() {
        assert!(matches!(
            ContextIndex::new(0, FilterParams::new(20, 2).unwrap()),
            Err(FilterError::InvalidParameter(_))
        ));
    }

    #[test]
    fn repeated_add_is_idempotent() {
        let mut idx = index(3);
        idx.add(b"ACTGC").unwrap();
        let snapshot = idx.clone();
        idx.add(b"ACTGC").unwrap();
        assert_eq!(idx, snapshot);
    }

    #[test]
    fn union_equals_joint_build() {
        let mut left = index(3);
        let mut right = index(3);
        let mut joint = index(3);
        left.add(b"ACGTTA").unwrap();
        right.add(b"GGATCC").unwrap();
        right.add(b"ACGTTA").unwrap();
        for seq in [&b"ACGTTA"[..], b"GGATCC"] {
            joint.add(seq).unwrap();
        }
        left.union(right).unwrap();
        assert_eq!(left, joint);
    }

    #[test]
    fn union_rejects_other_k() {
        let mut left = index(3);
        let right = index(4);
        assert!(matches!(
            left.union(right),
            Err(FilterError::IncompatibleFilters(_))
        ));
    }
}
