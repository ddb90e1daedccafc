use std::collections::BTreeMap;

use crate::assembly::AssemblyError;
use crate::records::SequenceRecord;

/// Occurrence count of every k-mer across a read collection.
///
/// Ordered by k-mer so graph construction is deterministic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KmerTable {
    kmer_len: usize,
    counts: BTreeMap<Box<[u8]>, u64>,
}

impl KmerTable {
    /// Empty table for k-mers of length `kmer_len`.
    pub fn new(kmer_len: usize) -> Result<Self, AssemblyError> {
        if kmer_len < 2 {
            return Err(AssemblyError::InvalidParameter(format!(
                "k-mer length must be >= 2 for an overlap graph, got {kmer_len}"
            )));
        }
        Ok(Self {
            kmer_len,
            counts: BTreeMap::new(),
        })
    }

    /// Count every k-mer of every record.
    pub fn from_records(records: &[SequenceRecord], kmer_len: usize) -> Result<Self, AssemblyError> {
        let mut table = Self::new(kmer_len)?;
        for record in records {
            table.add_sequence(&record.sequence);
        }
        Ok(table)
    }

    /// Count the k-mers of one sequence; shorter sequences contribute nothing.
    pub fn add_sequence(&mut self, sequence: &[u8]) {
        if sequence.len() < self.kmer_len {
            return;
        }
        for kmer in sequence.windows(self.kmer_len) {
            match self.counts.get_mut(kmer) {
                Some(count) => *count += 1,
                None => {
                    self.counts.insert(Box::from(kmer), 1);
                }
            }
        }
    }

    /// Add the counts of `other` into `self`.
    pub fn merge(&mut self, other: Self) -> Result<(), AssemblyError> {
        if self.kmer_len != other.kmer_len {
            return Err(AssemblyError::InvalidParameter(format!(
                "cannot merge tables with k = {} and k = {}",
                self.kmer_len, other.kmer_len
            )));
        }
        for (kmer, count) in other.counts {
            *self.counts.entry(kmer).or_insert(0) += count;
        }
        Ok(())
    }

    /// Occurrences of `kmer` (zero when never seen).
    pub fn count(&self, kmer: &[u8]) -> u64 {
        self.counts.get(kmer).copied().unwrap_or(0)
    }

    /// Whether `kmer` was observed at least once.
    pub fn contains(&self, kmer: &[u8]) -> bool {
        self.counts.contains_key(kmer)
    }

    /// k-mer length.
    pub fn kmer_len(&self) -> usize {
        self.kmer_len
    }

    /// Number of distinct k-mers.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Whether no k-mer was observed.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Distinct k-mers with their counts, in lexicographic order.
    pub fn iter(&self) -> impl Iterator<Item = (&[u8], u64)> {
        self.counts.iter().map(|(kmer, &count)| (kmer.as_ref(), count))
    }
}
