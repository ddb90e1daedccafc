//! In-memory read and query collections.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// Identified sequence (a read or a query).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceRecord {
    /// Identifier taken from the header line.
    pub id: Arc<str>,
    /// Raw sequence bytes.
    pub sequence: Arc<[u8]>,
}

impl SequenceRecord {
    /// Construct a new record.
    pub fn new(id: impl Into<Arc<str>>, sequence: impl Into<Arc<[u8]>>) -> Self {
        Self {
            id: id.into(),
            sequence: sequence.into(),
        }
    }

    /// Sequence length.
    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    /// Whether the sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }
}

/// Mapping from identifier to sequence that remembers insertion order.
///
/// Inserting an existing identifier replaces its sequence in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadSet {
    records: Vec<SequenceRecord>,
    positions: HashMap<Arc<str>, usize>,
}

impl ReadSet {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a record; returns the replaced sequence, if any.
    pub fn insert(
        &mut self,
        id: impl Into<Arc<str>>,
        sequence: impl Into<Arc<[u8]>>,
    ) -> Option<Arc<[u8]>> {
        let record = SequenceRecord::new(id, sequence);
        match self.positions.get(&record.id) {
            Some(&slot) => Some(std::mem::replace(
                &mut self.records[slot].sequence,
                record.sequence,
            )),
            None => {
                self.positions
                    .insert(Arc::clone(&record.id), self.records.len());
                self.records.push(record);
                None
            }
        }
    }

    /// Sequence stored under `id`.
    pub fn get(&self, id: &str) -> Option<&[u8]> {
        self.positions
            .get(id)
            .map(|&slot| self.records[slot].sequence.as_ref())
    }

    /// Records in insertion order.
    pub fn records(&self) -> &[SequenceRecord] {
        &self.records
    }

    /// Iterator over records in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &SequenceRecord> {
        self.records.iter()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Read length → number of reads with that length.
    pub fn length_distribution(&self) -> BTreeMap<usize, usize> {
        let mut histogram = BTreeMap::new();
        for record in &self.records {
            *histogram.entry(record.len()).or_insert(0) += 1;
        }
        histogram
    }

    /// Distinct sequence → number of records carrying it, most frequent first
    /// (ties broken by sequence).
    pub fn frequency_distribution(&self) -> Vec<(Arc<[u8]>, usize)> {
        let mut counts: HashMap<Arc<[u8]>, usize> = HashMap::new();
        for record in &self.records {
            *counts.entry(Arc::clone(&record.sequence)).or_insert(0) += 1;
        }
        let mut ordered: Vec<_> = counts.into_iter().collect();
        ordered.sort_by(|(lhs_seq, lhs), (rhs_seq, rhs)| {
            rhs.cmp(lhs).then_with(|| lhs_seq.cmp(rhs_seq))
        });
        ordered
    }
}

impl<I, S> FromIterator<(I, S)> for ReadSet
where
    I: Into<Arc<str>>,
    S: Into<Arc<[u8]>>,
{
    fn from_iter<T: IntoIterator<Item = (I, S)>>(iter: T) -> Self {
        let mut reads = ReadSet::new();
        for (id, sequence) in iter {
            reads.insert(id, sequence);
        }
        reads
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reinsert_replaces_in_place() {
        let mut reads = ReadSet::new();
        assert!(reads.insert("r1", b"ACGT".to_vec()).is_none());
        reads.insert("r2", b"TTTT".to_vec());
        let previous = reads.insert("r1", b"GGGG".to_vec());

        assert_eq!(previous.as_deref(), Some(&b"ACGT"[..]));
        assert_eq!(reads.len(), 2);
        assert_eq!(reads.records()[0].id.as_ref(), "r1");
        assert_eq!(reads.get("r1"), Some(&b"GGGG"[..]));
    }

    #[test]
    fn distributions_count_reads() {
        let reads: ReadSet = [
            ("a", b"ACGT".to_vec()),
            ("b", b"ACGT".to_vec()),
            ("c", b"ACG".to_vec()),
        ]
        .into_iter()
        .collect();

        let lengths = reads.length_distribution();
        assert_eq!(lengths.get(&4), Some(&2));
        assert_eq!(lengths.get(&3), Some(&1));

        let frequencies = reads.frequency_distribution();
        assert_eq!(frequencies[0].0.as_ref(), b"ACGT");
        assert_eq!(frequencies[0].1, 2);
        assert_eq!(frequencies[1].1, 1);
    }
}
