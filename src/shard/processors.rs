use crate::assembly::KmerTable;
use crate::filter::{ContextIndex, FilterParams};
use crate::records::SequenceRecord;
use crate::shard::{ShardContext, ShardError, ShardProcessor};

/// Builds a private [`ContextIndex`] per shard; shards merge by per-context OR.
#[derive(Debug, Clone)]
pub struct ContextIndexing {
    /// k-mer length.
    pub kmer_len: usize,
    /// Geometry of every context filter.
    pub params: FilterParams,
    /// First seed of the hash family.
    pub base_seed: u64,
}

impl ShardProcessor for ContextIndexing {
    type Summary = ContextIndex;

    fn process_shard(
        &self,
        reads: &[SequenceRecord],
        _context: &ShardContext,
    ) -> Result<ContextIndex, ShardError> {
        let mut index = ContextIndex::with_seed(self.kmer_len, self.params, self.base_seed)?;
        index.extend_from_records(reads)?;
        Ok(index)
    }

    fn merge(&self, mut left: ContextIndex, right: ContextIndex) -> Result<ContextIndex, ShardError> {
        left.union(right)?;
        Ok(left)
    }
}

/// Counts k-mers per shard; shards merge by adding counts.
#[derive(Debug, Clone)]
pub struct KmerCounting {
    /// k-mer length.
    pub kmer_len: usize,
}

impl ShardProcessor for KmerCounting {
    type Summary = KmerTable;

    fn process_shard(
        &self,
        reads: &[SequenceRecord],
        _context: &ShardContext,
    ) -> Result<KmerTable, ShardError> {
        Ok(KmerTable::from_records(reads, self.kmer_len)?)
    }

    fn merge(&self, mut left: KmerTable, right: KmerTable) -> Result<KmerTable, ShardError> {
        left.merge(right)?;
        Ok(left)
    }
}
