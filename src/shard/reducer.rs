use std::ops::Range;

use thiserror::Error;
use tracing::debug;

use crate::assembly::AssemblyError;
use crate::filter::FilterError;
use crate::records::SequenceRecord;
use crate::shard::ShardSpan;

/// Errors raised while building summaries shard by shard.
#[derive(Debug, Error)]
pub enum ShardError {
    /// Plan invalid (e.g., zero shard size).
    #[error("invalid shard plan: {0}")]
    InvalidConfiguration(String),

    /// Requested shard id is outside the plan.
    #[error("shard id {shard_id} out of range (max {max_shards})")]
    ShardOutOfRange {
        /// Shard identifier (1-indexed) that was requested.
        shard_id: usize,
        /// Largest valid shard identifier.
        max_shards: usize,
    },

    /// Failure building or merging a context index shard.
    #[error("filter error: {0}")]
    Filter(#[from] FilterError),

    /// Failure building or merging a k-mer table shard.
    #[error("assembly error: {0}")]
    Assembly(#[from] AssemblyError),
}

/// Partition of a read collection into contiguous shards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShardPlan {
    /// Reads per shard.
    pub shard_size: usize,
    /// Number of shards `⌈reads / shard_size⌉` (at least one).
    pub num_shards: usize,
    /// Total number of reads.
    pub total_reads: usize,
}

impl ShardPlan {
    /// Plan with `shard_size = ⌈√reads⌉`.
    pub fn optimal_for_reads(total_reads: usize) -> Self {
        let shard_size = ((total_reads as f64).sqrt().ceil() as usize).max(1);
        Self {
            shard_size,
            num_shards: shard_count(total_reads, shard_size),
            total_reads,
        }
    }

    /// Plan with an explicit shard size.
    pub fn with_shard_size(total_reads: usize, shard_size: usize) -> Result<Self, ShardError> {
        if shard_size == 0 {
            return Err(ShardError::InvalidConfiguration(
                "shard size must be > 0".to_string(),
            ));
        }
        Ok(Self {
            shard_size,
            num_shards: shard_count(total_reads, shard_size),
            total_reads,
        })
    }

    /// Read range owned by shard `shard_id` (1-indexed).
    pub fn shard_context(&self, shard_id: usize) -> Result<ShardContext, ShardError> {
        if shard_id == 0 || shard_id > self.num_shards {
            return Err(ShardError::ShardOutOfRange {
                shard_id,
                max_shards: self.num_shards,
            });
        }
        let start = ((shard_id - 1) * self.shard_size).min(self.total_reads);
        let end = (start + self.shard_size).min(self.total_reads);
        Ok(ShardContext {
            shard_id,
            range: start..end,
        })
    }

    /// Root of the merge tree.
    pub fn root(&self) -> ShardSpan {
        ShardSpan::new(1, self.num_shards)
    }
}

fn shard_count(total_reads: usize, shard_size: usize) -> usize {
    ((total_reads + shard_size - 1) / shard_size).max(1)
}

/// Per-shard metadata supplied to processors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShardContext {
    /// 1-indexed shard identifier.
    pub shard_id: usize,
    /// Range of reads covered by the shard.
    pub range: Range<usize>,
}

impl ShardContext {
    /// Number of reads in the shard.
    pub fn len(&self) -> usize {
        self.range.end.saturating_sub(self.range.start)
    }

    /// Whether the shard holds no reads (only for an empty collection).
    pub fn is_empty(&self) -> bool {
        self.range.end <= self.range.start
    }
}

/// Builds a private summary per shard and combines summaries.
///
/// `merge` must be associative and commutative so that any reduction order
/// yields the sequential result.
pub trait ShardProcessor: Sync {
    /// Summary built from one shard.
    type Summary: Send;

    /// Summarise the reads of a single shard.
    fn process_shard(
        &self,
        reads: &[SequenceRecord],
        context: &ShardContext,
    ) -> Result<Self::Summary, ShardError>;

    /// Combine two summaries.
    fn merge(
        &self,
        left: Self::Summary,
        right: Self::Summary,
    ) -> Result<Self::Summary, ShardError>;
}

/// Reduces shard summaries over the midpoint-split merge tree.
#[derive(Debug)]
pub struct ShardedReducer<P: ShardProcessor> {
    processor: P,
    plan: ShardPlan,
}

impl<P: ShardProcessor> ShardedReducer<P> {
    /// Create a reducer for `processor` under `plan`.
    pub fn new(processor: P, plan: ShardPlan) -> Self {
        Self { processor, plan }
    }

    /// Shard plan.
    pub fn plan(&self) -> &ShardPlan {
        &self.plan
    }

    /// Reduce on the calling thread, depth first.
    pub fn reduce(&self, reads: &[SequenceRecord]) -> Result<P::Summary, ShardError> {
        self.check_len(reads)?;
        self.reduce_span(self.plan.root(), reads, false)
    }

    /// Reduce with sibling spans evaluated through `rayon::join`.
    pub fn reduce_parallel(&self, reads: &[SequenceRecord]) -> Result<P::Summary, ShardError> {
        self.check_len(reads)?;
        self.reduce_span(self.plan.root(), reads, true)
    }

    fn check_len(&self, reads: &[SequenceRecord]) -> Result<(), ShardError> {
        if reads.len() != self.plan.total_reads {
            return Err(ShardError::InvalidConfiguration(format!(
                "plan covers {} reads but {} were supplied",
                self.plan.total_reads,
                reads.len()
            )));
        }
        Ok(())
    }

    fn reduce_span(
        &self,
        span: ShardSpan,
        reads: &[SequenceRecord],
        parallel: bool,
    ) -> Result<P::Summary, ShardError> {
        if span.is_leaf() {
            let context = self.plan.shard_context(span.shard_id())?;
            debug!(shard = context.shard_id, reads = context.len(), "processing shard");
            return self
                .processor
                .process_shard(&reads[context.range.clone()], &context);
        }

        let (left_span, right_span) = span.children();
        let (left, right) = if parallel {
            rayon::join(
                || self.reduce_span(left_span, reads, parallel),
                || self.reduce_span(right_span, reads, parallel),
            )
        } else {
            (
                self.reduce_span(left_span, reads, parallel),
                self.reduce_span(right_span, reads, parallel),
            )
        };
        self.processor.merge(left?, right?)
    }
}
