//! # Context-partitioned read search with unitig assembly
//!
//! Answers "does this short query plausibly occur in a large read collection,
//! and if so, what is the longest unambiguous contig around it?"
//!
//! ## Pipeline
//!
//! 1. **Probabilistic stage**: every read is cut into `(context, k-mer)`
//!    windows; the context selects a Bloom filter, the k-mer is inserted into
//!    it. A query is "possibly present" only if every one of its windows hits
//!    an existing context and passes that context's filter.
//! 2. **Exact stage**: on a positive answer, the query's first k-mer seeds a
//!    walk through the (k−1)-mer overlap graph of the same reads, extending
//!    left and right while the path stays unambiguous.
//!
//! ## Usage Example
//!
//! ```
//! use contig_probe::{ProbeConfig, ProbePipeline, ReadSet};
//!
//! let reads: ReadSet = [("r1", b"AACCGGTT".to_vec())].into_iter().collect();
//! let pipeline = ProbePipeline::build(&reads, ProbeConfig::new(3)).unwrap();
//! let report = pipeline.query("q1", b"AACCGGTT").unwrap();
//! assert!(report.possibly_present);
//! ```

#![warn(missing_docs, missing_debug_implementations)]

pub mod assembly; // Overlap graph and contig walks
pub mod filter; // Bloom filters and the context index
pub mod io; // Record loader
pub mod records; // Read collections
pub mod report; // Tab-separated report rendering
pub mod shard; // Sharded build with associative merges

// Re-exports for convenience
pub use assembly::{
    AssemblyError, Contig, Direction, KmerTable, OverlapAssembler, OverlapGraph, WalkStop,
};
pub use filter::{
    hash_count_for, size_for_target, ContextIndex, FilterError, FilterParams, HashFamily,
    Membership, ProbabilisticSet,
};
pub use records::{ReadSet, SequenceRecord};

use std::sync::Arc;

use shard::{ContextIndexing, KmerCounting, ShardError, ShardPlan, ShardedReducer};
use thiserror::Error;
use tracing::{debug, info};

/// Parameters for building and querying a [`ProbePipeline`].
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeConfig {
    /// k-mer length used by both stages.
    pub kmer_len: usize,

    /// Target false-positive rate of each context filter.
    pub false_positive_rate: f64,

    /// Expected k-mers per context, used to size each context filter.
    pub kmers_per_context: usize,

    /// First seed of the hash family.
    pub hash_seed: u64,

    /// Optional cap on bases appended per walk direction.
    pub max_walk_steps: Option<usize>,

    /// Reads per build shard; `None` selects ⌈√reads⌉.
    pub shard_size: Option<usize>,

    /// Reduce shards with rayon instead of on the calling thread.
    pub parallel: bool,
}

impl ProbeConfig {
    /// Defaults for k-mer length `kmer_len`: 1% per-filter false-positive
    /// rate sized for 16 k-mers per context, seed 0, no step cap.
    pub fn new(kmer_len: usize) -> Self {
        Self {
            kmer_len,
            false_positive_rate: 0.01,
            kmers_per_context: 16,
            hash_seed: 0,
            max_walk_steps: None,
            shard_size: None,
            parallel: false,
        }
    }

    /// Set the per-filter false-positive target.
    pub fn with_false_positive_rate(mut self, rate: f64) -> Self {
        self.false_positive_rate = rate;
        self
    }

    /// Set the expected number of k-mers per context.
    pub fn with_kmers_per_context(mut self, items: usize) -> Self {
        self.kmers_per_context = items;
        self
    }

    /// Set the first seed of the hash family.
    pub fn with_hash_seed(mut self, seed: u64) -> Self {
        self.hash_seed = seed;
        self
    }

    /// Cap each walk direction at `steps` appended bases.
    pub fn with_max_walk_steps(mut self, steps: usize) -> Self {
        self.max_walk_steps = Some(steps);
        self
    }

    /// Use a fixed shard size for the build.
    pub fn with_shard_size(mut self, reads: usize) -> Self {
        self.shard_size = Some(reads);
        self
    }

    /// Enable parallel shard reduction.
    pub fn with_parallel(mut self, enabled: bool) -> Self {
        self.parallel = enabled;
        self
    }

    /// Fail fast on parameters no stage can use.
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.kmer_len < 2 {
            return Err(PipelineError::InvalidParameter(format!(
                "k-mer length must be >= 2, got {}",
                self.kmer_len
            )));
        }
        if self.max_walk_steps == Some(0) {
            return Err(PipelineError::InvalidParameter(
                "walk step cap must be > 0".to_string(),
            ));
        }
        if self.shard_size == Some(0) {
            return Err(PipelineError::InvalidParameter(
                "shard size must be > 0".to_string(),
            ));
        }
        self.filter_params()?;
        Ok(())
    }

    /// Context filter geometry derived from the sizing formulas.
    pub fn filter_params(&self) -> Result<FilterParams, PipelineError> {
        Ok(FilterParams::for_target(
            self.kmers_per_context,
            self.false_positive_rate,
        )?)
    }

    fn shard_plan(&self, total_reads: usize) -> Result<ShardPlan, ShardError> {
        match self.shard_size {
            Some(size) => ShardPlan::with_shard_size(total_reads, size),
            None => Ok(ShardPlan::optimal_for_reads(total_reads)),
        }
    }
}

/// Errors that abort pipeline construction or a query.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Configuration rejected before any work was done.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Error from the probabilistic stage.
    #[error(transparent)]
    Filter(#[from] FilterError),

    /// Error from the exact stage.
    #[error(transparent)]
    Assembly(#[from] AssemblyError),

    /// Error from the sharded build.
    #[error(transparent)]
    Shard(#[from] ShardError),
}

/// Why a positive query did not yield a contig.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub enum Inconclusive {
    /// The seed k-mer is absent from the reads (a filter false positive).
    SeedAbsent,
    /// The walk revisited a node or hit the step cap.
    CycleDetected {
        /// Direction of the aborted walk.
        direction: Direction,
        /// Bases appended before the guard fired.
        steps: usize,
    },
}

/// Assembly outcome for a possibly-present query.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub enum AssemblyStatus {
    /// Contig assembled around the seed.
    Assembled(Contig),
    /// Assembly could not complete.
    Inconclusive(Inconclusive),
}

/// Per-query result.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub struct QueryReport {
    /// Query identifier.
    pub id: Arc<str>,
    /// Answer of the probabilistic stage.
    pub possibly_present: bool,
    /// Membership detail from the context index.
    pub membership: Membership,
    /// Present only when `possibly_present` is true.
    pub assembly: Option<AssemblyStatus>,
}

impl QueryReport {
    /// Assembled contig, if any.
    pub fn contig(&self) -> Option<&Contig> {
        match &self.assembly {
            Some(AssemblyStatus::Assembled(contig)) => Some(contig),
            _ => None,
        }
    }
}

/// Context index and overlap assembler built once from the same reads.
#[derive(Debug)]
pub struct ProbePipeline {
    config: ProbeConfig,
    index: ContextIndex,
    assembler: OverlapAssembler,
}

impl ProbePipeline {
    /// Build both stages from `reads`.
    pub fn build(reads: &ReadSet, config: ProbeConfig) -> Result<Self, PipelineError> {
        config.validate()?;
        let params = config.filter_params()?;
        let records = reads.records();
        let plan = config.shard_plan(records.len())?;

        let indexing = ShardedReducer::new(
            ContextIndexing {
                kmer_len: config.kmer_len,
                params,
                base_seed: config.hash_seed,
            },
            plan.clone(),
        );
        let counting = ShardedReducer::new(
            KmerCounting {
                kmer_len: config.kmer_len,
            },
            plan,
        );

        let (index, table) = if config.parallel {
            rayon::join(
                || indexing.reduce_parallel(records),
                || counting.reduce_parallel(records),
            )
        } else {
            (indexing.reduce(records), counting.reduce(records))
        };
        let index = index?;

        let mut assembler = OverlapAssembler::from_table(table?);
        if let Some(steps) = config.max_walk_steps {
            assembler = assembler.with_max_walk_steps(steps)?;
        }

        info!(
            reads = records.len(),
            shards = indexing.plan().num_shards,
            contexts = index.len(),
            array_size = params.array_size,
            hash_count = params.hash_count,
            "context index built"
        );

        Ok(Self {
            config,
            index,
            assembler,
        })
    }

    /// Test `query` against the index and, on a hit, assemble its contig.
    ///
    /// Absent seeds and cycles become [`AssemblyStatus::Inconclusive`]; only a
    /// query shorter than k is an error.
    pub fn query(&self, id: impl Into<Arc<str>>, query: &[u8]) -> Result<QueryReport, PipelineError> {
        let id = id.into();
        let membership = self.index.probe(query)?;
        let possibly_present = membership.is_present();
        debug!(%id, ?membership, "query probed");

        let assembly = if possibly_present {
            Some(match self.assembler.longest_contig(query) {
                Ok(contig) => AssemblyStatus::Assembled(contig),
                Err(AssemblyError::QueryNotIndexed) => {
                    AssemblyStatus::Inconclusive(Inconclusive::SeedAbsent)
                }
                Err(AssemblyError::CycleDetected { direction, steps }) => {
                    AssemblyStatus::Inconclusive(Inconclusive::CycleDetected { direction, steps })
                }
                Err(err) => return Err(err.into()),
            })
        } else {
            None
        };

        Ok(QueryReport {
            id,
            possibly_present,
            membership,
            assembly,
        })
    }

    /// Run every query in `queries`, in insertion order.
    pub fn query_all(&self, queries: &ReadSet) -> Result<Vec<QueryReport>, PipelineError> {
        queries
            .iter()
            .map(|record| self.query(Arc::clone(&record.id), &record.sequence))
            .collect()
    }

    /// Configuration used to build the pipeline.
    pub fn config(&self) -> &ProbeConfig {
        &self.config
    }

    /// Probabilistic stage.
    pub fn index(&self) -> &ContextIndex {
        &self.index
    }

    /// Exact stage.
    pub fn assembler(&self) -> &OverlapAssembler {
        &self.assembler
    }
}
