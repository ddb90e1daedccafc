//! Sharded construction of the read-derived structures.
//!
//! The read collection is cut into contiguous shards, each shard builds a
//! private summary, and summaries are merged pairwise up a midpoint-split
//! tree. Bit arrays merge by OR and k-mer counts by addition, so the result
//! equals a single sequential pass regardless of evaluation order.

mod processors;
mod reducer;
mod span;

pub use processors::{ContextIndexing, KmerCounting};
pub use reducer::{ShardContext, ShardError, ShardPlan, ShardProcessor, ShardedReducer};
pub use span::ShardSpan;
