//! Exact assembly stage.
//!
//! Reads are decomposed into a k-mer occurrence table, the table induces a
//! (k−1)-mer overlap graph, and [`OverlapAssembler::longest_contig`] walks the
//! graph outward from a query's seed k-mer to the maximal unambiguous contig.

mod assembler;
mod kmer_table;
mod overlap_graph;

pub use assembler::{AssemblyError, Contig, Direction, OverlapAssembler, WalkStop};
pub use kmer_table::KmerTable;
pub use overlap_graph::{Edge, NodeId, OverlapGraph};
