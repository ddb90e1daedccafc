use std::collections::HashSet;
use std::fmt;

use thiserror::Error;
use tracing::{debug, info};

use crate::assembly::{KmerTable, NodeId, OverlapGraph};
use crate::records::{ReadSet, SequenceRecord};

/// Errors surfaced by contig assembly.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AssemblyError {
    /// k-mer length unusable for an overlap graph, or a zero step cap.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Query shorter than the k-mer length.
    #[error("sequence of length {len} is shorter than k = {k}")]
    SequenceTooShort {
        /// Length of the query.
        len: usize,
        /// Configured k-mer length.
        k: usize,
    },

    /// The query's seed k-mer never occurs in the reads.
    #[error("seed k-mer is not present in the overlap graph")]
    QueryNotIndexed,

    /// An unambiguous walk revisited a node or exceeded the step cap.
    #[error("{direction} walk stopped after {steps} steps: cycle detected")]
    CycleDetected {
        /// Side of the seed being extended.
        direction: Direction,
        /// Bases appended before termination.
        steps: usize,
    },
}

/// Side of the seed a walk extends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub enum Direction {
    /// Following successors (extends to the right).
    Forward,
    /// Following predecessors (extends to the left).
    Backward,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Forward => write!(f, "forward"),
            Direction::Backward => write!(f, "backward"),
        }
    }
}

/// Why an unambiguous walk ended without a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub enum WalkStop {
    /// More than one distinct neighbour.
    Branch,
    /// No neighbour at all.
    DeadEnd,
}

/// Maximal unambiguous sequence around a seed k-mer.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub struct Contig {
    /// Assembled bases.
    pub sequence: Vec<u8>,
    /// Offset of the seed k-mer within `sequence`.
    pub seed_offset: usize,
    /// Bases prepended by the backward walk.
    pub left_extension: usize,
    /// Bases appended by the forward walk.
    pub right_extension: usize,
    /// Termination of the backward walk.
    pub left_stop: WalkStop,
    /// Termination of the forward walk.
    pub right_stop: WalkStop,
}

impl Contig {
    /// Contig length.
    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    /// Whether the contig is empty (never true for an assembled contig).
    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }
}

impl fmt::Display for Contig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.sequence))
    }
}

#[derive(Debug)]
struct Walk {
    bases: Vec<u8>,
    stop: WalkStop,
}

/// Builds the k-mer table and overlap graph once, then extends queries into
/// unitigs.
#[derive(Debug, Clone)]
pub struct OverlapAssembler {
    table: KmerTable,
    graph: OverlapGraph,
    max_walk_steps: Option<usize>,
}

impl OverlapAssembler {
    /// Count k-mers over all reads and derive the overlap graph.
    pub fn new(reads: &ReadSet, kmer_len: usize) -> Result<Self, AssemblyError> {
        Self::from_records(reads.records(), kmer_len)
    }

    /// Same as [`OverlapAssembler::new`] over a record slice.
    pub fn from_records(records: &[SequenceRecord], kmer_len: usize) -> Result<Self, AssemblyError> {
        Ok(Self::from_table(KmerTable::from_records(records, kmer_len)?))
    }

    /// Derive the overlap graph from an already counted table.
    pub fn from_table(table: KmerTable) -> Self {
        let graph = OverlapGraph::from_table(&table);
        info!(
            k = table.kmer_len(),
            kmers = table.len(),
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "overlap graph built"
        );
        Self {
            table,
            graph,
            max_walk_steps: None,
        }
    }

    /// Cap each walk at `steps` appended bases in addition to the visited-node guard.
    pub fn with_max_walk_steps(mut self, steps: usize) -> Result<Self, AssemblyError> {
        if steps == 0 {
            return Err(AssemblyError::InvalidParameter(
                "walk step cap must be > 0".to_string(),
            ));
        }
        self.max_walk_steps = Some(steps);
        Ok(self)
    }

    /// k-mer length.
    pub fn kmer_len(&self) -> usize {
        self.table.kmer_len()
    }

    /// k-mer occurrence table.
    pub fn kmer_table(&self) -> &KmerTable {
        &self.table
    }

    /// Overlap graph.
    pub fn graph(&self) -> &OverlapGraph {
        &self.graph
    }

    /// Extend the query's first k-mer in both directions while the path stays
    /// unambiguous.
    ///
    /// Forward extension follows nodes with exactly one successor, backward
    /// extension nodes with exactly one predecessor.
    pub fn longest_contig(&self, query: &[u8]) -> Result<Contig, AssemblyError> {
        let k = self.kmer_len();
        if query.len() < k {
            return Err(AssemblyError::SequenceTooShort { len: query.len(), k });
        }
        let seed = &query[..k];
        if !self.table.contains(seed) {
            return Err(AssemblyError::QueryNotIndexed);
        }
        let left_node = self
            .graph
            .node(&seed[..k - 1])
            .ok_or(AssemblyError::QueryNotIndexed)?;
        let right_node = self
            .graph
            .node(&seed[1..])
            .ok_or(AssemblyError::QueryNotIndexed)?;

        let backward = self.walk(left_node, Direction::Backward)?;
        let forward = self.walk(right_node, Direction::Forward)?;

        let mut sequence = Vec::with_capacity(backward.bases.len() + k + forward.bases.len());
        sequence.extend(backward.bases.iter().rev());
        sequence.extend_from_slice(seed);
        sequence.extend_from_slice(&forward.bases);

        debug!(
            left = backward.bases.len(),
            right = forward.bases.len(),
            left_stop = ?backward.stop,
            right_stop = ?forward.stop,
            "contig assembled"
        );

        Ok(Contig {
            sequence,
            seed_offset: backward.bases.len(),
            left_extension: backward.bases.len(),
            right_extension: forward.bases.len(),
            left_stop: backward.stop,
            right_stop: forward.stop,
        })
    }

    fn walk(&self, start: NodeId, direction: Direction) -> Result<Walk, AssemblyError> {
        let mut visited = HashSet::from([start]);
        let mut current = start;
        let mut bases = Vec::new();

        loop {
            let edges = match direction {
                Direction::Forward => self.graph.successors(current),
                Direction::Backward => self.graph.predecessors(current),
            };
            let next = match edges {
                [] => {
                    return Ok(Walk {
                        bases,
                        stop: WalkStop::DeadEnd,
                    })
                }
                [edge] => edge.node,
                _ => {
                    return Ok(Walk {
                        bases,
                        stop: WalkStop::Branch,
                    })
                }
            };

            if self.max_walk_steps.is_some_and(|cap| bases.len() >= cap) || !visited.insert(next) {
                debug!(%direction, steps = bases.len(), "walk terminated on cycle guard");
                return Err(AssemblyError::CycleDetected {
                    direction,
                    steps: bases.len(),
                });
            }

            let label = self.graph.label(next);
            let base = match direction {
                Direction::Forward => label[label.len() - 1],
                Direction::Backward => label[0],
            };
            bases.push(base);
            current = next;
        }
    }
}
