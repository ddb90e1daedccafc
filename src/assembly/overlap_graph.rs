//! (k−1)-mer overlap graph over interned node labels.
//!
//! Each distinct k-mer contributes one edge `prefix → suffix`; its count in
//! the k-mer table becomes the edge multiplicity.

use std::collections::HashMap;
use std::fmt;

use crate::assembly::KmerTable;

/// Index of an interned (k−1)-mer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    /// Position in the node arena.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// Directed edge to a neighbouring node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    /// Neighbour (successor or predecessor depending on the list).
    pub node: NodeId,
    /// Number of times the underlying k-mer was observed.
    pub multiplicity: u64,
}

/// Directed multigraph whose nodes are (k−1)-mers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverlapGraph {
    labels: Vec<Box<[u8]>>,
    ids: HashMap<Box<[u8]>, NodeId>,
    successors: Vec<Vec<Edge>>,
    predecessors: Vec<Vec<Edge>>,
}

impl OverlapGraph {
    /// Build the graph induced by every k-mer in `table`.
    pub fn from_table(table: &KmerTable) -> Self {
        let mut graph = Self::default();
        for (kmer, count) in table.iter() {
            graph.add_kmer(kmer, count);
        }
        graph
    }

    /// Add (or reinforce) the edge `kmer[..k-1] → kmer[1..]`.
    fn add_kmer(&mut self, kmer: &[u8], multiplicity: u64) {
        let prefix = self.intern(&kmer[..kmer.len() - 1]);
        let suffix = self.intern(&kmer[1..]);
        add_edge(&mut self.successors[prefix.index()], suffix, multiplicity);
        add_edge(&mut self.predecessors[suffix.index()], prefix, multiplicity);
    }

    fn intern(&mut self, label: &[u8]) -> NodeId {
        if let Some(&id) = self.ids.get(label) {
            return id;
        }
        let id = NodeId(self.labels.len() as u32);
        self.labels.push(Box::from(label));
        self.ids.insert(Box::from(label), id);
        self.successors.push(Vec::new());
        self.predecessors.push(Vec::new());
        id
    }

    /// Identifier of the node labelled `label`.
    pub fn node(&self, label: &[u8]) -> Option<NodeId> {
        self.ids.get(label).copied()
    }

    /// Label of `node`.
    pub fn label(&self, node: NodeId) -> &[u8] {
        &self.labels[node.index()]
    }

    /// Outgoing edges of `node`, in insertion order.
    pub fn successors(&self, node: NodeId) -> &[Edge] {
        &self.successors[node.index()]
    }

    /// Incoming edges of `node`, in insertion order.
    pub fn predecessors(&self, node: NodeId) -> &[Edge] {
        &self.predecessors[node.index()]
    }

    /// Number of distinct successors.
    pub fn out_degree(&self, node: NodeId) -> usize {
        self.successors[node.index()].len()
    }

    /// Number of distinct predecessors.
    pub fn in_degree(&self, node: NodeId) -> usize {
        self.predecessors[node.index()].len()
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.labels.len()
    }

    /// Number of distinct edges.
    pub fn edge_count(&self) -> usize {
        self.successors.iter().map(Vec::len).sum()
    }

    /// Successor labels of the node labelled `label`, in insertion order.
    pub fn successor_labels(&self, label: &[u8]) -> Vec<&[u8]> {
        self.node(label)
            .map(|id| {
                self.successors(id)
                    .iter()
                    .map(|edge| self.label(edge.node))
                    .collect()
            })
            .unwrap_or_default()
    }
}

fn add_edge(edges: &mut Vec<Edge>, node: NodeId, multiplicity: u64) {
    match edges.iter_mut().find(|edge| edge.node == node) {
        Some(edge) => edge.multiplicity += multiplicity,
        None => edges.push(Edge { node, multiplicity }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph_for(reads: &[&[u8]], k: usize) -> OverlapGraph {
        let mut table = KmerTable::new(k).unwrap();
        for read in reads {
            table.add_sequence(read);
        }
        OverlapGraph::from_table(&table)
    }

    #[test]
    fn interns_each_label_once() {
        let graph = graph_for(&[b"ACGTACGT"], 3);
        // AC, CG, GT, TA
        assert_eq!(graph.node_count(), 4);
        assert_eq!(graph.edge_count(), 4);
    }

    #[test]
    fn multiplicity_follows_counts() {
        let graph = graph_for(&[b"ACGT", b"ACGA"], 3);
        let ac = graph.node(b"AC").unwrap();
        let cg = graph.node(b"CG").unwrap();
        assert_eq!(graph.successors(ac), &[Edge { node: cg, multiplicity: 2 }]);
        assert_eq!(graph.out_degree(cg), 2);
        assert_eq!(graph.in_degree(cg), 1);
    }

    #[test]
    fn branches_are_listed_in_order() {
        let graph = graph_for(&[b"ACGT", b"ACGA"], 3);
        assert_eq!(graph.successor_labels(b"CG"), vec![&b"GA"[..], &b"GT"[..]]);
        assert!(graph.successor_labels(b"ZZ").is_empty());
    }
}
