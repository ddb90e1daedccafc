use contig_probe::{AssemblyError, Direction, KmerTable, OverlapAssembler, OverlapGraph, WalkStop};

mod common;
use common::{collect, cyclic_fixture, linear_fixture, LINEAR_GENOME};

#[test]
fn fixture_kmers_are_each_seen_twice() {
    let reads = cyclic_fixture();
    let table = KmerTable::from_records(reads.records(), 3).unwrap();
    let kmers: Vec<&[u8]> = table.iter().map(|(kmer, _)| kmer).collect();
    assert_eq!(
        kmers,
        vec![
            &b"ACA"[..], b"AGC", b"ATG", b"CAC", b"CAT", b"CTA", b"GCA", b"GCT", b"TAG", b"TGC"
        ]
    );
    assert!(table.iter().all(|(_, count)| count == 2));
    assert_eq!(table.total(), 20);
}

#[test]
fn overlap_graph_exposes_branches() {
    let reads = cyclic_fixture();
    let table = KmerTable::from_records(reads.records(), 3).unwrap();
    let graph = OverlapGraph::from_table(&table);
    assert_eq!(graph.node_count(), 8);
    assert_eq!(graph.edge_count(), 10);
    assert_eq!(graph.successor_labels(b"GC"), vec![&b"CA"[..], b"CT"]);
    assert_eq!(graph.successor_labels(b"CA"), vec![&b"AC"[..], b"AT"]);
    assert!(graph.successor_labels(b"GG").is_empty());
}

#[test]
fn contig_stops_at_branches() {
    let asm = OverlapAssembler::new(&cyclic_fixture(), 3).unwrap();
    let contig = asm.longest_contig(b"CTAG").unwrap();
    assert_eq!(contig.to_string(), "GCTAGC");
    assert_eq!((contig.left_stop, contig.right_stop), (WalkStop::Branch, WalkStop::Branch));
}

#[test]
fn linear_genome_is_recovered_from_tiled_reads() {
    let asm = OverlapAssembler::new(&linear_fixture(), 5).unwrap();
    let contig = asm.longest_contig(b"ACAGCTTGCA").unwrap();
    assert_eq!(contig.to_string(), LINEAR_GENOME);
    assert_eq!(contig.seed_offset, 4);
    assert_eq!(contig.left_extension, 4);
    assert_eq!(contig.right_extension, 13);
    assert_eq!((contig.left_stop, contig.right_stop), (WalkStop::DeadEnd, WalkStop::DeadEnd));
}

#[test]
fn contig_contains_seed_at_its_offset() {
    let asm = OverlapAssembler::new(&linear_fixture(), 5).unwrap();
    for start in 0..=LINEAR_GENOME.len() - 5 {
        let seed = &LINEAR_GENOME.as_bytes()[start..start + 5];
        let contig = asm.longest_contig(seed).unwrap();
        assert_eq!(&contig.sequence[contig.seed_offset..contig.seed_offset + 5], seed);
        assert_eq!(contig.to_string(), LINEAR_GENOME);
    }
}

#[test]
fn cycles_are_reported_instead_of_looping() {
    let asm = OverlapAssembler::new(&collect(&[("loop", "ACGACG")]), 3).unwrap();
    assert!(matches!(
        asm.longest_contig(b"ACG"),
        Err(AssemblyError::CycleDetected {
            direction: Direction::Backward,
            ..
        })
    ));
}

#[test]
fn unseen_seed_is_not_indexed() {
    let asm = OverlapAssembler::new(&cyclic_fixture(), 3).unwrap();
    assert!(matches!(
        asm.longest_contig(b"TTTA"),
        Err(AssemblyError::QueryNotIndexed)
    ));
}

#[test]
fn kmer_length_below_two_is_rejected() {
    assert!(matches!(
        OverlapAssembler::new(&cyclic_fixture(), 1),
        Err(AssemblyError::InvalidParameter(_))
    ));
}

#[test]
fn assembly_is_idempotent() {
    let asm = OverlapAssembler::new(&cyclic_fixture(), 3).unwrap();
    let first = asm.longest_contig(b"CTAG").unwrap();
    let second = asm.longest_contig(b"CTAG").unwrap();
    assert_eq!(first, second);
}

#[test]
fn duplicate_reads_raise_counts_but_keep_topology() {
    let once = KmerTable::from_records(cyclic_fixture().records(), 3).unwrap();
    let mut doubled = once.clone();
    doubled.merge(once.clone()).unwrap();
    assert_eq!(doubled.count(b"GCT"), 2 * once.count(b"GCT"));

    let (graph, doubled_graph) = (OverlapGraph::from_table(&once), OverlapGraph::from_table(&doubled));
    assert_eq!(graph.node_count(), doubled_graph.node_count());
    assert_eq!(graph.edge_count(), doubled_graph.edge_count());
    for label in [&b"GC"[..], b"CA", b"TA", b"AT"] {
        assert_eq!(graph.successor_labels(label), doubled_graph.successor_labels(label));
    }
}
