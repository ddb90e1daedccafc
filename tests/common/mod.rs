#![allow(dead_code)]

use contig_probe::ReadSet;

/// Five overlapping reads of the circular sequence ATGCTAGCAC.
pub fn cyclic_fixture() -> ReadSet {
    collect(&[
        ("SEQ1", "ATGCTA"),
        ("SEQ2", "GCTAGC"),
        ("SEQ3", "TAGCAC"),
        ("SEQ4", "GCACAT"),
        ("SEQ5", "ACATGC"),
    ])
}

/// Reads tiling `LINEAR_GENOME`, whose 4-mers are all distinct.
pub fn linear_fixture() -> ReadSet {
    collect(&[
        ("r1", "GATTACAGCT"),
        ("r2", "ACAGCTTGCA"),
        ("r3", "CTTGCAAGTC"),
        ("r4", "CAAGTCCGTA"),
    ])
}

pub const LINEAR_GENOME: &str = "GATTACAGCTTGCAAGTCCGTA";

pub fn collect(records: &[(&str, &str)]) -> ReadSet {
    records
        .iter()
        .map(|(id, seq)| (*id, seq.as_bytes().to_vec()))
        .collect()
}

/// DNA string of `len` bases drawn from `rng`.
pub fn random_dna(rng: &mut fastrand::Rng, len: usize) -> Vec<u8> {
    const BASES: [u8; 4] = *b"ACGT";
    (0..len).map(|_| BASES[rng.usize(0..4)]).collect()
}
