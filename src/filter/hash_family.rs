use std::fmt;
use std::sync::Arc;

/// Mixing function shared by every member of a [`HashFamily`].
///
/// Implementations must be pure: the same `(item, seed)` pair always yields
/// the same value, within a run and across runs.
pub trait SeedMixer: fmt::Debug + Clone + PartialEq + Send + Sync {
    /// Hash `item` under `seed`.
    fn mix(&self, item: &[u8], seed: u64) -> u64;
}

/// BLAKE3 keyed by the little-endian seed prefix.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Blake3Mixer;

impl SeedMixer for Blake3Mixer {
    fn mix(&self, item: &[u8], seed: u64) -> u64 {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&seed.to_le_bytes());
        hasher.update(item);
        let digest = hasher.finalize();
        let mut word = [0u8; 8];
        word.copy_from_slice(&digest.as_bytes()[..8]);
        u64::from_le_bytes(word)
    }
}

/// `k` fixed seeds plus one reproducible mixing function.
#[derive(Debug, Clone, PartialEq)]
pub struct HashFamily<M: SeedMixer = Blake3Mixer> {
    seeds: Arc<[u64]>,
    mixer: M,
}

impl HashFamily<Blake3Mixer> {
    /// Family with seeds `0..hash_count` and the BLAKE3 mixer.
    pub fn new(hash_count: usize) -> Self {
        Self::with_base_seed(0, hash_count)
    }

    /// Family with seeds `base..base + hash_count` and the BLAKE3 mixer.
    pub fn with_base_seed(base: u64, hash_count: usize) -> Self {
        Self::with_mixer(base, hash_count, Blake3Mixer)
    }
}

impl<M: SeedMixer> HashFamily<M> {
    /// Family with seeds `base..base + hash_count` and a caller-supplied mixer.
    pub fn with_mixer(base: u64, hash_count: usize, mixer: M) -> Self {
        let seeds: Vec<u64> = (0..hash_count as u64)
            .map(|offset| base.wrapping_add(offset))
            .collect();
        Self {
            seeds: Arc::from(seeds),
            mixer,
        }
    }

    /// Number of hash functions in the family.
    pub fn len(&self) -> usize {
        self.seeds.len()
    }

    /// Whether the family has no members.
    pub fn is_empty(&self) -> bool {
        self.seeds.is_empty()
    }

    /// Seeds in evaluation order.
    pub fn seeds(&self) -> &[u64] {
        &self.seeds
    }

    /// Hash `item` with an explicit seed.
    #[inline]
    pub fn hash(&self, item: &[u8], seed: u64) -> u64 {
        self.mixer.mix(item, seed)
    }

    /// Bit positions for `item` in an array of `modulus` bits, one per seed.
    pub fn indices<'a>(&'a self, item: &'a [u8], modulus: usize) -> impl Iterator<Item = usize> + 'a {
        let modulus = modulus as u64;
        self.seeds
            .iter()
            .map(move |&seed| (self.mixer.mix(item, seed) % modulus) as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blake3_mixer_is_reproducible() {
        let mixer = Blake3Mixer;
        assert_eq!(mixer.mix(b"ACGT", 3), mixer.mix(b"ACGT", 3));
        assert_ne!(mixer.mix(b"ACGT", 3), mixer.mix(b"ACGT", 4));
        assert_ne!(mixer.mix(b"ACGT", 3), mixer.mix(b"ACGA", 3));
    }

    #[test]
    fn seeds_start_at_base() {
        let family = HashFamily::with_base_seed(10, 3);
        assert_eq!(family.seeds(), &[10, 11, 12]);
        assert_eq!(family.len(), 3);
    }

    #[test]
    fn indices_stay_within_modulus() {
        let family = HashFamily::new(7);
        let indices: Vec<usize> = family.indices(b"SEQUENCE", 959).collect();
        assert_eq!(indices.len(), 7);
        assert!(indices.iter().all(|&idx| idx < 959));
    }
}
