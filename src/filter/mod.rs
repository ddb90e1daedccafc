//! Probabilistic membership layer.
//!
//! A [`ProbabilisticSet`] answers "possibly present / definitely absent" for
//! single items. A [`ContextIndex`] routes each k-mer of a sequence to the set
//! owned by its surrounding context, so a query must match both an exact
//! context key and a probabilistic test at every position.

mod context_index;
mod hash_family;
mod probabilistic_set;
mod sizing;

pub use context_index::{windows, ContextIndex, Membership, Window};
pub use hash_family::{Blake3Mixer, HashFamily, SeedMixer};
pub use probabilistic_set::{FilterError, ProbabilisticSet};
pub use sizing::{expected_false_positive_rate, hash_count_for, size_for_target, FilterParams};
