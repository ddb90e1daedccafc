//! Implicit merge-tree node.
//!
//! A span is an interval [left, right] of 1-indexed shards. Children split at
//! m = ⌊(left + right) / 2⌋ into [left, m] and [m + 1, right].

/// Interval of shards covered by one node of the merge tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShardSpan {
    /// First shard (inclusive).
    pub left: usize,
    /// Last shard (inclusive).
    pub right: usize,
}

impl ShardSpan {
    /// Span covering shards `left..=right`.
    pub fn new(left: usize, right: usize) -> Self {
        debug_assert!(left <= right, "empty span");
        Self { left, right }
    }

    /// Whether the span covers a single shard.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.left == self.right
    }

    /// Midpoint split into `([left, mid], [mid + 1, right])`.
    pub fn children(&self) -> (ShardSpan, ShardSpan) {
        debug_assert!(!self.is_leaf(), "leaf has no children");
        let mid = (self.left + self.right) / 2;
        (
            ShardSpan::new(self.left, mid),
            ShardSpan::new(mid + 1, self.right),
        )
    }

    /// Shard id of a leaf span.
    pub fn shard_id(&self) -> usize {
        debug_assert!(self.is_leaf(), "only leaves name a shard");
        self.left
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn midpoint_split() {
        let (left, right) = ShardSpan::new(1, 100).children();
        assert_eq!(left, ShardSpan::new(1, 50));
        assert_eq!(right, ShardSpan::new(51, 100));
    }

    #[test]
    fn odd_span_puts_extra_shard_left() {
        let (left, right) = ShardSpan::new(1, 5).children();
        assert_eq!(left, ShardSpan::new(1, 3));
        assert_eq!(right, ShardSpan::new(4, 5));
        assert!(ShardSpan::new(4, 4).is_leaf());
        assert_eq!(ShardSpan::new(4, 4).shard_id(), 4);
    }
}
