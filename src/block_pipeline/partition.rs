//! Splits `[0, len)` into contiguous, near-equal block ranges.

use std::ops::Range;

/// One block's slice of the input, tagged with its ordinal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockRange {
    pub index: usize,
    pub range: Range<usize>,
}

impl BlockRange {
    pub fn len(&self) -> usize {
        self.range.len()
    }

    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }
}

/// Partitions `len` elements into at most `requested` ranges.
///
/// `requested` is clamped to `[1, max_blocks]` and never exceeds `len`, so no
/// range is ever empty. The remainder goes to the earliest ranges, one extra
/// element each. An empty input yields no ranges.
pub fn partition(len: usize, requested: usize, max_blocks: usize) -> Vec<BlockRange> {
    let count = requested.clamp(1, max_blocks.max(1)).min(len);
    if count == 0 {
        return Vec::new();
    }
    let base = len / count;
    let remainder = len % count;

    let mut ranges = Vec::with_capacity(count);
    let mut start = 0;
    for index in 0..count {
        let size = base + usize::from(index < remainder);
        ranges.push(BlockRange {
            index,
            range: start..start + size,
        });
        start += size;
    }
    ranges
}
