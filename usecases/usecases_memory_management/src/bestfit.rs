//! Best-Fit Placement
//!
//! Implements best-fit allocation strategy.
//!
//! Best-fit finds the free block leaving the smallest leftover. This
//! minimizes wasted space per request but tends to leave many small
//! fragments. The whole list is scanned, and a candidate only replaces the
//! running best when its leftover is strictly smaller, so on ties the block
//! found first wins. The free list is kept in ascending size order.

use entities_memory_blocks::{BlockList, InsertionPolicy, NodeId};

use super::allocator::PlacementStrategy;

/// Best-fit strategy
#[derive(Debug, Clone, Copy, Default)]
pub struct BestFit;

impl PlacementStrategy for BestFit {
    fn select(&self, free_list: &BlockList, requested_size: usize) -> Option<NodeId> {
        let mut best: Option<(usize, NodeId)> = None;
        for (id, block) in free_list.nodes() {
            if !block.fits(requested_size) {
                continue;
            }
            let leftover = block.size() - requested_size;
            if best.map_or(true, |(smallest, _)| leftover < smallest) {
                best = Some((leftover, id));
            }
        }
        best.map(|(_, id)| id)
    }

    fn free_list_order(&self) -> InsertionPolicy {
        InsertionPolicy::AscendingSize
    }
}
