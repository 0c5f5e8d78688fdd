//! First-Fit Placement
//!
//! Implements first-fit allocation strategy.
//!
//! First-fit takes the first free block that is large enough, in list order.
//! Under this policy the free list is kept in arrival order (every block
//! entering it is appended), so "first" means the oldest suitable block
//! rather than the lowest address. After a coalesce the list is in address
//! order until new blocks are appended.

use entities_memory_blocks::{BlockList, InsertionPolicy, NodeId};

use super::allocator::PlacementStrategy;

/// First-fit strategy
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstFit;

impl PlacementStrategy for FirstFit {
    fn select(&self, free_list: &BlockList, requested_size: usize) -> Option<NodeId> {
        free_list
            .find_first(|block| block.fits(requested_size))
            .map(|(_, id, _)| id)
    }

    fn free_list_order(&self) -> InsertionPolicy {
        InsertionPolicy::Back
    }
}
