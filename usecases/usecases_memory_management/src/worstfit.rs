//! Worst-Fit Placement
//!
//! Implements worst-fit allocation strategy.
//!
//! Worst-fit carves every request out of the free block leaving the largest
//! leftover, on the theory that big leftovers stay useful. A candidate only
//! replaces the running best when its leftover is strictly larger, so on ties
//! the block found first wins. The free list is kept in descending size
//! order.

use entities_memory_blocks::{BlockList, InsertionPolicy, NodeId};

use super::allocator::PlacementStrategy;

/// Worst-fit strategy
#[derive(Debug, Clone, Copy, Default)]
pub struct WorstFit;

impl PlacementStrategy for WorstFit {
    fn select(&self, free_list: &BlockList, requested_size: usize) -> Option<NodeId> {
        let mut worst: Option<(usize, NodeId)> = None;
        for (id, block) in free_list.nodes() {
            if !block.fits(requested_size) {
                continue;
            }
            let leftover = block.size() - requested_size;
            if worst.map_or(true, |(largest, _)| leftover > largest) {
                worst = Some((leftover, id));
            }
        }
        worst.map(|(_, id)| id)
    }

    fn free_list_order(&self) -> InsertionPolicy {
        InsertionPolicy::DescendingSize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use entities_memory_blocks::Block;

    fn list_of_sizes(sizes: &[usize]) -> BlockList {
        let mut start = 0;
        let mut list = BlockList::new();
        for &size in sizes {
            list.push_back(Block::free_with_size(start, size).unwrap());
            start += size + 1;
        }
        list
    }

    #[test]
    fn test_worstfit_finds_largest_leftover() {
        let list = list_of_sizes(&[10, 4, 8]);
        let id = WorstFit.select(&list, 5).unwrap();
        assert_eq!(list.get(id).unwrap().size(), 10);
    }

    #[test]
    fn test_worstfit_ignores_order() {
        let list = list_of_sizes(&[6, 20, 11]);
        let id = WorstFit.select(&list, 5).unwrap();
        assert_eq!(list.get(id).unwrap().size(), 20);
    }

    #[test]
    fn test_worstfit_tie_keeps_earliest() {
        let list = list_of_sizes(&[3, 9, 9]);
        let id = WorstFit.select(&list, 2).unwrap();
        assert_eq!(list.get(id).unwrap().start(), 4);
    }

    #[test]
    fn test_worstfit_no_candidate() {
        assert!(WorstFit.select(&list_of_sizes(&[1]), 2).is_none());
    }
}
