//! Free List Coalescing
//!
//! Compacts a free list by sorting it into address order and merging every
//! run of adjacent free blocks into a single block.
//!
//! This is the only operation that reduces the number of free blocks. It is
//! never triggered by allocate or deallocate; a run only coalesces when the
//! command stream asks for it.

use entities_memory_blocks::BlockList;

/// Rebuild `free_list` in address order with adjacent blocks merged
///
/// The input is drained front to back and each block is inserted by address
/// into a fresh list, which is then merged in one pass. The returned list
/// replaces the caller's free list.
pub fn coalesce(free_list: BlockList) -> BlockList {
    let mut sorted = BlockList::with_capacity(free_list.len());
    for block in free_list {
        sorted.insert_sorted_by_address(block);
    }
    sorted.coalesce_adjacent();
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use entities_memory_blocks::Block;

    fn free(start: usize, end: usize) -> Block {
        Block::free(start, end).unwrap()
    }

    fn bounds(list: &BlockList) -> Vec<(usize, usize)> {
        list.iter().map(|b| (b.start(), b.end())).collect()
    }

    #[test]
    fn test_coalesce_merges_adjacent() {
        let list: BlockList = [free(5, 9), free(0, 4)].into_iter().collect();
        assert_eq!(bounds(&coalesce(list)), vec![(0, 9)]);
    }

    #[test]
    fn test_coalesce_keeps_gaps() {
        let list: BlockList = [free(30, 39), free(10, 14), free(0, 4), free(15, 19)]
            .into_iter()
            .collect();
        assert_eq!(bounds(&coalesce(list)), vec![(0, 4), (10, 19), (30, 39)]);
    }

    #[test]
    fn test_coalesce_empty() {
        assert!(coalesce(BlockList::new()).is_empty());
    }
}
