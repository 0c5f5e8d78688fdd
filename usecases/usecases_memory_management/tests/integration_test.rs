//! Integration tests for usecases_memory_management crate
//!
//! These tests run allocate/deallocate/coalesce sequences against whole
//! partitions under every policy and check the partition after each step.

use entities_memory_blocks::{Block, BlockList, ProcessId};
use usecases_memory_management::{
    coalesce, AllocationError, AllocationPolicy, AllocatorContext, Command, Partition,
};

const POLICIES: [AllocationPolicy; 3] = [
    AllocationPolicy::FirstFit,
    AllocationPolicy::BestFit,
    AllocationPolicy::WorstFit,
];

fn pid(id: u32) -> ProcessId {
    ProcessId::new(id).unwrap()
}

fn free(start: usize, end: usize) -> Block {
    Block::free(start, end).unwrap()
}

fn bounds(list: &BlockList) -> Vec<(usize, usize)> {
    list.iter().map(|b| (b.start(), b.end())).collect()
}

/// Free blocks of sizes 10, 4 and 8 in that list order, separated by owned blocks
fn fragmented_lists() -> (BlockList, BlockList) {
    let free_list: BlockList = [free(0, 9), free(11, 14), free(16, 23)].into_iter().collect();
    let allocated: BlockList = [
        Block::owned(10, 10, pid(90)).unwrap(),
        Block::owned(15, 15, pid(91)).unwrap(),
    ]
    .into_iter()
    .collect();
    (free_list, allocated)
}

fn mixed_script() -> Vec<Command> {
    let alloc = |id, size| Command::Allocate { pid: pid(id), size };
    let dealloc = |id| Command::Deallocate { pid: pid(id) };
    vec![
        alloc(1, 120),
        alloc(2, 64),
        alloc(3, 200),
        alloc(4, 30),
        dealloc(2),
        alloc(5, 40),
        dealloc(1),
        alloc(6, 500),
        dealloc(4),
        alloc(7, 25),
        Command::Coalesce,
        dealloc(3),
        alloc(8, 90),
        dealloc(99),
        dealloc(5),
        Command::Coalesce,
        alloc(9, 1),
        dealloc(7),
        dealloc(8),
        dealloc(9),
        Command::Coalesce,
    ]
}

#[test]
fn test_partition_conservation_after_every_command() {
    for policy in POLICIES {
        let mut partition = Partition::new(512, policy).unwrap();
        for command in mixed_script() {
            let _ = partition.execute(&command);
            assert!(
                partition.verify().is_ok(),
                "{} broke the partition after {}: {:?}",
                policy,
                command,
                partition.verify()
            );
            assert_eq!(partition.free_units() + partition.allocated_units(), 512);
        }
        // every process released and coalesced: back to a single block
        assert_eq!(bounds(partition.free_list()), vec![(0, 511)]);
        assert!(partition.allocated_list().is_empty());
    }
}

#[test]
fn test_first_fit_order_sensitivity() {
    let (mut free_list, mut allocated) = fragmented_lists();
    let mut ctx = AllocatorContext::new(&mut free_list, &mut allocated, AllocationPolicy::FirstFit);
    let block = ctx.allocate(pid(1), 5).unwrap();
    assert_eq!((block.start(), block.end()), (0, 4));
}

#[test]
fn test_best_fit_selects_smallest_leftover() {
    let (mut free_list, mut allocated) = fragmented_lists();
    let mut ctx = AllocatorContext::new(&mut free_list, &mut allocated, AllocationPolicy::BestFit);
    let block = ctx.allocate(pid(1), 5).unwrap();
    assert_eq!((block.start(), block.end()), (16, 20));
}

#[test]
fn test_worst_fit_selects_largest_leftover() {
    let (mut free_list, mut allocated) = fragmented_lists();
    let mut ctx = AllocatorContext::new(&mut free_list, &mut allocated, AllocationPolicy::WorstFit);
    let block = ctx.allocate(pid(1), 5).unwrap();
    assert_eq!((block.start(), block.end()), (0, 4));
}

#[test]
fn test_split_remainder_follows_policy_order() {
    // first-fit appends the remainder
    let (mut free_list, mut allocated) = fragmented_lists();
    AllocatorContext::new(&mut free_list, &mut allocated, AllocationPolicy::FirstFit)
        .allocate(pid(1), 6)
        .unwrap();
    assert_eq!(bounds(&free_list), vec![(11, 14), (16, 23), (6, 9)]);
    assert_eq!(bounds(&allocated), vec![(0, 5), (10, 10), (15, 15)]);

    // best-fit inserts by ascending size, after equal sizes
    let mut free_list: BlockList = [free(0, 3), free(10, 21)].into_iter().collect();
    let mut allocated = BlockList::new();
    AllocatorContext::new(&mut free_list, &mut allocated, AllocationPolicy::BestFit)
        .allocate(pid(1), 8)
        .unwrap();
    assert_eq!(bounds(&free_list), vec![(0, 3), (18, 21)]);

    // worst-fit inserts by descending size
    let mut free_list: BlockList = [free(0, 19), free(30, 36)].into_iter().collect();
    let mut allocated = BlockList::new();
    AllocatorContext::new(&mut free_list, &mut allocated, AllocationPolicy::WorstFit)
        .allocate(pid(1), 15)
        .unwrap();
    assert_eq!(bounds(&free_list), vec![(30, 36), (15, 19)]);
}

#[test]
fn test_coalesce_merges_only_free_runs() {
    let mut partition = Partition::new(15, AllocationPolicy::FirstFit).unwrap();
    partition.allocate(pid(1), 5).unwrap();
    partition.allocate(pid(2), 5).unwrap();
    partition.allocate(pid(3), 5).unwrap();
    partition.deallocate(pid(2)).unwrap();
    partition.deallocate(pid(1)).unwrap();
    assert_eq!(bounds(partition.free_list()), vec![(5, 9), (0, 4)]);

    assert_eq!(partition.coalesce(), 1);
    assert_eq!(bounds(partition.free_list()), vec![(0, 9)]);
    assert_eq!(bounds(partition.allocated_list()), vec![(10, 14)]);
    assert!(partition.allocated_list().contains_owner(pid(3)));
}

#[test]
fn test_deallocate_reinserts_between_sizes() {
    let mut free_list: BlockList = [free(0, 2), free(20, 31)].into_iter().collect();
    let mut allocated: BlockList = [Block::owned(3, 9, pid(4)).unwrap()].into_iter().collect();
    AllocatorContext::new(&mut free_list, &mut allocated, AllocationPolicy::BestFit)
        .deallocate(pid(4))
        .unwrap();
    let sizes: Vec<_> = free_list.iter().map(Block::size).collect();
    assert_eq!(sizes, vec![3, 7, 12]);
}

#[test]
fn test_failed_allocation_is_non_destructive() {
    for policy in POLICIES {
        let mut partition = Partition::new(32, policy).unwrap();
        partition.allocate(pid(1), 10).unwrap();
        partition.allocate(pid(2), 10).unwrap();
        partition.deallocate(pid(1)).unwrap();
        let before = partition.clone();

        assert_eq!(
            partition.allocate(pid(3), 13),
            Err(AllocationError::AllocationFailed { requested_size: 13 })
        );
        assert_eq!(partition, before);
    }
}

#[test]
fn test_unknown_pid_deallocation_is_non_destructive() {
    for policy in POLICIES {
        let mut partition = Partition::new(32, policy).unwrap();
        partition.allocate(pid(1), 10).unwrap();
        let before = partition.clone();

        assert_eq!(
            partition.deallocate(pid(2)),
            Err(AllocationError::NotFound { process_id: pid(2) })
        );
        assert_eq!(partition, before);
    }
}

#[test]
fn test_deallocate_releases_first_block_of_pid() {
    let mut partition = Partition::new(30, AllocationPolicy::FirstFit).unwrap();
    partition.allocate(pid(1), 10).unwrap();
    partition.allocate(pid(1), 10).unwrap();
    let released = partition.deallocate(pid(1)).unwrap();
    assert_eq!((released.start(), released.end()), (0, 9));
    assert!(partition.allocated_list().contains_owner(pid(1)));
    assert!(partition.verify().is_ok());
}

#[test]
fn test_standalone_coalesce_returns_address_order() {
    let list: BlockList = [free(20, 29), free(0, 9), free(10, 19), free(40, 49)]
        .into_iter()
        .collect();
    assert_eq!(bounds(&coalesce(list)), vec![(0, 29), (40, 49)]);
}
