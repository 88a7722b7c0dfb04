//! LRU Rank Table Unit Tests.
//!
//! Verifies initial ranks, promotion, victim selection and the permutation
//! invariant under arbitrary promotion sequences.

use cachesim_core::core::units::cache::lru::LruRanks;
use proptest::prelude::*;

fn ranks(lru: &LruRanks, group: usize) -> Vec<u32> {
    (0..lru.width()).map(|m| lru.rank(group, m)).collect()
}

#[test]
fn members_start_ranked_by_index() {
    let lru = LruRanks::new(3, 4);
    for group in 0..3 {
        assert_eq!(ranks(&lru, group), vec![0, 1, 2, 3]);
        assert_eq!(lru.least_recent(group), 3);
        assert_eq!(lru.mru_order(group), vec![0, 1, 2, 3]);
    }
}

#[test]
fn groups_are_independent() {
    let mut lru = LruRanks::new(2, 3);
    lru.promote(1, 2);
    assert_eq!(ranks(&lru, 0), vec![0, 1, 2]);
    assert_eq!(ranks(&lru, 1), vec![1, 2, 0]);
}

#[test]
fn promoting_oldest_makes_next_oldest_the_victim() {
    let mut lru = LruRanks::new(1, 4);
    lru.promote(0, 3);
    assert_eq!(ranks(&lru, 0), vec![1, 2, 3, 0]);
    assert_eq!(lru.least_recent(0), 2);
    assert_eq!(lru.mru_order(0), vec![3, 0, 1, 2]);
}

#[test]
fn single_member_group_never_changes() {
    let mut lru = LruRanks::new(1, 1);
    lru.promote(0, 0);
    assert_eq!(lru.rank(0, 0), 0);
    assert_eq!(lru.least_recent(0), 0);
}

proptest! {
    #[test]
    fn promotions_preserve_permutation(
        width in 1usize..9,
        touches in prop::collection::vec(0usize..8, 0..64),
    ) {
        let mut lru = LruRanks::new(1, width);
        for member in touches.into_iter().map(|m| m % width) {
            lru.promote(0, member);
            prop_assert_eq!(lru.rank(0, member), 0);
            prop_assert!(lru.is_permutation(0));
            prop_assert_eq!(lru.rank(0, lru.least_recent(0)) as usize, width - 1);
        }
    }
}
