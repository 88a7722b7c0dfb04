//! Least Recently Used (LRU) rank tables.
//!
//! Every member of a group (a way within a set, or a stream within a stream
//! buffer pool) carries an explicit recency rank: 0 is the most recently used
//! member and larger ranks are older. Promoting a member bumps every member
//! that was younger than it by one and moves it to rank 0, so the ranks of a
//! group always stay a permutation of `0..width`.
//!
//! # Performance
//!
//! - **Time Complexity:**
//!   - `promote()`: O(W) where W is the group width
//!   - `least_recent()`: O(W)
//! - **Space Complexity:** O(G × W) where G is the number of groups
//! - **Hardware Cost:** High - requires a full rank comparator per member

/// Rank table for `groups` groups of `width` members, stored as a flat arena.
#[derive(Debug, Clone)]
pub struct LruRanks {
    width: usize,
    /// `ranks[group * width + member]`; 0 is MRU.
    ranks: Vec<u32>,
}

impl LruRanks {
    /// Creates a table where member `i` of every group starts with rank `i`.
    ///
    /// # Arguments
    ///
    /// * `groups` - Number of independent groups (sets, or 1 for a stream pool).
    /// * `width` - Members per group (ways, or streams).
    pub fn new(groups: usize, width: usize) -> Self {
        let ranks = (0..groups)
            .flat_map(|_| 0..width as u32)
            .collect();
        Self { width, ranks }
    }

    /// Members per group.
    #[inline]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Current rank of `member` in `group`.
    #[inline]
    pub fn rank(&self, group: usize, member: usize) -> u32 {
        self.group(group)[member]
    }

    /// Makes `member` the most recently used member of `group`.
    ///
    /// A member already at rank 0 is left alone. Members never filled keep
    /// rank == index until their first promotion, which is always above every
    /// filled member's rank, so bumping "every younger member" only ever
    /// touches filled ones.
    pub fn promote(&mut self, group: usize, member: usize) {
        let ranks = self.group_mut(group);
        let old = ranks[member];
        if old == 0 {
            return;
        }
        for rank in ranks.iter_mut().filter(|r| **r < old) {
            *rank += 1;
        }
        ranks[member] = 0;
    }

    /// Member with the strictly largest rank (lowest index on ties).
    pub fn least_recent(&self, group: usize) -> usize {
        let mut victim = 0;
        let mut oldest = 0;
        for (member, &rank) in self.group(group).iter().enumerate() {
            if rank > oldest {
                oldest = rank;
                victim = member;
            }
        }
        victim
    }

    /// Members of `group` ordered from most to least recently used.
    pub fn mru_order(&self, group: usize) -> Vec<usize> {
        let ranks = self.group(group);
        let mut order: Vec<usize> = (0..self.width).collect();
        order.sort_by_key(|&member| ranks[member]);
        order
    }

    /// Returns `true` if the ranks of `group` form a permutation of `0..width`.
    pub fn is_permutation(&self, group: usize) -> bool {
        let mut seen = vec![false; self.width];
        self.group(group).iter().all(|&rank| {
            match seen.get_mut(rank as usize) {
                Some(flag) if !*flag => {
                    *flag = true;
                    true
                }
                _ => false,
            }
        })
    }

    #[inline]
    fn group(&self, group: usize) -> &[u32] {
        let base = group * self.width;
        &self.ranks[base..base + self.width]
    }

    #[inline]
    fn group_mut(&mut self, group: usize) -> &mut [u32] {
        let base = group * self.width;
        &mut self.ranks[base..base + self.width]
    }
}
