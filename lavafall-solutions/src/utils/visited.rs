//! Visited-state bookkeeping for searches over composite states

use std::collections::HashMap;
use std::collections::HashSet;
use std::collections::hash_map::Entry;
use std::hash::Hash;

/// Set of traversal states already expanded.
///
/// The key is whatever identifies a state for the search at hand, e.g.
/// `(Position, Crossing)` for beams or `(Position, Heading, run)` for the
/// crucible. The set only ever grows, which is what bounds every walk over it.
#[derive(Debug, Clone)]
pub struct StateSet<K> {
    seen: HashSet<K>,
}

impl<K: Hash + Eq> StateSet<K> {
    pub fn new() -> Self {
        Self {
            seen: HashSet::new(),
        }
    }

    /// Record `key`; `false` if it was already there
    pub fn insert(&mut self, key: K) -> bool {
        self.seen.insert(key)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.seen.contains(key)
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &K> {
        self.seen.iter()
    }
}

impl<K: Hash + Eq> Default for StateSet<K> {
    fn default() -> Self {
        Self::new()
    }
}

/// Best known cost per state.
#[derive(Debug, Clone)]
pub struct CostMap<K, C> {
    best: HashMap<K, C>,
}

impl<K: Hash + Eq, C: Ord + Copy> CostMap<K, C> {
    pub fn new() -> Self {
        Self {
            best: HashMap::new(),
        }
    }

    /// Record `cost` for `key` if it beats what is known.
    ///
    /// Returns `false` when the recorded cost is already `<= cost`, i.e. the
    /// candidate is dominated and should not be expanded.
    pub fn improve(&mut self, key: K, cost: C) -> bool {
        match self.best.entry(key) {
            Entry::Occupied(mut known) => {
                if *known.get() <= cost {
                    return false;
                }
                known.insert(cost);
                true
            }
            Entry::Vacant(slot) => {
                slot.insert(cost);
                true
            }
        }
    }

    pub fn get(&self, key: &K) -> Option<C> {
        self.best.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.best.len()
    }

    pub fn is_empty(&self) -> bool {
        self.best.is_empty()
    }
}

impl<K: Hash + Eq, C: Ord + Copy> Default for CostMap<K, C> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_set_reports_first_insert_only() {
        let mut set = StateSet::new();
        assert!(set.insert((1, 'a')));
        assert!(!set.insert((1, 'a')));
        assert!(set.insert((1, 'b')));
        assert_eq!(set.len(), 2);
        assert!(set.contains(&(1, 'b')));
    }

    #[test]
    fn test_cost_map_keeps_strict_improvements() {
        let mut costs = CostMap::new();
        assert!(costs.improve("a", 10u32));
        assert!(!costs.improve("a", 10));
        assert!(!costs.improve("a", 12));
        assert!(costs.improve("a", 7));
        assert_eq!(costs.get(&"a"), Some(7));
        assert_eq!(costs.get(&"b"), None);
    }
}
