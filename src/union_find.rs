// 🔗 Disjoint Set - transitive grouping of leads by _id or email
//
// A and B share an email, B and C share an _id → A, B, C are one group,
// even though A and C have nothing in common.

use crate::lead::{normalize_email, Lead};
use std::collections::HashMap;

// ============================================================================
// DISJOINT SET
// ============================================================================

/// Union-find over the indices `0..n`, with path compression and union by rank.
#[derive(Debug, Clone)]
pub struct DisjointSet {
    parent: Vec<usize>,
    rank: Vec<u32>,
}

impl DisjointSet {
    /// Every element starts as its own singleton set
    pub fn new(size: usize) -> Self {
        DisjointSet {
            parent: (0..size).collect(),
            rank: vec![0; size],
        }
    }

    pub fn len(&self) -> usize {
        self.parent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    /// Representative of `x`'s set. Every node on the path is relinked to the root.
    pub fn find(&mut self, x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }

        let mut node = x;
        while self.parent[node] != root {
            let next = self.parent[node];
            self.parent[node] = root;
            node = next;
        }

        root
    }

    /// Merge the sets of `x` and `y`; the shorter tree goes under the taller one.
    pub fn union(&mut self, x: usize, y: usize) {
        let root_x = self.find(x);
        let root_y = self.find(y);
        if root_x == root_y {
            return;
        }

        match self.rank[root_x].cmp(&self.rank[root_y]) {
            std::cmp::Ordering::Less => self.parent[root_x] = root_y,
            std::cmp::Ordering::Greater => self.parent[root_y] = root_x,
            std::cmp::Ordering::Equal => {
                self.parent[root_y] = root_x;
                self.rank[root_x] += 1;
            }
        }
    }

    /// All sets as lists of member indices.
    ///
    /// Members keep ascending order; groups are ordered by their smallest member.
    pub fn groups(&mut self) -> Vec<Vec<usize>> {
        let mut slot_by_root: HashMap<usize, usize> = HashMap::new();
        let mut groups: Vec<Vec<usize>> = Vec::new();

        for i in 0..self.len() {
            let root = self.find(i);
            let slot = *slot_by_root.entry(root).or_insert_with(|| {
                groups.push(Vec::new());
                groups.len() - 1
            });
            groups[slot].push(i);
        }

        groups
    }
}

// ============================================================================
// GROUPING
// ============================================================================

/// Group valid leads that are linked by `_id` or case-insensitive email,
/// directly or through a chain of other leads.
///
/// Returns index groups into `leads`. Invalid leads must be filtered out
/// beforehand; passing one is a caller bug.
pub fn group_indices(leads: &[Lead]) -> Vec<Vec<usize>> {
    let mut set = DisjointSet::new(leads.len());

    // First index at which each key was seen
    let mut id_to_index: HashMap<&str, usize> = HashMap::new();
    let mut email_to_index: HashMap<String, usize> = HashMap::new();

    for (i, lead) in leads.iter().enumerate() {
        let (id, email) = match lead.match_keys() {
            Some(keys) => keys,
            None => panic!("lead at index {} reached grouping without a valid _id and email", i),
        };

        match id_to_index.get(id) {
            Some(&first) => set.union(i, first),
            None => {
                id_to_index.insert(id, i);
            }
        }

        let email = normalize_email(email);
        match email_to_index.get(&email) {
            Some(&first) => set.union(i, first),
            None => {
                email_to_index.insert(email, i);
            }
        }
    }

    set.groups()
}

// ============================================================================
// TESTS
// ============================================================================
