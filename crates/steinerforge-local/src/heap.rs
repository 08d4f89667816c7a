//! Meldable priority queues of boundary arcs.
//!
//! One leftist heap per owner node, all stored in a shared arena. Melding
//! two heaps walks only their right spines, which are logarithmic in size.

use std::collections::TryReserveError;

use smallvec::SmallVec;
use steinerforge_core::{EdgeId, NodeId};

use crate::scratch::{try_filled, try_with_capacity};

const NIL: u32 = u32::MAX;

#[derive(Debug, Clone, Copy)]
struct HeapNode {
    key: f64,
    arc: EdgeId,
    left: u32,
    right: u32,
    rank: u32,
}

/// A forest of leftist heaps indexed by owner node.
#[derive(Debug, Clone)]
pub struct HeapForest {
    nodes: Vec<HeapNode>,
    free: Vec<u32>,
    roots: Vec<u32>,
    spine: Vec<u32>,
}

impl HeapForest {
    /// Creates empty heaps for `owners` nodes with room for `capacity` entries.
    pub fn try_new(owners: usize, capacity: usize) -> Result<Self, TryReserveError> {
        Ok(Self {
            nodes: try_with_capacity(capacity)?,
            free: try_with_capacity(capacity)?,
            roots: try_filled(NIL, owners)?,
            spine: try_with_capacity(capacity)?,
        })
    }

    /// Empties every heap.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.free.clear();
        self.roots.fill(NIL);
    }

    #[cfg(test)]
    pub fn len(&self, owner: NodeId) -> usize {
        self.iter(owner).count()
    }

    #[cfg(test)]
    pub fn is_empty(&self, owner: NodeId) -> bool {
        self.roots[owner] == NIL
    }

    fn rank(&self, node: u32) -> u32 {
        if node == NIL {
            0
        } else {
            self.nodes[node as usize].rank
        }
    }

    fn key(&self, node: u32) -> f64 {
        self.nodes[node as usize].key
    }

    fn merge(&mut self, mut a: u32, mut b: u32) -> u32 {
        let mut root = NIL;
        let mut last = NIL;
        self.spine.clear();
        loop {
            if a == NIL || b == NIL {
                let rest = if a == NIL { b } else { a };
                if last == NIL {
                    root = rest;
                } else {
                    self.nodes[last as usize].right = rest;
                }
                break;
            }
            if self.key(b) < self.key(a) {
                std::mem::swap(&mut a, &mut b);
            }
            if last == NIL {
                root = a;
            } else {
                self.nodes[last as usize].right = a;
            }
            self.spine.push(a);
            last = a;
            a = self.nodes[a as usize].right;
        }

        while let Some(x) = self.spine.pop() {
            let node = self.nodes[x as usize];
            let (left, right) = if self.rank(node.left) < self.rank(node.right) {
                (node.right, node.left)
            } else {
                (node.left, node.right)
            };
            let rank = self.rank(right) + 1;
            let entry = &mut self.nodes[x as usize];
            entry.left = left;
            entry.right = right;
            entry.rank = rank;
        }
        root
    }

    /// Inserts `arc` with priority `key` into `owner`'s heap.
    pub fn insert(&mut self, owner: NodeId, arc: EdgeId, key: f64) {
        let node = HeapNode {
            key,
            arc,
            left: NIL,
            right: NIL,
            rank: 1,
        };
        let slot = match self.free.pop() {
            Some(slot) => {
                self.nodes[slot as usize] = node;
                slot
            }
            None => {
                self.nodes.push(node);
                (self.nodes.len() - 1) as u32
            }
        };
        self.roots[owner] = self.merge(self.roots[owner], slot);
    }

    /// Returns the cheapest entry of `owner`'s heap without removing it.
    #[cfg(test)]
    pub fn peek_min(&self, owner: NodeId) -> Option<(EdgeId, f64)> {
        let root = self.roots[owner];
        (root != NIL).then(|| {
            let node = self.nodes[root as usize];
            (node.arc, node.key)
        })
    }

    /// Removes and returns the cheapest entry of `owner`'s heap.
    pub fn pop_min(&mut self, owner: NodeId) -> Option<(EdgeId, f64)> {
        let root = self.roots[owner];
        if root == NIL {
            return None;
        }
        let node = self.nodes[root as usize];
        self.roots[owner] = self.merge(node.left, node.right);
        self.free.push(root);
        Some((node.arc, node.key))
    }

    /// Moves every entry of `from`'s heap into `into`'s heap.
    pub fn meld(&mut self, into: NodeId, from: NodeId) {
        if into == from || self.roots[from] == NIL {
            return;
        }
        self.roots[into] = self.merge(self.roots[into], self.roots[from]);
        self.roots[from] = NIL;
    }

    /// Iterates over the arcs in `owner`'s heap in no particular order.
    pub fn iter(&self, owner: NodeId) -> HeapIter<'_> {
        let mut stack = SmallVec::new();
        if self.roots[owner] != NIL {
            stack.push(self.roots[owner]);
        }
        HeapIter {
            forest: self,
            stack,
        }
    }
}

/// Iterator over the arcs of one heap.
pub struct HeapIter<'a> {
    forest: &'a HeapForest,
    stack: SmallVec<[u32; 32]>,
}

impl Iterator for HeapIter<'_> {
    type Item = EdgeId;

    fn next(&mut self) -> Option<EdgeId> {
        let top = self.stack.pop()?;
        let node = self.forest.nodes[top as usize];
        if node.left != NIL {
            self.stack.push(node.left);
        }
        if node.right != NIL {
            self.stack.push(node.right);
        }
        Some(node.arc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pop_in_key_order() {
        let mut heaps = HeapForest::try_new(2, 8).unwrap();
        for (arc, key) in [(0, 5.0), (2, 1.0), (4, 3.0), (6, 4.0), (8, 2.0)] {
            heaps.insert(0, arc, key);
        }
        assert_eq!(heaps.len(0), 5);
        assert_eq!(heaps.peek_min(0), Some((2, 1.0)));

        let order: Vec<_> = std::iter::from_fn(|| heaps.pop_min(0)).map(|(a, _)| a).collect();
        assert_eq!(order, vec![2, 8, 4, 6, 0]);
        assert!(heaps.is_empty(0));
        assert!(heaps.is_empty(1));
    }

    #[test]
    fn test_meld_moves_entries() {
        let mut heaps = HeapForest::try_new(3, 8).unwrap();
        heaps.insert(0, 10, 7.0);
        heaps.insert(0, 12, 2.0);
        heaps.insert(1, 14, 1.0);
        heaps.insert(1, 16, 9.0);

        heaps.meld(0, 1);
        assert!(heaps.is_empty(1));
        assert_eq!(heaps.len(0), 4);
        assert_eq!(heaps.pop_min(0), Some((14, 1.0)));
        assert_eq!(heaps.pop_min(0), Some((12, 2.0)));

        heaps.meld(2, 2);
        heaps.meld(2, 1);
        assert!(heaps.is_empty(2));
    }

    #[test]
    fn test_iter_visits_all() {
        let mut heaps = HeapForest::try_new(1, 4).unwrap();
        for arc in 0..20 {
            heaps.insert(0, arc, (arc % 7) as f64);
        }
        let mut arcs: Vec<_> = heaps.iter(0).collect();
        arcs.sort_unstable();
        assert_eq!(arcs, (0..20).collect::<Vec<_>>());
    }

    #[test]
    fn test_reinsert_reuses_slots() {
        let mut heaps = HeapForest::try_new(1, 2).unwrap();
        heaps.insert(0, 1, 1.0);
        heaps.insert(0, 3, 2.0);
        let (arc, key) = heaps.pop_min(0).unwrap();
        heaps.insert(0, arc, key);
        assert_eq!(heaps.nodes.len(), 2);
        assert_eq!(heaps.peek_min(0), Some((1, 1.0)));
    }

    #[test]
    fn test_full_capacity_without_growth() {
        let mut heaps = HeapForest::try_new(4, 16).unwrap();
        let sized = (
            heaps.nodes.capacity(),
            heaps.free.capacity(),
            heaps.spine.capacity(),
        );
        for arc in 0..16 {
            heaps.insert(arc % 4, arc, (16 - arc) as f64);
        }
        heaps.meld(0, 1);
        heaps.meld(2, 3);
        heaps.meld(0, 2);
        assert_eq!(heaps.len(0), 16);
        while let Some((arc, key)) = heaps.pop_min(0) {
            if arc % 2 == 0 {
                heaps.insert(1, arc, key);
            }
        }
        assert_eq!(heaps.len(1), 8);
        assert_eq!(
            (heaps.nodes.capacity(), heaps.free.capacity(), heaps.spine.capacity()),
            sized
        );
    }
}
