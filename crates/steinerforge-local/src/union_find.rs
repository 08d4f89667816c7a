//! Union-find over nodes with a caller-chosen representative.

use std::collections::TryReserveError;

use steinerforge_core::NodeId;

use crate::scratch::try_filled;

/// Disjoint sets with path compression.
///
/// [`union_into`](Self::union_into) keeps the representative of its first
/// argument, which lets callers address a component by a fixed node.
#[derive(Debug, Clone)]
pub struct UnionFind {
    parent: Vec<NodeId>,
}

impl UnionFind {
    /// Creates `len` singleton sets.
    pub fn try_new(len: usize) -> Result<Self, TryReserveError> {
        let mut parent = try_filled(0, len)?;
        for (i, p) in parent.iter_mut().enumerate() {
            *p = i;
        }
        Ok(Self { parent })
    }

    /// Returns the representative of `x`'s set.
    pub fn find(&mut self, x: NodeId) -> NodeId {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        let mut cur = x;
        while self.parent[cur] != root {
            let next = self.parent[cur];
            self.parent[cur] = root;
            cur = next;
        }
        root
    }

    /// Merges `other`'s set into `keep`'s set; `keep`'s representative survives.
    pub fn union_into(&mut self, keep: NodeId, other: NodeId) {
        let keep_root = self.find(keep);
        let other_root = self.find(other);
        if keep_root != other_root {
            self.parent[other_root] = keep_root;
        }
    }

    pub fn same(&mut self, a: NodeId, b: NodeId) -> bool {
        self.find(a) == self.find(b)
    }

    /// Turns every element back into a singleton.
    pub fn clear(&mut self) {
        for (i, p) in self.parent.iter_mut().enumerate() {
            *p = i;
        }
    }

    /// Returns `true` if every element is a singleton.
    #[cfg(test)]
    pub fn is_clear(&self) -> bool {
        self.parent.iter().enumerate().all(|(i, &p)| i == p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_union_keeps_first_representative() {
        let mut uf = UnionFind::try_new(5).unwrap();
        uf.union_into(3, 1);
        uf.union_into(3, 4);
        assert_eq!(uf.find(1), 3);
        assert_eq!(uf.find(4), 3);

        uf.union_into(0, 4);
        assert_eq!(uf.find(3), 0);
        assert_eq!(uf.find(1), 0);
        assert!(!uf.same(2, 0));
    }

    #[test]
    fn test_clear() {
        let mut uf = UnionFind::try_new(4).unwrap();
        uf.union_into(0, 1);
        uf.union_into(2, 3);
        assert!(!uf.is_clear());
        uf.clear();
        assert!(uf.is_clear());
        assert_eq!(uf.find(1), 1);
    }

    #[test]
    fn test_long_chain_compresses() {
        let mut uf = UnionFind::try_new(1000).unwrap();
        for i in 1..1000 {
            uf.union_into(i, i - 1);
        }
        assert_eq!(uf.find(0), 999);
        assert_eq!(uf.parent[0], 999);
    }
}
