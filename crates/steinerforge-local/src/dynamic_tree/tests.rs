//! Tests for the link-cut tree.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::*;

/// Parent-pointer forest used as a reference.
struct NaiveForest {
    parent: Vec<Option<(NodeId, EdgeId, f64)>>,
}

impl NaiveForest {
    fn new(n: usize) -> Self {
        Self {
            parent: vec![None; n],
        }
    }

    fn root_of(&self, mut v: NodeId) -> NodeId {
        while let Some((p, _, _)) = self.parent[v] {
            v = p;
        }
        v
    }

    fn evert(&mut self, v: NodeId) {
        let mut prev: Option<(NodeId, EdgeId, f64)> = None;
        let mut cur = v;
        loop {
            let up = self.parent[cur];
            self.parent[cur] = prev;
            match up {
                Some((p, arc, cost)) => {
                    prev = Some((cur, flip(arc), cost));
                    cur = p;
                }
                None => break,
            }
        }
    }

    fn max_cost(&self, mut v: NodeId) -> Option<f64> {
        let mut best: Option<f64> = None;
        while let Some((p, _, cost)) = self.parent[v] {
            best = Some(best.map_or(cost, |b: f64| b.max(cost)));
            v = p;
        }
        best
    }
}

#[test]
fn test_link_and_cut() {
    let mut tree = DynamicTree::try_new(4).unwrap();
    tree.link(1, 0, 11, 1.0);
    tree.link(2, 1, 21, 2.0);
    tree.link(3, 1, 31, 3.0);

    assert_eq!(tree.parent(3), Some(1));
    assert_eq!(tree.parent_edge(2), Some(21));
    assert_eq!(tree.root_of(3), 0);
    assert_eq!(tree.path_to_root(2), vec![2, 1, 0]);

    assert_eq!(tree.cut(1), Some(11));
    assert_eq!(tree.parent(1), None);
    assert_eq!(tree.root_of(3), 1);
    assert_eq!(tree.root_of(0), 0);
    assert_eq!(tree.cut(0), None);
}

#[test]
fn test_evert_flips_parent_edges() {
    let mut tree = DynamicTree::try_new(3).unwrap();
    // arcs 0: 0 -> 1, 2: 1 -> 2 and their flips
    tree.link(1, 0, 1, 1.0);
    tree.link(2, 1, 3, 1.0);
    tree.evert(2);

    assert_eq!(tree.parent(2), None);
    assert_eq!(tree.parent_edge(1), Some(2));
    assert_eq!(tree.parent_edge(0), Some(0));
}

#[test]
fn test_find_max_cost() {
    let mut tree = DynamicTree::try_new(5).unwrap();
    tree.link(1, 0, 1, 2.0);
    tree.link(2, 1, 3, 7.0);
    tree.link(3, 2, 5, 3.0);
    tree.link(4, 3, 7, 1.0);

    assert_eq!(tree.find_max_cost_on_path_to_root(4), Some((2, 3)));
    assert_eq!(tree.find_max_cost_on_path_to_root(1), Some((1, 1)));
    assert_eq!(tree.find_max_cost_on_path_to_root(0), None);

    tree.evert(4);
    assert_eq!(tree.find_max_cost_on_path_to_root(0), Some((1, 2)));
}

#[test]
fn test_cut_between() {
    let mut tree = DynamicTree::try_new(3).unwrap();
    tree.link(1, 0, 1, 1.0);
    tree.link(2, 1, 3, 1.0);
    assert_eq!(tree.cut_between(1, 2), Some(3));
    assert_eq!(tree.cut_between(0, 2), None);
    assert_eq!(tree.cut_between(0, 1), Some(1));
}

#[test]
fn test_edge_slots_are_recycled() {
    let mut tree = DynamicTree::try_new(2).unwrap();
    for round in 0..10 {
        tree.link(1, 0, 1, round as f64);
        assert_eq!(tree.find_max_cost_on_path_to_root(1), Some((1, 1)));
        assert_eq!(tree.cut(1), Some(1));
    }
    assert_eq!(tree.nodes.len(), 4);
}

#[test]
fn test_min_prize_chain() {
    // path 5 - 4 - 3 - 2 - 1 - 0, root 0
    let mut tree = DynamicTree::try_new(6).unwrap();
    for v in 1..6 {
        tree.link(v, v - 1, 2 * v + 1, 1.0);
    }
    let weight = [0.0, -1.0, 3.0, -2.0, -4.0, 0.0];
    let eligible = |v: NodeId| v != 2;

    let chain = tree.find_min_prize_chain(5, &weight, eligible).unwrap();
    assert_eq!(chain.nodes, vec![4, 3]);
    assert_eq!(chain.below, 5);
    assert_eq!(chain.top, 3);
    assert_eq!(chain.above, 2);
    assert_eq!(chain.weight, -6.0);

    assert_eq!(tree.find_min_prize_chain(1, &weight, eligible), None);
}

#[test]
fn test_random_against_naive() {
    let n = 24;
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let mut tree = DynamicTree::try_new(n).unwrap();
    let mut naive = NaiveForest::new(n);
    let mut next_arc = 0;

    for _ in 0..3000 {
        let a = rng.random_range(0..n);
        let b = rng.random_range(0..n);
        match rng.random_range(0..4) {
            0 | 1 if naive.root_of(a) != naive.root_of(b) => {
                let cost = rng.random_range(0..1000) as f64;
                tree.link(a, b, next_arc, cost);
                naive.evert(a);
                naive.parent[a] = Some((b, next_arc, cost));
                next_arc += 2;
            }
            2 => {
                let expected = naive.parent[a].map(|(_, arc, _)| arc);
                assert_eq!(tree.cut(a), expected);
                naive.parent[a] = None;
            }
            _ => {
                tree.evert(a);
                naive.evert(a);
            }
        }

        let v = rng.random_range(0..n);
        assert_eq!(tree.parent(v), naive.parent[v].map(|(p, _, _)| p));
        assert_eq!(tree.parent_edge(v), naive.parent[v].map(|(_, arc, _)| arc));
        assert_eq!(tree.root_of(v), naive.root_of(v));
        let max = tree
            .find_max_cost_on_path_to_root(v)
            .map(|(child, _)| naive.parent[child].map(|(_, _, c)| c).unwrap());
        assert_eq!(max, naive.max_cost(v));
    }
}
