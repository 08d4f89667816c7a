use steinerforge_core::objective;

use super::*;

fn connect(graph: &Graph, arcs: &[EdgeId]) -> Vec<EdgeState> {
    let mut edges = vec![EdgeState::Unknown; graph.arc_count()];
    for &e in arcs {
        edges[e] = EdgeState::Connect;
    }
    edges
}

fn selected(edges: &[EdgeState]) -> Vec<EdgeId> {
    (0..edges.len())
        .filter(|&e| edges[e] == EdgeState::Connect)
        .collect()
}

#[test]
fn test_spanning_tree_replaces_expensive_path() {
    let mut graph = Graph::new(4, ProblemVariant::Steiner);
    graph.add_edge(0, 1, 5.0).unwrap();
    graph.add_edge(1, 2, 5.0).unwrap();
    graph.add_edge(0, 2, 2.0).unwrap();
    graph.add_edge(0, 3, 1.0).unwrap();
    graph.set_root(0).unwrap();
    graph.set_terminal(2).unwrap();

    let mut edges = connect(&graph, &[0, 2]);
    let mut pruner = Pruner::try_new(&graph).unwrap();
    pruner.prune(&graph, &mut edges).unwrap();

    assert_eq!(selected(&edges), vec![4]);
    assert_eq!(objective(&graph, &edges), 2.0);
    assert!(!pruner.nodes()[1]);
}

#[test]
fn test_prize_collecting_leaves() {
    let mut graph = Graph::new(3, ProblemVariant::PrizeCollecting);
    graph.add_edge(0, 1, 5.0).unwrap();
    graph.add_edge(0, 2, 5.0).unwrap();
    graph.set_root(0).unwrap();
    graph.set_potential_terminal(1, 3.0).unwrap();
    graph.set_potential_terminal(2, 10.0).unwrap();

    let mut edges = connect(&graph, &[0, 2]);
    let before = objective(&graph, &edges);
    prune_solution(&graph, &mut edges).unwrap();

    assert_eq!(selected(&edges), vec![2]);
    assert!(objective(&graph, &edges) < before);
}

#[test]
fn test_maximum_weight_leaves() {
    let mut graph = Graph::new(4, ProblemVariant::MaximumWeight);
    graph.add_edge(0, 1, 0.0).unwrap();
    graph.add_edge(0, 3, 0.0).unwrap();
    graph.add_edge(3, 2, 0.0).unwrap();
    graph.set_root(0).unwrap();
    graph.set_weight(1, -2.0).unwrap();
    graph.set_weight(3, -1.0).unwrap();
    graph.set_weight(2, 4.0).unwrap();

    let mut edges = connect(&graph, &[0, 2, 4]);
    prune_solution(&graph, &mut edges).unwrap();
    assert_eq!(selected(&edges), vec![2, 4]);
}

#[test]
fn test_disconnected_node_set() {
    let mut graph = Graph::new(3, ProblemVariant::Steiner);
    graph.add_edge(0, 1, 1.0).unwrap();
    graph.add_edge(1, 2, 1.0).unwrap();
    graph.set_root(0).unwrap();
    graph.set_terminal(2).unwrap();

    let mut edges = connect(&graph, &[0, 2]);
    let mut pruner = Pruner::try_new(&graph).unwrap();
    let err = pruner
        .prune_node_set(&graph, &[true, false, true], &mut edges)
        .unwrap_err();
    assert_eq!(err, PruneError::Disconnected(2));
    assert_eq!(selected(&edges), vec![0, 2]);
}

#[test]
fn test_prune_is_idempotent() {
    let mut graph = Graph::new(5, ProblemVariant::Steiner);
    graph.add_edge(0, 1, 2.0).unwrap();
    graph.add_edge(1, 2, 2.0).unwrap();
    graph.add_edge(1, 3, 1.0).unwrap();
    graph.add_edge(3, 4, 1.0).unwrap();
    graph.add_edge(2, 4, 1.0).unwrap();
    graph.set_root(0).unwrap();
    graph.set_terminal(2).unwrap();
    graph.set_terminal(4).unwrap();

    let mut edges = connect(&graph, &[0, 2, 6, 4]);
    let mut pruner = Pruner::try_new(&graph).unwrap();
    pruner.prune(&graph, &mut edges).unwrap();
    let once = edges.clone();
    pruner.prune(&graph, &mut edges).unwrap();
    assert_eq!(edges, once);
}
