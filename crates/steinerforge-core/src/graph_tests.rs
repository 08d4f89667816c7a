//! Tests for graph construction.

use super::*;

fn triangle() -> Graph {
    let mut graph = Graph::new(3, ProblemVariant::Steiner);
    graph.add_edge(0, 1, 1.0).unwrap();
    graph.add_edge(1, 2, 2.0).unwrap();
    graph.add_edge(2, 0, 4.0).unwrap();
    graph.set_root(0).unwrap();
    graph
}

#[test]
fn test_arc_pairs() {
    let graph = triangle();
    assert_eq!(graph.arc_count(), 6);
    assert_eq!(graph.edge_count(), 3);
    for e in 0..graph.arc_count() {
        assert_eq!(graph.tail(e), graph.head(flip(e)));
        assert_eq!(graph.cost(e), graph.cost(flip(e)));
    }
    assert_eq!(graph.out_arcs(0), &[0, 5]);
}

#[test]
fn test_find_arc() {
    let graph = triangle();
    assert_eq!(graph.find_arc(1, 2), Some(2));
    assert_eq!(graph.find_arc(2, 1), Some(3));
    assert_eq!(graph.find_arc(0, 0), None);
}

#[test]
fn test_root_is_terminal() {
    let graph = triangle();
    assert_eq!(graph.root(), Ok(0));
    assert!(graph.is_terminal(0));
    assert_eq!(graph.terminal_count(), 1);
}

#[test]
fn test_invalid_edges() {
    let mut graph = Graph::new(2, ProblemVariant::Steiner);
    assert_eq!(graph.add_edge(0, 0, 1.0), Err(GraphError::SelfLoop(0)));
    assert_eq!(
        graph.add_edge(0, 5, 1.0),
        Err(GraphError::NodeOutOfRange { node: 5, count: 2 })
    );
    assert!(matches!(
        graph.add_edge(0, 1, -1.0),
        Err(GraphError::InvalidCost { .. })
    ));
    assert_eq!(graph.root(), Err(GraphError::MissingRoot));
}

#[test]
fn test_weights() {
    let mut graph = Graph::new(3, ProblemVariant::MaximumWeight);
    graph.set_root(0).unwrap();
    graph.set_weight(0, 1.0).unwrap();
    graph.set_weight(1, 5.0).unwrap();
    graph.set_weight(2, -2.0).unwrap();
    assert!(graph.is_terminal(0));
    assert!(graph.is_potential_terminal(1));
    assert_eq!(graph.kind(2), NodeKind::Steiner);
    assert_eq!(graph.prize(2), -2.0);
}
