//! Tests for solution validation and objective values.

use super::*;

// 0 - 1 - 2 with a chord 0 - 2; root 0, terminal 2, node 1 carries a prize
fn path_with_chord(variant: ProblemVariant) -> Graph {
    let mut graph = Graph::new(3, variant);
    graph.add_edge(0, 1, 1.0).unwrap();
    graph.add_edge(1, 2, 1.0).unwrap();
    graph.add_edge(0, 2, 3.0).unwrap();
    graph.set_root(0).unwrap();
    graph.set_terminal(2).unwrap();
    graph
}

fn select(graph: &Graph, arcs: &[EdgeId]) -> Vec<EdgeState> {
    let mut edges = vec![EdgeState::Unknown; graph.arc_count()];
    for &e in arcs {
        edges[e] = EdgeState::Connect;
    }
    edges
}

#[test]
fn test_valid_solution() {
    let graph = path_with_chord(ProblemVariant::Steiner);
    let edges = select(&graph, &[0, 2]);
    assert_eq!(validate_solution(&graph, &edges), Ok(()));
    assert_eq!(objective(&graph, &edges), 2.0);
    assert_eq!(solution_nodes(&graph, &edges), vec![true, true, true]);
}

#[test]
fn test_wrong_orientation() {
    let graph = path_with_chord(ProblemVariant::Steiner);
    // 2 → 0 points into the root
    let edges = select(&graph, &[5]);
    assert_eq!(
        validate_solution(&graph, &edges),
        Err(SolutionError::RootHasParent(0))
    );
}

#[test]
fn test_both_orientations() {
    let graph = path_with_chord(ProblemVariant::Steiner);
    let edges = select(&graph, &[2, 3]);
    assert_eq!(
        validate_solution(&graph, &edges),
        Err(SolutionError::BothOrientations(1))
    );
}

#[test]
fn test_multiple_parents() {
    let graph = path_with_chord(ProblemVariant::Steiner);
    let edges = select(&graph, &[0, 2, 4]);
    assert_eq!(
        validate_solution(&graph, &edges),
        Err(SolutionError::MultipleParents(2))
    );
}

#[test]
fn test_unreachable_and_missing() {
    let graph = path_with_chord(ProblemVariant::Steiner);
    // 1 → 2 without a path from the root
    let edges = select(&graph, &[2]);
    assert_eq!(
        validate_solution(&graph, &edges),
        Err(SolutionError::Unreachable(2))
    );

    let edges = select(&graph, &[0]);
    assert_eq!(
        validate_solution(&graph, &edges),
        Err(SolutionError::MissingTerminal(2))
    );

    assert_eq!(
        validate_solution(&graph, &[]),
        Err(SolutionError::LengthMismatch {
            expected: 6,
            actual: 0
        })
    );
}

#[test]
fn test_prize_collecting_objective() {
    let mut graph = path_with_chord(ProblemVariant::PrizeCollecting);
    graph.set_potential_terminal(1, 7.0).unwrap();

    let through = select(&graph, &[0, 2]);
    let chord = select(&graph, &[4]);
    assert_eq!(objective(&graph, &through), 2.0);
    assert_eq!(objective(&graph, &chord), 10.0);
}

#[test]
fn test_maximum_weight_objective() {
    let mut graph = path_with_chord(ProblemVariant::MaximumWeight);
    graph.set_weight(0, 2.0).unwrap();
    graph.set_weight(1, -1.0).unwrap();
    graph.set_weight(2, 4.0).unwrap();

    assert_eq!(objective(&graph, &select(&graph, &[0, 2])), -5.0);
    assert_eq!(objective(&graph, &select(&graph, &[4])), -6.0);
    assert_eq!(objective(&graph, &select(&graph, &[])), -2.0);
}
