//! End-to-end local search runs on fixture and random instances.

use steinerforge::{
    improve, improve_with, objective, validate_solution, EdgeState, Graph, LocalSearchConfig,
    MoveConfig, ProblemVariant,
};
use steinerforge_test::grid::grid;
use steinerforge_test::scenarios::{
    path_no_op, selected_arcs, shared_prize, star_with_shortcut, two_hubs,
};
use steinerforge_test::{shortest_path_tree, RandomInstance};

fn assert_sound(graph: &Graph, input: &[EdgeState], output: &[EdgeState], improved: bool) {
    assert!(validate_solution(graph, output).is_ok());
    let before = objective(graph, input);
    let after = objective(graph, output);
    if improved {
        assert!(after < before - 1e-9, "{after} is not below {before}");
    } else {
        assert_eq!(input, output);
    }
}

#[test]
fn test_optimal_path_unchanged() {
    let mut instance = path_no_op();
    let input = instance.edges.clone();

    let outcome = improve(&instance.graph, &mut instance.edges).unwrap();
    assert!(!outcome.improved);
    assert_eq!(outcome.final_objective, 3.0);
    assert_eq!(instance.edges, input);
}

#[test]
fn test_star_improves_to_shortcut() {
    let mut instance = star_with_shortcut();

    let outcome = improve(&instance.graph, &mut instance.edges).unwrap();
    assert!(outcome.improved);
    assert_eq!(outcome.initial_objective, 15.0);
    assert_eq!(outcome.final_objective, 11.0);
    assert!(validate_solution(&instance.graph, &instance.edges).is_ok());
    assert!(selected_arcs(&instance.edges).contains(&6));
}

#[test]
fn test_shared_prize_counted_once() {
    let mut instance = shared_prize();

    let outcome = improve(&instance.graph, &mut instance.edges).unwrap();
    assert!(outcome.improved);
    assert_eq!(outcome.final_objective, 5.0);
    assert_eq!(objective(&instance.graph, &instance.edges), outcome.final_objective);
}

#[test]
fn test_cheap_hub_found() {
    let mut instance = two_hubs();

    let outcome = improve(&instance.graph, &mut instance.edges).unwrap();
    assert_eq!(outcome.final_objective, 3.0);
    assert_eq!(selected_arcs(&instance.edges), vec![6, 8, 10]);
}

#[test]
fn test_improved_solution_is_stable() {
    for mut instance in [star_with_shortcut(), two_hubs()] {
        improve(&instance.graph, &mut instance.edges).unwrap();
        let first = instance.edges.clone();

        let outcome = improve(&instance.graph, &mut instance.edges).unwrap();
        assert!(!outcome.improved);
        assert_eq!(instance.edges, first);
    }
}

#[test]
fn test_exchange_only_configuration() {
    let config = LocalSearchConfig::from_yaml_str(
        "moves:\n  vertex_insertion: false\n  key_vertex_elimination: false\n",
    )
    .unwrap();
    assert!(config.moves.key_path_exchange);

    let mut instance = two_hubs();
    let outcome = improve_with(&instance.graph, &mut instance.edges, config).unwrap();
    assert_eq!(outcome.final_objective, 3.0);
    assert_eq!(outcome.stats.eliminations_evaluated, 0);
}

#[test]
fn test_random_steiner_instances() {
    let params = RandomInstance::new(40, ProblemVariant::Steiner).with_extra_edges(60);
    for seed in 0..20 {
        let graph = params.generate(seed);
        let input = shortest_path_tree(&graph);
        let mut edges = input.clone();

        let outcome = improve(&graph, &mut edges).unwrap();
        assert_sound(&graph, &input, &edges, outcome.improved);
        assert!(outcome.final_objective <= outcome.initial_objective);
        assert!((objective(&graph, &edges) - outcome.final_objective).abs() < 1e-9);
    }
}

#[test]
fn test_random_prize_collecting_instances() {
    let params = RandomInstance::new(30, ProblemVariant::PrizeCollecting).with_prized(10);
    for seed in 100..115 {
        let graph = params.generate(seed);
        let input = shortest_path_tree(&graph);
        let mut edges = input.clone();

        let outcome = improve(&graph, &mut edges).unwrap();
        assert_sound(&graph, &input, &edges, outcome.improved);
    }
}

#[test]
fn test_random_maximum_weight_instances() {
    let params = RandomInstance::new(30, ProblemVariant::MaximumWeight).with_prized(8);
    for seed in 200..215 {
        let graph = params.generate(seed);
        let input = shortest_path_tree(&graph);
        let mut edges = input.clone();

        let outcome = improve(&graph, &mut edges).unwrap();
        assert_sound(&graph, &input, &edges, outcome.improved);
        assert_eq!(outcome.stats.passes, 0);
    }
}

#[test]
fn test_second_run_never_worse() {
    let params = RandomInstance::new(50, ProblemVariant::Steiner).with_terminals(12);
    for seed in 300..310 {
        let graph = params.generate(seed);
        let mut edges = shortest_path_tree(&graph);
        let first = improve(&graph, &mut edges).unwrap();
        let second = improve(&graph, &mut edges).unwrap();
        assert!(second.final_objective <= first.final_objective);
        assert!(validate_solution(&graph, &edges).is_ok());
    }
}

#[test]
fn test_grid_with_moves_disabled_only_prunes() {
    let graph = grid(4, 4, |u, v| 1.0 + ((u + v) % 3) as f64);
    let input = shortest_path_tree(&graph);
    let mut edges = input.clone();
    let config = LocalSearchConfig::default().with_moves(MoveConfig {
        vertex_insertion: false,
        key_vertex_elimination: false,
        key_path_exchange: false,
    });

    let outcome = improve_with(&graph, &mut edges, config).unwrap();
    assert_sound(&graph, &input, &edges, outcome.improved);
    assert_eq!(outcome.stats.moves_evaluated(), 0);
}
