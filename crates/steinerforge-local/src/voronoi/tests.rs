//! Tests for the Voronoi diagram and its repair.

use steinerforge_core::ProblemVariant;

use super::*;

// Path 0 - 1 - 2 - 3 - 4 with unit costs plus a detour 0 - 5 - 4 of cost 3 each.
fn fixture() -> Graph {
    let mut graph = Graph::new(6, ProblemVariant::Steiner);
    for v in 0..4 {
        graph.add_edge(v, v + 1, 1.0).unwrap();
    }
    graph.add_edge(0, 5, 3.0).unwrap();
    graph.add_edge(5, 4, 3.0).unwrap();
    graph.set_root(0).unwrap();
    graph
}

fn active(graph: &Graph) -> ActiveSet {
    let mut active = ActiveSet::try_new(graph.node_count()).unwrap();
    active.reset(graph, 0);
    active
}

#[test]
fn test_compute_assigns_nearest_base() {
    let graph = fixture();
    let active = active(&graph);
    let mut voronoi = VoronoiDiagram::try_new(6).unwrap();
    voronoi.compute(
        &graph,
        graph.costs(),
        &[true, false, false, false, true, false],
        &active,
    );

    assert_eq!(voronoi.base(1), Some(0));
    assert_eq!(voronoi.base(3), Some(4));
    assert_eq!(voronoi.dist(2), 2.0);
    assert_eq!(voronoi.dist(5), 3.0);
    assert_eq!(voronoi.state(5), RegionState::Settled);

    let arcs: Vec<_> = voronoi.path_arcs(&graph, 2).collect();
    assert_eq!(arcs, vec![2, 0]);
}

#[test]
fn test_inactive_nodes_are_skipped() {
    let graph = fixture();
    let mut active = active(&graph);
    active.deactivate(2);
    let mut voronoi = VoronoiDiagram::try_new(6).unwrap();
    voronoi.compute(&graph, graph.costs(), &[false; 6], &active);
    assert_eq!(voronoi.base(0), None);

    let mut bases = [false; 6];
    bases[0] = true;
    voronoi.compute(&graph, graph.costs(), &bases, &active);
    assert_eq!(voronoi.base(2), None);
    assert_eq!(voronoi.base(3), Some(0));
    assert_eq!(voronoi.dist(3), 7.0);
}

#[test]
fn test_reset_repair_restore() {
    let graph = fixture();
    let active = active(&graph);
    let mut bases = [false; 6];
    bases[0] = true;
    bases[2] = true;
    bases[4] = true;
    let mut voronoi = VoronoiDiagram::try_new(6).unwrap();
    voronoi.compute(&graph, graph.costs(), &bases, &active);

    let mut regions = RegionLists::try_new(6).unwrap();
    for v in 0..6 {
        if let Some(b) = voronoi.base(v) {
            regions.push(b, v);
        }
    }
    let before: Vec<_> = (0..6).map(|v| (voronoi.base(v), voronoi.dist(v))).collect();

    // node 2's region is {1, 2, 3} or a subset of it; reset and repair it
    voronoi.reset_regions(&regions, &[2]);
    assert_eq!(voronoi.base(2), None);
    assert!(!voronoi.is_restored());

    voronoi.repair_preprocess(&graph, graph.costs(), &regions, &[2], &active);
    let mut uf = UnionFind::try_new(6).unwrap();
    let arc = voronoi
        .repair_single(&graph, graph.costs(), &active, &mut uf, 0)
        .unwrap();
    assert_ne!(voronoi.base(2), Some(2));
    assert_eq!(voronoi.dist(2), 2.0);

    // the cheapest arc separating the region of 0 from the region of 4
    let (tail_base, head_base) = (
        voronoi.base(graph.tail(arc)).unwrap(),
        voronoi.base(graph.head(arc)).unwrap(),
    );
    assert_ne!(tail_base == 0, head_base == 0);
    assert_eq!(voronoi.boundary_path_cost(&graph, graph.costs(), arc), 4.0);

    voronoi.restore();
    assert!(voronoi.is_restored());
    let after: Vec<_> = (0..6).map(|v| (voronoi.base(v), voronoi.dist(v))).collect();
    assert_eq!(before, after);
}

#[test]
fn test_repair_multi_collects_component_crossings() {
    let graph = fixture();
    let active = active(&graph);
    let mut bases = [false; 6];
    bases[0] = true;
    bases[2] = true;
    bases[4] = true;
    let mut voronoi = VoronoiDiagram::try_new(6).unwrap();
    voronoi.compute(&graph, graph.costs(), &bases, &active);
    let mut regions = RegionLists::try_new(6).unwrap();
    for v in 0..6 {
        if let Some(b) = voronoi.base(v) {
            regions.push(b, v);
        }
    }

    voronoi.reset_regions(&regions, &[2]);
    voronoi.repair_preprocess(&graph, graph.costs(), &regions, &[2], &active);
    let mut uf = UnionFind::try_new(6).unwrap();
    let mut is_supernode = [false; 6];
    is_supernode[4] = true;
    let mut found = Vec::new();
    voronoi.repair_multi(
        &graph,
        graph.costs(),
        &active,
        &mut uf,
        &is_supernode,
        &mut found,
    );

    assert!(!found.is_empty());
    for arc in found {
        let tail_base = voronoi.base(graph.tail(arc)).unwrap();
        let head_base = voronoi.base(graph.head(arc)).unwrap();
        assert_ne!(tail_base == 4, head_base == 4);
    }
}
