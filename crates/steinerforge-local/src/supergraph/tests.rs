use steinerforge_core::ProblemVariant;

use super::*;

/// Root `a`, terminals `b` and `d`, and an off-tree potential terminal `p`
/// adjacent to all three.
fn hub_instance(prize: f64) -> (Graph, ActiveSet, VoronoiDiagram) {
    let mut graph = Graph::new(4, ProblemVariant::PrizeCollecting);
    graph.add_edge(0, 3, 1.0).unwrap();
    graph.add_edge(3, 1, 2.0).unwrap();
    graph.add_edge(3, 2, 2.0).unwrap();
    graph.set_root(0).unwrap();
    graph.set_terminal(1).unwrap();
    graph.set_terminal(2).unwrap();
    graph.set_potential_terminal(3, prize).unwrap();

    let mut active = ActiveSet::try_new(4).unwrap();
    active.reset(&graph, 0);
    let mut voronoi = VoronoiDiagram::try_new(4).unwrap();
    voronoi.compute(&graph, graph.costs(), &[true, true, true, false], &active);
    (graph, active, voronoi)
}

#[test]
fn test_shared_paths_priced_once() {
    let (graph, active, voronoi) = hub_instance(10.0);
    assert_eq!(voronoi.base(3), Some(0));

    let in_tree = [true, true, true, false];
    let pricing = PathPricing {
        graph: &graph,
        cost: graph.costs(),
        voronoi: &voronoi,
        in_tree: &in_tree,
        active: &active,
    };
    let mut stamp = EdgeStamp::try_new(graph.edge_count()).unwrap();
    let mut ledger = PrizeLedger::try_new(4).unwrap();

    let total = pricing.price([2, 4], &mut stamp, &mut ledger);
    assert!((total - (-5.0)).abs() < 1e-12);
    assert!(ledger.is_clear());

    let single = pricing.price([2], &mut stamp, &mut ledger);
    assert!((single - (-7.0)).abs() < 1e-12);
}

#[test]
fn test_mst_connects_children_to_root() {
    let (graph, _active, voronoi) = hub_instance(10.0);
    let mut uf = UnionFind::try_new(4).unwrap();
    let mut supernodes = SupernodeSet::try_new(4).unwrap();
    supernodes.push_child(1);
    supernodes.push_child(2);
    supernodes.set_root(0);
    assert_eq!(supernodes.children(), &[1, 2]);
    assert_eq!(supernodes.root(), Some(0));
    assert!(!supernodes.is_supernode(0));

    let mut mst = SupergraphMst::try_new(graph.node_count(), graph.arc_count()).unwrap();
    assert!(mst.compute(&graph, graph.costs(), &voronoi, &mut uf, &supernodes, &[2, 4]));
    assert_eq!(mst.arcs, vec![2, 4]);
}

#[test]
fn test_mst_reports_unreachable_component() {
    let (graph, _active, voronoi) = hub_instance(10.0);
    let mut uf = UnionFind::try_new(4).unwrap();
    let mut supernodes = SupernodeSet::try_new(4).unwrap();
    supernodes.push_child(1);
    supernodes.push_child(2);
    supernodes.set_root(0);

    let mut mst = SupergraphMst::try_new(graph.node_count(), graph.arc_count()).unwrap();
    assert!(!mst.compute(&graph, graph.costs(), &voronoi, &mut uf, &supernodes, &[2]));
}

fn capacities(mst: &SupergraphMst) -> [usize; 9] {
    [
        mst.arcs.capacity(),
        mst.links.capacity(),
        mst.offsets.capacity(),
        mst.cursor.capacity(),
        mst.adjacency.capacity(),
        mst.best.capacity(),
        mst.entry.capacity(),
        mst.done.capacity(),
        mst.queue.capacity(),
    ]
}

#[test]
fn test_mst_does_not_grow_buffers() {
    let (graph, _active, voronoi) = hub_instance(10.0);
    let mut uf = UnionFind::try_new(4).unwrap();
    let mut supernodes = SupernodeSet::try_new(4).unwrap();
    supernodes.push_child(1);
    supernodes.push_child(2);
    supernodes.set_root(0);

    let mut mst = SupergraphMst::try_new(graph.node_count(), graph.arc_count()).unwrap();
    let sized = capacities(&mst);
    let boundary: Vec<EdgeId> = (0..graph.arc_count()).collect();
    for _ in 0..3 {
        assert!(mst.compute(&graph, graph.costs(), &voronoi, &mut uf, &supernodes, &boundary));
        assert_eq!(capacities(&mst), sized);
    }
}

#[test]
fn test_supernode_set_clear() {
    let mut supernodes = SupernodeSet::try_new(5).unwrap();
    supernodes.push_child(3);
    supernodes.push_child(3);
    supernodes.set_root(1);
    assert_eq!(supernodes.len(), 2);
    supernodes.clear();
    assert_eq!(supernodes.len(), 0);
    assert!(!supernodes.is_supernode(3));
    assert_eq!(supernodes.root(), None);
}

#[test]
fn test_edge_stamp_generations() {
    let mut stamp = EdgeStamp::try_new(3).unwrap();
    stamp.next_generation();
    assert!(stamp.claim(4));
    assert!(!stamp.claim(5));
    assert!(stamp.claim(0));
    stamp.next_generation();
    assert!(stamp.claim(5));
}
