//! Grid graphs.

use steinerforge_core::{Graph, NodeId, ProblemVariant};

/// Node index of cell `(row, col)` in a grid with `cols` columns.
pub fn cell(cols: usize, row: usize, col: usize) -> NodeId {
    row * cols + col
}

/// Builds a `rows × cols` grid whose edge costs come from `cost(u, v)`.
///
/// The four corners are terminals; the top-left corner is the root.
///
/// # Example
///
/// ```
/// use steinerforge_test::grid::grid;
///
/// let graph = grid(3, 4, |_, _| 1.0);
/// assert_eq!(graph.node_count(), 12);
/// assert_eq!(graph.edge_count(), 17);
/// assert_eq!(graph.terminal_count(), 4);
/// ```
pub fn grid(rows: usize, cols: usize, cost: impl Fn(NodeId, NodeId) -> f64) -> Graph {
    let mut graph = Graph::new(rows * cols, ProblemVariant::Steiner);
    for row in 0..rows {
        for col in 0..cols {
            let u = cell(cols, row, col);
            if col + 1 < cols {
                let v = cell(cols, row, col + 1);
                graph.add_edge(u, v, cost(u, v)).expect("grid edge is valid");
            }
            if row + 1 < rows {
                let v = cell(cols, row + 1, col);
                graph.add_edge(u, v, cost(u, v)).expect("grid edge is valid");
            }
        }
    }
    if rows > 0 && cols > 0 {
        let corners = [
            cell(cols, 0, 0),
            cell(cols, 0, cols - 1),
            cell(cols, rows - 1, 0),
            cell(cols, rows - 1, cols - 1),
        ];
        for t in corners {
            graph.set_terminal(t).expect("corner in range");
        }
        graph.set_root(corners[0]).expect("corner in range");
    }
    graph
}
