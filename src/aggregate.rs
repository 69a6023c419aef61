//! Node-level aggregation of a sparse mosaic
//!
//! Ranks map to compute nodes by integer division: node `s / node_ranks`,
//! slot `s % node_ranks`. A single traversal of the mosaic fills two parallel
//! accumulators, one for on-node traffic and one for all traffic.

use crate::mosaic::Mosaic;

/// Per-node accumulator: one value slot per rank within the node
///
/// Nodes grow on demand with all-zero rows of fixed width `node_ranks`,
/// including intermediate nodes that never see traffic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeAccumulator {
    nodes: Vec<Vec<f64>>,
    width: usize,
}

impl NodeAccumulator {
    pub fn new(width: usize) -> Self {
        Self {
            nodes: Vec::new(),
            width,
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Ranks per node
    pub fn width(&self) -> usize {
        self.width
    }

    /// Slot values for a node (empty for nodes beyond the current length)
    pub fn slots(&self, node: usize) -> &[f64] {
        self.nodes.get(node).map_or(&[], Vec::as_slice)
    }

    /// Iterate (node index, slot values) in increasing node order
    pub fn iter(&self) -> impl Iterator<Item = (usize, &[f64])> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .map(|(node, slots)| (node, slots.as_slice()))
    }

    /// Grow to hold `node`, filling gaps with all-zero rows
    fn ensure_node(&mut self, node: usize) {
        if node >= self.nodes.len() {
            let width = self.width;
            self.nodes.resize_with(node + 1, || vec![0.0; width]);
        }
    }

    fn add(&mut self, node: usize, slot: usize, value: f64) {
        self.ensure_node(node);
        self.nodes[node][slot] += value;
    }
}

/// Fold a mosaic into (on-node, total-node) accumulators
///
/// Every metric lands in the total for its source's (node, slot); metrics
/// whose destination maps to the same node additionally land in the on-node
/// accumulator, so `onnode[n][r] <= totnode[n][r]` holds for non-negative
/// metrics. Rows grow only when a source actually carries traffic, and both
/// accumulators grow in lockstep.
pub fn aggregate(mosaic: &Mosaic, node_ranks: usize) -> (NodeAccumulator, NodeAccumulator) {
    debug_assert!(node_ranks > 0, "node_ranks must be positive");

    let mut onnode = NodeAccumulator::new(node_ranks);
    let mut totnode = NodeAccumulator::new(node_ranks);

    for (source, pairs) in mosaic.iter() {
        let source_node = source / node_ranks;
        let source_slot = source % node_ranks;

        for &(dest, metric) in pairs {
            let dest_node = dest / node_ranks;
            onnode.ensure_node(source_node);
            totnode.add(source_node, source_slot, metric);
            if dest_node == source_node {
                onnode.add(source_node, source_slot, metric);
            }
        }
    }

    tracing::debug!(nodes = totnode.node_count(), "aggregation complete");
    (onnode, totnode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mosaic::read_mosaic;
    use std::io::Cursor;

    fn mosaic_from(lines: &str) -> Mosaic {
        read_mosaic(Cursor::new(format!("hdr\n{lines}")), 2, false).unwrap()
    }

    #[test]
    fn test_reference_scenario() {
        // Node 0 holds ranks 0,1 (both on-node); node 1 holds rank 2->3
        let mosaic = mosaic_from("0,1,5.0\n1,0,3.0\n2,3,7.0\n");
        let (onnode, totnode) = aggregate(&mosaic, 2);

        assert_eq!(totnode.slots(0), &[5.0, 3.0]);
        assert_eq!(onnode.slots(0), &[5.0, 3.0]);
        assert_eq!(totnode.slots(1), &[7.0, 0.0]);
        assert_eq!(onnode.slots(1), &[7.0, 0.0]);
    }

    #[test]
    fn test_off_node_traffic_excluded_from_onnode() {
        // Rank 0 sends to rank 2 (node 1): counted in total, not on-node
        let mosaic = mosaic_from("0,1,4.0\n0,2,6.0\n");
        let (onnode, totnode) = aggregate(&mosaic, 2);

        assert_eq!(totnode.slots(0), &[10.0, 0.0]);
        assert_eq!(onnode.slots(0), &[4.0, 0.0]);
    }

    #[test]
    fn test_onnode_le_totnode_invariant() {
        let mosaic = mosaic_from("0,1,4.0\n0,2,6.0\n1,1,1.5\n3,0,2.0\n5,5,9.0\n");
        let (onnode, totnode) = aggregate(&mosaic, 2);

        for (node, totals) in totnode.iter() {
            let on = onnode.slots(node);
            for (slot, &total) in totals.iter().enumerate() {
                assert!(on[slot] <= total, "node {node} slot {slot}");
            }
        }
    }

    #[test]
    fn test_intermediate_nodes_get_zero_rows() {
        // Only rank 6 (node 3) has traffic; nodes 0-2 are all-zero rows
        let mosaic = mosaic_from("6,7,2.0\n");
        let (onnode, totnode) = aggregate(&mosaic, 2);

        assert_eq!(totnode.node_count(), 4);
        assert_eq!(onnode.node_count(), 4);
        for node in 0..3 {
            assert_eq!(totnode.slots(node), &[0.0, 0.0]);
            assert_eq!(onnode.slots(node), &[0.0, 0.0]);
        }
        assert_eq!(totnode.slots(3), &[2.0, 0.0]);
    }

    #[test]
    fn test_accumulators_grow_in_lockstep() {
        // Purely off-node traffic must still grow the on-node accumulator
        let mosaic = mosaic_from("4,0,3.0\n");
        let (onnode, totnode) = aggregate(&mosaic, 2);

        assert_eq!(onnode.node_count(), totnode.node_count());
        assert_eq!(onnode.slots(2), &[0.0, 0.0]);
        assert_eq!(totnode.slots(2), &[3.0, 0.0]);
    }

    #[test]
    fn test_empty_rows_create_no_nodes_on_their_own() {
        // Rows 0-4 are empty filler; only rank 5's node forces growth
        let mosaic = read_mosaic(Cursor::new("hdr\n5,4,1.0\n"), 2, false).unwrap();
        let (_, totnode) = aggregate(&mosaic, 2);
        assert_eq!(totnode.node_count(), 3);
        assert_eq!(totnode.slots(2), &[0.0, 1.0]);
    }

    #[test]
    fn test_coarsening_consistency() {
        // Per-node totals from a coarsened mosaic match the slot sums of the
        // non-coarsened aggregation
        let input = "hdr\n0,1,5.0\n1,2,3.0\n2,3,7.0\n3,0,2.0\n2,0,1.5\n";
        let fine = read_mosaic(Cursor::new(input), 2, false).unwrap();
        let coarse = read_mosaic(Cursor::new(input), 2, true).unwrap();

        let (_, totnode) = aggregate(&fine, 2);
        for (node, slots) in totnode.iter() {
            let fine_total: f64 = slots.iter().sum();
            let coarse_total: f64 = coarse.row(node).iter().map(|&(_, m)| m).sum();
            assert!((fine_total - coarse_total).abs() < 1e-12, "node {node}");
        }
    }

    #[test]
    fn test_empty_mosaic_gives_empty_accumulators() {
        let (onnode, totnode) = aggregate(&Mosaic::new(), 4);
        assert_eq!(onnode.node_count(), 0);
        assert_eq!(totnode.node_count(), 0);
        assert_eq!(onnode.width(), 4);
    }
}
