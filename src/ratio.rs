//! On-node/total-node ratio computation and per-node summary statistics
//!
//! Ratios are derived only after aggregation completes, since a slot's total
//! may keep growing while records for its source rank arrive.
//!
//! # Undefined-ratio policy
//!
//! A rank with zero recorded total traffic has no meaningful ratio. Instead
//! of faulting on the division, such slots carry the `None` sentinel and are
//! excluded from the node's min/max/mean/stddev; a node whose every slot is
//! undefined reports no summary at all.

use serde::Serialize;
use trueno::Vector;

use crate::aggregate::NodeAccumulator;

/// Per-slot on-node fractions; `None` marks an undefined slot
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RatioTable {
    nodes: Vec<Vec<Option<f64>>>,
}

impl RatioTable {
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Ratio slots for a node (empty for nodes beyond the table)
    pub fn slots(&self, node: usize) -> &[Option<f64>] {
        self.nodes.get(node).map_or(&[], Vec::as_slice)
    }

    /// Iterate (node index, ratio slots) in increasing node order
    pub fn iter(&self) -> impl Iterator<Item = (usize, &[Option<f64>])> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .map(|(node, slots)| (node, slots.as_slice()))
    }
}

/// Compute per-slot ratios from completed accumulators
///
/// Both accumulators come out of the same aggregation pass, so their shapes
/// match by construction.
pub fn compute_ratios(onnode: &NodeAccumulator, totnode: &NodeAccumulator) -> RatioTable {
    debug_assert_eq!(onnode.node_count(), totnode.node_count());
    debug_assert_eq!(onnode.width(), totnode.width());

    let mut nodes = Vec::with_capacity(totnode.node_count());
    for (node, totals) in totnode.iter() {
        let on = onnode.slots(node);
        let row = totals
            .iter()
            .zip(on.iter())
            .map(|(&total, &on_slot)| (total > 0.0).then(|| on_slot / total))
            .collect();
        nodes.push(row);
    }

    RatioTable { nodes }
}

/// Summary statistics over one node's defined ratio slots
///
/// `stddev` is the population standard deviation (divisor is the slot
/// count, not n-1), matching the reporting convention.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RatioSummary {
    pub min: f32,
    pub max: f32,
    pub mean: f32,
    pub stddev: f32,
}

/// One row of the per-node ratio report
#[derive(Debug, Clone, Serialize)]
pub struct NodeStats {
    pub node: usize,
    /// Slots with recorded traffic; undefined slots are excluded
    pub defined_slots: usize,
    /// `None` when the node has no defined slot at all
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<RatioSummary>,
}

/// Compute per-node summary statistics in increasing node index order
pub fn node_statistics(table: &RatioTable) -> Vec<NodeStats> {
    table
        .iter()
        .map(|(node, slots)| {
            let defined: Vec<f32> = slots.iter().flatten().map(|&r| r as f32).collect();
            NodeStats {
                node,
                defined_slots: defined.len(),
                summary: summarize(&defined),
            }
        })
        .collect()
}

/// Min/max/mean/population-stddev via Trueno SIMD reductions
fn summarize(values: &[f32]) -> Option<RatioSummary> {
    if values.is_empty() {
        return None;
    }
    let n = values.len() as f32;
    let v = Vector::from_slice(values);

    let min = v.min().unwrap_or(0.0);
    let max = v.max().unwrap_or(0.0);
    let mean = v.sum().unwrap_or(0.0) / n;

    // Population variance assembled from Trueno sums so the divisor is
    // explicitly n
    let squared: Vec<f32> = values.iter().map(|&x| (x - mean) * (x - mean)).collect();
    let stddev = (Vector::from_slice(&squared).sum().unwrap_or(0.0) / n).sqrt();

    Some(RatioSummary {
        min,
        max,
        mean,
        stddev,
    })
}
