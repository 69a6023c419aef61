//! Property-based tests for the mosaic pipeline
//!
//! Covers the algebraic properties of accumulation, aggregation, ratio
//! computation, and delta differencing with proptest.

use proptest::prelude::*;

use patmat::aggregate::aggregate;
use patmat::delta::delta;
use patmat::mosaic::{Mosaic, TrafficRecord};
use patmat::ratio::compute_ratios;

fn mosaic_from(records: &[(usize, usize, f64)]) -> Mosaic {
    let mut mosaic = Mosaic::new();
    for &(source, dest, metric) in records {
        mosaic.accumulate(TrafficRecord {
            source,
            dest,
            metric,
        });
    }
    mosaic
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_accumulation_idempotence(
        records in prop::collection::vec((0usize..16, 0usize..16, 0.5f64..100.0), 1..40),
    ) {
        // Feeding every record twice equals feeding it once with the metric
        // doubled
        let mut twice = Mosaic::new();
        for &(source, dest, metric) in &records {
            let record = TrafficRecord { source, dest, metric };
            twice.accumulate(record);
            twice.accumulate(record);
        }

        let doubled: Vec<(usize, usize, f64)> = records
            .iter()
            .map(|&(s, d, m)| (s, d, m + m))
            .collect();
        let expected = mosaic_from(&doubled);

        // Compare with a tolerance: the two accumulation orders can differ
        // in the last ulp
        prop_assert_eq!(twice.len(), expected.len());
        for (source, pairs) in twice.iter() {
            let expected_pairs = expected.row(source);
            prop_assert_eq!(pairs.len(), expected_pairs.len());
            for (&(dest, metric), &(exp_dest, exp_metric)) in
                pairs.iter().zip(expected_pairs.iter())
            {
                prop_assert_eq!(dest, exp_dest);
                prop_assert!((metric - exp_metric).abs() <= 1e-9 * exp_metric.abs());
            }
        }
    }

    #[test]
    fn prop_onnode_never_exceeds_totnode(
        records in prop::collection::vec((0usize..32, 0usize..32, 0.0f64..100.0), 1..60),
        node_ranks in 1usize..8,
    ) {
        let mosaic = mosaic_from(&records);
        let (onnode, totnode) = aggregate(&mosaic, node_ranks);

        prop_assert_eq!(onnode.node_count(), totnode.node_count());
        for (node, totals) in totnode.iter() {
            let on = onnode.slots(node);
            for (slot, &total) in totals.iter().enumerate() {
                prop_assert!(on[slot] <= total, "node {} slot {}", node, slot);
            }
        }
    }

    #[test]
    fn prop_defined_ratios_stay_in_unit_interval(
        records in prop::collection::vec((0usize..32, 0usize..32, 0.1f64..100.0), 1..60),
        node_ranks in 1usize..8,
    ) {
        let mosaic = mosaic_from(&records);
        let (onnode, totnode) = aggregate(&mosaic, node_ranks);
        let table = compute_ratios(&onnode, &totnode);

        for (_, slots) in table.iter() {
            for ratio in slots.iter().flatten() {
                prop_assert!((0.0..=1.0).contains(ratio), "ratio {}", ratio);
            }
        }
    }

    #[test]
    fn prop_coarsening_consistency(
        records in prop::collection::vec((0usize..32, 0usize..32, 0.1f64..100.0), 1..60),
        node_ranks in 1usize..8,
    ) {
        // Per-node totals of the coarsened mosaic match the slot sums of the
        // non-coarsened aggregation
        let fine = mosaic_from(&records);
        let coarse_records: Vec<(usize, usize, f64)> = records
            .iter()
            .map(|&(s, d, m)| (s / node_ranks, d / node_ranks, m))
            .collect();
        let coarse = mosaic_from(&coarse_records);

        let (_, totnode) = aggregate(&fine, node_ranks);
        for (node, slots) in totnode.iter() {
            let fine_total: f64 = slots.iter().sum();
            let coarse_total: f64 = coarse.row(node).iter().map(|&(_, m)| m).sum();
            prop_assert!(
                (fine_total - coarse_total).abs() < 1e-6,
                "node {}: {} vs {}",
                node,
                fine_total,
                coarse_total
            );
        }
    }

    #[test]
    fn prop_delta_antisymmetry(
        a_records in prop::collection::vec((0usize..16, 0usize..16, 0.0f64..100.0), 0..40),
        b_records in prop::collection::vec((0usize..16, 0usize..16, 0.0f64..100.0), 0..40),
    ) {
        // Pin both rank universes to 16 so the sizes always match
        let anchor = (15usize, 15usize, 1.0f64);
        let mut a_records = a_records;
        let mut b_records = b_records;
        a_records.push(anchor);
        b_records.push(anchor);

        let a = mosaic_from(&a_records);
        let b = mosaic_from(&b_records);

        let ab = delta(&a, &b).unwrap();
        let ba = delta(&b, &a).unwrap();

        prop_assert_eq!(ab.dim(), ba.dim());
        for source in 0..ab.dim() {
            for dest in 0..ab.dim() {
                prop_assert_eq!(ab.get(source, dest), -ba.get(source, dest));
            }
        }
    }
}
