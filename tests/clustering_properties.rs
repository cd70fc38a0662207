//! Property-based tests for the dendrogram, the temporal pooler and leaf nodes.
//!
//! Run with: `cargo test --test clustering_properties`

use htm_zeta::prelude::*;
use htm_zeta::ZetaError;
use proptest::prelude::*;

fn abs_diff(a: &f64, b: &f64) -> f64 {
    (a - b).abs()
}

fn sizes_consistent<T>(cluster: &Cluster<T>) -> bool {
    match (cluster.left(), cluster.right()) {
        (Some(left), Some(right)) => {
            cluster.size() == left.size() + right.size()
                && sizes_consistent(left)
                && sizes_consistent(right)
        }
        _ => cluster.size() == 1,
    }
}

/// A pooled stream together with its vocabulary size and a valid group count.
fn stream_strategy() -> impl Strategy<Value = (Vec<usize>, usize, usize)> {
    (2usize..10)
        .prop_flat_map(|n| (proptest::collection::vec(0..n, 2..80), Just(n), 1..=n))
}

// =============================================================================
// DENDROGRAM
// =============================================================================

mod dendrogram {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn prop_couple_size_is_sum_of_children(
            items in proptest::collection::vec(-100.0f64..100.0, 1..30),
            shortest in any::<bool>()
        ) {
            let linkage = if shortest { Linkage::Shortest } else { Linkage::GroupAverage };
            let root = AgglomerativeClustering::new(linkage).fit(items.clone(), abs_diff).unwrap();

            prop_assert_eq!(root.size(), items.len());
            prop_assert!(sizes_consistent(&root));
        }

        #[test]
        fn prop_extract_partitions_items(
            items in proptest::collection::vec(-50.0f64..50.0, 1..25),
            pick in any::<prop::sample::Index>()
        ) {
            let root = AgglomerativeClustering::default()
                .fit((0..items.len()).collect::<Vec<usize>>(), |&i, &j| abs_diff(&items[i], &items[j]))
                .unwrap();
            let n = pick.index(items.len()) + 1;

            let clusters = root.extract(n).unwrap();
            prop_assert_eq!(clusters.len(), n);
            prop_assert!(clusters.iter().all(|c| c.size() >= 1));

            let mut covered: Vec<usize> = clusters.iter().flat_map(|c| c.flatten(|&i| i)).collect();
            covered.sort_unstable();
            prop_assert_eq!(covered, (0..items.len()).collect::<Vec<_>>());
        }

        #[test]
        fn prop_extract_too_many_fails(
            items in proptest::collection::vec(0.0f64..1.0, 1..15),
            extra in 1usize..5
        ) {
            let root = AgglomerativeClustering::default().fit(items.clone(), abs_diff).unwrap();
            let requested = items.len() + extra;
            prop_assert_eq!(
                root.extract(requested).unwrap_err(),
                ZetaError::ExtractTooMany { requested, available: items.len() }
            );
        }
    }
}

// =============================================================================
// TEMPORAL POOLER
// =============================================================================

mod temporal_pooler {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn prop_membership_rows_are_one_hot((stream, n, m) in stream_strategy()) {
            let mut tp = TemporalPooler::new(m, Linkage::GroupAverage).unwrap();
            tp.learn(&stream, n).unwrap();
            let membership = tp.membership().unwrap();

            for row in membership.to_dense() {
                prop_assert_eq!(row.len(), m);
                prop_assert_eq!(row.iter().map(|&v| usize::from(v)).sum::<usize>(), 1);
            }
            for group in 0..m {
                prop_assert!(membership.column(group).unwrap().contains(&1));
            }
        }

        #[test]
        fn prop_learn_is_idempotent((stream, n, m) in stream_strategy(), shortest in any::<bool>()) {
            let linkage = if shortest { Linkage::Shortest } else { Linkage::GroupAverage };
            let mut tp = TemporalPooler::new(m, linkage).unwrap();
            tp.learn(&stream, n).unwrap();
            let first = tp.membership().cloned();
            tp.learn(&stream, n).unwrap();
            prop_assert_eq!(tp.membership().cloned(), first);
        }

        #[test]
        fn prop_forward_backward_consistent((stream, n, m) in stream_strategy()) {
            let mut tp = TemporalPooler::new(m, Linkage::GroupAverage).unwrap();
            tp.learn(&stream, n).unwrap();

            for i in 0..n {
                let group = tp.forward_hard(i).unwrap();
                prop_assert_eq!(tp.backward_hard(group).unwrap()[i], 1);
            }
        }

        #[test]
        fn prop_soft_outputs_are_distributions(
            (stream, n, m) in stream_strategy(),
            raw in proptest::collection::vec(0.0f64..1.0, 10)
        ) {
            let mut tp = TemporalPooler::new(m, Linkage::GroupAverage).unwrap();
            tp.learn(&stream, n).unwrap();

            let forward = tp.forward_soft(&raw[..n]).unwrap();
            prop_assert_eq!(forward.len(), m);
            prop_assert!((forward.iter().sum::<f64>() - 1.0).abs() < 1e-9);

            let backward = tp.backward_soft(&forward).unwrap();
            prop_assert_eq!(backward.len(), n);
            prop_assert!((backward.iter().sum::<f64>() - 1.0).abs() < 1e-9);
        }
    }
}

// =============================================================================
// LEAF NODES
// =============================================================================

mod leaf_nodes {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_cluster_stream_matches_forward_hard(
            train in proptest::collection::vec(0i32..6, 2..60)
        ) {
            let mut leaf = LeafNode::new(train.iter().copied(), [], NodeParams::default());
            prop_assume!(leaf.num_coincidences() >= 2);
            leaf.learn().unwrap();

            let clusters = leaf.cluster_stream().unwrap();
            prop_assert_eq!(clusters.len(), train.len());
            for (&index, &group) in leaf.stream().iter().zip(&clusters) {
                prop_assert_eq!(leaf.forward_hard(index).unwrap(), group);
            }
        }

        #[test]
        fn prop_predict_consumes_one_step(
            train in proptest::collection::vec(0i32..4, 4..30),
            test in proptest::collection::vec(proptest::option::of(0i32..6), 0..10)
        ) {
            let mut leaf = LeafNode::new(train.iter().copied(), test.clone(), NodeParams::default());
            prop_assume!(leaf.num_coincidences() >= 2);
            leaf.learn().unwrap();

            for _ in 0..test.len() {
                prop_assert!(leaf.can_predict());
                let prediction = leaf.predict().unwrap();
                prop_assert!((prediction.iter().sum::<f64>() - 1.0).abs() < 1e-9);
            }
            prop_assert!(!leaf.can_predict());
            prop_assert_eq!(leaf.predict().unwrap_err(), ZetaError::TestStreamExhausted);
        }

        #[test]
        fn prop_continuous_stream_in_range(
            train in proptest::collection::vec(prop_oneof![Just(f64::NAN), -10.0f64..10.0], 1..50),
            k in 1usize..8
        ) {
            prop_assume!(train.iter().any(|v| !v.is_nan()));
            let params = ContinuousLeafParams { num_spatial_patterns: k, ..Default::default() };
            let leaf = ContinuousLeafNode::new(train.clone(), [], params).unwrap();

            prop_assert_eq!(leaf.num_coincidences(), k);
            prop_assert_eq!(leaf.stream().len(), train.len());
            prop_assert!(leaf.stream().iter().all(|&i| i < k));
        }
    }
}
