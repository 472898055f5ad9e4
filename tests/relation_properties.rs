use proptest::prelude::*;
use riffmetrics::{
    bucket_values, count_relations, find_related, find_related_pruned, merge_utterances,
    relations::is_possibly_overlapping, AffirmationThresholds, BoundaryMode,
    InterruptionThresholds, Utterance,
};

fn utterance() -> impl Strategy<Value = Utterance> {
    (0u8..4, 0i64..60_000, 0i64..9_000).prop_map(|(p, start, len)| {
        Utterance::new(format!("p{}", p), start, start + len).unwrap()
    })
}

fn sorted_utterances(max: usize) -> impl Strategy<Value = Vec<Utterance>> {
    prop::collection::vec(utterance(), 0..max).prop_map(|mut uts| {
        uts.sort_by_key(|ut| ut.start_ms());
        uts
    })
}

fn single_speaker(max: usize) -> impl Strategy<Value = Vec<Utterance>> {
    prop::collection::vec((0i64..60_000, 0i64..3_000), 1..max).prop_map(|spans| {
        spans
            .into_iter()
            .map(|(start, len)| Utterance::new("p0", start, start + len).unwrap())
            .collect()
    })
}

fn brute_force<F>(uts: &[Utterance], is_related: F) -> Vec<(usize, usize)>
where
    F: Fn(&Utterance, &Utterance) -> bool,
{
    let mut pairs = Vec::new();
    for j in 1..uts.len() {
        for i in 0..j {
            if is_related(&uts[i], &uts[j]) {
                pairs.push((i, j));
            }
        }
    }
    pairs
}

fn positions(uts: &[Utterance], pairs: &[riffmetrics::RelationPair<&Utterance>]) -> Vec<(usize, usize)> {
    let index_of = |ut: &Utterance| {
        uts.iter()
            .position(|candidate| std::ptr::eq(candidate, ut))
            .unwrap()
    };
    pairs
        .iter()
        .map(|p| (index_of(p.earlier), index_of(p.later)))
        .collect()
}

proptest! {
    #[test]
    fn pruning_never_changes_affirmations(uts in sorted_utterances(60)) {
        let t = AffirmationThresholds::default();
        let exhaustive = find_related(&uts, |e, l| t.is_affirmation(e, l));
        let pruned = find_related_pruned(&uts, |e, l| t.is_affirmation(e, l), is_possibly_overlapping);
        prop_assert_eq!(positions(&uts, &pruned), positions(&uts, &exhaustive));
    }

    #[test]
    fn pruning_never_changes_interruptions(uts in sorted_utterances(60)) {
        let t = InterruptionThresholds::default();
        let exhaustive = find_related(&uts, |e, l| t.is_interruption(e, l));
        let pruned = find_related_pruned(&uts, |e, l| t.is_interruption(e, l), is_possibly_overlapping);
        prop_assert_eq!(positions(&uts, &pruned), positions(&uts, &exhaustive));
    }

    #[test]
    fn exhaustive_sweep_matches_all_pairs_scan(uts in sorted_utterances(40)) {
        let overlaps = |e: &Utterance, l: &Utterance| e.end_ms() > l.start_ms();
        let found = find_related(&uts, overlaps);
        prop_assert_eq!(positions(&uts, &found), brute_force(&uts, overlaps));
    }

    #[test]
    fn relations_point_forward_in_time(uts in sorted_utterances(60)) {
        let t = AffirmationThresholds::default();
        let i = InterruptionThresholds::default();
        let found = find_related_pruned(
            &uts,
            |e, l| t.is_affirmation(e, l) || i.is_interruption(e, l),
            is_possibly_overlapping,
        );
        for pair in &found {
            prop_assert!(pair.earlier.start_ms() <= pair.later.start_ms());
            prop_assert_ne!(pair.earlier.participant_id(), pair.later.participant_id());
        }
    }

    #[test]
    fn edge_counts_sum_to_pair_count(uts in sorted_utterances(60)) {
        let found = find_related(&uts, |e, l| e.end_ms() > l.start_ms());
        let counts = count_relations(&found, |ut| ut.participant_id().to_string());
        prop_assert_eq!(counts.total(), found.len() as u64);
    }

    #[test]
    fn every_value_lands_in_one_bucket(
        values in prop::collection::vec(-1_000.0f64..100_000.0, 0..200),
        boundaries in prop::collection::btree_set(0i64..50_000, 0..20),
        inclusive in any::<bool>(),
    ) {
        let boundaries: Vec<f64> = boundaries.into_iter().map(|b| b as f64).collect();
        let mode = if inclusive { BoundaryMode::Inclusive } else { BoundaryMode::Exclusive };
        let counts = bucket_values(&values, &boundaries, mode).unwrap();
        prop_assert_eq!(counts.len(), boundaries.len() + 1);
        prop_assert_eq!(counts.iter().sum::<u64>(), values.len() as u64);
    }

    #[test]
    fn merge_is_idempotent(uts in single_speaker(50), gap in 0i64..2_000) {
        let once = merge_utterances(&uts, gap).unwrap();
        let twice = merge_utterances(&once, gap).unwrap();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn merged_spans_are_ordered_and_apart(uts in single_speaker(50), gap in 0i64..2_000) {
        let merged = merge_utterances(&uts, gap).unwrap();
        prop_assert!(merged.len() <= uts.len());
        for w in merged.windows(2) {
            prop_assert!(w[0].start_ms() <= w[1].start_ms());
            prop_assert!(w[1].start_ms() - w[0].end_ms() >= gap);
        }
    }

    #[test]
    fn merging_overlaps_only_never_adds_time(uts in single_speaker(50)) {
        let merged = merge_utterances(&uts, 0).unwrap();
        let before: i64 = uts.iter().map(|u| u.duration_ms()).sum();
        let after: i64 = merged.iter().map(|u| u.duration_ms()).sum();
        prop_assert!(after <= before);
    }
}
