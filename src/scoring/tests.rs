use super::*;

use std::collections::BTreeMap;

use crate::join::EvalExample;
use crate::records::{Feature, PassageCandidate, RawResult, UnknownLanguageId};

fn candidate(start: i64, end: i64) -> PassageCandidate {
    PassageCandidate {
        plaintext_start_byte: start,
        plaintext_end_byte: end,
    }
}

fn example_with_one_window(
    example_id: i64,
    candidates: Vec<PassageCandidate>,
    start_logits: Vec<f32>,
    end_logits: Vec<f32>,
    wp_start_offset: Vec<i64>,
    wp_end_offset: Vec<i64>,
) -> EvalExample {
    let key = example_id + 1;
    let mut features = BTreeMap::new();
    features.insert(
        key,
        Feature {
            unique_id: example_id,
            example_index: example_id,
            language_id: 0,
            wp_start_offset,
            wp_end_offset,
        },
    );
    let mut results = BTreeMap::new();
    results.insert(
        key,
        RawResult {
            unique_id: example_id,
            start_logits,
            end_logits,
            answer_type_logits: vec![0.5, 0.25],
        },
    );
    EvalExample {
        example_id,
        candidates,
        features,
        results,
    }
}

fn options(beam: usize, max_len: usize) -> ScoringOptions {
    ScoringOptions {
        candidate_beam: beam,
        max_answer_length: max_len,
    }
}

#[test]
fn test_best_indexes_excludes_position_zero() {
    // Position 0 carries the largest logit but is the CLS anchor.
    let indexes = best_indexes(&[9.0, 1.0, 3.0, 2.0], 2);
    assert_eq!(indexes, vec![2, 3]);
}

#[test]
fn test_best_indexes_stable_on_ties() {
    let indexes = best_indexes(&[0.0, 5.0, 5.0, 5.0], 2);
    assert_eq!(indexes, vec![1, 2]);
}

#[test]
fn test_best_indexes_beam_larger_than_input() {
    let indexes = best_indexes(&[0.0, 1.0, 2.0], 10);
    assert_eq!(indexes, vec![2, 1]);
}

#[test]
fn test_end_to_end_scenario() {
    let example = example_with_one_window(
        1,
        vec![candidate(0, 10)],
        vec![5.0, 1.0, 9.0, 2.0],
        vec![5.0, 0.0, 1.0, 8.0],
        vec![-1, 0, 5, -1],
        vec![-1, 4, 9, -1],
    );

    let summary = score(&example, &options(2, 10)).unwrap().unwrap();
    let label = &summary.predicted_label;

    // Winning token pair is (2, 2): (2, 3) is sentinel-filtered on the end
    // offset, (3, *) on the start offset.
    assert_eq!(label.minimal_answer.start_byte_offset, 5);
    assert_eq!(label.minimal_answer.end_byte_offset, 10);
    assert_eq!(label.passage_answer_index, 0);
    assert_eq!(label.language, Language::English);
    assert_eq!(label.yes_no_answer, YesNoAnswer::None);

    // span score 9 + 1 calibrated by cls score 5 + 5.
    assert_eq!(summary.minimal_span_score, 10.0);
    assert_eq!(summary.cls_token_score, 10.0);
    assert_eq!(label.passage_answer_score, 0.0);
    assert_eq!(label.minimal_answer_score, 0.0);
    assert_eq!(summary.answer_type_logits, vec![0.5, 0.25]);
}

#[test]
fn test_no_results_yields_no_prediction() {
    let mut example = example_with_one_window(
        1,
        vec![candidate(0, 10)],
        vec![0.0, 1.0],
        vec![0.0, 1.0],
        vec![-1, 0],
        vec![-1, 4],
    );
    example.results.clear();
    example.features.clear();

    assert!(score(&example, &options(2, 10)).unwrap().is_none());
}

#[test]
fn test_feature_result_count_mismatch_yields_no_prediction() {
    let mut example = example_with_one_window(
        1,
        vec![candidate(0, 10)],
        vec![0.0, 1.0],
        vec![0.0, 1.0],
        vec![-1, 0],
        vec![-1, 4],
    );
    example.features.clear();

    assert!(score(&example, &options(2, 10)).unwrap().is_none());
}

#[test]
fn test_all_sentinel_offsets_yield_no_prediction() {
    let example = example_with_one_window(
        1,
        vec![candidate(0, 10)],
        vec![0.0, 1.0, 2.0],
        vec![0.0, 1.0, 2.0],
        vec![-1, -1, -1],
        vec![-1, -1, -1],
    );

    assert!(score(&example, &options(3, 10)).unwrap().is_none());
}

#[test]
fn test_max_answer_length_filters_long_spans() {
    // Only the (1, 5) pair scores well, but it spans 5 tokens.
    let example = example_with_one_window(
        1,
        vec![candidate(0, 100)],
        vec![0.0, 9.0, 0.0, 0.0, 0.0, 0.0],
        vec![0.0, 0.0, 0.0, 0.0, 0.0, 9.0],
        vec![-1, 0, 5, 10, 15, 20],
        vec![-1, 4, 9, 14, 19, 24],
    );

    let long_ok = score(&example, &options(1, 5)).unwrap().unwrap();
    assert_eq!(long_ok.predicted_label.minimal_answer.start_byte_offset, 0);
    assert_eq!(long_ok.predicted_label.minimal_answer.end_byte_offset, 25);

    assert!(score(&example, &options(1, 4)).unwrap().is_none());
}

#[test]
fn test_span_validity_invariants_hold() {
    let example = example_with_one_window(
        1,
        vec![candidate(0, 50)],
        vec![1.0, 3.0, 7.0, 2.0, 5.0],
        vec![1.0, 6.0, 2.0, 8.0, 4.0],
        vec![-1, 0, 5, -1, 15],
        vec![-1, 4, 9, -1, 19],
    );

    let summary = score(&example, &options(4, 2)).unwrap().unwrap();
    let span = summary.predicted_label.minimal_answer;
    assert!(span.end_byte_offset >= span.start_byte_offset);
    assert_ne!(span.start_byte_offset, -1);
    assert_ne!(span.end_byte_offset, 0); // would imply a sentinel end offset
}

#[test]
fn test_containment_picks_first_containing_candidate() {
    let example = example_with_one_window(
        1,
        vec![candidate(0, 10), candidate(10, 25)],
        vec![0.0, 1.0, 5.0],
        vec![0.0, 1.0, 5.0],
        vec![-1, 5, 12],
        vec![-1, 9, 19],
    );

    // Winning span is (12, 20): contained by candidate 1 only.
    let summary = score(&example, &options(1, 10)).unwrap().unwrap();
    assert_eq!(summary.predicted_label.minimal_answer.start_byte_offset, 12);
    assert_eq!(summary.predicted_label.minimal_answer.end_byte_offset, 20);
    assert_eq!(summary.predicted_label.passage_answer_index, 1);
}

#[test]
fn test_containment_miss_falls_back_to_first_candidate() {
    let example = example_with_one_window(
        1,
        vec![candidate(0, 5)],
        vec![0.0, 5.0],
        vec![0.0, 5.0],
        vec![-1, 10],
        vec![-1, 14],
    );

    // Winning span (10, 15) fits no candidate.
    let summary = score(&example, &options(1, 10)).unwrap().unwrap();
    assert_eq!(summary.predicted_label.minimal_answer.start_byte_offset, 10);
    assert_eq!(summary.predicted_label.minimal_answer.end_byte_offset, 15);
    assert_eq!(summary.predicted_label.passage_answer_index, 0);
}

#[test]
fn test_scoring_is_idempotent() {
    let example = example_with_one_window(
        7,
        vec![candidate(0, 30)],
        vec![1.5, 2.5, 3.5, 0.5],
        vec![1.5, 0.5, 2.5, 3.5],
        vec![-1, 0, 5, 10],
        vec![-1, 4, 9, 14],
    );
    let opts = options(3, 10);

    let first = score(&example, &opts).unwrap().unwrap();
    let second = score(&example, &opts).unwrap().unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_unknown_language_id_is_an_error() {
    let mut example = example_with_one_window(
        1,
        vec![candidate(0, 10)],
        vec![0.0, 1.0],
        vec![0.0, 1.0],
        vec![-1, 0],
        vec![-1, 4],
    );
    for feature in example.features.values_mut() {
        feature.language_id = 42;
    }

    let err = score(&example, &options(1, 10)).unwrap_err();
    assert!(matches!(
        err,
        ScoringError::UnknownLanguage(UnknownLanguageId { id: 42 })
    ));
}

#[test]
fn test_mismatched_array_lengths_yield_no_prediction() {
    let mut example = example_with_one_window(
        1,
        vec![candidate(0, 10)],
        vec![0.0, 1.0, 2.0],
        vec![0.0, 1.0, 2.0],
        vec![-1, 0, 5],
        vec![-1, 4, 9],
    );
    for result in example.results.values_mut() {
        result.end_logits.pop();
    }

    assert!(score(&example, &options(2, 10)).unwrap().is_none());
}
