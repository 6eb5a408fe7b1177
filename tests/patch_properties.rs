//! Behavioral properties of the text patcher.

use prose_patcher::{apply_batch, apply_single, Issue, PatchError, Span};
use proptest::prelude::*;

fn issue(offset: usize, length: usize, replacements: &[&str]) -> Issue {
    Issue {
        offset,
        length,
        message: String::new(),
        rule_id: None,
        rule_label: None,
        replacements: replacements.iter().map(|r| r.to_string()).collect(),
    }
}

#[test]
fn single_replacement() {
    let out = apply_single("The quick brown fox", Span::new(4, 5), "slow").unwrap();
    assert_eq!(out, "The slow brown fox");
}

#[test]
fn disjoint_batch_outcome_is_order_independent() {
    let forward = vec![issue(0, 3, &["feline"]), issue(8, 3, &["canine"])];
    let backward = vec![issue(8, 3, &["canine"]), issue(0, 3, &["feline"])];

    let a = apply_batch("cat and dog", &forward).unwrap();
    let b = apply_batch("cat and dog", &backward).unwrap();

    assert_eq!(a.text, "feline and canine");
    assert_eq!(b.text, "feline and canine");
    assert_eq!(a.applied, 2);
}

#[test]
fn issues_without_replacements_are_skipped() {
    let issues = vec![issue(0, 3, &[]), issue(8, 3, &["canine"])];
    let outcome = apply_batch("cat and dog", &issues).unwrap();
    assert_eq!(outcome.text, "cat and canine");
    assert_eq!(outcome.applied, 1);
    assert_eq!(outcome.skipped, 1);
}

#[test]
fn empty_issue_set_returns_buffer_unchanged() {
    let outcome = apply_batch("cat and dog", &[]).unwrap();
    assert_eq!(outcome.text, "cat and dog");
    assert_eq!(outcome.applied, 0);
}

#[test]
fn out_of_range_span_is_rejected() {
    let buffer = "0123456789";
    let result = apply_single(buffer, Span::new(100, 1), "x");
    assert!(matches!(
        result,
        Err(PatchError::OutOfRange {
            offset: 100,
            length: 1,
            buffer_chars: 10,
        })
    ));
    // Pure function: the input is untouched by a failed apply.
    assert_eq!(buffer, "0123456789");
}

#[test]
fn span_ending_past_buffer_is_rejected() {
    let result = apply_single("0123456789", Span::new(8, 5), "x");
    assert!(matches!(result, Err(PatchError::OutOfRange { .. })));
}

#[test]
fn overlapping_spans_are_rejected() {
    let issues = vec![issue(2, 6, &["xxxxxx"]), issue(4, 2, &["yy"])];
    let result = apply_batch("a longer buffer", &issues);
    assert!(matches!(result, Err(PatchError::OverlappingSpans { .. })));
}

#[test]
fn zero_length_insertion_touching_a_span_is_not_an_overlap() {
    // An insertion at the start of a replaced span is a touching pair, not
    // an overlap, whichever order the issues arrive in.
    let forward = vec![issue(2, 0, &["x"]), issue(2, 3, &["yyy"])];
    let backward = vec![issue(2, 3, &["yyy"]), issue(2, 0, &["x"])];

    let a = apply_batch("abcdefgh", &forward).unwrap();
    let b = apply_batch("abcdefgh", &backward).unwrap();

    assert_eq!(a.text, "abxyyyfgh");
    assert_eq!(a.text, b.text);
}

#[test]
fn empty_string_replacement_is_applied_as_deletion() {
    let issues = vec![issue(3, 1, &[""])];
    let outcome = apply_batch("one  two", &issues).unwrap();
    assert_eq!(outcome.text, "one two");
    assert_eq!(outcome.applied, 1);
}

#[test]
fn batch_handles_multibyte_text() {
    // "Füße" is chars 4..8
    let issues = vec![issue(0, 3, &["Die"]), issue(4, 4, &["Hände"])];
    let outcome = apply_batch("Das Füße tut weh", &issues).unwrap();
    assert_eq!(outcome.text, "Die Hände tut weh");
}

proptest! {
    #[test]
    fn apply_single_preserves_length_arithmetic(
        buffer in "[a-zà-ü ]{1,40}",
        offset_seed in 0usize..40,
        length_seed in 0usize..10,
        replacement in "[a-z]{0,8}",
    ) {
        let chars = buffer.chars().count();
        let offset = offset_seed % (chars + 1);
        let length = length_seed.min(chars - offset);
        let span = Span::new(offset, length);

        let out = apply_single(&buffer, span, &replacement).unwrap();
        prop_assert_eq!(
            out.chars().count(),
            chars - length + replacement.chars().count()
        );
    }

    #[test]
    fn apply_batch_is_deterministic(
        buffer in "[a-z ]{10,40}",
        cuts in prop::collection::vec((0usize..40, 1usize..4, "[a-z]{1,6}"), 0..4),
    ) {
        // Build a disjoint issue set from arbitrary seeds.
        let chars = buffer.chars().count();
        let mut seeds: Vec<_> = cuts
            .into_iter()
            .filter(|(offset, length, _)| offset + length <= chars)
            .collect();
        seeds.sort_by_key(|(offset, _, _)| *offset);

        let mut issues: Vec<Issue> = Vec::new();
        let mut floor = 0;
        for (offset, length, replacement) in seeds {
            if offset < floor {
                continue;
            }
            issues.push(issue(offset, length, &[replacement.as_str()]));
            floor = offset + length;
        }

        let first = apply_batch(&buffer, &issues).unwrap();
        let second = apply_batch(&buffer, &issues).unwrap();
        prop_assert_eq!(&first.text, &second.text);

        let mut reversed = issues.clone();
        reversed.reverse();
        let third = apply_batch(&buffer, &reversed).unwrap();
        prop_assert_eq!(&first.text, &third.text);
    }
}
