use calcpad_eval::{ResultSequence, evaluate_lines};
use pretty_assertions::assert_eq;

fn values(results: &ResultSequence) -> Vec<String> {
    results.iter().map(calcpad_eval::format_value).collect()
}

#[test]
fn test_malformed_line_does_not_affect_others() {
    let results = evaluate_lines(&["1+1", "bogus(((", "3*2"], &ResultSequence::default());
    assert_eq!(values(&results), vec!["2", "NaN", "6"]);
}

#[test]
fn test_result_has_one_entry_per_line() {
    let lines = ["", "   ", "1;", "@ann #tag", "(", "4"];
    let results = evaluate_lines(&lines, &ResultSequence::default());
    assert_eq!(results.len(), lines.len());
    assert_eq!(results.failure_count(), 5);
    assert_eq!(results.get(5), Some(4.0));
}

#[test]
fn test_answers_resolve_against_previous_pass() {
    let previous = evaluate_lines(&["1+1", "3*2"], &ResultSequence::default());
    assert_eq!(previous, ResultSequence::new(vec![2.0, 6.0]));

    let next = evaluate_lines(&["1+1", "3*2", "ans(0)+ans(1)", "ans(5)"], &previous);
    assert_eq!(values(&next), vec!["2", "6", "8", "NaN"]);
}

#[test]
fn test_self_and_forward_references_are_nan_on_first_pass() {
    let results = evaluate_lines(&["ans(0)", "ans(1)", "ans(2)"], &ResultSequence::default());
    assert_eq!(values(&results), vec!["NaN", "NaN", "NaN"]);
}

#[test]
fn test_self_reference_reads_stale_value() {
    let first = evaluate_lines(&["10"], &ResultSequence::default());
    let second = evaluate_lines(&["ans(0) + 1"], &first);
    let third = evaluate_lines(&["ans(0) + 1"], &second);
    assert_eq!(second.get(0), Some(11.0));
    assert_eq!(third.get(0), Some(12.0));
}

#[test]
fn test_re_evaluation_is_idempotent_without_references() {
    let lines = ["1/3", "2**0.5", "oops", "-(4)"];
    let first = evaluate_lines(&lines, &ResultSequence::default());
    let second = evaluate_lines(&lines, &first);
    assert_eq!(first, second);
}

#[test]
fn test_host_code_is_not_executed() {
    // Lines that would mean something to a general-purpose interpreter are plain failures.
    let lines = [
        "Math.max(1, 2)",
        "(() => 1)()",
        "'1' + 1",
        "1, 2",
        "globalThis",
        "0x10",
    ];
    let results = evaluate_lines(&lines, &ResultSequence::default());
    assert_eq!(results.failure_count(), lines.len());
}

#[test]
fn test_doubled_signs_and_padded_literals_fail() {
    let lines = ["1--1", "010", "1 - -1", "10", "+ +2", "2++2"];
    let results = evaluate_lines(&lines, &ResultSequence::default());
    assert_eq!(values(&results), vec!["NaN", "NaN", "2", "10", "2", "NaN"]);
}
