use super::*;

fn found(text: &str, pattern: &str, case_sensitive: bool) -> Option<(usize, usize)> {
    find_pattern(text.as_bytes(), pattern.as_bytes(), case_sensitive).map(|m| (m.offset, m.len))
}

#[test]
fn test_literal_finds_first_occurrence() {
    assert_eq!(found("the cat sat on the cat mat", "cat", true), Some((4, 3)));
    assert_eq!(found("aab", "ab", true), Some((1, 2)));
    assert_eq!(found("abcabc", "abc", true), Some((0, 3)));
    assert_eq!(found("xyz", "cat", true), None);
}

#[test]
fn test_literal_matches_substring_position() {
    let texts = ["mississippi", "banana split", "aaaaab", "the quick brown fox"];
    for text in texts {
        for start in 0..text.len() {
            for end in start + 1..=text.len().min(start + 4) {
                let needle = &text[start..end];
                let expected = text.find(needle).unwrap();
                assert_eq!(
                    found(text, needle, true),
                    Some((expected, needle.len())),
                    "searching {:?} in {:?}",
                    needle,
                    text
                );
            }
        }
    }
}

#[test]
fn test_single_byte_wildcard() {
    assert_eq!(found("cat", "c#t", true), Some((0, 3)));
    assert_eq!(found("ct", "c#t", true), None);
    assert_eq!(found("a cut", "c#t", true), Some((2, 3)));
    assert_eq!(found("xyz", "#", true), Some((0, 1)));
}

#[test]
fn test_run_wildcard_collapses() {
    assert_eq!(found("abcdef", "a**f", true), Some((0, 6)));
    assert_eq!(found("abcdef", "a*f", true), Some((0, 6)));
    assert_eq!(found("xxabcdef", "b*e", true), Some((3, 4)));
}

#[test]
fn test_run_wildcard_matches_empty_run() {
    assert_eq!(found("af", "a*f", true), Some((0, 2)));
    assert_eq!(found("cat", "cat*", true), Some((0, 3)));
}

#[test]
fn test_leading_wildcards_do_not_extend_match() {
    assert_eq!(found("the cat", "*cat", true), Some((4, 3)));
    assert_eq!(found("the cat", "#cat", true), Some((3, 4)));
}

#[test]
fn test_case_sensitivity() {
    assert_eq!(found("Hello", "hello", true), None);
    assert_eq!(found("Hello", "hello", false), Some((0, 5)));
    assert_eq!(found("HELLO world", "WoRlD", false), Some((6, 5)));
}

#[test]
fn test_wildcard_only_pattern_reports_nonzero_length() {
    let m = find_pattern(b"abc", b"*", true).unwrap();
    assert_eq!(m.offset, 0);
    assert!(m.len >= 1);

    let m = find_pattern(b"abc", b"***", false).unwrap();
    assert_eq!(m.end(), 1);
}

#[test]
fn test_empty_text_never_matches() {
    assert_eq!(found("", "*", true), None);
    assert_eq!(found("", "a", true), None);
}

#[test]
fn test_backtracking_after_partial_match() {
    // the run wildcard stretches over text that only partially matches
    assert_eq!(found("ab ac abd", "a*d", true), Some((0, 9)));
    assert_eq!(found("abxabc", "ab#", true), Some((0, 3)));
    assert_eq!(found("abcabd", "ab*d", true), Some((0, 6)));
}

#[test]
fn test_degenerate_queries() {
    assert!(is_degenerate_query(b""));
    assert!(is_degenerate_query(b"*"));
    assert!(is_degenerate_query(b"#*#**"));
    assert!(!is_degenerate_query(b"*a"));
    assert!(!is_degenerate_query(b"cat"));
}

#[test]
fn test_more_run_wildcards_than_resume_slots() {
    // more resume points than the stack holds; the later ones are dropped
    let pattern = "a*".repeat(20) + "b";
    let text = "a".repeat(20) + "b";
    assert_eq!(found(&text, &pattern, true), Some((0, 21)));

    let pattern = "a*".repeat(17) + "ab";
    let text = "a".repeat(17) + "cab";
    assert_eq!(found(&text, &pattern, true), Some((0, 20)));
}

#[test]
fn test_full_resume_stack_exhausts_to_no_match() {
    let pattern = "a*".repeat(17) + "z";
    for len in 17..=20 {
        assert_eq!(found(&"a".repeat(len), &pattern, true), None);
    }

    let pattern = "#*".repeat(17) + "x";
    assert_eq!(found("abcdefghijklmnopqrs", &pattern, true), None);

    // one `a` short of the pattern, reached only after every retry fails
    let pattern = "*a".repeat(18) + "b";
    let text = "a".repeat(17) + "baaa";
    assert_eq!(found(&text, &pattern, true), None);
}
