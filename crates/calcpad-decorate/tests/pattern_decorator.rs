use calcpad_core::{Command, DocumentStateManager, EditCommand, Interval, LineIndex};
use calcpad_decorate::{
    PATTERN_STYLE_HANDLE, PATTERN_STYLE_HASHTAG, PATTERN_STYLE_NUMBER, PatternDecorationProcessor,
    PatternDecorator, PatternRule, PatternStyles,
};
use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[test]
fn test_line_spans_follow_rule_order() {
    let decorator = PatternDecorator::default_rules().unwrap();
    let spans: Vec<_> = decorator
        .line_spans("#x @me 10")
        .into_iter()
        .map(|s| (s.span.start, s.span.end, s.style_id))
        .collect();

    assert_eq!(
        spans,
        vec![
            (3, 6, PATTERN_STYLE_HANDLE),
            (0, 2, PATTERN_STYLE_HASHTAG),
            (7, 8, PATTERN_STYLE_NUMBER),
            (8, 9, PATTERN_STYLE_NUMBER),
        ]
    );
}

#[test]
fn test_overlapping_rules_both_apply() {
    let decorator = PatternDecorator::default_rules().unwrap();
    let spans = decorator.line_spans("#a1");

    let hashtag = spans
        .iter()
        .find(|s| s.style_id == PATTERN_STYLE_HASHTAG)
        .unwrap();
    let digit = spans
        .iter()
        .find(|s| s.style_id == PATTERN_STYLE_NUMBER)
        .unwrap();
    assert_eq!(hashtag.span.as_range(), 0..3);
    assert_eq!(digit.span.as_range(), 2..3);
}

#[test]
fn test_empty_text_yields_nothing() {
    let decorator = PatternDecorator::default_rules().unwrap();
    let mut calls = 0;
    decorator.decorate_line("", |_, _| calls += 1);
    assert_eq!(calls, 0);
}

#[test]
fn test_custom_styles() {
    let decorator = PatternDecorator::with_styles(PatternStyles {
        handle: 1,
        hashtag: 2,
        number: 3,
    })
    .unwrap();
    let styles: Vec<_> = decorator.rules().iter().map(PatternRule::style_id).collect();
    assert_eq!(styles, vec![1, 2, 3]);
}

#[test]
fn test_decorate_document_uses_document_offsets() {
    let decorator = PatternDecorator::default_rules().unwrap();
    let index = LineIndex::from_text("1\n@a\r\n#b");

    assert_eq!(
        decorator.decorate_document(&index),
        vec![
            Interval::new(0, 1, PATTERN_STYLE_NUMBER),
            Interval::new(2, 4, PATTERN_STYLE_HANDLE),
            Interval::new(6, 8, PATTERN_STYLE_HASHTAG),
        ]
    );
}

#[test]
fn test_processor_refreshes_layer_after_edit() {
    let mut manager = DocumentStateManager::new("@a");
    let mut processor = PatternDecorationProcessor::default_rules().unwrap();

    manager.apply_processor(&mut processor).unwrap();
    assert_eq!(manager.get_styles_at(1), vec![PATTERN_STYLE_HANDLE]);

    manager
        .execute(Command::Edit(EditCommand::Insert {
            offset: 0,
            text: "7".to_string(),
        }))
        .unwrap();
    manager.apply_processor(&mut processor).unwrap();

    assert_eq!(manager.get_styles_at(0), vec![PATTERN_STYLE_NUMBER]);
    assert_eq!(manager.get_styles_at(2), vec![PATTERN_STYLE_HANDLE]);
}

/// Reference scan over chars: the rules are simple enough to restate without regex.
fn naive_digit_count(text: &str) -> usize {
    text.chars().filter(|c| c.is_ascii_digit()).count()
}

fn naive_hashtag_count(text: &str) -> usize {
    let is_tag_char =
        |c: char| c.is_ascii_alphanumeric() || c == '_' || ('\u{0590}'..='\u{05FF}').contains(&c);
    let chars: Vec<char> = text.chars().collect();
    let mut count = 0;
    let mut i = 0;
    while i < chars.len() {
        if chars[i] == '#' && i + 1 < chars.len() && is_tag_char(chars[i + 1]) {
            count += 1;
            i += 1;
            while i < chars.len() && is_tag_char(chars[i]) {
                i += 1;
            }
        } else {
            i += 1;
        }
    }
    count
}

#[test]
fn test_scan_is_total_and_bounded_on_random_text() {
    const ALPHABET: &[char] = &[
        'a', 'Z', '_', '0', '7', '@', '#', ' ', '+', '(', 'ש', '你', '👋', '\u{0663}', '\t',
    ];
    let decorator = PatternDecorator::default_rules().unwrap();
    let mut rng = StdRng::seed_from_u64(0x5eed);

    for _ in 0..500 {
        let len = rng.gen_range(0..40);
        let text: String = (0..len)
            .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())])
            .collect();
        let char_len = text.chars().count();

        let spans = decorator.line_spans(&text);
        for styled in &spans {
            assert!(styled.span.start < styled.span.end, "{text:?}");
            assert!(styled.span.end <= char_len, "{text:?}");
        }

        for rule in decorator.rules() {
            let mut previous_end = 0;
            for span in rule.find_spans(&text) {
                assert!(span.start >= previous_end, "{text:?}");
                previous_end = span.end;
            }
        }

        let digits = spans
            .iter()
            .filter(|s| s.style_id == PATTERN_STYLE_NUMBER)
            .count();
        let hashtags = spans
            .iter()
            .filter(|s| s.style_id == PATTERN_STYLE_HASHTAG)
            .count();
        assert_eq!(digits, naive_digit_count(&text), "{text:?}");
        assert_eq!(hashtags, naive_hashtag_count(&text), "{text:?}");
    }
}
