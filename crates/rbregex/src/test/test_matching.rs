// Tests for the matching semantics: leftmost-longest-per-backtracking,
// quantifier greediness, anchors, classes and lookaround.
use crate::*;

fn find_span(pattern: &str, subject: &str) -> Option<(usize, usize)> {
    let p = Pattern::new(pattern).unwrap();
    p.find(subject)
        .unwrap()
        .map(|m| (m.start(), m.end()))
}

#[test]
fn test_leftmost_match_wins() {
    assert_eq!(find_span("a+", "baaa"), Some((1, 4)));
    assert_eq!(find_span("a|b", "cba"), Some((1, 2)));
    // Alternation prefers the earlier branch at the same position.
    assert_eq!(find_span("ab|a", "ab"), Some((0, 2)));
    assert_eq!(find_span("a|ab", "ab"), Some((0, 1)));
}

#[test]
fn test_greedy_and_lazy() {
    assert_eq!(find_span("a+", "aaab"), Some((0, 3)));
    assert_eq!(find_span("a+?", "aaab"), Some((0, 1)));
    assert_eq!(find_span("a*", "aaab"), Some((0, 3)));
    assert_eq!(find_span("a*?", "aaab"), Some((0, 0)));
    assert_eq!(find_span("a{2,3}", "aaaa"), Some((0, 3)));
    assert_eq!(find_span("a{2,3}?", "aaaa"), Some((0, 2)));
    assert_eq!(find_span("a{,2}", "aaaa"), Some((0, 2)));
}

#[test]
fn test_greediness_with_suffix() {
    // The quantifier backs off so the rest of the pattern fits.
    assert_eq!(find_span("a+ab", "aaab"), Some((0, 4)));
    assert_eq!(find_span(".*b", "abcb"), Some((0, 4)));
    assert_eq!(find_span(".*?b", "abcb"), Some((0, 2)));
}

#[test]
fn test_line_anchors() {
    // ^ and $ are always line anchors.
    let p = Pattern::new("^b$").unwrap();
    assert!(p.is_match("a\nb\nc").unwrap());
    assert!(!p.is_match("abc").unwrap());

    assert_eq!(find_span("^", "abc"), Some((0, 0)));
    assert_eq!(find_span("c$", "abc"), Some((2, 3)));
}

#[test]
fn test_text_anchors() {
    let p = Pattern::new(r"\Ab").unwrap();
    assert!(!p.is_match("a\nb").unwrap());
    assert!(p.is_match("b").unwrap());

    let p = Pattern::new(r"b\z").unwrap();
    assert!(!p.is_match("b\n").unwrap());
    assert!(p.is_match("ab").unwrap());

    // \Z tolerates one trailing newline.
    let p = Pattern::new(r"b\Z").unwrap();
    assert!(p.is_match("b\n").unwrap());
    assert!(p.is_match("b").unwrap());
    assert!(!p.is_match("b\n\n").unwrap());
}

#[test]
fn test_dot_and_multiline() {
    let p = Pattern::new("a.b").unwrap();
    assert!(p.is_match("axb").unwrap());
    assert!(!p.is_match("a\nb").unwrap());

    // MULTILINE only widens `.` to include newline.
    let p = Pattern::with_options("a.b", Options::MULTILINE).unwrap();
    assert!(p.is_match("a\nb").unwrap());
}

#[test]
fn test_char_classes() {
    let p = Pattern::new("[a-c]+").unwrap();
    assert_eq!(
        p.find("xxabca").unwrap().unwrap().matched(),
        b"abca"
    );
    let p = Pattern::new("[^a-c]+").unwrap();
    assert_eq!(p.find("abxy").unwrap().unwrap().matched(), b"xy");

    let p = Pattern::new(r"\d{2}:\d{2}").unwrap();
    assert!(p.is_match("at 12:34 sharp").unwrap());
    let p = Pattern::new(r"\h+").unwrap();
    assert_eq!(p.find("zzcafe00").unwrap().unwrap().matched(), b"cafe00");
}

#[test]
fn test_escape_classes_are_ascii() {
    // \d and \w never match non-ASCII digits/letters.
    assert!(!Pattern::new(r"\d").unwrap().is_match("٥").unwrap());
    assert!(!Pattern::new(r"\w").unwrap().is_match("é").unwrap());
    // POSIX classes are Unicode-aware under UTF-8.
    assert!(Pattern::new("[[:alpha:]]").unwrap().is_match("é").unwrap());
}

#[test]
fn test_posix_and_property_classes() {
    assert!(Pattern::new("[[:upper:]]+").unwrap().is_match("aBc").unwrap());
    assert!(Pattern::new("[[:^digit:]]").unwrap().is_match("5a").unwrap());
    assert!(Pattern::new(r"\p{Alpha}").unwrap().is_match("x").unwrap());
    assert!(!Pattern::new(r"\p{Alpha}").unwrap().is_match("5 .").unwrap());
    assert!(Pattern::new(r"\P{Alpha}").unwrap().is_match("5").unwrap());
}

#[test]
fn test_word_boundary() {
    assert_eq!(find_span(r"\bcat\b", "a cat sat"), Some((2, 5)));
    assert_eq!(find_span(r"\bcat\b", "concatenate"), None);
    assert_eq!(find_span(r"\Bcat\B", "concatenate"), Some((3, 6)));
}

#[test]
fn test_case_folding() {
    let p = Pattern::with_options("abc", Options::IGNORECASE).unwrap();
    assert!(p.is_match("xAbCx").unwrap());
    // Fold applies before class negation.
    let p = Pattern::with_options("[^a]", Options::IGNORECASE).unwrap();
    assert!(!p.is_match("A").unwrap());
    assert!(p.is_match("b").unwrap());
}

#[test]
fn test_inline_flags() {
    let p = Pattern::new("(?i:abc)d").unwrap();
    assert!(p.is_match("ABCd").unwrap());
    assert!(!p.is_match("ABCD").unwrap());

    // A bare flag group runs to the end of the enclosing group.
    let p = Pattern::new("a((?i)b)c").unwrap();
    assert!(p.is_match("aBc").unwrap());
    assert!(!p.is_match("aBC").unwrap());

    // Flags can be switched off.
    let p = Pattern::with_options("a(?-i:b)c", Options::IGNORECASE).unwrap();
    assert!(p.is_match("AbC").unwrap());
    assert!(!p.is_match("ABC").unwrap());
}

#[test]
fn test_extended_mode() {
    let p = Pattern::with_options(
        "\\d{4}   # year\n - \\d{2} # month\n",
        Options::EXTENDED,
    )
    .unwrap();
    assert!(p.is_match("2026-08").unwrap());
    // Escaped space is literal in extended mode.
    let p = Pattern::with_options(r"a\ b", Options::EXTENDED).unwrap();
    assert!(p.is_match("a b").unwrap());
    assert!(!p.is_match("ab").unwrap());
}

#[test]
fn test_lookahead() {
    let p = Pattern::new(r"\w+(?=:)").unwrap();
    assert_eq!(p.find("key: value").unwrap().unwrap().matched(), b"key");
    let p = Pattern::new(r"a(?!b)").unwrap();
    assert_eq!(
        p.find("ab ac").unwrap().map(|m| m.start()),
        Some(3)
    );
}

#[test]
fn test_lookbehind() {
    let p = Pattern::new(r"(?<=\$)\d+").unwrap();
    assert_eq!(p.find("cost $42 now").unwrap().unwrap().matched(), b"42");
    let p = Pattern::new(r"(?<!\$)\b\d+").unwrap();
    assert_eq!(p.find("$42 17").unwrap().unwrap().matched(), b"17");
}

#[test]
fn test_empty_quantifier_body_terminates() {
    // A body that matches nothing must not loop forever.
    let p = Pattern::new("(a*)*").unwrap();
    let m = p.find("b").unwrap().unwrap();
    assert_eq!((m.start(), m.end()), (0, 0));
    let p = Pattern::new("(?:a?)+b").unwrap();
    assert!(p.is_match("aab").unwrap());
    assert!(!p.is_match("c").unwrap());
}

#[test]
fn test_anchored_match_at() {
    let p = Pattern::new("a+").unwrap();
    assert!(p.match_at("baaa", 0).unwrap().is_none());
    let m = p.match_at("baaa", 1).unwrap().unwrap();
    assert_eq!((m.start(), m.end()), (1, 4));
}

#[test]
fn test_search_from_offset() {
    let p = Pattern::new("a").unwrap();
    let limits = MatchLimits::default();
    let m = p.search(b"aba", 1, false, &limits).unwrap().unwrap();
    assert_eq!(m.start(), 2);
    assert!(p.search(b"aba", 3, false, &limits).unwrap().is_none());
    assert!(p.search(b"aba", 9, false, &limits).unwrap().is_none());
}

#[test]
fn test_deterministic_results() {
    let p = Pattern::new(r"(a+)(b*)").unwrap();
    let m1 = p.find("xaabb").unwrap().unwrap();
    let m2 = p.find("xaabb").unwrap().unwrap();
    assert_eq!(m1, m2);
    assert_eq!((m1.start(), m1.end()), (1, 5));
}

#[test]
fn test_hex_and_octal_escapes() {
    assert!(Pattern::new(r"\x41").unwrap().is_match("A").unwrap());
    assert!(Pattern::new(r"\x{e9}").unwrap().is_match("é").unwrap());
    assert!(Pattern::new(r"é").unwrap().is_match("é").unwrap());
    assert!(Pattern::new(r"\066").unwrap().is_match("6").unwrap());
}
