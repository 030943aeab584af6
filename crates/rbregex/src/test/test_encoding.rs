// Tests for encoding behavior: UTF-8 vs binary subjects, NOENCODING
// and FIXEDENCODING.
use crate::*;

#[test]
fn test_utf8_dot_matches_whole_char() {
    let p = Pattern::new("^.$").unwrap();
    assert!(p.is_match("é").unwrap());
    assert!(p.is_match("漢").unwrap());
}

#[test]
fn test_noencoding_forces_binary() {
    let p = Pattern::with_options(".", Options::NOENCODING).unwrap();
    assert_eq!(p.encoding(), RegexEncoding::Binary);
    // One byte per character: a two-byte char needs two dots.
    let p = Pattern::with_options("^.$", Options::NOENCODING).unwrap();
    assert!(!p.is_match("é").unwrap());
    let p = Pattern::with_options("^..$", Options::NOENCODING).unwrap();
    assert!(p.is_match("é").unwrap());
}

#[test]
fn test_binary_pattern_matches_raw_bytes() {
    let p = Pattern::compile(br"\xFF+", Options::NONE, RegexEncoding::Binary).unwrap();
    let m = p
        .search(b"a\xFF\xFFb", 0, false, &MatchLimits::default())
        .unwrap()
        .unwrap();
    assert_eq!((m.start(), m.end()), (1, 3));
}

#[test]
fn test_utf8_scan_skips_whole_chars() {
    // Candidate positions advance by characters, not bytes.
    let p = Pattern::new("b").unwrap();
    let m = p.find("é漢b").unwrap().unwrap();
    assert_eq!(m.start(), 5);
}

#[test]
fn test_invalid_subject_bytes_scan_bytewise() {
    // Without FIXEDENCODING, invalid bytes decode as themselves.
    let p = Pattern::new("b").unwrap();
    let m = p
        .search(b"\xFFb", 0, false, &MatchLimits::default())
        .unwrap()
        .unwrap();
    assert_eq!(m.start(), 1);
}

#[test]
fn test_fixed_encoding_rejects_invalid_subject() {
    let p = Pattern::with_options("b", Options::FIXEDENCODING).unwrap();
    let result = p.search(b"\xFFb", 0, false, &MatchLimits::default());
    assert!(matches!(result, Err(RegexError::Encoding(_))));
    assert!(p.is_match("ab").unwrap());
}

#[test]
fn test_invalid_pattern_source_rejected() {
    let result = Pattern::compile(b"a\xFFb", Options::NONE, RegexEncoding::Utf8);
    assert!(matches!(result, Err(RegexError::Encoding(_))));
    // The same bytes are a fine binary pattern.
    assert!(Pattern::compile(b"a\xFFb", Options::NONE, RegexEncoding::Binary).is_ok());
}

#[test]
fn test_wide_char_rejected_in_binary() {
    let result = Pattern::compile(br"\x{100}", Options::NONE, RegexEncoding::Binary);
    assert!(matches!(result, Err(RegexError::Syntax(_))));
}

#[test]
fn test_unicode_case_fold() {
    let p = Pattern::with_options("ä", Options::IGNORECASE).unwrap();
    assert!(p.is_match("Ä").unwrap());
    let p = Pattern::with_options("[a-ü]", Options::IGNORECASE).unwrap();
    assert!(p.is_match("Ü").unwrap());
}

#[test]
fn test_binary_fold_is_ascii_only() {
    // ASCII letters fold under the binary encoding...
    let p = Pattern::compile(b"abc", Options::IGNORECASE, RegexEncoding::Binary).unwrap();
    let m = p.search(b"xABCx", 0, false, &MatchLimits::default()).unwrap();
    assert!(m.is_some());
    // ...but bytes >= 0x80 are caseless, not Latin-1: 0xC9 never
    // matches 0xE9.
    let p = Pattern::compile(br"\xC9", Options::IGNORECASE, RegexEncoding::Binary).unwrap();
    assert!(
        p.search(b"\xE9", 0, false, &MatchLimits::default())
            .unwrap()
            .is_none()
    );
    assert!(
        p.search(b"\xC9", 0, false, &MatchLimits::default())
            .unwrap()
            .is_some()
    );
    // The same pair folds under UTF-8.
    let p = Pattern::with_options("\u{C9}", Options::IGNORECASE).unwrap();
    assert!(p.is_match("\u{E9}").unwrap());
}

#[test]
fn test_noencoding_from_lang_suffix() {
    let opts = Options::IGNORECASE | Options::from_lang("n");
    let p = Pattern::with_options(".", opts).unwrap();
    assert_eq!(p.encoding(), RegexEncoding::Binary);
}

#[test]
fn test_binary_classes_are_ascii() {
    // POSIX classes drop to ASCII semantics under the binary encoding.
    let p = Pattern::compile(b"[[:alpha:]]", Options::NONE, RegexEncoding::Binary).unwrap();
    let m = p.search("é".as_bytes(), 0, false, &MatchLimits::default()).unwrap();
    assert!(m.is_none());
}
