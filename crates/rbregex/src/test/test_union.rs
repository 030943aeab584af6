// Tests for pattern union.
use crate::*;

#[test]
fn test_empty_union_never_matches() {
    let p = union(&[]).unwrap();
    assert!(!p.is_match("").unwrap());
    assert!(!p.is_match("anything").unwrap());
}

#[test]
fn test_single_text_is_quoted() {
    let p = union(&["a.b".into()]).unwrap();
    assert!(p.is_match("a.b").unwrap());
    assert!(!p.is_match("axb").unwrap());
}

#[test]
fn test_single_pattern_is_reused() {
    let orig = Pattern::new("c+").unwrap();
    let p = union(&[UnionItem::from(&orig)]).unwrap();
    assert_eq!(p, orig);
}

#[test]
fn test_mixed_union() {
    let cs = Pattern::new("c+").unwrap();
    let p = union(&["a.b".into(), UnionItem::from(&cs)]).unwrap();
    assert!(p.is_match("a.b").unwrap());
    assert!(p.is_match("xccc").unwrap());
    assert!(!p.is_match("axb").unwrap());
    assert!(!p.is_match("dd").unwrap());
}

#[test]
fn test_union_preserves_member_options() {
    let fold = Pattern::with_options("abc", Options::IGNORECASE).unwrap();
    let p = union(&[UnionItem::from(&fold), "xyz".into()]).unwrap();
    assert!(p.is_match("ABC").unwrap());
    assert!(p.is_match("xyz").unwrap());
    // The member's fold does not leak to the other alternative.
    assert!(!p.is_match("XYZ").unwrap());
}

#[test]
fn test_union_precedence() {
    // Member alternations stay grouped inside their shell.
    let ab = Pattern::new("a|b").unwrap();
    let p = union(&[UnionItem::from(&ab), "c".into()]).unwrap();
    assert!(p.is_match("b").unwrap());
    assert!(p.is_match("c").unwrap());
    assert!(!p.is_match("d").unwrap());
}

#[test]
fn test_union_incompatible_encodings() {
    let non_ascii_binary: &[u8] = b"\xFFdata";
    let result = union(&["héllo".into(), non_ascii_binary.into()]);
    assert!(matches!(result, Err(RegexError::Encoding(_))));
}

#[test]
fn test_union_ascii_folds_into_any_encoding() {
    let non_ascii_binary: &[u8] = b"\xFFdata";
    let p = union(&["plain".into(), non_ascii_binary.into()]).unwrap();
    assert_eq!(p.encoding(), RegexEncoding::Binary);
    assert!(p.is_match("plain").unwrap());
}
