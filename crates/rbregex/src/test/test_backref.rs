// Tests for backreferences.
use crate::*;

#[test]
fn test_numeric_backref() {
    let p = Pattern::new(r"(\w+)\s\1").unwrap();
    let m = p.find("hi ho hi hi there").unwrap().unwrap();
    assert_eq!(m.matched(), b"hi hi");
    assert_eq!(m.start(), 6);
}

#[test]
fn test_backref_is_textual() {
    // The reference matches the captured text, not the sub-pattern.
    let p = Pattern::new(r"([ab]+)\1").unwrap();
    assert!(p.is_match("abab").unwrap());
    assert!(!p.is_match("ab").unwrap());
}

#[test]
fn test_backref_with_fold() {
    let p = Pattern::with_options(r"(a+)\1", Options::IGNORECASE).unwrap();
    assert!(p.is_match("aAaa").unwrap());
    let p = Pattern::new(r"(a+)\1").unwrap();
    assert!(!p.is_match("aA").unwrap());
}

#[test]
fn test_named_backref() {
    let p = Pattern::new(r"(?<w>\w+)\s\k<w>").unwrap();
    assert_eq!(p.find("go go").unwrap().unwrap().matched(), b"go go");
    // Single-quoted form.
    let p = Pattern::new(r"(?'w'\w+)\s\k'w'").unwrap();
    assert!(p.is_match("go go").unwrap());
}

#[test]
fn test_duplicate_name_backref_prefers_recent() {
    // Both groups participated; the most recent declaration is tried
    // first.
    let p = Pattern::new(r"(?<x>a)(?<x>b)\k<x>").unwrap();
    let m = p.find("abb").unwrap().unwrap();
    assert_eq!(m.matched(), b"abb");
    // Falls back to the earlier index when the recent one fails.
    let m = p.find("aba").unwrap().unwrap();
    assert_eq!(m.matched(), b"aba");
}

#[test]
fn test_backref_to_unset_group_fails() {
    let p = Pattern::new(r"(a)?\1").unwrap();
    assert!(p.find("b").unwrap().is_none());
    assert!(p.is_match("aa").unwrap());
}

#[test]
fn test_backref_inside_repeat() {
    let p = Pattern::new(r"(\d)(\1)+").unwrap();
    let m = p.find("x7771").unwrap().unwrap();
    assert_eq!(m.matched(), b"777");
}
