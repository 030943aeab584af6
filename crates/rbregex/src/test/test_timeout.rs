// Tests for the step budget, recursion depth limit and cooperative
// cancellation.
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::*;

#[test]
fn test_step_budget_aborts_catastrophic_backtracking() {
    let p = Pattern::new(r"(a+)+z").unwrap();
    let subject = "a".repeat(40);
    let limits = MatchLimits::with_max_steps(50_000);
    let result = p.search(subject.as_bytes(), 0, false, &limits);
    assert_eq!(result, Err(RegexError::Timeout));
}

#[test]
fn test_budget_covers_whole_scan() {
    // The budget is per search call, not per start position: a scan
    // over a long subject cannot multiply it.
    let p = Pattern::new("abc").unwrap();
    let subject = "ab".repeat(50_000);
    let limits = MatchLimits::with_max_steps(1_000);
    let result = p.search(subject.as_bytes(), 0, false, &limits);
    assert_eq!(result, Err(RegexError::Timeout));
}

#[test]
fn test_generous_budget_still_matches() {
    let p = Pattern::new(r"(a+)+z").unwrap();
    let subject = format!("{}z", "a".repeat(40));
    let m = p.find(&subject).unwrap().unwrap();
    assert_eq!(m.end(), 41);
}

#[test]
fn test_cancellation_flag() {
    let cancel = Arc::new(AtomicBool::new(true));
    let limits = MatchLimits {
        cancel: Some(cancel.clone()),
        ..MatchLimits::default()
    };
    let p = Pattern::new(r"(a+)+z").unwrap();
    let subject = "a".repeat(60);
    let result = p.search(subject.as_bytes(), 0, false, &limits);
    assert_eq!(result, Err(RegexError::Timeout));
}

#[test]
fn test_cancellation_unset_has_no_effect() {
    let cancel = Arc::new(AtomicBool::new(false));
    let limits = MatchLimits {
        cancel: Some(cancel.clone()),
        ..MatchLimits::default()
    };
    let p = Pattern::new("b+").unwrap();
    let m = p.search(b"abbb", 0, false, &limits).unwrap().unwrap();
    assert_eq!((m.start(), m.end()), (1, 4));
    assert!(!cancel.load(Ordering::Relaxed));
}

#[test]
fn test_depth_limit() {
    let p = Pattern::new("(?:(?:(?:a|b)c?)+d?)+e").unwrap();
    let limits = MatchLimits {
        max_depth: 8,
        ..MatchLimits::default()
    };
    let subject = "acbc".repeat(10);
    let result = p.search(subject.as_bytes(), 0, false, &limits);
    assert_eq!(result, Err(RegexError::Timeout));
}

#[test]
fn test_simple_repeats_do_not_recurse() {
    // Long single-character runs are iterated, so a tiny depth budget
    // still matches them.
    let p = Pattern::new("a+b").unwrap();
    let limits = MatchLimits {
        max_depth: 16,
        ..MatchLimits::default()
    };
    let subject = format!("{}b", "a".repeat(10_000));
    let m = p.search(subject.as_bytes(), 0, false, &limits).unwrap().unwrap();
    assert_eq!(m.end(), 10_001);
}
