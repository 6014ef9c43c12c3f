//! Unit tests for the scheduling core.
//!
//! All scenarios pin an explicit window so results are independent of the
//! wall clock and the process time zone.

use chrono::{DateTime, Duration, Local, NaiveDate, Timelike, Utc};

use super::free_slots::find_free_slots;
use super::resolver::{fallback_window, resolve_optimal_times};
use super::{SchedulerError, MAX_PROPOSALS};
use crate::models::Interval;

fn at(hour: u32, min: u32) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(&format!("2024-10-23T{hour:02}:{min:02}:00Z"))
        .unwrap()
        .with_timezone(&Utc)
}

fn iv(start_h: u32, start_m: u32, end_h: u32, end_m: u32) -> Interval {
    Interval {
        start: at(start_h, start_m),
        end: at(end_h, end_m),
    }
}

fn day_window() -> Interval {
    iv(9, 0, 21, 0)
}

// =========================================================
// Free-slot finder
// =========================================================

#[test]
fn test_no_events_yields_single_slot_at_window_start() {
    let slots = find_free_slots(&[], day_window(), Duration::minutes(60)).unwrap();

    assert_eq!(slots, vec![iv(9, 0, 10, 0)]);
}

#[test]
fn test_window_shorter_than_duration_yields_nothing() {
    let window = iv(9, 0, 9, 30);
    let slots = find_free_slots(&[], window, Duration::minutes(60)).unwrap();

    assert!(slots.is_empty());
}

#[test]
fn test_event_spanning_window_yields_nothing() {
    let slots = find_free_slots(&[day_window()], day_window(), Duration::minutes(30)).unwrap();

    assert!(slots.is_empty());
}

#[test]
fn test_gaps_between_events() {
    let events = vec![iv(10, 0, 11, 0)];
    let slots = find_free_slots(&events, day_window(), Duration::minutes(60)).unwrap();

    assert_eq!(slots, vec![iv(9, 0, 10, 0), iv(11, 0, 12, 0)]);
}

#[test]
fn test_gap_shorter_than_duration_is_skipped() {
    // 30-minute gap at 10:00 is too small for a one-hour call.
    let events = vec![iv(9, 0, 10, 0), iv(10, 30, 12, 0)];
    let slots = find_free_slots(&events, day_window(), Duration::minutes(60)).unwrap();

    assert_eq!(slots, vec![iv(12, 0, 13, 0)]);
}

#[test]
fn test_slots_are_duration_sized_and_strictly_ascending() {
    let events = vec![iv(9, 30, 10, 0), iv(11, 0, 12, 0), iv(13, 30, 14, 0)];
    let duration = Duration::minutes(30);
    let slots = find_free_slots(&events, day_window(), duration).unwrap();

    assert!(!slots.is_empty());
    for slot in &slots {
        assert_eq!(slot.duration(), duration);
    }
    for pair in slots.windows(2) {
        assert!(pair[0].end <= pair[1].start, "slots must not overlap");
        assert!(pair[0].start < pair[1].start, "slots must ascend by start");
    }
}

#[test]
fn test_unsorted_events_are_sorted_before_scanning() {
    let shuffled = vec![iv(14, 0, 15, 0), iv(10, 0, 11, 0), iv(12, 0, 13, 0)];
    let ordered = vec![iv(10, 0, 11, 0), iv(12, 0, 13, 0), iv(14, 0, 15, 0)];
    let duration = Duration::minutes(45);

    assert_eq!(
        find_free_slots(&shuffled, day_window(), duration).unwrap(),
        find_free_slots(&ordered, day_window(), duration).unwrap(),
    );
}

#[test]
fn test_contained_event_never_moves_cursor_backwards() {
    // Second event sits entirely inside the first.
    let events = vec![iv(9, 0, 12, 0), iv(10, 0, 10, 30)];
    let slots = find_free_slots(&events, day_window(), Duration::minutes(60)).unwrap();

    assert_eq!(slots, vec![iv(12, 0, 13, 0)]);
}

#[test]
fn test_overlapping_events_are_absorbed() {
    let events = vec![iv(9, 0, 10, 30), iv(10, 0, 11, 0)];
    let slots = find_free_slots(&events, day_window(), Duration::minutes(120)).unwrap();

    assert_eq!(slots, vec![iv(11, 0, 13, 0)]);
}

#[test]
fn test_finder_caps_at_five_slots() {
    // Seven 30-minute gaps are available; only the first five come back.
    let events: Vec<Interval> = (0..7)
        .map(|i| iv(9 + i, 30, 10 + i, 0))
        .collect();
    let slots = find_free_slots(&events, day_window(), Duration::minutes(30)).unwrap();

    assert_eq!(slots.len(), MAX_PROPOSALS);
    assert_eq!(slots[0], iv(9, 0, 9, 30));
    assert_eq!(slots[4], iv(13, 0, 13, 30));
}

#[test]
fn test_finder_rejects_non_positive_duration() {
    for minutes in [0, -15] {
        let err = find_free_slots(&[], day_window(), Duration::minutes(minutes)).unwrap_err();
        assert_eq!(err, SchedulerError::InvalidDuration { minutes });
    }
}

// =========================================================
// Optimal-time resolver
// =========================================================

#[test]
fn test_resolver_finds_shared_slot() {
    let user_events = vec![iv(9, 0, 10, 0)];
    let friend_events = vec![iv(9, 0, 10, 0)];
    let result = resolve_optimal_times(
        &user_events,
        &friend_events,
        day_window(),
        Duration::minutes(30),
    )
    .unwrap();

    assert!(!result.fallback);
    assert_eq!(result.proposals, vec![iv(10, 0, 10, 30)]);
}

#[test]
fn test_resolver_never_returns_empty() {
    // Both calendars fully booked: the fallback anchors at the window start.
    let busy = vec![day_window()];
    let result =
        resolve_optimal_times(&busy, &busy, day_window(), Duration::minutes(45)).unwrap();

    assert!(result.fallback);
    assert_eq!(result.proposals, vec![iv(9, 0, 9, 45)]);
}

#[test]
fn test_empty_calendar_is_treated_as_fully_busy() {
    // One busy event for the user, nothing stored for the friend. The
    // friend's empty calendar becomes a window-spanning busy interval, so no
    // true overlap exists and the fallback fires.
    let user_events = vec![iv(10, 0, 11, 0)];
    let duration = Duration::minutes(60);

    let user_slots = find_free_slots(&user_events, day_window(), duration).unwrap();
    assert_eq!(user_slots, vec![iv(9, 0, 10, 0), iv(11, 0, 12, 0)]);

    let result = resolve_optimal_times(&user_events, &[], day_window(), duration).unwrap();
    assert!(result.fallback);
    assert_eq!(result.proposals, vec![iv(9, 0, 10, 0)]);
}

#[test]
fn test_resolver_offset_calendars() {
    // user busy 09:00-10:00 -> free slot {10:00,10:30}
    // friend busy 09:30-10:30 -> free slots {09:00,09:30}, {10:30,11:00}
    // No pair overlaps by 30 minutes, so the fallback fires.
    let user_events = vec![iv(9, 0, 10, 0)];
    let friend_events = vec![iv(9, 30, 10, 30)];
    let duration = Duration::minutes(30);

    let user_slots = find_free_slots(&user_events, day_window(), duration).unwrap();
    assert_eq!(user_slots, vec![iv(10, 0, 10, 30)]);

    let friend_slots = find_free_slots(&friend_events, day_window(), duration).unwrap();
    assert_eq!(friend_slots, vec![iv(9, 0, 9, 30), iv(10, 30, 11, 0)]);

    let result =
        resolve_optimal_times(&user_events, &friend_events, day_window(), duration).unwrap();
    assert!(result.fallback);
    assert_eq!(result.proposals, vec![iv(9, 0, 9, 30)]);
}

#[test]
fn test_resolver_caps_at_five_proposals() {
    // Identical sparse calendars give five matching slots each; the pairwise
    // intersection yields exactly the five diagonal matches.
    let events: Vec<Interval> = (0..7)
        .map(|i| iv(9 + i, 30, 10 + i, 0))
        .collect();
    let result =
        resolve_optimal_times(&events, &events, day_window(), Duration::minutes(30)).unwrap();

    assert!(!result.fallback);
    assert_eq!(result.proposals.len(), MAX_PROPOSALS);
    for proposal in &result.proposals {
        assert_eq!(proposal.duration(), Duration::minutes(30));
    }
}

#[test]
fn test_resolver_proposals_match_requested_duration_exactly() {
    let user_events = vec![iv(12, 0, 13, 0)];
    let friend_events = vec![iv(15, 0, 16, 0)];
    let result = resolve_optimal_times(
        &user_events,
        &friend_events,
        day_window(),
        Duration::minutes(90),
    )
    .unwrap();

    for proposal in &result.proposals {
        assert_eq!(proposal.duration(), Duration::minutes(90));
    }
}

#[test]
fn test_resolver_rejects_non_positive_duration() {
    let err = resolve_optimal_times(&[], &[], day_window(), Duration::zero()).unwrap_err();
    assert_eq!(err, SchedulerError::InvalidDuration { minutes: 0 });
}

// =========================================================
// Default window
// =========================================================

#[test]
fn test_fallback_window_spans_twelve_local_hours() {
    let day = NaiveDate::from_ymd_opt(2024, 10, 23).unwrap();
    let window = fallback_window(day);

    assert_eq!(window.duration(), Duration::hours(12));
    assert_eq!(window.start.with_timezone(&Local).hour(), 9);
    assert_eq!(window.end.with_timezone(&Local).hour(), 21);
}

#[test]
fn test_fallback_window_is_deterministic_per_day() {
    let day = NaiveDate::from_ymd_opt(2024, 10, 23).unwrap();
    assert_eq!(fallback_window(day), fallback_window(day));
}
