//! Tests for grouping entries by a derived key.

use chrono::{Duration, TimeZone, Utc};
use oncall_engine::{group_by, group_by_person, PersonRef, ScheduleEntry};

fn entry(person: &str, schedule: &str, hour: u32) -> ScheduleEntry {
    let start = Utc.with_ymd_and_hms(2026, 3, 1, hour, 0, 0).unwrap();
    ScheduleEntry {
        start,
        end: start + Duration::hours(1),
        person: PersonRef::new(person, person),
        schedule: schedule.to_string(),
    }
}

#[test]
fn two_keys_make_two_groups_covering_the_input() {
    let input = vec![
        entry("U1", "a", 9),
        entry("U2", "a", 9),
        entry("U1", "b", 10),
        entry("U2", "b", 11),
        entry("U1", "c", 12),
    ];

    let groups = group_by_person(input.clone());

    assert_eq!(groups.len(), 2);
    assert_eq!(groups["U1"].len(), 3);
    assert_eq!(groups["U2"].len(), 2);

    let mut union: Vec<ScheduleEntry> = groups.into_values().flatten().collect();
    let mut expected = input;
    union.sort_by(|a, b| (&a.person.id, &a.schedule).cmp(&(&b.person.id, &b.schedule)));
    expected.sort_by(|a, b| (&a.person.id, &a.schedule).cmp(&(&b.person.id, &b.schedule)));
    assert_eq!(union, expected, "no entry dropped or duplicated");
}

#[test]
fn insertion_order_is_preserved_within_a_group() {
    let groups = group_by_person(vec![
        entry("U1", "third", 15),
        entry("U2", "x", 9),
        entry("U1", "first", 9),
        entry("U1", "second", 12),
    ]);

    let schedules: Vec<&str> = groups["U1"].iter().map(|e| e.schedule.as_str()).collect();
    assert_eq!(schedules, vec!["third", "first", "second"]);
}

#[test]
fn empty_input_yields_empty_map() {
    let groups = group_by_person(Vec::new());
    assert!(groups.is_empty());
}

#[test]
fn arbitrary_key_functions_are_supported() {
    let groups = group_by(
        vec![entry("U1", "a", 9), entry("U2", "a", 10), entry("U3", "b", 11)],
        |e| e.schedule.clone(),
    );

    assert_eq!(groups.len(), 2);
    assert_eq!(groups["a"].len(), 2);
    assert_eq!(groups["b"][0].person.id, "U3");
}

#[test]
fn group_by_works_on_plain_values() {
    let groups = group_by(1..=10, |n| n % 3);

    assert_eq!(groups[&0], vec![3, 6, 9]);
    assert_eq!(groups[&1], vec![1, 4, 7, 10]);
    assert_eq!(groups[&2], vec![2, 5, 8]);
}
