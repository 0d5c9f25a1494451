// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::event::{EventBody, MatchPayload};
use proptest::prelude::*;
use serde_json::Map;
use yare::parameterized;

fn record(id: &str, action_time: &str) -> ArchivalRecord {
    ArchivalRecord {
        body: EventBody {
            id: id.to_string(),
            action_time: action_time.to_string(),
            source: None,
            destination: None,
            source_port: None,
            destination_port: None,
            transport_protocol: None,
            application_protocol: None,
            application_data: None,
            extra: Map::new(),
        },
        matches: MatchPayload::Inline(Vec::new()),
        match_index: None,
    }
}

fn is_key_safe(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '/' | '-' | '_')
}

#[test]
fn key_uses_base_date_and_encoded_id() {
    let layout = KeyLayout::new("events/", None);
    let key = layout.key_for(&record("abc", "2024-03-05T10:00:00Z")).unwrap();
    assert_eq!(key.as_str(), "events/2024/03/05/YWJj");
}

#[test]
fn key_includes_prefix() {
    let layout = KeyLayout::new("events", Some("siteA"));
    let key = layout.key_for(&record("abc", "2024-03-05T10:00:00Z")).unwrap();
    assert_eq!(key.as_str(), "events/2024/03/05/siteA-YWJj");
}

#[test]
fn key_appends_match_index_for_fan_out() {
    let layout = KeyLayout::new("events", None);
    let mut rec = record("abc", "2024-03-05T10:00:00Z");
    rec.match_index = Some(2);
    let key = layout.key_for(&rec).unwrap();
    assert_eq!(key.as_str(), "events/2024/03/05/YWJj-2");
}

#[parameterized(
    empty = { "", "" },
    slash_only = { "/", "" },
    leading_slash = { "/archive/tc", "archive/tc/" },
    trailing_slash = { "archive/", "archive/" },
    bare = { "archive", "archive/" },
)]
fn base_path_is_normalized(input: &str, expected: &str) {
    assert_eq!(KeyLayout::new(input, None).base_path(), expected);
}

#[test]
fn empty_prefix_is_ignored() {
    let layout = KeyLayout::new("a", Some("  "));
    assert_eq!(layout.prefix(), None);
}

#[parameterized(
    zulu = { "2024-03-05T23:30:00Z", "2024/03/05" },
    fractional = { "2024-03-05T23:30:00.123456Z", "2024/03/05" },
    positive_offset_previous_day = { "2024-03-06T01:30:00+02:00", "2024/03/05" },
    negative_offset_next_day = { "2024-03-05T22:30:00-05:00", "2024/03/06" },
    naive_t = { "2024-03-05T23:30:00", "2024/03/05" },
    naive_space = { "2024-03-05 23:30:00.5", "2024/03/05" },
)]
fn date_partition_is_utc(timestamp: &str, partition: &str) {
    let layout = KeyLayout::new("", None);
    let key = layout.key_for(&record("x", timestamp)).unwrap();
    assert!(
        key.as_str().starts_with(partition),
        "{} does not start with {}",
        key,
        partition
    );
}

#[test]
fn unparseable_timestamp_is_an_error() {
    let layout = KeyLayout::new("", None);
    let result = layout.key_for(&record("x", "yesterday"));
    assert!(matches!(result, Err(KeyError::InvalidTimestamp { .. })));
}

#[test]
fn non_printable_identifier_yields_safe_key() {
    let layout = KeyLayout::new("base", Some("p"));
    let key = layout
        .key_for(&record("\u{0}\u{7}/../\u{ff}\n+=", "2024-01-01T00:00:00Z"))
        .unwrap();
    let tail = key.as_str().trim_start_matches("base/2024/01/01/");
    assert!(!tail.contains('/'));
    assert!(key.as_str().chars().all(is_key_safe), "unsafe key: {}", key);
}

#[test]
fn heartbeat_key_lives_under_base() {
    assert_eq!(
        KeyLayout::new("events", None).heartbeat_key().as_str(),
        "events/_heartbeat/heartbeat.json"
    );
    assert_eq!(
        KeyLayout::new("events", Some("siteA")).heartbeat_key().as_str(),
        "events/_heartbeat/siteA-heartbeat.json"
    );
}

proptest! {
    #[test]
    fn derived_keys_are_safe_for_any_identifier(id in any::<String>()) {
        let layout = KeyLayout::new("archive", Some("tc"));
        let key = layout.key_for(&record(&id, "2023-12-31T23:59:59Z")).unwrap();
        prop_assert!(key.as_str().chars().all(is_key_safe));
        prop_assert!(key.as_str().starts_with("archive/2023/12/31/tc-"));
    }

    #[test]
    fn key_derivation_is_deterministic(id in any::<String>()) {
        let layout = KeyLayout::new("archive", None);
        let rec = record(&id, "2023-06-01T12:00:00Z");
        prop_assert_eq!(layout.key_for(&rec).unwrap(), layout.key_for(&rec.clone()).unwrap());
    }

    #[test]
    fn distinct_identifiers_get_distinct_keys(a in any::<String>(), b in any::<String>()) {
        prop_assume!(a != b);
        let layout = KeyLayout::new("", None);
        let ka = layout.key_for(&record(&a, "2023-06-01T12:00:00Z")).unwrap();
        let kb = layout.key_for(&record(&b, "2023-06-01T12:00:00Z")).unwrap();
        prop_assert_ne!(ka, kb);
    }
}
