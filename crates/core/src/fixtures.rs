// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Record builders for tests
#![cfg_attr(coverage_nightly, coverage(off))]

use crate::event::{EventBody, Formula, FormulaMatch, MatchAction, RawEventRecord};
use serde_json::{Map, Value};

/// A record with `match_count` matches titled `rule-0`, `rule-1`, ...
pub fn raw_record(id: &str, action_time: &str, match_count: usize) -> RawEventRecord {
    RawEventRecord {
        body: EventBody {
            id: id.to_string(),
            action_time: action_time.to_string(),
            source: Some("198.51.100.4".to_string()),
            destination: Some("203.0.113.9".to_string()),
            source_port: Some(49152),
            destination_port: Some(443),
            transport_protocol: Some("TCP".to_string()),
            application_protocol: Some("TLS".to_string()),
            application_data: Some(serde_json::json!({ "sniHost": "example.org" })),
            extra: Map::new(),
        },
        formula_matches: (0..match_count).map(formula_match).collect(),
    }
}

pub fn formula_match(n: usize) -> FormulaMatch {
    FormulaMatch {
        action: Some(MatchAction {
            response: Some("BLOCK".to_string()),
            extra: Map::new(),
        }),
        formula: Formula {
            formula_id: Some(Value::from(1000 + n as u64)),
            title: Some(format!("rule-{}", n)),
            background: None,
            tags: Vec::new(),
            extra: Map::new(),
        },
        extra: Map::new(),
    }
}
