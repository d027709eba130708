//! Shared test harness for record store backends
//!
//! Provides record builders and the `record_store_tests!` macro that checks
//! any `RecordStore` implementation against the same contract.
//!
//! # Usage
//!
//! From any integration test file in `tests/`:
//! ```rust,ignore
//! #[macro_use]
//! mod storage_harness;
//! use storage_harness::*;
//! ```

#![allow(dead_code)]

#[macro_use]
pub mod record_store_tests;

use payroll::core::entity::Record;
use serde_json::{Value, json};

/// Build a record from a JSON object literal
pub fn record(value: Value) -> Record {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {other}"),
    }
}

/// A project row with a distinct name and budget
pub fn project(name: &str, budget: i64) -> Record {
    record(json!({
        "name": name,
        "description": format!("{name} description"),
        "budget": budget,
        "active": true,
    }))
}

/// `count` projects named `project-0`, `project-1`, ...
pub fn sample_projects(count: usize) -> Vec<Record> {
    (0..count)
        .map(|i| project(&format!("project-{i}"), 1_000 * i as i64))
        .collect()
}
