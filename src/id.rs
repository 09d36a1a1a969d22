//! ID generation utilities for Redator
//!
//! Provides functions for generating unique identifiers for topics and tasks.

use chrono::{SecondsFormat, Utc};
use rand::Rng;

/// Get current timestamp in milliseconds since Unix epoch
pub fn now_ms() -> u64 {
    Utc::now().timestamp_millis().max(0) as u64
}

/// Current time as an RFC 3339 string with millisecond precision (UTC).
///
/// Fixed-width output, so lexical order equals chronological order.
pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Generate a unique topic ID
///
/// Format: `{timestamp_ms}-{random_hex}`
/// Example: `1738300800123-a1b2`
pub fn generate_topic_id() -> String {
    let random: u16 = rand::rng().random();
    format!("{}-{:04x}", now_ms(), random)
}

/// Generate a task ID
///
/// Format: `task-{timestamp_ms}-{random_hex}`
pub fn generate_task_id() -> String {
    let random: u32 = rand::rng().random();
    format!("task-{}-{:08x}", now_ms(), random)
}
