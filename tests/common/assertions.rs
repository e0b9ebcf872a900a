//! Domain-specific assertion macros for tripwire harnesses.
//!
//! These add context-rich failure messages that make it clear *which*
//! normalization or reporting rule was violated.

use tripwire_core::{NoticeRecord, NormalizedEvent};

// ---------------------------------------------------------------------------
// Normalized event assertions
// ---------------------------------------------------------------------------

/// Assert that a normalized event's groups hold exactly the given entries.
///
/// ```rust
/// assert_groups!(event, [(Group::Db, 12.0)]);
/// ```
#[macro_export]
macro_rules! assert_groups {
    ($event:expr, [$(($group:expr, $value:expr)),* $(,)?]) => {{
        let event: &tripwire_core::NormalizedEvent = &$event;
        let expected: std::collections::BTreeMap<tripwire_core::Group, f64> =
            std::collections::BTreeMap::from([$(($group, $value)),*]);
        if event.groups != expected {
            panic!(
                "assert_groups! failed:\n  expected: {:?}\n  actual:   {:?}\n  db: {} view: {}",
                expected, event.groups, event.db_duration, event.view_duration
            );
        }
    }};
}

/// Assert that a normalized event resolved to the given status.
#[macro_export]
macro_rules! assert_status {
    ($event:expr, $status:expr) => {{
        let event: &tripwire_core::NormalizedEvent = &$event;
        let expected: u16 = $status;
        if event.status_code != expected {
            panic!(
                "assert_status! failed:\n  expected: {}\n  actual:   {}\n  method: {:?} params: {:?}",
                expected, event.status_code, event.method, event.params
            );
        }
    }};
}

/// Groups never carry a non-positive duration.
pub fn assert_groups_positive(event: &NormalizedEvent) {
    for (group, value) in &event.groups {
        assert!(*value > 0.0, "group {group} has non-positive duration {value}");
    }
}

// ---------------------------------------------------------------------------
// Notice assertions
// ---------------------------------------------------------------------------

/// Assert the context a channel failure notice must carry.
pub fn assert_notice_context(record: &NoticeRecord, component: &str, action: &str) {
    assert_eq!(
        record.context_str("component"),
        Some(component),
        "notice component mismatch: {:?}",
        record.context
    );
    assert_eq!(
        record.context_str("action"),
        Some(action),
        "notice action mismatch: {:?}",
        record.context
    );
}
