//! Notices: a captured failure plus the context a notifier needs to report it.
//!
//! A [`Notice`] borrows the failure it describes, so it only lives for the
//! duration of the notify call. Notifiers that keep anything afterwards
//! convert it into an owned [`NoticeRecord`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::any::Any;
use std::collections::HashMap;
use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

/// Any failure a notice can describe.
pub type Failure = dyn StdError + Send + Sync + 'static;

/// Shared, type-erased value stashed on a notice for downstream correlation.
pub type Stashed = Arc<dyn Any + Send + Sync>;

/// A failure being reported, enriched with context and params.
pub struct Notice<'a> {
    failure: &'a Failure,
    pub context: Map<String, Value>,
    pub params: Map<String, Value>,
    pub stash: HashMap<String, Stashed>,
    pub occurred_at: DateTime<Utc>,
}

impl<'a> Notice<'a> {
    pub fn new(failure: &'a Failure) -> Self {
        Self {
            failure,
            context: Map::new(),
            params: Map::new(),
            stash: HashMap::new(),
            occurred_at: Utc::now(),
        }
    }

    pub fn failure(&self) -> &'a Failure {
        self.failure
    }

    pub fn message(&self) -> String {
        self.failure.to_string()
    }

    /// Messages of the failure and each of its sources, outermost first.
    pub fn error_chain(&self) -> Vec<String> {
        let mut chain = Vec::new();
        let mut current: Option<&(dyn StdError + 'static)> = Some(self.failure);
        while let Some(err) = current {
            chain.push(err.to_string());
            current = err.source();
        }
        chain
    }

    pub fn stash_value(&mut self, key: impl Into<String>, value: Stashed) {
        self.stash.insert(key.into(), value);
    }

    /// Fetch a stashed value back as its concrete type.
    pub fn stashed<T: Any + Send + Sync>(&self, key: &str) -> Option<Arc<T>> {
        self.stash.get(key).cloned()?.downcast::<T>().ok()
    }

    pub fn to_record(&self) -> NoticeRecord {
        let mut stash_keys: Vec<String> = self.stash.keys().cloned().collect();
        stash_keys.sort();
        NoticeRecord {
            message: self.message(),
            error_chain: self.error_chain(),
            context: self.context.clone(),
            params: self.params.clone(),
            stash_keys,
            occurred_at: self.occurred_at,
        }
    }
}

impl fmt::Debug for Notice<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut stash_keys: Vec<&String> = self.stash.keys().collect();
        stash_keys.sort();
        f.debug_struct("Notice")
            .field("failure", &self.failure.to_string())
            .field("context", &self.context)
            .field("params", &self.params)
            .field("stash", &stash_keys)
            .field("occurred_at", &self.occurred_at)
            .finish()
    }
}

/// Owned snapshot of a [`Notice`]. Stashed values are not carried over, only
/// their keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoticeRecord {
    pub message: String,
    pub error_chain: Vec<String>,
    pub context: Map<String, Value>,
    pub params: Map<String, Value>,
    pub stash_keys: Vec<String>,
    pub occurred_at: DateTime<Utc>,
}

impl NoticeRecord {
    pub fn context_str(&self, key: &str) -> Option<&str> {
        self.context.get(key).and_then(Value::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use thiserror::Error;

    #[derive(Debug, Error)]
    #[error("query failed")]
    struct QueryFailed(#[source] std::io::Error);

    #[test]
    fn error_chain_walks_sources() {
        let failure = QueryFailed(std::io::Error::other("socket closed"));
        let notice = Notice::new(&failure);
        assert_eq!(notice.message(), "query failed");
        assert_eq!(notice.error_chain(), vec!["query failed", "socket closed"]);
    }

    #[test]
    fn stash_round_trips_concrete_type() {
        let failure = std::io::Error::other("boom");
        let mut notice = Notice::new(&failure);
        notice.stash_value("connection", Arc::new(42_u64));
        assert_eq!(notice.stashed::<u64>("connection").as_deref(), Some(&42));
        assert!(notice.stashed::<String>("connection").is_none());
        assert!(notice.stashed::<u64>("missing").is_none());
    }

    #[test]
    fn record_keeps_context_and_stash_keys() {
        let failure = std::io::Error::other("boom");
        let mut notice = Notice::new(&failure);
        notice.context.insert("action".into(), json!("speak"));
        notice.params.insert("msg".into(), json!("hi"));
        notice.stash_value("b", Arc::new(()));
        notice.stash_value("a", Arc::new(()));

        let record = notice.to_record();
        assert_eq!(record.message, "boom");
        assert_eq!(record.context_str("action"), Some("speak"));
        assert_eq!(record.params.get("msg"), Some(&json!("hi")));
        assert_eq!(record.stash_keys, vec!["a", "b"]);
        assert_eq!(record.occurred_at, notice.occurred_at);
    }
}
