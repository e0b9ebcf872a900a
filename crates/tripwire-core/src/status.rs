//! Exception class → HTTP status lookup.
//!
//! When a raw event carries no explicit status but does carry an exception,
//! the normalizer asks a [`StatusResolver`] which status the host framework
//! would have rendered for that exception class. A resolver returns `0` for
//! classes it does not know; the normalizer turns that into `500`.

use crate::config::RescueResponse;
use std::collections::HashMap;

/// Maps an exception class name to the status the host framework renders for it.
pub trait StatusResolver {
    /// Returns `0` when the class is unmapped.
    fn status_for(&self, exception_class: &str) -> u16;
}

impl<F> StatusResolver for F
where
    F: Fn(&str) -> u16,
{
    fn status_for(&self, exception_class: &str) -> u16 {
        self(exception_class)
    }
}

/// Table-driven resolver mirroring the host framework's rescue responses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RescueResponses {
    table: HashMap<String, u16>,
}

impl RescueResponses {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = &'a RescueResponse>,
    {
        entries
            .into_iter()
            .fold(Self::new(), |table, entry| table.with(&entry.exception, entry.status))
    }

    pub fn with(mut self, exception_class: impl Into<String>, status: u16) -> Self {
        self.insert(exception_class, status);
        self
    }

    /// Later inserts for the same class win.
    pub fn insert(&mut self, exception_class: impl Into<String>, status: u16) {
        self.table.insert(exception_class.into(), status);
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl StatusResolver for RescueResponses {
    fn status_for(&self, exception_class: &str) -> u16 {
        self.table.get(exception_class).copied().unwrap_or(0)
    }
}
