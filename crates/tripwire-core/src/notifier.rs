//! Notifiers: where captured failures are delivered.
//!
//! The reporting backend is not part of tripwire; a [`Notifier`] is the seam
//! it plugs into. Two sinks ship with the crate:
//!
//! - [`TracingNotifier`] emits each notice as a structured `error` event.
//! - [`MemoryNotifier`] keeps owned [`NoticeRecord`]s in memory.

use crate::config::NotifierConfig;
use crate::error::NotifyError;
use crate::notice::{Notice, NoticeRecord};
use serde_json::Value;
use std::sync::{Arc, Mutex};

/// Delivery pipeline for captured failures.
///
/// Called synchronously from the failing invocation. An `Err` tells the
/// caller delivery failed; callers never let it replace the failure being
/// reported.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: &Notice<'_>) -> Result<(), NotifyError>;
}

impl<N: Notifier + ?Sized> Notifier for Arc<N> {
    fn notify(&self, notice: &Notice<'_>) -> Result<(), NotifyError> {
        (**self).notify(notice)
    }
}

impl<N: Notifier + ?Sized> Notifier for &N {
    fn notify(&self, notice: &Notice<'_>) -> Result<(), NotifyError> {
        (**self).notify(notice)
    }
}

// ---------------------------------------------------------------------------
// TracingNotifier
// ---------------------------------------------------------------------------

/// Logs every notice at `error` level.
#[derive(Debug, Clone, Copy)]
pub struct TracingNotifier {
    include_params: bool,
}

impl TracingNotifier {
    pub fn new(include_params: bool) -> Self {
        Self { include_params }
    }

    pub fn from_config(config: &NotifierConfig) -> Self {
        Self::new(config.include_params)
    }
}

impl Default for TracingNotifier {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Notifier for TracingNotifier {
    fn notify(&self, notice: &Notice<'_>) -> Result<(), NotifyError> {
        let component = notice.context.get("component").and_then(Value::as_str);
        let action = notice.context.get("action").and_then(Value::as_str);
        let chain = notice.error_chain().join(": ");

        if self.include_params {
            let params = Value::Object(notice.params.clone());
            tracing::error!(component, action, error = %chain, %params, "failure reported");
        } else {
            tracing::error!(component, action, error = %chain, "failure reported");
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// MemoryNotifier
// ---------------------------------------------------------------------------

/// Records notices in memory, in delivery order.
#[derive(Debug, Default)]
pub struct MemoryNotifier {
    records: Mutex<Vec<NoticeRecord>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<NoticeRecord> {
        self.records
            .lock()
            .map(|records| records.clone())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.records.lock().map(|records| records.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drain everything recorded so far.
    pub fn take(&self) -> Vec<NoticeRecord> {
        self.records
            .lock()
            .map(|mut records| std::mem::take(&mut *records))
            .unwrap_or_default()
    }
}

impl Notifier for MemoryNotifier {
    fn notify(&self, notice: &Notice<'_>) -> Result<(), NotifyError> {
        let mut records = self.records.lock().map_err(|_| NotifyError::Poisoned)?;
        records.push(notice.to_record());
        Ok(())
    }
}
