//! Test builders: ergonomic constructors for raw events, channels, and
//! invocations.
//!
//! These builders are designed for readability in test assertions, not for
//! production use. They panic on invalid input rather than returning `Result`.

use serde_json::{Map, Value};
use std::sync::Arc;
use thiserror::Error;
use tripwire_channel::{Channel, Invocation};
use tripwire_core::{FrameworkVersion, Normalizer, RawEvent, RescueResponses};

// ---------------------------------------------------------------------------
// RawEventBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for [`RawEvent`] test fixtures.
///
/// # Example
///
/// ```rust
/// let raw = RawEventBuilder::new()
///     .method("GET")
///     .format("*/*")
///     .db_runtime(12.0)
///     .build();
/// ```
#[derive(Default)]
pub struct RawEventBuilder {
    fields: Map<String, Value>,
}

impl RawEventBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(key.to_string(), value.into());
        self
    }

    pub fn method(self, method: &str) -> Self {
        self.field("method", method)
    }

    pub fn format(self, format: &str) -> Self {
        self.field("format", format)
    }

    pub fn params(self, params: Value) -> Self {
        self.field("params", params)
    }

    pub fn sql(self, sql: &str) -> Self {
        self.field("sql", sql)
    }

    pub fn db_runtime(self, ms: f64) -> Self {
        self.field("db_runtime", ms)
    }

    pub fn view_runtime(self, ms: f64) -> Self {
        self.field("view_runtime", ms)
    }

    pub fn status(self, status: u64) -> Self {
        self.field("status", status)
    }

    pub fn exception(self, class: &str, message: &str) -> Self {
        self.field("exception", serde_json::json!([class, message]))
    }

    pub fn time(self, time: f64) -> Self {
        self.field("time", time)
    }

    pub fn duration(self, ms: f64) -> Self {
        self.field("duration", ms)
    }

    pub fn build(self) -> RawEvent {
        RawEvent::new(self.fields)
    }
}

// ---------------------------------------------------------------------------
// Normalizers
// ---------------------------------------------------------------------------

/// Normalizer for the given version with a small rescue table.
pub fn normalizer(major: u32, minor: u32) -> Normalizer {
    Normalizer::new(
        FrameworkVersion::new(major, minor),
        RescueResponses::new()
            .with("ActiveRecord::RecordNotFound", 404)
            .with("ActionController::ParameterMissing", 400)
            .with("ActiveRecord::StaleObjectError", 409),
    )
}

// ---------------------------------------------------------------------------
// Channels
// ---------------------------------------------------------------------------

/// Stand-in for the host's connection object.
#[derive(Debug, PartialEq, Eq)]
pub struct TestConnection {
    pub id: String,
}

/// A chat channel whose `speak` action fails on demand.
pub struct ChatChannel {
    pub connection: Arc<TestConnection>,
}

impl ChatChannel {
    pub fn new(connection_id: &str) -> Self {
        Self {
            connection: Arc::new(TestConnection { id: connection_id.to_string() }),
        }
    }

    pub fn speak(&self, invocation: &Invocation) -> anyhow::Result<()> {
        match invocation.payload().get("msg").and_then(Value::as_str) {
            Some("boom") | None => Err(RuntimeError("boom".to_string()).into()),
            Some(_) => Ok(()),
        }
    }
}

impl Channel for ChatChannel {
    type Connection = TestConnection;

    fn connection(&self) -> Arc<TestConnection> {
        Arc::clone(&self.connection)
    }
}

/// The generic failure an action raises in tests.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct RuntimeError(pub String);

/// A `perform` invocation from a JSON object literal.
pub fn perform(payload: Value) -> Invocation {
    match payload {
        Value::Object(map) => Invocation::perform(map),
        other => panic!("perform payload must be an object, got {other}"),
    }
}
