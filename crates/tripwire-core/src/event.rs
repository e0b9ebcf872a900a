//! Event normalizer: typed accessors over a [`RawEvent`].
//!
//! Every accessor is total: a missing or mistyped field falls back to a
//! documented default instead of failing.
//!
//! | Accessor | Raw field | Default |
//! |----------|-----------|---------|
//! | `method` | `method` | `None` |
//! | `response_type` | `format` (`*/*` → `html`) | `None` |
//! | `params` | `params` | empty map |
//! | `query` | `sql` | `None` |
//! | `db_duration` | `db_runtime` | `0.0` |
//! | `view_duration` | `view_runtime` | `0.0` |
//! | `status_code` | `status`, then `exception` | `401` |
//! | `time` / `total_duration` | `time` | `0.0` |
//! | `duration` | `duration` | `0.0` |

use crate::config::Config;
use crate::status::{RescueResponses, StatusResolver};
use crate::types::{keys, FrameworkVersion, Group, NormalizedEvent, RawEvent};
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::cell::OnceCell;
use std::collections::BTreeMap;

/// The host framework reports `*/*` when the client accepts anything; that
/// request was served as HTML.
pub const HTML_RESPONSE_WILDCARD: &str = "*/*";

const HTML: &str = "html";
const MILLISECOND: f64 = 1000.0;
const UNMAPPED_EXCEPTION_STATUS: u16 = 500;
const MISSING_STATUS: u16 = 401;

// ---------------------------------------------------------------------------
// Normalizer
// ---------------------------------------------------------------------------

/// Long-lived factory holding the collaborators every event needs.
///
/// Cheap to share; hand each raw event to [`Normalizer::wrap`] to get its own
/// [`EventNormalizer`].
#[derive(Debug, Clone)]
pub struct Normalizer {
    version: FrameworkVersion,
    resolver: RescueResponses,
}

impl Normalizer {
    pub fn new(version: FrameworkVersion, resolver: RescueResponses) -> Self {
        if version.reports_time_in_milliseconds() {
            tracing::debug!(%version, "event times will be converted from milliseconds");
        }
        Self { version, resolver }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.framework.version,
            RescueResponses::from_entries(&config.rescue_responses),
        )
    }

    pub fn version(&self) -> FrameworkVersion {
        self.version
    }

    pub fn wrap<'a>(&'a self, raw: &'a RawEvent) -> EventNormalizer<'a> {
        EventNormalizer::new(raw, self.version, &self.resolver)
    }

    pub fn normalize(&self, raw: &RawEvent) -> NormalizedEvent {
        self.wrap(raw).normalize()
    }
}

// ---------------------------------------------------------------------------
// EventNormalizer
// ---------------------------------------------------------------------------

/// Canonical view of a single raw event.
///
/// Runtime lookups are memoized per instance, so an `EventNormalizer` is
/// neither `Sync` nor meant to outlive the event it wraps.
pub struct EventNormalizer<'a> {
    raw: &'a RawEvent,
    version: FrameworkVersion,
    resolver: &'a dyn StatusResolver,
    db_duration: OnceCell<f64>,
    view_duration: OnceCell<f64>,
}

impl<'a> EventNormalizer<'a> {
    pub fn new(
        raw: &'a RawEvent,
        version: FrameworkVersion,
        resolver: &'a dyn StatusResolver,
    ) -> Self {
        Self {
            raw,
            version,
            resolver,
            db_duration: OnceCell::new(),
            view_duration: OnceCell::new(),
        }
    }

    pub fn raw(&self) -> &'a RawEvent {
        self.raw
    }

    pub fn method(&self) -> Option<&'a str> {
        self.raw.get(keys::METHOD).and_then(Value::as_str)
    }

    /// The request format, with the `*/*` wildcard reported as `html`.
    ///
    /// Non-string formats are treated as absent.
    pub fn response_type(&self) -> Option<&'a str> {
        match self.raw.get(keys::FORMAT).and_then(Value::as_str) {
            Some(HTML_RESPONSE_WILDCARD) => Some(HTML),
            other => other,
        }
    }

    pub fn params(&self) -> Cow<'a, Map<String, Value>> {
        match self.raw.get(keys::PARAMS) {
            Some(Value::Object(params)) => Cow::Borrowed(params),
            _ => Cow::Owned(Map::new()),
        }
    }

    pub fn query(&self) -> Option<&'a str> {
        self.raw.get(keys::SQL).and_then(Value::as_str)
    }

    pub fn db_duration(&self) -> f64 {
        *self
            .db_duration
            .get_or_init(|| numeric(self.raw.get(keys::DB_RUNTIME)))
    }

    pub fn view_duration(&self) -> f64 {
        *self
            .view_duration
            .get_or_init(|| numeric(self.raw.get(keys::VIEW_RUNTIME)))
    }

    pub fn groups(&self) -> BTreeMap<Group, f64> {
        let mut groups = BTreeMap::new();
        if self.db_duration() > 0.0 {
            groups.insert(Group::Db, self.db_duration());
        }
        if self.view_duration() > 0.0 {
            groups.insert(Group::View, self.view_duration());
        }
        groups
    }

    /// Resolve the response status.
    ///
    /// 1. An explicit `status` is returned as-is.
    /// 2. Otherwise an `exception` is resolved through the [`StatusResolver`];
    ///    unmapped classes become 500.
    /// 3. Otherwise 401. The framework omits the status only for exceptions
    ///    and for rejected authorization, and there is no field that tells the
    ///    latter apart from other status-less events, so this is a heuristic.
    pub fn status_code(&self) -> u16 {
        if let Some(status) = self.raw.get(keys::STATUS).and_then(explicit_status) {
            return status;
        }

        if let Some(exception) = self.raw.get(keys::EXCEPTION).filter(|v| is_truthy(v)) {
            let class = exception_class(exception).unwrap_or_default();
            return match self.resolver.status_for(class) {
                0 => UNMAPPED_EXCEPTION_STATUS,
                status => status,
            };
        }

        tracing::trace!(
            method = self.method(),
            "event has neither status nor exception; assuming unauthorized"
        );
        MISSING_STATUS
    }

    /// The raw time value, in seconds.
    pub fn time(&self) -> f64 {
        let time = numeric(self.raw.get(keys::TIME));
        if self.version.reports_time_in_milliseconds() {
            tracing::trace!(time, "converting event time from milliseconds");
            return time / MILLISECOND;
        }
        time
    }

    pub fn total_duration(&self) -> f64 {
        self.time()
    }

    pub fn duration(&self) -> f64 {
        numeric(self.raw.get(keys::DURATION))
    }

    pub fn normalize(&self) -> NormalizedEvent {
        NormalizedEvent {
            method: self.method().map(str::to_owned),
            response_type: self.response_type().map(str::to_owned),
            params: self.params().into_owned(),
            query: self.query().map(str::to_owned),
            db_duration: self.db_duration(),
            view_duration: self.view_duration(),
            groups: self.groups(),
            status_code: self.status_code(),
            total_duration: self.total_duration(),
            duration: self.duration(),
        }
    }
}

// ---------------------------------------------------------------------------
// Value helpers
// ---------------------------------------------------------------------------

fn numeric(value: Option<&Value>) -> f64 {
    value.and_then(Value::as_f64).unwrap_or(0.0)
}

/// An explicit status as a `u16`: an integer, an integral float (`200.0`) or a
/// numeric string (`"200"`). Anything else, including out-of-range numbers,
/// counts as no status.
fn explicit_status(value: &Value) -> Option<u16> {
    match value {
        Value::Number(number) => match number.as_u64() {
            Some(status) => u16::try_from(status).ok(),
            None => number
                .as_f64()
                .filter(|status| status.fract() == 0.0 && (0.0..=f64::from(u16::MAX)).contains(status))
                .map(|status| status as u16),
        },
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

fn is_truthy(value: &Value) -> bool {
    !matches!(value, Value::Null | Value::Bool(false))
}

/// The exception field is `[class, message]`; a bare class string is accepted too.
fn exception_class(exception: &Value) -> Option<&str> {
    match exception {
        Value::String(class) => Some(class),
        Value::Array(pair) => pair.first().and_then(Value::as_str),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
