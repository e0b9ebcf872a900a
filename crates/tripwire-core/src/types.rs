//! Core types for tripwire-core.
//!
//! This module defines the raw instrumentation payload ([`RawEvent`]), the
//! owned canonical form produced from it ([`NormalizedEvent`]), the duration
//! [`Group`] keys, and the host [`FrameworkVersion`] descriptor.

use crate::error::VersionError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// RawEvent
// ---------------------------------------------------------------------------

/// Field names read from a raw instrumentation payload.
pub mod keys {
    pub const METHOD: &str = "method";
    pub const FORMAT: &str = "format";
    pub const PARAMS: &str = "params";
    pub const SQL: &str = "sql";
    pub const DB_RUNTIME: &str = "db_runtime";
    pub const VIEW_RUNTIME: &str = "view_runtime";
    pub const STATUS: &str = "status";
    pub const EXCEPTION: &str = "exception";
    pub const TIME: &str = "time";
    pub const DURATION: &str = "duration";
}

/// A loosely-typed instrumentation payload as published by the host framework.
///
/// Field presence and value types depend on the framework version and on the
/// kind of operation being observed. Nothing in tripwire mutates a `RawEvent`;
/// normalizers only borrow it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawEvent(Map<String, Value>);

impl RawEvent {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Look up a field. `null` values are reported as absent.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key).filter(|v| !v.is_null())
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_fields(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for RawEvent {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for RawEvent {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

// ---------------------------------------------------------------------------
// NormalizedEvent
// ---------------------------------------------------------------------------

/// A named sub-component of a request's total duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Group {
    Db,
    View,
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Group::Db => write!(f, "db"),
            Group::View => write!(f, "view"),
        }
    }
}

/// The canonical, owned form of one raw instrumentation event.
///
/// Produced by [`EventNormalizer::normalize`](crate::EventNormalizer::normalize).
/// Every field has already had its default policy applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedEvent {
    pub method: Option<String>,
    pub response_type: Option<String>,
    pub params: Map<String, Value>,
    pub query: Option<String>,
    pub db_duration: f64,
    pub view_duration: f64,
    /// Only categories with a positive duration are present.
    pub groups: BTreeMap<Group, f64>,
    pub status_code: u16,
    /// The raw time value, corrected to seconds on the one framework release
    /// that reports it in milliseconds.
    pub total_duration: f64,
    /// The raw `duration` value, never corrected.
    pub duration: f64,
}

// ---------------------------------------------------------------------------
// FrameworkVersion
// ---------------------------------------------------------------------------

/// `major.minor` of the host framework, injected into the normalizer.
///
/// Parses from `"7.0"` or `"7.0.8"`; anything past the minor component is
/// ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FrameworkVersion {
    pub major: u32,
    pub minor: u32,
}

impl FrameworkVersion {
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// Release 7.0 publishes event time in milliseconds; every other release
    /// uses seconds.
    pub fn reports_time_in_milliseconds(&self) -> bool {
        self.major == 7 && self.minor == 0
    }
}

impl fmt::Display for FrameworkVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl FromStr for FrameworkVersion {
    type Err = VersionError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(VersionError::Empty);
        }

        let mut parts = trimmed.split('.');
        let parse = |component: &str| {
            component
                .parse::<u32>()
                .map_err(|_| VersionError::NonNumeric {
                    input: input.to_string(),
                    component: component.to_string(),
                })
        };

        let major = parse(parts.next().unwrap_or_default())?;
        let minor = match parts.next() {
            Some(component) => parse(component)?,
            None => return Err(VersionError::MissingMinor(input.to_string())),
        };

        Ok(Self { major, minor })
    }
}

impl TryFrom<String> for FrameworkVersion {
    type Error = VersionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<FrameworkVersion> for String {
    fn from(version: FrameworkVersion) -> Self {
        version.to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
