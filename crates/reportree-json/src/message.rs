//! Messages and their payloads.

use chrono::{DateTime, Utc};
use compact_str::CompactString;
use indexmap::IndexMap;
use serde::Serialize;

use crate::level::Level;

/// Scalar payload value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Scalar {
    Int(i64),
    Float(f64),
    Str(CompactString),
    Bool(bool),
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for Scalar {
    fn from(value: i32) -> Self {
        Self::Int(value.into())
    }
}

impl From<u32> for Scalar {
    fn from(value: u32) -> Self {
        Self::Int(value.into())
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<f32> for Scalar {
    fn from(value: f32) -> Self {
        Self::Float(value.into())
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Self::Str(value.into())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Self::Str(value.into())
    }
}

impl From<CompactString> for Scalar {
    fn from(value: CompactString) -> Self {
        Self::Str(value)
    }
}

/// Insertion-ordered message payload.
pub type Payload = IndexMap<CompactString, Scalar>;

/// One message of a flat report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message {
    #[serde(rename = "t", with = "chrono::serde::ts_seconds")]
    pub at: DateTime<Utc>,
    #[serde(rename = "k")]
    pub level: Level,
    #[serde(rename = "m")]
    pub text: CompactString,
    #[serde(rename = "p")]
    pub payload: Payload,
}

/// Builder attaching payload values to a freshly recorded message.
#[derive(Debug)]
pub struct Fields<'a> {
    payload: &'a mut Payload,
}

impl<'a> Fields<'a> {
    pub(crate) fn new(payload: &'a mut Payload) -> Self {
        Self { payload }
    }

    /// Set `key` to `value`. A repeated key keeps its first position and
    /// takes the new value.
    pub fn with(self, key: impl Into<CompactString>, value: impl Into<Scalar>) -> Self {
        self.payload.insert(key.into(), value.into());
        self
    }
}
