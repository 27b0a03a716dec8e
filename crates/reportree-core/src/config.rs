//! Rendering configuration.

use chrono::SecondsFormat;
use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::kind::KindSet;

/// Precision of rendered timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimestampFormat {
    /// RFC 3339 with nanoseconds, e.g. `2024-01-01T00:00:00.000000100Z`.
    #[default]
    Nanos,
    Micros,
    Millis,
    Seconds,
    /// Leave timestamps out.
    Omit,
}

impl TimestampFormat {
    pub(crate) fn seconds_format(self) -> Option<SecondsFormat> {
        match self {
            Self::Nanos => Some(SecondsFormat::Nanos),
            Self::Micros => Some(SecondsFormat::Micros),
            Self::Millis => Some(SecondsFormat::Millis),
            Self::Seconds => Some(SecondsFormat::Secs),
            Self::Omit => None,
        }
    }
}

/// Options for rendering a report tree as text.
#[derive(Debug, Clone, PartialEq, Eq, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct RenderOptions {
    /// Prefix repeated once per nesting level.
    #[builder(default = "String::from(\"\\t\")")]
    #[serde(default = "default_indent")]
    pub indent: String,

    /// Timestamp precision.
    #[builder(default)]
    #[serde(default)]
    pub timestamps: TimestampFormat,

    /// Show durations of finalized nodes.
    #[builder(default = "true")]
    #[serde(default = "default_true")]
    pub durations: bool,

    /// Kinds that produce a line. Nodes of other kinds are skipped but
    /// their descendants are still rendered.
    #[builder(default = "KindSet::ALL")]
    #[serde(default = "default_kinds")]
    pub kinds: KindSet,
}

fn default_indent() -> String {
    String::from("\t")
}

fn default_true() -> bool {
    true
}

fn default_kinds() -> KindSet {
    KindSet::ALL
}

impl RenderOptionsBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(ref indent) = self.indent {
            if indent.is_empty() {
                return Err("Indent cannot be empty".to_string());
            }
        }
        Ok(())
    }
}

impl RenderOptions {
    /// Create a new render options builder.
    pub fn builder() -> RenderOptionsBuilder {
        RenderOptionsBuilder::default()
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            indent: default_indent(),
            timestamps: TimestampFormat::default(),
            durations: true,
            kinds: KindSet::ALL,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::Kind;

    #[test]
    fn test_builder_defaults_match_default() {
        let options = RenderOptions::builder().build().unwrap();
        assert_eq!(options, RenderOptions::default());
        assert_eq!(options.indent, "\t");
        assert!(options.durations);
        assert_eq!(options.kinds, KindSet::ALL);
    }

    #[test]
    fn test_builder_overrides() {
        let options = RenderOptions::builder()
            .indent("  ")
            .timestamps(TimestampFormat::Omit)
            .durations(false)
            .kinds(Kind::Structure | Kind::Error)
            .build()
            .unwrap();

        assert_eq!(options.indent, "  ");
        assert_eq!(options.timestamps, TimestampFormat::Omit);
        assert!(!options.durations);
        assert!(!options.kinds.contains(Kind::Info));
    }

    #[test]
    fn test_builder_rejects_empty_indent() {
        let err = RenderOptions::builder().indent("").build().unwrap_err();
        assert!(err.to_string().contains("Indent cannot be empty"));
    }

    #[test]
    fn test_deserialize_fills_defaults() {
        let options: RenderOptions = serde_json::from_str(r#"{"timestamps":"millis"}"#).unwrap();
        assert_eq!(options.indent, "\t");
        assert_eq!(options.timestamps, TimestampFormat::Millis);
        assert!(options.durations);
        assert_eq!(options.kinds, KindSet::ALL);
    }
}
