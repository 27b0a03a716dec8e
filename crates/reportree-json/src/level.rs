//! Message levels.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, FromRepr, IntoEnumIterator};

/// Severity of a flat report message.
///
/// The syslog levels plus `TRACE`, ordered from most to least severe.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
    FromRepr,
)]
#[repr(u8)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum Level {
    Emerg = 0,
    Alert = 1,
    Crit = 2,
    Error = 3,
    Warn = 4,
    Notice = 5,
    Info = 6,
    Debug = 7,
    Trace = 8,
}

impl Level {
    /// All levels, most severe first.
    pub fn all() -> impl Iterator<Item = Level> {
        Self::iter()
    }

    /// Numeric severity; 0 is the most severe.
    pub fn severity(self) -> u8 {
        self as u8
    }

    /// Whether this level is at least as severe as `threshold`.
    pub fn at_least(self, threshold: Level) -> bool {
        self <= threshold
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn test_level_names() {
        let names: Vec<String> = Level::all().map(|level| level.to_string()).collect();
        assert_eq!(names, vec![
            "EMERG", "ALERT", "CRIT", "ERROR", "WARN", "NOTICE", "INFO", "DEBUG", "TRACE"
        ]);
        assert_eq!(Level::from_str("NOTICE").unwrap(), Level::Notice);
        assert_eq!(serde_json::to_string(&Level::Crit).unwrap(), "\"CRIT\"");
    }

    #[test]
    fn test_severity_ordering() {
        assert_eq!(Level::Emerg.severity(), 0);
        assert_eq!(Level::Trace.severity(), 8);
        assert_eq!(Level::from_repr(4), Some(Level::Warn));
        assert!(Level::Crit.at_least(Level::Error));
        assert!(Level::Error.at_least(Level::Error));
        assert!(!Level::Info.at_least(Level::Warn));
    }
}
