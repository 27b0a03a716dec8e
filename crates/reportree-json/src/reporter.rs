//! The flat reporter.

use std::io;

use chrono::{DateTime, Utc};
use compact_str::CompactString;
use reportree_core::{SystemTimer, Timer};
use serde::ser::{Serialize, SerializeStruct, Serializer};

use crate::error::FlatError;
use crate::level::Level;
use crate::message::{Fields, Message, Payload};

/// A named, ordered list of leveled messages with nested sub-reports.
///
/// Serializes to
/// `{"t":<unix>,"s":<name>,"m":[{"t":..,"k":..,"m":..,"p":{..}}],"n":[..]}`.
#[derive(Debug)]
pub struct FlatReport {
    name: CompactString,
    created_at: DateTime<Utc>,
    timer: Box<dyn Timer>,
    messages: Vec<Message>,
    nested: Vec<FlatReport>,
}

impl FlatReport {
    /// Create a report stamped by the wall clock.
    pub fn new(name: impl Into<CompactString>) -> Self {
        Self::with_timer(SystemTimer::new(), name)
    }

    /// Create a report stamped by `timer`.
    pub fn with_timer(timer: impl Timer + 'static, name: impl Into<CompactString>) -> Self {
        let mut timer: Box<dyn Timer> = Box::new(timer);
        let created_at = timer.now();
        Self::from_parts(timer, created_at, name.into())
    }

    fn from_parts(timer: Box<dyn Timer>, created_at: DateTime<Utc>, name: CompactString) -> Self {
        Self {
            name,
            created_at,
            timer,
            messages: Vec::new(),
            nested: Vec::new(),
        }
    }

    /// Name given at creation.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Instant the report was opened.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Messages recorded directly on this report, oldest first.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Sub-reports in the order they were opened.
    pub fn nested_reports(&self) -> &[FlatReport] {
        &self.nested
    }

    /// Append a message and return a builder for its payload.
    pub fn record(&mut self, level: Level, text: impl Into<CompactString>) -> Fields<'_> {
        let at = self.timer.now();
        self.messages.push(Message {
            at,
            level,
            text: text.into(),
            payload: Payload::new(),
        });
        tracing::trace!(report = %self.name, %level, "message recorded");
        let index = self.messages.len() - 1;
        Fields::new(&mut self.messages[index].payload)
    }

    /// Record a message at level `EMERG`.
    pub fn emerg(&mut self, text: impl Into<CompactString>) -> Fields<'_> {
        self.record(Level::Emerg, text)
    }

    /// Record a message at level `ALERT`.
    pub fn alert(&mut self, text: impl Into<CompactString>) -> Fields<'_> {
        self.record(Level::Alert, text)
    }

    /// Record a message at level `CRIT`.
    pub fn crit(&mut self, text: impl Into<CompactString>) -> Fields<'_> {
        self.record(Level::Crit, text)
    }

    /// Record a message at level `ERROR`.
    pub fn error(&mut self, text: impl Into<CompactString>) -> Fields<'_> {
        self.record(Level::Error, text)
    }

    /// Record a message at level `WARN`.
    pub fn warn(&mut self, text: impl Into<CompactString>) -> Fields<'_> {
        self.record(Level::Warn, text)
    }

    /// Record a message at level `NOTICE`.
    pub fn notice(&mut self, text: impl Into<CompactString>) -> Fields<'_> {
        self.record(Level::Notice, text)
    }

    /// Record a message at level `INFO`.
    pub fn info(&mut self, text: impl Into<CompactString>) -> Fields<'_> {
        self.record(Level::Info, text)
    }

    /// Record a message at level `DEBUG`.
    pub fn debug(&mut self, text: impl Into<CompactString>) -> Fields<'_> {
        self.record(Level::Debug, text)
    }

    /// Record a message at level `TRACE`.
    pub fn trace(&mut self, text: impl Into<CompactString>) -> Fields<'_> {
        self.record(Level::Trace, text)
    }

    /// Open a sub-report whose clock is derived from this report's timer.
    pub fn nested(&mut self, name: impl Into<CompactString>) -> &mut FlatReport {
        let (timer, created_at) = self.timer.derive();
        let index = self.nested.len();
        self.nested.push(Self::from_parts(timer, created_at, name.into()));
        &mut self.nested[index]
    }

    /// Number of messages at `level` in this report and its sub-reports.
    pub fn count(&self, level: Level) -> usize {
        let own = self.messages.iter().filter(|m| m.level == level).count();
        own + self.nested.iter().map(|n| n.count(level)).sum::<usize>()
    }

    /// Most severe level recorded anywhere in the report.
    pub fn worst_level(&self) -> Option<Level> {
        let own = self.messages.iter().map(|m| m.level).min();
        self.nested
            .iter()
            .filter_map(FlatReport::worst_level)
            .chain(own)
            .min()
    }

    /// Whether any message is at least as severe as `threshold`.
    pub fn has_at_least(&self, threshold: Level) -> bool {
        self.worst_level()
            .is_some_and(|level| level.at_least(threshold))
    }

    /// Whether no message was recorded here or in any sub-report.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty() && self.nested.iter().all(FlatReport::is_empty)
    }

    /// Serialize the report as compact JSON.
    pub fn to_json(&self) -> Result<String, FlatError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Serialize the report as indented JSON.
    pub fn to_json_pretty(&self) -> Result<String, FlatError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Serialize the report into a [`serde_json::Value`].
    pub fn to_value(&self) -> Result<serde_json::Value, FlatError> {
        Ok(serde_json::to_value(self)?)
    }

    /// Serialize the report into `writer`.
    pub fn to_writer<W: io::Write>(&self, writer: W) -> Result<(), FlatError> {
        serde_json::to_writer(writer, self)?;
        tracing::debug!(report = %self.name, messages = self.messages.len(), "report written");
        Ok(())
    }
}

impl Serialize for FlatReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("FlatReport", 4)?;
        state.serialize_field("t", &self.created_at.timestamp())?;
        state.serialize_field("s", &self.name)?;
        state.serialize_field("m", &self.messages)?;
        state.serialize_field("n", &self.nested)?;
        state.end()
    }
}
