//! The reporter capability and the no-op reporter.

use std::ops::ControlFlow;
use std::time::Duration;

use chrono::{DateTime, Utc};
use compact_str::CompactString;

use crate::kind::{Kind, KindSet};

/// One node as seen by a traversal visitor.
#[derive(Debug, Clone, Copy)]
pub struct Entry<'a> {
    /// Child indices from the traversal start; empty for the start node.
    pub path: &'a [usize],
    pub kind: Kind,
    pub created_at: DateTime<Utc>,
    /// Present once the node was finalized.
    pub duration: Option<Duration>,
    pub message: &'a str,
}

impl Entry<'_> {
    /// Nesting level relative to the traversal start.
    pub fn depth(&self) -> usize {
        self.path.len()
    }
}

/// Capability set shared by every reporter.
///
/// The typed add methods always return a handle for the new node. Whether
/// the node was actually linked under `self` depends on the kinds `self`
/// currently accepts (see [`allow`](Report::allow)); the return value does
/// not tell, a traversal of `self` does.
pub trait Report: Sized {
    /// Add a labeled sub-context. The returned node accepts every kind.
    fn structure(&self, message: impl Into<CompactString>) -> Self;

    /// Add an error entry.
    fn error(&self, message: impl Into<CompactString>) -> Self;

    /// Add a warning entry.
    fn warn(&self, message: impl Into<CompactString>) -> Self;

    /// Add an informational entry.
    fn info(&self, message: impl Into<CompactString>) -> Self;

    /// Add a debug entry.
    fn debug(&self, message: impl Into<CompactString>) -> Self;

    /// Add a deprecation notice.
    fn deprecation(&self, message: impl Into<CompactString>) -> Self;

    /// Widen the set of kinds accepted as direct children.
    fn allow(&self, kinds: impl Into<KindSet>);

    /// Freeze the elapsed time since the node was created.
    fn finalize(&self);

    /// This node alone, e.g. `[2024-01-01T00:00:00.000000100Z] # build`.
    fn message(&self) -> String;

    /// Pre-order depth-first walk over this node and its descendants.
    ///
    /// Returning [`ControlFlow::Break`] from `visit` stops the walk at once
    /// and hands the break value back to the caller.
    fn traverse<B, F>(&self, visit: F) -> ControlFlow<B>
    where
        F: FnMut(&Entry<'_>) -> ControlFlow<B>;

    /// Whether this node or any descendant has the given kind.
    fn has_kind(&self, kind: Kind) -> bool {
        self.traverse(|entry| {
            if entry.kind == kind {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        })
        .is_break()
    }

    /// Whether the subtree holds an error entry.
    fn has_errors(&self) -> bool {
        self.has_kind(Kind::Error)
    }

    /// Whether the subtree holds a warning entry.
    fn has_warnings(&self) -> bool {
        self.has_kind(Kind::Warn)
    }

    /// Whether the subtree holds a deprecation notice.
    fn has_deprecations(&self) -> bool {
        self.has_kind(Kind::Deprecation)
    }
}

/// Reporter that records nothing.
///
/// Useful where reporting is disabled but code is written against
/// [`Report`]. Traversals visit no node, so it renders as an empty string
/// and every predicate is false.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Discard;

impl Report for Discard {
    fn structure(&self, _message: impl Into<CompactString>) -> Self {
        Discard
    }

    fn error(&self, _message: impl Into<CompactString>) -> Self {
        Discard
    }

    fn warn(&self, _message: impl Into<CompactString>) -> Self {
        Discard
    }

    fn info(&self, _message: impl Into<CompactString>) -> Self {
        Discard
    }

    fn debug(&self, _message: impl Into<CompactString>) -> Self {
        Discard
    }

    fn deprecation(&self, _message: impl Into<CompactString>) -> Self {
        Discard
    }

    fn allow(&self, _kinds: impl Into<KindSet>) {}

    fn finalize(&self) {}

    fn message(&self) -> String {
        String::new()
    }

    fn traverse<B, F>(&self, _visit: F) -> ControlFlow<B>
    where
        F: FnMut(&Entry<'_>) -> ControlFlow<B>,
    {
        ControlFlow::Continue(())
    }
}
