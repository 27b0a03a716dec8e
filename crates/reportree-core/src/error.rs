//! Error aggregation.

use std::ops::ControlFlow;

use thiserror::Error;

use crate::kind::Kind;
use crate::report::Report;

/// Errors of a report tree gathered into one value.
///
/// Structure nodes become section headers and error nodes become
/// `error: <message>` entries, each indented by its nesting level.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("multiple errors:\n{report}")]
pub struct ReportError {
    report: String,
    errors: usize,
}

impl ReportError {
    /// The indented body, without the heading.
    pub fn report(&self) -> &str {
        &self.report
    }

    /// Number of error nodes in the report.
    pub fn error_count(&self) -> usize {
        self.errors
    }
}

/// Collect the structure and error nodes under `node` into a [`ReportError`].
///
/// Returns `None` only when the walk met neither kind. A structure node with
/// no errors below it still yields a report holding its header, so callers
/// that only care about actual errors should check
/// [`has_errors`](Report::has_errors) first or look at
/// [`ReportError::error_count`].
pub fn to_error<R: Report>(node: &R) -> Option<ReportError> {
    let mut report = String::new();
    let mut errors = 0;
    let _ = node.traverse(|entry| {
        let header = match entry.kind {
            Kind::Structure => "",
            Kind::Error => {
                errors += 1;
                "error: "
            }
            _ => return ControlFlow::<()>::Continue(()),
        };
        for _ in entry.path {
            report.push('\t');
        }
        report.push_str(header);
        report.push_str(entry.message);
        report.push('\n');
        ControlFlow::Continue(())
    });

    if report.is_empty() {
        None
    } else {
        Some(ReportError { report, errors })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Node;
    use crate::report::Discard;

    #[test]
    fn test_to_error_layout() {
        let root = Node::new("build");
        root.info("starting");
        root.error("missing manifest");
        let unit = root.structure("unit tests");
        unit.error("assertion failed");
        unit.warn("slow test");

        let err = to_error(&root).unwrap();
        assert_eq!(err.error_count(), 2);
        assert_eq!(
            err.to_string(),
            "multiple errors:\nbuild\n\terror: missing manifest\n\tunit tests\n\t\terror: assertion failed\n"
        );
    }

    #[test]
    fn test_structure_without_errors_still_reports_headers() {
        let root = Node::new("build");
        root.info("all good");

        let err = to_error(&root).unwrap();
        assert_eq!(err.error_count(), 0);
        assert_eq!(err.report(), "build\n");
    }

    #[test]
    fn test_leaf_without_errors_yields_none() {
        let root = Node::new("build");
        let info = root.info("all good");
        assert!(to_error(&info).is_none());
        assert!(to_error(&Discard).is_none());
    }

    #[test]
    fn test_error_leaf_alone() {
        let root = Node::new("build");
        let err = root.error("failed");
        let report = to_error(&err).unwrap();
        assert_eq!(report.report(), "error: failed\n");
        assert_eq!(report.error_count(), 1);
    }
}
