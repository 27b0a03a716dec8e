//! Text rendering of report trees.

use std::fmt::{self, Write};
use std::ops::ControlFlow;
use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::config::RenderOptions;
use crate::kind::Kind;
use crate::report::{Entry, Report};

/// Render `node` and its descendants with the default options.
///
/// Each node becomes one line, indented by one tab per nesting level:
///
/// ```text
/// #[2024-01-01T00:00:00.000000100Z] build
/// 	<error>[2024-01-01T00:00:00.000000200Z 100ns] compile failed
/// ```
pub fn render<R: Report>(node: &R) -> String {
    render_with(node, &RenderOptions::default())
}

/// Render `node` and its descendants with custom options.
pub fn render_with<R: Report>(node: &R, options: &RenderOptions) -> String {
    let mut out = String::new();
    // String as fmt::Write is infallible.
    let _ = render_into(node, options, &mut out);
    out
}

/// Stream the rendering of `node` into any [`fmt::Write`].
pub fn render_into<R, W>(node: &R, options: &RenderOptions, out: &mut W) -> fmt::Result
where
    R: Report,
    W: Write + ?Sized,
{
    let flow = node.traverse(|entry| match write_line(out, entry, options) {
        Ok(()) => ControlFlow::Continue(()),
        Err(err) => ControlFlow::Break(err),
    });
    match flow {
        ControlFlow::Continue(()) => Ok(()),
        ControlFlow::Break(err) => Err(err),
    }
}

fn write_line<W: Write + ?Sized>(
    out: &mut W,
    entry: &Entry<'_>,
    options: &RenderOptions,
) -> fmt::Result {
    if !options.kinds.contains(entry.kind) {
        return Ok(());
    }
    for _ in entry.path {
        out.write_str(&options.indent)?;
    }
    out.write_str(entry.kind.tag())?;

    let timestamp = options.timestamps.seconds_format();
    let duration = entry.duration.filter(|_| options.durations);
    match (timestamp, duration) {
        (Some(format), Some(duration)) => write!(
            out,
            "[{} {}ns]",
            entry.created_at.to_rfc3339_opts(format, true),
            duration.as_nanos()
        )?,
        (Some(format), None) => write!(out, "[{}]", entry.created_at.to_rfc3339_opts(format, true))?,
        (None, Some(duration)) => write!(out, "[{}ns]", duration.as_nanos())?,
        (None, None) => {}
    }
    writeln!(out, " {}", entry.message)
}

/// Single-node form used by [`Report::message`].
pub(crate) fn message_line(
    kind: Kind,
    created_at: DateTime<Utc>,
    duration: Option<Duration>,
    message: &str,
) -> String {
    let timestamp = created_at.to_rfc3339_opts(SecondsFormat::Nanos, true);
    match duration {
        Some(duration) => format!(
            "[{timestamp} {}ns] {} {message}",
            duration.as_nanos(),
            kind.tag()
        ),
        None => format!("[{timestamp}] {} {message}", kind.tag()),
    }
}
