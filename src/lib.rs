//! reportree - hierarchical structured reports.
//!
//! Build a tree describing one unit of work, then render it as text, turn
//! its errors into an error value, or export it as JSON:
//!
//! ```rust
//! use reportree::{Node, Report, render, snapshot, to_error};
//!
//! let report = Node::new("request GET /orders");
//! let auth = report.structure("auth");
//! auth.info("token accepted");
//! auth.finalize();
//!
//! let db = report.structure("db");
//! db.warn("slow query");
//! db.error("timeout after 5s");
//! db.finalize();
//! report.finalize();
//!
//! print!("{}", render(&report));
//! if let Some(err) = to_error(&report).filter(|err| err.error_count() > 0) {
//!     eprintln!("{err}");
//! }
//! let tree = snapshot(&report).unwrap();
//! assert_eq!(tree.children.len(), 2);
//! ```
//!
//! The flat, leveled JSON reporter lives in [`json`].

pub use reportree_core::*;

/// Flat JSON reporter.
pub mod json {
    pub use reportree_json::*;
}
