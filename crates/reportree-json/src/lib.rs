//! Flat JSON reporter for reportree.
//!
//! A sibling of the report tree for callers that want a flat, leveled
//! message list per unit of work, with optional nested sub-reports, emitted
//! as compact JSON:
//!
//! ```rust
//! use reportree_json::{FlatReport, Level};
//!
//! let mut report = FlatReport::new("import");
//! report.info("rows read").with("count", 1200).with("dry_run", false);
//! report.nested("validate").warn("missing column").with("column", "email");
//!
//! assert!(report.has_at_least(Level::Warn));
//! let json = report.to_json().unwrap();
//! assert!(json.contains(r#""k":"WARN""#));
//! ```

mod error;
mod level;
mod message;
mod reporter;

pub use error::FlatError;
pub use level::Level;
pub use message::{Fields, Message, Payload, Scalar};
pub use reporter::FlatReport;
