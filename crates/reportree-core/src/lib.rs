//! Core types for reportree.
//!
//! A report is a tree of [`Node`]s. Structure nodes label units of work and
//! hold typed leaf messages (errors, warnings, info, debug output,
//! deprecations) or further structure nodes. Every node carries the instant
//! it was created and, once finalized, how long it lived.
//!
//! ```rust
//! use reportree_core::{Node, Report, render, to_error};
//!
//! let root = Node::new("build");
//! root.info("resolving dependencies");
//! let tests = root.structure("tests");
//! tests.error(format!("{} of {} failed", 1, 12));
//! tests.finalize();
//!
//! assert!(root.has_errors());
//! assert_eq!(render(&root).lines().count(), 4);
//! assert!(to_error(&root).is_some());
//! ```
//!
//! All read operations ([`render`], [`to_error`], [`snapshot`], the
//! `has_*` predicates) are built on [`Report::traverse`], so they behave the
//! same for every [`Report`] implementation, including the no-op
//! [`Discard`].

mod config;
mod error;
mod kind;
mod node;
mod render;
mod report;
mod timer;
mod tree;

pub use config::{RenderOptions, RenderOptionsBuilder, RenderOptionsBuilderError, TimestampFormat};
pub use error::{ReportError, to_error};
pub use kind::{Kind, KindSet};
pub use node::{Node, RootFactory};
pub use render::{render, render_into, render_with};
pub use report::{Discard, Entry, Report};
pub use timer::{SteppingTimer, SystemTimer, Timer};
pub use tree::{KindCounts, NodeSnapshot, snapshot};
