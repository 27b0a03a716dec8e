//! The report tree node.

use std::cell::RefCell;
use std::fmt;
use std::ops::ControlFlow;
use std::rc::Rc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use compact_str::CompactString;

use crate::config::RenderOptions;
use crate::kind::{Kind, KindSet};
use crate::render;
use crate::report::{Entry, Report};
use crate::timer::{SystemTimer, Timer};

struct NodeData {
    kind: Kind,
    allow: KindSet,
    children: Vec<Node>,
    message: CompactString,
    created_at: DateTime<Utc>,
    duration: Option<Duration>,
    timer: Box<dyn Timer>,
}

/// Handle to a node of a report tree.
///
/// Handles are cheap to clone and share the node they point to. A tree is
/// built and read on a single thread; visitors passed to
/// [`traverse`](Report::traverse) must not add children to the nodes being
/// walked.
#[derive(Clone)]
pub struct Node {
    data: Rc<RefCell<NodeData>>,
}

impl Node {
    /// Create a root structure node stamped by the wall clock.
    pub fn new(message: impl Into<CompactString>) -> Self {
        Self::with_timer(SystemTimer::new(), message)
    }

    /// Create a root structure node stamped by `timer`.
    pub fn with_timer(timer: impl Timer + 'static, message: impl Into<CompactString>) -> Self {
        let mut timer: Box<dyn Timer> = Box::new(timer);
        let created_at = timer.now();
        Self::from_parts(Kind::Structure, timer, created_at, message.into())
    }

    fn from_parts(
        kind: Kind,
        timer: Box<dyn Timer>,
        created_at: DateTime<Utc>,
        message: CompactString,
    ) -> Self {
        Self {
            data: Rc::new(RefCell::new(NodeData {
                kind,
                allow: kind.default_allow(),
                children: Vec::new(),
                message,
                created_at,
                duration: None,
                timer,
            })),
        }
    }

    fn attach(&self, kind: Kind, message: CompactString) -> Self {
        let mut data = self.data.borrow_mut();
        let (timer, created_at) = data.timer.derive();
        let child = Self::from_parts(kind, timer, created_at, message);
        if data.allow.contains(kind) {
            data.children.push(child.clone());
        } else {
            tracing::trace!(
                parent = %data.message,
                ?kind,
                allow = ?data.allow,
                "kind not accepted, node left detached"
            );
        }
        child
    }

    /// Kind the node was created with.
    pub fn kind(&self) -> Kind {
        self.data.borrow().kind
    }

    /// Kinds currently accepted as direct children.
    pub fn allowed(&self) -> KindSet {
        self.data.borrow().allow
    }

    /// The message text without timestamp or tag.
    pub fn text(&self) -> CompactString {
        self.data.borrow().message.clone()
    }

    /// Instant the node was created, read from its parent's timer.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.data.borrow().created_at
    }

    /// Elapsed time stored by the last [`finalize`](Report::finalize).
    pub fn duration(&self) -> Option<Duration> {
        self.data.borrow().duration
    }

    /// Whether [`finalize`](Report::finalize) was called.
    pub fn is_finalized(&self) -> bool {
        self.data.borrow().duration.is_some()
    }

    /// Whether both handles point to the same node.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.data, &other.data)
    }

    fn walk<B, F>(&self, path: &mut Vec<usize>, visit: &mut F) -> ControlFlow<B>
    where
        F: FnMut(&Entry<'_>) -> ControlFlow<B>,
    {
        let data = self.data.borrow();
        visit(&Entry {
            path: path.as_slice(),
            kind: data.kind,
            created_at: data.created_at,
            duration: data.duration,
            message: &data.message,
        })?;
        for (index, child) in data.children.iter().enumerate() {
            path.push(index);
            child.walk(path, visit)?;
            path.pop();
        }
        ControlFlow::Continue(())
    }
}

impl Report for Node {
    fn structure(&self, message: impl Into<CompactString>) -> Self {
        self.attach(Kind::Structure, message.into())
    }

    fn error(&self, message: impl Into<CompactString>) -> Self {
        self.attach(Kind::Error, message.into())
    }

    fn warn(&self, message: impl Into<CompactString>) -> Self {
        self.attach(Kind::Warn, message.into())
    }

    fn info(&self, message: impl Into<CompactString>) -> Self {
        self.attach(Kind::Info, message.into())
    }

    fn debug(&self, message: impl Into<CompactString>) -> Self {
        self.attach(Kind::Debug, message.into())
    }

    fn deprecation(&self, message: impl Into<CompactString>) -> Self {
        self.attach(Kind::Deprecation, message.into())
    }

    fn allow(&self, kinds: impl Into<KindSet>) {
        let kinds: KindSet = kinds.into();
        self.data.borrow_mut().allow |= kinds;
    }

    /// Meant to be called once. Calling it again takes a new reading and
    /// replaces the stored duration.
    fn finalize(&self) {
        let mut data = self.data.borrow_mut();
        let duration = data.timer.finalize();
        tracing::debug!(node = %data.message, ?duration, "node finalized");
        data.duration = Some(duration);
    }

    fn message(&self) -> String {
        let data = self.data.borrow();
        render::message_line(data.kind, data.created_at, data.duration, &data.message)
    }

    fn traverse<B, F>(&self, mut visit: F) -> ControlFlow<B>
    where
        F: FnMut(&Entry<'_>) -> ControlFlow<B>,
    {
        self.walk(&mut Vec::new(), &mut visit)
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let data = self.data.borrow();
        f.debug_struct("Node")
            .field("kind", &data.kind)
            .field("allow", &data.allow)
            .field("message", &data.message)
            .field("created_at", &data.created_at)
            .field("duration", &data.duration)
            .field("children", &data.children)
            .finish()
    }
}

/// Renders the whole subtree, one line per node.
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        render::render_into(self, &RenderOptions::default(), f)
    }
}

/// Creates root nodes that share one logical clock.
///
/// Each root gets a timer derived from the factory's timer, the same way a
/// child derives its timer from its parent.
#[derive(Debug)]
pub struct RootFactory {
    timer: Box<dyn Timer>,
}

impl RootFactory {
    /// Create a factory whose roots are stamped by `timer`.
    pub fn new(timer: impl Timer + 'static) -> Self {
        Self {
            timer: Box::new(timer),
        }
    }

    /// Create a root structure node on the factory's clock.
    pub fn create(&mut self, message: impl Into<CompactString>) -> Node {
        let (timer, created_at) = self.timer.derive();
        Node::from_parts(Kind::Structure, timer, created_at, message.into())
    }
}

impl Default for RootFactory {
    fn default() -> Self {
        Self::new(SystemTimer::new())
    }
}
