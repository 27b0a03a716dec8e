//! Owned tree snapshots and statistics.

use std::ops::ControlFlow;
use std::time::Duration;

use chrono::{DateTime, Utc};
use compact_str::CompactString;
use serde::{Deserialize, Serialize};

use crate::kind::Kind;
use crate::report::Report;

/// Owned, serializable copy of a report subtree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSnapshot {
    pub kind: Kind,
    pub message: CompactString,
    pub created_at: DateTime<Utc>,
    /// Elapsed nanoseconds of a finalized node.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ns: Option<u64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeSnapshot>,
}

impl NodeSnapshot {
    /// Elapsed time of a finalized node.
    pub fn duration(&self) -> Option<Duration> {
        self.duration_ns.map(Duration::from_nanos)
    }

    /// Number of nodes in this snapshot, itself included.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(NodeSnapshot::node_count).sum::<usize>()
    }
}

/// Copy `node` and its descendants into an owned [`NodeSnapshot`].
///
/// The tree is rebuilt from traversal paths alone. Returns `None` for a
/// reporter whose traversal visits nothing.
pub fn snapshot<R: Report>(node: &R) -> Option<NodeSnapshot> {
    let mut stack: Vec<NodeSnapshot> = Vec::new();
    let mut root = None;
    let _ = node.traverse(|entry| {
        fold(&mut stack, entry.depth(), &mut root);
        stack.push(NodeSnapshot {
            kind: entry.kind,
            message: entry.message.into(),
            created_at: entry.created_at,
            duration_ns: entry
                .duration
                .map(|d| u64::try_from(d.as_nanos()).unwrap_or(u64::MAX)),
            children: Vec::new(),
        });
        ControlFlow::<()>::Continue(())
    });
    fold(&mut stack, 0, &mut root);
    root
}

/// Pop finished nodes into their parents until `depth` ancestors remain.
fn fold(stack: &mut Vec<NodeSnapshot>, depth: usize, root: &mut Option<NodeSnapshot>) {
    while stack.len() > depth {
        let Some(done) = stack.pop() else { break };
        match stack.last_mut() {
            Some(parent) => parent.children.push(done),
            None => *root = Some(done),
        }
    }
}

/// Per-kind node counts of a subtree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KindCounts {
    pub structures: usize,
    pub errors: usize,
    pub infos: usize,
    pub debugs: usize,
    pub warnings: usize,
    pub deprecations: usize,
    /// Total number of nodes.
    pub total: usize,
    /// Deepest nesting level reached, the start node being 0.
    pub max_depth: usize,
}

impl KindCounts {
    /// Count the nodes under `node`, itself included.
    pub fn collect<R: Report>(node: &R) -> Self {
        let mut counts = Self::default();
        let _ = node.traverse(|entry| {
            counts.record(entry.kind, entry.depth());
            ControlFlow::<()>::Continue(())
        });
        counts
    }

    /// Count one node of `kind` found at `depth`.
    pub fn record(&mut self, kind: Kind, depth: usize) {
        *self.slot(kind) += 1;
        self.total += 1;
        self.max_depth = self.max_depth.max(depth);
    }

    /// Number of nodes of `kind`.
    pub fn count(&self, kind: Kind) -> usize {
        match kind {
            Kind::Structure => self.structures,
            Kind::Error => self.errors,
            Kind::Info => self.infos,
            Kind::Debug => self.debugs,
            Kind::Warn => self.warnings,
            Kind::Deprecation => self.deprecations,
        }
    }

    fn slot(&mut self, kind: Kind) -> &mut usize {
        match kind {
            Kind::Structure => &mut self.structures,
            Kind::Error => &mut self.errors,
            Kind::Info => &mut self.infos,
            Kind::Debug => &mut self.debugs,
            Kind::Warn => &mut self.warnings,
            Kind::Deprecation => &mut self.deprecations,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::node::Node;
    use crate::report::Discard;
    use crate::timer::SteppingTimer;

    fn sample() -> Node {
        let origin = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let root = Node::with_timer(SteppingTimer::new(origin), "test");
        root.info("root-info");
        let child = root.structure("child");
        child.error("child-error");
        child.structure("grandchild").warn("deep");
        root.deprecation("old api");
        root
    }

    #[test]
    fn test_snapshot_rebuilds_shape() {
        let root = sample();
        root.finalize();
        let snap = snapshot(&root).unwrap();

        assert_eq!(snap.node_count(), 7);
        assert_eq!(snap.message.as_str(), "test");
        assert!(snap.duration().is_some());
        let names: Vec<_> = snap.children.iter().map(|c| c.message.as_str()).collect();
        assert_eq!(names, vec!["root-info", "child", "old api"]);

        let child = &snap.children[1];
        assert_eq!(child.kind, Kind::Structure);
        assert_eq!(child.children.len(), 2);
        assert_eq!(child.children[1].children[0].message.as_str(), "deep");
    }

    #[test]
    fn test_snapshot_of_discard_is_none() {
        assert!(snapshot(&Discard).is_none());
    }

    #[test]
    fn test_snapshot_serializes() {
        let root = sample();
        let json = serde_json::to_value(snapshot(&root).unwrap()).unwrap();
        assert_eq!(json["kind"], "structure");
        assert_eq!(json["children"][0]["kind"], "info");
        assert!(json.get("duration_ns").is_none());
    }

    #[test]
    fn test_kind_counts() {
        let counts = KindCounts::collect(&sample());
        assert_eq!(counts.total, 7);
        assert_eq!(counts.structures, 3);
        assert_eq!(counts.count(Kind::Error), 1);
        assert_eq!(counts.count(Kind::Warn), 1);
        assert_eq!(counts.deprecations, 1);
        assert_eq!(counts.debugs, 0);
        assert_eq!(counts.max_depth, 3);
    }
}
