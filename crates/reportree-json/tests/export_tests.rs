use chrono::{TimeZone, Utc};
use reportree_core::{Node, Report, SteppingTimer, snapshot};
use reportree_json::{FlatReport, Level};

#[test]
fn test_tree_snapshot_exports_as_json() {
    let origin = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
    let root = Node::with_timer(SteppingTimer::new(origin), "sync");
    let pull = root.structure("pull");
    pull.deprecation("v1 endpoint");
    pull.finalize();

    let value = serde_json::to_value(snapshot(&root).unwrap()).unwrap();
    assert_eq!(value["message"], "sync");
    assert_eq!(value["created_at"], "2024-06-01T12:00:00.000000100Z");
    assert_eq!(value["children"][0]["kind"], "structure");
    assert_eq!(value["children"][0]["created_at"], "2024-06-01T12:00:00.000000200Z");
    // pull spans its own creation, the deprecation and the finalize reading
    assert_eq!(value["children"][0]["duration_ns"], 200);
    assert_eq!(value["children"][0]["children"][0]["kind"], "deprecation");
    assert_eq!(
        value["children"][0]["children"][0]["created_at"],
        "2024-06-01T12:00:00.000000300Z"
    );
}

#[test]
fn test_flat_report_alongside_tree() {
    let origin = Utc.timestamp_opt(1_600_000_000, 0).unwrap();
    let mut report = FlatReport::with_timer(SteppingTimer::new(origin), "batch");
    report.alert("disk almost full").with("free_pct", 3);

    let value: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
    assert_eq!(value["s"], "batch");
    assert_eq!(value["m"][0]["k"], "ALERT");
    assert_eq!(value["m"][0]["p"]["free_pct"], 3);
    assert_eq!(report.worst_level(), Some(Level::Alert));
}
