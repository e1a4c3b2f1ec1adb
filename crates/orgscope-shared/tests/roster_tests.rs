//! Tests for roster.rs

use orgscope_shared::roster::{by_level, search};
use orgscope_shared::{
    AnomalyKind, EmployeeRecord, InMemoryRoster, JsonRoster, Level, OrgConfig, OrgError,
    OrgSnapshot, RosterProvider, Status,
};
use std::io::Write;
use tempfile::NamedTempFile;

fn write_roster(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

const EXPORT: &str = r#"{
  "employees": [
    {"id": "EMP0001", "name": "Sunita Reddy", "managerName": null, "level": "L5",
     "status": "Active", "department": "Leadership", "designation": "CEO"},
    {"emp_id": "EMP0022", "name": "Arjun Mehta", "manager_name": "Sunita Reddy",
     "manager_id": "EMP0001", "level": "l4", "team": "Platform"},
    {"id": "", "name": "Meera Nair", "managerName": "Arjun Mehta", "level": "l2",
     "department": "Platform", "designation": "Engineer"},
    {"id": "EMP0040", "name": "Old Hand", "managerName": "Arjun Mehta", "level": "l3",
     "status": "Resigned", "department": "Platform"}
  ]
}"#;

#[test]
fn test_json_roster_from_file() {
    let file = write_roster(EXPORT);
    let provider = JsonRoster::new(file.path());
    assert_eq!(provider.path(), file.path());

    let records = provider.fetch_roster().unwrap();
    assert_eq!(records.len(), 4);
    assert_eq!(records[0].manager_name, "");
    assert_eq!(records[0].level, Level::Ranked(5));
    assert_eq!(records[1].id, "EMP0022");
    assert_eq!(records[1].manager_id.as_deref(), Some("EMP0001"));
    assert_eq!(records[1].department, "Platform");
    assert_eq!(records[1].status, Status::Active);
    assert!(!records[3].is_active());
}

#[test]
fn test_snapshot_from_provider() {
    let file = write_roster(EXPORT);
    let snap = OrgSnapshot::from_provider(&JsonRoster::new(file.path()), &OrgConfig::default())
        .unwrap();
    assert_eq!(snap.len(), 3);
    assert_eq!(snap.descendants_of("EMP0001").len(), 2);
    let report = snap.anomaly_report();
    assert_eq!(report.count(AnomalyKind::MissingId), 1);
    assert_eq!(report.count(AnomalyKind::NoManager), 1);
    assert_eq!(report.warnings, 0);
}

#[test]
fn test_inactive_included_by_config() {
    let file = write_roster(EXPORT);
    let mut config = OrgConfig::default();
    config.hierarchy.include_inactive = true;
    let snap = OrgSnapshot::from_provider(&JsonRoster::new(file.path()), &config).unwrap();
    assert_eq!(snap.len(), 4);
    assert_eq!(snap.index().headcount_under("EMP0022"), 2);
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let provider = JsonRoster::new(dir.path().join("absent.json"));
    let err = provider.fetch_roster().unwrap_err();
    assert!(matches!(err, OrgError::Io(_)));
    assert_eq!(err.code(), 500);
}

#[test]
fn test_null_roster_file_is_missing_roster() {
    let file = write_roster("null");
    let err = JsonRoster::new(file.path()).fetch_roster().unwrap_err();
    assert!(matches!(err, OrgError::MissingRoster));
    assert!(err.is_contract_violation());
}

#[test]
fn test_null_level_keeps_the_roster() {
    let file = write_roster(
        r#"[{"emp_id":"E1","name":"A","level":null,"status":"Active"},
            {"emp_id":"E2","name":"B","manager_name":"A","level":"l2"}]"#,
    );
    let records = JsonRoster::new(file.path()).fetch_roster().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].level, Level::default());
    let snap = OrgSnapshot::build(&records, &OrgConfig::default());
    assert_eq!(snap.len(), 2);
}

#[test]
fn test_null_or_missing_status_counts_as_active() {
    let file = write_roster(
        r#"[{"emp_id":"E1","name":"A","level":"l4","status":null},
            {"emp_id":"E2","name":"B","manager_name":"A"},
            {"emp_id":"E3","name":"C","manager_name":"A","status":"Exited"}]"#,
    );
    let records = JsonRoster::new(file.path()).fetch_roster().unwrap();
    assert_eq!(records[0].status, Status::Active);
    assert_eq!(records[1].status, Status::Active);
    let snap = OrgSnapshot::build(&records, &OrgConfig::default());
    assert_eq!(snap.len(), 2);
    assert_eq!(snap.index().headcount_under("E1"), 1);
}

#[test]
fn test_in_memory_roster() {
    let provider = InMemoryRoster::new(vec![
        EmployeeRecord::new("A"),
        EmployeeRecord::new("B").with_manager("A"),
    ]);
    let snap = OrgSnapshot::from_provider(&provider, &OrgConfig::default()).unwrap();
    assert_eq!(snap.forest().roots().len(), 1);
    assert_eq!(provider.fetch_roster().unwrap().len(), 2);
}

#[test]
fn test_level_and_search_queries() {
    let records = JsonRoster::new(write_roster(EXPORT).path())
        .fetch_roster()
        .unwrap();
    let l4: Vec<&str> = by_level(&records, &Level::Ranked(4))
        .iter()
        .map(|r| r.name.as_str())
        .collect();
    assert_eq!(l4, vec!["Arjun Mehta"]);
    assert!(by_level(&records, &Level::Ranked(3)).is_empty());

    let found: Vec<&str> = search(&records, "e").iter().map(|r| r.name.as_str()).collect();
    assert_eq!(found, vec!["Arjun Mehta", "Meera Nair", "Sunita Reddy"]);
    assert_eq!(search(&records, "ceo").len(), 1);
}

#[test]
fn test_demo_roster_builds() {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("../../demos/roster.json");
    let snap = OrgSnapshot::from_provider(&JsonRoster::new(path), &OrgConfig::default()).unwrap();
    assert_eq!(snap.len(), 12);
    let report = snap.anomaly_report();
    assert_eq!(report.count(AnomalyKind::Cycle), 1);
    assert_eq!(report.count(AnomalyKind::DanglingManager), 1);
    assert_eq!(report.count(AnomalyKind::MissingId), 1);
    assert_eq!(snap.index().headcount_under("EMP0001"), 8);
}
