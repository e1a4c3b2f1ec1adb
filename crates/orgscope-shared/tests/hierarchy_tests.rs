//! Tests for hierarchy.rs

use orgscope_shared::{
    build, AnomalyKind, BuildResult, EmployeeRecord, HierarchyBuilder, HierarchyConfig,
    HierarchyNode, NameMatch,
};
use std::collections::HashSet;

fn kinds(result: &BuildResult) -> Vec<AnomalyKind> {
    result.anomalies.iter().map(|a| a.kind).collect()
}

fn count(result: &BuildResult, kind: AnomalyKind) -> usize {
    result.anomalies.iter().filter(|a| a.kind == kind).count()
}

/// Every node once, no duplicates, and the expected total
fn assert_complete(result: &BuildResult, expected: usize) {
    let ids: Vec<&str> = result.forest.iter().map(|n| n.identity.as_str()).collect();
    let unique: HashSet<&str> = ids.iter().copied().collect();
    assert_eq!(ids.len(), expected, "node count");
    assert_eq!(unique.len(), expected, "duplicate nodes in forest");
}

fn assert_depths(node: &HierarchyNode) {
    for child in &node.children {
        assert_eq!(child.depth, node.depth + 1);
        assert!(!child.is_root);
        assert_depths(child);
    }
}

#[test]
fn test_chain_scenario() {
    let records = vec![
        EmployeeRecord::new("A").with_manager("").with_level("l5"),
        EmployeeRecord::new("B").with_manager("A").with_level("l4"),
        EmployeeRecord::new("C").with_manager("B").with_level("l3"),
    ];
    let result = build(&records);
    assert_eq!(result.forest.roots().len(), 1);
    let a = &result.forest.roots()[0];
    assert_eq!((a.record.name.as_str(), a.depth), ("A", 0));
    let b = &a.children[0];
    assert_eq!((b.record.name.as_str(), b.depth), ("B", 1));
    let c = &b.children[0];
    assert_eq!((c.record.name.as_str(), c.depth), ("C", 2));
    assert_complete(&result, 3);
}

#[test]
fn test_self_reference_scenario() {
    let records = vec![EmployeeRecord::new("A").with_manager("A").with_level("l5")];
    let result = build(&records);
    assert_eq!(result.forest.roots().len(), 1);
    assert!(result.forest.roots()[0].is_root);
    assert_eq!(kinds(&result), vec![AnomalyKind::MissingId, AnomalyKind::SelfReference]);
}

#[test]
fn test_dangling_manager_scenario() {
    let records = vec![EmployeeRecord::new("A").with_manager("Ghost").with_level("l3")];
    let result = build(&records);
    assert_eq!(result.forest.roots().len(), 1);
    assert_eq!(count(&result, AnomalyKind::DanglingManager), 1);
}

#[test]
fn test_two_cycle_scenario() {
    let records = vec![
        EmployeeRecord::new("A").with_manager("B"),
        EmployeeRecord::new("B").with_manager("A"),
    ];
    let result = build(&records);
    assert_complete(&result, 2);
    assert_eq!(result.forest.roots().len(), 1);
    assert_eq!(count(&result, AnomalyKind::Cycle), 1);
}

#[test]
fn test_disjoint_cycles_each_broken_once() {
    let records = vec![
        EmployeeRecord::new("A").with_manager("C"),
        EmployeeRecord::new("B").with_manager("A"),
        EmployeeRecord::new("C").with_manager("B"),
        EmployeeRecord::new("X").with_manager("Y"),
        EmployeeRecord::new("Y").with_manager("X"),
        EmployeeRecord::new("Z").with_manager("Y"),
    ];
    let result = build(&records);
    assert_complete(&result, 6);
    assert_eq!(count(&result, AnomalyKind::Cycle), 2);
    let roots: Vec<&str> = result.forest.roots().iter().map(|n| n.identity.as_str()).collect();
    assert_eq!(roots, vec!["A", "X"]);
    for root in result.forest.roots() {
        assert_eq!(root.depth, 0);
        assert_depths(root);
    }
}

#[test]
fn test_completeness_on_messy_roster() {
    let records = vec![
        EmployeeRecord::new("CEO").with_id("E1").with_level("l5"),
        EmployeeRecord::new("VP").with_id("E2").with_manager("CEO").with_level("l4"),
        EmployeeRecord::new("Loop1").with_id("E3").with_manager("Loop2"),
        EmployeeRecord::new("Loop2").with_id("E4").with_manager("Loop1"),
        EmployeeRecord::new("Self").with_id("E5").with_manager("Self"),
        EmployeeRecord::new("Orphan").with_id("E6").with_manager("Nobody"),
        EmployeeRecord::new("Gone").with_id("E7").with_manager("CEO").with_status("Exited"),
        EmployeeRecord::new("Dup").with_id("E2").with_manager("VP"),
        EmployeeRecord::new("NoId").with_manager("VP"),
    ];
    let result = build(&records);
    // 9 rows, 1 inactive, 1 duplicate identity dropped
    assert_complete(&result, 7);
    for root in result.forest.roots() {
        assert_eq!(root.depth, 0);
        assert!(root.is_root);
        assert_depths(root);
    }
    assert_eq!(count(&result, AnomalyKind::DuplicateIdentity), 1);
    assert_eq!(count(&result, AnomalyKind::MissingId), 1);
    assert_eq!(count(&result, AnomalyKind::SelfReference), 1);
    assert_eq!(count(&result, AnomalyKind::DanglingManager), 1);
    assert_eq!(count(&result, AnomalyKind::Cycle), 1);
    assert_eq!(count(&result, AnomalyKind::NoManager), 1);
}

#[test]
fn test_id_less_name_equal_to_an_id_keeps_both() {
    let records = vec![
        EmployeeRecord::new("Boss").with_id("E1"),
        EmployeeRecord::new("E1").with_manager("Boss"),
    ];
    let result = build(&records);
    assert_complete(&result, 2);
    assert_eq!(result.forest.roots().len(), 1);
    let boss = result.forest.find("E1").unwrap();
    assert_eq!(boss.record.name, "Boss");
    assert_eq!(boss.children[0].identity.as_str(), "name:E1");
    assert_eq!(count(&result, AnomalyKind::DuplicateIdentity), 0);
}

#[test]
fn test_empty_roster() {
    let result = build(&[]);
    assert!(result.forest.is_empty());
    assert_eq!(result.forest.len(), 0);
    assert!(result.anomalies.is_empty());
}

#[test]
fn test_build_is_deterministic() {
    let records = vec![
        EmployeeRecord::new("A").with_manager("B"),
        EmployeeRecord::new("B").with_manager("C"),
        EmployeeRecord::new("C").with_manager("A"),
        EmployeeRecord::new("D").with_manager("B"),
    ];
    let first = build(&records);
    let second = build(&records);
    assert_eq!(first.forest, second.forest);
    assert_eq!(first.anomalies, second.anomalies);
}

#[test]
fn test_long_chain_terminates() {
    let mut records = vec![EmployeeRecord::new("E0")];
    for i in 1..2_000 {
        records.push(EmployeeRecord::new(&format!("E{}", i)).with_manager(&format!("E{}", i - 1)));
    }
    let result = build(&records);
    assert_complete(&result, 2_000);
    assert_eq!(result.forest.roots().len(), 1);
    let deepest = result.forest.iter().map(|n| n.depth).max();
    assert_eq!(deepest, Some(1_999));
}

#[test]
fn test_long_cycle_terminates() {
    let n = 1_000;
    let records: Vec<_> = (0..n)
        .map(|i| {
            EmployeeRecord::new(&format!("E{}", i)).with_manager(&format!("E{}", (i + 1) % n))
        })
        .collect();
    let result = build(&records);
    assert_complete(&result, n);
    assert_eq!(count(&result, AnomalyKind::Cycle), 1);
    let cycle = result
        .anomalies
        .iter()
        .find(|a| a.kind == AnomalyKind::Cycle)
        .unwrap();
    assert_eq!(cycle.identity.as_str(), "E0");
    assert_eq!(cycle.involved.len(), n);
}

#[test]
fn test_wide_fan_out_keeps_roster_order() {
    let mut records = vec![EmployeeRecord::new("Boss")];
    for i in 0..500 {
        records.push(EmployeeRecord::new(&format!("R{:03}", 499 - i)).with_manager("Boss"));
    }
    let result = build(&records);
    let boss = &result.forest.roots()[0];
    assert_eq!(boss.children.len(), 500);
    assert_eq!(boss.children[0].record.name, "R499");
    assert_eq!(boss.children[499].record.name, "R000");
}

#[test]
fn test_manager_id_name_mismatch_name_wins() {
    let records = vec![
        EmployeeRecord::new("Sunita").with_id("EMP0001"),
        EmployeeRecord::new("Arjun").with_id("EMP0022"),
        EmployeeRecord::new("Kiran")
            .with_id("EMP0040")
            .with_manager("Arjun")
            .with_manager_id("EMP0001"),
    ];
    let result = build(&records);
    let arjun = result.forest.find("EMP0022").unwrap();
    assert_eq!(arjun.children[0].identity.as_str(), "EMP0040");
    let mismatch = result
        .anomalies
        .iter()
        .find(|a| a.kind == AnomalyKind::ManagerIdNameMismatch)
        .unwrap();
    assert_eq!(mismatch.identity.as_str(), "EMP0040");
}

#[test]
fn test_matching_manager_id_is_clean() {
    let records = vec![
        EmployeeRecord::new("Sunita").with_id("EMP0001"),
        EmployeeRecord::new("Kiran")
            .with_id("EMP0040")
            .with_manager("Sunita")
            .with_manager_id("EMP0001"),
    ];
    let result = build(&records);
    assert_eq!(kinds(&result), vec![AnomalyKind::NoManager]);
}

#[test]
fn test_ambiguous_manager_prefers_manager_id() {
    let records = vec![
        EmployeeRecord::new("Sam").with_id("E1"),
        EmployeeRecord::new("Sam").with_id("E2"),
        EmployeeRecord::new("Lee").with_id("E3").with_manager("Sam").with_manager_id("E2"),
        EmployeeRecord::new("Ola").with_id("E4").with_manager("Sam"),
    ];
    let result = build(&records);
    assert_eq!(result.forest.find("E2").unwrap().children[0].identity.as_str(), "E3");
    assert_eq!(result.forest.find("E1").unwrap().children[0].identity.as_str(), "E4");
    assert_eq!(count(&result, AnomalyKind::AmbiguousManager), 2);
    assert_eq!(count(&result, AnomalyKind::DuplicateName), 1);
}

#[test]
fn test_manager_id_only_self_reference() {
    let records = vec![EmployeeRecord::new("Solo").with_id("E9").with_manager_id("E9")];
    let result = build(&records);
    assert_eq!(count(&result, AnomalyKind::SelfReference), 1);
    assert!(result.forest.roots()[0].is_root);
}

#[test]
fn test_case_insensitive_manager_names() {
    let records = vec![
        EmployeeRecord::new("Rohan Yadav"),
        EmployeeRecord::new("Isha").with_manager("rohan yadav"),
    ];
    let strict = build(&records);
    assert_eq!(strict.forest.roots().len(), 2);

    let lenient = HierarchyBuilder::new(HierarchyConfig {
        name_match: NameMatch::CaseInsensitive,
        ..Default::default()
    })
    .build(&records);
    assert_eq!(lenient.forest.roots().len(), 1);
    assert_eq!(lenient.forest.roots()[0].children[0].record.name, "Isha");
}
