//! Tests for scope.rs

use orgscope_shared::{
    EmployeeRecord, EmployeeScope, Identity, ManagerScope, OrgConfig, OrgError, OrgSnapshot, Role,
    ScopeLabel,
};
use std::collections::BTreeSet;

fn snapshot() -> OrgSnapshot {
    let records = vec![
        EmployeeRecord::new("A").with_level("l5").with_department("Platform"),
        EmployeeRecord::new("B").with_manager("A").with_level("l4").with_department("Platform"),
        EmployeeRecord::new("C").with_manager("B").with_level("l3").with_department("Platform"),
        EmployeeRecord::new("D").with_manager("C").with_level("l2").with_department("Data"),
        EmployeeRecord::new("E").with_manager("A").with_level("l4").with_department("Data"),
    ];
    OrgSnapshot::build(&records, &OrgConfig::default())
}

fn set(names: &[&str]) -> BTreeSet<Identity> {
    names.iter().map(|n| Identity::from(*n)).collect()
}

fn members(scope: &EmployeeScope) -> BTreeSet<Identity> {
    match scope {
        EmployeeScope::Names { names } => names.clone(),
        other => panic!("expected explicit names, got {:?}", other),
    }
}

#[test]
fn test_manager_scenario() {
    let snap = snapshot();
    let scope = snap.resolve_scope(Role::Manager, Some("B"), None);
    assert_eq!(members(&scope), set(&["C"]));
}

#[test]
fn test_leader_scenario() {
    let snap = snapshot();
    let scope = snap.resolve_scope(Role::Leader, Some("B"), None);
    assert_eq!(members(&scope), set(&["B", "C", "D"]));
}

#[test]
fn test_hr_sees_everyone() {
    let snap = snapshot();
    let decision = snap.decide_scope(Role::Hr, None, None);
    assert_eq!(decision.scope, EmployeeScope::All);
    assert_eq!(decision.label, ScopeLabel::CompanyWide);
    assert_eq!(snap.scoped_records(&decision.scope).len(), 5);
}

#[test]
fn test_manager_scope_within_leader_scope() {
    let snap = snapshot();
    for identity in snap.index().identities() {
        let actor = Some(identity.as_str());
        let manager = members(&snap.resolve_scope(Role::Manager, actor, None));
        let leader = members(&snap.resolve_scope(Role::Leader, actor, None));
        assert!(manager.is_subset(&leader), "{}", identity);
    }
}

#[test]
fn test_leader_scope_monotonic_with_seniority() {
    let snap = snapshot();
    for identity in snap.index().identities() {
        let Some((manager, _)) = snap.index().manager_of(identity.as_str()) else {
            continue;
        };
        let own = members(&snap.resolve_scope(Role::Leader, Some(identity.as_str()), None));
        let above = members(&snap.resolve_scope(Role::Leader, Some(manager.as_str()), None));
        assert!(own.is_subset(&above), "{} under {}", identity, manager);
    }
}

#[test]
fn test_unresolvable_actor_sees_nobody() {
    let snap = snapshot();
    let decision = snap.decide_scope(Role::Manager, Some("Ghost"), None);
    assert!(decision.scope.is_nobody());
    assert_eq!(decision.label, ScopeLabel::None);
    assert!(snap.scoped_records(&decision.scope).is_empty());
    assert!(snap.resolve_scope(Role::Leader, None, None).is_nobody());
}

#[test]
fn test_leader_department_fallback() {
    let snap = snapshot();
    let decision = snap.decide_scope(Role::Leader, Some("Ghost"), Some("data"));
    assert_eq!(decision.label, ScopeLabel::Department);
    let visible: Vec<&str> = snap
        .scoped_records(&decision.scope)
        .iter()
        .map(|(_, r)| r.name.as_str())
        .collect();
    assert_eq!(visible, vec!["D", "E"]);
}

#[test]
fn test_leader_in_hierarchy_ignores_department() {
    let snap = snapshot();
    let scope = snap.resolve_scope(Role::Leader, Some("C"), Some("Platform"));
    assert_eq!(members(&scope), set(&["C", "D"]));
}

#[test]
fn test_transitive_manager_config() {
    let records = vec![
        EmployeeRecord::new("A"),
        EmployeeRecord::new("B").with_manager("A"),
        EmployeeRecord::new("C").with_manager("B"),
        EmployeeRecord::new("D").with_manager("C"),
    ];
    let mut config = OrgConfig::default();
    config.scope.manager_scope = ManagerScope::Transitive;
    let snap = OrgSnapshot::build(&records, &config);
    let scope = snap.resolve_scope(Role::Manager, Some("B"), None);
    assert_eq!(members(&scope), set(&["C", "D"]));
}

#[test]
fn test_actor_by_name_when_ids_exist() {
    let records = vec![
        EmployeeRecord::new("Sunita Reddy").with_id("EMP0001"),
        EmployeeRecord::new("Arjun Mehta").with_id("EMP0022").with_manager("Sunita Reddy"),
        EmployeeRecord::new("Meera Nair").with_id("EMP0031").with_manager("Arjun Mehta"),
    ];
    let snap = OrgSnapshot::build(&records, &OrgConfig::default());
    let by_name = snap.decide_scope(Role::Leader, Some("Arjun Mehta"), None);
    let by_id = snap.decide_scope(Role::Leader, Some("EMP0022"), None);
    assert_eq!(by_name.scope, by_id.scope);
    assert_eq!(members(&by_id.scope), set(&["EMP0022", "EMP0031"]));
    assert_eq!(by_name.actor, Some(Identity::from("EMP0022")));
}

#[test]
fn test_role_names_strict_and_lenient() {
    let snap = snapshot();
    let resolver = snap.scope_resolver();
    let err = resolver
        .try_scope_for_role_name("director", Some("A"), None)
        .unwrap_err();
    assert!(matches!(err, OrgError::InvalidRole(_)));
    assert_eq!(err.code(), 400);
    assert!(resolver.scope_for_role_name("director", Some("A"), None).is_nobody());
    assert_eq!(
        members(&resolver.scope_for_role_name("Manager", Some("A"), None)),
        set(&["B", "E"])
    );
}

#[test]
fn test_filter_applies_scope_to_raw_roster() {
    let records = vec![
        EmployeeRecord::new("A"),
        EmployeeRecord::new("B").with_manager("A"),
        EmployeeRecord::new("C").with_manager("B"),
    ];
    let snap = OrgSnapshot::build(&records, &OrgConfig::default());
    let scope = snap.resolve_scope(Role::Leader, Some("B"), None);
    let visible: Vec<&str> = scope.filter(&records).iter().map(|r| r.name.as_str()).collect();
    assert_eq!(visible, vec!["B", "C"]);
    assert_eq!(EmployeeScope::All.filter(&records).len(), 3);
    assert!(EmployeeScope::nobody().filter(&records).is_empty());
}

#[test]
fn test_seniority_mix_for_scope() {
    let snap = snapshot();
    let scope = snap.resolve_scope(Role::Leader, Some("A"), None);
    let mix = snap.seniority_mix(&scope);
    let order: Vec<String> = mix.levels.iter().map(|l| l.level.to_string()).collect();
    assert_eq!(order, vec!["l2", "l3", "l4", "l5"]);
    assert_eq!(mix.total, 5);
    assert_eq!(mix.share(&"l4".into()), 40.0);
}
