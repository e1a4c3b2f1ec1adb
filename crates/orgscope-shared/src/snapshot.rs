//! Org snapshot: one roster, built once, queried many times.
//!
//! Identity resolution, hierarchy construction and descendant indexing run
//! together in `OrgSnapshot::build`. The snapshot is immutable afterwards and
//! can be shared between threads for concurrent scope and tree queries.

use crate::anomaly::{Anomaly, AnomalyReport};
use crate::config::{HierarchyConfig, OrgConfig, ScopeConfig};
use crate::descendants::DescendantIndex;
use crate::employee::{EmployeeRecord, Identity, Level};
use crate::error::{OrgError, Result};
use crate::hierarchy::{BuildResult, Forest, HierarchyBuilder};
use crate::mix::{AgeMix, SeniorityMix};
use crate::presenter::{self, PresentedNode};
use crate::roster::RosterProvider;
use crate::scope::{EmployeeScope, Role, ScopeDecision, ScopeResolver};
use std::collections::BTreeMap;
use tracing::info;

/// Build a hierarchy from an optional roster. A missing roster is a caller
/// error; every data problem inside a roster is an anomaly.
pub fn build_hierarchy(
    records: Option<&[EmployeeRecord]>,
    config: &HierarchyConfig,
) -> Result<BuildResult> {
    let records = records.ok_or(OrgError::MissingRoster)?;
    Ok(HierarchyBuilder::new(config.clone()).build(records))
}

#[derive(Debug, Clone)]
pub struct OrgSnapshot {
    forest: Forest,
    anomalies: Vec<Anomaly>,
    index: DescendantIndex,
    scope_config: ScopeConfig,
}

impl OrgSnapshot {
    pub fn build(records: &[EmployeeRecord], config: &OrgConfig) -> Self {
        let BuildResult { forest, anomalies } =
            HierarchyBuilder::new(config.hierarchy.clone()).build(records);
        let index = DescendantIndex::build_with(&forest, config.hierarchy.name_match);
        info!(
            employees = index.len(),
            trees = forest.roots().len(),
            anomalies = anomalies.len(),
            "org snapshot ready"
        );
        Self {
            forest,
            anomalies,
            index,
            scope_config: config.scope.clone(),
        }
    }

    /// Fetch one roster snapshot from the provider and build it
    pub fn from_provider(provider: &dyn RosterProvider, config: &OrgConfig) -> Result<Self> {
        let records = provider.fetch_roster()?;
        Ok(Self::build(&records, config))
    }

    pub fn forest(&self) -> &Forest {
        &self.forest
    }

    pub fn anomalies(&self) -> &[Anomaly] {
        &self.anomalies
    }

    pub fn anomaly_report(&self) -> AnomalyReport {
        AnomalyReport::from_anomalies(&self.anomalies)
    }

    pub fn index(&self) -> &DescendantIndex {
        &self.index
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn scope_resolver(&self) -> ScopeResolver<'_> {
        ScopeResolver::new(&self.index, self.scope_config.clone())
    }

    pub fn resolve_scope(
        &self,
        role: Role,
        actor: Option<&str>,
        department: Option<&str>,
    ) -> EmployeeScope {
        self.scope_resolver().scope_for(role, actor, department)
    }

    pub fn decide_scope(
        &self,
        role: Role,
        actor: Option<&str>,
        department: Option<&str>,
    ) -> ScopeDecision {
        self.scope_resolver().decide(role, actor, department)
    }

    pub fn present(&self) -> Vec<PresentedNode> {
        presenter::present(&self.forest)
    }

    pub fn present_leveled(&self) -> BTreeMap<Level, Vec<PresentedNode>> {
        presenter::present_leveled(&self.forest)
    }

    /// Team under one employee, addressed by identity or unique name
    pub fn present_subtree(&self, actor: &str) -> Result<PresentedNode> {
        let identity = self.resolve_actor(actor)?;
        presenter::present_subtree(&self.forest, identity.as_str())
            .ok_or_else(|| OrgError::UnknownIdentity(actor.to_string()))
    }

    pub fn descendants_of(&self, identity: &str) -> &[EmployeeRecord] {
        self.index.descendants_of(identity)
    }

    pub fn direct_reports_of(&self, identity: &str) -> Vec<(&Identity, &EmployeeRecord)> {
        self.index.direct_reports_of(identity)
    }

    /// Identity for an actor given as identity or unique display name
    pub fn resolve_actor(&self, actor: &str) -> Result<&Identity> {
        self.index
            .lookup_actor(actor)
            .ok_or_else(|| OrgError::UnknownIdentity(actor.to_string()))
    }

    /// Records visible under a scope, pre-order
    pub fn scoped_records(&self, scope: &EmployeeScope) -> Vec<(&Identity, &EmployeeRecord)> {
        self.index
            .identities()
            .iter()
            .zip(self.index.records())
            .filter(|(identity, record)| scope.admits(identity, record))
            .collect()
    }

    pub fn seniority_mix(&self, scope: &EmployeeScope) -> SeniorityMix {
        SeniorityMix::for_scope(&self.index, scope)
    }

    /// Age band mix of the records a scope admits
    pub fn age_mix(&self, scope: &EmployeeScope) -> AgeMix {
        AgeMix::for_scope(&self.index, scope)
    }
}
