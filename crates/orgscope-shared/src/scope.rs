//! Scope Resolver: which employees a role/actor pair may see.
//!
//! This is the only place role-based visibility is decided. Listing and
//! metric callers take an `EmployeeScope` and apply it with `admits` /
//! `filter` instead of building their own filters.
//!
//! - `hr` sees everyone
//! - `leader` sees themselves plus every direct and indirect report, or a
//!   department when the actor cannot be found and a department is given
//! - `manager` sees direct reports only (configurable to transitive)
//! - anything unresolvable sees nobody

use crate::config::{ManagerScope, ScopeConfig};
use crate::descendants::DescendantIndex;
use crate::employee::{EmployeeRecord, Identity};
use crate::error::{OrgError, Result};
use crate::identity::identity_of;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::str::FromStr;
use tracing::{debug, warn};

/// Viewer role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Hr,
    Leader,
    Manager,
}

impl FromStr for Role {
    type Err = OrgError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hr" => Ok(Self::Hr),
            "leader" => Ok(Self::Leader),
            "manager" => Ok(Self::Manager),
            _ => Err(OrgError::InvalidRole(s.to_string())),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Hr => "hr",
            Self::Leader => "leader",
            Self::Manager => "manager",
        };
        write!(f, "{}", s)
    }
}

/// Set or rule describing visible employees
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EmployeeScope {
    /// No filtering
    All,
    /// Explicit member list, keyed by resolved identity (the display name
    /// when the roster has no ids)
    Names { names: BTreeSet<Identity> },
    /// Everyone in one department/team
    Department { department: String },
}

impl EmployeeScope {
    /// Explicit "no access"
    pub fn nobody() -> Self {
        Self::Names {
            names: BTreeSet::new(),
        }
    }

    /// True when the scope can admit nobody
    pub fn is_nobody(&self) -> bool {
        matches!(self, Self::Names { names } if names.is_empty())
    }

    pub fn admits(&self, identity: &Identity, record: &EmployeeRecord) -> bool {
        match self {
            Self::All => true,
            Self::Names { names } => names.contains(identity),
            Self::Department { department } => {
                record.department.trim().eq_ignore_ascii_case(department.trim())
            }
        }
    }

    /// `admits` for a raw roster record
    pub fn admits_record(&self, record: &EmployeeRecord) -> bool {
        self.admits(&identity_of(record), record)
    }

    /// Records this scope admits, in input order
    pub fn filter<'a>(&self, records: &'a [EmployeeRecord]) -> Vec<&'a EmployeeRecord> {
        records.iter().filter(|r| self.admits_record(r)).collect()
    }
}

/// Human label for a scope decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScopeLabel {
    CompanyWide,
    TeamHierarchy,
    Department,
    DirectReports,
    None,
}

impl std::fmt::Display for ScopeLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::CompanyWide => "company-wide",
            Self::TeamHierarchy => "team-hierarchy",
            Self::Department => "department",
            Self::DirectReports => "direct-reports",
            Self::None => "none",
        };
        write!(f, "{}", s)
    }
}

/// A resolved scope with the inputs that produced it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeDecision {
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor: Option<Identity>,
    pub label: ScopeLabel,
    pub scope: EmployeeScope,
}

/// Resolves scopes against one descendant index
#[derive(Debug, Clone)]
pub struct ScopeResolver<'a> {
    index: &'a DescendantIndex,
    config: ScopeConfig,
}

impl<'a> ScopeResolver<'a> {
    pub fn new(index: &'a DescendantIndex, config: ScopeConfig) -> Self {
        Self { index, config }
    }

    pub fn scope_for(
        &self,
        role: Role,
        actor: Option<&str>,
        department: Option<&str>,
    ) -> EmployeeScope {
        self.decide(role, actor, department).scope
    }

    /// Strict role parsing: unknown role strings are a caller error
    pub fn try_scope_for_role_name(
        &self,
        role: &str,
        actor: Option<&str>,
        department: Option<&str>,
    ) -> Result<EmployeeScope> {
        Ok(self.scope_for(role.parse()?, actor, department))
    }

    /// Lenient role parsing: unknown role strings see nobody
    pub fn scope_for_role_name(
        &self,
        role: &str,
        actor: Option<&str>,
        department: Option<&str>,
    ) -> EmployeeScope {
        match role.parse::<Role>() {
            Ok(role) => self.scope_for(role, actor, department),
            Err(_) => {
                warn!(role, "unknown role; granting no access");
                EmployeeScope::nobody()
            }
        }
    }

    pub fn decide(
        &self,
        role: Role,
        actor: Option<&str>,
        department: Option<&str>,
    ) -> ScopeDecision {
        let department = department.map(str::trim).filter(|d| !d.is_empty());
        let resolved = actor.and_then(|a| self.index.lookup_actor(a)).cloned();

        let (label, scope) = match role {
            Role::Hr => (ScopeLabel::CompanyWide, EmployeeScope::All),
            Role::Leader => match (&resolved, department) {
                (Some(identity), _) => {
                    let mut names: BTreeSet<Identity> = self
                        .index
                        .descendant_identities_of(identity.as_str())
                        .iter()
                        .cloned()
                        .collect();
                    names.insert(identity.clone());
                    (ScopeLabel::TeamHierarchy, EmployeeScope::Names { names })
                }
                (None, Some(department)) => {
                    if let Some(actor) = actor {
                        warn!(actor, department, "leader not in hierarchy; using department scope");
                    }
                    (
                        ScopeLabel::Department,
                        EmployeeScope::Department {
                            department: department.to_string(),
                        },
                    )
                }
                (None, None) => {
                    if let Some(actor) = actor {
                        warn!(actor, "leader not in hierarchy; granting no access");
                    }
                    (ScopeLabel::None, EmployeeScope::nobody())
                }
            },
            Role::Manager => match &resolved {
                Some(identity) => {
                    let (label, names) = match self.config.manager_scope {
                        ManagerScope::Direct => (
                            ScopeLabel::DirectReports,
                            self.direct_reports_of(identity.as_str()),
                        ),
                        ManagerScope::Transitive => (
                            ScopeLabel::TeamHierarchy,
                            self.index
                                .descendant_identities_of(identity.as_str())
                                .iter()
                                .cloned()
                                .collect(),
                        ),
                    };
                    (label, EmployeeScope::Names { names })
                }
                None => (ScopeLabel::None, EmployeeScope::nobody()),
            },
        };

        debug!(role = %role, label = %label, "scope resolved");
        ScopeDecision {
            role,
            actor: resolved,
            label,
            scope,
        }
    }

    pub fn direct_reports_of(&self, actor: &str) -> BTreeSet<Identity> {
        self.index
            .direct_reports_of(actor)
            .into_iter()
            .map(|(identity, _)| identity.clone())
            .collect()
    }
}
