//! Organizational hierarchy engine for role-scoped people data.
//!
//! Takes a flat, possibly inconsistent employee roster and produces:
//! a canonical manager -> reports forest, an O(1) "everyone under X" index,
//! role-based visibility scopes, and ordered tree views.
//!
//! Flow: roster -> identity -> hierarchy -> {descendants, presenter} -> scope.

pub mod anomaly;
pub mod config;
pub mod descendants;
pub mod employee;
pub mod error;
pub mod hierarchy;
pub mod identity;
pub mod mix;
pub mod presenter;
pub mod roster;
pub mod scope;
pub mod snapshot;

pub use anomaly::{Anomaly, AnomalyKind, AnomalyReport};
pub use config::{HierarchyConfig, ManagerScope, OrgConfig, RosterConfig, ScopeConfig};
pub use descendants::DescendantIndex;
pub use employee::{EmployeeRecord, Identity, Level, Status};
pub use error::{OrgError, Result};
pub use hierarchy::{build, BuildResult, Forest, HierarchyBuilder, HierarchyNode};
pub use identity::{IdentityAnomaly, IdentityResolver, NameMatch, ResolvedRoster};
pub use mix::{AgeCount, AgeMix, LevelCount, SeniorityMix};
pub use presenter::{present, present_leveled, present_subtree, PresentedNode};
pub use roster::{InMemoryRoster, JsonRoster, RosterProvider};
pub use scope::{EmployeeScope, Role, ScopeDecision, ScopeLabel, ScopeResolver};
pub use snapshot::{build_hierarchy, OrgSnapshot};
