//! Non-fatal data-quality findings collected while resolving identities and
//! building the hierarchy.
//!
//! Anomalies never abort processing. Every one is logged when recorded and
//! returned alongside the best-effort forest.

use crate::employee::Identity;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Anomaly kind. Order is pinned for deterministic reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyKind {
    /// Record has no `id`; identity fell back to the display name
    MissingId,
    /// Two records resolved to the same identity with differing content
    DuplicateIdentity,
    /// Distinct identities share one display name
    DuplicateName,
    /// Blank manager reference
    NoManager,
    /// Manager reference points at the record itself
    SelfReference,
    /// Manager reference matches nothing in the active roster
    DanglingManager,
    /// Manager name matched several records
    AmbiguousManager,
    /// `managerName` and `managerId` point at different people
    ManagerIdNameMismatch,
    /// Manager links form a loop
    Cycle,
}

impl AnomalyKind {
    pub const ALL: [AnomalyKind; 9] = [
        Self::MissingId,
        Self::DuplicateIdentity,
        Self::DuplicateName,
        Self::NoManager,
        Self::SelfReference,
        Self::DanglingManager,
        Self::AmbiguousManager,
        Self::ManagerIdNameMismatch,
        Self::Cycle,
    ];

    /// Expected shapes of a healthy roster (top of the org, id-less exports)
    /// are informational; everything else is a warning.
    pub fn is_warning(&self) -> bool {
        !matches!(self, Self::MissingId | Self::NoManager)
    }
}

impl std::fmt::Display for AnomalyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::MissingId => "missing_id",
            Self::DuplicateIdentity => "duplicate_identity",
            Self::DuplicateName => "duplicate_name",
            Self::NoManager => "no_manager",
            Self::SelfReference => "self_reference",
            Self::DanglingManager => "dangling_manager",
            Self::AmbiguousManager => "ambiguous_manager",
            Self::ManagerIdNameMismatch => "manager_id_name_mismatch",
            Self::Cycle => "cycle",
        };
        write!(f, "{}", s)
    }
}

/// One recorded anomaly
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Anomaly {
    pub kind: AnomalyKind,
    /// Record the anomaly is about
    pub identity: Identity,
    /// Other identities involved (cycle members, match candidates, ...)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub involved: Vec<Identity>,
    pub detail: String,
}

impl Anomaly {
    pub fn new(kind: AnomalyKind, identity: Identity, detail: impl Into<String>) -> Self {
        Self {
            kind,
            identity,
            involved: Vec::new(),
            detail: detail.into(),
        }
    }

    pub fn with_involved(mut self, involved: Vec<Identity>) -> Self {
        self.involved = involved;
        self
    }

    /// Format as single line for display
    pub fn format(&self) -> String {
        if self.involved.is_empty() {
            format!("[{}] {}: {}", self.kind, self.identity, self.detail)
        } else {
            let involved: Vec<&str> = self.involved.iter().map(Identity::as_str).collect();
            format!(
                "[{}] {}: {} ({})",
                self.kind,
                self.identity,
                self.detail,
                involved.join(" -> ")
            )
        }
    }
}

/// Append-only anomaly sink that logs as it records.
#[derive(Debug, Default)]
pub(crate) struct AnomalyLog {
    entries: Vec<Anomaly>,
}

impl AnomalyLog {
    pub(crate) fn record(&mut self, anomaly: Anomaly) {
        if anomaly.kind.is_warning() {
            warn!(kind = %anomaly.kind, identity = %anomaly.identity, "{}", anomaly.detail);
        } else {
            debug!(kind = %anomaly.kind, identity = %anomaly.identity, "{}", anomaly.detail);
        }
        self.entries.push(anomaly);
    }

    pub(crate) fn extend(&mut self, anomalies: impl IntoIterator<Item = Anomaly>) {
        for anomaly in anomalies {
            self.record(anomaly);
        }
    }

    pub(crate) fn into_vec(self) -> Vec<Anomaly> {
        self.entries
    }
}

/// Per-kind counts over a list of anomalies
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnomalyReport {
    pub total: usize,
    pub warnings: usize,
    pub by_kind: BTreeMap<AnomalyKind, usize>,
}

impl AnomalyReport {
    pub fn from_anomalies(anomalies: &[Anomaly]) -> Self {
        let mut report = Self::default();
        for anomaly in anomalies {
            report.total += 1;
            if anomaly.kind.is_warning() {
                report.warnings += 1;
            }
            *report.by_kind.entry(anomaly.kind).or_insert(0) += 1;
        }
        report
    }

    pub fn count(&self, kind: AnomalyKind) -> usize {
        self.by_kind.get(&kind).copied().unwrap_or(0)
    }

    pub fn is_clean(&self) -> bool {
        self.warnings == 0
    }
}
