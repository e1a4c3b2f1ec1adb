//! Identity resolution for roster records.
//!
//! The roster's id column is often empty, so identity is `id` when present and
//! the display name otherwise. The first record for an identity wins; later
//! records with differing content are reported, never merged.
//!
//! Ids and name fallbacks are separate key spaces. When an id-less record's
//! name spells another record's id, the name fallback is qualified as
//! `name:<name>` so both employees keep a node.

use crate::anomaly::{Anomaly, AnomalyKind};
use crate::employee::{EmployeeRecord, Identity};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// How manager names are compared against display names
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NameMatch {
    /// Whitespace-trimmed, case-sensitive
    #[default]
    Exact,
    /// Whitespace-trimmed, case-insensitive
    CaseInsensitive,
}

impl NameMatch {
    /// Lookup key for a display name
    pub fn key(&self, name: &str) -> String {
        match self {
            Self::Exact => name.trim().to_string(),
            Self::CaseInsensitive => name.trim().to_lowercase(),
        }
    }
}

/// Identity-level finding with the offending record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityAnomaly {
    pub kind: AnomalyKind,
    pub record: EmployeeRecord,
    /// Identity the record collided with or resolved to
    pub identity: Identity,
}

impl From<IdentityAnomaly> for Anomaly {
    fn from(value: IdentityAnomaly) -> Self {
        let detail = match value.kind {
            AnomalyKind::MissingId => "record has no id; identity falls back to name".to_string(),
            AnomalyKind::DuplicateIdentity => format!(
                "duplicate identity with differing content (dropped record named {:?})",
                value.record.name
            ),
            AnomalyKind::DuplicateName => format!(
                "display name {:?} is shared by several employees",
                value.record.name.trim()
            ),
            other => other.to_string(),
        };
        Anomaly::new(value.kind, value.identity, detail)
    }
}

/// Identity of a single record
pub fn identity_of(record: &EmployeeRecord) -> Identity {
    match record.id_trimmed() {
        Some(id) => Identity::new(id),
        None => Identity::new(record.name.trim()),
    }
}

/// Identity of an id-less record whose name collides with an explicit id
pub fn qualified_name_identity(record: &EmployeeRecord) -> Identity {
    Identity::new(format!("name:{}", record.name.trim()))
}

/// Records keyed by resolved identity, in roster order
#[derive(Debug, Clone, Default)]
pub struct ResolvedRoster {
    entries: Vec<(Identity, EmployeeRecord)>,
    by_identity: HashMap<Identity, usize>,
    by_name: HashMap<String, Vec<usize>>,
    by_id: HashMap<String, usize>,
    /// Parallel to `entries`: identity came from an explicit id
    id_keyed: Vec<bool>,
    name_match: NameMatch,
    anomalies: Vec<IdentityAnomaly>,
}

impl ResolvedRoster {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in roster order
    pub fn entries(&self) -> &[(Identity, EmployeeRecord)] {
        &self.entries
    }

    pub fn get(&self, identity: &str) -> Option<&EmployeeRecord> {
        self.position(identity).map(|i| &self.entries[i].1)
    }

    pub fn position(&self, identity: &str) -> Option<usize> {
        self.by_identity.get(identity).copied()
    }

    /// Positions of every record whose display name matches, in roster order
    pub fn positions_by_name(&self, name: &str) -> &[usize] {
        self.by_name
            .get(&self.name_match.key(name))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Position of the record with this explicit `id`
    pub fn position_by_id(&self, id: &str) -> Option<usize> {
        self.by_id.get(id.trim()).copied()
    }

    pub fn name_match(&self) -> NameMatch {
        self.name_match
    }

    pub fn anomalies(&self) -> &[IdentityAnomaly] {
        &self.anomalies
    }

    fn rekey(&mut self, position: usize, identity: Identity) {
        let old = std::mem::replace(&mut self.entries[position].0, identity.clone());
        self.by_identity.remove(&old);
        self.by_identity.insert(identity.clone(), position);
        for anomaly in self.anomalies.iter_mut().filter(|a| a.identity == old) {
            anomaly.identity = identity.clone();
        }
    }

    pub fn into_parts(self) -> (Vec<(Identity, EmployeeRecord)>, Vec<IdentityAnomaly>) {
        (self.entries, self.anomalies)
    }
}

/// Resolves roster records to identities
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityResolver {
    name_match: NameMatch,
}

impl IdentityResolver {
    pub fn new(name_match: NameMatch) -> Self {
        Self { name_match }
    }

    pub fn resolve<'a, I>(&self, records: I) -> ResolvedRoster
    where
        I: IntoIterator<Item = &'a EmployeeRecord>,
    {
        let mut roster = ResolvedRoster {
            name_match: self.name_match,
            ..Default::default()
        };

        for record in records {
            let from_id = record.id_trimmed().is_some();
            let mut identity = identity_of(record);

            if let Some(&existing) = roster.by_identity.get(&identity) {
                if roster.id_keyed[existing] != from_id {
                    debug!(identity = %identity, "name fallback collides with an id; qualifying it");
                    if from_id {
                        let qualified = qualified_name_identity(&roster.entries[existing].1);
                        roster.rekey(existing, qualified);
                    } else {
                        identity = qualified_name_identity(record);
                    }
                }
            }

            if let Some(&existing) = roster.by_identity.get(&identity) {
                if roster.entries[existing].1 == *record {
                    debug!(identity = %identity, "skipping identical duplicate row");
                } else {
                    roster.anomalies.push(IdentityAnomaly {
                        kind: AnomalyKind::DuplicateIdentity,
                        record: record.clone(),
                        identity,
                    });
                }
                continue;
            }

            if !from_id {
                roster.anomalies.push(IdentityAnomaly {
                    kind: AnomalyKind::MissingId,
                    record: record.clone(),
                    identity: identity.clone(),
                });
            }

            let position = roster.entries.len();
            let name_key = self.name_match.key(&record.name);
            let same_name = roster.by_name.entry(name_key).or_default();
            if !same_name.is_empty() {
                roster.anomalies.push(IdentityAnomaly {
                    kind: AnomalyKind::DuplicateName,
                    record: record.clone(),
                    identity: identity.clone(),
                });
            }
            same_name.push(position);

            if let Some(id) = record.id_trimmed() {
                roster.by_id.insert(id.to_string(), position);
            }
            roster.by_identity.insert(identity.clone(), position);
            roster.id_keyed.push(from_id);
            roster.entries.push((identity, record.clone()));
        }

        roster
    }
}
