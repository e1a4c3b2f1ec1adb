//! Roster providers and flat roster queries.
//!
//! The engine never talks to storage. A `RosterProvider` hands over one
//! snapshot of records; everything downstream works on that snapshot.

use crate::employee::{EmployeeRecord, Level};
use crate::error::{OrgError, Result};
use crate::presenter::compare_names;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Source of roster snapshots
pub trait RosterProvider {
    fn fetch_roster(&self) -> Result<Vec<EmployeeRecord>>;
}

/// Fixed in-memory roster
#[derive(Debug, Clone, Default)]
pub struct InMemoryRoster {
    records: Vec<EmployeeRecord>,
}

impl InMemoryRoster {
    pub fn new(records: Vec<EmployeeRecord>) -> Self {
        Self { records }
    }
}

impl RosterProvider for InMemoryRoster {
    fn fetch_roster(&self) -> Result<Vec<EmployeeRecord>> {
        Ok(self.records.clone())
    }
}

/// Accepted roster file shapes
#[derive(Deserialize)]
#[serde(untagged)]
enum RosterFile {
    List(Vec<EmployeeRecord>),
    Wrapped { employees: Option<Vec<EmployeeRecord>> },
}

/// Roster read from a JSON file: an array of records or
/// `{"employees": [...]}`
#[derive(Debug, Clone)]
pub struct JsonRoster {
    path: PathBuf,
}

impl JsonRoster {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RosterProvider for JsonRoster {
    fn fetch_roster(&self) -> Result<Vec<EmployeeRecord>> {
        let content = fs::read_to_string(&self.path)?;
        let records = parse_roster(&content)?;
        info!("Loaded {} roster records from {}", records.len(), self.path.display());
        Ok(records)
    }
}

/// Parse roster JSON. `null` (top level or `employees`) means the provider
/// had no roster at all.
pub fn parse_roster(content: &str) -> Result<Vec<EmployeeRecord>> {
    let parsed: Option<RosterFile> = serde_json::from_str(content)?;
    match parsed {
        Some(RosterFile::List(records)) => Ok(records),
        Some(RosterFile::Wrapped {
            employees: Some(records),
        }) => Ok(records),
        Some(RosterFile::Wrapped { employees: None }) | None => Err(OrgError::MissingRoster),
    }
}

/// Active records at one level, sorted by name
pub fn by_level<'a>(records: &'a [EmployeeRecord], level: &Level) -> Vec<&'a EmployeeRecord> {
    let mut matched: Vec<_> = records
        .iter()
        .filter(|r| r.is_active() && r.level == *level)
        .collect();
    matched.sort_by(|a, b| compare_names(&a.name, &b.name));
    matched
}

/// Case-insensitive substring match on name or designation. A blank query
/// matches everything.
pub fn matches_query(record: &EmployeeRecord, query: &str) -> bool {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return true;
    }
    record.name.to_lowercase().contains(&query)
        || record
            .designation
            .as_deref()
            .map(|d| d.to_lowercase().contains(&query))
            .unwrap_or(false)
}

/// Active records matching a query, sorted by name
pub fn search<'a>(records: &'a [EmployeeRecord], query: &str) -> Vec<&'a EmployeeRecord> {
    let mut matched: Vec<_> = records
        .iter()
        .filter(|r| r.is_active() && matches_query(r, query))
        .collect();
    matched.sort_by(|a, b| compare_names(&a.name, &b.name));
    matched
}
