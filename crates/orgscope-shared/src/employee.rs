//! Employee roster records.
//!
//! One `EmployeeRecord` is one row of the flat roster. Manager links are weak:
//! `manager_name` is a display-name string, `manager_id` an optional id.
//! Field names follow the camelCase wire shape and also accept the snake_case
//! column names of the roster export.

use serde::{Deserialize, Deserializer, Serialize};
use std::borrow::Borrow;
use std::cmp::Ordering;

/// Resolved, collision-checked key of one employee.
/// `id` when the record has one, otherwise the display name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Borrow<str> for Identity {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Identity {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for Identity {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Seniority tag. `l0`..`l9` are ranked; anything else is kept verbatim and
/// sorts below every ranked level.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Level {
    Ranked(u8),
    Unranked(String),
}

impl Level {
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        let lower = trimmed.to_ascii_lowercase();
        let mut chars = lower.chars();
        if let (Some('l'), Some(digit), None) = (chars.next(), chars.next(), chars.next()) {
            if let Some(rank) = digit.to_digit(10) {
                return Self::Ranked(rank as u8);
            }
        }
        Self::Unranked(trimmed.to_string())
    }

    /// Rank used for seniority ordering; unranked levels are -1.
    pub fn rank(&self) -> i16 {
        match self {
            Self::Ranked(n) => *n as i16,
            Self::Unranked(_) => -1,
        }
    }

    pub fn is_ranked(&self) -> bool {
        matches!(self, Self::Ranked(_))
    }
}

impl Default for Level {
    fn default() -> Self {
        Self::Unranked(String::new())
    }
}

impl Ord for Level {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Ranked(a), Self::Ranked(b)) => a.cmp(b),
            (Self::Unranked(a), Self::Unranked(b)) => a.cmp(b),
            (Self::Unranked(_), Self::Ranked(_)) => Ordering::Less,
            (Self::Ranked(_), Self::Unranked(_)) => Ordering::Greater,
        }
    }
}

impl PartialOrd for Level {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ranked(n) => write!(f, "l{}", n),
            Self::Unranked(s) => write!(f, "{}", s),
        }
    }
}

impl From<String> for Level {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<&str> for Level {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

impl From<Level> for String {
    fn from(value: Level) -> Self {
        value.to_string()
    }
}

/// Employment status. Only `Active` takes part in hierarchy construction by
/// default.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Status {
    Active,
    Other(String),
}

impl Default for Status {
    // The roster export only ever selects active rows, so a missing status
    // means active.
    fn default() -> Self {
        Self::Active
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => write!(f, "Active"),
            Self::Other(s) => write!(f, "{}", s),
        }
    }
}

impl From<String> for Status {
    fn from(value: String) -> Self {
        if value.trim().eq_ignore_ascii_case("active") || value.trim().is_empty() {
            Self::Active
        } else {
            Self::Other(value.trim().to_string())
        }
    }
}

impl From<Status> for String {
    fn from(value: Status) -> Self {
        value.to_string()
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn blank_as_none<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

/// One roster row
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeRecord {
    #[serde(default, alias = "emp_id", deserialize_with = "null_as_empty")]
    pub id: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(default, alias = "manager_name", deserialize_with = "null_as_empty")]
    pub manager_name: String,
    #[serde(
        default,
        alias = "manager_id",
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub manager_id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub level: Level,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: Status,
    #[serde(default, alias = "team", deserialize_with = "null_as_empty")]
    pub department: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub designation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Age band such as `30-35` or `45+`
    #[serde(
        default,
        alias = "age_group",
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub age_group: Option<String>,
}

impl EmployeeRecord {
    /// Active record with only a name set
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = id.to_string();
        self
    }

    pub fn with_manager(mut self, manager_name: &str) -> Self {
        self.manager_name = manager_name.to_string();
        self
    }

    pub fn with_manager_id(mut self, manager_id: &str) -> Self {
        self.manager_id = Some(manager_id.to_string()).filter(|s| !s.trim().is_empty());
        self
    }

    pub fn with_level(mut self, level: &str) -> Self {
        self.level = Level::parse(level);
        self
    }

    pub fn with_status(mut self, status: &str) -> Self {
        self.status = Status::from(status.to_string());
        self
    }

    pub fn with_department(mut self, department: &str) -> Self {
        self.department = department.to_string();
        self
    }

    pub fn with_designation(mut self, designation: &str) -> Self {
        self.designation = Some(designation.to_string());
        self
    }

    pub fn with_age_group(mut self, age_group: &str) -> Self {
        self.age_group = Some(age_group.to_string()).filter(|s| !s.trim().is_empty());
        self
    }

    pub fn is_active(&self) -> bool {
        self.status == Status::Active
    }

    /// Trimmed `id`, `None` when blank
    pub fn id_trimmed(&self) -> Option<&str> {
        Some(self.id.trim()).filter(|s| !s.is_empty())
    }

    /// Trimmed manager name, `None` when blank
    pub fn manager_name_trimmed(&self) -> Option<&str> {
        Some(self.manager_name.trim()).filter(|s| !s.is_empty())
    }

    /// Trimmed manager id, `None` when blank
    pub fn manager_id_trimmed(&self) -> Option<&str> {
        self.manager_id
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}
