//! Configuration management for OrgScope.
//!
//! Loads settings from an explicit path, `$ORGSCOPE_CONFIG`, or
//! `./orgscope.toml`, in that order. Missing files fall back to defaults.

use crate::error::{OrgError, Result};
use crate::identity::NameMatch;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming a config file
pub const CONFIG_ENV: &str = "ORGSCOPE_CONFIG";

/// Config file looked up in the working directory
pub const LOCAL_CONFIG_PATH: &str = "orgscope.toml";

/// Hierarchy construction settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HierarchyConfig {
    /// Keep non-active records in the forest
    #[serde(default)]
    pub include_inactive: bool,

    /// How manager names are matched against display names
    #[serde(default)]
    pub name_match: NameMatch,
}

/// What the `manager` role sees
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ManagerScope {
    /// Direct reports only
    #[default]
    Direct,
    /// Direct and indirect reports, like `leader`
    Transitive,
}

/// Scope resolution settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeConfig {
    #[serde(default)]
    pub manager_scope: ManagerScope,
}

/// Roster source settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterConfig {
    /// Roster JSON file used when no path is given on the command line
    #[serde(default = "default_roster_path")]
    pub path: PathBuf,
}

fn default_roster_path() -> PathBuf {
    PathBuf::from("roster.json")
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            path: default_roster_path(),
        }
    }
}

/// Complete OrgScope configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrgConfig {
    #[serde(default)]
    pub hierarchy: HierarchyConfig,

    #[serde(default)]
    pub scope: ScopeConfig,

    #[serde(default)]
    pub roster: RosterConfig,
}

impl OrgConfig {
    /// Load config. An explicit path or `$ORGSCOPE_CONFIG` must parse; the
    /// local file is optional.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from_path(path);
        }

        if let Ok(path) = std::env::var(CONFIG_ENV) {
            if !path.trim().is_empty() {
                return Self::load_from_path(Path::new(&path));
            }
        }

        Ok(Self::load_from_path(Path::new(LOCAL_CONFIG_PATH)).unwrap_or_else(|e| {
            warn!("Config not found, using defaults: {}", e);
            Self::default()
        }))
    }

    /// Load config from specific path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config = Self::from_toml(&content)
            .map_err(|e| OrgError::Config(format!("{}: {}", path.display(), e)))?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| OrgError::Config(e.to_string()))
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| OrgError::Config(e.to_string()))
    }
}
