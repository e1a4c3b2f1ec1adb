//! Error types for OrgScope.
//!
//! Data-quality problems in a roster are never errors; they are collected as
//! anomalies. Only caller contract violations and I/O failures end up here.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum OrgError {
    #[error("Roster is missing. The roster provider returned no data.")]
    MissingRoster,

    #[error("Invalid role: {0:?} (expected hr, leader or manager)")]
    InvalidRole(String),

    #[error("Unknown employee: {0}")]
    UnknownIdentity(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl OrgError {
    /// HTTP-style status class for the serving layer.
    pub fn code(&self) -> u16 {
        match self {
            OrgError::MissingRoster => 400,
            OrgError::InvalidRole(_) => 400,
            OrgError::UnknownIdentity(_) => 404,
            OrgError::Config(_) => 500,
            OrgError::Io(_) => 500,
            OrgError::Json(_) => 500,
        }
    }

    /// True when the caller broke the engine's contract.
    pub fn is_contract_violation(&self) -> bool {
        self.code() == 400
    }
}

pub type Result<T> = std::result::Result<T, OrgError>;
