//! Employee directory snapshots
//!
//! A snapshot is the materialized, read-only set of candidates a batch of
//! cards is ranked against. Its version is a content fingerprint, so two
//! snapshots with the same entries in the same order share a version.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::path::Path;
use crate::identity::CandidateIdentity;

/// Content fingerprint of a snapshot (lowercase SHA-256 hex)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SnapshotVersion(String);

impl SnapshotVersion {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First 12 hex digits, for log lines
    pub fn short(&self) -> &str {
        &self.0[..self.0.len().min(12)]
    }
}

impl std::fmt::Display for SnapshotVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Read-only set of candidate identities for one tenant
///
/// Serialized as a plain JSON array. Deserializing goes through
/// [`EmployeeSnapshot::new`], so duplicate ids are rejected there too.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<CandidateIdentity>", into = "Vec<CandidateIdentity>")]
pub struct EmployeeSnapshot {
    employees: Vec<CandidateIdentity>,
}

impl TryFrom<Vec<CandidateIdentity>> for EmployeeSnapshot {
    type Error = SnapshotError;

    fn try_from(employees: Vec<CandidateIdentity>) -> Result<Self, Self::Error> {
        Self::new(employees)
    }
}

impl From<EmployeeSnapshot> for Vec<CandidateIdentity> {
    fn from(snapshot: EmployeeSnapshot) -> Self {
        snapshot.employees
    }
}

impl EmployeeSnapshot {
    /// Build a snapshot, rejecting duplicate employee ids
    pub fn new(employees: Vec<CandidateIdentity>) -> Result<Self, SnapshotError> {
        let mut seen = HashSet::new();
        for employee in &employees {
            if !seen.insert(employee.id.as_str()) {
                return Err(SnapshotError::DuplicateEmployee(employee.id.clone()));
            }
        }

        Ok(Self { employees })
    }

    /// Parse a JSON array of `{ id, display_name, identity_string }`
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let employees: Vec<CandidateIdentity> = serde_json::from_str(json)
            .map_err(|e| SnapshotError::ParseError(e.to_string()))?;

        Self::new(employees)
    }

    /// Load a snapshot from a JSON file
    pub fn from_file(path: &Path) -> Result<Self, SnapshotError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| SnapshotError::IoError(path.display().to_string(), e.to_string()))?;

        Self::from_json(&contents)
    }

    pub fn employees(&self) -> &[CandidateIdentity] {
        &self.employees
    }

    pub fn len(&self) -> usize {
        self.employees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.employees.is_empty()
    }

    /// Look up an employee by id
    pub fn get(&self, id: &str) -> Option<&CandidateIdentity> {
        self.employees.iter().find(|e| e.id == id)
    }

    /// Employees whose identity can never be compared (too short after stripping)
    pub fn uncomparable(&self, min_len: usize) -> impl Iterator<Item = &CandidateIdentity> {
        self.employees
            .iter()
            .filter(move |e| !e.normalized_identity().is_comparable(min_len))
    }

    /// Fingerprint over every field of every entry, in order
    pub fn version(&self) -> SnapshotVersion {
        let mut hasher = Sha256::new();

        for employee in &self.employees {
            // Unit separators keep ("ab","c") and ("a","bc") apart
            hasher.update(employee.id.as_bytes());
            hasher.update([0x1f]);
            hasher.update(employee.display_name.as_bytes());
            hasher.update([0x1f]);
            hasher.update(employee.identity_string.as_bytes());
            hasher.update([0x1e]);
        }

        SnapshotVersion(hex::encode(hasher.finalize()))
    }
}

/// Snapshot loading errors
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("Failed to read employee snapshot {0}: {1}")]
    IoError(String, String),

    #[error("Failed to parse employee snapshot JSON: {0}")]
    ParseError(String),

    #[error("Duplicate employee id in snapshot: {0}")]
    DuplicateEmployee(String),
}
