//! Identity strings and candidate identities

use serde::{Deserialize, Serialize};

/// Minimum number of characters (after whitespace removal) an identity string
/// must have before it is compared against anything.
pub const MIN_IDENTITY_LEN: usize = 4;

/// A passport/ID value prepared for comparison.
///
/// All whitespace is stripped on construction. No other normalization is
/// applied: `a1234567` and `A1234567` are different identities.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdentityString(String);

impl IdentityString {
    /// Build an identity string from raw (possibly OCR-noisy) input
    pub fn normalize(raw: &str) -> Self {
        Self(raw.chars().filter(|c| !c.is_whitespace()).collect())
    }

    /// Normalize an optional raw value; `None` stays `None`
    pub fn from_optional(raw: Option<&str>) -> Option<Self> {
        raw.map(Self::normalize)
    }

    /// The stripped value
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length in characters (not bytes)
    pub fn char_len(&self) -> usize {
        self.0.chars().count()
    }

    /// Whether the stripped value is long enough to be compared
    pub fn is_comparable(&self, min_len: usize) -> bool {
        self.char_len() >= min_len
    }

    /// Characters of the stripped value
    pub fn to_chars(&self) -> Vec<char> {
        self.0.chars().collect()
    }
}

impl std::fmt::Display for IdentityString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for IdentityString {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A known employee as supplied by the employee directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateIdentity {
    /// Opaque employee identifier
    pub id: String,

    /// Human-readable name shown to operators
    pub display_name: String,

    /// Canonical passport/ID value on file
    pub identity_string: String,
}

impl CandidateIdentity {
    /// Create a new candidate
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        identity_string: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            identity_string: identity_string.into(),
        }
    }

    /// The canonical identity with whitespace removed
    pub fn normalized_identity(&self) -> IdentityString {
        IdentityString::normalize(&self.identity_string)
    }
}
