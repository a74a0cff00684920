//! Mapping entity: the association between a short code and a target URL.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored code to URL mapping.
///
/// Mappings are created once by a successful reservation and never mutated.
/// `created_at` is optional because values written without metadata (bare URL
/// strings) carry no timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mapping {
    pub code: String,
    pub target_url: String,
    pub created_at: Option<DateTime<Utc>>,
}

impl Mapping {
    /// Creates a new Mapping instance.
    pub fn new(code: String, target_url: String, created_at: Option<DateTime<Utc>>) -> Self {
        Self {
            code,
            target_url,
            created_at,
        }
    }
}

/// Input data for reserving a code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMapping {
    pub code: String,
    pub target_url: String,
    pub created_at: DateTime<Utc>,
}

impl NewMapping {
    /// Builds a reservation request stamped with the current time.
    pub fn now(code: impl Into<String>, target_url: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            target_url: target_url.into(),
            created_at: Utc::now(),
        }
    }

    /// The record that a store returns once this reservation succeeded.
    pub fn into_mapping(self) -> Mapping {
        Mapping {
            code: self.code,
            target_url: self.target_url,
            created_at: Some(self.created_at),
        }
    }
}

/// Value layout persisted by key-value backends.
///
/// The code is the key and is therefore not repeated in the value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredMapping {
    pub target_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl StoredMapping {
    /// Decodes a raw stored value.
    ///
    /// Anything that is not a JSON document is taken as a bare target URL.
    pub fn decode(raw: &str) -> Self {
        serde_json::from_str(raw).unwrap_or_else(|_| Self {
            target_url: raw.to_string(),
            created_at: None,
        })
    }

    pub fn into_mapping(self, code: &str) -> Mapping {
        Mapping::new(code.to_string(), self.target_url, self.created_at)
    }
}

impl From<&NewMapping> for StoredMapping {
    fn from(new_mapping: &NewMapping) -> Self {
        Self {
            target_url: new_mapping.target_url.clone(),
            created_at: Some(new_mapping.created_at),
        }
    }
}
