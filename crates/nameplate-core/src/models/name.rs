//! Resource name — the mutable, human-assigned half of the dual identity.
//!
//! Names are used for indexed lookup and display. They are unique only
//! among non-deleted records sharing the same scope; the immutable
//! [`ResourceId`](super::id::ResourceId) is the global key.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MetadataError;

const MAX_NAME_LEN: usize = 63;

/// Validated resource name: lowercase alphanumerics and hyphens, no
/// leading or trailing hyphen, 1..=63 characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ResourceName(String);

impl ResourceName {
    pub fn new(name: impl Into<String>) -> Result<Self, MetadataError> {
        let name = name.into();
        if name.is_empty() || name.len() > MAX_NAME_LEN {
            return Err(MetadataError::Validation {
                message: format!("name must be 1..={MAX_NAME_LEN} characters"),
            });
        }
        if name.starts_with('-') || name.ends_with('-') {
            return Err(MetadataError::Validation {
                message: "name must not start or end with a hyphen".into(),
            });
        }
        if !name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            return Err(MetadataError::Validation {
                message: "name may contain only lowercase alphanumerics and hyphens".into(),
            });
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ResourceName {
    type Err = MetadataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for ResourceName {
    type Error = MetadataError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<ResourceName> for String {
    fn from(name: ResourceName) -> Self {
        name.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_label_safe_names() {
        for ok in ["alpha", "a", "web-frontend-2", "0day"] {
            assert!(ResourceName::new(ok).is_ok(), "{ok} should be valid");
        }
    }

    #[test]
    fn rejects_edge_hyphens_case_and_symbols() {
        for bad in ["", "-alpha", "alpha-", "Alpha", "al pha", "al.pha"] {
            assert!(ResourceName::new(bad).is_err(), "{bad:?} should be invalid");
        }
    }

    #[test]
    fn rejects_overlong_names() {
        assert!(ResourceName::new("a".repeat(63)).is_ok());
        assert!(ResourceName::new("a".repeat(64)).is_err());
    }

    #[test]
    fn serde_round_trips_through_validation() {
        let name: ResourceName = serde_json::from_str("\"alpha\"").unwrap();
        assert_eq!(name.as_str(), "alpha");
        assert!(serde_json::from_str::<ResourceName>("\"-bad-\"").is_err());
    }
}
