//! Resource identifier — the immutable system-of-record key.
//!
//! Identifiers are propagated to the underlying orchestration platform
//! and to cloud-tag and CI/CD consumers, so they must satisfy DNS-label
//! syntax: start with a letter, lowercase alphanumerics and hyphens,
//! at most 63 characters.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::MetadataError;

const MAX_LABEL_LEN: usize = 63;

/// Opaque, globally unique resource identifier.
///
/// Assigned exactly once at creation and never reused, even after the
/// resource is deleted. Uniqueness is probabilistic (v4 entropy); the
/// store's conditional insert is the best-effort backstop.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ResourceId(String);

impl ResourceId {
    /// Mint a fresh identifier from v4 entropy.
    ///
    /// The `r-` prefix guarantees the leading-alphabetic constraint; the
    /// body is 32 lowercase hex characters, well under the label limit.
    pub fn allocate() -> Self {
        Self(format!("r-{}", Uuid::new_v4().simple()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ResourceId {
    type Err = MetadataError;

    /// Validate an externally supplied identifier against the full
    /// label syntax. Identifiers minted by [`ResourceId::allocate`]
    /// always pass.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || s.len() > MAX_LABEL_LEN {
            return Err(MetadataError::Validation {
                message: format!("resource id must be 1..={MAX_LABEL_LEN} characters"),
            });
        }
        let first = s.chars().next().unwrap_or_default();
        if !first.is_ascii_lowercase() {
            return Err(MetadataError::Validation {
                message: "resource id must start with a lowercase letter".into(),
            });
        }
        if s.ends_with('-') {
            return Err(MetadataError::Validation {
                message: "resource id must not end with a hyphen".into(),
            });
        }
        if !s
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            return Err(MetadataError::Validation {
                message: "resource id may contain only lowercase alphanumerics and hyphens".into(),
            });
        }
        Ok(Self(s.to_owned()))
    }
}

impl TryFrom<String> for ResourceId {
    type Error = MetadataError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<ResourceId> for String {
    fn from(id: ResourceId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocated_id_satisfies_label_syntax() {
        let id = ResourceId::allocate();
        assert!(id.as_str().starts_with("r-"));
        assert_eq!(id.as_str().len(), 34);
        assert!(id.as_str().parse::<ResourceId>().is_ok());
    }

    #[test]
    fn allocated_ids_are_distinct() {
        let a = ResourceId::allocate();
        let b = ResourceId::allocate();
        assert_ne!(a, b);
    }

    #[test]
    fn rejects_leading_digit_and_hyphen() {
        assert!("1abc".parse::<ResourceId>().is_err());
        assert!("-abc".parse::<ResourceId>().is_err());
    }

    #[test]
    fn rejects_trailing_hyphen_uppercase_and_overlong() {
        assert!("abc-".parse::<ResourceId>().is_err());
        assert!("aBc".parse::<ResourceId>().is_err());
        let long = format!("a{}", "b".repeat(63));
        assert!(long.parse::<ResourceId>().is_err());
    }

    #[test]
    fn accepts_plain_labels() {
        assert!("my-cluster-01".parse::<ResourceId>().is_ok());
    }
}
