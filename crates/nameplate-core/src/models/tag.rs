//! Tags — free-form key/value annotations, independent of name and id.

use serde::{Deserialize, Serialize};

/// A single key/value annotation. A resource owns a set of tags keyed
/// by `name`; no ordering is promised to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    pub value: String,
}

impl Tag {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Merge-by-key tag update for partial updates.
///
/// Entries whose `name` matches an incoming tag are replaced, entries
/// with new names are appended, and entries absent from the update are
/// left untouched. Duplicate names within one update resolve to the
/// last occurrence.
pub fn merge_tags(existing: &[Tag], update: &[Tag]) -> Vec<Tag> {
    let mut merged = existing.to_vec();
    for tag in update {
        match merged.iter_mut().find(|t| t.name == tag.name) {
            Some(slot) => slot.value = tag.value.clone(),
            None => merged.push(tag.clone()),
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_matching_keys_and_appends_new_ones() {
        let existing = vec![Tag::new("env", "dev"), Tag::new("team", "storage")];
        let update = vec![Tag::new("env", "prod"), Tag::new("tier", "gold")];

        let merged = merge_tags(&existing, &update);
        assert_eq!(merged.len(), 3);
        assert!(merged.contains(&Tag::new("env", "prod")));
        assert!(merged.contains(&Tag::new("team", "storage")));
        assert!(merged.contains(&Tag::new("tier", "gold")));
    }

    #[test]
    fn untouched_entries_survive_an_empty_update() {
        let existing = vec![Tag::new("env", "dev")];
        assert_eq!(merge_tags(&existing, &[]), existing);
    }

    #[test]
    fn last_write_wins_within_one_update() {
        let update = vec![Tag::new("env", "staging"), Tag::new("env", "prod")];
        let merged = merge_tags(&[], &update);
        assert_eq!(merged, vec![Tag::new("env", "prod")]);
    }
}
