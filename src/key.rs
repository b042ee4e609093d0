//! Entity keys: the normalized identity of one tracked item
//!
//! Every free-text query collapses to an `EntityKey` before it touches the
//! ledger layer, so "Dracula", "  dracula " and "DRACULA" all address the
//! same history.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The input query was empty (or whitespace-only) after trimming.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("query must not be empty")]
pub struct InvalidQuery;

/// Normalized identity string for one tracked item.
///
/// Constructed only through [`EntityKey::normalize`]; the inner string is
/// always trimmed and lower-cased.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityKey(String);

impl EntityKey {
    /// Normalize a raw query into a key: trim, reject empty, lower-case.
    ///
    /// Pure. Queries differing only by case or surrounding whitespace
    /// normalize to the same key.
    pub fn normalize(raw: &str) -> Result<Self, InvalidQuery> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(InvalidQuery);
        }
        Ok(Self(trimmed.to_lowercase()))
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Filesystem-safe stem for this key's database file.
    ///
    /// Bytes outside `[a-z0-9.-]` are written as `%xx`, so the encoding is
    /// reversible and two distinct keys can never collide on disk.
    pub fn file_stem(&self) -> String {
        let mut stem = String::with_capacity(self.0.len());
        for byte in self.0.bytes() {
            match byte {
                b'a'..=b'z' | b'0'..=b'9' | b'.' | b'-' => stem.push(byte as char),
                _ => {
                    stem.push('%');
                    stem.push_str(&format!("{:02x}", byte));
                }
            }
        }
        stem
    }
}

impl std::fmt::Display for EntityKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn case_and_whitespace_variants_normalize_identically() {
        let a = EntityKey::normalize("A Light in the Attic").unwrap();
        let b = EntityKey::normalize("  a light in the attic  ").unwrap();
        let c = EntityKey::normalize("A LIGHT IN THE ATTIC").unwrap();

        assert_eq!(a, b);
        assert_eq!(b, c);
        assert_eq!(a.as_str(), "a light in the attic");
    }

    #[test]
    fn normalize_is_idempotent() {
        let once = EntityKey::normalize("Dracula").unwrap();
        let twice = EntityKey::normalize(once.as_str()).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn empty_and_whitespace_queries_are_rejected() {
        assert_eq!(EntityKey::normalize(""), Err(InvalidQuery));
        assert_eq!(EntityKey::normalize("   "), Err(InvalidQuery));
        assert_eq!(EntityKey::normalize("\t\n"), Err(InvalidQuery));
    }

    #[test]
    fn file_stem_escapes_unsafe_bytes() {
        let key = EntityKey::normalize("light in the attic").unwrap();
        assert_eq!(key.file_stem(), "light%20in%20the%20attic");

        let slashed = EntityKey::normalize("a/b").unwrap();
        assert_eq!(slashed.file_stem(), "a%2fb");
    }

    #[test]
    fn distinct_keys_get_distinct_stems() {
        let spaced = EntityKey::normalize("a b").unwrap();
        let underscored = EntityKey::normalize("a_b").unwrap();
        assert_ne!(spaced.file_stem(), underscored.file_stem());
    }
}
