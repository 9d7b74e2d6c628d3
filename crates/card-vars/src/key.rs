//! Render key computation.
//!
//! Provides [`RenderKey`], the identity token that forces the rendered preview
//! to remount whenever the variable bindings are replaced.

use std::fmt;

use sha2::{Digest, Sha256};

use crate::set::VariableSet;

/// Remount-forcing identity of a variable binding generation.
///
/// Combines a generation counter, advanced on every replacement, with a
/// content digest of the bindings. Two keys are equal only when both match,
/// so a replacement always yields a new key, including one that restores
/// earlier content.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RenderKey {
    generation: u64,
    digest: String,
}

impl RenderKey {
    /// Compute the key for a generation of bindings.
    ///
    /// # Digest Format
    ///
    /// Hex SHA-256 over `"{len(name)}:{name}={len(value)}:{value};"` for each
    /// binding in name order. Length prefixes keep `a=b;c` and `a=b;` + `c`
    /// style collisions apart.
    #[must_use]
    pub fn compute(generation: u64, vars: &VariableSet) -> Self {
        let mut hasher = Sha256::new();
        for (name, value) in vars.iter() {
            hasher.update(format!("{}:{name}={}:{value};", name.len(), value.len()).as_bytes());
        }
        Self {
            generation,
            digest: hex::encode(hasher.finalize()),
        }
    }

    /// Generation counter (0 for the initial empty set).
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Content digest of the bindings.
    #[must_use]
    pub fn digest(&self) -> &str {
        &self.digest
    }
}

impl fmt::Display for RenderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.generation, &self.digest[..12])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_content_same_generation_equal() {
        let vars = VariableSet::from_pairs([("title", "Hello")]);
        assert_eq!(RenderKey::compute(1, &vars), RenderKey::compute(1, &vars));
    }

    #[test]
    fn test_content_changes_digest() {
        let a = RenderKey::compute(1, &VariableSet::from_pairs([("title", "")]));
        let b = RenderKey::compute(1, &VariableSet::from_pairs([("title", "Example")]));
        assert_ne!(a.digest(), b.digest());
    }

    #[test]
    fn test_generation_changes_key() {
        let vars = VariableSet::from_pairs([("title", "Hello")]);
        let a = RenderKey::compute(1, &vars);
        let b = RenderKey::compute(2, &vars);
        assert_eq!(a.digest(), b.digest());
        assert_ne!(a, b);
    }

    #[test]
    fn test_length_prefix_prevents_ambiguity() {
        let a = VariableSet::from_pairs([("a", "b;1:c=0:")]);
        let b = VariableSet::from_pairs([("a", "b"), ("c", "")]);
        assert_ne!(
            RenderKey::compute(0, &a).digest(),
            RenderKey::compute(0, &b).digest()
        );
    }

    #[test]
    fn test_digest_format() {
        let key = RenderKey::compute(0, &VariableSet::new());
        assert_eq!(key.digest().len(), 64);
        assert!(key.digest().chars().all(|c| c.is_ascii_hexdigit()));
        assert!(key.to_string().starts_with("0-"));
    }
}
