use lasso::{Spur, ThreadedRodeo};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;
use std::sync::atomic::{AtomicU64, Ordering};

/// Global string interner for block IDs.
static INTERNER: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::default);

/// A lightweight, interned identifier for blocks, columns, and menu items.
/// Internally a 4-byte `Spur` index.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockId(Spur);

impl BlockId {
    /// Intern a string as a BlockId, or return the existing one.
    pub fn intern(s: &str) -> Self {
        BlockId(INTERNER.get_or_intern(s))
    }

    /// Resolve back to a string slice.
    pub fn as_str(&self) -> &str {
        INTERNER.resolve(&self.0)
    }

    /// Generate an ID with a kind prefix (e.g. `text_4`, `col_9`) that has
    /// never been interned in this process.
    ///
    /// IDs restored from saved templates are interned while deserializing,
    /// so a fresh ID never collides with one already present in a document.
    pub fn fresh(prefix: &str) -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        loop {
            let n = COUNTER.fetch_add(1, Ordering::Relaxed);
            let candidate = format!("{prefix}_{n}");
            if !INTERNER.contains(&candidate) {
                return Self::intern(&candidate);
            }
        }
    }
}

impl fmt::Debug for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.as_str())
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for BlockId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for BlockId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(BlockId::intern(&s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_roundtrip() {
        let a = BlockId::intern("hero_banner");
        let b = BlockId::intern("hero_banner");
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "hero_banner");
    }

    #[test]
    fn fresh_ids_are_unique() {
        let a = BlockId::fresh("text");
        let b = BlockId::fresh("text");
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("text_"));
    }

    #[test]
    fn fresh_skips_restored_ids() {
        // Simulate a saved document that already used the next candidates.
        let restored: Vec<BlockId> = (0..64)
            .map(|n| BlockId::intern(&format!("restored_{n}")))
            .collect();
        for _ in 0..64 {
            let id = BlockId::fresh("restored");
            assert!(!restored.contains(&id));
        }
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = BlockId::intern("cta");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"cta\"");
        let back: BlockId = serde_json::from_str("\"cta\"").unwrap();
        assert_eq!(back, id);
    }
}
