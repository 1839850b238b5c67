//! Move fingerprints.

use std::hash::{DefaultHasher, Hash, Hasher};

use smallvec::SmallVec;

/// What a move changes, reduced to hashes of its before and after states.
///
/// Two signatures with the same entities where one's `from` is the other's
/// `to` (and vice versa) describe a move and the move that undoes it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MoveSignature {
    pub descriptor_index: usize,
    /// Touched entities, sorted.
    pub entities: SmallVec<[usize; 2]>,
    pub from: u64,
    pub to: u64,
}

impl MoveSignature {
    pub fn new(
        descriptor_index: usize,
        entities: impl IntoIterator<Item = usize>,
        from: u64,
        to: u64,
    ) -> Self {
        let mut entities: SmallVec<[usize; 2]> = entities.into_iter().collect();
        entities.sort_unstable();
        entities.dedup();
        Self {
            descriptor_index,
            entities,
            from,
            to,
        }
    }

    /// True if applying `other` would undo this change.
    pub fn reverses(&self, other: &MoveSignature) -> bool {
        self.descriptor_index == other.descriptor_index
            && self.entities == other.entities
            && self.from == other.to
            && self.to == other.from
    }

    /// True if both signatures share an entity of the same descriptor.
    pub fn touches(&self, other: &MoveSignature) -> bool {
        self.descriptor_index == other.descriptor_index
            && self.entities.iter().any(|e| other.entities.contains(e))
    }
}

// Hashes `value` under a move-kind tag so different move kinds never collide
// on equal payloads.
pub(crate) fn state_hash<T: Hash + ?Sized>(tag: &str, value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    tag.hash(&mut hasher);
    value.hash(&mut hasher);
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entities_are_sorted() {
        let sig = MoveSignature::new(0, [3, 1], 7, 9);
        assert_eq!(sig.entities.as_slice(), &[1, 3]);
    }

    #[test]
    fn test_reverses() {
        let a = MoveSignature::new(0, [2], 10, 20);
        let b = MoveSignature::new(0, [2], 20, 10);
        let c = MoveSignature::new(1, [2], 20, 10);
        assert!(a.reverses(&b));
        assert!(!a.reverses(&c));
        assert!(!a.reverses(&a));
    }

    #[test]
    fn test_touches() {
        let a = MoveSignature::new(0, [1, 2], 0, 1);
        assert!(a.touches(&MoveSignature::new(0, [2, 5], 4, 4)));
        assert!(!a.touches(&MoveSignature::new(0, [3], 4, 4)));
        assert!(!a.touches(&MoveSignature::new(1, [1], 4, 4)));
    }

    #[test]
    fn test_state_hash_is_tagged() {
        assert_ne!(state_hash("change", &1u32), state_hash("swap", &1u32));
        assert_eq!(state_hash("change", &1u32), state_hash("change", &1u32));
    }
}
