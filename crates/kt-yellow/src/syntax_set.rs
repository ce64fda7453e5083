use crate::SyntaxKind;

const SLOT_BITS: u16 = u64::BITS as u16;
const SLOTS: usize = (SyntaxKind::LAST as usize) / (SLOT_BITS as usize) + 1;

/// A constant set of kinds, used for lookahead and error recovery.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SyntaxSet {
    bits: [u64; SLOTS],
}

impl SyntaxSet {
    pub const EMPTY: Self = Self { bits: [0; SLOTS] };

    const fn slot(kind: SyntaxKind) -> (usize, u64) {
        let raw = kind as u16;
        ((raw / SLOT_BITS) as usize, 1 << (raw % SLOT_BITS))
    }

    pub const fn new<const N: usize>(kinds: [SyntaxKind; N]) -> Self {
        let mut set = Self::EMPTY;

        let mut i = 0;
        while i < kinds.len() {
            let (slot, mask) = Self::slot(kinds[i]);
            set.bits[slot] |= mask;
            i += 1;
        }

        set
    }

    pub const fn union(mut self, other: &Self) -> Self {
        let mut i = 0;
        while i < SLOTS {
            self.bits[i] |= other.bits[i];
            i += 1;
        }

        self
    }

    pub const fn contains(&self, kind: SyntaxKind) -> bool {
        let (slot, mask) = Self::slot(kind);
        self.bits[slot] & mask != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SyntaxKind::*;

    #[test]
    fn last_kind_fits() {
        let set = SyntaxSet::new([TOMBSTONE]);
        assert!(set.contains(TOMBSTONE));
        assert!(!set.contains(ERROR));
    }

    #[test]
    fn union_keeps_both_sides() {
        let set = SyntaxSet::new([COMMA]).union(&SyntaxSet::new([BLOCK]));
        assert!(set.contains(COMMA));
        assert!(set.contains(BLOCK));
        assert!(!set.contains(SEMICOLON));
    }
}
