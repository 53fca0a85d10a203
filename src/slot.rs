use core::mem;

/// A single storage cell of the table.
///
/// Slots are tri-state: never used (`Empty`), holding a live entry
/// (`Occupied`), or holding the marker a removal leaves behind
/// (`Tombstone`). A tombstone keeps probe sequences that pass through it
/// alive; only an `Empty` slot proves a key is absent from the sequence.
///
/// Legal transitions: `Empty -> Occupied` and `Tombstone -> Occupied` via
/// [`Slot::fill`], `Occupied -> Tombstone` via [`Slot::retire`]. A slot
/// returns to `Empty` only by being absent from a rebuilt array.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Slot<K, V> {
    /// Never written since the containing array was built.
    Empty,
    /// Holds a live entry.
    Occupied {
        /// The entry's key.
        key: K,
        /// The entry's value.
        value: V,
    },
    /// Left behind by a removal; skipped by lookups, reusable by inserts.
    Tombstone,
}

impl<K, V> Slot<K, V> {
    /// Returns `true` if the slot holds a live entry.
    #[inline]
    pub(crate) fn is_occupied(&self) -> bool {
        matches!(self, Slot::Occupied { .. })
    }

    /// Returns the stored value, if the slot is occupied.
    #[inline]
    pub(crate) fn value(&self) -> Option<&V> {
        match self {
            Slot::Occupied { value, .. } => Some(value),
            _ => None,
        }
    }

    /// Returns the stored value mutably, if the slot is occupied.
    #[inline]
    pub(crate) fn value_mut(&mut self) -> Option<&mut V> {
        match self {
            Slot::Occupied { value, .. } => Some(value),
            _ => None,
        }
    }

    /// Stores an entry, transitioning the slot to `Occupied`.
    ///
    /// Only `Empty` and `Tombstone` slots may be filled; the engine checks
    /// for an occupant before claiming a slot.
    #[inline]
    pub(crate) fn fill(&mut self, key: K, value: V) {
        debug_assert!(!self.is_occupied());
        *self = Slot::Occupied { key, value };
    }

    /// Transitions an `Occupied` slot to `Tombstone`, yielding its entry.
    ///
    /// On a slot that holds no entry this is a no-op returning `None`.
    #[inline]
    pub(crate) fn retire(&mut self) -> Option<(K, V)> {
        match mem::replace(self, Slot::Tombstone) {
            Slot::Occupied { key, value } => Some((key, value)),
            other => {
                *self = other;
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_occupies_an_empty_slot() {
        let mut slot: Slot<u64, &str> = Slot::Empty;
        assert!(!slot.is_occupied());
        assert_eq!(slot.value(), None);

        slot.fill(7, "seven");
        assert!(slot.is_occupied());
        assert_eq!(slot.value(), Some(&"seven"));
    }

    #[test]
    fn value_mut_updates_in_place() {
        let mut slot: Slot<u64, i32> = Slot::Empty;
        slot.fill(1, 10);

        if let Some(value) = slot.value_mut() {
            *value += 5;
        }
        assert_eq!(slot.value(), Some(&15));
    }

    #[test]
    fn retire_yields_the_entry_and_leaves_a_tombstone() {
        let mut slot: Slot<u64, i32> = Slot::Empty;
        slot.fill(42, -1);

        assert_eq!(slot.retire(), Some((42, -1)));
        assert_eq!(slot, Slot::Tombstone);
        assert_eq!(slot.value(), None);
    }

    #[test]
    fn retire_is_a_noop_on_slots_without_an_entry() {
        let mut empty: Slot<u64, i32> = Slot::Empty;
        assert_eq!(empty.retire(), None);
        assert_eq!(empty, Slot::Empty);

        let mut tombstone: Slot<u64, i32> = Slot::Tombstone;
        assert_eq!(tombstone.retire(), None);
        assert_eq!(tombstone, Slot::Tombstone);
    }

    #[test]
    fn fill_reuses_a_tombstone() {
        let mut slot: Slot<u64, i32> = Slot::Empty;
        slot.fill(1, 10);
        slot.retire();

        slot.fill(2, 20);
        assert!(slot.is_occupied());
        assert_eq!(slot.value(), Some(&20));
    }
}
