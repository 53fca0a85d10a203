use alloc::boxed::Box;
use core::fmt;
use core::fmt::Debug;
use core::hash::BuildHasher;
use core::hash::Hash;
use core::iter;
use core::mem;

use crate::DefaultHashBuilder;
use crate::probe::LinearProbe;
use crate::probe::ProbeSequence;
use crate::slot::Slot;

/// Number of slots a fresh table allocates.
const INITIAL_CAPACITY: usize = 64;

#[inline(always)]
fn max_load(capacity: usize) -> usize {
    capacity / 2
}

fn empty_slots<K, V>(capacity: usize) -> Box<[Slot<K, V>]> {
    iter::repeat_with(|| Slot::Empty).take(capacity).collect()
}

/// A value returned by a table operation, together with the length of the
/// probe walk that resolved it.
///
/// `probes` counts every slot the walk inspected, including the one the
/// operation resolved at, so a key found in its origin slot reports 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Probed<T> {
    /// The value the operation resolved to.
    pub value: T,
    /// Number of slots inspected, counting the terminal one.
    pub probes: usize,
}

/// Error returned by [`HashTable::try_insert`] when the key is already
/// present.
///
/// Carries the rejected pair, so the caller keeps ownership of both halves.
///
/// # Examples
///
/// ```rust
/// use probe_hash::HashTable;
///
/// let mut table = HashTable::new();
/// table.try_insert("a", 1).unwrap();
///
/// let rejected = table.try_insert("a", 2).unwrap_err();
/// assert_eq!(rejected.key(), &"a");
/// assert_eq!(rejected.value(), &2);
/// assert_eq!(rejected.into_parts(), ("a", 2));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DuplicateKey<K, V> {
    key: K,
    value: V,
}

impl<K, V> DuplicateKey<K, V> {
    /// The key that was already present.
    pub fn key(&self) -> &K {
        &self.key
    }

    /// The value that was not inserted.
    pub fn value(&self) -> &V {
        &self.value
    }

    /// Consumes the error, returning the rejected pair.
    pub fn into_parts(self) -> (K, V) {
        (self.key, self.value)
    }
}

impl<K, V> fmt::Display for DuplicateKey<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("key is already present in the table")
    }
}

impl<K, V> core::error::Error for DuplicateKey<K, V>
where
    K: Debug,
    V: Debug,
{
}

/// A point-in-time census of the slot array.
///
/// Available in tests and behind the `stats` feature.
#[cfg(any(test, feature = "stats"))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableStats {
    /// Number of live entries.
    pub len: usize,
    /// Slots holding a removal marker.
    pub tombstones: usize,
    /// Never-used slots.
    pub vacant: usize,
    /// Total slots allocated.
    pub capacity: usize,
    /// `len / capacity`.
    pub load_factor: f64,
}

#[cfg(any(test, feature = "stats"))]
impl TableStats {
    /// Pretty-prints the census to stdout.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        println!("=== Probe Table Statistics ===");
        println!(
            "Entries:    {}/{} ({:.2}% load factor)",
            self.len,
            self.capacity,
            self.load_factor * 100.0
        );
        println!("Tombstones: {}", self.tombstones);
        println!("Vacant:     {}", self.vacant);
    }
}

/// An open-addressing hash table with pluggable probing.
///
/// `HashTable<K, V, P, S>` stores entries directly in a flat slot array.
/// Collisions are resolved by walking the probe sequence the strategy `P`
/// produces for the key's hash; the array starts at 64 slots and doubles
/// whenever an insert pushes the load factor above one half, so walks stay
/// short. Inserting a key that is already present is rejected rather than
/// overwritten; values are updated in place through
/// [`get_mut`](HashTable::get_mut).
///
/// Every operation reports how many slots it inspected (see [`Probed`] and
/// the `Ok` value of [`try_insert`](HashTable::try_insert)), which makes the
/// table double as an instrument for comparing probing strategies.
///
/// ## Tombstones
///
/// Removal marks the slot with a tombstone instead of emptying it, keeping
/// probe walks that pass through the slot alive. Tombstoned slots are reused
/// by later inserts and reclaimed wholesale when growth rebuilds the array.
/// A lookup walk ends only at a never-used slot or a match, so on a table
/// churned until every slot has held an entry at some point, a lookup for an
/// absent key will not return. The growth rebuild is what keeps never-used
/// slots in every walk in practice.
///
/// ## Example
///
/// ```rust
/// use probe_hash::HashTable;
/// use probe_hash::QuadraticProbe;
///
/// let mut table = HashTable::with_probe(QuadraticProbe);
///
/// table.try_insert("a", 1).unwrap();
/// table.try_insert("b", 2).unwrap();
///
/// let found = table.get(&"a").unwrap();
/// assert_eq!(*found.value, 1);
/// assert!(found.probes >= 1);
///
/// let removed = table.remove(&"b").unwrap();
/// assert_eq!(removed.value, 2);
/// assert!(!table.contains_key(&"b"));
/// ```
#[derive(Clone)]
pub struct HashTable<K, V, P = LinearProbe, S = DefaultHashBuilder> {
    slots: Box<[Slot<K, V>]>,
    occupied: usize,
    probe: P,
    hash_builder: S,
}

impl<K, V, P, S> Debug for HashTable<K, V, P, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashTable")
            .field("len", &self.occupied)
            .field("capacity", &self.capacity())
            .field("load_factor", &self.load_factor())
            .finish_non_exhaustive()
    }
}

#[cfg(feature = "foldhash")]
impl<K, V> HashTable<K, V> {
    /// Creates an empty table with linear probing and the default hasher.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probe_hash::HashTable;
    ///
    /// let table: HashTable<i32, &str> = HashTable::new();
    /// assert!(table.is_empty());
    /// assert_eq!(table.capacity(), 64);
    /// ```
    pub fn new() -> Self {
        Self::with_probe_and_hasher(LinearProbe, DefaultHashBuilder::default())
    }
}

#[cfg(feature = "foldhash")]
impl<K, V, P> HashTable<K, V, P, DefaultHashBuilder> {
    /// Creates an empty table using `probe` and the default hasher.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probe_hash::HashTable;
    /// use probe_hash::QuadraticProbe;
    ///
    /// let mut table = HashTable::with_probe(QuadraticProbe);
    /// for key in 0..100 {
    ///     table.try_insert(key, key * 2).unwrap();
    /// }
    /// assert_eq!(table.len(), 100);
    /// assert_eq!(table.capacity(), 256);
    /// ```
    pub fn with_probe(probe: P) -> Self {
        Self::with_probe_and_hasher(probe, DefaultHashBuilder::default())
    }
}

impl<K, V, S> HashTable<K, V, LinearProbe, S> {
    /// Creates an empty table with linear probing and the given hasher.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::BuildHasher;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # use probe_hash::HashTable;
    /// #
    /// # struct SimpleHasher;
    /// # impl BuildHasher for SimpleHasher {
    /// #     type Hasher = SipHasher;
    /// #
    /// #     fn build_hasher(&self) -> Self::Hasher {
    /// #         SipHasher::new()
    /// #     }
    /// # }
    /// #
    /// let mut table = HashTable::with_hasher(SimpleHasher);
    /// table.try_insert(1, "one").unwrap();
    /// assert!(table.contains_key(&1));
    /// ```
    pub fn with_hasher(hash_builder: S) -> Self {
        Self::with_probe_and_hasher(LinearProbe, hash_builder)
    }
}

impl<K, V, P, S> HashTable<K, V, P, S> {
    /// Creates an empty table using `probe` and the given hasher.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::BuildHasher;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # use probe_hash::HashTable;
    /// # use probe_hash::QuadraticProbe;
    /// #
    /// # struct SimpleHasher;
    /// # impl BuildHasher for SimpleHasher {
    /// #     type Hasher = SipHasher;
    /// #
    /// #     fn build_hasher(&self) -> Self::Hasher {
    /// #         SipHasher::new()
    /// #     }
    /// # }
    /// #
    /// let mut table = HashTable::with_probe_and_hasher(QuadraticProbe, SimpleHasher);
    /// table.try_insert("a", 1).unwrap();
    /// assert_eq!(table.len(), 1);
    /// ```
    pub fn with_probe_and_hasher(probe: P, hash_builder: S) -> Self {
        Self {
            slots: empty_slots(INITIAL_CAPACITY),
            occupied: 0,
            probe,
            hash_builder,
        }
    }

    /// Returns the number of slots in the table.
    ///
    /// Starts at 64 and doubles on growth; it never shrinks.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the number of live entries in the table.
    #[inline]
    pub fn len(&self) -> usize {
        self.occupied
    }

    /// Returns `true` if the table contains no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.occupied == 0
    }

    /// Returns the fraction of slots holding a live entry.
    ///
    /// At most one half after every insert; removals lower it further.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probe_hash::HashTable;
    ///
    /// let mut table = HashTable::new();
    /// assert_eq!(table.load_factor(), 0.0);
    /// table.try_insert(1, 1).unwrap();
    /// assert_eq!(table.load_factor(), 1.0 / 64.0);
    /// ```
    #[inline]
    pub fn load_factor(&self) -> f64 {
        self.occupied as f64 / self.capacity() as f64
    }

    /// Returns a reference to the table's hasher.
    #[inline]
    pub fn hasher(&self) -> &S {
        &self.hash_builder
    }

    /// Returns a reference to the table's probing strategy.
    #[inline]
    pub fn probe(&self) -> &P {
        &self.probe
    }

    /// Drops every entry, resetting all slots to never-used.
    ///
    /// Capacity is retained.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probe_hash::HashTable;
    ///
    /// let mut table = HashTable::new();
    /// table.try_insert(1, "a").unwrap();
    ///
    /// table.clear();
    /// assert!(table.is_empty());
    /// assert_eq!(table.capacity(), 64);
    /// ```
    pub fn clear(&mut self) {
        for slot in self.slots.iter_mut() {
            *slot = Slot::Empty;
        }
        self.occupied = 0;
    }

    /// Takes a census of the slot array.
    ///
    /// This walks every slot, so it costs `O(capacity)`. Available in tests
    /// and behind the `stats` feature.
    #[cfg(any(test, feature = "stats"))]
    pub fn stats(&self) -> TableStats {
        let mut tombstones = 0;
        let mut vacant = 0;
        for slot in self.slots.iter() {
            match slot {
                Slot::Tombstone => tombstones += 1,
                Slot::Empty => vacant += 1,
                Slot::Occupied { .. } => {}
            }
        }

        TableStats {
            len: self.occupied,
            tombstones,
            vacant,
            capacity: self.capacity(),
            load_factor: self.load_factor(),
        }
    }
}

impl<K, V, P, S> HashTable<K, V, P, S>
where
    K: Hash + Eq,
    P: ProbeSequence,
    S: BuildHasher,
{
    /// Returns the value stored for `key`, along with the walk length that
    /// reached it.
    ///
    /// Tombstoned slots keep the walk going and count toward `probes`; the
    /// walk ends at a never-used slot (`None`) or the first match.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probe_hash::HashTable;
    ///
    /// let mut table = HashTable::new();
    /// table.try_insert(1, "a").unwrap();
    ///
    /// let found = table.get(&1).unwrap();
    /// assert_eq!(*found.value, "a");
    /// assert_eq!(found.probes, 1);
    ///
    /// assert!(table.get(&2).is_none());
    /// ```
    pub fn get(&self, key: &K) -> Option<Probed<&V>> {
        let capacity = self.capacity();
        let origin = self.origin(key);
        let mut step = 0;
        loop {
            let index = self.probe.position(origin, step, capacity);
            match &self.slots[index] {
                Slot::Empty => return None,
                Slot::Occupied { key: stored, value } if stored == key => {
                    return Some(Probed {
                        value,
                        probes: step + 1,
                    });
                }
                _ => {}
            }
            step += 1;
        }
    }

    /// Returns the value stored for `key` mutably.
    ///
    /// This is the update path: [`try_insert`](HashTable::try_insert)
    /// rejects keys that are already present instead of overwriting them.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probe_hash::HashTable;
    ///
    /// let mut table = HashTable::new();
    /// table.try_insert(1, "a").unwrap();
    ///
    /// if let Some(found) = table.get_mut(&1) {
    ///     *found.value = "b";
    /// }
    /// assert_eq!(table.get(&1).map(|found| *found.value), Some("b"));
    /// ```
    pub fn get_mut(&mut self, key: &K) -> Option<Probed<&mut V>> {
        let (index, probes) = self.find_index(key)?;
        let value = self.slots[index].value_mut()?;
        Some(Probed { value, probes })
    }

    /// Returns `true` if the table holds an entry for `key`.
    pub fn contains_key(&self, key: &K) -> bool {
        self.find_index(key).is_some()
    }

    /// Inserts a key-value pair, rejecting duplicates.
    ///
    /// The walk claims the first empty or tombstoned slot it reaches and
    /// returns the number of slots it inspected. If it reaches a live entry
    /// with an equal key first, the pair is handed back in [`DuplicateKey`]
    /// and the table is unchanged.
    ///
    /// A claimed tombstone ends the walk early: the table does not look
    /// past it for an equal key deeper in the sequence, so a key whose
    /// entry sits beyond a tombstoned slot can be admitted a second time.
    /// Lookups then see the nearer, newer copy, and the next growth rebuild
    /// keeps whichever copy lies first in storage order and drops the
    /// other.
    ///
    /// After a successful insert that pushes the load factor above one
    /// half, the table doubles its capacity and rebuilds; the returned
    /// count still reflects the insert walk.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probe_hash::HashTable;
    ///
    /// let mut table = HashTable::new();
    /// assert_eq!(table.try_insert("a", 1), Ok(1));
    ///
    /// let rejected = table.try_insert("a", 2).unwrap_err();
    /// assert_eq!(rejected.into_parts(), ("a", 2));
    /// assert_eq!(table.get(&"a").map(|found| *found.value), Some(1));
    /// ```
    pub fn try_insert(&mut self, key: K, value: V) -> Result<usize, DuplicateKey<K, V>> {
        let capacity = self.capacity();
        let origin = self.origin(&key);
        let mut step = 0;
        let index = loop {
            let index = self.probe.position(origin, step, capacity);
            match &self.slots[index] {
                Slot::Occupied { key: stored, .. } if *stored == key => {
                    return Err(DuplicateKey { key, value });
                }
                Slot::Occupied { .. } => {}
                _ => break index,
            }
            step += 1;
        };

        self.slots[index].fill(key, value);
        self.occupied += 1;
        let probes = step + 1;

        if self.occupied > max_load(capacity) {
            self.grow();
        }

        Ok(probes)
    }

    /// Removes the entry for `key`, returning its value and the walk length
    /// that found it.
    ///
    /// The slot is tombstoned, not emptied, so walks that pass through it
    /// still reach entries further along.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probe_hash::HashTable;
    ///
    /// let mut table = HashTable::new();
    /// table.try_insert("a", 1).unwrap();
    ///
    /// let removed = table.remove(&"a").unwrap();
    /// assert_eq!(removed.value, 1);
    /// assert!(table.get(&"a").is_none());
    /// assert!(table.remove(&"a").is_none());
    /// ```
    pub fn remove(&mut self, key: &K) -> Option<Probed<V>> {
        let (index, probes) = self.find_index(key)?;
        let (_, value) = self.slots[index].retire()?;
        self.occupied -= 1;
        Some(Probed { value, probes })
    }

    #[inline]
    fn origin(&self, key: &K) -> usize {
        (self.hash_builder.hash_one(key) as usize) % self.capacity()
    }

    /// Walks `key`'s probe sequence, returning the matching slot's index
    /// and the number of slots inspected.
    fn find_index(&self, key: &K) -> Option<(usize, usize)> {
        let capacity = self.capacity();
        let origin = self.origin(key);
        let mut step = 0;
        loop {
            let index = self.probe.position(origin, step, capacity);
            match &self.slots[index] {
                Slot::Empty => return None,
                Slot::Occupied { key: stored, .. } if stored == key => {
                    return Some((index, step + 1));
                }
                _ => {}
            }
            step += 1;
        }
    }

    fn grow(&mut self) {
        let capacity = self
            .capacity()
            .checked_mul(2)
            .expect("allocation size overflow");
        let old = mem::replace(&mut self.slots, empty_slots(capacity));
        self.occupied = 0;
        for slot in old {
            if let Slot::Occupied { key, value } = slot {
                self.place(key, value);
            }
        }
    }

    /// Insert during a rebuild. The fresh array holds no tombstones, and a
    /// key already placed wins over a second copy carried across the
    /// rebuild, which is dropped.
    fn place(&mut self, key: K, value: V) {
        let capacity = self.capacity();
        let origin = self.origin(&key);
        let mut step = 0;
        loop {
            let index = self.probe.position(origin, step, capacity);
            match &self.slots[index] {
                Slot::Empty => {
                    self.slots[index].fill(key, value);
                    self.occupied += 1;
                    return;
                }
                Slot::Occupied { key: stored, .. } if *stored == key => return,
                _ => {}
            }
            step += 1;
        }
    }
}

impl<K, V, P, S> Default for HashTable<K, V, P, S>
where
    P: Default,
    S: Default,
{
    fn default() -> Self {
        Self::with_probe_and_hasher(P::default(), S::default())
    }
}
