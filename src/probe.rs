/// A strategy producing the sequence of slot indices visited during a probe
/// walk.
///
/// The engine anchors each walk at an origin derived from the key's hash and
/// asks the strategy for a candidate index at step `0, 1, 2, ...` until the
/// operation resolves. Implementations must be pure: the same
/// `(origin, step, capacity)` inputs always yield the same index.
///
/// Walks are bounded by the slots they encounter rather than by a step
/// limit, so a strategy used with [`HashTable`](crate::HashTable) should
/// visit every index of a power-of-two capacity table. Both built-in
/// strategies visit all `capacity` indices within the first `capacity`
/// steps.
///
/// # Examples
///
/// ```
/// use probe_hash::probe::ProbeSequence;
///
/// /// Probes every third slot. The stride is odd, so the walk still
/// /// covers a power-of-two table.
/// struct StrideProbe;
///
/// impl ProbeSequence for StrideProbe {
///     fn position(&self, origin: usize, step: usize, capacity: usize) -> usize {
///         (origin + 3 * step) % capacity
///     }
/// }
///
/// assert_eq!(StrideProbe.position(5, 2, 64), 11);
/// ```
pub trait ProbeSequence {
    /// Returns the slot index to inspect at `step` for a walk anchored at
    /// `origin`.
    ///
    /// `origin` is already reduced modulo `capacity` by the engine, and
    /// `capacity` is always a power of two. The returned index must be less
    /// than `capacity`.
    fn position(&self, origin: usize, step: usize, capacity: usize) -> usize;
}

/// Linear probing: step `s` lands on `(origin + s) % capacity`.
///
/// The walk scans adjacent slots, which is friendly to the cache but clumps
/// colliding keys into contiguous runs that lengthen neighboring walks as
/// the table fills.
///
/// # Examples
///
/// ```
/// use probe_hash::probe::LinearProbe;
/// use probe_hash::probe::ProbeSequence;
///
/// let walk: Vec<usize> = (0..4).map(|step| LinearProbe.position(62, step, 64)).collect();
/// assert_eq!(walk, [62, 63, 0, 1]);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LinearProbe;

impl ProbeSequence for LinearProbe {
    #[inline]
    fn position(&self, origin: usize, step: usize, capacity: usize) -> usize {
        debug_assert!(capacity.is_power_of_two());
        origin.wrapping_add(step) % capacity
    }
}

/// Quadratic probing: the offset from the origin grows by the triangular
/// numbers `0, 1, 3, 6, 10, ...`, spreading colliding keys apart instead of
/// piling them into runs.
///
/// On power-of-two capacities the triangular offsets are a full permutation,
/// so the walk reaches every slot.
///
/// # Examples
///
/// ```
/// use probe_hash::probe::ProbeSequence;
/// use probe_hash::probe::QuadraticProbe;
///
/// let walk: Vec<usize> = (0..4).map(|step| QuadraticProbe.position(5, step, 64)).collect();
/// assert_eq!(walk, [5, 6, 8, 11]);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct QuadraticProbe;

impl ProbeSequence for QuadraticProbe {
    #[inline]
    fn position(&self, origin: usize, step: usize, capacity: usize) -> usize {
        debug_assert!(capacity.is_power_of_two());
        // The half-step terms are summed in floating point and truncated as a
        // whole. Folding them into integer math term by term would round odd
        // steps differently and change the walk.
        let step = step as f64;
        (origin as f64 + 0.5 * step + 0.5 * step * step) as usize % capacity
    }
}
