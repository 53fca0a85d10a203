#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

/// Probe sequence strategies for the open-addressing engine.
///
/// This module provides the [`ProbeSequence`](probe::ProbeSequence) trait
/// along with the [`LinearProbe`](probe::LinearProbe) and
/// [`QuadraticProbe`](probe::QuadraticProbe) strategies selected at table
/// construction.
pub mod probe;

mod slot;

pub mod table;

pub use probe::LinearProbe;
pub use probe::ProbeSequence;
pub use probe::QuadraticProbe;
pub use table::DuplicateKey;
pub use table::HashTable;
pub use table::Probed;
#[cfg(feature = "stats")]
pub use table::TableStats;

/// Default hasher used by [`HashTable`] when none is specified.
#[cfg(feature = "foldhash")]
pub type DefaultHashBuilder = foldhash::fast::RandomState;

/// Dummy default hasher for [`HashTable`].
///
/// The `foldhash` feature is disabled, so this type is unusable; construct
/// tables through
/// [`HashTable::with_hasher`](table::HashTable::with_hasher) or
/// [`HashTable::with_probe_and_hasher`](table::HashTable::with_probe_and_hasher)
/// instead.
#[cfg(not(feature = "foldhash"))]
#[derive(Clone, Copy, Debug)]
pub enum DefaultHashBuilder {}
