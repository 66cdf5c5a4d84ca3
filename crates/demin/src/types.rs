//! Shared type definitions for the demin crate

use std::hash::BuildHasherDefault;

use indexmap::{IndexMap, IndexSet};
use rustc_hash::FxHasher;

/// Insertion-ordered map with the Fx hasher
pub type FxIndexMap<K, V> = IndexMap<K, V, BuildHasherDefault<FxHasher>>;

/// Insertion-ordered set with the Fx hasher
pub type FxIndexSet<T> = IndexSet<T, BuildHasherDefault<FxHasher>>;
