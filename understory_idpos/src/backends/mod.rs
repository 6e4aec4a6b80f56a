// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Backend implementations for different cell storage strategies.
//!
//! - `hash_flat`: hash map keyed by `width * y + x`.
//! - `hash_pair`: hash map keyed by the `(x, y)` pair.
//! - `dense_flat`: one pre-allocated cell per position, addressed by `width * y + x`.
//! - `dense_grid`: one pre-allocated cell per position, addressed as `[x][y]`.
//!
//! All four share the tombstoning [`Cell`](crate::cell::Cell) list and the
//! tables in [`IndexGeneric`], so they differ only in how a position finds its
//! cell. Hash backends pay for hashing and allocate lazily; dense backends pay
//! `width * height` cells up front and index directly.

pub mod dense_flat;
pub mod dense_grid;
pub mod hash_flat;
pub mod hash_pair;

use crate::contract::SpatialIndex;
use crate::index::IndexGeneric;
use crate::types::{GridSize, Tracked};

pub use dense_flat::DenseFlat;
pub use dense_grid::DenseGrid;
pub use hash_flat::HashFlat;
pub use hash_pair::HashPair;

/// Runtime selector for a backend.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BackendKind {
    /// [`HashFlat`].
    HashFlat,
    /// [`HashPair`].
    HashPair,
    /// [`DenseFlat`].
    DenseFlat,
    /// [`DenseGrid`].
    DenseGrid,
}

impl BackendKind {
    /// Every backend, in declaration order.
    pub const ALL: [Self; 4] = [
        Self::HashFlat,
        Self::HashPair,
        Self::DenseFlat,
        Self::DenseGrid,
    ];

    /// Short stable name, suitable for benchmark labels.
    pub const fn name(self) -> &'static str {
        match self {
            Self::HashFlat => "hash_flat",
            Self::HashPair => "hash_pair",
            Self::DenseFlat => "dense_flat",
            Self::DenseGrid => "dense_grid",
        }
    }

    /// Build an empty index of this kind over a grid of the given extent.
    pub fn build<O>(self, size: GridSize) -> Box<dyn SpatialIndex<O> + Send + Sync>
    where
        O: Tracked + Send + Sync + 'static,
        O::Id: Send + Sync,
    {
        match self {
            Self::HashFlat => Box::new(IndexGeneric::<O, HashFlat<O>>::new(size)),
            Self::HashPair => Box::new(IndexGeneric::<O, HashPair<O>>::new(size)),
            Self::DenseFlat => Box::new(IndexGeneric::<O, DenseFlat<O>>::new(size)),
            Self::DenseGrid => Box::new(IndexGeneric::<O, DenseGrid<O>>::new(size)),
        }
    }
}

impl core::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

