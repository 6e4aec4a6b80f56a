// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hash map keyed directly by the coordinate pair.

use core::fmt::Debug;

use rustc_hash::FxHashMap;

use crate::backend::Backend;
use crate::cell::Cell;
use crate::types::{GridSize, Pos};

/// Hash map backend keyed by [`Pos`].
///
/// Skips the flattening multiply at the cost of hashing a two-word key.
pub struct HashPair<O> {
    size: GridSize,
    cells: FxHashMap<Pos, Cell<O>>,
}

impl<O> Backend<O> for HashPair<O> {
    fn new(size: GridSize) -> Self {
        Self {
            size,
            cells: FxHashMap::default(),
        }
    }

    #[inline]
    fn cell(&self, pos: Pos) -> Option<&Cell<O>> {
        self.cells.get(&pos)
    }

    #[inline]
    fn cell_mut(&mut self, pos: Pos) -> Option<&mut Cell<O>> {
        self.cells.get_mut(&pos)
    }

    #[inline]
    fn cell_entry(&mut self, pos: Pos) -> &mut Cell<O> {
        self.cells.entry(pos).or_default()
    }

    fn cells<'a>(&'a self) -> Box<dyn Iterator<Item = (Pos, &'a Cell<O>)> + 'a> {
        Box::new(
            self.cells
                .iter()
                .filter(|(_, c)| c.slot_count() > 0)
                .map(|(&p, c)| (p, c)),
        )
    }

    fn clear(&mut self) {
        self.cells.clear();
    }
}

impl<O> Debug for HashPair<O> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("HashPair")
            .field("size", &self.size)
            .field("cells", &self.cells.len())
            .finish_non_exhaustive()
    }
}
