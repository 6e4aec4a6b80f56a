// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hash map keyed by the flattened coordinate `width * y + x`.

use core::fmt::Debug;

use rustc_hash::FxHashMap;

use crate::backend::Backend;
use crate::cell::Cell;
use crate::types::{GridSize, Pos};

/// Hash map backend keyed by flattened coordinate.
///
/// Cells are created lazily on first insertion, so memory follows the set of
/// cells ever occupied rather than the grid extent.
pub struct HashFlat<O> {
    size: GridSize,
    cells: FxHashMap<usize, Cell<O>>,
}

impl<O> Backend<O> for HashFlat<O> {
    fn new(size: GridSize) -> Self {
        Self {
            size,
            cells: FxHashMap::default(),
        }
    }

    #[inline]
    fn cell(&self, pos: Pos) -> Option<&Cell<O>> {
        self.cells.get(&self.size.flatten(pos))
    }

    #[inline]
    fn cell_mut(&mut self, pos: Pos) -> Option<&mut Cell<O>> {
        self.cells.get_mut(&self.size.flatten(pos))
    }

    #[inline]
    fn cell_entry(&mut self, pos: Pos) -> &mut Cell<O> {
        self.cells.entry(self.size.flatten(pos)).or_default()
    }

    fn cells<'a>(&'a self) -> Box<dyn Iterator<Item = (Pos, &'a Cell<O>)> + 'a> {
        let size = self.size;
        Box::new(
            self.cells
                .iter()
                .filter(|(_, c)| c.slot_count() > 0)
                .map(move |(&k, c)| (size.unflatten(k), c)),
        )
    }

    fn clear(&mut self) {
        self.cells.clear();
    }
}

impl<O> Debug for HashFlat<O> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("HashFlat")
            .field("size", &self.size)
            .field("cells", &self.cells.len())
            .finish_non_exhaustive()
    }
}
