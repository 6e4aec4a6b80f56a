// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dense array of cells addressed by the flattened coordinate.

use core::fmt::Debug;

use crate::backend::Backend;
use crate::cell::Cell;
use crate::types::{GridSize, Pos};

/// Dense backend with one pre-allocated cell per grid position.
///
/// Storage for `width * height` cells is reserved up front; lookups are a
/// multiply and an array index with no hashing.
pub struct DenseFlat<O> {
    size: GridSize,
    cells: Vec<Cell<O>>,
}

impl<O> Backend<O> for DenseFlat<O> {
    fn new(size: GridSize) -> Self {
        let mut cells = Vec::new();
        cells.resize_with(size.cell_count(), Cell::default);
        Self { size, cells }
    }

    #[inline]
    fn cell(&self, pos: Pos) -> Option<&Cell<O>> {
        self.cells.get(self.size.flatten(pos))
    }

    #[inline]
    fn cell_mut(&mut self, pos: Pos) -> Option<&mut Cell<O>> {
        self.cells.get_mut(self.size.flatten(pos))
    }

    #[inline]
    fn cell_entry(&mut self, pos: Pos) -> &mut Cell<O> {
        debug_assert!(self.size.contains(pos), "{pos} outside {}", self.size);
        let key = self.size.flatten(pos);
        &mut self.cells[key]
    }

    fn cells<'a>(&'a self) -> Box<dyn Iterator<Item = (Pos, &'a Cell<O>)> + 'a> {
        let size = self.size;
        Box::new(
            self.cells
                .iter()
                .enumerate()
                .filter(|(_, c)| c.slot_count() > 0)
                .map(move |(k, c)| (size.unflatten(k), c)),
        )
    }

    fn clear(&mut self) {
        for cell in &mut self.cells {
            cell.clear();
        }
    }
}

impl<O> Debug for DenseFlat<O> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let touched = self.cells.iter().filter(|c| c.slot_count() > 0).count();
        f.debug_struct("DenseFlat")
            .field("size", &self.size)
            .field("touched_cells", &touched)
            .finish_non_exhaustive()
    }
}
