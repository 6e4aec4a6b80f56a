// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Two-level dense array of cells indexed as `[x][y]`.

use core::fmt::Debug;

use crate::backend::Backend;
use crate::cell::Cell;
use crate::types::{GridSize, Pos};

/// Dense backend storing one column vector per `x`.
///
/// Addressing is two direct array indexes. Coordinates outside the grid have
/// no cell; the owning index rejects them before they reach this backend.
pub struct DenseGrid<O> {
    size: GridSize,
    columns: Vec<Vec<Cell<O>>>,
}

impl<O> Backend<O> for DenseGrid<O> {
    fn new(size: GridSize) -> Self {
        let columns = (0..size.width())
            .map(|_| {
                let mut column = Vec::new();
                column.resize_with(size.height(), Cell::default);
                column
            })
            .collect();
        Self { size, columns }
    }

    #[inline]
    fn cell(&self, pos: Pos) -> Option<&Cell<O>> {
        self.columns.get(pos.x)?.get(pos.y)
    }

    #[inline]
    fn cell_mut(&mut self, pos: Pos) -> Option<&mut Cell<O>> {
        self.columns.get_mut(pos.x)?.get_mut(pos.y)
    }

    #[inline]
    fn cell_entry(&mut self, pos: Pos) -> &mut Cell<O> {
        debug_assert!(self.size.contains(pos), "{pos} outside {}", self.size);
        &mut self.columns[pos.x][pos.y]
    }

    fn cells<'a>(&'a self) -> Box<dyn Iterator<Item = (Pos, &'a Cell<O>)> + 'a> {
        Box::new(self.columns.iter().enumerate().flat_map(|(x, column)| {
            column
                .iter()
                .enumerate()
                .filter(|(_, c)| c.slot_count() > 0)
                .map(move |(y, c)| (Pos::new(x, y), c))
        }))
    }

    fn clear(&mut self) {
        for cell in self.columns.iter_mut().flatten() {
            cell.clear();
        }
    }
}

impl<O> Debug for DenseGrid<O> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let touched = self
            .columns
            .iter()
            .flatten()
            .filter(|c| c.slot_count() > 0)
            .count();
        f.debug_struct("DenseGrid")
            .field("size", &self.size)
            .field("touched_cells", &touched)
            .finish_non_exhaustive()
    }
}
