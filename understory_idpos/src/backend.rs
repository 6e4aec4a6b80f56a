// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Backend trait for cell storage strategies.

use core::fmt::Debug;

use crate::cell::Cell;
use crate::types::{GridSize, Pos};

/// Cell storage abstraction used by `IndexGeneric`.
///
/// A backend only maps positions to occupancy lists. The identity and position
/// tables, the lock, and all validation live in
/// [`IndexGeneric`](crate::IndexGeneric); positions handed to a backend are
/// always inside the grid it was created for.
pub trait Backend<O>: Debug {
    /// Create storage for a grid of the given extent.
    fn new(size: GridSize) -> Self
    where
        Self: Sized;

    /// The occupancy list at `pos`, if the backend has one.
    fn cell(&self, pos: Pos) -> Option<&Cell<O>>;

    /// Mutable access to an existing occupancy list at `pos`.
    fn cell_mut(&mut self, pos: Pos) -> Option<&mut Cell<O>>;

    /// The occupancy list at `pos`, created if missing.
    fn cell_entry(&mut self, pos: Pos) -> &mut Cell<O>;

    /// Every occupancy list that has at least one slot, with its position.
    fn cells<'a>(&'a self) -> Box<dyn Iterator<Item = (Pos, &'a Cell<O>)> + 'a>;

    /// Drop every slot of every cell.
    fn clear(&mut self);
}
