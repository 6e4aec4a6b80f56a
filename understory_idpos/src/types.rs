// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Primitive grid types and the [`Tracked`] object trait.

use core::fmt::{self, Debug};
use core::hash::Hash;

/// A cell coordinate on the grid.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pos {
    /// Column, in `[0, width)`.
    pub x: usize,
    /// Row, in `[0, height)`.
    pub y: usize,
}

impl Pos {
    /// Create a position from its coordinates.
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// The position with its coordinates swapped.
    pub const fn transposed(self) -> Self {
        Self {
            x: self.y,
            y: self.x,
        }
    }
}

impl From<(usize, usize)> for Pos {
    fn from((x, y): (usize, usize)) -> Self {
        Self { x, y }
    }
}

impl From<[usize; 2]> for Pos {
    fn from([x, y]: [usize; 2]) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Extent of the grid an index is bound to.
///
/// Valid positions are `[0, width) × [0, height)`. The extent is fixed at
/// construction; indexes never grow or shrink it.
///
/// `width * height` always fits in a `usize`, so every in-bounds position has
/// a distinct flattened key.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct GridSize {
    width: usize,
    height: usize,
}

impl GridSize {
    /// Create a grid extent.
    ///
    /// # Panics
    ///
    /// Panics if `width * height` overflows `usize`. Use
    /// [`GridSize::try_new`] to handle that case.
    pub const fn new(width: usize, height: usize) -> Self {
        match Self::try_new(width, height) {
            Some(size) => size,
            None => panic!("grid extent overflows usize"),
        }
    }

    /// Create a grid extent, or `None` if `width * height` overflows `usize`.
    pub const fn try_new(width: usize, height: usize) -> Option<Self> {
        match width.checked_mul(height) {
            Some(_) => Some(Self { width, height }),
            None => None,
        }
    }

    /// Number of columns.
    #[inline]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    #[inline]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Whether `pos` lies inside the grid.
    #[inline]
    pub const fn contains(&self, pos: Pos) -> bool {
        pos.x < self.width && pos.y < self.height
    }

    /// Total number of cells.
    pub const fn cell_count(&self) -> usize {
        self.width * self.height
    }

    /// Row-major flattened key for `pos`: `width * y + x`.
    ///
    /// Only meaningful for positions inside the grid; outside it keys alias.
    #[inline]
    pub const fn flatten(&self, pos: Pos) -> usize {
        self.width * pos.y + pos.x
    }

    /// Inverse of [`GridSize::flatten`].
    #[inline]
    pub const fn unflatten(&self, key: usize) -> Pos {
        Pos {
            x: key % self.width,
            y: key / self.width,
        }
    }
}

impl fmt::Display for GridSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// An object that can be tracked by a [`SpatialIndex`](crate::SpatialIndex).
///
/// The identity must be unique among tracked objects and stable for as long as
/// the object is tracked. [`Tracked::pos`] is the object's own idea of where it
/// is; the index keeps its own record and only compares the two when auditing.
pub trait Tracked {
    /// Identity type.
    type Id: Copy + Eq + Hash + Debug;

    /// The object's identity.
    fn id(&self) -> Self::Id;

    /// The object's current position.
    fn pos(&self) -> Pos;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flatten_roundtrips_inside_grid() {
        let size = GridSize::new(7, 3);
        for y in 0..size.height() {
            for x in 0..size.width() {
                let p = Pos::new(x, y);
                assert_eq!(size.unflatten(size.flatten(p)), p);
            }
        }
        assert_eq!(size.flatten(Pos::new(6, 2)), size.cell_count() - 1);
    }

    #[test]
    fn contains_is_half_open() {
        let size = GridSize::new(4, 2);
        assert!(size.contains(Pos::new(3, 1)));
        assert!(!size.contains(Pos::new(4, 0)));
        assert!(!size.contains(Pos::new(0, 2)));
    }

    #[test]
    fn extents_whose_cell_count_overflows_are_rejected() {
        assert!(GridSize::try_new(usize::MAX, 2).is_none());
        assert!(GridSize::try_new(1 << (usize::BITS / 2), 1 << (usize::BITS / 2)).is_none());
        let widest = GridSize::try_new(usize::MAX, 1).unwrap();
        assert_eq!(widest.cell_count(), usize::MAX);
        assert_eq!(widest.flatten(Pos::new(usize::MAX - 1, 0)), usize::MAX - 1);
        assert_eq!(GridSize::try_new(0, usize::MAX), Some(GridSize::new(0, usize::MAX)));
    }

    #[test]
    #[should_panic(expected = "grid extent overflows usize")]
    fn new_panics_on_overflowing_extent() {
        let _ = GridSize::new(usize::MAX, usize::MAX);
    }

    #[test]
    fn out_of_range_column_aliases_when_flattened() {
        // This is why indexes bounds-check before flattening.
        let size = GridSize::new(4, 4);
        assert_eq!(size.flatten(Pos::new(4, 0)), size.flatten(Pos::new(0, 1)));
    }
}
