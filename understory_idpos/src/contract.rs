// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The [`SpatialIndex`] contract shared by every backend.

use std::sync::Arc;

use crate::audit::{Audit, Checks};
use crate::error::Result;
use crate::types::{GridSize, Pos, Tracked};

/// Dual ID/position index over a bounded grid.
///
/// Every backend implements this with identical semantics; only the cell
/// storage differs. All methods take `&self` and synchronize internally, so an
/// index can be shared between threads behind an `Arc`.
///
/// Mutations are atomic with respect to every other operation: a concurrent
/// reader sees the index either before or after a mutation, never halfway.
/// Failed mutations change nothing.
///
/// The trait is object safe; see [`BackendKind::build`](crate::BackendKind::build).
pub trait SpatialIndex<O: Tracked> {
    /// Extent of the grid this index was built for.
    fn size(&self) -> GridSize;

    /// Number of tracked objects.
    fn count(&self) -> usize;

    /// Whether no object is tracked.
    fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Snapshot of every tracked object, in no particular order.
    fn all(&self) -> Vec<Arc<O>>;

    /// The tracked object with this ID.
    fn get_by_id(&self, id: O::Id) -> Option<Arc<O>>;

    /// Position the index has recorded for this ID.
    fn position_of(&self, id: O::Id) -> Option<Pos>;

    /// Whether an object with this ID is tracked.
    fn contains(&self, id: O::Id) -> bool {
        self.position_of(id).is_some()
    }

    /// Snapshot of the raw occupancy list at `(x, y)`.
    ///
    /// Empty slots left by removals appear as `None` and must be skipped.
    /// Cells never occupied, and positions outside the grid, yield an empty list.
    fn pos_objects_at(&self, x: usize, y: usize) -> Vec<Option<Arc<O>>>;

    /// Physical slot count of the cell at `pos`, empty slots included.
    fn slot_count(&self, pos: Pos) -> usize;

    /// Start tracking `obj` at `obj.pos()`.
    ///
    /// Fails with [`Error::DuplicateId`](crate::Error::DuplicateId) if the ID is
    /// already tracked and [`Error::OutOfBounds`](crate::Error::OutOfBounds) if
    /// the position lies outside the grid.
    fn add(&self, obj: Arc<O>) -> Result<()>;

    /// Track `obj`, replacing any object tracked under the same ID.
    ///
    /// Equivalent to [`del`](Self::del) of the existing object followed by
    /// [`add`](Self::add), performed atomically. The position is always read
    /// from the new object.
    fn set(&self, obj: Arc<O>) -> Result<()>;

    /// Stop tracking the object with `obj`'s ID.
    fn del(&self, obj: &O) -> Result<()> {
        self.del_id(obj.id()).map(drop)
    }

    /// Stop tracking the object with this ID, returning it.
    ///
    /// Fails with [`Error::NotFound`](crate::Error::NotFound) if the ID is not
    /// tracked and [`Error::Desync`](crate::Error::Desync) if the cell at the
    /// recorded position does not hold it.
    fn del_id(&self, id: O::Id) -> Result<Arc<O>>;

    /// Move a tracked object to `new_pos`.
    ///
    /// The old position comes from the index's own record, not from
    /// `obj.pos()`, so callers may update the object's field before or after
    /// this call.
    fn update_position(&self, obj: &O, new_pos: Pos) -> Result<()>;

    /// Call `visitor` on each live object at `pos` in slot order, stopping at
    /// the first call that returns `true`.
    ///
    /// Returns whether some call returned `true`. The visitor runs on a
    /// snapshot taken under the read lock, so it may call back into the index.
    ///
    /// Taking the snapshot allocates a `Vec` and clones the `Arc` of every
    /// live occupant, whether or not the visitor stops early.
    fn iterate_at(&self, pos: Pos, visitor: &mut dyn FnMut(&Arc<O>) -> bool) -> bool;

    /// [`iterate_at`](Self::iterate_at) with separate coordinates.
    fn iterate_at_xy(
        &self,
        x: usize,
        y: usize,
        visitor: &mut dyn FnMut(&Arc<O>) -> bool,
    ) -> bool {
        self.iterate_at(Pos::new(x, y), visitor)
    }

    /// Stop tracking everything.
    fn clear(&self);

    /// Whether the recorded position of `obj` equals `obj.pos()`.
    fn check_pos(&self, obj: &O) -> bool;

    /// Run the selected consistency checks. Violations are also logged.
    fn check_with(&self, checks: Checks) -> Audit;

    /// Run every consistency check.
    fn check_all(&self) -> Audit {
        self.check_with(Checks::all())
    }
}
