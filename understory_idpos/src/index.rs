// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Generic index implementation over a pluggable cell backend.

use core::fmt::Debug;
use std::sync::Arc;

use log::{debug, error, trace};
use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::audit::{self, Audit, Checks};
use crate::backend::Backend;
use crate::backends::{DenseFlat, DenseGrid, HashFlat, HashPair};
use crate::contract::SpatialIndex;
use crate::error::{Error, Result};
use crate::types::{GridSize, Pos, Tracked};

/// The three structures guarded together by the index lock.
pub(crate) struct Tables<O: Tracked, B> {
    /// ID → object.
    pub(crate) objects: FxHashMap<O::Id, Arc<O>>,
    /// ID → recorded position.
    pub(crate) positions: FxHashMap<O::Id, Pos>,
    /// Position → occupancy list.
    pub(crate) backend: B,
}

impl<O: Tracked, B: Backend<O>> Tables<O, B> {
    fn check_bounds(size: GridSize, pos: Pos) -> Result<()> {
        if size.contains(pos) {
            Ok(())
        } else {
            Err(Error::OutOfBounds { pos, size })
        }
    }

    fn add(&mut self, size: GridSize, obj: Arc<O>) -> Result<()> {
        let id = obj.id();
        let pos = obj.pos();
        if self.objects.contains_key(&id) {
            debug!("add rejected: {id:?} already tracked");
            return Err(Error::duplicate_id(id));
        }
        Self::check_bounds(size, pos)?;
        self.backend.cell_entry(pos).insert(Arc::clone(&obj));
        self.positions.insert(id, pos);
        self.objects.insert(id, obj);
        Ok(())
    }

    fn del(&mut self, id: O::Id) -> Result<Arc<O>> {
        let Some(&pos) = self.positions.get(&id) else {
            debug!("del rejected: {id:?} not tracked");
            return Err(Error::not_found(id));
        };
        if !self.objects.contains_key(&id) {
            error!("del: {id:?} has a position but no object");
            return Err(Error::desync(id, pos));
        }
        let removed = self
            .backend
            .cell_mut(pos)
            .is_some_and(|cell| cell.remove(id));
        if !removed {
            error!("del: {id:?} recorded at {pos} but missing from that cell");
            return Err(Error::desync(id, pos));
        }
        self.positions.remove(&id);
        self.objects
            .remove(&id)
            .ok_or_else(|| Error::desync(id, pos))
    }

    fn set(&mut self, size: GridSize, obj: Arc<O>) -> Result<()> {
        Self::check_bounds(size, obj.pos())?;
        if self.positions.contains_key(&obj.id()) {
            self.del(obj.id())?;
        }
        self.add(size, obj)
    }

    fn update(&mut self, size: GridSize, id: O::Id, new_pos: Pos) -> Result<()> {
        let Some(&old_pos) = self.positions.get(&id) else {
            debug!("update rejected: {id:?} not tracked");
            return Err(Error::not_found(id));
        };
        Self::check_bounds(size, new_pos)?;
        let Some(obj) = self.objects.get(&id).map(Arc::clone) else {
            error!("update: {id:?} has a position but no object");
            return Err(Error::desync(id, old_pos));
        };
        let removed = self
            .backend
            .cell_mut(old_pos)
            .is_some_and(|cell| cell.remove(id));
        if !removed {
            error!("update: {id:?} recorded at {old_pos} but missing from that cell");
            return Err(Error::desync(id, old_pos));
        }
        trace!("move {id:?} {old_pos} -> {new_pos}");
        self.positions.insert(id, new_pos);
        self.backend.cell_entry(new_pos).insert(obj);
        Ok(())
    }

    pub(crate) fn check_pos(&self, obj: &O) -> bool {
        self.positions.get(&obj.id()) == Some(&obj.pos())
    }
}

/// A dual ID/position index parameterized by a cell backend.
///
/// Use one of the aliases ([`HashFlatIndex`], [`HashPairIndex`],
/// [`DenseFlatIndex`], [`DenseGridIndex`]) or pick a backend at runtime with
/// [`BackendKind`](crate::BackendKind). All operations are provided through
/// [`SpatialIndex`].
///
/// A single reader-writer lock guards the identity table, the position table
/// and the cells together.
pub struct IndexGeneric<O: Tracked, B: Backend<O>> {
    size: GridSize,
    tables: RwLock<Tables<O, B>>,
}

impl<O: Tracked, B: Backend<O>> IndexGeneric<O, B> {
    /// Create an empty index over a grid of the given extent.
    pub fn new(size: GridSize) -> Self {
        Self {
            size,
            tables: RwLock::new(Tables {
                objects: FxHashMap::default(),
                positions: FxHashMap::default(),
                backend: B::new(size),
            }),
        }
    }

    /// Reserve table space for at least `n` more objects.
    pub fn reserve(&self, n: usize) {
        let mut t = self.tables.write();
        t.objects.reserve(n);
        t.positions.reserve(n);
    }

    #[cfg(test)]
    pub(crate) fn with_tables<R>(&self, f: impl FnOnce(&mut Tables<O, B>) -> R) -> R {
        f(&mut *self.tables.write())
    }
}

impl<O: Tracked, B: Backend<O>> SpatialIndex<O> for IndexGeneric<O, B> {
    fn size(&self) -> GridSize {
        self.size
    }

    fn count(&self) -> usize {
        self.tables.read().objects.len()
    }

    fn all(&self) -> Vec<Arc<O>> {
        self.tables.read().objects.values().cloned().collect()
    }

    fn get_by_id(&self, id: O::Id) -> Option<Arc<O>> {
        self.tables.read().objects.get(&id).cloned()
    }

    fn position_of(&self, id: O::Id) -> Option<Pos> {
        self.tables.read().positions.get(&id).copied()
    }

    fn pos_objects_at(&self, x: usize, y: usize) -> Vec<Option<Arc<O>>> {
        let pos = Pos::new(x, y);
        if !self.size.contains(pos) {
            return Vec::new();
        }
        let t = self.tables.read();
        t.backend
            .cell(pos)
            .map(|cell| cell.slots().to_vec())
            .unwrap_or_default()
    }

    fn slot_count(&self, pos: Pos) -> usize {
        if !self.size.contains(pos) {
            return 0;
        }
        let t = self.tables.read();
        t.backend.cell(pos).map_or(0, |cell| cell.slot_count())
    }

    fn add(&self, obj: Arc<O>) -> Result<()> {
        self.tables.write().add(self.size, obj)
    }

    fn set(&self, obj: Arc<O>) -> Result<()> {
        self.tables.write().set(self.size, obj)
    }

    fn del_id(&self, id: O::Id) -> Result<Arc<O>> {
        self.tables.write().del(id)
    }

    fn update_position(&self, obj: &O, new_pos: Pos) -> Result<()> {
        self.tables.write().update(self.size, obj.id(), new_pos)
    }

    fn iterate_at(&self, pos: Pos, visitor: &mut dyn FnMut(&Arc<O>) -> bool) -> bool {
        if !self.size.contains(pos) {
            return false;
        }
        let live: Vec<Arc<O>> = {
            let t = self.tables.read();
            match t.backend.cell(pos) {
                Some(cell) => cell.live().cloned().collect(),
                None => return false,
            }
        };
        live.iter().any(|o| visitor(o))
    }

    fn clear(&self) {
        let mut t = self.tables.write();
        t.objects.clear();
        t.positions.clear();
        t.backend.clear();
    }

    fn check_pos(&self, obj: &O) -> bool {
        self.tables.read().check_pos(obj)
    }

    fn check_with(&self, checks: Checks) -> Audit {
        audit::run(&*self.tables.read(), checks)
    }
}

impl<O: Tracked, B: Backend<O>> Debug for IndexGeneric<O, B> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let t = self.tables.read();
        f.debug_struct("IndexGeneric")
            .field("size", &self.size)
            .field("objects", &t.objects.len())
            .field("backend", &t.backend)
            .finish_non_exhaustive()
    }
}

/// Index backed by a hash map keyed by flattened coordinate.
pub type HashFlatIndex<O> = IndexGeneric<O, HashFlat<O>>;

/// Index backed by a hash map keyed by coordinate pair.
pub type HashPairIndex<O> = IndexGeneric<O, HashPair<O>>;

/// Index backed by a pre-allocated array keyed by flattened coordinate.
pub type DenseFlatIndex<O> = IndexGeneric<O, DenseFlat<O>>;

/// Index backed by a pre-allocated `[x][y]` array.
pub type DenseGridIndex<O> = IndexGeneric<O, DenseGrid<O>>;
