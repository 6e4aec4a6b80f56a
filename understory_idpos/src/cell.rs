// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-cell occupancy list with tombstoned slots.
//!
//! Removing an object leaves an empty slot behind instead of shifting the list.
//! Inserting fills the leftmost empty slot before growing, so a cell's physical
//! length is bounded by its peak concurrent occupancy, not by churn.

use core::fmt::Debug;
use std::sync::Arc;

use crate::types::Tracked;

/// Occupancy list of a single grid cell.
pub struct Cell<O> {
    slots: Vec<Option<Arc<O>>>,
}

impl<O> Default for Cell<O> {
    fn default() -> Self {
        Self { slots: Vec::new() }
    }
}

impl<O> Clone for Cell<O> {
    fn clone(&self) -> Self {
        Self {
            slots: self.slots.clone(),
        }
    }
}

impl<O> Debug for Cell<O> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Cell")
            .field("slots", &self.slots.len())
            .field("live", &self.live_count())
            .finish()
    }
}

impl<O: Tracked> Cell<O> {
    /// Store `obj` in the first empty slot, or append one.
    pub fn insert(&mut self, obj: Arc<O>) {
        match self.slots.iter_mut().find(|s| s.is_none()) {
            Some(slot) => *slot = Some(obj),
            None => self.slots.push(Some(obj)),
        }
    }

    /// Empty the slot holding `id`. Returns `false` if no live slot holds it.
    pub fn remove(&mut self, id: O::Id) -> bool {
        for slot in &mut self.slots {
            if slot.as_ref().is_some_and(|o| o.id() == id) {
                *slot = None;
                return true;
            }
        }
        false
    }
}

impl<O> Cell<O> {
    /// Live objects in slot order.
    pub fn live(&self) -> impl Iterator<Item = &Arc<O>> + '_ {
        self.slots.iter().flatten()
    }

    /// Raw slots, empty ones included.
    pub fn slots(&self) -> &[Option<Arc<O>>] {
        &self.slots
    }

    /// Number of physical slots, empty ones included.
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Number of occupied slots.
    pub fn live_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Drop every slot.
    pub fn clear(&mut self) {
        self.slots.clear();
    }
}
