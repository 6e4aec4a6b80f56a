// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_idpos --heading-base-level=0

//! Understory IdPos: an ID/position dual index over a bounded 2D grid.
//!
//! Understory IdPos tracks many identifiable objects on a discretized plane and
//! answers two questions in close to constant time:
//!
//! - Where is object `X`? ([`SpatialIndex::position_of`], [`SpatialIndex::get_by_id`])
//! - What occupies cell `(x, y)`? ([`SpatialIndex::iterate_at`], [`SpatialIndex::pos_objects_at`])
//!
//! Objects implement [`Tracked`] and are shared with the index as `Arc<O>`; the
//! index owns only its bookkeeping. Objects move exclusively through
//! [`SpatialIndex::update_position`].
//!
//! Backends are pluggable via a small trait so you can compare cell storage
//! strategies under identical semantics. Every backend rejects positions
//! outside the grid with [`Error::OutOfBounds`].
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use understory_idpos::{GridSize, HashFlatIndex, Pos, SpatialIndex, Tracked};
//!
//! struct Unit {
//!     id: u32,
//!     pos: Pos,
//! }
//!
//! impl Tracked for Unit {
//!     type Id = u32;
//!     fn id(&self) -> u32 {
//!         self.id
//!     }
//!     fn pos(&self) -> Pos {
//!         self.pos
//!     }
//! }
//!
//! let idx = HashFlatIndex::<Unit>::new(GridSize::new(4, 4));
//! let a = Arc::new(Unit { id: 1, pos: Pos::new(0, 0) });
//! idx.add(a.clone()).unwrap();
//! idx.add(Arc::new(Unit { id: 2, pos: Pos::new(0, 0) })).unwrap();
//! assert_eq!(idx.count(), 2);
//!
//! // Move unit 1; the index remembers where it was.
//! idx.update_position(&a, Pos::new(3, 3)).unwrap();
//! assert_eq!(idx.position_of(1), Some(Pos::new(3, 3)));
//!
//! // Find unit 2 at the origin.
//! assert!(idx.iterate_at(Pos::new(0, 0), &mut |u| u.id == 2));
//! ```
//!
//! ## Choosing a backend
//!
//! - [`HashFlatIndex`]: hash map keyed by `width * y + x`. Memory follows occupied cells.
//! - [`HashPairIndex`]: hash map keyed by `(x, y)`. Same footprint, no multiply.
//! - [`DenseFlatIndex`]: one cell per position allocated up front, flat addressing.
//!   Fastest lookups for dense occupancy; `width * height` cells of memory.
//! - [`DenseGridIndex`]: one cell per position allocated up front, `[x][y]` addressing.
//!
//! Use [`BackendKind`] to pick one at runtime behind `Box<dyn SpatialIndex<O>>`.
//!
//! ## Cells and empty slots
//!
//! Removing an object from a cell leaves an empty slot; the next insertion into
//! that cell reuses the leftmost empty slot before growing. A cell's physical
//! length therefore tracks its peak occupancy, not its churn.
//! [`SpatialIndex::pos_objects_at`] exposes the raw slots, empty ones as `None`.
//!
//! ## Concurrency
//!
//! Each index holds one reader-writer lock over all of its tables. Mutations
//! take it exclusively, reads take it shared, so the cross-table invariants are
//! never observed half-updated.
//!
//! ## Diagnostics
//!
//! [`SpatialIndex::check_all`] audits the whole structure without mutating it.
//! Violations, and the position-table desync detected by
//! [`SpatialIndex::del`] or [`SpatialIndex::update_position`], are reported
//! through the [`log`] facade.

pub mod audit;
pub mod backend;
pub mod backends;
pub mod cell;
pub mod contract;
pub mod error;
pub mod index;
pub mod types;

pub use audit::{Audit, Checks, Violation};
pub use backend::Backend;
pub use backends::{BackendKind, DenseFlat, DenseGrid, HashFlat, HashPair};
pub use contract::SpatialIndex;
pub use error::{Error, Result};
pub use index::{DenseFlatIndex, DenseGridIndex, HashFlatIndex, HashPairIndex, IndexGeneric};
pub use types::{GridSize, Pos, Tracked};

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Arc;

    use parking_lot::Mutex;

    use crate::types::{Pos, Tracked};

    /// Test object whose own position can drift from the index's record.
    #[derive(Debug)]
    pub(crate) struct Mob {
        pub(crate) id: u64,
        pos: Mutex<Pos>,
    }

    impl Mob {
        pub(crate) fn new(id: u64, x: usize, y: usize) -> Arc<Self> {
            Arc::new(Self {
                id,
                pos: Mutex::new(Pos::new(x, y)),
            })
        }

        pub(crate) fn place(&self, x: usize, y: usize) {
            *self.pos.lock() = Pos::new(x, y);
        }
    }

    impl Tracked for Mob {
        type Id = u64;
        fn id(&self) -> u64 {
            self.id
        }
        fn pos(&self) -> Pos {
            *self.pos.lock()
        }
    }

    pub(crate) fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }
}
