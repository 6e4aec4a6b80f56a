// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error type returned by index operations.

use core::fmt::Debug;

use thiserror::Error;

use crate::types::{GridSize, Pos};

/// Reasons an index operation was rejected.
///
/// Every failed operation leaves the index unchanged.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// An object with this ID is already tracked.
    #[error("object {id} is already tracked")]
    DuplicateId {
        /// The rejected ID, rendered with `Debug`.
        id: String,
    },

    /// No object with this ID is tracked.
    #[error("object {id} is not tracked")]
    NotFound {
        /// The missing ID, rendered with `Debug`.
        id: String,
    },

    /// The position table and the occupancy lists disagree.
    ///
    /// The position table places `id` at `pos` but no live slot in that cell
    /// holds it. This is an internal inconsistency, not a lookup miss.
    #[error("index out of sync: object {id} is recorded at {pos} but its cell does not hold it")]
    Desync {
        /// The affected ID, rendered with `Debug`.
        id: String,
        /// Position recorded for the ID.
        pos: Pos,
    },

    /// The coordinate lies outside the grid.
    #[error("position {pos} is outside the {size} grid")]
    OutOfBounds {
        /// The rejected position.
        pos: Pos,
        /// Extent of the grid.
        size: GridSize,
    },
}

impl Error {
    pub(crate) fn duplicate_id(id: impl Debug) -> Self {
        Self::DuplicateId {
            id: format!("{id:?}"),
        }
    }

    pub(crate) fn not_found(id: impl Debug) -> Self {
        Self::NotFound {
            id: format!("{id:?}"),
        }
    }

    pub(crate) fn desync(id: impl Debug, pos: Pos) -> Self {
        Self::Desync {
            id: format!("{id:?}"),
            pos,
        }
    }

    /// Whether this error reports a position table / occupancy list mismatch.
    pub fn is_desync(&self) -> bool {
        matches!(self, Self::Desync { .. })
    }
}

/// Result alias for index operations.
pub type Result<T> = core::result::Result<T, Error>;
