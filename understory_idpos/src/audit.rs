// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Full-scan consistency audit.
//!
//! The audit never mutates the index and is never needed for correct
//! operation. It cross-checks the identity table, the position table, the
//! occupancy lists, and the objects' own [`Tracked::pos`] against each other.
//! Each violation is logged at `error` level as it is found and the scan
//! continues.

use core::fmt;

use log::error;
use rustc_hash::FxHashSet;

use crate::backend::Backend;
use crate::index::Tables;
use crate::types::{Pos, Tracked};

bitflags::bitflags! {
    /// Selects which audit passes run.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Checks: u8 {
        /// Every tracked object's recorded position equals its own position.
        const OBJECT_POSITIONS = 0b0000_0001;
        /// Every live slot sits in the cell recorded for its object, and that
        /// object's own position agrees.
        const CELL_POSITIONS   = 0b0000_0010;
        /// Identity table, position table and live slots describe the same set.
        const CARDINALITY      = 0b0000_0100;
    }
}

impl Default for Checks {
    fn default() -> Self {
        Self::all()
    }
}

/// One inconsistency found by an audit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Violation {
    /// A tracked object's own position differs from the recorded one.
    ObjectPosition {
        /// Object ID, rendered with `Debug`.
        id: String,
        /// Position in the position table.
        recorded: Option<Pos>,
        /// Position reported by the object.
        actual: Pos,
    },
    /// An object found in a cell reports a different position than that cell.
    CellPosition {
        /// Object ID, rendered with `Debug`.
        id: String,
        /// The cell holding the slot.
        cell: Pos,
        /// Position reported by the object.
        actual: Pos,
    },
    /// A live slot sits in a cell other than the one recorded for its object.
    StrayOccupant {
        /// Object ID, rendered with `Debug`.
        id: String,
        /// The cell holding the slot.
        cell: Pos,
        /// Position in the position table, if any.
        recorded: Option<Pos>,
    },
    /// The same ID occupies more than one live slot.
    DuplicateOccupant {
        /// Object ID, rendered with `Debug`.
        id: String,
        /// The cell holding the extra slot.
        cell: Pos,
    },
    /// A tracked object has no entry in the position table.
    MissingPosition {
        /// Object ID, rendered with `Debug`.
        id: String,
    },
    /// The three structures disagree on how many objects are tracked.
    Cardinality {
        /// Entries in the identity table.
        objects: usize,
        /// Entries in the position table.
        positions: usize,
        /// Live slots across all cells.
        live_slots: usize,
    },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ObjectPosition {
                id,
                recorded,
                actual,
            } => write!(f, "id2pos check fail {id}: recorded {recorded:?}, object at {actual}"),
            Self::CellPosition { id, cell, actual } => {
                write!(f, "pos2obj check fail {id}: in cell {cell}, object at {actual}")
            }
            Self::StrayOccupant { id, cell, recorded } => {
                write!(f, "stray occupant {id} in cell {cell}: recorded {recorded:?}")
            }
            Self::DuplicateOccupant { id, cell } => {
                write!(f, "duplicate occupant {id} in cell {cell}")
            }
            Self::MissingPosition { id } => write!(f, "no recorded position for {id}"),
            Self::Cardinality {
                objects,
                positions,
                live_slots,
            } => write!(
                f,
                "cardinality mismatch: {objects} objects, {positions} positions, {live_slots} live slots"
            ),
        }
    }
}

/// Result of an audit pass.
#[derive(Clone, Debug, Default)]
pub struct Audit {
    /// Every violation found, in discovery order.
    pub violations: Vec<Violation>,
}

impl Audit {
    /// True if no violation was found.
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }

    fn report(&mut self, v: Violation) {
        error!("{v}");
        self.violations.push(v);
    }
}

pub(crate) fn run<O: Tracked, B: Backend<O>>(t: &Tables<O, B>, checks: Checks) -> Audit {
    let mut audit = Audit::default();

    if checks.contains(Checks::OBJECT_POSITIONS) {
        for obj in t.objects.values() {
            if !t.check_pos(obj) {
                audit.report(Violation::ObjectPosition {
                    id: format!("{:?}", obj.id()),
                    recorded: t.positions.get(&obj.id()).copied(),
                    actual: obj.pos(),
                });
            }
        }
    }

    if checks.contains(Checks::CELL_POSITIONS) {
        for (cell, list) in t.backend.cells() {
            for obj in list.live() {
                let recorded = t.positions.get(&obj.id()).copied();
                if recorded != Some(cell) {
                    audit.report(Violation::StrayOccupant {
                        id: format!("{:?}", obj.id()),
                        cell,
                        recorded,
                    });
                } else if obj.pos() != cell {
                    audit.report(Violation::CellPosition {
                        id: format!("{:?}", obj.id()),
                        cell,
                        actual: obj.pos(),
                    });
                }
            }
        }
    }

    if checks.contains(Checks::CARDINALITY) {
        let mut seen = FxHashSet::default();
        let mut live_slots = 0;
        for (cell, list) in t.backend.cells() {
            for obj in list.live() {
                live_slots += 1;
                if !seen.insert(obj.id()) {
                    audit.report(Violation::DuplicateOccupant {
                        id: format!("{:?}", obj.id()),
                        cell,
                    });
                }
            }
        }
        for id in t.objects.keys() {
            if !t.positions.contains_key(id) {
                audit.report(Violation::MissingPosition {
                    id: format!("{id:?}"),
                });
            }
        }
        let objects = t.objects.len();
        let positions = t.positions.len();
        if objects != positions || objects != live_slots {
            audit.report(Violation::Cardinality {
                objects,
                positions,
                live_slots,
            });
        }
    }

    audit
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::SpatialIndex;
    use crate::index::{DenseFlatIndex, HashFlatIndex, HashPairIndex};
    use crate::testing::{Mob, init_logger};
    use crate::types::GridSize;

    #[test]
    fn caller_side_drift_is_reported_from_both_sides() {
        init_logger();
        let idx = HashFlatIndex::<Mob>::new(GridSize::new(4, 4));
        let a = Mob::new(1, 0, 0);
        idx.add(a.clone()).unwrap();
        idx.add(Mob::new(2, 1, 1)).unwrap();
        assert!(idx.check_all().is_clean());

        // Moving the object without telling the index.
        a.place(3, 3);
        assert!(!idx.check_pos(&a));
        let audit = idx.check_all();
        assert_eq!(
            audit.violations,
            [
                Violation::ObjectPosition {
                    id: "1".into(),
                    recorded: Some(Pos::new(0, 0)),
                    actual: Pos::new(3, 3),
                },
                Violation::CellPosition {
                    id: "1".into(),
                    cell: Pos::new(0, 0),
                    actual: Pos::new(3, 3),
                },
            ]
        );
    }

    #[test]
    fn checks_select_passes() {
        init_logger();
        let idx = HashPairIndex::<Mob>::new(GridSize::new(4, 4));
        let a = Mob::new(1, 0, 0);
        idx.add(a.clone()).unwrap();
        a.place(1, 0);
        assert_eq!(idx.check_with(Checks::OBJECT_POSITIONS).violations.len(), 1);
        assert_eq!(idx.check_with(Checks::CELL_POSITIONS).violations.len(), 1);
        assert!(idx.check_with(Checks::CARDINALITY).is_clean());
        assert!(idx.check_with(Checks::empty()).is_clean());
    }

    #[test]
    fn structural_corruption_is_reported() {
        init_logger();
        let idx = DenseFlatIndex::<Mob>::new(GridSize::new(4, 4));
        let a = Mob::new(1, 2, 2);
        idx.add(a.clone()).unwrap();
        idx.with_tables(|t| t.backend.cell_entry(Pos::new(0, 3)).insert(a.clone()));

        let audit = idx.check_with(Checks::CELL_POSITIONS | Checks::CARDINALITY);
        assert_eq!(
            audit.violations,
            [
                Violation::StrayOccupant {
                    id: "1".into(),
                    cell: Pos::new(0, 3),
                    recorded: Some(Pos::new(2, 2)),
                },
                Violation::DuplicateOccupant {
                    id: "1".into(),
                    cell: Pos::new(0, 3),
                },
                Violation::Cardinality {
                    objects: 1,
                    positions: 1,
                    live_slots: 2,
                },
            ]
        );
    }

    #[test]
    fn missing_position_is_reported() {
        init_logger();
        let idx = HashFlatIndex::<Mob>::new(GridSize::new(2, 2));
        idx.add(Mob::new(5, 1, 1)).unwrap();
        idx.with_tables(|t| t.positions.clear());
        let audit = idx.check_with(Checks::CARDINALITY);
        assert!(audit.violations.contains(&Violation::MissingPosition { id: "5".into() }));
        assert!(
            audit
                .violations
                .iter()
                .any(|v| matches!(v, Violation::Cardinality { positions: 0, .. }))
        );
    }

    #[test]
    fn violations_display_like_log_lines() {
        let v = Violation::ObjectPosition {
            id: "9".into(),
            recorded: None,
            actual: Pos::new(1, 2),
        };
        assert_eq!(
            v.to_string(),
            "id2pos check fail 9: recorded None, object at (1, 2)"
        );
    }
}
