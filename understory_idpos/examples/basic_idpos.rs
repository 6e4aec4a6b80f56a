// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Basic usage of Understory IdPos: add, move, query, delete, audit.

use std::sync::Arc;

use understory_idpos::{BackendKind, GridSize, Pos, SpatialIndex, Tracked};

#[derive(Debug)]
struct Unit {
    id: u32,
    pos: Pos,
}

impl Tracked for Unit {
    type Id = u32;
    fn id(&self) -> u32 {
        self.id
    }
    fn pos(&self) -> Pos {
        self.pos
    }
}

fn main() {
    for kind in BackendKind::ALL {
        let idx = kind.build::<Unit>(GridSize::new(4, 4));
        let a = Arc::new(Unit {
            id: 1,
            pos: Pos::new(0, 0),
        });
        let b = Arc::new(Unit {
            id: 2,
            pos: Pos::new(0, 0),
        });
        idx.add(a.clone()).unwrap();
        idx.add(b.clone()).unwrap();

        // Move unit 1 to the far corner.
        idx.update_position(&a, Pos::new(3, 3)).unwrap();
        println!("{kind}: unit 1 is at {:?}", idx.position_of(1));

        let mut here = Vec::new();
        idx.iterate_at_xy(0, 0, &mut |u| {
            here.push(u.id);
            false
        });
        println!("{kind}: units at (0, 0): {here:?}");

        idx.del(&b).unwrap();
        println!(
            "{kind}: raw slots at (0, 0) after delete: {:?}",
            idx.pos_objects_at(0, 0)
        );

        // The audit compares the index with the objects' own fields; unit 1's
        // field was never updated here, so it reports the drift.
        let audit = idx.check_all();
        println!("{kind}: audit violations: {}", audit.violations.len());
    }
}
