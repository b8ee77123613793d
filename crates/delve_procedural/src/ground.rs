//! Ground level lookup.
//!
//! Scans a column from the top of the grid down and reports the first
//! level where the surrounding window is solid enough to count as ground.

use crate::grid::{Coord, Grid};

/// Horizontal reach of the probe window around the column.
const PROBE_RADIUS: i32 = 1;

/// Layers sampled at and below the candidate level.
const PROBE_LAYERS: i32 = 2;

/// Returns the highest `y` at which the fraction of non-empty cells in the
/// 3x3 window over layers `y - 1..=y` reaches `threshold`.
///
/// Only in-bounds cells are sampled. Returns `None` if no level qualifies.
#[must_use]
pub fn find_ground_level<G: Grid + ?Sized>(grid: &G, x: i32, z: i32, threshold: f64) -> Option<i32> {
    let bounds = grid.bounds();
    let empty = grid.empty_material();

    (bounds.min.y..bounds.max.y).rev().find(|&y| {
        let mut total = 0u32;
        let mut solid = 0u32;
        for wy in (y - PROBE_LAYERS + 1)..=y {
            for wz in (z - PROBE_RADIUS)..=(z + PROBE_RADIUS) {
                for wx in (x - PROBE_RADIUS)..=(x + PROBE_RADIUS) {
                    let c = Coord::new(wx, wy, wz);
                    if !bounds.contains(c) {
                        continue;
                    }
                    total += 1;
                    if grid.material_at(c) != empty {
                        solid += 1;
                    }
                }
            }
        }
        total > 0 && f64::from(solid) / f64::from(total) >= threshold
    })
}
