//! Door and stair placement over a fully embedded house.
//!
//! Both passes walk parent -> child edges breadth-first and skip rooms that
//! were never placed. A missing connection is not fatal: it is returned as a
//! `ConnectivityGap` and logged.

use std::collections::BTreeSet;
use std::sync::Arc;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::grid::Grid;
use crate::logging::TimingSpan;
use crate::tiles::{Tile, TilePalette, FLOOR};
use crate::tree::{RoomId, RoomTree};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GapKind {
    /// Same level, but no non-corner wall cell in common
    NoSharedWall,
    /// Different levels with no cell that is floor on both
    NoSharedFloor,
}

/// A parent/child pair the finisher could not connect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectivityGap {
    pub parent: RoomId,
    pub child: RoomId,
    pub kind: GapKind,
}

/// Placed parent/child pairs in breadth-first order.
fn placed_edges(tree: &RoomTree) -> Vec<(RoomId, RoomId)> {
    tree.iter_bfs()
        .into_iter()
        .filter(|&id| tree.is_placed(id))
        .flat_map(move |id| {
            tree.children_of(id)
                .iter()
                .filter(move |&&child| tree.is_placed(child))
                .map(move |&child| (id, child))
        })
        .collect()
}

/// Cut one door into the wall shared by every same-level parent/child pair.
pub fn place_doors<R: Rng + ?Sized>(
    grid: &mut Grid,
    tree: &RoomTree,
    palette: &TilePalette,
    rng: &mut R,
) -> Vec<ConnectivityGap> {
    let _span = TimingSpan::new("place_doors");
    let mut gaps = Vec::new();

    for (parent, child) in placed_edges(tree) {
        let (room, next) = (&tree[parent], &tree[child]);
        if room.z() != next.z() {
            continue;
        }
        let Some(dir) = next.spawn_direction().and_then(|d| d.cardinal()) else {
            continue;
        };

        let shared: BTreeSet<(i32, i32)> = room
            .footprint()
            .perimeter()
            .intersection(&next.footprint().perimeter())
            .copied()
            .collect();
        let candidates = strip_corners(&shared, dir.is_vertical_axis());

        match candidates.choose(rng) {
            Some(&(x, y)) => {
                debug!(parent = parent.0, child = child.0, x, y, z = room.z(), "door placed");
                grid.set_tile(x as u32, y as u32, room.z(), Arc::clone(&palette.door));
            }
            None => {
                warn!(parent = parent.0, child = child.0, "no wall cell left for a door");
                gaps.push(ConnectivityGap {
                    parent,
                    child,
                    kind: GapKind::NoSharedWall,
                });
            }
        }
    }

    gaps
}

/// Drop the cells at the extreme x (for a horizontal wall) or extreme y
/// (for a vertical wall) so a door never lands in a corner.
fn strip_corners(shared: &BTreeSet<(i32, i32)>, horizontal_wall: bool) -> Vec<(i32, i32)> {
    let axis = |&(x, y): &(i32, i32)| if horizontal_wall { x } else { y };
    let (Some(lo), Some(hi)) = (shared.iter().map(axis).min(), shared.iter().map(axis).max()) else {
        return Vec::new();
    };
    shared
        .iter()
        .filter(|c| axis(*c) != lo && axis(*c) != hi)
        .copied()
        .collect()
}

/// Join every parent/child pair on different levels with a stairs-up /
/// stairs-down pair at the first cell that is floor on both levels.
pub fn place_stairs(
    grid: &mut Grid,
    tree: &RoomTree,
    palette: &TilePalette,
) -> Vec<ConnectivityGap> {
    let _span = TimingSpan::new("place_stairs");
    let mut gaps = Vec::new();

    for (parent, child) in placed_edges(tree) {
        let (lower, upper) = (&tree[parent], &tree[child]);
        if upper.z() <= lower.z() {
            continue;
        }

        let is_floor = |tile: Option<&Arc<Tile>>| tile.is_some_and(|t| t.is(FLOOR));
        let spot = lower
            .footprint()
            .cells()
            .intersection(&upper.footprint().cells())
            .copied()
            .find(|&(x, y)| {
                is_floor(grid.tile_at(x, y, lower.z())) && is_floor(grid.tile_at(x, y, upper.z()))
            });

        match spot {
            Some((x, y)) => {
                debug!(parent = parent.0, child = child.0, x, y, "stairs placed");
                grid.set_tile(x as u32, y as u32, lower.z(), Arc::clone(&palette.stairs_up));
                grid.set_tile(x as u32, y as u32, upper.z(), Arc::clone(&palette.stairs_down));
            }
            None => {
                warn!(
                    parent = parent.0,
                    child = child.0,
                    from = lower.z(),
                    to = upper.z(),
                    "floors left disconnected: no shared floor cell for stairs"
                );
                gaps.push(ConnectivityGap {
                    parent,
                    child,
                    kind: GapKind::NoSharedFloor,
                });
            }
        }
    }

    gaps
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_corners_horizontal() {
        let shared: BTreeSet<_> = (0..5).map(|x| (x, 3)).collect();
        assert_eq!(strip_corners(&shared, true), vec![(1, 3), (2, 3), (3, 3)]);
    }

    #[test]
    fn test_strip_corners_vertical() {
        let shared: BTreeSet<_> = (2..5).map(|y| (7, y)).collect();
        assert_eq!(strip_corners(&shared, false), vec![(7, 3)]);
    }

    #[test]
    fn test_strip_corners_too_short() {
        let shared: BTreeSet<_> = [(0, 0), (1, 0)].into_iter().collect();
        assert!(strip_corners(&shared, true).is_empty());
        assert!(strip_corners(&BTreeSet::new(), true).is_empty());
    }
}
