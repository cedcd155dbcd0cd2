//! Breadth-first spatial embedding of a room tree onto the tile grid.
//!
//! Rooms are taken off a FIFO queue, root first. A child is placed by
//! abutting it to its parent so the two share one wall row or column,
//! trying the facing's branch directions in random order. When a level gets
//! too large or every direction is blocked, the room is lifted one story
//! and retried later; once `max_stories` is reached it is dropped together
//! with its subtree.
//!
//! Coordinates that would go negative are handled by growing the grid at
//! the front and translating every room by the same amount, so the tree and
//! the grid never disagree about where a room is.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::constants::{DEFAULT_MAX_HEIGHT, DEFAULT_MAX_STORIES, DEFAULT_MAX_WIDTH, MIN_ROOM_SIDE};
use crate::error::GenerationError;
use crate::grammar::direction::{Direction, DirectionTable, SpawnDirection};
use crate::grid::Grid;
use crate::logging::TimingSpan;
use crate::tiles::{Tile, TilePalette};
use crate::tree::{Footprint, RoomId, RoomTree};

/// Size limits for one house.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedLimits {
    pub max_width: u32,
    pub max_height: u32,
    /// Highest z-index a room may be lifted to
    pub max_stories: u32,
}

impl Default for EmbedLimits {
    fn default() -> Self {
        Self {
            max_width: DEFAULT_MAX_WIDTH,
            max_height: DEFAULT_MAX_HEIGHT,
            max_stories: DEFAULT_MAX_STORIES,
        }
    }
}

impl EmbedLimits {
    pub fn validate(&self) -> Result<(), GenerationError> {
        if self.max_width < MIN_ROOM_SIDE || self.max_height < MIN_ROOM_SIDE {
            return Err(GenerationError::InvalidLimits(format!(
                "max_width and max_height must be at least {MIN_ROOM_SIDE}, got {}x{}",
                self.max_width, self.max_height
            )));
        }
        Ok(())
    }

    fn has_story_above(&self, z: u32) -> bool {
        z + 1 <= self.max_stories
    }
}

/// Outcome of one placement attempt for a non-root room.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placement {
    Placed(SpawnDirection),
    /// Lifted one story; goes to the back of the queue
    Deferred,
    /// No room anywhere within limits
    Dropped,
}

/// Embed `tree` into a fresh grid, mutating room coordinates, spawn
/// directions and `placed` flags in place.
pub fn embed<R: Rng + ?Sized>(
    tree: &mut RoomTree,
    facing: Direction,
    limits: &EmbedLimits,
    directions: &DirectionTable,
    palette: &TilePalette,
    rng: &mut R,
) -> Result<Grid, GenerationError> {
    let _span = TimingSpan::new("embed");
    limits.validate()?;
    check_room_sizes(tree)?;

    let embedder = Embedder {
        branches: directions.branches(facing)?.to_vec(),
        door_side: directions.front_door_side(facing)?,
        limits: *limits,
        palette,
        grid: Grid::new(),
        taken: HashMap::new(),
        tree,
        rng,
    };
    Ok(embedder.run())
}

/// Hand-built trees skip grammar validation, so every room is checked for a
/// wall ring around at least one floor tile before anything is drawn.
fn check_room_sizes(tree: &RoomTree) -> Result<(), GenerationError> {
    for id in tree.ids() {
        let node = &tree[id];
        if node.width() < MIN_ROOM_SIDE || node.height() < MIN_ROOM_SIDE {
            return Err(GenerationError::InvalidRoomSize {
                room_type: node.room_type(),
                width: node.width(),
                height: node.height(),
            });
        }
    }
    Ok(())
}

struct Embedder<'a, R: ?Sized> {
    tree: &'a mut RoomTree,
    grid: Grid,
    palette: &'a TilePalette,
    branches: Vec<Direction>,
    door_side: Direction,
    limits: EmbedLimits,
    /// Spawn directions already used by each parent's children
    taken: HashMap<RoomId, Vec<SpawnDirection>>,
    rng: &'a mut R,
}

impl<R: Rng + ?Sized> Embedder<'_, R> {
    fn run(mut self) -> Grid {
        let root = self.tree.root();
        let mut queue = VecDeque::from([root]);

        while let Some(id) = queue.pop_front() {
            if !self.tree.is_placed(id) {
                continue;
            }

            if let Some(parent) = self.tree.parent_of(id) {
                match self.try_place(id, parent) {
                    Placement::Placed(dir) => {
                        let node = &self.tree[id];
                        debug!(
                            room = %node.room_type(),
                            id = id.0,
                            dir = %dir,
                            x = node.x(),
                            y = node.y(),
                            z = node.z(),
                            "room placed"
                        );
                    }
                    Placement::Deferred => {
                        trace!(id = id.0, z = self.tree[id].z(), "room lifted a story");
                        queue.push_back(id);
                        continue;
                    }
                    Placement::Dropped => {
                        warn!(
                            room = %self.tree[id].room_type(),
                            id = id.0,
                            "room could not be placed within limits, dropping subtree"
                        );
                        self.tree.set_placed_cascading(id, false);
                        continue;
                    }
                }
            }

            let footprint = self.tree.footprint_of(id);
            let tiles = self.render_room(footprint, id == root);
            // Placed rooms never sit at negative coordinates
            self.grid
                .merge(footprint.x as u32, footprint.y as u32, footprint.z, &tiles);
            self.grid.fill(self.palette);

            let children = self.tree.children_of(id).to_vec();
            for child in children {
                let node = self.tree.node_mut(child);
                node.x = footprint.x;
                node.y = footprint.y;
                node.z = footprint.z;
                queue.push_back(child);
            }
        }

        self.grid.fill(self.palette);
        self.grid
    }

    fn try_place(&mut self, id: RoomId, parent: RoomId) -> Placement {
        let node = &self.tree[id];
        let (width, height, z) = (node.width(), node.height(), node.z());

        let exceeds = self.grid.width(z) + width as usize > self.limits.max_width as usize
            || self.grid.height(z) + height as usize > self.limits.max_height as usize;
        if exceeds {
            trace!(id = id.0, z, "level would exceed house limits");
            return self.lift_or_drop(id, parent);
        }

        for dir in self.direction_order(parent, z) {
            let (x, y) = candidate_origin(self.tree.footprint_of(parent), width, height, dir);
            self.set_origin(id, x, y);

            if x < 0 || y < 0 {
                let dx = if x < 0 { width as usize } else { 0 };
                let dy = if y < 0 { height as usize } else { 0 };
                self.grow_front(dx, dy);
            }

            let node = &self.tree[id];
            let (px, py, pw, ph) = collision_probe(node.x(), node.y(), width, height, dir);
            if self.grid.is_region_free(px, py, pw, ph, z) {
                self.tree.node_mut(id).spawn_direction = Some(dir);
                self.taken.entry(parent).or_default().push(dir);
                return Placement::Placed(dir);
            }

            let origin = self.tree.footprint_of(parent);
            self.set_origin(id, origin.x, origin.y);
        }

        self.lift_or_drop(id, parent)
    }

    /// Stacked-above first (only directly above the parent), then the
    /// facing's branches in random order, minus directions siblings took.
    ///
    /// Once a sibling holds the stacked-above slot, a lifted room can only
    /// land beside its parent on the next story. It shares no floor with the
    /// parent there, so `place_stairs` records a `NoSharedFloor` gap for it.
    fn direction_order(&mut self, parent: RoomId, z: u32) -> Vec<SpawnDirection> {
        let taken = self.taken.get(&parent).cloned().unwrap_or_default();

        let mut shuffled: Vec<SpawnDirection> = self
            .branches
            .iter()
            .map(|&d| SpawnDirection::from(d))
            .collect();
        shuffled.shuffle(&mut *self.rng);

        let mut order = Vec::with_capacity(shuffled.len() + 1);
        if z == self.tree[parent].z() + 1 {
            order.push(SpawnDirection::StackedAbove);
        }
        // Popping from the back of the shuffled copy
        order.extend(shuffled.into_iter().rev());
        order.retain(|dir| !taken.contains(dir));
        order
    }

    fn lift_or_drop(&mut self, id: RoomId, parent: RoomId) -> Placement {
        let origin = self.tree.footprint_of(parent);
        let z = self.tree[id].z();
        if !self.limits.has_story_above(z) {
            return Placement::Dropped;
        }
        let node = self.tree.node_mut(id);
        node.x = origin.x;
        node.y = origin.y;
        node.z = z + 1;
        Placement::Deferred
    }

    fn set_origin(&mut self, id: RoomId, x: i32, y: i32) {
        let node = self.tree.node_mut(id);
        node.x = x;
        node.y = y;
    }

    /// Grow every level at the front and move every room along with it.
    /// The new grid is built aside and swapped in only after the tree has
    /// been translated.
    fn grow_front(&mut self, dx: usize, dy: usize) {
        let grown = self.grid.with_front_padding(dx, dy, self.palette);
        self.tree.translate_all(dx as i32, dy as i32);
        self.grid = grown;
        debug!(dx, dy, "grid grown at the front");
    }

    /// Hollow wall box with a floor interior; the root also gets its front
    /// door on the outward wall.
    fn render_room(&mut self, footprint: Footprint, is_root: bool) -> Vec<Vec<Arc<Tile>>> {
        let (w, h) = (footprint.width as usize, footprint.height as usize);
        let p = self.palette;
        let mut tiles: Vec<Vec<Arc<Tile>>> = (0..w)
            .map(|x| {
                (0..h)
                    .map(|y| {
                        let tile = if y == 0 || y == h - 1 {
                            &p.wall_horizontal
                        } else if x == 0 || x == w - 1 {
                            &p.wall_vertical
                        } else {
                            &p.floor
                        };
                        Arc::clone(tile)
                    })
                    .collect()
            })
            .collect();

        if is_root {
            let (dx, dy) = match self.door_side {
                Direction::North => (self.rng.gen_range(1..w - 1), 0),
                Direction::South => (self.rng.gen_range(1..w - 1), h - 1),
                Direction::West => (0, self.rng.gen_range(1..h - 1)),
                Direction::East => (w - 1, self.rng.gen_range(1..h - 1)),
            };
            tiles[dx][dy] = Arc::clone(&p.door);
        }

        tiles
    }
}

/// Origin that makes the child share exactly one wall with its parent.
fn candidate_origin(
    parent: Footprint,
    width: u32,
    height: u32,
    dir: SpawnDirection,
) -> (i32, i32) {
    match dir {
        SpawnDirection::North => (parent.x, parent.y - height as i32 + 1),
        SpawnDirection::South => (parent.x, parent.bottom()),
        SpawnDirection::West => (parent.x - width as i32 + 1, parent.y),
        SpawnDirection::East => (parent.right(), parent.y),
        SpawnDirection::StackedAbove => (parent.x, parent.y),
    }
}

/// The candidate rectangle minus the wall it shares with the parent.
fn collision_probe(
    x: i32,
    y: i32,
    width: u32,
    height: u32,
    dir: SpawnDirection,
) -> (i32, i32, u32, u32) {
    match dir {
        SpawnDirection::North => (x, y, width, height - 1),
        SpawnDirection::South => (x, y + 1, width, height - 1),
        SpawnDirection::West => (x, y, width - 1, height),
        SpawnDirection::East => (x + 1, y, width - 1, height),
        SpawnDirection::StackedAbove => (x, y, width, height),
    }
}
