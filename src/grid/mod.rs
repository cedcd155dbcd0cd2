//! Multi-level tile grid indexed `[z][x][y]`.
//!
//! Levels grow lazily as rooms are merged in, so between fill passes a level
//! may be ragged or have holes. `fill` pads every level out to a dense
//! rectangle of background tiles sized to its own bounding box.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::tiles::{Tile, TilePalette};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Level {
    columns: Vec<Vec<Option<Arc<Tile>>>>,
}

impl Level {
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Length of the tallest column.
    pub fn height(&self) -> usize {
        self.columns.iter().map(Vec::len).max().unwrap_or(0)
    }

    pub fn get(&self, x: usize, y: usize) -> Option<&Arc<Tile>> {
        self.columns.get(x)?.get(y)?.as_ref()
    }

    fn set(&mut self, x: usize, y: usize, tile: Arc<Tile>) {
        if self.columns.len() <= x {
            self.columns.resize_with(x + 1, Vec::new);
        }
        let column = &mut self.columns[x];
        if column.len() <= y {
            column.resize(y + 1, None);
        }
        column[y] = Some(tile);
    }

    /// A cell counts as claimed when it holds a non-background tile.
    fn is_claimed(&self, x: usize, y: usize) -> bool {
        self.get(x, y)
            .is_some_and(|tile| !TilePalette::is_background(tile))
    }

    fn is_dense(&self) -> bool {
        let height = self.height();
        self.columns
            .iter()
            .all(|col| col.len() == height && col.iter().all(Option::is_some))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    levels: Vec<Level>,
}

impl Grid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of z-levels currently allocated.
    pub fn stories(&self) -> u32 {
        self.levels.len() as u32
    }

    pub fn level(&self, z: u32) -> Option<&Level> {
        self.levels.get(z as usize)
    }

    pub fn width(&self, z: u32) -> usize {
        self.level(z).map_or(0, Level::width)
    }

    pub fn height(&self, z: u32) -> usize {
        self.level(z).map_or(0, Level::height)
    }

    pub fn tile_at(&self, x: i32, y: i32, z: u32) -> Option<&Arc<Tile>> {
        if x < 0 || y < 0 {
            return None;
        }
        self.level(z)?.get(x as usize, y as usize)
    }

    fn level_mut(&mut self, z: u32) -> &mut Level {
        let z = z as usize;
        if self.levels.len() <= z {
            self.levels.resize_with(z + 1, Level::default);
        }
        &mut self.levels[z]
    }

    /// Overwrite a single cell, whatever it currently holds.
    pub fn set_tile(&mut self, x: u32, y: u32, z: u32, tile: Arc<Tile>) {
        self.level_mut(z).set(x as usize, y as usize, tile);
    }

    /// True when no cell of the rectangle holds a non-background tile.
    /// Cells outside the allocated grid count as free.
    pub fn is_region_free(&self, x: i32, y: i32, width: u32, height: u32, z: u32) -> bool {
        let Some(level) = self.level(z) else {
            return true;
        };
        (x..x + width as i32).all(|cx| {
            (y..y + height as i32).all(|cy| {
                cx < 0 || cy < 0 || !level.is_claimed(cx as usize, cy as usize)
            })
        })
    }

    /// Copy `tiles` (indexed `[dx][dy]`) in at `(x, y, z)`. Cells already
    /// claimed by another room keep their tile.
    pub fn merge(&mut self, x: u32, y: u32, z: u32, tiles: &[Vec<Arc<Tile>>]) {
        let level = self.level_mut(z);
        for (dx, column) in tiles.iter().enumerate() {
            for (dy, tile) in column.iter().enumerate() {
                let (gx, gy) = (x as usize + dx, y as usize + dy);
                if !level.is_claimed(gx, gy) {
                    level.set(gx, gy, Arc::clone(tile));
                }
            }
        }
    }

    /// Pad every level into a dense rectangle of background tiles.
    pub fn fill(&mut self, palette: &TilePalette) {
        for (z, level) in self.levels.iter_mut().enumerate() {
            let height = level.height();
            let background = palette.background(z);
            for column in &mut level.columns {
                column.resize(height, None);
                for cell in column.iter_mut().filter(|c| c.is_none()) {
                    *cell = Some(Arc::clone(background));
                }
            }
        }
    }

    pub fn is_dense(&self) -> bool {
        self.levels.iter().all(Level::is_dense)
    }

    /// A copy of this grid with `dx` background columns and `dy` background
    /// rows inserted in front of every level. Existing cells move by
    /// `(+dx, +dy)`.
    pub fn with_front_padding(&self, dx: usize, dy: usize, palette: &TilePalette) -> Grid {
        let levels = self
            .levels
            .iter()
            .enumerate()
            .map(|(z, level)| {
                let background = Some(Arc::clone(palette.background(z)));
                let height = level.height() + dy;
                let mut columns = Vec::with_capacity(level.width() + dx);
                columns.extend((0..dx).map(|_| vec![background.clone(); height]));
                columns.extend(level.columns.iter().map(|old| {
                    let mut column = vec![background.clone(); dy];
                    column.extend(old.iter().cloned());
                    column
                }));
                Level { columns }
            })
            .collect();
        Grid { levels }
    }

    /// Glyph dump of one level, one text row per `y`.
    pub fn render_level(&self, z: u32) -> Option<String> {
        let level = self.level(z)?;
        let mut out = String::with_capacity((level.width() + 1) * level.height());
        for y in 0..level.height() {
            for x in 0..level.width() {
                out.push(level.get(x, y).map_or(' ', |tile| tile.character));
            }
            out.push('\n');
        }
        Some(out)
    }

    /// Every allocated cell as `(x, y, z, tile)`, level by level, column-major.
    pub fn cells(&self) -> impl Iterator<Item = (u32, u32, u32, &Arc<Tile>)> + '_ {
        self.levels.iter().enumerate().flat_map(|(z, level)| {
            level.columns.iter().enumerate().flat_map(move |(x, column)| {
                column.iter().enumerate().filter_map(move |(y, cell)| {
                    cell.as_ref()
                        .map(|tile| (x as u32, y as u32, z as u32, tile))
                })
            })
        })
    }
}
