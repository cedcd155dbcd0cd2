//! Tile catalog: immutable, named tile descriptors handed out as shared
//! flyweights.
//!
//! The generator only needs a handful of names (see `TilePalette`); any
//! catalog that can produce those can be plugged in through `TileCatalog`.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::GenerationError;

pub const NULL: &str = "null";
pub const AIR: &str = "air";
pub const FLOOR: &str = "floor";
pub const GRASS: &str = "grass";
pub const BRICK_WALL: &str = "brick wall";
pub const STAIRS_UP: &str = "stairsUp";
pub const STAIRS_DOWN: &str = "stairsDown";
pub const WALL_VERTICAL: &str = "indoor wall-vertical";
pub const WALL_HORIZONTAL: &str = "indoor wall-horizontal";
pub const DOOR: &str = "door";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub name: String,
    pub character: char,
    pub foreground: String,
    pub background: String,
    pub walkable: bool,
    pub blocks_light: bool,
    pub outer_wall: bool,
    pub inner_wall: bool,
    pub description: String,
}

impl Tile {
    /// Unset glyph fields fall back to a blank white-on-black cell.
    pub fn new(name: &str, character: char, description: &str) -> Self {
        Self {
            name: name.to_string(),
            character,
            foreground: "white".into(),
            background: "black".into(),
            walkable: false,
            blocks_light: false,
            outer_wall: false,
            inner_wall: false,
            description: description.to_string(),
        }
    }

    pub fn foreground(mut self, colour: &str) -> Self {
        self.foreground = colour.to_string();
        self
    }

    pub fn walkable(mut self) -> Self {
        self.walkable = true;
        self
    }

    pub fn blocks_light(mut self) -> Self {
        self.blocks_light = true;
        self
    }

    pub fn outer_wall(mut self) -> Self {
        self.outer_wall = true;
        self
    }

    pub fn inner_wall(mut self) -> Self {
        self.inner_wall = true;
        self
    }

    pub fn is(&self, name: &str) -> bool {
        self.name == name
    }

    pub fn is_wall(&self) -> bool {
        self.inner_wall || self.outer_wall
    }
}

/// Flyweight factory: the same shared instance for every request of a name.
pub trait TileCatalog {
    fn create(&self, name: &str) -> Option<Arc<Tile>>;
}

/// The stock catalog of house, yard and street tiles.
#[derive(Debug, Clone)]
pub struct StandardTiles {
    tiles: HashMap<String, Arc<Tile>>,
}

impl Default for StandardTiles {
    fn default() -> Self {
        Self::new()
    }
}

impl StandardTiles {
    pub fn new() -> Self {
        let mut catalog = Self {
            tiles: HashMap::new(),
        };

        catalog.define(Tile::new(NULL, ' ', "(unknown)"));
        catalog.define(Tile::new(AIR, ' ', "Empty space"));
        catalog.define(Tile::new(FLOOR, '.', "The floor").walkable());
        catalog.define(
            Tile::new(GRASS, '"', "A patch of grass")
                .foreground("#B3C67F")
                .walkable(),
        );
        catalog.define(
            Tile::new(BRICK_WALL, '#', "A brick wall")
                .foreground("#ab2e34")
                .blocks_light()
                .outer_wall(),
        );
        catalog.define(
            Tile::new(STAIRS_UP, '<', "A staircase leading upwards").walkable(),
        );
        catalog.define(
            Tile::new(STAIRS_DOWN, '>', "A staircase leading downwards").walkable(),
        );
        catalog.define(Tile::new("water", '~', "Clear blue water").foreground("blue"));

        // Street
        catalog.define(
            Tile::new("asphault", '.', "Asphault road")
                .foreground("#302e36")
                .walkable(),
        );
        catalog.define(
            Tile::new("two-way stripe", '.', "A two-way road stripe")
                .foreground("#d7d804")
                .walkable(),
        );
        catalog.define(
            Tile::new("sidewalk", '.', "A sidewalk")
                .foreground("#ada5b2")
                .walkable(),
        );

        // Building materials
        catalog.define(Tile::new("window-vertical", '|', "A glass window").foreground("#aadfff"));
        catalog.define(Tile::new("window-horizontal", '-', "A glass window").foreground("#aadfff"));
        catalog.define(Tile::new(WALL_VERTICAL, '|', "A wall").inner_wall());
        catalog.define(Tile::new(WALL_HORIZONTAL, '-', "A wall").inner_wall());
        catalog.define(
            Tile::new(DOOR, '+', "A steel door")
                .foreground("#8b888d")
                .walkable(),
        );
        catalog.define(
            Tile::new("glass door", '+', "A glass door")
                .foreground("#aadfff")
                .walkable(),
        );
        catalog.define(Tile::new("guard rail", '#', "A metal guard rail").foreground("grey"));

        catalog
    }

    /// Add or replace a tile definition.
    pub fn define(&mut self, tile: Tile) {
        self.tiles.insert(tile.name.clone(), Arc::new(tile));
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}

impl TileCatalog for StandardTiles {
    fn create(&self, name: &str) -> Option<Arc<Tile>> {
        self.tiles.get(name).cloned()
    }
}

/// Every tile the generator writes, resolved once up front.
#[derive(Debug, Clone)]
pub struct TilePalette {
    pub floor: Arc<Tile>,
    pub wall_horizontal: Arc<Tile>,
    pub wall_vertical: Arc<Tile>,
    pub door: Arc<Tile>,
    pub stairs_up: Arc<Tile>,
    pub stairs_down: Arc<Tile>,
    pub grass: Arc<Tile>,
    pub air: Arc<Tile>,
}

impl TilePalette {
    pub fn resolve(catalog: &dyn TileCatalog) -> Result<Self, GenerationError> {
        let get = |name: &str| {
            catalog
                .create(name)
                .ok_or_else(|| GenerationError::UnknownTile(name.to_string()))
        };

        Ok(Self {
            floor: get(FLOOR)?,
            wall_horizontal: get(WALL_HORIZONTAL)?,
            wall_vertical: get(WALL_VERTICAL)?,
            door: get(DOOR)?,
            stairs_up: get(STAIRS_UP)?,
            stairs_down: get(STAIRS_DOWN)?,
            grass: get(GRASS)?,
            air: get(AIR)?,
        })
    }

    /// Grass on the ground floor, air on every story above it.
    pub fn background(&self, z: usize) -> &Arc<Tile> {
        if z == 0 {
            &self.grass
        } else {
            &self.air
        }
    }

    pub fn is_background(tile: &Tile) -> bool {
        tile.is(GRASS) || tile.is(AIR)
    }
}
