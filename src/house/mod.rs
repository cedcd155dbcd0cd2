//! House facade: one call from a `HouseConfig` to a finished floor plan.
//!
//! The whole run draws from a single `Xoshiro256PlusPlus` stream seeded
//! from the config (or a fresh random seed that is logged and kept on the
//! result), so any house can be regenerated bit for bit.

use std::sync::Arc;

use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use serde::{Deserialize, Serialize};
use sha3::{Digest, Sha3_256};
use tracing::{info, warn};

use crate::config::HouseConfig;
use crate::embed::embed;
use crate::error::GenerationError;
use crate::finish::{place_doors, place_stairs, ConnectivityGap};
use crate::grammar::direction::Direction;
use crate::grid::Grid;
use crate::logging::TimingSpan;
use crate::tiles::{StandardTiles, Tile, TileCatalog, TilePalette};
use crate::tree::builder::build_tree;
use crate::tree::{Footprint, RoomId, RoomTree};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct House {
    pub seed: u64,
    pub facing: Direction,
    pub tree: RoomTree,
    pub grid: Grid,
    pub gaps: Vec<ConnectivityGap>,
}

impl House {
    /// Generate with the standard tile catalog.
    pub fn generate(config: &HouseConfig) -> Result<Self, GenerationError> {
        Self::generate_with_catalog(config, &StandardTiles::new())
    }

    pub fn generate_with_catalog(
        config: &HouseConfig,
        catalog: &dyn TileCatalog,
    ) -> Result<Self, GenerationError> {
        let _span = TimingSpan::new("generate_house");
        config.validate()?;
        let palette = TilePalette::resolve(catalog)?;

        let seed = config.seed.unwrap_or_else(rand::random);
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        let facing = config
            .facing
            .unwrap_or_else(|| Direction::ALL[rng.gen_range(0..Direction::ALL.len())]);
        info!(seed, facing = %facing, root = %config.root_type, "generating house");

        let tree = build_tree(config.root_type, &config.grammar, &mut rng)?;
        Self::assemble(seed, facing, tree, config, &palette, &mut rng)
    }

    /// Embed and finish a hand-built tree. Useful for fixed layouts; the
    /// config's grammar is not consulted.
    pub fn from_tree(
        tree: RoomTree,
        facing: Direction,
        config: &HouseConfig,
        catalog: &dyn TileCatalog,
    ) -> Result<Self, GenerationError> {
        let _span = TimingSpan::new("generate_house");
        config.limits().validate()?;
        let palette = TilePalette::resolve(catalog)?;
        let seed = config.seed.unwrap_or_else(rand::random);
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        info!(seed, facing = %facing, rooms = tree.len(), "embedding prebuilt tree");
        Self::assemble(seed, facing, tree, config, &palette, &mut rng)
    }

    fn assemble(
        seed: u64,
        facing: Direction,
        mut tree: RoomTree,
        config: &HouseConfig,
        palette: &TilePalette,
        rng: &mut Xoshiro256PlusPlus,
    ) -> Result<Self, GenerationError> {
        let mut grid = embed(
            &mut tree,
            facing,
            &config.limits(),
            &config.directions,
            palette,
            rng,
        )?;
        grid.fill(palette);

        let mut gaps = place_doors(&mut grid, &tree, palette, rng);
        gaps.extend(place_stairs(&mut grid, &tree, palette));

        let placed = tree.ids().filter(|&id| tree.is_placed(id)).count();
        if placed < tree.len() {
            warn!(seed, placed, rooms = tree.len(), "some rooms left unplaced");
        }
        info!(
            seed,
            rooms = tree.len(),
            placed,
            stories = grid.stories(),
            gaps = gaps.len(),
            "house generated"
        );

        Ok(Self {
            seed,
            facing,
            tree,
            grid,
            gaps,
        })
    }

    pub fn tile_at(&self, x: i32, y: i32, z: u32) -> Option<&Arc<Tile>> {
        self.grid.tile_at(x, y, z)
    }

    pub fn footprint_of(&self, id: RoomId) -> Footprint {
        self.tree.footprint_of(id)
    }

    pub fn children_of(&self, id: RoomId) -> &[RoomId] {
        self.tree.children_of(id)
    }

    pub fn is_placed(&self, id: RoomId) -> bool {
        self.tree.is_placed(id)
    }

    pub fn stories(&self) -> u32 {
        self.grid.stories()
    }

    /// Placed rooms in breadth-first order.
    pub fn placed_rooms(&self) -> Vec<RoomId> {
        self.tree
            .iter_bfs()
            .into_iter()
            .filter(|&id| self.tree.is_placed(id))
            .collect()
    }

    /// SHA3-256 over every cell's tile name, hex encoded. Two houses with the
    /// same fingerprint have identical grids.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha3_256::new();
        for z in 0..self.grid.stories() {
            hasher.update(z.to_le_bytes());
            hasher.update((self.grid.width(z) as u64).to_le_bytes());
            hasher.update((self.grid.height(z) as u64).to_le_bytes());
        }
        for (x, y, z, tile) in self.grid.cells() {
            hasher.update(x.to_le_bytes());
            hasher.update(y.to_le_bytes());
            hasher.update(z.to_le_bytes());
            hasher.update(tile.name.as_bytes());
        }
        hasher
            .finalize()
            .iter()
            .map(|b| format!("{b:02x}"))
            .collect()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
