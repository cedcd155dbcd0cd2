//! Grammar-driven room tree construction.
//!
//! Each room draws up to three children from its grammar entry. The draw
//! only considers types still under their population cap, and the counter
//! is bumped before recursing, so deeper rooms and later siblings see every
//! room already committed anywhere in the house.

use std::collections::BTreeMap;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::{RoomId, RoomTree};
use crate::constants::MAX_BRANCHES_PER_ROOM;
use crate::error::GenerationError;
use crate::grammar::{GrammarConfig, RoomType};
use crate::logging::TimingSpan;

/// Per-type room counts for one build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopulationCounter {
    counts: BTreeMap<RoomType, u32>,
}

impl PopulationCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, room_type: RoomType) -> u32 {
        self.counts.get(&room_type).copied().unwrap_or(0)
    }

    pub fn increment(&mut self, room_type: RoomType) {
        *self.counts.entry(room_type).or_insert(0) += 1;
    }

    /// Uncapped types are always eligible.
    pub fn has_room_for(&self, room_type: RoomType, grammar: &GrammarConfig) -> bool {
        grammar
            .cap(room_type)
            .map_or(true, |cap| self.get(room_type) < cap)
    }

    pub fn total(&self) -> u32 {
        self.counts.values().sum()
    }
}

/// Build a fresh room tree rooted at `root_type`.
pub fn build_tree<R: Rng + ?Sized>(
    root_type: RoomType,
    grammar: &GrammarConfig,
    rng: &mut R,
) -> Result<RoomTree, GenerationError> {
    let mut counter = PopulationCounter::new();
    build_tree_with_counter(root_type, grammar, &mut counter, rng)
}

/// Build a room tree, charging every room to `counter`.
///
/// The root counts against its own type's cap like any other room.
pub fn build_tree_with_counter<R: Rng + ?Sized>(
    root_type: RoomType,
    grammar: &GrammarConfig,
    counter: &mut PopulationCounter,
    rng: &mut R,
) -> Result<RoomTree, GenerationError> {
    let _span = TimingSpan::new("build_tree");
    grammar.validate(root_type)?;

    let range = grammar.size_range(root_type)?;
    counter.increment(root_type);
    let width = range.sample(rng);
    let height = range.sample(rng);
    let mut tree = RoomTree::new(root_type, width, height);
    let root = tree.root();

    grow(&mut tree, root, grammar, counter, rng)?;

    debug!(
        rooms = tree.len(),
        root = %root_type,
        "room tree built"
    );
    Ok(tree)
}

fn grow<R: Rng + ?Sized>(
    tree: &mut RoomTree,
    id: RoomId,
    grammar: &GrammarConfig,
    counter: &mut PopulationCounter,
    rng: &mut R,
) -> Result<(), GenerationError> {
    let room_type = tree[id].room_type();
    let candidates = grammar.children_of(room_type);
    if candidates.is_empty() {
        return Ok(());
    }

    for _ in 0..candidates.len().min(MAX_BRANCHES_PER_ROOM) {
        let eligible: Vec<RoomType> = candidates
            .iter()
            .copied()
            .filter(|&t| counter.has_room_for(t, grammar))
            .collect();

        let Some(&child_type) = eligible.choose(rng) else {
            trace!(parent = %room_type, "no eligible child types left");
            continue;
        };

        counter.increment(child_type);
        let range = grammar.size_range(child_type)?;
        let width = range.sample(rng);
        let height = range.sample(rng);
        let child = tree.add_child(id, child_type, width, height);
        grow(tree, child, grammar, counter, rng)?;
    }

    Ok(())
}
