//! Room grammar: which room types may branch off which, how big each type
//! is, and how many of each a single house may contain.
//!
//! The default tables describe a typical single-family house. Every house
//! starts at a foyer; closets are always terminal. Halls may spawn halls,
//! so they carry a population cap to keep the recursion finite.

pub mod direction;

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::MIN_ROOM_SIDE;
use crate::error::GenerationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomType {
    Foyer,
    DiningRoom,
    LivingRoom,
    Kitchen,
    Office,
    Hall,
    Bathroom,
    Bedroom,
    Closet,
}

impl RoomType {
    pub const ALL: [RoomType; 9] = [
        RoomType::Foyer,
        RoomType::DiningRoom,
        RoomType::LivingRoom,
        RoomType::Kitchen,
        RoomType::Office,
        RoomType::Hall,
        RoomType::Bathroom,
        RoomType::Bedroom,
        RoomType::Closet,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Foyer => "foyer",
            Self::DiningRoom => "dining room",
            Self::LivingRoom => "living room",
            Self::Kitchen => "kitchen",
            Self::Office => "office",
            Self::Hall => "hall",
            Self::Bathroom => "bathroom",
            Self::Bedroom => "bedroom",
            Self::Closet => "closet",
        }
    }
}

impl fmt::Display for RoomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Inclusive side-length range; width and height are drawn independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeRange {
    pub min: u32,
    pub max: u32,
}

impl SizeRange {
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, side: u32) -> bool {
        (self.min..=self.max).contains(&side)
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        rng.gen_range(self.min..=self.max)
    }
}

/// Grammar adjacency, size ranges and population caps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrammarConfig {
    /// Permitted child types; absent or empty means terminal
    pub children: BTreeMap<RoomType, Vec<RoomType>>,
    pub sizes: BTreeMap<RoomType, SizeRange>,
    /// Max instances per type across the whole house; absent means unbounded
    pub caps: BTreeMap<RoomType, u32>,
}

impl Default for GrammarConfig {
    fn default() -> Self {
        use RoomType::*;

        let children = BTreeMap::from([
            (Foyer, vec![DiningRoom, LivingRoom, Kitchen, Office, Hall]),
            (DiningRoom, vec![LivingRoom, Kitchen, Hall]),
            (LivingRoom, vec![DiningRoom, Kitchen, Office, Hall]),
            (Kitchen, vec![DiningRoom, LivingRoom, Hall]),
            (Office, vec![Closet]),
            (
                Hall,
                vec![DiningRoom, LivingRoom, Kitchen, Office, Hall, Bathroom, Bedroom, Closet],
            ),
            (Bathroom, vec![Closet]),
            (Bedroom, vec![Closet]),
        ]);

        let sizes = BTreeMap::from([
            (Foyer, SizeRange::new(3, 4)),
            (DiningRoom, SizeRange::new(8, 10)),
            (LivingRoom, SizeRange::new(8, 10)),
            (Kitchen, SizeRange::new(8, 10)),
            (Office, SizeRange::new(7, 10)),
            (Hall, SizeRange::new(3, 5)),
            (Bathroom, SizeRange::new(5, 7)),
            (Bedroom, SizeRange::new(7, 11)),
            (Closet, SizeRange::new(3, 3)),
        ]);

        let caps = BTreeMap::from([
            (Kitchen, 1),
            (DiningRoom, 1),
            (LivingRoom, 1),
            (Bedroom, 3),
            (Bathroom, 2),
            (Office, 1),
            (Hall, 3),
        ]);

        Self {
            children,
            sizes,
            caps,
        }
    }
}

impl GrammarConfig {
    pub fn children_of(&self, room_type: RoomType) -> &[RoomType] {
        self.children
            .get(&room_type)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn is_terminal(&self, room_type: RoomType) -> bool {
        self.children_of(room_type).is_empty()
    }

    pub fn cap(&self, room_type: RoomType) -> Option<u32> {
        self.caps.get(&room_type).copied()
    }

    pub fn size_range(&self, room_type: RoomType) -> Result<SizeRange, GenerationError> {
        self.sizes
            .get(&room_type)
            .copied()
            .ok_or(GenerationError::MissingSizeRange(room_type))
    }

    /// Room types reachable from `root` through the grammar, root included.
    pub fn reachable_from(&self, root: RoomType) -> BTreeSet<RoomType> {
        let mut seen = BTreeSet::from([root]);
        let mut stack = vec![root];
        while let Some(current) = stack.pop() {
            for &child in self.children_of(current) {
                if seen.insert(child) {
                    stack.push(child);
                }
            }
        }
        seen
    }

    /// Check everything a build starting at `root` will touch.
    pub fn validate(&self, root: RoomType) -> Result<(), GenerationError> {
        let reachable = self.reachable_from(root);

        for &room_type in &reachable {
            let range = self.size_range(room_type)?;
            if range.min < MIN_ROOM_SIDE || range.min > range.max {
                return Err(GenerationError::InvalidSizeRange {
                    room_type,
                    min: range.min,
                    max: range.max,
                });
            }
        }

        if self.cap(root) == Some(0) {
            return Err(GenerationError::RootCappedOut(root));
        }

        // Uncapped types must form a DAG, otherwise the build never bottoms out.
        let uncapped: BTreeSet<RoomType> = reachable
            .iter()
            .copied()
            .filter(|t| self.cap(*t).is_none())
            .collect();
        let mut finished = BTreeSet::new();
        for &start in &uncapped {
            let mut on_path = BTreeSet::new();
            self.find_uncapped_cycle(start, &uncapped, &mut on_path, &mut finished)?;
        }

        Ok(())
    }

    fn find_uncapped_cycle(
        &self,
        node: RoomType,
        uncapped: &BTreeSet<RoomType>,
        on_path: &mut BTreeSet<RoomType>,
        finished: &mut BTreeSet<RoomType>,
    ) -> Result<(), GenerationError> {
        if finished.contains(&node) {
            return Ok(());
        }
        if !on_path.insert(node) {
            return Err(GenerationError::UnboundedGrammar(node));
        }
        for &child in self.children_of(node) {
            if uncapped.contains(&child) {
                self.find_uncapped_cycle(child, uncapped, on_path, finished)?;
            }
        }
        on_path.remove(&node);
        finished.insert(node);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    #[test]
    fn test_default_grammar_validates() {
        let grammar = GrammarConfig::default();
        assert!(grammar.validate(RoomType::Foyer).is_ok());
    }

    #[test]
    fn test_closet_is_terminal() {
        let grammar = GrammarConfig::default();
        assert!(grammar.is_terminal(RoomType::Closet));
        assert!(!grammar.is_terminal(RoomType::Hall));
    }

    #[test]
    fn test_foyer_unreachable_as_child() {
        let grammar = GrammarConfig::default();
        for children in grammar.children.values() {
            assert!(!children.contains(&RoomType::Foyer));
        }
    }

    #[test]
    fn test_size_sample_in_range() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(7);
        let range = SizeRange::new(7, 11);
        for _ in 0..200 {
            assert!(range.contains(range.sample(&mut rng)));
        }
    }

    #[test]
    fn test_uncapped_hall_loop_rejected() {
        let mut grammar = GrammarConfig::default();
        grammar.caps.remove(&RoomType::Hall);
        assert!(matches!(
            grammar.validate(RoomType::Foyer),
            Err(GenerationError::UnboundedGrammar(RoomType::Hall))
        ));
    }

    #[test]
    fn test_missing_size_only_matters_when_reachable() {
        let mut grammar = GrammarConfig::default();
        grammar.sizes.remove(&RoomType::Foyer);
        assert!(grammar.validate(RoomType::Bedroom).is_ok());
        assert!(matches!(
            grammar.validate(RoomType::Foyer),
            Err(GenerationError::MissingSizeRange(RoomType::Foyer))
        ));
    }

    #[test]
    fn test_too_small_room_rejected() {
        let mut grammar = GrammarConfig::default();
        grammar.sizes.insert(RoomType::Closet, SizeRange::new(2, 3));
        assert!(matches!(
            grammar.validate(RoomType::Foyer),
            Err(GenerationError::InvalidSizeRange { room_type: RoomType::Closet, .. })
        ));
    }

    #[test]
    fn test_root_cap_zero_rejected() {
        let mut grammar = GrammarConfig::default();
        grammar.caps.insert(RoomType::Foyer, 0);
        assert!(matches!(
            grammar.validate(RoomType::Foyer),
            Err(GenerationError::RootCappedOut(RoomType::Foyer))
        ));
    }
}
