//! Cardinal directions and the facing -> branch direction table.
//!
//! Grid coordinates grow east (+x) and south (+y), so north is `y - 1`.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::GenerationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    #[serde(rename = "n")]
    North,
    #[serde(rename = "s")]
    South,
    #[serde(rename = "e")]
    East,
    #[serde(rename = "w")]
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    /// Unit step in grid coordinates
    pub fn delta(self) -> (i32, i32) {
        match self {
            Self::North => (0, -1),
            Self::South => (0, 1),
            Self::East => (1, 0),
            Self::West => (-1, 0),
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::South => Self::North,
            Self::East => Self::West,
            Self::West => Self::East,
        }
    }

    /// North/south neighbours share a horizontal wall
    pub fn is_vertical_axis(self) -> bool {
        matches!(self, Self::North | Self::South)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::North => "n",
            Self::South => "s",
            Self::East => "e",
            Self::West => "w",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a child room ended up relative to its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpawnDirection {
    #[serde(rename = "n")]
    North,
    #[serde(rename = "s")]
    South,
    #[serde(rename = "e")]
    East,
    #[serde(rename = "w")]
    West,
    /// Same x,y as the parent, one story up
    #[serde(rename = "above")]
    StackedAbove,
}

impl SpawnDirection {
    pub fn cardinal(self) -> Option<Direction> {
        match self {
            Self::North => Some(Direction::North),
            Self::South => Some(Direction::South),
            Self::East => Some(Direction::East),
            Self::West => Some(Direction::West),
            Self::StackedAbove => None,
        }
    }
}

impl From<Direction> for SpawnDirection {
    fn from(dir: Direction) -> Self {
        match dir {
            Direction::North => Self::North,
            Direction::South => Self::South,
            Direction::East => Self::East,
            Direction::West => Self::West,
        }
    }
}

impl fmt::Display for SpawnDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.cardinal() {
            Some(dir) => dir.fmt(f),
            None => f.write_str("above"),
        }
    }
}

/// For each house facing, the directions a child room may branch toward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectionTable {
    entries: BTreeMap<Direction, Vec<Direction>>,
}

impl Default for DirectionTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl DirectionTable {
    /// A house may branch in any direction except back out its front door.
    pub fn standard() -> Self {
        let entries = Direction::ALL
            .iter()
            .map(|&facing| {
                let branches = Direction::ALL
                    .iter()
                    .copied()
                    .filter(|&d| d != facing)
                    .collect();
                (facing, branches)
            })
            .collect();
        Self { entries }
    }

    pub fn from_entries(entries: impl IntoIterator<Item = (Direction, Vec<Direction>)>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    pub fn branches(&self, facing: Direction) -> Result<&[Direction], GenerationError> {
        self.entries
            .get(&facing)
            .filter(|dirs| !dirs.is_empty())
            .map(Vec::as_slice)
            .ok_or(GenerationError::MissingDirections(facing))
    }

    /// Wall that receives the front door: opposite the average branch
    /// direction, or the facing itself when the branches cancel out.
    pub fn front_door_side(&self, facing: Direction) -> Result<Direction, GenerationError> {
        let (dx, dy) = self
            .branches(facing)?
            .iter()
            .map(|d| d.delta())
            .fold((0, 0), |(ax, ay), (x, y)| (ax + x, ay + y));

        let side = if dx == 0 && dy == 0 {
            facing
        } else if dy.abs() >= dx.abs() {
            if dy > 0 {
                Direction::North
            } else {
                Direction::South
            }
        } else if dx > 0 {
            Direction::West
        } else {
            Direction::East
        };
        Ok(side)
    }
}
