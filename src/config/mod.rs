//! House generation configuration.
//!
//! Every field is optional in the serialized form and falls back to the
//! stock house. Files ending in `.json` are read with serde_json, files
//! ending in `.ron` with ron.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_MAX_HEIGHT, DEFAULT_MAX_STORIES, DEFAULT_MAX_WIDTH};
use crate::embed::EmbedLimits;
use crate::error::{ConfigError, GenerationError};
use crate::grammar::direction::{Direction, DirectionTable};
use crate::grammar::{GrammarConfig, RoomType};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HouseConfig {
    pub root_type: RoomType,
    /// Side the front door faces; drawn from the seed when unset
    pub facing: Option<Direction>,
    pub max_width: u32,
    pub max_height: u32,
    /// Highest z-index a room may be lifted to (0 = single story)
    pub max_stories: u32,
    /// Drawn at random (and logged) when unset
    pub seed: Option<u64>,
    pub grammar: GrammarConfig,
    pub directions: DirectionTable,
}

impl Default for HouseConfig {
    fn default() -> Self {
        Self {
            root_type: RoomType::Foyer,
            facing: None,
            max_width: DEFAULT_MAX_WIDTH,
            max_height: DEFAULT_MAX_HEIGHT,
            max_stories: DEFAULT_MAX_STORIES,
            seed: None,
            grammar: GrammarConfig::default(),
            directions: DirectionTable::standard(),
        }
    }
}

impl HouseConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_facing(mut self, facing: Direction) -> Self {
        self.facing = Some(facing);
        self
    }

    pub fn limits(&self) -> EmbedLimits {
        EmbedLimits {
            max_width: self.max_width,
            max_height: self.max_height,
            max_stories: self.max_stories,
        }
    }

    /// Every check that would otherwise abort generation half way.
    pub fn validate(&self) -> Result<(), GenerationError> {
        self.limits().validate()?;
        self.grammar.validate(self.root_type)?;

        let facings: Vec<Direction> = match self.facing {
            Some(facing) => vec![facing],
            None => Direction::ALL.to_vec(),
        };
        for facing in facings {
            self.directions.front_door_side(facing)?;
        }
        Ok(())
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_ron(text: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(text)?)
    }

    /// Load and validate a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json(&text)?,
            Some("ron") => Self::from_ron(&text)?,
            _ => return Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
        };
        config.validate()?;
        tracing::info!(path = %path.display(), "house config loaded");
        Ok(config)
    }
}
